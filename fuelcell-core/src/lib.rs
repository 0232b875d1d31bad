//! Crate containing a time-stepped model of a single fuel cell unit that turns a
//! requested electrical power signal into achievable electrical and thermal output
//! and fuel draw, subject to ramp rates, turndown and capacity limits, scheduled
//! outages, degradation, finite fuel supply, and unit replacement.
//!
//! The caller drives time: build a [FuelCell](fuel_cell::FuelCell) from
//! [FuelCellParams](fuel_cell::FuelCellParams), call
//! [solve_step](fuel_cell::FuelCell::solve_step) once per timestep, and read the
//! committed results through the accessors.

#[macro_use]
pub mod macros;

pub mod fuel_cell;
pub mod imports;
pub mod params;
pub mod prelude;
pub mod simulation;
pub mod traits;
pub mod utils;
