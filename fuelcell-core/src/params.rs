//! Module containing fuel cell model constants.

/// Unit conversions that should NEVER change
pub const BTU_PER_KWH: f64 = 3412.14163;
pub const FT3_PER_MCF: f64 = 1_000.0;
pub const MINUTES_PER_HOUR: f64 = 60.0;
pub const HOURS_PER_YEAR: f64 = 8_760.0;

/// Tolerance used when comparing accumulated floating point hours
pub const HOUR_TOL: f64 = 1e-9;
