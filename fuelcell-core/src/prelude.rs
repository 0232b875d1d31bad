pub use crate::fuel_cell::{
    EfficiencyCurve, EfficiencyRow, FuelCell, FuelCellParams, FuelCellState,
    FuelCellStateHistoryVec, PowerLimit, ReplacementOption, ScheduledShutdown, ShutdownOption,
    StartupProfile,
};
pub use crate::params::BTU_PER_KWH;
pub use crate::simulation::{
    FuelCellSimulation, FuelCellSimulationVec, PowerTrace, PowerTraceElement,
};
pub use crate::traits::{SerdeAPI, SerdeFormat};
pub use crate::utils::interp::Interp1D;
