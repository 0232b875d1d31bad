use super::*;

/// Constraint that last shaped delivered power in a step
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum PowerLimit {
    /// request was met as-is
    #[default]
    None,
    /// scheduled outage in effect
    Outage,
    /// no fuel left, or not enough to hold min turndown for a step
    FuelExhausted,
    /// unit is within its startup window
    StartingUp,
    RampUp,
    RampDown,
    /// request snapped to 0 or to min turndown power
    Turndown,
    /// request exceeded degraded max power
    MaxPower,
    /// degraded max power fell below min turndown power
    DegradedBelowTurndown,
    /// output reduced to what remaining fuel supports
    Fuel,
    /// efficiency lookup gave zero
    ZeroEfficiency,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, HistoryVec)]
/// Committed state of a [FuelCell](super::FuelCell) after a step
pub struct FuelCellState {
    /// number of completed steps
    pub i: usize,
    /// hours from start of horizon to start of the step
    pub time_hours: f64,
    /// `time_hours` wrapped to the year
    pub hour_of_year: f64,
    /// zero-based simulated year
    pub year: usize,

    /// requested electrical power \[kW\]
    pub pwr_req_kw: f64,
    /// delivered electrical power \[kW\]
    pub pwr_kw: f64,
    /// delivered electrical power of the previous step \[kW\]
    pub pwr_prev_kw: f64,
    /// recovered thermal power \[kW\]
    pub pwr_thermal_kw: f64,
    /// fuel power on a higher heating value basis \[kW\]
    pub pwr_fuel_kw: f64,
    /// degraded max power \[kW\]
    pub pwr_max_kw: f64,
    /// delivered power as percent of original max power, clamped to the
    /// efficiency table domain
    pub percent_load: f64,
    pub electrical_efficiency_percent: f64,
    pub heat_recovery_percent: f64,

    /// fuel consumed this step \[MCF\]
    pub fuel_consumed_mcf: f64,
    /// fuel remaining after this step \[MCF\]
    pub available_fuel_mcf: f64,

    /// whether the unit has been started and not since shut down
    pub started_up: bool,
    pub hours_since_start: f64,
    /// cumulative hours the unit has spent started
    pub hours_operating: f64,
    pub starts: usize,
    pub restarts: usize,
    /// capacity lost to operation since the last replacement \[kW\]
    pub degradation_kw: f64,
    /// capacity lost to restarts since the last replacement \[kW\]
    pub degradation_restart_kw: f64,
    pub replacements: usize,
    /// index of the next pending entry of the replacement schedule
    pub next_replacement_idx: usize,

    /// cumulative electrical energy \[kWh\]
    pub energy_out_kwh: f64,
    /// cumulative thermal energy \[kWh\]
    pub energy_thermal_kwh: f64,
    /// cumulative fuel \[MCF\]
    pub fuel_consumed_total_mcf: f64,

    pub limit: PowerLimit,
}

impl FuelCellState {
    /// Fresh state for a unit built from `params`
    pub fn from_params(params: &FuelCellParams) -> Self {
        Self {
            pwr_max_kw: params.pwr_max_kw,
            available_fuel_mcf: params.available_fuel_mcf,
            ..Default::default()
        }
    }

    /// Total capacity lost since the last replacement \[kW\]
    pub fn degradation_total_kw(&self) -> f64 {
        self.degradation_kw + self.degradation_restart_kw
    }
}
