//! Module containing the fuel cell unit model and its per-step dispatch logic.

use crate::imports::*;

mod efficiency;
mod fuel_cell_params;
mod state;

pub use efficiency::*;
pub use fuel_cell_params::*;
pub use state::*;

/// Bisection iterations when backing off output to fit the remaining fuel
const FUEL_SOLVE_ITERS: usize = 60;

impl Default for EfficiencyCurve {
    fn default() -> Self {
        Self::from_table(&FuelCellParams::default().efficiency_table).unwrap()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, HistoryMethods)]
/// Single fuel cell unit stepped through time by [FuelCell::solve_step].
///
/// Each step turns a requested electrical power into delivered electrical and
/// thermal power and fuel draw, honoring (in order) outages and fuel
/// exhaustion, ramp rates, min turndown, degraded max power, the startup
/// window, degradation, and the remaining fuel, then checks for replacement.
pub struct FuelCell {
    params: FuelCellParams,
    #[serde(skip)]
    efficiency_curve: EfficiencyCurve,
    /// struct for tracking current state
    #[serde(default)]
    pub state: FuelCellState,
    /// time step interval between saves. 1 is a good option. If None, no saving occurs.
    #[serde(default)]
    pub save_interval: Option<usize>,
    /// Custom vector of [Self::state]
    #[serde(default, skip_serializing_if = "FuelCellStateHistoryVec::is_empty")]
    pub history: FuelCellStateHistoryVec,
}

impl Default for FuelCell {
    fn default() -> Self {
        Self::new(FuelCellParams::default()).unwrap()
    }
}

impl SerdeAPI for FuelCell {
    fn init(&mut self) -> anyhow::Result<()> {
        self.params.validate_all()?;
        self.efficiency_curve = EfficiencyCurve::from_table(&self.params.efficiency_table)?;
        if self.state.i == 0 {
            self.state = FuelCellState::from_params(&self.params);
        }
        Ok(())
    }
}

impl FuelCell {
    /// Validate `params` and build a unit at its initial state
    pub fn new(params: FuelCellParams) -> anyhow::Result<Self> {
        params
            .validate_all()
            .with_context(|| format!("{}\ninvalid fuel cell parameters", format_dbg!()))?;
        let efficiency_curve = EfficiencyCurve::from_table(&params.efficiency_table)?;
        let state = FuelCellState::from_params(&params);
        Ok(Self {
            params,
            efficiency_curve,
            state,
            save_interval: None,
            history: FuelCellStateHistoryVec::new(),
        })
    }

    /// Record history every `save_interval` steps, or never for `None`
    pub fn with_save_interval(mut self, save_interval: Option<usize>) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Advance one step of `params.dt_hours` with electrical request `pwr_req_kw`.
    /// Negative and NaN requests are treated as zero.
    pub fn solve_step(&mut self, pwr_req_kw: f64) -> anyhow::Result<()> {
        self.calculate_time();
        self.state.pwr_prev_kw = self.state.pwr_kw;
        self.state.pwr_req_kw = pwr_req_kw;
        self.state.limit = PowerLimit::None;
        let pwr_req_kw = pwr_req_kw.max(0.0);

        let gated = self.check_shutdown()?;
        let before_start = self.state;
        let mut pwr_kw = 0.0;
        if !gated {
            pwr_kw = self.apply_ramp_limits(pwr_req_kw);
            pwr_kw = self.check_min_turndown(pwr_kw);
            pwr_kw = self.check_max_limit(pwr_kw);
            pwr_kw = self.check_zero_efficiency(pwr_kw)?;
            pwr_kw = self.track_startup(pwr_kw);
            self.update_run_status(gated, pwr_kw);
        }
        self.accumulate_run_time();
        let pwr_kw = self.apply_degradation(pwr_kw);
        self.apply_efficiency(pwr_kw)?;
        if self.state.limit == PowerLimit::ZeroEfficiency
            && self.state.started_up
            && !before_start.started_up
        {
            self.cancel_start(&before_start);
        }
        self.check_available_fuel()?;
        self.update_run_status(gated, self.state.pwr_kw);
        self.check_replacement();
        self.commit();

        self.save_state();
        self.step();
        Ok(())
    }

    fn calculate_time(&mut self) {
        // multiply rather than accumulate so long horizons do not drift
        let time_hours = self.state.i as f64 * self.params.dt_hours;
        let year = ((time_hours + HOUR_TOL) / HOURS_PER_YEAR).floor() as usize;
        if year > self.state.year {
            log::debug!("{}\nentering simulated year {}", format_dbg!(), year);
        }
        self.state.time_hours = time_hours;
        self.state.year = year;
        self.state.hour_of_year = (time_hours - year as f64 * HOURS_PER_YEAR).max(0.0);
    }

    /// Whether the current hour of year falls in a scheduled outage
    pub fn in_scheduled_shutdown(&self) -> bool {
        self.params
            .scheduled_shutdowns
            .iter()
            .any(|s| s.contains(self.state.hour_of_year))
    }

    /// Forces zero output during outages and once fuel can no longer hold min
    /// turndown.  Returns whether output is gated this step.
    fn check_shutdown(&mut self) -> anyhow::Result<bool> {
        if self.fuel_exhausted()? {
            if self.state.started_up || self.state.pwr_prev_kw > 0.0 {
                log::warn!(
                    "{}\nfuel exhausted at hour {}, {} MCF remaining",
                    format_dbg!(),
                    self.state.time_hours,
                    self.state.available_fuel_mcf
                );
            }
            self.state.limit = PowerLimit::FuelExhausted;
            self.shut_down();
            return Ok(true);
        }
        if self.in_scheduled_shutdown() {
            self.state.limit = PowerLimit::Outage;
            match self.params.shutdown_option {
                ShutdownOption::Shutdown => {
                    if self.state.started_up {
                        log::debug!(
                            "{}\nscheduled shutdown at hour of year {}",
                            format_dbg!(),
                            self.state.hour_of_year
                        );
                    }
                    self.shut_down();
                }
                ShutdownOption::Idle => {}
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn fuel_exhausted(&self) -> anyhow::Result<bool> {
        let available = self.state.available_fuel_mcf;
        if available <= 0.0 {
            return Ok(true);
        }
        if self.params.pwr_min_kw <= 0.0 {
            return Ok(false);
        }
        Ok(self.fuel_mcf_at(self.params.pwr_min_kw)? > available)
    }

    fn shut_down(&mut self) {
        self.state.started_up = false;
        self.state.hours_since_start = 0.0;
    }

    /// Going from off to on is not ramp limited.
    fn apply_ramp_limits(&mut self, pwr_kw: f64) -> f64 {
        let pwr_prev_kw = self.state.pwr_prev_kw;
        if pwr_prev_kw <= 0.0 {
            return pwr_kw;
        }
        let dt = self.params.dt_hours;
        if let Some(rate) = self.params.ramp_up_kw_per_hour() {
            let ceiling = pwr_prev_kw + rate * dt;
            if pwr_kw > ceiling {
                self.state.limit = PowerLimit::RampUp;
                return ceiling;
            }
        }
        if let Some(rate) = self.params.ramp_down_kw_per_hour() {
            let floor = (pwr_prev_kw - rate * dt).max(0.0);
            if pwr_kw < floor {
                self.state.limit = PowerLimit::RampDown;
                return floor;
            }
        }
        pwr_kw
    }

    /// Output between zero and min turndown snaps to whichever is nearer, with
    /// the midpoint going to min turndown.
    fn check_min_turndown(&mut self, pwr_kw: f64) -> f64 {
        let pwr_min_kw = self.params.pwr_min_kw;
        if pwr_kw <= 0.0 || pwr_kw >= pwr_min_kw {
            return pwr_kw;
        }
        self.state.limit = PowerLimit::Turndown;
        if pwr_kw < 0.5 * pwr_min_kw {
            0.0
        } else {
            pwr_min_kw
        }
    }

    fn check_max_limit(&mut self, pwr_kw: f64) -> f64 {
        let pwr_max_kw = self.state.pwr_max_kw;
        if pwr_kw <= pwr_max_kw {
            return pwr_kw;
        }
        if pwr_max_kw < self.params.pwr_min_kw {
            self.state.limit = PowerLimit::DegradedBelowTurndown;
            0.0
        } else {
            self.state.limit = PowerLimit::MaxPower;
            pwr_max_kw
        }
    }

    /// Withholds output at loads where the table gives no electrical
    /// efficiency, so such requests never start the unit
    fn check_zero_efficiency(&mut self, pwr_kw: f64) -> anyhow::Result<f64> {
        if pwr_kw <= 0.0 {
            return Ok(pwr_kw);
        }
        let eff = self
            .efficiency_curve
            .electrical_efficiency_percent(self.percent_load(pwr_kw))?;
        if eff > 0.0 {
            return Ok(pwr_kw);
        }
        self.state.limit = PowerLimit::ZeroEfficiency;
        Ok(0.0)
    }

    /// Records a start when power is wanted from a unit that is not started and
    /// withholds output until the startup window has elapsed.
    fn track_startup(&mut self, pwr_kw: f64) -> f64 {
        if pwr_kw <= 0.0 {
            return 0.0;
        }
        if !self.state.started_up {
            if self.state.starts > 0 {
                self.state.restarts += 1;
                self.state.degradation_restart_kw += self.params.degradation_restart_kw;
            }
            self.state.starts += 1;
            self.state.started_up = true;
            self.state.hours_since_start = 0.0;
            log::debug!(
                "{}\nstart {} at hour {}",
                format_dbg!(),
                self.state.starts,
                self.state.time_hours
            );
        }
        let startup_hours = self.params.startup_hours;
        if self.state.hours_since_start + HOUR_TOL >= startup_hours {
            return pwr_kw;
        }
        self.state.limit = PowerLimit::StartingUp;
        match self.params.startup_profile {
            StartupProfile::Zero => 0.0,
            StartupProfile::Linear => {
                let cap =
                    self.state.pwr_max_kw * self.state.hours_since_start / startup_hours;
                let pwr_kw = pwr_kw.min(cap);
                if pwr_kw < self.params.pwr_min_kw {
                    0.0
                } else {
                    pwr_kw
                }
            }
        }
    }

    /// A unit left without output outside an outage is shut down, unless it is
    /// still warming up.
    fn update_run_status(&mut self, gated: bool, pwr_kw: f64) {
        if gated || !self.state.started_up || pwr_kw > 0.0 {
            return;
        }
        if self.state.limit != PowerLimit::StartingUp {
            self.shut_down();
        }
    }

    /// Undoes a start made this step when the unit ended up producing nothing
    fn cancel_start(&mut self, before: &FuelCellState) {
        self.state.started_up = false;
        self.state.hours_since_start = 0.0;
        self.state.hours_operating = before.hours_operating;
        self.state.starts = before.starts;
        self.state.restarts = before.restarts;
        self.state.degradation_kw = before.degradation_kw;
        self.state.degradation_restart_kw = before.degradation_restart_kw;
        self.state.pwr_max_kw =
            (self.params.pwr_max_kw - self.state.degradation_total_kw()).max(0.0);
    }

    fn accumulate_run_time(&mut self) {
        if !self.state.started_up {
            return;
        }
        let dt = self.params.dt_hours;
        self.state.hours_since_start += dt;
        self.state.hours_operating += dt;
        self.state.degradation_kw += self.params.degradation_kw_per_hour * dt;
    }

    /// Updates degraded max power and keeps `pwr_kw` within it
    fn apply_degradation(&mut self, pwr_kw: f64) -> f64 {
        self.state.pwr_max_kw =
            (self.params.pwr_max_kw - self.state.degradation_total_kw()).max(0.0);
        self.check_max_limit(pwr_kw)
    }

    fn percent_load(&self, pwr_kw: f64) -> f64 {
        let pwr_max_kw = self.params.pwr_max_kw;
        let percent = if pwr_max_kw > 0.0 {
            pwr_kw / pwr_max_kw * 100.0
        } else {
            0.0
        };
        self.efficiency_curve.clamp_load(percent)
    }

    fn fuel_mcf_at(&self, pwr_kw: f64) -> anyhow::Result<f64> {
        if pwr_kw <= 0.0 {
            return Ok(0.0);
        }
        let eff = self
            .efficiency_curve
            .electrical_efficiency_percent(self.percent_load(pwr_kw))?;
        Ok(self.params.fuel_mcf(pwr_kw, eff, self.params.dt_hours))
    }

    fn set_idle_output(&mut self) {
        self.state.pwr_kw = 0.0;
        self.state.percent_load = 0.0;
        self.state.electrical_efficiency_percent = 0.0;
        self.state.heat_recovery_percent = 0.0;
        self.state.pwr_thermal_kw = 0.0;
        self.state.pwr_fuel_kw = 0.0;
        self.state.fuel_consumed_mcf = 0.0;
    }

    /// Sets delivered power and everything derived from it via the efficiency table
    fn apply_efficiency(&mut self, pwr_kw: f64) -> anyhow::Result<()> {
        if pwr_kw <= 0.0 {
            self.set_idle_output();
            return Ok(());
        }
        let percent_load = self.percent_load(pwr_kw);
        let (eff, heat) = self.efficiency_curve.at(percent_load)?;
        if eff <= 0.0 {
            self.state.limit = PowerLimit::ZeroEfficiency;
            self.set_idle_output();
            return Ok(());
        }
        self.state.pwr_kw = pwr_kw;
        self.state.percent_load = percent_load;
        self.state.electrical_efficiency_percent = eff;
        self.state.heat_recovery_percent = heat;
        self.state.pwr_thermal_kw = pwr_kw * heat / eff;
        self.state.pwr_fuel_kw = pwr_kw / (eff / 100.0);
        self.state.fuel_consumed_mcf = self.params.fuel_mcf(pwr_kw, eff, self.params.dt_hours);
        Ok(())
    }

    /// Backs off output to what the remaining fuel supports
    fn check_available_fuel(&mut self) -> anyhow::Result<()> {
        let available = self.state.available_fuel_mcf;
        if self.state.fuel_consumed_mcf <= available {
            return Ok(());
        }
        let pwr_req_kw = self.state.pwr_kw;
        let pwr_kw = self.max_sustainable_power(pwr_req_kw, available)?;
        let pwr_kw = if pwr_kw < self.params.pwr_min_kw {
            0.0
        } else {
            pwr_kw
        };
        self.state.limit = PowerLimit::Fuel;
        self.apply_efficiency(pwr_kw)?;
        if self.state.pwr_kw > 0.0 {
            // the bisection lands within rounding of the supply, so draw it all
            self.state.fuel_consumed_mcf = available;
        }
        log::warn!(
            "{}\nfuel limited output at hour {}: {} kW of {} kW",
            format_dbg!(),
            self.state.time_hours,
            self.state.pwr_kw,
            pwr_req_kw
        );
        Ok(())
    }

    /// Largest power in `[0, pwr_kw]` whose fuel draw over one step fits in `available_mcf`
    fn max_sustainable_power(&self, pwr_kw: f64, available_mcf: f64) -> anyhow::Result<f64> {
        let (mut lo, mut hi) = (0.0, pwr_kw);
        for _ in 0..FUEL_SOLVE_ITERS {
            let mid = 0.5 * (lo + hi);
            if self.fuel_mcf_at(mid)? <= available_mcf {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }

    fn check_replacement(&mut self) {
        let due = match self.params.replacement_option {
            ReplacementOption::None => false,
            ReplacementOption::AtCapacity => {
                let pwr_max_kw = self.params.pwr_max_kw;
                // degradation accumulates step by step, so allow for rounding
                pwr_max_kw > 0.0
                    && almost_le(
                        self.state.pwr_max_kw,
                        self.params.replacement_percent / 100.0 * pwr_max_kw,
                        None,
                    )
            }
            ReplacementOption::OnSchedule => {
                // several passed entries still yield one replacement
                let mut due = false;
                while let Some(hour) = self
                    .params
                    .replacement_schedule_hours
                    .get(self.state.next_replacement_idx)
                {
                    if self.state.time_hours + HOUR_TOL < *hour {
                        break;
                    }
                    self.state.next_replacement_idx += 1;
                    due = true;
                }
                due
            }
        };
        if due {
            self.replace();
        }
    }

    fn replace(&mut self) {
        self.state.replacements += 1;
        self.state.degradation_kw = 0.0;
        self.state.degradation_restart_kw = 0.0;
        self.state.pwr_max_kw = self.params.pwr_max_kw;
        log::info!(
            "{}\nfuel cell replaced at hour {} (replacement {})",
            format_dbg!(),
            self.state.time_hours,
            self.state.replacements
        );
    }

    fn commit(&mut self) {
        let dt = self.params.dt_hours;
        self.state.available_fuel_mcf =
            (self.state.available_fuel_mcf - self.state.fuel_consumed_mcf).max(0.0);
        self.state.fuel_consumed_total_mcf += self.state.fuel_consumed_mcf;
        self.state.energy_out_kwh += self.state.pwr_kw * dt;
        self.state.energy_thermal_kwh += self.state.pwr_thermal_kw * dt;
    }

    /// Point the replacement schedule cursor at the first entry not before the
    /// next step
    fn realign_replacement_schedule(&mut self) {
        let next_hour = self.state.i as f64 * self.params.dt_hours;
        self.state.next_replacement_idx = self
            .params
            .replacement_schedule_hours
            .partition_point(|&hour| hour + HOUR_TOL < next_hour);
    }

    impl_validated_setter!(
        /// Capacity threshold \[% of original max power\] for [ReplacementOption::AtCapacity]
        set_replacement_percent,
        replacement_percent,
        f64
    );

    impl_validated_setter!(
        /// Capacity lost per restart \[kW\]
        set_degradation_restart_kw,
        degradation_restart_kw,
        f64
    );

    impl_validated_setter!(
        /// Capacity lost per operating hour \[kW/h\]
        set_degradation_kw_per_hour,
        degradation_kw_per_hour,
        f64
    );

    impl_validated_setter!(set_scheduled_shutdowns, scheduled_shutdowns, Vec<ScheduledShutdown>);

    impl_validated_setter!(set_startup_hours, startup_hours, f64);

    /// Change the replacement policy; schedule entries before the next step are skipped
    pub fn set_replacement_option(
        &mut self,
        replacement_option: ReplacementOption,
    ) -> anyhow::Result<()> {
        let previous = std::mem::replace(&mut self.params.replacement_option, replacement_option);
        if let Err(err) = self.params.validate_all() {
            self.params.replacement_option = previous;
            return Err(err.context(format!(
                "{}\ninvalid value for `replacement_option`",
                format_dbg!()
            )));
        }
        self.realign_replacement_schedule();
        Ok(())
    }

    /// Replace the replacement schedule; entries before the next step are skipped
    pub fn set_replacement_schedule_hours(
        &mut self,
        replacement_schedule_hours: Vec<f64>,
    ) -> anyhow::Result<()> {
        let previous = std::mem::replace(
            &mut self.params.replacement_schedule_hours,
            replacement_schedule_hours,
        );
        if let Err(err) = self.params.validate_all() {
            self.params.replacement_schedule_hours = previous;
            return Err(err.context(format!(
                "{}\ninvalid value for `replacement_schedule_hours`",
                format_dbg!()
            )));
        }
        self.realign_replacement_schedule();
        Ok(())
    }

    /// Overwrite the remaining fuel supply, e.g. after a delivery
    pub fn set_available_fuel_mcf(&mut self, available_fuel_mcf: f64) -> anyhow::Result<()> {
        ensure!(
            !available_fuel_mcf.is_nan() && available_fuel_mcf >= 0.0,
            "{}\n`available_fuel_mcf` must be non-negative, got {}",
            format_dbg!(),
            available_fuel_mcf
        );
        self.state.available_fuel_mcf = available_fuel_mcf;
        Ok(())
    }

    /// Current configuration
    pub fn params(&self) -> &FuelCellParams {
        &self.params
    }

    /// Efficiency lookup built from `params.efficiency_table`
    pub fn efficiency_curve(&self) -> &EfficiencyCurve {
        &self.efficiency_curve
    }

    /// Whether the unit delivered power in the last step
    pub fn is_running(&self) -> bool {
        self.state.pwr_kw > 0.0
    }

    /// Rated max power before degradation \[kW\]
    pub fn pwr_max_original_kw(&self) -> f64 {
        self.params.pwr_max_kw
    }

    /// Degraded max power \[kW\]
    pub fn pwr_max_kw(&self) -> f64 {
        self.state.pwr_max_kw
    }

    /// Electrical output of the last step \[kW\]
    pub fn pwr_kw(&self) -> f64 {
        self.state.pwr_kw
    }

    /// Recovered heat of the last step \[kW\]
    pub fn pwr_thermal_kw(&self) -> f64 {
        self.state.pwr_thermal_kw
    }

    /// Fuel drawn in the last step \[MCF\]
    pub fn fuel_consumed_mcf(&self) -> f64 {
        self.state.fuel_consumed_mcf
    }

    /// Electrical efficiency of the last step \[%\]
    pub fn electrical_efficiency_percent(&self) -> f64 {
        self.state.electrical_efficiency_percent
    }

    /// Heat recovery of the last step \[%\]
    pub fn heat_recovery_percent(&self) -> f64 {
        self.state.heat_recovery_percent
    }

    /// Remaining fuel supply \[MCF\]
    pub fn available_fuel_mcf(&self) -> f64 {
        self.state.available_fuel_mcf
    }

    /// Replacements made so far
    pub fn total_replacements(&self) -> usize {
        self.state.replacements
    }

    /// Constraint that shaped the last step's output
    pub fn limit(&self) -> PowerLimit {
        self.state.limit
    }

    /// Electrical efficiency and heat recovery \[%\] at `percent_load` of
    /// original max power, clamped to the table
    pub fn efficiency_at(&self, percent_load: f64) -> anyhow::Result<(f64, f64)> {
        self.efficiency_curve
            .at(self.efficiency_curve.clamp_load(percent_load))
    }

    /// Fuel rate \[MCF/h\] when running at `percent_load` of original max power
    pub fn fuel_rate_mcf_per_hour_at(&self, percent_load: f64) -> anyhow::Result<f64> {
        let (eff, _) = self.efficiency_at(percent_load)?;
        let pwr_kw = percent_load.max(0.0) / 100.0 * self.params.pwr_max_kw;
        Ok(self.params.fuel_mcf(pwr_kw, eff, 1.0))
    }
}
