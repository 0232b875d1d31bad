use super::*;

/// What happens to the unit while a scheduled outage is in effect
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ShutdownOption {
    /// unit is turned off and must restart (incurring the restart penalty) afterwards
    #[default]
    Shutdown,
    /// unit stays hot but produces nothing; no restart is needed afterwards
    Idle,
}

/// Unit replacement policy
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ReplacementOption {
    /// never replace automatically
    #[default]
    None,
    /// replace when degraded capacity falls to
    /// [replacement_percent](FuelCellParams::replacement_percent) of the original
    AtCapacity,
    /// replace at each hour listed in
    /// [replacement_schedule_hours](FuelCellParams::replacement_schedule_hours)
    OnSchedule,
}

/// Output profile while the unit is still within its startup window
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum StartupProfile {
    /// nothing is produced until startup completes
    #[default]
    Zero,
    /// output is capped at a share of degraded max power that grows linearly
    /// with hours since start
    Linear,
}

/// One row of the efficiency table
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Validate)]
pub struct EfficiencyRow {
    /// load as percent of original max power
    #[validate(range(min = 0.0, max = 100.0))]
    pub percent_max: f64,
    /// electrical efficiency at this load \[%\]
    #[validate(range(min = 0.0, max = 100.0))]
    pub electrical_efficiency_percent: f64,
    /// share of fuel energy recovered as useful heat at this load \[%\]
    #[validate(range(min = 0.0, max = 100.0))]
    pub heat_recovery_percent: f64,
}

impl EfficiencyRow {
    pub fn new(
        percent_max: f64,
        electrical_efficiency_percent: f64,
        heat_recovery_percent: f64,
    ) -> Self {
        Self {
            percent_max,
            electrical_efficiency_percent,
            heat_recovery_percent,
        }
    }
}

/// Outage window, repeated every simulated year
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Validate)]
pub struct ScheduledShutdown {
    /// hour of year at which the outage starts
    #[validate(range(min = 0.0, max = 8760.0))]
    pub start_hour: f64,
    #[validate(range(min = 0.0))]
    pub duration_hours: f64,
}

impl ScheduledShutdown {
    pub fn new(start_hour: f64, duration_hours: f64) -> Self {
        Self {
            start_hour,
            duration_hours,
        }
    }

    /// Hour of year at which the outage ends
    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.duration_hours
    }

    /// Whether `hour_of_year` falls inside this outage, including windows that
    /// wrap past the end of the year
    pub fn contains(&self, hour_of_year: f64) -> bool {
        let offset = (hour_of_year - self.start_hour).rem_euclid(HOURS_PER_YEAR);
        offset + HOUR_TOL < self.duration_hours
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Validate)]
/// Configuration of a single fuel cell unit
pub struct FuelCellParams {
    /// rated (original) max power \[kW\]
    #[validate(range(min = 0.0))]
    pub pwr_max_kw: f64,
    /// min turndown power while producing \[kW\]
    #[validate(range(min = 0.0))]
    pub pwr_min_kw: f64,
    /// time from start until the unit can produce \[h\]
    #[validate(range(min = 0.0))]
    pub startup_hours: f64,
    #[serde(default)]
    pub startup_profile: StartupProfile,
    /// max rate of increase of delivered power \[kW/min\], `None` for unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_up_kw_per_min: Option<f64>,
    /// max rate of decrease of delivered power \[kW/min\], `None` for unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_down_kw_per_min: Option<f64>,
    /// capacity lost per operating hour \[kW/h\]
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub degradation_kw_per_hour: f64,
    /// capacity lost per restart \[kW\]
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub degradation_restart_kw: f64,
    #[validate]
    #[serde(default)]
    pub scheduled_shutdowns: Vec<ScheduledShutdown>,
    #[serde(default)]
    pub shutdown_option: ShutdownOption,
    #[serde(default)]
    pub replacement_option: ReplacementOption,
    /// capacity threshold, as percent of original max power, that triggers a
    /// replacement under [ReplacementOption::AtCapacity]
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub replacement_percent: f64,
    /// hours of horizon at which the unit is replaced under [ReplacementOption::OnSchedule]
    #[serde(default)]
    pub replacement_schedule_hours: Vec<f64>,
    #[validate]
    pub efficiency_table: Vec<EfficiencyRow>,
    /// fuel lower heating value \[BTU/ft^3\]
    pub lhv_btu_per_ft3: f64,
    /// fuel higher heating value \[BTU/ft^3\]
    pub hhv_btu_per_ft3: f64,
    /// fuel available at start of simulation \[MCF\], may be infinite
    #[validate(range(min = 0.0))]
    pub available_fuel_mcf: f64,
    /// time step size \[h\]
    pub dt_hours: f64,
}

impl Default for FuelCellParams {
    fn default() -> Self {
        let file_contents = include_str!("fuel_cell.default.yaml");
        serde_yaml::from_str::<FuelCellParams>(file_contents).unwrap()
    }
}

impl SerdeAPI for FuelCellParams {
    fn init(&mut self) -> anyhow::Result<()> {
        self.validate_all()
    }
}

impl FuelCellParams {
    /// Field-level checks via [validator] followed by cross-field checks.
    /// Field-level failures can be recovered with
    /// `err.downcast::<validator::ValidationErrors>()`.
    pub fn validate_all(&self) -> anyhow::Result<()> {
        match self.validate() {
            Ok(_) => (),
            Err(e) => bail!(e),
        };

        let scalars = [
            ("pwr_max_kw", self.pwr_max_kw),
            ("pwr_min_kw", self.pwr_min_kw),
            ("startup_hours", self.startup_hours),
            ("degradation_kw_per_hour", self.degradation_kw_per_hour),
            ("degradation_restart_kw", self.degradation_restart_kw),
            ("replacement_percent", self.replacement_percent),
            ("lhv_btu_per_ft3", self.lhv_btu_per_ft3),
            ("hhv_btu_per_ft3", self.hhv_btu_per_ft3),
            ("dt_hours", self.dt_hours),
        ];
        for (name, value) in scalars {
            ensure!(
                value.is_finite(),
                "{}\n`{}` must be finite, got {}",
                format_dbg!(),
                name,
                value
            );
        }
        ensure!(
            !self.available_fuel_mcf.is_nan() && self.available_fuel_mcf >= 0.0,
            "{}\n`available_fuel_mcf` must be non-negative, got {}",
            format_dbg!(),
            self.available_fuel_mcf
        );
        ensure!(
            self.pwr_max_kw >= self.pwr_min_kw,
            "{}\n`pwr_max_kw` ({}) must be greater than or equal to `pwr_min_kw` ({})",
            format_dbg!(self.pwr_max_kw >= self.pwr_min_kw),
            self.pwr_max_kw,
            self.pwr_min_kw
        );
        ensure!(
            self.dt_hours > 0.0,
            "{}\n`dt_hours` must be greater than 0, got {}",
            format_dbg!(self.dt_hours > 0.0),
            self.dt_hours
        );
        for (name, rate) in [
            ("ramp_up_kw_per_min", self.ramp_up_kw_per_min),
            ("ramp_down_kw_per_min", self.ramp_down_kw_per_min),
        ] {
            if let Some(rate) = rate {
                ensure!(
                    rate.is_finite() && rate >= 0.0,
                    "{}\n`{}` must be finite and non-negative, got {}",
                    format_dbg!(),
                    name,
                    rate
                );
            }
        }
        ensure!(
            self.lhv_btu_per_ft3 > 0.0 && self.hhv_btu_per_ft3 > 0.0,
            "{}\nheating values must be positive",
            format_dbg!()
        );
        ensure!(
            self.lhv_btu_per_ft3 <= self.hhv_btu_per_ft3,
            "{}\n`lhv_btu_per_ft3` ({}) cannot exceed `hhv_btu_per_ft3` ({})",
            format_dbg!(),
            self.lhv_btu_per_ft3,
            self.hhv_btu_per_ft3
        );
        if self.replacement_option == ReplacementOption::AtCapacity {
            ensure!(
                self.replacement_percent > 0.0 && self.replacement_percent < 100.0,
                "{}\n`replacement_percent` must be between 0 and 100 (exclusive) for `AtCapacity` replacement, got {}",
                format_dbg!(),
                self.replacement_percent
            );
            // a unit degraded below turndown stops running and can no longer
            // reach a lower threshold
            let threshold_kw = self.replacement_percent / 100.0 * self.pwr_max_kw;
            ensure!(
                threshold_kw >= self.pwr_min_kw,
                "{}
`replacement_percent` ({}) puts the replacement threshold ({} kW) below `pwr_min_kw` ({})",
                format_dbg!(threshold_kw >= self.pwr_min_kw),
                self.replacement_percent,
                threshold_kw,
                self.pwr_min_kw
            );
        }
        self.check_replacement_schedule()?;
        self.check_scheduled_shutdowns()?;
        self.check_efficiency_table()?;
        Ok(())
    }

    fn check_replacement_schedule(&self) -> anyhow::Result<()> {
        ensure!(
            self.replacement_schedule_hours
                .iter()
                .all(|h| h.is_finite() && *h >= 0.0),
            "{}\n`replacement_schedule_hours` must be finite and non-negative: {:?}",
            format_dbg!(),
            self.replacement_schedule_hours
        );
        ensure!(
            is_sorted(&self.replacement_schedule_hours),
            "{}\n`replacement_schedule_hours` must be sorted in ascending order: {:?}",
            format_dbg!(),
            self.replacement_schedule_hours
        );
        Ok(())
    }

    fn check_scheduled_shutdowns(&self) -> anyhow::Result<()> {
        for shutdown in &self.scheduled_shutdowns {
            ensure!(
                shutdown.start_hour.is_finite() && shutdown.duration_hours.is_finite(),
                "{}\nscheduled shutdown must be finite: {:?}",
                format_dbg!(),
                shutdown
            );
        }
        for (earlier, later) in self.scheduled_shutdowns.iter().tuple_windows() {
            ensure!(
                earlier.start_hour <= later.start_hour,
                "{}\nscheduled shutdowns must be ordered by start hour: {:?} comes before {:?}",
                format_dbg!(),
                earlier,
                later
            );
            ensure!(
                earlier.end_hour() <= later.start_hour,
                "{}\nscheduled shutdowns overlap: {:?} and {:?}",
                format_dbg!(),
                earlier,
                later
            );
        }
        if let [first, .., last] = self.scheduled_shutdowns.as_slice() {
            // windows repeat every year, so the last one must end before the
            // first one comes around again
            ensure!(
                last.end_hour() - HOURS_PER_YEAR <= first.start_hour,
                "{}\nscheduled shutdowns overlap across year end: {:?} and {:?}",
                format_dbg!(),
                last,
                first
            );
        }
        Ok(())
    }

    fn check_efficiency_table(&self) -> anyhow::Result<()> {
        ensure!(
            !self.efficiency_table.is_empty(),
            "{}\n`efficiency_table` cannot be empty",
            format_dbg!()
        );
        ensure!(
            self.efficiency_table
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.percent_max < b.percent_max),
            "{}\n`efficiency_table` must be strictly increasing in `percent_max`: {:?}",
            format_dbg!(),
            self.efficiency_table
                .iter()
                .map(|row| row.percent_max)
                .collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Max ramp-up rate \[kW/h\], `None` when unlimited
    pub fn ramp_up_kw_per_hour(&self) -> Option<f64> {
        self.ramp_up_kw_per_min.map(|r| r * MINUTES_PER_HOUR)
    }

    /// Max ramp-down rate \[kW/h\], `None` when unlimited
    pub fn ramp_down_kw_per_hour(&self) -> Option<f64> {
        self.ramp_down_kw_per_min.map(|r| r * MINUTES_PER_HOUR)
    }

    /// Fuel \[MCF\] needed to deliver `pwr_kw` for `dt_hours` at electrical
    /// efficiency `eff_percent`, on a higher heating value basis
    pub fn fuel_mcf(&self, pwr_kw: f64, eff_percent: f64, dt_hours: f64) -> f64 {
        if pwr_kw <= 0.0 || eff_percent <= 0.0 {
            return 0.0;
        }
        pwr_kw * dt_hours * BTU_PER_KWH / (eff_percent / 100.0) / self.hhv_btu_per_ft3 / FT3_PER_MCF
    }
}
