use super::*;

/// Electrical efficiency and heat recovery as functions of percent load,
/// built from [FuelCellParams::efficiency_table].  Loads outside the table are
/// clamped to its first and last rows.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EfficiencyCurve {
    electrical: Interp1D,
    heat_recovery: Interp1D,
}

impl EfficiencyCurve {
    pub fn from_table(rows: &[EfficiencyRow]) -> anyhow::Result<Self> {
        let percent: Vec<f64> = rows.iter().map(|row| row.percent_max).collect();
        let electrical = Interp1D::new(
            percent.clone(),
            rows.iter()
                .map(|row| row.electrical_efficiency_percent)
                .collect(),
        )
        .with_context(|| format!("{}\ninvalid electrical efficiency table", format_dbg!()))?;
        let heat_recovery = Interp1D::new(
            percent,
            rows.iter().map(|row| row.heat_recovery_percent).collect(),
        )
        .with_context(|| format!("{}\ninvalid heat recovery table", format_dbg!()))?;
        Ok(Self {
            electrical,
            heat_recovery,
        })
    }

    /// Lowest and highest percent load in the table
    pub fn domain(&self) -> (f64, f64) {
        self.electrical.domain()
    }

    /// `percent_load` restricted to [Self::domain]
    pub fn clamp_load(&self, percent_load: f64) -> f64 {
        let (lo, hi) = self.domain();
        percent_load.clamp(lo, hi)
    }

    pub fn electrical_efficiency_percent(&self, percent_load: f64) -> anyhow::Result<f64> {
        self.electrical.interpolate(percent_load)
    }

    pub fn heat_recovery_percent(&self, percent_load: f64) -> anyhow::Result<f64> {
        self.heat_recovery.interpolate(percent_load)
    }

    /// Electrical efficiency and heat recovery \[%\] at `percent_load`
    pub fn at(&self, percent_load: f64) -> anyhow::Result<(f64, f64)> {
        Ok((
            self.electrical_efficiency_percent(percent_load)?,
            self.heat_recovery_percent(percent_load)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_curve() -> EfficiencyCurve {
        EfficiencyCurve::from_table(&[
            EfficiencyRow::new(20., 35., 30.),
            EfficiencyRow::new(50., 45., 28.),
            EfficiencyRow::new(100., 40., 32.),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_rows_are_exact() {
        let curve = test_curve();
        assert_eq!(curve.at(50.).unwrap(), (45., 28.));
        assert_eq!(curve.at(100.).unwrap(), (40., 32.));
    }

    #[test]
    fn test_between_rows() {
        let curve = test_curve();
        assert!(almost_eq(
            curve.electrical_efficiency_percent(75.).unwrap(),
            42.5,
            None
        ));
        assert!(almost_eq(curve.heat_recovery_percent(35.).unwrap(), 29., None));
    }

    #[test]
    fn test_out_of_table_is_clamped() {
        let curve = test_curve();
        assert_eq!(curve.at(5.).unwrap(), (35., 30.));
        assert_eq!(curve.at(130.).unwrap(), (40., 32.));
        assert_eq!(curve.clamp_load(5.), 20.);
    }

    #[test]
    fn test_bad_table() {
        assert!(EfficiencyCurve::from_table(&[]).is_err());
        assert!(EfficiencyCurve::from_table(&[
            EfficiencyRow::new(50., 45., 28.),
            EfficiencyRow::new(20., 35., 30.),
        ])
        .is_err());
    }
}
