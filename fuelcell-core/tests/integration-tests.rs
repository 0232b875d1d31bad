use std::path::Path;

use fuelcell_core::prelude::*;

const REFERENCE_PARAMS: &str = include_str!("assets/fuel_cell_1mw.yaml");
const HOURS_PER_YEAR_USIZE: usize = 8_760;

fn assets_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/assets"))
}

#[test]
fn test_params_from_file() {
    let params = FuelCellParams::from_file(assets_dir().join("fuel_cell_1mw.yaml")).unwrap();
    assert_eq!(params, FuelCellParams::from_yaml(REFERENCE_PARAMS).unwrap());
    assert_eq!(params.ramp_up_kw_per_hour(), Some(600.));
    assert!(params.available_fuel_mcf.is_infinite());
}

#[test]
fn test_outage_scenario_from_assets() {
    let params = FuelCellParams::from_yaml(REFERENCE_PARAMS).unwrap();
    let fuel_cell = FuelCell::new(params).unwrap();
    let power_trace =
        PowerTrace::from_csv_file(assets_dir().join("power_trace_500kw.csv")).unwrap();
    let mut fc_sim = FuelCellSimulation::new(fuel_cell, power_trace, Some(1));
    fc_sim.walk().unwrap();

    let history = &fc_sim.fuel_cell.history;
    assert_eq!(history.len(), 10);
    assert_eq!(
        history.pwr_kw,
        vec![500., 500., 500., 500., 500., 0., 0., 500., 500., 500.]
    );
    assert_eq!(history.limit[5], PowerLimit::Outage);
    assert_eq!(history.limit[6], PowerLimit::Outage);
    assert_eq!(fc_sim.fuel_cell.state.restarts, 1);
    assert!(fc_sim.fuel_cell.available_fuel_mcf().is_infinite());
    assert_eq!(fc_sim.fuel_cell.state.energy_out_kwh, 4_000.);
}

#[test]
fn test_fuel_cell_file_round_trip() {
    // JSON has no representation for an unlimited fuel supply
    let params = FuelCellParams {
        available_fuel_mcf: 1.0e6,
        ..FuelCellParams::from_yaml(REFERENCE_PARAMS).unwrap()
    };
    let mut fc = FuelCell::new(params).unwrap().with_save_interval(Some(1));
    for _ in 0..4 {
        fc.solve_step(750.).unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    for ext in ["yaml", "json"] {
        let filepath = dir.path().join(format!("fuel_cell.{ext}"));
        fc.to_file(&filepath).unwrap();
        let restored = FuelCell::from_file(&filepath).unwrap();
        assert_eq!(fc, restored);
    }
}

#[test]
fn test_unlimited_fuel_yaml_round_trip() {
    let mut fc = FuelCell::new(FuelCellParams::from_yaml(REFERENCE_PARAMS).unwrap()).unwrap();
    fc.solve_step(750.).unwrap();
    let restored = FuelCell::from_yaml(fc.to_yaml().unwrap()).unwrap();
    assert!(restored.available_fuel_mcf().is_infinite());
    assert_eq!(fc, restored);
}

#[test]
fn test_unsupported_format() {
    let fc = FuelCell::default();
    assert!(fc.to_str("toml").is_err());
    assert!(FuelCellParams::from_str(REFERENCE_PARAMS, "csv").is_err());
}

#[test]
fn test_invalid_params_rejected_on_load() {
    let bad = REFERENCE_PARAMS.replace("pwr_min_kw: 100.0", "pwr_min_kw: 2000.0");
    assert!(FuelCellParams::from_yaml(bad).is_err());
}

#[test]
fn test_replacement_counts_over_multiple_years() {
    let params = FuelCellParams {
        degradation_kw_per_hour: 0.05,
        replacement_option: ReplacementOption::AtCapacity,
        replacement_percent: 80.,
        scheduled_shutdowns: vec![],
        ..FuelCellParams::from_yaml(REFERENCE_PARAMS).unwrap()
    };
    // 200 kW of capacity at 0.05 kW/h is lost every 4000 operating hours
    let hours = 3 * HOURS_PER_YEAR_USIZE;
    let mut fc_sim = FuelCellSimulation::new(
        FuelCell::new(params).unwrap(),
        PowerTrace::constant(1_000., hours),
        None,
    );
    fc_sim.walk().unwrap();
    assert_eq!(fc_sim.fuel_cell.total_replacements(), hours / 4_000);
    assert!(fc_sim.fuel_cell.pwr_max_kw() > 800.);
}
