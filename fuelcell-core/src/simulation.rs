//! Drives a [FuelCell] through a trace of requested power.

use rayon::prelude::*;

use crate::fuel_cell::FuelCell;
use crate::imports::*;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, SerdeAPI)]
/// Requested electrical power, one entry per time step of the unit's `dt_hours`
pub struct PowerTrace {
    pub pwr_req_kw: Vec<f64>,
}

impl PowerTrace {
    pub fn new(pwr_req_kw: Vec<f64>) -> Self {
        Self { pwr_req_kw }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Trace that requests `pwr_kw` for `len` steps
    pub fn constant(pwr_kw: f64, len: usize) -> Self {
        Self::new(vec![pwr_kw; len])
    }

    pub fn len(&self) -> usize {
        self.pwr_req_kw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, pt_element: PowerTraceElement) {
        self.pwr_req_kw.push(pt_element.pwr_req_kw);
    }

    pub fn trim(&mut self, start_idx: Option<usize>, end_idx: Option<usize>) -> anyhow::Result<()> {
        let start_idx = start_idx.unwrap_or(0);
        let end_idx = end_idx.unwrap_or(self.len());
        ensure!(end_idx <= self.len(), format_dbg!(end_idx <= self.len()));
        ensure!(start_idx <= end_idx, format_dbg!(start_idx <= end_idx));
        self.pwr_req_kw = self.pwr_req_kw[start_idx..end_idx].to_vec();
        Ok(())
    }

    /// Load trace from csv file with a `pwr_req_kw` column
    pub fn from_csv_file<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let file = File::open(filepath)
            .with_context(|| format!("{}\ncould not open {filepath:?}", format_dbg!()))?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: std::io::Read>(rdr: R) -> anyhow::Result<Self> {
        let mut pt = Self::empty();
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(rdr);
        for result in rdr.deserialize() {
            let pt_elem: PowerTraceElement = result?;
            pt.push(pt_elem);
        }
        if pt.is_empty() {
            bail!("Invalid PowerTrace file; PowerTrace is empty")
        } else {
            Ok(pt)
        }
    }
}

/// Element of [PowerTrace].  Used for vec-like operations.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq)]
pub struct PowerTraceElement {
    /// requested electrical power \[kW\]
    pub pwr_req_kw: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// Struct for simulating operation of a standalone fuel cell unit
pub struct FuelCellSimulation {
    pub fuel_cell: FuelCell,
    pub power_trace: PowerTrace,
    #[serde(default)]
    pub i: usize,
}

impl SerdeAPI for FuelCellSimulation {
    fn init(&mut self) -> anyhow::Result<()> {
        self.fuel_cell.init()?;
        ensure!(
            self.i <= self.power_trace.len(),
            format_dbg!(self.i <= self.power_trace.len())
        );
        Ok(())
    }
}

impl Default for FuelCellSimulation {
    fn default() -> Self {
        let fuel_cell = FuelCell::default();
        let pwr_max_kw = fuel_cell.pwr_max_original_kw();
        let pwr_ramp: Vec<f64> = Vec::linspace(0., pwr_max_kw, 24);
        let mut pwr_req_kw = pwr_ramp.clone();
        pwr_req_kw.append(&mut vec![pwr_max_kw; 48]);
        pwr_req_kw.append(&mut pwr_ramp.iter().rev().copied().collect());
        Self::new(fuel_cell, PowerTrace::new(pwr_req_kw), None)
    }
}

impl FuelCellSimulation {
    pub fn new(fuel_cell: FuelCell, power_trace: PowerTrace, save_interval: Option<usize>) -> Self {
        let mut fc_sim = Self {
            fuel_cell,
            power_trace,
            i: 0,
        };
        fc_sim.set_save_interval(save_interval);
        fc_sim
    }

    pub fn set_save_interval(&mut self, save_interval: Option<usize>) {
        self.fuel_cell.save_interval = save_interval;
    }

    pub fn get_save_interval(&self) -> Option<usize> {
        self.fuel_cell.save_interval
    }

    /// Trims off any portion of the trace that failed to run
    pub fn trim_failed_steps(&mut self) -> anyhow::Result<()> {
        if self.i == 0 {
            bail!("`walk` method has not completed any time step.")
        }
        self.power_trace.trim(None, Some(self.i))?;
        Ok(())
    }

    pub fn step(&mut self) -> anyhow::Result<()> {
        self.fuel_cell
            .solve_step(self.power_trace.pwr_req_kw[self.i])
            .map_err(|err| err.context(format!("time step: {}", self.i)))?;
        self.i += 1;
        Ok(())
    }

    /// Iterates `step` through the rest of the trace.
    pub fn walk(&mut self) -> anyhow::Result<()> {
        while self.i < self.power_trace.len() {
            self.step()?
        }
        ensure!(self.i == self.power_trace.len());
        log::debug!(
            "{}\nwalked {} steps, {} kWh delivered, {} MCF fuel",
            format_dbg!(),
            self.i,
            self.fuel_cell.state.energy_out_kwh,
            self.fuel_cell.state.fuel_consumed_total_mcf
        );
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, SerdeAPI)]
/// Independent fuel cell simulations, e.g. a fleet of units or a parameter sweep
pub struct FuelCellSimulationVec(pub Vec<FuelCellSimulation>);

impl FuelCellSimulationVec {
    /// Calls `walk` for each simulation in vec.
    pub fn walk(&mut self, parallelize: bool) -> anyhow::Result<()> {
        if parallelize {
            self.0
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(i, fc_sim)| {
                    fc_sim
                        .walk()
                        .map_err(|err| err.context(format!("fc_sim idx:{}", i)))
                })?;
        } else {
            self.0
                .iter_mut()
                .enumerate()
                .try_for_each(|(i, fc_sim)| {
                    fc_sim
                        .walk()
                        .map_err(|err| err.context(format!("fc_sim idx:{}", i)))
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel_cell::FuelCellParams;

    #[test]
    fn test_fc_sim() {
        let mut fc_sim = FuelCellSimulation::default();
        fc_sim.set_save_interval(Some(1));
        fc_sim.walk().unwrap();
        assert_eq!(fc_sim.i, fc_sim.power_trace.len());
        assert_eq!(fc_sim.fuel_cell.history.len(), fc_sim.power_trace.len());
        assert!(fc_sim.fuel_cell.state.energy_out_kwh > 0.);
        assert!(fc_sim.fuel_cell.state.fuel_consumed_total_mcf > 0.);
    }

    #[test]
    fn test_walk_resumes() {
        let mut whole = FuelCellSimulation::default();
        whole.walk().unwrap();

        let mut split = FuelCellSimulation::default();
        for _ in 0..10 {
            split.step().unwrap();
        }
        split.walk().unwrap();
        assert_eq!(whole, split);
    }

    #[test]
    fn test_fc_sim_vec_par() {
        let mut fc_sim_vec = FuelCellSimulationVec(vec![FuelCellSimulation::default(); 3]);
        fc_sim_vec.walk(true).unwrap();
        let mut serial = FuelCellSimulationVec(vec![FuelCellSimulation::default(); 3]);
        serial.walk(false).unwrap();
        assert_eq!(fc_sim_vec, serial);
    }

    #[test]
    fn test_fc_sim_vec_sweep() {
        let sims = [0., 1., 5.]
            .iter()
            .map(|startup_hours| {
                let fuel_cell = FuelCell::new(FuelCellParams {
                    startup_hours: *startup_hours,
                    ..Default::default()
                })
                .unwrap();
                FuelCellSimulation::new(fuel_cell, PowerTrace::constant(80., 48), None)
            })
            .collect();
        let mut fc_sim_vec = FuelCellSimulationVec(sims);
        fc_sim_vec.walk(true).unwrap();
        let energy: Vec<f64> = fc_sim_vec
            .0
            .iter()
            .map(|sim| sim.fuel_cell.state.energy_out_kwh)
            .collect();
        assert!(energy[0] > energy[1]);
        assert!(energy[1] > energy[2]);
    }

    #[test]
    fn test_power_trace_from_csv() {
        let csv = "pwr_req_kw\n10.0\n55.5\n0.0\n";
        let pt = PowerTrace::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(pt.pwr_req_kw, vec![10., 55.5, 0.]);
        assert!(PowerTrace::from_csv_reader("pwr_req_kw\n".as_bytes()).is_err());
    }

    #[test]
    fn test_power_trace_trim() {
        let mut pt = PowerTrace::new(vec![1., 2., 3., 4.]);
        pt.trim(Some(1), Some(3)).unwrap();
        assert_eq!(pt.pwr_req_kw, vec![2., 3.]);
        assert!(pt.trim(None, Some(5)).is_err());
    }

    #[test]
    fn test_trim_failed_steps() {
        let mut fc_sim = FuelCellSimulation::default();
        assert!(fc_sim.trim_failed_steps().is_err());
        for _ in 0..5 {
            fc_sim.step().unwrap();
        }
        fc_sim.trim_failed_steps().unwrap();
        assert_eq!(fc_sim.power_trace.len(), 5);
    }

    #[test]
    fn test_fc_sim_serialize_yaml() {
        let mut fc_sim = FuelCellSimulation::default();
        fc_sim.walk().unwrap();
        let yaml = fc_sim.to_yaml().unwrap();
        let new_sim = FuelCellSimulation::from_yaml(yaml).unwrap();
        assert_eq!(fc_sim, new_sim);
    }
}
