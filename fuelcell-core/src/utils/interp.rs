//! 1-dimensional linear interpolation over a sorted, non-repeating grid.
//!
//! Points outside of the grid bounds are clamped to the boundary value.  A
//! grid with a single point is a constant function.

use crate::imports::*;

use std::marker::PhantomData; // used as a private field to disallow direct instantiation

/// # Example:
/// ```
/// use fuelcell_core::utils::interp::*;
/// // f(x) = 0.2 * x + 0.2
/// let interp = Interp1D::new(
///     vec![0., 1., 2.],
///     vec![0.2, 0.4, 0.6],
/// )
/// .unwrap();
/// assert_eq!(interp.interpolate(1.0).unwrap(), 0.4);
/// assert_eq!(interp.interpolate(-1.0).unwrap(), 0.2); // clamped below grid
/// assert_eq!(interp.interpolate(3.0).unwrap(), 0.6); // clamped above grid
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Interp1D {
    x: Vec<f64>,
    f_x: Vec<f64>,
    #[serde(skip)]
    _phantom: PhantomData<()>, // phantom private field to prevent direct instantiation in other modules
}

impl Interp1D {
    /// Create and validate 1-D interpolator
    pub fn new(x: Vec<f64>, f_x: Vec<f64>) -> anyhow::Result<Self> {
        let interp = Self {
            x,
            f_x,
            _phantom: PhantomData,
        };
        interp.validate()?;
        Ok(interp)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.x.is_empty(), "Supplied x-coordinates cannot be empty");
        ensure!(
            self.x.len() == self.f_x.len(),
            "Supplied grid and values are not compatible shapes: {} x-coordinates, {} values",
            self.x.len(),
            self.f_x.len()
        );
        ensure!(
            self.x.iter().chain(self.f_x.iter()).all(|v| v.is_finite()),
            "Supplied grid and values must be finite: x = {:?}, f_x = {:?}",
            self.x,
            self.f_x
        );
        ensure!(
            self.x.windows(2).all(|w| w[0] < w[1]),
            "Supplied x-coordinates must be sorted and non-repeating: {:?}",
            self.x
        );
        Ok(())
    }

    /// Lower and upper bound of the grid
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn f_x(&self) -> &[f64] {
        &self.f_x
    }

    /// Interpolate at `point`, clamped to the grid bounds
    pub fn interpolate(&self, point: f64) -> anyhow::Result<f64> {
        ensure!(!point.is_nan(), "{}\ncannot interpolate at NaN", format_dbg!());
        let (x_min, x_max) = self.domain();
        Ok(self.linear(point.clamp(x_min, x_max)))
    }

    /// Linear interpolation for a point known to be within the grid bounds
    fn linear(&self, point: f64) -> f64 {
        // exact breakpoint hits return the tabulated value untouched
        if let Some(i) = self.x.iter().position(|&x_val| x_val == point) {
            return self.f_x[i];
        }
        let upper = self.x.partition_point(|&x_val| x_val < point);
        let lower = upper - 1;
        let diff = (point - self.x[lower]) / (self.x[upper] - self.x[lower]);
        self.f_x[lower] * (1.0 - diff) + self.f_x[upper] * diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_interp() -> Interp1D {
        Interp1D::new(vec![0., 1., 2., 3., 4.], vec![0.2, 0.4, 0.6, 0.8, 1.0]).unwrap()
    }

    #[test]
    fn test_invalid_args() {
        assert!(Interp1D::new(vec![], vec![]).is_err());
        assert!(Interp1D::new(vec![0., 1.], vec![0.]).is_err());
        assert!(Interp1D::new(vec![1., 0.], vec![0., 1.]).is_err());
        assert!(Interp1D::new(vec![0., 0.], vec![0., 1.]).is_err());
        assert!(Interp1D::new(vec![0., f64::NAN], vec![0., 1.]).is_err());
    }

    #[test]
    fn test_linear() {
        let interp = test_interp();
        assert_eq!(interp.interpolate(3.00).unwrap(), 0.8);
        assert!(almost_eq(interp.interpolate(3.75).unwrap(), 0.95, None));
        assert_eq!(interp.interpolate(4.00).unwrap(), 1.0);
        assert_eq!(interp.interpolate(0.00).unwrap(), 0.2);
        assert!(interp.interpolate(f64::NAN).is_err());
    }

    #[test]
    fn test_breakpoints_are_exact() {
        let interp = Interp1D::new(
            vec![10., 25., 50., 100.],
            vec![0.31, 0.427, 0.4499, 0.4123],
        )
        .unwrap();
        for (x, f_x) in interp.x().iter().zip(interp.f_x()) {
            assert_eq!(interp.interpolate(*x).unwrap(), *f_x);
        }
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let interp = test_interp();
        let first = interp.interpolate(2.345).unwrap();
        for _ in 0..100 {
            assert_eq!(interp.interpolate(2.345).unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_single_point_is_constant() {
        let interp = Interp1D::new(vec![50.], vec![0.45]).unwrap();
        assert_eq!(interp.interpolate(0.).unwrap(), 0.45);
        assert_eq!(interp.interpolate(50.).unwrap(), 0.45);
        assert_eq!(interp.interpolate(150.).unwrap(), 0.45);
    }

    #[test]
    fn test_out_of_bounds_clamps() {
        let interp = test_interp();
        assert_eq!(interp.interpolate(-1.).unwrap(), 0.2);
        assert_eq!(interp.interpolate(5.).unwrap(), 1.0);
    }
}
