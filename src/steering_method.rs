//! Steering method building spline paths between two configurations.
//!
//! The path must go through both configurations and may have prescribed derivatives at its ends.
//! Every boundary condition is one linear equation on the coefficients of the spline, the same
//! for all degrees of freedom, so the whole problem is a single linear system
//! `coefficients * P = rhs` solved with a singular value decomposition. This also covers
//! systems that are under-determined (fewer conditions than coefficients) or rank deficient.

use std::sync::Arc;

use nalgebra::{DMatrix, RowDVector};
use tracing::debug;

use crate::basis::PolynomeBasis;
use crate::configuration::{Configuration, ConfigurationSpace};
use crate::error::SteeringError;
use crate::spline::SplinePath;

/// Singular values below this threshold are treated as zero when solving.
const SINGULAR_VALUE_EPSILON: f64 = 1e-10;

pub struct SplineSteering {
    basis: PolynomeBasis,
    /// Degree of the polynomial.
    order: usize,
    space: Arc<ConfigurationSpace>,
}

impl SplineSteering {
    pub fn new(space: Arc<ConfigurationSpace>, basis: PolynomeBasis, order: usize) -> Self {
        SplineSteering { basis, order, space }
    }

    pub fn basis(&self) -> PolynomeBasis {
        self.basis
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of derivative conditions the spline can satisfy on each side in addition to
    /// the position.
    pub fn derivative_constraints_per_side(&self) -> usize {
        self.order.saturating_sub(1) / 2
    }

    /// Smoothest path between `q1` and `q2`: derivatives of orders `1..=N` are zero at both ends,
    /// with N from [`Self::derivative_constraints_per_side`].
    pub fn steer_default(&self, q1: &Configuration, q2: &Configuration) -> Result<SplinePath, SteeringError> {
        let n = self.derivative_constraints_per_side();
        let orders: Vec<usize> = (1..=n).collect();
        let zeros = DMatrix::<f64>::zeros(n, self.space.number_dof());
        self.steer(q1, &orders, &zeros, q2, &orders, &zeros)
    }

    /// Path from `q1` to `q2`. Row `i` of `derivatives1` is the derivative of order `orders1[i]`
    /// required at `q1`, likewise at `q2`. Derivatives are tangent vectors, one column per
    /// degree of freedom.
    pub fn steer(
        &self,
        q1: &Configuration,
        orders1: &[usize],
        derivatives1: &DMatrix<f64>,
        q2: &Configuration,
        orders2: &[usize],
        derivatives2: &DMatrix<f64>,
    ) -> Result<SplinePath, SteeringError> {
        let nv = self.space.number_dof();
        check_size("q1", self.space.config_size(), q1.len())?;
        check_size("q2", self.space.config_size(), q2.len())?;
        check_size("rows of derivatives1", orders1.len(), derivatives1.nrows())?;
        check_size("rows of derivatives2", orders2.len(), derivatives2.nrows())?;
        check_size("columns of derivatives1", nv, derivatives1.ncols())?;
        check_size("columns of derivatives2", nv, derivatives2.ncols())?;

        let nb_constraints = 2 + orders1.len() + orders2.len();
        let mut coefficients = DMatrix::<f64>::zeros(nb_constraints, self.order + 1);
        let mut rhs = DMatrix::<f64>::zeros(nb_constraints, nv);

        // Start: value is the zero offset from q1, then the requested derivatives.
        coefficients.set_row(0, &self.row(0, 0.0));
        for (i, order) in orders1.iter().enumerate() {
            coefficients.set_row(1 + i, &self.row(*order, 0.0));
        }
        if !orders1.is_empty() {
            rhs.rows_mut(1, orders1.len()).copy_from(derivatives1);
        }

        // End: value is the offset from q1 to q2.
        let row = 1 + orders1.len();
        coefficients.set_row(row, &self.row(0, 1.0));
        rhs.set_row(row, &self.space.difference(q2, q1).transpose());
        for (i, order) in orders2.iter().enumerate() {
            coefficients.set_row(row + 1 + i, &self.row(*order, 1.0));
        }
        if !orders2.is_empty() {
            rhs.rows_mut(row + 1, orders2.len()).copy_from(derivatives2);
        }

        let svd = coefficients.svd(true, true);
        let parameters = svd
            .solve(&rhs, SINGULAR_VALUE_EPSILON)
            .map_err(|e| SteeringError::Solve(e.to_string()))?;
        debug!("spline of degree {} solved with rank {}", self.order, svd.rank(SINGULAR_VALUE_EPSILON));

        Ok(SplinePath::new(self.basis, self.order, self.space.clone(), q1.clone(), parameters))
    }

    fn row(&self, order: usize, t: f64) -> RowDVector<f64> {
        self.basis.derivative_row(self.order, order, t)
    }
}

fn check_size(what: &'static str, expected: usize, found: usize) -> Result<(), SteeringError> {
    if expected == found {
        Ok(())
    } else {
        Err(SteeringError::DimensionMismatch { what, expected, found })
    }
}
