//! Spline path: a polynomial curve in the tangent space around a base configuration.
//!
//! The path is `p(t) = integrate(base, Pᵀ b(t))` for `t` in `[0, 1]`, where `b(t)` are the basis
//! functions and `P` the coefficient matrix (one row per basis function, one column per degree
//! of freedom).

use std::sync::Arc;

use nalgebra::DMatrix;

use crate::basis::PolynomeBasis;
use crate::configuration::{Configuration, ConfigurationSpace, TangentVector};

#[derive(Debug, Clone)]
pub struct SplinePath {
    basis: PolynomeBasis,
    degree: usize,
    space: Arc<ConfigurationSpace>,
    base: Configuration,
    parameters: DMatrix<f64>,
}

impl SplinePath {
    /// Path with the given coefficients. `parameters` must have `degree + 1` rows and as many
    /// columns as the space has degrees of freedom.
    pub(crate) fn new(
        basis: PolynomeBasis,
        degree: usize,
        space: Arc<ConfigurationSpace>,
        base: Configuration,
        parameters: DMatrix<f64>,
    ) -> Self {
        debug_assert_eq!(parameters.nrows(), degree + 1);
        debug_assert_eq!(parameters.ncols(), space.number_dof());
        SplinePath { basis, degree, space, base, parameters }
    }

    /// Configuration at parameter `t`, clamped to `[0, 1]`.
    pub fn eval(&self, t: f64) -> Configuration {
        let t = t.clamp(0.0, 1.0);
        let velocity = self.tangent(t, 0);
        self.space.integrate(&self.base, &velocity)
    }

    /// Derivative of the given order (1 for velocity) at parameter `t`, in the tangent space.
    pub fn derivative(&self, t: f64, order: usize) -> TangentVector {
        self.tangent(t.clamp(0.0, 1.0), order)
    }

    pub fn initial(&self) -> Configuration {
        self.eval(0.0)
    }

    pub fn end(&self) -> Configuration {
        self.eval(1.0)
    }

    /// `∫₀¹ ‖p⁽ⁿ⁾(t)‖² dt`, the usual smoothness cost of the path for derivative order n.
    pub fn squared_norm_integral(&self, order: usize) -> f64 {
        let gram = self.basis.gram_matrix(self.degree, order);
        (self.parameters.transpose() * gram * &self.parameters).trace()
    }

    pub fn basis(&self) -> PolynomeBasis {
        self.basis
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Configuration the coefficients are expressed around.
    pub fn base(&self) -> &Configuration {
        &self.base
    }

    pub fn parameters(&self) -> &DMatrix<f64> {
        &self.parameters
    }

    pub fn configuration_space(&self) -> &ConfigurationSpace {
        &self.space
    }

    fn tangent(&self, t: f64, order: usize) -> TangentVector {
        let row = self.basis.derivative_row(self.degree, order, t);
        (row * &self.parameters).transpose()
    }
}
