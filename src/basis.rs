//! Polynomial basis functions of spline paths.
//!
//! Both supported families are expressed through their coefficients in the power basis
//! `1, t, t², ...`, so derivatives and integrals are computed the same way for all of them.

use nalgebra::{DMatrix, DVector, RowDVector};

/// Family of basis functions of a polynomial of the given degree on `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolynomeBasis {
    /// `b_k(t) = t^k`
    CanonicalPolynome,
    /// `b_k(t) = C(d, k) t^k (1 - t)^(d - k)`
    #[default]
    Bernstein,
}

/// `j (j - 1) ... (j - n + 1)`, the factor produced by differentiating `t^j` n times.
fn falling_factorial(j: usize, n: usize) -> f64 {
    (0..n).map(|i| (j - i) as f64).product()
}

fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

impl PolynomeBasis {
    /// Square matrix `C` of size `degree + 1` with `b_k(t) = sum_j C[(k, j)] t^j`.
    pub fn power_coefficients(&self, degree: usize) -> DMatrix<f64> {
        let n = degree + 1;
        match self {
            PolynomeBasis::CanonicalPolynome => DMatrix::identity(n, n),
            PolynomeBasis::Bernstein => DMatrix::from_fn(n, n, |k, j| {
                if j < k {
                    0.0
                } else {
                    let sign = if (j - k) % 2 == 0 { 1.0 } else { -1.0 };
                    binomial(degree, k) * binomial(degree - k, j - k) * sign
                }
            }),
        }
    }

    /// Values of the basis functions at `t`.
    pub fn basis_function(&self, degree: usize, t: f64) -> RowDVector<f64> {
        self.derivative_row(degree, 0, t)
    }

    /// Derivatives of the given order of all basis functions at `t`. Order 0 are the values.
    /// Orders above the degree give a zero row.
    pub fn derivative_row(&self, degree: usize, order: usize, t: f64) -> RowDVector<f64> {
        let powers = DVector::from_fn(degree + 1, |j, _| {
            if j < order {
                0.0
            } else {
                falling_factorial(j, order) * t.powi((j - order) as i32)
            }
        });
        (self.power_coefficients(degree) * powers).transpose()
    }

    /// Gram matrix `G[(k, l)] = ∫₀¹ b_k⁽ⁿ⁾(t) b_l⁽ⁿ⁾(t) dt` for derivative order n.
    pub fn gram_matrix(&self, degree: usize, order: usize) -> DMatrix<f64> {
        let n = degree + 1;
        let powers = DMatrix::from_fn(n, n, |a, b| {
            if a < order || b < order {
                0.0
            } else {
                falling_factorial(a, order) * falling_factorial(b, order) / (a + b + 1 - 2 * order) as f64
            }
        });
        let coefficients = self.power_coefficients(degree);
        &coefficients * powers * coefficients.transpose()
    }
}
