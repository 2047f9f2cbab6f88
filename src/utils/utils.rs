//! Helper functions

use crate::configuration::Configuration;
use crate::spline::SplinePath;

/// Checks if all values of the configuration are finite.
pub fn is_valid(q: &Configuration) -> bool {
    q.iter().all(|v| v.is_finite())
}

/// Print configuration values.
pub fn dump_configuration(q: &Configuration) {
    let mut row_str = String::new();
    for value in q.iter() {
        row_str.push_str(&format!("{:7.3} ", value));
    }
    println!("[{}]", row_str.trim_end());
}

/// Configurations of the path at `steps + 1` evenly spaced parameters, both ends included.
pub fn sample_path(path: &SplinePath, steps: usize) -> Vec<Configuration> {
    let steps = steps.max(1);
    (0..=steps).map(|i| path.eval(i as f64 / steps as f64)).collect()
}

/// Print the path sampled at `steps + 1` points.
pub fn dump_path(path: &SplinePath, steps: usize) {
    for q in sample_path(path, steps) {
        dump_configuration(&q);
    }
}

/// Largest absolute difference between two vectors of the same size.
pub fn max_abs_difference(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
