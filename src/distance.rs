//! Weighed distance between configurations.

use std::sync::Arc;

use crate::configuration::{Configuration, ConfigurationSpace};

/// Distance between configurations where the displacement of each joint is scaled by a positive
/// weight: `sqrt(sum_i w_i² ‖v_i‖²)` with `v_i` the joint part of `difference(q2, q1)`.
///
/// Joints moving large parts of the robot usually get a larger weight, so that the distance
/// better reflects how far the robot body travels.
#[derive(Debug, Clone)]
pub struct WeighedDistance {
    space: Arc<ConfigurationSpace>,
    weights: Vec<f64>,
}

impl WeighedDistance {
    /// Distance with all weights equal to 1.
    pub fn new(space: Arc<ConfigurationSpace>) -> Self {
        let weights = vec![1.0; space.joint_kinds().len()];
        WeighedDistance { space, weights }
    }

    /// Distance with one weight per joint. None if the number of weights does not match.
    pub fn with_weights(space: Arc<ConfigurationSpace>, weights: Vec<f64>) -> Option<Self> {
        if weights.len() != space.joint_kinds().len() {
            return None;
        }
        Some(WeighedDistance { space, weights })
    }

    /// Weight of the joint at the given rank in the joint vector.
    pub fn weight(&self, rank: usize) -> Option<f64> {
        self.weights.get(rank).copied()
    }

    pub fn set_weight(&mut self, rank: usize, weight: f64) {
        if let Some(w) = self.weights.get_mut(rank) {
            *w = weight;
        }
    }

    /// Number of weights, equal to the number of joints.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn distance(&self, q1: &Configuration, q2: &Configuration) -> f64 {
        let v = self.space.difference(q2, q1);
        self.space
            .joint_ranges()
            .iter()
            .zip(&self.weights)
            .map(|(range, w)| w * w * v.rows(range.idx_v, range.nv).norm_squared())
            .sum::<f64>()
            .sqrt()
    }
}
