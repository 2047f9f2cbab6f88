//! Rust implementation of two building blocks of sampling-based motion planners: checking that a
//! robot configuration is collision free, and connecting two configurations with a smooth spline.
//!
//! # Features
//!
//! - Collision validation over an ordered list of collision pairs. Self-collision pairs come from
//!   the robot model, obstacles can be added and removed per joint. The first colliding pair is
//!   reported together with contact details if requested.
//! - Pairs of bodies that cannot move relative to each other can be disabled, and pairs whose
//!   relative motion depends on some parameter can be checked on demand only, from a relative
//!   motion matrix.
//! - Spline steering method with canonical polynomial or Bernstein basis of any degree. Position
//!   and any derivatives can be prescribed at both ends. The constraint system is solved with SVD,
//!   so it never fails on rank deficient requests.
//! - Non-Euclidean joints (unbounded rotation) are supported through the generalized difference
//!   of configurations.
//! - Planner settings can be read from YAML.
//!
//! ## Examples
//!
//! - **main.rs**: collision validation of a small arm near an obstacle and steering between two
//!   configurations.

pub mod configuration;

pub mod basis;

pub mod spline;

pub mod steering_method;

pub mod distance;

pub mod relative_motion;

pub mod error;

#[cfg(feature = "collisions")]
pub mod collision_object;

#[cfg(feature = "collisions")]
pub mod device;

#[cfg(feature = "collisions")]
pub mod collision_validation;

#[cfg(all(feature = "allow_filesystem", feature = "collisions"))]
pub mod config_from_file;

#[path = "utils/utils.rs"]
pub mod utils;

#[cfg(test)]
mod tests;
