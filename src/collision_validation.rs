//! Validation of robot configurations by collision checking of an ordered list of pairs.
//!
//! The validator owns three disjoint lists of collision pairs:
//! - *active* pairs, checked for every configuration,
//! - *parameterized* pairs, checked only if [`CollisionValidation::set_check_parameterized`]
//!   is on,
//! - *disabled* pairs, never checked.
//!
//! A configuration is rejected on the first colliding pair, in the order active then
//! parameterized, so the reported pair only depends on the configuration and on the lists.

use tracing::{debug, info, warn};

use crate::collision_object::{
    collide, CollisionObjectPtr, CollisionPair, CollisionRequest, CollisionResult,
};
use crate::configuration::Configuration;
use crate::device::{Device, Joint};
use crate::error::ValidationError;
use crate::relative_motion::{RelativeMotionMatrix, RelativeMotionType};

/// Details of the collision that made the configuration invalid.
#[derive(Debug, Clone)]
pub struct CollisionValidationReport {
    pub object1: CollisionObjectPtr,
    pub object2: CollisionObjectPtr,
    pub result: CollisionResult,
}

/// Outcome of [`CollisionValidation::validate`].
#[derive(Debug, Clone)]
pub enum Validation {
    Valid,
    Invalid(CollisionValidationReport),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn report(&self) -> Option<&CollisionValidationReport> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(report) => Some(report),
        }
    }
}

pub struct CollisionValidation {
    collision_request: CollisionRequest,
    collision_pairs: Vec<CollisionPair>,
    parameterized_pairs: Vec<CollisionPair>,
    disabled_pairs: Vec<CollisionPair>,
    check_parameterized: bool,
}

impl CollisionValidation {
    /// Validator checking the active self-collision pairs of the robot, with the default request.
    pub fn new(robot: &dyn Device) -> Self {
        Self::with_request(robot, CollisionRequest::default())
    }

    pub fn with_request(robot: &dyn Device, request: CollisionRequest) -> Self {
        let collision_pairs = robot.collision_pairs();
        info!("{}: {} self-collision pairs to check", robot.name(), collision_pairs.len());
        CollisionValidation {
            collision_request: request,
            collision_pairs,
            parameterized_pairs: Vec::new(),
            disabled_pairs: Vec::new(),
            check_parameterized: false,
        }
    }

    /// Check the configuration. Moves the robot to `config` (forward kinematics and geometry
    /// placements are recomputed), then tests active pairs and, if enabled, parameterized pairs.
    pub fn validate(&self, robot: &mut dyn Device, config: &Configuration) -> Validation {
        robot.apply_configuration(config);

        let mut result = CollisionResult::default();
        let mut colliding = Self::first_collision(&self.collision_pairs, &self.collision_request, &mut result);
        if colliding.is_none() && self.check_parameterized {
            colliding = Self::first_collision(&self.parameterized_pairs, &self.collision_request, &mut result);
        }

        match colliding {
            Some(pair) => Validation::Invalid(CollisionValidationReport {
                object1: pair.first.clone(),
                object2: pair.second.clone(),
                result,
            }),
            None => Validation::Valid,
        }
    }

    /// Pair every geometry piece of every robot body with the obstacle. Registering the same
    /// obstacle twice creates duplicate pairs.
    pub fn add_obstacle(&mut self, robot: &dyn Device, object: &CollisionObjectPtr) {
        for joint in robot.joints() {
            if let Some(body) = joint.linked_body() {
                for inner in body.inner_objects() {
                    self.collision_pairs.push(CollisionPair::new(inner.clone(), object.clone()));
                }
            }
        }
        debug!("obstacle {} added, {} active pairs", object.name(), self.collision_pairs.len());
    }

    /// Remove the pairs between the geometry of the joint body and the obstacle. Fails if some
    /// piece of the body was not paired with the obstacle.
    pub fn remove_obstacle_from_joint(
        &mut self,
        joint: &Joint,
        obstacle: &CollisionObjectPtr,
    ) -> Result<(), ValidationError> {
        let Some(body) = joint.linked_body() else {
            return Ok(());
        };

        for inner in body.inner_objects() {
            let pair = CollisionPair::new(inner.clone(), obstacle.clone());
            let before = self.collision_pairs.len();
            self.collision_pairs.retain(|registered| *registered != pair);
            let removed = before - self.collision_pairs.len();

            if removed == 0 {
                return Err(ValidationError::NotRegistered {
                    obstacle: obstacle.name().to_string(),
                    joint: joint.name().to_string(),
                });
            } else if removed >= 2 {
                warn!(
                    "obstacle {} was registered {} times as obstacle for joint {}",
                    obstacle.name(), removed, joint.name()
                );
            }
        }
        Ok(())
    }

    /// Reclassify active pairs according to the relative motion of their joints: pairs of
    /// rigidly linked joints are disabled, parameterized ones moved to the parameterized list.
    pub fn filter_collision_pairs(&mut self, matrix: &RelativeMotionMatrix) {
        let mut unused = CollisionResult::default();
        let mut kept = Vec::with_capacity(self.collision_pairs.len());

        for pair in self.collision_pairs.drain(..) {
            let (j1, j2) = (pair.first.joint_index(), pair.second.joint_index());

            match matrix.get(j1, j2) {
                RelativeMotionType::Unconstrained => kept.push(pair),
                RelativeMotionType::Parameterized => {
                    debug!("parameterized collision pair {:?}, j1={}, j2={}", pair, j1, j2);
                    self.parameterized_pairs.push(pair);
                }
                RelativeMotionType::Constrained => {
                    debug!("disabling collision pair {:?}", pair);
                    if collide(&pair, &self.collision_request, &mut unused) != 0 {
                        warn!("disabling collision detection between two bodies in collision: {:?}", pair);
                    }
                    self.disabled_pairs.push(pair);
                }
                RelativeMotionType::Unrecognized => {
                    warn!("relative motion of joints {} and {} not understood, pair {:?} stays active", j1, j2, pair);
                    kept.push(pair);
                }
            }
        }
        self.collision_pairs = kept;
    }

    /// Active pairs, in checking order.
    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.collision_pairs
    }

    pub fn parameterized_pairs(&self) -> &[CollisionPair] {
        &self.parameterized_pairs
    }

    pub fn disabled_pairs(&self) -> &[CollisionPair] {
        &self.disabled_pairs
    }

    pub fn check_parameterized(&self) -> bool {
        self.check_parameterized
    }

    pub fn set_check_parameterized(&mut self, check: bool) {
        self.check_parameterized = check;
    }

    pub fn request(&self) -> &CollisionRequest {
        &self.collision_request
    }

    fn first_collision<'a>(
        pairs: &'a [CollisionPair],
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Option<&'a CollisionPair> {
        pairs.iter().find(|pair| collide(pair, request, result) != 0)
    }
}
