//! Kinematic model of the robot as seen by the validation and steering code.
//!
//! The [`Device`] trait is what the collision validator needs from a robot: joints with their
//! linked bodies, the built-in self-collision pairs, and the ability to apply a configuration
//! (forward kinematics followed by the update of the geometry placements). [`SerialRobot`] is
//! a serial kinematic chain implementing it.

use std::sync::Arc;

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use parry3d::shape::SharedShape;

use crate::collision_object::{CollisionObject, CollisionObjectPtr, CollisionPair};
use crate::configuration::{Configuration, ConfigurationSpace, JointKind};

/// Rigid body moved by a joint, carrying the collision geometry.
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    inner_objects: Vec<CollisionObjectPtr>,
}

impl Body {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry pieces of this body, in the order they were attached.
    pub fn inner_objects(&self) -> &[CollisionObjectPtr] {
        &self.inner_objects
    }
}

/// Joint of the robot. Index 0 is reserved for the universe, so robot joints start at 1.
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    index: usize,
    kind: JointKind,
    /// Placement of the joint frame relative to the parent joint frame, at zero joint value.
    origin: Isometry3<f64>,
    axis: Unit<Vector3<f64>>,
    body: Option<Body>,
}

impl Joint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    pub fn linked_body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Transform produced by the joint for the given joint value.
    fn motion(&self, value: f64) -> Isometry3<f64> {
        match self.kind {
            JointKind::Prismatic => Isometry3::from_parts(
                Translation3::from(self.axis.into_inner() * value),
                UnitQuaternion::identity(),
            ),
            JointKind::Revolute | JointKind::RevoluteUnbounded => Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&self.axis, value),
            ),
        }
    }
}

/// Kinematic model consumed by the collision validation and the steering method.
///
/// # Requirements
/// - Implementations must be `Send` and `Sync`. Applying a configuration mutates the model,
///   so a single model must not be driven by two callers at once (the `&mut self` receiver
///   enforces this).
pub trait Device: Send + Sync {
    fn name(&self) -> &str;

    /// Joints of the robot in configuration order.
    fn joints(&self) -> &[Joint];

    /// Configuration space, providing dimensions and the generalized difference.
    fn configuration_space(&self) -> Arc<ConfigurationSpace>;

    /// Self-collision pairs flagged active in the built-in collision model.
    fn collision_pairs(&self) -> Vec<CollisionPair>;

    /// Set the current configuration, compute forward kinematics and update the world placements
    /// of all collision objects of the robot.
    fn apply_configuration(&mut self, q: &Configuration);

    fn current_configuration(&self) -> &Configuration;

    fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joints().iter().find(|joint| joint.name() == name)
    }
}

/// Serial kinematic chain: each joint is the child of the previous one.
pub struct SerialRobot {
    name: String,
    joints: Vec<Joint>,
    space: Arc<ConfigurationSpace>,
    /// Built-in self-collision pairs with their activation flag.
    collision_pairs: Vec<(CollisionPair, bool)>,
    current: Configuration,
    joint_poses: Vec<Isometry3<f64>>,
}

impl SerialRobot {
    pub fn new(name: impl Into<String>) -> Self {
        SerialRobot {
            name: name.into(),
            joints: Vec::new(),
            space: Arc::new(ConfigurationSpace::default()),
            collision_pairs: Vec::new(),
            current: Configuration::zeros(0),
            joint_poses: Vec::new(),
        }
    }

    /// Append a joint at the end of the chain and return its index. The robot is moved to
    /// the neutral configuration.
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        kind: JointKind,
        origin: Isometry3<f64>,
        axis: Unit<Vector3<f64>>,
    ) -> usize {
        let index = self.joints.len() + 1;
        self.joints.push(Joint {
            name: name.into(),
            index,
            kind,
            origin,
            axis,
            body: None,
        });
        Arc::make_mut(&mut self.space).push(kind);
        let neutral = self.space.neutral();
        self.apply_configuration(&neutral);
        index
    }

    /// Attach a new collision object to the body of the joint, creating the body if needed.
    /// Returns None if there is no joint with this index.
    pub fn attach_object(
        &mut self,
        joint_index: usize,
        name: impl Into<String>,
        shape: SharedShape,
        local_transform: Isometry3<f32>,
    ) -> Option<CollisionObjectPtr> {
        let position = joint_index.checked_sub(1)?;
        let pose = self.joint_poses.get(position)?.cast::<f32>();
        let joint = self.joints.get_mut(position)?;
        let object = CollisionObject::new(name, joint_index, shape, local_transform);
        object.update_placement(&pose);

        let body_name = joint.name.clone();
        let body = joint.body.get_or_insert_with(|| Body {
            name: body_name,
            inner_objects: Vec::new(),
        });
        body.inner_objects.push(object.clone());
        Some(object)
    }

    /// Register an active self-collision pair.
    pub fn add_collision_pair(&mut self, first: CollisionObjectPtr, second: CollisionObjectPtr) {
        self.collision_pairs.push((CollisionPair::new(first, second), true));
    }

    /// Activate or deactivate the built-in pair with the given index.
    pub fn set_collision_pair_active(&mut self, index: usize, active: bool) {
        if let Some(entry) = self.collision_pairs.get_mut(index) {
            entry.1 = active;
        }
    }

    /// Register all pairs of objects carried by non-adjacent joints. Adjacent joints touch
    /// each other by construction and are not checked.
    pub fn add_self_collision_pairs(&mut self) {
        let mut pairs = Vec::new();
        for i in 0..self.joints.len() {
            for j in (i + 2)..self.joints.len() {
                let (Some(body_i), Some(body_j)) = (&self.joints[i].body, &self.joints[j].body) else {
                    continue;
                };
                for a in &body_i.inner_objects {
                    for b in &body_j.inner_objects {
                        pairs.push(CollisionPair::new(a.clone(), b.clone()));
                    }
                }
            }
        }
        self.collision_pairs.extend(pairs.into_iter().map(|pair| (pair, true)));
    }

    /// World poses of the joint frames for the current configuration.
    pub fn joint_poses(&self) -> &[Isometry3<f64>] {
        &self.joint_poses
    }

    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index.checked_sub(1)?)
    }
}

impl Device for SerialRobot {
    fn name(&self) -> &str {
        &self.name
    }

    fn joints(&self) -> &[Joint] {
        &self.joints
    }

    fn configuration_space(&self) -> Arc<ConfigurationSpace> {
        self.space.clone()
    }

    fn collision_pairs(&self) -> Vec<CollisionPair> {
        self.collision_pairs
            .iter()
            .filter(|(_, active)| *active)
            .map(|(pair, _)| pair.clone())
            .collect()
    }

    fn apply_configuration(&mut self, q: &Configuration) {
        self.current = q.clone();
        self.joint_poses.clear();

        let mut pose = Isometry3::identity();
        for (joint, range) in self.joints.iter().zip(self.space.joint_ranges()) {
            let value = joint.kind.value(&q.as_slice()[range.idx_q..range.idx_q + range.nq]);
            pose = pose * joint.origin * joint.motion(value);
            self.joint_poses.push(pose);

            if let Some(body) = &joint.body {
                let pose_f32 = pose.cast::<f32>();
                for object in &body.inner_objects {
                    object.update_placement(&pose_f32);
                }
            }
        }
    }

    fn current_configuration(&self) -> &Configuration {
        &self.current
    }
}
