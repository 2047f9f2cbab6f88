//! Collision objects, collision pairs and the primitive collision test between two objects.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Isometry3, Point3, Vector3};
use parking_lot::RwLock;
use parry3d::bounding_volume::BoundingVolume;
use parry3d::query;
use parry3d::query::{ContactManifold, DefaultQueryDispatcher, PersistentQueryDispatcher, Unsupported};
use parry3d::shape::{Shape, SharedShape};
use tracing::{debug, error};

/// Joint index of objects that do not move with the robot (obstacles).
pub const UNIVERSE: usize = 0;

/// Geometric shape attached to a joint of the robot, or to the universe if it is an obstacle.
///
/// Objects are shared through [`CollisionObjectPtr`] and compared by identity only. The world
/// placement is refreshed by the device each time a configuration is applied.
pub struct CollisionObject {
    name: String,
    joint_index: usize,
    shape: SharedShape,
    /// Transform of the shape relative to the joint frame.
    local_transform: Isometry3<f32>,
    placement: RwLock<Isometry3<f32>>,
}

pub type CollisionObjectPtr = Arc<CollisionObject>;

impl CollisionObject {
    /// Create the object attached to the joint with the given index.
    pub fn new(
        name: impl Into<String>,
        joint_index: usize,
        shape: SharedShape,
        local_transform: Isometry3<f32>,
    ) -> CollisionObjectPtr {
        Arc::new(CollisionObject {
            name: name.into(),
            joint_index,
            shape,
            local_transform,
            placement: RwLock::new(local_transform),
        })
    }

    /// Static obstacle, placed at the given pose in the world frame.
    pub fn obstacle(name: impl Into<String>, shape: SharedShape, pose: Isometry3<f32>) -> CollisionObjectPtr {
        Self::new(name, UNIVERSE, shape, pose)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joint_index(&self) -> usize {
        self.joint_index
    }

    pub fn shape(&self) -> &SharedShape {
        &self.shape
    }

    pub fn local_transform(&self) -> &Isometry3<f32> {
        &self.local_transform
    }

    /// Current placement of the object in the world frame.
    pub fn placement(&self) -> Isometry3<f32> {
        *self.placement.read()
    }

    pub fn set_placement(&self, pose: Isometry3<f32>) {
        *self.placement.write() = pose;
    }

    /// Place the object given the world pose of its joint.
    pub fn update_placement(&self, joint_pose: &Isometry3<f32>) {
        self.set_placement(joint_pose * self.local_transform);
    }
}

impl fmt::Debug for CollisionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionObject")
            .field("name", &self.name)
            .field("joint_index", &self.joint_index)
            .field("placement", &self.placement())
            .finish()
    }
}

/// Ordered pair of objects tested against each other. Equality is the identity of both objects,
/// in the same order.
#[derive(Clone)]
pub struct CollisionPair {
    pub first: CollisionObjectPtr,
    pub second: CollisionObjectPtr,
}

impl CollisionPair {
    pub fn new(first: CollisionObjectPtr, second: CollisionObjectPtr) -> Self {
        CollisionPair { first, second }
    }
}

impl PartialEq for CollisionPair {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.first, &other.first) && Arc::ptr_eq(&self.second, &other.second)
    }
}

impl Eq for CollisionPair {}

impl fmt::Debug for CollisionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first.name(), self.second.name())
    }
}

/// How the primitive test looks at the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionAlgorithm {
    /// Test the shapes themselves.
    #[default]
    Exact,
    /// Test only the world axis aligned bounding boxes of the shapes. Conservative and fast,
    /// reports collision whenever the boxes overlap.
    BoundingVolume,
}

/// Parameters of the primitive collision test, fixed when the validator is built.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRequest {
    /// Maximal number of contacts stored in the result.
    pub num_max_contacts: usize,
    /// If false, stop at the boolean answer. If true, also compute contact points, normal and
    /// penetration depth.
    pub exhaustive: bool,
    /// Objects closer than this distance are considered colliding.
    pub security_margin: f32,
    pub algorithm: CollisionAlgorithm,
}

impl Default for CollisionRequest {
    fn default() -> Self {
        CollisionRequest {
            num_max_contacts: 1,
            exhaustive: false,
            security_margin: 0.0,
            algorithm: CollisionAlgorithm::Exact,
        }
    }
}

/// Contact between two objects, in the world frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Point on the first object.
    pub point1: Point3<f32>,
    /// Point on the second object.
    pub point2: Point3<f32>,
    /// Contact normal, pointing from the first object towards the second.
    pub normal: Vector3<f32>,
    /// Positive when the objects interpenetrate.
    pub penetration_depth: f32,
}

/// Geometric outcome of the primitive collision test.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    pub contacts: Vec<Contact>,
    /// Lower bound of the distance between the objects, zero if they collide.
    pub distance_lower_bound: f32,
}

impl Default for CollisionResult {
    fn default() -> Self {
        CollisionResult {
            contacts: Vec::new(),
            distance_lower_bound: f32::MAX,
        }
    }
}

impl CollisionResult {
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.distance_lower_bound = f32::MAX;
    }
}

/// Test the two objects of the pair at their current placements. Returns the number of contacts
/// found, 0 if there is no collision. The result is cleared first.
pub fn collide(pair: &CollisionPair, request: &CollisionRequest, result: &mut CollisionResult) -> usize {
    result.clear();
    debug!("checking collision between {} and {}", pair.first.name(), pair.second.name());

    let (o1, o2) = (&pair.first, &pair.second);
    let (pos1, pos2) = (o1.placement(), o2.placement());
    let margin = request.security_margin.max(0.0);

    let outcome = match request.algorithm {
        CollisionAlgorithm::BoundingVolume => {
            let aabb1 = o1.shape.compute_aabb(&pos1).loosened(margin);
            let aabb2 = o2.shape.compute_aabb(&pos2);
            let hit = aabb1.intersects(&aabb2);
            if hit {
                result.distance_lower_bound = 0.0;
            }
            Ok(hit)
        }
        CollisionAlgorithm::Exact if request.exhaustive => {
            contact_points(&pos1, &*o1.shape, &pos2, &*o2.shape, margin, request.num_max_contacts, result)
        }
        CollisionAlgorithm::Exact if margin > 0.0 => {
            query::distance(&pos1, &*o1.shape, &pos2, &*o2.shape).map(|distance| {
                result.distance_lower_bound = distance;
                distance <= margin
            })
        }
        CollisionAlgorithm::Exact => {
            query::intersection_test(&pos1, &*o1.shape, &pos2, &*o2.shape).map(|hit| {
                if hit {
                    result.distance_lower_bound = 0.0;
                }
                hit
            })
        }
    };

    match outcome {
        Ok(true) => result.contacts.len().max(1),
        Ok(false) => 0,
        Err(_) => {
            // A shape pair parry cannot test must not be silently accepted as free.
            error!(
                "collision test between {} and {} is not supported for these shapes, assuming collision",
                o1.name(),
                o2.name()
            );
            result.distance_lower_bound = 0.0;
            1
        }
    }
}

/// Contact manifolds between two shapes, flattened into world frame contacts. At most
/// `max_contacts` are stored, but all points are used for the distance bound.
fn contact_points(
    pos1: &Isometry3<f32>,
    shape1: &dyn Shape,
    pos2: &Isometry3<f32>,
    shape2: &dyn Shape,
    margin: f32,
    max_contacts: usize,
    result: &mut CollisionResult,
) -> Result<bool, Unsupported> {
    let pos12 = pos1.inv_mul(pos2);
    let mut manifolds: Vec<ContactManifold<(), ()>> = Vec::new();
    let mut workspace = None;
    DefaultQueryDispatcher.contact_manifolds(&pos12, shape1, shape2, margin, &mut manifolds, &mut workspace)?;

    let mut closest = f32::MAX;
    for manifold in &manifolds {
        // Points are local to the sub-shape when the shape is composite
        let frame1 = pos1 * manifold.subshape_pos1.unwrap_or_else(Isometry3::identity);
        let frame2 = pos2 * manifold.subshape_pos2.unwrap_or_else(Isometry3::identity);
        let normal = frame1 * manifold.local_n1;

        for point in manifold.points.iter().filter(|point| point.dist <= margin) {
            closest = closest.min(point.dist);
            if result.contacts.len() < max_contacts {
                result.contacts.push(Contact {
                    point1: frame1 * point.local_p1,
                    point2: frame2 * point.local_p2,
                    normal,
                    penetration_depth: -point.dist,
                });
            }
        }
    }

    if closest == f32::MAX {
        return Ok(false);
    }
    result.distance_lower_bound = closest.max(0.0);
    Ok(true)
}
