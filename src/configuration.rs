//! Configurations and the configuration space of a robot.
//!
//! A configuration is a vector of joint values. Not every joint is a plain real number:
//! an unbounded revolute joint is stored as `(cos θ, sin θ)` and has a single degree of freedom.
//! For this reason configurations are never subtracted directly. [`ConfigurationSpace::difference`]
//! returns the tangent vector between two configurations and [`ConfigurationSpace::integrate`]
//! moves a configuration along a tangent vector.

use nalgebra::DVector;

/// Point in the configuration space, of size [`ConfigurationSpace::config_size`].
pub type Configuration = DVector<f64>;

/// Tangent vector (velocity, displacement), of size [`ConfigurationSpace::number_dof`].
pub type TangentVector = DVector<f64>;

/// Kind of the single degree of freedom joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    /// Translation along the joint axis.
    Prismatic,
    /// Rotation around the joint axis, value is the angle in radians.
    Revolute,
    /// Rotation without limits, stored as `(cos θ, sin θ)`.
    RevoluteUnbounded,
}

impl JointKind {
    /// Number of configuration values this joint occupies.
    pub fn config_size(&self) -> usize {
        match self {
            JointKind::RevoluteUnbounded => 2,
            _ => 1,
        }
    }

    /// Number of degrees of freedom (tangent values) this joint occupies.
    pub fn number_dof(&self) -> usize {
        1
    }

    /// Angle or displacement represented by the joint configuration slice.
    pub fn value(&self, q: &[f64]) -> f64 {
        match self {
            JointKind::RevoluteUnbounded => q[1].atan2(q[0]),
            _ => q[0],
        }
    }
}

/// Offsets of a joint inside the configuration and the tangent vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointRange {
    pub idx_q: usize,
    pub nq: usize,
    pub idx_v: usize,
    pub nv: usize,
}

/// Cartesian product of the joint spaces of the robot, in joint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationSpace {
    joints: Vec<JointKind>,
    ranges: Vec<JointRange>,
    nq: usize,
    nv: usize,
}

impl ConfigurationSpace {
    pub fn new(joints: Vec<JointKind>) -> Self {
        let mut space = ConfigurationSpace::default();
        for kind in joints {
            space.push(kind);
        }
        space
    }

    /// Purely Euclidean space of the given dimension.
    pub fn euclidean(dim: usize) -> Self {
        Self::new(vec![JointKind::Prismatic; dim])
    }

    /// Append one joint, returns its rank.
    pub fn push(&mut self, kind: JointKind) -> usize {
        self.ranges.push(JointRange {
            idx_q: self.nq,
            nq: kind.config_size(),
            idx_v: self.nv,
            nv: kind.number_dof(),
        });
        self.nq += kind.config_size();
        self.nv += kind.number_dof();
        self.joints.push(kind);
        self.joints.len() - 1
    }

    pub fn config_size(&self) -> usize {
        self.nq
    }

    pub fn number_dof(&self) -> usize {
        self.nv
    }

    pub fn joint_kinds(&self) -> &[JointKind] {
        &self.joints
    }

    pub fn joint_ranges(&self) -> &[JointRange] {
        &self.ranges
    }

    /// Configuration where every joint is at zero.
    pub fn neutral(&self) -> Configuration {
        let mut q = Configuration::zeros(self.nq);
        for (kind, range) in self.joints.iter().zip(&self.ranges) {
            if *kind == JointKind::RevoluteUnbounded {
                q[range.idx_q] = 1.0;
            }
        }
        q
    }

    /// Tangent vector `v` such that `integrate(q0, v) == q1`.
    pub fn difference(&self, q1: &Configuration, q0: &Configuration) -> TangentVector {
        let mut v = TangentVector::zeros(self.nv);
        for (kind, r) in self.joints.iter().zip(&self.ranges) {
            v[r.idx_v] = match kind {
                JointKind::RevoluteUnbounded => {
                    let (c0, s0) = (q0[r.idx_q], q0[r.idx_q + 1]);
                    let (c1, s1) = (q1[r.idx_q], q1[r.idx_q + 1]);
                    // Angle of the relative rotation, always in [-pi, pi]
                    (c0 * s1 - s0 * c1).atan2(c0 * c1 + s0 * s1)
                }
                _ => q1[r.idx_q] - q0[r.idx_q],
            };
        }
        v
    }

    /// Move configuration `q` along the tangent vector `v`.
    pub fn integrate(&self, q: &Configuration, v: &TangentVector) -> Configuration {
        let mut result = q.clone();
        for (kind, r) in self.joints.iter().zip(&self.ranges) {
            match kind {
                JointKind::RevoluteUnbounded => {
                    let angle = q[r.idx_q + 1].atan2(q[r.idx_q]) + v[r.idx_v];
                    result[r.idx_q] = angle.cos();
                    result[r.idx_q + 1] = angle.sin();
                }
                _ => result[r.idx_q] = q[r.idx_q] + v[r.idx_v],
            }
        }
        result
    }
}
