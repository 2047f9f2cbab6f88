//! Classification of the relative motion between pairs of joints.
//!
//! The classification itself is computed elsewhere (it depends on the constraints of the
//! planning problem). This module only holds the resulting matrix, indexed by joint indices
//! with 0 being the universe.

use nalgebra::DMatrix;

/// How two joints may move relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeMotionType {
    /// The joints are rigidly linked, their bodies never move relative to each other.
    Constrained,
    /// Rigidly linked for a given value of some parameter, that may change.
    Parameterized,
    /// Free relative motion.
    Unconstrained,
    /// Value the classification does not understand.
    Unrecognized,
}

impl RelativeMotionType {
    /// Decode the integer classification (0 constrained, 1 parameterized, 2 unconstrained).
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => RelativeMotionType::Constrained,
            1 => RelativeMotionType::Parameterized,
            2 => RelativeMotionType::Unconstrained,
            _ => RelativeMotionType::Unrecognized,
        }
    }
}

/// Symmetric joint-by-joint relative motion classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeMotionMatrix {
    matrix: DMatrix<RelativeMotionType>,
}

impl RelativeMotionMatrix {
    /// Matrix for `joint_count` robot joints plus the universe, everything unconstrained.
    pub fn new(joint_count: usize) -> Self {
        let n = joint_count + 1;
        RelativeMotionMatrix {
            matrix: DMatrix::from_element(n, n, RelativeMotionType::Unconstrained),
        }
    }

    /// Matrix built from integer codes, row major, see [`RelativeMotionType::from_code`].
    /// None unless there are exactly `size * size` codes.
    pub fn from_codes(size: usize, codes: &[i32]) -> Option<Self> {
        if codes.len() != size * size {
            return None;
        }
        Some(RelativeMotionMatrix {
            matrix: DMatrix::from_row_iterator(
                size, size,
                codes.iter().map(|code| RelativeMotionType::from_code(*code)),
            ),
        })
    }

    /// Set the classification of both (j1, j2) and (j2, j1). Indices out of range are ignored.
    pub fn set(&mut self, j1: usize, j2: usize, motion: RelativeMotionType) {
        if j1 < self.size() && j2 < self.size() {
            self.matrix[(j1, j2)] = motion;
            self.matrix[(j2, j1)] = motion;
        }
    }

    /// Classification of the pair, `Unrecognized` if an index is out of range.
    pub fn get(&self, j1: usize, j2: usize) -> RelativeMotionType {
        self.matrix.get((j1, j2)).copied().unwrap_or(RelativeMotionType::Unrecognized)
    }

    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }
}
