use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// Pose of one tracked object at one timestep.
///
/// Maps object coordinates to world coordinates as `p_world = rotation * p_object + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidPose {
    /// Proper orthogonal rotation matrix (det = +1).
    pub rotation: DMat3,
    /// Translation vector.
    pub translation: DVec3,
}

impl Default for RigidPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidPose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Create a pose from a rotation and a translation.
    pub fn new(rotation: DMat3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Transform a point from object to world coordinates.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// The inverse pose, `(R^T, -R^T v)`.
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self {
            rotation: rt,
            translation: -(rt * self.translation),
        }
    }

    /// Composition `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &RigidPose) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// The world-frame displacement that carries this pose onto `post`.
    ///
    /// `R = R_post R_pre^T`, `v = v_post - R v_pre`.
    pub fn delta_to(&self, post: &RigidPose) -> Self {
        let rotation = post.rotation * self.rotation.transpose();
        Self {
            rotation,
            translation: post.translation - rotation * self.translation,
        }
    }

    /// Express this pose inside the frame of `reference`.
    ///
    /// `R' = R_ref^T R`, `v' = R_ref^T (v - v_ref)`.
    pub fn relative_to(&self, reference: &RigidPose) -> Self {
        let rt = reference.rotation.transpose();
        Self {
            rotation: rt * self.rotation,
            translation: rt * (self.translation - reference.translation),
        }
    }
}
