//! Screw decomposition of a rigid displacement.
//!
//! Any rigid displacement `(R, v)` is a rotation by `phi` about an axis with
//! direction `n` through the support point `r0`, together with a translation
//! `l` along that axis. The rotation angle is recovered from both its sine and
//! cosine, using whichever inverse function is well conditioned.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use glam::{DMat3, DVec3};
use helica_linalg::{
    rotation::{skew_vector, trace},
    RigidPose,
};
use serde::{Deserialize, Serialize};

use crate::types::SampleKind;

/// `sin(phi)` below which the axis direction can't be taken from the skew part.
pub const SINGULARITY_EPS: f64 = 1e-9;

/// A screw axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelicalAxis {
    /// Unit direction of the axis.
    pub n: DVec3,
    /// Point on the axis closest to the origin of the frame `(R, v)` is given in.
    pub r0: DVec3,
    /// Rotation about the axis, in `[0, pi]`.
    pub phi: f64,
    /// Signed translation along the axis.
    pub l: f64,
}

impl HelicalAxis {
    /// Map the axis through a pose (the angle and translation are invariant).
    pub fn transformed(&self, pose: &RigidPose) -> Self {
        Self {
            n: pose.rotation * self.n,
            r0: pose.transform_point(self.r0),
            ..*self
        }
    }
}

/// Outcome of decomposing one displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrewMotion {
    /// Well-conditioned decomposition.
    Regular(HelicalAxis),
    /// Rotation of (nearly) 180 degrees. The direction is recovered from the
    /// symmetric part of `R`, its sign is arbitrary.
    HalfTurn(HelicalAxis),
    /// No rotation: neither the direction nor the support point is defined.
    Identity {
        /// The remaining pure translation.
        translation: DVec3,
    },
    /// The input produced non-finite values (NaNs or a non-orthogonal matrix).
    NonFinite,
}

impl ScrewMotion {
    /// The axis, if the decomposition defines one.
    pub fn axis(&self) -> Option<&HelicalAxis> {
        match self {
            ScrewMotion::Regular(axis) | ScrewMotion::HalfTurn(axis) => Some(axis),
            _ => None,
        }
    }

    /// Sample tag for this outcome.
    pub fn kind(&self) -> SampleKind {
        match self {
            ScrewMotion::Regular(_) => SampleKind::Regular,
            ScrewMotion::HalfTurn(_) => SampleKind::HalfTurn,
            ScrewMotion::Identity { .. } => SampleKind::Identity,
            ScrewMotion::NonFinite => SampleKind::NonFinite,
        }
    }
}

/// Rotation angle together with the sine and cosine used downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    /// Angle in `[0, pi]`.
    pub phi: f64,
    /// Sine of the angle.
    pub sin: f64,
    /// Cosine of the angle.
    pub cos: f64,
}

/// Raw `(sin(phi), cos(phi))` of a rotation matrix.
pub fn sin_cos_phi(rotation: &DMat3) -> (f64, f64) {
    (
        0.5 * skew_vector(rotation).length(),
        0.5 * (trace(rotation) - 1.0),
    )
}

/// Resolve the angle through `asin`, using the sign of the cosine to pick the quadrant.
pub fn angle_from_sine(sin_phi: f64, cos_phi: f64) -> Angle {
    let mut phi = sin_phi.clamp(-1.0, 1.0).asin();
    if cos_phi < 0.0 {
        phi = PI - phi;
    }
    Angle {
        phi,
        sin: sin_phi,
        cos: phi.cos(),
    }
}

/// Resolve the angle through `acos`.
pub fn angle_from_cosine(_sin_phi: f64, cos_phi: f64) -> Angle {
    let phi = cos_phi.clamp(-1.0, 1.0).acos();
    Angle {
        phi,
        sin: phi.sin(),
        cos: cos_phi,
    }
}

/// Resolve the angle, `asin` while `sin(phi) <= sqrt(2)/2`, `acos` otherwise.
pub fn resolve_angle(sin_phi: f64, cos_phi: f64) -> Angle {
    if sin_phi <= FRAC_1_SQRT_2 {
        angle_from_sine(sin_phi, cos_phi)
    } else {
        angle_from_cosine(sin_phi, cos_phi)
    }
}

// (R + I) / 2 = n n^T for a half turn
fn half_turn_direction(rotation: &DMat3) -> DVec3 {
    let sym = (*rotation + DMat3::IDENTITY) * 0.5;
    let diag = [sym.x_axis.x, sym.y_axis.y, sym.z_axis.z];
    let j = (0..3)
        .max_by(|&a, &b| diag[a].total_cmp(&diag[b]))
        .unwrap_or(0);
    let n = sym.col(j).normalize_or_zero();

    // keep the orientation that the residual skew part still carries
    let skew = skew_vector(rotation);
    if n.dot(skew) < 0.0 {
        -n
    } else {
        n
    }
}

fn screw_axis(n: DVec3, translation: DVec3, angle: &Angle) -> HelicalAxis {
    let l = n.dot(translation);
    let n_cross_v = n.cross(translation);
    // sin / (2 (1 - cos)), written without the cancellation at small phi
    let coefficient = if angle.sin > 0.0 {
        (1.0 + angle.cos) / (2.0 * angle.sin)
    } else {
        0.0
    };
    let r0 = -0.5 * n.cross(n_cross_v) + coefficient * n_cross_v;
    HelicalAxis {
        n,
        r0,
        phi: angle.phi,
        l,
    }
}

/// Decompose the displacement `(rotation, translation)` into its screw axis.
///
/// # Arguments
///
/// * `rotation` - Proper orthogonal relative rotation.
/// * `translation` - Relative translation.
///
/// Example:
///
/// ```
/// use glam::{DMat3, DVec3};
/// use helica_fha::{decompose, ScrewMotion};
///
/// let screw = decompose(&DMat3::from_rotation_z(0.5), DVec3::new(0.0, 0.0, 2.0));
/// let axis = screw.axis().unwrap();
/// assert!((axis.phi - 0.5).abs() < 1e-12);
/// assert!((axis.l - 2.0).abs() < 1e-12);
///
/// let still = decompose(&DMat3::IDENTITY, DVec3::X);
/// assert!(matches!(still, ScrewMotion::Identity { .. }));
/// ```
pub fn decompose(rotation: &DMat3, translation: DVec3) -> ScrewMotion {
    if !rotation.is_finite() || !translation.is_finite() {
        return ScrewMotion::NonFinite;
    }

    let (sin_phi, cos_phi) = sin_cos_phi(rotation);
    let angle = resolve_angle(sin_phi, cos_phi);

    let screw = if angle.sin < SINGULARITY_EPS {
        if angle.cos > 0.0 {
            return ScrewMotion::Identity { translation };
        }
        let n = half_turn_direction(rotation);
        ScrewMotion::HalfTurn(screw_axis(n, translation, &angle))
    } else {
        let n = skew_vector(rotation) / (2.0 * angle.sin);
        ScrewMotion::Regular(screw_axis(n, translation, &angle))
    };

    match screw.axis() {
        Some(axis) if axis.n.is_finite() && axis.r0.is_finite() && axis.phi.is_finite() => {
            if axis.n.length_squared() > 0.5 {
                screw
            } else {
                ScrewMotion::NonFinite
            }
        }
        _ => ScrewMotion::NonFinite,
    }
}

/// Decompose the displacement carrying `pre` onto `post`.
pub fn decompose_delta(pre: &RigidPose, post: &RigidPose) -> ScrewMotion {
    let delta = pre.delta_to(post);
    decompose(&delta.rotation, delta.translation)
}
