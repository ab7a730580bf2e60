//! Rigid alignment utilities (Kabsch)
//!
//! A marker cloud is given once in object coordinates and then once per
//! timestep in world coordinates. The Kabsch algorithm recovers, per
//! timestep, the rotation and translation that best carries the object-space
//! cloud onto the observation in the least-squares sense.

use glam::{DMat3, DVec3};
use thiserror::Error;

use crate::pose::RigidPose;

/// Minimum number of correspondences needed for a rigid fit.
pub const MIN_POINTS: usize = 3;

/// Ratio `sigma_2 / sigma_1` below which the cross-covariance counts as rank deficient.
pub const DEGENERATE_RATIO: f64 = 1e-9;

/// Error type for rigid alignment operations.
#[derive(Debug, Error, PartialEq)]
pub enum RigidError {
    /// Source and destination arrays must have the same length
    #[error("source and destination arrays must have the same length ({src} vs {dst})")]
    MismatchedInputLengths {
        /// Number of source points.
        src: usize,
        /// Number of destination points.
        dst: usize,
    },

    /// Not enough correspondences.
    #[error("at least {required} points required, got {provided}")]
    InsufficientPoints {
        /// Number of points required.
        required: usize,
        /// Number of points provided.
        provided: usize,
    },

    /// A marker coordinate is NaN or infinite, e.g. an occluded marker.
    #[error("non-finite coordinate in {cloud} point {index}")]
    NonFiniteInput {
        /// `"source"` or `"destination"`.
        cloud: &'static str,
        /// Index of the first offending point.
        index: usize,
    },

    /// The marker cloud is collinear or collapsed, the rotation is not unique.
    #[error("degenerate marker cloud (singular values {singular_values:?})")]
    DegenerateRegistration {
        /// Singular values of the cross-covariance, descending.
        singular_values: [f64; 3],
    },

    /// Registration failed for one frame of a sequence.
    #[error("registration failed at frame {frame}: {source}")]
    Frame {
        /// Index of the failing observation.
        frame: usize,
        /// Underlying error.
        #[source]
        source: Box<RigidError>,
    },
}

/// Compute the centroids of two point clouds.
pub fn compute_centroids(points_src: &[DVec3], points_dst: &[DVec3]) -> (DVec3, DVec3) {
    let centroid = |points: &[DVec3]| {
        points.iter().fold(DVec3::ZERO, |acc, &p| acc + p) / points.len().max(1) as f64
    };
    (centroid(points_src), centroid(points_dst))
}

fn faer_to_dmat3(m: faer::MatRef<'_, f64>) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(m.read(0, 0), m.read(1, 0), m.read(2, 0)),
        DVec3::new(m.read(0, 1), m.read(1, 1), m.read(2, 1)),
        DVec3::new(m.read(0, 2), m.read(1, 2), m.read(2, 2)),
    )
}

/// Kabsch algorithm without scale.
///
/// Finds `(R, v)` minimizing `sum |R * src_i + v - dst_i|^2`.
///
/// The algorithm:
/// 1. Center both clouds on their centroids `c_src`, `c_dst`
/// 2. Cross-covariance `H = (src - c_src)^T (dst - c_dst)`
/// 3. SVD `H = U S V^T`
/// 4. `R = V diag(1, 1, sign(det(V U^T))) U^T`, which is never a reflection
/// 5. `v = c_dst - R c_src`
///
/// # Arguments
///
/// * `src` - Points in object coordinates (at least 3, not collinear).
/// * `dst` - The same points observed in world coordinates.
///
/// # Errors
///
/// [`RigidError::NonFiniteInput`] for NaN or infinite coordinates,
/// [`RigidError::DegenerateRegistration`] if the cross-covariance has rank < 2.
pub fn kabsch(src: &[DVec3], dst: &[DVec3]) -> Result<RigidPose, RigidError> {
    if src.len() != dst.len() {
        return Err(RigidError::MismatchedInputLengths {
            src: src.len(),
            dst: dst.len(),
        });
    }
    if src.len() < MIN_POINTS {
        return Err(RigidError::InsufficientPoints {
            required: MIN_POINTS,
            provided: src.len(),
        });
    }

    for (cloud, points) in [("source", src), ("destination", dst)] {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(RigidError::NonFiniteInput { cloud, index });
        }
    }

    let (c_src, c_dst) = compute_centroids(src, dst);

    // H_ij = sum_k (src_k - c_src)_i * (dst_k - c_dst)_j
    let h = faer::Mat::<f64>::from_fn(3, 3, |i, j| {
        src.iter()
            .zip(dst.iter())
            .map(|(s, d)| (s[i] - c_src[i]) * (d[j] - c_dst[j]))
            .sum()
    });

    let svd = h.svd();
    let s = svd.s_diagonal();
    let mut singular_values = [s.read(0), s.read(1), s.read(2)];
    singular_values.sort_by(|a, b| b.total_cmp(a));

    if !(singular_values[0] > 0.0) || singular_values[1] <= DEGENERATE_RATIO * singular_values[0]
    {
        return Err(RigidError::DegenerateRegistration { singular_values });
    }

    let u = faer_to_dmat3(svd.u());
    let v = faer_to_dmat3(svd.v());

    // force a right-handed system
    let d = (v * u.transpose()).determinant().signum();
    let correction = DMat3::from_diagonal(DVec3::new(1.0, 1.0, d));
    let rotation = v * correction * u.transpose();

    let translation = c_dst - rotation * c_src;

    Ok(RigidPose::new(rotation, translation))
}

/// Register every observation of a marker sequence against the object-space cloud.
///
/// # Arguments
///
/// * `reference` - Marker positions in object coordinates.
/// * `frames` - One world-space observation of the same markers per timestep.
///
/// # Returns
///
/// One pose per frame, or the first failing frame wrapped in [`RigidError::Frame`].
pub fn register_sequence(
    reference: &[DVec3],
    frames: &[Vec<DVec3>],
) -> Result<Vec<RigidPose>, RigidError> {
    let poses = frames
        .iter()
        .enumerate()
        .map(|(frame, observed)| {
            kabsch(reference, observed).map_err(|e| RigidError::Frame {
                frame,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "registered {} frames of {} markers",
        poses.len(),
        reference.len()
    );

    Ok(poses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn markers() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(0.0, 0.0, 3.0),
            DVec3::new(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_kabsch_recovers_known_transform() -> Result<(), RigidError> {
        let rotation = DMat3::from_axis_angle(DVec3::new(0.2, -0.5, 1.0).normalize(), 1.1);
        let translation = DVec3::new(10.0, -3.0, 0.5);
        let src = markers();
        let dst = src
            .iter()
            .map(|p| rotation * *p + translation)
            .collect::<Vec<_>>();

        let pose = kabsch(&src, &dst)?;
        assert!(pose.rotation.abs_diff_eq(rotation, 1e-6));
        assert!(pose.translation.abs_diff_eq(translation, 1e-6));
        assert_relative_eq!(pose.rotation.determinant(), 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_kabsch_identity() -> Result<(), RigidError> {
        let src = markers();
        let pose = kabsch(&src, &src)?;
        assert!(pose.rotation.abs_diff_eq(DMat3::IDENTITY, 1e-9));
        assert!(pose.translation.abs_diff_eq(DVec3::ZERO, 1e-9));
        Ok(())
    }

    #[test]
    fn test_kabsch_reflected_input_is_proper_rotation() -> Result<(), RigidError> {
        let src = markers();
        // mirror through the xy-plane: no proper rotation maps src onto dst
        let dst = src
            .iter()
            .map(|p| DVec3::new(p.x, p.y, -p.z))
            .collect::<Vec<_>>();
        let pose = kabsch(&src, &dst)?;
        assert_relative_eq!(pose.rotation.determinant(), 1.0, epsilon = 1e-9);
        assert!(crate::rotation::is_rotation(&pose.rotation, 1e-9));
        Ok(())
    }

    #[test]
    fn test_kabsch_collinear_is_degenerate() {
        let src = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(2.0, 2.0, 2.0),
        ];
        let dst = src.iter().map(|p| *p + DVec3::X).collect::<Vec<_>>();
        assert!(matches!(
            kabsch(&src, &dst),
            Err(RigidError::DegenerateRegistration { .. })
        ));
    }

    #[test]
    fn test_kabsch_rejects_non_finite_markers() {
        let src = markers();
        let mut occluded = src.clone();
        occluded[2] = DVec3::new(f64::NAN, 0.0, 1.0);
        assert_eq!(
            kabsch(&src, &occluded),
            Err(RigidError::NonFiniteInput {
                cloud: "destination",
                index: 2
            })
        );

        let mut src_inf = src.clone();
        src_inf[0].z = f64::INFINITY;
        assert_eq!(
            kabsch(&src_inf, &src),
            Err(RigidError::NonFiniteInput {
                cloud: "source",
                index: 0
            })
        );
    }

    #[test]
    fn test_kabsch_input_validation() {
        let src = markers();
        assert_eq!(
            kabsch(&src, &src[..4]),
            Err(RigidError::MismatchedInputLengths { src: 5, dst: 4 })
        );
        assert_eq!(
            kabsch(&src[..2], &src[..2]),
            Err(RigidError::InsufficientPoints {
                required: 3,
                provided: 2
            })
        );
    }

    #[test]
    fn test_register_sequence_reports_failing_frame() {
        let src = markers();
        let good = src.iter().map(|p| *p + DVec3::Y).collect::<Vec<_>>();
        let collapsed = vec![DVec3::ONE; src.len()];
        let err = register_sequence(&src, &[good.clone(), collapsed]).unwrap_err();
        assert!(matches!(err, RigidError::Frame { frame: 1, .. }));

        let poses = register_sequence(&src, &[good.clone(), good]).unwrap();
        assert_eq!(poses.len(), 2);
        assert!(poses[1].translation.abs_diff_eq(DVec3::Y, 1e-9));
    }
}
