//! A triangle-strip surface swept by the axes of a set over time.
//!
//! Every sample contributes two vertices, its support point `r0` and
//! `r0 + n * scale`. Normals come from finite differences between neighbouring
//! samples: one-sided at both ends of the strip, the average of both sides in
//! between.

use glam::{DVec3, Vec3};
use helica_fha::HelicalAxisSample;
use serde::{Deserialize, Serialize};

/// Length below which a difference vector counts as zero.
const MIN_LENGTH: f64 = 1e-12;

/// One vertex of the axis surface strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonVertex {
    /// Vertex position.
    pub position: Vec3,
    /// Unit surface normal.
    pub normal: Vec3,
    /// Axis direction scaled to the glyph scale.
    pub direction: Vec3,
    /// Time ramp color.
    pub color: Vec3,
    /// Angular rate of the sample.
    pub phi: f32,
    /// Translation rate of the sample, absolute if requested.
    pub l: f32,
    /// Reference displacement along the axis.
    pub displ_base: f32,
    /// Target displacement along the axis.
    pub displ_tar: f32,
    /// 1 for valid samples, 0 for samples holding a neighbouring axis.
    pub valid: f32,
}

/// Axis direction and support point per sample, with invalid samples holding
/// the nearest preceding valid axis, else the nearest following one, else zero.
pub fn held_axes(samples: &[HelicalAxisSample]) -> Vec<(DVec3, DVec3)> {
    let first_valid = samples
        .iter()
        .find(|s| s.is_valid())
        .map(|s| (s.n, s.r0))
        .unwrap_or((DVec3::ZERO, DVec3::ZERO));

    let mut held = first_valid;
    samples
        .iter()
        .map(|s| {
            if s.is_valid() {
                held = (s.n, s.r0);
            }
            held
        })
        .collect()
}

/// A unit vector orthogonal to `direction`, any unit vector if it is zero.
pub fn fallback_normal(direction: DVec3) -> DVec3 {
    match direction.try_normalize() {
        Some(d) => d.any_orthonormal_vector(),
        None => DVec3::Z,
    }
}

fn normalize_or_fallback(v: DVec3, direction: DVec3) -> DVec3 {
    if v.length() > MIN_LENGTH && v.is_finite() {
        v.normalize()
    } else {
        fallback_normal(direction)
    }
}

fn scaled_direction(n: DVec3, scale: f64) -> DVec3 {
    n.try_normalize().unwrap_or(DVec3::ZERO) * scale
}

/// Per-sample `(normal, direction)` of the strip.
pub fn strip_frames(axes: &[(DVec3, DVec3)], scale: f64) -> Vec<(DVec3, DVec3)> {
    let count = axes.len();
    (0..count)
        .map(|i| {
            let (n, r0) = axes[i];
            let connection = scaled_direction(n, scale);
            if count < 2 {
                return (fallback_normal(connection), connection);
            }

            let normal = if i == 0 {
                let post = axes[1].1 - r0;
                post.cross(connection)
            } else if i == count - 1 {
                let pre = axes[i - 1].1 - r0;
                connection.cross(pre)
            } else {
                let pre = axes[i - 1].1 - r0;
                let post = axes[i + 1].1 - r0;
                (connection.cross(pre) + post.cross(connection)) * 0.5
            };

            (normalize_or_fallback(normal, connection), connection)
        })
        .collect()
}

/// Build the strip: two vertices per sample.
///
/// # Arguments
///
/// * `samples` - The samples of one axis set, in time order.
/// * `colors` - One color per vertex (`2 * samples.len()`), missing entries are black.
/// * `scale` - Length of the axis segment.
/// * `abs_translation` - Store `|l|` instead of `l`.
pub fn build_ribbon(
    samples: &[HelicalAxisSample],
    colors: &[Vec3],
    scale: f64,
    abs_translation: bool,
) -> Vec<RibbonVertex> {
    let axes = held_axes(samples);
    let frames = strip_frames(&axes, scale);

    samples
        .iter()
        .zip(axes.iter().zip(frames.iter()))
        .enumerate()
        .flat_map(|(i, (sample, (&(n, r0), &(normal, direction))))| {
            let l = if abs_translation {
                sample.l.abs()
            } else {
                sample.l
            };
            let tip = r0 + n * scale;
            [(2 * i, r0), (2 * i + 1, tip)].map(|(v, position)| RibbonVertex {
                position: position.as_vec3(),
                normal: normal.as_vec3(),
                direction: direction.as_vec3(),
                color: colors.get(v).copied().unwrap_or(Vec3::ZERO),
                phi: sample.phi as f32,
                l: l as f32,
                displ_base: sample.r0_displ_base as f32,
                displ_tar: sample.r0_displ_tar as f32,
                valid: if sample.is_valid() { 1.0 } else { 0.0 },
            })
        })
        .collect()
}
