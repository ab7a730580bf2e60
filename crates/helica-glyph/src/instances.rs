use glam::Vec3;
use helica_fha::HelicalAxisSample;
use serde::{Deserialize, Serialize};

/// Attributes of one arrow glyph, one per sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphInstance {
    /// Time ramp color.
    pub color: Vec3,
    /// Axis direction.
    pub n: Vec3,
    /// Axis support point.
    pub r0: Vec3,
    /// Reference displacement along the axis.
    pub r0_displ_base: f32,
    /// Target displacement along the axis.
    pub r0_displ_tar: f32,
    /// Angular rate.
    pub phi: f32,
    /// Translation rate, absolute if requested.
    pub l: f32,
    /// 1 for drawable samples, 0 otherwise.
    pub valid: f32,
}

impl GlyphInstance {
    /// Instance attributes of `sample` drawn in `color`.
    pub fn from_sample(sample: &HelicalAxisSample, color: Vec3, abs_translation: bool) -> Self {
        let l = if abs_translation {
            sample.l.abs()
        } else {
            sample.l
        };
        Self {
            color,
            n: sample.n.as_vec3(),
            r0: sample.r0.as_vec3(),
            r0_displ_base: sample.r0_displ_base as f32,
            r0_displ_tar: sample.r0_displ_tar as f32,
            phi: sample.phi as f32,
            l: l as f32,
            valid: if sample.is_valid() { 1.0 } else { 0.0 },
        }
    }
}

/// One instance per sample; `colors` is indexed per sample, missing entries are black.
pub fn build_instances(
    samples: &[HelicalAxisSample],
    colors: &[Vec3],
    abs_translation: bool,
) -> Vec<GlyphInstance> {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let color = colors.get(i).copied().unwrap_or(Vec3::ZERO);
            GlyphInstance::from_sample(s, color, abs_translation)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use helica_fha::SampleKind;

    #[test]
    fn test_instances_flag_invalid_and_abs_l() {
        let valid = HelicalAxisSample {
            n: DVec3::Y,
            r0: DVec3::new(1.0, 2.0, 3.0),
            r0_displ_base: 0.25,
            r0_displ_tar: -0.5,
            phi: 0.1,
            l: -0.3,
            kind: SampleKind::HalfTurn,
        };
        let samples = [valid, HelicalAxisSample::invalid(SampleKind::Identity)];

        let signed = build_instances(&samples, &[Vec3::X], false);
        assert_eq!(signed[0].l, -0.3);
        assert_eq!(signed[0].valid, 1.0);
        assert_eq!(signed[0].color, Vec3::X);
        assert_eq!(signed[1].valid, 0.0);
        assert_eq!(signed[1].color, Vec3::ZERO);

        let absolute = build_instances(&samples, &[], true);
        assert_eq!(absolute[0].l, 0.3);
        assert_eq!(absolute[0].r0, Vec3::new(1.0, 2.0, 3.0));
    }
}
