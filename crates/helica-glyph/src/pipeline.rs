use glam::Vec3;
use helica_fha::HelicalAxisSet;
use serde::{Deserialize, Serialize};

use crate::colormap::{colormap_rgb, correlation_color, TIME_COLORS};
use crate::error::GlyphError;
use crate::instances::{build_instances, GlyphInstance};
use crate::ribbon::{build_ribbon, RibbonVertex};

/// Inputs of the glyph pipeline besides the axis set itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphParams {
    /// Color stops of the time ramp, `[0, 255]`.
    pub ramp: Vec<[u8; 3]>,
    /// Geometric scale of the axis segments.
    pub scale: f64,
    /// Use `|l|` instead of `l`.
    pub abs_translation: bool,
}

impl Default for GlyphParams {
    fn default() -> Self {
        Self {
            ramp: TIME_COLORS.to_vec(),
            scale: 1.0,
            abs_translation: false,
        }
    }
}

/// Render-ready buffers of one axis set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphBuffers {
    /// One arrow glyph per sample.
    pub instances: Vec<GlyphInstance>,
    /// Two strip vertices per sample.
    pub ribbon: Vec<RibbonVertex>,
    /// Correlation color of the set, used for the arrow tips.
    pub tip_color: Vec3,
}

impl GlyphBuffers {
    /// Whether the set produced no geometry.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Derive all glyph buffers of `set`.
///
/// Deterministic: the same set and parameters always give the same buffers,
/// so they can be rebuilt whenever the samples or parameters change.
pub fn build_glyph_buffers(
    set: &HelicalAxisSet,
    params: &GlyphParams,
) -> Result<GlyphBuffers, GlyphError> {
    if !params.scale.is_finite() || params.scale <= 0.0 {
        return Err(GlyphError::InvalidScale(params.scale));
    }

    let samples = set.samples();
    let instance_colors = colormap_rgb(&params.ramp, samples.len())?;
    let vertex_colors = colormap_rgb(&params.ramp, 2 * samples.len())?;

    let buffers = GlyphBuffers {
        instances: build_instances(samples, &instance_colors, params.abs_translation),
        ribbon: build_ribbon(
            samples,
            &vertex_colors,
            params.scale,
            params.abs_translation,
        ),
        tip_color: correlation_color(set.color_tag),
    };

    log::trace!(
        "glyph buffers for {}: {} instances, {} strip vertices",
        set.name,
        buffers.instances.len(),
        buffers.ribbon.len()
    );

    Ok(buffers)
}
