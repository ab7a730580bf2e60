use serde::{Deserialize, Serialize};

/// Initial glyph thickness.
pub const DEFAULT_THICKNESS: f32 = 0.5;
/// Initial glyph length.
pub const DEFAULT_LENGTH: f32 = 4.0;
/// Initial glyph offset along the axis.
pub const DEFAULT_OFFSET: f32 = 0.0;
/// Initial surface opacity.
pub const DEFAULT_OPACITY: f32 = 1.0;

/// Where the glyph is anchored along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OriginMode {
    /// At `r0`, the point closest to the world origin.
    #[default]
    World,
    /// Shifted along `n` by the reference displacement.
    Base,
    /// Shifted along `n` by the target displacement.
    Target,
}

impl OriginMode {
    /// Shader code of the mode.
    pub fn code(&self) -> i32 {
        match self {
            OriginMode::World => 0,
            OriginMode::Base => 1,
            OriginMode::Target => 2,
        }
    }
}

/// Visible range of the angular and translational rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhiLBounds {
    /// Lower bound of `phi`.
    pub phi_min: f32,
    /// Upper bound of `phi`.
    pub phi_max: f32,
    /// Lower bound of `l`.
    pub l_min: f32,
    /// Upper bound of `l`.
    pub l_max: f32,
}

impl Default for PhiLBounds {
    fn default() -> Self {
        Self {
            phi_min: f32::NEG_INFINITY,
            phi_max: f32::INFINITY,
            l_min: f32::NEG_INFINITY,
            l_max: f32::INFINITY,
        }
    }
}

impl PhiLBounds {
    /// Whether a sample with these rates passes the bounds (inclusive).
    pub fn contains(&self, phi: f64, l: f64) -> bool {
        let (phi, l) = (phi as f32, l as f32);
        phi >= self.phi_min && phi <= self.phi_max && l >= self.l_min && l <= self.l_max
    }

    /// As a `vec4` uniform.
    pub fn to_array(&self) -> [f32; 4] {
        [self.phi_min, self.phi_max, self.l_min, self.l_max]
    }
}

/// Scalar parameters shared by every glyph and surface draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphUniforms {
    /// Arrow thickness.
    pub thickness: f32,
    /// Arrow length.
    pub length: f32,
    /// Arrow offset along the axis.
    pub offset: f32,
    /// Surface opacity.
    pub opacity: f32,
    /// Glyph anchor.
    pub origin: OriginMode,
    /// Visible rate range.
    pub bounds: PhiLBounds,
    /// Draw `|l|` instead of `l`.
    pub abs_translation: bool,
    /// Global geometric scale.
    pub scale: f32,
}

impl Default for GlyphUniforms {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
            length: DEFAULT_LENGTH,
            offset: DEFAULT_OFFSET,
            opacity: DEFAULT_OPACITY,
            origin: OriginMode::default(),
            bounds: PhiLBounds::default(),
            abs_translation: false,
            scale: 1.0,
        }
    }
}

impl GlyphUniforms {
    /// Default uniforms at the given glyph scale.
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }
}
