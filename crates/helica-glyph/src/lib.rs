#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Color ramps and palettes.
pub mod colormap;

mod error;
pub use error::GlyphError;

/// Per-sample arrow glyph attributes.
pub mod instances;

/// The complete buffer set of one axis set.
pub mod pipeline;

/// Axis surface strip.
pub mod ribbon;

/// Scalar shader parameters.
pub mod uniforms;

pub use colormap::{colormap_rgb, CORR_COLORS, TIME_COLORS};
pub use instances::GlyphInstance;
pub use pipeline::{build_glyph_buffers, GlyphBuffers, GlyphParams};
pub use ribbon::RibbonVertex;
pub use uniforms::{GlyphUniforms, OriginMode, PhiLBounds};
