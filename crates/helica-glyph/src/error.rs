/// An error type for the glyph pipeline.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GlyphError {
    /// The color ramp has no stops to interpolate.
    #[error("color ramp needs at least one stop")]
    EmptyColorRamp,

    /// The geometric scale is not a finite positive number.
    #[error("invalid glyph scale {0}")]
    InvalidScale(f64),
}
