use helica_fha::{AxisSetId, FhaError, ObjectId};
use helica_glyph::GlyphError;
use helica_io::IoError;

/// An error type for the session module.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The object does not exist in the scene.
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),

    /// No axis set with this id.
    #[error("unknown axis set {0:?}")]
    UnknownAxisSet(AxisSetId),

    /// Every correlation color is in use.
    #[error("all correlation colors are in use, remove an axis set first")]
    PaletteExhausted,

    /// The settings' time range is empty, reversed or not finite.
    #[error("invalid time range: time_start {start} must be finite and before time_end {end}")]
    InvalidTimeRange {
        /// Configured `time_start`.
        start: f64,
        /// Configured `time_end`.
        end: f64,
    },

    /// A session needs at least one object.
    #[error("the scene has no objects")]
    EmptyScene,

    /// Motion sequences of one scene have different lengths.
    #[error("object {object} has {found} timesteps, expected {expected}")]
    SequenceLengthMismatch {
        /// Index of the offending object.
        object: usize,
        /// Timesteps of the first object.
        expected: usize,
        /// Timesteps of the offending object.
        found: usize,
    },

    /// The number of motion sequences doesn't match the number of objects.
    #[error("expected {expected} motion sequences, got {found}")]
    ObjectCountMismatch {
        /// Objects in the session.
        expected: usize,
        /// Sequences provided.
        found: usize,
    },

    /// Axis computation failed.
    #[error(transparent)]
    Fha(#[from] FhaError),

    /// Glyph derivation failed.
    #[error(transparent)]
    Glyph(#[from] GlyphError),

    /// Reading or writing files failed.
    #[error(transparent)]
    Io(#[from] IoError),
}
