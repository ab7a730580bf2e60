use crate::types::Method;

/// Error types for the FHA computation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FhaError {
    /// The reference and target sequences differ in length.
    #[error("sequence length mismatch: reference has {reference} poses, target has {target}")]
    SequenceLengthMismatch {
        /// Number of reference poses.
        reference: usize,
        /// Number of target poses.
        target: usize,
    },

    /// Not enough poses to form a single sample.
    #[error("at least {required} poses required, got {provided}")]
    SequenceTooShort {
        /// Minimum number of poses for the mode.
        required: usize,
        /// Number of poses provided.
        provided: usize,
    },

    /// The timestep duration must be finite and positive.
    #[error("invalid timestep duration {0}")]
    InvalidTimestep(f64),

    /// The method needs a reference sequence.
    #[error("method {0:?} requires a reference sequence")]
    MissingReference(Method),

    /// The rotation of a sample is the identity, its axis is undefined.
    #[error("identity rotation at sample {index}")]
    IdentityRotation {
        /// Sample index.
        index: usize,
    },

    /// The decomposition of a sample produced non-finite values.
    #[error("singular support point at sample {index}")]
    SingularSupportPoint {
        /// Sample index.
        index: usize,
    },
}
