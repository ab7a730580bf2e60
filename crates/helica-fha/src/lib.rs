#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Decomposition of a single rigid displacement into a screw axis.
pub mod decompose;

mod error;
pub use error::FhaError;

/// FHA computation modes over whole motion sequences.
pub mod modes;

/// Motion sequences, samples and axis sets.
pub mod types;

pub use decompose::{decompose, HelicalAxis, ScrewMotion};
pub use modes::{compute, FhaConfig, SingularityPolicy};
pub use types::{
    AxisSetId, HelicalAxisSample, HelicalAxisSet, Method, MotionSequence, ObjectId, SampleKind,
};

pub use helica_linalg::RigidPose;
