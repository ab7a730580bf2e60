#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Rigid poses and pose deltas.
pub mod pose;

/// Rigid alignment of marker clouds (Kabsch).
pub mod rigid;

/// Rotation matrix helpers.
pub mod rotation;

pub use pose::RigidPose;
pub use rigid::{kabsch, register_sequence, RigidError};
