use std::fmt;
use std::str::FromStr;

use glam::{DMat3, DVec3};
use helica_linalg::RigidPose;
use serde::{Deserialize, Serialize};

/// Identifier of a tracked object within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

/// Identifier of a helical axis set within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisSetId(pub u64);

/// Ordered poses of one tracked object, one per animation step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSequence {
    poses: Vec<RigidPose>,
}

impl MotionSequence {
    /// Create a sequence from its poses.
    pub fn new(poses: Vec<RigidPose>) -> Self {
        Self { poses }
    }

    /// Zip separate rotation and translation lists; the shorter one bounds the length.
    pub fn from_parts(rotations: &[DMat3], translations: &[DVec3]) -> Self {
        Self {
            poses: rotations
                .iter()
                .zip(translations.iter())
                .map(|(r, t)| RigidPose::new(*r, *t))
                .collect(),
        }
    }

    /// The poses.
    pub fn poses(&self) -> &[RigidPose] {
        &self.poses
    }

    /// Number of poses.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Pose at `index`.
    pub fn get(&self, index: usize) -> Option<&RigidPose> {
        self.poses.get(index)
    }
}

impl From<Vec<RigidPose>> for MotionSequence {
    fn from(poses: Vec<RigidPose>) -> Self {
        Self::new(poses)
    }
}

/// How a helical axis set relates target and reference motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Consecutive deltas of the target in the world frame.
    WorldRelative,
    /// Target deltas expressed in the moving frame of the reference,
    /// support point closest to the world origin.
    ReferenceRelative,
    /// Target projected into the reference frame before differencing,
    /// support point closest to the reference's center.
    ReferenceRelativeProjectFirst,
    /// Target pose against the reference pose at the same timestep.
    Relational,
}

impl Method {
    /// All methods, in menu order.
    pub const ALL: [Method; 4] = [
        Method::WorldRelative,
        Method::ReferenceRelative,
        Method::ReferenceRelativeProjectFirst,
        Method::Relational,
    ];

    /// Whether two objects have to be picked.
    pub fn needs_reference(&self) -> bool {
        !matches!(self, Method::WorldRelative)
    }

    /// Short identifier, also accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::WorldRelative => "world",
            Method::ReferenceRelative => "reference",
            Method::ReferenceRelativeProjectFirst => "reference-project-first",
            Method::Relational => "relational",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown method '{s}'"))
    }
}

/// How the decomposition of a sample resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    /// Regular decomposition.
    Regular,
    /// 180 degree rotation, axis sign arbitrary.
    HalfTurn,
    /// No rotation, the axis is undefined.
    Identity,
    /// The decomposition failed numerically.
    NonFinite,
}

impl SampleKind {
    /// Whether the sample carries a usable axis.
    pub fn is_valid(&self) -> bool {
        matches!(self, SampleKind::Regular | SampleKind::HalfTurn)
    }
}

/// One helical axis of a set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelicalAxisSample {
    /// Unit axis direction.
    pub n: DVec3,
    /// Axis support point.
    pub r0: DVec3,
    /// `n` projected onto the reference position before the step.
    pub r0_displ_base: f64,
    /// `n` projected onto the target position before the step.
    pub r0_displ_tar: f64,
    /// Rotation magnitude (a rate once divided by the timestep).
    pub phi: f64,
    /// Signed translation along `n` (a rate once divided by the timestep).
    pub l: f64,
    /// How the decomposition resolved.
    pub kind: SampleKind,
}

impl HelicalAxisSample {
    /// A zeroed sample that carries no axis.
    pub fn invalid(kind: SampleKind) -> Self {
        Self {
            n: DVec3::ZERO,
            r0: DVec3::ZERO,
            r0_displ_base: 0.0,
            r0_displ_tar: 0.0,
            phi: 0.0,
            l: 0.0,
            kind,
        }
    }

    /// Whether the sample carries a usable axis.
    pub fn is_valid(&self) -> bool {
        self.kind.is_valid()
    }
}

/// A computed sequence of helical axes for one reference/target pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelicalAxisSet {
    /// Session-unique identifier.
    pub id: AxisSetId,
    /// How the axes were computed.
    pub method: Method,
    /// Reference object, `None` for the world.
    pub reference: Option<ObjectId>,
    /// Target object.
    pub target: ObjectId,
    /// Display name, also the stem of exported files.
    pub name: String,
    /// Seconds per animation step the rates were divided by.
    pub timestep_duration: f64,
    /// Palette slot correlating the set with its objects.
    pub color_tag: usize,
    /// Whether the set is drawn and exported.
    pub visible: bool,
    samples: Vec<HelicalAxisSample>,
}

impl HelicalAxisSet {
    /// Create a visible set.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AxisSetId,
        method: Method,
        reference: Option<ObjectId>,
        target: ObjectId,
        name: String,
        timestep_duration: f64,
        color_tag: usize,
        samples: Vec<HelicalAxisSample>,
    ) -> Self {
        Self {
            id,
            method,
            reference,
            target,
            name,
            timestep_duration,
            color_tag,
            visible: true,
            samples,
        }
    }

    /// The samples, in time order.
    pub fn samples(&self) -> &[HelicalAxisSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples with a usable axis.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_valid()).count()
    }

    /// Whether `object` feeds this set.
    pub fn involves(&self, object: ObjectId) -> bool {
        self.target == object || self.reference == Some(object)
    }

    /// Install a recomputed sample sequence and return the previous one.
    pub fn replace_samples(
        &mut self,
        samples: Vec<HelicalAxisSample>,
        timestep_duration: f64,
    ) -> Vec<HelicalAxisSample> {
        self.timestep_duration = timestep_duration;
        std::mem::replace(&mut self.samples, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_roundtrip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
        }
        assert!("sideways".parse::<Method>().is_err());
        assert!(!Method::WorldRelative.needs_reference());
        assert!(Method::Relational.needs_reference());
    }

    #[test]
    fn test_from_parts_truncates() {
        let seq = MotionSequence::from_parts(&[DMat3::IDENTITY; 3], &[DVec3::ZERO; 2]);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_replace_samples_returns_previous() {
        let mut set = HelicalAxisSet::new(
            AxisSetId(1),
            Method::WorldRelative,
            None,
            ObjectId(0),
            "L1_world".into(),
            0.1,
            0,
            vec![HelicalAxisSample::invalid(SampleKind::Identity)],
        );
        assert_eq!(set.valid_count(), 0);
        assert!(set.involves(ObjectId(0)));
        assert!(!set.involves(ObjectId(1)));

        let old = set.replace_samples(Vec::new(), 0.2);
        assert_eq!(old.len(), 1);
        assert!(set.is_empty());
        assert_eq!(set.timestep_duration, 0.2);
    }
}
