use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use glam::{DMat3, DVec3};
use helica_fha::{
    compute, FhaConfig, FhaError, Method, MotionSequence, RigidPose, SampleKind, SingularityPolicy,
};

const STEPS: usize = 100;

// a body tumbling about a drifting axis while translating along a curve
fn tumbling(phase: f64) -> MotionSequence {
    (0..STEPS)
        .map(|i| {
            let t = 0.02 * i as f64;
            let axis = DVec3::new((t + phase).sin(), 0.5, (t - phase).cos()).normalize();
            RigidPose::new(
                DMat3::from_axis_angle(axis, 1.5 * t + phase),
                DVec3::new(t.cos(), t.sin(), 0.3 * t),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

// a body spinning about the world z axis
fn spinning() -> MotionSequence {
    (0..STEPS)
        .map(|i| RigidPose::new(DMat3::from_rotation_z(0.01 * i as f64), DVec3::ZERO))
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn test_constant_quarter_turn_offset() -> Result<(), FhaError> {
    // the second object is the first one turned by a fixed 90 degrees about z
    let offset = DMat3::from_rotation_z(FRAC_PI_2);
    let first = spinning();
    let second: MotionSequence = first
        .poses()
        .iter()
        .map(|p| RigidPose::new(offset * p.rotation, offset * p.translation))
        .collect::<Vec<_>>()
        .into();

    let config = FhaConfig::with_timestep(0.1);
    for seq in [&first, &second] {
        let samples = compute(Method::WorldRelative, None, seq, &config)?;
        assert_eq!(samples.len(), STEPS - 1);
        for s in &samples {
            assert_eq!(s.kind, SampleKind::Regular);
            assert_relative_eq!(s.l, 0.0, epsilon = 1e-9);
            assert_relative_eq!(s.n.z.abs(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(s.phi, 0.1, epsilon = 1e-9);
        }
    }

    // and relative to each other they don't move: one constant quarter turn
    let relational = compute(Method::Relational, Some(&first), &second, &config)?;
    assert_eq!(relational.len(), STEPS);
    for s in &relational {
        assert_relative_eq!(s.phi, FRAC_PI_2 / 0.1, epsilon = 1e-6);
        assert!(s.n.abs_diff_eq(DVec3::Z, 1e-9));
    }

    let relative = compute(Method::ReferenceRelative, Some(&first), &second, &config)?;
    assert!(relative.iter().all(|s| s.kind == SampleKind::Identity));
    Ok(())
}

#[test]
fn test_reference_relative_variants_agree() -> Result<(), FhaError> {
    let reference = tumbling(0.0);
    let target = tumbling(1.3);
    let config = FhaConfig::with_timestep(0.02);

    let direct = compute(Method::ReferenceRelative, Some(&reference), &target, &config)?;
    let projected = compute(
        Method::ReferenceRelativeProjectFirst,
        Some(&reference),
        &target,
        &config,
    )?;

    assert_eq!(direct.len(), STEPS - 1);
    for (i, (a, b)) in direct.iter().zip(projected.iter()).enumerate() {
        assert_relative_eq!(a.phi, b.phi, epsilon = 1e-6);
        assert_relative_eq!(a.l, b.l, epsilon = 1e-6);
        assert!(a.n.abs_diff_eq(b.n, 1e-6), "sample {i}: {:?} vs {:?}", a.n, b.n);
        assert!((b.r0 - a.r0).cross(a.n).length() < 1e-6, "sample {i}");
    }
    Ok(())
}

#[test]
fn test_world_relative_of_static_object_is_all_invalid() -> Result<(), FhaError> {
    let still: MotionSequence = vec![RigidPose::new(DMat3::IDENTITY, DVec3::ONE); 5].into();
    let samples = compute(Method::WorldRelative, None, &still, &FhaConfig::default())?;
    assert_eq!(samples.len(), 4);
    for s in &samples {
        assert!(!s.is_valid());
        assert!(s.n.is_finite() && s.phi.is_finite());
    }
    Ok(())
}

#[test]
fn test_small_rotation_keeps_support_point() -> Result<(), FhaError> {
    // rotation about the z axis through (1, 0, 0)
    let pivot = DVec3::new(1.0, 0.0, 0.0);
    let config = FhaConfig {
        timestep_duration: 1.0,
        singularity_policy: SingularityPolicy::Halt,
    };
    for phi in [1e-6, 1e-7, 3e-8, 1e-8, 5e-9] {
        let rotation = DMat3::from_rotation_z(phi);
        let motion: MotionSequence = vec![
            RigidPose::default(),
            RigidPose::new(rotation, pivot - rotation * pivot),
        ]
        .into();

        let samples = compute(Method::WorldRelative, None, &motion, &config)?;
        let sample = &samples[0];
        assert_eq!(sample.kind, SampleKind::Regular, "phi = {phi}");
        assert!(
            sample.r0.abs_diff_eq(pivot, 1e-8),
            "phi = {phi}, r0 = {:?}",
            sample.r0
        );
        assert_relative_eq!(sample.phi, phi, max_relative = 1e-6);
    }
    Ok(())
}
