//! Helical axis sets over whole motion sequences.
//!
//! The delta-based modes produce one sample per consecutive pose pair
//! (`len - 1` samples), the relational mode one sample per timestep. Every
//! mode divides `phi` and `l` by the timestep duration.

use helica_linalg::RigidPose;

use crate::decompose::{decompose, HelicalAxis, ScrewMotion};
use crate::error::FhaError;
use crate::types::{HelicalAxisSample, Method, MotionSequence};

/// What to do with samples whose decomposition is singular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Keep the sample, tagged invalid, and continue.
    #[default]
    MarkInvalid,
    /// Abort the whole sequence on the first singular sample.
    Halt,
}

/// Parameters of an FHA computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FhaConfig {
    /// Seconds per animation step.
    pub timestep_duration: f64,
    /// Handling of identity / non-finite samples.
    pub singularity_policy: SingularityPolicy,
}

impl Default for FhaConfig {
    fn default() -> Self {
        Self {
            timestep_duration: 1.0,
            singularity_policy: SingularityPolicy::default(),
        }
    }
}

impl FhaConfig {
    /// Default configuration with the given timestep.
    pub fn with_timestep(timestep_duration: f64) -> Self {
        Self {
            timestep_duration,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), FhaError> {
        let dt = self.timestep_duration;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(FhaError::InvalidTimestep(dt));
        }
        Ok(())
    }
}

// Turn one decomposition into a rate sample. `displacements` maps the final
// axis to (r0_displ_base, r0_displ_tar).
fn to_sample<F>(
    screw: ScrewMotion,
    index: usize,
    config: &FhaConfig,
    displacements: F,
) -> Result<HelicalAxisSample, FhaError>
where
    F: FnOnce(&HelicalAxis) -> (f64, f64),
{
    let kind = screw.kind();
    let axis = match (screw, config.singularity_policy) {
        (ScrewMotion::Regular(axis) | ScrewMotion::HalfTurn(axis), _) => axis,
        (ScrewMotion::Identity { .. }, SingularityPolicy::Halt) => {
            return Err(FhaError::IdentityRotation { index })
        }
        (ScrewMotion::NonFinite, SingularityPolicy::Halt) => {
            return Err(FhaError::SingularSupportPoint { index })
        }
        _ => return Ok(HelicalAxisSample::invalid(kind)),
    };

    let (r0_displ_base, r0_displ_tar) = displacements(&axis);
    Ok(HelicalAxisSample {
        n: axis.n,
        r0: axis.r0,
        r0_displ_base,
        r0_displ_tar,
        phi: axis.phi / config.timestep_duration,
        l: axis.l / config.timestep_duration,
        kind,
    })
}

fn check_min_len(len: usize, required: usize) -> Result<(), FhaError> {
    if len < required {
        return Err(FhaError::SequenceTooShort {
            required,
            provided: len,
        });
    }
    Ok(())
}

fn check_pair(reference: &MotionSequence, target: &MotionSequence) -> Result<(), FhaError> {
    if reference.len() != target.len() {
        return Err(FhaError::SequenceLengthMismatch {
            reference: reference.len(),
            target: target.len(),
        });
    }
    Ok(())
}

fn log_invalid(method: Method, samples: &[HelicalAxisSample]) {
    let invalid = samples.iter().filter(|s| !s.is_valid()).count();
    if invalid > 0 {
        log::debug!(
            "{method}: {invalid} of {} samples have no defined axis",
            samples.len()
        );
    }
}

fn world_samples(
    poses: &[RigidPose],
    config: &FhaConfig,
) -> Result<Vec<HelicalAxisSample>, FhaError> {
    poses
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let delta = pair[0].delta_to(&pair[1]);
            let screw = decompose(&delta.rotation, delta.translation);
            to_sample(screw, i, config, |axis| {
                (0.0, axis.n.dot(pair[0].translation))
            })
        })
        .collect()
}

/// Finite helical axes of `target` relative to the world.
pub fn compute_world_relative(
    target: &MotionSequence,
    config: &FhaConfig,
) -> Result<Vec<HelicalAxisSample>, FhaError> {
    config.validate()?;
    check_min_len(target.len(), 2)?;
    let samples = world_samples(target.poses(), config)?;
    log_invalid(Method::WorldRelative, &samples);
    Ok(samples)
}

/// Finite helical axes of `target` in the moving frame of `reference`.
///
/// Each step delta of the target is re-expressed through the step delta of
/// the reference, `R' = R_ref^T R_tar`, `v' = R_ref^T (v_tar - v_ref)`. The
/// support point is the one closest to the world origin.
pub fn compute_reference_relative(
    reference: &MotionSequence,
    target: &MotionSequence,
    config: &FhaConfig,
) -> Result<Vec<HelicalAxisSample>, FhaError> {
    config.validate()?;
    check_pair(reference, target)?;
    check_min_len(target.len(), 2)?;

    let samples = reference
        .poses()
        .windows(2)
        .zip(target.poses().windows(2))
        .enumerate()
        .map(|(i, (ref_pair, tar_pair))| {
            let ref_delta = ref_pair[0].delta_to(&ref_pair[1]);
            let tar_delta = tar_pair[0].delta_to(&tar_pair[1]);
            let rel = tar_delta.relative_to(&ref_delta);
            let screw = decompose(&rel.rotation, rel.translation);
            to_sample(screw, i, config, |axis| {
                (
                    axis.n.dot(ref_pair[0].translation),
                    axis.n.dot(tar_pair[0].translation),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log_invalid(Method::ReferenceRelative, &samples);
    Ok(samples)
}

/// Finite helical axes of `target` relative to `reference`, projecting first.
///
/// The whole target motion is expressed in the reference frame, the world FHA
/// is computed on that motion and the axes are mapped back to the world with
/// the reference pose before each step. `phi`, `l` and `n` equal
/// [`compute_reference_relative`]; `r0` lies on the same line but closest to
/// the reference's moving center.
pub fn compute_reference_relative_project_first(
    reference: &MotionSequence,
    target: &MotionSequence,
    config: &FhaConfig,
) -> Result<Vec<HelicalAxisSample>, FhaError> {
    config.validate()?;
    check_pair(reference, target)?;
    check_min_len(target.len(), 2)?;

    let projected = target
        .poses()
        .iter()
        .zip(reference.poses())
        .map(|(tar, r)| tar.relative_to(r))
        .collect::<Vec<_>>();

    let samples = projected
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let delta = pair[0].delta_to(&pair[1]);
            let ref_pre = &reference.poses()[i];
            let tar_pre = &target.poses()[i];
            let screw = match decompose(&delta.rotation, delta.translation) {
                ScrewMotion::Regular(axis) => ScrewMotion::Regular(axis.transformed(ref_pre)),
                ScrewMotion::HalfTurn(axis) => ScrewMotion::HalfTurn(axis.transformed(ref_pre)),
                other => other,
            };
            to_sample(screw, i, config, |axis| {
                (
                    axis.n.dot(ref_pre.translation),
                    axis.n.dot(tar_pre.translation),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log_invalid(Method::ReferenceRelativeProjectFirst, &samples);
    Ok(samples)
}

/// Relational helical axes: the displacement carrying the reference pose onto
/// the target pose at each timestep, `R = R_tar R_ref^T`, `v = v_tar - R v_ref`.
pub fn compute_relational(
    reference: &MotionSequence,
    target: &MotionSequence,
    config: &FhaConfig,
) -> Result<Vec<HelicalAxisSample>, FhaError> {
    config.validate()?;
    check_pair(reference, target)?;
    check_min_len(target.len(), 1)?;

    let samples = reference
        .poses()
        .iter()
        .zip(target.poses())
        .enumerate()
        .map(|(i, (r, tar))| {
            let rel = r.delta_to(tar);
            let screw = decompose(&rel.rotation, rel.translation);
            to_sample(screw, i, config, |_| (0.0, 0.0))
        })
        .collect::<Result<Vec<_>, _>>()?;

    log_invalid(Method::Relational, &samples);
    Ok(samples)
}

/// Compute the helical axes of `target` with `method`.
///
/// `reference` is ignored by [`Method::WorldRelative`] and required by every other method.
pub fn compute(
    method: Method,
    reference: Option<&MotionSequence>,
    target: &MotionSequence,
    config: &FhaConfig,
) -> Result<Vec<HelicalAxisSample>, FhaError> {
    if method == Method::WorldRelative {
        return compute_world_relative(target, config);
    }
    let reference = reference.ok_or(FhaError::MissingReference(method))?;
    match method {
        Method::ReferenceRelative => compute_reference_relative(reference, target, config),
        Method::ReferenceRelativeProjectFirst => {
            compute_reference_relative_project_first(reference, target, config)
        }
        Method::Relational => compute_relational(reference, target, config),
        Method::WorldRelative => compute_world_relative(target, config),
    }
}
