//! An interactive helical axis session.
//!
//! A [`Session`] owns the motions of one scene, the time window, the pick
//! selection and the computed axis sets. All input arrives as [`Event`]s
//! through [`Session::handle`], which is the only writer of the state.

use std::{path::Path, time::Instant};

use helica_fha::{
    modes, AxisSetId, FhaConfig, HelicalAxisSample, HelicalAxisSet, Method, MotionSequence,
    ObjectId, SingularityPolicy,
};
use helica_glyph::{build_glyph_buffers, GlyphBuffers, GlyphParams, GlyphUniforms};
use helica_io::{
    export::{export_visible, ExportSummary},
    load_scene, read_settings,
    settings::SETTINGS_FILE,
    ExportFilter, RateBounds, Scene, Settings,
};

use crate::error::SessionError;
use crate::palette::Palette;
use crate::selection::{PickCompleted, Selection};
use crate::time_window::{step_duration, TimeWindow};

/// Share of the time span covered by the initial window.
const INITIAL_WINDOW: f64 = 0.1;

/// Input to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Start picking objects for a new axis set.
    Activate(Method),
    /// An object was clicked, `None` for a click into the void.
    Pick(Option<ObjectId>),
    /// The pointer moved over an object, `None` if over none.
    Hover(Option<ObjectId>),
    /// Abort picking.
    Cancel,
    /// Playback advanced by this many seconds.
    Advance(f64),
    /// The time window was dragged.
    SetRange {
        /// New start of the window.
        lower: f64,
        /// New end of the window.
        upper: f64,
    },
    /// The preview pointer was dragged.
    SetPreview(f64),
    /// The preview pointer was switched on or off.
    SetPreviewActive(bool),
    /// New motions for the same objects, one sequence per object in id order.
    ReloadMotionData(Vec<MotionSequence>),
    /// Delete an axis set.
    RemoveAxisSet(AxisSetId),
    /// Show or hide an axis set.
    SetVisibility {
        /// The set.
        id: AxisSetId,
        /// Whether it is shown.
        visible: bool,
    },
}

impl Event {
    fn label(&self) -> &'static str {
        match self {
            Event::Activate(_) => "activate",
            Event::Pick(_) => "pick",
            Event::Hover(_) => "hover",
            Event::Cancel => "cancel",
            Event::Advance(_) => "advance",
            Event::SetRange { .. } => "set_range",
            Event::SetPreview(_) => "set_preview",
            Event::SetPreviewActive(_) => "set_preview_active",
            Event::ReloadMotionData(_) => "reload_motion_data",
            Event::RemoveAxisSet(_) => "remove_axis_set",
            Event::SetVisibility { .. } => "set_visibility",
        }
    }
}

/// What handling an event changed beyond the time window and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// No axis set was touched.
    Idle,
    /// A pick sequence completed and produced a new set.
    AxisSetCreated(AxisSetId),
    /// A set was deleted.
    AxisSetRemoved(AxisSetId),
    /// A set was shown or hidden.
    VisibilityChanged(AxisSetId),
    /// Every set was recomputed from new motions.
    Reloaded {
        /// Number of recomputed sets.
        sets: usize,
    },
}

/// Display and file name of an axis set.
///
/// Example:
///
/// ```
/// use helica_fha::Method;
/// use helica_session::axis_set_name;
///
/// assert_eq!(axis_set_name(Method::WorldRelative, None, "L4"), "L4_world");
/// assert_eq!(axis_set_name(Method::Relational, Some("L3"), "L4"), "L3_to_L4");
/// ```
pub fn axis_set_name(method: Method, reference: Option<&str>, target: &str) -> String {
    match (method, reference) {
        (Method::WorldRelative, _) | (_, None) => format!("{target}_world"),
        (Method::ReferenceRelative, Some(r)) => format!("{target}_base_{r}"),
        (Method::ReferenceRelativeProjectFirst, Some(r)) => format!("{target}_base_{r}_pf"),
        (Method::Relational, Some(r)) => format!("{r}_to_{target}"),
    }
}

fn check_motions(motions: &[MotionSequence]) -> Result<usize, SessionError> {
    let expected = motions.first().ok_or(SessionError::EmptyScene)?.len();
    if let Some((object, m)) = motions
        .iter()
        .enumerate()
        .find(|(_, m)| m.len() != expected)
    {
        return Err(SessionError::SequenceLengthMismatch {
            object,
            expected,
            found: m.len(),
        });
    }
    Ok(expected)
}

/// The state of one interactive analysis.
#[derive(Debug, Clone)]
pub struct Session {
    names: Vec<String>,
    motions: Vec<MotionSequence>,
    settings: Settings,
    time: TimeWindow,
    selection: Selection,
    palette: Palette,
    sets: Vec<HelicalAxisSet>,
    next_id: u64,
    singularity_policy: SingularityPolicy,
}

impl Session {
    /// Create a session over named motions of equal length.
    ///
    /// The time window spans the settings' time range over the animation
    /// steps and initially covers its first tenth.
    pub fn new(
        names: Vec<String>,
        motions: Vec<MotionSequence>,
        settings: Settings,
    ) -> Result<Self, SessionError> {
        if names.len() != motions.len() {
            return Err(SessionError::ObjectCountMismatch {
                expected: names.len(),
                found: motions.len(),
            });
        }
        let steps = check_motions(&motions)?;
        let (start, end) = (settings.time_start, settings.time_end);
        if !(start.is_finite() && end.is_finite() && start < end) {
            return Err(SessionError::InvalidTimeRange { start, end });
        }

        let mut time = TimeWindow::new(
            settings.time_start,
            settings.time_end,
            0,
            steps.saturating_sub(1),
        );
        let span = settings.time_end - settings.time_start;
        time.set_range(
            settings.time_start,
            settings.time_start + INITIAL_WINDOW * span,
        );

        log::debug!("session over {} objects, {} steps", names.len(), steps);

        Ok(Self {
            names,
            motions,
            settings,
            time,
            selection: Selection::new(),
            palette: Palette::new(),
            sets: Vec::new(),
            next_id: 0,
            singularity_policy: SingularityPolicy::default(),
        })
    }

    /// Create a session over a loaded scene.
    pub fn from_scene(scene: Scene, settings: Settings) -> Result<Self, SessionError> {
        let (names, motions) = scene
            .objects
            .into_iter()
            .map(|o| (o.name, o.motion))
            .unzip();
        Self::new(names, motions, settings)
    }

    /// Load the scene and settings of `folder`.
    pub fn open(folder: impl AsRef<Path>) -> Result<Self, SessionError> {
        let folder = folder.as_ref();
        let settings = read_settings(folder.join(SETTINGS_FILE))?;
        let scene = load_scene(folder)?;
        Self::from_scene(scene, settings)
    }

    /// Use `policy` for every set computed from now on.
    pub fn with_singularity_policy(mut self, policy: SingularityPolicy) -> Self {
        self.singularity_policy = policy;
        self
    }

    /// The time window.
    pub fn time(&self) -> &TimeWindow {
        &self.time
    }

    /// The pick selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Scene settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Object names, in id order.
    pub fn object_names(&self) -> &[String] {
        &self.names
    }

    /// Name of `object`.
    pub fn object_name(&self, object: ObjectId) -> Option<&str> {
        self.names.get(object.0).map(String::as_str)
    }

    /// Motion of `object`.
    pub fn motion(&self, object: ObjectId) -> Option<&MotionSequence> {
        self.motions.get(object.0)
    }

    /// All axis sets, in creation order.
    pub fn axis_sets(&self) -> &[HelicalAxisSet] {
        &self.sets
    }

    /// The axis set `id`.
    pub fn axis_set(&self, id: AxisSetId) -> Option<&HelicalAxisSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// Handle one input event.
    pub fn handle(&mut self, event: Event) -> Result<Response, SessionError> {
        let label = event.label();
        let start = Instant::now();
        let response = self.apply(event);
        log::debug!("{label} handled in {:?}", start.elapsed());
        response
    }

    fn apply(&mut self, event: Event) -> Result<Response, SessionError> {
        let response = match event {
            Event::Activate(method) => {
                self.selection.activate(method);
                Response::Idle
            }
            Event::Pick(object) => match self.selection.pick(object) {
                Some(pick) => Response::AxisSetCreated(self.complete_pick(pick)?),
                None => Response::Idle,
            },
            Event::Hover(object) => {
                self.selection.hover(object);
                Response::Idle
            }
            Event::Cancel => {
                self.selection.cancel();
                Response::Idle
            }
            Event::Advance(dt) => {
                self.time.advance(dt);
                Response::Idle
            }
            Event::SetRange { lower, upper } => {
                self.time.set_range(lower, upper);
                Response::Idle
            }
            Event::SetPreview(t) => {
                self.time.set_preview(t);
                Response::Idle
            }
            Event::SetPreviewActive(active) => {
                self.time.set_preview_active(active);
                Response::Idle
            }
            Event::ReloadMotionData(motions) => Response::Reloaded {
                sets: self.reload_motion_data(motions)?,
            },
            Event::RemoveAxisSet(id) => {
                self.remove_axis_set(id)?;
                Response::AxisSetRemoved(id)
            }
            Event::SetVisibility { id, visible } => {
                self.set_visibility(id, visible)?;
                Response::VisibilityChanged(id)
            }
        };
        Ok(response)
    }

    fn complete_pick(&mut self, pick: PickCompleted) -> Result<AxisSetId, SessionError> {
        self.add_axis_set(pick.method, pick.reference, pick.target)
    }

    fn check_object(&self, object: ObjectId) -> Result<&str, SessionError> {
        self.object_name(object)
            .ok_or(SessionError::UnknownObject(object))
    }

    fn compute_samples(
        &self,
        motions: &[MotionSequence],
        method: Method,
        reference: Option<ObjectId>,
        target: ObjectId,
        timestep_duration: f64,
    ) -> Result<Vec<HelicalAxisSample>, SessionError> {
        let config = FhaConfig {
            timestep_duration,
            singularity_policy: self.singularity_policy,
        };
        let target = motions
            .get(target.0)
            .ok_or(SessionError::UnknownObject(target))?;
        let reference = match reference {
            Some(r) => Some(motions.get(r.0).ok_or(SessionError::UnknownObject(r))?),
            None => None,
        };
        Ok(modes::compute(method, reference, target, &config)?)
    }

    /// Compute and store a new axis set.
    ///
    /// The reference is ignored for [`Method::WorldRelative`]. Nothing is
    /// stored if the computation fails or every color slot is taken.
    pub fn add_axis_set(
        &mut self,
        method: Method,
        reference: Option<ObjectId>,
        target: ObjectId,
    ) -> Result<AxisSetId, SessionError> {
        let reference = reference.filter(|_| method.needs_reference());
        let target_name = self.check_object(target)?.to_string();
        let reference_name = match reference {
            Some(r) => Some(self.check_object(r)?.to_string()),
            None => None,
        };
        if self.palette.available() == 0 {
            return Err(SessionError::PaletteExhausted);
        }

        let timestep_duration = self.time.timestep_duration();
        let samples = self.compute_samples(
            &self.motions,
            method,
            reference,
            target,
            timestep_duration,
        )?;

        let color_tag = self
            .palette
            .allocate()
            .ok_or(SessionError::PaletteExhausted)?;
        let id = AxisSetId(self.next_id);
        self.next_id += 1;

        let name = axis_set_name(method, reference_name.as_deref(), &target_name);
        log::info!(
            "created {name} ({} samples, {} valid)",
            samples.len(),
            samples.iter().filter(|s| s.is_valid()).count()
        );

        self.sets.push(HelicalAxisSet::new(
            id,
            method,
            reference,
            target,
            name,
            timestep_duration,
            color_tag,
            samples,
        ));
        Ok(id)
    }

    /// Delete an axis set and free its color slot.
    pub fn remove_axis_set(&mut self, id: AxisSetId) -> Result<HelicalAxisSet, SessionError> {
        let index = self
            .sets
            .iter()
            .position(|s| s.id == id)
            .ok_or(SessionError::UnknownAxisSet(id))?;
        let set = self.sets.remove(index);
        self.palette.release(set.color_tag);
        log::info!("removed {}", set.name);
        Ok(set)
    }

    /// Show or hide an axis set.
    pub fn set_visibility(&mut self, id: AxisSetId, visible: bool) -> Result<(), SessionError> {
        let set = self
            .sets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SessionError::UnknownAxisSet(id))?;
        set.visible = visible;
        Ok(())
    }

    /// Replace the motions of all objects and recompute every axis set.
    ///
    /// All sets are recomputed before anything is replaced: on error the
    /// session keeps its previous motions and samples. On success the time
    /// window keeps its times and re-derives its indices for the new length.
    pub fn reload_motion_data(
        &mut self,
        motions: Vec<MotionSequence>,
    ) -> Result<usize, SessionError> {
        if motions.len() != self.names.len() {
            return Err(SessionError::ObjectCountMismatch {
                expected: self.names.len(),
                found: motions.len(),
            });
        }
        let steps = check_motions(&motions)?;
        let max_index = steps.saturating_sub(1);
        let timestep_duration = step_duration(self.time.t_span(), max_index);

        let recomputed = self
            .sets
            .iter()
            .map(|set| {
                self.compute_samples(
                    &motions,
                    set.method,
                    set.reference,
                    set.target,
                    timestep_duration,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.motions = motions;
        for (set, samples) in self.sets.iter_mut().zip(recomputed) {
            set.replace_samples(samples, timestep_duration);
        }
        self.time.update_index_range(0, max_index);

        log::info!(
            "reloaded {} objects with {steps} steps, recomputed {} sets",
            self.names.len(),
            self.sets.len()
        );
        Ok(self.sets.len())
    }

    /// Reload the motions of the same objects from `folder`.
    pub fn reload_from_folder(&mut self, folder: impl AsRef<Path>) -> Result<usize, SessionError> {
        let scene = load_scene(folder)?;
        self.reload_motion_data(scene.motions())
    }

    /// Color slots of the visible sets that involve `object`, in creation order.
    pub fn outline_slots(&self, object: ObjectId) -> Vec<usize> {
        self.sets
            .iter()
            .filter(|s| s.visible && s.involves(object))
            .map(|s| s.color_tag)
            .collect()
    }

    /// Render buffers of the set `id` at the scene's glyph scale.
    pub fn glyph_buffers(
        &self,
        id: AxisSetId,
        abs_translation: bool,
    ) -> Result<GlyphBuffers, SessionError> {
        let set = self.axis_set(id).ok_or(SessionError::UnknownAxisSet(id))?;
        let params = GlyphParams {
            scale: self.settings.glyphs_scale,
            abs_translation,
            ..Default::default()
        };
        Ok(build_glyph_buffers(set, &params)?)
    }

    /// Default shader uniforms at the scene's glyph scale.
    pub fn glyph_uniforms(&self, abs_translation: bool) -> GlyphUniforms {
        GlyphUniforms {
            abs_translation,
            ..GlyphUniforms::with_scale(self.settings.glyphs_scale as f32)
        }
    }

    /// Export every visible set to `folder`.
    ///
    /// # Arguments
    ///
    /// * `folder` - Output folder, created if missing.
    /// * `within_window` - Restrict to the samples of the time window.
    /// * `bounds` - Optional rate bounds.
    pub fn export_visible(
        &self,
        folder: impl AsRef<Path>,
        within_window: bool,
        bounds: Option<RateBounds>,
    ) -> Result<Vec<ExportSummary>, SessionError> {
        let filter = ExportFilter {
            index_range: within_window.then(|| self.time.index_range()),
            bounds,
        };
        Ok(export_visible(&self.sets, folder, &filter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helica_fha::RigidPose;

    #[test]
    fn test_axis_set_names() {
        assert_eq!(
            axis_set_name(Method::ReferenceRelative, Some("L1"), "L2"),
            "L2_base_L1"
        );
        assert_eq!(
            axis_set_name(Method::ReferenceRelativeProjectFirst, Some("L1"), "L2"),
            "L2_base_L1_pf"
        );
        assert_eq!(
            axis_set_name(Method::WorldRelative, Some("L1"), "L2"),
            "L2_world"
        );
    }

    #[test]
    fn test_check_motions() {
        let a = MotionSequence::new(vec![RigidPose::default(); 3]);
        let b = MotionSequence::new(vec![RigidPose::default(); 2]);
        assert!(matches!(check_motions(&[]), Err(SessionError::EmptyScene)));
        assert_eq!(check_motions(&[a.clone(), a.clone()]).ok(), Some(3));
        assert!(matches!(
            check_motions(&[a, b]),
            Err(SessionError::SequenceLengthMismatch {
                object: 1,
                expected: 3,
                found: 2
            })
        ));
    }
}
