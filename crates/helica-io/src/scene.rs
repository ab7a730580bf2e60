use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use helica_fha::{MotionSequence, ObjectId};

use crate::error::IoError;
use crate::marker::{convert_marker_file, MARKER_SUFFIX};
use crate::pose_txt::{object_name, pose_file_paths, read_motion, POS_SUFFIX, ROT_SUFFIX};

/// One tracked object of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Object name, taken from its file names.
    pub name: String,
    /// Its motion, one pose per animation step.
    pub motion: MotionSequence,
}

/// All tracked objects of a folder, sorted by name, with equal sequence lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Folder the scene was loaded from.
    pub folder: PathBuf,
    /// The objects; an object's [`ObjectId`] is its index.
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of animation steps shared by all objects.
    pub fn num_steps(&self) -> usize {
        self.objects.first().map_or(0, |o| o.motion.len())
    }

    /// Look up an object by name.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(ObjectId)
    }

    /// Object names, in id order.
    pub fn names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    /// Motions, in id order.
    pub fn motions(&self) -> Vec<MotionSequence> {
        self.objects.iter().map(|o| o.motion.clone()).collect()
    }
}

#[derive(Debug, Default)]
struct ObjectFiles {
    pos: Option<PathBuf>,
    rot: Option<PathBuf>,
    marker: Option<PathBuf>,
}

fn scan_folder(folder: &Path) -> Result<BTreeMap<String, ObjectFiles>, IoError> {
    let mut objects = BTreeMap::<String, ObjectFiles>::new();

    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let Some(name) = object_name(&path) else {
            continue;
        };

        let files = objects.entry(name).or_default();
        if file_name.ends_with(POS_SUFFIX) {
            files.pos = Some(path);
        } else if file_name.ends_with(ROT_SUFFIX) {
            files.rot = Some(path);
        } else if file_name.ends_with(MARKER_SUFFIX) {
            files.marker = Some(path);
        }
    }

    // names picked up from unrelated files
    objects.retain(|_, f| f.pos.is_some() || f.rot.is_some() || f.marker.is_some());
    Ok(objects)
}

/// Load every tracked object of `folder`.
///
/// Objects with a `_pos.txt` / `_rot.txt` pair are read directly. Objects
/// that only have a `_marker.txt` file are registered first, and the
/// resulting pose pair is cached in the folder. Loading is all or nothing.
pub fn load_scene(folder: impl AsRef<Path>) -> Result<Scene, IoError> {
    let folder = folder.as_ref();
    let files = scan_folder(folder)?;
    if files.is_empty() {
        return Err(IoError::EmptyScene(folder.to_path_buf()));
    }

    let mut objects: Vec<SceneObject> = Vec::with_capacity(files.len());
    for (name, files) in files {
        let motion = match files {
            ObjectFiles {
                pos: Some(pos),
                rot: Some(rot),
                ..
            } => read_motion(&pos, &rot, &name)?,
            ObjectFiles {
                marker: Some(marker),
                ..
            } => convert_marker_file(&marker)?.1,
            ObjectFiles { pos, .. } => {
                let (pos_path, rot_path) = pose_file_paths(folder, &name);
                let path = if pos.is_none() { pos_path } else { rot_path };
                return Err(IoError::MissingPoseFile { object: name, path });
            }
        };

        if let Some(first) = objects.first() {
            if motion.len() != first.motion.len() {
                return Err(IoError::SequenceLengthMismatch {
                    object: name,
                    expected: first.motion.len(),
                    found: motion.len(),
                });
            }
        }
        objects.push(SceneObject { name, motion });
    }

    let scene = Scene {
        folder: folder.to_path_buf(),
        objects,
    };
    log::info!(
        "loaded {} objects with {} steps from {}",
        scene.len(),
        scene.num_steps(),
        folder.display()
    );
    Ok(scene)
}
