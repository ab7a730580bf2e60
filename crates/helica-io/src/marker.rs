use std::path::{Path, PathBuf};

use glam::DVec3;
use helica_fha::MotionSequence;
use helica_linalg::register_sequence;

use crate::error::IoError;
use crate::pose_txt::{object_name, write_motion};
use crate::table::read_table;

/// Suffix of marker files.
pub const MARKER_SUFFIX: &str = "_marker.txt";

/// Marker positions of one object.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecording {
    /// Markers in object coordinates.
    pub reference: Vec<DVec3>,
    /// Observed markers in world coordinates, one entry per timestep.
    pub frames: Vec<Vec<DVec3>>,
}

impl MarkerRecording {
    /// Number of markers per row.
    pub fn num_markers(&self) -> usize {
        self.reference.len()
    }

    /// Number of timesteps.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }
}

/// Path of the marker file of `object` in `folder`.
pub fn marker_file_path(folder: impl AsRef<Path>, object: &str) -> PathBuf {
    folder.as_ref().join(format!("{object}{MARKER_SUFFIX}"))
}

/// Read a marker file.
///
/// Every row holds `x y z` of each marker in turn. The first row gives the
/// markers in object coordinates, all further rows are timesteps in world
/// coordinates. Lines starting with `#` are comments.
pub fn read_markers(path: impl AsRef<Path>) -> Result<MarkerRecording, IoError> {
    let path = path.as_ref();
    let rows = read_table(path, false)?;

    let columns = rows.first().map(|r| r.values.len()).unwrap_or(0);
    if columns == 0 || columns % 3 != 0 {
        return Err(IoError::MarkerColumns {
            path: path.to_path_buf(),
            columns,
        });
    }

    let mut markers = rows
        .into_iter()
        .map(|row| {
            if row.values.len() != columns {
                return Err(IoError::ColumnCount {
                    path: path.to_path_buf(),
                    line: row.line,
                    expected: columns,
                    found: row.values.len(),
                });
            }
            Ok(row
                .values
                .chunks_exact(3)
                .map(|xyz| DVec3::new(xyz[0], xyz[1], xyz[2]))
                .collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let frames = markers.split_off(1);
    let reference = markers.pop().unwrap_or_default();

    Ok(MarkerRecording { reference, frames })
}

/// Register every timestep of a recording against its object-space markers.
pub fn markers_to_motion(
    recording: &MarkerRecording,
    object: &str,
) -> Result<MotionSequence, IoError> {
    let poses = register_sequence(&recording.reference, &recording.frames).map_err(|source| {
        IoError::Registration {
            object: object.to_string(),
            source,
        }
    })?;
    Ok(poses.into())
}

/// Convert a `<name>_marker.txt` file to poses and cache them next to it as
/// `<name>_pos.txt` / `<name>_rot.txt`.
///
/// # Returns
///
/// The object name and its motion.
pub fn convert_marker_file(path: impl AsRef<Path>) -> Result<(String, MotionSequence), IoError> {
    let path = path.as_ref();
    let object = object_name(path).ok_or_else(|| IoError::Parse {
        path: path.to_path_buf(),
        line: 0,
        msg: "file name carries no object name".to_string(),
    })?;

    let recording = read_markers(path)?;
    let motion = markers_to_motion(&recording, &object)?;

    let folder = path.parent().unwrap_or_else(|| Path::new("."));
    write_motion(folder, &object, &motion)?;

    log::info!(
        "converted {} markers x {} frames of '{object}' to poses",
        recording.num_markers(),
        recording.num_frames()
    );

    Ok((object, motion))
}
