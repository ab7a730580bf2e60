use std::path::{Path, PathBuf};

use glam::{DMat3, DVec3};
use helica_fha::MotionSequence;
use helica_linalg::rotation::{mat3_from_row_major, mat3_to_row_major};

use crate::error::IoError;
use crate::table::{read_fixed_table, write_table};

/// Suffix of position files.
pub const POS_SUFFIX: &str = "_pos.txt";
/// Suffix of rotation files.
pub const ROT_SUFFIX: &str = "_rot.txt";

/// The object name encoded in a motion file name: everything up to the first `_`.
///
/// Example:
///
/// ```
/// use helica_io::pose_txt::object_name;
///
/// assert_eq!(object_name("data/L4_pos.txt").as_deref(), Some("L4"));
/// assert_eq!(object_name("Femur_left_marker.txt").as_deref(), Some("Femur"));
/// ```
pub fn object_name(path: impl AsRef<Path>) -> Option<String> {
    let file_name = path.as_ref().file_name()?.to_str()?;
    let name = file_name.split('_').next()?;
    if name.is_empty() || name == file_name {
        return None;
    }
    Some(name.to_string())
}

/// Paths of the position and rotation files of `object` in `folder`.
pub fn pose_file_paths(folder: impl AsRef<Path>, object: &str) -> (PathBuf, PathBuf) {
    let folder = folder.as_ref();
    (
        folder.join(format!("{object}{POS_SUFFIX}")),
        folder.join(format!("{object}{ROT_SUFFIX}")),
    )
}

/// Read a position file: a header row, then one `x y z` row per timestep.
pub fn read_positions(path: impl AsRef<Path>) -> Result<Vec<DVec3>, IoError> {
    Ok(read_fixed_table::<3>(path, true)?
        .into_iter()
        .map(DVec3::from_array)
        .collect())
}

/// Read a rotation file: a header row, then one row-major 3x3 matrix per timestep.
pub fn read_rotations(path: impl AsRef<Path>) -> Result<Vec<DMat3>, IoError> {
    Ok(read_fixed_table::<9>(path, true)?
        .iter()
        .map(mat3_from_row_major)
        .collect())
}

/// Read a position/rotation file pair into a motion sequence.
///
/// # Arguments
///
/// * `pos_path` - The `<name>_pos.txt` file.
/// * `rot_path` - The `<name>_rot.txt` file.
/// * `object` - The object name, for error reporting.
///
/// # Errors
///
/// [`IoError::PoseRowMismatch`] if both files differ in their number of rows.
pub fn read_motion(
    pos_path: impl AsRef<Path>,
    rot_path: impl AsRef<Path>,
    object: &str,
) -> Result<MotionSequence, IoError> {
    let positions = read_positions(pos_path)?;
    let rotations = read_rotations(rot_path)?;

    if positions.len() != rotations.len() {
        return Err(IoError::PoseRowMismatch {
            object: object.to_string(),
            positions: positions.len(),
            rotations: rotations.len(),
        });
    }

    Ok(MotionSequence::from_parts(&rotations, &positions))
}

/// Write positions with a `#` header row.
pub fn write_positions(path: impl AsRef<Path>, positions: &[DVec3]) -> Result<(), IoError> {
    let rows = positions.iter().map(|p| p.to_array()).collect::<Vec<_>>();
    write_table(path, Some("x y z"), rows.iter().map(|r| r.as_slice()))
}

/// Write row-major rotations with a `#` header row.
pub fn write_rotations(path: impl AsRef<Path>, rotations: &[DMat3]) -> Result<(), IoError> {
    let rows = rotations.iter().map(mat3_to_row_major).collect::<Vec<_>>();
    write_table(
        path,
        Some("r00 r01 r02 r10 r11 r12 r20 r21 r22"),
        rows.iter().map(|r| r.as_slice()),
    )
}

/// Write the pose file pair of `object` into `folder`.
pub fn write_motion(
    folder: impl AsRef<Path>,
    object: &str,
    motion: &MotionSequence,
) -> Result<(), IoError> {
    let (pos_path, rot_path) = pose_file_paths(folder, object);
    let positions = motion
        .poses()
        .iter()
        .map(|p| p.translation)
        .collect::<Vec<_>>();
    let rotations = motion.poses().iter().map(|p| p.rotation).collect::<Vec<_>>();

    write_positions(&pos_path, &positions)?;
    write_rotations(&rot_path, &rotations)?;

    log::debug!(
        "wrote {} poses of '{object}' to {}",
        motion.len(),
        pos_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helica_fha::RigidPose;

    #[test]
    fn test_object_name() {
        assert_eq!(object_name("L1_rot.txt").as_deref(), Some("L1"));
        assert_eq!(object_name("/a/b_c/L2_pos.txt").as_deref(), Some("L2"));
        assert_eq!(object_name("settings.txt"), None);
        assert_eq!(object_name("_pos.txt"), None);
    }

    #[test]
    fn test_rotation_rows_are_row_major() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("A_rot.txt");
        // quarter turn about z, written row by row
        std::fs::write(&path, "header\n0 -1 0 1 0 0 0 0 1\n")?;

        let rotations = read_rotations(&path)?;
        assert_eq!(rotations.len(), 1);
        assert!((rotations[0] * DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
        Ok(())
    }

    #[test]
    fn test_motion_files_survive_a_write_read_cycle() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let motion: MotionSequence = (0..4)
            .map(|i| {
                RigidPose::new(
                    DMat3::from_rotation_x(0.3 * i as f64),
                    DVec3::new(i as f64, -0.5, 1e-3),
                )
            })
            .collect::<Vec<_>>()
            .into();

        write_motion(dir.path(), "C3", &motion)?;
        let (pos, rot) = pose_file_paths(dir.path(), "C3");
        let loaded = read_motion(&pos, &rot, "C3")?;

        assert_eq!(loaded.len(), 4);
        for (a, b) in loaded.poses().iter().zip(motion.poses()) {
            assert!(a.rotation.abs_diff_eq(b.rotation, 1e-15));
            assert!(a.translation.abs_diff_eq(b.translation, 1e-15));
        }
        Ok(())
    }

    #[test]
    fn test_pose_row_mismatch() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let (pos, rot) = pose_file_paths(dir.path(), "T1");
        std::fs::write(&pos, "# x y z\n0 0 0\n1 1 1\n")?;
        std::fs::write(&rot, "# r\n1 0 0 0 1 0 0 0 1\n")?;

        match read_motion(&pos, &rot, "T1") {
            Err(IoError::PoseRowMismatch {
                object,
                positions,
                rotations,
            }) => {
                assert_eq!(object, "T1");
                assert_eq!((positions, rotations), (2, 1));
            }
            other => panic!("expected a row mismatch, got {other:?}"),
        }
        Ok(())
    }
}
