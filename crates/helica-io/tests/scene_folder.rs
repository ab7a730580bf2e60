use std::path::Path;

use glam::{DMat3, DVec3};
use helica_fha::{
    compute, AxisSetId, FhaConfig, HelicalAxisSample, HelicalAxisSet, Method, MotionSequence,
    ObjectId, RigidPose, SampleKind,
};
use helica_io::{
    export::{export_file_paths, export_visible},
    export_axis_set, load_scene,
    pose_txt::write_motion,
    table::read_table,
    ExportFilter, IoError, RateBounds,
};

fn turning(steps: usize, rate: f64) -> MotionSequence {
    (0..steps)
        .map(|i| {
            RigidPose::new(
                DMat3::from_rotation_z(rate * i as f64),
                DVec3::new(0.0, 0.0, 0.1 * i as f64),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

fn write_markers(folder: &Path, name: &str, motion: &MotionSequence) -> std::io::Result<()> {
    let object = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
    ];
    let row = |points: &[DVec3]| {
        points
            .iter()
            .map(|p| format!("{} {} {}", p.x, p.y, p.z))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut text = format!("# {name}\n{}\n", row(&object[..]));
    for pose in motion.poses() {
        let observed = object.map(|p| pose.transform_point(p));
        text.push_str(&row(&observed[..]));
        text.push('\n');
    }
    std::fs::write(folder.join(format!("{name}_marker.txt")), text)
}

#[test]
fn test_load_scene_sorted_with_marker_conversion() -> Result<(), IoError> {
    let dir = tempfile::tempdir()?;
    write_motion(dir.path(), "L3", &turning(5, 0.1))?;
    write_motion(dir.path(), "L1", &turning(5, 0.2))?;
    write_markers(dir.path(), "L2", &turning(5, 0.3))?;
    std::fs::write(dir.path().join("settings.txt"), "time_end 2.0\n")?;

    let scene = load_scene(dir.path())?;
    assert_eq!(scene.names(), vec!["L1", "L2", "L3"]);
    assert_eq!(scene.num_steps(), 5);
    assert_eq!(scene.find("L2"), Some(ObjectId(1)));

    let converted = &scene.objects[1].motion;
    assert!(converted.poses()[4]
        .rotation
        .abs_diff_eq(DMat3::from_rotation_z(1.2), 1e-9));
    assert!(dir.path().join("L2_pos.txt").exists());
    assert!(dir.path().join("L2_rot.txt").exists());

    // the second load reads the cache and gives the same motion
    let again = load_scene(dir.path())?;
    for (a, b) in again.objects[1].motion.poses().iter().zip(converted.poses()) {
        assert!(a.rotation.abs_diff_eq(b.rotation, 1e-12));
    }
    Ok(())
}

#[test]
fn test_load_scene_rejects_inconsistent_folders() -> Result<(), IoError> {
    let dir = tempfile::tempdir()?;
    write_motion(dir.path(), "A", &turning(5, 0.1))?;
    write_motion(dir.path(), "B", &turning(4, 0.1))?;
    assert!(matches!(
        load_scene(dir.path()),
        Err(IoError::SequenceLengthMismatch {
            expected: 5,
            found: 4,
            ..
        })
    ));

    let dir = tempfile::tempdir()?;
    write_motion(dir.path(), "A", &turning(3, 0.1))?;
    std::fs::remove_file(dir.path().join("A_rot.txt"))?;
    match load_scene(dir.path()) {
        Err(IoError::MissingPoseFile { object, path }) => {
            assert_eq!(object, "A");
            assert!(path.ends_with("A_rot.txt"));
        }
        other => panic!("expected a missing file, got {other:?}"),
    }

    let empty = tempfile::tempdir()?;
    assert!(matches!(load_scene(empty.path()), Err(IoError::EmptyScene(_))));
    Ok(())
}

fn exported_rows(path: &Path) -> Result<Vec<Vec<f64>>, IoError> {
    Ok(read_table(path, false)?.into_iter().map(|r| r.values).collect())
}

#[test]
fn test_export_filters_samples() -> Result<(), IoError> {
    let motion = turning(6, 0.1);
    let mut samples = compute(Method::WorldRelative, None, &motion, &FhaConfig::default())
        .map_err(|e| IoError::Parse {
            path: "motion".into(),
            line: 0,
            msg: e.to_string(),
        })?;
    samples[1] = HelicalAxisSample::invalid(SampleKind::Identity);
    samples[3].phi = 10.0;

    let set = HelicalAxisSet::new(
        AxisSetId(0),
        Method::WorldRelative,
        None,
        ObjectId(0),
        "T_world".to_string(),
        1.0,
        0,
        samples,
    );

    let dir = tempfile::tempdir()?;
    let folder = dir.path().join("FHA_export");

    // everything valid
    let summary = export_axis_set(&set, &folder, &ExportFilter::default())?;
    assert_eq!(summary.rows, 4);
    let [n, r0, l, phi] = export_file_paths(&folder, "T_world");
    assert_eq!(exported_rows(&n)?.len(), 4);
    assert_eq!(exported_rows(&r0)?[0].len(), 3);
    assert!((exported_rows(&l)?[0][0] - 0.1).abs() < 1e-12);

    // window 0..4 and phi bounds drop the invalid and the outlier sample
    let filter = ExportFilter {
        index_range: Some(0..4),
        bounds: Some(RateBounds {
            phi_min: 0.0,
            phi_max: 1.0,
            l_min: -1.0,
            l_max: 1.0,
        }),
    };
    assert_eq!(export_axis_set(&set, &folder, &filter)?.rows, 2);
    let phis = exported_rows(&phi)?;
    assert_eq!(phis.len(), 2);
    assert!((phis[0][0] - 0.1).abs() < 1e-12);

    // hidden sets are skipped
    let mut hidden = set.clone();
    hidden.visible = false;
    assert_eq!(export_visible([&set, &hidden], &folder, &filter)?.len(), 1);
    Ok(())
}
