//! Tests for the fusion runner's preflight and write behavior

#[cfg(test)]
mod tests {
    use indicatif::{MultiProgress, ProgressDrawTarget};
    use ndarray::Array3;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use viewfuse::FusionError;
    use viewfuse::fusion::FusionMode;
    use viewfuse::io::writer::VolumeWriter;
    use viewfuse::pipeline::{FusionRunner, RunConfig, ViewSpec};
    use viewfuse::volume::{ViewAngles, Volume};

    fn write_stack(dir: &Path, dim: (usize, usize, usize), value: u8) {
        VolumeWriter::write(&Volume::from_array(Array3::from_elem(dim, value)), dir).unwrap();
    }

    fn config(reference: PathBuf, views: Vec<(PathBuf, ViewAngles)>, output: PathBuf) -> RunConfig {
        RunConfig {
            reference_dir: reference,
            views: views
                .into_iter()
                .enumerate()
                .map(|(i, (directory, angles))| ViewSpec {
                    number: i + 1,
                    directory,
                    angles,
                })
                .collect(),
            mode: FusionMode::Mean,
            write_intermediates: false,
            output_dir: output,
            show_progress: false,
        }
    }

    // Tests an identity view fuses with the reference into the output directory
    // Verified by fusing only the view volumes
    #[test]
    fn test_run_identity_mean() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let view = temp.path().join("view");
        write_stack(&reference, (3, 2, 2), 10);
        write_stack(&view, (3, 2, 2), 20);
        let out = temp.path().join("fused");

        let summary = FusionRunner::new(config(
            reference,
            vec![(view, ViewAngles::default())],
            out.clone(),
        ))
        .run()
        .unwrap();

        assert_eq!(summary.shape, (3, 2, 2));
        assert_eq!(summary.fused_slices.len(), 3);
        assert_eq!(summary.repaired_slices, 0);
        let img = image::open(out.join("000.png")).unwrap().to_luma8();
        assert!(img.pixels().all(|p| p.0[0] == 15));
    }

    // Tests a voxel count mismatch fails before any output is created
    // Verified by checking sizes after writing intermediates
    #[test]
    fn test_run_size_mismatch_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let good = temp.path().join("good");
        let bad = temp.path().join("bad");
        write_stack(&reference, (2, 2, 2), 1);
        write_stack(&good, (2, 2, 2), 1);
        write_stack(&bad, (3, 2, 2), 1);
        let out = temp.path().join("fused");

        let mut run_config = config(
            reference,
            vec![(good, ViewAngles::default()), (bad, ViewAngles::default())],
            out.clone(),
        );
        run_config.write_intermediates = true;
        let err = FusionRunner::new(run_config).run().unwrap_err();

        match err {
            FusionError::VolumeSizeMismatch { label, .. } => assert_eq!(label, "View 2"),
            other => panic!("expected VolumeSizeMismatch, got {other:?}"),
        }
        assert!(!out.exists());
        assert!(!temp.path().join("fused_view01").exists());
    }

    // Tests an existing output directory aborts the run untouched
    // Verified by deferring the check until the final write
    #[test]
    fn test_run_existing_output() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let view = temp.path().join("view");
        write_stack(&reference, (2, 2, 2), 1);
        write_stack(&view, (2, 2, 2), 1);
        let out = temp.path().join("fused");
        fs::create_dir(&out).unwrap();

        let result = FusionRunner::new(config(
            reference,
            vec![(view, ViewAngles::default())],
            out.clone(),
        ))
        .run();

        assert!(matches!(
            result,
            Err(FusionError::OutputDirectoryExists { .. })
        ));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    // Tests equal voxel counts with an unrotated mismatched shape are rejected
    // before any stack is loaded or written
    // Verified by fusing on voxel count alone
    #[test]
    fn test_run_shape_mismatch() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let view = temp.path().join("view");
        write_stack(&reference, (2, 3, 4), 1);
        write_stack(&view, (3, 2, 4), 1);
        let out = temp.path().join("fused");

        let mut run_config = config(
            reference,
            vec![(view, ViewAngles::new(0, 0, 90))],
            out.clone(),
        );
        run_config.write_intermediates = true;
        let result = FusionRunner::new(run_config).run();

        match result {
            Err(FusionError::ShapeMismatch {
                label,
                found,
                expected,
            }) => {
                assert_eq!(label, "View 1");
                assert_eq!(found, (3, 2, 4));
                assert_eq!(expected, (2, 3, 4));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
        assert!(!out.exists());
        assert!(!temp.path().join("fused_view01").exists());
    }

    // Tests a rotated view's shape is checked after its quarter turn
    // Verified by comparing the unrotated survey shape
    #[test]
    fn test_run_rotated_shape_accepted() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let view = temp.path().join("view");
        write_stack(&reference, (2, 3, 4), 6);
        write_stack(&view, (3, 2, 4), 6);

        let summary = FusionRunner::new(config(
            reference,
            vec![(view, ViewAngles::new(90, 0, 0))],
            temp.path().join("fused"),
        ))
        .run()
        .unwrap();

        assert_eq!(summary.shape, (2, 3, 4));
    }

    // Tests a shared progress display drives the bars during a run
    // Verified by ignoring show_progress when attaching the display
    #[test]
    fn test_run_with_shared_progress() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let view = temp.path().join("view");
        write_stack(&reference, (3, 2, 2), 2);
        write_stack(&view, (3, 2, 2), 4);

        let mut run_config = config(
            reference,
            vec![(view, ViewAngles::default())],
            temp.path().join("fused"),
        );
        run_config.show_progress = true;
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let summary = FusionRunner::new(run_config)
            .with_progress(multi_progress)
            .run()
            .unwrap();

        assert_eq!(summary.fused_slices.len(), 3);
    }

    // Tests intermediates are written per view when enabled
    // Verified by skipping the intermediate write
    #[test]
    fn test_run_writes_intermediates() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("ref");
        let view = temp.path().join("view");
        write_stack(&reference, (2, 2, 2), 4);
        write_stack(&view, (2, 2, 2), 8);
        let out = temp.path().join("fused");

        let mut run_config = config(reference, vec![(view, ViewAngles::default())], out);
        run_config.write_intermediates = true;
        let summary = FusionRunner::new(run_config).run().unwrap();

        let intermediate = temp.path().join("fused_view01");
        assert_eq!(summary.intermediate_dirs, vec![intermediate.clone()]);
        assert_eq!(fs::read_dir(&intermediate).unwrap().count(), 2);
    }
}
