//! Tests for slice-stack export, narrowing and round-trip ordering

#[cfg(test)]
mod tests {
    use ndarray::Array3;
    use std::fs;
    use tempfile::TempDir;
    use viewfuse::FusionError;
    use viewfuse::io::slices::DirectorySliceStore;
    use viewfuse::io::writer::{VolumeWriter, narrow_sample, slice_file_name, slice_index_width};
    use viewfuse::volume::{Volume, VolumeLoader};

    // Tests narrowing rounds and clamps into 0..=255
    // Verified by truncating instead of rounding
    #[test]
    fn test_narrow_sample() {
        assert_eq!(narrow_sample(3.5_f64), 4);
        assert_eq!(narrow_sample(3.49_f64), 3);
        assert_eq!(narrow_sample(-2.0_f64), 0);
        assert_eq!(narrow_sample(300.0_f64), 255);
        assert_eq!(narrow_sample(f64::NAN), 0);
        assert_eq!(narrow_sample(65_535_u32), 255);
        assert_eq!(narrow_sample(17_u32), 17);
    }

    // Tests file names are zero-padded wide enough to sort in depth order
    // Verified by fixing the width at three digits
    #[test]
    fn test_slice_names() {
        assert_eq!(slice_index_width(1), 3);
        assert_eq!(slice_index_width(1000), 3);
        assert_eq!(slice_index_width(1001), 4);
        assert_eq!(slice_file_name(7, 3), "007.png");
        assert_eq!(slice_file_name(42, 4), "0042.png");
    }

    // Tests writing then loading reproduces depth order and values
    // Verified by writing slices in reverse order
    #[test]
    fn test_round_trip() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("stack");
        let volume = Volume::from_array(Array3::from_shape_fn((12, 3, 5), |(d, r, c)| {
            (d * 20 + r * 5 + c) as u32
        }));

        let written = VolumeWriter::write(&volume, &out).unwrap();
        assert_eq!(written.len(), 12);

        let store = DirectorySliceStore::open(&out).unwrap();
        let loaded = VolumeLoader::load(&store, volume.voxel_count(), "Round trip").unwrap();
        assert_eq!(loaded, volume);
    }

    // Tests fused fractional values are narrowed only at write time
    // Verified by truncating fractional samples
    #[test]
    fn test_write_narrows_fractional_values() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("fused");
        let volume = Volume::from_array(Array3::from_shape_vec(
            (1, 1, 4),
            vec![2.5_f64, 3.4, 299.0, -1.0],
        )
        .unwrap());

        VolumeWriter::write(&volume, &out).unwrap();

        let store = DirectorySliceStore::open(&out).unwrap();
        let loaded = VolumeLoader::load(&store, 4, "Fused").unwrap();
        let values: Vec<u32> = loaded.data().iter().copied().collect();
        assert_eq!(values, vec![3, 3, 255, 0]);
    }

    // Tests an existing output directory is refused without writing files
    // Verified by merging into the existing directory
    #[test]
    fn test_existing_directory_rejected() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("fused");
        fs::create_dir(&out).unwrap();
        let volume = Volume::from_array(Array3::<u32>::zeros((2, 2, 2)));

        let result = VolumeWriter::write(&volume, &out);

        assert!(matches!(
            result,
            Err(FusionError::OutputDirectoryExists { .. })
        ));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    // Tests any existing entry at the output path is refused at creation time
    // Verified by creating the directory with create_dir_all
    #[test]
    fn test_existing_file_at_output_rejected() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("fused");
        fs::write(&out, b"keep").unwrap();
        let volume = Volume::from_array(Array3::<u32>::zeros((1, 2, 2)));

        let result = VolumeWriter::write(&volume, &out);

        match result {
            Err(FusionError::OutputDirectoryExists { path }) => assert_eq!(path, out),
            other => panic!("expected OutputDirectoryExists, got {other:?}"),
        }
        assert_eq!(fs::read(&out).unwrap(), b"keep");
    }

    // Tests missing parent directories are created for a new output directory
    // Verified by creating only the leaf directory
    #[test]
    fn test_missing_parents_created() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("runs").join("first").join("fused");
        let volume = Volume::from_array(Array3::<u32>::from_elem((2, 1, 3), 9));

        let written = VolumeWriter::write(&volume, &out).unwrap();

        assert_eq!(written, vec![out.join("000.png"), out.join("001.png")]);
        let img = image::open(&written[1]).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (3, 1));
    }
}
