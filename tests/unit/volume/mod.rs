
#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array3};
    use viewfuse::volume::{SliceDimensions, Volume};

    // Tests voxel count is the product of slice count and slice extent
    // Verified by dropping the slice count factor
    #[test]
    fn test_slice_dimensions_voxel_count() {
        let dims = SliceDimensions { rows: 4, cols: 5 };
        assert_eq!(dims.voxel_count(3), 60);
        assert_eq!(dims.voxel_count(0), 0);
    }

    // Tests dimensions are read as (rows, columns) from a grid
    // Verified by swapping rows and columns
    #[test]
    fn test_slice_dimensions_of_grid() {
        let grid = Array2::<u32>::zeros((2, 7));
        let dims = SliceDimensions::of(&grid);
        assert_eq!(dims, SliceDimensions { rows: 2, cols: 7 });
        assert!(!dims.is_empty());
        assert!(SliceDimensions { rows: 0, cols: 7 }.is_empty());
    }

    // Tests volume accessors agree with the wrapped array
    // Verified by returning width as depth
    #[test]
    fn test_volume_accessors() {
        let volume = Volume::from_array(Array3::from_shape_fn((3, 2, 4), |(d, r, c)| {
            (d * 100 + r * 10 + c) as u32
        }));

        assert_eq!(volume.dim(), (3, 2, 4));
        assert_eq!(volume.depth(), 3);
        assert_eq!(volume.voxel_count(), 24);
        assert_eq!(volume.slice_dimensions(), SliceDimensions { rows: 2, cols: 4 });

        let slice = volume.slice(2).unwrap();
        assert_eq!(slice[[1, 3]], 213);
        assert!(volume.slice(3).is_none());
    }

    // Tests zero allocation uses (depth, rows, columns) order
    // Verified by allocating (rows, depth, columns)
    #[test]
    fn test_volume_zeros_shape() {
        let volume = Volume::<u32>::zeros(5, SliceDimensions { rows: 2, cols: 3 });
        assert_eq!(volume.dim(), (5, 2, 3));
        assert!(volume.data().iter().all(|&v| v == 0));
        assert_eq!(volume.into_data().len(), 30);
    }
}
