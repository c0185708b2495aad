//! Volume representation and per-stack processing
//!
//! This module contains volume-related functionality including:
//! - The owned 3D sample grid and its slice geometry
//! - Loading stacks with corrupt-slice repair
//! - Voxel-count and shape validation
//! - Axis-swap orientation into the reference frame

/// Stack loading with corrupt-slice substitution
pub mod loader;
/// Axis-aligned quarter-turn orientation
pub mod orientation;
/// Cross-stack geometric consistency checks
pub mod validation;

use ndarray::{Array2, Array3, ArrayView2, Axis};

pub use loader::VolumeLoader;
pub use orientation::{Orienter, Rotation, ViewAngles};
pub use validation::VolumeValidator;

/// Row and column extent shared by every slice of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceDimensions {
    /// Number of rows per slice
    pub rows: usize,
    /// Number of columns per slice
    pub cols: usize,
}

impl SliceDimensions {
    /// Dimensions of a decoded slice grid
    pub fn of<T>(slice: &Array2<T>) -> Self {
        let (rows, cols) = slice.dim();
        Self { rows, cols }
    }

    /// Total voxels in a stack of `slice_count` slices with these dimensions
    pub const fn voxel_count(&self, slice_count: usize) -> usize {
        slice_count * self.rows * self.cols
    }

    /// Whether either extent is zero
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// 3D sample grid ordered (slice, row, column)
///
/// Owned by exactly one pipeline stage at a time; stages take it by value and
/// hand back a new or mutated volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    data: Array3<T>,
}

impl<T> Volume<T> {
    /// Wrap an existing array
    pub const fn from_array(data: Array3<T>) -> Self {
        Self { data }
    }

    /// Get the dimensions of the volume (slices, rows, columns)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of slices along the depth axis
    pub fn depth(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Row and column extent of each slice
    pub fn slice_dimensions(&self) -> SliceDimensions {
        let (_, rows, cols) = self.dim();
        SliceDimensions { rows, cols }
    }

    /// Total number of voxels
    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to the underlying data
    pub const fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Consume the volume, returning the underlying data
    pub fn into_data(self) -> Array3<T> {
        self.data
    }

    /// View of the slice at `index` along the depth axis
    pub fn slice(&self, index: usize) -> Option<ArrayView2<'_, T>> {
        (index < self.depth()).then(|| self.data.index_axis(Axis(0), index))
    }
}

impl<T: Clone + num_traits::Zero> Volume<T> {
    /// Allocate a zero-filled volume
    pub fn zeros(depth: usize, dimensions: SliceDimensions) -> Self {
        Self {
            data: Array3::zeros((depth, dimensions.rows, dimensions.cols)),
        }
    }
}
