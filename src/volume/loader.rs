//! Stack loading with early voxel-count validation and corrupt-slice repair
//!
//! The first slice fixes the expected (rows, columns) of the whole stack. Any
//! later slice with different dimensions is replaced by the most recent slice
//! that loaded cleanly, so isolated corrupt slices never abort a run. When no
//! later slice matches the first, the first slice itself is rejected.

use crate::io::error::{FusionError, Result};
use crate::io::slices::SliceStore;
use crate::volume::validation::VolumeValidator;
use crate::volume::{SliceDimensions, Volume};
use log::{debug, warn};
use ndarray::{Array2, Axis};
use std::path::PathBuf;

/// Geometry of a stack established from its first slice
#[derive(Debug, Clone)]
pub struct StackSurvey {
    /// Number of slices in the stack
    pub slice_count: usize,
    /// Expected dimensions of every slice
    pub dimensions: SliceDimensions,
    first_slice: Array2<u32>,
}

impl StackSurvey {
    /// Total voxels the stack will occupy once loaded
    pub const fn voxel_count(&self) -> usize {
        self.dimensions.voxel_count(self.slice_count)
    }

    /// Shape (slices, rows, columns) the stack will load with
    pub const fn dim(&self) -> (usize, usize, usize) {
        (self.slice_count, self.dimensions.rows, self.dimensions.cols)
    }
}

/// A slice that was substituted during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRepair {
    /// Depth index of the substituted slice
    pub index: usize,
    /// Depth index whose content was copied in
    pub replaced_with: usize,
    /// Dimensions the corrupt slice actually had
    pub found: SliceDimensions,
    /// Location of the corrupt slice
    pub path: PathBuf,
}

/// Loaded volume together with the repairs applied to it
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// The assembled volume
    pub volume: Volume<u32>,
    /// Substitutions performed, in depth order
    pub repairs: Vec<SliceRepair>,
}

// Most recent depth index that loaded with the expected dimensions
#[derive(Debug, Default)]
struct RepairState {
    last_good: Option<usize>,
    repairs: Vec<SliceRepair>,
}

impl RepairState {
    fn record_good(&mut self, index: usize) {
        self.last_good = Some(index);
    }
}

/// Builds volumes from slice stores
pub struct VolumeLoader;

impl VolumeLoader {
    /// Decode the first slice and count the stack without reading the rest
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::NoValidFirstSlice`] if the stack is empty, or its
    /// first slice fails to decode or has zero rows or columns
    pub fn survey<S: SliceStore + ?Sized>(store: &S, label: &str) -> Result<StackSurvey> {
        let first_path = store.slice_path(0);
        let reject = |reason: String| FusionError::NoValidFirstSlice {
            label: label.to_string(),
            path: first_path.clone(),
            reason,
        };

        let slice_count = store.slice_count();
        if slice_count == 0 {
            return Err(reject("stack contains no slices".to_string()));
        }

        let first_slice = store.read_slice(0).map_err(|e| reject(e.to_string()))?;
        let dimensions = SliceDimensions::of(&first_slice);
        if dimensions.is_empty() {
            return Err(reject(format!(
                "slice has {} rows and {} columns",
                dimensions.rows, dimensions.cols
            )));
        }

        Ok(StackSurvey {
            slice_count,
            dimensions,
            first_slice,
        })
    }

    /// Load a stack whose voxel count must equal `reference_voxel_count`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The first slice is unusable
    /// - The stack's voxel count differs from `reference_voxel_count`
    /// - A later slice cannot be decoded
    pub fn load<S: SliceStore + ?Sized>(
        store: &S,
        reference_voxel_count: usize,
        label: &str,
    ) -> Result<Volume<u32>> {
        Self::load_with_progress(store, reference_voxel_count, label, &mut |_| {})
            .map(|outcome| outcome.volume)
    }

    /// Load a stack, reporting each slice read to `on_slice`
    ///
    /// `on_slice` receives the number of slices processed so far.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VolumeLoader::load`]
    pub fn load_with_progress<S: SliceStore + ?Sized>(
        store: &S,
        reference_voxel_count: usize,
        label: &str,
        on_slice: &mut dyn FnMut(usize),
    ) -> Result<LoadOutcome> {
        let survey = Self::survey(store, label)?;
        VolumeValidator::check_voxel_count(label, survey.voxel_count(), reference_voxel_count)?;
        Self::load_surveyed(store, survey, label, on_slice)
    }

    /// Finish loading a stack that has already been surveyed and validated
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A slice after the first cannot be decoded
    /// - Every later slice disagrees with the first slice's dimensions
    pub fn load_surveyed<S: SliceStore + ?Sized>(
        store: &S,
        survey: StackSurvey,
        label: &str,
        on_slice: &mut dyn FnMut(usize),
    ) -> Result<LoadOutcome> {
        let StackSurvey {
            slice_count,
            dimensions,
            first_slice,
        } = survey;

        let mut volume = Volume::<u32>::zeros(slice_count, dimensions);
        let mut state = RepairState::default();

        volume
            .data
            .index_axis_mut(Axis(0), 0)
            .assign(&first_slice);
        state.record_good(0);
        debug!("Reading {label}, image 1: {}", store.slice_path(0).display());
        on_slice(1);

        for index in 1..slice_count {
            let slice = store.read_slice(index)?;
            let found = SliceDimensions::of(&slice);
            let path = store.slice_path(index);

            if found == dimensions {
                volume.data.index_axis_mut(Axis(0), index).assign(&slice);
                state.record_good(index);
                debug!("Reading {label}, image {}: {}", index + 1, path.display());
            } else {
                let Some(good) = state.last_good else {
                    return Err(FusionError::NoValidFirstSlice {
                        label: label.to_string(),
                        path,
                        reason: "no earlier slice to substitute".to_string(),
                    });
                };
                let source = volume.data.index_axis(Axis(0), good).to_owned();
                volume.data.index_axis_mut(Axis(0), index).assign(&source);

                warn!(
                    "Improper dimensions for {label}, image {}: {} ({} x {}, expected {} x {}); replacing with image {}",
                    index + 1,
                    path.display(),
                    found.cols,
                    found.rows,
                    dimensions.cols,
                    dimensions.rows,
                    good + 1
                );
                state.repairs.push(SliceRepair {
                    index,
                    replaced_with: good,
                    found,
                    path,
                });
            }
            on_slice(index + 1);
        }

        // A first slice that no later slice agrees with is the corrupt one
        if slice_count > 1 && state.repairs.len() == slice_count - 1 {
            return Err(FusionError::NoValidFirstSlice {
                label: label.to_string(),
                path: store.slice_path(0),
                reason: format!(
                    "{} x {} contradicted by every later slice",
                    dimensions.cols, dimensions.rows
                ),
            });
        }

        Ok(LoadOutcome {
            volume,
            repairs: state.repairs,
        })
    }
}
