//! Cross-stack consistency checks
//!
//! Every stack must hold exactly as many voxels as the reference. After
//! orientation the per-axis shapes must also agree, since voxel-wise fusion
//! pairs samples by position.

use crate::io::error::{FusionError, Result};
use crate::volume::Volume;

/// Stateless checks applied before loading and before fusion
pub struct VolumeValidator;

impl VolumeValidator {
    /// Require `found` voxels to equal the reference's `expected` voxels
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::VolumeSizeMismatch`] naming `label` when they differ
    pub fn check_voxel_count(label: &str, found: usize, expected: usize) -> Result<()> {
        if found == expected {
            Ok(())
        } else {
            Err(FusionError::VolumeSizeMismatch {
                label: label.to_string(),
                found,
                expected,
            })
        }
    }

    /// Require an oriented volume to have the reference's exact shape
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::ShapeMismatch`] naming `label` when any axis differs
    pub fn check_shape<T, U>(label: &str, volume: &Volume<T>, reference: &Volume<U>) -> Result<()> {
        Self::check_dim(label, volume.dim(), reference.dim())
    }

    /// Require a (slices, rows, columns) shape to equal the reference's
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::ShapeMismatch`] naming `label` when any axis differs
    pub fn check_dim(
        label: &str,
        found: (usize, usize, usize),
        expected: (usize, usize, usize),
    ) -> Result<()> {
        if found == expected {
            Ok(())
        } else {
            Err(FusionError::ShapeMismatch {
                label: label.to_string(),
                found,
                expected,
            })
        }
    }
}
