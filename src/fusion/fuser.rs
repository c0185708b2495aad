//! Voxel-wise reduction of aligned volumes
//!
//! Samples are accumulated in `f64` so sums and products never overflow and
//! fractional results survive until the writer narrows them.

use crate::fusion::mode::FusionMode;
use crate::io::error::{FusionError, Result};
use crate::volume::Volume;
use crate::volume::validation::VolumeValidator;
use ndarray::{Array3, Zip};
use num_traits::ToPrimitive;

/// Combines aligned volumes into one
pub struct Fuser;

impl Fuser {
    /// Reduce `volumes` position by position under `mode`
    ///
    /// Every volume must share the first volume's exact shape.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `volumes` is empty
    /// - Any volume's shape differs from the first one's
    pub fn fuse<T>(volumes: &[Volume<T>], mode: FusionMode) -> Result<Volume<f64>>
    where
        T: Copy + ToPrimitive,
    {
        let (first, rest) = volumes.split_first().ok_or(FusionError::EmptyFusion)?;
        for (index, volume) in rest.iter().enumerate() {
            VolumeValidator::check_shape(&format!("volume {}", index + 2), volume, first)?;
        }

        let mut acc = Array3::from_elem(first.dim(), mode.identity());
        for volume in volumes {
            Zip::from(&mut acc)
                .and(volume.data())
                .for_each(|a, &value| *a = mode.accumulate(*a, sample(value)));
        }

        let count = volumes.len();
        acc.mapv_inplace(|a| mode.finish(a, count));
        Ok(Volume::from_array(acc))
    }
}

fn sample<T: ToPrimitive>(value: T) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
