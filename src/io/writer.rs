//! Slice-stack export with 8-bit narrowing

use crate::io::configuration::{MIN_SLICE_INDEX_WIDTH, OUTPUT_EXTENSION, OUTPUT_SAMPLE_MAX};
use crate::io::error::{FusionError, Result, WithPath};
use crate::volume::{SliceDimensions, Volume};
use image::GrayImage;
use ndarray::Axis;
use num_traits::ToPrimitive;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Round and clamp a sample into the written 8-bit range
///
/// Non-finite or unrepresentable samples become 0.
pub fn narrow_sample<T: ToPrimitive>(value: T) -> u8 {
    let value = value.to_f64().unwrap_or(0.0);
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, OUTPUT_SAMPLE_MAX) as u8
}

/// Zero-padded width used for the file names of a stack of `depth` slices
///
/// Wide enough that lexicographic order equals depth order.
pub fn slice_index_width(depth: usize) -> usize {
    let largest = depth.saturating_sub(1);
    let digits = largest.checked_ilog10().map_or(1, |d| d as usize + 1);
    digits.max(MIN_SLICE_INDEX_WIDTH)
}

/// File name of slice `index` within a stack written with `width`
pub fn slice_file_name(index: usize, width: usize) -> String {
    format!("{index:0width$}.{OUTPUT_EXTENSION}")
}

/// Writes volumes as directories of grayscale slices
pub struct VolumeWriter;

impl VolumeWriter {
    /// Write one 8-bit PNG per depth index into a new `output_dir`
    ///
    /// Returns the written paths in depth order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `output_dir` already exists (nothing is written)
    /// - The directory cannot be created
    /// - A slice cannot be encoded or saved
    pub fn write<T>(volume: &Volume<T>, output_dir: &Path) -> Result<Vec<PathBuf>>
    where
        T: Copy + ToPrimitive,
    {
        Self::create_fresh_dir(output_dir)?;

        let SliceDimensions { rows, cols } = volume.slice_dimensions();
        let width = slice_index_width(volume.depth());
        let mut written = Vec::with_capacity(volume.depth());

        for (index, slice) in volume.data().axis_iter(Axis(0)).enumerate() {
            let pixels: Vec<u8> = slice.iter().map(|&v| narrow_sample(v)).collect();
            let path = output_dir.join(slice_file_name(index, width));
            let img = GrayImage::from_raw(cols as u32, rows as u32, pixels).ok_or_else(|| {
                FusionError::FileSystem {
                    path: path.clone(),
                    operation: "assemble slice",
                    source: std::io::Error::new(
                        ErrorKind::InvalidData,
                        "pixel buffer does not match slice dimensions",
                    ),
                }
            })?;
            img.save(&path).map_err(|source| FusionError::ImageExport {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }

        Ok(written)
    }

    // Parents may already exist; the leaf must be created by this call
    fn create_fresh_dir(output_dir: &Path) -> Result<()> {
        if let Some(parent) = output_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
        }
        match std::fs::create_dir(output_dir) {
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(FusionError::OutputDirectoryExists {
                    path: output_dir.to_path_buf(),
                })
            }
            other => other.with_path(output_dir, "create directory"),
        }
    }

    /// Fail if `output_dir` is already present
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::OutputDirectoryExists`] when the path exists
    pub fn ensure_absent(output_dir: &Path) -> Result<()> {
        if output_dir.exists() {
            Err(FusionError::OutputDirectoryExists {
                path: output_dir.to_path_buf(),
            })
        } else {
            Ok(())
        }
    }
}
