//! Ordered slice discovery and single-slice decoding
//!
//! A stack is a flat directory of 2D grayscale images whose lexicographic file
//! name order defines the depth axis. Multi-channel encodings are reduced to
//! their first channel so every decoded slice is a plain 2D grid.

use crate::io::configuration::{FALLBACK_EXTENSION, PREFERRED_EXTENSION};
use crate::io::error::{FusionError, Result, WithPath};
use image::{DynamicImage, ImageBuffer, Pixel};
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Ordered source of 2D slices forming one stack
pub trait SliceStore {
    /// Number of slices in the stack
    fn slice_count(&self) -> usize;

    /// Decode the slice at `index` into a (rows, columns) grid
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the slice cannot be decoded
    fn read_slice(&self, index: usize) -> Result<Array2<u32>>;

    /// Human-readable location of the slice at `index`, used in diagnostics
    fn slice_path(&self, index: usize) -> PathBuf;
}

/// Slice files discovered in one directory
#[derive(Debug, Clone)]
pub struct DirectorySliceStore {
    directory: PathBuf,
    paths: Vec<PathBuf>,
}

impl DirectorySliceStore {
    /// List the slices of `directory`
    ///
    /// Files with the preferred extension win; the fallback extension is only
    /// consulted when none exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be read
    /// - Neither supported extension yields any file
    pub fn open(directory: impl AsRef<Path>) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        let mut paths = list_with_extension(&directory, PREFERRED_EXTENSION)?;
        if paths.is_empty() {
            paths = list_with_extension(&directory, FALLBACK_EXTENSION)?;
        }
        if paths.is_empty() {
            return Err(FusionError::NoImagesFound { directory });
        }

        Ok(Self { directory, paths })
    }

    /// Directory the slices were listed from
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl SliceStore for DirectorySliceStore {
    fn slice_count(&self) -> usize {
        self.paths.len()
    }

    fn read_slice(&self, index: usize) -> Result<Array2<u32>> {
        let path = self
            .paths
            .get(index)
            .ok_or_else(|| FusionError::FileSystem {
                path: self.directory.clone(),
                operation: "read slice",
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("slice index {index} out of range"),
                ),
            })?;
        decode_slice(path)
    }

    fn slice_path(&self, index: usize) -> PathBuf {
        self.paths
            .get(index)
            .cloned()
            .unwrap_or_else(|| self.directory.clone())
    }
}

// File names compare byte-wise so the depth order never depends on locale
fn list_with_extension(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(directory).with_path(directory, "read directory")? {
        let path = entry.with_path(directory, "read directory entry")?.path();
        let matches = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Decode one slice file into a (rows, columns) grid of raw sample values
///
/// 8-bit and 16-bit encodings keep their native range. Extra channels
/// (alpha, RGB) are dropped by keeping only the first channel.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn decode_slice(path: &Path) -> Result<Array2<u32>> {
    let img = image::open(path).map_err(|source| FusionError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(first_channel_grid(&img))
}

/// Reduce a decoded image to a 2D grid of its first channel
pub fn first_channel_grid(img: &DynamicImage) -> Array2<u32> {
    match img {
        DynamicImage::ImageLuma8(buf) => channel_zero(buf),
        DynamicImage::ImageLumaA8(buf) => channel_zero(buf),
        DynamicImage::ImageRgb8(buf) => channel_zero(buf),
        DynamicImage::ImageRgba8(buf) => channel_zero(buf),
        DynamicImage::ImageLuma16(buf) => channel_zero(buf),
        DynamicImage::ImageLumaA16(buf) => channel_zero(buf),
        DynamicImage::ImageRgb16(buf) => channel_zero(buf),
        DynamicImage::ImageRgba16(buf) => channel_zero(buf),
        other => channel_zero(&other.to_rgba16()),
    }
}

fn channel_zero<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>) -> Array2<u32>
where
    P: Pixel,
    P::Subpixel: Into<u32>,
{
    let (width, height) = buf.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        buf.get_pixel(col as u32, row as u32)
            .channels()
            .first()
            .map_or(0, |&value| value.into())
    })
}

/// Stack held in memory, for callers that already have decoded slices
#[derive(Debug, Clone, Default)]
pub struct MemorySliceStore {
    slices: Vec<Array2<u32>>,
}

impl MemorySliceStore {
    /// Build a store from slices in depth order
    pub const fn new(slices: Vec<Array2<u32>>) -> Self {
        Self { slices }
    }
}

impl SliceStore for MemorySliceStore {
    fn slice_count(&self) -> usize {
        self.slices.len()
    }

    fn read_slice(&self, index: usize) -> Result<Array2<u32>> {
        self.slices
            .get(index)
            .cloned()
            .ok_or_else(|| FusionError::FileSystem {
                path: self.slice_path(index),
                operation: "read slice",
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("slice index {index} out of range"),
                ),
            })
    }

    fn slice_path(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("<memory>/{index}"))
    }
}
