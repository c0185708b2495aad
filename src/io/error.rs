//! Error types and path context for volume loading, alignment and fusion

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum FusionError {
    /// Command-line input is missing, malformed or inconsistent
    InvalidConfiguration {
        /// Description of what's wrong with the input
        reason: String,
    },

    /// Directory holds neither the preferred nor the fallback slice extension
    NoImagesFound {
        /// Directory that was searched
        directory: PathBuf,
    },

    /// A stack's total voxel count differs from the reference stack
    VolumeSizeMismatch {
        /// Name of the offending stack
        label: String,
        /// Voxel count of the offending stack
        found: usize,
        /// Voxel count of the reference stack
        expected: usize,
    },

    /// The first slice of a stack cannot establish the expected slice shape
    ///
    /// Occurs when the first slice:
    /// - Fails to decode
    /// - Decodes to an image with zero rows or columns
    NoValidFirstSlice {
        /// Name of the stack
        label: String,
        /// Path to the first slice
        path: PathBuf,
        /// Why the slice was rejected
        reason: String,
    },

    /// An oriented volume's per-axis shape differs from the reference volume
    ShapeMismatch {
        /// Name of the offending stack
        label: String,
        /// Shape of the offending volume (slices, rows, columns)
        found: (usize, usize, usize),
        /// Shape of the reference volume (slices, rows, columns)
        expected: (usize, usize, usize),
    },

    /// Output directory is already present on disk
    OutputDirectoryExists {
        /// Directory that would have been written
        path: PathBuf,
    },

    /// Fusion was requested over zero volumes
    EmptyFusion,

    /// Failed to decode a slice image
    ImageLoad {
        /// Path to the slice file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to encode a slice image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Logger backend could not be started
    Logging {
        /// Description of the failure
        reason: String,
    },
}

const fn format_shape(shape: (usize, usize, usize)) -> (usize, usize, usize) {
    // Reported as columns x rows x slices, matching the run summary
    (shape.2, shape.1, shape.0)
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration: {reason}")
            }
            Self::NoImagesFound { directory } => {
                write!(
                    f,
                    "{} does not contain valid images (.tif, .png)",
                    directory.display()
                )
            }
            Self::VolumeSizeMismatch {
                label,
                found,
                expected,
            } => {
                write!(
                    f,
                    "Volume of {label} ({found} voxels) does not match that of the reference ({expected} voxels)"
                )
            }
            Self::NoValidFirstSlice {
                label,
                path,
                reason,
            } => {
                write!(
                    f,
                    "First slice of {label} at '{}' is unusable: {reason}",
                    path.display()
                )
            }
            Self::ShapeMismatch {
                label,
                found,
                expected,
            } => {
                let (fc, fr, fs) = format_shape(*found);
                let (ec, er, es) = format_shape(*expected);
                write!(
                    f,
                    "Oriented shape of {label} ({fc} x {fr} x {fs}) does not match the reference ({ec} x {er} x {es})"
                )
            }
            Self::OutputDirectoryExists { path } => {
                write!(f, "Output directory '{}' already exists", path.display())
            }
            Self::EmptyFusion => write!(f, "Fusion requires at least one volume"),
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Logging { reason } => write!(f, "Failed to start logging: {reason}"),
        }
    }
}

impl std::error::Error for FusionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, FusionError>;

/// Attaches the path and operation to raw I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into [`FusionError::FileSystem`] naming `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| FusionError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl From<std::io::Error> for FusionError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid configuration error
pub fn invalid_configuration(reason: &impl ToString) -> FusionError {
    FusionError::InvalidConfiguration {
        reason: reason.to_string(),
    }
}
