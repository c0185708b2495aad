//! Pipeline constants and runtime configuration defaults

// Slice discovery
/// Extension searched first when listing a stack directory (high bit depth)
pub const PREFERRED_EXTENSION: &str = "tif";
/// Extension searched when no preferred-extension slices exist
pub const FALLBACK_EXTENSION: &str = "png";

// Output settings
/// Extension of every written slice
pub const OUTPUT_EXTENSION: &str = "png";
/// Minimum zero-padded width of written slice file names
pub const MIN_SLICE_INDEX_WIDTH: usize = 3;
/// Largest sample value representable in written slices
pub const OUTPUT_SAMPLE_MAX: f64 = 255.0;
/// Fused output directory used when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "fused";
/// Infix between the output directory name and the view number of intermediates
pub const INTERMEDIATE_SUFFIX: &str = "_view";
/// Zero-padded width of the view number in intermediate directory names
pub const INTERMEDIATE_INDEX_WIDTH: usize = 2;

// Fusion
/// Mode name applied when `--mode` is omitted
pub const DEFAULT_FUSION_MODE: &str = "mean";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Logging
/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log filter used with `--quiet`
pub const QUIET_LOG_LEVEL: &str = "warn";
/// Log filter used with `--verbose`
pub const VERBOSE_LOG_LEVEL: &str = "debug";
