//! Command-line interface for multi-view volume fusion

use crate::io::configuration::{
    DEFAULT_FUSION_MODE, DEFAULT_LOG_LEVEL, DEFAULT_OUTPUT_DIR, QUIET_LOG_LEVEL,
    VERBOSE_LOG_LEVEL,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "viewfuse")]
#[command(
    author,
    version,
    about = "Align rotated segmentation stacks to a reference stack and fuse them voxel-wise"
)]
/// Command-line arguments for the fusion tool
pub struct Cli {
    /// Directory holding the unrotated (0,0,0 degree) reference stack
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Comma-separated list of directories containing rotated stacks
    #[arg(long, value_name = "DIRECTORIES", value_delimiter = ',', required = true)]
    pub dirs: Vec<PathBuf>,

    /// Comma-separated X rotation angles, one per entry of --dirs
    #[arg(
        long = "x",
        value_name = "ANGLES",
        value_delimiter = ',',
        required = true,
        allow_negative_numbers = true
    )]
    pub x_angles: Vec<i32>,

    /// Comma-separated Y rotation angles, one per entry of --dirs
    #[arg(
        long = "y",
        value_name = "ANGLES",
        value_delimiter = ',',
        required = true,
        allow_negative_numbers = true
    )]
    pub y_angles: Vec<i32>,

    /// Comma-separated Z rotation angles, one per entry of --dirs
    #[arg(
        long = "z",
        value_name = "ANGLES",
        value_delimiter = ',',
        required = true,
        allow_negative_numbers = true
    )]
    pub z_angles: Vec<i32>,

    /// Fusion mode: mean, gmean or max (anything else falls back to mean)
    #[arg(long, value_name = "MODE", default_value = DEFAULT_FUSION_MODE)]
    pub mode: String,

    /// Also write each oriented view stack before fusion
    #[arg(long = "write_intermediates")]
    pub write_intermediates: bool,

    /// Directory to create for the fused stack
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Suppress progress output and informational logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every slice read
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by --quiet / --verbose
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            QUIET_LOG_LEVEL
        } else if self.verbose {
            VERBOSE_LOG_LEVEL
        } else {
            DEFAULT_LOG_LEVEL
        }
    }
}
