//! Input/output, configuration and error handling

/// Command-line argument definitions
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error taxonomy shared by every stage
pub mod error;
/// Stderr logging bootstrap
pub mod logging;
/// Progress bars for stack loading
pub mod progress;
/// Slice discovery and decoding
pub mod slices;
/// Slice-stack export
pub mod writer;
