//! Multi-view volume alignment and fusion for segmentation confidence stacks
//!
//! Each view of a specimen is a directory of 2D grayscale slices acquired from
//! a different rotational perspective. Views are loaded into 3D volumes,
//! checked against the reference stack's voxel count, turned into the
//! reference frame by exact axis swaps, and reduced voxel-wise into a single
//! fused stack.

#![forbid(unsafe_code)]

/// Voxel-wise reducers and the fuser
pub mod fusion;
/// Input/output operations and error handling
pub mod io;
/// Run configuration and end-to-end orchestration
pub mod pipeline;
/// Volume representation, loading, validation and orientation
pub mod volume;

pub use io::error::{FusionError, Result};
