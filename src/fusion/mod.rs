//! Voxel-wise combination of aligned volumes

/// Reduction over a sequence of same-shaped volumes
pub mod fuser;
/// Reducer selection and per-voxel arithmetic
pub mod mode;

pub use fuser::Fuser;
pub use mode::FusionMode;
