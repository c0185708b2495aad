//! Quarter-turn orientation of view volumes into the reference frame
//!
//! Only two view orientations are recognised, each an exact -90° turn in one
//! axis plane. The turn is a pure axis permutation plus one axis reversal, so
//! no sample is ever interpolated.

use crate::volume::Volume;
use log::warn;
use ndarray::Axis;

/// Rotation angles of a view relative to the reference, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewAngles {
    /// Rotation about X
    pub x: i32,
    /// Rotation about Y
    pub y: i32,
    /// Rotation about Z
    pub z: i32,
}

impl ViewAngles {
    /// Construct from the three angles
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Whether all three angles are zero
    pub const fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }
}

/// Axis-aligned transform that brings a view into the reference frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Volume is already in the reference frame
    Identity,
    /// -90° in the (slice, row) plane; rows become the depth axis
    QuarterTurnSliceRow,
    /// -90° in the (slice, column) plane; columns become the depth axis
    QuarterTurnSliceColumn,
}

impl Rotation {
    /// Map declared view angles to a rotation
    ///
    /// Combinations other than (90, 0, 0) and (0, 90, 0) map to the identity,
    /// including ones that are not actually unrotated.
    pub const fn from_angles(angles: ViewAngles) -> Self {
        match (angles.x, angles.y, angles.z) {
            (90, 0, 0) => Self::QuarterTurnSliceRow,
            (0, 90, 0) => Self::QuarterTurnSliceColumn,
            _ => Self::Identity,
        }
    }

    /// Whether `angles` name an orientation the pipeline actually handles
    pub const fn is_supported(angles: ViewAngles) -> bool {
        angles.is_zero() || !matches!(Self::from_angles(angles), Self::Identity)
    }

    /// Shape of a volume of shape `dim` after this rotation
    pub const fn rotated_dim(self, dim: (usize, usize, usize)) -> (usize, usize, usize) {
        let (slices, rows, cols) = dim;
        match self {
            Self::Identity => dim,
            Self::QuarterTurnSliceRow => (rows, slices, cols),
            Self::QuarterTurnSliceColumn => (cols, rows, slices),
        }
    }

    /// Apply the rotation, consuming the volume
    ///
    /// For an input of depth `D`:
    /// - `QuarterTurnSliceRow`: `out[r, d, c] = in[D - 1 - d, r, c]`
    /// - `QuarterTurnSliceColumn`: `out[c, r, d] = in[D - 1 - d, r, c]`
    pub fn apply<T: Clone>(self, volume: Volume<T>) -> Volume<T> {
        let (permutation, reversed) = match self {
            Self::Identity => return volume,
            Self::QuarterTurnSliceRow => ([1_usize, 0, 2], Axis(1)),
            Self::QuarterTurnSliceColumn => ([2_usize, 1, 0], Axis(2)),
        };

        let mut data = volume.into_data().permuted_axes(permutation);
        data.invert_axis(reversed);
        Volume::from_array(data.as_standard_layout().into_owned())
    }
}

/// Applies declared view angles to loaded volumes
pub struct Orienter;

impl Orienter {
    /// Rotate `volume` from the view described by `angles` into the reference frame
    ///
    /// Unsupported angle combinations leave the volume unchanged; a warning
    /// naming `label` is logged since the result is likely misaligned.
    pub fn orient<T: Clone>(volume: Volume<T>, angles: ViewAngles, label: &str) -> Volume<T> {
        if !Rotation::is_supported(angles) {
            warn!(
                "Unsupported rotation ({}, {}, {}) for {label}; leaving volume unrotated",
                angles.x, angles.y, angles.z
            );
        }
        Rotation::from_angles(angles).apply(volume)
    }
}
