//! Fusion reducer selection

use log::warn;
use std::fmt;

/// Voxel-wise reducer applied across aligned volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FusionMode {
    /// Arithmetic mean
    #[default]
    Mean,
    /// N-th root of the product; any zero input yields zero
    GeometricMean,
    /// Largest value
    Max,
}

impl FusionMode {
    /// Command-line name of the mode
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::GeometricMean => "gmean",
            Self::Max => "max",
        }
    }

    /// Parse a command-line mode name
    ///
    /// Names match exactly; other spellings such as `MAX` return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mean" => Some(Self::Mean),
            "gmean" => Some(Self::GeometricMean),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    /// Parse a command-line mode name, falling back to [`FusionMode::Mean`]
    ///
    /// The fallback is logged rather than treated as an error.
    pub fn from_arg(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("Unrecognized fusion mode '{name}'; using {}", Self::Mean);
            Self::Mean
        })
    }

    /// Starting accumulator value
    pub(crate) const fn identity(self) -> f64 {
        match self {
            Self::Mean => 0.0,
            Self::GeometricMean => 1.0,
            Self::Max => f64::NEG_INFINITY,
        }
    }

    /// Fold one sample into the accumulator
    pub(crate) fn accumulate(self, acc: f64, value: f64) -> f64 {
        match self {
            Self::Mean => acc + value,
            Self::GeometricMean => acc * value,
            Self::Max => acc.max(value),
        }
    }

    /// Turn an accumulator over `count` samples into the fused value
    pub(crate) fn finish(self, acc: f64, count: usize) -> f64 {
        let n = count as f64;
        match self {
            Self::Mean => acc / n,
            Self::GeometricMean => acc.powf(n.recip()),
            Self::Max => acc,
        }
    }
}

impl fmt::Display for FusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
