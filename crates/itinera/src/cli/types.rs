//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::SegmentType;

/// Segment type for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentTypeArg {
    /// Flight
    Flight,
    /// Hotel stay
    Hotel,
    /// Meeting
    Meeting,
    /// Activity
    Activity,
    /// Ground or sea transfer
    Transfer,
    /// Anything else
    Custom,
}

impl From<SegmentTypeArg> for SegmentType {
    fn from(arg: SegmentTypeArg) -> Self {
        match arg {
            SegmentTypeArg::Flight => SegmentType::Flight,
            SegmentTypeArg::Hotel => SegmentType::Hotel,
            SegmentTypeArg::Meeting => SegmentType::Meeting,
            SegmentTypeArg::Activity => SegmentType::Activity,
            SegmentTypeArg::Transfer => SegmentType::Transfer,
            SegmentTypeArg::Custom => SegmentType::Custom,
        }
    }
}

impl std::fmt::Display for SegmentTypeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SegmentType::from(*self).fmt(f)
    }
}
