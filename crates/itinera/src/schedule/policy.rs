//! Kind rules and thresholds used by the scheduling engine.

use crate::domain::SegmentType;
use chrono::Duration;

/// Default gap (in minutes) within which a segment is inferred to follow the
/// one that ended before it.
pub const DEFAULT_CHRONOLOGICAL_WINDOW_MINUTES: i64 = 30;

/// Segment types that may not overlap each other by default.
pub const DEFAULT_EXCLUSIVE_TYPES: [SegmentType; 2] = [SegmentType::Flight, SegmentType::Transfer];

/// Segment types ignored by chronological inference by default.
pub const DEFAULT_BACKGROUND_TYPES: [SegmentType; 1] = [SegmentType::Hotel];

/// Rules the engine applies when inferring edges and checking conflicts.
///
/// The default policy uses a 30 minute window, treats flights and transfers
/// as mutually exclusive and hotels as background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Largest gap between one segment's end and the next one's start that
    /// still counts as "follows closely". Inclusive.
    pub chronological_window: Duration,

    /// Types that cannot share time with each other or with themselves.
    pub exclusive_types: Vec<SegmentType>,

    /// Types that neither block nor get blocked by adjacency.
    pub background_types: Vec<SegmentType>,
}

impl SchedulePolicy {
    /// Whether segments of this type take part in exclusivity checks.
    pub fn is_exclusive(&self, segment_type: SegmentType) -> bool {
        self.exclusive_types.contains(&segment_type)
    }

    /// Whether segments of this type are skipped by chronological inference.
    pub fn is_background(&self, segment_type: SegmentType) -> bool {
        self.background_types.contains(&segment_type)
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            chronological_window: Duration::minutes(DEFAULT_CHRONOLOGICAL_WINDOW_MINUTES),
            exclusive_types: DEFAULT_EXCLUSIVE_TYPES.to_vec(),
            background_types: DEFAULT_BACKGROUND_TYPES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_rules() {
        let policy = SchedulePolicy::default();

        assert_eq!(policy.chronological_window, Duration::minutes(30));
        assert!(policy.is_exclusive(SegmentType::Flight));
        assert!(policy.is_exclusive(SegmentType::Transfer));
        assert!(!policy.is_exclusive(SegmentType::Hotel));
        assert!(!policy.is_exclusive(SegmentType::Meeting));
        assert!(policy.is_background(SegmentType::Hotel));
        assert!(!policy.is_background(SegmentType::Flight));
    }
}
