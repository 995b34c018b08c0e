//! Planner service tying the scheduling engine to storage.
//!
//! The engine only computes. The planner loads an itinerary, runs the engine
//! on it and, for reschedules, persists the result if and only if the engine
//! accepted it. A rejected cascade leaves the stored itinerary untouched.
//!
//! # Example
//!
//! ```no_run
//! use itinera::domain::ItineraryId;
//! use itinera::planner::Planner;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let planner = Planner::from_directory(Path::new(".itinera")).await?;
//!     let trip = ItineraryId::parse("trip").map_err(anyhow::Error::msg)?;
//!
//!     let result = planner.reschedule(&trip, &"flight-out".into(), 2 * 3_600_000).await?;
//!     println!("moved {} segments", result.shifted.len());
//!     Ok(())
//! }
//! ```

use crate::config::{ItineraConfig, CONFIG_FILE_NAME};
use crate::domain::{ItineraryId, Segment, SegmentId};
use crate::error::{Error, Result};
use crate::schedule::{build_graph, find_cycle, ChronologicalDependencies, Conflict, Scheduler};
use crate::storage::{create_storage, SegmentStore};
use serde::Serialize;
use std::path::Path;

/// Outcome of a cascade reschedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reschedule {
    /// Segment the user moved
    pub moved: SegmentId,

    /// Applied shift in milliseconds
    pub delta_ms: i64,

    /// Segments that moved: `moved` first, then its dependents
    pub shifted: Vec<SegmentId>,

    /// The full adjusted itinerary, in stored order
    pub segments: Vec<Segment>,

    /// Whether the result was written back to storage
    pub persisted: bool,
}

/// Both validators run over one itinerary, without failing fast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// A dependency cycle, if one exists
    pub cycle: Option<Vec<SegmentId>>,

    /// Every overlapping exclusive pair
    pub conflicts: Vec<Conflict>,
}

impl HealthReport {
    /// True when there is no cycle and no conflict.
    pub fn is_healthy(&self) -> bool {
        self.cycle.is_none() && self.conflicts.is_empty()
    }
}

/// Scheduling operations over stored itineraries.
pub struct Planner {
    storage: Box<dyn SegmentStore>,
    scheduler: Scheduler,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("scheduler", &self.scheduler)
            .field("storage", &"<dyn SegmentStore>")
            .finish()
    }
}

impl Planner {
    /// Create a planner over an existing store.
    pub fn new(storage: Box<dyn SegmentStore>, scheduler: Scheduler) -> Self {
        Self { storage, scheduler }
    }

    /// Create a planner from a data directory's `config.yaml`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotInitialized` if `data_dir` has no config file
    /// - `ConfigError::Invalid` / `ConfigError::InvalidWindow` for bad config
    pub async fn from_directory(data_dir: &Path) -> Result<Self> {
        let config = ItineraConfig::load(&data_dir.join(CONFIG_FILE_NAME)).await?;
        let scheduler = Scheduler::new(config.policy()?);
        let storage = create_storage(config.storage_backend(data_dir));
        Ok(Self::new(storage, scheduler))
    }

    /// The underlying store.
    pub fn storage(&self) -> &dyn SegmentStore {
        self.storage.as_ref()
    }

    /// The scheduler and its policy.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Every segment of `itinerary`, in stored order.
    pub async fn segments(&self, itinerary: &ItineraryId) -> Result<Vec<Segment>> {
        self.storage.load(itinerary).await
    }

    /// Move `segment` by `delta_ms` and cascade, persisting on success.
    ///
    /// # Errors
    ///
    /// - `Error::ItineraryNotFound` if the itinerary does not exist
    /// - Any engine error from the cascade; storage is not written in that case
    pub async fn reschedule(
        &self,
        itinerary: &ItineraryId,
        segment: &SegmentId,
        delta_ms: i64,
    ) -> Result<Reschedule> {
        let mut result = self.compute(itinerary, segment, delta_ms).await?;
        self.storage.save(itinerary, &result.segments).await?;
        result.persisted = true;

        tracing::info!(
            itinerary = %itinerary,
            segment = %segment,
            delta_ms,
            shifted = result.shifted.len(),
            "rescheduled"
        );
        Ok(result)
    }

    /// Compute a reschedule without writing it.
    ///
    /// # Errors
    ///
    /// Same as [`Planner::reschedule`].
    pub async fn preview_reschedule(
        &self,
        itinerary: &ItineraryId,
        segment: &SegmentId,
        delta_ms: i64,
    ) -> Result<Reschedule> {
        self.compute(itinerary, segment, delta_ms).await
    }

    async fn compute(
        &self,
        itinerary: &ItineraryId,
        segment: &SegmentId,
        delta_ms: i64,
    ) -> Result<Reschedule> {
        let segments = self.storage.load(itinerary).await?;
        let (plan, adjusted) = self.scheduler.cascade(&segments, segment, delta_ms)?;

        Ok(Reschedule {
            moved: plan.moved,
            delta_ms,
            shifted: plan.shifted,
            segments: adjusted,
            persisted: false,
        })
    }

    /// Explicit transitive dependents of `segment`, closest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDependency` if `segment` is not in the itinerary.
    pub async fn preview_dependents(
        &self,
        itinerary: &ItineraryId,
        segment: &SegmentId,
    ) -> Result<Vec<SegmentId>> {
        let segments = self.storage.load(itinerary).await?;
        if !segments.iter().any(|s| &s.id == segment) {
            return Err(Error::MissingDependency(segment.clone()));
        }
        Ok(self.scheduler.find_dependents(&segments, segment))
    }

    /// The itinerary in dependency order.
    ///
    /// # Errors
    ///
    /// Returns `Error::CircularDependency` if the itinerary has a cycle.
    pub async fn ordered(&self, itinerary: &ItineraryId) -> Result<Vec<Segment>> {
        let segments = self.storage.load(itinerary).await?;
        self.scheduler.topological_order(&segments)
    }

    /// Chronologically inferred predecessors under the configured policy.
    pub async fn inferred(&self, itinerary: &ItineraryId) -> Result<ChronologicalDependencies> {
        let segments = self.storage.load(itinerary).await?;
        Ok(self.scheduler.infer_chronological_dependencies(&segments))
    }

    /// Run the cycle and conflict checks and report both.
    pub async fn check(&self, itinerary: &ItineraryId) -> Result<HealthReport> {
        let segments = self.storage.load(itinerary).await?;
        let report = HealthReport {
            cycle: find_cycle(&build_graph(&segments)),
            conflicts: self.scheduler.find_conflicts(&segments),
        };
        if !report.is_healthy() {
            tracing::warn!(
                itinerary = %itinerary,
                cycle = report.cycle.is_some(),
                conflicts = report.conflicts.len(),
                "itinerary has problems"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{init, DATA_DIR_NAME};
    use crate::domain::SegmentType;
    use crate::error::ConfigError;
    use crate::schedule::SchedulePolicy;
    use crate::storage::InMemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    const HOUR_MS: i64 = 3_600_000;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    fn trip() -> ItineraryId {
        ItineraryId::parse("trip").unwrap()
    }

    fn planner_with(segments: Vec<Segment>) -> Planner {
        Planner::new(
            Box::new(InMemoryStore::with_itinerary(trip(), segments)),
            Scheduler::default(),
        )
    }

    fn two_flights() -> Vec<Segment> {
        vec![
            Segment::new("f1", SegmentType::Flight, at(10), at(14)),
            Segment::new("f2", SegmentType::Flight, at(16), at(20)),
        ]
    }

    #[tokio::test]
    async fn reschedule_persists_on_success() {
        let planner = planner_with(two_flights());

        let result = planner.reschedule(&trip(), &"f2".into(), HOUR_MS).await.unwrap();

        assert!(result.persisted);
        assert_eq!(result.shifted, vec![SegmentId::from("f2")]);
        let stored = planner.segments(&trip()).await.unwrap();
        assert_eq!(stored[1].start_datetime, at(17));
    }

    #[tokio::test]
    async fn rejected_reschedule_leaves_storage_alone() {
        let planner = planner_with(two_flights());

        let err = planner
            .reschedule(&trip(), &"f1".into(), 4 * HOUR_MS)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AdjustmentFailed { .. }));
        assert_eq!(planner.segments(&trip()).await.unwrap(), two_flights());
    }

    #[tokio::test]
    async fn preview_does_not_persist() {
        let planner = planner_with(two_flights());

        let preview = planner
            .preview_reschedule(&trip(), &"f1".into(), HOUR_MS)
            .await
            .unwrap();

        assert!(!preview.persisted);
        assert_eq!(preview.segments[0].start_datetime, at(11));
        assert_eq!(planner.segments(&trip()).await.unwrap(), two_flights());
    }

    #[tokio::test]
    async fn unknown_itinerary_is_reported() {
        let planner = planner_with(Vec::new());
        let other = ItineraryId::parse("other").unwrap();
        assert!(matches!(
            planner.check(&other).await,
            Err(Error::ItineraryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn preview_dependents_requires_known_segment() {
        let planner = planner_with(vec![
            Segment::new("a", SegmentType::Meeting, at(9), at(10)),
            Segment::new("b", SegmentType::Meeting, at(12), at(13)).depending_on(["a"]),
        ]);

        assert_eq!(
            planner.preview_dependents(&trip(), &"a".into()).await.unwrap(),
            vec![SegmentId::from("b")]
        );
        assert!(matches!(
            planner.preview_dependents(&trip(), &"zz".into()).await,
            Err(Error::MissingDependency(_))
        ));
    }

    #[tokio::test]
    async fn check_reports_cycle_and_conflicts_together() {
        let planner = planner_with(vec![
            Segment::new("f1", SegmentType::Flight, at(10), at(14)).depending_on(["f2"]),
            Segment::new("f2", SegmentType::Flight, at(12), at(16)).depending_on(["f1"]),
        ]);

        let report = planner.check(&trip()).await.unwrap();

        assert!(!report.is_healthy());
        assert_eq!(
            report.cycle,
            Some(vec!["f1".into(), "f2".into(), "f1".into()])
        );
        assert_eq!(report.conflicts, vec![Conflict::new("f1".into(), "f2".into())]);
    }

    #[tokio::test]
    async fn ordered_and_inferred_use_stored_segments() {
        let planner = planner_with(vec![
            Segment::new("taxi", SegmentType::Transfer, at(14), at(15)).depending_on(["flight"]),
            Segment::new("flight", SegmentType::Flight, at(10), at(14)),
        ]);

        let order: Vec<_> = planner
            .ordered(&trip())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(order, vec![SegmentId::from("flight"), SegmentId::from("taxi")]);

        let inferred = planner.inferred(&trip()).await.unwrap();
        assert_eq!(inferred[&SegmentId::from("taxi")], vec![SegmentId::from("flight")]);
    }

    #[tokio::test]
    async fn from_directory_reads_config() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(DATA_DIR_NAME);
        init(&dir, Some(90)).await.unwrap();

        let planner = Planner::from_directory(&dir).await.unwrap();

        assert_eq!(
            planner.scheduler().policy().chronological_window,
            chrono::Duration::minutes(90)
        );
        assert_ne!(*planner.scheduler().policy(), SchedulePolicy::default());
    }

    #[tokio::test]
    async fn from_uninitialized_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = Planner::from_directory(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotInitialized(_))));
    }
}
