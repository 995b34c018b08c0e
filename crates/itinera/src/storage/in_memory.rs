//! In-memory storage backend.
//!
//! All data lives in a `HashMap` and is lost when the process exits. Used by
//! tests and by the `memory` backend setting for throwaway sessions.

use super::SegmentStore;
use crate::domain::{ItineraryId, Segment};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Thread-safe, ephemeral [`SegmentStore`].
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    itineraries: Arc<Mutex<HashMap<ItineraryId, Vec<Segment>>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one itinerary.
    pub fn with_itinerary(itinerary: ItineraryId, segments: Vec<Segment>) -> Self {
        Self {
            itineraries: Arc::new(Mutex::new(HashMap::from([(itinerary, segments)]))),
        }
    }
}

#[async_trait]
impl SegmentStore for InMemoryStore {
    async fn load(&self, itinerary: &ItineraryId) -> Result<Vec<Segment>> {
        self.itineraries
            .lock()
            .await
            .get(itinerary)
            .cloned()
            .ok_or_else(|| Error::ItineraryNotFound(itinerary.clone()))
    }

    async fn save(&self, itinerary: &ItineraryId, segments: &[Segment]) -> Result<()> {
        self.itineraries
            .lock()
            .await
            .insert(itinerary.clone(), segments.to_vec());
        Ok(())
    }

    async fn list_itineraries(&self) -> Result<Vec<ItineraryId>> {
        let mut ids: Vec<ItineraryId> = self.itineraries.lock().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete(&self, itinerary: &ItineraryId) -> Result<()> {
        self.itineraries
            .lock()
            .await
            .remove(itinerary)
            .map(|_| ())
            .ok_or_else(|| Error::ItineraryNotFound(itinerary.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentType;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::new();
        let other = store.clone();
        let trip = ItineraryId::parse("trip").unwrap();
        let at = |h| Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap();

        store
            .save(&trip, &[Segment::new("a", SegmentType::Meeting, at(9), at(10))])
            .await
            .unwrap();

        assert_eq!(other.load(&trip).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seeded_store_returns_seed() {
        let trip = ItineraryId::parse("seeded").unwrap();
        let store = InMemoryStore::with_itinerary(trip.clone(), Vec::new());
        assert!(store.load(&trip).await.unwrap().is_empty());
    }
}
