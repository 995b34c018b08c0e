//! Storage abstraction layer for itineraries.
//!
//! The scheduling engine never performs I/O: it takes a segment slice and
//! hands back a new one. This module is the collaborator that owns the
//! authoritative copy of each itinerary and persists a new snapshot only
//! after the engine has accepted it.
//!
//! Two backends are provided:
//!
//! - **In-memory**: ephemeral, backed by a `HashMap` behind a tokio mutex
//! - **JSONL**: one `<itinerary>.jsonl` file per itinerary under a root directory
//!
//! # Example
//!
//! ```no_run
//! use itinera::domain::ItineraryId;
//! use itinera::storage::{create_storage, StorageBackend};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let store = create_storage(StorageBackend::Jsonl(".itinera".into()));
//!     let trip = ItineraryId::parse("lisbon").map_err(anyhow::Error::msg)?;
//!
//!     let segments = store.load(&trip).await?;
//!     println!("{} segments", segments.len());
//!     Ok(())
//! }
//! ```

use crate::domain::{ItineraryId, Segment};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod in_memory;
pub mod jsonl;

pub use in_memory::InMemoryStore;
pub use jsonl::{load_itinerary_file, JsonlSegmentStore, LoadWarning};

/// Persistence for whole-itinerary snapshots.
///
/// Itineraries are read and written as complete segment lists. Stores never
/// merge or validate: the engine decides what is acceptable and the store
/// records it.
///
/// All methods take `&self`; implementations use interior mutability so a
/// single store can be shared across tasks.
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Load every segment of an itinerary, in stored order.
    ///
    /// # Errors
    ///
    /// - `Error::ItineraryNotFound` if nothing has been saved under `itinerary`
    /// - `Error::Io` / `Error::Storage` for backend failures
    async fn load(&self, itinerary: &ItineraryId) -> Result<Vec<Segment>>;

    /// Replace an itinerary with `segments`, creating it if needed.
    async fn save(&self, itinerary: &ItineraryId, segments: &[Segment]) -> Result<()>;

    /// Every stored itinerary, sorted by ID.
    async fn list_itineraries(&self) -> Result<Vec<ItineraryId>>;

    /// Remove an itinerary.
    ///
    /// # Errors
    ///
    /// Returns `Error::ItineraryNotFound` if it does not exist.
    async fn delete(&self, itinerary: &ItineraryId) -> Result<()>;
}

/// Which [`SegmentStore`] implementation to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Ephemeral, process-local storage
    InMemory,

    /// One JSONL file per itinerary under the given directory
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data directory for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(root) => Some(root),
            StorageBackend::InMemory => None,
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::InMemory => write!(f, "memory"),
            StorageBackend::Jsonl(root) => write!(f, "jsonl ({})", root.display()),
        }
    }
}

/// Create a store for the given backend.
///
/// Construction does no I/O; the JSONL backend creates its directory on the
/// first save.
pub fn create_storage(backend: StorageBackend) -> Box<dyn SegmentStore> {
    tracing::debug!(backend = %backend, "creating segment store");
    match backend {
        StorageBackend::InMemory => Box::new(InMemoryStore::new()),
        StorageBackend::Jsonl(root) => Box::new(JsonlSegmentStore::new(root)),
    }
}
