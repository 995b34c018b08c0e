//! Itinera - itinerary segment dependency graph and cascade rescheduling.
//!
//! An itinerary is a flat list of time-boxed segments (flights, hotels,
//! meetings, ...) that may depend on one another. The [`schedule`] module is
//! a pure engine over such lists: it checks for cycles, orders segments,
//! infers dependencies from time adjacency and cascades a time shift to every
//! dependent, refusing results where exclusive segments overlap.
//!
//! [`storage`] and [`planner`] wrap the engine for persisted itineraries,
//! and [`cli`] exposes it as the `itinera` binary.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod planner;
pub mod schedule;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;
pub mod config;
pub mod output;
