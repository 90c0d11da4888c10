//! Charla - talk-time tracking for opaque web-conference clients
//!
//! This library locates the volume-report and layout-refresh methods
//! inside an undocumented host object graph by the shape of their
//! serialized source, wraps them with transparent observation hooks, and
//! folds the observed volume events into a cumulative per-participant
//! talk-time table on a fixed poll cadence.

pub mod chart;
pub mod cli;
pub mod csv_output;
pub mod dom;
pub mod extract;
pub mod graph;
pub mod installer;
pub mod intercept;
pub mod json_output;
pub mod pattern;
pub mod registry;
pub mod replay;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod tracker;
