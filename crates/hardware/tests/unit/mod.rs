//! # Unit Tests
//!
//! This module organizes the fine-grained tests for the harness: the
//! controller, the individual device models, the dispatch fabric, the
//! configuration layer, and the smoketest suites run end to end.

/// Unit tests for the configuration layer (defaults and JSON overrides).
pub mod config;

/// Unit tests for the device models behind the dispatch fabric.
pub mod devices;
