//! Cross-system tests.
//!
//! - `helpers.rs`: fixtures shared with the per-module unit tests
//! - `integration.rs`: end-to-end scenarios through the full system order
//! - `determinism.rs`: same seed and inputs, same world

pub(crate) mod helpers;
