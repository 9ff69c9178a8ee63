// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined
//! in `application::port`. Production hosts plug in their own adapters over
//! a platform camera API and the warehouse backend's RPC surface; the crate
//! ships the in-memory store used by the test suites and by hosts that
//! want an offline mode.
//!
//! # Available Adapters
//!
//! - [`memory_store`]: In-memory photo store (implements [`ProofStore`])
//!
//! # Design Notes
//!
//! - Adapters implement traits from `application::port`
//! - They mirror the backend's business rules, not just its signatures
//!
//! [`ProofStore`]: crate::application::port::ProofStore

pub mod memory_store;

// Re-export main types for convenience
pub use memory_store::MemoryProofStore;
