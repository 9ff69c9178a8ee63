// SPDX-License-Identifier: MPL-2.0
//! Application layer - port definitions for dependency inversion.
//!
//! This module contains the seams between the controllers and the outside
//! world:
//!
//! - [`port`]: Trait definitions (interfaces) infrastructure implements
//!
//! # Architecture
//!
//! Controllers in this crate never talk to hardware or a backend directly;
//! they drive the port traits defined here. Hosts plug in real adapters
//! (a platform capture backend, an RPC client) or the in-memory test double
//! from [`crate::infrastructure`].
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Controllers use the ports, never concrete adapters
//!
//! # Example
//!
//! ```ignore
//! use proofcam::application::port::{CameraDevice, ProofStore};
//!
//! // Infrastructure implements the port traits
//! struct RpcStore { /* ... */ }
//! impl ProofStore for RpcStore { /* ... */ }
//! ```

pub mod port;
