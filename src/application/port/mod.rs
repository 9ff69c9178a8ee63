// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`camera`]: Camera acquisition and live frame streams
//! - [`store`]: Persistence of proof photos on the backend
//!
//! # Design Notes
//!
//! - All traits use domain types only (no device handles, no transport types)
//! - Traits are `Send + Sync` where appropriate for thread-safe usage
//! - Methods return `Result` with port-local error types
//! - `async fn` futures are driven by the owning controller on one task and
//!   are not required to be `Send`
//!
//! # Example
//!
//! ```ignore
//! use proofcam::application::port::camera::{CameraDevice, StreamConstraints};
//!
//! async fn first_frame(device: &impl CameraDevice) {
//!     let constraints = StreamConstraints::default();
//!     let mut stream = device.acquire(&constraints).await.unwrap();
//!     let frame = stream.next_frame().await.unwrap();
//!     println!("{}x{}", frame.width(), frame.height());
//! }
//! ```

pub mod camera;
pub mod store;

// Re-export main types for convenience
pub use camera::{CameraDevice, CameraStream, StreamConstraints};
pub use store::{PhotoData, ProofStore, SaveOutcome, StoreError};
