// SPDX-License-Identifier: MPL-2.0
//! `proofcam` is a headless capture-and-review pipeline for warehouse
//! proof-of-delivery photos.
//!
//! It drives a pluggable camera device through the capture lifecycle,
//! compresses photos to bounded JPEGs, and binds a gallery with circular
//! navigation to a remote proof store. Hosts bring their own view layer
//! and adapters; the crate supplies the state machines, the controllers
//! and an in-memory store for tests and offline use.

#![doc(html_root_url = "https://docs.rs/proofcam/0.2.0")]

pub mod application;
pub mod camera;
pub mod carousel;
pub mod compress;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod gallery;
pub mod infrastructure;
pub mod notify;
pub mod workflow;
