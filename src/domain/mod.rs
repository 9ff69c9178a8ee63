// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core photo and capture types shared by every controller.
//!
//! This module contains the value objects the capture and review pipeline
//! moves around: typed record identifiers, photo records with their scope,
//! raw camera frames, and compressed capture payloads. It carries no
//! behavior beyond simple accessors and bookkeeping.
//!
//! # Modules
//!
//! - [`capture`]: Frame and payload types ([`CapturedFrame`](capture::CapturedFrame),
//!   [`CompressedImage`](capture::CompressedImage), [`FacingMode`](capture::FacingMode))
//! - [`photo`]: Photo records and scoping ([`PhotoRecord`](photo::PhotoRecord),
//!   [`Scope`](photo::Scope), [`GallerySession`](photo::GallerySession),
//!   [`PhotoStats`](photo::PhotoStats))

pub mod capture;
pub mod photo;
