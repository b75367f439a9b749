//! Photopull Core Library
//!
//! This library provides the core functionality for the photopull tool,
//! which authenticates against the Google Photos Library API, walks the
//! paginated media-item listing, and optionally downloads full-resolution
//! bytes to local disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`auth`] - OAuth2 client secrets, token cache, loopback listener, flow
//! - [`library`] - Typed listing schema and the lazy page stream
//! - [`download`] - Streaming download helper with partial-file cleanup

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod download;
pub mod library;

// Re-export commonly used types
pub use auth::{AuthError, CallbackListener, ClientSecrets, Credential, OAuthFlow, TokenStore};
pub use download::{DownloadError, destination_for, fetch_to_file};
pub use library::{LibraryClient, LibraryError, MediaItem, Page, PAGE_SIZE};
