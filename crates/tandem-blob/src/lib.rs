//! Durable blob storage for Tandem.
//!
//! The blob store is the authoritative copy of every record: a pure
//! key-addressed byte store that never interprets its values. The search
//! index is derivative and can always be rebuilt from here.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one file per key under a local root directory, the
//!   offline ("airplane mode") fallback
//!
//! Networked object-store backends live outside this crate and implement
//! the same trait; the backend is chosen once at startup via
//! [`BlobBackendConfig`], never by in-object conditionals.
//!
//! # Design Rules
//!
//! 1. `put` overwrites; namespace/prefix structure is created implicitly.
//! 2. Reading or deleting a missing key reports [`BlobError::NotFound`],
//!    never a silent no-op.
//! 3. `list` is a complete enumeration -- bulk reindex depends on it.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use config::BlobBackendConfig;
pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
