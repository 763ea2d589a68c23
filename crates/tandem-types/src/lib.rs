//! Foundation types for Tandem.
//!
//! This crate provides the identity, temporal, and payload types used
//! throughout the Tandem system. Every other Tandem crate depends on
//! `tandem-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] — 128-bit random record identity (UUID v4)
//! - [`EpochMillis`] / [`Clock`] — millisecond timestamps and the
//!   substitutable clock that produces them
//! - [`Payload`] / [`Document`] — schema-free string-keyed JSON maps
//! - [`merge_reserved`] / [`split_reserved`] — projection between a
//!   record's payload and its persisted document shape

pub mod clock;
pub mod error;
pub mod id;
pub mod payload;

pub use clock::{Clock, EpochMillis, ManualClock, SystemClock};
pub use error::TypeError;
pub use id::RecordId;
pub use payload::{merge_reserved, split_reserved, Document, Payload, KEY_EPOCH, KEY_ID};
