//! # Stockpile Core
//!
//! Pure data model for the Stockpile inventory system: SKUs, item records,
//! and change events.
//!
//! This crate contains no I/O, no locking, no channels. It is pure computation
//! over inventory state: every mutation is a method on [`ItemRecord`] that
//! either applies atomically and bumps `version`, or fails and leaves the
//! record untouched.
//!
//! ## Key Types
//!
//! - [`Sku`] - Validated, non-empty stock-keeping unit identifier
//! - [`ItemRecord`] - The versioned state of one SKU
//! - [`ChangeEvent`] - One applied mutation, as seen by watchers
//! - [`ChangeSink`] - The seam through which the store publishes events

pub mod error;
pub mod event;
pub mod item;
pub mod sku;

pub use error::CoreError;
pub use event::{ChangeEvent, ChangeKind, ChangeSink, NullSink};
pub use item::{ItemRecord, NewItem};
pub use sku::Sku;
