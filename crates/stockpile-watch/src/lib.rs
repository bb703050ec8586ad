//! # Stockpile Watch
//!
//! Change fan-out and watch sessions for the Stockpile inventory system.
//!
//! ## Overview
//!
//! [`ChangeBus`] implements the store's
//! [`ChangeSink`](stockpile_core::ChangeSink) seam: every applied mutation
//! arrives as an `Arc<ChangeEvent>` and is fanned out to the
//! [`WatchSession`]s subscribed to that SKU, and only those. Each session
//! owns a bounded buffer; a slow consumer loses its oldest buffered events
//! and degrades instead of slowing down publishers.
//!
//! ## Key Types
//!
//! - [`ChangeBus`] - Per-SKU topic registry and fan-out
//! - [`WatchSession`] - One subscriber's cursor onto a SKU's change feed
//! - [`SessionState`] - `Active → Degraded → Closed`
//!
//! ## Design Notes
//!
//! - **Publishers never block**: fan-out is a non-blocking broadcast send;
//!   mutation latency is independent of watcher count and watcher speed.
//! - **Drop-oldest on overflow**: the slow-consumer policy is to overwrite
//!   the oldest buffered event and mark the session `Degraded`. Sessions are
//!   never force-closed for slowness; a version gap is reported, not
//!   corruption.
//! - **Terminal removal**: removing a SKU ends its streams with a visible
//!   `Removed` event, never a silent stall.

pub mod bus;
pub mod session;

pub use bus::{ChangeBus, DEFAULT_CAPACITY};
pub use session::{SessionState, WatchSession};
