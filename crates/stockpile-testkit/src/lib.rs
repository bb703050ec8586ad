//! # Stockpile Testkit
//!
//! Testing utilities for Stockpile.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Helper structs for setting up test scenarios
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Fixtures
//!
//! ```rust
//! use stockpile_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_items(&[("A1", 9.99, 10)]);
//! assert_eq!(fixture.record("A1").quantity, 10);
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use stockpile_testkit::generators::new_item;
//!
//! proptest! {
//!     #[test]
//!     fn items_start_at_version_one(item in new_item()) {
//!         let record = stockpile_core::ItemRecord::create(item).unwrap();
//!         prop_assert_eq!(record.version, 1);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;
