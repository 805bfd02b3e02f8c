//! # VTuber Handbook Core
//!
//! Storage-independent logic for the VTuber Handbook catalog: typed records,
//! the read-only store abstraction, fuzzy name matching, ordered record
//! resolution, and detail page aggregation.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Backends
//! implement [`store::CatalogStore`]; everything else is written against
//! that trait.
//!
//! ```text
//! NameIndex ──▶ FuzzyMatcher ──▶ resolve ──▶ ranked records
//!     │                             │
//!     └──────── CatalogStore ◀──────┘◀── detail::aggregate
//! ```

pub mod detail;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod models;
pub mod resolve;
pub mod store;
