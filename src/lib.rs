//! # VTuber Handbook
//!
//! An offline directory of VTubers backed by a bundled, read-only SQLite
//! catalog: fuzzy name search, bookmarks, discovery and detail pages.
//!
//! The search and detail pipelines live in `vtuber_handbook_core` and are
//! storage-agnostic. This crate plugs them into SQLite and adds the pieces
//! around them (configuration, image decoding, markup, bookmarks, the
//! spotlight fetcher and the `vtdb` CLI).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ CatalogHandle│──▶│   Handbook    │──▶│  CLI (vtdb)  │
//! │ SQLite, r/o  │   │ search/detail │   │              │
//! └──────────────┘   └───────┬───────┘   └──────────────┘
//!                            │
//!               ┌────────────┼────────────┐
//!               ▼            ▼            ▼
//!          ┌─────────┐  ┌─────────┐  ┌──────────┐
//!          │ images  │  │ markup  │  │bookmarks │
//!          └─────────┘  └─────────┘  └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Read-only SQLite connection |
//! | [`sqlite_store`] | SQLite `CatalogStore` |
//! | [`catalog`] | Open/close lifecycle of the catalog connection |
//! | [`handbook`] | Non-fatal query layer |
//! | [`images`] | Embedded image decoding |
//! | [`markup`] | Inline markdown rendering |
//! | [`bookmarks`] | Bookmark list persistence |
//! | [`discovery`] | Random discovery sections |
//! | [`spotlight`] | Weekly spotlight post |

pub mod bookmarks;
pub mod catalog;
pub mod config;
pub mod db;
pub mod discovery;
pub mod handbook;
pub mod images;
pub mod markup;
pub mod spotlight;
pub mod sqlite_store;
