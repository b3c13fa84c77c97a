// src/specs/mod.rs
//! # Page specs
//!
//! Each module here knows how to read one kind of archive page: where the ground truth
//! lives in the HTML and how to turn it into records.
//!
//! ## What lives here
//! - **Pure HTML reading** via `core::html` (tolerant row/cell slicing, link lookup).
//! - **Row filters** the archive needs: minimum cell counts, empty identifiers,
//!   unparseable or too-old dates.
//! - **Light shaping** into typed records (`model::EventRecord`, `model::SummaryRecord`).
//!
//! ## What does **not** live here
//! - Persistence (`store`), merging (`reconcile`), or deciding when to scrape (`runner`).
//!
//! ## Typical call chain
//! ```text
//! runner → specs::snapshots::fetch()  → [SnapshotLink]
//!        → specs::events::fetch(link) → [EventRecord]   (per snapshot)
//!        → reconcile::reconcile(prior, fresh, &EVENTS) → store::save_dataset
//! ```
//!
//! Every module splits `fetch` (network) from `parse_doc` (pure) so the parsing
//! can be tested offline against captured HTML.
pub mod events;
pub mod snapshots;
pub mod summary;
