//! # ctxpack Core
//!
//! Domain types and error definitions for the ctxpack context packet engine.
//! This crate has **no I/O**; it defines the knowledge model that the
//! loader produces and the assembly engine consumes.
//!
//! ## Design Philosophy
//!
//! Knowledge entries are immutable once parsed. Anything the scoring engine
//! needs to know about an entry (its date, whether it was superseded) is
//! derived here at construction time, so downstream crates never have to
//! re-read prose conventions.

pub mod entry;
pub mod error;

// Re-export key types at crate root for ergonomics
pub use entry::{EntryHeader, KnowledgeEntry, SUPERSEDED_MARKER};
pub use error::{Error, LoadError, Result};
