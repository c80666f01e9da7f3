//! Proposal metadata model.
//!
//! # Responsibility
//! - Parse the header block of one proposal text into typed records.
//! - Own per-proposal validation: header schema, field values, authors.
//!
//! # Invariants
//! - Records are built once from text and never depend on other proposals.
//! - Cross-proposal checks live in `crate::index`, not here.

pub mod author;
pub mod header;
pub mod rep;
mod wrap;
