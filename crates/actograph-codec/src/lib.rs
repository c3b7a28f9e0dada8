// SPDX-License-Identifier: Apache-2.0
//! actograph-codec: JSON interchange and snapshot undo for activity graphs.
//!
//! The document format persists every vertex with its times (in seconds),
//! spatial fix, and anchors, plus one primitive block per domain. Import
//! is a replay against the store under explicit ids; undo is a pair of
//! whole-document snapshot/restore operations.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod document;
mod error;
mod export;
mod import;
mod undo;

/// The interchange document and its elements.
pub use document::{GraphDocument, LinkElement, NodeElement, PrimitiveElement};
/// Parse failures.
pub use error::DocumentError;
/// Store → document serialization.
pub use export::export;
/// Document → store replay and its outcome report.
pub use import::{import, ImportReport};
/// Snapshot/restore undo primitives.
pub use undo::{restore, snapshot, UndoStack};
