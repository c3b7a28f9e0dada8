// SPDX-License-Identifier: Apache-2.0
//! actograph-core: multi-domain attributed graph model for activity analysis.
//!
//! One master vertex table carries every per-vertex attribute; named domain
//! overlays carry the edges. All overlays mirror the master vertex set 1:1,
//! so a vertex id means the same thing everywhere. The [`MutationFacade`]
//! layers labeling, event import, and selection policy on top of the raw
//! [`GraphStore`].
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
    clippy::cast_precision_loss,
    clippy::use_self
)]

mod domain;
mod error;
mod facade;
mod ident;
/// Registry collaborators the store validates against.
pub mod registry;
mod store;
mod table;
mod time;

/// Domain overlay primitives: directedness tag, edge records, overlay graph.
pub use domain::{Directedness, DomainGraph, EdgeRecord, MASTER_DOMAIN};
/// Graph mutation failures. All local and recoverable.
pub use error::GraphError;
/// Policy facade, its configuration, and the change-notification types.
pub use facade::{EventSummary, FacadeConfig, GraphEvent, MutationFacade};
/// Identifier newtypes for vertices, edges, attributes, and linked entities.
pub use ident::{AttrId, EdgeId, EntityId, NodeId};
/// The multi-domain store and its vertex-creation seed.
pub use store::{GraphStore, VertexSeed};
/// Columnar vertex storage and the position-space selector.
pub use table::{AttributeTable, PositionSpace, VertexRow};
/// Optional per-vertex timestamps.
pub use time::TimeMark;
