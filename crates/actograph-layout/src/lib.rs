// SPDX-License-Identifier: Apache-2.0
//! actograph-layout: layout modes and animated transitions for activity
//! graphs.
//!
//! The engine computes per-mode vertex positions (default baseline,
//! temporal sort, normalized spatial, raw spatial), plays mode changes as
//! 20-step transitions the host ticks, and answers pick queries and
//! render-object bookkeeping over the result. It borrows the store per
//! call and never holds it.
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

mod engine;
mod pick;
mod render;
mod transition;

/// The engine, its modes, extents, and the temporal inverse mapping.
pub use engine::{LayoutEngine, LayoutMode, RenderExtents, TimelineScale};
/// Pick query region and result types.
pub use pick::{PickRegion, PickResult};
/// Render-object handles and generation sets.
pub use render::{RenderHandle, RenderLayer, RenderObject, RenderSet};
/// Discrete-step transition primitive.
pub use transition::{Transition, TRANSITION_STEPS};
