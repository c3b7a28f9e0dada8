// SPDX-License-Identifier: Apache-2.0
//! Interchange failures.
use thiserror::Error;

/// Failure while parsing or rendering a graph document.
///
/// Replay-level problems (a node the store rejects, an unknown attribute
/// name) are not errors: import skips them with a diagnostic and reports
/// them in its [`ImportReport`](crate::ImportReport).
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document text is not valid JSON of the expected shape.
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
}
