//! Error types for cartonize.

use thiserror::Error;

/// Result type alias for cartonize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a packing operation.
#[derive(Debug, Error)]
pub enum Error {
    /// An item does not fit into any box in stock, in any orientation.
    #[error("item '{item}' does not fit any box in stock")]
    ItemTooLarge {
        /// Identifier of the offending item.
        item: String,
    },

    /// The available boxes were exhausted before all items were placed.
    #[error("insufficient boxes: {remaining} item(s) could not be placed")]
    InsufficientBoxes {
        /// Number of items left over when packing stalled.
        remaining: usize,
    },

    /// A packing constraint rejected every otherwise-valid placement.
    #[error("packing constraint left no valid placement for item '{item}'")]
    ConstraintViolation {
        /// Identifier of the constrained item.
        item: String,
    },

    /// Invalid input caught at entry (non-positive dimension, impossible weight, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The computation was cancelled by the caller.
    #[error("packing cancelled")]
    Cancelled,
}
