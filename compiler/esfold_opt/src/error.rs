//! Errors raised while folding.

use esfold_ir::{NodeId, TreeError};
use thiserror::Error;

/// A fatal folding error. Any of these aborts the current run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FoldError {
    /// A node was asked for its compile-time value but has none.
    #[error("node {0} is not a compile-time constant")]
    NotConstant(NodeId),
    /// A host value has no literal spelling.
    #[error("value {0} has no constant expression form")]
    NotRepresentable(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}
