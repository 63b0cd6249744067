//! Tree mutation and ESTree import errors.

use crate::{Field, NodeId};

/// A structural edit the tree rejected.
///
/// Apart from `ArenaFull`, every variant is a caller bug: rules only edit
/// through the path they were handed, so a well-formed pass never sees one
/// of these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Attempted in-place edit of a shared canonical node.
    #[error("node {0} is frozen")]
    Frozen(NodeId),
    /// Attempted to clear a field that must hold a node.
    #[error("`{field}` of {kind} cannot be removed")]
    RequiredField { kind: &'static str, field: Field },
    /// The node has no child field with that name.
    #[error("{kind} has no field `{field}`")]
    NotAField { kind: &'static str, field: Field },
    /// Single-node write into a list field, or list edit of a node field.
    #[error("`{field}` of {kind} is a list")]
    ListField { kind: &'static str, field: Field },
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("value is not a list")]
    NotAList,
    /// The path has no parent slot to write through (the root, or a
    /// descent that ran off the tree).
    #[error("path has no parent slot")]
    Detached,
    /// Node ids are `u32`; the arena cannot grow past that.
    #[error("node arena is full ({0} nodes)")]
    ArenaFull(usize),
}

/// Malformed ESTree JSON.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EstreeError {
    #[error("node has no `type`")]
    MissingType,
    #[error("unsupported node type `{0}`")]
    UnknownType(String),
    #[error("{kind} is missing `{field}`")]
    MissingField { kind: String, field: &'static str },
    #[error("{kind}.{field} has the wrong shape")]
    InvalidField { kind: String, field: &'static str },
    #[error("{kind} has unknown operator `{operator}`")]
    UnknownOperator { kind: String, operator: String },
    #[error("root node is {0}, expected Program")]
    NotAProgram(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}
