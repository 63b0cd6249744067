//! esfold IR - ESTree trees, paths and structural edits
//!
//! This crate contains the tree model every esfold pass works on:
//! - [`Node`]: one variant per supported ESTree node type
//! - [`Ast`]: arena owning the nodes, with per-node [`NodeFlags`]
//! - [`PathNode`]: parent-linked addresses of values inside the tree
//! - [`estree`]: import/export of ESTree JSON
//! - [`source`]: one-line JavaScript rendering for logs and tests
//!
//! # Design
//!
//! - **Flatten Everything**: children are `NodeId(u32)` handles, never boxes
//! - **Address by slot**: a path is `(parent, key)`; edits write through the
//!   parent's slot so the same canonical node can sit in many slots
//! - **Field order is traversal order**: [`Node::child_fields`] is sorted by
//!   ESTree name

mod arena;
pub mod ast;
mod error;
pub mod estree;
mod node_id;
mod path;
pub mod source;

pub use arena::{Ast, NodeFlags, Value};
pub use ast::{
    AssignOp, BinaryOp, Field, Key, Literal, LogicalOp, Node, PropertyKind, UnaryOp, UpdateOp,
    VarKind,
};
pub use error::{EstreeError, TreeError};
pub use node_id::NodeId;
pub use path::PathNode;
