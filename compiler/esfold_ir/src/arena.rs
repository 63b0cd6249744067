//! Node arena and structural edits.
//!
//! [`Ast`] owns every node of one program. Edits go through field/list
//! slots addressed by a parent [`Value`] and a [`Key`], the same addressing
//! a [`PathNode`](crate::PathNode) carries.
//!
//! # Revision
//!
//! Every edit that changes a slot bumps [`Ast::revision`]. Callers compare
//! revisions to detect whether a pass mutated anything.
//!
//! # Frozen nodes
//!
//! Canonical constant nodes are shared between many slots. They are
//! allocated with [`NodeFlags::FROZEN`]; editing one in place is
//! [`TreeError::Frozen`]. Replacing a slot that *holds* a frozen node is
//! fine: only the node itself is immutable.

use std::ops::Range;

use bitflags::bitflags;

use crate::ast::{SlotMut, SlotRef};
use crate::{Field, Key, Node, NodeId, TreeError};

bitflags! {
    /// Per-node flags stored beside the node.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Shared canonical node; in-place edits are rejected.
        const FROZEN = 1 << 0;
        /// Already in minified boolean form (`!0` / `!1`).
        const MINIFIED = 1 << 1;
    }
}

/// What a path points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Empty optional field, hole, or a key that led off the tree.
    Null,
    Node(NodeId),
    /// A child list, addressed through the node that owns it.
    List { owner: NodeId, field: Field },
}

impl Value {
    #[inline]
    pub const fn node(self) -> Option<NodeId> {
        match self {
            Value::Node(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub const fn is_list(self) -> bool {
        matches!(self, Value::List { .. })
    }
}

/// Arena of ESTree nodes rooted at a `Program`.
#[derive(Clone, Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    flags: Vec<NodeFlags>,
    root: NodeId,
    revision: u64,
}

impl Ast {
    /// An arena holding an empty `Program`.
    pub fn new() -> Self {
        let mut ast = Ast {
            nodes: Vec::with_capacity(64),
            flags: Vec::with_capacity(64),
            root: NodeId::new(0),
            revision: 0,
        };
        ast.root = ast.alloc(Node::Program { body: Vec::new() });
        ast
    }

    // Storage

    /// Allocate an unflagged node.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    /// Use `try_alloc` for fallible allocation.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.alloc_with_flags(node, NodeFlags::empty())
    }

    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    /// Use `try_alloc_with_flags` for fallible allocation.
    pub fn alloc_with_flags(&mut self, node: Node, flags: NodeFlags) -> NodeId {
        self.try_alloc_with_flags(node, flags)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_alloc(&mut self, node: Node) -> Result<NodeId, TreeError> {
        self.try_alloc_with_flags(node, NodeFlags::empty())
    }

    /// Allocate a node, or fail once ids no longer fit in a `u32`.
    pub fn try_alloc_with_flags(
        &mut self,
        node: Node,
        flags: NodeFlags,
    ) -> Result<NodeId, TreeError> {
        let len = self.nodes.len();
        let index = u32::try_from(len).map_err(|_| TreeError::ArenaFull(len))?;
        self.nodes.push(node);
        self.flags.push(flags);
        Ok(NodeId::new(index))
    }

    /// Number of allocated nodes, reachable or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.flags[id.index()]
    }

    #[inline]
    pub fn is_frozen(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::FROZEN)
    }

    /// Mutable access to an unfrozen node. Counts as a change.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        if self.is_frozen(id) {
            return Err(TreeError::Frozen(id));
        }
        self.revision += 1;
        Ok(&mut self.nodes[id.index()])
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        if self.root != root {
            self.root = root;
            self.revision += 1;
        }
    }

    /// Monotonic edit counter.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn writable(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        if self.is_frozen(id) {
            return Err(TreeError::Frozen(id));
        }
        Ok(&mut self.nodes[id.index()])
    }

    // Reads

    /// Re-read `parent[key]` from the live tree.
    pub fn read(&self, parent: Value, key: Key) -> Value {
        match (parent, key) {
            (Value::Node(owner), Key::Field(field)) => match self.node(owner).slot(field) {
                Some(SlotRef::Required(&id) | SlotRef::Optional(&Some(id))) => Value::Node(id),
                Some(SlotRef::Dense(_) | SlotRef::Holey(_)) => Value::List { owner, field },
                Some(SlotRef::Optional(None)) | None => Value::Null,
            },
            (Value::List { owner, field }, Key::Index(index)) => {
                match self.node(owner).slot(field) {
                    Some(SlotRef::Dense(items)) => {
                        items.get(index).map_or(Value::Null, |&id| Value::Node(id))
                    }
                    Some(SlotRef::Holey(items)) => items
                        .get(index)
                        .copied()
                        .flatten()
                        .map_or(Value::Null, Value::Node),
                    _ => Value::Null,
                }
            }
            _ => Value::Null,
        }
    }

    /// Current length of a list value; `None` for anything else.
    pub fn list_len(&self, list: Value) -> Option<usize> {
        let Value::List { owner, field } = list else {
            return None;
        };
        match self.node(owner).slot(field)? {
            SlotRef::Dense(items) => Some(items.len()),
            SlotRef::Holey(items) => Some(items.len()),
            SlotRef::Required(_) | SlotRef::Optional(_) => None,
        }
    }

    /// Snapshot of a list's items (`None` for holes).
    pub fn list_items(&self, list: Value) -> Option<Vec<Option<NodeId>>> {
        let Value::List { owner, field } = list else {
            return None;
        };
        match self.node(owner).slot(field)? {
            SlotRef::Dense(items) => Some(items.iter().copied().map(Some).collect()),
            SlotRef::Holey(items) => Some(items.clone()),
            SlotRef::Required(_) | SlotRef::Optional(_) => None,
        }
    }

    // Writes

    /// Assign `parent[key] = new`.
    ///
    /// `None` clears an optional field or splices a list slot out.
    /// Returns whether the slot changed.
    pub fn write(
        &mut self,
        parent: Value,
        key: Key,
        new: Option<NodeId>,
    ) -> Result<bool, TreeError> {
        let changed = match (parent, key) {
            (Value::Node(owner), Key::Field(field)) => {
                let node = self.writable(owner)?;
                let kind = node.kind_name();
                match node.slot_mut(field) {
                    Some(SlotMut::Required(slot)) => {
                        let Some(id) = new else {
                            return Err(TreeError::RequiredField { kind, field });
                        };
                        let changed = *slot != id;
                        *slot = id;
                        changed
                    }
                    Some(SlotMut::Optional(slot)) => {
                        let changed = *slot != new;
                        *slot = new;
                        changed
                    }
                    Some(SlotMut::Dense(_) | SlotMut::Holey(_)) => {
                        return Err(TreeError::ListField { kind, field });
                    }
                    None => return Err(TreeError::NotAField { kind, field }),
                }
            }
            (Value::List { owner, field }, Key::Index(index)) => {
                let node = self.writable(owner)?;
                let kind = node.kind_name();
                match node.slot_mut(field) {
                    Some(SlotMut::Dense(items)) => {
                        let len = items.len();
                        if index >= len {
                            return Err(TreeError::IndexOutOfBounds { index, len });
                        }
                        match new {
                            Some(id) => {
                                let changed = items[index] != id;
                                items[index] = id;
                                changed
                            }
                            None => {
                                items.remove(index);
                                true
                            }
                        }
                    }
                    Some(SlotMut::Holey(items)) => {
                        let len = items.len();
                        if index >= len {
                            return Err(TreeError::IndexOutOfBounds { index, len });
                        }
                        match new {
                            Some(id) => {
                                let changed = items[index] != Some(id);
                                items[index] = Some(id);
                                changed
                            }
                            None => {
                                items.remove(index);
                                true
                            }
                        }
                    }
                    Some(SlotMut::Required(_) | SlotMut::Optional(_)) | None => {
                        return Err(TreeError::NotAField { kind, field });
                    }
                }
            }
            (Value::Node(_), Key::Index(_)) => return Err(TreeError::NotAList),
            (Value::List { owner, .. }, Key::Field(field)) => {
                return Err(TreeError::NotAField {
                    kind: self.node(owner).kind_name(),
                    field,
                });
            }
            (Value::Null, _) => return Err(TreeError::Detached),
        };
        if changed {
            self.revision += 1;
        }
        Ok(changed)
    }

    /// Replace `range` of a list with `items`.
    pub fn splice(
        &mut self,
        list: Value,
        range: Range<usize>,
        items: &[NodeId],
    ) -> Result<(), TreeError> {
        let Value::List { owner, field } = list else {
            return Err(TreeError::NotAList);
        };
        let node = self.writable(owner)?;
        let kind = node.kind_name();
        match node.slot_mut(field) {
            Some(SlotMut::Dense(list)) => {
                let len = list.len();
                if range.start > range.end || range.end > len {
                    return Err(TreeError::IndexOutOfBounds {
                        index: range.end,
                        len,
                    });
                }
                list.splice(range.clone(), items.iter().copied());
            }
            Some(SlotMut::Holey(list)) => {
                let len = list.len();
                if range.start > range.end || range.end > len {
                    return Err(TreeError::IndexOutOfBounds {
                        index: range.end,
                        len,
                    });
                }
                list.splice(range.clone(), items.iter().copied().map(Some));
            }
            _ => return Err(TreeError::NotAField { kind, field }),
        }
        if !range.is_empty() || !items.is_empty() {
            self.revision += 1;
        }
        Ok(())
    }

    /// Shorten a list to `len` items. Returns whether anything was dropped.
    pub fn truncate(&mut self, list: Value, len: usize) -> Result<bool, TreeError> {
        let current = self.list_len(list).ok_or(TreeError::NotAList)?;
        if len >= current {
            return Ok(false);
        }
        self.splice(list, len..current, &[])?;
        Ok(true)
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
