//! Paths: addresses of values inside an [`Ast`].
//!
//! A [`PathNode`] records what was found at a slot (`value`), the path of
//! the enclosing value (`parent`) and the key that leads from parent to
//! slot. Paths are cheap to clone and never own tree data.
//!
//! The `value` is a snapshot. After a sibling splice, a retained path may
//! point at a slot whose index has shifted; re-derive it with
//! [`PathNode::refresh`] or edit only through the path currently being
//! visited.

use std::fmt;
use std::rc::Rc;

use crate::{Ast, Key, Node, NodeId, TreeError, Value};

struct PathData {
    value: Value,
    parent: Option<PathNode>,
    key: Option<Key>,
}

/// Address of a value in the tree.
#[derive(Clone)]
pub struct PathNode(Rc<PathData>);

impl PathNode {
    /// The root path of a tree.
    pub fn root(id: NodeId) -> Self {
        PathNode(Rc::new(PathData {
            value: Value::Node(id),
            parent: None,
            key: None,
        }))
    }

    /// Path reached by `key` from `self`, reading the live tree.
    pub fn child(&self, ast: &Ast, key: impl Into<Key>) -> PathNode {
        let key = key.into();
        PathNode(Rc::new(PathData {
            value: ast.read(self.value(), key),
            parent: Some(self.clone()),
            key: Some(key),
        }))
    }

    /// Descend one key at a time. A missing key yields [`Value::Null`] and
    /// every later step stays null.
    pub fn get(&self, ast: &Ast, keys: &[Key]) -> PathNode {
        keys.iter()
            .fold(self.clone(), |path, &key| path.child(ast, key))
    }

    /// Same slot, different value.
    pub fn with_value(&self, value: Value) -> PathNode {
        PathNode(Rc::new(PathData {
            value,
            parent: self.0.parent.clone(),
            key: self.0.key,
        }))
    }

    /// Re-read this slot from the live tree.
    pub fn refresh(&self, ast: &Ast) -> PathNode {
        match (&self.0.parent, self.0.key) {
            (Some(parent), Some(key)) => parent.child(ast, key),
            _ => self.clone(),
        }
    }

    #[inline]
    pub fn value(&self) -> Value {
        self.0.value
    }

    #[inline]
    pub fn node(&self) -> Option<NodeId> {
        self.0.value.node()
    }

    #[inline]
    pub fn parent(&self) -> Option<&PathNode> {
        self.0.parent.as_ref()
    }

    #[inline]
    pub fn key(&self) -> Option<Key> {
        self.0.key
    }

    /// List index of this slot, if the parent is a list.
    pub fn index(&self) -> Option<usize> {
        match self.0.key {
            Some(Key::Index(index)) => Some(index),
            _ => None,
        }
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        self.0.value.is_list()
    }

    /// Nearest ancestor whose value is a node, skipping list values.
    pub fn parent_node(&self) -> Option<&PathNode> {
        let mut current = self.parent()?;
        while current.is_list() {
            current = current.parent()?;
        }
        Some(current)
    }

    /// Number of keys from the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = parent;
        }
        depth
    }
}

impl From<NodeId> for PathNode {
    fn from(id: NodeId) -> Self {
        PathNode::root(id)
    }
}

impl fmt::Debug for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = Vec::new();
        let mut current = self;
        while let Some(parent) = current.parent() {
            if let Some(key) = current.key() {
                keys.push(key);
            }
            current = parent;
        }
        f.write_str("$")?;
        for key in keys.iter().rev() {
            write!(f, "{key}")?;
        }
        write!(f, " = {:?}", self.value())
    }
}

impl Ast {
    /// The node a path points at, if any.
    pub fn node_at(&self, path: &PathNode) -> Option<&Node> {
        path.node().map(|id| self.node(id))
    }

    /// Put `id` into the slot `path` addresses and return the retry path
    /// for that slot.
    pub fn replace(&mut self, path: &PathNode, id: NodeId) -> Result<PathNode, TreeError> {
        let (parent, key) = Self::slot_of(path)?;
        self.write(parent.value(), key, Some(id))?;
        Ok(path.with_value(Value::Node(id)))
    }

    /// Clear the slot `path` addresses (splice it out of a list).
    pub fn remove(&mut self, path: &PathNode) -> Result<(), TreeError> {
        let (parent, key) = Self::slot_of(path)?;
        self.write(parent.value(), key, None)?;
        Ok(())
    }

    fn slot_of(path: &PathNode) -> Result<(&PathNode, Key), TreeError> {
        match (path.parent(), path.key()) {
            (Some(parent), Some(key)) => Ok((parent, key)),
            _ => Err(TreeError::Detached),
        }
    }
}
