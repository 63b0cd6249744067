//! Per-run folding state.

use esfold_ir::{Ast, Node, NodeId, PathNode};
use esfold_walk::WalkContext;

use crate::constants::{ConstantPool, JsValue};
use crate::{FoldError, FoldStats};

/// State threaded through every folding walk of one run: the tree being
/// rewritten, the run's constant pool, and the counters.
pub struct FoldCx<'a> {
    pub(crate) ast: &'a mut Ast,
    pub(crate) pool: ConstantPool,
    pub(crate) stats: FoldStats,
}

impl<'a> FoldCx<'a> {
    pub fn new(ast: &'a mut Ast) -> Self {
        FoldCx {
            ast,
            pool: ConstantPool::new(),
            stats: FoldStats::default(),
        }
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut *self.ast
    }

    pub fn pool(&self) -> &ConstantPool {
        &self.pool
    }

    pub fn stats(&self) -> &FoldStats {
        &self.stats
    }

    pub(crate) fn into_stats(self) -> FoldStats {
        self.stats
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.ast.node(id)
    }

    pub fn is_constant(&self, id: NodeId) -> bool {
        self.pool.is_constant(&*self.ast, id)
    }

    /// The value of `id` if it is a compile-time constant.
    pub fn constant(&self, id: NodeId) -> Result<Option<JsValue>, FoldError> {
        if !self.is_constant(id) {
            return Ok(None);
        }
        self.pool.value_of(&*self.ast, id).map(Some)
    }

    pub fn to_const(&mut self, value: &JsValue) -> Result<NodeId, FoldError> {
        self.pool.to_const_node(self.ast, value)
    }

    pub fn empty_statement(&mut self) -> NodeId {
        self.pool.empty_statement(self.ast)
    }

    pub fn alloc(&mut self, node: Node) -> Result<NodeId, FoldError> {
        Ok(self.ast.try_alloc(node)?)
    }

    /// Wrap an expression in a fresh `ExpressionStatement`.
    pub fn expression_statement(&mut self, expression: NodeId) -> Result<NodeId, FoldError> {
        self.alloc(Node::ExpressionStatement {
            expression,
            directive: None,
        })
    }

    /// Put `id` in the slot `path` addresses; returns the retry path.
    pub fn replace(&mut self, path: &PathNode, id: NodeId) -> Result<PathNode, FoldError> {
        Ok(self.ast.replace(path, id)?)
    }
}

impl WalkContext for FoldCx<'_> {
    type Error = FoldError;

    fn ast(&self) -> &Ast {
        &*self.ast
    }
}
