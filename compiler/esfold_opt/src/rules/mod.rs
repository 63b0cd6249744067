//! Folding rules.
//!
//! A rule looks at one node path and either leaves it alone (`Ok(None)`)
//! or rewrites the tree at or around it and returns the path to walk again
//! (`Ok(Some(path))`). A rule only answers `Some` when it changed the tree,
//! so the per-slot retry loop always reaches a fixed point.
//!
//! Rules are grouped by the pass that runs them:
//!
//! | Pass | Rules |
//! |---|---|
//! | expressions | [`UnreachableTail`], [`ExpressionStatements`], [`ConditionalExpr`], [`LogicalExpr`], [`BinaryExpr`], [`UnaryExpr`], [`SequenceExpr`], [`MemberExpr`] |
//! | statements | [`EmptyStatements`], [`IfStatement`], [`Loops`] |
//! | minify | [`BooleanLiterals`] |

mod analysis;
mod expressions;
mod minify;
mod statements;

pub use analysis::{in_directive_position, is_directive, is_not_completion};
pub use expressions::{
    BinaryExpr, ConditionalExpr, LogicalExpr, MemberExpr, SequenceExpr, UnaryExpr,
};
pub use minify::BooleanLiterals;
pub use statements::{EmptyStatements, ExpressionStatements, IfStatement, Loops, UnreachableTail};

use esfold_ir::{source, PathNode};
use esfold_walk::{Command, Next, Walker};

use crate::{FoldCx, FoldError};

/// One rewrite.
pub trait FoldRule {
    /// Stable name used in logs and [`FoldStats`](crate::FoldStats).
    fn name(&self) -> &'static str;

    /// Rewrite at `path` (always a node path) or return `Ok(None)`.
    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError>;
}

/// Runs a [`FoldRule`] as a walk stage.
///
/// Paths whose owner is a frozen canonical node are passed on untouched:
/// shared constants are never rewritten in place.
#[derive(Copy, Clone, Debug, Default)]
pub struct RuleStage<R>(pub R);

impl<'a, R: FoldRule> Walker<FoldCx<'a>> for RuleStage<R> {
    fn inputs(
        &self,
        cx: &mut FoldCx<'a>,
        path: PathNode,
        next: &mut Next<'_, FoldCx<'a>>,
    ) -> Result<Command, FoldError> {
        if path.node().is_none() || in_frozen_node(cx, &path) {
            return next(cx, path);
        }
        let Some(retry) = self.0.fold(cx, &path)? else {
            return next(cx, path);
        };
        let rule = self.0.name();
        cx.stats.record(rule);
        tracing::debug!(
            rule,
            at = ?path,
            now = %retry.node().map(|id| source::render_node(cx.ast, id)).unwrap_or_default(),
            "fold"
        );
        Ok(Command::Retry(retry))
    }
}

fn in_frozen_node(cx: &FoldCx<'_>, path: &PathNode) -> bool {
    path.parent_node()
        .and_then(PathNode::node)
        .is_some_and(|owner| cx.ast.is_frozen(owner))
}

#[cfg(test)]
mod tests;
