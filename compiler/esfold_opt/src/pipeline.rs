//! Round-based driver over the folding passes.

use std::collections::BTreeMap;

use esfold_ir::{Ast, PathNode};
use esfold_walk::{DepthFirst, NodesOnly, Pipe, Walker};
use serde::{Deserialize, Serialize};

use crate::rules::{
    BinaryExpr, BooleanLiterals, ConditionalExpr, EmptyStatements, ExpressionStatements,
    IfStatement, LogicalExpr, Loops, MemberExpr, RuleStage, SequenceExpr, UnaryExpr,
    UnreachableTail,
};
use crate::{FoldCx, FoldError};

/// Optimizer settings.
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```
/// let options = esfold_opt::FoldOptions::from_json(r#"{ "max_rounds": 4 }"#).unwrap();
/// assert_eq!(options.max_rounds, 4);
/// assert!(options.minify_booleans);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoldOptions {
    /// Upper bound on full rounds over the tree.
    pub max_rounds: u32,
    /// Run the minify pass (`true` → `!0`).
    pub minify_booleans: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        FoldOptions {
            max_rounds: 16,
            minify_booleans: true,
        }
    }
}

impl FoldOptions {
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn with_minify_booleans(mut self, minify_booleans: bool) -> Self {
        self.minify_booleans = minify_booleans;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// What one run did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FoldStats {
    /// Rounds started, including the final one that changed nothing.
    pub rounds: u32,
    /// Total rule firings.
    pub rewrites: u64,
    /// Firings per rule name.
    pub rules: BTreeMap<&'static str, u64>,
}

impl FoldStats {
    pub(crate) fn record(&mut self, rule: &'static str) {
        self.rewrites += 1;
        *self.rules.entry(rule).or_default() += 1;
    }

    /// How often `rule` fired.
    pub fn hits(&self, rule: &str) -> u64 {
        self.rules.get(rule).copied().unwrap_or_default()
    }
}

// Passes

/// Constant evaluation and dead expression removal.
pub fn expression_pass<'a>() -> Pipe<FoldCx<'a>> {
    Pipe::new()
        .then(DepthFirst)
        .then(NodesOnly)
        .then(RuleStage(UnreachableTail))
        .then(RuleStage(ExpressionStatements))
        .then(RuleStage(ConditionalExpr))
        .then(RuleStage(LogicalExpr))
        .then(RuleStage(BinaryExpr))
        .then(RuleStage(UnaryExpr))
        .then(RuleStage(SequenceExpr))
        .then(RuleStage(MemberExpr))
}

/// Statement-shape cleanup.
pub fn statement_pass<'a>() -> Pipe<FoldCx<'a>> {
    Pipe::new()
        .then(DepthFirst)
        .then(NodesOnly)
        .then(RuleStage(EmptyStatements))
        .then(RuleStage(IfStatement))
        .then(RuleStage(Loops))
}

pub fn minify_pass<'a>() -> Pipe<FoldCx<'a>> {
    Pipe::new()
        .then(DepthFirst)
        .then(NodesOnly)
        .then(RuleStage(BooleanLiterals))
}

/// Runs the passes over a tree until nothing changes.
#[derive(Clone, Debug, Default)]
pub struct Optimizer {
    options: FoldOptions,
}

impl Optimizer {
    pub fn new(options: FoldOptions) -> Self {
        Optimizer { options }
    }

    pub fn options(&self) -> &FoldOptions {
        &self.options
    }

    /// Fold `ast` in place.
    ///
    /// A round walks the expression, statement and (optionally) minify
    /// passes over the whole program. Rounds repeat until one leaves the
    /// tree's revision unchanged or `max_rounds` is reached.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len()))]
    pub fn run(&self, ast: &mut Ast) -> Result<FoldStats, FoldError> {
        let mut passes = vec![
            ("expressions", expression_pass()),
            ("statements", statement_pass()),
        ];
        if self.options.minify_booleans {
            passes.push(("minify", minify_pass()));
        }

        let mut cx = FoldCx::new(ast);
        for round in 1..=self.options.max_rounds {
            let before = cx.ast.revision();
            for (name, pass) in &passes {
                let root = PathNode::root(cx.ast.root());
                pass.walk(&mut cx, root)?;
                tracing::trace!(round, pass = *name, revision = cx.ast.revision(), "pass done");
            }
            cx.stats.rounds = round;
            if cx.ast.revision() == before {
                let stats = cx.into_stats();
                tracing::debug!(rounds = stats.rounds, rewrites = stats.rewrites, "converged");
                return Ok(stats);
            }
        }

        let stats = cx.into_stats();
        tracing::warn!(
            max_rounds = self.options.max_rounds,
            rewrites = stats.rewrites,
            "round limit reached before a fixed point"
        );
        Ok(stats)
    }
}

/// Fold with default options.
pub fn fold(ast: &mut Ast) -> Result<FoldStats, FoldError> {
    Optimizer::default().run(ast)
}

#[cfg(test)]
mod tests;
