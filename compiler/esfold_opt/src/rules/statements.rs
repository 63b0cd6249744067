//! Statement-level rules.

use esfold_ir::{Field, Key, LogicalOp, Node, NodeId, PathNode, VarKind};

use super::analysis::{is_directive, is_not_completion};
use super::FoldRule;
use crate::constants::JsValue;
use crate::{FoldCx, FoldError};

/// The list `path` sits in and its index there.
fn list_slot(path: &PathNode) -> Option<(&PathNode, usize)> {
    let list = path.parent().filter(|parent| parent.is_list())?;
    Some((list, path.index()?))
}

/// Splice the slot out of its list and walk the sibling that moved in.
fn remove_from_list(cx: &mut FoldCx<'_>, path: &PathNode) -> Result<PathNode, FoldError> {
    cx.ast.remove(path)?;
    Ok(path.refresh(cx.ast))
}

// Unreachable code

/// Drops statements after `return`, `break`, `continue` and `throw` in the
/// same list. Function and `var` declarations are hoisted and stay.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnreachableTail;

impl FoldRule for UnreachableTail {
    fn name(&self) -> &'static str {
        "unreachable-tail"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        if !matches!(
            cx.node(id),
            Node::ReturnStatement { .. }
                | Node::BreakStatement { .. }
                | Node::ContinueStatement { .. }
                | Node::ThrowStatement { .. }
        ) {
            return Ok(None);
        }
        let Some((list, index)) = list_slot(path) else {
            return Ok(None);
        };
        let Some(items) = cx.ast.list_items(list.value()) else {
            return Ok(None);
        };
        let Some(tail) = items.get(index + 1..) else {
            return Ok(None);
        };
        let kept: Vec<NodeId> = tail
            .iter()
            .flatten()
            .copied()
            .filter(|&statement| is_hoisted(cx, statement))
            .collect();
        if kept.len() == tail.len() {
            return Ok(None);
        }
        cx.ast.splice(list.value(), index + 1..items.len(), &kept)?;
        Ok(Some(path.clone()))
    }
}

fn is_hoisted(cx: &FoldCx<'_>, statement: NodeId) -> bool {
    matches!(
        cx.node(statement),
        Node::FunctionDeclaration { .. }
            | Node::VariableDeclaration {
                kind: VarKind::Var,
                ..
            }
    )
}

// Expression statements

/// Merges runs of adjacent expression statements into one sequence, then
/// drops a constant expression statement whose value nobody can observe.
///
/// Directives are never merged or dropped.
#[derive(Copy, Clone, Debug, Default)]
pub struct ExpressionStatements;

impl FoldRule for ExpressionStatements {
    fn name(&self) -> &'static str {
        "expression-statements"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::ExpressionStatement { expression, .. } = cx.node(id) else {
            return Ok(None);
        };
        if is_directive(cx.ast, path) {
            return Ok(None);
        }
        if let Some(retry) = merge_run(cx, path)? {
            return Ok(Some(retry));
        }
        if !is_not_completion(cx.ast, path) || !cx.is_constant(expression) {
            return Ok(None);
        }
        if list_slot(path).is_some() {
            return Ok(Some(remove_from_list(cx, path)?));
        }
        let empty = cx.empty_statement();
        Ok(Some(cx.replace(path, empty)?))
    }
}

/// `a; b; c;` becomes `a, b, c;`. Sequences are flattened one level.
fn merge_run(cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
    let Some((list, index)) = list_slot(path) else {
        return Ok(None);
    };
    let Some(items) = cx.ast.list_items(list.value()) else {
        return Ok(None);
    };
    let mut expressions = Vec::new();
    let mut run = 0;
    for item in items.iter().skip(index) {
        let Some(&Node::ExpressionStatement { expression, .. }) = item.map(|id| cx.node(id)) else {
            break;
        };
        match cx.node(expression) {
            Node::SequenceExpression { expressions: inner } => expressions.extend_from_slice(inner),
            _ => expressions.push(expression),
        }
        run += 1;
    }
    if run < 2 {
        return Ok(None);
    }
    let sequence = cx.alloc(Node::SequenceExpression { expressions })?;
    let statement = cx.expression_statement(sequence)?;
    cx.ast.splice(list.value(), index..index + run, &[statement])?;
    Ok(Some(path.refresh(cx.ast)))
}

// Empty statements

/// Removes `;` and `{}` from statement lists.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyStatements;

impl FoldRule for EmptyStatements {
    fn name(&self) -> &'static str {
        "empty-statements"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        if !cx.node(id).is_empty_statement() || list_slot(path).is_none() {
            return Ok(None);
        }
        Ok(Some(remove_from_list(cx, path)?))
    }
}

// If statements

/// Turns `if` statements into expressions where the completion value allows
/// it, resolves constant tests, and normalizes empty branches.
#[derive(Copy, Clone, Debug, Default)]
pub struct IfStatement;

impl FoldRule for IfStatement {
    fn name(&self) -> &'static str {
        "if-statement"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::IfStatement {
            test,
            consequent,
            alternate,
        } = cx.node(id)
        else {
            return Ok(None);
        };
        let not_completion = is_not_completion(cx.ast, path);

        // `if (t) {}` → `t;`
        if not_completion && alternate.is_none() && cx.node(consequent).is_empty_statement() {
            let statement = cx.expression_statement(test)?;
            return Ok(Some(cx.replace(path, statement)?));
        }

        // `if (t) a; else b;` → `t ? a : b;`, `if (t) a;` → `t && a;`
        if let Some(then) = statement_expression(cx, consequent) {
            let otherwise = alternate.and_then(|alternate| statement_expression(cx, alternate));
            let expression = match (alternate, otherwise) {
                (Some(_), Some(otherwise)) => Some(Node::ConditionalExpression {
                    test,
                    consequent: then,
                    alternate: otherwise,
                }),
                (None, _) if not_completion => Some(Node::LogicalExpression {
                    operator: LogicalOp::And,
                    left: test,
                    right: then,
                }),
                _ => None,
            };
            if let Some(expression) = expression {
                let expression = cx.alloc(expression)?;
                let statement = cx.expression_statement(expression)?;
                return Ok(Some(cx.replace(path, statement)?));
            }
        }

        if let Some(value) = cx.constant(test)? {
            let branch = if value.to_boolean() {
                consequent
            } else {
                match alternate {
                    Some(alternate) => alternate,
                    None => cx.empty_statement(),
                }
            };
            return Ok(Some(cx.replace(path, branch)?));
        }

        let slot = path.value();
        let mut updated = false;
        if !cx.pool.is_empty_statement(consequent) && cx.node(consequent).is_empty_statement() {
            let empty = cx.empty_statement();
            updated |= cx.ast.write(slot, Key::Field(Field::Consequent), Some(empty))?;
        }
        if alternate.is_some_and(|alternate| cx.node(alternate).is_empty_statement()) {
            updated |= cx.ast.write(slot, Key::Field(Field::Alternate), None)?;
        }
        Ok(updated.then(|| path.clone()))
    }
}

fn statement_expression(cx: &FoldCx<'_>, statement: NodeId) -> Option<NodeId> {
    match cx.node(statement) {
        Node::ExpressionStatement { expression, .. } => Some(*expression),
        _ => None,
    }
}

// Loops

/// Removes loops that never run and normalizes loop heads and empty bodies.
#[derive(Copy, Clone, Debug, Default)]
pub struct Loops;

impl FoldRule for Loops {
    fn name(&self) -> &'static str {
        "loops"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        match *cx.node(id) {
            Node::DoWhileStatement { body, .. } => {
                Ok(canonical_empty_body(cx, path, body)?.then(|| path.clone()))
            }
            Node::WhileStatement { test, body } => {
                if cx.constant(test)?.is_some_and(|value| !value.to_boolean()) {
                    let empty = cx.empty_statement();
                    return Ok(Some(cx.replace(path, empty)?));
                }
                Ok(canonical_empty_body(cx, path, body)?.then(|| path.clone()))
            }
            Node::ForStatement {
                init,
                test,
                update,
                body,
            } => fold_for(cx, path, init, test, update, body),
            _ => Ok(None),
        }
    }
}

/// Swap an empty body for the shared empty statement.
fn canonical_empty_body(
    cx: &mut FoldCx<'_>,
    path: &PathNode,
    body: NodeId,
) -> Result<bool, FoldError> {
    if cx.pool.is_empty_statement(body) || !cx.node(body).is_empty_statement() {
        return Ok(false);
    }
    let empty = cx.empty_statement();
    Ok(cx.ast.write(path.value(), Key::Field(Field::Body), Some(empty))?)
}

fn fold_for(
    cx: &mut FoldCx<'_>,
    path: &PathNode,
    init: Option<NodeId>,
    test: Option<NodeId>,
    update: Option<NodeId>,
    body: NodeId,
) -> Result<Option<PathNode>, FoldError> {
    let test_value = match test {
        Some(test) => cx.constant(test)?,
        None => None,
    };

    // The body never runs; only the head's initializer survives.
    if test_value.as_ref().is_some_and(|value| !value.to_boolean()) {
        let replacement = match init {
            None => Some(cx.empty_statement()),
            Some(init) => match cx.node(init) {
                Node::VariableDeclaration {
                    kind: VarKind::Var, ..
                } => Some(init),
                // `let`/`const` bindings are scoped to the loop.
                Node::VariableDeclaration { .. } => None,
                _ => Some(cx.expression_statement(init)?),
            },
        };
        if let Some(replacement) = replacement {
            return Ok(Some(cx.replace(path, replacement)?));
        }
    }

    let slot = path.value();
    let mut updated = canonical_empty_body(cx, path, body)?;
    if init.is_some_and(|init| cx.is_constant(init)) {
        updated |= cx.ast.write(slot, Key::Field(Field::Init), None)?;
    }
    if let Some(value) = test_value {
        if value.to_boolean() {
            updated |= cx.ast.write(slot, Key::Field(Field::Test), None)?;
        } else if value != JsValue::Bool(false) {
            let constant = cx.to_const(&JsValue::Bool(false))?;
            updated |= cx.ast.write(slot, Key::Field(Field::Test), Some(constant))?;
        }
    }
    if update.is_some_and(|update| cx.is_constant(update)) {
        updated |= cx.ast.write(slot, Key::Field(Field::Update), None)?;
    }
    Ok(updated.then(|| path.clone()))
}
