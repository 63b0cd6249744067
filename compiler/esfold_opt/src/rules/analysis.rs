//! Positional facts about statements.

use esfold_ir::{Ast, Field, Key, Node, NodeId, PathNode};

/// `true` when the statement at `path` can never supply the completion
/// value of the program, so dropping its value is unobservable.
///
/// Walks outwards: a statement that is not last in its list is not in
/// completion position, nor is anything inside a function. Reaching the
/// `Program` along a chain of last statements means it is.
pub fn is_not_completion(ast: &Ast, path: &PathNode) -> bool {
    let mut current = path.clone();
    loop {
        let Some(parent) = current.parent() else {
            return true;
        };
        if parent.is_list() {
            let last = ast.list_len(parent.value()).and_then(|len| len.checked_sub(1));
            if current.index() != last {
                return true;
            }
        }
        let Some(owner) = current.parent_node().cloned() else {
            return true;
        };
        match ast.node_at(&owner) {
            Some(node) if node.is_function() => return true,
            Some(Node::Program { .. }) => return false,
            _ => current = owner,
        }
    }
}

/// `true` for a source directive (`"use strict";`) at the head of a program
/// or function body.
///
/// Only statements the parser marked with `directive` count. A string
/// statement produced by folding is an ordinary constant statement.
pub fn is_directive(ast: &Ast, path: &PathNode) -> bool {
    path.node().is_some_and(|id| is_marked_directive(ast, id))
        && in_directive_position(ast, path)
}

/// `true` when every statement before `path` in a program or function
/// body is a string-literal expression statement, i.e. a string statement
/// at `path` would be a directive.
pub fn in_directive_position(ast: &Ast, path: &PathNode) -> bool {
    let (Some(list), Some(index)) = (prologue_list(ast, path), path.index()) else {
        return false;
    };
    let Some(items) = ast.list_items(list.value()) else {
        return false;
    };
    items
        .iter()
        .take(index)
        .all(|item| item.is_some_and(|id| is_string_statement(ast, id)))
}

/// The statement list holding `path` when that list can carry a directive
/// prologue.
fn prologue_list<'p>(ast: &Ast, path: &'p PathNode) -> Option<&'p PathNode> {
    let list = path.parent().filter(|parent| parent.is_list())?;
    let owner = list.parent()?;
    match ast.node_at(owner)? {
        Node::Program { .. } => Some(list),
        Node::BlockStatement { .. } => {
            let function = owner.parent()?;
            let is_body = owner.key() == Some(Key::Field(Field::Body));
            (is_body && ast.node_at(function)?.is_function()).then_some(list)
        }
        _ => None,
    }
}

fn is_string_statement(ast: &Ast, id: NodeId) -> bool {
    match ast.node(id) {
        Node::ExpressionStatement { expression, .. } => {
            ast.node(*expression).as_str_literal().is_some()
        }
        _ => false,
    }
}

fn is_marked_directive(ast: &Ast, id: NodeId) -> bool {
    matches!(
        ast.node(id),
        Node::ExpressionStatement { directive: Some(_), .. }
    ) && is_string_statement(ast, id)
}
