//! Compact single-line JavaScript rendering for logs and test assertions.
//!
//! Not a code generator: output is valid for the shapes the folding passes
//! produce, parenthesized by operator precedence, with one space between
//! statements.

use std::fmt::Write;

use esfold_stack::ensure_sufficient_stack;

use crate::ast::{BinaryOp, Literal, LogicalOp, Node, PropertyKind, UnaryOp};
use crate::{Ast, NodeId};

/// Render the whole program.
pub fn render(ast: &Ast) -> String {
    render_node(ast, ast.root())
}

/// Render one node (statement or expression) and its subtree.
pub fn render_node(ast: &Ast, id: NodeId) -> String {
    let mut printer = Printer {
        ast,
        out: String::new(),
    };
    printer.node(id);
    printer.out
}

// Precedence levels, loosest first.
const SEQUENCE: u8 = 0;
const ASSIGN: u8 = 1;
const CONDITIONAL: u8 = 2;
const UNARY: u8 = 14;
const POSTFIX: u8 = 15;
const CALL: u8 = 16;
const PRIMARY: u8 = 17;

const fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::BitOr => 5,
        BinaryOp::BitXor => 6,
        BinaryOp::BitAnd => 7,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 8,
        BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::InstanceOf => 9,
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 10,
        BinaryOp::Add | BinaryOp::Sub => 11,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 12,
        BinaryOp::Exp => 13,
    }
}

const fn logical_precedence(op: LogicalOp) -> u8 {
    match op {
        LogicalOp::Or => 3,
        LogicalOp::And => 4,
    }
}

fn precedence(node: &Node) -> u8 {
    match node {
        Node::SequenceExpression { .. } => SEQUENCE,
        Node::AssignmentExpression { .. } | Node::ArrowFunctionExpression { .. } => ASSIGN,
        Node::ConditionalExpression { .. } => CONDITIONAL,
        Node::LogicalExpression { operator, .. } => logical_precedence(*operator),
        Node::BinaryExpression { operator, .. } => binary_precedence(*operator),
        Node::UnaryExpression { .. } => UNARY,
        Node::UpdateExpression { prefix, .. } => {
            if *prefix {
                UNARY
            } else {
                POSTFIX
            }
        }
        Node::CallExpression { .. } | Node::NewExpression { .. } | Node::MemberExpression { .. } => {
            CALL
        }
        _ => PRIMARY,
    }
}

struct Printer<'a> {
    ast: &'a Ast,
    out: String,
}

impl Printer<'_> {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn node(&mut self, id: NodeId) {
        let ast = self.ast;
        match ast.node(id) {
            Node::Program { body } => self.statements(body),
            Node::ExpressionStatement { expression, .. } => {
                let text = render_expression(ast, *expression, SEQUENCE);
                if text.starts_with('{') || text.starts_with("function") {
                    let _ = write!(self.out, "({text});");
                } else {
                    let _ = write!(self.out, "{text};");
                }
            }
            Node::BlockStatement { body } => self.block(body),
            Node::EmptyStatement => self.push(";"),
            Node::DebuggerStatement => self.push("debugger;"),
            Node::WithStatement { object, body } => {
                self.push("with (");
                self.expression(*object, SEQUENCE);
                self.push(") ");
                self.node(*body);
            }
            Node::ReturnStatement { argument } => self.jump("return", *argument, true),
            Node::BreakStatement { label } => self.jump("break", *label, false),
            Node::ContinueStatement { label } => self.jump("continue", *label, false),
            Node::ThrowStatement { argument } => self.jump("throw", Some(*argument), true),
            Node::LabeledStatement { label, body } => {
                self.node(*label);
                self.push(": ");
                self.node(*body);
            }
            Node::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.push("if (");
                self.expression(*test, SEQUENCE);
                self.push(") ");
                self.node(*consequent);
                if let Some(alternate) = alternate {
                    self.push(" else ");
                    self.node(*alternate);
                }
            }
            Node::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.push("switch (");
                self.expression(*discriminant, SEQUENCE);
                self.push(") {");
                for case in cases {
                    self.push(" ");
                    self.node(*case);
                }
                self.push(" }");
            }
            Node::SwitchCase { test, consequent } => {
                match test {
                    Some(test) => {
                        self.push("case ");
                        self.expression(*test, SEQUENCE);
                        self.push(":");
                    }
                    None => self.push("default:"),
                }
                for statement in consequent {
                    self.push(" ");
                    self.node(*statement);
                }
            }
            Node::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.push("try ");
                self.node(*block);
                if let Some(handler) = handler {
                    self.push(" ");
                    self.node(*handler);
                }
                if let Some(finalizer) = finalizer {
                    self.push(" finally ");
                    self.node(*finalizer);
                }
            }
            Node::CatchClause { param, body } => {
                self.push("catch ");
                if let Some(param) = param {
                    self.push("(");
                    self.node(*param);
                    self.push(") ");
                }
                self.node(*body);
            }
            Node::WhileStatement { test, body } => {
                self.push("while (");
                self.expression(*test, SEQUENCE);
                self.push(") ");
                self.node(*body);
            }
            Node::DoWhileStatement { body, test } => {
                self.push("do ");
                self.node(*body);
                self.push(" while (");
                self.expression(*test, SEQUENCE);
                self.push(");");
            }
            Node::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.push("for (");
                if let Some(init) = init {
                    self.for_head(*init);
                }
                self.push(";");
                if let Some(test) = test {
                    self.push(" ");
                    self.expression(*test, SEQUENCE);
                }
                self.push(";");
                if let Some(update) = update {
                    self.push(" ");
                    self.expression(*update, SEQUENCE);
                }
                self.push(") ");
                self.node(*body);
            }
            Node::ForInStatement { left, right, body } => {
                self.push("for (");
                self.for_head(*left);
                self.push(" in ");
                self.expression(*right, SEQUENCE);
                self.push(") ");
                self.node(*body);
            }
            Node::FunctionDeclaration {
                id, params, body, ..
            } => self.function(*id, params, *body),
            Node::VariableDeclaration { .. } => {
                self.declaration(id);
                self.push(";");
            }
            Node::VariableDeclarator { id, init } => {
                self.node(*id);
                if let Some(init) = init {
                    self.push(" = ");
                    self.expression(*init, ASSIGN);
                }
            }
            _ => self.expression(id, SEQUENCE),
        }
    }

    fn statements(&mut self, body: &[NodeId]) {
        for (index, statement) in body.iter().enumerate() {
            if index > 0 {
                self.push(" ");
            }
            self.node(*statement);
        }
    }

    fn block(&mut self, body: &[NodeId]) {
        if body.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{ ");
        self.statements(body);
        self.push(" }");
    }

    fn jump(&mut self, keyword: &str, argument: Option<NodeId>, expression: bool) {
        self.push(keyword);
        if let Some(argument) = argument {
            self.push(" ");
            if expression {
                self.expression(argument, SEQUENCE);
            } else {
                self.node(argument);
            }
        }
        self.push(";");
    }

    /// `for` heads hold a declaration without its semicolon or an expression.
    fn for_head(&mut self, id: NodeId) {
        if matches!(self.ast.node(id), Node::VariableDeclaration { .. }) {
            self.declaration(id);
        } else {
            self.expression(id, SEQUENCE);
        }
    }

    fn declaration(&mut self, id: NodeId) {
        let Node::VariableDeclaration { declarations, kind } = self.ast.node(id) else {
            return;
        };
        self.push(kind.as_str());
        self.push(" ");
        for (index, declarator) in declarations.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.node(*declarator);
        }
    }

    fn function(&mut self, id: Option<NodeId>, params: &[NodeId], body: NodeId) {
        self.push("function");
        if let Some(id) = id {
            self.push(" ");
            self.node(id);
        }
        self.params(params);
        self.push(" ");
        self.node(body);
    }

    fn params(&mut self, params: &[NodeId]) {
        self.push("(");
        self.list(params, ASSIGN);
        self.push(")");
    }

    fn list(&mut self, items: &[NodeId], min: u8) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.expression(*item, min);
        }
    }

    fn expression(&mut self, id: NodeId, min: u8) {
        ensure_sufficient_stack(|| self.expression_inner(id, min));
    }

    fn expression_inner(&mut self, id: NodeId, min: u8) {
        let ast = self.ast;
        let node = ast.node(id);
        let wrap = precedence(node) < min;
        if wrap {
            self.push("(");
        }
        match node {
            Node::Identifier { name } => self.push(name),
            Node::Literal(literal) => self.literal(literal),
            Node::ThisExpression => self.push("this"),
            Node::ArrayExpression { elements } => {
                self.push("[");
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    if let Some(element) = element {
                        self.expression(*element, ASSIGN);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.push(",");
                }
                self.push("]");
            }
            Node::ObjectExpression { properties } => {
                if properties.is_empty() {
                    self.push("{}");
                } else {
                    self.push("{ ");
                    for (index, property) in properties.iter().enumerate() {
                        if index > 0 {
                            self.push(", ");
                        }
                        self.expression(*property, ASSIGN);
                    }
                    self.push(" }");
                }
            }
            Node::Property {
                key,
                value,
                kind,
                computed,
                shorthand,
                ..
            } => {
                if *shorthand {
                    self.expression(*value, ASSIGN);
                } else {
                    match kind {
                        PropertyKind::Init => {}
                        PropertyKind::Get => self.push("get "),
                        PropertyKind::Set => self.push("set "),
                    }
                    if *computed {
                        self.push("[");
                        self.expression(*key, ASSIGN);
                        self.push("]");
                    } else {
                        self.expression(*key, PRIMARY);
                    }
                    self.push(": ");
                    self.expression(*value, ASSIGN);
                }
            }
            Node::FunctionExpression {
                id, params, body, ..
            } => self.function(*id, params, *body),
            Node::ArrowFunctionExpression { params, body, .. } => {
                self.params(params);
                self.push(" => ");
                if matches!(ast.node(*body), Node::BlockStatement { .. }) {
                    self.node(*body);
                } else {
                    self.expression(*body, ASSIGN);
                }
            }
            Node::UnaryExpression { operator, argument } => {
                self.push(operator.as_str());
                let text = render_expression(ast, *argument, UNARY);
                let word = operator.as_str().ends_with(char::is_alphabetic);
                let clash = matches!(operator, UnaryOp::Minus | UnaryOp::Plus)
                    && text.starts_with(operator.as_str());
                if word || clash {
                    self.push(" ");
                }
                self.push(&text);
            }
            Node::UpdateExpression {
                operator,
                argument,
                prefix,
            } => {
                if *prefix {
                    self.push(operator.as_str());
                    self.expression(*argument, UNARY);
                } else {
                    self.expression(*argument, POSTFIX);
                    self.push(operator.as_str());
                }
            }
            Node::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let level = binary_precedence(*operator);
                // `**` groups to the right, everything else to the left.
                let (left_min, right_min) = if *operator == BinaryOp::Exp {
                    (level + 1, level)
                } else {
                    (level, level + 1)
                };
                self.expression(*left, left_min);
                self.push(" ");
                self.push(operator.as_str());
                self.push(" ");
                self.expression(*right, right_min);
            }
            Node::LogicalExpression {
                operator,
                left,
                right,
            } => {
                let level = logical_precedence(*operator);
                self.expression(*left, level);
                self.push(" ");
                self.push(operator.as_str());
                self.push(" ");
                self.expression(*right, level + 1);
            }
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                self.expression(*left, CALL);
                self.push(" ");
                self.push(operator.as_str());
                self.push(" ");
                self.expression(*right, ASSIGN);
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.expression(*test, CONDITIONAL + 1);
                self.push(" ? ");
                self.expression(*consequent, ASSIGN);
                self.push(" : ");
                self.expression(*alternate, ASSIGN);
            }
            Node::CallExpression { callee, arguments } => {
                self.expression(*callee, CALL);
                self.push("(");
                self.list(arguments, ASSIGN);
                self.push(")");
            }
            Node::NewExpression { callee, arguments } => {
                self.push("new ");
                self.expression(*callee, PRIMARY);
                self.push("(");
                self.list(arguments, ASSIGN);
                self.push(")");
            }
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                // `1.toString` would lex as a malformed number.
                let numeric = matches!(ast.node(*object), Node::Literal(Literal::Number(_)));
                self.expression(*object, if numeric { PRIMARY + 1 } else { CALL });
                if *computed {
                    self.push("[");
                    self.expression(*property, SEQUENCE);
                    self.push("]");
                } else {
                    self.push(".");
                    self.expression(*property, PRIMARY);
                }
            }
            Node::SequenceExpression { expressions } => self.list(expressions, ASSIGN),
            // Statements never sit in expression position.
            _ => self.node(id),
        }
        if wrap {
            self.push(")");
        }
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Null => self.push("null"),
            Literal::Bool(value) => self.push(if *value { "true" } else { "false" }),
            Literal::Number(value) => {
                let _ = write!(self.out, "{value}");
            }
            Literal::String(value) => {
                let quoted = serde_json::to_string(value).unwrap_or_default();
                self.push(&quoted);
            }
            Literal::RegExp { pattern, flags } => {
                let _ = write!(self.out, "/{pattern}/{flags}");
            }
        }
    }
}

fn render_expression(ast: &Ast, id: NodeId, min: u8) -> String {
    let mut printer = Printer {
        ast,
        out: String::new(),
    };
    printer.expression(id, min);
    printer.out
}
