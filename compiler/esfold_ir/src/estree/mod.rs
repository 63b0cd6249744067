//! ESTree JSON boundary.
//!
//! Parsing and code generation live outside this workspace. An external
//! ESTree parser (esprima, acorn) produces JSON that [`from_json`] imports
//! into an [`Ast`]; [`to_json`] exports the rewritten tree for an external
//! generator (escodegen).
//!
//! Location data (`loc`, `range`, `start`, `end`) and `raw` are dropped on
//! import. Null JSON values count as absent.

use esfold_stack::ensure_sufficient_stack;
use serde_json::{json, Map, Value as Json};

use crate::{
    AssignOp, Ast, BinaryOp, EstreeError, Literal, LogicalOp, Node, NodeId, PropertyKind,
    UnaryOp, UpdateOp, VarKind,
};

/// Import a `Program` node.
pub fn from_json(json: &Json) -> Result<Ast, EstreeError> {
    let kind = Record::new(json)?.kind;
    if kind != "Program" {
        return Err(EstreeError::NotAProgram(kind.to_owned()));
    }
    let mut ast = Ast::new();
    let root = Importer { ast: &mut ast }.node(json)?;
    ast.set_root(root);
    Ok(ast)
}

/// Export the tree reachable from the root.
pub fn to_json(ast: &Ast) -> Json {
    export(ast, ast.root())
}

/// Export one subtree.
pub fn node_to_json(ast: &Ast, id: NodeId) -> Json {
    export(ast, id)
}

// Import

/// A JSON object known to carry a `type`.
struct Record<'j> {
    kind: &'j str,
    fields: &'j Map<String, Json>,
}

impl<'j> Record<'j> {
    fn new(json: &'j Json) -> Result<Self, EstreeError> {
        let fields = json.as_object().ok_or(EstreeError::MissingType)?;
        let kind = fields
            .get("type")
            .and_then(Json::as_str)
            .ok_or(EstreeError::MissingType)?;
        Ok(Record { kind, fields })
    }

    fn get(&self, field: &'static str) -> Option<&'j Json> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    fn missing(&self, field: &'static str) -> EstreeError {
        EstreeError::MissingField {
            kind: self.kind.to_owned(),
            field,
        }
    }

    fn invalid(&self, field: &'static str) -> EstreeError {
        EstreeError::InvalidField {
            kind: self.kind.to_owned(),
            field,
        }
    }

    /// Boolean attribute; absent means `false`.
    fn flag(&self, field: &'static str) -> Result<bool, EstreeError> {
        match self.get(field) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| self.invalid(field)),
        }
    }

    fn str(&self, field: &'static str) -> Result<&'j str, EstreeError> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_str()
            .ok_or_else(|| self.invalid(field))
    }

    fn opt_str(&self, field: &'static str) -> Result<Option<String>, EstreeError> {
        self.get(field)
            .map(|value| value.as_str().map(str::to_owned).ok_or_else(|| self.invalid(field)))
            .transpose()
    }

    fn operator<T>(&self, parse: fn(&str) -> Option<T>) -> Result<T, EstreeError> {
        let text = self.str("operator")?;
        parse(text).ok_or_else(|| EstreeError::UnknownOperator {
            kind: self.kind.to_owned(),
            operator: text.to_owned(),
        })
    }

    fn array(&self, field: &'static str) -> Result<&'j [Json], EstreeError> {
        match self.get(field) {
            None => Ok(&[]),
            Some(value) => value
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| self.invalid(field)),
        }
    }
}

struct Importer<'a> {
    ast: &'a mut Ast,
}

impl Importer<'_> {
    fn node(&mut self, json: &Json) -> Result<NodeId, EstreeError> {
        ensure_sufficient_stack(|| self.import(json))
    }

    fn required(&mut self, r: &Record<'_>, field: &'static str) -> Result<NodeId, EstreeError> {
        let json = r.get(field).ok_or_else(|| r.missing(field))?;
        self.node(json)
    }

    fn optional(
        &mut self,
        r: &Record<'_>,
        field: &'static str,
    ) -> Result<Option<NodeId>, EstreeError> {
        r.get(field).map(|json| self.node(json)).transpose()
    }

    fn list(&mut self, r: &Record<'_>, field: &'static str) -> Result<Vec<NodeId>, EstreeError> {
        r.array(field)?
            .iter()
            .map(|json| {
                if json.is_null() {
                    Err(r.invalid(field))
                } else {
                    self.node(json)
                }
            })
            .collect()
    }

    fn holey_list(
        &mut self,
        r: &Record<'_>,
        field: &'static str,
    ) -> Result<Vec<Option<NodeId>>, EstreeError> {
        r.array(field)?
            .iter()
            .map(|json| {
                if json.is_null() {
                    Ok(None)
                } else {
                    self.node(json).map(Some)
                }
            })
            .collect()
    }

    fn import(&mut self, json: &Json) -> Result<NodeId, EstreeError> {
        let r = Record::new(json)?;
        let node = match r.kind {
            "Program" => Node::Program {
                body: self.list(&r, "body")?,
            },
            "ExpressionStatement" => Node::ExpressionStatement {
                expression: self.required(&r, "expression")?,
                directive: r.opt_str("directive")?,
            },
            "BlockStatement" => Node::BlockStatement {
                body: self.list(&r, "body")?,
            },
            "EmptyStatement" => Node::EmptyStatement,
            "DebuggerStatement" => Node::DebuggerStatement,
            "WithStatement" => Node::WithStatement {
                object: self.required(&r, "object")?,
                body: self.required(&r, "body")?,
            },
            "ReturnStatement" => Node::ReturnStatement {
                argument: self.optional(&r, "argument")?,
            },
            "LabeledStatement" => Node::LabeledStatement {
                label: self.required(&r, "label")?,
                body: self.required(&r, "body")?,
            },
            "BreakStatement" => Node::BreakStatement {
                label: self.optional(&r, "label")?,
            },
            "ContinueStatement" => Node::ContinueStatement {
                label: self.optional(&r, "label")?,
            },
            "IfStatement" => Node::IfStatement {
                test: self.required(&r, "test")?,
                consequent: self.required(&r, "consequent")?,
                alternate: self.optional(&r, "alternate")?,
            },
            "SwitchStatement" => Node::SwitchStatement {
                discriminant: self.required(&r, "discriminant")?,
                cases: self.list(&r, "cases")?,
            },
            "SwitchCase" => Node::SwitchCase {
                test: self.optional(&r, "test")?,
                consequent: self.list(&r, "consequent")?,
            },
            "ThrowStatement" => Node::ThrowStatement {
                argument: self.required(&r, "argument")?,
            },
            "TryStatement" => Node::TryStatement {
                block: self.required(&r, "block")?,
                handler: self.optional(&r, "handler")?,
                finalizer: self.optional(&r, "finalizer")?,
            },
            "CatchClause" => Node::CatchClause {
                param: self.optional(&r, "param")?,
                body: self.required(&r, "body")?,
            },
            "WhileStatement" => Node::WhileStatement {
                test: self.required(&r, "test")?,
                body: self.required(&r, "body")?,
            },
            "DoWhileStatement" => Node::DoWhileStatement {
                body: self.required(&r, "body")?,
                test: self.required(&r, "test")?,
            },
            "ForStatement" => Node::ForStatement {
                init: self.optional(&r, "init")?,
                test: self.optional(&r, "test")?,
                update: self.optional(&r, "update")?,
                body: self.required(&r, "body")?,
            },
            "ForInStatement" => Node::ForInStatement {
                left: self.required(&r, "left")?,
                right: self.required(&r, "right")?,
                body: self.required(&r, "body")?,
            },
            "FunctionDeclaration" => Node::FunctionDeclaration {
                id: self.optional(&r, "id")?,
                params: self.list(&r, "params")?,
                body: self.required(&r, "body")?,
                generator: r.flag("generator")?,
                is_async: r.flag("async")?,
            },
            "FunctionExpression" => Node::FunctionExpression {
                id: self.optional(&r, "id")?,
                params: self.list(&r, "params")?,
                body: self.required(&r, "body")?,
                generator: r.flag("generator")?,
                is_async: r.flag("async")?,
            },
            "ArrowFunctionExpression" => Node::ArrowFunctionExpression {
                params: self.list(&r, "params")?,
                body: self.required(&r, "body")?,
                expression: r.flag("expression")?,
                is_async: r.flag("async")?,
            },
            "VariableDeclaration" => Node::VariableDeclaration {
                declarations: self.list(&r, "declarations")?,
                kind: VarKind::from_estree(r.str("kind")?).ok_or_else(|| r.invalid("kind"))?,
            },
            "VariableDeclarator" => Node::VariableDeclarator {
                id: self.required(&r, "id")?,
                init: self.optional(&r, "init")?,
            },
            "Identifier" => Node::Identifier {
                name: r.str("name")?.to_owned(),
            },
            "Literal" => Node::Literal(literal(&r)?),
            "ThisExpression" => Node::ThisExpression,
            "ArrayExpression" => Node::ArrayExpression {
                elements: self.holey_list(&r, "elements")?,
            },
            "ObjectExpression" => Node::ObjectExpression {
                properties: self.list(&r, "properties")?,
            },
            "Property" => Node::Property {
                key: self.required(&r, "key")?,
                value: self.required(&r, "value")?,
                kind: match r.get("kind") {
                    None => PropertyKind::Init,
                    Some(_) => PropertyKind::from_estree(r.str("kind")?)
                        .ok_or_else(|| r.invalid("kind"))?,
                },
                computed: r.flag("computed")?,
                method: r.flag("method")?,
                shorthand: r.flag("shorthand")?,
            },
            "UnaryExpression" => Node::UnaryExpression {
                operator: r.operator(UnaryOp::from_estree)?,
                argument: self.required(&r, "argument")?,
            },
            "UpdateExpression" => Node::UpdateExpression {
                operator: r.operator(UpdateOp::from_estree)?,
                argument: self.required(&r, "argument")?,
                prefix: r.flag("prefix")?,
            },
            "BinaryExpression" => Node::BinaryExpression {
                operator: r.operator(BinaryOp::from_estree)?,
                left: self.required(&r, "left")?,
                right: self.required(&r, "right")?,
            },
            "LogicalExpression" => Node::LogicalExpression {
                operator: r.operator(LogicalOp::from_estree)?,
                left: self.required(&r, "left")?,
                right: self.required(&r, "right")?,
            },
            "AssignmentExpression" => Node::AssignmentExpression {
                operator: r.operator(AssignOp::from_estree)?,
                left: self.required(&r, "left")?,
                right: self.required(&r, "right")?,
            },
            "ConditionalExpression" => Node::ConditionalExpression {
                test: self.required(&r, "test")?,
                consequent: self.required(&r, "consequent")?,
                alternate: self.required(&r, "alternate")?,
            },
            "CallExpression" => Node::CallExpression {
                callee: self.required(&r, "callee")?,
                arguments: self.list(&r, "arguments")?,
            },
            "NewExpression" => Node::NewExpression {
                callee: self.required(&r, "callee")?,
                arguments: self.list(&r, "arguments")?,
            },
            "MemberExpression" => Node::MemberExpression {
                object: self.required(&r, "object")?,
                property: self.required(&r, "property")?,
                computed: r.flag("computed")?,
            },
            "SequenceExpression" => Node::SequenceExpression {
                expressions: self.list(&r, "expressions")?,
            },
            other => return Err(EstreeError::UnknownType(other.to_owned())),
        };
        Ok(self.ast.try_alloc(node)?)
    }
}

fn literal(r: &Record<'_>) -> Result<Literal, EstreeError> {
    if let Some(regex) = r.get("regex") {
        let pattern = regex.get("pattern").and_then(Json::as_str);
        let flags = regex.get("flags").and_then(Json::as_str).unwrap_or("");
        return match pattern {
            Some(pattern) => Ok(Literal::RegExp {
                pattern: pattern.to_owned(),
                flags: flags.to_owned(),
            }),
            None => Err(r.invalid("regex")),
        };
    }
    match r.get("value") {
        None => Ok(Literal::Null),
        Some(Json::Bool(value)) => Ok(Literal::Bool(*value)),
        Some(Json::Number(number)) => number
            .as_f64()
            .map(Literal::Number)
            .ok_or_else(|| r.invalid("value")),
        Some(Json::String(value)) => Ok(Literal::String(value.clone())),
        Some(_) => Err(r.invalid("value")),
    }
}

// Export

/// Largest magnitude exported as a JSON integer (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn number(value: f64) -> Json {
    let integral = value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER;
    if integral && !(value == 0.0 && value.is_sign_negative()) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "integral and below 2^53 in magnitude"
        )]
        let int = value as i64;
        return json!(int);
    }
    json!(value)
}

fn export_literal(literal: &Literal) -> Json {
    match literal {
        Literal::Null => json!({ "type": "Literal", "value": null }),
        Literal::Bool(value) => json!({ "type": "Literal", "value": value }),
        Literal::Number(value) => json!({ "type": "Literal", "value": number(*value) }),
        Literal::String(value) => json!({ "type": "Literal", "value": value }),
        Literal::RegExp { pattern, flags } => json!({
            "type": "Literal",
            "value": null,
            "regex": { "pattern": pattern, "flags": flags },
        }),
    }
}

fn export(ast: &Ast, id: NodeId) -> Json {
    ensure_sufficient_stack(|| export_node(ast, id))
}

fn export_node(ast: &Ast, id: NodeId) -> Json {
    let one = |id: NodeId| export(ast, id);
    let opt = |id: Option<NodeId>| id.map_or(Json::Null, |id| export(ast, id));
    let all = |ids: &[NodeId]| Json::Array(ids.iter().map(|&id| export(ast, id)).collect());

    let node = ast.node(id);
    let kind = node.kind_name();
    match node {
        Node::Program { body } => json!({ "type": kind, "sourceType": "script", "body": all(body) }),
        Node::ExpressionStatement {
            expression,
            directive,
        } => {
            let mut out = json!({ "type": kind, "expression": one(*expression) });
            if let (Some(directive), Some(fields)) = (directive, out.as_object_mut()) {
                fields.insert("directive".to_owned(), json!(directive));
            }
            out
        }
        Node::BlockStatement { body } => json!({ "type": kind, "body": all(body) }),
        Node::EmptyStatement | Node::DebuggerStatement | Node::ThisExpression => {
            json!({ "type": kind })
        }
        Node::WithStatement { object, body } => {
            json!({ "type": kind, "object": one(*object), "body": one(*body) })
        }
        Node::ReturnStatement { argument } => json!({ "type": kind, "argument": opt(*argument) }),
        Node::LabeledStatement { label, body } => {
            json!({ "type": kind, "label": one(*label), "body": one(*body) })
        }
        Node::BreakStatement { label } | Node::ContinueStatement { label } => {
            json!({ "type": kind, "label": opt(*label) })
        }
        Node::IfStatement {
            test,
            consequent,
            alternate,
        } => json!({
            "type": kind,
            "test": one(*test),
            "consequent": one(*consequent),
            "alternate": opt(*alternate),
        }),
        Node::SwitchStatement {
            discriminant,
            cases,
        } => json!({ "type": kind, "discriminant": one(*discriminant), "cases": all(cases) }),
        Node::SwitchCase { test, consequent } => {
            json!({ "type": kind, "test": opt(*test), "consequent": all(consequent) })
        }
        Node::ThrowStatement { argument } => json!({ "type": kind, "argument": one(*argument) }),
        Node::TryStatement {
            block,
            handler,
            finalizer,
        } => json!({
            "type": kind,
            "block": one(*block),
            "handler": opt(*handler),
            "finalizer": opt(*finalizer),
        }),
        Node::CatchClause { param, body } => {
            json!({ "type": kind, "param": opt(*param), "body": one(*body) })
        }
        Node::WhileStatement { test, body } | Node::DoWhileStatement { body, test } => {
            json!({ "type": kind, "test": one(*test), "body": one(*body) })
        }
        Node::ForStatement {
            init,
            test,
            update,
            body,
        } => json!({
            "type": kind,
            "init": opt(*init),
            "test": opt(*test),
            "update": opt(*update),
            "body": one(*body),
        }),
        Node::ForInStatement { left, right, body } => json!({
            "type": kind,
            "left": one(*left),
            "right": one(*right),
            "body": one(*body),
            "each": false,
        }),
        Node::FunctionDeclaration {
            id,
            params,
            body,
            generator,
            is_async,
        }
        | Node::FunctionExpression {
            id,
            params,
            body,
            generator,
            is_async,
        } => json!({
            "type": kind,
            "id": opt(*id),
            "params": all(params),
            "body": one(*body),
            "generator": generator,
            "async": is_async,
            "expression": false,
        }),
        Node::ArrowFunctionExpression {
            params,
            body,
            expression,
            is_async,
        } => json!({
            "type": kind,
            "id": null,
            "params": all(params),
            "body": one(*body),
            "generator": false,
            "async": is_async,
            "expression": expression,
        }),
        Node::VariableDeclaration { declarations, kind: var_kind } => json!({
            "type": kind,
            "declarations": all(declarations),
            "kind": var_kind.as_str(),
        }),
        Node::VariableDeclarator { id, init } => {
            json!({ "type": kind, "id": one(*id), "init": opt(*init) })
        }
        Node::Identifier { name } => json!({ "type": kind, "name": name }),
        Node::Literal(literal) => export_literal(literal),
        Node::ArrayExpression { elements } => json!({
            "type": kind,
            "elements": elements.iter().map(|&element| opt(element)).collect::<Vec<_>>(),
        }),
        Node::ObjectExpression { properties } => {
            json!({ "type": kind, "properties": all(properties) })
        }
        Node::Property {
            key,
            value,
            kind: property_kind,
            computed,
            method,
            shorthand,
        } => json!({
            "type": kind,
            "key": one(*key),
            "value": one(*value),
            "kind": property_kind.as_str(),
            "computed": computed,
            "method": method,
            "shorthand": shorthand,
        }),
        Node::UnaryExpression { operator, argument } => json!({
            "type": kind,
            "operator": operator.as_str(),
            "argument": one(*argument),
            "prefix": true,
        }),
        Node::UpdateExpression {
            operator,
            argument,
            prefix,
        } => json!({
            "type": kind,
            "operator": operator.as_str(),
            "argument": one(*argument),
            "prefix": prefix,
        }),
        Node::BinaryExpression {
            operator,
            left,
            right,
        } => json!({
            "type": kind,
            "operator": operator.as_str(),
            "left": one(*left),
            "right": one(*right),
        }),
        Node::LogicalExpression {
            operator,
            left,
            right,
        } => json!({
            "type": kind,
            "operator": operator.as_str(),
            "left": one(*left),
            "right": one(*right),
        }),
        Node::AssignmentExpression {
            operator,
            left,
            right,
        } => json!({
            "type": kind,
            "operator": operator.as_str(),
            "left": one(*left),
            "right": one(*right),
        }),
        Node::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => json!({
            "type": kind,
            "test": one(*test),
            "consequent": one(*consequent),
            "alternate": one(*alternate),
        }),
        Node::CallExpression { callee, arguments } | Node::NewExpression { callee, arguments } => {
            json!({ "type": kind, "callee": one(*callee), "arguments": all(arguments) })
        }
        Node::MemberExpression {
            object,
            property,
            computed,
        } => json!({
            "type": kind,
            "object": one(*object),
            "property": one(*property),
            "computed": computed,
        }),
        Node::SequenceExpression { expressions } => {
            json!({ "type": kind, "expressions": all(expressions) })
        }
    }
}
