//! Child-bearing ESTree field names and path keys.

use std::fmt;

/// A field of an ESTree node that holds a child node or a child list.
///
/// Variants are declared in name order so the derived `Ord` agrees with
/// string order of [`Field::as_str`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Alternate,
    Argument,
    Arguments,
    Block,
    Body,
    Callee,
    Cases,
    Consequent,
    Declarations,
    Discriminant,
    Elements,
    Expression,
    Expressions,
    Finalizer,
    Handler,
    Id,
    Init,
    Key,
    Label,
    Left,
    Object,
    Param,
    Params,
    Properties,
    Property,
    Right,
    Test,
    Update,
    Value,
}

impl Field {
    /// The ESTree property name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Alternate => "alternate",
            Field::Argument => "argument",
            Field::Arguments => "arguments",
            Field::Block => "block",
            Field::Body => "body",
            Field::Callee => "callee",
            Field::Cases => "cases",
            Field::Consequent => "consequent",
            Field::Declarations => "declarations",
            Field::Discriminant => "discriminant",
            Field::Elements => "elements",
            Field::Expression => "expression",
            Field::Expressions => "expressions",
            Field::Finalizer => "finalizer",
            Field::Handler => "handler",
            Field::Id => "id",
            Field::Init => "init",
            Field::Key => "key",
            Field::Label => "label",
            Field::Left => "left",
            Field::Object => "object",
            Field::Param => "param",
            Field::Params => "params",
            Field::Properties => "properties",
            Field::Property => "property",
            Field::Right => "right",
            Field::Test => "test",
            Field::Update => "update",
            Field::Value => "value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step from a value to a child: a record field or a list index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Field(Field),
    Index(usize),
}

impl From<Field> for Key {
    fn from(field: Field) -> Self {
        Key::Field(field)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(field) => write!(f, ".{field}"),
            Key::Index(index) => write!(f, "[{index}]"),
        }
    }
}
