//! Operator and keyword enums with their ESTree spellings.

use std::fmt;

macro_rules! estree_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// The ESTree spelling.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Parse an ESTree spelling.
            pub fn from_estree(text: &str) -> Option<Self> {
                match text {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

estree_enum! {
    /// Prefix operators of `UnaryExpression`.
    UnaryOp {
        Minus => "-",
        Plus => "+",
        Not => "!",
        BitNot => "~",
        Typeof => "typeof",
        Void => "void",
        Delete => "delete",
    }
}

estree_enum! {
    /// Operators of `BinaryExpression`.
    BinaryOp {
        Eq => "==",
        NotEq => "!=",
        StrictEq => "===",
        StrictNotEq => "!==",
        Lt => "<",
        LtEq => "<=",
        Gt => ">",
        GtEq => ">=",
        Shl => "<<",
        Shr => ">>",
        UShr => ">>>",
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        Exp => "**",
        BitOr => "|",
        BitXor => "^",
        BitAnd => "&",
        In => "in",
        InstanceOf => "instanceof",
    }
}

estree_enum! {
    /// Short-circuit operators of `LogicalExpression`.
    LogicalOp {
        And => "&&",
        Or => "||",
    }
}

estree_enum! {
    /// Operators of `AssignmentExpression`.
    AssignOp {
        Assign => "=",
        Add => "+=",
        Sub => "-=",
        Mul => "*=",
        Div => "/=",
        Mod => "%=",
        Exp => "**=",
        Shl => "<<=",
        Shr => ">>=",
        UShr => ">>>=",
        BitOr => "|=",
        BitXor => "^=",
        BitAnd => "&=",
    }
}

estree_enum! {
    /// Operators of `UpdateExpression`.
    UpdateOp {
        Increment => "++",
        Decrement => "--",
    }
}

estree_enum! {
    /// `VariableDeclaration.kind`.
    VarKind {
        Var => "var",
        Let => "let",
        Const => "const",
    }
}

estree_enum! {
    /// `Property.kind`.
    PropertyKind {
        Init => "init",
        Get => "get",
        Set => "set",
    }
}
