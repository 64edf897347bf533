//! Operator enums for the expression nodes
//!
//! Every operator knows its source spelling through `as_str`, which is also its
//! `Display` form.

use std::fmt;

macro_rules! operator_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
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

operator_enum! {
    /// Arithmetic, bitwise, relational and equality operators
    BinaryOperator {
        Equal => "==",
        NotEqual => "!=",
        StrictEqual => "===",
        StrictNotEqual => "!==",
        LessThan => "<",
        LessThanOrEqual => "<=",
        GreaterThan => ">",
        GreaterThanOrEqual => ">=",
        LeftShift => "<<",
        RightShift => ">>",
        UnsignedRightShift => ">>>",
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        Remainder => "%",
        Exponent => "**",
        BitOr => "|",
        BitXor => "^",
        BitAnd => "&",
        In => "in",
        InstanceOf => "instanceof",
    }
}

operator_enum! {
    /// Short-circuiting operators
    LogicalOperator {
        And => "&&",
        Or => "||",
        NullishCoalescing => "??",
    }
}

operator_enum! {
    UnaryOperator {
        Not => "!",
        Minus => "-",
        Plus => "+",
        BitNot => "~",
        TypeOf => "typeof",
        Void => "void",
        Delete => "delete",
    }
}

operator_enum! {
    UpdateOperator {
        Increment => "++",
        Decrement => "--",
    }
}

operator_enum! {
    AssignmentOperator {
        Assign => "=",
        AddAssign => "+=",
        SubtractAssign => "-=",
        MultiplyAssign => "*=",
        DivideAssign => "/=",
        RemainderAssign => "%=",
        ExponentAssign => "**=",
        LeftShiftAssign => "<<=",
        RightShiftAssign => ">>=",
        UnsignedRightShiftAssign => ">>>=",
        BitOrAssign => "|=",
        BitXorAssign => "^=",
        BitAndAssign => "&=",
        AndAssign => "&&=",
        OrAssign => "||=",
        NullishAssign => "??=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_spelling() {
        assert_eq!(BinaryOperator::StrictNotEqual.as_str(), "!==");
        assert_eq!(LogicalOperator::NullishCoalescing.to_string(), "??");
        assert_eq!(UnaryOperator::TypeOf.to_string(), "typeof");
        assert_eq!(AssignmentOperator::UnsignedRightShiftAssign.as_str(), ">>>=");
    }
}
