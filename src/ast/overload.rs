//! Operator overloads that record operations instead of computing them.
//!
//! `expr <op> rhs` records a [`Operation::Binary`](crate::ast::Operation::Binary)
//! for any right-hand side convertible into an operand, including another
//! expression. A literal on the left (`1 + IT`) records the reflected form.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use crate::ast::{BinOp, Expr, Operand, UnaryOp};

macro_rules! forward_binary {
    ($($trait:ident :: $method:ident => $op:expr),* $(,)?) => {
        $(
            impl<R: Into<Operand>> $trait<R> for Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    self.binary($op, rhs)
                }
            }

            impl<R: Into<Operand>> $trait<R> for &Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    self.clone().binary($op, rhs)
                }
            }
        )*
    };
}

forward_binary!(
    Add::add => BinOp::Add,
    Sub::sub => BinOp::Subtract,
    Mul::mul => BinOp::Multiply,
    Div::div => BinOp::Divide,
    Rem::rem => BinOp::Modulo,
    BitAnd::bitand => BinOp::BitAnd,
    BitOr::bitor => BinOp::BitOr,
    BitXor::bitxor => BinOp::BitXor,
    Shl::shl => BinOp::ShiftLeft,
    Shr::shr => BinOp::ShiftRight,
);

macro_rules! reflected_binary {
    ($lhs:ty => $($trait:ident :: $method:ident => $op:expr),* $(,)?) => {
        $(
            impl $trait<Expr> for $lhs {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    rhs.reverse_binary($op, self)
                }
            }
        )*
    };
}

macro_rules! reflected_numeric {
    ($($lhs:ty),*) => {
        $(
            reflected_binary!($lhs =>
                Add::add => BinOp::Add,
                Sub::sub => BinOp::Subtract,
                Mul::mul => BinOp::Multiply,
                Div::div => BinOp::Divide,
                Rem::rem => BinOp::Modulo,
            );
        )*
    };
}

// One integer type only, so an unsuffixed literal such as `1 + IT` infers.
reflected_numeric!(i64, f64);

reflected_binary!(i64 =>
    BitAnd::bitand => BinOp::BitAnd,
    BitOr::bitor => BinOp::BitOr,
    BitXor::bitxor => BinOp::BitXor,
    Shl::shl => BinOp::ShiftLeft,
    Shr::shr => BinOp::ShiftRight,
);

reflected_binary!(bool =>
    BitAnd::bitand => BinOp::BitAnd,
    BitOr::bitor => BinOp::BitOr,
    BitXor::bitxor => BinOp::BitXor,
);

reflected_binary!(&str => Add::add => BinOp::Add, Mul::mul => BinOp::Multiply);
reflected_binary!(String => Add::add => BinOp::Add);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.unary(UnaryOp::Negate)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.clone().unary(UnaryOp::Negate)
    }
}

/// `!expr` records the `~` invert: logical not on booleans, bitwise not on
/// integers.
impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.unary(UnaryOp::Invert)
    }
}

impl Not for &Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.clone().unary(UnaryOp::Invert)
    }
}
