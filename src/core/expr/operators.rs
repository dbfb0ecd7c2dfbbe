//! Arithmetic operator overloads.
//!
//! Every operator routes through the canonicalizers:
//! `a - b = a + (-1)·b` and `a / b = a · b^(-1)`.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Expr;
use crate::canonical::{make_power, make_product, make_sum};
use crate::core::error::KernelError;

impl Expr {
    /// `self / other`, rejecting a numeric zero divisor
    ///
    /// # Errors
    /// `DivisionByZero` when `other` is a numeric zero.
    pub fn checked_div(&self, other: &Self) -> Result<Self, KernelError> {
        if other.is_zero() {
            return Err(KernelError::DivisionByZero);
        }
        Ok(div(self, other))
    }
}

fn add(a: &Expr, b: &Expr) -> Expr {
    make_sum([a.clone(), b.clone()])
}

fn sub(a: &Expr, b: &Expr) -> Expr {
    make_sum([a.clone(), neg(b)])
}

fn mul(a: &Expr, b: &Expr) -> Expr {
    make_product([a.clone(), b.clone()])
}

fn div(a: &Expr, b: &Expr) -> Expr {
    make_product([a.clone(), make_power(b, &Expr::integer(-1))])
}

fn neg(a: &Expr) -> Expr {
    make_product([Expr::integer(-1), a.clone()])
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $func:ident) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $func(&self, &rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $func(&self, rhs)
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $func(self, &rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $func(self, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add);
impl_binary_op!(Sub, sub, sub);
impl_binary_op!(Mul, mul, mul);
impl_binary_op!(Div, div, div);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        neg(&self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        neg(self)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<f64> for Expr {
    fn from(x: f64) -> Self {
        Self::real(x)
    }
}
