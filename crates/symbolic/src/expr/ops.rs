use std::{
    iter::{Product, Sum},
    ops::{Add, Div, Mul, Neg, Sub},
};

use super::Expr;

fn sum_of(lhs: Expr, rhs: Expr) -> Expr {
    let mut terms = Vec::new();
    for term in [lhs, rhs] {
        match term {
            Expr::Sum(inner) => terms.extend(inner),
            other => terms.push(other),
        }
    }
    Expr::Sum(terms)
}

fn difference_of(lhs: Expr, rhs: Expr) -> Expr {
    sum_of(lhs, Expr::Neg(Box::new(rhs)))
}

fn product_of(lhs: Expr, rhs: Expr) -> Expr {
    let mut factors = Vec::new();
    for factor in [lhs, rhs] {
        match factor {
            Expr::Product(inner) => factors.extend(inner),
            other => factors.push(other),
        }
    }
    Expr::Product(factors)
}

fn quotient_of(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Quotient(Box::new(lhs), Box::new(rhs))
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $build:path) => {
        impl $trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(self, rhs.clone())
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self.clone(), rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(self.clone(), rhs.clone())
            }
        }

        impl $trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                $build(self, Expr::Constant(rhs))
            }
        }

        impl $trait<f64> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                $build(self.clone(), Expr::Constant(rhs))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(Expr::Constant(self), rhs)
            }
        }

        impl $trait<&Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(Expr::Constant(self), rhs.clone())
            }
        }
    };
}

impl_binary_op!(Add, add, sum_of);
impl_binary_op!(Sub, sub, difference_of);
impl_binary_op!(Mul, mul, product_of);
impl_binary_op!(Div, div, quotient_of);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self.clone()))
    }
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        Expr::Sum(iter.collect())
    }
}

impl Product for Expr {
    fn product<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        Expr::Product(iter.collect())
    }
}
