use std::fmt;

use super::Expr;

const SUM: u8 = 1;
const NEG: u8 = 2;
const PRODUCT: u8 = 3;
const POW: u8 = 4;
const ATOM: u8 = 5;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Self::Constant(c) if *c < 0.0 => NEG,
            Self::Constant(_) | Self::Symbol(_) | Self::Call(..) => ATOM,
            Self::Sum(items) | Self::Product(items) if items.len() == 1 => items[0].precedence(),
            Self::Sum(items) | Self::Product(items) if items.is_empty() => ATOM,
            Self::Sum(_) => SUM,
            Self::Neg(_) => NEG,
            Self::Product(_) | Self::Quotient(..) => PRODUCT,
            Self::Pow(..) => POW,
        }
    }
}

/// Returns `term` with its sign flipped if it starts with a negative constant.
fn without_leading_minus(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Constant(c) if *c < 0.0 => Some(Expr::Constant(-c)),
        Expr::Product(factors) => {
            let (first, rest) = factors.split_first()?;
            let mut flipped = vec![without_leading_minus(first)?];
            flipped.extend(rest.iter().cloned());
            Some(Expr::Product(flipped))
        }
        Expr::Quotient(num, den) => Some(Expr::Quotient(
            Box::new(without_leading_minus(num)?),
            den.clone(),
        )),
        _ => None,
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &Expr, min: u8) -> fmt::Result {
    if child.precedence() < min {
        write!(f, "({child})")
    } else {
        write!(f, "{child}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Symbol(name) => f.write_str(name),
            Self::Sum(terms) => {
                let Some((first, rest)) = terms.split_first() else {
                    return f.write_str("0");
                };
                write_child(f, first, SUM)?;
                for term in rest {
                    if let Self::Neg(inner) = term {
                        f.write_str(" - ")?;
                        write_child(f, inner, NEG)?;
                    } else if let Some(flipped) = without_leading_minus(term) {
                        f.write_str(" - ")?;
                        write_child(f, &flipped, NEG)?;
                    } else {
                        f.write_str(" + ")?;
                        write_child(f, term, SUM)?;
                    }
                }
                Ok(())
            }
            Self::Product(factors) => {
                let Some((first, rest)) = factors.split_first() else {
                    return f.write_str("1");
                };
                write_child(f, first, NEG)?;
                for factor in rest {
                    f.write_str("*")?;
                    write_child(f, factor, PRODUCT)?;
                }
                Ok(())
            }
            Self::Quotient(num, den) => {
                write_child(f, num, PRODUCT)?;
                f.write_str("/")?;
                write_child(f, den, POW)
            }
            Self::Neg(inner) => {
                f.write_str("-")?;
                write_child(f, inner, PRODUCT)
            }
            Self::Pow(base, exponent) => {
                write_child(f, base, ATOM)?;
                if *exponent < 0 {
                    write!(f, "^({exponent})")
                } else {
                    write!(f, "^{exponent}")
                }
            }
            Self::Call(function, arg) => write!(f, "{}({arg})", function.name()),
        }
    }
}
