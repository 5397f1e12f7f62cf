mod display;
mod ops;

use std::collections::BTreeSet;

use crate::{Binding, Substitution, SymbolicError};

/// A unary function that may appear in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tanh,
    Exp,
    Sqrt,
    Abs,
}

impl Function {
    /// Returns the name used when formatting.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Applies the function to a number.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tanh => x.tanh(),
            Self::Exp => x.exp(),
            Self::Sqrt => x.sqrt(),
            Self::Abs => x.abs(),
        }
    }
}

/// An immutable symbolic expression.
///
/// Expressions are built with [`Expr::symbol`], [`Expr::constant`] and the
/// arithmetic operators, which are implemented between expressions, their
/// references and `f64`. Operators only build the tree; call
/// [`simplify`](Expr::simplify) to fold constants and drop identities.
///
/// ```
/// use actuate_symbolic::Expr;
///
/// let k = Expr::symbol("k");
/// let x = Expr::symbol("x");
/// let force = -(&k * &x) + 0.0;
///
/// assert_eq!(force.diff("x").to_string(), "-k");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(f64),
    Symbol(String),
    Sum(Vec<Expr>),
    Product(Vec<Expr>),
    Quotient(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Pow(Box<Expr>, i32),
    Call(Function, Box<Expr>),
}

impl Expr {
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::Constant(0.0)
    }

    #[must_use]
    pub fn one() -> Self {
        Self::Constant(1.0)
    }

    /// Returns the value if this expression is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns `true` if this expression is the constant zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_constant() == Some(0.0)
    }

    /// Raises the expression to an integer power.
    #[must_use]
    pub fn pow(self, exponent: i32) -> Self {
        Self::Pow(Box::new(self), exponent)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        self.call(Function::Sin)
    }

    #[must_use]
    pub fn cos(self) -> Self {
        self.call(Function::Cos)
    }

    #[must_use]
    pub fn tanh(self) -> Self {
        self.call(Function::Tanh)
    }

    #[must_use]
    pub fn exp(self) -> Self {
        self.call(Function::Exp)
    }

    #[must_use]
    pub fn sqrt(self) -> Self {
        self.call(Function::Sqrt)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        self.call(Function::Abs)
    }

    /// Applies a unary function to the expression.
    #[must_use]
    pub fn call(self, function: Function) -> Self {
        Self::Call(function, Box::new(self))
    }

    /// Returns the names of all free symbols.
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    pub(crate) fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Constant(_) => {}
            Self::Symbol(name) => {
                out.insert(name.clone());
            }
            Self::Sum(items) | Self::Product(items) => {
                for item in items {
                    item.collect_symbols(out);
                }
            }
            Self::Quotient(num, den) => {
                num.collect_symbols(out);
                den.collect_symbols(out);
            }
            Self::Neg(inner) | Self::Pow(inner, _) | Self::Call(_, inner) => {
                inner.collect_symbols(out);
            }
        }
    }

    /// Returns `true` if the symbol `name` appears in the expression.
    #[must_use]
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Self::Constant(_) => false,
            Self::Symbol(s) => s == name,
            Self::Sum(items) | Self::Product(items) => {
                items.iter().any(|item| item.contains_symbol(name))
            }
            Self::Quotient(num, den) => num.contains_symbol(name) || den.contains_symbol(name),
            Self::Neg(inner) | Self::Pow(inner, _) | Self::Call(_, inner) => {
                inner.contains_symbol(name)
            }
        }
    }

    /// Returns an equivalent, usually smaller expression.
    ///
    /// Constants are folded, nested sums and products are flattened, and the
    /// identities `x + 0`, `x·1`, `x·0`, `x⁰`, `x¹`, `x/1` and `−(−x)` are
    /// removed.
    #[must_use]
    pub fn simplify(&self) -> Self {
        match self {
            Self::Constant(_) | Self::Symbol(_) => self.clone(),
            Self::Sum(terms) => simplify_sum(terms.iter().map(Self::simplify)),
            Self::Product(factors) => simplify_product(factors.iter().map(Self::simplify)),
            Self::Quotient(num, den) => simplify_quotient(num.simplify(), den.simplify()),
            Self::Neg(inner) => simplify_neg(inner.simplify()),
            Self::Pow(base, exponent) => simplify_pow(base.simplify(), *exponent),
            Self::Call(function, arg) => simplify_call(*function, arg.simplify()),
        }
    }

    /// Replaces bound symbols and simplifies the result.
    ///
    /// Symbols without a binding are left in place, so the result may still
    /// be symbolic.
    #[must_use]
    pub fn substitute(&self, values: &Substitution) -> Self {
        self.replace(values).simplify()
    }

    fn replace(&self, values: &Substitution) -> Self {
        match self {
            Self::Constant(_) => self.clone(),
            Self::Symbol(name) => match values.get(name) {
                Some(Binding::Value(value)) => Self::Constant(*value),
                Some(Binding::Expr(expr)) => expr.clone(),
                None => self.clone(),
            },
            Self::Sum(terms) => Self::Sum(terms.iter().map(|t| t.replace(values)).collect()),
            Self::Product(factors) => {
                Self::Product(factors.iter().map(|f| f.replace(values)).collect())
            }
            Self::Quotient(num, den) => Self::Quotient(
                Box::new(num.replace(values)),
                Box::new(den.replace(values)),
            ),
            Self::Neg(inner) => Self::Neg(Box::new(inner.replace(values))),
            Self::Pow(base, exponent) => Self::Pow(Box::new(base.replace(values)), *exponent),
            Self::Call(function, arg) => Self::Call(*function, Box::new(arg.replace(values))),
        }
    }

    /// Evaluates the expression numerically.
    ///
    /// Expression bindings are substituted first, then every remaining
    /// symbol must have a numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::UnboundSymbol`] for a symbol without a value,
    /// [`SymbolicError::DivisionByZero`] for a zero denominator, and
    /// [`SymbolicError::NonFinite`] if the result is NaN or infinite.
    pub fn evaluate(&self, values: &Substitution) -> Result<f64, SymbolicError> {
        let value = if values.has_expressions() {
            self.replace(values).eval(values)?
        } else {
            self.eval(values)?
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(SymbolicError::NonFinite)
        }
    }

    fn eval(&self, values: &Substitution) -> Result<f64, SymbolicError> {
        match self {
            Self::Constant(c) => Ok(*c),
            Self::Symbol(name) => values
                .value(name)
                .ok_or_else(|| SymbolicError::UnboundSymbol(name.clone())),
            Self::Sum(terms) => terms
                .iter()
                .try_fold(0.0, |acc, t| t.eval(values).map(|v| acc + v)),
            Self::Product(factors) => factors
                .iter()
                .try_fold(1.0, |acc, f| f.eval(values).map(|v| acc * v)),
            Self::Quotient(num, den) => {
                let den = den.eval(values)?;
                if den == 0.0 {
                    return Err(SymbolicError::DivisionByZero);
                }
                Ok(num.eval(values)? / den)
            }
            Self::Neg(inner) => Ok(-inner.eval(values)?),
            Self::Pow(base, exponent) => {
                let base = base.eval(values)?;
                if base == 0.0 && *exponent < 0 {
                    return Err(SymbolicError::DivisionByZero);
                }
                Ok(base.powi(*exponent))
            }
            Self::Call(function, arg) => Ok(function.apply(arg.eval(values)?)),
        }
    }

    /// Returns the simplified partial derivative with respect to `var`.
    #[must_use]
    pub fn diff(&self, var: &str) -> Self {
        self.derivative(var).simplify()
    }

    fn derivative(&self, var: &str) -> Self {
        if !self.contains_symbol(var) {
            return Self::zero();
        }

        match self {
            Self::Constant(_) => Self::zero(),
            Self::Symbol(_) => Self::one(),
            Self::Sum(terms) => Self::Sum(terms.iter().map(|t| t.derivative(var)).collect()),
            Self::Product(factors) => Self::Sum(
                (0..factors.len())
                    .map(|i| {
                        Self::Product(
                            factors
                                .iter()
                                .enumerate()
                                .map(|(j, f)| if i == j { f.derivative(var) } else { f.clone() })
                                .collect(),
                        )
                    })
                    .collect(),
            ),
            Self::Quotient(u, v) => {
                let (u, v) = (u.as_ref(), v.as_ref());
                let numerator = u.derivative(var) * v - u * v.derivative(var);
                numerator / v.clone().pow(2)
            }
            Self::Neg(inner) => -inner.derivative(var),
            Self::Pow(base, exponent) => {
                let base_expr = base.as_ref().clone();
                // x^(n − 1) as x^n / x when n − 1 does not fit in an i32.
                let lowered = match exponent.checked_sub(1) {
                    Some(lower) => base_expr.pow(lower),
                    None => base_expr.clone().pow(*exponent) / base_expr,
                };
                Self::Product(vec![
                    Self::Constant(f64::from(*exponent)),
                    lowered,
                    base.derivative(var),
                ])
            }
            Self::Call(function, arg) => {
                let u = arg.as_ref().clone();
                let outer = match function {
                    Function::Sin => u.cos(),
                    Function::Cos => -u.sin(),
                    Function::Tanh => 1.0 - u.tanh().pow(2),
                    Function::Exp => u.exp(),
                    Function::Sqrt => 1.0 / (2.0 * u.sqrt()),
                    Function::Abs => u.clone() / u.abs(),
                };
                outer * arg.derivative(var)
            }
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

fn collapse(mut items: Vec<Expr>, empty: f64, build: fn(Vec<Expr>) -> Expr) -> Expr {
    match items.len() {
        0 => Expr::Constant(empty),
        1 => items.swap_remove(0),
        _ => build(items),
    }
}

fn simplify_sum(terms: impl Iterator<Item = Expr>) -> Expr {
    let mut constant = 0.0;
    let mut rest = Vec::new();

    for term in terms {
        match term {
            Expr::Constant(c) => constant += c,
            Expr::Sum(inner) => {
                for t in inner {
                    match t {
                        Expr::Constant(c) => constant += c,
                        other => rest.push(other),
                    }
                }
            }
            other => rest.push(other),
        }
    }

    if constant != 0.0 {
        rest.push(Expr::Constant(constant));
    }
    collapse(rest, 0.0, Expr::Sum)
}

fn simplify_product(factors: impl Iterator<Item = Expr>) -> Expr {
    fn absorb(factor: Expr, constant: &mut f64, rest: &mut Vec<Expr>) {
        match factor {
            Expr::Constant(c) => *constant *= c,
            Expr::Product(inner) => {
                for f in inner {
                    absorb(f, constant, rest);
                }
            }
            Expr::Neg(inner) => {
                *constant = -*constant;
                absorb(*inner, constant, rest);
            }
            other => rest.push(other),
        }
    }

    let mut constant = 1.0;
    let mut rest = Vec::new();
    for factor in factors {
        absorb(factor, &mut constant, &mut rest);
    }

    if constant == 0.0 {
        return Expr::zero();
    }
    if rest.is_empty() {
        return Expr::Constant(constant);
    }

    let product = collapse(rest, 1.0, Expr::Product);
    if constant == 1.0 {
        product
    } else if constant == -1.0 {
        Expr::Neg(Box::new(product))
    } else {
        match product {
            Expr::Product(mut items) => {
                items.insert(0, Expr::Constant(constant));
                Expr::Product(items)
            }
            other => Expr::Product(vec![Expr::Constant(constant), other]),
        }
    }
}

fn simplify_quotient(num: Expr, den: Expr) -> Expr {
    match (num.as_constant(), den.as_constant()) {
        (_, Some(0.0)) => Expr::Quotient(Box::new(num), Box::new(den)),
        (Some(n), Some(d)) => Expr::Constant(n / d),
        (Some(0.0), None) => Expr::zero(),
        (_, Some(1.0)) => num,
        (_, Some(d)) => simplify_product([Expr::Constant(1.0 / d), num].into_iter()),
        _ => match den {
            Expr::Neg(inner) => simplify_neg(simplify_quotient(num, *inner)),
            den => Expr::Quotient(Box::new(num), Box::new(den)),
        },
    }
}

fn simplify_neg(inner: Expr) -> Expr {
    match inner {
        Expr::Constant(c) => Expr::Constant(-c),
        Expr::Neg(x) => *x,
        Expr::Product(_) => simplify_product([Expr::Constant(-1.0), inner].into_iter()),
        other => Expr::Neg(Box::new(other)),
    }
}

fn simplify_pow(base: Expr, exponent: i32) -> Expr {
    match (base, exponent) {
        (_, 0) => Expr::one(),
        (base, 1) => base,
        (Expr::Constant(c), n) if c.powi(n).is_finite() => Expr::Constant(c.powi(n)),
        (Expr::Pow(inner, m), n) => match m.checked_mul(n) {
            Some(combined) => simplify_pow(*inner, combined),
            None => Expr::Pow(Box::new(Expr::Pow(inner, m)), n),
        },
        (base, n) => Expr::Pow(Box::new(base), n),
    }
}

fn simplify_call(function: Function, arg: Expr) -> Expr {
    match (function, arg) {
        (function, Expr::Constant(c)) if function.apply(c).is_finite() => {
            Expr::Constant(function.apply(c))
        }
        (Function::Abs, Expr::Call(Function::Abs, inner)) => Expr::Call(Function::Abs, inner),
        (function, arg) => Expr::Call(function, Box::new(arg)),
    }
}
