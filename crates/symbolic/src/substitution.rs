use std::collections::BTreeMap;

use crate::Expr;

/// The value a symbol is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(f64),
    Expr(Expr),
}

/// A mapping from symbol names to numbers or expressions.
///
/// Numeric bindings are what evaluation needs; expression bindings let a
/// symbol be rewritten in terms of others, for example a reflected inertia
/// in terms of the gear ratio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    bindings: BTreeMap<String, Binding>,
}

impl Substitution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the substitution with `name` bound to a number.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert_value(name, value);
        self
    }

    /// Returns the substitution with `name` bound to an expression.
    #[must_use]
    pub fn with_expr(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.insert_expr(name, expr);
        self
    }

    /// Binds `name` to a number, returning any previous binding.
    pub fn insert_value(&mut self, name: impl Into<String>, value: f64) -> Option<Binding> {
        self.bindings.insert(name.into(), Binding::Value(value))
    }

    /// Binds `name` to an expression, returning any previous binding.
    ///
    /// Constant expressions are stored as numbers.
    pub fn insert_expr(&mut self, name: impl Into<String>, expr: Expr) -> Option<Binding> {
        let binding = match expr.as_constant() {
            Some(value) => Binding::Value(value),
            None => Binding::Expr(expr),
        };
        self.bindings.insert(name.into(), binding)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Returns the numeric value bound to `name`, if any.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns `true` if any symbol is bound to a non-constant expression.
    #[must_use]
    pub fn has_expressions(&self) -> bool {
        self.bindings
            .values()
            .any(|binding| matches!(binding, Binding::Expr(_)))
    }

    /// Iterates over bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    /// Adds every binding of `other`, replacing existing ones.
    pub fn merge(&mut self, other: &Substitution) {
        self.bindings
            .extend(other.bindings.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<S: Into<String>> Extend<(S, f64)> for Substitution {
    fn extend<I: IntoIterator<Item = (S, f64)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert_value(name, value);
        }
    }
}
