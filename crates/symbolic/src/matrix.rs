use std::{collections::BTreeSet, fmt, ops::Index};

use nalgebra::DMatrix;

use crate::{Expr, Substitution, SymbolicError};

/// A dense matrix of expressions stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl SymbolicMatrix {
    /// Creates a `rows × cols` matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Expr::zero(); rows * cols],
        }
    }

    /// Creates the `n × n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.data[i * n + i] = Expr::one();
        }
        out
    }

    /// Creates a matrix from a list of rows.
    ///
    /// An empty list gives a `0 × 0` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::RaggedRows`] if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Self, SymbolicError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != n_cols {
                return Err(SymbolicError::RaggedRows {
                    row,
                    expected: n_cols,
                    actual: entries.len(),
                });
            }
            data.extend(entries);
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Creates a column vector.
    #[must_use]
    pub fn column(entries: Vec<Expr>) -> Self {
        Self {
            rows: entries.len(),
            cols: 1,
            data: entries,
        }
    }

    /// Returns the matrix of partial derivatives `∂exprs[i] / ∂vars[j]`.
    #[must_use]
    pub fn jacobian<S: AsRef<str>>(exprs: &[Expr], vars: &[S]) -> Self {
        let data = exprs
            .iter()
            .flat_map(|expr| vars.iter().map(move |var| expr.diff(var.as_ref())))
            .collect();

        Self {
            rows: exprs.len(),
            cols: vars.len(),
            data,
        }
    }

    #[must_use]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the entry at `(row, col)`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Replaces the entry at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::IndexOutOfRange`] if the entry does not exist.
    pub fn set(&mut self, row: usize, col: usize, expr: Expr) -> Result<(), SymbolicError> {
        if row >= self.rows || col >= self.cols {
            return Err(SymbolicError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.data[row * self.cols + col] = expr;
        Ok(())
    }

    /// Iterates over `(row, col, entry)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Expr)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, expr)| (k / cols, k % cols, expr))
    }

    /// Applies `f` to every entry.
    #[must_use]
    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    #[must_use]
    pub fn simplify(&self) -> Self {
        self.map(Expr::simplify)
    }

    /// Substitutes bound symbols in every entry, leaving unbound ones.
    #[must_use]
    pub fn substitute(&self, values: &Substitution) -> Self {
        self.map(|expr| expr.substitute(values))
    }

    /// Evaluates every entry.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::Entry`] wrapping the first entry that fails.
    pub fn evaluate(&self, values: &Substitution) -> Result<DMatrix<f64>, SymbolicError> {
        self.evaluate_named("matrix", values)
    }

    pub(crate) fn evaluate_named(
        &self,
        name: &'static str,
        values: &Substitution,
    ) -> Result<DMatrix<f64>, SymbolicError> {
        let entries = self
            .iter()
            .map(|(row, col, expr)| {
                expr.evaluate(values).map_err(|source| SymbolicError::Entry {
                    matrix: name,
                    row,
                    col,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DMatrix::from_row_slice(self.rows, self.cols, &entries))
    }

    /// Returns the free symbols of all entries.
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for expr in &self.data {
            expr.collect_symbols(&mut out);
        }
        out
    }

    /// Returns `true` if every entry is the constant zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(Expr::is_zero)
    }
}

impl Index<(usize, usize)> for SymbolicMatrix {
    type Output = Expr;

    fn index(&self, (row, col): (usize, usize)) -> &Expr {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for a {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl fmt::Display for SymbolicMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            f.write_str("[")?;
            for col in 0..self.cols {
                if col > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", self.data[row * self.cols + col])?;
            }
            f.write_str("]")?;
            if row + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
