use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use super::model::{CellValue, Headers, Row, Table};

// ---------------------------------------------------------------------------
// Predicate: a pure boolean function over one row and its headers
// ---------------------------------------------------------------------------

/// A row predicate. Evaluation never fails: a missing column or an
/// unparsable number simply yields `false`.
pub type Predicate = Arc<dyn Fn(&Row, &Headers) -> bool + Send + Sync>;

/// Wrap a closure as a [`Predicate`].
pub fn predicate<F>(f: F) -> Predicate
where
    F: Fn(&Row, &Headers) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

static UNDEFINED: CellValue = CellValue::Undefined;

/// Position of the first header equal to `column`.
pub fn column_index(headers: &Headers, column: &str) -> Option<usize> {
    headers.iter().position(|h| h == column)
}

/// The cell under `column`, or `None` when the header is absent.
///
/// A row shorter than the headers reads as [`CellValue::Undefined`] past its end.
pub fn cell<'a>(row: &'a Row, headers: &Headers, column: &str) -> Option<&'a CellValue> {
    column_index(headers, column).map(|i| row.get(i).unwrap_or(&UNDEFINED))
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Comparison applied by [`build_column_predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Operator {
    #[default]
    Eq,
    NotEq,
    Contains,
    NotEmpty,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    /// Parse an operator token. Unrecognised tokens fall back to [`Operator::Eq`].
    pub fn parse(token: &str) -> Self {
        match token {
            "=" => Operator::Eq,
            "!=" => Operator::NotEq,
            "contains" => Operator::Contains,
            "not_empty" => Operator::NotEmpty,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Ge,
            "<=" => Operator::Le,
            other => {
                log::debug!("Unknown operator '{other}', comparing for equality");
                Operator::Eq
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Contains => "contains",
            Operator::NotEmpty => "not_empty",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }

    /// Compare a cell against the target value.
    pub fn compare(&self, cell: &CellValue, value: &CellValue) -> bool {
        match self {
            Operator::Eq => cell.strict_eq(value),
            Operator::NotEq => !cell.strict_eq(value),
            Operator::Contains => cell.is_truthy() && cell.to_string().contains(&value.to_string()),
            Operator::NotEmpty => cell.is_present(),
            // NaN on either side makes every comparison false.
            Operator::Gt => cell.to_float() > value.to_float(),
            Operator::Lt => cell.to_float() < value.to_float(),
            Operator::Ge => cell.to_float() >= value.to_float(),
            Operator::Le => cell.to_float() <= value.to_float(),
        }
    }
}

impl From<&str> for Operator {
    fn from(token: &str) -> Self {
        Operator::parse(token)
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        Operator::parse(&token)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Predicate builders
// ---------------------------------------------------------------------------

/// Build a predicate testing `column` against `value` with `operator`.
///
/// The column is looked up by name on every call; when the headers do not
/// contain it the predicate is `false` whatever the operator.
pub fn build_column_predicate(
    column: impl Into<String>,
    value: impl Into<CellValue>,
    operator: impl Into<Operator>,
) -> Predicate {
    let column = column.into();
    let value = value.into();
    let operator = operator.into();
    predicate(move |row, headers| {
        cell(row, headers, &column).is_some_and(|c| operator.compare(c, &value))
    })
}

/// Cell under `column` equals the string `expected`.
pub fn equals(column: &'static str, expected: impl Into<String>) -> Predicate {
    let expected = CellValue::String(expected.into());
    predicate(move |row, headers| {
        cell(row, headers, column).is_some_and(|c| c.strict_eq(&expected))
    })
}

/// Cell under `column` is neither null nor empty.
///
/// Unlike [`Operator::NotEmpty`], a cell missing from a short row passes.
pub fn present(column: &'static str) -> Predicate {
    predicate(move |row, headers| cell(row, headers, column).is_some_and(|c| !c.is_blank()))
}

/// Cell under `column` parses as a float satisfying `test`.
pub fn numeric<F>(column: &'static str, test: F) -> Predicate
where
    F: Fn(f64) -> bool + Send + Sync + 'static,
{
    predicate(move |row, headers| {
        cell(row, headers, column)
            .map(CellValue::to_float)
            .is_some_and(|v| !v.is_nan() && test(v))
    })
}

// ---------------------------------------------------------------------------
// Bulk evaluation
// ---------------------------------------------------------------------------

/// Return indices of rows in `table` accepted by `pred`.
///
/// The header lookup stays inside the predicate, so a table whose headers
/// lack the governing column yields no indices.
pub fn matching_indices(table: &Table, pred: &Predicate) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| pred(row, &table.headers))
        .map(|(i, _)| i)
        .collect()
}
