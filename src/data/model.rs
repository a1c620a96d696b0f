use std::fmt;

use serde::Deserialize;
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as it arrives from a spreadsheet export.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "JsonValue")]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    #[default]
    Null,
    /// A position past the end of a row. Never produced by deserialization.
    Undefined,
}

/// One record; positions correspond 1:1 to the [`Headers`] it is evaluated with.
pub type Row = [CellValue];

/// Ordered column names.
pub type Headers = [String];

impl CellValue {
    /// Strict equality: no coercion between kinds, numbers compare by value.
    ///
    /// `Integer(2)` equals `Float(2.0)`, `NaN` equals nothing, and the string
    /// `"2"` never equals the number `2`.
    pub fn strict_eq(&self, other: &CellValue) -> bool {
        use CellValue::*;
        match (self, other) {
            (String(a), String(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Null, Null) | (Undefined, Undefined) => true,
            (Integer(a), Integer(b)) => a == b,
            (Integer(_) | Float(_), Integer(_) | Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            _ => false,
        }
    }

    /// Whether the value counts as "set" in a boolean context.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::String(s) => !s.is_empty(),
            CellValue::Integer(i) => *i != 0,
            CellValue::Float(v) => *v != 0.0 && !v.is_nan(),
            CellValue::Bool(b) => *b,
            CellValue::Null | CellValue::Undefined => false,
        }
    }

    /// `Null` or the empty string. A missing cell is not blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Null) || matches!(self, CellValue::String(s) if s.is_empty())
    }

    /// Neither blank nor missing.
    pub fn is_present(&self) -> bool {
        !self.is_blank() && !matches!(self, CellValue::Undefined)
    }

    /// The numeric payload, if the cell holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the cell as a float the way spreadsheet scripts do.
    ///
    /// Numbers are returned as-is; strings go through [`parse_float`]; every
    /// other kind yields `NaN`.
    pub fn to_float(&self) -> f64 {
        match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => parse_float(s),
            CellValue::Bool(_) | CellValue::Null | CellValue::Undefined => f64::NAN,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_nan() => write!(f, "NaN"),
            CellValue::Float(v) if v.is_infinite() => {
                write!(f, "{}Infinity", if *v < 0.0 { "-" } else { "" })
            }
            CellValue::Float(v) if *v == 0.0 => write!(f, "0"),
            CellValue::Float(v) if v.abs() >= 1e21 || v.abs() < 1e-6 => {
                // Exponent form with an explicit sign, as in `1e+21` or `2.5e-7`.
                let text = format!("{v:e}");
                match text.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        write!(f, "{mantissa}e+{exp}")
                    }
                    _ => write!(f, "{text}"),
                }
            }
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "null"),
            CellValue::Undefined => write!(f, "undefined"),
        }
    }
}

impl From<JsonValue> for CellValue {
    fn from(val: JsonValue) -> Self {
        match val {
            JsonValue::String(s) => CellValue::String(s),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::String(n.to_string())
                }
            }
            JsonValue::Bool(b) => CellValue::Bool(b),
            JsonValue::Null => CellValue::Null,
            // Nested structures never appear in sheet cells; keep their text.
            other => CellValue::String(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Float parsing
// ---------------------------------------------------------------------------

/// Parse the longest leading decimal number in `text`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"3.5kg"`
/// gives `3.5`. `Infinity` (optionally signed) is accepted. Anything without
/// a leading number gives `NaN`.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Table – headers plus rows, held in memory
// ---------------------------------------------------------------------------

/// A header row and the records beneath it.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Ordered column names.
    pub headers: Vec<String>,
    /// Records, each aligned with `headers`.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { headers, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
