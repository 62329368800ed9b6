// ============================================================
// CELL VALUES
// ============================================================
// Typed cell values and column kinds

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a dataset column, fixed by schema sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    DateTime,
    Text,
}

impl ColumnKind {
    /// Integer and float columns take part in statistics and numeric charts
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Narrowest kind able to hold values of both `self` and `other`
    pub fn widen(self, other: ColumnKind) -> ColumnKind {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnKind::Integer, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Integer) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Boolean => write!(f, "boolean"),
            ColumnKind::DateTime => write!(f, "datetime"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell. NaN floats count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Like [`Cell::as_f64`] but also drops infinities; used where values become axis coordinates.
    pub fn as_finite_f64(&self) -> Option<f64> {
        self.as_f64().filter(|v| v.is_finite())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NaN"),
            Cell::Int(v) => write!(f, "{}", v),
            // whole floats keep their ".0" as pandas prints them
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{:.1}", v)
            }
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            Cell::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Cell::Text(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_numeric_kinds() {
        assert_eq!(ColumnKind::Integer.widen(ColumnKind::Float), ColumnKind::Float);
        assert_eq!(ColumnKind::Float.widen(ColumnKind::Integer), ColumnKind::Float);
        assert_eq!(ColumnKind::Integer.widen(ColumnKind::Integer), ColumnKind::Integer);
    }

    #[test]
    fn test_widen_mixed_kinds_to_text() {
        assert_eq!(ColumnKind::Integer.widen(ColumnKind::Boolean), ColumnKind::Text);
        assert_eq!(ColumnKind::DateTime.widen(ColumnKind::Float), ColumnKind::Text);
    }

    #[test]
    fn test_as_f64_skips_nan_and_text() {
        assert_eq!(Cell::Int(3).as_f64(), Some(3.0));
        assert_eq!(Cell::Float(f64::NAN).as_f64(), None);
        assert_eq!(Cell::Text("3".to_string()).as_f64(), None);
        assert_eq!(Cell::Null.as_f64(), None);
        assert_eq!(Cell::Float(f64::INFINITY).as_f64(), Some(f64::INFINITY));
        assert_eq!(Cell::Float(f64::INFINITY).as_finite_f64(), None);
        assert_eq!(Cell::Float(-2.5).as_finite_f64(), Some(-2.5));
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Cell::Float(2.5).to_string(), "2.5");
        assert_eq!(Cell::Float(1.0).to_string(), "1.0");
        assert_eq!(Cell::Float(-3.0).to_string(), "-3.0");
        assert_eq!(Cell::Int(1).to_string(), "1");
        assert_eq!(Cell::Bool(true).to_string(), "True");
        assert_eq!(Cell::Null.to_string(), "NaN");
    }
}
