use chrono::{NaiveDateTime, NaiveTime};
use std::borrow::Cow;
use std::fmt;

/// Integral floats below this magnitude are rendered without a fractional part.
const INTEGRAL_RENDER_LIMIT: f64 = 1e15;

/// Whole floats below this magnitude keep a trailing `.0` in float columns.
const FLOAT_REPR_LIMIT: f64 = 1e16;

/// A single cell of a [`Table`](super::Table).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn is_number(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => !f.is_nan(),
            _ => false,
        }
    }

    /// True for numbers without a fractional part.
    pub fn is_whole_number(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => false,
        }
    }

    /// Renders a number the way a float column is written (`4.0`, `1.5`). Other cells render
    /// as in [`Value::to_field`].
    pub fn to_float_field(&self) -> Cow<'_, str> {
        match self {
            Value::Int(i) => Cow::Owned(format!("{}.0", i)),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < FLOAT_REPR_LIMIT => {
                Cow::Owned(format!("{:.1}", f))
            }
            _ => self.to_field(),
        }
    }

    /// Converts the cell to its text form, keeping missing cells missing.
    ///
    /// Text is kept verbatim so identifiers such as `0012345` keep their leading zeros.
    pub fn into_text(self) -> Value {
        match self {
            Value::Missing | Value::Text(_) => self,
            Value::Float(f) if f.is_nan() => Value::Missing,
            Value::DateTime(dt) => Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            other => Value::Text(other.to_field().into_owned()),
        }
    }

    /// Renders the cell as a delimited-text field. Missing cells become empty fields.
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            Value::Missing => Cow::Borrowed(""),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(f) => Cow::Owned(format_float(*f)),
            Value::Bool(true) => Cow::Borrowed("True"),
            Value::Bool(false) => Cow::Borrowed("False"),
            Value::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    Cow::Owned(dt.format("%Y-%m-%d").to_string())
                } else {
                    Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string())
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field())
    }
}

fn format_float(f: f64) -> String {
    if !f.is_finite() {
        if f.is_nan() {
            return String::new();
        }
        return if f > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    if f.fract() == 0.0 && f.abs() < INTEGRAL_RENDER_LIMIT {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}
