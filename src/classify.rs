//! Value classification: maps one raw field value to its most specific type.
//!
//! Classification is total and strict-first: boolean literal, then integer,
//! then decimal, then string fallback. Every non-missing value receives
//! exactly one [`TypeTag`]; malformed numeric-looking values (`1.2.3`, `--5`)
//! simply land in the string bucket. The literal sets and digit-counting rules
//! below are a versioned contract: changing them changes merge results for
//! previously profiled corpora.
//!
//! - Boolean: `true` / `false`, ASCII-case-insensitive. Nothing else.
//! - Integer: base-10 `i64` with optional leading sign. Digit runs beyond the
//!   `i64` range fall through to the decimal rule.
//! - Decimal: optional sign, digits with at most one decimal point, at least
//!   one digit, no exponent notation (`1e5` is a string). `precision` counts
//!   every digit including leading zeros; sign and point are excluded.
//!   `scale` counts digits after the point.

use std::fmt;

use serde::Serialize;

/// Closed set of inferred value types, in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Str,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified value together with the facts the accumulators need.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Bool,
    Int(i64),
    Float { value: f64, precision: u32, scale: u32 },
    Str(String),
}

impl Observation {
    pub fn tag(&self) -> TypeTag {
        match self {
            Observation::Bool => TypeTag::Bool,
            Observation::Int(_) => TypeTag::Int,
            Observation::Float { .. } => TypeTag::Float,
            Observation::Str(_) => TypeTag::Str,
        }
    }
}

/// Classifies a raw field value. Returns `None` for missing values (empty or
/// whitespace-only), which are excluded from aggregation entirely.
pub fn classify(raw: &str) -> Option<Observation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return Some(Observation::Bool);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(Observation::Int(value));
    }
    if let Some((precision, scale)) = analyze_decimal_token(trimmed)
        && let Ok(value) = trimmed.parse::<f64>()
        && value.is_finite()
    {
        return Some(Observation::Float {
            value,
            precision,
            scale,
        });
    }
    Some(Observation::Str(trimmed.to_string()))
}

/// Scans a candidate decimal literal and returns `(precision, scale)`, or
/// `None` if the token does not match the decimal grammar.
fn analyze_decimal_token(value: &str) -> Option<(u32, u32)> {
    let body = value.strip_prefix(['+', '-']).unwrap_or(value);
    if body.is_empty() {
        return None;
    }
    let mut digits = 0u32;
    let mut scale = 0u32;
    let mut point_seen = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' => {
                digits += 1;
                if point_seen {
                    scale += 1;
                }
            }
            '.' => {
                if point_seen {
                    return None;
                }
                point_seen = true;
            }
            _ => return None,
        }
    }
    if digits == 0 {
        return None;
    }
    Some((digits, scale))
}
