//! FILENAME: engine/src/functions/helpers.rs
//! PURPOSE: Shared helpers used across the built-in function library.
//! CONTEXT: `flatten_args`, `to_number_array`, `truthy`, `compare`, `equals`,
//! and `Criterion` are the primitives §4.8 names explicitly; every built-in
//! is written in terms of them rather than re-implementing coercion ad hoc.

use std::cmp::Ordering;

use crate::cell::CellValue;

/// Parses a numeric string permissively: surrounding whitespace is
/// trimmed, then the remainder must parse as an `f64`. Used both by
/// `to_number_array` and by the evaluator's binary-operator coercion.
pub fn parse_permissive_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// One level of flattening: `Array` elements are spliced in (their direct
/// children only), scalars are kept as-is. This matches how the evaluator
/// hands a range to a function: as a single flat sequence argument.
pub fn flatten_args(args: &[CellValue]) -> Vec<CellValue> {
    let mut out = Vec::new();
    for a in args {
        match a {
            CellValue::Array(items) => out.extend(items.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Keeps finite numbers; parses non-empty strings via a permissive numeric
/// parser and keeps the result when finite; drops everything else
/// (including logicals) silently. See DESIGN.md, Open Questions 2 and 3.
pub fn to_number_array(values: &[CellValue]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| match v {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) if !s.is_empty() => {
                parse_permissive_number(s).filter(|n| n.is_finite())
            }
            _ => None,
        })
        .collect()
}

/// Standard non-zero / non-empty / non-false interpretation.
pub fn truthy(v: &CellValue) -> bool {
    match v {
        CellValue::Boolean(b) => *b,
        CellValue::Number(n) => *n != 0.0,
        CellValue::Text(s) => !s.is_empty(),
        CellValue::Empty => false,
        CellValue::Error(_) => false,
        CellValue::Array(items) => items.first().map(truthy).unwrap_or(false),
        CellValue::Formula(_) => false,
    }
}

/// The textual form used for lexicographic fallback comparison and for
/// string-coercion in `CONCAT`/`LEN`/`UPPER`/`LOWER`.
pub fn display_string(v: &CellValue) -> String {
    v.display_value()
}

/// Numbers compare numerically; anything else compares by textual form
/// lexicographically; equal inputs compare equal.
pub fn compare(a: &CellValue, b: &CellValue) -> Ordering {
    if let (CellValue::Number(x), CellValue::Number(y)) = (a, b) {
        return x.partial_cmp(y).unwrap_or(Ordering::Equal);
    }
    display_string(a).cmp(&display_string(b))
}

/// Identity on equal numbers/strings/logicals; false otherwise (no
/// cross-type coercion, unlike `compare`'s textual fallback).
pub fn equals(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x == y,
        (CellValue::Text(x), CellValue::Text(y)) => x == y,
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x == y,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A parsed conditional criterion: an operator plus a comparison value.
/// Built from a raw evaluated argument (typically `COUNTIF`/`SUMIF`'s
/// second argument) via `Criterion::parse`.
pub struct Criterion {
    op: CriterionOp,
    value: CellValue,
}

impl Criterion {
    /// Parses a leading operator from `>=, <=, <>, =, >, <` (default `=`)
    /// and a trailing value out of `raw`. Non-text values (a bare number,
    /// boolean, etc.) are treated as an implicit `=` against that value
    /// with no operator parsing.
    pub fn parse(raw: &CellValue) -> Criterion {
        let text = match raw {
            CellValue::Text(s) => s.as_str(),
            other => {
                return Criterion { op: CriterionOp::Eq, value: other.clone() };
            }
        };

        let (op, rest) = if let Some(rest) = text.strip_prefix(">=") {
            (CriterionOp::Gte, rest)
        } else if let Some(rest) = text.strip_prefix("<=") {
            (CriterionOp::Lte, rest)
        } else if let Some(rest) = text.strip_prefix("<>") {
            (CriterionOp::Ne, rest)
        } else if let Some(rest) = text.strip_prefix('=') {
            (CriterionOp::Eq, rest)
        } else if let Some(rest) = text.strip_prefix('>') {
            (CriterionOp::Gt, rest)
        } else if let Some(rest) = text.strip_prefix('<') {
            (CriterionOp::Lt, rest)
        } else {
            (CriterionOp::Eq, text)
        };

        let value = match parse_permissive_number(rest) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(rest.to_string()),
        };

        Criterion { op, value }
    }

    /// Coerces `candidate` toward the criterion's value type when the
    /// criterion value is numeric and the candidate is numeric text, then
    /// applies the operator via `compare`/`equals`.
    pub fn matches(&self, candidate: &CellValue) -> bool {
        let lhs = self.coerce_like(candidate);
        match self.op {
            CriterionOp::Eq => compare(&lhs, &self.value) == Ordering::Equal,
            CriterionOp::Ne => compare(&lhs, &self.value) != Ordering::Equal,
            CriterionOp::Gt => compare(&lhs, &self.value) == Ordering::Greater,
            CriterionOp::Gte => compare(&lhs, &self.value) != Ordering::Less,
            CriterionOp::Lt => compare(&lhs, &self.value) == Ordering::Less,
            CriterionOp::Lte => compare(&lhs, &self.value) != Ordering::Greater,
        }
    }

    fn coerce_like(&self, candidate: &CellValue) -> CellValue {
        if let CellValue::Number(_) = &self.value {
            if let CellValue::Text(s) = candidate {
                if let Some(n) = parse_permissive_number(s) {
                    return CellValue::Number(n);
                }
            }
        }
        candidate.clone()
    }
}

/// Lifts a scalar into a one-element sequence, or returns an array's
/// elements directly. Used by `COUNTIF`/`SUMIF`/`MATCH` for "first arg
/// treated as sequence (scalar lifted)".
pub fn lift_to_sequence(v: &CellValue) -> Vec<CellValue> {
    match v {
        CellValue::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}
