//! FILENAME: engine/src/functions/aggregate.rs
//! PURPOSE: Numeric aggregation built-ins: SUM, AVERAGE, MIN, MAX, COUNT, COUNTA.
//! CONTEXT: `SUM`/`AVERAGE`/`MIN`/`MAX` share `helpers::to_number_array`'s
//! permissive numeric-string coercion; `COUNT` deliberately does not (it
//! counts only values already `CellValue::Number`), and `COUNTA` counts
//! every value that isn't absent or an empty string. See DESIGN.md, Open
//! Question 2.

use crate::cell::CellValue;
use crate::evaluator::EvalContext;
use crate::functions::helpers::{flatten_args, to_number_array};

pub fn sum(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let nums = to_number_array(&flatten_args(args));
    CellValue::Number(nums.iter().sum())
}

pub fn average(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let nums = to_number_array(&flatten_args(args));
    if nums.is_empty() {
        return CellValue::Number(0.0);
    }
    CellValue::Number(nums.iter().sum::<f64>() / nums.len() as f64)
}

pub fn min(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let nums = to_number_array(&flatten_args(args));
    match nums.into_iter().fold(None, |acc: Option<f64>, n| match acc {
        Some(m) if m <= n => Some(m),
        _ => Some(n),
    }) {
        Some(n) => CellValue::Number(n),
        None => CellValue::Number(0.0),
    }
}

pub fn max(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let nums = to_number_array(&flatten_args(args));
    match nums.into_iter().fold(None, |acc: Option<f64>, n| match acc {
        Some(m) if m >= n => Some(m),
        _ => Some(n),
    }) {
        Some(n) => CellValue::Number(n),
        None => CellValue::Number(0.0),
    }
}

/// Counts values that are already finite numbers; unlike `SUM`/`AVERAGE`/
/// `MIN`/`MAX`, numeric strings are not coerced (DESIGN.md, Open Question 2:
/// `to_number_array`'s string-parsing policy is deliberately not unified
/// with `COUNT`).
pub fn count(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let flat = flatten_args(args);
    let n = flat
        .iter()
        .filter(|v| matches!(v, CellValue::Number(n) if n.is_finite()))
        .count();
    CellValue::Number(n as f64)
}

/// Counts every value that is neither absent (`Empty`) nor an empty string.
pub fn counta(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let flat = flatten_args(args);
    let n = flat
        .iter()
        .filter(|v| !v.is_empty() && !matches!(v, CellValue::Text(s) if s.is_empty()))
        .count();
    CellValue::Number(n as f64)
}
