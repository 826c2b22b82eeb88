//! FILENAME: engine/src/functions/logical.rs
//! PURPOSE: Logical built-ins: IF, AND, OR, NOT.
//! CONTEXT: `AND`/`OR` flatten first (a range argument contributes every
//! element); `IF` does not, since its three positions are fixed arity.

use crate::cell::CellValue;
use crate::error::CellError;
use crate::evaluator::EvalContext;
use crate::functions::helpers::{flatten_args, truthy};

pub fn if_fn(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    if args.is_empty() {
        return CellValue::Error(CellError::na("IF requires a condition argument"));
    }
    let condition = truthy(&args[0]);
    match (condition, args.get(1), args.get(2)) {
        (true, Some(v), _) => v.clone(),
        (true, None, _) => CellValue::Boolean(true),
        (false, _, Some(v)) => v.clone(),
        (false, _, None) => CellValue::Boolean(false),
    }
}

pub fn and(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let flat = flatten_args(args);
    if flat.is_empty() {
        return CellValue::Error(CellError::value("AND requires at least one argument"));
    }
    CellValue::Boolean(flat.iter().all(truthy))
}

pub fn or(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let flat = flatten_args(args);
    if flat.is_empty() {
        return CellValue::Error(CellError::value("OR requires at least one argument"));
    }
    CellValue::Boolean(flat.iter().any(truthy))
}

pub fn not(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match args.first() {
        Some(v) => CellValue::Boolean(!truthy(v)),
        None => CellValue::Error(CellError::value("NOT requires exactly one argument")),
    }
}
