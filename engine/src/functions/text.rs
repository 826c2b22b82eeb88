//! FILENAME: engine/src/functions/text.rs
//! PURPOSE: Text built-ins: CONCAT, LEN, UPPER, LOWER.
//! CONTEXT: All four coerce through `CellValue::display_value` rather than
//! requiring their arguments to already be `Text`, matching the permissive
//! coercion used elsewhere in the function library.

use crate::cell::CellValue;
use crate::error::CellError;
use crate::evaluator::EvalContext;
use crate::functions::helpers::flatten_args;

pub fn concat(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let joined: String = flatten_args(args).iter().map(CellValue::display_value).collect();
    CellValue::Text(joined)
}

pub fn len(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match args.first() {
        Some(v) => CellValue::Number(v.display_value().chars().count() as f64),
        None => CellValue::Error(CellError::value("LEN requires exactly one argument")),
    }
}

pub fn upper(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match args.first() {
        Some(v) => CellValue::Text(v.display_value().to_uppercase()),
        None => CellValue::Error(CellError::value("UPPER requires exactly one argument")),
    }
}

pub fn lower(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match args.first() {
        Some(v) => CellValue::Text(v.display_value().to_lowercase()),
        None => CellValue::Error(CellError::value("LOWER requires exactly one argument")),
    }
}
