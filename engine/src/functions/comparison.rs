//! FILENAME: engine/src/functions/comparison.rs
//! PURPOSE: Binary comparison built-ins exposed as functions rather than
//! operators: EQ, NE, GT, GTE, LT, LTE.
//! CONTEXT: The parser's `BinaryOperator` enum has no comparison variants
//! (§4.3/§9); comparisons are reached only through this function family,
//! layered on `helpers::compare`/`equals`.

use std::cmp::Ordering;

use crate::cell::CellValue;
use crate::error::CellError;
use crate::evaluator::EvalContext;
use crate::functions::helpers::{compare, equals};

fn binary_args(args: &[CellValue]) -> Result<(&CellValue, &CellValue), CellValue> {
    match (args.first(), args.get(1)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(CellValue::Error(CellError::value("expects exactly two arguments"))),
    }
}

pub fn eq(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match binary_args(args) {
        Ok((a, b)) => CellValue::Boolean(equals(a, b)),
        Err(e) => e,
    }
}

pub fn ne(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match binary_args(args) {
        Ok((a, b)) => CellValue::Boolean(!equals(a, b)),
        Err(e) => e,
    }
}

pub fn gt(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match binary_args(args) {
        Ok((a, b)) => CellValue::Boolean(compare(a, b) == Ordering::Greater),
        Err(e) => e,
    }
}

pub fn gte(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match binary_args(args) {
        Ok((a, b)) => CellValue::Boolean(compare(a, b) != Ordering::Less),
        Err(e) => e,
    }
}

pub fn lt(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match binary_args(args) {
        Ok((a, b)) => CellValue::Boolean(compare(a, b) == Ordering::Less),
        Err(e) => e,
    }
}

pub fn lte(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    match binary_args(args) {
        Ok((a, b)) => CellValue::Boolean(compare(a, b) != Ordering::Greater),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FunctionRegistry;
    use crate::workbook::Workbook;

    fn ctx<'a>(wb: &'a Workbook, reg: &'a FunctionRegistry) -> EvalContext<'a> {
        EvalContext::new(wb, "S", reg)
    }

    #[test]
    fn eq_and_ne_have_no_cross_type_coercion() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        let args = vec![CellValue::Number(1.0), CellValue::Text("1".to_string())];
        assert_eq!(eq(&args, &ctx(&wb, &reg)), CellValue::Boolean(false));
        assert_eq!(ne(&args, &ctx(&wb, &reg)), CellValue::Boolean(true));
    }

    #[test]
    fn ordering_comparisons_are_numeric_for_numbers() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        let args = vec![CellValue::Number(2.0), CellValue::Number(10.0)];
        assert_eq!(lt(&args, &ctx(&wb, &reg)), CellValue::Boolean(true));
        assert_eq!(gte(&args, &ctx(&wb, &reg)), CellValue::Boolean(false));
    }

    #[test]
    fn missing_argument_is_an_error() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        assert!(matches!(gt(&[CellValue::Number(1.0)], &ctx(&wb, &reg)), CellValue::Error(_)));
    }
}
