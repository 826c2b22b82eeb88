//! FILENAME: engine/src/functions/conditional.rs
//! PURPOSE: Criterion-driven aggregates: COUNTIF, SUMIF.
//! CONTEXT: Both lift their range argument via `helpers::lift_to_sequence`
//! and pair it positionally against the criterion/sum range; a sum range
//! shorter than the test range is an explicit NUM error (DESIGN.md,
//! judgment call on shape mismatch) rather than a silent truncation.

use crate::cell::CellValue;
use crate::error::CellError;
use crate::evaluator::EvalContext;
use crate::functions::helpers::{lift_to_sequence, to_number_array, Criterion};

pub fn countif(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let (range, criterion_raw) = match (args.first(), args.get(1)) {
        (Some(r), Some(c)) => (r, c),
        _ => return CellValue::Error(CellError::value("COUNTIF requires a range and a criterion")),
    };
    let criterion = Criterion::parse(criterion_raw);
    let sequence = lift_to_sequence(range);
    let n = sequence.iter().filter(|v| criterion.matches(v)).count();
    CellValue::Number(n as f64)
}

pub fn sumif(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let (test_range, criterion_raw) = match (args.first(), args.get(1)) {
        (Some(r), Some(c)) => (r, c),
        _ => return CellValue::Error(CellError::value("SUMIF requires a range and a criterion")),
    };
    let criterion = Criterion::parse(criterion_raw);
    let test_sequence = lift_to_sequence(test_range);
    let sum_sequence = match args.get(2) {
        Some(sum_range) => lift_to_sequence(sum_range),
        None => test_sequence.clone(),
    };
    if sum_sequence.len() < test_sequence.len() {
        return CellValue::Error(CellError::num("sum range is shorter than the criteria range"));
    }
    let mut total = 0.0;
    for (i, candidate) in test_sequence.iter().enumerate() {
        if criterion.matches(candidate) {
            let contribution = to_number_array(std::slice::from_ref(&sum_sequence[i]));
            total += contribution.iter().sum::<f64>();
        }
    }
    CellValue::Number(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FunctionRegistry;
    use crate::workbook::Workbook;

    fn ctx<'a>(wb: &'a Workbook, reg: &'a FunctionRegistry) -> EvalContext<'a> {
        EvalContext::new(wb, "S", reg)
    }

    fn range(nums: &[f64]) -> CellValue {
        CellValue::Array(nums.iter().map(|n| CellValue::Number(*n)).collect())
    }

    #[test]
    fn countif_applies_a_criterion_operator() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        let args = vec![range(&[1.0, 2.0, 3.0, 4.0]), CellValue::Text(">=3".to_string())];
        assert_eq!(countif(&args, &ctx(&wb, &reg)), CellValue::Number(2.0));
    }

    #[test]
    fn sumif_without_sum_range_sums_the_test_range() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        let args = vec![range(&[1.0, 2.0, 3.0]), CellValue::Text(">=2".to_string())];
        assert_eq!(sumif(&args, &ctx(&wb, &reg)), CellValue::Number(5.0));
    }

    #[test]
    fn sumif_with_separate_sum_range_pairs_positionally() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        let args = vec![
            range(&[1.0, 2.0, 3.0]),
            CellValue::Text(">1".to_string()),
            range(&[10.0, 20.0, 30.0]),
        ];
        assert_eq!(sumif(&args, &ctx(&wb, &reg)), CellValue::Number(50.0));
    }

    #[test]
    fn sumif_shorter_sum_range_is_num_error() {
        let wb = Workbook::new();
        let reg = FunctionRegistry::new();
        let args = vec![
            range(&[1.0, 2.0, 3.0]),
            CellValue::Text(">0".to_string()),
            range(&[10.0]),
        ];
        assert!(matches!(sumif(&args, &ctx(&wb, &reg)), CellValue::Error(_)));
    }
}
