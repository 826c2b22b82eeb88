//! FILENAME: parser/src/tests.rs
//! PURPOSE: Integration-style tests for the tokenless recursive-descent parser.

use super::*;
use crate::ast::{BinaryOperator, Expression, Value};

fn num(n: f64) -> Expression {
    Expression::Literal(Value::Number(n))
}

#[test]
fn parses_simple_arithmetic_with_precedence() {
    let expr = parse("1+2*3").unwrap();
    assert_eq!(
        expr,
        Expression::BinaryOp {
            left: Box::new(num(1.0)),
            op: BinaryOperator::Add,
            right: Box::new(Expression::BinaryOp {
                left: Box::new(num(2.0)),
                op: BinaryOperator::Multiply,
                right: Box::new(num(3.0)),
            }),
        }
    );
}

#[test]
fn left_associative_subtraction() {
    let expr = parse("10-3-2").unwrap();
    // (10 - 3) - 2
    match expr {
        Expression::BinaryOp { left, op: BinaryOperator::Subtract, right } => {
            assert_eq!(*right, num(2.0));
            match *left {
                Expression::BinaryOp { op: BinaryOperator::Subtract, .. } => {}
                other => panic!("expected nested subtraction, got {:?}", other),
            }
        }
        other => panic!("expected subtraction, got {:?}", other),
    }
}

#[test]
fn parens_override_precedence() {
    let expr = parse("(1+2)*3").unwrap();
    assert_eq!(
        expr,
        Expression::BinaryOp {
            left: Box::new(Expression::BinaryOp {
                left: Box::new(num(1.0)),
                op: BinaryOperator::Add,
                right: Box::new(num(2.0)),
            }),
            op: BinaryOperator::Multiply,
            right: Box::new(num(3.0)),
        }
    );
}

#[test]
fn negative_number_literal() {
    assert_eq!(parse("-5").unwrap(), num(-5.0));
    assert_eq!(parse("1+-2").unwrap(), Expression::BinaryOp {
        left: Box::new(num(1.0)),
        op: BinaryOperator::Add,
        right: Box::new(num(-2.0)),
    });
}

#[test]
fn decimal_number_literal() {
    assert_eq!(parse("3.14").unwrap(), num(3.14));
}

#[test]
fn string_literal_with_escapes() {
    let expr = parse(r#""a\"b\\c\nd\te\qf""#).unwrap();
    assert_eq!(expr, Expression::Literal(Value::Text("a\"b\\c\nd\teqf".to_string())));
}

#[test]
fn boolean_literals_case_insensitive() {
    assert_eq!(parse("true").unwrap(), Expression::Literal(Value::Boolean(true)));
    assert_eq!(parse("FALSE").unwrap(), Expression::Literal(Value::Boolean(false)));
    assert_eq!(parse("True").unwrap(), Expression::Literal(Value::Boolean(true)));
}

#[test]
fn bare_cell_reference() {
    assert_eq!(
        parse("A1").unwrap(),
        Expression::CellRef { sheet: None, col: "A".to_string(), row: 1 }
    );
    assert_eq!(
        parse("aa100").unwrap(),
        Expression::CellRef { sheet: None, col: "AA".to_string(), row: 100 }
    );
}

#[test]
fn absolute_cell_reference_markers_are_stripped() {
    assert_eq!(
        parse("$A$1").unwrap(),
        Expression::CellRef { sheet: None, col: "A".to_string(), row: 1 }
    );
    assert_eq!(
        parse("A$1").unwrap(),
        Expression::CellRef { sheet: None, col: "A".to_string(), row: 1 }
    );
    assert_eq!(
        parse("$A1").unwrap(),
        Expression::CellRef { sheet: None, col: "A".to_string(), row: 1 }
    );
}

#[test]
fn range_reference() {
    assert_eq!(
        parse("A1:B2").unwrap(),
        Expression::Range {
            sheet: None,
            start: Box::new(Expression::CellRef { sheet: None, col: "A".to_string(), row: 1 }),
            end: Box::new(Expression::CellRef { sheet: None, col: "B".to_string(), row: 2 }),
        }
    );
}

#[test]
fn sheet_qualified_cell_and_range() {
    assert_eq!(
        parse("Sheet1!A1").unwrap(),
        Expression::CellRef { sheet: Some("Sheet1".to_string()), col: "A".to_string(), row: 1 }
    );
    assert_eq!(
        parse("Sheet1!$A$1:B2").unwrap(),
        Expression::Range {
            sheet: Some("Sheet1".to_string()),
            start: Box::new(Expression::CellRef { sheet: None, col: "A".to_string(), row: 1 }),
            end: Box::new(Expression::CellRef { sheet: None, col: "B".to_string(), row: 2 }),
        }
    );
}

#[test]
fn function_call_canonicalizes_name_and_parses_args() {
    let expr = parse("sum(A1:A3, 1, \"x\")").unwrap();
    match expr {
        Expression::FunctionCall { name, args } => {
            assert_eq!(name, "SUM");
            assert_eq!(args.len(), 3);
        }
        other => panic!("expected function call, got {:?}", other),
    }
}

#[test]
fn function_call_with_no_arguments() {
    let expr = parse("NOW()").unwrap();
    match expr {
        Expression::FunctionCall { name, args } => {
            assert_eq!(name, "NOW");
            assert!(args.is_empty());
        }
        other => panic!("expected function call, got {:?}", other),
    }
}

#[test]
fn whitespace_is_insignificant() {
    assert_eq!(parse("  1  +  2  ").unwrap(), parse("1+2").unwrap());
}

#[test]
fn rejects_unconsumed_trailing_input() {
    let err = parse("1 2").unwrap_err();
    assert!(err.message.contains("trailing"));
}

#[test]
fn rejects_unbalanced_parenthesis() {
    assert!(parse("(1+2").is_err());
    assert!(parse("1+2)").is_err());
}

#[test]
fn rejects_malformed_reference_after_sheet_bang() {
    assert!(parse("Sheet1!").is_err());
    assert!(parse("Sheet1!1").is_err());
}

#[test]
fn rejects_empty_input_after_sign() {
    let err = parse("-").unwrap_err();
    assert_eq!(err.offset, 0);
}

#[test]
fn rejects_bare_identifier_that_is_not_a_reference() {
    assert!(parse("Foo").is_err());
}

#[test]
fn error_offsets_point_at_failure() {
    let err = parse("1+").unwrap_err();
    assert_eq!(err.offset, 2);
}
