//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Lazy, on-demand evaluation of cells and expression trees.
//! CONTEXT: Evaluation is a depth-first walk that recurses into referenced
//! cells as it encounters them; there is no precomputed dependency graph
//! and no recalculation ordering pass. Cycle detection is purely a
//! property of the current call chain, tracked by a visit set of
//! `sheet!address` keys that is guaranteed to shrink back on every exit
//! path (success, in-cell error, or a registered function panicking) via
//! an RAII guard.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use parser::address;
use parser::ast::{BinaryOperator, Expression, Value};

use crate::cell::CellValue;
use crate::error::CellError;
use crate::registry::FunctionRegistry;
use crate::workbook::Workbook;

/// What a function implementation sees besides its evaluated arguments:
/// the workbook (read-only; built-ins never use it, see §4.8, but a
/// host-registered function is free to), the active sheet, and the
/// registry itself (so a function could, in principle, call another by
/// name). There is no side-effect channel: nothing in scope needs one.
pub struct EvalContext<'a> {
    pub workbook: &'a Workbook,
    pub sheet: &'a str,
    pub registry: &'a FunctionRegistry,
}

impl<'a> EvalContext<'a> {
    pub fn new(workbook: &'a Workbook, sheet: &'a str, registry: &'a FunctionRegistry) -> Self {
        EvalContext { workbook, sheet, registry }
    }
}

/// Releases a visit-set key when dropped, guaranteeing cleanup even if a
/// called function panics and the unwind passes through this frame before
/// `catch_unwind` stops it further up.
struct VisitGuard<'a> {
    visited: &'a mut HashSet<String>,
    key: String,
}

impl<'a> VisitGuard<'a> {
    fn acquire(visited: &'a mut HashSet<String>, key: String) -> Option<Self> {
        if visited.contains(&key) {
            None
        } else {
            visited.insert(key.clone());
            Some(VisitGuard { visited, key })
        }
    }

    /// Reborrows the underlying visit set for a recursive call. A plain
    /// field read would attempt to move `&mut HashSet<String>` out of a
    /// type that implements `Drop`, which the borrow checker forbids; this
    /// reborrow keeps `self` (and therefore the eventual `Drop::drop`)
    /// intact.
    fn visited_mut(&mut self) -> &mut HashSet<String> {
        self.visited
    }
}

impl<'a> Drop for VisitGuard<'a> {
    fn drop(&mut self) {
        self.visited.remove(&self.key);
    }
}

pub struct Evaluator<'a> {
    workbook: &'a Workbook,
    registry: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(workbook: &'a Workbook, registry: &'a FunctionRegistry) -> Self {
        Evaluator { workbook, registry }
    }

    /// The entry point named in §6: evaluates the cell at `(sheet,
    /// address)`, parsing and recursively evaluating it if it holds a
    /// formula, starting with a fresh visit set.
    pub fn evaluate_cell(&self, sheet: &str, address: &str) -> CellValue {
        let mut visited = HashSet::new();
        self.evaluate_cell_inner(sheet, address, &mut visited)
    }

    /// Evaluates a caller-supplied expression tree directly against
    /// `sheet`, without reading it from the workbook first. Used both for
    /// testing the evaluator's semantics independent of storage, and as
    /// the target of the "range spans two sheets -> REF" testable
    /// property, which a hand-built tree can exercise even though the
    /// parser's own grammar cannot produce such a tree (see SPEC_FULL.md).
    pub fn evaluate_ast(&self, expr: &Expression, sheet: &str) -> CellValue {
        let mut visited = HashSet::new();
        self.eval_expr(expr, sheet, &mut visited)
    }

    fn evaluate_cell_inner(
        &self,
        sheet: &str,
        address: &str,
        visited: &mut HashSet<String>,
    ) -> CellValue {
        let (sheet_name, canonical) = match address::normalize(address, sheet) {
            Ok(v) => v,
            Err(e) => return CellValue::Error(CellError::value(format!("invalid address: {}", e))),
        };

        let key = format!("{}!{}", sheet_name, canonical);
        let mut guard = match VisitGuard::acquire(visited, key.clone()) {
            Some(g) => g,
            None => return CellValue::Error(CellError::cycle(format!("circular reference at {}", key))),
        };

        let result = match self.workbook.get_cell(&sheet_name, &canonical) {
            None => CellValue::Empty,
            Some(CellValue::Formula(text)) => {
                let body = text.strip_prefix('=').unwrap_or(&text);
                match parser::parse(body) {
                    Ok(expr) => self.eval_expr(&expr, &sheet_name, guard.visited_mut()),
                    Err(e) => CellValue::Error(CellError::value(format!(
                        "parse error at offset {}: {}",
                        e.offset, e.message
                    ))),
                }
            }
            Some(other) => other,
        };

        drop(guard);
        result
    }

    fn eval_expr(&self, expr: &Expression, sheet: &str, visited: &mut HashSet<String>) -> CellValue {
        match expr {
            Expression::Literal(v) => literal_to_cell_value(v),
            Expression::CellRef { sheet: ref_sheet, col, row } => {
                let target_sheet = ref_sheet.clone().unwrap_or_else(|| sheet.to_string());
                let addr = format!("{}{}", col, row);
                self.evaluate_cell_inner(&target_sheet, &addr, visited)
            }
            Expression::Range { sheet: range_sheet, start, end } => {
                self.eval_range(range_sheet, start, end, sheet, visited)
            }
            Expression::FunctionCall { name, args } => self.eval_function_call(name, args, sheet, visited),
            Expression::BinaryOp { left, op, right } => self.eval_binary_op(left, *op, right, sheet, visited),
        }
    }

    fn eval_range(
        &self,
        range_sheet: &Option<String>,
        start: &Expression,
        end: &Expression,
        current_sheet: &str,
        visited: &mut HashSet<String>,
    ) -> CellValue {
        let (start_sheet, start_col, start_row) = match extract_cell_ref(start) {
            Some(v) => v,
            None => return CellValue::Error(CellError::value("range endpoint is not a cell reference")),
        };
        let (end_sheet, end_col, end_row) = match extract_cell_ref(end) {
            Some(v) => v,
            None => return CellValue::Error(CellError::value("range endpoint is not a cell reference")),
        };

        let sheet_a = start_sheet
            .or_else(|| range_sheet.clone())
            .unwrap_or_else(|| current_sheet.to_string());
        let sheet_b = end_sheet
            .or_else(|| range_sheet.clone())
            .unwrap_or_else(|| current_sheet.to_string());

        if sheet_a != sheet_b {
            return CellValue::Error(CellError::reference("range spans two different sheets"));
        }

        let col_a = address::column_letters_to_index(&start_col);
        let col_b = address::column_letters_to_index(&end_col);
        let addrs = address::expand_range((col_a, start_row), (col_b, end_row));

        let values = addrs
            .iter()
            .map(|addr| self.evaluate_cell_inner(&sheet_a, addr, visited))
            .collect();
        CellValue::Array(values)
    }

    fn eval_function_call(
        &self,
        name: &str,
        args: &[Expression],
        sheet: &str,
        visited: &mut HashSet<String>,
    ) -> CellValue {
        let arg_values: Vec<CellValue> = args.iter().map(|a| self.eval_expr(a, sheet, visited)).collect();

        let func = match self.registry.get(name) {
            Some(f) => f,
            None => return CellValue::Error(CellError::name(format!("unknown function: {}", name))),
        };

        let ctx = EvalContext::new(self.workbook, sheet, self.registry);
        let result = panic::catch_unwind(AssertUnwindSafe(|| func(&arg_values, &ctx)));
        match result {
            Ok(v) => v,
            Err(_) => CellValue::Error(CellError::value(format!("function '{}' raised an exception", name))),
        }
    }

    fn eval_binary_op(
        &self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
        sheet: &str,
        visited: &mut HashSet<String>,
    ) -> CellValue {
        let left_val = self.eval_expr(left, sheet, visited);
        if let CellValue::Error(e) = &left_val {
            return CellValue::Error(e.clone());
        }
        let right_val = self.eval_expr(right, sheet, visited);
        if let CellValue::Error(e) = &right_val {
            return CellValue::Error(e.clone());
        }

        let lhs = match coerce_number(&left_val) {
            Some(n) => n,
            None => return CellValue::Error(CellError::value("non-numeric operand")),
        };
        let rhs = match coerce_number(&right_val) {
            Some(n) => n,
            None => return CellValue::Error(CellError::value("non-numeric operand")),
        };

        if !lhs.is_finite() || !rhs.is_finite() {
            return CellValue::Error(CellError::value("non-finite operand"));
        }

        match op {
            BinaryOperator::Add => CellValue::Number(lhs + rhs),
            BinaryOperator::Subtract => CellValue::Number(lhs - rhs),
            BinaryOperator::Multiply => CellValue::Number(lhs * rhs),
            BinaryOperator::Divide => {
                if rhs == 0.0 {
                    CellValue::Error(CellError::div0("division by zero"))
                } else {
                    CellValue::Number(lhs / rhs)
                }
            }
        }
    }
}

fn literal_to_cell_value(v: &Value) -> CellValue {
    match v {
        Value::Number(n) => CellValue::Number(*n),
        Value::Text(s) => CellValue::Text(s.clone()),
        Value::Boolean(b) => CellValue::Boolean(*b),
    }
}

/// Pulls `(sheet, col, row)` out of an `Expression::CellRef`, the only
/// shape the parser ever places at a range endpoint. Returns `None` for
/// anything else, which a hand-built tree could otherwise produce.
fn extract_cell_ref(expr: &Expression) -> Option<(Option<String>, String, u32)> {
    match expr {
        Expression::CellRef { sheet, col, row } => Some((sheet.clone(), col.clone(), *row)),
        _ => None,
    }
}

/// Coerces a value to a number for binary arithmetic: numbers pass
/// through, non-empty numeric text is parsed permissively, and booleans
/// are deliberately *not* coerced (see DESIGN.md, Open Question 3).
pub(crate) fn coerce_number(v: &CellValue) -> Option<f64> {
    match v {
        CellValue::Number(n) => Some(*n),
        CellValue::Empty => Some(0.0),
        CellValue::Text(s) => crate::functions::helpers::parse_permissive_number(s),
        CellValue::Boolean(_) | CellValue::Array(_) | CellValue::Error(_) | CellValue::Formula(_) => None,
    }
}
