//! FILENAME: engine/src/functions/lookup.rs
//! PURPOSE: Table-oriented built-ins: MATCH, INDEX, VLOOKUP.
//! CONTEXT: Operates on the opaque `CellValue::Array` tables a host can
//! write directly (engine/src/cell.rs) as well as on ranges the evaluator
//! produces; `to_rows` is the single place that reconciles "flat array" vs
//! "array of row-arrays" (DESIGN.md, VLOOKUP/INDEX scalar-table handling).

use crate::cell::CellValue;
use crate::error::CellError;
use crate::evaluator::EvalContext;
use crate::functions::helpers::{compare, equals, lift_to_sequence};
use std::cmp::Ordering;

/// Normalizes any `CellValue` used as a table into rows of cells. An
/// `Array` whose elements are themselves `Array`s is a row-major table
/// already; any other `Array` (or a bare scalar) is treated as a single
/// column, one row per element.
fn to_rows(table: &CellValue) -> Vec<Vec<CellValue>> {
    match table {
        CellValue::Array(items) if items.iter().all(|v| matches!(v, CellValue::Array(_))) => {
            items
                .iter()
                .map(|row| match row {
                    CellValue::Array(cells) => cells.clone(),
                    other => vec![other.clone()],
                })
                .collect()
        }
        CellValue::Array(items) => items.iter().map(|v| vec![v.clone()]).collect(),
        other => vec![vec![other.clone()]],
    }
}

/// `match_type` argument semantics: `0` exact, `1` (default, per
/// DESIGN.md's resolution of the open match-type question) largest value
/// less than or equal to the lookup value over ascending data, `-1`
/// smallest value greater than or equal to the lookup value over
/// descending data.
pub fn match_fn(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let lookup_value = match args.first() {
        Some(v) => v,
        None => return CellValue::Error(CellError::na("MATCH requires a lookup value")),
    };
    let lookup_array = match args.get(1) {
        Some(v) => lift_to_sequence(v),
        None => return CellValue::Error(CellError::na("MATCH requires a lookup array")),
    };
    let match_type = match args.get(2) {
        Some(CellValue::Number(n)) => *n as i32,
        None => 1,
        Some(_) => return CellValue::Error(CellError::value("MATCH match_type must be numeric")),
    };

    let found = match match_type {
        0 => lookup_array.iter().position(|v| equals(v, lookup_value)),
        1 => {
            let mut best: Option<usize> = None;
            for (i, v) in lookup_array.iter().enumerate() {
                if compare(v, lookup_value) != Ordering::Greater {
                    best = Some(i);
                } else {
                    break;
                }
            }
            best
        }
        -1 => {
            let mut best: Option<usize> = None;
            for (i, v) in lookup_array.iter().enumerate() {
                if compare(v, lookup_value) != Ordering::Less {
                    best = Some(i);
                } else {
                    break;
                }
            }
            best
        }
        _ => return CellValue::Error(CellError::value("MATCH match_type must be -1, 0, or 1")),
    };

    match found {
        Some(i) => CellValue::Number((i + 1) as f64),
        None => CellValue::Error(CellError::na("MATCH found no matching value")),
    }
}

pub fn index(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let table = match args.first() {
        Some(v) => v,
        None => return CellValue::Error(CellError::reference("INDEX requires an array")),
    };
    if !matches!(table, CellValue::Array(_)) {
        return CellValue::Error(CellError::value("INDEX requires an array argument"));
    }
    let row_num = match args.get(1) {
        Some(CellValue::Number(n)) => *n as i64,
        _ => return CellValue::Error(CellError::value("INDEX requires a numeric row_num")),
    };
    let rows = to_rows(table);
    if row_num < 1 || row_num as usize > rows.len() {
        return CellValue::Error(CellError::reference("INDEX row_num is out of range"));
    }
    let row = &rows[row_num as usize - 1];

    match args.get(2) {
        None => {
            if row.len() == 1 {
                row[0].clone()
            } else {
                CellValue::Array(row.clone())
            }
        }
        Some(CellValue::Number(n)) => {
            let col = *n as i64;
            if col < 1 || col as usize > row.len() {
                CellValue::Error(CellError::reference("INDEX col_num is out of range"))
            } else {
                row[col as usize - 1].clone()
            }
        }
        Some(_) => CellValue::Error(CellError::value("INDEX col_num must be numeric")),
    }
}

/// `range_lookup` defaults to `TRUE` (approximate match over ascending
/// first-column data), matching `MATCH`'s own default.
pub fn vlookup(args: &[CellValue], _ctx: &EvalContext) -> CellValue {
    let lookup_value = match args.first() {
        Some(v) => v,
        None => return CellValue::Error(CellError::na("VLOOKUP requires a lookup value")),
    };
    let table = match args.get(1) {
        Some(v) => v,
        None => return CellValue::Error(CellError::reference("VLOOKUP requires a table")),
    };
    let col_index = match args.get(2) {
        Some(CellValue::Number(n)) => *n as i64,
        _ => return CellValue::Error(CellError::value("VLOOKUP requires a numeric col_index")),
    };
    let approximate = match args.get(3) {
        Some(v) => crate::functions::helpers::truthy(v),
        None => true,
    };

    let rows = to_rows(table);
    if col_index < 1 {
        return CellValue::Error(CellError::value("VLOOKUP col_index must be at least 1"));
    }

    let first_column: Vec<CellValue> = rows
        .iter()
        .map(|row| row.first().cloned().unwrap_or(CellValue::Empty))
        .collect();

    let found_row = if approximate {
        let mut best: Option<usize> = None;
        for (i, v) in first_column.iter().enumerate() {
            if compare(v, lookup_value) != Ordering::Greater {
                best = Some(i);
            } else {
                break;
            }
        }
        best
    } else {
        first_column.iter().position(|v| equals(v, lookup_value))
    };

    let row_idx = match found_row {
        Some(i) => i,
        None => return CellValue::Error(CellError::na("VLOOKUP found no matching row")),
    };

    let row = &rows[row_idx];
    if col_index as usize > row.len() {
        return CellValue::Error(CellError::reference("VLOOKUP col_index is out of range"));
    }
    row[col_index as usize - 1].clone()
}
