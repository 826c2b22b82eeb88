//! FILENAME: engine/src/cell.rs
//! PURPOSE: The cell-content / evaluation-output value union.
//! CONTEXT: A single `CellValue` type serves both as what the workbook
//! stores at an address and as what the evaluator produces: "Evaluator
//! output is the same value union as cell content" (see the sum-types
//! design note). `Formula` only ever appears in the raw, stored form; a
//! fully evaluated result never contains it.

use serde::{Deserialize, Serialize};

use crate::error::CellError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Boolean(bool),
    Text(String),
    Error(CellError),
    /// An opaque nested sequence, written directly by a host rather than
    /// through a formula, or produced by range evaluation. Functions such
    /// as `VLOOKUP`/`INDEX` interpret nested arrays as row-oriented tables;
    /// the evaluator itself never inspects the contents of an `Array`
    /// beyond handing it on.
    Array(Vec<CellValue>),
    /// A formula string, always beginning with `=`. Only ever present as
    /// raw stored content; `evaluate_cell` never returns this variant.
    Formula(String),
    /// An address with no stored content.
    Empty,
}

impl CellValue {
    /// Formats the value the way a spreadsheet cell displays it: numbers
    /// without a trailing `.0` when they are whole, booleans as
    /// `TRUE`/`FALSE`, errors as their code, arrays joined with commas.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Error(e) => e.code().to_string(),
            CellValue::Array(items) => items
                .iter()
                .map(|v| v.display_value())
                .collect::<Vec<_>>()
                .join(","),
            CellValue::Formula(text) => text.clone(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}
