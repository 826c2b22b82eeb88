//! FILENAME: engine/src/workbook.rs
//! PURPOSE: The sheet-name -> canonical-address -> cell-content store.
//! CONTEXT: Sparse `HashMap`-backed storage, one map per sheet. Unlike the
//! range API (engine/src/range.rs), the convenience write path here
//! auto-creates a missing sheet; this asymmetry is intentional (see
//! DESIGN.md, Open Question 1) and is not harmonized away.

use std::collections::HashMap;

use parser::address::{self, AddressError};

use crate::cell::CellValue;

#[derive(Debug, Default)]
pub struct Workbook {
    sheets: HashMap<String, HashMap<String, CellValue>>,
}

impl Workbook {
    pub fn new() -> Self {
        Workbook { sheets: HashMap::new() }
    }

    /// Idempotent: creates the sheet if absent, otherwise a no-op. Returns
    /// the sheet name.
    pub fn add_sheet(&mut self, name: &str) -> String {
        self.sheets.entry(name.to_string()).or_default();
        name.to_string()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Writes `value` at `address` on `sheet`, creating the sheet if it
    /// does not yet exist (the convenience path named in §4.6). The
    /// address is canonicalized before storage; a `Text` value whose
    /// content begins with `=` is stored as a formula, per the data
    /// model's single cell-content union (§3).
    pub fn set_cell(
        &mut self,
        sheet: &str,
        address: &str,
        value: CellValue,
    ) -> Result<(), AddressError> {
        let (sheet_name, canonical) = address::normalize(address, sheet)?;
        let value = match value {
            CellValue::Text(s) if s.starts_with('=') => CellValue::Formula(s),
            other => other,
        };
        self.sheets
            .entry(sheet_name)
            .or_default()
            .insert(canonical, value);
        Ok(())
    }

    /// Returns the raw stored value, or `None` if the sheet or address has
    /// no content. Does not auto-create the sheet.
    pub fn get_cell(&self, sheet: &str, address: &str) -> Option<CellValue> {
        let (sheet_name, canonical) = address::normalize(address, sheet).ok()?;
        self.sheets.get(&sheet_name)?.get(&canonical).cloned()
    }

    /// Removes a cell's content entirely; a subsequent `get_cell` returns
    /// `None`. Does not remove the sheet itself, and does not error when
    /// the sheet or address was already empty.
    pub fn clear_cell(&mut self, sheet: &str, address: &str) -> Result<(), AddressError> {
        let (sheet_name, canonical) = address::normalize(address, sheet)?;
        if let Some(cells) = self.sheets.get_mut(&sheet_name) {
            cells.remove(&canonical);
        }
        Ok(())
    }
}
