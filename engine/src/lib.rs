//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the spreadsheet calculation engine.
//! CONTEXT: Re-exports the public types and assembles them behind a single
//! `Engine` handle, matching §6's external interface: a host constructs one
//! instance per document (§9, "No global state") and drives it through the
//! operations named here, never by reaching into `Workbook`/`FunctionRegistry`
//! directly.

pub mod cell;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod range;
pub mod registry;
pub mod workbook;

pub use cell::CellValue;
pub use error::{CellError, ErrorKind};
pub use evaluator::{EvalContext, Evaluator};
pub use range::{CellDescriptor, RangeError, RangeMode, RangeResult};
pub use registry::{Function, FunctionRegistry};
pub use workbook::Workbook;

use parser::address::AddressError;

/// A single spreadsheet document: a workbook of sheets plus the function
/// registry it evaluates formulas against. This is the handle a host
/// embeds; nothing in this crate is reachable through process-wide state.
pub struct Engine {
    workbook: Workbook,
    registry: FunctionRegistry,
}

impl Engine {
    /// A fresh, empty document: no sheets, and the built-in function
    /// library (§4.8) already registered.
    pub fn new() -> Self {
        Engine {
            workbook: Workbook::new(),
            registry: FunctionRegistry::with_builtins(),
        }
    }

    /// Idempotent: creates `name` if it does not already exist.
    pub fn add_sheet(&mut self, name: &str) -> String {
        self.workbook.add_sheet(name)
    }

    /// Writes `value` at `address` on `sheet`, auto-creating the sheet per
    /// the workbook's convenience path (§4.6; see DESIGN.md Open Question 1
    /// for why this is *not* harmonized with `get_range`/`set_range`).
    pub fn set_cell(
        &mut self,
        sheet: &str,
        address: &str,
        value: CellValue,
    ) -> Result<(), AddressError> {
        self.workbook.set_cell(sheet, address, value)
    }

    /// The raw stored content at `address`, or `None` if absent.
    pub fn get_cell(&self, sheet: &str, address: &str) -> Option<CellValue> {
        self.workbook.get_cell(sheet, address)
    }

    /// Removes a cell's content entirely (§3 Lifecycle: "written,
    /// overwritten, or cleared").
    pub fn clear_cell(&mut self, sheet: &str, address: &str) -> Result<(), AddressError> {
        self.workbook.clear_cell(sheet, address)
    }

    /// Evaluates the cell at `(sheet, address)`, per §4.5's entry point.
    pub fn evaluate_cell(&self, sheet: &str, address: &str) -> CellValue {
        Evaluator::new(&self.workbook, &self.registry).evaluate_cell(sheet, address)
    }

    /// Registers a user-defined function under `name`, replacing any prior
    /// registration under the same upper-case key (§4.4).
    pub fn register_function<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&[CellValue], &EvalContext) -> CellValue + 'static,
    {
        self.registry.register(name, f);
    }

    /// Case-insensitive membership test against the registry.
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    /// Original-case function names, for enumeration surfaces.
    pub fn function_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Reads a rectangular region (§4.7). Rejects a missing sheet; a
    /// malformed `range_text` is rejected by the address layer.
    pub fn get_range(
        &self,
        sheet: &str,
        range_text: &str,
        mode: RangeMode,
    ) -> Result<RangeResult, RangeError> {
        range::get_range(&self.workbook, &self.registry, sheet, range_text, mode)
    }

    /// Writes a rectangular region (§4.7). Rejects a missing sheet or a
    /// shape mismatch between `values_matrix` and the range's dimensions.
    pub fn set_range(
        &mut self,
        sheet: &str,
        range_text: &str,
        values_matrix: Vec<Vec<CellValue>>,
    ) -> Result<RangeResult, RangeError> {
        range::set_range(&mut self.workbook, &self.registry, sheet, range_text, values_matrix)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
