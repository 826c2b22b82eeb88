//! FILENAME: engine/src/error.rs
//! PURPOSE: The closed in-cell error taxonomy.
//! CONTEXT: These are values, not exceptions: an evaluation that fails
//! returns a `CellError` wrapped in `CellValue::Error`, and flows onward
//! through the same channels as any other value. `CellError` therefore does
//! not implement `std::error::Error` — it is a piece of data, not something
//! raised and caught. Contrast with `parser::address::AddressError` and
//! `RangeError` (engine/src/range.rs), which are API-boundary failures and
//! do implement it via `thiserror`.

use serde::{Deserialize, Serialize};

/// The fixed set of spreadsheet error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown function name.
    Name,
    /// Malformed or cross-sheet range, out-of-bounds index.
    Ref,
    /// Non-numeric arithmetic, bad argument shape.
    Value,
    /// Division by zero.
    Div0,
    /// Lookup or match not found.
    Na,
    /// Numeric domain violation.
    Num,
    /// Circular reference during evaluation.
    Cycle,
}

impl ErrorKind {
    /// The spreadsheet-convention code string for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Name => "#NAME?",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Div0 => "#DIV/0!",
            ErrorKind::Na => "#N/A",
            ErrorKind::Num => "#NUM!",
            ErrorKind::Cycle => "#CYCLE!",
        }
    }
}

/// An in-cell error: a kind plus a diagnostic message. Stringifying a
/// `CellError` (via `Display`) yields only the code; the message is for
/// diagnostics, not for display to end users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CellError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CellError { kind, message: message.into() }
    }

    pub fn name(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Name, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Ref, message)
    }

    pub fn value(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Value, message)
    }

    pub fn div0(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Div0, message)
    }

    pub fn na(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Na, message)
    }

    pub fn num(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Num, message)
    }

    pub fn cycle(message: impl Into<String>) -> Self {
        CellError::new(ErrorKind::Cycle, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_fixed_table() {
        assert_eq!(ErrorKind::Name.code(), "#NAME?");
        assert_eq!(ErrorKind::Ref.code(), "#REF!");
        assert_eq!(ErrorKind::Value.code(), "#VALUE!");
        assert_eq!(ErrorKind::Div0.code(), "#DIV/0!");
        assert_eq!(ErrorKind::Na.code(), "#N/A");
        assert_eq!(ErrorKind::Num.code(), "#NUM!");
        assert_eq!(ErrorKind::Cycle.code(), "#CYCLE!");
    }

    #[test]
    fn display_yields_code_only() {
        let e = CellError::cycle("circular reference at S!A1");
        assert_eq!(e.to_string(), "#CYCLE!");
    }
}
