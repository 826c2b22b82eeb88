//! FILENAME: parser/src/parser.rs
//! PURPOSE: Tokenless recursive-descent parser for the formula grammar.
//! CONTEXT: Unlike a lex-then-parse pipeline, this parser scans the input
//! characters directly; there is no intermediate token stream. It is handed
//! a formula string with its leading `=` already stripped by the caller
//! (the evaluator does the stripping, per its own contract).
//!
//! Grammar (design level):
//!   expr      := add_sub
//!   add_sub   := mul_div ( ('+'|'-') mul_div )*
//!   mul_div   := term    ( ('*'|'/') term    )*
//!   term      := '(' expr ')' | string | number | sheet_qualified
//!              | identifier_then_cell_or_call
//!
//! Multiplication and division bind tighter than addition and subtraction;
//! both groups are left-associative. A unary sign is only ever part of a
//! number literal; there is no standalone unary operator node.

use thiserror::Error;

use crate::ast::{BinaryOperator, Expression, Value};

/// A parse failure, with the character offset at which it was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

type ParseResult<T> = Result<T, ParseError>;

/// Parses a formula body (without a leading `=`) into an expression tree.
pub fn parse(input: &str) -> ParseResult<Expression> {
    let mut parser = Parser::new(input);
    parser.skip_ws();
    let expr = parser.expr()?;
    parser.skip_ws();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn error_at(&self, offset: usize, message: &str) -> ParseError {
        ParseError {
            offset,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> ParseResult<()> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c)))
        }
    }

    // expr := add_sub
    fn expr(&mut self) -> ParseResult<Expression> {
        self.add_sub()
    }

    fn add_sub(&mut self) -> ParseResult<Expression> {
        let mut left = self.mul_div()?;
        loop {
            self.skip_ws();
            let op = match self.peek() {
                Some('+') => BinaryOperator::Add,
                Some('-') => BinaryOperator::Subtract,
                _ => break,
            };
            self.bump();
            self.skip_ws();
            let right = self.mul_div()?;
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn mul_div(&mut self) -> ParseResult<Expression> {
        let mut left = self.term()?;
        loop {
            self.skip_ws();
            let op = match self.peek() {
                Some('*') => BinaryOperator::Multiply,
                Some('/') => BinaryOperator::Divide,
                _ => break,
            };
            self.bump();
            self.skip_ws();
            let right = self.term()?;
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> ParseResult<Expression> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('(') => {
                self.bump();
                let inner = self.expr()?;
                self.skip_ws();
                self.expect(')')?;
                Ok(inner)
            }
            Some('"') => {
                let s = self.string_literal()?;
                Ok(Expression::Literal(Value::Text(s)))
            }
            Some(c) if c.is_ascii_digit() || c == '.' || c == '+' || c == '-' => {
                let n = self.number_literal()?;
                Ok(Expression::Literal(Value::Number(n)))
            }
            Some('$') => self.cell_ref_or_range(None),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.identifier_then_cell_or_call(),
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
        }
    }

    fn string_literal(&mut self) -> ParseResult<String> {
        let start = self.pos;
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error_at(start, "unterminated string literal")),
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    match self.bump() {
                        Some('"') => s.push('"'),
                        Some('\\') => s.push('\\'),
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some(other) => s.push(other),
                        None => return Err(self.error_at(start, "unterminated string literal")),
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.bump();
                }
            }
        }
        Ok(s)
    }

    // number_literal := [+-]? [0-9]+ ( '.' [0-9]+ )?
    fn number_literal(&mut self) -> ParseResult<f64> {
        let start = self.pos;
        let mut text = String::new();
        if let Some(c) = self.peek() {
            if c == '+' || c == '-' {
                text.push(c);
                self.bump();
            }
        }
        let mut digits = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
                digits += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(self.error_at(start, "empty input after sign"));
        }
        if self.peek() == Some('.') {
            text.push('.');
            self.bump();
            let mut frac_digits = 0;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                    frac_digits += 1;
                } else {
                    break;
                }
            }
            if frac_digits == 0 {
                return Err(self.error_at(start, "expected digit after decimal point"));
            }
        }
        text.parse::<f64>()
            .map_err(|_| self.error_at(start, "invalid number literal"))
    }

    /// Reads a bare identifier: letters, digits, underscore. Used for sheet
    /// names, function names, and the `TRUE`/`FALSE` keywords.
    fn read_word(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_letters(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_digits(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    /// Parses a single cell reference component: optional `$`, letters,
    /// optional `$`, digits. Used for range endpoints and for the cell
    /// reference immediately following a sheet qualifier.
    fn cell_ref_component(&mut self) -> ParseResult<(String, u32)> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() == Some('$') {
            self.bump();
        }
        let col = self.read_letters();
        if col.is_empty() {
            return Err(self.error_at(start, "malformed cell reference"));
        }
        if self.peek() == Some('$') {
            self.bump();
        }
        let digits = self.read_digits();
        if digits.is_empty() {
            return Err(self.error_at(start, "malformed cell reference"));
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| self.error_at(start, "malformed cell reference"))?;
        if row == 0 {
            return Err(self.error_at(start, "malformed cell reference"));
        }
        Ok((col.to_uppercase(), row))
    }

    /// Entry point for a term beginning with `$`: always a cell reference,
    /// optionally followed by `:` to form a range. `sheet` is the sheet
    /// qualifier already consumed by the caller, if any.
    fn cell_ref_or_range(&mut self, sheet: Option<String>) -> ParseResult<Expression> {
        let (col, row) = self.cell_ref_component()?;
        self.finish_cell_ref_or_range(sheet, col, row)
    }

    fn finish_cell_ref_or_range(
        &mut self,
        sheet: Option<String>,
        col: String,
        row: u32,
    ) -> ParseResult<Expression> {
        self.skip_ws();
        if self.peek() == Some(':') {
            self.bump();
            let (end_col, end_row) = self.cell_ref_component()?;
            Ok(Expression::Range {
                sheet,
                start: Box::new(Expression::CellRef {
                    sheet: None,
                    col,
                    row,
                }),
                end: Box::new(Expression::CellRef {
                    sheet: None,
                    col: end_col,
                    row: end_row,
                }),
            })
        } else {
            Ok(Expression::CellRef { sheet, col, row })
        }
    }

    /// Handles `sheet_qualified | identifier_then_cell_or_call`, the two
    /// productions that both begin with a bare word.
    fn identifier_then_cell_or_call(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        let word = self.read_word();
        self.skip_ws();

        match self.peek() {
            Some('!') => {
                self.bump();
                self.skip_ws();
                let (col, row) = self.cell_ref_component()?;
                self.finish_cell_ref_or_range(Some(word), col, row)
            }
            Some('(') => {
                self.bump();
                let args = self.arg_list()?;
                self.skip_ws();
                self.expect(')')?;
                Ok(Expression::FunctionCall {
                    name: word.to_uppercase(),
                    args,
                })
            }
            _ if word.eq_ignore_ascii_case("TRUE") => Ok(Expression::Literal(Value::Boolean(true))),
            _ if word.eq_ignore_ascii_case("FALSE") => {
                Ok(Expression::Literal(Value::Boolean(false)))
            }
            Some('$') if word.chars().all(|c| c.is_ascii_alphabetic()) && !word.is_empty() => {
                self.bump();
                let digits = self.read_digits();
                if digits.is_empty() {
                    return Err(self.error_at(start, "malformed cell reference"));
                }
                let row: u32 = digits
                    .parse()
                    .map_err(|_| self.error_at(start, "malformed cell reference"))?;
                if row == 0 {
                    return Err(self.error_at(start, "malformed cell reference"));
                }
                self.finish_cell_ref_or_range(None, word.to_uppercase(), row)
            }
            _ => {
                let (col, row) = split_cell_ref(&word)
                    .ok_or_else(|| self.error_at(start, "malformed cell reference"))?;
                self.finish_cell_ref_or_range(None, col, row)
            }
        }
    }

    fn arg_list(&mut self) -> ParseResult<Vec<Expression>> {
        self.skip_ws();
        if self.peek() == Some(')') {
            return Ok(Vec::new());
        }
        let mut args = vec![self.expr()?];
        loop {
            self.skip_ws();
            if self.peek() == Some(',') {
                self.bump();
                args.push(self.expr()?);
            } else {
                break;
            }
        }
        Ok(args)
    }
}

/// Splits a bare word like `"A1"` or `"AA100"` into its column-letters and
/// row-number parts. Returns `None` if the word isn't a letters-then-digits
/// shape (e.g. interleaved, all letters, or all digits).
fn split_cell_ref(word: &str) -> Option<(String, u32)> {
    let split_at = word.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = word.split_at(split_at);
    if letters.is_empty() || digits.is_empty() {
        return None;
    }
    if !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((letters.to_uppercase(), row))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
