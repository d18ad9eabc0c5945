//! Calculator tool.
//!
//! Extracts a bare arithmetic expression from loosely formatted input,
//! validates it against an allow-listed character set, and evaluates it with
//! a hand-written recursive-descent parser. No ambient names, no general
//! evaluator: the grammar is `+ - * / %`, parentheses, and decimal literals.

use std::fmt;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolId};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn id(&self) -> ToolId {
        ToolId::Calculator
    }

    fn description(&self) -> &str {
        "Evaluate a simple math expression. Accepts raw text like '23*17 + 3.5' or lines such as 'expression = \"23*17 + 3.5\"'."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "input": {"type": "string", "description": "Arithmetic expression, optionally wrapped as name = \"expr\""}
            },
            "required": ["input"]
        }))
    }

    async fn call(&self, input: &str) -> String {
        evaluate(input)
    }
}

/// Full pipeline: extract, validate, parse, render. Always returns text.
pub fn evaluate(input: &str) -> String {
    let expr = extract_expression(input);
    if !charset_re().is_match(&expr) {
        return "Calculator error: invalid characters.".to_string();
    }
    match Parser::new(&expr).parse() {
        Ok(value) => value.to_string(),
        Err(err) => format!("Calculator error: {err}"),
    }
}

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][\w\-]*\s*(?:=|:)\s*(.*)$").expect("valid assignment pattern")
    })
}

fn charset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9+\-*/(). %\s]+$").expect("valid charset pattern"))
}

/// Peel `name = "expr"` / `name: expr` wrappers down to the bare expression.
fn extract_expression(input: &str) -> String {
    let mut expr = input.trim().to_string();
    if let Some(caps) = assignment_re().captures(&expr) {
        expr = caps[1].trim().to_string();
    }
    // Strip one matching pair of surrounding quotes or backticks.
    let first = expr.chars().next();
    let last = expr.chars().last();
    if expr.len() >= 2 && first == last && matches!(first, Some('\'' | '"' | '`')) {
        expr = expr[1..expr.len() - 1].trim().to_string();
    }
    expr
}

#[derive(Debug, PartialEq)]
enum EvalError {
    UnexpectedEnd,
    UnexpectedChar(char),
    InvalidNumber(String),
    DivisionByZero,
    TrailingInput(char),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnexpectedEnd => write!(f, "unexpected end of expression"),
            EvalError::UnexpectedChar(c) => write!(f, "unexpected character `{c}`"),
            EvalError::InvalidNumber(s) => write!(f, "invalid number `{s}`"),
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::TrailingInput(c) => write!(f, "unexpected trailing input at `{c}`"),
        }
    }
}

/// Recursive-descent evaluator over f64. The input has already passed the
/// charset check, so every byte is ASCII.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(expr: &'a str) -> Self {
        Self {
            bytes: expr.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<f64, EvalError> {
        let value = self.expr()?;
        self.skip_ws();
        match self.peek() {
            Some(c) => Err(EvalError::TrailingInput(c)),
            None => Ok(value),
        }
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('+') => {
                    self.bump();
                    value += self.term()?;
                }
                Some('-') => {
                    self.bump();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.bump();
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.bump();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Some('%') => {
                    self.bump();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    // Floored modulo: sign follows the divisor.
                    value -= rhs * (value / rhs).floor();
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some('-') => {
                self.bump();
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.bump();
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.bump();
                let value = self.expr()?;
                self.skip_ws();
                match self.peek() {
                    Some(')') => {
                        self.bump();
                        Ok(value)
                    }
                    Some(c) => Err(EvalError::UnexpectedChar(c)),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(EvalError::UnexpectedChar(c)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        let literal = std::str::from_utf8(&self.bytes[start..self.pos])
            .expect("charset check guarantees ASCII");
        literal
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber(literal.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_bare_expressions() {
        assert_eq!(evaluate("23*17 + 3.5"), "394.5");
        assert_eq!(evaluate("2+2"), "4");
        assert_eq!(evaluate("(1 + 2) * 4"), "12");
        assert_eq!(evaluate("10 / 4"), "2.5");
    }

    #[test]
    fn unwraps_assignment_shapes() {
        assert_eq!(evaluate("expression = \"2+2\""), "4");
        assert_eq!(evaluate("calc: 3 * 3"), "9");
        assert_eq!(evaluate("`6 / 2`"), "3");
    }

    #[test]
    fn floored_modulo_matches_the_reference_semantics() {
        assert_eq!(evaluate("7 % 3"), "1");
        assert_eq!(evaluate("-7 % 3"), "2");
    }

    #[test]
    fn unary_signs() {
        assert_eq!(evaluate("-4 + 10"), "6");
        assert_eq!(evaluate("-(2 + 3)"), "-5");
        assert_eq!(evaluate("+5"), "5");
    }

    #[test]
    fn rejects_disallowed_characters_without_evaluating() {
        assert_eq!(evaluate("import os"), "Calculator error: invalid characters.");
        assert_eq!(evaluate("2 ** 3; rm -rf"), "Calculator error: invalid characters.");
        assert_eq!(evaluate(""), "Calculator error: invalid characters.");
    }

    #[test]
    fn reports_malformed_expressions_as_text() {
        assert!(evaluate("2+").starts_with("Calculator error:"));
        assert!(evaluate("(1 + 2").starts_with("Calculator error:"));
        assert!(evaluate("1.2.3").starts_with("Calculator error:"));
        assert_eq!(evaluate("1 / 0"), "Calculator error: division by zero");
    }
}
