//! Arithmetic evaluator
//!
//! Extracts the longest arithmetic expression from free text and evaluates
//! `+ - * / ( )` over f64 with a small recursive-descent parser.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Result;
use crate::tools::Tool;

static EXPR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9+\-*/().\s]+").expect("valid expression regex"));

pub struct CalculatorTool;

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }

    /// Pick the longest digit-bearing candidate substring.
    fn extract_expression(input: &str) -> Option<String> {
        EXPR_RE
            .find_iter(input)
            .map(|m| m.as_str().trim())
            .filter(|s| s.chars().any(|c| c.is_ascii_digit()))
            .max_by_key(|s| s.len())
            .map(str::to_string)
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    async fn run(&self, input: &str) -> Result<String> {
        let Some(expr) = Self::extract_expression(input) else {
            return Ok("No calculation found.".to_string());
        };
        match evaluate(&expr) {
            Ok(value) => {
                // Render integers without a trailing ".0"
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    Ok(format!("{}", value as i64))
                } else {
                    Ok(format!("{value}"))
                }
            }
            Err(e) => Ok(format!("Error in calculation: {e}")),
        }
    }
}

/// Evaluate an arithmetic expression over f64.
pub fn evaluate(expr: &str) -> std::result::Result<f64, String> {
    let tokens: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("unexpected token at position {}", parser.pos));
    }
    Ok(value)
}

struct Parser {
    tokens: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    // expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                '+' => {
                    self.bump();
                    value += self.parse_term()?;
                }
                '-' => {
                    self.bump();
                    value -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.parse_factor()?;
        while let Some(op) = self.peek() {
            match op {
                '*' => {
                    self.bump();
                    value *= self.parse_factor()?;
                }
                '/' => {
                    self.bump();
                    let divisor = self.parse_factor()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // factor := '-' factor | '(' expr ')' | number
    fn parse_factor(&mut self) -> std::result::Result<f64, String> {
        match self.peek() {
            Some('-') => {
                self.bump();
                Ok(-self.parse_factor()?)
            }
            Some('(') => {
                self.bump();
                let value = self.parse_expr()?;
                if self.bump() != Some(')') {
                    return Err("missing closing parenthesis".to_string());
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) => Err(format!("unexpected character '{c}'")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn parse_number(&mut self) -> std::result::Result<f64, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        let literal: String = self.tokens[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{literal}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").expect("eval"), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").expect("eval"), 20.0);
        assert_eq!(evaluate("20 / 5 - 1").expect("eval"), 3.0);
        assert_eq!(evaluate("-3 + 5").expect("eval"), 2.0);
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        assert!(evaluate("1 / 0").is_err());
    }

    #[test]
    fn test_evaluate_malformed() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[tokio::test]
    async fn test_run_extracts_expression_from_text() {
        let tool = CalculatorTool::new();
        let out = tool
            .run("puedes calcular 20 + 5 créditos en total")
            .await
            .expect("run");
        assert_eq!(out, "25");
    }

    #[tokio::test]
    async fn test_run_without_numbers() {
        let tool = CalculatorTool::new();
        let out = tool.run("no hay nada que calcular").await.expect("run");
        assert_eq!(out, "No calculation found.");
    }

    #[tokio::test]
    async fn test_run_fractional_result() {
        let tool = CalculatorTool::new();
        let out = tool.run("calcular 7 / 2").await.expect("run");
        assert_eq!(out, "3.5");
    }
}
