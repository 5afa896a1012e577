//! Calculator back-end.
//!
//! Expressions are evaluated by a small recursive-descent evaluator, never by
//! dynamic code execution. Grammar (lowest to highest precedence):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/' | '//') unary)*
//! unary  := ('+' | '-') unary | power
//! power  := atom ('**' unary)?
//! atom   := number | '(' expr ')'
//! ```
//!
//! Nesting deeper than 200 levels is rejected as a calculation error.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Invalid characters in expression")]
    InvalidCharacters,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Calculation error: {0}")]
    Calculation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorRequest {
    pub expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorResponse {
    pub expression: String,
    pub result: f64,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Deepest allowed nesting of parentheses, unary signs and powers.
const MAX_NESTING: usize = 200;

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let compact: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || !compact.iter().copied().all(is_allowed) {
        return Err(EvalError::InvalidCharacters);
    }

    let mut parser = Parser {
        chars: &compact,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(c) = parser.peek() {
        return Err(EvalError::Calculation(format!(
            "unexpected '{}' at position {}",
            c, parser.pos
        )));
    }
    if !value.is_finite() {
        return Err(EvalError::Calculation("result out of range".to_string()));
    }
    Ok(value)
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::Calculation(
                "expression nested too deeply".to_string(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), next) if next != Some('*') => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                (Some('/'), Some('/')) => {
                    self.pos += 2;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value = (value / rhs).floor();
                }
                (Some('/'), _) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= rhs;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.nested(Self::unary)?)
            }
            Some('+') => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.atom()?;
        if self.peek() == Some('*') && self.peek_at(1) == Some('*') {
            self.pos += 2;
            let exponent = self.nested(Self::unary)?;
            if base == 0.0 && exponent < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.nested(Self::expr)?;
                if self.peek() != Some(')') {
                    return Err(EvalError::Calculation(format!(
                        "expected ')' at position {}",
                        self.pos
                    )));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(EvalError::Calculation(format!(
                "unexpected '{}' at position {}",
                c, self.pos
            ))),
            None => Err(EvalError::Calculation(
                "unexpected end of expression".to_string(),
            )),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| EvalError::Calculation(format!("invalid number '{}'", literal)))
    }
}

pub fn calculate(request: &CalculatorRequest) -> CalculatorResponse {
    match evaluate(&request.expression) {
        Ok(result) => CalculatorResponse {
            expression: request.expression.clone(),
            result,
            success: true,
            error: None,
        },
        Err(e) => CalculatorResponse {
            expression: request.expression.clone(),
            result: 0.0,
            success: false,
            error: Some(e.to_string()),
        },
    }
}

async fn calculate_handler(Json(request): Json<CalculatorRequest>) -> Json<CalculatorResponse> {
    tracing::debug!(expression = %request.expression, "Evaluating expression");
    Json(calculate(&request))
}

pub fn router() -> Router {
    Router::new()
        .route("/tools/calculate", post(calculate_handler))
        .merge(super::common_routes(
            "calculator-tools",
            &["/tools/calculate", "/health"],
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_respected() {
        assert_eq!(evaluate("3+4*2"), Ok(11.0));
        assert_eq!(evaluate("(3+4)*2"), Ok(14.0));
        assert_eq!(evaluate("100*5+200"), Ok(700.0));
        assert_eq!(evaluate("10-4-3"), Ok(3.0));
    }

    #[test]
    fn whitespace_and_decimals_are_accepted() {
        assert_eq!(evaluate(" 1000 / 5 "), Ok(200.0));
        assert_eq!(evaluate("0.5 * .5"), Ok(0.25));
        assert_eq!(evaluate("920.0/5"), Ok(184.0));
    }

    #[test]
    fn unary_and_power_follow_python_rules() {
        assert_eq!(evaluate("-2**2"), Ok(-4.0));
        assert_eq!(evaluate("2**3**2"), Ok(512.0));
        assert_eq!(evaluate("2**-1"), Ok(0.5));
        assert_eq!(evaluate("-(3-5)"), Ok(2.0));
        assert_eq!(evaluate("7//2"), Ok(3.0));
        assert_eq!(evaluate("-7//2"), Ok(-4.0));
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(evaluate("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5//(2-2)"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("0**-1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn foreign_characters_are_rejected() {
        assert_eq!(evaluate("import os"), Err(EvalError::InvalidCharacters));
        assert_eq!(evaluate("2^3"), Err(EvalError::InvalidCharacters));
        assert_eq!(evaluate(""), Err(EvalError::InvalidCharacters));
    }

    #[test]
    fn malformed_expressions_are_calculation_errors() {
        for expr in ["1+", "(1+2", "1..2", "()", "3)"] {
            match evaluate(expr) {
                Err(EvalError::Calculation(_)) => {}
                other => panic!("{expr:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn deep_nesting_is_a_calculation_error() {
        let too_deep = Err(EvalError::Calculation(
            "expression nested too deeply".to_string(),
        ));
        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&parens), too_deep);
        assert_eq!(evaluate(&format!("{}1", "-".repeat(100_000))), too_deep);
        assert_eq!(evaluate(&format!("2{}", "**2".repeat(10_000))), too_deep);

        let failed = calculate(&CalculatorRequest { expression: parens });
        assert!(!failed.success);
        assert_eq!(
            failed.error.as_deref(),
            Some("Calculation error: expression nested too deeply")
        );
    }

    #[test]
    fn moderate_nesting_still_evaluates() {
        let parens = format!("{}7{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(evaluate(&parens), Ok(7.0));
        assert_eq!(evaluate(&format!("{}3", "-".repeat(50))), Ok(3.0));
    }

    #[test]
    fn calculate_wraps_results() {
        let ok = calculate(&CalculatorRequest {
            expression: "3+4*2".to_string(),
        });
        assert!(ok.success);
        assert_eq!(ok.result, 11.0);
        assert_eq!(ok.error, None);

        let failed = calculate(&CalculatorRequest {
            expression: "1/0".to_string(),
        });
        assert!(!failed.success);
        assert_eq!(failed.result, 0.0);
        assert_eq!(failed.error.as_deref(), Some("Division by zero"));

        let invalid = calculate(&CalculatorRequest {
            expression: "import os".to_string(),
        });
        assert!(!invalid.success);
        assert_eq!(invalid.error.as_deref(), Some("Invalid characters in expression"));
    }
}
