//! Arithmetic operations for the Tally calculator.
//!
//! Every operation is a pure function over two `f64` operands. The registry
//! maps snake_case names (`add`, `int_divide`, ...) to [`Operation`] values;
//! lookup is case-insensitive so the REPL can accept `ADD 2 3` as well.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use thiserror::Error;

mod record;

pub use record::Calculation;

/// Errors produced while resolving or evaluating an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// The supported binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntDivide,
    Percent,
    AbsDiff,
}

/// Name-keyed lookup table backing [`Operation::parse`].
static REGISTRY: Lazy<HashMap<&'static str, Operation>> =
    Lazy::new(|| Operation::all().iter().map(|op| (op.name(), *op)).collect());

impl Operation {
    /// Every operation, in the order used by help text and documentation.
    pub fn all() -> &'static [Operation] {
        &[
            Operation::Add,
            Operation::Subtract,
            Operation::Multiply,
            Operation::Divide,
            Operation::Power,
            Operation::Root,
            Operation::Modulus,
            Operation::IntDivide,
            Operation::Percent,
            Operation::AbsDiff,
        ]
    }

    /// The snake_case identifier used on the command line and in CSV rows.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
            Operation::Root => "root",
            Operation::Modulus => "modulus",
            Operation::IntDivide => "int_divide",
            Operation::Percent => "percent",
            Operation::AbsDiff => "abs_diff",
        }
    }

    /// Display symbol used when rendering a calculation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Power => "^",
            Operation::Root => "√",
            Operation::Modulus => "%",
            Operation::IntDivide => "//",
            Operation::Percent => "%of",
            Operation::AbsDiff => "|diff|",
        }
    }

    /// One-line description used by the REPL help text.
    pub fn description(&self) -> &'static str {
        match self {
            Operation::Add => "Add two numbers",
            Operation::Subtract => "Subtract b from a",
            Operation::Multiply => "Multiply two numbers",
            Operation::Divide => "Divide a by b",
            Operation::Power => "Raise a to the power of b",
            Operation::Root => "Calculate the bth root of a",
            Operation::Modulus => "Calculate a modulo b",
            Operation::IntDivide => "Integer division of a by b",
            Operation::Percent => "Calculate percentage (a/b * 100)",
            Operation::AbsDiff => "Absolute difference between a and b",
        }
    }

    /// Resolve an operation by name, case-insensitively.
    pub fn parse(name: &str) -> Result<Operation, CalcError> {
        REGISTRY
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| CalcError::UnknownOperation(name.to_string()))
    }

    /// Apply the operation to two operands, enforcing domain constraints.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, CalcError> {
        let value = match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                a / b
            }
            Operation::Power => {
                let value = a.powf(b);
                if !value.is_finite() {
                    return Err(CalcError::InvalidArgument(format!(
                        "{a}^{b} has no finite result"
                    )));
                }
                value
            }
            Operation::Root => {
                if b == 0.0 {
                    return Err(CalcError::InvalidArgument(
                        "cannot take the zeroth root".to_string(),
                    ));
                }
                if a < 0.0 && b % 2.0 == 0.0 {
                    return Err(CalcError::InvalidArgument(
                        "cannot take an even root of a negative number".to_string(),
                    ));
                }
                let value = a.powf(1.0 / b);
                if !value.is_finite() {
                    return Err(CalcError::InvalidArgument(format!(
                        "root {b} of {a} has no finite result"
                    )));
                }
                value
            }
            Operation::Modulus => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                a % b
            }
            Operation::IntDivide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                (a / b).floor()
            }
            Operation::Percent => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                (a / b) * 100.0
            }
            Operation::AbsDiff => (a - b).abs(),
        };
        Ok(value)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate `operation` over exactly two operands.
pub fn evaluate(operation: Operation, a: f64, b: f64) -> Result<f64, CalcError> {
    operation.apply(a, b)
}

/// Evaluate `operation` over an operand list, validating arity first.
pub fn evaluate_slice(operation: Operation, operands: &[f64]) -> Result<f64, CalcError> {
    match operands {
        [a, b] => operation.apply(*a, *b),
        _ => Err(CalcError::InvalidArgument(format!(
            "{} takes exactly 2 operands, got {}",
            operation.name(),
            operands.len()
        ))),
    }
}
