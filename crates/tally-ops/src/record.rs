//! Immutable record of a committed calculation.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::Operation;

/// A single calculation: operation, operands, rounded result, and the UTC
/// instant it was performed.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub operation: Operation,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl Calculation {
    /// Build a record stamped with the current time.
    pub fn new(operation: Operation, operand_a: f64, operand_b: f64, result: f64) -> Self {
        Self::with_timestamp(operation, operand_a, operand_b, result, Utc::now())
    }

    /// Build a record with an explicit timestamp (used when reloading
    /// persisted history).
    pub fn with_timestamp(
        operation: Operation,
        operand_a: f64,
        operand_b: f64,
        result: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operation,
            operand_a,
            operand_b,
            result,
            timestamp,
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.operand_a,
            self.operation.symbol(),
            self.operand_b,
            self.result
        )
    }
}
