//! Arithmetic engine.
//!
//! Results that would leave the finite `f64` range are rejected before the
//! operation is performed instead of silently becoming infinite.

use super::error::ArithmeticError;

/// Stateless four-function calculator over `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    /// `AdditionOverflow` if `a + b` would exceed the finite range.
    pub fn add(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        if (b > 0.0 && a > f64::MAX - b) || (b < 0.0 && a < f64::MIN - b) {
            return Err(ArithmeticError::AdditionOverflow);
        }
        Ok(a + b)
    }

    /// # Errors
    /// `SubtractionOverflow` if `a - b` would exceed the finite range.
    pub fn subtract(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        if (b < 0.0 && a > f64::MAX + b) || (b > 0.0 && a < f64::MIN + b) {
            return Err(ArithmeticError::SubtractionOverflow);
        }
        Ok(a - b)
    }

    /// # Errors
    /// `MultiplicationOverflow` if `a * b` would exceed the finite range.
    pub fn multiply(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        if b != 0.0 && a.abs() > f64::MAX / b.abs() {
            return Err(ArithmeticError::MultiplicationOverflow);
        }
        Ok(a * b)
    }

    /// Divisors smaller in magnitude than `f64::EPSILON` count as zero.
    ///
    /// # Errors
    /// `DivisionByZero` for such divisors.
    pub fn divide(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        if b.abs() < f64::EPSILON {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(a / b)
    }
}
