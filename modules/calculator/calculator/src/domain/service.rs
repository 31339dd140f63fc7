//! Domain service for calculator
//!
//! Translates wire requests into engine calls and engine outcomes into wire
//! responses.

use calculator_sdk::{CalculationRequest, CalculationResponse, Operation};
use tracing::debug;

use super::engine::Calculator;
use super::error::ServiceError;

/// Stateless request evaluator shared by the server worker and local clients.
#[derive(Debug, Clone, Default)]
pub struct Service {
    calculator: Calculator,
}

impl Service {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a raw operation code against two operands.
    ///
    /// # Errors
    /// `UnknownOperation` for codes outside [`Operation`], otherwise any
    /// engine failure.
    pub fn evaluate(&self, a: f64, b: f64, operation: i32) -> Result<f64, ServiceError> {
        let op = Operation::try_from(operation)
            .map_err(|_| ServiceError::UnknownOperation { code: operation })?;

        debug!(a, b, operation = %op, "performing calculation");

        let result = match op {
            Operation::Add => self.calculator.add(a, b),
            Operation::Subtract => self.calculator.subtract(a, b),
            Operation::Multiply => self.calculator.multiply(a, b),
            Operation::Divide => self.calculator.divide(a, b),
        }?;

        Ok(result)
    }

    /// Evaluate a request. Failures are reported in the response's `error`.
    #[must_use]
    pub fn calculate(&self, request: &CalculationRequest) -> CalculationResponse {
        match self.evaluate(request.a, request.b, request.operation) {
            Ok(result) => CalculationResponse::success(result),
            Err(e) => {
                debug!(error = %e, code = request.operation, "calculation rejected");
                CalculationResponse::failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArithmeticError;

    #[test]
    fn addition_succeeds() {
        let service = Service::new();
        let response = service.calculate(&CalculationRequest::new(2.0, 3.0, Operation::Add));

        assert!(response.is_success());
        assert!((response.result - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn subtraction_succeeds() {
        let service = Service::new();
        let response = service.calculate(&CalculationRequest::new(5.0, 3.0, Operation::Subtract));

        assert!(response.error.is_empty());
        assert!((response.result - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn division_by_zero_is_reported_in_response() {
        let service = Service::new();
        let response = service.calculate(&CalculationRequest::new(5.0, 0.0, Operation::Divide));

        assert_eq!(response.error, "Division by zero is not allowed");
    }

    #[test]
    fn unknown_operation_is_reported_in_response() {
        let service = Service::new();
        let response = service.calculate(&CalculationRequest::with_raw_operation(5.0, 2.0, 999));

        assert_eq!(response.error, "Unknown operation");
    }

    #[test]
    fn evaluate_exposes_typed_errors() {
        let service = Service::new();

        assert_eq!(
            service.evaluate(1.0, 1.0, -1),
            Err(ServiceError::UnknownOperation { code: -1 })
        );
        assert_eq!(
            service.evaluate(f64::MAX, 2.0, Operation::Multiply.into()),
            Err(ServiceError::Arithmetic(
                ArithmeticError::MultiplicationOverflow
            ))
        );
    }
}
