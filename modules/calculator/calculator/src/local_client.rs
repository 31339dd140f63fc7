//! In-process `CalculatorClient` implementation.

use std::sync::Arc;

use async_trait::async_trait;
use calculator_sdk::{CalculationRequest, CalculatorClient, CalculatorError, Operation};

use crate::server::CalculatorServer;

/// Client that evaluates directly against a shared [`CalculatorServer`],
/// without a network hop or the worker queue.
#[derive(Clone)]
pub struct LocalCalculatorClient {
    server: Arc<CalculatorServer>,
}

impl LocalCalculatorClient {
    #[must_use]
    pub fn new(server: Arc<CalculatorServer>) -> Self {
        Self { server }
    }
}

#[async_trait]
impl CalculatorClient for LocalCalculatorClient {
    async fn calculate(
        &self,
        a: f64,
        b: f64,
        operation: Operation,
    ) -> Result<f64, CalculatorError> {
        self.server
            .calculate(&CalculationRequest::new(a, b, operation))
            .into_result()
            .map_err(CalculatorError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provided_methods_delegate_to_calculate() {
        let client = LocalCalculatorClient::new(Arc::new(CalculatorServer::default()));

        let sum = client.add(10.5, 20.7).await.unwrap();
        assert!((sum - 31.2).abs() < 1e-9);

        let product = client.multiply(-2.0, 3.0).await.unwrap();
        assert!((product + 6.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rejected_calculation_carries_message() {
        let client = LocalCalculatorClient::new(Arc::new(CalculatorServer::default()));

        let err = client.divide(10.0, 0.0).await.unwrap_err();
        assert_eq!(
            err,
            CalculatorError::Rejected("Division by zero is not allowed".to_owned())
        );
    }
}
