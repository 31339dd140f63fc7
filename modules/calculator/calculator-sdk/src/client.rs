//! gRPC implementation of [`CalculatorClient`].

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use calc_transport_grpc::{GrpcClientConfig, RpcRetryConfig, call_with_retry, connect_with_retry};
use tonic::transport::Channel;

use crate::SERVICE_NAME;
use crate::api::{CalculatorClient, CalculatorError};
use crate::proto::calculator_service_client::CalculatorServiceClient;
use crate::proto::{CalculationRequest, CalculationResponse, Operation};

const CALCULATE_OP: &str = concat!(service_name!(), "/Calculate");

/// Calculator client talking to a remote `CalculatorService`.
///
/// Cheap to share: the underlying channel is cloned per call.
#[derive(Clone)]
pub struct CalculatorGrpcClient {
    inner: CalculatorServiceClient<Channel>,
    retry: Arc<RpcRetryConfig>,
}

impl CalculatorGrpcClient {
    /// Connect with default transport settings.
    ///
    /// # Errors
    /// Returns an error if the endpoint cannot be reached after retries.
    pub async fn connect(uri: impl Into<String>) -> Result<Self> {
        Self::connect_with_config(uri, &GrpcClientConfig::new(SERVICE_NAME)).await
    }

    /// Connect with explicit transport settings.
    ///
    /// # Errors
    /// Returns an error if the endpoint cannot be reached after retries.
    pub async fn connect_with_config(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> Result<Self> {
        let channel: Channel = connect_with_retry(uri, cfg).await?;
        Ok(Self::from_channel(channel, RpcRetryConfig::from(cfg)))
    }

    /// Wrap an already connected channel.
    #[must_use]
    pub fn from_channel(channel: Channel, retry: RpcRetryConfig) -> Self {
        Self {
            inner: CalculatorServiceClient::new(channel),
            retry: Arc::new(retry),
        }
    }

    /// Send a raw request and return the raw response.
    ///
    /// Useful for requests whose operation code is not a known [`Operation`].
    ///
    /// # Errors
    /// Returns a transport-level error; calculation errors are carried inside
    /// the response.
    pub async fn send(
        &self,
        request: CalculationRequest,
    ) -> Result<CalculationResponse, CalculatorError> {
        let mut client = self.inner.clone();

        let response = call_with_retry(
            &mut client,
            Arc::clone(&self.retry),
            request,
            |c, req| {
                let mut c = c.clone();
                async move { c.calculate(req).await.map(tonic::Response::into_inner) }
            },
            CALCULATE_OP,
        )
        .await?;

        Ok(response)
    }
}

#[async_trait]
impl CalculatorClient for CalculatorGrpcClient {
    async fn calculate(
        &self,
        a: f64,
        b: f64,
        operation: Operation,
    ) -> Result<f64, CalculatorError> {
        tracing::debug!(a, b, %operation, "sending calculation");
        let response = self.send(CalculationRequest::new(a, b, operation)).await?;
        response.into_result().map_err(CalculatorError::Rejected)
    }
}
