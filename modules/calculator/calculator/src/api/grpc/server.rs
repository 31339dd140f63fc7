//! gRPC Server implementation for calculator
//!
//! Requests are handed to the [`CalculatorServer`] worker queue. Calculation
//! failures travel inside `CalculationResponse.error`; only lifecycle problems
//! become gRPC statuses.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

use calculator_sdk::{
    CalculationRequest, CalculationResponse, CalculatorService, CalculatorServiceServer,
    SERVICE_NAME,
};

use crate::server::CalculatorServer;

/// gRPC service implementation that wraps the calculator server.
#[derive(Clone)]
pub struct CalculatorServiceImpl {
    server: Arc<CalculatorServer>,
}

impl CalculatorServiceImpl {
    #[must_use]
    pub fn new(server: Arc<CalculatorServer>) -> Self {
        Self { server }
    }
}

#[tonic::async_trait]
impl CalculatorService for CalculatorServiceImpl {
    async fn calculate(
        &self,
        request: Request<CalculationRequest>,
    ) -> Result<Response<CalculationResponse>, Status> {
        let req = request.into_inner();

        let response = self
            .server
            .submit(req)
            .await
            .map_err(|e| Status::unavailable(e.to_string()))?;

        Ok(Response::new(response))
    }
}

/// Bind the gRPC listener.
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn bind(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind gRPC listener on {addr}"))
}

/// Serve `CalculatorService` on `listener` until `cancel` fires.
///
/// The calculator server must be started for requests to succeed; while it
/// is stopped every call fails with `UNAVAILABLE`.
///
/// # Errors
/// Returns an error if the transport fails.
pub async fn serve(
    listener: TcpListener,
    server: Arc<CalculatorServer>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, service = SERVICE_NAME, "gRPC server listening");

    tonic::transport::Server::builder()
        .add_service(CalculatorServiceServer::new(CalculatorServiceImpl::new(server)))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), cancel.cancelled())
        .await
        .context("gRPC server failed")?;

    tracing::info!(%local_addr, "gRPC server shut down");
    Ok(())
}
