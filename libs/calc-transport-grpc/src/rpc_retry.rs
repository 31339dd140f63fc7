//! Retry helper for unary gRPC calls.
//!
//! Only transient transport failures are retried:
//! [`Code::Unavailable`] and [`Code::DeadlineExceeded`]. Every other status is
//! returned to the caller on the first occurrence.
//!
//! The wrapped call must be idempotent. Calculator requests are pure
//! functions of their operands, so replaying them is harmless.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tonic::{Code, Status};
use tracing::Instrument;

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Retry policy for unary calls.
#[derive(Debug, Clone)]
#[must_use]
pub struct RpcRetryConfig {
    /// Retry attempts, not counting the initial call.
    pub max_retries: u32,

    /// First backoff; doubled on each subsequent retry.
    pub base_backoff: Duration,

    /// Upper bound for a single backoff.
    pub max_backoff: Duration,
}

impl Default for RpcRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl From<&crate::client::GrpcClientConfig> for RpcRetryConfig {
    fn from(cfg: &crate::client::GrpcClientConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            base_backoff: cfg.base_backoff,
            max_backoff: cfg.max_backoff,
        }
    }
}

impl RpcRetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_base_backoff(mut self, duration: Duration) -> Self {
        self.base_backoff = duration;
        self
    }

    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Backoff after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(1_u32 << exponent)
            .min(self.max_backoff)
    }
}

/// Whether a status code is worth retrying.
#[must_use]
pub fn is_retryable(code: Code) -> bool {
    matches!(code, Code::Unavailable | Code::DeadlineExceeded)
}

/// Run a unary call, retrying transient failures with exponential backoff.
///
/// `op_name` labels the tracing span and log events, e.g.
/// `"calculator.v1.CalculatorService/Calculate"`.
///
/// # Errors
/// Returns the last `Status` once retries are exhausted, or the first
/// non-retryable `Status`.
pub async fn call_with_retry<TClient, F, Fut, Req, Res>(
    client: &mut TClient,
    cfg: Arc<RpcRetryConfig>,
    req: Req,
    call: F,
    op_name: &'static str,
) -> Result<Res, Status>
where
    F: Fn(&mut TClient, Req) -> Fut,
    Fut: std::future::Future<Output = Result<Res, Status>>,
    Req: Clone,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let span = tracing::debug_span!("grpc_call", op = op_name, attempt);

        let result = async {
            let res = call(client, req.clone()).await;
            if let Err(ref status) = res {
                tracing::warn!(
                    code = ?status.code(),
                    message = %status.message(),
                    attempt,
                    op = op_name,
                    "gRPC call failed",
                );
            }
            res
        }
        .instrument(span)
        .await;

        match result {
            Ok(res) => {
                if attempt > 1 {
                    tracing::info!(op = op_name, attempt, "gRPC call succeeded after retries");
                }
                return Ok(res);
            }
            Err(status) => {
                let code = status.code();
                if !is_retryable(code) || attempt > cfg.max_retries {
                    tracing::error!(op = op_name, attempt, code = ?code, "gRPC call giving up");
                    return Err(status);
                }

                let backoff = cfg.backoff_for(attempt);
                tracing::debug!(
                    op = op_name,
                    attempt,
                    backoff_ms = duration_to_u64_ms(backoff),
                    "retrying gRPC call after backoff"
                );
                sleep(backoff).await;
            }
        }
    }
}
