//! gRPC client transport for calculator clients.
//!
//! - [`client`]: endpoint configuration and connection establishment
//! - [`rpc_retry`]: retry helper for idempotent unary calls

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod rpc_retry;

pub use client::{GrpcClientConfig, connect_with_retry, connect_with_stack};
pub use rpc_retry::{RpcRetryConfig, call_with_retry, is_retryable};
