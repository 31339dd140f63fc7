//! Calculator server lifecycle.
//!
//! The server owns the domain [`Service`] and, while started, a background
//! worker that drains a bounded request queue. Direct evaluation through
//! [`CalculatorServer::calculate`] never touches the queue and works in any
//! state.

use std::sync::Arc;

use calculator_sdk::{CalculationRequest, CalculationResponse};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::Service;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerError {
    #[error("calculator server is not running")]
    NotRunning,

    #[error("calculator server stopped before answering")]
    Stopped,
}

struct Job {
    request: CalculationRequest,
    respond_to: oneshot::Sender<CalculationResponse>,
}

struct Worker {
    jobs: mpsc::Sender<Job>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct CalculatorServer {
    service: Arc<Service>,
    queue_capacity: usize,
    worker: Mutex<Option<Worker>>,
}

impl Default for CalculatorServer {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl CalculatorServer {
    /// Create a stopped server. A zero capacity is raised to one.
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            service: Arc::new(Service::new()),
            queue_capacity: queue_capacity.max(1),
            worker: Mutex::new(None),
        }
    }

    /// Spawn the worker on the current tokio runtime. No-op if already running.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) {
        let mut guard = self.worker.lock();
        if guard.is_some() {
            warn!("calculator server already running");
            return;
        }

        let (jobs, queue) = mpsc::channel(self.queue_capacity);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_worker(Arc::clone(&self.service), queue, cancel.clone()));

        *guard = Some(Worker {
            jobs,
            cancel,
            handle,
        });
        info!(queue_capacity = self.queue_capacity, "calculator server started");
    }

    /// Cancel the worker and wait for it to exit. Queued jobs are dropped.
    pub async fn stop(&self) {
        let Some(worker) = self.worker.lock().take() else {
            debug!("calculator server not running, nothing to stop");
            return;
        };

        worker.cancel.cancel();
        drop(worker.jobs);
        if let Err(e) = worker.handle.await {
            warn!(error = %e, "calculator worker terminated abnormally");
        }
        info!("calculator server stopped");
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Evaluate immediately on the caller's task.
    #[must_use]
    pub fn calculate(&self, request: &CalculationRequest) -> CalculationResponse {
        self.process_request(request)
    }

    #[must_use]
    pub fn process_request(&self, request: &CalculationRequest) -> CalculationResponse {
        self.service.calculate(request)
    }

    /// Queue a request for the worker and wait for its response.
    ///
    /// # Errors
    /// `NotRunning` if the server is not started, `Stopped` if it is stopped
    /// before the request is answered.
    pub async fn submit(
        &self,
        request: CalculationRequest,
    ) -> Result<CalculationResponse, ServerError> {
        let jobs = self
            .worker
            .lock()
            .as_ref()
            .map(|worker| worker.jobs.clone())
            .ok_or(ServerError::NotRunning)?;

        let (respond_to, response) = oneshot::channel();
        jobs.send(Job {
            request,
            respond_to,
        })
        .await
        .map_err(|_| ServerError::Stopped)?;

        response.await.map_err(|_| ServerError::Stopped)
    }
}

impl Drop for CalculatorServer {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.cancel.cancel();
        }
    }
}

async fn run_worker(
    service: Arc<Service>,
    mut queue: mpsc::Receiver<Job>,
    cancel: CancellationToken,
) {
    debug!("calculator worker running");
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            job = queue.recv() => {
                let Some(job) = job else { break };
                let response = service.calculate(&job.request);
                if job.respond_to.send(response).is_err() {
                    debug!("submitter dropped before receiving the response");
                }
            }
        }
    }
    debug!(pending = queue.len(), "calculator worker exiting");
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use calculator_sdk::Operation;
    use tracing_test::traced_test;

    #[test]
    fn calculate_works_without_start() {
        let server = CalculatorServer::default();
        let response = server.calculate(&CalculationRequest::new(2.0, 3.0, Operation::Add));

        assert!(!server.is_running());
        assert!(response.is_success());
        assert!((response.result - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn submit_requires_running_server() {
        let server = CalculatorServer::default();
        let result = server
            .submit(CalculationRequest::new(1.0, 1.0, Operation::Add))
            .await;

        assert_eq!(result, Err(ServerError::NotRunning));
    }

    #[tokio::test]
    async fn submit_is_answered_by_worker() {
        let server = CalculatorServer::new(4);
        server.start();

        let response = server
            .submit(CalculationRequest::new(10.0, 5.0, Operation::Multiply))
            .await
            .unwrap();
        assert!((response.result - 50.0).abs() < f64::EPSILON);

        let response = server
            .submit(CalculationRequest::new(10.0, 0.0, Operation::Divide))
            .await
            .unwrap();
        assert_eq!(response.error, "Division by zero is not allowed");

        server.stop().await;
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let server = CalculatorServer::default();

        server.start();
        server.start();
        assert!(server.is_running());

        server.stop().await;
        server.stop().await;
        assert!(!server.is_running());

        let result = server
            .submit(CalculationRequest::new(1.0, 1.0, Operation::Add))
            .await;
        assert_eq!(result, Err(ServerError::NotRunning));
    }

    #[tokio::test]
    async fn server_can_restart() {
        let server = CalculatorServer::default();
        server.start();
        server.stop().await;
        server.start();

        let response = server
            .submit(CalculationRequest::new(7.0, 2.0, Operation::Subtract))
            .await
            .unwrap();
        assert!((response.result - 5.0).abs() < f64::EPSILON);

        server.stop().await;
    }

    #[tokio::test]
    async fn concurrent_submissions_all_complete() {
        let server = Arc::new(CalculatorServer::new(2));
        server.start();

        let mut tasks = Vec::new();
        for i in 0..32_i32 {
            let server = Arc::clone(&server);
            tasks.push(tokio::spawn(async move {
                let x = f64::from(i);
                let response = server
                    .submit(CalculationRequest::new(x, 1.0, Operation::Add))
                    .await
                    .unwrap();
                (x, response.result)
            }));
        }

        for task in tasks {
            let (x, result) = task.await.unwrap();
            assert!((result - (x + 1.0)).abs() < f64::EPSILON);
        }

        server.stop().await;
    }

    #[tokio::test]
    async fn stop_fails_queued_and_blocked_submissions() {
        let server = CalculatorServer::new(1);
        server.start();

        // The worker has not been polled yet: the first job fills the queue,
        // the second waits for capacity.
        let first = CalculationRequest::new(1.0, 2.0, Operation::Add);
        let second = CalculationRequest::new(3.0, 4.0, Operation::Add);
        let mut queued = std::pin::pin!(server.submit(first));
        let mut blocked = std::pin::pin!(server.submit(second));
        tokio::select! {
            biased;
            _ = &mut queued => panic!("queued job answered before the worker ran"),
            _ = &mut blocked => panic!("blocked job answered before the worker ran"),
            () = std::future::ready(()) => {}
        }

        server.stop().await;

        assert_eq!(queued.await, Err(ServerError::Stopped));
        assert_eq!(blocked.await, Err(ServerError::Stopped));
    }

    #[tokio::test]
    #[traced_test]
    async fn lifecycle_is_logged() {
        let server = CalculatorServer::default();
        server.start();
        server.stop().await;

        assert!(logs_contain("calculator server started"));
        assert!(logs_contain("calculator server stopped"));
    }
}
