use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TraceError};

use super::prepare::TraceRequest;
use super::{trace_request, TraceResult};

/// Identifies one submitted request.
///
/// Tickets increase with every submission; callers that only care about the
/// latest trace discard responses carrying an older ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Outcome of a background trace.
///
/// Serialized as `{"success": true, "result": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ResponseWire", from = "ResponseWire")]
pub enum TraceResponse {
    Success(TraceResult),
    Failure(String),
}

#[derive(Serialize, Deserialize)]
struct ResponseWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<TraceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<TraceResponse> for ResponseWire {
    fn from(response: TraceResponse) -> Self {
        match response {
            TraceResponse::Success(result) => Self {
                success: true,
                result: Some(result),
                error: None,
            },
            TraceResponse::Failure(error) => Self {
                success: false,
                result: None,
                error: Some(error),
            },
        }
    }
}

impl From<ResponseWire> for TraceResponse {
    fn from(wire: ResponseWire) -> Self {
        match (wire.success, wire.result) {
            (true, Some(result)) => Self::Success(result),
            (true, None) => Self::Failure("response is missing its result".into()),
            (false, _) => Self::Failure(wire.error.unwrap_or_default()),
        }
    }
}

struct Job {
    ticket: Ticket,
    request: TraceRequest,
}

/// A dedicated thread that runs [`trace_request`] off the caller's thread.
///
/// Requests and responses are plain data moved through channels; nothing
/// is shared. Dropping the worker closes its queue and joins the thread
/// after the request in flight finishes.
pub struct TraceWorker {
    jobs: Option<Sender<Job>>,
    responses: Receiver<(Ticket, TraceResponse)>,
    handle: Option<JoinHandle<()>>,
    next_ticket: u64,
}

impl TraceWorker {
    /// Starts the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Worker`] if the thread cannot be spawned.
    pub fn spawn() -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (resp_tx, resp_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("trace-worker".into())
            .spawn(move || {
                debug!("trace worker started");
                for job in job_rx {
                    let response = match trace_request(&job.request) {
                        Ok(result) => TraceResponse::Success(result),
                        Err(e) => TraceResponse::Failure(e.to_string()),
                    };
                    if resp_tx.send((job.ticket, response)).is_err() {
                        break;
                    }
                }
                debug!("trace worker stopped");
            })
            .map_err(|e| TraceError::Worker(e.to_string()))?;

        Ok(Self {
            jobs: Some(job_tx),
            responses: resp_rx,
            handle: Some(handle),
            next_ticket: 0,
        })
    }

    /// Queues a request.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::WorkerUnavailable`] if the thread has exited.
    pub fn submit(&mut self, request: TraceRequest) -> Result<Ticket> {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.jobs
            .as_ref()
            .ok_or(TraceError::WorkerUnavailable)?
            .send(Job { ticket, request })
            .map_err(|_| TraceError::WorkerUnavailable)?;
        Ok(ticket)
    }

    /// Blocks until the next response arrives.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::WorkerUnavailable`] if the thread has exited.
    pub fn recv(&self) -> Result<(Ticket, TraceResponse)> {
        self.responses
            .recv()
            .map_err(|_| TraceError::WorkerUnavailable.into())
    }

    /// Returns the next response if one is ready.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::WorkerUnavailable`] if the thread has exited.
    pub fn try_recv(&self) -> Result<Option<(Ticket, TraceResponse)>> {
        match self.responses.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TraceError::WorkerUnavailable.into()),
        }
    }
}

impl Drop for TraceWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("trace worker panicked");
            }
        }
    }
}
