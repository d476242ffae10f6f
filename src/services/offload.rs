//! Background compute worker and the client that talks to it.
//!
//! The worker is a tokio task fed by an mpsc channel. It answers `ping` with
//! `pong` and coalesces `compute` messages: only the newest request within
//! the debounce window is computed, on the blocking pool. The client stamps
//! requests with sequence numbers, discards stale results and falls back to
//! the synchronous path when the worker stops answering.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, info, trace, warn};

use crate::domain::models::{ComputeRequest, ComputeResponse, OffloadConfig, WorkerMessage};
use crate::domain::ports::ComputeBackend;
use crate::services::coalescer::Coalescer;
use crate::services::compute::{compute, SyncBackend};

/// Errors raised while establishing or using a worker connection.
#[derive(Debug, Error)]
pub enum OffloadError {
    #[error("worker did not answer the handshake within {0:?}")]
    HandshakeTimeout(Duration),

    #[error("worker channel closed")]
    Disconnected,

    #[error("unexpected {0} message during handshake")]
    UnexpectedMessage(&'static str),
}

/// Channel ends for talking to a spawned worker.
pub struct WorkerChannels {
    pub to_worker: mpsc::Sender<WorkerMessage>,
    pub from_worker: mpsc::Receiver<WorkerMessage>,
}

/// Coalescing compute worker.
#[derive(Debug, Clone)]
pub struct OffloadWorker {
    debounce: Duration,
}

impl OffloadWorker {
    pub const fn new(debounce: Duration) -> Self {
        Self { debounce }
    }

    pub const fn from_config(config: &OffloadConfig) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms))
    }

    /// Spawn the worker loop, returning the channels to drive it.
    ///
    /// The worker stops once every sender to it has been dropped.
    pub fn spawn(self, capacity: usize) -> WorkerChannels {
        let capacity = capacity.max(1);
        let (to_worker, inbox) = mpsc::channel(capacity);
        let (outbox, from_worker) = mpsc::channel(capacity);

        tokio::spawn(async move {
            self.run(inbox, outbox).await;
        });

        WorkerChannels {
            to_worker,
            from_worker,
        }
    }

    /// Run the worker loop on the current task.
    pub async fn run(
        self,
        mut inbox: mpsc::Receiver<WorkerMessage>,
        outbox: mpsc::Sender<WorkerMessage>,
    ) {
        info!(debounce_ms = self.debounce.as_millis() as u64, "offload worker started");
        let mut pending: Coalescer<(u64, ComputeRequest)> = Coalescer::new(self.debounce);

        loop {
            // The sleep future is built even when the branch is disabled.
            let wake_at = pending
                .deadline()
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                message = inbox.recv() => match message {
                    Some(WorkerMessage::Ping) => {
                        if outbox.send(WorkerMessage::Pong).await.is_err() {
                            break;
                        }
                    }
                    Some(WorkerMessage::Compute { seq, payload }) => {
                        if let Some((dropped, _)) = pending.push((seq, payload), Instant::now()) {
                            trace!(seq = dropped, superseded_by = seq, "compute request coalesced");
                        }
                    }
                    Some(other) => {
                        warn!(kind = other.kind(), "worker ignoring unexpected message");
                    }
                    None => {
                        // Senders are gone; finish the last request before exiting.
                        if let Some((seq, payload)) = pending.take() {
                            if let Err(e) = Self::execute(seq, payload, &outbox).await {
                                debug!(seq, error = %e, "flushed result undeliverable");
                            }
                        }
                        break;
                    }
                },
                () = sleep_until(wake_at), if !pending.is_empty() => {
                    if let Some((seq, payload)) = pending.take_due(Instant::now()) {
                        if Self::execute(seq, payload, &outbox).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }

        info!(superseded = pending.superseded(), "offload worker stopped");
    }

    async fn execute(
        seq: u64,
        payload: ComputeRequest,
        outbox: &mpsc::Sender<WorkerMessage>,
    ) -> Result<(), OffloadError> {
        let start = Instant::now();
        let response = match tokio::task::spawn_blocking(move || compute(&payload)).await {
            Ok(response) => response,
            Err(e) => {
                // Leave the request unanswered; the client watchdog recovers.
                warn!(seq, error = %e, "compute task failed");
                return Ok(());
            }
        };
        debug!(
            seq,
            duration_ms = start.elapsed().as_millis() as u64,
            convergences = response.detection.convergences.len(),
            "compute finished"
        );

        outbox
            .send(WorkerMessage::Result {
                seq,
                payload: response,
            })
            .await
            .map_err(|_| OffloadError::Disconnected)
    }
}

type PendingMap = BTreeMap<u64, oneshot::Sender<Option<ComputeResponse>>>;

/// Client side of the worker protocol.
pub struct OffloadClient {
    to_worker: mpsc::Sender<WorkerMessage>,
    pending: Arc<Mutex<PendingMap>>,
    /// Serializes sequence allocation with the send, so the worker sees
    /// requests in sequence order.
    send_lock: Mutex<()>,
    next_seq: AtomicU64,
    latest_seq: Arc<AtomicU64>,
    timeout: Duration,
    max_retries: u32,
    reader: JoinHandle<()>,
}

impl OffloadClient {
    /// Handshake with a worker over the given channels.
    ///
    /// # Errors
    ///
    /// Returns an error when the worker does not answer `ping` with `pong`
    /// within `timeout`, or its channel closes first.
    pub async fn connect(
        to_worker: mpsc::Sender<WorkerMessage>,
        mut from_worker: mpsc::Receiver<WorkerMessage>,
        timeout_after: Duration,
        max_retries: u32,
    ) -> Result<Self, OffloadError> {
        to_worker
            .send(WorkerMessage::Ping)
            .await
            .map_err(|_| OffloadError::Disconnected)?;

        match timeout(timeout_after, from_worker.recv()).await {
            Ok(Some(WorkerMessage::Pong)) => {}
            Ok(Some(other)) => return Err(OffloadError::UnexpectedMessage(other.kind())),
            Ok(None) => return Err(OffloadError::Disconnected),
            Err(_) => return Err(OffloadError::HandshakeTimeout(timeout_after)),
        }
        debug!("offload worker handshake complete");

        let pending: Arc<Mutex<PendingMap>> = Arc::new(Mutex::new(BTreeMap::new()));
        let latest_seq = Arc::new(AtomicU64::new(0));
        let reader = tokio::spawn(read_results(
            from_worker,
            Arc::clone(&pending),
            Arc::clone(&latest_seq),
        ));

        Ok(Self {
            to_worker,
            pending,
            send_lock: Mutex::new(()),
            next_seq: AtomicU64::new(0),
            latest_seq,
            timeout: timeout_after,
            max_retries,
            reader,
        })
    }

    /// Spawn an in-process worker and connect to it.
    ///
    /// # Errors
    ///
    /// Returns an error when the handshake fails.
    pub async fn spawn_in_process(config: &OffloadConfig) -> Result<Self, OffloadError> {
        let channels = OffloadWorker::from_config(config).spawn(config.channel_capacity);
        Self::connect(
            channels.to_worker,
            channels.from_worker,
            Duration::from_millis(config.timeout_ms),
            config.max_retries,
        )
        .await
    }

    /// Sequence number of the most recently issued request.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq.load(Ordering::Acquire)
    }

    async fn submit(
        &self,
        request: &ComputeRequest,
    ) -> Result<(u64, oneshot::Receiver<Option<ComputeResponse>>), OffloadError> {
        let _order = self.send_lock.lock().await;
        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(seq, tx);
        self.latest_seq.fetch_max(seq, Ordering::AcqRel);

        if let Err(e) = self.send_compute(seq, request).await {
            self.pending.lock().await.remove(&seq);
            return Err(e);
        }
        trace!(seq, "compute request sent");
        Ok((seq, rx))
    }

    /// Send `request` again under its original `seq`.
    ///
    /// Returns `Ok(false)` without sending when a newer request exists.
    async fn resend(&self, seq: u64, request: &ComputeRequest) -> Result<bool, OffloadError> {
        let _order = self.send_lock.lock().await;
        if self.latest_seq() > seq {
            return Ok(false);
        }
        self.send_compute(seq, request).await?;
        trace!(seq, "compute request resent");
        Ok(true)
    }

    async fn send_compute(&self, seq: u64, request: &ComputeRequest) -> Result<(), OffloadError> {
        let message = WorkerMessage::Compute {
            seq,
            payload: request.clone(),
        };
        self.to_worker
            .send(message)
            .await
            .map_err(|_| OffloadError::Disconnected)
    }

    async fn abandon(&self, seq: u64) {
        self.pending.lock().await.remove(&seq);
    }

    /// Synchronous fallback, unless a newer request supersedes this one.
    fn settle_locally(&self, seq: u64, request: &ComputeRequest) -> Option<ComputeResponse> {
        let latest = self.latest_seq();
        if latest > seq {
            debug!(seq, latest, "request superseded, skipping fallback");
            return None;
        }
        debug!(seq, "computing synchronously");
        Some(compute(request))
    }
}

impl Drop for OffloadClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Resolve pending requests from worker results.
///
/// A result for `seq` also settles every older request, which the worker
/// coalesced away. Results older than the latest issued request are stale.
async fn read_results(
    mut from_worker: mpsc::Receiver<WorkerMessage>,
    pending: Arc<Mutex<PendingMap>>,
    latest_seq: Arc<AtomicU64>,
) {
    while let Some(message) = from_worker.recv().await {
        match message {
            WorkerMessage::Result { seq, payload } => {
                let latest = latest_seq.load(Ordering::Acquire);
                let mut pending = pending.lock().await;
                let newer = pending.split_off(&seq.saturating_add(1));
                let settled = std::mem::replace(&mut *pending, newer);
                for (pending_seq, tx) in settled {
                    let answer = if pending_seq == seq && seq >= latest {
                        Some(payload.clone())
                    } else {
                        None
                    };
                    let _ = tx.send(answer);
                }
                if seq < latest {
                    debug!(seq, latest, "dropping stale result");
                }
            }
            WorkerMessage::Pong => trace!("late pong"),
            other => warn!(kind = other.kind(), "client ignoring unexpected message"),
        }
    }

    debug!("worker result channel closed");
    // Dropping the senders wakes every waiter with a closed-channel error.
    pending.lock().await.clear();
}

#[async_trait]
impl ComputeBackend for OffloadClient {
    /// Compute on the worker.
    ///
    /// Returns `None` once a newer request has been issued; that request
    /// answers instead. A request that is still the newest is re-sent under
    /// the same `seq` when the watchdog expires, and computed synchronously
    /// once retries run out or the worker is gone.
    async fn compute(&self, request: ComputeRequest) -> Option<ComputeResponse> {
        let (seq, mut rx) = match self.submit(&request).await {
            Ok(submitted) => submitted,
            Err(e) => {
                warn!(error = %e, "offload unavailable, computing synchronously");
                return Some(compute(&request));
            }
        };

        for attempt in 0..=self.max_retries {
            match timeout(self.timeout, &mut rx).await {
                Ok(Ok(answer)) => return answer,
                Ok(Err(_)) => {
                    warn!(seq, "offload worker went away");
                    return self.settle_locally(seq, &request);
                }
                Err(_) => {
                    warn!(
                        seq,
                        attempt = attempt + 1,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "offload watchdog expired"
                    );
                    if attempt == self.max_retries {
                        break;
                    }
                    match self.resend(seq, &request).await {
                        Ok(true) => {}
                        Ok(false) => {
                            self.abandon(seq).await;
                            debug!(seq, latest = self.latest_seq(), "request superseded");
                            return None;
                        }
                        Err(e) => {
                            warn!(seq, error = %e, "offload resend failed");
                            self.abandon(seq).await;
                            return self.settle_locally(seq, &request);
                        }
                    }
                }
            }
        }

        self.abandon(seq).await;
        warn!(seq, retries = self.max_retries, "offload retries exhausted");
        self.settle_locally(seq, &request)
    }

    fn name(&self) -> &'static str {
        "offload"
    }
}

/// Pick a compute backend for `config`.
///
/// Offloading falls back to the synchronous backend when it is disabled or
/// the worker handshake fails.
pub async fn backend_from_config(config: &OffloadConfig) -> Arc<dyn ComputeBackend> {
    if !config.enabled {
        debug!("offload disabled");
        return Arc::new(SyncBackend::new());
    }
    match OffloadClient::spawn_in_process(config).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "offload worker unavailable, using synchronous backend");
            Arc::new(SyncBackend::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Axis, KeywordSet, WeightVector};

    fn request() -> ComputeRequest {
        let keywords = KeywordSet::new()
            .with_axis(Axis::Enjoyment, ["design"])
            .with_axis(Axis::Utility, ["design"]);
        ComputeRequest::new(WeightVector::default(), keywords)
    }

    #[tokio::test]
    async fn test_worker_answers_ping() {
        let mut channels = OffloadWorker::new(Duration::from_millis(10)).spawn(4);
        channels.to_worker.send(WorkerMessage::Ping).await.unwrap();
        assert_eq!(channels.from_worker.recv().await, Some(WorkerMessage::Pong));
    }

    #[tokio::test]
    async fn test_client_matches_sync_compute() {
        let config = OffloadConfig {
            debounce_ms: 5,
            ..OffloadConfig::default()
        };
        let client = OffloadClient::spawn_in_process(&config).await.unwrap();
        let response = client.compute(request()).await;
        assert_eq!(response, Some(compute(&request())));
        assert_eq!(client.latest_seq(), 1);
        assert_eq!(client.name(), "offload");
    }

    #[tokio::test]
    async fn test_handshake_fails_on_silent_worker() {
        let (to_worker, _inbox) = mpsc::channel(4);
        let (_outbox, from_worker) = mpsc::channel(4);
        let result =
            OffloadClient::connect(to_worker, from_worker, Duration::from_millis(20), 0).await;
        assert!(matches!(result, Err(OffloadError::HandshakeTimeout(_))));
    }

    #[tokio::test]
    async fn test_watchdog_falls_back_to_sync() {
        // Answers the handshake, then never computes anything.
        let (to_worker, mut inbox) = mpsc::channel(8);
        let (outbox, from_worker) = mpsc::channel(8);
        tokio::spawn(async move {
            while let Some(message) = inbox.recv().await {
                if message == WorkerMessage::Ping {
                    let _ = outbox.send(WorkerMessage::Pong).await;
                }
            }
        });

        let client = OffloadClient::connect(to_worker, from_worker, Duration::from_millis(20), 1)
            .await
            .unwrap();
        let response = client.compute(request()).await;
        assert_eq!(response, Some(compute(&request())));
        // The retry reuses the original sequence number
        assert_eq!(client.latest_seq(), 1);
    }

    #[tokio::test]
    async fn test_disabled_config_uses_sync_backend() {
        let config = OffloadConfig {
            enabled: false,
            ..OffloadConfig::default()
        };
        assert_eq!(backend_from_config(&config).await.name(), "sync");
    }
}
