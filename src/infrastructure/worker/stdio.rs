//! Out-of-process offload worker over stdin/stdout.
//!
//! Protocol: one JSON `WorkerMessage` per line in each direction. Logging
//! goes to stderr (stdout is reserved for protocol messages).

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::models::{OffloadConfig, WorkerMessage};
use crate::services::offload::{OffloadWorker, WorkerChannels};

/// Bridges newline-delimited JSON to an in-process [`OffloadWorker`].
pub struct StdioWorker {
    worker: OffloadWorker,
    capacity: usize,
}

impl StdioWorker {
    pub const fn new(config: &OffloadConfig) -> Self {
        Self {
            worker: OffloadWorker::from_config(config),
            capacity: config.channel_capacity,
        }
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    pub async fn run(self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve on arbitrary streams.
    ///
    /// When input ends, the last pending request is still computed and
    /// written before returning.
    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let WorkerChannels {
            to_worker,
            mut from_worker,
        } = self.worker.spawn(self.capacity);
        let mut to_worker = Some(to_worker);
        // One decoded message waiting for room on the worker channel. Input is
        // not read again until it is delivered, while output keeps draining.
        let mut inbound: Option<WorkerMessage> = None;
        let mut input_open = true;
        let mut lines = reader.lines();

        info!("stdio worker started");

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open && inbound.is_none() => {
                    match line.context("Failed to read worker input")? {
                        Some(line) => {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            match serde_json::from_str::<WorkerMessage>(line) {
                                Ok(message) => inbound = Some(message),
                                Err(e) => warn!(error = %e, "ignoring malformed worker message"),
                            }
                        }
                        None => input_open = false,
                    }
                }
                permit = reserve_slot(to_worker.as_ref()), if inbound.is_some() => match permit {
                    Some(permit) => {
                        if let Some(message) = inbound.take() {
                            permit.send(message);
                        }
                    }
                    None => break,
                },
                message = from_worker.recv() => match message {
                    Some(message) => {
                        let mut bytes = serde_json::to_vec(&message)?;
                        bytes.push(b'\n');
                        writer.write_all(&bytes).await?;
                        writer.flush().await?;
                    }
                    None => break,
                }
            }

            // Closing the channel lets the worker flush and exit.
            if !input_open && inbound.is_none() {
                to_worker = None;
            }
        }

        info!("stdio worker stopped");
        Ok(())
    }
}

/// Wait for room on the worker channel; `None` once it is closed.
async fn reserve_slot(
    to_worker: Option<&mpsc::Sender<WorkerMessage>>,
) -> Option<mpsc::Permit<'_, WorkerMessage>> {
    to_worker?.reserve().await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Axis, ComputeRequest, KeywordSet, WeightVector};
    use crate::services::compute;

    fn compute_line(seq: u64) -> String {
        let keywords = KeywordSet::new()
            .with_axis(Axis::Competence, ["rust"])
            .with_axis(Axis::Utility, ["rust"]);
        let message = WorkerMessage::Compute {
            seq,
            payload: ComputeRequest::new(WeightVector::default(), keywords),
        };
        serde_json::to_string(&message).unwrap()
    }

    fn parse_output(output: &[u8]) -> Vec<WorkerMessage> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_ping_and_compute_over_lines() {
        let input = format!("{{\"type\":\"ping\"}}\n\nnot json\n{}\n", compute_line(1));
        let mut output = Vec::new();

        StdioWorker::new(&OffloadConfig::default())
            .serve(input.as_bytes(), &mut output)
            .await
            .unwrap();

        let messages = parse_output(&output);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], WorkerMessage::Pong);
        let WorkerMessage::Result { seq, payload } = &messages[1] else {
            panic!("expected a result, got {:?}", messages[1]);
        };
        assert_eq!(*seq, 1);
        assert_eq!(payload.detection.total, 1);
    }

    #[tokio::test]
    async fn test_pipelined_pings_do_not_stall() {
        let input = "{\"type\":\"ping\"}\n".repeat(2_000);
        let mut output = Vec::new();
        let config = OffloadConfig {
            channel_capacity: 1,
            ..OffloadConfig::default()
        };

        tokio::time::timeout(
            std::time::Duration::from_secs(10),
            StdioWorker::new(&config).serve(input.as_bytes(), &mut output),
        )
        .await
        .expect("worker stalled on a full channel")
        .unwrap();

        let messages = parse_output(&output);
        assert_eq!(messages.len(), 2_000);
        assert!(messages.iter().all(|m| *m == WorkerMessage::Pong));
    }

    #[tokio::test]
    async fn test_burst_yields_only_last_result() {
        let input = format!("{}\n{}\n{}\n", compute_line(1), compute_line(2), compute_line(3));
        let mut output = Vec::new();

        StdioWorker::new(&OffloadConfig::default())
            .serve(input.as_bytes(), &mut output)
            .await
            .unwrap();

        let messages = parse_output(&output);
        assert_eq!(messages.len(), 1);
        let WorkerMessage::Result { seq, payload } = &messages[0] else {
            panic!("expected a result");
        };
        assert_eq!(*seq, 3);
        let WorkerMessage::Compute { payload: request, .. } =
            serde_json::from_str::<WorkerMessage>(&compute_line(3)).unwrap()
        else {
            unreachable!()
        };
        assert_eq!(payload, &compute(&request));
    }
}
