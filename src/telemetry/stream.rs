// src/telemetry/stream.rs
//! Paced signal-batch producer with cooperative cancellation

use crate::config::MonitorConfig;
use crate::config::{SignalConfig, StreamConfig};
use crate::signal::{BatchAssembler, SignalBatch};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// What happens when the consumer falls behind the production rate.
///
/// `Block` parks the producer on a bounded queue, so pacing degrades but
/// every batch is delivered. `DropOldest` keeps producing at full rate and
/// discards the oldest queued batches, so the consumer always sees recent
/// signal at the cost of gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackpressureMode {
    Block,
    DropOldest,
}

impl std::fmt::Display for BackpressureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackpressureMode::Block => write!(f, "block"),
            BackpressureMode::DropOldest => write!(f, "drop_oldest"),
        }
    }
}

enum BatchSink {
    Bounded(mpsc::Sender<SignalBatch>),
    Latest(broadcast::Sender<SignalBatch>),
}

enum BatchSource {
    Bounded(mpsc::Receiver<SignalBatch>),
    Latest(broadcast::Receiver<SignalBatch>),
}

/// Consumer half of a telemetry subscription
pub struct BatchReceiver {
    source: BatchSource,
    cancelled: Arc<AtomicBool>,
    dropped: u64,
}

impl BatchReceiver {
    /// Next batch, or `None` once the subscription is cancelled or the
    /// producer has gone away. Batches still queued at cancellation are
    /// discarded.
    pub async fn recv(&mut self) -> Option<SignalBatch> {
        if self.cancelled.load(Ordering::Acquire) {
            return None;
        }
        match &mut self.source {
            BatchSource::Bounded(rx) => rx.recv().await,
            BatchSource::Latest(rx) => loop {
                match rx.recv().await {
                    Ok(batch) => return Some(batch),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        self.dropped += n;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            },
        }
    }

    /// Batches discarded so far under [`BackpressureMode::DropOldest`]
    pub fn dropped_batches(&self) -> u64 {
        self.dropped
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Producer control half of a telemetry subscription
pub struct StreamHandle {
    device_id: String,
    shutdown: watch::Sender<bool>,
    producer: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl StreamHandle {
    /// Stop the producer and wait for it to exit.
    ///
    /// When this returns, no further batch will be emitted and pending
    /// receivers resolve to `None` on their next poll.
    pub async fn cancel(self) {
        self.cancelled.store(true, Ordering::Release);
        let _ = self.shutdown.send(true);
        let _ = self.producer.await;
        debug!(device_id = %self.device_id, "telemetry stream cancelled");
    }

    pub fn is_finished(&self) -> bool {
        self.producer.is_finished()
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

/// Factory for paced batch subscriptions on one device.
///
/// Every subscription owns a fresh producer task and restarts sequence
/// numbering at zero. One batch is assembled per pacing interval; the
/// interval is the only yield point in the producer loop, so cancellation
/// is observed between whole batches and a partial batch can never leak
/// out.
pub struct TelemetryStream {
    device_id: String,
    signal: SignalConfig,
    pacing: StreamConfig,
    seed: Option<u64>,
}

impl TelemetryStream {
    pub fn new(device_id: impl Into<String>, config: &MonitorConfig) -> Self {
        Self {
            device_id: device_id.into(),
            signal: config.signal.clone(),
            pacing: config.stream.clone(),
            seed: None,
        }
    }

    /// Deterministic variant for tests: every subscription produces the
    /// same waveform
    pub fn with_seed(device_id: impl Into<String>, config: &MonitorConfig, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(device_id, config)
        }
    }

    pub fn subscribe(&self) -> (StreamHandle, BatchReceiver) {
        let assembler = match self.seed {
            Some(seed) => BatchAssembler::with_seed(&self.device_id, &self.signal, seed),
            None => BatchAssembler::new(&self.device_id, &self.signal),
        };

        let (sink, source) = match self.pacing.backpressure {
            BackpressureMode::Block => {
                let (tx, rx) = mpsc::channel(self.pacing.queue_capacity);
                (BatchSink::Bounded(tx), BatchSource::Bounded(rx))
            }
            BackpressureMode::DropOldest => {
                let (tx, rx) = broadcast::channel(self.pacing.queue_capacity);
                (BatchSink::Latest(tx), BatchSource::Latest(rx))
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let cancelled = Arc::new(AtomicBool::new(false));
        let interval_ms = self.pacing.batch_interval_ms;
        let device_id = self.device_id.clone();

        let producer = tokio::spawn(produce_batches(
            assembler,
            sink,
            shutdown_rx,
            Duration::from_millis(interval_ms),
        ));
        debug!(device_id = %device_id, interval_ms, "telemetry stream started");

        (
            StreamHandle {
                device_id,
                shutdown: shutdown_tx,
                producer,
                cancelled: Arc::clone(&cancelled),
            },
            BatchReceiver {
                source,
                cancelled,
                dropped: 0,
            },
        )
    }
}

async fn produce_batches(
    mut assembler: BatchAssembler,
    sink: BatchSink,
    mut shutdown: watch::Receiver<bool>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence: u64 = 0;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let batch = assembler.assemble(sequence);
        sequence += 1;

        match &sink {
            BatchSink::Bounded(tx) => {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    sent = tx.send(batch) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            BatchSink::Latest(tx) => {
                if tx.send(batch).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;

    fn test_config() -> MonitorConfig {
        MonitorConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_are_sequenced_from_zero() {
        let stream = TelemetryStream::with_seed("emg_device_01", &test_config(), 7);
        let (handle, mut rx) = stream.subscribe();

        for expected in 0..3u64 {
            let batch = rx.recv().await.unwrap();
            assert_eq!(batch.sequence, expected);
            assert_eq!(batch.device_id, "emg_device_01");
            assert_eq!(batch.len(), 200);
        }

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_follows_batch_interval() {
        let stream = TelemetryStream::with_seed("emg_device_01", &test_config(), 7);
        let (handle, mut rx) = stream.subscribe();

        let started = tokio::time::Instant::now();
        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
        let elapsed = started.elapsed();

        // First batch lands immediately, the next two 20 ms apart
        assert!(elapsed >= Duration::from_millis(40));
        assert!(elapsed <= Duration::from_millis(45));

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_emission() {
        let stream = TelemetryStream::with_seed("emg_device_01", &test_config(), 7);
        let (handle, mut rx) = stream.subscribe();

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();

        handle.cancel().await;

        assert!(rx.is_cancelled());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubscribe_restarts_sequence() {
        let stream = TelemetryStream::with_seed("emg_device_01", &test_config(), 7);

        let (handle, mut rx) = stream.subscribe();
        rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(second.sequence, 1);
        handle.cancel().await;

        let (handle, mut rx) = stream.subscribe();
        let first = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 0);
        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_mode_delivers_every_batch() {
        let mut config = test_config();
        config.stream.backpressure = BackpressureMode::Block;
        config.stream.queue_capacity = 2;

        let stream = TelemetryStream::with_seed("emg_device_01", &config, 7);
        let (handle, mut rx) = stream.subscribe();

        // Let the producer outrun the consumer, then drain
        tokio::time::sleep(Duration::from_millis(200)).await;

        for expected in 0..5u64 {
            let batch = rx.recv().await.unwrap();
            assert_eq!(batch.sequence, expected);
        }

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_oldest_counts_discarded_batches() {
        let mut config = test_config();
        config.stream.backpressure = BackpressureMode::DropOldest;
        config.stream.queue_capacity = 2;

        let stream = TelemetryStream::with_seed("emg_device_01", &config, 7);
        let (handle, mut rx) = stream.subscribe();

        // Producer emits ~6 batches while the consumer sits idle
        tokio::time::sleep(Duration::from_millis(110)).await;

        let batch = rx.recv().await.unwrap();
        assert!(batch.sequence >= 2, "expected a recent batch, got {}", batch.sequence);
        assert!(rx.dropped_batches() >= 1);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_receiver_stops_producer() {
        let stream = TelemetryStream::with_seed("emg_device_01", &test_config(), 7);
        let (handle, rx) = stream.subscribe();

        drop(rx);
        // Producer notices the closed channel on its next send
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished());
        handle.cancel().await;
    }
}
