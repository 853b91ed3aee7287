// src/controller.rs
//! Workflow orchestration for the monitoring UI
//!
//! The controller owns the five observable state slots the presentation
//! layer renders from and runs the three workflows that mutate them:
//! start, stop and calibrate. Workflow failures are absorbed into the
//! relevant snapshot (device status `Error` plus `last_error`) instead of
//! being returned to the caller, so a failed device operation can degrade
//! the display but never take it down.

use crate::config::MonitorConfig;
use crate::hal::DeviceEndpoint;
use crate::prediction::{build_classifier, FeatureExtractor, GesturePrediction, GestureType};
use crate::state::calibration::{CalibrationPlan, CalibrationSnapshot};
use crate::state::device::{DeviceSnapshot, DeviceStatus};
use crate::state::metrics::{MetricsSampler, SystemMetrics};
use crate::state::StateCell;
use crate::telemetry::{SignalSnapshot, StateAggregator, StreamHandle, TelemetryStream};
use crate::utils::time::current_timestamp_millis;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

struct ActiveStream {
    handle: StreamHandle,
    consumer: JoinHandle<()>,
}

/// Orchestrates device workflows and publishes their observable state
pub struct MonitorController {
    config: MonitorConfig,
    endpoint: Arc<dyn DeviceEndpoint>,
    device: StateCell<DeviceSnapshot>,
    signal: StateCell<SignalSnapshot>,
    metrics: StateCell<SystemMetrics>,
    gesture: StateCell<Option<GesturePrediction>>,
    calibration: StateCell<CalibrationSnapshot>,
    active_stream: Mutex<Option<ActiveStream>>,
    metrics_task: Mutex<Option<JoinHandle<()>>>,
    seed: Option<u64>,
}

impl MonitorController {
    pub fn new(config: MonitorConfig, endpoint: Arc<dyn DeviceEndpoint>) -> Self {
        let device = StateCell::new(DeviceSnapshot::initial(
            config.device.device_id.clone(),
            config.device.device_name.clone(),
        ));
        let signal = StateCell::new(SignalSnapshot::idle(
            config.signal.sample_rate_hz,
            config.aggregator.max_points_per_channel,
        ));

        Self {
            config,
            endpoint,
            device,
            signal,
            metrics: StateCell::new(SystemMetrics::default()),
            gesture: StateCell::new(None),
            calibration: StateCell::new(CalibrationSnapshot::idle()),
            active_stream: Mutex::new(None),
            metrics_task: Mutex::new(None),
            seed: None,
        }
    }

    /// Deterministic variant for tests: signal generation, metrics and the
    /// default classifier all draw from the given seed
    pub fn with_seed(config: MonitorConfig, endpoint: Arc<dyn DeviceEndpoint>, seed: u64) -> Self {
        let mut controller = Self::new(config, endpoint);
        controller.seed = Some(seed);
        controller.config.prediction.seed = Some(seed);
        controller
    }

    // ---- snapshot access -------------------------------------------------

    pub fn get_device(&self) -> DeviceSnapshot {
        self.device.get()
    }

    pub fn get_signal(&self) -> SignalSnapshot {
        self.signal.get()
    }

    pub fn get_metrics(&self) -> SystemMetrics {
        self.metrics.get()
    }

    pub fn get_gesture(&self) -> Option<GesturePrediction> {
        self.gesture.get()
    }

    pub fn get_calibration(&self) -> CalibrationSnapshot {
        self.calibration.get()
    }

    pub fn watch_device(&self) -> watch::Receiver<DeviceSnapshot> {
        self.device.subscribe()
    }

    pub fn watch_signal(&self) -> watch::Receiver<SignalSnapshot> {
        self.signal.subscribe()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<SystemMetrics> {
        self.metrics.subscribe()
    }

    pub fn watch_gesture(&self) -> watch::Receiver<Option<GesturePrediction>> {
        self.gesture.subscribe()
    }

    pub fn watch_calibration(&self) -> watch::Receiver<CalibrationSnapshot> {
        self.calibration.subscribe()
    }

    pub fn is_streaming(&self) -> bool {
        self.active_stream.lock().is_some()
    }

    // ---- workflows -------------------------------------------------------

    /// Connect the device and start signal telemetry.
    ///
    /// On failure the device snapshot moves to `Error` with the reason in
    /// `last_error`; nothing is returned to the caller either way.
    pub async fn start_device(&self) {
        let current = self.device.get();
        if !current.status.can_transition_to(DeviceStatus::Connecting) {
            warn!(status = %current.status, "ignoring start request");
            return;
        }
        let device_id = current.device_id.clone();

        self.device.update(|d| {
            d.status = DeviceStatus::Connecting;
            d.last_error = None;
            d.last_seen_ms = current_timestamp_millis();
        });

        match self.endpoint.start(&device_id).await {
            Ok(status) => {
                info!(device_id = %device_id, "device connected");
                self.device.update(|d| {
                    d.status = DeviceStatus::Connected;
                    d.battery_level = status.battery_level;
                    d.signal_quality = status.signal_quality;
                    d.channels = status.channels;
                    d.last_seen_ms = status.last_seen_ms;
                });
                self.signal.update(|s| s.receiving = true);
                self.replace_stream(&device_id).await;
            }
            Err(e) => {
                warn!(device_id = %device_id, error = %e, "device connection failed");
                self.device.update(|d| {
                    d.status = DeviceStatus::Error;
                    d.last_error = Some(e.to_string());
                });
            }
        }
    }

    /// Cancel telemetry, take the device offline and clear the display
    /// state. The active stream is cancelled and joined before the cleared
    /// snapshots are published, so no batch lands after the reset.
    pub async fn stop_device(&self) {
        let current = self.device.get();
        if !current.status.can_transition_to(DeviceStatus::Disconnected) {
            warn!(status = %current.status, "ignoring stop request");
            return;
        }
        let device_id = current.device_id.clone();

        self.cancel_stream().await;

        if let Err(e) = self.endpoint.stop(&device_id).await {
            warn!(device_id = %device_id, error = %e, "device stop reported failure");
        }

        self.device.update(|d| {
            d.status = DeviceStatus::Disconnected;
            d.battery_level = None;
            d.signal_quality = 0.0;
            d.last_seen_ms = current_timestamp_millis();
        });
        self.signal.set(SignalSnapshot::idle(
            self.config.signal.sample_rate_hz,
            self.config.aggregator.max_points_per_channel,
        ));
        self.gesture.set(None);
        info!(device_id = %device_id, "device stopped");
    }

    /// Run a calibration session with the configured default plan
    pub async fn start_calibration(&self) {
        self.start_calibration_with(CalibrationPlan::from_settings(&self.config.calibration))
            .await;
    }

    /// Run a calibration session: per-gesture timed steps with rest
    /// intervals, progress published each second.
    ///
    /// On success the device moves to `Active`; on failure calibration
    /// resets to idle and the device moves to `Error`.
    pub async fn start_calibration_with(&self, plan: CalibrationPlan) {
        let current = self.device.get();
        if !current.status.can_transition_to(DeviceStatus::Calibrating) {
            warn!(status = %current.status, "ignoring calibration request");
            return;
        }
        let device_id = current.device_id.clone();

        self.device.update(|d| d.status = DeviceStatus::Calibrating);
        self.calibration.set(CalibrationSnapshot::started());

        match self.endpoint.calibrate(&device_id, &plan).await {
            Ok(receipt) => {
                info!(
                    device_id = %device_id,
                    calibration_id = %receipt.calibration_id,
                    "calibration accepted"
                );
                self.run_calibration_steps(&plan).await;

                let collected = plan.expected_sample_count(self.config.signal.sample_rate_hz);
                self.calibration.set(CalibrationSnapshot::completed(collected));
                self.device.update(|d| d.status = DeviceStatus::Active);
                info!(device_id = %device_id, collected, "calibration complete");
            }
            Err(e) => {
                warn!(device_id = %device_id, error = %e, "calibration failed");
                self.calibration.set(CalibrationSnapshot::aborted());
                self.device.update(|d| {
                    d.status = DeviceStatus::Error;
                    d.last_error = Some(e.to_string());
                });
            }
        }
    }

    /// Start the periodic system-metrics sampler (1 Hz by default).
    /// Subsequent calls are no-ops while the sampler is running.
    pub fn start_metrics(&self) {
        let mut task = self.metrics_task.lock();
        if task.is_some() {
            return;
        }

        let metrics = self.metrics.clone();
        let device = self.device.clone();
        let interval = Duration::from_millis(self.config.metrics.update_interval_ms);
        let mut sampler = match self.seed {
            Some(seed) => MetricsSampler::with_seed(seed),
            None => MetricsSampler::new(),
        };

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let status = device.get().status;
                metrics.set(sampler.sample(status));
            }
        }));
    }

    /// Stop background tasks. The state slots keep their last snapshots.
    pub async fn shutdown(&self) {
        if let Some(task) = self.metrics_task.lock().take() {
            task.abort();
        }
        self.cancel_stream().await;
    }

    // ---- internals -------------------------------------------------------

    async fn replace_stream(&self, device_id: &str) {
        self.cancel_stream().await;

        let stream = match self.seed {
            Some(seed) => TelemetryStream::with_seed(device_id, &self.config, seed),
            None => TelemetryStream::new(device_id, &self.config),
        };
        let (handle, mut rx) = stream.subscribe();

        let mut aggregator = StateAggregator::new(&self.config);
        let mut extractor = FeatureExtractor::new(self.config.signal.sample_rate_hz);
        let mut classifier = build_classifier(&self.config.prediction);
        info!(device_id, classifier = classifier.name(), "signal monitoring started");

        let signal = self.signal.clone();
        let gesture = self.gesture.clone();
        let consumer = tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                if rx.is_cancelled() {
                    break;
                }
                if let Some(snapshot) = aggregator.apply(&batch) {
                    signal.set(snapshot);
                    if !batch.samples.is_empty() {
                        let digest = extractor.digest(&batch);
                        gesture.set(Some(classifier.classify(&batch, &digest)));
                    }
                }
            }
        });

        *self.active_stream.lock() = Some(ActiveStream { handle, consumer });
    }

    async fn cancel_stream(&self) {
        let active = self.active_stream.lock().take();
        if let Some(active) = active {
            active.handle.cancel().await;
            let _ = active.consumer.await;
        }
    }

    async fn run_calibration_steps(&self, plan: &CalibrationPlan) {
        let total_secs = plan.total_duration_secs().max(1);
        let sample_rate_hz = self.config.signal.sample_rate_hz;
        let step_count = plan.gesture_sequence.len();
        let mut elapsed_secs = 0u32;
        let mut collected_samples = 0u64;

        for (step, gesture) in plan.gesture_sequence.iter().enumerate() {
            for _ in 0..plan.step_duration_secs {
                self.publish_calibration_tick(
                    Some(*gesture),
                    elapsed_secs,
                    total_secs,
                    collected_samples,
                );
                tokio::time::sleep(Duration::from_secs(1)).await;
                elapsed_secs += 1;
                collected_samples += sample_rate_hz as u64;
            }

            if step + 1 < step_count {
                for _ in 0..plan.rest_between_secs {
                    self.publish_calibration_tick(None, elapsed_secs, total_secs, collected_samples);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    elapsed_secs += 1;
                }
            }
        }
    }

    fn publish_calibration_tick(
        &self,
        gesture: Option<GestureType>,
        elapsed_secs: u32,
        total_secs: u32,
        collected_samples: u64,
    ) {
        self.calibration.update(|c| {
            c.active = true;
            c.complete = false;
            c.current_gesture = gesture;
            c.progress = elapsed_secs as f32 / total_secs as f32;
            c.remaining_secs = total_secs.saturating_sub(elapsed_secs);
            c.collected_samples = collected_samples;
        });
    }
}
