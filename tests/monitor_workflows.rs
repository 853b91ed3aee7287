// tests/monitor_workflows.rs
//! Integration tests for the device, calibration and metrics workflows

use emg_monitor::config::MonitorConfig;
use emg_monitor::hal::MockDeviceEndpoint;
use emg_monitor::prediction::GestureType;
use emg_monitor::state::{CalibrationPlan, DeviceStatus, NetworkStatus};
use emg_monitor::MonitorController;
use std::sync::Arc;
use std::time::Duration;

fn seeded_controller() -> (Arc<MonitorController>, Arc<MockDeviceEndpoint>) {
    let endpoint = Arc::new(MockDeviceEndpoint::new());
    let controller = Arc::new(MonitorController::with_seed(
        MonitorConfig::default(),
        endpoint.clone(),
        17,
    ));
    (controller, endpoint)
}

fn short_plan() -> CalibrationPlan {
    CalibrationPlan {
        step_duration_secs: 2,
        gesture_sequence: vec![GestureType::Rest, GestureType::Fist],
        rest_between_secs: 1,
        minimum_confidence: 0.8,
    }
}

#[tokio::test(start_paused = true)]
async fn test_connect_walks_through_connecting_to_connected() {
    let (controller, _) = seeded_controller();
    let mut device_rx = controller.watch_device();

    let connect = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.start_device().await })
    };

    device_rx.changed().await.expect("watch closed");
    assert_eq!(device_rx.borrow().status, DeviceStatus::Connecting);

    device_rx.changed().await.expect("watch closed");
    assert_eq!(device_rx.borrow_and_update().status, DeviceStatus::Connected);
    connect.await.expect("connect task panicked");

    let device = controller.get_device();
    assert_eq!(device.battery_level, Some(85));
    assert_eq!(device.signal_quality, 0.92);
    assert_eq!(device.channels[0].name, "Flexor");
    assert_eq!(device.channels[1].name, "Extensor");
    assert!(device.last_error.is_none());
    assert!(controller.is_streaming());

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_signal_and_predictions_flow_after_connect() {
    let (controller, _) = seeded_controller();
    controller.start_device().await;

    let mut signal_rx = controller.watch_signal();
    let snapshot = loop {
        signal_rx.changed().await.expect("watch closed");
        let snapshot = signal_rx.borrow_and_update().clone();
        if !snapshot.channels.is_empty() {
            break snapshot;
        }
    };

    assert!(snapshot.receiving);
    assert_eq!(snapshot.channels.len(), 2);
    for channel_id in [1u32, 2] {
        let buffer = &snapshot.channels[&channel_id];
        assert_eq!(buffer.values.len(), 100);
        assert!(buffer.active);
        assert!((0.85..=1.0).contains(&buffer.quality));
        assert!(buffer.values.iter().all(|v| v.abs() <= 1000.0));
    }

    let prediction = controller.get_gesture().expect("no prediction published");
    assert!((0.0..=1.0).contains(&prediction.confidence));
    for feature in ["rms", "variance", "frequency_peak"] {
        assert!(
            prediction.features.contains_key(feature),
            "missing feature {}",
            feature
        );
    }

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_stream_and_clears_display_state() {
    let (controller, _) = seeded_controller();
    controller.start_device().await;

    // Let a few batches land
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!controller.get_signal().channels.is_empty());

    controller.stop_device().await;

    let device = controller.get_device();
    assert_eq!(device.status, DeviceStatus::Disconnected);
    assert_eq!(device.battery_level, None);
    assert_eq!(device.signal_quality, 0.0);

    let signal = controller.get_signal();
    assert!(!signal.receiving);
    assert!(signal.channels.is_empty());
    assert_eq!(signal.latency_ms, 0);
    assert_eq!(controller.get_gesture(), None);
    assert!(!controller.is_streaming());

    // No late batch may overwrite the cleared state
    let cleared = controller.get_signal();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(controller.get_signal(), cleared);
}

#[tokio::test(start_paused = true)]
async fn test_restarted_device_streams_again() {
    let (controller, _) = seeded_controller();

    controller.start_device().await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    controller.stop_device().await;

    controller.start_device().await;
    assert!(controller.is_streaming());
    tokio::time::sleep(Duration::from_millis(60)).await;

    let signal = controller.get_signal();
    assert!(signal.receiving);
    assert_eq!(signal.channels.len(), 2);

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_calibration_steps_through_gestures_and_activates() {
    let (controller, _) = seeded_controller();
    controller.start_device().await;

    let mut calibration_rx = controller.watch_calibration();
    let calibrate = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.start_calibration_with(short_plan()).await })
    };

    let mut observed_gestures = Vec::new();
    let mut last_progress = 0.0f32;
    loop {
        calibration_rx.changed().await.expect("watch closed");
        let snapshot = calibration_rx.borrow_and_update().clone();
        if snapshot.complete {
            assert!(!snapshot.active);
            assert_eq!(snapshot.progress, 1.0);
            assert_eq!(snapshot.collected_samples, 2 * 2 * 2000);
            break;
        }
        assert!(snapshot.active);
        assert!(snapshot.progress >= last_progress);
        last_progress = snapshot.progress;
        if let Some(gesture) = snapshot.current_gesture {
            if observed_gestures.last() != Some(&gesture) {
                observed_gestures.push(gesture);
            }
        }
    }
    calibrate.await.expect("calibration task panicked");

    assert_eq!(observed_gestures, vec![GestureType::Rest, GestureType::Fist]);
    assert_eq!(controller.get_device().status, DeviceStatus::Active);

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_calibration_failure_resets_progress_and_marks_error() {
    let (controller, endpoint) = seeded_controller();
    controller.start_device().await;

    endpoint.fail_calibrations("electrode contact lost");
    controller.start_calibration_with(short_plan()).await;

    let calibration = controller.get_calibration();
    assert!(!calibration.active);
    assert!(!calibration.complete);
    assert_eq!(calibration.progress, 0.0);

    let device = controller.get_device();
    assert_eq!(device.status, DeviceStatus::Error);
    let reason = device.last_error.expect("missing failure reason");
    assert!(reason.contains("electrode contact lost"));

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_connection_failure_is_absorbed_into_device_state() {
    let (controller, endpoint) = seeded_controller();
    endpoint.fail_connections("device unreachable");

    controller.start_device().await;

    let device = controller.get_device();
    assert_eq!(device.status, DeviceStatus::Error);
    assert!(device
        .last_error
        .expect("missing failure reason")
        .contains("device unreachable"));
    assert!(!controller.is_streaming());
    assert!(!controller.get_signal().receiving);

    // Error state is recoverable: a later start succeeds
    endpoint.clear_failures();
    controller.start_device().await;
    assert_eq!(controller.get_device().status, DeviceStatus::Connected);
    assert!(controller.is_streaming());

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_metrics_follow_device_connectivity() {
    let (controller, _) = seeded_controller();
    controller.start_metrics();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let metrics = controller.get_metrics();
    assert!((30.0..=60.0).contains(&metrics.cpu_usage_pct));
    assert!((400.0..=600.0).contains(&metrics.memory_usage_mb));
    assert!((58.0..=60.0).contains(&metrics.frame_rate_fps));
    assert_eq!(metrics.network_status, NetworkStatus::Disconnected);

    controller.start_device().await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(
        controller.get_metrics().network_status,
        NetworkStatus::Connected
    );

    controller.stop_device().await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(
        controller.get_metrics().network_status,
        NetworkStatus::Disconnected
    );

    controller.shutdown().await;
}
