// src/config/constants.rs
//! System-wide configuration constants

/// Signal synthesis constants
pub mod signal {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 2000;
    pub const MIN_SAMPLE_RATE_HZ: u32 = 250;
    pub const MAX_SAMPLE_RATE_HZ: u32 = 16_000;
    pub const DEFAULT_BATCH_SIZE: usize = 100;
    pub const MIN_BATCH_SIZE: usize = 1;
    pub const MAX_BATCH_SIZE: usize = 4096;
    pub const DEFAULT_CHANNEL_IDS: [u32; 2] = [1, 2];
    pub const MAX_CHANNEL_COUNT: usize = 16;

    // Waveform shape: fundamental plus two scaled harmonics
    pub const SECOND_HARMONIC_RATIO: f64 = 1.5;
    pub const SECOND_HARMONIC_GAIN: f64 = 0.3;
    pub const THIRD_HARMONIC_RATIO: f64 = 2.2;
    pub const THIRD_HARMONIC_GAIN: f64 = 0.15;

    // Additive noise spans (rand - 0.5) * NOISE_SPAN
    pub const NOISE_SPAN: f64 = 0.1;

    // Muscle activation bursts
    pub const BURST_PROBABILITY: f64 = 0.02;
    pub const BURST_GAIN_MIN: f64 = 1.0;
    pub const BURST_GAIN_MAX: f64 = 3.0;

    // Amplitude scaling into microvolt-like units
    pub const AMPLITUDE_SCALE_UV: f64 = 500.0;
    pub const CLAMP_LIMIT_UV: f32 = 1000.0;

    // Per-channel fundamental frequencies
    pub const FLEXOR_FUNDAMENTAL_HZ: f64 = 60.0;
    pub const EXTENSOR_FUNDAMENTAL_HZ: f64 = 80.0;
    pub const FALLBACK_FUNDAMENTAL_HZ: f64 = 50.0;

    // Per-sample quality: QUALITY_FLOOR + rand * QUALITY_SPAN
    pub const QUALITY_FLOOR: f32 = 0.85;
    pub const QUALITY_SPAN: f32 = 0.15;
}

/// Telemetry stream pacing and delivery constants
pub mod stream {
    pub const DEFAULT_BATCH_INTERVAL_MS: u64 = 20;
    pub const MIN_BATCH_INTERVAL_MS: u64 = 1;
    pub const MAX_BATCH_INTERVAL_MS: u64 = 1000;
    pub const DEFAULT_QUEUE_CAPACITY: usize = 32;
    pub const MIN_QUEUE_CAPACITY: usize = 1;
    pub const MAX_QUEUE_CAPACITY: usize = 4096;
    pub const DEFAULT_MAX_POINTS_PER_CHANNEL: usize = 2000;
}

/// Gesture prediction constants
pub mod prediction {
    pub const FEATURE_RMS: &str = "rms";
    pub const FEATURE_VARIANCE: &str = "variance";
    pub const FEATURE_FREQUENCY_PEAK: &str = "frequency_peak";

    // Confidence ranges for the random stub, per gesture label
    pub const FIST_CONFIDENCE_FLOOR: f32 = 0.7;
    pub const OPEN_HAND_CONFIDENCE_FLOOR: f32 = 0.6;
    pub const POINT_CONFIDENCE_FLOOR: f32 = 0.5;
    pub const REST_CONFIDENCE_CEILING: f32 = 0.3;

    // Activation threshold for the energy-rule classifier, in microvolts RMS
    pub const ENERGY_ACTIVE_THRESHOLD_UV: f32 = 250.0;
    pub const ENERGY_STRONG_THRESHOLD_UV: f32 = 450.0;
}

/// Device endpoint constants
pub mod device {
    pub const DEFAULT_DEVICE_ID: &str = "emg_device_01";
    pub const DEFAULT_DEVICE_NAME: &str = "EMG Device #1";
    pub const CONNECTED_BATTERY_LEVEL: u8 = 85;
    pub const CONNECTED_SIGNAL_QUALITY: f32 = 0.92;
    pub const CONNECTION_TIMEOUT_MS: u64 = 5000;

    // Simulated endpoint latencies
    pub const START_DELAY_MS: u64 = 1000;
    pub const STOP_DELAY_MS: u64 = 500;
    pub const CALIBRATE_DELAY_MS: u64 = 2000;
    pub const STATUS_DELAY_MS: u64 = 200;
}

/// Calibration workflow constants
pub mod calibration {
    pub const DEFAULT_STEP_DURATION_SECS: u32 = 30;
    pub const DEFAULT_REST_SECS: u32 = 5;
    pub const DEFAULT_MINIMUM_CONFIDENCE: f32 = 0.8;
    pub const MAX_STEP_DURATION_SECS: u32 = 600;
}

/// System metrics ticker constants
pub mod metrics {
    pub const UPDATE_INTERVAL_MS: u64 = 1000;
    pub const CPU_USAGE_MIN_PCT: f32 = 30.0;
    pub const CPU_USAGE_MAX_PCT: f32 = 60.0;
    pub const MEMORY_USAGE_MIN_MB: f32 = 400.0;
    pub const MEMORY_USAGE_MAX_MB: f32 = 600.0;
    pub const SIGNAL_LATENCY_MIN_MS: u64 = 10;
    pub const SIGNAL_LATENCY_MAX_MS: u64 = 30;
    pub const PREDICTION_LATENCY_MIN_MS: u64 = 20;
    pub const PREDICTION_LATENCY_MAX_MS: u64 = 50;
    pub const FRAME_RATE_MIN_FPS: f32 = 58.0;
    pub const FRAME_RATE_MAX_FPS: f32 = 60.0;
}

/// Configuration store constants
pub mod store {
    pub const IO_DELAY_MS: u64 = 100;
}

/// Configuration file discovery paths
pub mod paths {
    pub const SYSTEM_CONFIG_PATH: &str = "/etc/emg-monitor/config.toml";
    pub const USER_CONFIG_DIR: &str = ".emg-monitor";
    pub const DEFAULT_CONFIG_FILE: &str = "monitor.toml";
    pub const LOCAL_CONFIG_FILE: &str = "monitor.local.toml";
}

/// Input validation constants
pub mod validation {
    pub const MAX_DEVICE_ID_LENGTH: usize = 64;
    pub const MAX_CONFIG_NAME_LENGTH: usize = 128;
    pub const MAX_GESTURE_SEQUENCE_LENGTH: usize = 32;
}
