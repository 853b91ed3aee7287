// src/config/loader.rs
//! Configuration loading with layered merge, environment overrides and hot reload
//!
//! File layers merge lowest to highest precedence: built-in defaults, system
//! path, user path, then local files. `EMG_<SECTION>_<KEY>` environment
//! variables override everything. The loader also hosts the [`ConfigStore`]
//! collaborator interface used by workflows that read named configuration
//! documents at runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::json;
use tracing::{info, warn};

use crate::config::constants::{paths, store};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::utils::validation::{validate_config_name, ValidationError};

/// Configuration loader with hot reload capabilities
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    current_config: Arc<RwLock<MonitorConfig>>,
    change_notifier: Option<mpsc::Sender<MonitorConfig>>,
    _file_watcher: Option<notify::RecommendedWatcher>,
}

impl ConfigLoader {
    /// Create new configuration loader using the standard discovery paths
    pub fn new() -> Self {
        Self::with_paths(Self::discover_config_paths())
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            current_config: Arc::new(RwLock::new(MonitorConfig::default())),
            change_notifier: None,
            _file_watcher: None,
        }
    }

    /// Load monitor configuration with validation
    pub fn load_monitor_config(&mut self) -> MonitorResult<MonitorConfig> {
        let config = self.load_and_merge_configs()?;

        {
            let mut current = self.current_config.write();
            *current = config.clone();
        }

        Ok(config)
    }

    /// Get current configuration
    pub fn get_current_config(&self) -> MonitorConfig {
        self.current_config.read().clone()
    }

    /// Setup hot reload with change notifications
    pub fn enable_hot_reload(
        &mut self,
        callback: impl Fn(MonitorConfig) + Send + 'static,
    ) -> MonitorResult<()> {
        let (tx, rx) = mpsc::channel();
        self.change_notifier = Some(tx.clone());

        let config_ref = self.current_config.clone();
        thread::spawn(move || {
            while let Ok(new_config) = rx.recv() {
                {
                    let mut current = config_ref.write();
                    *current = new_config.clone();
                }
                callback(new_config);
            }
        });

        self.setup_file_watcher(tx)?;
        Ok(())
    }

    /// Reload configuration manually
    pub fn reload(&mut self) -> MonitorResult<MonitorConfig> {
        let config = self.load_and_merge_configs()?;

        {
            let mut current = self.current_config.write();
            *current = config.clone();
        }

        if let Some(ref notifier) = self.change_notifier {
            let _ = notifier.send(config.clone());
        }

        info!(summary = ?config.get_summary(), "configuration reloaded");
        Ok(config)
    }

    /// Validate a configuration file without applying it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> MonitorResult<()> {
        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&content)?;

        config
            .validate_consistency()
            .map_err(|errors| ValidationError::Custom(errors.join("; ")))?;

        Ok(())
    }

    /// Export current configuration to file
    pub fn export_config<P: AsRef<Path>>(&self, path: P) -> MonitorResult<()> {
        let config = self.get_current_config();
        let toml_content = toml::to_string_pretty(&config)
            .map_err(|e| MonitorError::InvalidConfiguration(ValidationError::Custom(e.to_string())))?;

        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_and_merge_configs(&self) -> MonitorResult<MonitorConfig> {
        let mut merged = toml::Value::Table(toml::value::Table::new());

        // Start from built-in defaults
        let default_config = toml::Value::try_from(MonitorConfig::default())
            .map_err(|e| MonitorError::InvalidConfiguration(ValidationError::Custom(e.to_string())))?;
        Self::merge_toml_values(&mut merged, default_config);

        // Layer each existing configuration file on top
        for config_path in &self.config_paths {
            if config_path.exists() {
                let file_config = Self::load_config_file(config_path)?;
                Self::merge_toml_values(&mut merged, file_config);
            }
        }

        Self::apply_environment_overrides(&mut merged);

        let config: MonitorConfig = merged.try_into().map_err(|e: toml::de::Error| {
            MonitorError::InvalidConfiguration(ValidationError::Custom(e.to_string()))
        })?;

        config
            .validate_consistency()
            .map_err(|errors| ValidationError::Custom(errors.join("; ")))?;

        Ok(config)
    }

    fn load_config_file<P: AsRef<Path>>(path: P) -> MonitorResult<toml::Value> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MonitorError::ConfigurationNotFound {
                name: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;

        Ok(config)
    }

    fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
        match (base, overlay) {
            (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
                for (key, value) in overlay_table {
                    if let Some(base_value) = base_table.get_mut(&key) {
                        Self::merge_toml_values(base_value, value);
                    } else {
                        base_table.insert(key, value);
                    }
                }
            }
            (base_value, overlay_value) => {
                *base_value = overlay_value;
            }
        }
    }

    /// `EMG_SIGNAL_SAMPLE_RATE_HZ=4000` sets `signal.sample_rate_hz`. The
    /// first underscore after the prefix separates section from key.
    fn apply_environment_overrides(config: &mut toml::Value) {
        for (key, value) in std::env::vars() {
            let Some(stripped) = key.strip_prefix("EMG_") else {
                continue;
            };

            let lowered = stripped.to_lowercase();
            let Some((section, field)) = lowered.split_once('_') else {
                continue;
            };

            let parsed = Self::parse_env_value(&value);
            Self::set_section_value(config, section, field, parsed);
        }
    }

    fn parse_env_value(value: &str) -> toml::Value {
        if let Ok(int_val) = value.parse::<i64>() {
            toml::Value::Integer(int_val)
        } else if let Ok(float_val) = value.parse::<f64>() {
            toml::Value::Float(float_val)
        } else if let Ok(bool_val) = value.parse::<bool>() {
            toml::Value::Boolean(bool_val)
        } else {
            toml::Value::String(value.to_string())
        }
    }

    fn set_section_value(config: &mut toml::Value, section: &str, field: &str, value: toml::Value) {
        if let toml::Value::Table(table) = config {
            let entry = table
                .entry(section.to_string())
                .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
            if let toml::Value::Table(section_table) = entry {
                section_table.insert(field.to_string(), value);
            }
        }
    }

    fn setup_file_watcher(&mut self, tx: mpsc::Sender<MonitorConfig>) -> MonitorResult<()> {
        use notify::{DebouncedEvent, RecursiveMode, Watcher};

        let (watch_tx, watch_rx) = mpsc::channel();
        let mut watcher = notify::watcher(watch_tx, Duration::from_millis(500))
            .map_err(|e| MonitorError::WatcherFailure(e.to_string()))?;

        let mut watched_paths = std::collections::HashSet::new();
        for path in &self.config_paths {
            if let Some(parent) = path.parent() {
                if !watched_paths.contains(parent) {
                    let _ = watcher.watch(parent, RecursiveMode::NonRecursive);
                    watched_paths.insert(parent.to_path_buf());
                }
            }
        }

        let config_paths = self.config_paths.clone();
        thread::spawn(move || {
            while let Ok(event) = watch_rx.recv() {
                match event {
                    DebouncedEvent::Write(path) | DebouncedEvent::Create(path) => {
                        if config_paths.iter().any(|p| p == &path) {
                            let mut loader = ConfigLoader::with_paths(config_paths.clone());
                            match loader.load_and_merge_configs() {
                                Ok(new_config) => {
                                    let _ = tx.send(new_config);
                                }
                                Err(e) => {
                                    warn!(error = %e, "failed to reload configuration");
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        });

        self._file_watcher = Some(watcher);
        Ok(())
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut discovered = Vec::new();

        // System-wide configuration
        discovered.push(PathBuf::from(paths::SYSTEM_CONFIG_PATH));

        // User configuration
        if let Some(home_dir) = dirs::home_dir() {
            discovered.push(home_dir.join(paths::USER_CONFIG_DIR).join("config.toml"));
        }

        // Local configurations (in order of precedence)
        discovered.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        discovered.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));

        discovered
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// Cross-platform directory discovery
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var_os("USERPROFILE").map(PathBuf::from)
        }
        #[cfg(not(target_os = "windows"))]
        {
            std::env::var_os("HOME").map(PathBuf::from)
        }
    }
}

/// Named configuration document store
///
/// Collaborator interface for persisted configuration documents. The core
/// only reads tunables through it; persistence details live behind the trait.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load a named document, [`MonitorError::ConfigurationNotFound`] when absent
    async fn load(&self, name: &str) -> MonitorResult<String>;

    /// Save a named document, overwriting any existing content
    async fn save(&self, name: &str, content: &str) -> MonitorResult<()>;

    /// Built-in default settings as a nested key/value mapping
    fn defaults(&self) -> serde_json::Value;
}

/// In-memory configuration store with simulated I/O latency
#[derive(Default)]
pub struct MemoryConfigStore {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self, name: &str) -> MonitorResult<String> {
        validate_config_name(name)?;
        tokio::time::sleep(Duration::from_millis(store::IO_DELAY_MS)).await;

        self.documents.lock().get(name).cloned().ok_or_else(|| {
            MonitorError::ConfigurationNotFound {
                name: name.to_string(),
            }
        })
    }

    async fn save(&self, name: &str, content: &str) -> MonitorResult<()> {
        validate_config_name(name)?;
        tokio::time::sleep(Duration::from_millis(store::IO_DELAY_MS)).await;

        self.documents.lock().insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn defaults(&self) -> serde_json::Value {
        json!({
            "device_control": {
                "polling_interval_ms": 1000,
                "connection_timeout_ms": 5000,
                "max_retry_attempts": 3,
                "auto_reconnect": true
            },
            "visualization": {
                "max_points_per_channel": 2000,
                "update_frequency_ms": 16,
                "chart_colors": ["#00D4FF", "#FF6B00", "#00FF88", "#FF3366"],
                "background_color": "#1E1E2E",
                "grid_color": "#404040"
            },
            "performance": {
                "use_hardware_acceleration": true,
                "max_render_fps": 60,
                "memory_limit_mb": 512
            }
        })
    }
}
