//! Bridge configuration types and defaults.
//!
//! This module defines the configuration options for the bridge, including
//! the names of the module exports it drives, event queue limits and
//! engine flags.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default name of the exported linear memory
pub const DEFAULT_MEMORY_EXPORT: &str = "memory";

/// Default name of the one-shot start export
pub const DEFAULT_START_EXPORT: &str = "_start";

/// Default name of the per-frame loop export
pub const DEFAULT_LOOP_EXPORT: &str = "wioLoop";

/// Default name of the gamepad-connected notification export
pub const DEFAULT_JOYSTICK_EXPORT: &str = "wioJoystick";

/// Default cap on the compiled module cache (64 MiB of module bytes)
pub const DEFAULT_MAX_CACHE_SIZE_BYTES: usize = 64 * 1024 * 1024;

/// Smallest queue cap: one resize group (size, framebuffer, scale, draw)
pub const MIN_QUEUE_LEN: usize = 9;

/// What to do with a new event record when a capped queue is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    /// Discard the incoming record
    #[default]
    DropNewest,
    /// Discard the oldest records the module has not started reading
    DropOldest,
}

/// Configuration for the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Name of the exported linear memory (default: `memory`)
    #[serde(default = "default_memory_export")]
    pub memory_export: String,

    /// Export invoked once after instantiation (default: `_start`)
    #[serde(default = "default_start_export")]
    pub start_export: String,

    /// Export invoked every frame; returns non-zero to keep looping
    #[serde(default = "default_loop_export")]
    pub loop_export: String,

    /// Export notified when a gamepad connects (optional in the module)
    #[serde(default = "default_joystick_export")]
    pub joystick_export: String,

    /// Maximum scalars held per surface queue (default: unbounded)
    #[serde(default)]
    pub max_queue_len: Option<usize>,

    /// Policy applied when a capped queue is full
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,

    /// Emit DWARF debug info for compiled modules (default: false)
    #[serde(default)]
    pub debug_info: bool,

    /// Log every host call at trace level (default: false)
    #[serde(default)]
    pub trace_host_calls: bool,

    /// Module bytes the compiler keeps cached before evicting (default: 64 MiB)
    #[serde(default = "default_max_cache_size_bytes")]
    pub max_cache_size_bytes: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            memory_export: DEFAULT_MEMORY_EXPORT.to_string(),
            start_export: DEFAULT_START_EXPORT.to_string(),
            loop_export: DEFAULT_LOOP_EXPORT.to_string(),
            joystick_export: DEFAULT_JOYSTICK_EXPORT.to_string(),
            max_queue_len: None,
            overflow_policy: OverflowPolicy::default(),
            debug_info: false,
            trace_host_calls: false,
            max_cache_size_bytes: DEFAULT_MAX_CACHE_SIZE_BYTES,
        }
    }
}

impl BridgeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the memory export name
    pub fn with_memory_export(mut self, name: impl Into<String>) -> Self {
        self.memory_export = name.into();
        self
    }

    /// Set the loop export name
    pub fn with_loop_export(mut self, name: impl Into<String>) -> Self {
        self.loop_export = name.into();
        self
    }

    /// Cap every surface queue at `max` scalars
    pub fn with_max_queue_len(mut self, max: usize) -> Self {
        self.max_queue_len = Some(max);
        self
    }

    /// Set the overflow policy for capped queues
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Enable or disable debug info
    pub fn with_debug_info(mut self, enable: bool) -> Self {
        self.debug_info = enable;
        self
    }

    /// Enable or disable per-call tracing
    pub fn with_trace_host_calls(mut self, enable: bool) -> Self {
        self.trace_host_calls = enable;
        self
    }

    /// Set the compiled module cache size
    pub fn with_max_cache_size_bytes(mut self, bytes: usize) -> Self {
        self.max_cache_size_bytes = bytes;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("memory_export", &self.memory_export),
            ("start_export", &self.start_export),
            ("loop_export", &self.loop_export),
            ("joystick_export", &self.joystick_export),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "must not be empty".into(),
                });
            }
        }

        if let Some(max) = self.max_queue_len {
            if max < MIN_QUEUE_LEN {
                return Err(ConfigError::InvalidValue {
                    field: "max_queue_len".into(),
                    reason: format!("must hold a whole resize ({MIN_QUEUE_LEN} scalars)"),
                });
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field name
        field: String,
        /// The reason it's invalid
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Default value functions for serde
fn default_memory_export() -> String {
    DEFAULT_MEMORY_EXPORT.to_string()
}

fn default_start_export() -> String {
    DEFAULT_START_EXPORT.to_string()
}

fn default_loop_export() -> String {
    DEFAULT_LOOP_EXPORT.to_string()
}

fn default_joystick_export() -> String {
    DEFAULT_JOYSTICK_EXPORT.to_string()
}

fn default_max_cache_size_bytes() -> usize {
    DEFAULT_MAX_CACHE_SIZE_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.memory_export, "memory");
        assert_eq!(config.loop_export, "wioLoop");
        assert!(config.max_queue_len.is_none());
        assert_eq!(config.overflow_policy, OverflowPolicy::DropNewest);
        assert_eq!(config.max_cache_size_bytes, DEFAULT_MAX_CACHE_SIZE_BYTES);
    }

    #[test]
    fn test_config_builder() {
        let config = BridgeConfig::new()
            .with_max_queue_len(4096)
            .with_overflow_policy(OverflowPolicy::DropOldest)
            .with_debug_info(true);

        assert_eq!(config.max_queue_len, Some(4096));
        assert_eq!(config.overflow_policy, OverflowPolicy::DropOldest);
        assert!(config.debug_info);
    }

    #[test]
    fn test_config_validation() {
        let invalid = BridgeConfig::new().with_max_queue_len(MIN_QUEUE_LEN - 1);
        assert!(invalid.validate().is_err());
        assert!(BridgeConfig::new().with_max_queue_len(MIN_QUEUE_LEN).validate().is_ok());

        let invalid = BridgeConfig::new().with_memory_export("");
        assert!(invalid.validate().is_err());

        assert!(BridgeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = BridgeConfig::default().with_max_queue_len(64);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("maxQueueLen"));
        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.max_queue_len, Some(64));
    }

    #[test]
    fn test_config_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"loopExport": "frame", "overflowPolicy": "dropOldest"}}"#).unwrap();

        let config = BridgeConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.loop_export, "frame");
        assert_eq!(config.start_export, "_start");
        assert_eq!(config.overflow_policy, OverflowPolicy::DropOldest);
    }

    #[test]
    fn test_config_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"maxQueueLen": 1}}"#).unwrap();
        assert!(matches!(
            BridgeConfig::from_json_file(file.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
