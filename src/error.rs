//! Error types for the bridge.
//!
//! Host calls made by the module fail with a [`BridgeError`], which the
//! engine turns into a trap. Embedders see the wider [`RuntimeError`].

use serde::{Deserialize, Serialize};

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// `createWindow` found no output target left
    NoOutputTarget,
    /// Surface handle does not name a registered surface
    InvalidSurface,
    /// Object handle is out of range or refers to a freed slot
    InvalidHandle,
    /// Pointer/length pair falls outside linear memory
    MemoryOutOfBounds,
    /// A `gl` call was made before `gl.init`
    NoGraphicsContext,
    /// The module does not export something the bridge needs
    MissingExport,
    /// Module failed to compile, link or instantiate
    InstantiationError,
    /// The module trapped while running
    ExecutionError,
    /// Invalid argument
    InvalidArgument,
    /// Internal bridge error (bug)
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NoOutputTarget => write!(f, "NO_OUTPUT_TARGET"),
            ErrorCode::InvalidSurface => write!(f, "INVALID_SURFACE"),
            ErrorCode::InvalidHandle => write!(f, "INVALID_HANDLE"),
            ErrorCode::MemoryOutOfBounds => write!(f, "MEMORY_OUT_OF_BOUNDS"),
            ErrorCode::NoGraphicsContext => write!(f, "NO_GRAPHICS_CONTEXT"),
            ErrorCode::MissingExport => write!(f, "MISSING_EXPORT"),
            ErrorCode::InstantiationError => write!(f, "INSTANTIATION_ERROR"),
            ErrorCode::ExecutionError => write!(f, "EXECUTION_ERROR"),
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Failure of a single host call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeError {
    /// Error code
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,

    /// Name of the import that failed, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,
}

impl BridgeError {
    /// Create a new bridge error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            import: None,
        }
    }

    /// No output target is left for a new surface
    pub fn no_output_target() -> Self {
        Self::new(ErrorCode::NoOutputTarget, "no output target available")
    }

    /// Surface handle does not exist
    pub fn invalid_surface(surface: i32) -> Self {
        Self::new(
            ErrorCode::InvalidSurface,
            format!("surface {} is not registered", surface),
        )
    }

    /// Object handle does not resolve
    pub fn invalid_handle(handle: u32) -> Self {
        Self::new(
            ErrorCode::InvalidHandle,
            format!("handle {} does not refer to a live object", handle),
        )
    }

    /// Access outside linear memory
    pub fn out_of_bounds(ptr: u32, len: usize, memory_size: usize) -> Self {
        Self::new(
            ErrorCode::MemoryOutOfBounds,
            format!(
                "access of {} bytes at {:#x} exceeds linear memory of {} bytes",
                len, ptr, memory_size
            ),
        )
    }

    /// Graphics call before `gl.init`
    pub fn no_graphics_context() -> Self {
        Self::new(
            ErrorCode::NoGraphicsContext,
            "graphics context has not been initialized",
        )
    }

    /// Export missing from the module
    pub fn missing_export(name: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingExport,
            format!("module does not export '{}'", name.into()),
        )
    }

    /// Invalid argument
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Record which import failed
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = Some(import.into());
        self
    }
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(import) = &self.import {
            write!(f, " in {}", import)?;
        }
        Ok(())
    }
}

impl std::error::Error for BridgeError {}

/// Main error type for the bridge
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Host call error
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Module compilation, linking or instantiation error
    #[error("Instantiation error: {0}")]
    Instantiation(String),

    /// Trap or other failure while the module ran
    #[error("Execution error: {0}")]
    Execution(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl RuntimeError {
    /// Convert to a BridgeError for reporting
    pub fn to_bridge_error(&self) -> BridgeError {
        match self {
            RuntimeError::Bridge(e) => e.clone(),
            RuntimeError::Config(e) => BridgeError::invalid_argument(e.to_string()),
            RuntimeError::Io(e) => BridgeError::new(ErrorCode::InternalError, e.to_string()),
            RuntimeError::Instantiation(msg) => {
                BridgeError::new(ErrorCode::InstantiationError, msg.clone())
            }
            RuntimeError::Execution(msg) => BridgeError::new(ErrorCode::ExecutionError, msg.clone()),
            RuntimeError::General(msg) => BridgeError::new(ErrorCode::InternalError, msg.clone()),
        }
    }

    /// Wrap a wasmtime failure raised while the module was running.
    ///
    /// A trap caused by a failing host call keeps its [`BridgeError`].
    pub(crate) fn from_trap(err: wasmtime::Error) -> Self {
        match err.downcast_ref::<BridgeError>() {
            Some(bridge) => RuntimeError::Bridge(bridge.clone()),
            None => RuntimeError::Execution(format!("{:#}", err)),
        }
    }
}

impl From<String> for RuntimeError {
    fn from(s: String) -> Self {
        RuntimeError::General(s)
    }
}

impl From<&str> for RuntimeError {
    fn from(s: &str) -> Self {
        RuntimeError::General(s.to_string())
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Result type for host calls
pub type HostResult<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NoOutputTarget.to_string(), "NO_OUTPUT_TARGET");
        assert_eq!(ErrorCode::MemoryOutOfBounds.to_string(), "MEMORY_OUT_OF_BOUNDS");
    }

    #[test]
    fn test_bridge_error_creation() {
        let err = BridgeError::invalid_handle(7);
        assert_eq!(err.code, ErrorCode::InvalidHandle);
        assert!(err.message.contains('7'));
    }

    #[test]
    fn test_bridge_error_with_import() {
        let err = BridgeError::no_graphics_context().with_import("gl.clear");
        assert_eq!(err.import.as_deref(), Some("gl.clear"));
        assert!(err.to_string().ends_with("in gl.clear"));
    }

    #[test]
    fn test_bridge_error_serialization() {
        let err = BridgeError::out_of_bounds(0x100, 8, 64);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("MEMORY_OUT_OF_BOUNDS"));
        assert!(!json.contains("import"));
    }

    #[test]
    fn test_runtime_error_conversion() {
        let runtime_err = RuntimeError::Bridge(BridgeError::no_output_target());
        let converted = runtime_err.to_bridge_error();
        assert_eq!(converted.code, ErrorCode::NoOutputTarget);

        let exec = RuntimeError::Execution("unreachable".into());
        assert_eq!(exec.to_bridge_error().code, ErrorCode::ExecutionError);

        let config = crate::config::BridgeConfig::new().with_loop_export("");
        let invalid = RuntimeError::from(config.validate().unwrap_err()).to_bridge_error();
        assert_eq!(invalid.code, ErrorCode::InvalidArgument);
        assert!(invalid.message.contains("loop_export"));
    }
}
