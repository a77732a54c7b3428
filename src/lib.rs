//! # Wio WASM Bridge
//!
//! Host side of the Wio application interface for WebAssembly modules.
//! A module imports `wio`, `log` and `gl` functions; this crate implements
//! them over an embedder-supplied [`Platform`] and drives the module's
//! exported entry points.
//!
//! ## Architecture
//!
//! ```text
//! Embedder (window system, input, GL)
//!     │
//!     │ Platform trait, on_* input producers
//!     ▼
//! BridgeContext (surfaces, event queues, handle table)
//!     │
//!     │ wasmtime host functions
//!     ▼
//! WASM module (_start, wioLoop, wioJoystick)
//! ```
//!
//! ## Features
//!
//! - **Event Queues**: Input is flattened into per-surface scalar queues the
//!   module drains one value at a time
//! - **Handle Table**: Host graphics objects are exposed as small integers,
//!   reused lowest-first after deletion
//! - **GL Forwarding**: The full GLES2 surface marshalled through linear memory
//! - **Compilation Caching**: Modules are cached by content fingerprint

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod graphics;
pub mod handles;
pub mod host_functions;
pub mod input;
pub mod keys;
pub mod memory;
pub mod metrics;
pub mod platform;
pub mod strings;
pub mod surface;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{BridgeConfig, OverflowPolicy};
pub use context::BridgeContext;
pub use engine::{BridgeRuntime, ModuleCompiler};
pub use error::{BridgeError, ErrorCode, RuntimeError};
pub use events::{EventQueue, EventRecord, EventTag};
pub use graphics::GraphicsContext;
pub use handles::{Handle, HandleTable};
pub use metrics::BridgeStats;
pub use platform::{Gamepad, HostError, HostRequest, Platform};
pub use surface::{CursorKind, CursorMode, Surface, SurfaceState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Defaults to `info`. Does nothing if a global subscriber is already set.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
