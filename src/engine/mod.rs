//! Module lifecycle.
//!
//! [`BridgeRuntime`] compiles a module, links the `wio`, `log` and `gl`
//! imports, instantiates it over a fresh [`BridgeContext`] and then drives
//! it: the start export once, the loop export once per frame, and the
//! joystick export whenever the host reports a newly connected gamepad.
//!
//! Scheduling frames is left to the embedder, which also feeds input into
//! the context between frames through the `on_*` producers.

pub mod compiler;

use crate::config::BridgeConfig;
use crate::context::BridgeContext;
use crate::error::{BridgeError, Result, RuntimeError};
use crate::host_functions::register_host_functions;
use crate::metrics::{BridgeStats, FrameTimer};
use crate::platform::Platform;
use std::path::Path;
use tracing::{debug, info, instrument};
use wasmtime::{Instance, Linker, Store, TypedFunc};

pub use compiler::{fingerprint, CompiledModule, CompilerStats, ModuleCompiler};

/// One instantiated module and the bridge state behind it
pub struct BridgeRuntime<P: Platform> {
    store: Store<BridgeContext<P>>,
    instance: Instance,
    start_fn: Option<TypedFunc<(), ()>>,
    loop_fn: Option<TypedFunc<(), i32>>,
    joystick_fn: Option<TypedFunc<i32, ()>>,
    fingerprint: String,
    started: bool,
}

impl<P: Platform> BridgeRuntime<P> {
    /// Compile and instantiate `bytes` with a private compiler
    pub fn new(
        config: BridgeConfig,
        platform: P,
        targets: impl IntoIterator<Item = P::Target>,
        bytes: &[u8],
    ) -> Result<Self> {
        let mut compiler = ModuleCompiler::new(&config)?;
        Self::with_compiler(&mut compiler, config, platform, targets, bytes)
    }

    /// Load a module file and instantiate it
    pub fn from_file(
        config: BridgeConfig,
        platform: P,
        targets: impl IntoIterator<Item = P::Target>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::new(config, platform, targets, &bytes)
    }

    /// Instantiate through a shared compiler, reusing its cached modules
    pub fn with_compiler(
        compiler: &mut ModuleCompiler,
        config: BridgeConfig,
        platform: P,
        targets: impl IntoIterator<Item = P::Target>,
        bytes: &[u8],
    ) -> Result<Self> {
        config.validate()?;
        let compiled = compiler.compile(bytes)?;

        let mut linker = Linker::new(compiler.engine());
        register_host_functions(&mut linker).map_err(instantiation)?;

        let memory_export = config.memory_export.clone();
        let start_export = config.start_export.clone();
        let loop_export = config.loop_export.clone();
        let joystick_export = config.joystick_export.clone();

        let ctx = BridgeContext::new(config, platform, targets);
        let mut store = Store::new(compiler.engine(), ctx);
        let instance = linker
            .instantiate(&mut store, &compiled.module)
            .map_err(instantiation)?;

        let memory = instance
            .get_memory(&mut store, &memory_export)
            .ok_or_else(|| BridgeError::missing_export(memory_export))?;
        store.data_mut().set_memory(memory);

        let start_fn = instance.get_typed_func::<(), ()>(&mut store, &start_export).ok();
        let loop_fn = instance.get_typed_func::<(), i32>(&mut store, &loop_export).ok();
        let joystick_fn = instance.get_typed_func::<i32, ()>(&mut store, &joystick_export).ok();

        info!(
            fingerprint = %compiled.fingerprint,
            cache_hit = compiled.cache_hit,
            has_loop = loop_fn.is_some(),
            has_joystick = joystick_fn.is_some(),
            "Module instantiated"
        );

        Ok(Self {
            store,
            instance,
            start_fn,
            loop_fn,
            joystick_fn,
            fingerprint: compiled.fingerprint,
            started: false,
        })
    }

    /// Run the start export; later calls do nothing
    #[instrument(skip(self), fields(fingerprint = %self.fingerprint))]
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            debug!("Module already started");
            return Ok(());
        }
        let start = self
            .start_fn
            .clone()
            .ok_or_else(|| BridgeError::missing_export(self.store.data().config().start_export.clone()))?;
        self.started = true;
        start.call(&mut self.store, ()).map_err(RuntimeError::from_trap)?;
        info!("Module started");
        Ok(())
    }

    /// Run one frame; `false` when the module asked to stop looping
    pub fn frame(&mut self) -> Result<bool> {
        let frame = self
            .loop_fn
            .clone()
            .ok_or_else(|| BridgeError::missing_export(self.store.data().config().loop_export.clone()))?;

        let timer = FrameTimer::start();
        let result = frame.call(&mut self.store, ());
        timer.finish(self.store.data_mut().metrics_mut());

        let keep_going = result.map_err(RuntimeError::from_trap)? != 0;
        if !keep_going {
            info!(frames = self.store.data().metrics().frames(), "Module stopped its loop");
        }
        Ok(keep_going)
    }

    /// Start the module and run frames until it stops; returns the frame count
    pub fn run(&mut self) -> Result<u64> {
        self.start()?;
        let mut frames = 0;
        while self.frame()? {
            frames += 1;
        }
        Ok(frames + 1)
    }

    /// A gamepad connected in slot `index`.
    ///
    /// Refreshes the gamepad snapshot and notifies the module if it exports
    /// a joystick callback.
    pub fn gamepad_connected(&mut self, index: i32) -> Result<()> {
        self.store.data_mut().refresh_gamepads();
        if let Some(notify) = self.joystick_fn.clone() {
            notify.call(&mut self.store, index).map_err(RuntimeError::from_trap)?;
        }
        debug!(index, "Gamepad connected");
        Ok(())
    }

    /// Bridge state
    pub fn context(&self) -> &BridgeContext<P> {
        self.store.data()
    }

    /// Bridge state, for feeding input between frames
    pub fn context_mut(&mut self) -> &mut BridgeContext<P> {
        self.store.data_mut()
    }

    /// Instantiated module
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Hex SHA-256 of the module bytes
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Whether the start export has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Snapshot of every counter
    pub fn stats(&self) -> BridgeStats {
        self.store.data().stats()
    }

    /// Prometheus text for the current counters
    pub fn prometheus_metrics(&self) -> String {
        self.stats().to_prometheus()
    }
}

fn instantiation(err: wasmtime::Error) -> RuntimeError {
    RuntimeError::Instantiation(format!("{err:#}"))
}
