//! The bridge context shared by every host call.
//!
//! One [`BridgeContext`] coordinates one module instance's view of the
//! host: the surface registry and its event queues, the graphics context
//! with its handle table, the gamepad snapshot, the log line buffer and the
//! metrics. It lives as the data of the wasmtime store, so every import
//! reaches it through its `Caller` and nothing is global.
//!
//! The module-facing surface operations live here so they can be driven
//! without a wasm instance. The imports in `host_functions` only add
//! argument decoding and memory access on top.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, HostResult};
use crate::graphics::Graphics;
use crate::metrics::{BridgeMetrics, BridgeStats};
use crate::platform::{detach, Gamepad, Platform};
use crate::surface::{CursorKind, CursorMode, Surface, SurfaceRegistry, SurfaceState};
use tracing::{debug, info, warn};

/// State behind every import of one module instance
pub struct BridgeContext<P: Platform> {
    pub(crate) config: BridgeConfig,
    pub(crate) platform: P,
    pub(crate) surfaces: SurfaceRegistry<P::Target>,
    pub(crate) graphics: Option<Graphics<P::Graphics>>,
    pub(crate) gamepads: Vec<Option<Gamepad>>,
    pub(crate) log_buffer: Vec<u8>,
    pub(crate) metrics: BridgeMetrics,
    pub(crate) memory: Option<wasmtime::Memory>,
}

impl<P: Platform> BridgeContext<P> {
    /// Create a context over the host's output targets
    pub fn new(config: BridgeConfig, mut platform: P, targets: impl IntoIterator<Item = P::Target>) -> Self {
        let surfaces = SurfaceRegistry::new(targets, &config);
        let gamepads = platform.gamepads();
        Self {
            config,
            platform,
            surfaces,
            graphics: None,
            gamepads,
            log_buffer: Vec::new(),
            metrics: BridgeMetrics::new(),
            memory: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Host platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Host platform, mutably
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Surface registry
    pub fn surfaces(&self) -> &SurfaceRegistry<P::Target> {
        &self.surfaces
    }

    /// Look up a surface
    pub fn surface(&self, id: i32) -> HostResult<&Surface<P::Target>> {
        self.surfaces.get(id)
    }

    /// Look up a surface, mutably
    pub fn surface_mut(&mut self, id: i32) -> HostResult<&mut Surface<P::Target>> {
        self.surfaces.get_mut(id)
    }

    /// Graphics context, once `gl.init` succeeded
    pub fn graphics(&self) -> Option<&Graphics<P::Graphics>> {
        self.graphics.as_ref()
    }

    /// Graphics context for a forwarded call
    pub fn graphics_mut(&mut self) -> HostResult<&mut Graphics<P::Graphics>> {
        self.graphics.as_mut().ok_or_else(BridgeError::no_graphics_context)
    }

    /// Live counters
    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }

    /// Live counters, mutably
    pub fn metrics_mut(&mut self) -> &mut BridgeMetrics {
        &mut self.metrics
    }

    /// Exported memory, once the instance exists
    pub fn memory(&self) -> Option<wasmtime::Memory> {
        self.memory
    }

    pub(crate) fn set_memory(&mut self, memory: wasmtime::Memory) {
        self.memory = Some(memory);
    }

    /// Snapshot of every counter
    pub fn stats(&self) -> BridgeStats {
        let mut stats = BridgeStats {
            surfaces: self.surfaces.len(),
            live_objects: self.graphics.as_ref().map_or(0, |g| g.objects().len()),
            ..Default::default()
        };
        for surface in self.surfaces.iter() {
            let queue = surface.queue().stats();
            stats.queued_scalars += surface.queue().len();
            stats.events_pushed += queue.pushed_records;
            stats.events_dropped += queue.dropped_records;
            stats.scalars_shifted += queue.shifted_scalars;
        }
        self.metrics.fill(&mut stats);
        stats
    }

    /// `createWindow`: claim the next output target
    pub fn create_surface(&mut self, width: u32, height: u32) -> HostResult<i32> {
        let surface = self.surfaces.create()?;
        self.platform.prepare_surface(surface.target(), width, height);
        info!(surface = surface.id(), width, height, "Surface created");
        Ok(surface.id())
    }

    /// `shift`: next scalar through the integer channel, 0 when empty
    pub fn shift(&mut self, id: i32) -> HostResult<i32> {
        Ok(self.surfaces.get_mut(id)?.queue_mut().shift_int())
    }

    /// `shiftFloat`: next scalar through the float channel, NaN when empty
    pub fn shift_float(&mut self, id: i32) -> HostResult<f32> {
        Ok(self.surfaces.get_mut(id)?.queue_mut().shift_float())
    }

    /// `setFullscreen`; the host's answer arrives later as a mode event
    pub fn set_fullscreen(&mut self, id: i32, fullscreen: bool) -> HostResult<()> {
        let surface = self.surfaces.get(id)?;
        if fullscreen {
            detach("request_fullscreen", self.platform.request_fullscreen(surface.target()));
        } else {
            detach("exit_fullscreen", self.platform.exit_fullscreen());
        }
        Ok(())
    }

    /// `setSize`
    pub fn set_size(&mut self, id: i32, width: u32, height: u32) -> HostResult<()> {
        let surface = self.surfaces.get(id)?;
        self.platform.set_size(surface.target(), width, height);
        Ok(())
    }

    /// `setCursor`; shown immediately only in free mode
    pub fn set_cursor(&mut self, id: i32, raw: u32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        let Some(cursor) = CursorKind::from_raw(raw) else {
            warn!(surface = id, cursor = raw, "Unknown cursor kind ignored");
            return Ok(());
        };
        if let Some(visible) = surface.set_cursor(cursor) {
            self.platform.set_cursor(surface.target(), Some(visible));
        }
        Ok(())
    }

    /// `setCursorMode`; locked mode asks the host for a pointer grab
    pub fn set_cursor_mode(&mut self, id: i32, raw: u32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        let Some(mode) = CursorMode::from_raw(raw) else {
            warn!(surface = id, mode = raw, "Unknown cursor mode ignored");
            return Ok(());
        };

        let visible = surface.set_cursor_mode(mode);
        self.platform.set_cursor(surface.target(), visible);
        match mode {
            CursorMode::Locked => {
                detach("request_pointer_lock", self.platform.request_pointer_lock(surface.target()));
            }
            CursorMode::Free | CursorMode::Hidden => self.platform.exit_pointer_lock(),
        }
        debug!(surface = id, ?mode, "Cursor mode set");
        Ok(())
    }

    /// `enableTextInput`: show the text field at (x, y)
    pub fn enable_text_input(&mut self, id: i32, x: i32, y: i32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        surface.set_text_input(true);
        let focus = surface.state() == SurfaceState::Focused;
        self.platform.show_text_input(surface.target(), x, y, focus);
        Ok(())
    }

    /// `disableTextInput`
    pub fn disable_text_input(&mut self, id: i32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        surface.set_text_input(false);
        self.platform.hide_text_input(surface.target());
        Ok(())
    }

    /// `setClipboardText`; a refusal is logged and dropped
    pub fn set_clipboard_text(&mut self, text: &str) {
        detach("set_clipboard_text", self.platform.set_clipboard_text(text));
    }

    /// `messageBox`
    pub fn message_box(&mut self, text: &str) {
        self.platform.message_box(text);
    }

    /// Take a fresh gamepad snapshot and return its slot count
    pub fn refresh_gamepads(&mut self) -> usize {
        self.gamepads = self.platform.gamepads();
        self.gamepads.len()
    }

    /// Gamepad in a slot of the last snapshot
    pub fn gamepad(&self, index: i32) -> Option<&Gamepad> {
        let index = usize::try_from(index).ok()?;
        self.gamepads.get(index)?.as_ref()
    }

    /// Gamepad in a slot, only while connected
    pub fn connected_gamepad(&self, index: i32) -> Option<&Gamepad> {
        self.gamepad(index).filter(|pad| pad.connected)
    }

    /// `gl.init`: create a rendering context with an empty handle table.
    ///
    /// Returns `false` when the host cannot provide one.
    pub fn init_graphics(&mut self, id: i32) -> HostResult<bool> {
        let surface = self.surfaces.get(id)?;
        match self.platform.create_graphics(surface.target()) {
            Some(context) => {
                self.graphics = Some(Graphics::new(context));
                info!(surface = id, "Graphics context created");
                Ok(true)
            }
            None => {
                warn!(surface = id, "Host could not create a graphics context");
                Ok(false)
            }
        }
    }

    /// `log.write`: append bytes to the pending line
    pub fn log_write(&mut self, bytes: &[u8]) {
        self.log_buffer.extend_from_slice(bytes);
    }

    /// `log.flush`: emit the pending line
    pub fn log_flush(&mut self) {
        let line = String::from_utf8_lossy(&self.log_buffer);
        info!(target: "wasm", "{}", line);
        self.log_buffer.clear();
    }
}
