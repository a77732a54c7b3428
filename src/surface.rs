//! Output surfaces and their registry.
//!
//! A surface pairs one host output target with an event queue and the UI
//! state the module controls: cursor kind, cursor mode and the text-input
//! toggle. Surfaces are numbered from 0 in creation order and live as long
//! as the bridge.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, HostResult};
use crate::events::{EventQueue, EventRecord};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Cursor shapes the module can pick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorKind {
    /// Platform arrow
    #[default]
    Default,
    /// Busy, still interactive
    Progress,
    /// Busy
    Wait,
    /// Text caret
    Text,
    /// Link hand
    Pointer,
    /// Crosshair
    Crosshair,
    /// Action not allowed
    NotAllowed,
    /// Four-way move
    Move,
    /// Vertical resize
    NsResize,
    /// Horizontal resize
    EwResize,
    /// Diagonal resize, rising
    NeswResize,
    /// Diagonal resize, falling
    NwseResize,
}

impl CursorKind {
    /// Cursor for a raw module value
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => CursorKind::Default,
            1 => CursorKind::Progress,
            2 => CursorKind::Wait,
            3 => CursorKind::Text,
            4 => CursorKind::Pointer,
            5 => CursorKind::Crosshair,
            6 => CursorKind::NotAllowed,
            7 => CursorKind::Move,
            8 => CursorKind::NsResize,
            9 => CursorKind::EwResize,
            10 => CursorKind::NeswResize,
            11 => CursorKind::NwseResize,
            _ => return None,
        })
    }

    /// CSS cursor keyword
    pub fn as_str(self) -> &'static str {
        match self {
            CursorKind::Default => "default",
            CursorKind::Progress => "progress",
            CursorKind::Wait => "wait",
            CursorKind::Text => "text",
            CursorKind::Pointer => "pointer",
            CursorKind::Crosshair => "crosshair",
            CursorKind::NotAllowed => "not-allowed",
            CursorKind::Move => "move",
            CursorKind::NsResize => "ns-resize",
            CursorKind::EwResize => "ew-resize",
            CursorKind::NeswResize => "nesw-resize",
            CursorKind::NwseResize => "nwse-resize",
        }
    }
}

/// Cursor-lock mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorMode {
    /// Visible cursor, absolute coordinates
    #[default]
    Free,
    /// Suppressed cursor, absolute coordinates
    Hidden,
    /// Suppressed cursor, relative motion, exclusive grab requested
    Locked,
}

impl CursorMode {
    /// Mode for a raw module value
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(CursorMode::Free),
            1 => Some(CursorMode::Hidden),
            2 => Some(CursorMode::Locked),
            _ => None,
        }
    }
}

/// Focus state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceState {
    /// Never focused
    Created,
    /// Has input focus
    Focused,
    /// Lost input focus
    Blurred,
}

/// One output target with its queue and UI state
#[derive(Debug)]
pub struct Surface<T> {
    id: i32,
    target: T,
    cursor: CursorKind,
    cursor_mode: CursorMode,
    text_input: bool,
    state: SurfaceState,
    pointer_grabbed: bool,
    queue: EventQueue,
}

impl<T> Surface<T> {
    fn new(id: i32, target: T, mut queue: EventQueue) -> Self {
        queue.push(EventRecord::Visible);
        Self {
            id,
            target,
            cursor: CursorKind::Default,
            cursor_mode: CursorMode::Free,
            text_input: false,
            state: SurfaceState::Created,
            pointer_grabbed: false,
            queue,
        }
    }

    /// Handle given to the module
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Output target backing this surface
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Last cursor kind set by the module
    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    /// Current cursor-lock mode
    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Cursor the user should see; `None` while suppressed
    pub fn visible_cursor(&self) -> Option<CursorKind> {
        match self.cursor_mode {
            CursorMode::Free => Some(self.cursor),
            CursorMode::Hidden | CursorMode::Locked => None,
        }
    }

    /// Record a cursor kind and return the resulting visible cursor
    pub fn set_cursor(&mut self, cursor: CursorKind) -> Option<CursorKind> {
        self.cursor = cursor;
        self.visible_cursor()
    }

    /// Record a cursor mode and return the resulting visible cursor
    pub fn set_cursor_mode(&mut self, mode: CursorMode) -> Option<CursorKind> {
        self.cursor_mode = mode;
        if mode != CursorMode::Locked {
            self.pointer_grabbed = false;
        }
        self.visible_cursor()
    }

    /// Whether text input is enabled
    pub fn text_input_enabled(&self) -> bool {
        self.text_input
    }

    pub(crate) fn set_text_input(&mut self, enabled: bool) {
        self.text_input = enabled;
    }

    /// Focus state
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: SurfaceState) {
        self.state = state;
    }

    /// Whether the host currently grants the exclusive pointer grab
    pub fn pointer_grabbed(&self) -> bool {
        self.pointer_grabbed
    }

    pub(crate) fn set_pointer_grabbed(&mut self, grabbed: bool) {
        self.pointer_grabbed = grabbed;
    }

    /// Pending events
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Pending events, mutably
    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }
}

/// Surfaces in creation order plus the output targets not yet used
#[derive(Debug)]
pub struct SurfaceRegistry<T> {
    available: VecDeque<T>,
    surfaces: Vec<Surface<T>>,
    config: BridgeConfig,
}

impl<T> SurfaceRegistry<T> {
    /// Create a registry over the host's output targets
    pub fn new(targets: impl IntoIterator<Item = T>, config: &BridgeConfig) -> Self {
        Self {
            available: targets.into_iter().collect(),
            surfaces: Vec::new(),
            config: config.clone(),
        }
    }

    /// Claim the next output target as a new surface.
    ///
    /// The surface's queue starts with a `visible` record.
    pub fn create(&mut self) -> HostResult<&mut Surface<T>> {
        let target = self
            .available
            .pop_front()
            .ok_or_else(BridgeError::no_output_target)?;
        let id = self.surfaces.len() as i32;
        let queue = EventQueue::bounded(self.config.max_queue_len, self.config.overflow_policy);
        self.surfaces.push(Surface::new(id, target, queue));
        Ok(&mut self.surfaces[id as usize])
    }

    /// Look up a surface handle
    pub fn get(&self, id: i32) -> HostResult<&Surface<T>> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.surfaces.get(index))
            .ok_or_else(|| BridgeError::invalid_surface(id))
    }

    /// Look up a surface handle, mutably
    pub fn get_mut(&mut self, id: i32) -> HostResult<&mut Surface<T>> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.surfaces.get_mut(index))
            .ok_or_else(|| BridgeError::invalid_surface(id))
    }

    /// All surfaces in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Surface<T>> {
        self.surfaces.iter()
    }

    /// All surfaces, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Surface<T>> {
        self.surfaces.iter_mut()
    }

    /// Number of surfaces created
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surface exists yet
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Output targets still unclaimed
    pub fn available_targets(&self) -> usize {
        self.available.len()
    }
}

impl<T: PartialEq> SurfaceRegistry<T> {
    /// Surface backed by `target`
    pub fn find_by_target(&self, target: &T) -> Option<i32> {
        self.surfaces
            .iter()
            .find(|surface| surface.target == *target)
            .map(|surface| surface.id)
    }
}
