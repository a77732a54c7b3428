//! Host-side event producers.
//!
//! The host calls these between frames as its windowing layer reports
//! input. Each one encodes zero or more records into the surface's queue,
//! where the module drains them through `shift`/`shiftFloat`.

use crate::context::BridgeContext;
use crate::error::HostResult;
use crate::events::EventRecord;
use crate::keys::{button_from_mouse, key_from_code};
use crate::platform::{detach, Platform};
use crate::surface::{CursorMode, SurfaceState};
use tracing::{debug, trace};

impl<P: Platform> BridgeContext<P> {
    /// Size change of a surface.
    ///
    /// Always queues size, framebuffer, scale and draw in that order, as one
    /// group that a capped queue keeps or drops whole. The framebuffer size
    /// is the logical size times `dpr`, truncated.
    pub fn on_resize(&mut self, id: i32, width: u32, height: u32, dpr: f64) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        let fb_width = (f64::from(width) * dpr) as u32;
        let fb_height = (f64::from(height) * dpr) as u32;
        self.platform.set_framebuffer_size(surface.target(), fb_width, fb_height);

        let queued = surface.queue_mut().push_group(&[
            EventRecord::Size {
                width: width as i32,
                height: height as i32,
            },
            EventRecord::Framebuffer {
                width: fb_width as i32,
                height: fb_height as i32,
            },
            EventRecord::Scale(dpr as f32),
            EventRecord::Draw,
        ]);
        trace!(surface = id, width, height, dpr, queued, "Resize observed");
        Ok(())
    }

    /// Fullscreen entered or left
    pub fn on_fullscreen_change(&mut self, id: i32, fullscreen: bool) -> HostResult<()> {
        let mode = if fullscreen { 2 } else { 0 };
        self.surfaces.get_mut(id)?.queue_mut().push(EventRecord::Mode(mode));
        Ok(())
    }

    /// Surface gained focus; the text field takes it over when text input is on
    pub fn on_focus(&mut self, id: i32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        surface.set_state(SurfaceState::Focused);
        surface.queue_mut().push(EventRecord::Focused);
        if surface.text_input_enabled() {
            self.platform.focus_text_input(surface.target());
        }
        Ok(())
    }

    /// Surface lost focus.
    ///
    /// With text input enabled the focus went to the text field, so the
    /// module is not told.
    pub fn on_blur(&mut self, id: i32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        surface.set_state(SurfaceState::Blurred);
        if !surface.text_input_enabled() {
            surface.queue_mut().push(EventRecord::Unfocused);
        }
        Ok(())
    }

    /// Surface shown or hidden
    pub fn on_visibility_change(&mut self, id: i32, visible: bool) -> HostResult<()> {
        let record = if visible { EventRecord::Visible } else { EventRecord::Hidden };
        self.surfaces.get_mut(id)?.queue_mut().push(record);
        Ok(())
    }

    /// Key pressed; `code` is a DOM `KeyboardEvent.code` name
    pub fn on_key_down(&mut self, id: i32, code: &str, repeat: bool) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        if let Some(key) = key_from_code(code) {
            let record = if repeat {
                EventRecord::ButtonRepeat(key)
            } else {
                EventRecord::ButtonPress(key)
            };
            surface.queue_mut().push(record);
        }
        Ok(())
    }

    /// Key released
    pub fn on_key_up(&mut self, id: i32, code: &str) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        if let Some(key) = key_from_code(code) {
            surface.queue_mut().push(EventRecord::ButtonRelease(key));
        }
        Ok(())
    }

    /// Mouse button pressed; in locked mode this re-requests the grab
    pub fn on_mouse_down(&mut self, id: i32, button: i16) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        if let Some(button) = button_from_mouse(button) {
            surface.queue_mut().push(EventRecord::ButtonPress(button));
        }
        if surface.cursor_mode() == CursorMode::Locked {
            detach("request_pointer_lock", self.platform.request_pointer_lock(surface.target()));
        }
        Ok(())
    }

    /// Mouse button released
    pub fn on_mouse_up(&mut self, id: i32, button: i16) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        if let Some(button) = button_from_mouse(button) {
            surface.queue_mut().push(EventRecord::ButtonRelease(button));
        }
        Ok(())
    }

    /// Pointer moved; locked mode reports the deltas instead of the position
    pub fn on_mouse_move(&mut self, id: i32, x: i32, y: i32, dx: i32, dy: i32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        let record = match surface.cursor_mode() {
            CursorMode::Locked => EventRecord::MouseRelative { dx, dy },
            CursorMode::Free | CursorMode::Hidden => EventRecord::Mouse { x, y },
        };
        surface.queue_mut().push(record);
        Ok(())
    }

    /// Wheel scrolled
    pub fn on_wheel(&mut self, id: i32, dx: f32, dy: f32) -> HostResult<()> {
        let queue = self.surfaces.get_mut(id)?.queue_mut();
        if dy != 0.0 {
            queue.push(EventRecord::ScrollVertical(dy));
        }
        if dx != 0.0 {
            queue.push(EventRecord::ScrollHorizontal(dx));
        }
        Ok(())
    }

    /// Text typed into the surface's text field.
    ///
    /// `composition` marks an update of an IME composition, which first
    /// resets the module's preview. While `composing`, code points go to
    /// the preview; otherwise they are committed and the field is cleared.
    pub fn on_text_input(&mut self, id: i32, data: &str, composing: bool, composition: bool) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        let records = data.chars().map(|ch| {
            let code = ch as i32;
            if composing {
                EventRecord::PreviewChar(code)
            } else {
                EventRecord::Char(code)
            }
        });
        let queue = surface.queue_mut();
        if composition {
            let preview: Vec<EventRecord> = std::iter::once(EventRecord::PreviewReset).chain(records).collect();
            queue.push_group(&preview);
        } else {
            queue.extend(records);
        }
        if !composing {
            self.platform.clear_text_input(surface.target());
        }
        Ok(())
    }

    /// The host's exclusive pointer grab moved to `grabbed`, or ended
    ///
    /// The holder's cursor is hidden again if it is in locked mode. A
    /// surface that lost the grab keeps its mode and cursor.
    pub fn on_pointer_lock_change(&mut self, grabbed: Option<&P::Target>) {
        for surface in self.surfaces.iter_mut() {
            surface.set_pointer_grabbed(false);
        }
        let holder = grabbed.and_then(|target| self.surfaces.find_by_target(target));
        if let Some(surface) = holder.and_then(|id| self.surfaces.get_mut(id).ok()) {
            surface.set_pointer_grabbed(true);
            if surface.cursor_mode() == CursorMode::Locked {
                self.platform.set_cursor(surface.target(), None);
            }
        }
        debug!(surface = ?holder, "Pointer lock changed");
    }

    /// The host refused a pointer grab.
    ///
    /// The surface stays in locked mode and the next press asks again.
    pub fn on_pointer_lock_error(&mut self, id: i32) -> HostResult<()> {
        let surface = self.surfaces.get_mut(id)?;
        surface.set_pointer_grabbed(false);
        debug!(surface = id, "Pointer lock refused");
        Ok(())
    }
}
