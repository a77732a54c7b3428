//! Host collaborator interface.
//!
//! The bridge never talks to a windowing system directly. Everything it
//! needs from the host (output targets, cursors, pointer grabs, text
//! fields, clipboard, dialogs, gamepads and rendering contexts) goes
//! through a [`Platform`] implementation supplied by the embedder.
//!
//! Requests the host may decide on later, such as entering fullscreen,
//! start synchronously and hand back a [`HostRequest`] future that only
//! reports the outcome. The bridge detaches those futures and discards
//! failures after logging them; the module never learns the result.

use crate::graphics::GraphicsContext;
use crate::surface::CursorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Refusal or failure reported by the host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The user or host policy refused the request
    #[error("request denied: {0}")]
    Denied(String),

    /// The host does not support the request
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Any other host failure
    #[error("host failure: {0}")]
    Failed(String),
}

/// Outcome of a host action the module does not wait for
pub type HostRequest = Pin<Box<dyn Future<Output = Result<(), HostError>> + Send + 'static>>;

/// A request whose outcome is already known
pub fn completed(result: Result<(), HostError>) -> HostRequest {
    Box::pin(std::future::ready(result))
}

/// Drop interest in a request's outcome.
///
/// With an ambient tokio runtime the request is driven to completion on it
/// and any failure is logged at debug level. Without one it is dropped.
pub fn detach(action: &'static str, request: HostRequest) {
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(async move {
                if let Err(error) = request.await {
                    debug!(action, %error, "Host request failed");
                }
            });
        }
        Err(_) => {
            debug!(action, "No async runtime, host request outcome ignored");
        }
    }
}

/// Snapshot of one gamepad slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gamepad {
    /// Device identifier
    pub id: String,
    /// Whether the device is still connected
    pub connected: bool,
    /// Axis positions in `-1.0..=1.0`
    pub axes: Vec<f64>,
    /// Button pressed states
    pub buttons: Vec<bool>,
}

impl Gamepad {
    /// Axes scaled to `0..=65535`
    pub fn axes_u16(&self) -> impl Iterator<Item = u16> + '_ {
        self.axes
            .iter()
            .map(|axis| ((axis.clamp(-1.0, 1.0) + 1.0) * 32767.5) as u16)
    }
}

/// Host services used by the bridge
pub trait Platform: 'static {
    /// Output target handed to surfaces (a window, a canvas, ...)
    type Target: Clone + PartialEq + fmt::Debug;

    /// Native rendering context created for a target
    type Graphics: GraphicsContext;

    /// Apply the module's requested size to a freshly claimed target.
    ///
    /// Hosts that already sized the target may ignore the request.
    fn prepare_surface(&mut self, target: &Self::Target, width: u32, height: u32);

    /// Create a rendering context; `None` when the host cannot
    fn create_graphics(&mut self, target: &Self::Target) -> Option<Self::Graphics>;

    /// Show a cursor, or hide it with `None`
    fn set_cursor(&mut self, target: &Self::Target, cursor: Option<CursorKind>);

    /// Ask for an exclusive pointer grab with raw motion
    fn request_pointer_lock(&mut self, target: &Self::Target) -> HostRequest;

    /// Release any pointer grab
    fn exit_pointer_lock(&mut self);

    /// Ask to show `target` fullscreen
    fn request_fullscreen(&mut self, target: &Self::Target) -> HostRequest;

    /// Leave fullscreen
    fn exit_fullscreen(&mut self) -> HostRequest;

    /// Resize the target in logical pixels
    fn set_size(&mut self, target: &Self::Target, width: u32, height: u32);

    /// Resize the target's backing store in device pixels
    fn set_framebuffer_size(&mut self, target: &Self::Target, width: u32, height: u32);

    /// Show the text field at an offset within the target.
    ///
    /// `focus` is set when the target currently has focus and the field
    /// should take it over.
    fn show_text_input(&mut self, target: &Self::Target, x: i32, y: i32, focus: bool);

    /// Hide the text field, handing focus back to the target
    fn hide_text_input(&mut self, target: &Self::Target);

    /// Move focus to the text field
    fn focus_text_input(&mut self, target: &Self::Target);

    /// Clear committed text from the text field
    fn clear_text_input(&mut self, target: &Self::Target);

    /// Put text on the clipboard
    fn set_clipboard_text(&mut self, text: &str) -> HostRequest;

    /// Show a blocking message to the user
    fn message_box(&mut self, text: &str);

    /// Current gamepad slots; empty slots are `None`
    fn gamepads(&mut self) -> Vec<Option<Gamepad>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn test_axes_scaling() {
        let pad = Gamepad {
            id: "pad".into(),
            connected: true,
            axes: vec![-1.0, 0.0, 1.0, 2.0],
            buttons: vec![],
        };
        let axes: Vec<u16> = pad.axes_u16().collect();
        assert_eq!(axes, vec![0, 32767, 65535, 65535]);
    }

    #[test]
    fn test_detach_without_runtime() {
        // Must not panic outside a runtime.
        detach("test", completed(Err(HostError::Denied("no".into()))));
    }

    #[tokio::test]
    async fn test_detach_runs_request() {
        let (tx, rx) = oneshot::channel();
        detach(
            "test",
            Box::pin(async move {
                let _ = tx.send(());
                Ok(())
            }),
        );
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn test_detach_swallows_failure() {
        let (tx, rx) = oneshot::channel();
        detach(
            "test",
            Box::pin(async move {
                let _ = tx.send(());
                Err(HostError::Denied("pointer lock".into()))
            }),
        );
        assert!(rx.await.is_ok());
    }
}
