//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Pointer input mapped into playfield coordinates
//! - `requestAnimationFrame` bookkeeping

use glam::Vec2;

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Map a client-space pointer position onto the playfield.
///
/// The canvas shows the playfield scaled to fit and centered, so the margin
/// on the long axis is removed before scaling. Points on the margin land
/// outside `0..800 x 0..600`.
pub fn screen_to_playfield(
    client_x: f32,
    client_y: f32,
    rect_left: f32,
    rect_top: f32,
    rect_width: f32,
    rect_height: f32,
) -> Vec2 {
    if rect_width <= 0.0 || rect_height <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (rect_width / PLAYFIELD_WIDTH).min(rect_height / PLAYFIELD_HEIGHT);
    let offset_x = (rect_width - PLAYFIELD_WIDTH * scale) / 2.0;
    let offset_y = (rect_height - PLAYFIELD_HEIGHT * scale) / 2.0;

    Vec2::new(
        (client_x - rect_left - offset_x) / scale,
        (client_y - rect_top - offset_y) / scale,
    )
}

/// Tracks the single outstanding animation-frame request.
///
/// At most one request is pending. Requesting again replaces (and cancels)
/// the previous one, so restarting the loop never leaves a stale frame
/// behind.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<i32>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a new handle, returning the one it supersedes
    pub fn replace(&mut self, handle: i32) -> Option<i32> {
        self.pending.replace(handle)
    }

    /// Called at the top of the frame callback; the handle is spent
    pub fn mark_fired(&mut self) {
        self.pending = None;
    }

    /// Forget the pending handle, returning it for cancellation
    pub fn take_pending(&mut self) -> Option<i32> {
        self.pending.take()
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::FrameScheduler;
    use wasm_bindgen::prelude::*;

    impl FrameScheduler {
        /// Schedule `callback` for the next frame, cancelling any pending one
        pub fn request(
            &mut self,
            callback: impl FnOnce(f64) + 'static,
        ) -> Result<(), JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            self.cancel();
            let closure = Closure::once(callback);
            let handle = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
            closure.forget();
            self.replace(handle);
            Ok(())
        }

        /// Cancel the pending frame, if any
        pub fn cancel(&mut self) {
            if let Some(handle) = self.take_pending() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
                log::debug!("Cancelled frame request {}", handle);
            }
        }
    }
}
