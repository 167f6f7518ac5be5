#![forbid(unsafe_code)]

//! Collaborators a [`NativeWindow`] dispatches to.
//!
//! - [`SurfaceWindow`]: the toolkit side. Receives one notification per
//!   dispatched event and answers pointer hit tests.
//! - [`PlatformWindow`]: the OS side. Owns the drawable surface.
//! - [`KeyboardGrabber`]: sees keyboard events before the surface does.
//!
//! All callbacks take `&self`; implementations that record state use
//! interior mutability. A callback may push or pump events on
//! [`EventContext::window`].

use trellis_core::event::{
    KeyCode, Modifiers, MouseButton, MouseWheel, NativeEvent, ScanCode, WheelDelta, WindowEvent,
};
use trellis_core::{Point, Rect, Size};

use crate::window::NativeWindow;

/// Result of a pointer hit test against the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetPart {
    /// Outside the window.
    Nowhere,
    Client,
    TitleBar,
    Border,
    /// Any other non-client decoration.
    NonClient,
}

impl WidgetPart {
    #[inline]
    #[must_use]
    pub const fn is_non_client(self) -> bool {
        matches!(self, Self::TitleBar | Self::Border | Self::NonClient)
    }
}

/// The event being dispatched and the window dispatching it.
#[derive(Clone, Copy)]
pub struct EventContext<'a> {
    window: &'a NativeWindow,
    event: &'a NativeEvent,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(window: &'a NativeWindow, event: &'a NativeEvent) -> Self {
        Self { window, event }
    }

    #[inline]
    pub fn window(&self) -> &'a NativeWindow {
        self.window
    }

    #[inline]
    pub fn event(&self) -> &'a NativeEvent {
        self.event
    }
}

impl std::fmt::Debug for EventContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventContext")
            .field("event", self.event)
            .field("depth", &self.window.processing_depth())
            .finish()
    }
}

/// Toolkit-side window notified of native events.
#[allow(unused_variables)]
pub trait SurfaceWindow {
    /// Window event filter. Returning `false` swallows the event.
    fn window_event(&self, cx: &EventContext<'_>, event: &WindowEvent) -> bool {
        true
    }

    /// Which part of the window is under `position`.
    fn native_window_hit_test(&self, position: Point) -> WidgetPart {
        WidgetPart::Client
    }

    fn resized(&self, cx: &EventContext<'_>, size: Size) {}
    fn mouse_entered(&self, cx: &EventContext<'_>, position: Point) {}
    fn mouse_left(&self, cx: &EventContext<'_>) {}
    fn focus_gained(&self, cx: &EventContext<'_>) {}
    fn focus_lost(&self, cx: &EventContext<'_>) {}
    fn title_text_changed(&self, cx: &EventContext<'_>, title: &str) {}

    fn mouse_wheel_scrolled(&self, cx: &EventContext<'_>, wheel: MouseWheel, delta: WheelDelta) {}
    fn mouse_button_pressed(
        &self,
        cx: &EventContext<'_>,
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    ) {
    }
    fn mouse_button_double_clicked(
        &self,
        cx: &EventContext<'_>,
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    ) {
    }
    fn mouse_button_released(&self, cx: &EventContext<'_>, button: MouseButton, position: Point) {}
    fn mouse_moved(&self, cx: &EventContext<'_>, position: Point) {}

    fn non_client_mouse_wheel_scrolled(
        &self,
        cx: &EventContext<'_>,
        wheel: MouseWheel,
        delta: WheelDelta,
    ) {
    }
    fn non_client_mouse_button_pressed(
        &self,
        cx: &EventContext<'_>,
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    ) {
    }
    fn non_client_mouse_button_double_clicked(
        &self,
        cx: &EventContext<'_>,
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    ) {
    }
    fn non_client_mouse_button_released(
        &self,
        cx: &EventContext<'_>,
        button: MouseButton,
        position: Point,
    ) {
    }
    fn non_client_mouse_moved(&self, cx: &EventContext<'_>, position: Point) {}

    fn key_pressed(
        &self,
        cx: &EventContext<'_>,
        scan_code: ScanCode,
        key_code: KeyCode,
        modifiers: Modifiers,
    ) {
    }
    fn key_released(
        &self,
        cx: &EventContext<'_>,
        scan_code: ScanCode,
        key_code: KeyCode,
        modifiers: Modifiers,
    ) {
    }
    fn text_input(&self, cx: &EventContext<'_>, text: &str) {}
    fn sys_text_input(&self, cx: &EventContext<'_>, text: &str) {}
}

/// OS-side window owning the drawable surface.
pub trait PlatformWindow {
    fn surface_size(&self) -> Size;
    /// Mark `area` as needing a repaint.
    fn invalidate(&self, area: Rect);
    fn render(&self);
    /// Tear down the OS window.
    fn close(&self);
    /// Pointer position relative to the window.
    fn mouse_position(&self) -> Point;
}

/// Gets first refusal on keyboard input. Return `true` to consume the event.
#[allow(unused_variables)]
pub trait KeyboardGrabber {
    fn key_pressed(&self, scan_code: ScanCode, key_code: KeyCode, modifiers: Modifiers) -> bool {
        false
    }
    fn key_released(&self, scan_code: ScanCode, key_code: KeyCode, modifiers: Modifiers) -> bool {
        false
    }
    fn text_input(&self, text: &str) -> bool {
        false
    }
    fn sys_text_input(&self, text: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_client_parts() {
        assert!(WidgetPart::TitleBar.is_non_client());
        assert!(WidgetPart::Border.is_non_client());
        assert!(!WidgetPart::Client.is_non_client());
        assert!(!WidgetPart::Nowhere.is_non_client());
    }

    #[test]
    fn default_grabber_declines() {
        struct Passive;
        impl KeyboardGrabber for Passive {}
        let g = Passive;
        assert!(!g.key_pressed(ScanCode(1), KeyCode::Enter, Modifiers::NONE));
        assert!(!g.text_input("a"));
    }
}
