#![forbid(unsafe_code)]

//! Native window event queue and dispatch.
//!
//! # Key Components
//!
//! - [`NativeWindow`] - FIFO event queue with resize coalescing and a
//!   re-entrant dispatcher
//! - [`SurfaceWindow`] - toolkit-side notifications, one per event kind
//! - [`PlatformWindow`] - the OS surface: size, invalidation, rendering
//! - [`KeyboardGrabber`] - first refusal on keyboard input
//! - [`NativeWindowConfig`] - poll interval and coalescing switches
//!
//! # Example
//!
//! ```ignore
//! use trellis_window::{NativeWindow, WindowEvent};
//!
//! let window = NativeWindow::new(surface, platform);
//! window.push_event(WindowEvent::Resized(Size::new(80, 24)));
//! window.push_event(WindowEvent::Resized(Size::new(100, 30))); // replaces the first
//! window.pump_events();
//! ```

pub mod config;
pub mod error;
pub mod liveness;
pub mod surface;
pub mod window;

pub use config::{NON_CLIENT_POLL_ENV_VAR, NativeWindowConfig};
pub use error::{Result, WindowError};
pub use liveness::Liveness;
pub use surface::{EventContext, KeyboardGrabber, PlatformWindow, SurfaceWindow, WidgetPart};
pub use trellis_core::event::{
    KeyCode, KeyboardEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind, MouseWheel,
    NativeEvent, ScanCode, WheelDelta, WindowEvent, WindowEventKind,
};
pub use window::{EventFilter, NativeWindow};
