#![forbid(unsafe_code)]

//! trellis public facade crate.
//!
//! Re-exports the layout engine and the native window dispatcher, and
//! offers a single [`Error`] covering both plus a prelude for day-to-day
//! usage.

use thiserror::Error;

// --- Core re-exports -------------------------------------------------------

pub use trellis_core::{
    Alignment, AxisAlignment, Point, Rect, Sides, Size, SizePolicy, SizePolicyKind, Weight,
};

// --- Layout re-exports -----------------------------------------------------

pub use trellis_layout::{
    BoxLayout, CellCoord, Direction, GridDimensions, GridLayout, GridSpan, Layout,
    LayoutDefaults, LayoutError, LayoutItem, LayoutOwner, Spacer, Widget, WidgetHandle,
};

// --- Window re-exports -----------------------------------------------------

#[cfg(feature = "window")]
pub use trellis_window::{
    EventContext, KeyboardGrabber, NativeEvent, NativeWindow, NativeWindowConfig, PlatformWindow,
    SurfaceWindow, WidgetPart, WindowError, WindowEvent,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for trellis apps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[cfg(feature = "window")]
    #[error(transparent)]
    Window(#[from] WindowError),
}

/// Standard result type for trellis APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, BoxLayout, Error, GridLayout, Layout, Point, Rect, Result, Sides, Size,
        SizePolicy, Spacer, Weight, Widget, WidgetHandle,
    };

    #[cfg(feature = "window")]
    pub use crate::{NativeWindow, SurfaceWindow, WindowEvent};

    pub use crate::{core, layout};
    #[cfg(feature = "window")]
    pub use crate::window;
}

pub use trellis_core as core;
pub use trellis_layout as layout;
#[cfg(feature = "window")]
pub use trellis_window as window;
