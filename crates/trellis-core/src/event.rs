#![forbid(unsafe_code)]

//! Native window event types.
//!
//! These are the events a platform window hands to its native window object.
//! They are grouped into four categories, each routed to a different family
//! of surface-window notifications:
//!
//! - [`WindowEvent`]: paint, close, resize, enter/leave, focus, title.
//! - [`MouseEvent`] in the client area ([`NativeEvent::Mouse`]).
//! - [`MouseEvent`] in the non-client area ([`NativeEvent::NonClientMouse`]).
//! - [`KeyboardEvent`]: key presses/releases and text input.

use bitflags::bitflags;

use crate::geometry::{Point, Size};

/// A queued native event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    Window(WindowEvent),
    Mouse(MouseEvent),
    NonClientMouse(MouseEvent),
    Keyboard(KeyboardEvent),
}

impl NativeEvent {
    /// The window event kind, if this is a window event.
    #[must_use]
    pub fn window_kind(&self) -> Option<WindowEventKind> {
        match self {
            Self::Window(event) => Some(event.kind()),
            _ => None,
        }
    }

    /// True if this is a window event of the given kind.
    #[inline]
    #[must_use]
    pub fn is_window(&self, kind: WindowEventKind) -> bool {
        self.window_kind() == Some(kind)
    }

    /// Short category label for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Window(_) => "window",
            Self::Mouse(_) => "mouse",
            Self::NonClientMouse(_) => "non_client_mouse",
            Self::Keyboard(_) => "keyboard",
        }
    }
}

impl From<WindowEvent> for NativeEvent {
    fn from(event: WindowEvent) -> Self {
        Self::Window(event)
    }
}

impl From<KeyboardEvent> for NativeEvent {
    fn from(event: KeyboardEvent) -> Self {
        Self::Keyboard(event)
    }
}

/// Window-level events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The surface needs repainting.
    Paint,
    /// The user or system asked the window to close.
    Close,
    /// An interactive resize is in progress.
    Resizing(Size),
    /// An interactive resize finished.
    Resized(Size),
    /// The surface size changed for any other reason.
    SizeChanged(Size),
    /// Pointer entered the client area.
    Enter(Point),
    /// Pointer left the client area.
    Leave,
    /// Pointer entered the non-client area (title bar, borders).
    NonClientEnter(Point),
    /// Pointer left the non-client area.
    NonClientLeave,
    FocusGained,
    FocusLost,
    TitleTextChanged,
}

/// Fieldless discriminant of [`WindowEvent`], used for coalescing and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    Paint,
    Close,
    Resizing,
    Resized,
    SizeChanged,
    Enter,
    Leave,
    NonClientEnter,
    NonClientLeave,
    FocusGained,
    FocusLost,
    TitleTextChanged,
}

impl WindowEvent {
    #[must_use]
    pub const fn kind(&self) -> WindowEventKind {
        match self {
            Self::Paint => WindowEventKind::Paint,
            Self::Close => WindowEventKind::Close,
            Self::Resizing(_) => WindowEventKind::Resizing,
            Self::Resized(_) => WindowEventKind::Resized,
            Self::SizeChanged(_) => WindowEventKind::SizeChanged,
            Self::Enter(_) => WindowEventKind::Enter,
            Self::Leave => WindowEventKind::Leave,
            Self::NonClientEnter(_) => WindowEventKind::NonClientEnter,
            Self::NonClientLeave => WindowEventKind::NonClientLeave,
            Self::FocusGained => WindowEventKind::FocusGained,
            Self::FocusLost => WindowEventKind::FocusLost,
            Self::TitleTextChanged => WindowEventKind::TitleTextChanged,
        }
    }
}

impl WindowEventKind {
    /// Kinds where only the most recent queued instance is kept.
    #[inline]
    #[must_use]
    pub const fn is_coalesced(self) -> bool {
        matches!(self, Self::Resized | Self::SizeChanged)
    }
}

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

bitflags! {
    /// Which wheel(s) a scroll event came from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MouseWheel: u8 {
        const VERTICAL   = 0b01;
        const HORIZONTAL = 0b10;
    }
}

/// Signed wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WheelDelta {
    pub dx: i32,
    pub dy: i32,
}

impl WheelDelta {
    #[inline]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// The type of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    WheelScrolled { wheel: MouseWheel, delta: WheelDelta },
    ButtonPressed(MouseButton),
    ButtonDoubleClicked(MouseButton),
    ButtonReleased(MouseButton),
    Moved,
}

/// A mouse event, client or non-client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub position: Point,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Hardware scan code reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScanCode(pub u32);

/// Logical key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key (F1-F24).
    F(u8),
    Unknown,
}

/// Keyboard events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    KeyPressed {
        scan_code: ScanCode,
        key_code: KeyCode,
        modifiers: Modifiers,
    },
    KeyReleased {
        scan_code: ScanCode,
        key_code: KeyCode,
        modifiers: Modifiers,
    },
    /// Composed text from the input method.
    TextInput(String),
    /// Text produced while a system modifier (Alt) was held.
    SysTextInput(String),
}

impl KeyboardEvent {
    /// Key press with no modifiers.
    #[must_use]
    pub const fn pressed(key_code: KeyCode) -> Self {
        Self::KeyPressed {
            scan_code: ScanCode(0),
            key_code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Key release with no modifiers.
    #[must_use]
    pub const fn released(key_code: KeyCode) -> Self {
        Self::KeyReleased {
            scan_code: ScanCode(0),
            key_code,
            modifiers: Modifiers::NONE,
        }
    }
}
