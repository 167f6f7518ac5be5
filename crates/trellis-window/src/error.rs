#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised by a [`NativeWindow`](crate::NativeWindow).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("no current event: the window is not dispatching")]
    NoCurrentEvent,
}

pub type Result<T> = std::result::Result<T, WindowError>;
