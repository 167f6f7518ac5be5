#![forbid(unsafe_code)]

//! Layout contract violations.

use thiserror::Error;

/// Errors raised by layout and spacer operations.
///
/// Every variant is a caller-side contract violation; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("item already added to this layout")]
    ItemAlreadyAdded,
    #[error("grid cell ({row}, {column}) is unoccupied")]
    CellUnoccupied { row: u32, column: u32 },
    #[error("item at grid cell ({row}, {column}) is not a widget")]
    NotAWidget { row: u32, column: u32 },
    #[error("item at grid cell ({row}, {column}) is not a layout")]
    NotALayout { row: u32, column: u32 },
    #[error("grid cell ({row}, {column}) is outside the addressable grid")]
    CellOutOfRange { row: u32, column: u32 },
    #[error("spacer has no parent layout")]
    NoParent,
    #[error("device metrics are not available")]
    NoDeviceMetrics,
    #[error("item index {index} out of range for layout with {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
