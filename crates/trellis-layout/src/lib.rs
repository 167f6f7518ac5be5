#![forbid(unsafe_code)]

//! Layout items and solvers.
//!
//! This crate positions widgets inside a rectangle:
//!
//! - [`BoxLayout`] - items stacked along one axis, sharing space by weight
//! - [`GridLayout`] - items in rows and columns, with cell spans
//! - [`Spacer`] - an empty item that soaks up leftover space
//! - [`solver`] - the weighted distribution both layouts are built on
//!
//! Layouts own their items. Widgets are shared with the widget tree through
//! [`WidgetHandle`]s and receive their geometry via [`Widget::layout_as`].
//!
//! # Sizing
//!
//! Every item reports a [`SizePolicy`](trellis_core::SizePolicy) per axis:
//!
//! - `Fixed` and `Minimum` items get their minimum size.
//! - `Expanding` items share what is left in proportion to their
//!   [`Weight`](trellis_core::Weight), clamped to their minimum and maximum.
//!
//! ```ignore
//! use trellis_layout::{BoxLayout, Layout};
//!
//! let mut layout = BoxLayout::horizontal();
//! layout.add_widget(sidebar)?;   // Fixed, 10 wide
//! layout.add_widget(editor)?;    // Expanding
//! layout.add_widget(preview)?;   // Expanding
//! layout.layout_items(Point::ZERO, Size::new(110, 40));
//! // sidebar: 10, editor: 50, preview: 50
//! ```

pub mod axis;
pub mod box_layout;
pub mod bresenham;
pub mod config;
pub mod error;
pub mod grid;
pub mod item;
pub mod solver;
pub mod spacer;

pub use axis::{AxisPolicy, ColumnMajor, RowMajor};
pub use box_layout::BoxLayout;
pub use config::LayoutDefaults;
pub use error::{LayoutError, Result};
pub use grid::{CellCoord, GridDimensions, GridLayout, GridSpan, MAX_GRID_LINES};
pub use item::{
    DeviceMetrics, ItemKind, ItemTypes, Layout, LayoutElement, LayoutId, LayoutItem, LayoutOwner,
    OwnerHandle, Widget, WidgetHandle, same_widget,
};
pub use solver::{AxisRequest, Disposition, Distribution, SolveParams, distribute};
pub use spacer::{ExpansionPolicy, Spacer};
pub use trellis_core::geometry::{Point, Rect, Sides, Size};

/// Stacking direction of a box layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
}
