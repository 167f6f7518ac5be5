#![forbid(unsafe_code)]

//! Core: geometry, size policies, alignment, and native event types.

pub mod alignment;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod size_policy;

pub use alignment::{Alignment, AxisAlignment};
pub use geometry::{Point, Rect, Sides, Size};
pub use size_policy::{SizePolicy, SizePolicyKind, Weight};
