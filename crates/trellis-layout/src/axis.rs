#![forbid(unsafe_code)]

//! Axis abstraction shared by the box and grid solvers.
//!
//! The solver is written once against a "primary" axis (the one items are
//! stacked along) and an orthogonal axis. [`RowMajor`] maps the primary axis
//! to x/width, [`ColumnMajor`] to y/height. `x`/`cx` always mean primary,
//! `y`/`cy` always mean orthogonal.

use trellis_core::{Alignment, Point, Size, SizePolicy, SizePolicyKind, Weight};

use crate::Direction;
use crate::item::{ItemTypes, LayoutElement};

/// Primary/orthogonal accessors for one stacking direction.
pub trait AxisPolicy {
    const DIRECTION: Direction;

    /// Alignment bits that apply to orthogonal placement.
    const ALIGNMENT_MASK: Alignment;

    fn x(point: Point) -> u16;
    fn x_mut(point: &mut Point) -> &mut u16;
    fn y(point: Point) -> u16;
    fn y_mut(point: &mut Point) -> &mut u16;

    fn cx(size: Size) -> u16;
    fn cx_mut(size: &mut Size) -> &mut u16;
    fn cy(size: Size) -> u16;
    fn cy_mut(size: &mut Size) -> &mut u16;

    fn size_policy_x(policy: SizePolicy) -> SizePolicyKind;
    fn size_policy_y(policy: SizePolicy) -> SizePolicyKind;

    fn weight_x(weight: Weight) -> u32;

    /// Build a size from primary and orthogonal extents.
    fn size(cx: u16, cy: u16) -> Size {
        let mut size = Size::ZERO;
        *Self::cx_mut(&mut size) = cx;
        *Self::cy_mut(&mut size) = cy;
        size
    }

    /// Build a point from primary and orthogonal coordinates.
    fn point(x: u16, y: u16) -> Point {
        let mut point = Point::ZERO;
        *Self::x_mut(&mut point) = x;
        *Self::y_mut(&mut point) = y;
        point
    }

    /// Visible items whose kind is in `filter`.
    fn items_visible<E: LayoutElement>(items: &[E], filter: ItemTypes) -> usize {
        items
            .iter()
            .filter(|item| item.is_visible() && filter.intersects(item.item_type()))
            .count()
    }

    /// Visible non-spacer items with a zero minimum on either axis.
    ///
    /// These only matter once space is tight (`size` at or below the
    /// layout's own primary minimum) or when a spacer competes for the
    /// leftover; otherwise the count is zero.
    fn items_zero_sized<E: LayoutElement>(items: &[E], size: Size, layout_minimum: Size) -> usize {
        let has_spacer = items
            .iter()
            .any(|item| item.is_visible() && item.is_spacer());
        if Self::cx(size) > Self::cx(layout_minimum) && !has_spacer {
            return 0;
        }
        items
            .iter()
            .filter(|item| item.is_visible() && !item.is_spacer())
            .filter(|item| {
                let min = item.minimum_size();
                Self::cx(min) == 0 || Self::cy(min) == 0
            })
            .count()
    }
}

/// Items stacked left to right.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowMajor;

/// Items stacked top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMajor;

impl AxisPolicy for RowMajor {
    const DIRECTION: Direction = Direction::Horizontal;
    const ALIGNMENT_MASK: Alignment = Alignment::VERTICAL;

    #[inline]
    fn x(point: Point) -> u16 {
        point.x
    }
    #[inline]
    fn x_mut(point: &mut Point) -> &mut u16 {
        &mut point.x
    }
    #[inline]
    fn y(point: Point) -> u16 {
        point.y
    }
    #[inline]
    fn y_mut(point: &mut Point) -> &mut u16 {
        &mut point.y
    }
    #[inline]
    fn cx(size: Size) -> u16 {
        size.width
    }
    #[inline]
    fn cx_mut(size: &mut Size) -> &mut u16 {
        &mut size.width
    }
    #[inline]
    fn cy(size: Size) -> u16 {
        size.height
    }
    #[inline]
    fn cy_mut(size: &mut Size) -> &mut u16 {
        &mut size.height
    }
    #[inline]
    fn size_policy_x(policy: SizePolicy) -> SizePolicyKind {
        policy.horizontal
    }
    #[inline]
    fn size_policy_y(policy: SizePolicy) -> SizePolicyKind {
        policy.vertical
    }
    #[inline]
    fn weight_x(weight: Weight) -> u32 {
        weight.horizontal
    }
}

impl AxisPolicy for ColumnMajor {
    const DIRECTION: Direction = Direction::Vertical;
    const ALIGNMENT_MASK: Alignment = Alignment::HORIZONTAL;

    #[inline]
    fn x(point: Point) -> u16 {
        point.y
    }
    #[inline]
    fn x_mut(point: &mut Point) -> &mut u16 {
        &mut point.y
    }
    #[inline]
    fn y(point: Point) -> u16 {
        point.x
    }
    #[inline]
    fn y_mut(point: &mut Point) -> &mut u16 {
        &mut point.x
    }
    #[inline]
    fn cx(size: Size) -> u16 {
        size.height
    }
    #[inline]
    fn cx_mut(size: &mut Size) -> &mut u16 {
        &mut size.height
    }
    #[inline]
    fn cy(size: Size) -> u16 {
        size.width
    }
    #[inline]
    fn cy_mut(size: &mut Size) -> &mut u16 {
        &mut size.width
    }
    #[inline]
    fn size_policy_x(policy: SizePolicy) -> SizePolicyKind {
        policy.vertical
    }
    #[inline]
    fn size_policy_y(policy: SizePolicy) -> SizePolicyKind {
        policy.horizontal
    }
    #[inline]
    fn weight_x(weight: Weight) -> u32 {
        weight.vertical
    }
}
