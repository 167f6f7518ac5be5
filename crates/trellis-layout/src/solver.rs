#![forbid(unsafe_code)]

//! One-dimensional weighted space distribution.
//!
//! [`distribute`] decides how much of the primary axis each item gets;
//! [`solve`] turns that into positions and calls `layout_as` on every
//! visible item. Both run unchanged for horizontal and vertical stacking
//! through an [`AxisPolicy`].
//!
//! # Algorithm
//!
//! 1. Fixed and Minimum items take their minimum straight away.
//! 2. Expanding items are candidates for a weighted share of what is left.
//!    A candidate whose share would fall outside `(min, max)` is pinned to
//!    the bound it hit and its weight leaves the pool. Minimum pins are
//!    taken before maximum pins, and this repeats until a full pass pins
//!    nothing.
//! 3. The remaining candidates split the leftover by weight. Floors are
//!    taken first and the remainder is spread one unit at a time with a
//!    [`BresenhamCounter`], so the shares sum to the leftover exactly.

use trellis_core::{Alignment, AxisAlignment, Point, Sides, Size, SizePolicyKind};
use tracing::trace;

use crate::axis::AxisPolicy;
use crate::bresenham::BresenhamCounter;
use crate::item::{ItemTypes, LayoutElement};

/// How an item's primary extent was decided in the last pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Disposition {
    #[default]
    Unknown,
    /// Received a weighted share of the leftover.
    Weighted,
    /// Held at its minimum.
    Unweighted,
    /// Its share reached its maximum.
    TooSmall,
    FixedSize,
}

/// One item's primary-axis constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRequest {
    pub minimum: u16,
    pub maximum: u16,
    pub policy: SizePolicyKind,
    pub weight: u32,
}

impl AxisRequest {
    pub const fn expanding(minimum: u16, maximum: u16, weight: u32) -> Self {
        Self {
            minimum,
            maximum,
            policy: SizePolicyKind::Expanding,
            weight,
        }
    }

    pub const fn fixed(extent: u16) -> Self {
        Self {
            minimum: extent,
            maximum: extent,
            policy: SizePolicyKind::Fixed,
            weight: 1,
        }
    }

    /// Maximum, raised to the minimum when the two cross.
    #[inline]
    const fn upper(&self) -> u16 {
        if self.maximum < self.minimum {
            self.minimum
        } else {
            self.maximum
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pin {
    Minimum,
    Maximum,
}

impl Pin {
    /// Pin `request` if its share of `leftover` falls outside `(min, max)`.
    ///
    /// share = weight * leftover / total, compared without dividing.
    fn check(
        self,
        request: &AxisRequest,
        leftover: u16,
        total: u64,
    ) -> Option<(Disposition, u16)> {
        let weighted = u64::from(request.weight) * u64::from(leftover);
        match self {
            Self::Minimum => {
                let above_min = total > 0 && weighted > u64::from(request.minimum) * total;
                (!above_min).then_some((Disposition::Unweighted, request.minimum))
            }
            Self::Maximum => {
                let below_max = weighted < u64::from(request.upper()) * total;
                (!below_max).then_some((Disposition::TooSmall, request.upper()))
            }
        }
    }
}

/// Result of [`distribute`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Distribution {
    pub dispositions: Vec<Disposition>,
    pub extents: Vec<u16>,
    /// Space shared among the Weighted items.
    pub leftover: u16,
}

/// Split `available` among `requests` along one axis.
pub fn distribute(requests: &[AxisRequest], available: u16) -> Distribution {
    let count = requests.len();
    let mut dispositions = vec![Disposition::Unknown; count];
    let mut extents = vec![0u16; count];
    let mut leftover = available;
    let mut consumed: u32 = 0;
    let mut total_weight: u64 = 0;
    let mut candidates = 0usize;

    for (i, request) in requests.iter().enumerate() {
        let disposition = match request.policy {
            SizePolicyKind::Fixed => Disposition::FixedSize,
            SizePolicyKind::Minimum => Disposition::Unweighted,
            SizePolicyKind::Expanding => {
                candidates += 1;
                total_weight += u64::from(request.weight);
                continue;
            }
        };
        dispositions[i] = disposition;
        extents[i] = request.minimum;
        leftover = leftover.saturating_sub(request.minimum);
        consumed += u32::from(request.minimum);
    }
    debug_assert_eq!(
        u32::from(leftover),
        u32::from(available).saturating_sub(consumed)
    );

    let mut done = false;
    while !done && candidates > 0 {
        done = true;
        // Minimum pins first: the remaining minimums then always fit.
        for pass in [Pin::Minimum, Pin::Maximum] {
            for (i, request) in requests.iter().enumerate() {
                if dispositions[i] != Disposition::Unknown {
                    continue;
                }
                let Some((disposition, extent)) = pass.check(request, leftover, total_weight)
                else {
                    continue;
                };
                dispositions[i] = disposition;
                extents[i] = extent;
                leftover = leftover.saturating_sub(extent);
                consumed += u32::from(extent);
                total_weight -= u64::from(request.weight);
                candidates -= 1;
                done = false;
                debug_assert_eq!(
                    u32::from(leftover),
                    u32::from(available).saturating_sub(consumed)
                );
            }
            if !done {
                break;
            }
        }
    }

    let weighted = dispositions
        .iter()
        .filter(|d| **d == Disposition::Unknown)
        .count();
    if weighted > 0 {
        let mut floors: u64 = 0;
        for (i, request) in requests.iter().enumerate() {
            if dispositions[i] != Disposition::Unknown {
                continue;
            }
            let share = u64::from(request.weight) * u64::from(leftover) / total_weight;
            floors += share;
            extents[i] = u16::try_from(share).unwrap_or(u16::MAX);
            dispositions[i] = Disposition::Weighted;
        }
        let residual = u64::from(leftover).saturating_sub(floors);
        let mut counter = BresenhamCounter::new(residual, weighted as u64);
        let mut previous = 0;
        for (i, extent) in extents.iter_mut().enumerate() {
            if dispositions[i] != Disposition::Weighted {
                continue;
            }
            let current = counter.advance();
            let bit = u16::try_from(current - previous).unwrap_or(0);
            previous = current;
            *extent = extent.saturating_add(bit);
        }
    }

    Distribution {
        dispositions,
        extents,
        leftover,
    }
}

/// Per-pass layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveParams {
    pub margins: Sides,
    pub spacing: Size,
    pub alignment: Alignment,
    /// Put spacing next to spacers too.
    pub always_use_spacing: bool,
}

#[inline]
fn gaps(spaces: usize, spacing: u16) -> u16 {
    if spaces <= 1 {
        return 0;
    }
    let count = u16::try_from(spaces - 1).unwrap_or(u16::MAX);
    spacing.saturating_mul(count)
}

/// Lay out `items` inside `size` at `position` along `A`'s primary axis.
///
/// `layout_minimum` is the owning layout's own minimum size, which decides
/// whether zero-sized items give up their spacing gap.
pub fn solve<A: AxisPolicy, E: LayoutElement>(
    items: &mut [E],
    params: &SolveParams,
    position: Point,
    size: Size,
    layout_minimum: Size,
) {
    let visible_all = A::items_visible(items, ItemTypes::all());
    if visible_all == 0 {
        return;
    }
    let visible = A::items_visible(items, ItemTypes::CONTENT);
    let zero_sized = A::items_zero_sized(items, size, layout_minimum);
    let counted = if params.always_use_spacing {
        visible_all
    } else {
        visible
    };
    let spaces = counted.saturating_sub(zero_sized);
    let spacing = A::cx(params.spacing);

    let available = size.shrink(params.margins);
    let available_x = A::cx(available).saturating_sub(gaps(spaces, spacing));
    let available_y = A::cy(available);

    let mut slots = Vec::with_capacity(visible_all);
    let mut requests = Vec::with_capacity(visible_all);
    for (index, item) in items.iter().enumerate() {
        if !item.is_visible() {
            continue;
        }
        let minimum = item.minimum_size();
        let maximum = item.maximum_size();
        slots.push(index);
        requests.push(AxisRequest {
            minimum: A::cx(minimum),
            maximum: A::cx(maximum),
            policy: A::size_policy_x(item.size_policy()),
            weight: A::weight_x(item.weight()),
        });
    }
    let distribution = distribute(&requests, available_x);
    trace!(
        direction = ?A::DIRECTION,
        items = visible_all,
        spaces,
        available = available_x,
        leftover = distribution.leftover,
        "box layout distribution"
    );

    let origin = position + params.margins.top_left();
    let alignment = AxisAlignment::from_masked(params.alignment, A::ALIGNMENT_MASK);
    let mut cursor = A::x(origin);
    for (slot, &index) in slots.iter().enumerate() {
        let item = &mut items[index];
        let minimum = item.minimum_size();
        let maximum = item.maximum_size().max(minimum);
        let cy = A::cy(minimum).max(available_y).min(A::cy(maximum));
        let cx = distribution.extents[slot];
        let y = A::y(origin).saturating_add(alignment.offset(available_y, cy));
        item.layout_as(A::point(cursor, y), A::size(cx, cy));

        let is_spacer = item.is_spacer();
        if !is_spacer && (cx == 0 || cy == 0) {
            continue;
        }
        cursor = cursor.saturating_add(cx);
        if !is_spacer || params.always_use_spacing {
            cursor = cursor.saturating_add(spacing);
        }
    }
}

/// Smallest size that fits every visible item, margins and spacing included.
pub fn minimum_extent<A: AxisPolicy, E: LayoutElement>(items: &[E], params: &SolveParams) -> Size {
    if A::items_visible(items, ItemTypes::CONTENT) == 0 {
        return Size::ZERO;
    }
    let mut cx: u16 = 0;
    let mut cy: u16 = 0;
    let mut zero_sized = 0usize;
    for item in items.iter().filter(|item| item.is_visible()) {
        let minimum = item.minimum_size();
        if !item.is_spacer() && (A::cx(minimum) == 0 || A::cy(minimum) == 0) {
            zero_sized += 1;
            continue;
        }
        cx = cx.saturating_add(A::cx(minimum));
        cy = cy.max(A::cy(minimum));
    }
    let counted = if params.always_use_spacing {
        A::items_visible(items, ItemTypes::all())
    } else {
        A::items_visible(items, ItemTypes::CONTENT)
    };
    let spaces = counted.saturating_sub(zero_sized);
    cx = cx.saturating_add(gaps(spaces, A::cx(params.spacing)));
    A::size(cx, cy).grow(params.margins)
}

/// Largest size the visible items can use, saturating at [`Size::MAX`].
pub fn maximum_extent<A: AxisPolicy, E: LayoutElement>(items: &[E], params: &SolveParams) -> Size {
    let visible_all = A::items_visible(items, ItemTypes::all());
    if visible_all == 0 {
        return Size::MAX;
    }
    let mut cx: u16 = 0;
    let mut cy: u16 = 0;
    for item in items.iter().filter(|item| item.is_visible()) {
        let maximum = item.maximum_size().max(item.minimum_size());
        cx = cx.saturating_add(A::cx(maximum));
        cy = cy.max(A::cy(maximum));
    }
    let counted = if params.always_use_spacing {
        visible_all
    } else {
        A::items_visible(items, ItemTypes::CONTENT)
    };
    cx = cx.saturating_add(gaps(counted, A::cx(params.spacing)));
    A::size(cx, cy).grow(params.margins)
}

#[cfg(test)]
mod tests {
    use trellis_core::{SizePolicy, Weight};

    use super::*;
    use crate::axis::{ColumnMajor, RowMajor};

    #[derive(Debug, Clone)]
    struct Probe {
        policy: SizePolicy,
        weight: Weight,
        min: Size,
        max: Size,
        spacer: bool,
        visible: bool,
        placed: Option<(Point, Size)>,
    }

    impl Probe {
        fn new(policy: SizePolicy, min: Size) -> Self {
            Self {
                policy,
                weight: Weight::ONE,
                min,
                max: Size::MAX,
                spacer: false,
                visible: true,
                placed: None,
            }
        }

        fn max(mut self, max: Size) -> Self {
            self.max = max;
            self
        }
    }

    impl LayoutElement for Probe {
        fn item_type(&self) -> ItemTypes {
            if self.spacer {
                ItemTypes::SPACER
            } else {
                ItemTypes::WIDGET
            }
        }
        fn is_visible(&self) -> bool {
            self.visible
        }
        fn size_policy(&self) -> SizePolicy {
            self.policy
        }
        fn weight(&self) -> Weight {
            self.weight
        }
        fn minimum_size(&self) -> Size {
            self.min
        }
        fn maximum_size(&self) -> Size {
            self.max
        }
        fn layout_as(&mut self, position: Point, size: Size) {
            self.placed = Some((position, size));
        }
    }

    #[test]
    fn fixed_then_two_expanding() {
        let requests = [
            AxisRequest::fixed(10),
            AxisRequest::expanding(0, u16::MAX, 1),
            AxisRequest::expanding(0, u16::MAX, 1),
        ];
        let d = distribute(&requests, 110);
        assert_eq!(d.extents, vec![10, 50, 50]);
        assert_eq!(
            d.dispositions,
            vec![
                Disposition::FixedSize,
                Disposition::Weighted,
                Disposition::Weighted
            ]
        );
        assert_eq!(d.leftover, 100);
    }

    #[test]
    fn remainder_is_spread_exactly() {
        let requests = [AxisRequest::expanding(0, u16::MAX, 1); 3];
        let d = distribute(&requests, 100);
        assert_eq!(d.extents.iter().map(|e| u32::from(*e)).sum::<u32>(), 100);
        let lo = d.extents.iter().min().copied().unwrap_or(0);
        let hi = d.extents.iter().max().copied().unwrap_or(0);
        assert!(hi - lo <= 1);
    }

    #[test]
    fn maximum_pins_item_and_frees_space() {
        let requests = [
            AxisRequest::expanding(0, 20, 1),
            AxisRequest::expanding(0, u16::MAX, 1),
        ];
        let d = distribute(&requests, 100);
        assert_eq!(d.dispositions[0], Disposition::TooSmall);
        assert_eq!(d.extents, vec![20, 80]);
    }

    #[test]
    fn minimum_pins_item() {
        let requests = [
            AxisRequest::expanding(70, u16::MAX, 1),
            AxisRequest::expanding(0, u16::MAX, 1),
        ];
        let d = distribute(&requests, 100);
        assert_eq!(d.dispositions[0], Disposition::Unweighted);
        assert_eq!(d.extents, vec![70, 30]);
    }

    #[test]
    fn zero_total_weight_never_divides() {
        let requests = [
            AxisRequest::expanding(3, u16::MAX, 0),
            AxisRequest::expanding(0, 0, 0),
        ];
        let d = distribute(&requests, 50);
        assert_eq!(d.extents, vec![3, 0]);
        assert_eq!(d.dispositions, vec![Disposition::Unweighted; 2]);
    }

    #[test]
    fn minimum_pins_before_maximum_pins() {
        let requests = [
            AxisRequest::expanding(0, 6, 9),
            AxisRequest::expanding(8, u16::MAX, 1),
        ];
        let d = distribute(&requests, 10);
        assert_eq!(d.extents, vec![2, 8]);
        assert!(d.extents.iter().map(|e| u32::from(*e)).sum::<u32>() <= 10);
    }

    #[test]
    fn leftover_clamps_at_zero() {
        let requests = [AxisRequest::fixed(30), AxisRequest::fixed(30)];
        let d = distribute(&requests, 40);
        assert_eq!(d.leftover, 0);
        assert_eq!(d.extents, vec![30, 30]);
    }

    #[test]
    fn solve_places_items_left_to_right() {
        let mut items = vec![
            Probe::new(SizePolicy::FIXED, Size::new(10, 1)),
            Probe::new(SizePolicy::EXPANDING, Size::new(0, 1)),
            Probe::new(SizePolicy::EXPANDING, Size::new(0, 1)),
        ];
        let params = SolveParams::default();
        solve::<RowMajor, _>(&mut items, &params, Point::ZERO, Size::new(110, 5), Size::ZERO);
        let xs: Vec<_> = items.iter().filter_map(|p| p.placed).map(|(p, _)| p.x).collect();
        let ws: Vec<_> = items.iter().filter_map(|p| p.placed).map(|(_, s)| s.width).collect();
        assert_eq!(xs, vec![0, 10, 60]);
        assert_eq!(ws, vec![10, 50, 50]);
    }

    #[test]
    fn orthogonal_centre_offset() {
        let mut items = vec![Probe::new(SizePolicy::FIXED, Size::new(10, 4)).max(Size::new(10, 4))];
        let params = SolveParams {
            alignment: Alignment::VCENTRE,
            ..SolveParams::default()
        };
        solve::<RowMajor, _>(&mut items, &params, Point::ZERO, Size::new(20, 10), Size::ZERO);
        assert_eq!(items[0].placed, Some((Point::new(0, 3), Size::new(10, 4))));
    }

    #[test]
    fn spacing_and_margins_are_reserved() {
        let mut items = vec![
            Probe::new(SizePolicy::EXPANDING, Size::new(1, 1)),
            Probe::new(SizePolicy::EXPANDING, Size::new(1, 1)),
        ];
        let params = SolveParams {
            margins: Sides::all(2),
            spacing: Size::splat(4),
            ..SolveParams::default()
        };
        solve::<ColumnMajor, _>(&mut items, &params, Point::new(10, 10), Size::new(8, 28), Size::ZERO);
        // 28 - 4 margin - 4 spacing = 20, split 10/10
        assert_eq!(items[0].placed, Some((Point::new(12, 12), Size::new(4, 10))));
        assert_eq!(items[1].placed, Some((Point::new(12, 26), Size::new(4, 10))));
    }

    #[test]
    fn invisible_items_are_skipped() {
        let mut hidden = Probe::new(SizePolicy::FIXED, Size::new(5, 5));
        hidden.visible = false;
        let mut items = vec![hidden, Probe::new(SizePolicy::EXPANDING, Size::new(1, 1))];
        solve::<RowMajor, _>(
            &mut items,
            &SolveParams::default(),
            Point::ZERO,
            Size::new(30, 3),
            Size::ZERO,
        );
        assert_eq!(items[0].placed, None);
        assert_eq!(items[1].placed.map(|(_, s)| s.width), Some(30));
    }

    #[test]
    fn no_visible_items_is_a_no_op() {
        let mut items: Vec<Probe> = Vec::new();
        solve::<RowMajor, _>(
            &mut items,
            &SolveParams::default(),
            Point::ZERO,
            Size::new(30, 3),
            Size::ZERO,
        );
        assert_eq!(minimum_extent::<RowMajor, Probe>(&items, &SolveParams::default()), Size::ZERO);
        assert_eq!(maximum_extent::<RowMajor, Probe>(&items, &SolveParams::default()), Size::MAX);
    }

    #[test]
    fn minimum_extent_sums_primary_and_maxes_orthogonal() {
        let items = vec![
            Probe::new(SizePolicy::FIXED, Size::new(10, 2)),
            Probe::new(SizePolicy::EXPANDING, Size::new(5, 7)),
        ];
        let params = SolveParams {
            margins: Sides::all(1),
            spacing: Size::splat(3),
            ..SolveParams::default()
        };
        assert_eq!(minimum_extent::<RowMajor, _>(&items, &params), Size::new(20, 9));
        assert_eq!(minimum_extent::<ColumnMajor, _>(&items, &params), Size::new(12, 14));
    }

    #[test]
    fn maximum_extent_saturates() {
        let items = vec![
            Probe::new(SizePolicy::FIXED, Size::new(10, 2)).max(Size::new(10, 2)),
            Probe::new(SizePolicy::EXPANDING, Size::new(5, 7)),
        ];
        assert_eq!(
            maximum_extent::<RowMajor, _>(&items, &SolveParams::default()),
            Size::MAX
        );
    }
}
