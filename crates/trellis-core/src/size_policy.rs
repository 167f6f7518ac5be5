#![forbid(unsafe_code)]

//! Per-axis sizing rules consumed by the layout solvers.

/// How a layout item wants to be sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizePolicyKind {
    /// Always exactly the item's minimum size.
    Fixed,
    /// The item's minimum size; never grows into leftover space.
    #[default]
    Minimum,
    /// Competes for leftover space in proportion to its weight, bounded by
    /// its minimum and maximum.
    Expanding,
}

/// Horizontal and vertical size policy of a layout item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePolicy {
    pub horizontal: SizePolicyKind,
    pub vertical: SizePolicyKind,
}

impl SizePolicy {
    /// Fixed on both axes.
    pub const FIXED: Self = Self::uniform(SizePolicyKind::Fixed);
    /// Minimum on both axes.
    pub const MINIMUM: Self = Self::uniform(SizePolicyKind::Minimum);
    /// Expanding on both axes.
    pub const EXPANDING: Self = Self::uniform(SizePolicyKind::Expanding);

    #[inline]
    pub const fn new(horizontal: SizePolicyKind, vertical: SizePolicyKind) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Same policy on both axes.
    #[inline]
    pub const fn uniform(kind: SizePolicyKind) -> Self {
        Self::new(kind, kind)
    }

    #[must_use]
    pub const fn with_horizontal(mut self, kind: SizePolicyKind) -> Self {
        self.horizontal = kind;
        self
    }

    #[must_use]
    pub const fn with_vertical(mut self, kind: SizePolicyKind) -> Self {
        self.vertical = kind;
        self
    }

    /// True when both axes are [`SizePolicyKind::Fixed`].
    #[inline]
    pub const fn is_fixed(&self) -> bool {
        matches!(self.horizontal, SizePolicyKind::Fixed)
            && matches!(self.vertical, SizePolicyKind::Fixed)
    }
}

/// Relative share of leftover space an expanding item receives, per axis.
///
/// Weights are integers so that proportional shares can be computed exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Weight {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Weight {
    /// Unit weight on both axes.
    pub const ONE: Self = Self::splat(1);

    #[inline]
    pub const fn new(horizontal: u32, vertical: u32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    #[inline]
    pub const fn splat(value: u32) -> Self {
        Self::new(value, value)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}
