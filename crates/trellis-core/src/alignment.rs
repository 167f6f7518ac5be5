#![forbid(unsafe_code)]

//! Alignment flags.
//!
//! A layout carries one [`Alignment`] value holding both a horizontal and a
//! vertical component. Each solver masks out the component that applies to
//! the axis it positions on.

use bitflags::bitflags;

bitflags! {
    /// Horizontal and vertical alignment bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Alignment: u16 {
        const LEFT    = 0b0000_0001;
        const RIGHT   = 0b0000_0010;
        const CENTRE  = 0b0000_0100;
        const TOP     = 0b0001_0000;
        const VCENTRE = 0b0010_0000;
        const BOTTOM  = 0b0100_0000;

        /// All horizontal bits.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits() | Self::CENTRE.bits();
        /// All vertical bits.
        const VERTICAL = Self::TOP.bits() | Self::VCENTRE.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::CENTRE | Self::VCENTRE
    }
}

/// Where an item sits inside a larger span on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisAlignment {
    #[default]
    Start,
    Centre,
    End,
}

impl AxisAlignment {
    /// Resolve the single-axis alignment selected by `mask`.
    ///
    /// Anything other than exactly one of the masked bits resolves to
    /// [`AxisAlignment::Start`].
    pub fn from_masked(alignment: Alignment, mask: Alignment) -> Self {
        let masked = alignment & mask;
        if masked == Alignment::RIGHT || masked == Alignment::BOTTOM {
            Self::End
        } else if masked == Alignment::CENTRE || masked == Alignment::VCENTRE {
            Self::Centre
        } else {
            Self::Start
        }
    }

    /// Offset of an item of `extent` inside `available`, never negative.
    ///
    /// Centring rounds up, so an odd remainder puts the extra unit before
    /// the item.
    #[inline]
    pub const fn offset(self, available: u16, extent: u16) -> u16 {
        let slack = available.saturating_sub(extent);
        match self {
            Self::Start => 0,
            Self::End => slack,
            Self::Centre => slack.div_ceil(2),
        }
    }
}
