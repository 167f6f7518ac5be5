#![forbid(unsafe_code)]

//! Defaults applied by layout constructors.

use trellis_core::{Alignment, Sides, Size};

use crate::solver::SolveParams;

/// Spacing, margins and alignment a new layout starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDefaults {
    /// Gap between adjacent items.
    pub spacing: Size,
    /// Inset from the layout's allotted rectangle.
    pub margins: Sides,
    pub alignment: Alignment,
    /// Put spacing next to spacers too.
    pub always_use_spacing: bool,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            spacing: Size::ZERO,
            margins: Sides::default(),
            alignment: Alignment::default(),
            always_use_spacing: false,
        }
    }
}

impl LayoutDefaults {
    #[must_use]
    pub fn with_spacing(mut self, spacing: Size) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.margins = margins.into();
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_always_use_spacing(mut self, always: bool) -> Self {
        self.always_use_spacing = always;
        self
    }

    pub(crate) fn params(&self) -> SolveParams {
        SolveParams {
            margins: self.margins,
            spacing: self.spacing,
            alignment: self.alignment,
            always_use_spacing: self.always_use_spacing,
        }
    }
}
