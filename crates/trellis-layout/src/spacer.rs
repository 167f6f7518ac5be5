#![forbid(unsafe_code)]

//! Spacers: sizeless items that soak up leftover space.

use bitflags::bitflags;
use trellis_core::{Point, Rect, Size, SizePolicy, SizePolicyKind, Weight};

use crate::error::{LayoutError, Result};
use crate::item::{DeviceMetrics, ItemTypes, LayoutElement, LayoutId, OwnerHandle};

bitflags! {
    /// Axes along which a spacer expands.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExpansionPolicy: u8 {
        const HORIZONTAL = 0b01;
        const VERTICAL   = 0b10;
    }
}

/// An empty item that expands along the axes in its [`ExpansionPolicy`].
///
/// Explicit overrides win over the values derived from the policy. Setters
/// ask the owner for a new pass only when the value changes and the spacer
/// is attached to a layout.
#[derive(Clone, Default)]
pub struct Spacer {
    expansion: ExpansionPolicy,
    size_policy: Option<SizePolicy>,
    weight: Option<Weight>,
    minimum_size: Option<Size>,
    maximum_size: Option<Size>,
    geometry: Rect,
    parent: Option<LayoutId>,
    owner: Option<OwnerHandle>,
}

impl std::fmt::Debug for Spacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spacer")
            .field("expansion", &self.expansion)
            .field("geometry", &self.geometry)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl Spacer {
    pub fn new(expansion: ExpansionPolicy) -> Self {
        Self {
            expansion,
            ..Self::default()
        }
    }

    /// Expands horizontally only.
    pub fn horizontal() -> Self {
        Self::new(ExpansionPolicy::HORIZONTAL)
    }

    /// Expands vertically only.
    pub fn vertical() -> Self {
        Self::new(ExpansionPolicy::VERTICAL)
    }

    /// Expands both ways.
    pub fn expanding() -> Self {
        Self::new(ExpansionPolicy::all())
    }

    #[must_use]
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_minimum_size(mut self, size: Size) -> Self {
        self.minimum_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_maximum_size(mut self, size: Size) -> Self {
        self.maximum_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = Some(policy);
        self
    }

    pub fn expansion_policy(&self) -> ExpansionPolicy {
        self.expansion
    }

    pub fn set_expansion_policy(&mut self, expansion: ExpansionPolicy) {
        if self.expansion != expansion {
            self.expansion = expansion;
            self.request_layout();
        }
    }

    pub fn has_size_policy(&self) -> bool {
        self.size_policy.is_some()
    }

    pub fn size_policy(&self) -> SizePolicy {
        if let Some(policy) = self.size_policy {
            return policy;
        }
        let kind = |axis: ExpansionPolicy| {
            if self.expansion.contains(axis) {
                SizePolicyKind::Expanding
            } else {
                SizePolicyKind::Minimum
            }
        };
        SizePolicy::new(
            kind(ExpansionPolicy::HORIZONTAL),
            kind(ExpansionPolicy::VERTICAL),
        )
    }

    pub fn set_size_policy(&mut self, policy: Option<SizePolicy>) {
        if self.size_policy != policy {
            self.size_policy = policy;
            self.request_layout();
        }
    }

    pub fn has_weight(&self) -> bool {
        self.weight.is_some()
    }

    pub fn weight(&self) -> Weight {
        self.weight.unwrap_or(Weight::ONE)
    }

    pub fn set_weight(&mut self, weight: Option<Weight>) {
        if self.weight != weight {
            self.weight = weight;
            self.request_layout();
        }
    }

    pub fn has_minimum_size(&self) -> bool {
        self.minimum_size.is_some()
    }

    pub fn minimum_size(&self) -> Size {
        self.minimum_size.unwrap_or(Size::ZERO)
    }

    pub fn set_minimum_size(&mut self, size: Option<Size>) {
        if self.minimum_size != size {
            self.minimum_size = size;
            self.request_layout();
        }
    }

    pub fn has_maximum_size(&self) -> bool {
        self.maximum_size.is_some()
    }

    pub fn maximum_size(&self) -> Size {
        self.maximum_size.unwrap_or(Size::MAX)
    }

    pub fn set_maximum_size(&mut self, size: Option<Size>) {
        if self.maximum_size != size {
            self.maximum_size = size;
            self.request_layout();
        }
    }

    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.geometry.position()
    }

    #[inline]
    pub fn extents(&self) -> Size {
        self.geometry.size()
    }

    pub fn set_geometry(&mut self, position: Point, size: Size) {
        self.geometry = Rect::from_parts(position, size);
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// The layout this spacer belongs to.
    pub fn parent(&self) -> Result<LayoutId> {
        self.parent.ok_or(LayoutError::NoParent)
    }

    pub fn device_metrics(&self) -> Result<DeviceMetrics> {
        self.owner
            .as_ref()
            .and_then(|owner| owner.device_metrics())
            .ok_or(LayoutError::NoDeviceMetrics)
    }

    pub(crate) fn attach(&mut self, parent: LayoutId, owner: Option<OwnerHandle>) {
        self.parent = Some(parent);
        self.owner = owner;
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.owner = None;
    }

    fn request_layout(&self) {
        if self.parent.is_none() {
            return;
        }
        if let Some(owner) = &self.owner {
            owner.request_layout();
        }
    }
}

impl LayoutElement for Spacer {
    fn item_type(&self) -> ItemTypes {
        ItemTypes::SPACER
    }
    fn is_visible(&self) -> bool {
        true
    }
    fn size_policy(&self) -> SizePolicy {
        Spacer::size_policy(self)
    }
    fn weight(&self) -> Weight {
        Spacer::weight(self)
    }
    fn minimum_size(&self) -> Size {
        Spacer::minimum_size(self)
    }
    fn maximum_size(&self) -> Size {
        Spacer::maximum_size(self)
    }
    fn layout_as(&mut self, position: Point, size: Size) {
        self.set_geometry(position, size);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::item::LayoutOwner;

    #[derive(Default)]
    struct CountingOwner {
        requests: Cell<u32>,
        metrics: Option<DeviceMetrics>,
    }

    impl LayoutOwner for CountingOwner {
        fn request_layout(&self) {
            self.requests.set(self.requests.get() + 1);
        }
        fn device_metrics(&self) -> Option<DeviceMetrics> {
            self.metrics
        }
    }

    #[test]
    fn policy_follows_expansion() {
        let h = Spacer::horizontal();
        assert_eq!(h.size_policy().horizontal, SizePolicyKind::Expanding);
        assert_eq!(h.size_policy().vertical, SizePolicyKind::Minimum);

        let none = Spacer::new(ExpansionPolicy::empty());
        assert_eq!(none.size_policy(), SizePolicy::MINIMUM);

        let both = Spacer::expanding();
        assert_eq!(both.size_policy(), SizePolicy::EXPANDING);
    }

    #[test]
    fn defaults() {
        let s = Spacer::vertical();
        assert_eq!(s.weight(), Weight::ONE);
        assert_eq!(s.minimum_size(), Size::ZERO);
        assert_eq!(s.maximum_size(), Size::MAX);
        assert!(!s.has_weight());
    }

    #[test]
    fn override_wins() {
        let s = Spacer::horizontal().with_size_policy(SizePolicy::FIXED);
        assert!(s.has_size_policy());
        assert_eq!(s.size_policy(), SizePolicy::FIXED);
    }

    #[test]
    fn unattached_has_no_parent() {
        let s = Spacer::horizontal();
        assert_eq!(s.parent(), Err(LayoutError::NoParent));
        assert_eq!(s.device_metrics(), Err(LayoutError::NoDeviceMetrics));
    }

    #[test]
    fn setters_request_layout_only_when_attached_and_changed() {
        let owner = Rc::new(CountingOwner::default());
        let mut s = Spacer::horizontal();

        s.set_weight(Some(Weight::splat(2)));
        assert_eq!(owner.requests.get(), 0);

        let id = LayoutId::next();
        s.attach(id, Some(owner.clone()));
        assert_eq!(s.parent(), Ok(id));

        s.set_weight(Some(Weight::splat(2)));
        assert_eq!(owner.requests.get(), 0, "unchanged value");

        s.set_minimum_size(Some(Size::new(3, 0)));
        s.set_expansion_policy(ExpansionPolicy::all());
        assert_eq!(owner.requests.get(), 2);

        s.detach();
        s.set_weight(None);
        assert_eq!(owner.requests.get(), 2);
    }

    #[test]
    fn device_metrics_come_from_owner() {
        let metrics = DeviceMetrics {
            horizontal_dpi: 96,
            vertical_dpi: 96,
        };
        let owner = Rc::new(CountingOwner {
            metrics: Some(metrics),
            ..CountingOwner::default()
        });
        let mut s = Spacer::vertical();
        s.attach(LayoutId::next(), Some(owner));
        assert_eq!(s.device_metrics(), Ok(metrics));
    }
}
