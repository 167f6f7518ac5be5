#![forbid(unsafe_code)]

//! Horizontal and vertical box layouts.
//!
//! Items are stacked along one axis in insertion order. Space along that
//! axis is shared by [`solve`](crate::solver::solve); the other axis is
//! filled up to each item's maximum and aligned inside the layout.
//!
//! # Example
//!
//! ```ignore
//! use trellis_layout::BoxLayout;
//!
//! let mut row = BoxLayout::horizontal().with_spacing(Size::splat(1));
//! row.add_widget(ok_button)?;
//! row.add_spacer();
//! row.add_widget(cancel_button)?;
//! row.layout_items(Point::ZERO, Size::new(80, 3));
//! ```

use std::any::Any;

use tracing::{debug, trace};
use trellis_core::{Alignment, Point, Rect, Sides, Size, SizePolicy, Weight};

use crate::Direction;
use crate::axis::{AxisPolicy, ColumnMajor, RowMajor};
use crate::config::LayoutDefaults;
use crate::error::{LayoutError, Result};
use crate::item::{
    ItemTypes, Layout, LayoutElement, LayoutId, LayoutItem, OwnerHandle, WidgetHandle,
};
use crate::solver::{SolveParams, maximum_extent, minimum_extent, solve};
use crate::spacer::Spacer;

/// A layout stacking its items along one axis.
#[derive(Debug)]
pub struct BoxLayout {
    id: LayoutId,
    direction: Direction,
    items: Vec<LayoutItem>,
    params: SolveParams,
    minimum_size: Option<Size>,
    maximum_size: Option<Size>,
    size_policy: Option<SizePolicy>,
    weight: Weight,
    visible: bool,
    enabled: bool,
    owner: Option<OwnerHandle>,
    geometry: Rect,
}

impl BoxLayout {
    pub fn new(direction: Direction) -> Self {
        Self::with_defaults(direction, LayoutDefaults::default())
    }

    pub fn with_defaults(direction: Direction, defaults: LayoutDefaults) -> Self {
        Self {
            id: LayoutId::next(),
            direction,
            items: Vec::new(),
            params: defaults.params(),
            minimum_size: None,
            maximum_size: None,
            size_policy: None,
            weight: Weight::ONE,
            visible: true,
            enabled: true,
            owner: None,
            geometry: Rect::default(),
        }
    }

    /// Items left to right.
    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    /// Items top to bottom.
    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.params.margins = margins.into();
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: Size) -> Self {
        self.params.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.params.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_always_use_spacing(mut self, always: bool) -> Self {
        self.params.always_use_spacing = always;
        self
    }

    #[must_use]
    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
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

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn margins(&self) -> Sides {
        self.params.margins
    }

    #[inline]
    pub fn spacing(&self) -> Size {
        self.params.spacing
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.params.alignment
    }

    #[inline]
    pub fn always_use_spacing(&self) -> bool {
        self.params.always_use_spacing
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_margins(&mut self, margins: impl Into<Sides>) {
        let margins = margins.into();
        if self.params.margins != margins {
            self.params.margins = margins;
            self.request_layout();
        }
    }

    pub fn set_spacing(&mut self, spacing: Size) {
        if self.params.spacing != spacing {
            self.params.spacing = spacing;
            self.request_layout();
        }
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.params.alignment != alignment {
            self.params.alignment = alignment;
            self.request_layout();
        }
    }

    pub fn set_always_use_spacing(&mut self, always: bool) {
        if self.params.always_use_spacing != always {
            self.params.always_use_spacing = always;
            self.request_layout();
        }
    }

    pub fn set_size_policy(&mut self, policy: Option<SizePolicy>) {
        if self.size_policy != policy {
            self.size_policy = policy;
            self.request_layout();
        }
    }

    pub fn set_weight(&mut self, weight: Weight) {
        if self.weight != weight {
            self.weight = weight;
            self.request_layout();
        }
    }

    pub fn set_minimum_size(&mut self, size: Option<Size>) {
        if self.minimum_size != size {
            self.minimum_size = size;
            self.request_layout();
        }
    }

    pub fn set_maximum_size(&mut self, size: Option<Size>) {
        if self.maximum_size != size {
            self.maximum_size = size;
            self.request_layout();
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.request_layout();
        }
    }

    /// Disabled layouts skip their layout passes.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.request_layout();
        }
    }

    /// Append a widget. Fails if the widget is already in this layout.
    pub fn add_widget(&mut self, widget: WidgetHandle) -> Result<usize> {
        self.add_item(LayoutItem::widget(widget))
    }

    pub fn add_layout(&mut self, layout: impl Layout) -> usize {
        self.push(LayoutItem::layout(layout))
    }

    /// Append a spacer expanding along this layout's direction.
    pub fn add_spacer(&mut self) -> usize {
        let spacer = self.direction_spacer();
        self.push(LayoutItem::spacer(spacer))
    }

    /// Insert a direction spacer before `index`.
    pub fn add_spacer_at(&mut self, index: usize) -> Result<usize> {
        let spacer = self.direction_spacer();
        self.insert(index, LayoutItem::spacer(spacer))?;
        Ok(index)
    }

    pub fn add_item(&mut self, item: LayoutItem) -> Result<usize> {
        self.check_unique(&item)?;
        Ok(self.push(item))
    }

    /// Insert `item` before `index`. `index == len()` appends.
    pub fn insert(&mut self, index: usize, mut item: LayoutItem) -> Result<()> {
        if index > self.items.len() {
            return Err(LayoutError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.check_unique(&item)?;
        item.attach(self.id, self.owner.as_ref());
        self.items.insert(index, item);
        self.request_layout();
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<LayoutItem> {
        if index >= self.items.len() {
            return Err(LayoutError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let mut item = self.items.remove(index);
        item.detach();
        self.request_layout();
        Ok(item)
    }

    /// Remove `widget` if present. Returns whether anything was removed.
    pub fn remove_widget(&mut self, widget: &WidgetHandle) -> bool {
        match self.find_widget(widget) {
            Some(index) => self.remove_at(index).is_ok(),
            None => false,
        }
    }

    pub fn remove_all(&mut self) {
        if self.items.is_empty() {
            return;
        }
        for item in &mut self.items {
            item.detach();
        }
        self.items.clear();
        self.request_layout();
    }

    pub fn find_widget(&self, widget: &WidgetHandle) -> Option<usize> {
        self.items.iter().position(|item| item.holds_widget(widget))
    }

    #[inline]
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&LayoutItem> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut LayoutItem> {
        self.items.get_mut(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible widgets and layouts (spacers excluded).
    pub fn items_visible(&self) -> usize {
        RowMajor::items_visible(&self.items, ItemTypes::CONTENT)
    }

    pub fn spacer_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_spacer()).count()
    }

    fn direction_spacer(&self) -> Spacer {
        match self.direction {
            Direction::Horizontal => Spacer::horizontal(),
            Direction::Vertical => Spacer::vertical(),
        }
    }

    fn check_unique(&self, item: &LayoutItem) -> Result<()> {
        match item.as_widget() {
            Some(widget) if self.find_widget(widget).is_some() => {
                Err(LayoutError::ItemAlreadyAdded)
            }
            _ => Ok(()),
        }
    }

    fn push(&mut self, mut item: LayoutItem) -> usize {
        item.attach(self.id, self.owner.as_ref());
        self.items.push(item);
        self.request_layout();
        self.items.len() - 1
    }

    fn request_layout(&self) {
        if let Some(owner) = &self.owner {
            owner.request_layout();
        }
    }

    fn computed_minimum(&self) -> Size {
        match self.direction {
            Direction::Horizontal => minimum_extent::<RowMajor, _>(&self.items, &self.params),
            Direction::Vertical => minimum_extent::<ColumnMajor, _>(&self.items, &self.params),
        }
    }

    fn computed_maximum(&self) -> Size {
        match self.direction {
            Direction::Horizontal => maximum_extent::<RowMajor, _>(&self.items, &self.params),
            Direction::Vertical => maximum_extent::<ColumnMajor, _>(&self.items, &self.params),
        }
    }
}

impl Layout for BoxLayout {
    fn id(&self) -> LayoutId {
        self.id
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn size_policy(&self) -> SizePolicy {
        self.size_policy.unwrap_or(SizePolicy::EXPANDING)
    }

    fn weight(&self) -> Weight {
        self.weight
    }

    fn minimum_size(&self) -> Size {
        self.minimum_size.unwrap_or_else(|| self.computed_minimum())
    }

    fn maximum_size(&self) -> Size {
        self.maximum_size.unwrap_or_else(|| self.computed_maximum())
    }

    fn geometry(&self) -> Rect {
        self.geometry
    }

    fn owner(&self) -> Option<&OwnerHandle> {
        self.owner.as_ref()
    }

    fn set_owner(&mut self, owner: Option<OwnerHandle>) {
        for item in &mut self.items {
            item.attach(self.id, owner.as_ref());
        }
        self.owner = owner;
    }

    fn arrange(&mut self, position: Point, size: Size) {
        if !self.enabled {
            trace!(layout = self.id.get(), "disabled layout skipped");
            return;
        }
        self.geometry = Rect::from_parts(position, size);
        let minimum = self.minimum_size();
        debug!(
            layout = self.id.get(),
            direction = ?self.direction,
            items = self.items.len(),
            width = size.width,
            height = size.height,
            "box layout pass"
        );
        match self.direction {
            Direction::Horizontal => {
                solve::<RowMajor, _>(&mut self.items, &self.params, position, size, minimum);
            }
            Direction::Vertical => {
                solve::<ColumnMajor, _>(&mut self.items, &self.params, position, size, minimum);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
