#![forbid(unsafe_code)]

//! Layout items and the traits at the edges of the layout system.
//!
//! A layout owns an ordered list of [`LayoutItem`]s. Each item is one of
//! three kinds:
//!
//! - a widget, shared with the widget tree through a [`WidgetHandle`],
//! - a nested layout, owned outright,
//! - a [`Spacer`], owned outright.
//!
//! The solvers never look at [`ItemKind`] directly. They go through
//! [`LayoutElement`], which is also implemented by the transient row views
//! the grid builds during its layout pass.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use trellis_core::{Point, Rect, Size, SizePolicy, Weight};

use crate::spacer::Spacer;

bitflags! {
    /// Item kinds, used to filter item counts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemTypes: u8 {
        const WIDGET = 0b001;
        const LAYOUT = 0b010;
        const SPACER = 0b100;
    }
}

impl ItemTypes {
    /// Widgets and layouts, no spacers.
    pub const CONTENT: Self = Self::WIDGET.union(Self::LAYOUT);
}

/// Process-unique layout identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(u64);

impl LayoutId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Output device resolution, as reported by a layout owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceMetrics {
    pub horizontal_dpi: u16,
    pub vertical_dpi: u16,
}

/// The widget (or window) a layout tree hangs off.
pub trait LayoutOwner {
    /// Called before a top-level layout pass starts.
    fn layout_items_started(&self) {}

    /// Called after a top-level layout pass completes.
    fn layout_items_completed(&self) {}

    /// Something in the tree changed and a new pass is needed.
    fn request_layout(&self);

    fn device_metrics(&self) -> Option<DeviceMetrics> {
        None
    }
}

impl fmt::Debug for dyn LayoutOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LayoutOwner")
    }
}

/// Shared owner handle.
pub type OwnerHandle = Rc<dyn LayoutOwner>;

/// A widget as seen by a layout.
pub trait Widget {
    fn visible(&self) -> bool {
        true
    }

    fn size_policy(&self) -> SizePolicy;

    fn weight(&self) -> Weight {
        Weight::ONE
    }

    fn minimum_size(&self) -> Size;

    fn maximum_size(&self) -> Size {
        Size::MAX
    }

    fn is_fixed_size(&self) -> bool {
        self.size_policy().is_fixed()
    }

    /// Accept the geometry chosen by the layout.
    fn layout_as(&mut self, position: Point, size: Size);
}

/// Widgets are shared between the widget tree and the layout holding them.
pub type WidgetHandle = Rc<RefCell<dyn Widget>>;

/// True if both handles point at the same widget.
#[inline]
pub fn same_widget(a: &WidgetHandle, b: &WidgetHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// The solver's view of an item.
pub trait LayoutElement {
    fn item_type(&self) -> ItemTypes;
    fn is_visible(&self) -> bool;
    fn size_policy(&self) -> SizePolicy;
    fn weight(&self) -> Weight;
    fn minimum_size(&self) -> Size;
    fn maximum_size(&self) -> Size;
    fn layout_as(&mut self, position: Point, size: Size);

    #[inline]
    fn is_spacer(&self) -> bool {
        self.item_type() == ItemTypes::SPACER
    }
}

impl<T: LayoutElement + ?Sized> LayoutElement for &mut T {
    fn item_type(&self) -> ItemTypes {
        (**self).item_type()
    }
    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }
    fn size_policy(&self) -> SizePolicy {
        (**self).size_policy()
    }
    fn weight(&self) -> Weight {
        (**self).weight()
    }
    fn minimum_size(&self) -> Size {
        (**self).minimum_size()
    }
    fn maximum_size(&self) -> Size {
        (**self).maximum_size()
    }
    fn layout_as(&mut self, position: Point, size: Size) {
        (**self).layout_as(position, size);
    }
}

/// A container that positions items.
///
/// Implemented by [`BoxLayout`](crate::BoxLayout) and
/// [`GridLayout`](crate::GridLayout).
pub trait Layout: Any {
    fn id(&self) -> LayoutId;

    fn visible(&self) -> bool {
        true
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy::EXPANDING
    }

    fn weight(&self) -> Weight {
        Weight::ONE
    }

    fn minimum_size(&self) -> Size;
    fn maximum_size(&self) -> Size;

    /// Geometry assigned by the last pass.
    fn geometry(&self) -> Rect;

    fn owner(&self) -> Option<&OwnerHandle>;

    /// Attach to (or detach from) an owner. Propagates to nested items.
    fn set_owner(&mut self, owner: Option<OwnerHandle>);

    /// Position every item inside `size` at `position`.
    ///
    /// Nested layouts are driven through this method only; the owner
    /// bracket in [`Layout::layout_items`] wraps the top-level call.
    fn arrange(&mut self, position: Point, size: Size);

    /// Run a top-level pass, bracketed by the owner's
    /// started/completed notifications.
    fn layout_items(&mut self, position: Point, size: Size) {
        let owner = self.owner().cloned();
        if let Some(owner) = &owner {
            owner.layout_items_started();
        }
        self.arrange(position, size);
        if let Some(owner) = &owner {
            owner.layout_items_completed();
        }
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("id", &self.id())
            .field("geometry", &self.geometry())
            .finish()
    }
}

/// What a [`LayoutItem`] holds.
pub enum ItemKind {
    Widget(WidgetHandle),
    Layout(Box<dyn Layout>),
    Spacer(Spacer),
}

/// An entry in a layout's item list.
pub struct LayoutItem {
    kind: ItemKind,
    geometry: Rect,
}

impl LayoutItem {
    pub fn widget(widget: WidgetHandle) -> Self {
        Self::from_kind(ItemKind::Widget(widget))
    }

    pub fn layout(layout: impl Layout) -> Self {
        Self::from_kind(ItemKind::Layout(Box::new(layout)))
    }

    pub fn boxed_layout(layout: Box<dyn Layout>) -> Self {
        Self::from_kind(ItemKind::Layout(layout))
    }

    pub fn spacer(spacer: Spacer) -> Self {
        Self::from_kind(ItemKind::Spacer(spacer))
    }

    fn from_kind(kind: ItemKind) -> Self {
        Self {
            kind,
            geometry: Rect::default(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut ItemKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> ItemKind {
        self.kind
    }

    /// Geometry assigned by the last pass.
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

    pub fn is_widget(&self) -> bool {
        matches!(self.kind, ItemKind::Widget(_))
    }

    pub fn is_layout(&self) -> bool {
        matches!(self.kind, ItemKind::Layout(_))
    }

    pub fn as_widget(&self) -> Option<&WidgetHandle> {
        match &self.kind {
            ItemKind::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn as_layout(&self) -> Option<&dyn Layout> {
        match &self.kind {
            ItemKind::Layout(layout) => Some(layout.as_ref()),
            _ => None,
        }
    }

    pub fn as_layout_mut(&mut self) -> Option<&mut (dyn Layout + 'static)> {
        match &mut self.kind {
            ItemKind::Layout(layout) => Some(layout.as_mut()),
            _ => None,
        }
    }

    pub fn as_spacer(&self) -> Option<&Spacer> {
        match &self.kind {
            ItemKind::Spacer(spacer) => Some(spacer),
            _ => None,
        }
    }

    pub fn as_spacer_mut(&mut self) -> Option<&mut Spacer> {
        match &mut self.kind {
            ItemKind::Spacer(spacer) => Some(spacer),
            _ => None,
        }
    }

    /// True if this item wraps `widget`.
    pub fn holds_widget(&self, widget: &WidgetHandle) -> bool {
        self.as_widget().is_some_and(|w| same_widget(w, widget))
    }

    pub(crate) fn attach(&mut self, parent: LayoutId, owner: Option<&OwnerHandle>) {
        match &mut self.kind {
            ItemKind::Widget(_) => {}
            ItemKind::Layout(layout) => layout.set_owner(owner.cloned()),
            ItemKind::Spacer(spacer) => spacer.attach(parent, owner.cloned()),
        }
    }

    pub(crate) fn detach(&mut self) {
        match &mut self.kind {
            ItemKind::Widget(_) => {}
            ItemKind::Layout(layout) => layout.set_owner(None),
            ItemKind::Spacer(spacer) => spacer.detach(),
        }
    }
}

impl fmt::Debug for LayoutItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ItemKind::Widget(_) => "widget",
            ItemKind::Layout(_) => "layout",
            ItemKind::Spacer(_) => "spacer",
        };
        f.debug_struct("LayoutItem")
            .field("kind", &kind)
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl LayoutElement for LayoutItem {
    fn item_type(&self) -> ItemTypes {
        match self.kind {
            ItemKind::Widget(_) => ItemTypes::WIDGET,
            ItemKind::Layout(_) => ItemTypes::LAYOUT,
            ItemKind::Spacer(_) => ItemTypes::SPACER,
        }
    }

    fn is_visible(&self) -> bool {
        match &self.kind {
            ItemKind::Widget(widget) => widget.borrow().visible(),
            ItemKind::Layout(layout) => layout.visible(),
            ItemKind::Spacer(_) => true,
        }
    }

    fn size_policy(&self) -> SizePolicy {
        match &self.kind {
            ItemKind::Widget(widget) => widget.borrow().size_policy(),
            ItemKind::Layout(layout) => layout.size_policy(),
            ItemKind::Spacer(spacer) => spacer.size_policy(),
        }
    }

    fn weight(&self) -> Weight {
        match &self.kind {
            ItemKind::Widget(widget) => widget.borrow().weight(),
            ItemKind::Layout(layout) => layout.weight(),
            ItemKind::Spacer(spacer) => spacer.weight(),
        }
    }

    fn minimum_size(&self) -> Size {
        match &self.kind {
            ItemKind::Widget(widget) => widget.borrow().minimum_size(),
            ItemKind::Layout(layout) => layout.minimum_size(),
            ItemKind::Spacer(spacer) => spacer.minimum_size(),
        }
    }

    fn maximum_size(&self) -> Size {
        match &self.kind {
            ItemKind::Widget(widget) => widget.borrow().maximum_size(),
            ItemKind::Layout(layout) => layout.maximum_size(),
            ItemKind::Spacer(spacer) => spacer.maximum_size(),
        }
    }

    fn layout_as(&mut self, position: Point, size: Size) {
        self.geometry = Rect::from_parts(position, size);
        match &mut self.kind {
            ItemKind::Widget(widget) => widget.borrow_mut().layout_as(position, size),
            ItemKind::Layout(layout) => layout.arrange(position, size),
            ItemKind::Spacer(spacer) => spacer.set_geometry(position, size),
        }
    }
}
