//! Box layout behaviour through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{Alignment, SizePolicy, SizePolicyKind, Weight};
use trellis_layout::{
    BoxLayout, Layout, LayoutDefaults, LayoutError, Point, Rect, Sides, Size, Widget, WidgetHandle,
};

struct Block {
    policy: SizePolicy,
    weight: Weight,
    min: Size,
    max: Size,
    visible: bool,
    placed: Option<Rect>,
}

impl Block {
    fn new(policy: SizePolicy, min: Size) -> Self {
        Self {
            policy,
            weight: Weight::ONE,
            min,
            max: Size::MAX,
            visible: true,
            placed: None,
        }
    }

    fn share(self) -> Rc<RefCell<Block>> {
        Rc::new(RefCell::new(self))
    }
}

impl Widget for Block {
    fn visible(&self) -> bool {
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
        self.placed = Some(Rect::from_parts(position, size));
    }
}

fn placed(block: &Rc<RefCell<Block>>) -> Rect {
    block.borrow().placed.unwrap_or_default()
}

#[test]
fn fixed_and_two_expanding_share_width() {
    let fixed = Block::new(SizePolicy::FIXED, Size::new(10, 1)).share();
    let a = Block::new(SizePolicy::EXPANDING, Size::new(0, 1)).share();
    let b = Block::new(SizePolicy::EXPANDING, Size::new(0, 1)).share();

    let mut layout = BoxLayout::horizontal();
    for w in [&fixed, &a, &b] {
        let handle: WidgetHandle = w.clone();
        layout.add_widget(handle).unwrap();
    }
    layout.layout_items(Point::ZERO, Size::new(110, 4));

    assert_eq!(placed(&fixed).width, 10);
    assert_eq!(placed(&a), Rect::new(10, 0, 50, 4));
    assert_eq!(placed(&b), Rect::new(60, 0, 50, 4));
    assert_eq!(layout.geometry(), Rect::new(0, 0, 110, 4));
}

#[test]
fn weights_split_proportionally() {
    let mut heavy = Block::new(SizePolicy::EXPANDING, Size::new(1, 0));
    heavy.weight = Weight::new(1, 3);
    let heavy = heavy.share();
    let light = Block::new(SizePolicy::EXPANDING, Size::new(1, 0)).share();

    let mut layout = BoxLayout::vertical();
    layout.add_widget(heavy.clone()).unwrap();
    layout.add_widget(light.clone()).unwrap();
    layout.layout_items(Point::ZERO, Size::new(5, 40));

    assert_eq!(placed(&heavy).height, 30);
    assert_eq!(placed(&light), Rect::new(0, 30, 5, 10));
}

#[test]
fn centre_alignment_offsets_orthogonal_axis() {
    let mut block = Block::new(SizePolicy::FIXED, Size::new(10, 4));
    block.max = Size::new(10, 4);
    let block = block.share();

    let mut layout = BoxLayout::horizontal().with_alignment(Alignment::LEFT | Alignment::VCENTRE);
    layout.add_widget(block.clone()).unwrap();
    layout.layout_items(Point::ZERO, Size::new(30, 10));

    assert_eq!(placed(&block), Rect::new(0, 3, 10, 4));
}

#[test]
fn bottom_alignment_pins_to_end() {
    let mut block = Block::new(SizePolicy::FIXED, Size::new(10, 4));
    block.max = Size::new(10, 4);
    let block = block.share();

    let mut layout = BoxLayout::horizontal().with_alignment(Alignment::BOTTOM);
    layout.add_widget(block.clone()).unwrap();
    layout.layout_items(Point::new(0, 2), Size::new(30, 10));

    assert_eq!(placed(&block).y, 8);
}

#[test]
fn spacer_pushes_items_apart() {
    let left = Block::new(SizePolicy::MINIMUM, Size::new(5, 1)).share();
    let right = Block::new(SizePolicy::MINIMUM, Size::new(5, 1)).share();

    let mut layout = BoxLayout::horizontal().with_spacing(Size::splat(1));
    layout.add_widget(left.clone()).unwrap();
    layout.add_spacer();
    layout.add_widget(right.clone()).unwrap();
    layout.layout_items(Point::ZERO, Size::new(40, 1));

    assert_eq!(placed(&left).x, 0);
    // 40 - one gap = 39; spacer soaks 29; right starts at 5 + 1 + 29.
    assert_eq!(placed(&right), Rect::new(35, 0, 5, 1));
    let spacer = layout.item(1).map(|item| item.geometry());
    assert_eq!(spacer, Some(Rect::new(6, 0, 29, 1)));
}

#[test]
fn always_use_spacing_gaps_spacers_too() {
    let left = Block::new(SizePolicy::MINIMUM, Size::new(5, 1)).share();
    let right = Block::new(SizePolicy::MINIMUM, Size::new(5, 1)).share();

    let mut layout = BoxLayout::horizontal()
        .with_spacing(Size::splat(1))
        .with_always_use_spacing(true);
    layout.add_widget(left.clone()).unwrap();
    layout.add_spacer();
    layout.add_widget(right.clone()).unwrap();
    layout.layout_items(Point::ZERO, Size::new(40, 1));

    assert_eq!(placed(&right), Rect::new(35, 0, 5, 1));
    let spacer = layout.item(1).map(|item| item.geometry());
    assert_eq!(spacer, Some(Rect::new(6, 0, 28, 1)));
}

#[test]
fn margins_inset_everything() {
    let block = Block::new(SizePolicy::EXPANDING, Size::new(1, 1)).share();
    let mut layout = BoxLayout::vertical().with_margins(Sides::new(1, 2, 3, 4));
    layout.add_widget(block.clone()).unwrap();
    layout.layout_items(Point::new(10, 10), Size::new(20, 20));

    assert_eq!(placed(&block), Rect::new(14, 11, 14, 16));
}

#[test]
fn nested_layout_receives_its_share() {
    let inner_a = Block::new(SizePolicy::EXPANDING, Size::new(1, 1)).share();
    let inner_b = Block::new(SizePolicy::EXPANDING, Size::new(1, 1)).share();
    let mut column = BoxLayout::vertical();
    column.add_widget(inner_a.clone()).unwrap();
    column.add_widget(inner_b.clone()).unwrap();

    let side = Block::new(SizePolicy::FIXED, Size::new(8, 1)).share();
    let mut row = BoxLayout::horizontal();
    row.add_widget(side.clone()).unwrap();
    row.add_layout(column);
    row.layout_items(Point::ZERO, Size::new(20, 10));

    assert_eq!(placed(&inner_a), Rect::new(8, 0, 12, 5));
    assert_eq!(placed(&inner_b), Rect::new(8, 5, 12, 5));
}

#[test]
fn hidden_widget_takes_no_space() {
    let mut hidden = Block::new(SizePolicy::FIXED, Size::new(10, 1));
    hidden.visible = false;
    let hidden = hidden.share();
    let shown = Block::new(SizePolicy::EXPANDING, Size::new(1, 1)).share();

    let mut layout = BoxLayout::horizontal().with_spacing(Size::splat(2));
    layout.add_widget(hidden.clone()).unwrap();
    layout.add_widget(shown.clone()).unwrap();
    layout.layout_items(Point::ZERO, Size::new(30, 1));

    assert_eq!(hidden.borrow().placed, None);
    assert_eq!(placed(&shown), Rect::new(0, 0, 30, 1));
}

#[test]
fn maximum_caps_share() {
    let mut capped = Block::new(SizePolicy::EXPANDING, Size::new(0, 1));
    capped.max = Size::new(15, 1);
    let capped = capped.share();
    let open = Block::new(SizePolicy::EXPANDING, Size::new(0, 1)).share();

    let mut layout = BoxLayout::horizontal();
    layout.add_widget(capped.clone()).unwrap();
    layout.add_widget(open.clone()).unwrap();
    layout.layout_items(Point::ZERO, Size::new(100, 1));

    assert_eq!(placed(&capped).width, 15);
    assert_eq!(placed(&open), Rect::new(15, 0, 85, 1));
}

#[test]
fn minimum_and_maximum_size_of_layout() {
    let a = Block::new(SizePolicy::FIXED, Size::new(10, 3)).share();
    let b = Block::new(SizePolicy::MINIMUM, Size::new(4, 6)).share();
    let mut layout = BoxLayout::horizontal()
        .with_spacing(Size::new(2, 0))
        .with_margins(1u16);
    layout.add_widget(a).unwrap();
    layout.add_widget(b).unwrap();

    assert_eq!(layout.minimum_size(), Size::new(18, 8));
    assert_eq!(layout.maximum_size(), Size::MAX);
}

#[test]
fn insert_and_remove_keep_order() {
    let a = Block::new(SizePolicy::MINIMUM, Size::new(1, 1)).share();
    let b = Block::new(SizePolicy::MINIMUM, Size::new(1, 1)).share();
    let a_handle: WidgetHandle = a;
    let b_handle: WidgetHandle = b;

    let mut layout = BoxLayout::horizontal();
    layout.add_widget(a_handle.clone()).unwrap();
    layout.add_spacer_at(0).unwrap();
    layout
        .insert(1, trellis_layout::LayoutItem::widget(b_handle.clone()))
        .unwrap();
    assert_eq!(layout.find_widget(&b_handle), Some(1));
    assert_eq!(layout.find_widget(&a_handle), Some(2));
    assert!(layout.item(0).is_some_and(|item| item.as_spacer().is_some()));

    assert_eq!(
        layout.insert(9, trellis_layout::LayoutItem::widget(b_handle.clone())).err(),
        Some(LayoutError::IndexOutOfRange { index: 9, len: 3 })
    );
    assert_eq!(
        layout.insert(0, trellis_layout::LayoutItem::widget(b_handle.clone())).err(),
        Some(LayoutError::ItemAlreadyAdded)
    );

    layout.remove_all();
    assert!(layout.is_empty());
}

#[test]
fn defaults_seed_new_layouts() {
    let defaults = LayoutDefaults::default()
        .with_spacing(Size::splat(3))
        .with_margins(2u16)
        .with_alignment(Alignment::TOP);
    let layout = BoxLayout::with_defaults(trellis_layout::Direction::Horizontal, defaults);
    assert_eq!(layout.spacing(), Size::splat(3));
    assert_eq!(layout.margins(), Sides::all(2));
    assert_eq!(layout.alignment(), Alignment::TOP);
}

#[test]
fn layout_policy_override() {
    let layout = BoxLayout::horizontal().with_size_policy(SizePolicy::new(
        SizePolicyKind::Fixed,
        SizePolicyKind::Expanding,
    ));
    assert_eq!(layout.size_policy().horizontal, SizePolicyKind::Fixed);
    assert_eq!(BoxLayout::vertical().size_policy(), SizePolicy::EXPANDING);
}
