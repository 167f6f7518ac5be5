//! Benchmarks for weighted distribution and full box/grid passes.
//!
//! Run with: cargo bench -p trellis-layout --bench layout_bench

use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use trellis_core::{SizePolicy, Weight};
use trellis_layout::{
    AxisRequest, BoxLayout, GridLayout, Layout, Point, Size, Widget, WidgetHandle, distribute,
};

struct Leaf {
    policy: SizePolicy,
    weight: Weight,
    min: Size,
}

impl Widget for Leaf {
    fn size_policy(&self) -> SizePolicy {
        self.policy
    }
    fn weight(&self) -> Weight {
        self.weight
    }
    fn minimum_size(&self) -> Size {
        self.min
    }
    fn layout_as(&mut self, position: Point, size: Size) {
        black_box((position, size));
    }
}

fn leaf(i: usize) -> WidgetHandle {
    let policy = if i % 3 == 0 {
        SizePolicy::FIXED
    } else {
        SizePolicy::EXPANDING
    };
    Rc::new(RefCell::new(Leaf {
        policy,
        weight: Weight::splat(1 + (i % 4) as u32),
        min: Size::new(2 + (i % 5) as u16, 1),
    }))
}

fn requests(count: usize) -> Vec<AxisRequest> {
    (0..count)
        .map(|i| match i % 4 {
            0 => AxisRequest::fixed(3),
            1 => AxisRequest::expanding(2, 12, 1),
            _ => AxisRequest::expanding(1, u16::MAX, (i % 7) as u32 + 1),
        })
        .collect()
}

fn row_of(count: usize) -> BoxLayout {
    let mut layout = BoxLayout::horizontal().with_spacing(Size::splat(1));
    for i in 0..count {
        if i % 8 == 7 {
            layout.add_spacer();
        } else {
            let _ = layout.add_widget(leaf(i));
        }
    }
    layout
}

fn grid_of(side: u32) -> GridLayout {
    let mut grid = GridLayout::with_dimensions(side, side).with_spacing(Size::splat(1));
    for i in 0..(side * side) as usize {
        let _ = grid.add_widget(leaf(i));
    }
    if side > 2 {
        let _ = grid.add_span(0, 0, 2, 2);
    }
    grid
}

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute");

    for count in [4usize, 32, 256] {
        let input = requests(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("items", count), &input, |b, reqs| {
            b.iter(|| black_box(distribute(black_box(reqs), black_box(4000))))
        });
    }

    group.finish();
}

fn bench_box_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_layout");

    for count in [8usize, 64, 512] {
        let mut layout = row_of(count);
        let area = Size::new(layout.minimum_size().width.saturating_add(200), 24);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(BenchmarkId::new("horizontal", count), |b| {
            b.iter(|| layout.layout_items(black_box(Point::ZERO), black_box(area)))
        });
    }

    // Two levels: a column of rows.
    let mut nested = BoxLayout::vertical();
    for _ in 0..16 {
        nested.add_layout(row_of(16));
    }
    group.throughput(Throughput::Elements(256));
    group.bench_function("nested_16x16", |b| {
        b.iter(|| nested.layout_items(black_box(Point::ZERO), black_box(Size::new(400, 200))))
    });

    group.finish();
}

fn bench_grid_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_layout");

    for side in [2u32, 8, 24] {
        let mut grid = grid_of(side);
        let cells = u64::from(side * side);
        group.throughput(Throughput::Elements(cells));
        group.bench_function(BenchmarkId::new("square", cells), |b| {
            b.iter(|| grid.layout_items(black_box(Point::ZERO), black_box(Size::new(640, 480))))
        });
    }

    let grid = grid_of(24);
    group.bench_function("minimum_size_24", |b| {
        b.iter(|| black_box(grid.minimum_size()))
    });

    group.finish();
}

criterion_group!(benches, bench_distribute, bench_box_pass, bench_grid_pass);
criterion_main!(benches);
