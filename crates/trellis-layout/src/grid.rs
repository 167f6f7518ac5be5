#![forbid(unsafe_code)]

//! Grid layout with row/column spans.
//!
//! Items live in a sparse cell map keyed by `(row, column)`. A layout pass
//! runs in three phases:
//!
//! 1. Each row becomes a transient row view (a horizontal solve over that
//!    row's cells, padded with spacers up to the column count, cells under a
//!    span included). The row views are stacked with a vertical solve.
//! 2. Row heights and column widths are the largest extents produced by
//!    phase 1. A span spreads its extent evenly over the rows and columns
//!    it covers.
//! 3. Items are placed at the accumulated row/column offsets. Spans receive
//!    the union of the cells they cover, spacing included.
//!
//! Adding an item at `(row, column)` back-fills every empty cell to its
//! left in that row with an expanding spacer, so rows never have holes
//! before their last occupied column.

use std::any::Any;
use std::collections::BTreeMap;

use tracing::{debug, trace, warn};
use trellis_core::{Alignment, AxisAlignment, Point, Rect, Sides, Size, SizePolicy, Weight};

use crate::axis::{ColumnMajor, RowMajor};
use crate::config::LayoutDefaults;
use crate::error::{LayoutError, Result};
use crate::item::{
    ItemTypes, Layout, LayoutElement, LayoutId, LayoutItem, OwnerHandle, WidgetHandle,
};
use crate::solver::{SolveParams, maximum_extent, minimum_extent, solve};
use crate::spacer::Spacer;

/// Largest row or column count a grid can address.
///
/// Extents are `u16`, so lines past this count could never be given space.
pub const MAX_GRID_LINES: u32 = u16::MAX as u32;

/// A cell address. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellCoord {
    pub row: u32,
    pub column: u32,
}

impl CellCoord {
    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// Row and column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridDimensions {
    pub rows: u32,
    pub columns: u32,
}

impl GridDimensions {
    #[inline]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }
}

/// An inclusive rectangular range of cells treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpan {
    pub from: CellCoord,
    pub to: CellCoord,
}

impl GridSpan {
    /// Span between two corners, in either order.
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            from: CellCoord::new(a.row.min(b.row), a.column.min(b.column)),
            to: CellCoord::new(a.row.max(b.row), a.column.max(b.column)),
        }
    }

    #[inline]
    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.from.row..=self.to.row).contains(&cell.row)
            && (self.from.column..=self.to.column).contains(&cell.column)
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.to.row - self.from.row + 1
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.to.column - self.from.column + 1
    }
}

/// Per-row bookkeeping: occupied column indices and the last row geometry.
#[derive(Debug, Clone, Default)]
struct GridRow {
    columns: Vec<u32>,
    geometry: Rect,
}

#[derive(Debug, Clone, Copy)]
enum Line {
    Row,
    Column,
}

impl Line {
    #[inline]
    fn pick(self, size: Size) -> u16 {
        match self {
            Self::Row => size.height,
            Self::Column => size.width,
        }
    }

    #[inline]
    fn index(self, cell: CellCoord) -> u32 {
        match self {
            Self::Row => cell.row,
            Self::Column => cell.column,
        }
    }

    #[inline]
    fn range(self, span: &GridSpan) -> (u32, u32) {
        match self {
            Self::Row => (span.from.row, span.to.row),
            Self::Column => (span.from.column, span.to.column),
        }
    }
}

/// What the occupants of each row (or column) ask for.
#[derive(Debug, Clone, Default)]
struct LineDemand {
    extent: Vec<u16>,
    /// Has at least one visible occupant.
    occupied: Vec<bool>,
    /// Has a visible occupant with a nonzero minimum along the line.
    sized: Vec<bool>,
}

fn addressable(row: u32, column: u32) -> Result<CellCoord> {
    if row < MAX_GRID_LINES && column < MAX_GRID_LINES {
        Ok(CellCoord::new(row, column))
    } else {
        Err(LayoutError::CellOutOfRange { row, column })
    }
}

fn covering(spans: &[GridSpan], cell: CellCoord) -> Option<&GridSpan> {
    spans.iter().find(|span| span.contains(cell))
}

/// True for cells hidden under a span other than its top-left cell.
fn is_covered(spans: &[GridSpan], cell: CellCoord) -> bool {
    covering(spans, cell).is_some_and(|span| span.from != cell)
}

fn origin_span(spans: &[GridSpan], cell: CellCoord) -> Option<&GridSpan> {
    spans.iter().find(|span| span.from == cell)
}

#[inline]
fn gaps(count: usize, spacing: u16) -> u16 {
    if count <= 1 {
        return 0;
    }
    spacing.saturating_mul(u16::try_from(count - 1).unwrap_or(u16::MAX))
}

/// Start offset of each line; empty lines take no space.
fn offsets(extents: &[u16], start: u16, spacing: u16) -> Vec<u16> {
    let mut position = start;
    extents
        .iter()
        .map(|&extent| {
            let here = position;
            if extent > 0 {
                position = position.saturating_add(extent).saturating_add(spacing);
            }
            here
        })
        .collect()
}

/// Extent of lines `first..=last`, including the spacing between them.
fn union_extent(extents: &[u16], first: usize, last: usize, spacing: u16) -> u16 {
    let Some(lines) = extents.get(first..=last) else {
        return 0;
    };
    let nonzero = lines.iter().filter(|e| **e > 0).count();
    let sum = lines.iter().fold(0u16, |acc, e| acc.saturating_add(*e));
    sum.saturating_add(gaps(nonzero, spacing))
}

/// A grid of cells, optionally spanning.
#[derive(Debug)]
pub struct GridLayout {
    id: LayoutId,
    cells: BTreeMap<CellCoord, LayoutItem>,
    rows: Vec<GridRow>,
    spans: Vec<GridSpan>,
    cursor: CellCoord,
    dimensions: GridDimensions,
    params: SolveParams,
    minimum_size: Option<Size>,
    maximum_size: Option<Size>,
    size_policy: Option<SizePolicy>,
    weight: Weight,
    visible: bool,
    owner: Option<OwnerHandle>,
    geometry: Rect,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GridLayout {
    pub fn new() -> Self {
        Self::with_defaults(LayoutDefaults::default())
    }

    pub fn with_defaults(defaults: LayoutDefaults) -> Self {
        Self {
            id: LayoutId::next(),
            cells: BTreeMap::new(),
            rows: Vec::new(),
            spans: Vec::new(),
            cursor: CellCoord::default(),
            dimensions: GridDimensions::default(),
            params: defaults.params(),
            minimum_size: None,
            maximum_size: None,
            size_policy: None,
            weight: Weight::ONE,
            visible: true,
            owner: None,
            geometry: Rect::default(),
        }
    }

    /// Empty grid with preset dimensions; the cursor wraps at `columns`.
    pub fn with_dimensions(rows: u32, columns: u32) -> Self {
        let mut grid = Self::new();
        grid.set_dimensions(rows, columns);
        grid
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: Size) -> Self {
        self.params.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.params.margins = margins.into();
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.params.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = Some(policy);
        self
    }

    #[inline]
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.dimensions.rows
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.dimensions.columns
    }

    #[inline]
    pub fn cursor(&self) -> CellCoord {
        self.cursor
    }

    #[inline]
    pub fn spacing(&self) -> Size {
        self.params.spacing
    }

    #[inline]
    pub fn margins(&self) -> Sides {
        self.params.margins
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.params.alignment
    }

    #[inline]
    pub fn spans(&self) -> &[GridSpan] {
        &self.spans
    }

    /// Resize the grid. Never shrinks below the occupied cells, never grows
    /// past [`MAX_GRID_LINES`].
    pub fn set_dimensions(&mut self, rows: u32, columns: u32) {
        let occupied = self.occupied_dimensions();
        let dimensions = GridDimensions::new(
            rows.min(MAX_GRID_LINES).max(occupied.rows),
            columns.min(MAX_GRID_LINES).max(occupied.columns),
        );
        if dimensions != self.dimensions {
            self.dimensions = dimensions;
            self.sync_rows();
            self.request_layout();
        }
    }

    pub fn set_spacing(&mut self, spacing: Size) {
        if self.params.spacing != spacing {
            self.params.spacing = spacing;
            self.request_layout();
        }
    }

    pub fn set_margins(&mut self, margins: impl Into<Sides>) {
        let margins = margins.into();
        if self.params.margins != margins {
            self.params.margins = margins;
            self.request_layout();
        }
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.params.alignment != alignment {
            self.params.alignment = alignment;
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

    /// Add at the cursor, then advance it row-major.
    pub fn add_item(&mut self, item: LayoutItem) -> Result<CellCoord> {
        let cell = self.cursor;
        self.add_item_at(cell.row, cell.column, item)?;
        self.advance_cursor();
        Ok(cell)
    }

    pub fn add_widget(&mut self, widget: WidgetHandle) -> Result<CellCoord> {
        self.add_item(LayoutItem::widget(widget))
    }

    pub fn add_layout(&mut self, layout: impl Layout) -> Result<CellCoord> {
        self.add_item(LayoutItem::layout(layout))
    }

    /// Add an expanding spacer at the cursor.
    pub fn add_spacer(&mut self) -> Result<CellCoord> {
        self.add_item(LayoutItem::spacer(Spacer::expanding()))
    }

    /// Add an expanding spacer at a row-major cell index.
    pub fn add_spacer_at(&mut self, index: u32) -> Result<CellCoord> {
        let columns = self.dimensions.columns.max(1);
        let cell = CellCoord::new(index / columns, index % columns);
        self.add_spacer_at_position(cell.row, cell.column)?;
        Ok(cell)
    }

    pub fn add_spacer_at_position(&mut self, row: u32, column: u32) -> Result<()> {
        self.add_item_at(row, column, LayoutItem::spacer(Spacer::expanding()))
    }

    pub fn add_widget_at(&mut self, row: u32, column: u32, widget: WidgetHandle) -> Result<()> {
        self.add_item_at(row, column, LayoutItem::widget(widget))
    }

    pub fn add_layout_at(&mut self, row: u32, column: u32, layout: impl Layout) -> Result<()> {
        self.add_item_at(row, column, LayoutItem::layout(layout))
    }

    /// Place `item` at `(row, column)`, replacing any occupant.
    ///
    /// Empty cells to the left in the same row are filled with expanding
    /// spacers. Fails with [`LayoutError::CellOutOfRange`] past
    /// [`MAX_GRID_LINES`].
    pub fn add_item_at(&mut self, row: u32, column: u32, mut item: LayoutItem) -> Result<()> {
        let cell = addressable(row, column)?;
        if item
            .as_widget()
            .is_some_and(|widget| self.find_widget(widget).is_some())
        {
            return Err(LayoutError::ItemAlreadyAdded);
        }
        if let Some(mut previous) = self.cells.remove(&cell) {
            previous.detach();
        }
        let mut filled = 0;
        for c in 0..column {
            let left = CellCoord::new(row, c);
            if !self.cells.contains_key(&left) {
                let mut spacer = LayoutItem::spacer(Spacer::expanding());
                spacer.attach(self.id, self.owner.as_ref());
                self.cells.insert(left, spacer);
                filled += 1;
            }
        }
        item.attach(self.id, self.owner.as_ref());
        self.cells.insert(cell, item);
        self.dimensions.rows = self.dimensions.rows.max(row + 1);
        self.dimensions.columns = self.dimensions.columns.max(column + 1);
        self.sync_rows();
        debug!(
            layout = self.id.get(),
            row,
            column,
            back_filled = filled,
            rows = self.dimensions.rows,
            columns = self.dimensions.columns,
            "grid item added"
        );
        self.request_layout();
        Ok(())
    }

    /// Take the item at `(row, column)` out of the grid.
    ///
    /// Dimensions shrink to fit the remaining cells and the cursor returns
    /// to the top-left cell.
    pub fn remove_at(&mut self, row: u32, column: u32) -> Result<LayoutItem> {
        let cell = CellCoord::new(row, column);
        let Some(mut item) = self.cells.remove(&cell) else {
            return Err(LayoutError::CellUnoccupied { row, column });
        };
        item.detach();
        self.dimensions = self.occupied_dimensions();
        self.cursor = CellCoord::default();
        self.sync_rows();
        debug!(
            layout = self.id.get(),
            row,
            column,
            rows = self.dimensions.rows,
            columns = self.dimensions.columns,
            "grid item removed"
        );
        self.request_layout();
        Ok(item)
    }

    pub fn remove_widget(&mut self, widget: &WidgetHandle) -> bool {
        match self.find_widget(widget) {
            Some(cell) => self.remove_at(cell.row, cell.column).is_ok(),
            None => false,
        }
    }

    /// Remove every item and span.
    pub fn remove_all(&mut self) {
        for item in self.cells.values_mut() {
            item.detach();
        }
        self.cells.clear();
        self.spans.clear();
        self.dimensions = GridDimensions::default();
        self.cursor = CellCoord::default();
        self.sync_rows();
        self.request_layout();
    }

    pub fn find_widget(&self, widget: &WidgetHandle) -> Option<CellCoord> {
        self.cells
            .iter()
            .find(|(_, item)| item.holds_widget(widget))
            .map(|(cell, _)| *cell)
    }

    pub fn is_item_at(&self, row: u32, column: u32) -> bool {
        self.cells.contains_key(&CellCoord::new(row, column))
    }

    pub fn item_at(&self, row: u32, column: u32) -> Result<&LayoutItem> {
        self.cells
            .get(&CellCoord::new(row, column))
            .ok_or(LayoutError::CellUnoccupied { row, column })
    }

    pub fn item_at_mut(&mut self, row: u32, column: u32) -> Result<&mut LayoutItem> {
        self.cells
            .get_mut(&CellCoord::new(row, column))
            .ok_or(LayoutError::CellUnoccupied { row, column })
    }

    pub fn widget_at(&self, row: u32, column: u32) -> Result<WidgetHandle> {
        self.item_at(row, column)?
            .as_widget()
            .cloned()
            .ok_or(LayoutError::NotAWidget { row, column })
    }

    pub fn layout_at(&self, row: u32, column: u32) -> Result<&dyn Layout> {
        self.item_at(row, column)?
            .as_layout()
            .ok_or(LayoutError::NotALayout { row, column })
    }

    pub fn layout_at_mut(&mut self, row: u32, column: u32) -> Result<&mut (dyn Layout + 'static)> {
        self.item_at_mut(row, column)?
            .as_layout_mut()
            .ok_or(LayoutError::NotALayout { row, column })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &LayoutItem)> {
        self.cells.iter().map(|(cell, item)| (*cell, item))
    }

    /// Occupied column indices of `row`, ascending.
    pub fn row_columns(&self, row: u32) -> &[u32] {
        self.rows
            .get(row as usize)
            .map(|r| r.columns.as_slice())
            .unwrap_or(&[])
    }

    /// Geometry given to `row` by the last pass.
    pub fn row_geometry(&self, row: u32) -> Option<Rect> {
        self.rows.get(row as usize).map(|r| r.geometry)
    }

    /// Merge `rows x columns` cells starting at `(row, column)`.
    ///
    /// Zero counts are treated as one. A span reaching past
    /// [`MAX_GRID_LINES`] fails with [`LayoutError::CellOutOfRange`].
    pub fn add_span(&mut self, row: u32, column: u32, rows: u32, columns: u32) -> Result<()> {
        if rows == 0 || columns == 0 {
            warn!(row, column, rows, columns, "empty grid span clamped to one cell");
        }
        let to = CellCoord::new(
            row.saturating_add(rows.max(1) - 1),
            column.saturating_add(columns.max(1) - 1),
        );
        self.add_span_cells(CellCoord::new(row, column), to)
    }

    /// Merge the inclusive cell range between two corners.
    pub fn add_span_cells(&mut self, from: CellCoord, to: CellCoord) -> Result<()> {
        addressable(from.row, from.column)?;
        addressable(to.row, to.column)?;
        let span = GridSpan::new(from, to);
        debug!(
            layout = self.id.get(),
            from = ?span.from,
            to = ?span.to,
            "grid span added"
        );
        self.spans.push(span);
        self.request_layout();
        Ok(())
    }

    /// Rows with a visible occupant of nonzero height.
    pub fn visible_rows(&self) -> u32 {
        count_true(&self.line_demand(Line::Row, LayoutItem::minimum_size, true).sized)
    }

    /// Columns with a visible occupant of nonzero width.
    pub fn visible_columns(&self) -> u32 {
        count_true(&self.line_demand(Line::Column, LayoutItem::minimum_size, true).sized)
    }

    pub fn row_minimum_size(&self, row: u32) -> u16 {
        line_value(&self.line_demand(Line::Row, LayoutItem::minimum_size, true), row)
    }

    pub fn row_maximum_size(&self, row: u32) -> u16 {
        line_value(&self.line_demand(Line::Row, bounded_maximum, false), row)
    }

    pub fn column_minimum_size(&self, column: u32) -> u16 {
        line_value(&self.line_demand(Line::Column, LayoutItem::minimum_size, true), column)
    }

    pub fn column_maximum_size(&self, column: u32) -> u16 {
        line_value(&self.line_demand(Line::Column, bounded_maximum, false), column)
    }

    fn advance_cursor(&mut self) {
        self.cursor.column += 1;
        if self.cursor.column >= self.dimensions.columns {
            self.cursor.column = 0;
            self.cursor.row += 1;
        }
    }

    fn occupied_dimensions(&self) -> GridDimensions {
        self.cells
            .keys()
            .fold(GridDimensions::default(), |dims, cell| {
                GridDimensions::new(dims.rows.max(cell.row + 1), dims.columns.max(cell.column + 1))
            })
    }

    fn sync_rows(&mut self) {
        self.rows
            .resize_with(self.dimensions.rows as usize, GridRow::default);
        for row in &mut self.rows {
            row.columns.clear();
        }
        for cell in self.cells.keys() {
            if let Some(row) = self.rows.get_mut(cell.row as usize) {
                row.columns.push(cell.column);
            }
        }
    }

    fn request_layout(&self) {
        if let Some(owner) = &self.owner {
            owner.request_layout();
        }
    }

    fn line_count(&self, line: Line) -> u32 {
        match line {
            Line::Row => self.dimensions.rows,
            Line::Column => self.dimensions.columns,
        }
    }

    /// Per-line demand from the visible occupants.
    ///
    /// A span splits its extent (less its internal spacing) evenly over
    /// every line it covers, rounding up when `round_up` is set.
    fn line_demand(
        &self,
        line: Line,
        size_of: impl Fn(&LayoutItem) -> Size,
        round_up: bool,
    ) -> LineDemand {
        let count = self.line_count(line);
        let spacing = line.pick(self.params.spacing);
        let mut demand = LineDemand {
            extent: vec![0; count as usize],
            occupied: vec![false; count as usize],
            sized: vec![false; count as usize],
        };
        if count == 0 {
            return demand;
        }
        for (&cell, item) in &self.cells {
            if !item.is_visible() || is_covered(&self.spans, cell) {
                continue;
            }
            let (first, last) = match origin_span(&self.spans, cell) {
                Some(span) => line.range(span),
                None => (line.index(cell), line.index(cell)),
            };
            let last = last.min(count - 1);
            if first > last {
                continue;
            }
            let n = last - first + 1;
            let n16 = u16::try_from(n).unwrap_or(u16::MAX);
            let total = line.pick(size_of(item)).saturating_sub(gaps(n as usize, spacing));
            let share = if round_up {
                total.div_ceil(n16)
            } else {
                total / n16
            };
            let sized = line.pick(item.minimum_size()) > 0;
            for i in first as usize..=last as usize {
                demand.extent[i] = demand.extent[i].max(share);
                demand.occupied[i] = true;
                demand.sized[i] |= sized;
            }
        }
        demand
    }

    fn computed_minimum(&self) -> Size {
        if !self.cells.values().any(LayoutItem::is_visible) {
            return Size::ZERO;
        }
        let rows = self.line_demand(Line::Row, LayoutItem::minimum_size, true);
        let columns = self.line_demand(Line::Column, LayoutItem::minimum_size, true);
        let height = sum_lines(&rows.extent, &rows.sized, self.params.spacing.height);
        let width = sum_lines(&columns.extent, &columns.sized, self.params.spacing.width);
        Size::new(width, height).grow(self.params.margins)
    }

    fn computed_maximum(&self) -> Size {
        if !self.cells.values().any(LayoutItem::is_visible) {
            return Size::MAX;
        }
        let rows = self.line_demand(Line::Row, bounded_maximum, false);
        let columns = self.line_demand(Line::Column, bounded_maximum, false);
        let height = sum_lines(&rows.extent, &rows.occupied, self.params.spacing.height);
        let width = sum_lines(&columns.extent, &columns.occupied, self.params.spacing.width);
        Size::new(width, height).grow(self.params.margins)
    }

    /// Phase 1: stack row views vertically, each solved horizontally.
    fn arrange_rows(&mut self, position: Point, size: Size, minimum: Size) {
        let row_params = SolveParams {
            margins: Sides::default(),
            spacing: self.params.spacing,
            alignment: self.params.alignment,
            always_use_spacing: true,
        };
        let container_params = SolveParams {
            always_use_spacing: false,
            ..self.params
        };
        let columns = self.dimensions.columns;
        let spans = &self.spans;
        let mut by_row: Vec<Vec<(u32, RowEntry<'_>)>> =
            (0..self.dimensions.rows).map(|_| Vec::new()).collect();
        for (&cell, item) in self.cells.iter_mut() {
            if is_covered(spans, cell) {
                continue;
            }
            if let Some(row) = by_row.get_mut(cell.row as usize) {
                row.push((cell.column, RowEntry::Item(item)));
            }
        }
        let mut views: Vec<RowView<'_>> = by_row
            .into_iter()
            .map(|cells| RowView::new(cells, columns, row_params))
            .collect();
        solve::<ColumnMajor, _>(&mut views, &container_params, position, size, minimum);
    }

    /// Phases 2 and 3: size rows/columns from phase 1 and place items.
    fn place_items(&mut self, position: Point, size: Size) {
        let heights = self.line_demand(Line::Row, LayoutItem::extents, false).extent;
        let widths = self.line_demand(Line::Column, LayoutItem::extents, false).extent;
        let inner = Rect::from_parts(position, size).inner(self.params.margins);
        let spacing = self.params.spacing;
        let xs = offsets(&widths, inner.x, spacing.width);
        let ys = offsets(&heights, inner.y, spacing.height);
        let horizontal = AxisAlignment::from_masked(self.params.alignment, Alignment::HORIZONTAL);
        let vertical = AxisAlignment::from_masked(self.params.alignment, Alignment::VERTICAL);

        let spans = &self.spans;
        for (&cell, item) in self.cells.iter_mut() {
            if !item.is_visible() || is_covered(spans, cell) {
                continue;
            }
            let last = match origin_span(spans, cell) {
                Some(span) => span.to,
                None => cell,
            };
            let (first_row, first_col) = (cell.row as usize, cell.column as usize);
            let last_row = (last.row as usize).min(heights.len().saturating_sub(1));
            let last_col = (last.column as usize).min(widths.len().saturating_sub(1));
            let area = Size::new(
                union_extent(&widths, first_col, last_col, spacing.width),
                union_extent(&heights, first_row, last_row, spacing.height),
            );
            let extent = area.min(bounded_maximum(item));
            let origin = Point::new(
                xs.get(first_col).copied().unwrap_or(inner.x),
                ys.get(first_row).copied().unwrap_or(inner.y),
            );
            let at = Point::new(
                origin.x.saturating_add(horizontal.offset(area.width, extent.width)),
                origin.y.saturating_add(vertical.offset(area.height, extent.height)),
            );
            item.layout_as(at, extent);
        }

        for (row, (&y, &height)) in self.rows.iter_mut().zip(ys.iter().zip(&heights)) {
            row.geometry = Rect::new(inner.x, y, inner.width, height);
        }
    }
}

fn bounded_maximum(item: &LayoutItem) -> Size {
    item.maximum_size().max(item.minimum_size())
}

fn count_true(flags: &[bool]) -> u32 {
    u32::try_from(flags.iter().filter(|f| **f).count()).unwrap_or(u32::MAX)
}

fn line_value(demand: &LineDemand, index: u32) -> u16 {
    demand.extent.get(index as usize).copied().unwrap_or(0)
}

fn sum_lines(extents: &[u16], include: &[bool], spacing: u16) -> u16 {
    let mut total = 0u16;
    let mut lines = 0usize;
    for (extent, _) in extents.iter().zip(include).filter(|(_, inc)| **inc) {
        total = total.saturating_add(*extent);
        lines += 1;
    }
    total.saturating_add(gaps(lines, spacing))
}

enum RowEntry<'a> {
    Item(&'a mut LayoutItem),
    Padding(Spacer),
}

impl LayoutElement for RowEntry<'_> {
    fn item_type(&self) -> ItemTypes {
        match self {
            Self::Item(item) => item.item_type(),
            Self::Padding(_) => ItemTypes::SPACER,
        }
    }
    fn is_visible(&self) -> bool {
        match self {
            Self::Item(item) => item.is_visible(),
            Self::Padding(_) => true,
        }
    }
    fn size_policy(&self) -> SizePolicy {
        match self {
            Self::Item(item) => item.size_policy(),
            Self::Padding(spacer) => spacer.size_policy(),
        }
    }
    fn weight(&self) -> Weight {
        match self {
            Self::Item(item) => item.weight(),
            Self::Padding(spacer) => spacer.weight(),
        }
    }
    fn minimum_size(&self) -> Size {
        match self {
            Self::Item(item) => item.minimum_size(),
            Self::Padding(spacer) => spacer.minimum_size(),
        }
    }
    fn maximum_size(&self) -> Size {
        match self {
            Self::Item(item) => item.maximum_size(),
            Self::Padding(spacer) => spacer.maximum_size(),
        }
    }
    fn layout_as(&mut self, position: Point, size: Size) {
        match self {
            Self::Item(item) => item.layout_as(position, size),
            Self::Padding(spacer) => spacer.set_geometry(position, size),
        }
    }
}

/// One grid row, solved as a horizontal box.
struct RowView<'a> {
    entries: Vec<RowEntry<'a>>,
    params: SolveParams,
}

impl<'a> RowView<'a> {
    /// Order `cells` by column and fill every other cell up to `columns`
    /// with a transient spacer.
    ///
    /// Cells under a span get a spacer too, so every row solves over the
    /// same number of columns and a span origin is sized like one cell.
    fn new(mut cells: Vec<(u32, RowEntry<'a>)>, columns: u32, params: SolveParams) -> Self {
        for column in 0..columns {
            if cells.iter().any(|(c, _)| *c == column) {
                continue;
            }
            cells.push((column, RowEntry::Padding(Spacer::expanding())));
        }
        cells.sort_by_key(|(column, _)| *column);
        Self {
            entries: cells.into_iter().map(|(_, entry)| entry).collect(),
            params,
        }
    }
}

impl LayoutElement for RowView<'_> {
    fn item_type(&self) -> ItemTypes {
        ItemTypes::LAYOUT
    }

    fn is_visible(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, RowEntry::Item(item) if item.is_visible()))
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy::EXPANDING
    }

    fn weight(&self) -> Weight {
        Weight::ONE
    }

    fn minimum_size(&self) -> Size {
        minimum_extent::<RowMajor, _>(&self.entries, &self.params)
    }

    fn maximum_size(&self) -> Size {
        maximum_extent::<RowMajor, _>(&self.entries, &self.params)
    }

    fn layout_as(&mut self, position: Point, size: Size) {
        let minimum = self.minimum_size();
        solve::<RowMajor, _>(&mut self.entries, &self.params, position, size, minimum);
    }
}

impl Layout for GridLayout {
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
        for item in self.cells.values_mut() {
            item.attach(self.id, owner.as_ref());
        }
        self.owner = owner;
    }

    fn arrange(&mut self, position: Point, size: Size) {
        self.geometry = Rect::from_parts(position, size);
        if self.cells.is_empty() {
            return;
        }
        trace!(
            layout = self.id.get(),
            rows = self.dimensions.rows,
            columns = self.dimensions.columns,
            spans = self.spans.len(),
            "grid layout pass"
        );
        let minimum = self.minimum_size();
        self.arrange_rows(position, size, minimum);
        self.place_items(position, size);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
