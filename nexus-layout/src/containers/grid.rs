//! GridContainer - responsive column grid.
//!
//! Items are placed left to right on a fixed number of equal-weight column
//! tracks, wrapping to a new row whenever the next span does not fit. The
//! span of each item depends on the current breakpoint tier, which follows
//! the container's width. Spans cascade mobile-first: a tier without an
//! explicit span inherits the nearest narrower tier's value, and an item with
//! no span at or below the current tier takes the full width.
//!
//! Placements are grid cells; the host's grid manager turns them into pixels
//! using the tracks passed to [`LayoutHost::configure_grid`].

use tracing::{debug, trace, warn};

use crate::breakpoint::Breakpoints;
use crate::config::{GridConfig, sanitize_gap};
use crate::error::LayoutError;
use crate::geometry::Size;
use crate::host::{GridCell, GridTracks, LayoutHost, Placement};
use crate::item::{ItemId, ItemTarget, LayoutItem, Slots, clamp_span};

use super::Container;

/// A responsive column grid.
#[derive(Debug, Clone)]
pub struct GridContainer {
    columns: u16,
    gap: f32,
    breakpoints: Breakpoints,
    items: Slots<LayoutItem>,
    width: f32,
    current: usize,
    dirty: bool,
    passes: u64,
}

impl GridContainer {
    pub fn new(config: GridConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        let GridConfig { columns, gap, breakpoints } = config;
        let current = breakpoints.resolve_index(0.0).unwrap_or(0);
        Ok(Self {
            columns,
            gap: sanitize_gap(gap),
            breakpoints,
            items: Slots::default(),
            width: 0.0,
            current,
            dirty: false,
            passes: 0,
        })
    }

    /// Register an item and lay out again; its `column_spans` and `order`
    /// drive placement.
    pub fn add_item(&mut self, host: &mut dyn LayoutHost, item: impl Into<LayoutItem>) -> ItemId {
        let item = item.into();
        for tier in item.column_spans.unknown_tiers(&self.breakpoints) {
            warn!(%tier, widget = %item.widget, "ignoring column span for unknown breakpoint tier");
        }
        let id = self.items.push(item);
        trace!(?id, "grid item added");
        self.invalidate(host);
        id
    }

    /// Remove every matching item. Unknown targets are a no-op.
    pub fn remove_item(&mut self, host: &mut dyn LayoutHost, target: impl Into<ItemTarget>) -> usize {
        let target = target.into();
        let removed = self.items.remove_where(|slot| target.matches(slot.id, slot.item.widget));
        if removed > 0 {
            self.invalidate(host);
        }
        removed
    }

    pub fn clear(&mut self, host: &mut dyn LayoutHost) {
        if !self.items.is_empty() {
            self.items.clear();
            self.invalidate(host);
        }
    }

    pub fn set_gap(&mut self, host: &mut dyn LayoutHost, gap: f32) {
        let gap = sanitize_gap(gap);
        if self.gap != gap {
            self.gap = gap;
            self.invalidate(host);
        }
    }

    /// Resize notification carrying only the new width.
    pub fn on_resize(&mut self, host: &mut dyn LayoutHost, width: f32) {
        self.width = width;
        let tier = self.breakpoints.resolve_index(width).unwrap_or(0);

        if tier == self.current && !self.dirty {
            trace!(width, tier = self.current_breakpoint(), "grid breakpoint unchanged");
            return;
        }
        if tier != self.current {
            let from = self.current_breakpoint().to_string();
            self.current = tier;
            debug!(width, %from, to = self.current_breakpoint(), "grid breakpoint changed");
        }
        self.relayout(host);
    }

    /// Name of the tier in effect for the last reported width.
    pub fn current_breakpoint(&self) -> &str {
        self.breakpoints
            .names()
            .nth(self.current)
            .unwrap_or_default()
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Column tracks as handed to the host on every pass.
    pub fn tracks(&self) -> GridTracks {
        GridTracks::uniform(self.columns, self.gap)
    }

    /// Effective span of an item at the current tier, clamped to the grid.
    pub fn span_of(&self, item: &LayoutItem) -> u16 {
        let raw = item
            .column_spans
            .inherited(&self.breakpoints, self.current)
            .unwrap_or(self.columns);
        clamp_span(raw, self.columns)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, &LayoutItem)> {
        self.items.iter().map(|slot| (slot.id, &slot.item))
    }

    pub fn item(&self, id: ItemId) -> Option<&LayoutItem> {
        self.items.get(id).map(|slot| &slot.item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of passes that issued placements.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    fn invalidate(&mut self, host: &mut dyn LayoutHost) {
        self.dirty = true;
        self.relayout(host);
    }
}

impl Container for GridContainer {
    fn relayout(&mut self, host: &mut dyn LayoutHost) {
        if self.items.is_empty() || self.width.is_nan() || self.width <= 0.0 {
            trace!(items = self.items.len(), width = self.width, "grid relayout skipped");
            // Items that could not be placed yet still owe a pass.
            self.dirty = !self.items.is_empty();
            return;
        }
        self.dirty = false;
        self.passes += 1;

        host.configure_grid(&self.tracks());

        let order = self.items.sorted_by_key(|item| item.order);
        let mut pruned: Vec<ItemId> = Vec::new();
        let (mut row, mut col) = (0u32, 0u16);

        for index in order {
            let slot = self.items.at(index);
            let raw = slot
                .item
                .column_spans
                .inherited(&self.breakpoints, self.current)
                .unwrap_or(self.columns);
            let span = clamp_span(raw, self.columns);
            if span != raw {
                debug!(id = ?slot.id, raw, span, columns = self.columns, "column span clamped");
            }

            if u32::from(col) + u32::from(span) > u32::from(self.columns) {
                row += 1;
                col = 0;
            }

            let cell = GridCell {
                row,
                col,
                row_span: 1,
                col_span: span,
            };
            trace!(id = ?slot.id, widget = %slot.item.widget, ?cell, "place grid item");
            match host.place(slot.item.widget, Placement::Cell(cell)) {
                Ok(()) => col += span,
                Err(err) => {
                    warn!("Dropping grid item {:?}: {}", slot.id, err);
                    pruned.push(slot.id);
                }
            }
        }

        debug!(
            items = self.items.len() - pruned.len(),
            rows = row + 1,
            tier = self.current_breakpoint(),
            "grid relayout"
        );

        if !pruned.is_empty() {
            self.items.remove_where(|slot| pruned.contains(&slot.id));
        }
    }

    fn on_container_resized(&mut self, host: &mut dyn LayoutHost, size: Size) {
        self.on_resize(host, size.width);
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessHost, WidgetHandle};
    use crate::item::ColumnSpans;

    fn w(raw: u64) -> WidgetHandle {
        WidgetHandle::new(raw)
    }

    fn cell(row: u32, col: u16, col_span: u16) -> GridCell {
        GridCell { row, col, row_span: 1, col_span }
    }

    fn grid() -> GridContainer {
        GridContainer::new(GridConfig::default()).unwrap()
    }

    #[test]
    fn test_grid_new() {
        let grid = grid();
        assert_eq!(grid.columns(), 12);
        assert_eq!(grid.current_breakpoint(), "xs");
        assert!(grid.is_empty());
    }

    #[test]
    fn test_grid_rejects_zero_columns() {
        let err = GridContainer::new(GridConfig::default().columns(0)).unwrap_err();
        assert_eq!(err, LayoutError::ZeroColumns);
    }

    #[test]
    fn test_grid_two_per_row_at_md_and_wider() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        for raw in 1..=3 {
            grid.add_item(&mut host, LayoutItem::new(w(raw)).span("md", 6));
        }

        for width in [800.0, 1000.0, 1250.0, 1600.0] {
            grid.on_resize(&mut host, width);
            grid.relayout(&mut host);
            assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 6)), "width {}", width);
            assert_eq!(host.cell_of(w(2)), Some(cell(0, 6, 6)), "width {}", width);
            assert_eq!(host.cell_of(w(3)), Some(cell(1, 0, 6)), "width {}", width);
        }
    }

    #[test]
    fn test_grid_full_width_below_first_span() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("md", 6));
        grid.add_item(&mut host, LayoutItem::new(w(2)).span("md", 6));

        grid.on_resize(&mut host, 600.0);

        assert_eq!(grid.current_breakpoint(), "sm");
        assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 12)));
        assert_eq!(host.cell_of(w(2)), Some(cell(1, 0, 12)));
    }

    #[test]
    fn test_grid_full_span_starts_new_row() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("xs", 3));
        grid.add_item(&mut host, LayoutItem::new(w(2)).span("xs", 12));
        grid.add_item(&mut host, LayoutItem::new(w(3)).span("xs", 3));

        grid.on_resize(&mut host, 300.0);

        assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 3)));
        assert_eq!(host.cell_of(w(2)), Some(cell(1, 0, 12)));
        assert_eq!(host.cell_of(w(3)), Some(cell(2, 0, 3)));
    }

    #[test]
    fn test_grid_clamps_out_of_range_spans() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("xs", 0));
        grid.add_item(&mut host, LayoutItem::new(w(2)).span("xs", 40));

        grid.on_resize(&mut host, 300.0);

        assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 1)));
        assert_eq!(host.cell_of(w(2)), Some(cell(1, 0, 12)));
    }

    #[test]
    fn test_grid_orders_items() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("xs", 4).order(1));
        grid.add_item(&mut host, LayoutItem::new(w(2)).span("xs", 4));

        grid.on_resize(&mut host, 300.0);

        assert_eq!(host.cell_of(w(2)), Some(cell(0, 0, 4)));
        assert_eq!(host.cell_of(w(1)), Some(cell(0, 4, 4)));
    }

    #[test]
    fn test_grid_skips_relayout_when_breakpoint_unchanged() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("md", 6));

        grid.on_resize(&mut host, 800.0);
        assert_eq!(grid.pass_count(), 1);

        grid.on_resize(&mut host, 900.0);
        assert_eq!(grid.pass_count(), 1);
        assert_eq!(grid.width(), 900.0);

        grid.on_resize(&mut host, 1000.0);
        assert_eq!(grid.current_breakpoint(), "lg");
        assert_eq!(grid.pass_count(), 2);
    }

    #[test]
    fn test_grid_add_item_to_sized_grid_places_it() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, w(1));
        grid.on_resize(&mut host, 800.0);
        host.take_commands();

        grid.add_item(&mut host, w(2));

        assert_eq!(grid.pass_count(), 2);
        assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 12)));
        assert_eq!(host.cell_of(w(2)), Some(cell(1, 0, 12)));

        // Already laid out; a resize within the tier has nothing to do.
        grid.on_resize(&mut host, 810.0);
        assert_eq!(grid.pass_count(), 2);
    }

    #[test]
    fn test_grid_remove_item_closes_gap() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        for raw in 1..=3 {
            grid.add_item(&mut host, LayoutItem::new(w(raw)).span("xs", 6));
        }
        grid.on_resize(&mut host, 300.0);
        assert_eq!(host.cell_of(w(3)), Some(cell(1, 0, 6)));

        assert_eq!(grid.remove_item(&mut host, w(1)), 1);
        assert_eq!(host.cell_of(w(2)), Some(cell(0, 0, 6)));
        assert_eq!(host.cell_of(w(3)), Some(cell(0, 6, 6)));
        assert_eq!(grid.remove_item(&mut host, w(9)), 0);
    }

    #[test]
    fn test_grid_wide_column_counts_do_not_overflow() {
        let mut host = HeadlessHost::new();
        let mut grid = GridContainer::new(GridConfig::default().columns(u16::MAX)).unwrap();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("xs", 40_000));
        grid.add_item(&mut host, LayoutItem::new(w(2)).span("xs", 40_000));

        grid.on_resize(&mut host, 300.0);

        assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 40_000)));
        assert_eq!(host.cell_of(w(2)), Some(cell(1, 0, 40_000)));
    }

    #[test]
    fn test_grid_configures_equal_tracks() {
        let mut host = HeadlessHost::new();
        let mut grid = GridContainer::new(GridConfig::default().gap(8.0)).unwrap();
        grid.add_item(&mut host, w(1));
        grid.on_resize(&mut host, 500.0);

        let tracks = host.grid_tracks().unwrap();
        assert_eq!(tracks.columns(), 12);
        assert!(tracks.weights.iter().all(|weight| *weight == 1));
        assert_eq!(tracks.gap, 8.0);
    }

    #[test]
    fn test_grid_zero_width_issues_nothing() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, w(1));
        grid.on_resize(&mut host, 0.0);
        assert!(host.commands().is_empty());
        assert_eq!(grid.current_breakpoint(), "xs");

        // Growing within the same tier still runs the owed pass.
        grid.on_resize(&mut host, 300.0);
        assert_eq!(host.cell_of(w(1)), Some(cell(0, 0, 12)));
    }

    #[test]
    fn test_grid_prunes_destroyed_widgets_and_closes_gap() {
        let mut host = HeadlessHost::new();
        host.destroy(w(1));
        let mut grid = grid();
        grid.add_item(&mut host, LayoutItem::new(w(1)).span("xs", 6));
        grid.add_item(&mut host, LayoutItem::new(w(2)).span("xs", 6));

        grid.on_resize(&mut host, 300.0);

        assert_eq!(grid.len(), 1);
        assert_eq!(host.cell_of(w(2)), Some(cell(0, 0, 6)));
    }

    #[test]
    fn test_grid_span_of_uses_current_tier() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        let spans = ColumnSpans::new().with("xs", 12).with("md", 6).with("xl", 3);
        let item = LayoutItem::new(w(1)).spans(spans);

        for (width, expected) in [(100.0, 12), (700.0, 12), (800.0, 6), (1000.0, 6), (1300.0, 3), (1500.0, 3)] {
            grid.on_resize(&mut host, width);
            assert_eq!(grid.span_of(&item), expected, "width {}", width);
        }
    }

    #[test]
    fn test_grid_set_gap_relayouts_only_on_change() {
        let mut host = HeadlessHost::new();
        let mut grid = grid();
        grid.add_item(&mut host, w(1));
        grid.on_resize(&mut host, 300.0);

        grid.set_gap(&mut host, 0.0);
        assert_eq!(grid.pass_count(), 1);

        grid.set_gap(&mut host, 12.0);
        assert_eq!(grid.pass_count(), 2);
        assert_eq!(grid.gap(), 12.0);
        assert_eq!(host.grid_tracks().map(|tracks| tracks.gap), Some(12.0));
    }
}
