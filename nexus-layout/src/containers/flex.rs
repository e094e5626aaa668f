//! FlexContainer - single-axis distribution.
//!
//! Items flow along the main axis (left to right for `Row`, top to bottom
//! for `Column`) in ascending `order`. Each pass:
//!
//! 1. measures every item (basis = explicit `flex_basis` or preferred size),
//! 2. grows or shrinks the bases to fit the main axis minus gaps,
//! 3. offsets items per `justify`,
//! 4. positions each item on the cross axis per `align_self` or `align`,
//! 5. issues one frame per item.
//!
//! The container's own size is an input; a pass never changes it.

use tracing::{debug, trace, warn};

use crate::alignment::{Align, Direction, Justify};
use crate::config::{FlexConfig, sanitize_gap};
use crate::flex::{FlexInput, arrange, distribute_flex};
use crate::geometry::Size;
use crate::host::{LayoutHost, Placement, WidgetHandle};
use crate::item::{ItemId, ItemTarget, LayoutItem, Slots};

use super::Container;

/// Per-pass snapshot of one measured item.
struct Measured {
    id: ItemId,
    widget: WidgetHandle,
    input: FlexInput,
    natural_cross: f32,
    align: Align,
}

/// A row or column of items sharing the main axis.
#[derive(Debug, Clone)]
pub struct FlexContainer {
    config: FlexConfig,
    items: Slots<LayoutItem>,
    size: Size,
    dirty: bool,
    passes: u64,
}

impl Default for FlexContainer {
    fn default() -> Self {
        Self::new(FlexConfig::default())
    }
}

impl FlexContainer {
    pub fn new(mut config: FlexConfig) -> Self {
        config.gap = sanitize_gap(config.gap);
        Self {
            config,
            items: Slots::default(),
            size: Size::ZERO,
            dirty: false,
            passes: 0,
        }
    }

    /// Register an item and lay out again. The same widget may be added more
    /// than once; each registration is an independent item.
    pub fn add_item(&mut self, host: &mut dyn LayoutHost, item: impl Into<LayoutItem>) -> ItemId {
        let item = item.into();
        let widget = item.widget;
        let id = self.items.push(item);
        trace!(?id, %widget, "flex item added");
        self.invalidate(host);
        id
    }

    /// Remove every matching item. Unknown targets are a no-op.
    pub fn remove_item(&mut self, host: &mut dyn LayoutHost, target: impl Into<ItemTarget>) -> usize {
        let target = target.into();
        let removed = self.items.remove_where(|slot| target.matches(slot.id, slot.item.widget));
        if removed > 0 {
            trace!(?target, removed, "flex items removed");
            self.invalidate(host);
        }
        removed
    }

    /// Drop every item.
    pub fn clear(&mut self, host: &mut dyn LayoutHost) {
        if !self.items.is_empty() {
            self.items.clear();
            self.invalidate(host);
        }
    }

    pub fn set_direction(&mut self, host: &mut dyn LayoutHost, direction: Direction) {
        if self.config.direction != direction {
            self.config.direction = direction;
            self.invalidate(host);
        }
    }

    pub fn set_align(&mut self, host: &mut dyn LayoutHost, align: Align) {
        if self.config.align != align {
            self.config.align = align;
            self.invalidate(host);
        }
    }

    pub fn set_justify(&mut self, host: &mut dyn LayoutHost, justify: Justify) {
        if self.config.justify != justify {
            self.config.justify = justify;
            self.invalidate(host);
        }
    }

    pub fn set_gap(&mut self, host: &mut dyn LayoutHost, gap: f32) {
        let gap = sanitize_gap(gap);
        if self.config.gap != gap {
            self.config.gap = gap;
            self.invalidate(host);
        }
    }

    pub fn config(&self) -> &FlexConfig {
        &self.config
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &LayoutItem)> {
        self.items.iter().map(|slot| (slot.id, &slot.item))
    }

    pub fn item(&self, id: ItemId) -> Option<&LayoutItem> {
        self.items.get(id).map(|slot| &slot.item)
    }

    /// Replace an item's hints in place, keeping its id and insertion slot.
    pub fn update_item(
        &mut self,
        host: &mut dyn LayoutHost,
        id: ItemId,
        f: impl FnOnce(LayoutItem) -> LayoutItem,
    ) -> bool {
        let Some(slot) = self.items.get_mut(id) else {
            return false;
        };
        let updated = f(slot.item.clone());
        if updated != slot.item {
            slot.item = updated;
            self.invalidate(host);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of passes that issued placements.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// Mark the layout stale and run a pass. Without a size the pass is
    /// skipped and stays owed until the next resize.
    fn invalidate(&mut self, host: &mut dyn LayoutHost) {
        self.dirty = true;
        self.relayout(host);
    }

    fn measure_items(&self, host: &mut dyn LayoutHost, pruned: &mut Vec<ItemId>) -> Vec<Measured> {
        let direction = self.config.direction;
        let order = self.items.sorted_by_key(|item| item.order);
        let mut measured = Vec::with_capacity(order.len());

        for index in order {
            let slot = self.items.at(index);
            let item = &slot.item;
            let preferred = match host.measure(item.widget) {
                Ok(size) => size,
                Err(err) => {
                    warn!("Dropping flex item {:?}: {}", slot.id, err);
                    pruned.push(slot.id);
                    continue;
                }
            };

            let basis = item.flex_basis.unwrap_or_else(|| direction.main(preferred));
            measured.push(Measured {
                id: slot.id,
                widget: item.widget,
                input: FlexInput::new(basis, item.flex_grow, item.flex_shrink),
                natural_cross: direction.cross(preferred),
                align: item.align_self.unwrap_or(self.config.align),
            });
        }

        measured
    }
}

impl Container for FlexContainer {
    fn relayout(&mut self, host: &mut dyn LayoutHost) {
        if self.items.is_empty() || self.size.is_empty() {
            trace!(items = self.items.len(), size = ?self.size, "flex relayout skipped");
            self.dirty = !self.items.is_empty();
            return;
        }
        self.dirty = false;

        let FlexConfig { direction, justify, gap, .. } = self.config;
        let main_size = direction.main(self.size);
        let cross_size = direction.cross(self.size);

        let mut pruned = Vec::new();
        let measured = self.measure_items(host, &mut pruned);

        if !measured.is_empty() {
            self.passes += 1;
            let n = measured.len();
            let total_gap = gap * (n - 1) as f32;
            let available = (main_size - total_gap).max(0.0);

            let inputs: Vec<FlexInput> = measured.iter().map(|m| m.input).collect();
            let distribution = distribute_flex(&inputs, available);
            if distribution.overflow > 0.0 {
                warn!(
                    overflow = distribution.overflow,
                    available, "flex items overflow their container and cannot shrink further"
                );
            }
            let offsets = arrange(justify, &distribution.sizes, available, gap);

            for ((m, &main_len), &main_pos) in measured.iter().zip(&distribution.sizes).zip(&offsets) {
                let (cross_pos, cross_len) = m.align.resolve(m.natural_cross, cross_size);
                let frame = direction.frame(main_pos, main_len, cross_pos, cross_len);
                trace!(id = ?m.id, widget = %m.widget, ?frame, "place flex item");
                if let Err(err) = host.place(m.widget, Placement::Frame(frame)) {
                    warn!("Dropping flex item {:?}: {}", m.id, err);
                    pruned.push(m.id);
                }
            }

            debug!(items = n, main_size, cross_size, "flex relayout");
        }

        if !pruned.is_empty() {
            self.items.remove_where(|slot| pruned.contains(&slot.id));
        }
    }

    fn on_container_resized(&mut self, host: &mut dyn LayoutHost, size: Size) {
        if size == self.size && !self.dirty {
            return;
        }
        trace!(from = ?self.size, to = ?size, "flex container resized");
        self.size = size;
        self.relayout(host);
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

// =========================================================================
// Tests
// =========================================================================
