//! StackContainer - overlay placement.
//!
//! Every item covers the container's full bounds. Items are stacked by
//! `z_index` (higher on top), equal indices in insertion order. No
//! distribution math is involved.

use tracing::{debug, trace, warn};

use crate::geometry::{Rect, Size};
use crate::host::{LayoutHost, Placement, StackOp, WidgetHandle};
use crate::item::{ItemId, ItemTarget, Slots};

use super::Container;

#[derive(Debug, Clone, Copy, PartialEq)]
struct StackItem {
    widget: WidgetHandle,
    z_index: i32,
}

/// Children overlaid on top of each other.
#[derive(Debug, Clone, Default)]
pub struct StackContainer {
    items: Slots<StackItem>,
    size: Size,
    dirty: bool,
    passes: u64,
}

impl StackContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget covering the full bounds and lay out again.
    pub fn add_item(&mut self, host: &mut dyn LayoutHost, widget: WidgetHandle, z_index: i32) -> ItemId {
        let id = self.items.push(StackItem { widget, z_index });
        trace!(?id, %widget, z_index, "stack item added");
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

    /// Move matching items above every other item.
    ///
    /// Only the ordering command is issued; frames are left alone. Returns
    /// whether anything matched.
    pub fn bring_to_front(&mut self, host: &mut dyn LayoutHost, target: impl Into<ItemTarget>) -> bool {
        let mut top = self.items.iter().map(|slot| slot.item.z_index).max().unwrap_or(0);
        if top == i32::MAX {
            self.renumber();
            top = self.items.iter().map(|slot| slot.item.z_index).max().unwrap_or(0);
        }
        self.restack(host, target.into(), top + 1, StackOp::Raise)
    }

    /// Move matching items below every other item.
    pub fn send_to_back(&mut self, host: &mut dyn LayoutHost, target: impl Into<ItemTarget>) -> bool {
        let mut bottom = self.items.iter().map(|slot| slot.item.z_index).min().unwrap_or(0);
        if bottom == i32::MIN {
            self.renumber();
            bottom = 0;
        }
        self.restack(host, target.into(), bottom - 1, StackOp::Lower)
    }

    /// Replace z-indices by their rank (0, 1, ...) in the current stacking
    /// order, freeing room at both ends of the `i32` range.
    fn renumber(&mut self) {
        let ids: Vec<ItemId> = self
            .items
            .sorted_by_key(|item| item.z_index)
            .into_iter()
            .map(|index| self.items.at(index).id)
            .collect();
        debug!(items = ids.len(), "renumbering stack z-indices");
        for (rank, id) in ids.into_iter().enumerate() {
            if let Some(slot) = self.items.get_mut(id) {
                slot.item.z_index = i32::try_from(rank).unwrap_or(i32::MAX);
            }
        }
    }

    fn restack(&mut self, host: &mut dyn LayoutHost, target: ItemTarget, z_index: i32, op: StackOp) -> bool {
        let ids: Vec<ItemId> = self
            .items
            .iter()
            .filter(|slot| target.matches(slot.id, slot.item.widget))
            .map(|slot| slot.id)
            .collect();
        if ids.is_empty() {
            return false;
        }

        let mut pruned = Vec::new();
        for id in ids {
            let Some(slot) = self.items.get_mut(id) else {
                continue;
            };
            slot.item.z_index = z_index;
            let widget = slot.item.widget;
            if let Err(err) = host.restack(widget, op) {
                warn!("Dropping stack item {:?}: {}", id, err);
                pruned.push(id);
            }
        }
        if !pruned.is_empty() {
            self.items.remove_where(|slot| pruned.contains(&slot.id));
        }
        true
    }

    pub fn z_index(&self, id: ItemId) -> Option<i32> {
        self.items.get(id).map(|slot| slot.item.z_index)
    }

    /// Widgets from bottom to top.
    pub fn stacking_order(&self) -> Vec<WidgetHandle> {
        self.items
            .sorted_by_key(|item| item.z_index)
            .into_iter()
            .map(|index| self.items.at(index).item.widget)
            .collect()
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

    fn invalidate(&mut self, host: &mut dyn LayoutHost) {
        self.dirty = true;
        self.relayout(host);
    }
}

impl Container for StackContainer {
    fn relayout(&mut self, host: &mut dyn LayoutHost) {
        if self.items.is_empty() || self.size.is_empty() {
            self.dirty = !self.items.is_empty();
            return;
        }
        self.dirty = false;
        self.passes += 1;

        let bounds = Rect::new(0.0, 0.0, self.size.width, self.size.height);
        let mut pruned = Vec::new();

        // Raising bottom to top leaves the host in z order.
        for index in self.items.sorted_by_key(|item| item.z_index) {
            let slot = self.items.at(index);
            let widget = slot.item.widget;
            let result = host
                .place(widget, Placement::Frame(bounds))
                .and_then(|()| host.restack(widget, StackOp::Raise));
            if let Err(err) = result {
                warn!("Dropping stack item {:?}: {}", slot.id, err);
                pruned.push(slot.id);
            }
        }

        debug!(items = self.items.len() - pruned.len(), size = ?self.size, "stack relayout");
        if !pruned.is_empty() {
            self.items.remove_where(|slot| pruned.contains(&slot.id));
        }
    }

    fn on_container_resized(&mut self, host: &mut dyn LayoutHost, size: Size) {
        if size == self.size && !self.dirty {
            return;
        }
        self.size = size;
        self.relayout(host);
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}
