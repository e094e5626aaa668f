//! Per-child layout records.
//!
//! A [`LayoutItem`] carries everything a container needs to know about one
//! child: the widget handle, flex sizing hints, an optional cross-axis
//! alignment override, an ordering key and per-tier column spans. Items are
//! built with a small builder and handed to a container, which answers with an
//! [`ItemId`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::alignment::Align;
use crate::breakpoint::Breakpoints;
use crate::host::WidgetHandle;

/// Identifier of an item inside one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    #[inline]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Selects items for removal: every item of a widget, or one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTarget {
    Widget(WidgetHandle),
    Item(ItemId),
}

impl ItemTarget {
    #[inline]
    pub(crate) fn matches(self, id: ItemId, widget: WidgetHandle) -> bool {
        match self {
            ItemTarget::Widget(w) => w == widget,
            ItemTarget::Item(i) => i == id,
        }
    }
}

impl From<WidgetHandle> for ItemTarget {
    fn from(widget: WidgetHandle) -> Self {
        ItemTarget::Widget(widget)
    }
}

impl From<ItemId> for ItemTarget {
    fn from(id: ItemId) -> Self {
        ItemTarget::Item(id)
    }
}

/// Explicit column spans keyed by breakpoint tier name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSpans(IndexMap<String, u16>);

impl ColumnSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, tier: impl Into<String>, span: u16) -> Self {
        self.set(tier, span);
        self
    }

    pub fn set(&mut self, tier: impl Into<String>, span: u16) {
        self.0.insert(tier.into(), span);
    }

    /// Explicitly set span for a tier (no inheritance).
    pub fn get(&self, tier: &str) -> Option<u16> {
        self.0.get(tier).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.0.iter().map(|(tier, span)| (tier.as_str(), *span))
    }

    /// Raw span in effect at the tier at `tier_index`, mobile-first.
    ///
    /// Walks tiers from narrowest up to `tier_index`, carrying forward the
    /// last explicit value. `None` means no tier up to this one was set; the
    /// caller defaults that to the full column count. The result is not
    /// clamped.
    pub fn inherited(&self, breakpoints: &Breakpoints, tier_index: usize) -> Option<u16> {
        breakpoints
            .names()
            .take(tier_index + 1)
            .filter_map(|name| self.get(name))
            .last()
    }

    /// Tier names that the breakpoint table does not know about.
    pub fn unknown_tiers<'a>(
        &'a self,
        breakpoints: &'a Breakpoints,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .keys()
            .map(String::as_str)
            .filter(move |tier| !breakpoints.contains(tier))
    }
}

impl<S: Into<String>> FromIterator<(S, u16)> for ColumnSpans {
    fn from_iter<I: IntoIterator<Item = (S, u16)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(tier, span)| (tier.into(), span)).collect())
    }
}

/// Clamp a span into `1..=columns`.
#[inline]
pub fn clamp_span(span: u16, columns: u16) -> u16 {
    span.clamp(1, columns.max(1))
}

/// Non-negative, finite weight; anything else becomes zero.
#[inline]
fn sanitize_weight(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// A child registration: widget handle plus sizing and placement hints.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub(crate) widget: WidgetHandle,
    pub(crate) order: i32,
    pub(crate) flex_grow: f32,
    pub(crate) flex_shrink: f32,
    pub(crate) flex_basis: Option<f32>,
    pub(crate) align_self: Option<Align>,
    pub(crate) column_spans: ColumnSpans,
}

impl LayoutItem {
    /// Item with default hints: grow 0, shrink 1, measured basis, container
    /// alignment, order 0, full-width spans.
    pub fn new(widget: WidgetHandle) -> Self {
        Self {
            widget,
            order: 0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: None,
            align_self: None,
            column_spans: ColumnSpans::new(),
        }
    }

    /// Share of positive free space. Negative or non-finite values become 0.
    pub fn grow(mut self, grow: f32) -> Self {
        self.flex_grow = sanitize_weight(grow);
        self
    }

    /// Share of overflow to absorb. Negative or non-finite values become 0.
    pub fn shrink(mut self, shrink: f32) -> Self {
        self.flex_shrink = sanitize_weight(shrink);
        self
    }

    /// Explicit main-axis starting size instead of the measured one.
    pub fn basis(mut self, basis: f32) -> Self {
        self.flex_basis = Some(if basis.is_finite() { basis.max(0.0) } else { 0.0 });
        self
    }

    pub fn align_self(mut self, align: Align) -> Self {
        self.align_self = Some(align);
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Explicit column span for one breakpoint tier.
    pub fn span(mut self, tier: impl Into<String>, span: u16) -> Self {
        self.column_spans.set(tier, span);
        self
    }

    pub fn spans(mut self, spans: ColumnSpans) -> Self {
        self.column_spans = spans;
        self
    }

    pub fn widget(&self) -> WidgetHandle {
        self.widget
    }

    pub fn order_key(&self) -> i32 {
        self.order
    }

    pub fn flex_grow(&self) -> f32 {
        self.flex_grow
    }

    pub fn flex_shrink(&self) -> f32 {
        self.flex_shrink
    }

    pub fn flex_basis(&self) -> Option<f32> {
        self.flex_basis
    }

    pub fn self_alignment(&self) -> Option<Align> {
        self.align_self
    }

    pub fn column_spans(&self) -> &ColumnSpans {
        &self.column_spans
    }
}

impl From<WidgetHandle> for LayoutItem {
    fn from(widget: WidgetHandle) -> Self {
        LayoutItem::new(widget)
    }
}

/// An item as stored by a container.
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
    pub id: ItemId,
    pub item: T,
}

/// Item storage shared by every container: insertion order, monotonic ids.
#[derive(Debug, Clone)]
pub(crate) struct Slots<T> {
    slots: Vec<Slot<T>>,
    next_id: u64,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Slots<T> {
    pub fn push(&mut self, item: T) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot { id, item });
        id
    }

    /// Remove every slot for which `pred` holds; returns how many went.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Slot<T>) -> bool) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| !pred(slot));
        before - self.slots.len()
    }

    pub fn get(&self, id: ItemId) -> Option<&Slot<T>> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Slot<T>> {
        self.slots.iter_mut().find(|slot| slot.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot<T>> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Slot indices sorted by `key`, ties kept in insertion order.
    pub fn sorted_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.slots.len()).collect();
        indices.sort_by_key(|&index| key(&self.slots[index].item));
        indices
    }

    pub fn at(&self, index: usize) -> &Slot<T> {
        &self.slots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs_md() -> ColumnSpans {
        ColumnSpans::new().with("xs", 12).with("md", 6)
    }

    #[test]
    fn test_item_defaults() {
        let item = LayoutItem::new(WidgetHandle::new(1));
        assert_eq!(item.flex_grow(), 0.0);
        assert_eq!(item.flex_shrink(), 1.0);
        assert_eq!(item.flex_basis(), None);
        assert_eq!(item.self_alignment(), None);
        assert_eq!(item.order_key(), 0);
        assert!(item.column_spans().is_empty());
    }

    #[test]
    fn test_item_sanitizes_weights() {
        let item = LayoutItem::new(WidgetHandle::new(1))
            .grow(-2.0)
            .shrink(f32::NAN)
            .basis(-10.0);
        assert_eq!(item.flex_grow(), 0.0);
        assert_eq!(item.flex_shrink(), 0.0);
        assert_eq!(item.flex_basis(), Some(0.0));
    }

    #[test]
    fn test_mobile_first_inheritance() {
        let bp = Breakpoints::standard();
        let spans = xs_md();
        let at = |tier: &str| spans.inherited(&bp, bp.index_of(tier).unwrap());

        assert_eq!(at("xs"), Some(12));
        assert_eq!(at("sm"), Some(12));
        assert_eq!(at("md"), Some(6));
        assert_eq!(at("lg"), Some(6));
        assert_eq!(at("xxl"), Some(6));
    }

    #[test]
    fn test_inheritance_unset_below_first_explicit_tier() {
        let bp = Breakpoints::standard();
        let spans = ColumnSpans::new().with("lg", 4);
        assert_eq!(spans.inherited(&bp, bp.index_of("md").unwrap()), None);
        assert_eq!(spans.inherited(&bp, bp.index_of("xl").unwrap()), Some(4));
    }

    #[test]
    fn test_inheritance_ignores_insertion_order_of_spans() {
        let bp = Breakpoints::standard();
        let spans = ColumnSpans::new().with("lg", 3).with("sm", 8);
        assert_eq!(spans.inherited(&bp, bp.index_of("md").unwrap()), Some(8));
        assert_eq!(spans.inherited(&bp, bp.index_of("xl").unwrap()), Some(3));
    }

    #[test]
    fn test_unknown_tiers() {
        let bp = Breakpoints::standard();
        let spans = ColumnSpans::new().with("md", 6).with("huge", 3);
        assert_eq!(spans.unknown_tiers(&bp).collect::<Vec<_>>(), ["huge"]);
    }

    #[test]
    fn test_clamp_span() {
        assert_eq!(clamp_span(0, 12), 1);
        assert_eq!(clamp_span(13, 12), 12);
        assert_eq!(clamp_span(6, 12), 6);
        assert_eq!(clamp_span(6, 0), 1);
    }

    #[test]
    fn test_slots_sorted_by_key_is_stable() {
        let mut slots = Slots::default();
        slots.push(("a", 1));
        slots.push(("b", 0));
        slots.push(("c", 1));
        slots.push(("d", 0));

        let order: Vec<&str> = slots
            .sorted_by_key(|(_, key)| *key)
            .into_iter()
            .map(|index| slots.at(index).item.0)
            .collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_slots_ids_are_never_reused() {
        let mut slots = Slots::default();
        let first = slots.push(1);
        slots.remove_where(|slot| slot.id == first);
        let second = slots.push(2);
        assert_ne!(first, second);
        assert!(slots.get(first).is_none());
        assert_eq!(slots.get(second).map(|slot| slot.item), Some(2));
    }
}
