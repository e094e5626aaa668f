//! Layout containers.
//!
//! Each container owns its item bookkeeping and nothing else: widgets belong
//! to the host. Mutations (adding or removing items, changing configuration
//! to a different value) take the host and lay out again right away. A
//! container that has no size yet skips the pass and stays dirty; the next
//! resize notification, `relayout`, or `layout_if_needed` pays it off.

pub mod flex;
pub mod grid;
pub mod stack;

pub use flex::FlexContainer;
pub use grid::GridContainer;
pub use stack::StackContainer;

use crate::geometry::Size;
use crate::host::LayoutHost;

/// Operations every container exposes to the host tree.
pub trait Container {
    /// Recompute and apply placement. Safe to call redundantly.
    fn relayout(&mut self, host: &mut dyn LayoutHost);

    /// The container itself was resized by its parent.
    fn on_container_resized(&mut self, host: &mut dyn LayoutHost, size: Size);

    /// Whether a pass is owed (a mutation arrived while the pass could not run).
    fn is_dirty(&self) -> bool;

    /// Run a pass only if something changed since the last one.
    fn layout_if_needed(&mut self, host: &mut dyn LayoutHost) {
        if self.is_dirty() {
            self.relayout(host);
        }
    }
}
