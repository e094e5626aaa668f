//! Shared containers with a re-entrancy guard.
//!
//! Hosts that keep containers in a tree usually share them (`Rc`) so that a
//! child's resize handler can reach its parent's container. Issuing a
//! placement can then synchronously raise a resize notification for the very
//! container that is mid-pass. [`LayoutCell`] makes that safe: while a pass is
//! running, nested requests are recorded instead of executed, and replayed
//! once the active pass has finished.

use std::cell::{Cell, RefCell};

use tracing::{trace, warn};

use crate::containers::Container;
use crate::geometry::Size;
use crate::host::LayoutHost;

/// Replays of deferred requests after the initiating pass before giving up.
pub const MAX_DEFERRED_PASSES: usize = 8;

#[derive(Debug, Clone, Copy)]
enum Request {
    Relayout,
    Resize(Size),
}

/// Sets the flag for as long as it lives, even if the pass unwinds.
struct ActiveGuard<'a>(&'a Cell<bool>);

impl<'a> ActiveGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A container behind shared ownership, guarded against re-entrant layout.
#[derive(Debug, Default)]
pub struct LayoutCell<C> {
    container: RefCell<C>,
    active: Cell<bool>,
    pending_resize: Cell<Option<Size>>,
    pending_relayout: Cell<bool>,
}

impl<C: Container> LayoutCell<C> {
    pub fn new(container: C) -> Self {
        Self {
            container: RefCell::new(container),
            active: Cell::new(false),
            pending_resize: Cell::new(None),
            pending_relayout: Cell::new(false),
        }
    }

    /// Whether a pass is running right now.
    pub fn is_relaying_out(&self) -> bool {
        self.active.get()
    }

    /// Forward a resize notification. Deferred if a pass is running; only
    /// the latest deferred size is kept.
    pub fn notify_resized(&self, host: &mut dyn LayoutHost, size: Size) {
        if self.active.get() {
            trace!(?size, "deferring nested resize");
            self.pending_resize.set(Some(size));
            return;
        }
        self.run(host, |container, host| container.on_container_resized(host, size));
    }

    /// Request a pass. Deferred if one is already running.
    pub fn relayout(&self, host: &mut dyn LayoutHost) {
        if self.active.get() {
            trace!("deferring nested relayout");
            self.pending_relayout.set(true);
            return;
        }
        self.run(host, |container, host| container.relayout(host));
    }

    /// Mutate the container (add items, change config) with the guard held.
    ///
    /// The container's mutators lay out immediately; resize notifications
    /// that pass raises are deferred and replayed once `f` returns. `None`
    /// when called from inside a running pass.
    pub fn update<R>(
        &self,
        host: &mut dyn LayoutHost,
        f: impl FnOnce(&mut C, &mut dyn LayoutHost) -> R,
    ) -> Option<R> {
        if self.active.get() {
            warn!("container update requested during a layout pass; skipping");
            return None;
        }
        self.run(host, f)
    }

    /// Read the container. `None` while a pass holds it.
    pub fn with<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        self.container.try_borrow().ok().map(|container| f(&container))
    }

    pub fn into_inner(self) -> C {
        self.container.into_inner()
    }

    fn run<R>(
        &self,
        host: &mut dyn LayoutHost,
        first: impl FnOnce(&mut C, &mut dyn LayoutHost) -> R,
    ) -> Option<R> {
        let Ok(mut container) = self.container.try_borrow_mut() else {
            warn!("layout requested while the container is borrowed; skipping");
            return None;
        };
        let _guard = ActiveGuard::enter(&self.active);

        let result = first(&mut *container, &mut *host);

        for _ in 0..MAX_DEFERRED_PASSES {
            let request = match (self.pending_resize.take(), self.pending_relayout.replace(false)) {
                (Some(size), _) => Request::Resize(size),
                (None, true) => Request::Relayout,
                (None, false) => return Some(result),
            };
            match request {
                Request::Relayout => container.relayout(host),
                Request::Resize(size) => container.on_container_resized(host, size),
            }
        }

        if self.pending_resize.get().is_some() || self.pending_relayout.get() {
            warn!(
                passes = MAX_DEFERRED_PASSES,
                "layout did not settle; dropping remaining deferred requests"
            );
            self.pending_resize.set(None);
            self.pending_relayout.set(false);
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::FlexConfig;
    use crate::containers::FlexContainer;
    use crate::error::HostError;
    use crate::geometry::Rect;
    use crate::host::{HeadlessHost, Placement, WidgetHandle};
    use crate::item::LayoutItem;

    fn w(raw: u64) -> WidgetHandle {
        WidgetHandle::new(raw)
    }

    /// Host whose placements feed a resize back into the container they
    /// came from, the way a toolkit does when a child's geometry change
    /// propagates up to its parent.
    struct FeedbackHost {
        inner: HeadlessHost,
        cell: Rc<LayoutCell<FlexContainer>>,
        feedback: Vec<Size>,
        nested_while_active: usize,
    }

    impl LayoutHost for FeedbackHost {
        fn measure(&mut self, widget: WidgetHandle) -> Result<Size, HostError> {
            self.inner.measure(widget)
        }

        fn place(&mut self, widget: WidgetHandle, placement: Placement) -> Result<(), HostError> {
            self.inner.place(widget, placement)?;
            if !self.feedback.is_empty() {
                let size = self.feedback.remove(0);
                let cell = Rc::clone(&self.cell);
                if cell.is_relaying_out() {
                    self.nested_while_active += 1;
                }
                cell.notify_resized(self, size);
            }
            Ok(())
        }
    }

    fn feedback_host(widgets: &[u64], feedback: Vec<Size>) -> FeedbackHost {
        let mut inner = HeadlessHost::new();
        let mut flex = FlexContainer::new(FlexConfig::row());
        for &raw in widgets {
            // Unsized, so nothing is placed yet.
            flex.add_item(&mut inner, LayoutItem::new(w(raw)).grow(1.0));
        }
        FeedbackHost {
            inner,
            cell: Rc::new(LayoutCell::new(flex)),
            feedback,
            nested_while_active: 0,
        }
    }

    #[test]
    fn test_nested_resize_is_deferred_not_reentered() {
        let mut host = feedback_host(&[1], vec![Size::new(300.0, 20.0)]);
        let cell = Rc::clone(&host.cell);

        cell.notify_resized(&mut host, Size::new(100.0, 20.0));

        assert_eq!(host.nested_while_active, 1);
        assert!(!cell.is_relaying_out());
        // The deferred resize ran after the first pass finished.
        assert_eq!(host.inner.frame_of(w(1)), Some(Rect::new(0.0, 0.0, 300.0, 0.0)));
        assert_eq!(cell.with(|flex| flex.pass_count()), Some(2));
        assert_eq!(cell.with(|flex| flex.size()), Some(Size::new(300.0, 20.0)));
    }

    #[test]
    fn test_only_latest_deferred_size_is_kept() {
        // Both placements of the first pass feed back; 150 is superseded.
        let mut host = feedback_host(&[1, 2], vec![Size::new(150.0, 20.0), Size::new(200.0, 20.0)]);
        let cell = Rc::clone(&host.cell);

        cell.notify_resized(&mut host, Size::new(100.0, 20.0));

        let widths: Vec<f32> = host
            .inner
            .placements_for(w(1))
            .map(|p| match p {
                Placement::Frame(rect) => rect.width,
                Placement::Cell(_) => unreachable!(),
            })
            .collect();
        assert_eq!(widths, vec![50.0, 100.0]);
    }

    #[test]
    fn test_feedback_loop_is_bounded() {
        let sizes = (1..=20).map(|i| Size::new(100.0 + i as f32, 20.0)).collect();
        let mut host = feedback_host(&[1], sizes);
        let cell = Rc::clone(&host.cell);

        cell.notify_resized(&mut host, Size::new(100.0, 20.0));

        assert_eq!(cell.with(|flex| flex.pass_count()), Some(MAX_DEFERRED_PASSES as u64 + 1));
        assert!(!cell.is_relaying_out());
    }

    #[test]
    fn test_update_outside_pass() {
        let mut host = HeadlessHost::new();
        let cell = LayoutCell::new(FlexContainer::default());
        let id = cell.update(&mut host, |flex, host| flex.add_item(host, w(5)));
        assert!(id.is_some());
        assert_eq!(cell.with(|flex| flex.len()), Some(1));
        assert_eq!(cell.into_inner().len(), 1);
    }

    #[test]
    fn test_update_defers_feedback_raised_by_mutation() {
        let mut host = feedback_host(&[1], Vec::new());
        let cell = Rc::clone(&host.cell);
        cell.notify_resized(&mut host, Size::new(100.0, 20.0));

        host.feedback = vec![Size::new(200.0, 20.0)];
        let added = cell.update(&mut host, |flex, host| flex.add_item(host, LayoutItem::new(w(2)).grow(1.0)));

        assert!(added.is_some());
        assert_eq!(host.nested_while_active, 1);
        // Mutation pass at 100 wide, then the deferred resize to 200.
        let widths: Vec<f32> = host
            .inner
            .placements_for(w(2))
            .map(|p| match p {
                Placement::Frame(rect) => rect.width,
                Placement::Cell(_) => unreachable!(),
            })
            .collect();
        assert_eq!(widths, vec![50.0, 100.0]);
        assert_eq!(cell.with(|flex| flex.pass_count()), Some(3));
    }

    #[test]
    fn test_relayout_through_cell() {
        let mut host = HeadlessHost::new().with_size(w(1), (10.0, 10.0));
        let cell = LayoutCell::new(FlexContainer::default());
        cell.update(&mut host, |flex, host| flex.add_item(host, w(1)));
        cell.notify_resized(&mut host, Size::new(50.0, 10.0));
        host.take_commands();

        cell.relayout(&mut host);
        assert_eq!(host.frame_of(w(1)), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}
