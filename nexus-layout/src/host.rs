//! Host integration - the seam between the engine and a widget toolkit.
//!
//! Containers never own widgets. They hold opaque [`WidgetHandle`]s and talk
//! to the toolkit through [`LayoutHost`]: measure a widget's preferred size,
//! then issue one [`Placement`] per item. Whatever the toolkit does with that
//! placement (move a native view, set grid options, record it for a test) is
//! the host's business.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::HostError;
use crate::geometry::{Rect, Size};

/// Opaque handle to a widget owned by the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetHandle(u64);

impl WidgetHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell in a column grid. Rows grow downward without limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: u32,
    pub col: u16,
    pub row_span: u16,
    pub col_span: u16,
}

/// Placement command issued to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Absolute frame in the container's coordinate space (flex, stack).
    Frame(Rect),
    /// Grid cell; the host's grid manager converts it to pixels (grid).
    Cell(GridCell),
}

/// Z-order command for overlay containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    /// Move above every sibling.
    Raise,
    /// Move below every sibling.
    Lower,
}

/// Column track configuration for a grid container.
///
/// Every track carries the same stretch weight so leftover space is shared
/// evenly regardless of content.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTracks {
    pub weights: Vec<u16>,
    pub gap: f32,
}

impl GridTracks {
    /// Equal-weight tracks.
    pub fn uniform(columns: u16, gap: f32) -> Self {
        Self {
            weights: vec![1; columns as usize],
            gap,
        }
    }

    pub fn columns(&self) -> u16 {
        self.weights.len() as u16
    }

    /// Pixel extent `(x, width)` of `span` tracks starting at `col` inside a
    /// container `width` wide.
    ///
    /// Hosts that position widgets themselves (instead of delegating to a
    /// toolkit grid manager) use this to turn a [`GridCell`] into pixels.
    /// A span running past the last track is cut at it; a `col` outside the
    /// grid has an empty extent.
    pub fn span_extent(&self, col: u16, span: u16, width: f32) -> (f32, f32) {
        let total_weight: u32 = self.weights.iter().map(|w| *w as u32).sum();
        let len = self.weights.len();
        let start = col as usize;
        if total_weight == 0 || span == 0 || start >= len {
            return (0.0, 0.0);
        }

        let gaps = self.gap * (len - 1) as f32;
        let unit = ((width - gaps) / total_weight as f32).max(0.0);

        let end = (start + span as usize).min(len);
        let before: u32 = self.weights[..start].iter().map(|w| *w as u32).sum();
        let covered: u32 = self.weights[start..end].iter().map(|w| *w as u32).sum();

        let x = before as f32 * unit + start as f32 * self.gap;
        let w = covered as f32 * unit + (end - start).saturating_sub(1) as f32 * self.gap;
        (x, w)
    }
}

/// Capabilities a widget toolkit provides to the layout engine.
pub trait LayoutHost {
    /// Intrinsic preferred size of a widget.
    ///
    /// `Size::ZERO` is a legal answer for widgets that have not been sized yet.
    fn measure(&mut self, widget: WidgetHandle) -> Result<Size, HostError>;

    /// Apply a placement to a widget.
    fn place(&mut self, widget: WidgetHandle, placement: Placement) -> Result<(), HostError>;

    /// Change a widget's z-order relative to its siblings.
    fn restack(&mut self, widget: WidgetHandle, op: StackOp) -> Result<(), HostError> {
        let _ = (widget, op);
        Ok(())
    }

    /// Configure the column tracks of a grid container.
    fn configure_grid(&mut self, tracks: &GridTracks) {
        let _ = tracks;
    }
}

/// A command recorded by [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Place(WidgetHandle, Placement),
    Restack(WidgetHandle, StackOp),
}

/// In-memory host with scripted sizes.
///
/// Serves preferred sizes from a table, records every command it receives,
/// and keeps a bottom-to-top stacking order. Used for headless layout (e.g.
/// computing geometry before native views exist) and throughout the tests.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    sizes: HashMap<WidgetHandle, Size>,
    destroyed: HashSet<WidgetHandle>,
    commands: Vec<HostCommand>,
    stacking: Vec<WidgetHandle>,
    tracks: Option<GridTracks>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_size`](Self::set_size).
    pub fn with_size(mut self, widget: WidgetHandle, size: impl Into<Size>) -> Self {
        self.set_size(widget, size);
        self
    }

    pub fn set_size(&mut self, widget: WidgetHandle, size: impl Into<Size>) {
        self.sizes.insert(widget, size.into());
    }

    /// Simulate the native resource behind `widget` going away.
    pub fn destroy(&mut self, widget: WidgetHandle) {
        self.destroyed.insert(widget);
        self.stacking.retain(|w| *w != widget);
    }

    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Every placement issued to `widget`, oldest first.
    pub fn placements_for(&self, widget: WidgetHandle) -> impl Iterator<Item = Placement> + '_ {
        self.commands.iter().filter_map(move |command| match command {
            HostCommand::Place(w, placement) if *w == widget => Some(*placement),
            _ => None,
        })
    }

    pub fn last_placement(&self, widget: WidgetHandle) -> Option<Placement> {
        self.placements_for(widget).last()
    }

    /// Last frame issued to `widget`, if its last placement was a frame.
    pub fn frame_of(&self, widget: WidgetHandle) -> Option<Rect> {
        match self.last_placement(widget)? {
            Placement::Frame(rect) => Some(rect),
            Placement::Cell(_) => None,
        }
    }

    /// Last grid cell issued to `widget`, if its last placement was a cell.
    pub fn cell_of(&self, widget: WidgetHandle) -> Option<GridCell> {
        match self.last_placement(widget)? {
            Placement::Cell(cell) => Some(cell),
            Placement::Frame(_) => None,
        }
    }

    /// Widgets from bottom to top, as left by restack commands.
    pub fn stacking_order(&self) -> &[WidgetHandle] {
        &self.stacking
    }

    pub fn grid_tracks(&self) -> Option<&GridTracks> {
        self.tracks.as_ref()
    }

    fn check_alive(&self, widget: WidgetHandle) -> Result<(), HostError> {
        if self.destroyed.contains(&widget) {
            Err(HostError::Destroyed(widget))
        } else {
            Ok(())
        }
    }
}

impl LayoutHost for HeadlessHost {
    fn measure(&mut self, widget: WidgetHandle) -> Result<Size, HostError> {
        self.check_alive(widget)?;
        Ok(self.sizes.get(&widget).copied().unwrap_or(Size::ZERO))
    }

    fn place(&mut self, widget: WidgetHandle, placement: Placement) -> Result<(), HostError> {
        self.check_alive(widget)?;
        self.commands.push(HostCommand::Place(widget, placement));
        Ok(())
    }

    fn restack(&mut self, widget: WidgetHandle, op: StackOp) -> Result<(), HostError> {
        self.check_alive(widget)?;
        self.stacking.retain(|w| *w != widget);
        match op {
            StackOp::Raise => self.stacking.push(widget),
            StackOp::Lower => self.stacking.insert(0, widget),
        }
        self.commands.push(HostCommand::Restack(widget, op));
        Ok(())
    }

    fn configure_grid(&mut self, tracks: &GridTracks) {
        self.tracks = Some(tracks.clone());
    }
}
