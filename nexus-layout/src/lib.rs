//! nexus-layout: responsive layout containers.
//!
//! Three containers decide where child widgets go inside a rectangle:
//! - `FlexContainer` distributes a single row or column (grow, shrink, justify)
//! - `GridContainer` places items on a 12-column grid whose spans change with
//!   the active width breakpoint
//! - `StackContainer` overlays children by z-index
//!
//! # Architecture
//!
//! Containers never own widgets. They talk to the host toolkit through the
//! `LayoutHost` trait (measure a widget, place it, restack it), which keeps
//! the math testable against `HeadlessHost`. Mutations take the host and lay
//! out again at once; a container without a size yet records the pass as
//! owed and runs it on its first resize. Hosts that share containers and can call back into
//! them while a pass is running should wrap them in `LayoutCell`.
//!
//! # Usage
//!
//! ```ignore
//! use nexus_layout::{Container, FlexConfig, FlexContainer, Justify, LayoutItem};
//!
//! let mut row = FlexContainer::new(FlexConfig::row().justify(Justify::SpaceBetween).gap(8.0));
//! row.add_item(&mut host, LayoutItem::new(sidebar).basis(200.0));
//! row.add_item(&mut host, LayoutItem::new(content).grow(1.0));
//! row.on_container_resized(&mut host, Size::new(1024.0, 768.0));
//! ```

// Geometry and host seam
pub mod geometry;
pub mod host;
pub mod error;

// Layout inputs
pub mod alignment;
pub mod breakpoint;
pub mod config;
pub mod item;

// Math and containers
pub mod flex;
pub mod containers;
pub mod cell;

pub use alignment::{Align, Direction, Justify};
pub use breakpoint::Breakpoints;
pub use cell::{LayoutCell, MAX_DEFERRED_PASSES};
pub use config::{DEFAULT_COLUMNS, FlexConfig, GridConfig};
pub use containers::{Container, FlexContainer, GridContainer, StackContainer};
pub use error::{HostError, LayoutError};
pub use flex::{Distribution, FlexInput, arrange, distribute_flex};
pub use geometry::{Point, Rect, Size};
pub use host::{GridCell, GridTracks, HeadlessHost, HostCommand, LayoutHost, Placement, StackOp, WidgetHandle};
pub use item::{ColumnSpans, ItemId, ItemTarget, LayoutItem, clamp_span};
