//! Layout error types.

use thiserror::Error;

use crate::host::WidgetHandle;

/// Failure reported by the host when a widget cannot be measured or placed.
///
/// The engine never propagates these: the affected item is dropped from its
/// container and the pass continues with the remaining items.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("widget {0} has been destroyed")]
    Destroyed(WidgetHandle),

    #[error("widget {widget} is unavailable: {reason}")]
    Unavailable { widget: WidgetHandle, reason: String },
}

impl HostError {
    /// The widget the failure refers to.
    pub fn widget(&self) -> WidgetHandle {
        match self {
            HostError::Destroyed(widget) => *widget,
            HostError::Unavailable { widget, .. } => *widget,
        }
    }
}

/// Invalid container configuration, rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("breakpoint table is empty")]
    NoBreakpoints,

    #[error("breakpoint `{name}` has a non-finite minimum width")]
    NonFiniteBreakpoint { name: String },

    #[error("breakpoint `{name}` ({min_width}) must be wider than `{previous}` ({previous_min_width})")]
    BreakpointsNotIncreasing {
        name: String,
        min_width: f32,
        previous: String,
        previous_min_width: f32,
    },

    #[error("grid needs at least one column")]
    ZeroColumns,
}
