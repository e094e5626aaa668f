//! Container configuration.
//!
//! Every field has a default, so a host can deserialize a partial config
//! (`{"justify": "space-between"}`) from JSON or any other serde format.

use serde::{Deserialize, Serialize};

use crate::alignment::{Align, Direction, Justify};
use crate::breakpoint::Breakpoints;
use crate::error::LayoutError;

/// Column count of the reference grid.
pub const DEFAULT_COLUMNS: u16 = 12;

/// Negative or non-finite gaps are treated as zero.
#[inline]
pub(crate) fn sanitize_gap(gap: f32) -> f32 {
    if gap.is_finite() { gap.max(0.0) } else { 0.0 }
}

/// Configuration of a [`FlexContainer`](crate::FlexContainer).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexConfig {
    pub direction: Direction,
    pub align: Align,
    pub justify: Justify,
    pub gap: f32,
}

impl FlexConfig {
    pub fn row() -> Self {
        Self::default()
    }

    pub fn column() -> Self {
        Self {
            direction: Direction::Column,
            ..Self::default()
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }
}

/// Configuration of a [`GridContainer`](crate::GridContainer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u16,
    pub gap: f32,
    pub breakpoints: Breakpoints,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            gap: 0.0,
            breakpoints: Breakpoints::standard(),
        }
    }
}

impl GridConfig {
    pub fn columns(mut self, columns: u16) -> Self {
        self.columns = columns;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Check invariants the type system does not already enforce.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 {
            return Err(LayoutError::ZeroColumns);
        }
        Ok(())
    }
}
