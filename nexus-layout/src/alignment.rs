//! Direction and alignment types for flex containers.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Children flow left to right.
    #[default]
    Row,
    /// Children flow top to bottom.
    Column,
}

impl Direction {
    /// Extent of `size` along the main axis.
    #[inline]
    pub fn main(self, size: Size) -> f32 {
        match self {
            Direction::Row => size.width,
            Direction::Column => size.height,
        }
    }

    /// Extent of `size` along the cross axis.
    #[inline]
    pub fn cross(self, size: Size) -> f32 {
        match self {
            Direction::Row => size.height,
            Direction::Column => size.width,
        }
    }

    /// Build a frame from main/cross coordinates.
    #[inline]
    pub fn frame(self, main_pos: f32, main_len: f32, cross_pos: f32, cross_len: f32) -> Rect {
        match self {
            Direction::Row => Rect::new(main_pos, cross_pos, main_len, cross_len),
            Direction::Column => Rect::new(cross_pos, main_pos, cross_len, main_len),
        }
    }
}

/// Alignment on the cross axis (perpendicular to flow).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Resize to fill the cross axis.
    Stretch,
}

impl Align {
    /// Resolve `(position, extent)` of an item whose natural cross size is
    /// `natural` inside a cross axis `available` long.
    #[inline]
    pub fn resolve(self, natural: f32, available: f32) -> (f32, f32) {
        match self {
            Align::Start => (0.0, natural),
            Align::Center => ((available - natural) / 2.0, natural),
            Align::End => (available - natural, natural),
            Align::Stretch => (0.0, available),
        }
    }
}

/// Distribution of free space on the main axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    /// Pack items at the start.
    #[default]
    Start,
    /// Center the packed items.
    Center,
    /// Pack items at the end.
    End,
    /// First item at the start, last at the end, equal space between.
    SpaceBetween,
    /// Each item centered in an equal share of the main axis.
    SpaceAround,
    /// Equal space before, between and after items.
    SpaceEvenly,
}
