//! Axis-agnostic flex math.
//!
//! `distribute_flex` turns per-item basis/grow/shrink into main-axis sizes,
//! `arrange` turns sizes into main-axis offsets for a justification mode.
//! Neither knows about widgets or hosts; `FlexContainer` feeds them.

use crate::alignment::Justify;

/// Below this, leftover space is treated as zero.
const EPSILON: f32 = 1e-4;

/// Flex inputs of a single item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexInput {
    pub basis: f32,
    pub grow: f32,
    pub shrink: f32,
}

impl FlexInput {
    pub fn new(basis: f32, grow: f32, shrink: f32) -> Self {
        Self { basis, grow, shrink }
    }

    /// Weight used when absorbing overflow.
    #[inline]
    fn scaled_shrink(&self) -> f32 {
        self.shrink * self.basis
    }
}

/// Result of flex distribution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution {
    /// Main-axis size per item, in input order.
    pub sizes: Vec<f32>,
    /// Space by which the items still exceed the available length.
    pub overflow: f32,
}

/// Distribute `available` main-axis space among `inputs`.
///
/// Positive free space is split in proportion to `grow` among items that
/// have a non-zero grow; negative free space is absorbed in proportion to
/// `shrink * basis`. An item never shrinks below zero: when its share would
/// take it there it is frozen at zero and the rest of the overflow is
/// re-split among the remaining items.
pub fn distribute_flex(inputs: &[FlexInput], available: f32) -> Distribution {
    let mut sizes: Vec<f32> = inputs.iter().map(|input| input.basis).collect();
    let total_basis: f32 = sizes.iter().sum();
    let free = available - total_basis;

    if free > 0.0 {
        let total_grow: f32 = inputs.iter().map(|input| input.grow).sum();
        if total_grow > 0.0 {
            for (size, input) in sizes.iter_mut().zip(inputs) {
                *size += free * (input.grow / total_grow);
            }
        }
    } else if free < 0.0 {
        shrink_to_fit(inputs, &mut sizes, -free);
    }

    let total: f32 = sizes.iter().sum();
    let overflow = total - available;
    Distribution {
        sizes,
        overflow: if overflow > EPSILON { overflow } else { 0.0 },
    }
}

/// Remove `excess` from `sizes`, weighted by scaled shrink.
fn shrink_to_fit(inputs: &[FlexInput], sizes: &mut [f32], mut excess: f32) {
    let mut frozen: Vec<bool> = inputs.iter().map(|i| i.scaled_shrink() <= 0.0).collect();

    // Each round either finishes or freezes at least one more item.
    while excess > EPSILON {
        let weight: f32 = inputs
            .iter()
            .zip(&frozen)
            .filter(|(_, frozen)| !**frozen)
            .map(|(input, _)| input.scaled_shrink())
            .sum();
        if weight <= 0.0 {
            break;
        }

        let round_excess = excess;
        let mut clamped = false;
        for (index, input) in inputs.iter().enumerate() {
            if frozen[index] {
                continue;
            }
            let share = round_excess * input.scaled_shrink() / weight;
            if sizes[index] - share <= 0.0 {
                excess -= sizes[index];
                sizes[index] = 0.0;
                frozen[index] = true;
                clamped = true;
            }
        }
        if clamped {
            continue;
        }

        for (index, input) in inputs.iter().enumerate() {
            if !frozen[index] {
                sizes[index] -= excess * input.scaled_shrink() / weight;
            }
        }
        break;
    }
}

/// Main-axis offset of every item.
///
/// `available` is the container's main size minus the total gap; `gap` is
/// still added between consecutive items on top of whatever spacing the
/// justification mode produces. On overflow the free space is negative:
/// `Center` spills past both edges, `End` past the leading edge, and the
/// `Space*` modes have nothing to spread and pack from the start.
pub fn arrange(justify: Justify, sizes: &[f32], available: f32, gap: f32) -> Vec<f32> {
    let n = sizes.len();
    if n == 0 {
        return Vec::new();
    }

    let total: f32 = sizes.iter().sum();
    let free = available - total;
    let spread = free.max(0.0);

    let (start, spacing) = match justify {
        Justify::Start => (0.0, 0.0),
        Justify::Center => (free / 2.0, 0.0),
        Justify::End => (free, 0.0),
        Justify::SpaceBetween => {
            if n > 1 { (0.0, spread / (n - 1) as f32) } else { (0.0, 0.0) }
        }
        Justify::SpaceAround => {
            let space = spread / n as f32;
            (space / 2.0, space)
        }
        Justify::SpaceEvenly => {
            let space = spread / (n + 1) as f32;
            (space, space)
        }
    };

    let mut offsets = Vec::with_capacity(n);
    let mut cursor = start;
    for size in sizes {
        offsets.push(cursor);
        cursor += size + gap + spacing;
    }
    offsets
}

// =========================================================================
// Tests
// =========================================================================
