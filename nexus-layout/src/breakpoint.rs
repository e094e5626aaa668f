//! Breakpoint tiers for responsive grids.
//!
//! A [`Breakpoints`] table maps tier names to minimum widths, strictly
//! increasing. Resolving a width picks the widest tier whose threshold the
//! width reaches; widths below every threshold fall into the narrowest tier,
//! so resolution always yields exactly one tier.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Ordered, validated table of `tier name -> minimum width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, f32>", into = "IndexMap<String, f32>")]
pub struct Breakpoints {
    tiers: IndexMap<String, f32>,
}

impl Breakpoints {
    /// Build a table from `(name, min_width)` pairs, narrowest first.
    pub fn new<N: Into<String>>(
        tiers: impl IntoIterator<Item = (N, f32)>,
    ) -> Result<Self, LayoutError> {
        let tiers: IndexMap<String, f32> = tiers
            .into_iter()
            .map(|(name, min_width)| (name.into(), min_width))
            .collect();
        Self::try_from(tiers)
    }

    /// The Bootstrap-style six tier table: xs 0, sm 576, md 768, lg 992,
    /// xl 1200, xxl 1400.
    pub fn standard() -> Self {
        let tiers = [
            ("xs", 0.0),
            ("sm", 576.0),
            ("md", 768.0),
            ("lg", 992.0),
            ("xl", 1200.0),
            ("xxl", 1400.0),
        ];
        Self {
            tiers: tiers.into_iter().map(|(n, w)| (n.to_string(), w)).collect(),
        }
    }

    /// Tier for `width`: the widest tier with `min_width <= width`, or the
    /// narrowest tier when `width` is below every threshold.
    pub fn resolve(&self, width: f32) -> &str {
        self.resolve_index(width)
            .and_then(|index| self.tiers.get_index(index))
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    /// Position of the resolved tier, narrowest = 0.
    pub fn resolve_index(&self, width: f32) -> Option<usize> {
        if self.tiers.is_empty() {
            return None;
        }
        let index = self
            .tiers
            .values()
            .rposition(|min_width| *min_width <= width)
            .unwrap_or(0);
        Some(index)
    }

    /// Position of a tier by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tiers.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tiers.contains_key(name)
    }

    /// Minimum width of a tier.
    pub fn min_width(&self, name: &str) -> Option<f32> {
        self.tiers.get(name).copied()
    }

    /// Tier names, narrowest first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<IndexMap<String, f32>> for Breakpoints {
    type Error = LayoutError;

    fn try_from(tiers: IndexMap<String, f32>) -> Result<Self, Self::Error> {
        if tiers.is_empty() {
            return Err(LayoutError::NoBreakpoints);
        }

        let mut previous: Option<(&String, f32)> = None;
        for (name, &min_width) in &tiers {
            if !min_width.is_finite() {
                return Err(LayoutError::NonFiniteBreakpoint { name: name.clone() });
            }
            if let Some((prev_name, prev_width)) = previous {
                if min_width <= prev_width {
                    return Err(LayoutError::BreakpointsNotIncreasing {
                        name: name.clone(),
                        min_width,
                        previous: prev_name.clone(),
                        previous_min_width: prev_width,
                    });
                }
            }
            previous = Some((name, min_width));
        }

        Ok(Self { tiers })
    }
}

impl From<Breakpoints> for IndexMap<String, f32> {
    fn from(breakpoints: Breakpoints) -> Self {
        breakpoints.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_standard_tiers() {
        let bp = Breakpoints::standard();
        assert_eq!(bp.resolve(700.0), "sm");
        assert_eq!(bp.resolve(1300.0), "xl");
        assert_eq!(bp.resolve(0.0), "xs");
        assert_eq!(bp.resolve(2000.0), "xxl");
    }

    #[test]
    fn test_resolve_exact_thresholds() {
        let bp = Breakpoints::standard();
        assert_eq!(bp.resolve(576.0), "sm");
        assert_eq!(bp.resolve(575.9), "xs");
        assert_eq!(bp.resolve(768.0), "md");
        assert_eq!(bp.resolve(1400.0), "xxl");
    }

    #[test]
    fn test_resolve_below_all_thresholds_falls_back_to_narrowest() {
        let bp = Breakpoints::new([("compact", 300.0), ("wide", 900.0)]).unwrap();
        assert_eq!(bp.resolve(10.0), "compact");
        assert_eq!(bp.resolve(-50.0), "compact");
        assert_eq!(bp.resolve(900.0), "wide");
    }

    #[test]
    fn test_resolve_is_monotonic() {
        let bp = Breakpoints::standard();
        let mut last = 0;
        for width in (0..2000).step_by(7) {
            let index = bp.resolve_index(width as f32).unwrap();
            assert!(index >= last, "tier went backwards at width {}", width);
            last = index;
        }
    }

    #[test]
    fn test_rejects_empty_table() {
        let empty: [(&str, f32); 0] = [];
        assert_eq!(Breakpoints::new(empty), Err(LayoutError::NoBreakpoints));
    }

    #[test]
    fn test_rejects_non_increasing_thresholds() {
        let err = Breakpoints::new([("xs", 0.0), ("sm", 600.0), ("md", 600.0)]).unwrap_err();
        assert!(matches!(err, LayoutError::BreakpointsNotIncreasing { ref name, .. } if name == "md"));
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let err = Breakpoints::new([("xs", 0.0), ("huge", f32::INFINITY)]).unwrap_err();
        assert_eq!(err, LayoutError::NonFiniteBreakpoint { name: "huge".to_string() });
    }

    #[test]
    fn test_lookup_helpers() {
        let bp = Breakpoints::standard();
        assert_eq!(bp.len(), 6);
        assert_eq!(bp.index_of("md"), Some(2));
        assert_eq!(bp.min_width("lg"), Some(992.0));
        assert!(!bp.contains("xxxl"));
        assert_eq!(bp.names().collect::<Vec<_>>(), ["xs", "sm", "md", "lg", "xl", "xxl"]);
    }
}
