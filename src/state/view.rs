//! View configuration: scale, layout, representation, and filter selections.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::ALL_FILTER;

/// The axis metric a timeline is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    /// Absolute dates and times.
    Chronological,
    /// Time relative to a per-facet baseline at zero.
    Relative,
    /// Base-10 logarithmic time.
    Log,
    /// Ordinal rank only.
    Sequential,
    /// Sequential order with inter-event duration encoded as bar length.
    Collapsed,
}

/// Spatial arrangement of the event bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// A single uninterrupted band.
    Unified,
    /// One band per facet value.
    Faceted,
    /// One band per calendar segment.
    Segmented,
}

/// Geometric rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    Linear,
    Radial,
    Spiral,
    Curve,
    Calendar,
    Grid,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scale::Chronological => "Chronological",
            Scale::Relative => "Relative",
            Scale::Log => "Log",
            Scale::Sequential => "Sequential",
            Scale::Collapsed => "Collapsed",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Unified => "Unified",
            Layout::Faceted => "Faceted",
            Layout::Segmented => "Segmented",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Representation::Linear => "Linear",
            Representation::Radial => "Radial",
            Representation::Spiral => "Spiral",
            Representation::Curve => "Curve",
            Representation::Calendar => "Calendar",
            Representation::Grid => "Grid",
        };
        write!(f, "{}", name)
    }
}

/// The current scale/layout/representation combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub scale: Scale,
    pub layout: Layout,
    pub representation: Representation,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale: Scale::Chronological,
            layout: Layout::Unified,
            representation: Representation::Linear,
        }
    }
}

/// How filter selections act on the event set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Keep everything rendered, restyle matches vs. mismatches.
    #[default]
    Emphasize,
    /// Subset the active event set to matches.
    Hide,
}

/// User selections over the three filter dimensions. Each dimension defaults
/// to the `"( All )"` sentinel, meaning unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelections {
    pub categories: Vec<String>,
    pub facets: Vec<String>,
    pub segments: Vec<String>,
}

impl Default for FilterSelections {
    fn default() -> Self {
        Self {
            categories: vec![ALL_FILTER.to_string()],
            facets: vec![ALL_FILTER.to_string()],
            segments: vec![ALL_FILTER.to_string()],
        }
    }
}

impl FilterSelections {
    /// True when the event passes all three dimensions.
    pub fn matches(&self, category: &str, facet: &str, segment: &str) -> bool {
        dimension_matches(&self.categories, category)
            && dimension_matches(&self.facets, facet)
            && dimension_matches(&self.segments, segment)
    }

    /// True when every dimension is the `"( All )"` sentinel.
    pub fn is_unconstrained(&self) -> bool {
        has_all_sentinel(&self.categories)
            && has_all_sentinel(&self.facets)
            && has_all_sentinel(&self.segments)
    }

    /// Total selected option count, used to detect filter changes between
    /// scenes. Hide mode counts one extra.
    pub fn cardinality(&self, mode: FilterMode) -> usize {
        let extra = if mode == FilterMode::Hide { 1 } else { 0 };
        self.categories.len() + self.facets.len() + self.segments.len() + extra
    }
}

fn has_all_sentinel(selection: &[String]) -> bool {
    selection.iter().any(|s| s == ALL_FILTER)
}

fn dimension_matches(selection: &[String], value: &str) -> bool {
    has_all_sentinel(selection) || selection.iter().any(|s| s == value)
}
