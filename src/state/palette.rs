//! Category color palette
//!
//! Categories are colored from fixed qualitative palettes sized to the
//! category count, until the author overrides a color by hand.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DUAL_CATEGORY_PALETTE, QUALITATIVE_PALETTE_10, QUALITATIVE_PALETTE_20,
    SINGLE_CATEGORY_PALETTE,
};

/// The active category-to-color assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPalette {
    /// Hex colors in category order.
    pub colors: Vec<String>,
    /// Set once the author overrides any color; defaults stop being
    /// reassigned on subsequent loads.
    pub use_custom_palette: bool,
    /// Category index of the most recent manual override.
    pub color_swap_target: Option<usize>,
}

impl CategoryPalette {
    /// Pick the default palette for a category count: a single accent for
    /// zero or one categories, an explicit pair for two, then the
    /// 10-class and 20-class qualitative palettes.
    pub fn assign_defaults(&mut self, category_count: usize) {
        let base: &[&str] = match category_count {
            0 | 1 => &SINGLE_CATEGORY_PALETTE,
            2 => &DUAL_CATEGORY_PALETTE,
            3..=10 => &QUALITATIVE_PALETTE_10,
            _ => &QUALITATIVE_PALETTE_20,
        };
        self.colors = base
            .iter()
            .cycle()
            .take(category_count.max(1))
            .map(|c| c.to_string())
            .collect();
        self.color_swap_target = None;
    }

    /// The color for a category index, cycling when the index exceeds the
    /// palette length.
    pub fn color_for(&self, category_index: usize) -> &str {
        if self.colors.is_empty() {
            SINGLE_CATEGORY_PALETTE[0]
        } else {
            &self.colors[category_index % self.colors.len()]
        }
    }

    /// Manually override one category's color.
    pub fn set_category_color(&mut self, category_index: usize, color: impl Into<String>) {
        if category_index >= self.colors.len() {
            self.colors
                .resize_with(category_index + 1, || SINGLE_CATEGORY_PALETTE[0].to_string());
        }
        self.colors[category_index] = color.into();
        self.use_custom_palette = true;
        self.color_swap_target = Some(category_index);
    }
}
