//! Shared layout constants: margins, track sizing, radial clamps, and palettes.
//! The pixel values are the hand-tuned sizing the rendering layer was built against.

pub const MARGIN_TOP: f64 = 100.0;
pub const MARGIN_RIGHT: f64 = 50.0;
pub const MARGIN_BOTTOM: f64 = 105.0;
pub const MARGIN_LEFT: f64 = 50.0;

pub const PADDING_LEFT: f64 = 50.0;
pub const PADDING_RIGHT: f64 = 50.0;

pub const UNIT_WIDTH: f64 = 15.0;
pub const TRACK_HEIGHT: f64 = UNIT_WIDTH * 1.5;
pub const SPIRAL_PADDING: f64 = UNIT_WIDTH * 1.25;
pub const FACET_BUFFER: f64 = 25.0;

pub const CENTRE_RADIUS_MIN: f64 = 50.0;
pub const CENTRE_RADIUS_MAX: f64 = 200.0;

pub const GRID_CELL_SIZE: f64 = 50.0;
pub const CALENDAR_CELL_SIZE: f64 = 20.0;

pub const DEFAULT_RENDER_WIDTH: f64 = 1200.0;
pub const DEFAULT_RENDER_HEIGHT: f64 = 800.0;

pub const DEFAULT_LEGEND_X: f64 = 100.0;
pub const DEFAULT_LEGEND_Y: f64 = 100.0;

/// Sentinel option meaning "no constraint" in one filter dimension.
pub const ALL_FILTER: &str = "( All )";

/// Numeric dates outside this year range are treated as raw epoch values.
pub const EPOCH_YEAR_MIN: f64 = -9999.0;
pub const EPOCH_YEAR_MAX: f64 = 10000.0;

pub const SINGLE_CATEGORY_PALETTE: [&str; 1] = ["#E45641"];
pub const DUAL_CATEGORY_PALETTE: [&str; 2] = ["#E45641", "#44B3C2"];

/// Qualitative palette for 3-10 categories.
pub const QUALITATIVE_PALETTE_10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// Qualitative palette for 11-20 categories.
pub const QUALITATIVE_PALETTE_20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c",
    "#98df8a", "#d62728", "#ff9896", "#9467bd", "#c5b0d5",
    "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f",
    "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Default name given to a saved story document.
pub const STORY_FILE_NAME: &str = "timeline_story.cdc";

/// Schema version written by `save_state`.
pub const STORY_DOCUMENT_VERSION: u32 = 2;

/// Default settling delay for `load`, in milliseconds.
pub const DEFAULT_LOAD_DELAY_MS: u64 = 500;
