//! The feasibility/size matrix.
//!
//! `resolve_size` is the single place that knows which
//! (scale, layout, representation) combinations are drawable and how big
//! each one renders. Infeasible combinations resolve to `{0, 0}` so the
//! caller can disable those controls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    CENTRE_RADIUS_MAX, CENTRE_RADIUS_MIN, FACET_BUFFER, GRID_CELL_SIZE, MARGIN_BOTTOM,
    MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, PADDING_LEFT, PADDING_RIGHT, SPIRAL_PADDING,
    TRACK_HEIGHT, UNIT_WIDTH,
};
use crate::core::segments::SegmentGranularity;
use crate::core::tracks::{
    self, assign_sequence_tracks, assign_single_track, assign_tracks, FacetMeasures,
};
use crate::state::{DateGranularity, Layout, Representation, Scale, StoryState, TimelineEvent};

/// Resolved canvas dimensions in pixels. `{0, 0}` marks an infeasible
/// view combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const INFEASIBLE: Dimensions = Dimensions { width: 0.0, height: 0.0 };

    pub fn is_feasible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Vertical pixels of one band holding `tracks` tracks.
fn band_height(tracks: usize) -> f64 {
    (tracks as f64 + 0.5) * TRACK_HEIGHT
}

/// Faceted bands carry an extra track of breathing room.
fn facet_band_height(tracks: usize) -> f64 {
    (tracks as f64 + 1.5) * TRACK_HEIGHT
}

/// Compute the canvas size for the current view combination, running the
/// relevant track assigner on the active set and recording the derived
/// measures on the state. Layout fields are written back to `all_data`.
pub fn resolve_size(state: &mut StoryState) -> Dimensions {
    let view = state.view;
    let mut working = state.active_events();

    let min_width = tracks::min_rendered_width(
        &working,
        state.render_width,
        state.segment_granularity,
        view.layout,
    );
    let curve_wrap = tracks::curve_wrap_width(state.render_width);

    let dims = match view.representation {
        Representation::Linear => resolve_linear(state, &mut working, min_width, curve_wrap),
        Representation::Radial => resolve_radial(state, &mut working, min_width, curve_wrap),
        Representation::Grid => resolve_grid(state, &mut working),
        Representation::Calendar => resolve_calendar(state, &mut working),
        Representation::Spiral => resolve_spiral(state, &mut working, min_width, curve_wrap),
        Representation::Curve => resolve_curve(state, &mut working, curve_wrap),
    };

    if dims.is_feasible() {
        state.write_back(&working);
    } else {
        debug!(
            scale = %view.scale, layout = %view.layout, representation = %view.representation,
            "view combination not drawable"
        );
    }
    state.last_width = dims.width;
    state.last_height = dims.height;
    debug!(width = dims.width, height = dims.height, "resolved canvas size");
    dims
}

/// Chronological packing respecting the dataset's date granularity:
/// epoch data collapses onto one track.
fn packed_tracks(state: &StoryState, events: &mut [TimelineEvent], min_width: f64) -> usize {
    if state.date_granularity == DateGranularity::Epochs {
        assign_single_track(events)
    } else {
        assign_tracks(events, min_width)
    }
}

fn run_facets(
    state: &StoryState,
    events: &mut [TimelineEvent],
    min_width: f64,
    curve_wrap: f64,
) -> FacetMeasures {
    tracks::process_facets(events, &state.facets, min_width, curve_wrap)
}

fn full_plot_width(state: &StoryState) -> f64 {
    state.render_width - MARGIN_RIGHT - MARGIN_LEFT
}

fn full_plot_height(state: &StoryState) -> f64 {
    state.render_height - MARGIN_TOP - MARGIN_BOTTOM
}

fn resolve_linear(
    state: &mut StoryState,
    events: &mut [TimelineEvent],
    min_width: f64,
    curve_wrap: f64,
) -> Dimensions {
    match (state.view.scale, state.view.layout) {
        (Scale::Chronological, Layout::Unified) => {
            let num_tracks = packed_tracks(state, events, min_width);
            state.measures.num_tracks = num_tracks;
            Dimensions {
                width: full_plot_width(state),
                height: band_height(num_tracks) + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        (Scale::Chronological, Layout::Faceted) => {
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_tracks = measures.max_num_tracks;
            state.measures.max_end_age = measures.max_end_age;
            Dimensions {
                width: full_plot_width(state),
                height: facet_band_height(measures.max_num_tracks) * state.facets.len() as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM,
            }
        }
        (Scale::Chronological, Layout::Segmented) => {
            let num_tracks = packed_tracks(state, events, min_width);
            state.measures.num_tracks = num_tracks;
            Dimensions {
                width: full_plot_width(state),
                height: band_height(num_tracks) * state.segments.len() as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM,
            }
        }
        (Scale::Relative, Layout::Faceted) => {
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_tracks = measures.max_num_tracks;
            state.measures.max_end_age = measures.max_end_age;
            Dimensions {
                width: full_plot_width(state),
                height: facet_band_height(measures.max_num_tracks) * state.facets.len() as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM,
            }
        }
        (Scale::Log, Layout::Unified) => {
            let num_tracks = packed_tracks(state, events, min_width);
            state.measures.num_tracks = num_tracks;
            Dimensions {
                width: full_plot_width(state),
                height: band_height(num_tracks) + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        (Scale::Log, Layout::Faceted) => {
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_tracks = measures.max_num_tracks;
            state.measures.max_end_age = measures.max_end_age;
            Dimensions {
                width: full_plot_width(state),
                height: facet_band_height(measures.max_num_tracks) * state.facets.len() as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM,
            }
        }
        (Scale::Collapsed, Layout::Unified) => {
            let seq_tracks = assign_sequence_tracks(events, curve_wrap);
            let max_seq = events.len();
            state.measures.max_seq_index = max_seq;
            let bar_chart_height = 4.0 * UNIT_WIDTH;
            Dimensions {
                width: max_seq as f64 * 1.5 * UNIT_WIDTH + MARGIN_LEFT + 3.0 * MARGIN_RIGHT,
                height: band_height(seq_tracks) + bar_chart_height + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        (Scale::Sequential, Layout::Unified) => {
            let seq_tracks = assign_sequence_tracks(events, curve_wrap);
            let max_seq = events.len();
            state.measures.max_seq_index = max_seq;
            Dimensions {
                width: (max_seq as f64 * 1.5 * UNIT_WIDTH + MARGIN_LEFT + MARGIN_RIGHT)
                    .max(full_plot_width(state)),
                height: band_height(seq_tracks) + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        (Scale::Sequential, Layout::Faceted) => {
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_seq_tracks = measures.max_num_seq_tracks;
            state.measures.max_end_age = measures.max_end_age;
            state.measures.max_seq_index = events.len();
            Dimensions {
                width: (events.len() as f64 * 1.5 * UNIT_WIDTH + MARGIN_LEFT + MARGIN_RIGHT)
                    .max(full_plot_width(state)),
                height: facet_band_height(measures.max_num_seq_tracks)
                    * state.facets.len() as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM,
            }
        }
        _ => Dimensions::INFEASIBLE,
    }
}

/// Inner radius giving each tile its share of the effective width, after
/// subtracting the track annulus. Clamped before any dimension is
/// computed so radial tiles stay square.
fn centre_radius(effective_size: f64, annulus: f64) -> f64 {
    ((effective_size - annulus) / 2.0).clamp(CENTRE_RADIUS_MIN, CENTRE_RADIUS_MAX)
}

/// Columns for a tiled radial/spiral grid: as many tiles as fit the
/// effective width, at most one per band, never zero.
fn grid_cols(band_count: usize, effective_size: f64, tile_width: f64) -> usize {
    if band_count == 0 || tile_width <= 0.0 {
        return 1;
    }
    band_count
        .min((effective_size / tile_width).floor() as usize)
        .max(1)
}

fn resolve_radial(
    state: &mut StoryState,
    events: &mut [TimelineEvent],
    min_width: f64,
    curve_wrap: f64,
) -> Dimensions {
    let effective_size =
        state.render_width - MARGIN_RIGHT - PADDING_RIGHT - MARGIN_LEFT - PADDING_LEFT;

    let tiled = |state: &mut StoryState, annulus: f64, band_count: usize| {
        let estimated_tile = 2.0 * CENTRE_RADIUS_MIN + annulus;
        let cols = grid_cols(band_count, effective_size, estimated_tile);
        let rows = band_count.div_ceil(cols.max(1)).max(1);
        let radius = centre_radius(effective_size / cols as f64, annulus);
        state.measures.centre_radius = radius;
        let tile = 2.0 * radius + annulus;
        (cols, rows, tile)
    };

    match (state.view.scale, state.view.layout) {
        (Scale::Chronological, Layout::Unified) => {
            let num_tracks = packed_tracks(state, events, min_width);
            state.measures.num_tracks = num_tracks;
            let annulus = (num_tracks as f64 + 1.0) * 2.0 * TRACK_HEIGHT;
            let radius = centre_radius(effective_size, annulus);
            state.measures.centre_radius = radius;
            Dimensions {
                width: 2.0 * radius + annulus + MARGIN_LEFT + MARGIN_RIGHT,
                height: 2.0 * radius + annulus + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        (Scale::Chronological, Layout::Faceted) | (Scale::Relative, Layout::Faceted) => {
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_tracks = measures.max_num_tracks;
            state.measures.max_end_age = measures.max_end_age;
            let annulus = (measures.max_num_tracks as f64 + 2.0) * 2.0 * TRACK_HEIGHT;
            let num_facets = state.facets.len();
            let (cols, rows, tile) = tiled(state, annulus, num_facets);
            state.measures.num_facet_cols = cols;
            state.measures.num_facet_rows = rows;
            Dimensions {
                width: tile * cols as f64 + MARGIN_LEFT + MARGIN_RIGHT,
                height: tile * rows as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM
                    + rows as f64 * FACET_BUFFER,
            }
        }
        (Scale::Chronological, Layout::Segmented) => {
            let num_tracks = packed_tracks(state, events, min_width);
            state.measures.num_tracks = num_tracks;
            let annulus = (num_tracks as f64 + 1.0) * 2.0 * TRACK_HEIGHT;
            let num_segments = state.segments.len();
            let (cols, rows, tile) = tiled(state, annulus, num_segments);
            state.measures.num_segment_cols = cols;
            state.measures.num_segment_rows = rows;
            Dimensions {
                width: tile * cols as f64 + MARGIN_LEFT + MARGIN_RIGHT,
                height: tile * rows as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM
                    + rows as f64 * FACET_BUFFER,
            }
        }
        (Scale::Sequential, Layout::Unified) => {
            assign_sequence_tracks(events, curve_wrap);
            state.measures.max_seq_index = events.len();
            let annulus = 4.0 * TRACK_HEIGHT;
            let radius = centre_radius(effective_size, annulus);
            state.measures.centre_radius = radius;
            Dimensions {
                width: 2.0 * radius + annulus + MARGIN_LEFT + MARGIN_RIGHT,
                height: 2.0 * radius + annulus + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        (Scale::Sequential, Layout::Faceted) => {
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_seq_tracks = measures.max_num_seq_tracks;
            state.measures.max_seq_index = events.len();
            let annulus = 4.0 * TRACK_HEIGHT;
            let num_facets = state.facets.len();
            let (cols, rows, tile) = tiled(state, annulus, num_facets);
            state.measures.num_facet_cols = cols;
            state.measures.num_facet_rows = rows;
            Dimensions {
                width: tile * cols as f64 + MARGIN_LEFT + MARGIN_RIGHT,
                height: tile * rows as f64
                    + MARGIN_TOP
                    + MARGIN_BOTTOM
                    + rows as f64 * FACET_BUFFER,
            }
        }
        _ => Dimensions::INFEASIBLE,
    }
}

/// Calendar-year span of the active set, `(first year, last year)`.
fn active_year_span(events: &[TimelineEvent]) -> Option<(i32, i32)> {
    let min = events.iter().map(|e| e.start.year()).min()?;
    let max = events.iter().map(|e| e.end.year()).max()?;
    Some((min, max))
}

const GRID_GRANULARITIES: [SegmentGranularity; 3] = [
    SegmentGranularity::Decades,
    SegmentGranularity::Centuries,
    SegmentGranularity::Millennia,
];

const CALENDAR_GRANULARITIES: [SegmentGranularity; 4] = [
    SegmentGranularity::Weeks,
    SegmentGranularity::Months,
    SegmentGranularity::Years,
    SegmentGranularity::Decades,
];

fn resolve_grid(state: &mut StoryState, events: &mut [TimelineEvent]) -> Dimensions {
    if state.view.scale != Scale::Chronological
        || state.view.layout != Layout::Segmented
        || !GRID_GRANULARITIES.contains(&state.segment_granularity)
    {
        return Dimensions::INFEASIBLE;
    }
    let Some((min_year, max_year)) = active_year_span(events) else {
        return Dimensions::INFEASIBLE;
    };
    assign_tracks(events, 0.0);

    let century_height = GRID_CELL_SIZE * UNIT_WIDTH;
    let century_width = GRID_CELL_SIZE * 10.0;

    // round the year span out to whole centuries
    let range_floor = (f64::from(min_year) / 100.0).floor() * 100.0;
    let range_ceil = (f64::from(max_year + 1) / 100.0).ceil() * 100.0;
    let num_centuries = ((range_ceil - range_floor) / 100.0).ceil().max(1.0);

    Dimensions {
        width: century_width + MARGIN_LEFT + MARGIN_RIGHT,
        height: num_centuries * century_height + num_centuries * GRID_CELL_SIZE
            + MARGIN_TOP
            + MARGIN_BOTTOM
            - GRID_CELL_SIZE,
    }
}

fn resolve_calendar(state: &mut StoryState, events: &mut [TimelineEvent]) -> Dimensions {
    if state.view.scale != Scale::Chronological
        || state.view.layout != Layout::Segmented
        || !CALENDAR_GRANULARITIES.contains(&state.segment_granularity)
    {
        return Dimensions::INFEASIBLE;
    }
    let Some((min_year, max_year)) = active_year_span(events) else {
        return Dimensions::INFEASIBLE;
    };
    assign_tracks(events, 0.0);

    // 7 days of week plus a buffer row, 53 weeks of the year plus a buffer
    let year_height = crate::constants::CALENDAR_CELL_SIZE * 8.0;
    let year_width = crate::constants::CALENDAR_CELL_SIZE * 53.0;
    let num_years = (max_year - min_year + 1).max(1) as f64;

    Dimensions {
        width: year_width + MARGIN_LEFT + MARGIN_RIGHT,
        height: num_years * year_height + MARGIN_TOP + MARGIN_BOTTOM
            - crate::constants::CALENDAR_CELL_SIZE,
    }
}

fn resolve_spiral(
    state: &mut StoryState,
    events: &mut [TimelineEvent],
    min_width: f64,
    curve_wrap: f64,
) -> Dimensions {
    if state.view.scale != Scale::Sequential {
        return Dimensions::INFEASIBLE;
    }
    match state.view.layout {
        Layout::Unified => {
            assign_sequence_tracks(events, curve_wrap);
            state.measures.max_seq_index = events.len();
            let dim = tracks::spiral_extent(events);
            state.measures.spiral_dim = dim;
            Dimensions {
                width: (dim + SPIRAL_PADDING + MARGIN_RIGHT + MARGIN_LEFT)
                    .max(full_plot_width(state)),
                height: (dim + SPIRAL_PADDING + MARGIN_TOP + MARGIN_BOTTOM)
                    .max(full_plot_height(state)),
            }
        }
        Layout::Faceted => {
            // per-facet spiral coordinates; the bounding box is taken over
            // the whole active set
            let measures = run_facets(state, events, min_width, curve_wrap);
            state.measures.max_num_seq_tracks = measures.max_num_seq_tracks;
            state.measures.max_seq_index = events.len();
            let dim = tracks::spiral_extent(events);
            state.measures.spiral_dim = dim;

            let effective_size = full_plot_width(state);
            let cols = grid_cols(state.facets.len(), effective_size, dim);
            let rows = state.facets.len().div_ceil(cols.max(1)).max(1);
            state.measures.num_facet_cols = cols;
            state.measures.num_facet_rows = rows;
            Dimensions {
                width: (cols as f64 * dim + MARGIN_RIGHT + MARGIN_LEFT)
                    .max(full_plot_width(state)),
                height: rows as f64 * dim + MARGIN_TOP + MARGIN_BOTTOM,
            }
        }
        Layout::Segmented => Dimensions::INFEASIBLE,
    }
}

fn resolve_curve(
    state: &mut StoryState,
    events: &mut [TimelineEvent],
    curve_wrap: f64,
) -> Dimensions {
    if state.view.scale != Scale::Sequential || state.view.layout != Layout::Unified {
        return Dimensions::INFEASIBLE;
    }
    assign_sequence_tracks(events, curve_wrap);
    state.measures.max_seq_index = events.len();
    Dimensions {
        width: full_plot_width(state),
        height: full_plot_height(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TimeValue, ViewConfig};

    fn state_with_events(ranges: &[(f64, f64, &str)]) -> StoryState {
        let mut state = StoryState::new();
        for (i, &(s, e, facet)) in ranges.iter().enumerate() {
            let mut event = TimelineEvent::new(i, TimeValue::Epoch(s), TimeValue::Epoch(e));
            event.facet = facet.to_string();
            if !state.facets.contains(&event.facet) {
                state.facets.push(event.facet.clone());
            }
            state.all_data.push(event);
            state.active_ids.push(i);
        }
        state.date_granularity = DateGranularity::Years;
        state.segment_granularity = SegmentGranularity::Years;
        state
    }

    fn view(scale: Scale, layout: Layout, representation: Representation) -> ViewConfig {
        ViewConfig { scale, layout, representation }
    }

    #[test]
    fn test_relative_unified_linear_is_infeasible() {
        let mut state = state_with_events(&[(0.0, 1.0, "A")]);
        state.view = view(Scale::Relative, Layout::Unified, Representation::Linear);
        assert_eq!(resolve_size(&mut state), Dimensions::INFEASIBLE);
    }

    #[test]
    fn test_log_segmented_is_infeasible() {
        let mut state = state_with_events(&[(0.0, 1.0, "A")]);
        state.view = view(Scale::Log, Layout::Segmented, Representation::Linear);
        assert!(!resolve_size(&mut state).is_feasible());
    }

    #[test]
    fn test_unified_height_tracks_overlap_depth() {
        let mut state = state_with_events(&[(0.0, 10.0, "A"), (2.0, 12.0, "A"), (4.0, 14.0, "A")]);
        state.view = view(Scale::Chronological, Layout::Unified, Representation::Linear);
        let dims = resolve_size(&mut state);
        assert_eq!(state.measures.num_tracks, 3);
        assert_eq!(dims.height, 3.5 * TRACK_HEIGHT + MARGIN_TOP + MARGIN_BOTTOM);
        assert_eq!(dims.width, 1200.0 - MARGIN_LEFT - MARGIN_RIGHT);
    }

    #[test]
    fn test_faceted_height_scales_with_facet_count() {
        let mut state = state_with_events(&[(0.0, 1.0, "A"), (5.0, 6.0, "B")]);
        state.view = view(Scale::Chronological, Layout::Faceted, Representation::Linear);
        let dims = resolve_size(&mut state);
        assert_eq!(state.measures.max_num_tracks, 1);
        assert_eq!(dims.height, 2.0 * 2.5 * TRACK_HEIGHT + MARGIN_TOP + MARGIN_BOTTOM);
    }

    #[test]
    fn test_radial_is_square_after_clamp() {
        // many overlapping events force a deep annulus; the clamped radius
        // must be applied to both width and height
        let ranges: Vec<(f64, f64, &str)> =
            (0..12).map(|i| (i as f64, i as f64 + 100.0, "A")).collect();
        let mut state = state_with_events(&ranges);
        state.view = view(Scale::Chronological, Layout::Unified, Representation::Radial);
        let dims = resolve_size(&mut state);
        assert!(dims.is_feasible());
        assert!(state.measures.centre_radius >= CENTRE_RADIUS_MIN);
        assert!(state.measures.centre_radius <= CENTRE_RADIUS_MAX);
        assert_eq!(
            dims.width - MARGIN_LEFT - MARGIN_RIGHT,
            dims.height - MARGIN_TOP - MARGIN_BOTTOM
        );
    }

    #[test]
    fn test_radial_facet_grid_fits_width() {
        let mut state = state_with_events(&[
            (0.0, 1.0, "A"),
            (0.0, 1.0, "B"),
            (0.0, 1.0, "C"),
            (0.0, 1.0, "D"),
            (0.0, 1.0, "E"),
        ]);
        state.view = view(Scale::Chronological, Layout::Faceted, Representation::Radial);
        let dims = resolve_size(&mut state);
        assert!(dims.is_feasible());
        let cols = state.measures.num_facet_cols;
        let rows = state.measures.num_facet_rows;
        assert!(cols >= 1);
        assert_eq!(rows, 5usize.div_ceil(cols));
    }

    #[test]
    fn test_grid_requires_coarse_granularity() {
        let mut state = state_with_events(&[(0.0, 1.0, "A")]);
        state.view = view(Scale::Chronological, Layout::Segmented, Representation::Grid);
        state.segment_granularity = SegmentGranularity::Years;
        assert!(!resolve_size(&mut state).is_feasible());
        state.segment_granularity = SegmentGranularity::Centuries;
        assert!(resolve_size(&mut state).is_feasible());
    }

    #[test]
    fn test_grid_height_counts_whole_centuries() {
        let mut state = StoryState::new();
        let start = TimeValue::Date(
            chrono::NaiveDate::from_ymd_opt(1850, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        );
        let end = TimeValue::Date(
            chrono::NaiveDate::from_ymd_opt(1920, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        );
        state.all_data.push(TimelineEvent::new(0, start, end));
        state.active_ids.push(0);
        state.segment_granularity = SegmentGranularity::Centuries;
        state.view = view(Scale::Chronological, Layout::Segmented, Representation::Grid);
        let dims = resolve_size(&mut state);
        // 1800..2000 spans two centuries
        let century_height = GRID_CELL_SIZE * UNIT_WIDTH;
        assert_eq!(
            dims.height,
            2.0 * century_height + 2.0 * GRID_CELL_SIZE + MARGIN_TOP + MARGIN_BOTTOM
                - GRID_CELL_SIZE
        );
        assert_eq!(dims.width, GRID_CELL_SIZE * 10.0 + MARGIN_LEFT + MARGIN_RIGHT);
    }

    #[test]
    fn test_calendar_requires_compatible_granularity() {
        let mut state = state_with_events(&[(0.0, 1.0, "A")]);
        state.view = view(Scale::Chronological, Layout::Segmented, Representation::Calendar);
        state.segment_granularity = SegmentGranularity::Millennia;
        assert!(!resolve_size(&mut state).is_feasible());
        state.segment_granularity = SegmentGranularity::Weeks;
        assert!(resolve_size(&mut state).is_feasible());
    }

    #[test]
    fn test_spiral_needs_sequential() {
        let mut state = state_with_events(&[(0.0, 1.0, "A")]);
        state.view = view(Scale::Chronological, Layout::Unified, Representation::Spiral);
        assert!(!resolve_size(&mut state).is_feasible());
        state.view = view(Scale::Sequential, Layout::Unified, Representation::Spiral);
        let dims = resolve_size(&mut state);
        assert!(dims.is_feasible());
        assert!(state.measures.spiral_dim > 0.0);
    }

    #[test]
    fn test_curve_fills_viewport() {
        let mut state = state_with_events(&[(0.0, 1.0, "A"), (2.0, 3.0, "A")]);
        state.view = view(Scale::Sequential, Layout::Unified, Representation::Curve);
        let dims = resolve_size(&mut state);
        assert_eq!(dims.width, 1200.0 - MARGIN_LEFT - MARGIN_RIGHT);
        assert_eq!(dims.height, 800.0 - MARGIN_TOP - MARGIN_BOTTOM);
        assert_eq!(state.measures.max_seq_index, 2);
        // ranks were written back to the canonical data
        assert_eq!(state.all_data[1].seq_index, 1);
    }

    #[test]
    fn test_collapsed_width_grows_with_event_count() {
        let ranges: Vec<(f64, f64, &str)> = (0..10).map(|i| (i as f64, i as f64, "A")).collect();
        let mut state = state_with_events(&ranges);
        state.view = view(Scale::Collapsed, Layout::Unified, Representation::Linear);
        let dims = resolve_size(&mut state);
        assert_eq!(
            dims.width,
            10.0 * 1.5 * UNIT_WIDTH + MARGIN_LEFT + 3.0 * MARGIN_RIGHT
        );
        assert_eq!(
            dims.height,
            1.5 * TRACK_HEIGHT + 4.0 * UNIT_WIDTH + MARGIN_TOP + MARGIN_BOTTOM
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let mut state = state_with_events(&[(0.0, 10.0, "A"), (2.0, 12.0, "B"), (4.0, 14.0, "A")]);
        state.view = view(Scale::Chronological, Layout::Faceted, Representation::Radial);
        let first = resolve_size(&mut state);
        let second = resolve_size(&mut state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_epoch_data_packs_onto_one_track() {
        let mut state = state_with_events(&[(-15000.0, 3000.0, "A"), (-9000.0, 0.0, "A")]);
        state.date_granularity = DateGranularity::Epochs;
        state.segment_granularity = SegmentGranularity::Epochs;
        state.view = view(Scale::Chronological, Layout::Unified, Representation::Linear);
        resolve_size(&mut state);
        assert_eq!(state.measures.num_tracks, 1);
        assert!(state.all_data.iter().all(|e| e.track == 0));
    }
}
