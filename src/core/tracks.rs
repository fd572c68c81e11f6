//! Greedy track assignment for chronological views and dense sequence
//! ranking (with spiral and curve coordinates) for ordinal views.
//!
//! Both assigners are deterministic and recompute every output field from
//! the events they are handed, so they can be re-run on any subset.

use crate::constants::{
    MARGIN_LEFT, MARGIN_RIGHT, PADDING_LEFT, PADDING_RIGHT, SPIRAL_PADDING, UNIT_WIDTH,
};
use crate::core::segments::SegmentGranularity;
use crate::state::{Layout, TimelineEvent};

/// Canonical event ordering: earlier start first; among equal starts the
/// longer event goes deeper; remaining ties break on category, then facet.
pub fn sort_events(events: &mut [TimelineEvent]) {
    events.sort_by(|a, b| {
        a.start
            .numeric()
            .total_cmp(&b.start.numeric())
            .then(b.end.numeric().total_cmp(&a.end.numeric()))
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.facet.cmp(&b.facet))
    });
}

/// The minimum occupancy an event reserves on its track, in numeric time
/// units: the span one `UNIT_WIDTH` of pixels covers at the current plot
/// width. Zero for day-segmented data and for the segmented layout, where
/// bars are never squeezed below visibility.
pub fn min_rendered_width(
    events: &[TimelineEvent],
    render_width: f64,
    segment_granularity: SegmentGranularity,
    layout: Layout,
) -> f64 {
    if segment_granularity == SegmentGranularity::Days
        || segment_granularity == SegmentGranularity::Epochs
        || layout == Layout::Segmented
        || events.is_empty()
    {
        return 0.0;
    }
    let min_start = events
        .iter()
        .map(|e| e.start.numeric())
        .fold(f64::INFINITY, f64::min);
    let max_end = events
        .iter()
        .map(|e| e.end.numeric())
        .fold(f64::NEG_INFINITY, f64::max);
    let plot_width =
        render_width - MARGIN_LEFT - MARGIN_RIGHT - PADDING_LEFT - PADDING_RIGHT - UNIT_WIDTH;
    if plot_width <= 0.0 {
        return 0.0;
    }
    (max_end - min_start) / plot_width * UNIT_WIDTH
}

/// Greedy interval packing: sort, then drop each event onto the
/// lowest-indexed track free at its start. A track stays occupied until
/// `max(end, start + min_width)`. Returns the number of tracks used.
pub fn assign_tracks(events: &mut [TimelineEvent], min_width: f64) -> usize {
    sort_events(events);
    let mut occupied_until: Vec<f64> = Vec::new();

    for event in events.iter_mut() {
        let start = event.start.numeric();
        let end = event.end.numeric().max(start + min_width);
        let track = occupied_until
            .iter()
            .position(|&until| start > until)
            .unwrap_or(occupied_until.len());
        if track == occupied_until.len() {
            occupied_until.push(end);
        } else {
            occupied_until[track] = end;
        }
        event.track = track;
    }
    occupied_until.len()
}

/// Epoch-scale data never packs: every event sits on track zero.
pub fn assign_single_track(events: &mut [TimelineEvent]) -> usize {
    for event in events.iter_mut() {
        event.track = 0;
    }
    usize::from(!events.is_empty())
}

/// Assign dense sequence ranks plus spiral and curve coordinates.
/// Ordinal layouts never overlap, so a single sequence track is used.
/// Returns the number of sequence tracks (one, or zero when empty).
pub fn assign_sequence_tracks(events: &mut [TimelineEvent], curve_wrap_width: f64) -> usize {
    sort_events(events);
    let mut angle: f64 = 0.0;

    for (rank, event) in events.iter_mut().enumerate() {
        event.seq_index = rank;
        event.track = 0;

        let along = rank as f64 * SPIRAL_PADDING;
        if curve_wrap_width > 0.0 {
            event.curve_x = along % curve_wrap_width;
            event.curve_y = (along / curve_wrap_width).floor() * SPIRAL_PADDING;
        }

        let radius = ((rank + 1) as f64).sqrt();
        angle += (1.0 / radius).asin();
        event.spiral_x = angle.cos() * radius * SPIRAL_PADDING;
        event.spiral_y = angle.sin() * radius * SPIRAL_PADDING;
    }
    usize::from(!events.is_empty())
}

/// The wrap width for curve coordinates at a given viewport width.
pub fn curve_wrap_width(render_width: f64) -> f64 {
    render_width - MARGIN_LEFT - MARGIN_RIGHT - SPIRAL_PADDING - UNIT_WIDTH
}

/// Side length of the square bounding the spiral coordinates, padded by
/// two spiral steps on each side.
pub fn spiral_extent(events: &[TimelineEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for event in events {
        min_x = min_x.min(event.spiral_x);
        max_x = max_x.max(event.spiral_x);
        min_y = min_y.min(event.spiral_y);
        max_y = max_y.max(event.spiral_y);
    }
    let span_x = (max_x + 2.0 * SPIRAL_PADDING) - (min_x - 2.0 * SPIRAL_PADDING);
    let span_y = (max_y + 2.0 * SPIRAL_PADDING) - (min_y - 2.0 * SPIRAL_PADDING);
    span_x.max(span_y)
}

/// Cross-facet maxima gathered by [`process_facets`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FacetMeasures {
    pub max_num_tracks: usize,
    pub max_num_seq_tracks: usize,
    pub max_end_age: f64,
}

/// Run both assigners within each facet and derive per-event relative
/// ages against the facet's earliest start.
pub fn process_facets(
    events: &mut [TimelineEvent],
    facets: &[String],
    min_width: f64,
    curve_wrap: f64,
) -> FacetMeasures {
    let mut measures = FacetMeasures::default();

    for facet in facets {
        let mut subset: Vec<TimelineEvent> = events
            .iter()
            .filter(|e| &e.facet == facet)
            .cloned()
            .collect();
        if subset.is_empty() {
            continue;
        }

        let num_tracks = assign_tracks(&mut subset, min_width);
        let num_seq_tracks = assign_sequence_tracks(&mut subset, curve_wrap);
        measures.max_num_tracks = measures.max_num_tracks.max(num_tracks);
        measures.max_num_seq_tracks = measures.max_num_seq_tracks.max(num_seq_tracks);

        let facet_start = subset
            .iter()
            .map(|e| e.start.numeric())
            .fold(f64::INFINITY, f64::min);
        for event in &mut subset {
            event.start_age = event.start.numeric() - facet_start;
            event.end_age = event.end.numeric() - facet_start;
            measures.max_end_age = measures.max_end_age.max(event.end_age);
        }

        for done in subset {
            if let Some(target) = events.iter_mut().find(|e| e.event_id == done.event_id) {
                *target = done;
            }
        }
    }
    measures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimeValue;

    fn event(id: usize, start: f64, end: f64) -> TimelineEvent {
        TimelineEvent::new(id, TimeValue::Epoch(start), TimeValue::Epoch(end))
    }

    #[test]
    fn test_sort_order_ties() {
        let mut a = event(0, 0.0, 5.0);
        a.category = "B".to_string();
        let mut b = event(1, 0.0, 10.0);
        b.category = "A".to_string();
        let mut c = event(2, 0.0, 10.0);
        c.category = "A".to_string();
        c.facet = "Z".to_string();
        let mut events = vec![a, c, b];
        sort_events(&mut events);
        // longer event first, then category, then facet
        assert_eq!(
            events.iter().map(|e| e.event_id).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn test_overlap_depth_drives_track_count() {
        // three mutually overlapping events need three tracks
        let mut events = vec![event(0, 0.0, 10.0), event(1, 2.0, 12.0), event(2, 4.0, 14.0)];
        assert_eq!(assign_tracks(&mut events, 0.0), 3);
        let mut tracks: Vec<usize> = events.iter().map(|e| e.track).collect();
        tracks.sort_unstable();
        assert_eq!(tracks, vec![0, 1, 2]);

        // disjoint events share one track
        let mut events = vec![event(0, 0.0, 1.0), event(1, 2.0, 3.0), event(2, 4.0, 5.0)];
        assert_eq!(assign_tracks(&mut events, 0.0), 1);
        assert!(events.iter().all(|e| e.track == 0));
    }

    #[test]
    fn test_min_width_separates_instants() {
        // zero-duration events two units apart collide once each reserves
        // ten units of track
        let mut events = vec![event(0, 0.0, 0.0), event(1, 2.0, 2.0)];
        assert_eq!(assign_tracks(&mut events, 10.0), 2);
        let mut events = vec![event(0, 0.0, 0.0), event(1, 2.0, 2.0)];
        assert_eq!(assign_tracks(&mut events, 1.0), 1);
    }

    #[test]
    fn test_occupancy_never_shrinks_below_end() {
        // a long event followed by a short one: min_width must not let the
        // long event release its track early
        let mut events = vec![event(0, 0.0, 100.0), event(1, 50.0, 51.0)];
        assert_eq!(assign_tracks(&mut events, 10.0), 2);
    }

    #[test]
    fn test_rerun_on_subset_is_clean() {
        let mut events = vec![event(0, 0.0, 10.0), event(1, 2.0, 12.0)];
        assign_tracks(&mut events, 0.0);
        assert_eq!(events.iter().map(|e| e.track).max(), Some(1));
        let mut subset = vec![events.remove(1)];
        assert_eq!(assign_tracks(&mut subset, 0.0), 1);
        assert_eq!(subset[0].track, 0);
    }

    #[test]
    fn test_sequence_ranks_are_dense() {
        let mut events = vec![event(2, 30.0, 31.0), event(0, 0.0, 1.0), event(1, 10.0, 11.0)];
        assert_eq!(assign_sequence_tracks(&mut events, 500.0), 1);
        for (rank, event) in events.iter().enumerate() {
            assert_eq!(event.seq_index, rank);
            assert_eq!(event.event_id, rank);
            assert_eq!(event.track, 0);
        }
    }

    #[test]
    fn test_spiral_radius_grows_with_rank() {
        let mut events: Vec<TimelineEvent> =
            (0..20).map(|i| event(i, i as f64, i as f64)).collect();
        assign_sequence_tracks(&mut events, 500.0);
        let r = |e: &TimelineEvent| (e.spiral_x.powi(2) + e.spiral_y.powi(2)).sqrt();
        assert!(r(&events[19]) > r(&events[0]));
        let expected = 20.0_f64.sqrt() * SPIRAL_PADDING;
        assert!((r(&events[19]) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_curve_coordinates_wrap() {
        let mut events: Vec<TimelineEvent> =
            (0..10).map(|i| event(i, i as f64, i as f64)).collect();
        assign_sequence_tracks(&mut events, 3.0 * SPIRAL_PADDING);
        assert_eq!(events[3].curve_x, 0.0);
        assert_eq!(events[3].curve_y, SPIRAL_PADDING);
        assert_eq!(events[7].curve_y, 2.0 * SPIRAL_PADDING);
    }

    #[test]
    fn test_facet_measures_track_deepest_facet() {
        let mut events = vec![event(0, 0.0, 10.0), event(1, 5.0, 15.0), event(2, 0.0, 1.0)];
        events[0].facet = "A".to_string();
        events[1].facet = "A".to_string();
        events[2].facet = "B".to_string();
        let facets = vec!["A".to_string(), "B".to_string()];
        let measures = process_facets(&mut events, &facets, 0.0, 500.0);
        assert_eq!(measures.max_num_tracks, 2);
        assert_eq!(measures.max_num_seq_tracks, 1);
        // ages are relative to each facet's own start
        assert_eq!(measures.max_end_age, 15.0);
        let b = events.iter().find(|e| e.event_id == 2).unwrap();
        assert_eq!(b.start_age, 0.0);
    }

    #[test]
    fn test_min_rendered_width_zero_cases() {
        let events = vec![event(0, 0.0, 100.0)];
        assert_eq!(
            min_rendered_width(&events, 1200.0, SegmentGranularity::Days, Layout::Unified),
            0.0
        );
        assert_eq!(
            min_rendered_width(&events, 1200.0, SegmentGranularity::Years, Layout::Segmented),
            0.0
        );
        assert!(
            min_rendered_width(&events, 1200.0, SegmentGranularity::Years, Layout::Unified) > 0.0
        );
    }
}
