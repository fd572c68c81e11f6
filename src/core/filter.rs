//! The filter engine: emphasize/hide semantics over the active event set.
//!
//! Emphasize only partitions events into matches and mismatches for
//! styling; the rendered set never shrinks. Hide subsets the rendered
//! set and triggers a full recompute of domains, segment granularity,
//! and canvas size, because removing events can change the time span.

use tracing::debug;

use crate::core::segments::{self, SegmentGranularity};
use crate::core::sizing;
use crate::error::{Result, StoryError};
use crate::state::{FilterMode, StoryState, TimeValue};

/// Earliest start and latest end of the active set.
fn active_time_bounds(state: &StoryState) -> Option<(TimeValue, TimeValue)> {
    let mut min: Option<TimeValue> = None;
    let mut max: Option<TimeValue> = None;
    for &id in &state.active_ids {
        let event = state.event(id)?;
        if min.map_or(true, |m| event.start.numeric() < m.numeric()) {
            min = Some(event.start);
        }
        if max.map_or(true, |m| event.end.numeric() > m.numeric()) {
            max = Some(event.end);
        }
    }
    Some((min?, max?))
}

/// Re-bucket every event under the given segment granularity and rebuild
/// the segment domain over the active range.
pub fn apply_segment_granularity(state: &mut StoryState, granularity: SegmentGranularity) {
    state.segment_granularity = granularity;
    for event in &mut state.all_data {
        event.segment = segments::segment_label(&event.start, granularity);
    }
    state.segments = match active_time_bounds(state) {
        Some((min, max)) => segments::enumerate(&min, &max, granularity),
        None => Vec::new(),
    };
}

/// Rebuild every domain derived from the active set: category and facet
/// value lists, segment granularity, segment labels, and the default
/// palette (unless the author customized colors).
pub fn recompute_domains(state: &mut StoryState) {
    let mut categories: Vec<String> = Vec::new();
    let mut facets: Vec<String> = Vec::new();
    for &id in &state.active_ids {
        let Some(event) = state.event(id) else { continue };
        if !categories.contains(&event.category) {
            categories.push(event.category.clone());
        }
        if !facets.contains(&event.facet) {
            facets.push(event.facet.clone());
        }
    }
    state.categories = categories;
    state.facets = facets;

    let granularity = match active_time_bounds(state) {
        Some((min, max)) => segments::resolve(&min, &max, state.date_granularity),
        None => state.segment_granularity,
    };
    apply_segment_granularity(state, granularity);

    if !state.palette.use_custom_palette {
        let count = state.categories.len();
        state.palette.assign_defaults(count);
    }
}

/// Ids of events in `all_data` passing the current selections.
fn matched_ids(state: &StoryState) -> Vec<usize> {
    state
        .all_data
        .iter()
        .filter(|e| state.selections.matches(&e.category, &e.facet, &e.segment))
        .map(|e| e.event_id)
        .collect()
}

/// Emphasize: keep everything rendered, refresh the match bookkeeping.
pub fn apply_emphasize(state: &mut StoryState) {
    state.prev_active_event_list = std::mem::take(&mut state.active_event_list);
    state.active_ids = (0..state.all_data.len()).collect();
    state.active_event_list = matched_ids(state);
    state.measures.filter_set_length = state.selections.cardinality(FilterMode::Emphasize);
    debug!(matched = state.active_event_list.len(), "emphasize filter applied");
}

/// Hide: subset the active set to matches, then fully recompute derived
/// state. An empty result is rejected and leaves the state untouched.
pub fn apply_hide(state: &mut StoryState) -> Result<()> {
    let matched = matched_ids(state);
    if matched.is_empty() {
        return Err(StoryError::EmptyFilterResult);
    }
    state.prev_active_event_list = std::mem::take(&mut state.active_event_list);
    state.active_ids = matched.clone();
    state.active_event_list = matched;
    state.measures.filter_set_length = state.selections.cardinality(FilterMode::Hide);

    recompute_domains(state);
    sizing::resolve_size(state);
    debug!(active = state.active_ids.len(), "hide filter applied");
    Ok(())
}

/// Apply the selections under the current filter mode.
pub fn apply_filters(state: &mut StoryState) -> Result<()> {
    match state.filter_mode {
        FilterMode::Emphasize => {
            apply_emphasize(state);
            Ok(())
        }
        FilterMode::Hide => apply_hide(state),
    }
}

/// Undo the outgoing mode's effects before applying the incoming one:
/// leaving Hide restores the full active set and its domains, leaving
/// Emphasize clears the match partition.
pub fn set_filter_mode(state: &mut StoryState, mode: FilterMode) -> Result<()> {
    if state.filter_mode == mode {
        return Ok(());
    }
    match mode {
        FilterMode::Emphasize => {
            state.active_ids = (0..state.all_data.len()).collect();
            recompute_domains(state);
            sizing::resolve_size(state);
            state.filter_mode = FilterMode::Emphasize;
            apply_emphasize(state);
            Ok(())
        }
        FilterMode::Hide => {
            state.filter_mode = FilterMode::Hide;
            if let Err(err) = apply_hide(state) {
                state.filter_mode = FilterMode::Emphasize;
                return Err(err);
            }
            Ok(())
        }
    }
}
