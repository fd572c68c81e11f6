//! The `StoryTeller` facade.
//!
//! One instance owns one `StoryState` and exposes the public entry
//! points: load/update/save, view and filter changes, scene recording
//! and playback. The rendering layer talks to this type only.

use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::constants::DEFAULT_LOAD_DELAY_MS;
use crate::core::dates;
use crate::core::filter;
use crate::core::segments::SegmentGranularity;
use crate::core::sizing::{self, Dimensions};
use crate::error::{Result, StoryError};
use crate::state::{
    copy_annotations, DateGranularity, FilterMode, FilterSelections, IdRemap, Layout, RawEvent,
    Representation, Scale, Scene, SceneAnnotationRef, SceneCaptionRef, SceneImageRef, StoryState,
    TimelineEvent, ViewConfig,
};
use crate::story::persistence::{StoryDocument, StoryInput};

/// Result of applying a scene: what the rendering layer must do next.
/// When `transitioning` is set, annotation display must wait for the view
/// transition and then go through [`StoryTeller::apply_deferred`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneChange {
    pub order: usize,
    pub transitioning: bool,
    pub dimensions: Dimensions,
}

/// Result of recording a scene, including the id handoff for each
/// annotation kind so display handles can be repointed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedScene {
    pub order: usize,
    pub caption_remap: Vec<IdRemap>,
    pub image_remap: Vec<IdRemap>,
    pub annotation_remap: Vec<IdRemap>,
}

/// The story engine facade.
#[derive(Debug)]
pub struct StoryTeller {
    state: StoryState,
}

impl Default for StoryTeller {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryTeller {
    pub fn new() -> Self {
        Self { state: StoryState::new() }
    }

    pub fn state(&self) -> &StoryState {
        &self.state
    }

    /// Load events or a story document, waiting out the settling delay so
    /// transitional UI can render before derived state is relied upon.
    pub async fn load(
        &mut self,
        input: StoryInput,
        delay_ms: Option<u64>,
    ) -> Result<Option<SceneChange>> {
        let change = self.load_now(input)?;
        sleep(Duration::from_millis(delay_ms.unwrap_or(DEFAULT_LOAD_DELAY_MS))).await;
        Ok(change)
    }

    /// Synchronous core of [`load`](Self::load). Returns the scene change
    /// for the first stored scene when the input carried a story.
    pub fn load_now(&mut self, input: StoryInput) -> Result<Option<SceneChange>> {
        let (events, document) = match input {
            StoryInput::Events(events) => (events, None),
            StoryInput::Document(doc) => (doc.timeline_json_data.clone(), Some(doc)),
        };

        self.state = StoryState::new();
        self.state.raw_data = dedupe_events(events);
        info!(events = self.state.raw_data.len(), "loading timeline data");
        rebuild_events(&mut self.state);

        if let Some(doc) = &document {
            if doc.width > 0.0 {
                self.state.render_width = doc.width;
            }
            if doc.height > 0.0 {
                self.state.render_height = doc.height;
            }
            self.state.author = doc.author.clone();
            self.state.usage_log = doc.usage_log.clone();
            self.state.annotation_lists = doc.annotation_lists();
            if !doc.color_palette.is_empty() {
                self.state.palette.colors = doc.color_palette.clone();
                self.state.palette.use_custom_palette = true;
            }
        }

        filter::recompute_domains(&mut self.state);
        filter::apply_filters(&mut self.state)?;
        sizing::resolve_size(&mut self.state);

        let Some(doc) = document else {
            return Ok(None);
        };

        if doc.scenes.is_empty() {
            return Ok(None);
        }
        self.state.scene_store.scenes = doc.scenes;
        self.state.scene_store.current_index = None;
        let change = self.change_scene(0)?;
        Ok(Some(change))
    }

    /// Replace the event data while keeping the story. Colors of
    /// categories that survive the update are preserved.
    pub fn update(&mut self, events: Vec<RawEvent>) -> Result<()> {
        let old_colors: HashMap<String, String> = self
            .state
            .categories
            .iter()
            .cloned()
            .zip(self.state.palette.colors.iter().cloned())
            .collect();
        let custom = self.state.palette.use_custom_palette;

        self.state.raw_data = dedupe_events(events);
        rebuild_events(&mut self.state);
        filter::recompute_domains(&mut self.state);
        filter::apply_filters(&mut self.state)?;
        sizing::resolve_size(&mut self.state);

        if custom {
            self.state.palette.use_custom_palette = true;
            for (index, category) in self.state.categories.clone().iter().enumerate() {
                if let Some(color) = old_colors.get(category) {
                    self.state.palette.set_category_color(index, color.clone());
                }
            }
        }
        Ok(())
    }

    /// Build the persistable story document. Unreferenced annotations are
    /// pruned first so edit history does not accumulate.
    pub fn save_state(&mut self) -> StoryDocument {
        self.state.annotation_lists.prune(&self.state.scene_store.scenes);
        let mut doc = StoryDocument::new(self.state.raw_data.clone());
        doc.scenes = self.state.scene_store.scenes.clone();
        doc.width = self.state.render_width;
        doc.height = self.state.render_height;
        doc.color_palette = self.state.palette.colors.clone();
        doc.usage_log = self.state.usage_log.clone();
        doc.caption_list = self.state.annotation_lists.captions.clone();
        doc.image_list = self.state.annotation_lists.images.clone();
        doc.annotation_list = self.state.annotation_lists.annotations.clone();
        doc.author = self.state.author.clone();
        doc.timestamp = Utc::now().timestamp_millis();
        doc
    }

    /// Human summary of the loaded range, for the intro banner.
    pub fn range_text(&self) -> String {
        let count = self.state.all_data.len();
        let Some((min, max)) = data_year_span(&self.state.all_data) else {
            return "0 unique events".to_string();
        };
        if self.state.date_granularity == DateGranularity::Epochs {
            format!("{} unique events from {} to {}", count, min, max)
        } else {
            format!("{} unique events spanning {} to {}", count, min, max)
        }
    }

    pub fn set_scale(&mut self, scale: Scale) -> Dimensions {
        self.state.view.scale = scale;
        self.apply_view_change()
    }

    pub fn set_layout(&mut self, layout: Layout) -> Dimensions {
        self.state.view.layout = layout;
        self.apply_view_change()
    }

    pub fn set_representation(&mut self, representation: Representation) -> Dimensions {
        self.state.view.representation = representation;
        self.apply_view_change()
    }

    /// Grid and Calendar only draw at specific granularities; entering
    /// them on a segmented view forces a compatible one.
    fn apply_view_change(&mut self) -> Dimensions {
        if self.state.view.layout == Layout::Segmented {
            match self.state.view.representation {
                Representation::Grid => {
                    filter::apply_segment_granularity(&mut self.state, SegmentGranularity::Centuries)
                }
                Representation::Calendar => {
                    filter::apply_segment_granularity(&mut self.state, SegmentGranularity::Weeks)
                }
                _ => {}
            }
        }
        sizing::resolve_size(&mut self.state)
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) -> Result<()> {
        filter::set_filter_mode(&mut self.state, mode)
    }

    /// Apply new filter selections under the current mode.
    pub fn apply_filters(&mut self, selections: FilterSelections) -> Result<()> {
        let previous = std::mem::replace(&mut self.state.selections, selections);
        if let Err(err) = filter::apply_filters(&mut self.state) {
            self.state.selections = previous;
            return Err(err);
        }
        sizing::resolve_size(&mut self.state);
        Ok(())
    }

    pub fn set_category_color(&mut self, category: &str, color: impl Into<String>) -> bool {
        match self.state.category_index(category) {
            Some(index) => {
                self.state.palette.set_category_color(index, color);
                true
            }
            None => false,
        }
    }

    pub fn set_playback_mode(&mut self, playback: bool) {
        self.state.playback_mode = playback;
    }

    pub fn select_event(&mut self, event_id: usize, selected: bool) {
        if let Some(event) = self.state.event_mut(event_id) {
            event.selected = selected;
        }
    }

    pub fn add_caption(&mut self, text: impl Into<String>, x: f64, y: f64) -> u64 {
        let id = self.state.annotation_lists.add_caption(text, x, y);
        self.state.visible_captions.push(id);
        id
    }

    pub fn add_image(&mut self, url: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> u64 {
        let id = self.state.annotation_lists.add_image(url, x, y, w, h);
        self.state.visible_images.push(id);
        id
    }

    pub fn add_annotation(
        &mut self,
        event_id: usize,
        text: impl Into<String>,
        x_offset: f64,
        y_offset: f64,
    ) -> u64 {
        let id = self
            .state
            .annotation_lists
            .add_annotation(event_id, text, x_offset, y_offset);
        self.state.visible_annotations.push(id);
        if let Some(event) = self.state.event_mut(event_id) {
            event.annotation_count += 1;
        }
        id
    }

    pub fn remove_annotation(&mut self, id: u64) {
        let event_id = self
            .state
            .annotation_lists
            .annotations
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.event_id);
        self.state.visible_annotations.retain(|&v| v != id);
        if let Some(event_id) = event_id {
            if let Some(event) = self.state.event_mut(event_id) {
                event.annotation_count = event.annotation_count.saturating_sub(1);
            }
        }
    }

    /// Snapshot the current view into a new scene right after the current
    /// one. The displayed annotation instances are handed off to the
    /// scene; the canonical items get fresh ids for future editing.
    pub fn record_scene(&mut self) -> RecordedScene {
        let state = &mut self.state;
        let mut scene = Scene {
            s_width: state.last_width,
            s_height: state.last_height,
            s_scale: state.view.scale,
            s_layout: state.view.layout,
            s_representation: state.view.representation,
            s_categories: state.selections.categories.clone(),
            s_facets: state.selections.facets.clone(),
            s_segments: state.selections.segments.clone(),
            s_filter_type: state.filter_mode,
            s_legend_x: state.legend_x,
            s_legend_y: state.legend_y,
            s_legend_expanded: state.legend_expanded,
            s_selections: state
                .all_data
                .iter()
                .filter(|e| e.selected)
                .map(|e| e.event_id)
                .collect(),
            ..Default::default()
        };
        scene.s_captions = state
            .visible_captions
            .iter()
            .map(|&caption_id| SceneCaptionRef { caption_id })
            .collect();
        scene.s_images = state
            .visible_images
            .iter()
            .map(|&image_id| SceneImageRef { image_id })
            .collect();
        scene.s_annotations = state
            .visible_annotations
            .iter()
            .map(|&annotation_id| SceneAnnotationRef { annotation_id })
            .collect();

        let caption_remap =
            copy_annotations(&mut state.annotation_lists.captions, &state.visible_captions);
        let image_remap =
            copy_annotations(&mut state.annotation_lists.images, &state.visible_images);
        let annotation_remap = copy_annotations(
            &mut state.annotation_lists.annotations,
            &state.visible_annotations,
        );
        // the display now points at the fresh copies
        remap_visible(&mut state.visible_captions, &caption_remap);
        remap_visible(&mut state.visible_images, &image_remap);
        remap_visible(&mut state.visible_annotations, &annotation_remap);

        let order = state.scene_store.insert_after_current(scene);
        state.log_usage(format!("scene recorded at {}", order));
        info!(order, "recorded scene");
        RecordedScene { order, caption_remap, image_remap, annotation_remap }
    }

    /// Delete a scene and apply whichever scene becomes current.
    pub fn delete_scene(&mut self, order: usize) -> Result<Option<SceneChange>> {
        if !self.state.scene_store.delete(order) {
            return Err(StoryError::SceneNotFound(order));
        }
        info!(order, "deleted scene");
        match self.state.scene_store.current_index {
            Some(current) => self.change_scene(current).map(Some),
            None => Ok(None),
        }
    }

    pub fn go_next_scene(&mut self) -> Result<Option<SceneChange>> {
        match self.state.scene_store.go_next() {
            Some(order) => self.change_scene(order).map(Some),
            None => Ok(None),
        }
    }

    pub fn go_previous_scene(&mut self) -> Result<Option<SceneChange>> {
        match self.state.scene_store.go_previous() {
            Some(order) => self.change_scene(order).map(Some),
            None => Ok(None),
        }
    }

    /// Apply a scene's stored view, filters, and selections. The returned
    /// change says whether the view is transitioning; if so, annotation
    /// display must wait and then go through
    /// [`apply_deferred`](Self::apply_deferred).
    pub fn change_scene(&mut self, order: usize) -> Result<SceneChange> {
        let scene = self
            .state
            .scene_store
            .find(order)
            .cloned()
            .ok_or(StoryError::SceneNotFound(order))?;

        let scene_view = ViewConfig {
            scale: scene.s_scale,
            layout: scene.s_layout,
            representation: scene.s_representation,
        };
        let scene_cardinality = scene.s_categories.len()
            + scene.s_facets.len()
            + scene.s_segments.len()
            + usize::from(scene.s_filter_type == FilterMode::Hide);
        let transitioning = scene_view != self.state.view
            || scene_cardinality != self.state.measures.filter_set_length;

        let scene_selections = FilterSelections {
            categories: scene.s_categories.clone(),
            facets: scene.s_facets.clone(),
            segments: scene.s_segments.clone(),
        };
        let previous = std::mem::replace(&mut self.state.selections, scene_selections);
        let applied = if scene.s_filter_type != self.state.filter_mode {
            filter::set_filter_mode(&mut self.state, scene.s_filter_type)
        } else {
            filter::apply_filters(&mut self.state)
        };
        if let Err(err) = applied {
            self.state.selections = previous;
            return Err(err);
        }

        self.state.view = scene_view;
        self.state.legend_x = scene.s_legend_x;
        self.state.legend_y = scene.s_legend_y;
        self.state.legend_expanded = scene.s_legend_expanded;
        let dimensions = self.apply_view_change();

        for event in &mut self.state.all_data {
            event.selected = scene.s_selections.contains(&event.event_id);
        }

        self.state.scene_store.current_index = Some(order);
        debug!(order, transitioning, "scene applied");
        Ok(SceneChange { order, transitioning, dimensions })
    }

    /// Apply a scene change's deferred annotation display, unless a later
    /// scene change superseded it; stale changes are discarded.
    pub fn apply_deferred(&mut self, change: &SceneChange) -> bool {
        if self.state.scene_store.current_index != Some(change.order) {
            debug!(order = change.order, "discarding stale scene change");
            return false;
        }
        let Some(scene) = self.state.scene_store.find(change.order).cloned() else {
            return false;
        };
        // references whose canonical item was pruned are silently skipped
        self.state.visible_captions = scene
            .s_captions
            .iter()
            .map(|r| r.caption_id)
            .filter(|id| self.state.annotation_lists.captions.iter().any(|c| c.id == *id))
            .collect();
        self.state.visible_images = scene
            .s_images
            .iter()
            .map(|r| r.image_id)
            .filter(|id| self.state.annotation_lists.images.iter().any(|i| i.id == *id))
            .collect();
        self.state.visible_annotations = scene
            .s_annotations
            .iter()
            .map(|r| r.annotation_id)
            .filter(|id| self.state.annotation_lists.annotations.iter().any(|a| a.id == *id))
            .collect();

        for event in &mut self.state.all_data {
            event.annotation_count = 0;
        }
        for &id in &self.state.visible_annotations.clone() {
            if let Some(event_id) = self
                .state
                .annotation_lists
                .annotations
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.event_id)
            {
                if let Some(event) = self.state.event_mut(event_id) {
                    event.annotation_count += 1;
                }
            }
        }
        true
    }

    /// Change scene and, when the view is transitioning, wait for the
    /// rendering layer's completion signal before showing annotations.
    pub async fn change_scene_after<F>(
        &mut self,
        order: usize,
        render_complete: F,
    ) -> Result<SceneChange>
    where
        F: Future<Output = ()>,
    {
        let change = self.change_scene(order)?;
        if change.transitioning {
            render_complete.await;
        }
        self.apply_deferred(&change);
        Ok(change)
    }
}

/// Collapse duplicate records: the first occurrence keeps its position,
/// later duplicates replace the stored record.
fn dedupe_events(events: Vec<RawEvent>) -> Vec<RawEvent> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, RawEvent> = HashMap::new();
    for event in events {
        let key = event.dedupe_key();
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(key, event);
    }
    order.into_iter().filter_map(|key| by_key.remove(&key)).collect()
}

/// Resolve `raw_data` into `all_data`: classify the date handling, run the
/// parse cascade, and compute durations in the resulting units.
fn rebuild_events(state: &mut StoryState) {
    state.date_granularity = dates::classify(&state.raw_data);
    let now = Utc::now().naive_utc();

    let mut resolved = Vec::with_capacity(state.raw_data.len());
    let mut any_day_based = false;
    for (event_id, raw) in state.raw_data.iter().enumerate() {
        let (start, end) = if state.date_granularity == DateGranularity::Epochs {
            dates::parse_epoch_dates(raw)
        } else {
            let parsed = dates::parse_start_and_end(raw, now);
            any_day_based |= parsed.day_based;
            (parsed.start, parsed.end)
        };
        let mut event = TimelineEvent::new(event_id, start, end);
        event.category = raw.category.clone().unwrap_or_default();
        event.facet = raw.facet.clone().unwrap_or_default();
        event.content_text = raw.content_text.clone().unwrap_or_default();
        resolved.push(event);
    }
    if state.date_granularity == DateGranularity::Years && any_day_based {
        state.date_granularity = DateGranularity::Days;
    }
    for event in &mut resolved {
        event.duration = dates::event_duration(&event.start, &event.end, state.date_granularity);
    }

    state.all_data = resolved;
    state.active_ids = (0..state.all_data.len()).collect();
    state.active_event_list = state.active_ids.clone();
    state.prev_active_event_list = Vec::new();
}

fn remap_visible(visible: &mut [u64], remap: &[IdRemap]) {
    for id in visible.iter_mut() {
        if let Some(entry) = remap.iter().find(|r| r.old_id == *id) {
            *id = entry.new_id;
        }
    }
}

/// First and last year (or raw epoch value) across the dataset.
fn data_year_span(events: &[TimelineEvent]) -> Option<(i32, i32)> {
    let min = events.iter().map(|e| e.start.year()).min()?;
    let max = events.iter().map(|e| e.end.year()).max()?;
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RawDate;

    fn raw(text: &str, start: f64, category: &str, facet: &str) -> RawEvent {
        RawEvent {
            content_text: Some(text.to_string()),
            start_date: Some(RawDate::Number(start)),
            end_date: None,
            category: Some(category.to_string()),
            facet: Some(facet.to_string()),
        }
    }

    fn loaded() -> StoryTeller {
        let mut teller = StoryTeller::new();
        teller
            .load_now(StoryInput::Events(vec![
                raw("a", 1900.0, "War", "Europe"),
                raw("b", 1950.0, "Treaty", "Europe"),
                raw("c", 1960.0, "Treaty", "Asia"),
            ]))
            .unwrap();
        teller
    }

    #[test]
    fn test_load_assigns_dense_ids_after_dedupe() {
        let mut teller = StoryTeller::new();
        teller
            .load_now(StoryInput::Events(vec![
                raw("a", 1900.0, "War", "Europe"),
                raw("a", 1900.0, "War", "Europe"),
                raw("b", 1950.0, "Treaty", "Asia"),
            ]))
            .unwrap();
        let state = teller.state();
        assert_eq!(state.all_data.len(), 2);
        assert_eq!(state.all_data[0].event_id, 0);
        assert_eq!(state.all_data[1].content_text, "b");
        assert_eq!(state.view, ViewConfig::default());
        assert!(state.last_width > 0.0);
    }

    #[test]
    fn test_dedupe_keeps_position_takes_last_value() {
        let mut first = raw("a", 1900.0, "War", "Europe");
        first.end_date = Some(RawDate::Number(1910.0));
        // same key, later record wins
        let second = first.clone();
        let deduped = dedupe_events(vec![first, raw("b", 1950.0, "Treaty", "Asia"), second]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].content_text.as_deref(), Some("a"));
    }

    #[test]
    fn test_range_text() {
        let teller = loaded();
        assert_eq!(teller.range_text(), "3 unique events spanning 1900 to 1960");
    }

    #[test]
    fn test_record_then_change_scene_round_trip() {
        let mut teller = loaded();
        teller.set_scale(Scale::Sequential);
        teller.select_event(1, true);
        let recorded = teller.record_scene();
        assert_eq!(recorded.order, 0);

        teller.set_scale(Scale::Chronological);
        teller.select_event(1, false);

        let change = teller.change_scene(0).unwrap();
        assert!(change.transitioning);
        assert_eq!(teller.state().view.scale, Scale::Sequential);
        assert!(teller.state().all_data[1].selected);
    }

    #[test]
    fn test_recording_hands_off_annotation_ids() {
        let mut teller = loaded();
        let caption_id = teller.add_caption("note", 10.0, 10.0);
        let recorded = teller.record_scene();
        assert_eq!(recorded.caption_remap.len(), 1);
        assert_eq!(recorded.caption_remap[0].old_id, caption_id);
        // the scene keeps the old id, the display moved to the copy
        let scene = teller.state().scene_store.find(0).unwrap();
        assert_eq!(scene.s_captions[0].caption_id, caption_id);
        assert_eq!(
            teller.state().visible_captions,
            vec![recorded.caption_remap[0].new_id]
        );
    }

    #[test]
    fn test_annotation_count_follows_add_remove() {
        let mut teller = loaded();
        let id = teller.add_annotation(2, "context", 5.0, 5.0);
        assert_eq!(teller.state().all_data[2].annotation_count, 1);
        teller.remove_annotation(id);
        assert_eq!(teller.state().all_data[2].annotation_count, 0);
    }

    #[test]
    fn test_stale_scene_change_is_discarded() {
        let mut teller = loaded();
        teller.record_scene();
        teller.set_scale(Scale::Sequential);
        teller.record_scene();

        let stale = teller.change_scene(0).unwrap();
        let fresh = teller.change_scene(1).unwrap();
        assert!(!teller.apply_deferred(&stale));
        assert!(teller.apply_deferred(&fresh));
    }

    #[tokio::test]
    async fn test_change_scene_after_waits_for_render() {
        let mut teller = loaded();
        teller.record_scene();
        teller.set_scale(Scale::Sequential);
        teller.record_scene();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tx.send(()).ok();
        let change = teller
            .change_scene_after(0, async {
                rx.await.ok();
            })
            .await
            .unwrap();
        assert!(change.transitioning);
        assert_eq!(teller.state().scene_store.current_index, Some(0));
    }

    #[tokio::test]
    async fn test_load_honors_settling_delay() {
        let mut teller = StoryTeller::new();
        let started = tokio::time::Instant::now();
        teller
            .load(
                StoryInput::Events(vec![raw("a", 1900.0, "War", "Europe")]),
                Some(10),
            )
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(teller.state().all_data.len(), 1);
    }

    #[test]
    fn test_save_state_prunes_orphans() {
        let mut teller = loaded();
        teller.add_caption("kept", 0.0, 0.0);
        teller.record_scene();
        // an orphan created after recording, referenced by no scene
        teller.state.annotation_lists.add_caption("orphan", 0.0, 0.0);

        let doc = teller.save_state();
        assert_eq!(doc.caption_list.len(), 1);
        assert_eq!(doc.scenes.len(), 1);
        assert_eq!(doc.version, 2);
        assert!(doc.timestamp > 0);
    }

    #[test]
    fn test_document_load_applies_first_scene() {
        let mut teller = loaded();
        teller.set_scale(Scale::Sequential);
        teller.record_scene();
        let doc = teller.save_state();

        let mut restored = StoryTeller::new();
        let change = restored
            .load_now(StoryInput::Document(doc))
            .unwrap()
            .expect("document with scenes applies scene 0");
        assert_eq!(change.order, 0);
        assert_eq!(restored.state().view.scale, Scale::Sequential);
        assert_eq!(restored.state().scene_store.current_index, Some(0));
    }

    #[test]
    fn test_update_preserves_custom_colors() {
        let mut teller = loaded();
        assert!(teller.set_category_color("War", "#123456"));
        teller
            .update(vec![
                raw("a", 1900.0, "War", "Europe"),
                raw("d", 1970.0, "Science", "Asia"),
            ])
            .unwrap();
        let state = teller.state();
        let war = state.category_index("War").unwrap();
        assert_eq!(state.palette.color_for(war), "#123456");
    }

    #[test]
    fn test_failed_scene_change_restores_selections() {
        let mut teller = loaded();
        teller
            .apply_filters(FilterSelections {
                categories: vec!["War".to_string()],
                ..Default::default()
            })
            .unwrap();
        teller.set_filter_mode(FilterMode::Hide).unwrap();
        teller.record_scene();
        teller.set_filter_mode(FilterMode::Emphasize).unwrap();

        // the recorded hide filter matches nothing in the replacement data
        teller.update(vec![raw("d", 1970.0, "Science", "Asia")]).unwrap();
        teller
            .apply_filters(FilterSelections {
                categories: vec!["Science".to_string()],
                ..Default::default()
            })
            .unwrap();
        let before = teller.state().selections.clone();
        assert!(teller.change_scene(0).is_err());
        assert_eq!(teller.state().selections, before);
    }

    #[test]
    fn test_delete_unknown_scene_errors() {
        let mut teller = loaded();
        assert!(matches!(
            teller.delete_scene(7),
            Err(StoryError::SceneNotFound(7))
        ));
    }
}
