//! The shared story state context.
//!
//! One `StoryState` holds everything a story instance owns: the raw and
//! resolved event data, the active subset, the view and filter settings,
//! the scene store, and the derived layout measures the size resolver
//! produces. The layout engines borrow it explicitly; nothing in the
//! crate reads ambient globals.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LEGEND_X, DEFAULT_LEGEND_Y, DEFAULT_RENDER_HEIGHT, DEFAULT_RENDER_WIDTH,
};
use crate::core::segments::SegmentGranularity;
use crate::state::annotation::AnnotationLists;
use crate::state::event::{DateGranularity, RawEvent, TimelineEvent};
use crate::state::palette::CategoryPalette;
use crate::state::scene::SceneStore;
use crate::state::view::{FilterMode, FilterSelections, ViewConfig};

/// Derived measures the size resolver computes and the renderer consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutMeasures {
    /// Tracks used by the unified chronological layout.
    pub num_tracks: usize,
    /// Largest per-facet track count.
    pub max_num_tracks: usize,
    /// Largest sequence index assigned.
    pub max_seq_index: usize,
    /// Largest per-facet sequence track count.
    pub max_num_seq_tracks: usize,
    pub num_facet_cols: usize,
    pub num_facet_rows: usize,
    pub num_segment_cols: usize,
    pub num_segment_rows: usize,
    /// Largest relative end age across facets.
    pub max_end_age: f64,
    /// Side length of the spiral bounding box.
    pub spiral_dim: f64,
    /// Inner radius of radial views, after clamping.
    pub centre_radius: f64,
    /// Selection cardinality of the last applied filter, for detecting
    /// filter deltas between scenes.
    pub filter_set_length: usize,
}

/// All mutable state of one loaded story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryState {
    /// Imported records as loaded, after deduplication.
    pub raw_data: Vec<RawEvent>,
    /// Resolved events in load order; `event_id` equals the index.
    #[serde(skip)]
    pub all_data: Vec<TimelineEvent>,
    /// Ids of events in the active (rendered) set.
    #[serde(skip)]
    pub active_ids: Vec<usize>,
    /// Ids of events matching the current filter selections.
    #[serde(skip)]
    pub active_event_list: Vec<usize>,
    /// The previous match list, kept for restyling on filter change.
    #[serde(skip)]
    pub prev_active_event_list: Vec<usize>,

    pub date_granularity: DateGranularity,
    pub segment_granularity: SegmentGranularity,
    /// Distinct category values, in first-appearance order.
    pub categories: Vec<String>,
    /// Distinct facet values, in first-appearance order.
    pub facets: Vec<String>,
    /// Segment labels covering the active date domain.
    pub segments: Vec<String>,

    pub palette: CategoryPalette,
    pub view: ViewConfig,
    pub filter_mode: FilterMode,
    pub selections: FilterSelections,

    pub render_width: f64,
    pub render_height: f64,
    pub legend_x: f64,
    pub legend_y: f64,
    pub legend_expanded: bool,
    /// Dimensions resolved for the current view combination.
    pub last_width: f64,
    pub last_height: f64,

    pub scene_store: SceneStore,
    pub annotation_lists: AnnotationLists,
    /// Ids of annotation items currently on screen.
    pub visible_captions: Vec<u64>,
    pub visible_images: Vec<u64>,
    pub visible_annotations: Vec<u64>,

    pub measures: LayoutMeasures,
    pub usage_log: Vec<String>,
    pub author: String,
    /// True while the story is replaying scenes rather than being edited.
    pub playback_mode: bool,
}

impl StoryState {
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            legend_x: DEFAULT_LEGEND_X,
            legend_y: DEFAULT_LEGEND_Y,
            ..Default::default()
        }
    }

    pub fn event(&self, event_id: usize) -> Option<&TimelineEvent> {
        self.all_data.get(event_id)
    }

    pub fn event_mut(&mut self, event_id: usize) -> Option<&mut TimelineEvent> {
        self.all_data.get_mut(event_id)
    }

    /// Clones of the active events, for the layout engines to annotate
    /// and hand back through [`write_back`](Self::write_back).
    pub fn active_events(&self) -> Vec<TimelineEvent> {
        self.active_ids
            .iter()
            .filter_map(|&id| self.all_data.get(id).cloned())
            .collect()
    }

    /// Numeric time domain of the active set, `(min start, max end)`.
    pub fn active_domain(&self) -> Option<(f64, f64)> {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for &id in &self.active_ids {
            let Some(event) = self.all_data.get(id) else { continue };
            let start = event.start.numeric();
            let end = event.end.numeric();
            min = Some(min.map_or(start, |m: f64| m.min(start)));
            max = Some(max.map_or(end, |m: f64| m.max(end)));
        }
        Some((min?, max?))
    }

    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// Copy layout outputs from a worked-on clone back into `all_data`,
    /// matching by `event_id`.
    pub fn write_back(&mut self, events: &[TimelineEvent]) {
        for event in events {
            if let Some(target) = self.all_data.get_mut(event.event_id) {
                target.track = event.track;
                target.seq_index = event.seq_index;
                target.segment = event.segment.clone();
                target.spiral_x = event.spiral_x;
                target.spiral_y = event.spiral_y;
                target.curve_x = event.curve_x;
                target.curve_y = event.curve_y;
                target.start_age = event.start_age;
                target.end_age = event.end_age;
            }
        }
    }

    pub fn log_usage(&mut self, entry: impl Into<String>) {
        self.usage_log.push(entry.into());
    }
}
