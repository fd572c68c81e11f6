//! Scenes and the scene store
//!
//! A scene is a recorded snapshot of view configuration, filter
//! selections, annotation references, and event selections. The store
//! keeps `s_order` values as a dense 0-based permutation at all times;
//! storage order is incidental, `s_order` is authoritative.

use serde::{Deserialize, Serialize};

use crate::state::view::{FilterMode, Layout, Representation, Scale};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCaptionRef {
    pub caption_id: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneImageRef {
    pub image_id: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAnnotationRef {
    pub annotation_id: u64,
}

/// One recorded story step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub s_order: usize,
    pub s_width: f64,
    pub s_height: f64,
    pub s_scale: Scale,
    pub s_layout: Layout,
    pub s_representation: Representation,
    pub s_categories: Vec<String>,
    pub s_facets: Vec<String>,
    pub s_segments: Vec<String>,
    pub s_filter_type: FilterMode,
    pub s_legend_x: f64,
    pub s_legend_y: f64,
    pub s_legend_expanded: bool,
    #[serde(default)]
    pub s_captions: Vec<SceneCaptionRef>,
    #[serde(default)]
    pub s_images: Vec<SceneImageRef>,
    #[serde(default)]
    pub s_annotations: Vec<SceneAnnotationRef>,
    /// Ids of events selected when the scene was recorded.
    #[serde(default)]
    pub s_selections: Vec<usize>,
    /// Serialized timecurve path, opaque to this crate.
    #[serde(default)]
    pub s_timecurve: String,
    /// Thumbnail reference, opaque to this crate.
    #[serde(default)]
    pub s_src: String,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            s_order: 0,
            s_width: 0.0,
            s_height: 0.0,
            s_scale: Scale::Chronological,
            s_layout: Layout::Unified,
            s_representation: Representation::Linear,
            s_categories: Vec::new(),
            s_facets: Vec::new(),
            s_segments: Vec::new(),
            s_filter_type: FilterMode::Emphasize,
            s_legend_x: crate::constants::DEFAULT_LEGEND_X,
            s_legend_y: crate::constants::DEFAULT_LEGEND_Y,
            s_legend_expanded: false,
            s_captions: Vec::new(),
            s_images: Vec::new(),
            s_annotations: Vec::new(),
            s_selections: Vec::new(),
            s_timecurve: String::new(),
            s_src: String::new(),
        }
    }
}

/// The ordered scene collection and the playback cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneStore {
    pub scenes: Vec<Scene>,
    /// Index into the `s_order` space, not the storage vec. `None` until
    /// a scene is recorded or visited.
    #[serde(skip)]
    pub current_index: Option<usize>,
}

impl SceneStore {
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Linear scan by `s_order`.
    pub fn find(&self, order: usize) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.s_order == order)
    }

    pub fn find_mut(&mut self, order: usize) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.s_order == order)
    }

    pub fn current(&self) -> Option<&Scene> {
        self.find(self.current_index?)
    }

    /// Insert a new scene immediately after the current one (or at the
    /// front of the story when there is no current scene). Later scenes
    /// shift up by one; the cursor advances onto the new scene. Returns
    /// the assigned `s_order`.
    pub fn insert_after_current(&mut self, mut scene: Scene) -> usize {
        let order = self.current_index.map_or(0, |i| i + 1);
        for existing in &mut self.scenes {
            if existing.s_order >= order {
                existing.s_order += 1;
            }
        }
        scene.s_order = order;
        self.scenes.push(scene);
        self.current_index = Some(order);
        order
    }

    /// Remove the scene at `order`, renumbering later scenes down by one.
    /// Deleting the current scene moves the cursor to the previous scene,
    /// wrapping to the last scene when order 0 is deleted. Returns false
    /// when no scene has that order.
    pub fn delete(&mut self, order: usize) -> bool {
        let Some(position) = self.scenes.iter().position(|s| s.s_order == order) else {
            return false;
        };
        self.scenes.swap_remove(position);
        for scene in &mut self.scenes {
            if scene.s_order > order {
                scene.s_order -= 1;
            }
        }

        self.current_index = if self.scenes.is_empty() {
            None
        } else {
            match self.current_index {
                Some(current) if current == order => {
                    Some(if order == 0 { self.scenes.len() - 1 } else { order - 1 })
                }
                Some(current) if current > order => Some(current - 1),
                other => other,
            }
        };
        true
    }

    /// Advance the cursor circularly. No-op with fewer than two scenes.
    pub fn go_next(&mut self) -> Option<usize> {
        if self.scenes.len() < 2 {
            return None;
        }
        let next = (self.current_index.unwrap_or(0) + 1) % self.scenes.len();
        self.current_index = Some(next);
        Some(next)
    }

    /// Step the cursor back circularly. No-op with fewer than two scenes.
    pub fn go_previous(&mut self) -> Option<usize> {
        if self.scenes.len() < 2 {
            return None;
        }
        let current = self.current_index.unwrap_or(0);
        let previous = if current == 0 { self.scenes.len() - 1 } else { current - 1 };
        self.current_index = Some(previous);
        Some(previous)
    }

    /// True when the `s_order` values form `{0, 1, .., n-1}`.
    #[cfg(test)]
    fn orders_are_dense(&self) -> bool {
        let mut orders: Vec<usize> = self.scenes.iter().map(|s| s.s_order).collect();
        orders.sort_unstable();
        orders.iter().copied().eq(0..self.scenes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> SceneStore {
        let mut store = SceneStore::default();
        for _ in 0..n {
            store.insert_after_current(Scene::default());
        }
        store
    }

    #[test]
    fn test_insert_advances_cursor_and_renumbers() {
        let mut store = store_with(3);
        assert_eq!(store.current_index, Some(2));
        assert!(store.orders_are_dense());

        // step back and record in the middle of the story
        store.go_previous();
        store.go_previous();
        assert_eq!(store.current_index, Some(0));
        let order = store.insert_after_current(Scene::default());
        assert_eq!(order, 1);
        assert_eq!(store.len(), 4);
        assert!(store.orders_are_dense());
    }

    #[test]
    fn test_delete_renumbers_down() {
        let mut store = store_with(3);
        assert!(store.delete(1));
        assert_eq!(store.len(), 2);
        assert!(store.orders_are_dense());
        // cursor was at 2, which slid down to 1
        assert_eq!(store.current_index, Some(1));
    }

    #[test]
    fn test_delete_current_moves_to_previous() {
        let mut store = store_with(3);
        assert_eq!(store.current_index, Some(2));
        assert!(store.delete(2));
        assert_eq!(store.current_index, Some(1));
    }

    #[test]
    fn test_delete_first_wraps_to_last() {
        let mut store = store_with(3);
        store.current_index = Some(0);
        assert!(store.delete(0));
        assert_eq!(store.current_index, Some(store.len() - 1));
    }

    #[test]
    fn test_delete_last_scene_clears_cursor() {
        let mut store = store_with(1);
        assert!(store.delete(0));
        assert!(store.is_empty());
        assert_eq!(store.current_index, None);
    }

    #[test]
    fn test_delete_unknown_order_is_rejected() {
        let mut store = store_with(2);
        assert!(!store.delete(5));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut store = store_with(3);
        assert_eq!(store.go_next(), Some(0));
        assert_eq!(store.go_previous(), Some(2));
    }

    #[test]
    fn test_navigation_noop_with_single_scene() {
        let mut store = store_with(1);
        assert_eq!(store.go_next(), None);
        assert_eq!(store.go_previous(), None);
        assert_eq!(store.current_index, Some(0));
    }

    #[test]
    fn test_orders_stay_dense_under_mixed_edits() {
        let mut store = store_with(5);
        store.delete(2);
        store.insert_after_current(Scene::default());
        store.delete(0);
        store.insert_after_current(Scene::default());
        assert!(store.orders_are_dense());
    }
}
