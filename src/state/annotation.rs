//! Annotation data model
//!
//! Captions, images, and event annotations live in process-wide canonical
//! lists; scenes reference them by id. Recording a scene hands the
//! displayed instance off to the scene and mints an independent copy for
//! future editing, so editing one scene's annotation never mutates another
//! scene's snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::state::scene::Scene;

/// Shared identity handling for the three annotation list item kinds.
pub trait AnnotationRecord {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

/// A free-floating text caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub id: u64,
    pub caption_text: String,
    pub x: f64,
    pub y: f64,
    pub z_index: i32,
}

/// An image placed on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNote {
    pub id: u64,
    pub image_url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

/// Free text attached to a specific event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub event_id: usize,
    pub content_text: String,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_index: i32,
}

macro_rules! impl_annotation_record {
    ($($t:ty),*) => {
        $(impl AnnotationRecord for $t {
            fn id(&self) -> u64 {
                self.id
            }
            fn set_id(&mut self, id: u64) {
                self.id = id;
            }
        })*
    };
}

impl_annotation_record!(Caption, ImageNote, Annotation);

/// One entry of the old-id to new-id mapping produced when recording a
/// scene; the rendering layer repoints its display handles with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRemap {
    pub old_id: u64,
    pub new_id: u64,
}

/// The id the next appended item receives: `max(existing) + 1`, never reused.
pub fn next_id<T: AnnotationRecord>(list: &[T]) -> u64 {
    list.iter().map(AnnotationRecord::id).max().unwrap_or(0) + 1
}

/// Freeze the referenced items for a recorded scene.
///
/// Each referenced canonical item is cloned; the clone keeps the old id
/// (the recorded scene's refs point at it), while the canonical item is
/// reassigned a fresh id so future edits only affect upcoming scenes.
/// References with no matching item are skipped.
pub fn copy_annotations<T: AnnotationRecord + Clone>(
    list: &mut Vec<T>,
    referenced: &[u64],
) -> Vec<IdRemap> {
    let mut next = list.iter().map(AnnotationRecord::id).max().unwrap_or(0);
    let mut remap = Vec::with_capacity(referenced.len());
    for &old_id in referenced {
        let Some(position) = list.iter().position(|item| item.id() == old_id) else {
            continue;
        };
        let frozen = list[position].clone();
        next += 1;
        list[position].set_id(next);
        list.push(frozen);
        remap.push(IdRemap { old_id, new_id: next });
    }
    remap
}

/// The process-wide canonical annotation lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationLists {
    pub captions: Vec<Caption>,
    pub images: Vec<ImageNote>,
    pub annotations: Vec<Annotation>,
}

impl AnnotationLists {
    /// Drop every canonical item no scene references. Run before any save
    /// or export so edit history does not grow the lists without bound.
    pub fn prune(&mut self, scenes: &[Scene]) {
        let caption_ids: HashSet<u64> = scenes
            .iter()
            .flat_map(|s| s.s_captions.iter().map(|r| r.caption_id))
            .collect();
        let image_ids: HashSet<u64> = scenes
            .iter()
            .flat_map(|s| s.s_images.iter().map(|r| r.image_id))
            .collect();
        let annotation_ids: HashSet<u64> = scenes
            .iter()
            .flat_map(|s| s.s_annotations.iter().map(|r| r.annotation_id))
            .collect();

        self.captions.retain(|c| caption_ids.contains(&c.id));
        self.images.retain(|i| image_ids.contains(&i.id));
        self.annotations.retain(|a| annotation_ids.contains(&a.id));
    }

    pub fn add_caption(&mut self, text: impl Into<String>, x: f64, y: f64) -> u64 {
        let id = next_id(&self.captions);
        self.captions.push(Caption {
            id,
            caption_text: text.into(),
            x,
            y,
            z_index: self.next_z_index(),
        });
        id
    }

    pub fn add_image(&mut self, url: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> u64 {
        let id = next_id(&self.images);
        self.images.push(ImageNote {
            id,
            image_url: url.into(),
            x,
            y,
            width,
            height,
            z_index: self.next_z_index(),
        });
        id
    }

    pub fn add_annotation(&mut self, event_id: usize, text: impl Into<String>, x_offset: f64, y_offset: f64) -> u64 {
        let id = next_id(&self.annotations);
        self.annotations.push(Annotation {
            id,
            event_id,
            content_text: text.into(),
            x_offset,
            y_offset,
            z_index: self.next_z_index(),
        });
        id
    }

    /// Paint order above every existing item.
    fn next_z_index(&self) -> i32 {
        self.captions
            .iter()
            .map(|c| c.z_index)
            .chain(self.images.iter().map(|i| i.z_index))
            .chain(self.annotations.iter().map(|a| a.z_index))
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::{Scene, SceneCaptionRef};

    #[test]
    fn test_ids_are_monotonic() {
        let mut lists = AnnotationLists::default();
        let a = lists.add_caption("one", 0.0, 0.0);
        let b = lists.add_caption("two", 0.0, 0.0);
        assert_eq!((a, b), (1, 2));
        lists.captions.retain(|c| c.id != 2);
        // max(existing)+1 minting: freeing the maximum id hands it back out
        let c = lists.add_caption("three", 0.0, 0.0);
        assert_eq!(c, 2);
        let d = lists.add_caption("four", 0.0, 0.0);
        assert!(d > c);
    }

    #[test]
    fn test_copy_reassigns_canonical_id() {
        let mut captions = vec![Caption {
            id: 1,
            caption_text: "hello".to_string(),
            ..Default::default()
        }];
        let remap = copy_annotations(&mut captions, &[1]);
        assert_eq!(remap, vec![IdRemap { old_id: 1, new_id: 2 }]);
        assert_eq!(captions.len(), 2);
        // the frozen copy keeps the recorded id; the live item moved to the new one
        assert!(captions.iter().any(|c| c.id == 1));
        assert!(captions.iter().any(|c| c.id == 2));
    }

    #[test]
    fn test_copy_skips_missing_reference() {
        let mut captions: Vec<Caption> = Vec::new();
        let remap = copy_annotations(&mut captions, &[42]);
        assert!(remap.is_empty());
        assert!(captions.is_empty());
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut lists = AnnotationLists::default();
        lists.add_caption("kept", 0.0, 0.0);
        lists.add_caption("orphan", 0.0, 0.0);

        let mut scene = Scene::default();
        scene.s_captions.push(SceneCaptionRef { caption_id: 1 });
        let scenes = vec![scene];

        lists.prune(&scenes);
        assert_eq!(lists.captions.len(), 1);
        assert_eq!(lists.captions[0].caption_text, "kept");

        let snapshot = lists.clone();
        lists.prune(&scenes);
        assert_eq!(lists, snapshot);
    }
}
