//! Story document persistence
//!
//! The loader accepts either a bare event array or a full version-2 story
//! document; documents round-trip through `serde_json` and land on disk
//! next to wherever the host puts them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::constants::{STORY_DOCUMENT_VERSION, STORY_FILE_NAME};
use crate::state::{AnnotationLists, RawEvent, Scene};

/// The persisted story document, schema version 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDocument {
    pub version: u32,
    pub timeline_json_data: Vec<RawEvent>,
    pub name: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub usage_log: Vec<String>,
    #[serde(default)]
    pub caption_list: Vec<crate::state::Caption>,
    #[serde(default)]
    pub annotation_list: Vec<crate::state::Annotation>,
    #[serde(default)]
    pub image_list: Vec<crate::state::ImageNote>,
    #[serde(default)]
    pub author: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl StoryDocument {
    pub fn new(timeline_json_data: Vec<RawEvent>) -> Self {
        Self {
            version: STORY_DOCUMENT_VERSION,
            timeline_json_data,
            name: STORY_FILE_NAME.to_string(),
            scenes: Vec::new(),
            width: 0.0,
            height: 0.0,
            color_palette: Vec::new(),
            usage_log: Vec::new(),
            caption_list: Vec::new(),
            annotation_list: Vec::new(),
            image_list: Vec::new(),
            author: String::new(),
            timestamp: 0,
        }
    }

    pub fn annotation_lists(&self) -> AnnotationLists {
        AnnotationLists {
            captions: self.caption_list.clone(),
            images: self.image_list.clone(),
            annotations: self.annotation_list.clone(),
        }
    }

    /// Save the document to a file.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a document (or bare event array) from a file.
    pub fn load_from(path: &Path) -> io::Result<StoryInput> {
        let json = fs::read_to_string(path)?;
        let input: StoryInput = serde_json::from_str(&json)?;
        Ok(input)
    }
}

/// What the loader accepts: a bare event array, or a story document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryInput {
    Document(StoryDocument),
    Events(Vec<RawEvent>),
}

impl From<Vec<RawEvent>> for StoryInput {
    fn from(events: Vec<RawEvent>) -> Self {
        StoryInput::Events(events)
    }
}
