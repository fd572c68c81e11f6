//! State management module
//!
//! This module contains all the core data structures for a story:
//! - StoryState: the context struct one story instance owns
//! - TimelineEvent: resolved events the layout engines operate on
//! - Scene / SceneStore: recorded story steps and their ordering
//! - AnnotationLists: canonical caption/image/annotation lists
//! - ViewConfig / FilterSelections: view and filter settings

mod annotation;
mod event;
mod palette;
mod scene;
mod story_state;
mod view;

pub use annotation::*;
pub use event::*;
pub use palette::*;
pub use scene::*;
pub use story_state::*;
pub use view::*;
