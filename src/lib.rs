//! Layout, sizing, and scene-state engine for interactive timeline
//! stories.
//!
//! Given a set of dated events, the crate determines how dates are
//! handled, buckets events into calendar segments, packs them onto
//! non-overlapping tracks, and computes canvas dimensions for every
//! feasible combination of scale, layout, and representation. On top of
//! that sits a scene/annotation model: recorded view snapshots that
//! replay as a story.
//!
//! The [`story::StoryTeller`] facade is the public entry point; the
//! rendering layer consumes resolved dimensions and per-event layout
//! fields and calls back in on user interaction.

pub mod constants;
pub mod core;
pub mod error;
pub mod state;
pub mod story;

pub use error::{Result, StoryError};
pub use state::{FilterMode, FilterSelections, Layout, Representation, Scale, ViewConfig};
pub use story::{SceneChange, StoryInput, StoryTeller};
