//! Story module
//!
//! The `StoryTeller` facade and the persisted story document.

mod persistence;
mod storyteller;

pub use persistence::*;
pub use storyteller::*;
