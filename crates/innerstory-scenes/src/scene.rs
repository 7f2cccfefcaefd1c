//! The scene record.

use serde::{Deserialize, Serialize};

/// One narrative beat of the finished story.
///
/// Scene numbers are unique within one extraction run and the list is
/// sorted ascending; contiguity is not required, since partial model
/// output is valid. A scene is immutable once extracted — later hand
/// edits belong to the collaborator that persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Position in the story, 1 through 10.
    pub scene_number: u32,
    /// Short scene heading.
    pub title: String,
    /// Participant-facing scene text, sanitized.
    pub text: String,
    /// Illustration description lifted out of the scene body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}
