//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaKind;

/// A lane of non-overlapping clips of one kind.
///
/// Clips are not stored inside the track; they point at it through
/// [`crate::Clip::track_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track kind
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

impl Track {
    /// Create a new track of the given kind.
    pub fn new(kind: MediaKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    /// Create a new video track.
    pub fn new_video() -> Self {
        Self::new(MediaKind::Video)
    }

    /// Create a new audio track.
    pub fn new_audio() -> Self {
        Self::new(MediaKind::Audio)
    }
}
