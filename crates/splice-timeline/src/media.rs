//! Media references and the resolver seam to the decoding layer.

use serde::{Deserialize, Serialize};
use splice_core::{Result, SpliceError};
use uuid::Uuid;

/// Kind of media, also used as the kind of the track that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

/// An imported media source. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaReference {
    pub id: Uuid,
    /// Display name, usually the imported file name
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Source duration in seconds
    pub duration: f64,
}

impl MediaReference {
    /// Create a media reference with a fresh id.
    pub fn new(name: impl Into<String>, kind: MediaKind, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            duration,
        }
    }

    /// Reject negative or non-finite durations.
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(SpliceError::InvalidMedia(format!(
                "media {} has invalid duration {}",
                self.id, self.duration
            )));
        }
        Ok(())
    }
}

/// What the core needs to know about a media source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMedia {
    pub duration: f64,
}

/// Looks up media by id. Implemented by the decoding layer and by the
/// timeline's own registry.
pub trait MediaResolver {
    fn resolve(&self, media_id: Uuid) -> Option<ResolvedMedia>;
}

impl MediaResolver for [MediaReference] {
    fn resolve(&self, media_id: Uuid) -> Option<ResolvedMedia> {
        self.iter().find(|m| m.id == media_id).map(|m| ResolvedMedia {
            duration: m.duration,
        })
    }
}
