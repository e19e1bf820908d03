//! Project serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.
//! Share tokens carry the bare snapshot as base64 so a whole edit fits in a
//! link.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use splice_core::{Result, SpliceError};
use tracing::info;

use crate::clip::Clip;
use crate::config::TimelineConfig;
use crate::media::MediaReference;
use crate::state::TimelineState;
use crate::track::Track;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// The persisted edit data: everything a renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub clips: Vec<Clip>,
    pub tracks: Vec<Track>,
    pub media_files: Vec<MediaReference>,
}

impl ProjectSnapshot {
    /// Serialize to compact JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| SpliceError::Serialization(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Parse JSON bytes. Does not check timeline invariants; see
    /// [`TimelineState::from_snapshot`].
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| SpliceError::Serialization(format!("Invalid snapshot: {}", e)))
    }

    /// Encode as a URL-safe share token.
    pub fn to_share_token(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.to_json()?))
    }

    /// Decode a share token. Accepts URL-safe and standard base64.
    pub fn from_share_token(token: &str) -> Result<Self> {
        let token = token.trim();
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .or_else(|_| STANDARD.decode(token))
            .map_err(|e| SpliceError::Serialization(format!("Invalid share token: {}", e)))?;
        Self::from_json(&bytes)
    }
}

impl TimelineState {
    /// Copy out the edit data.
    pub fn to_snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            clips: self.clips.clone(),
            tracks: self.tracks.clone(),
            media_files: self.media.clone(),
        }
    }

    /// Rebuild a state from persisted edit data, checking every invariant.
    pub fn from_snapshot(snapshot: ProjectSnapshot, config: &TimelineConfig) -> Result<Self> {
        let mut state = TimelineState::new(config.empty_duration_floor);
        state.media = snapshot.media_files;
        state.tracks = snapshot.tracks;
        state.clips = snapshot.clips;
        state.clips.iter_mut().for_each(Clip::settle_at_origin);
        state.validate(config.min_clip_duration)?;
        state.recompute();
        Ok(state)
    }
}

/// On-disk project document: a snapshot tagged with the schema it was
/// written in.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: u32,
    pub project: ProjectSnapshot,
    /// Crate version of the writer, informational only.
    pub app_version: String,
}

impl ProjectFile {
    /// Wrap a snapshot at the current schema version.
    pub fn new(project: ProjectSnapshot) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SpliceError::Serialization(format!("Cannot encode project: {}", e)))
    }

    /// Parse a document of any known schema version, upgrading it first.
    /// Documents from a newer writer are refused rather than misread.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let mut doc: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| SpliceError::Serialization(format!("Project is not JSON: {}", e)))?;

        // Documents without a version field predate versioning.
        let mut version = match doc.get("version") {
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| SpliceError::Serialization(format!("Bad version field: {}", v)))?,
            None => 0,
        };
        if version > CURRENT_VERSION {
            return Err(SpliceError::Serialization(format!(
                "Project schema {} is newer than this build understands ({})",
                version, CURRENT_VERSION
            )));
        }
        while version < CURRENT_VERSION {
            (version, doc) = upgrade(version, doc)?;
        }

        serde_json::from_value(doc)
            .map_err(|e| SpliceError::Serialization(format!("Malformed project: {}", e)))
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), clips = self.project.clips.len(), "saved project");
        Ok(())
    }

    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let file = Self::from_json(&std::fs::read(path)?)?;
        info!(path = %path.display(), version = file.version, "loaded project");
        Ok(file)
    }
}

/// One schema step: `version` to `version + 1`.
fn upgrade(version: u32, doc: serde_json::Value) -> Result<(u32, serde_json::Value)> {
    match version {
        // v0 was the bare snapshot, as still used by share tokens.
        0 => Ok((
            1,
            serde_json::json!({
                "version": 1,
                "project": doc,
                "app_version": "0.0.0",
            }),
        )),
        other => Err(SpliceError::Serialization(format!(
            "No upgrade from project schema {}",
            other
        ))),
    }
}
