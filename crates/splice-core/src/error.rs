//! Error types for Splice.

use thiserror::Error;
use uuid::Uuid;

/// Broad classification used by the store to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stale or unknown id. Treated as a silent no-op.
    Reference,
    /// The edit would break a timeline invariant. Reported, never committed.
    Invariant,
    /// An external collaborator (media resolver, renderer) failed.
    Collaborator,
    /// Encoding, decoding or file access failed.
    Persistence,
}

/// Main error type for Splice operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("clip not found: {0}")]
    ClipNotFound(Uuid),

    #[error("track not found: {0}")]
    TrackNotFound(Uuid),

    #[error("media not found: {0}")]
    MediaNotFound(Uuid),

    #[error("invalid clip: {0}")]
    InvalidClip(String),

    #[error("invalid media: {0}")]
    InvalidMedia(String),

    #[error("clip {clip} would overlap clip {other} on track {track}")]
    Overlap { clip: Uuid, other: Uuid, track: Uuid },

    #[error("duplicate id: {0}")]
    DuplicateId(Uuid),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("media {0} is still referenced by clips")]
    MediaInUse(Uuid),

    #[error("media unavailable: {0}")]
    MediaUnavailable(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("no clips to export")]
    NothingToExport,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpliceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClipNotFound(_) | Self::TrackNotFound(_) | Self::MediaNotFound(_) => {
                ErrorKind::Reference
            }
            Self::InvalidClip(_)
            | Self::InvalidMedia(_)
            | Self::Overlap { .. }
            | Self::DuplicateId(_)
            | Self::InvalidConfig(_)
            | Self::MediaInUse(_) => ErrorKind::Invariant,
            Self::MediaUnavailable(_) | Self::Export(_) | Self::NothingToExport => {
                ErrorKind::Collaborator
            }
            Self::Serialization(_) | Self::Io(_) => ErrorKind::Persistence,
        }
    }

    /// True for stale-reference errors that callers should swallow.
    pub fn is_reference(&self) -> bool {
        self.kind() == ErrorKind::Reference
    }
}

/// Result type alias for Splice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;
