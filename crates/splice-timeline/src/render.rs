//! Seam to the export/render layer.

use crate::serialization::ProjectSnapshot;

/// Turns a read-only snapshot into an output artifact (a media file, a
/// preview, an upload). Implemented outside the editing core.
pub trait SequenceRenderer {
    type Output;
    type Error: std::fmt::Display;

    fn render(&self, snapshot: &ProjectSnapshot) -> Result<Self::Output, Self::Error>;
}
