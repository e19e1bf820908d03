//! Splice Timeline - authoritative edit state
//!
//! Implements the timeline model for video editing:
//! - Media references, tracks and clips with their invariants
//! - Edit commands applied as snapshot-to-snapshot transforms
//! - The store with undo/redo and the playback clock
//! - Project persistence and share tokens

pub mod clip;
pub mod config;
pub mod driver;
pub mod edit;
pub mod history;
pub mod media;
pub mod playback;
pub mod render;
pub mod serialization;
pub mod state;
pub mod store;
pub mod track;

pub use clip::{Clip, ClipPatch};
pub use config::{Placement, PlacementPolicy, TimelineConfig, TrackAllocation};
pub use driver::{PlaybackDriver, SharedStore};
pub use edit::{EditCommand, EditOutcome};
pub use history::UndoStack;
pub use media::{MediaKind, MediaReference, MediaResolver, ResolvedMedia};
pub use playback::{FrameTicket, PlaybackClock, Tick};
pub use render::SequenceRenderer;
pub use serialization::{ProjectFile, ProjectSnapshot};
pub use state::{Neighbors, TimelineState};
pub use store::TimelineStore;
pub use track::Track;
