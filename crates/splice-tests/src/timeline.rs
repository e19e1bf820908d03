//! Integration tests for the timeline store.
//!
//! Exercises edits, history and persistence across splice-core and
//! splice-timeline.

use splice_core::{ErrorKind, SpliceError};
use splice_timeline::{
    ClipPatch, MediaKind, MediaReference, Placement, PlacementPolicy, ProjectFile,
    ProjectSnapshot, SequenceRenderer, TimelineConfig, TimelineStore, TrackAllocation,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn video(name: &str, secs: f64) -> MediaReference {
    MediaReference::new(name, MediaKind::Video, secs)
}

fn one_track_config() -> TimelineConfig {
    TimelineConfig {
        placement: PlacementPolicy {
            track: TrackAllocation::ReuseFirstOfKind,
            position: Placement::TrackTail,
        },
        ..TimelineConfig::default()
    }
}

/// Clips imported back to back on a single video track.
fn one_track(durations: &[f64]) -> (TimelineStore, Vec<Uuid>) {
    let mut store = TimelineStore::new(one_track_config()).unwrap();
    let ids = durations
        .iter()
        .enumerate()
        .map(|(i, d)| store.import_media(video(&format!("clip{i}.mp4"), *d)).unwrap())
        .collect();
    (store, ids)
}

fn bounds(store: &TimelineStore, id: Uuid) -> (f64, f64) {
    let clip = store.state().clip(id).unwrap();
    (clip.start_time, clip.end_time)
}

// ── Import & placement ─────────────────────────────────────────

#[test]
fn imports_queue_at_global_tail_on_new_tracks() {
    let mut store = TimelineStore::default();
    let a = store.import_media(video("a.mp4", 4.0)).unwrap();
    let b = store
        .import_media(MediaReference::new("b.wav", MediaKind::Audio, 6.0))
        .unwrap();
    let c = store.import_media(video("c.mp4", 2.0)).unwrap();

    assert_eq!(store.state().tracks().len(), 3);
    assert_eq!(bounds(&store, a), (0.0, 4.0));
    assert_eq!(bounds(&store, b), (4.0, 10.0));
    assert_eq!(bounds(&store, c), (10.0, 12.0));
    assert_eq!(store.state().duration(), 12.0);
}

#[test]
fn track_tail_policy_ignores_other_tracks() {
    let mut store = TimelineStore::new(one_track_config()).unwrap();
    store.import_media(video("a.mp4", 4.0)).unwrap();
    let audio = store
        .import_media(MediaReference::new("b.wav", MediaKind::Audio, 3.0))
        .unwrap();
    // The audio track is new, so its tail is at zero.
    assert_eq!(bounds(&store, audio), (0.0, 3.0));
    assert_eq!(store.state().tracks().len(), 2);
}

// ── Edit semantics ─────────────────────────────────────────────

#[test]
fn split_is_exact() {
    let (mut store, ids) = one_track(&[2.0, 6.0, 3.0]);
    assert_eq!(bounds(&store, ids[1]), (2.0, 8.0));
    let source = store.state().clip(ids[1]).unwrap().clone();

    // Split at 5 only touches the [2, 8) clip.
    assert!(store.split_clip_at_time(5.0).unwrap());
    let clips = store.state().clips();
    assert_eq!(clips.len(), 4);
    assert_eq!(bounds(&store, ids[0]), (0.0, 2.0));
    assert_eq!(bounds(&store, ids[2]), (8.0, 11.0));
    assert!(store.state().clip(ids[1]).is_none());

    let halves: Vec<_> = clips
        .iter()
        .filter(|c| c.id != ids[0] && c.id != ids[2])
        .collect();
    assert_eq!(halves.len(), 2);
    let mut ranges: Vec<(f64, f64)> = halves.iter().map(|c| (c.start_time, c.end_time)).collect();
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
    assert_eq!(ranges, vec![(2.0, 5.0), (5.0, 8.0)]);
    for half in &halves {
        assert_eq!(half.media_id, source.media_id);
        assert_eq!(half.track_id, source.track_id);
    }
    assert_ne!(halves[0].id, halves[1].id);
}

#[test]
fn split_cuts_every_track() {
    let mut store = TimelineStore::new(TimelineConfig {
        placement: PlacementPolicy {
            track: TrackAllocation::NewTrackPerImport,
            position: Placement::TrackTail,
        },
        ..TimelineConfig::default()
    })
    .unwrap();
    store.import_media(video("a.mp4", 10.0)).unwrap();
    store.import_media(video("b.mp4", 10.0)).unwrap();

    store.split_clip_at_time(4.0).unwrap();
    assert_eq!(store.state().clips().len(), 4);
    for track in store.state().tracks() {
        let ranges: Vec<(f64, f64)> = store
            .state()
            .track_clips(track.id)
            .iter()
            .map(|c| (c.start_time, c.end_time))
            .collect();
        assert_eq!(ranges, vec![(0.0, 4.0), (4.0, 10.0)]);
    }
}

#[test]
fn end_change_ripples_same_track() {
    let (mut store, ids) = one_track(&[4.0, 6.0]);
    assert!(store.update_clip_props(ids[0], ClipPatch::end(6.0)).unwrap());

    assert_eq!(bounds(&store, ids[0]), (0.0, 6.0));
    assert_eq!(bounds(&store, ids[1]), (6.0, 12.0));
    assert_eq!(store.state().duration(), 12.0);
}

#[test]
fn delete_leaves_gap_and_unknown_delete_is_noop() {
    let (mut store, ids) = one_track(&[2.0, 2.0, 2.0]);
    let before = store.snapshot();
    assert!(!store.delete_clip(Uuid::new_v4()).unwrap());
    assert_eq!(*store.snapshot(), *before);

    store.delete_clip(ids[1]).unwrap();
    assert_eq!(bounds(&store, ids[2]), (4.0, 6.0));
    assert_eq!(store.state().duration(), 6.0);
}

#[test]
fn duplicate_lands_after_source() {
    let (mut store, ids) = one_track(&[3.0, 2.0]);
    let copy = store.duplicate_clip(ids[0]).unwrap().unwrap();
    assert_eq!(bounds(&store, copy), (3.0, 6.0));
    // The glued neighbor moves out of the way
    assert_eq!(bounds(&store, ids[1]), (6.0, 8.0));
    assert!(store.state().check_track(store.state().tracks()[0].id).is_ok());
}

#[test]
fn mute_toggles_and_survives_split() {
    let (mut store, ids) = one_track(&[4.0]);
    store.toggle_clip_mute(ids[0]).unwrap();
    store.split_clip_at_time(1.0).unwrap();
    assert!(store.state().clips().iter().all(|c| c.muted));
}

#[test]
fn invariant_errors_are_reported_not_committed() {
    let (mut store, ids) = one_track(&[4.0, 4.0]);
    let before = store.snapshot();

    let err = store
        .update_clip_props(ids[0], ClipPatch::bounds(3.0, 3.05))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);

    let err = store
        .update_clip_props(ids[1], ClipPatch::start(2.0))
        .unwrap_err();
    assert!(matches!(err, SpliceError::Overlap { .. }));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn start_rounding_below_zero_commits_at_zero() {
    let (mut store, ids) = one_track(&[2.0, 2.0]);
    store
        .update_clip_props(ids[0], ClipPatch::bounds(-5e-10, 2.0 - 5e-10))
        .unwrap();

    let (start, end) = bounds(&store, ids[0]);
    assert_eq!(start, 0.0);
    assert!((end - 2.0).abs() < 1e-12);
    assert!(store.state().clips().iter().all(|c| c.start_time >= 0.0));
    assert!(store.state().check_track(store.state().tracks()[0].id).is_ok());
}

// ── Selection, cursor & history ────────────────────────────────

#[test]
fn stale_selection_reads_as_none() {
    let (mut store, ids) = one_track(&[4.0]);
    store.select_clip(Some(ids[0]));
    store.delete_clip(ids[0]).unwrap();
    assert!(store.state().selected_clip().is_none());
    assert_eq!(store.state().duration(), 0.0);
}

#[test]
fn cursor_is_clamped_to_duration() {
    let (mut store, ids) = one_track(&[4.0, 4.0]);
    store.set_current_time(100.0);
    assert_eq!(store.state().current_time(), 8.0);
    store.set_current_time(-3.0);
    assert_eq!(store.state().current_time(), 0.0);

    store.set_current_time(7.0);
    store.delete_clip(ids[1]).unwrap();
    assert_eq!(store.state().current_time(), 4.0);
}

#[test]
fn undo_walks_back_through_edits() {
    let (mut store, ids) = one_track(&[4.0, 4.0]);
    store.update_clip_props(ids[0], ClipPatch::end(5.0)).unwrap();
    store.split_clip_at_time(2.0).unwrap();
    assert_eq!(store.state().clips().len(), 3);

    assert!(store.undo());
    assert_eq!(store.state().clips().len(), 2);
    assert!(store.undo());
    assert_eq!(bounds(&store, ids[1]), (4.0, 8.0));

    assert!(store.redo());
    assert_eq!(bounds(&store, ids[1]), (5.0, 9.0));

    // A fresh edit drops the redo branch
    store.toggle_clip_mute(ids[0]).unwrap();
    assert!(!store.can_redo());
}

// ── Persistence & export ───────────────────────────────────────

#[test]
fn project_file_round_trip_preserves_edit_data() {
    let (mut store, ids) = one_track(&[1.25, 3.7]);
    store.toggle_clip_mute(ids[1]).unwrap();
    store
        .update_clip_props(
            ids[0],
            ClipPatch {
                opacity: Some(0.3),
                playback_rate: Some(1.5),
                ..ClipPatch::default()
            },
        )
        .unwrap();

    let json = ProjectFile::new(store.export_snapshot()).to_json().unwrap();
    let loaded = ProjectFile::from_json(&json).unwrap();
    let restored = TimelineStore::from_snapshot(loaded.project, one_track_config()).unwrap();

    assert_eq!(restored.state().clips(), store.state().clips());
    assert_eq!(restored.state().tracks(), store.state().tracks());
    assert_eq!(restored.state().media(), store.state().media());
    assert_eq!(restored.state().duration(), store.state().duration());
}

#[test]
fn share_token_round_trip() {
    let (store, _) = one_track(&[2.0, 0.3333333333333333]);
    let token = store.export_snapshot().to_share_token().unwrap();
    assert!(!token.contains('='));

    let snapshot = ProjectSnapshot::from_share_token(&token).unwrap();
    assert_eq!(snapshot, store.export_snapshot());
}

#[test]
fn corrupt_snapshot_is_rejected_on_load() {
    let (store, _) = one_track(&[2.0, 2.0]);
    let mut snapshot = store.export_snapshot();
    snapshot.clips[1].start_time = 1.0;
    let err = TimelineStore::from_snapshot(snapshot, one_track_config()).unwrap_err();
    assert!(matches!(err, SpliceError::Overlap { .. }));
}

struct ClipCounter;

impl SequenceRenderer for ClipCounter {
    type Output = usize;
    type Error = String;

    fn render(&self, snapshot: &ProjectSnapshot) -> Result<usize, String> {
        Ok(snapshot.clips.len())
    }
}

#[test]
fn export_hands_over_snapshot() {
    let (store, _) = one_track(&[2.0, 2.0]);
    assert_eq!(store.export_with(&ClipCounter).unwrap(), 2);

    let empty = TimelineStore::default();
    let err = empty.export_with(&ClipCounter).unwrap_err();
    assert!(matches!(err, SpliceError::NothingToExport));
    assert_eq!(err.kind(), ErrorKind::Collaborator);
}

#[test]
fn resolver_supplies_duration() {
    let (mut store, _) = one_track(&[2.0]);
    let library = vec![video("library.mp4", 7.5)];
    let id = library[0].id;

    let clip = store
        .import_resolved(library.as_slice(), id, "library.mp4", MediaKind::Video)
        .unwrap();
    assert_eq!(bounds(&store, clip), (2.0, 9.5));
}
