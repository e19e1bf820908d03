//! Property tests over random edit sequences.

use proptest::prelude::*;
use proptest::sample::Index;
use splice_interaction::{
    DragMode, InteractionController, TrackLayout, RULER_HEIGHT, TRACK_BLOCK_HEIGHT,
};
use splice_timeline::{
    ClipPatch, MediaKind, MediaReference, Placement, PlacementPolicy, ProjectFile,
    ProjectSnapshot, TimelineConfig, TimelineState, TimelineStore, TrackAllocation,
};

#[derive(Debug, Clone)]
enum Op {
    Import { secs: f64, audio: bool },
    Resize { clip: Index, end_delta: f64 },
    Reposition { clip: Index, start: f64 },
    MoveToTrack { clip: Index, track: Index, start: f64 },
    Delete { clip: Index },
    Duplicate { clip: Index },
    Split { time: f64 },
    Mute { clip: Index },
    Seek { time: f64 },
    Drag { clip: Index, mode: u8, dx: f64, row: Index },
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.1f64..20.0, any::<bool>()).prop_map(|(secs, audio)| Op::Import { secs, audio }),
        (any::<Index>(), -5.0f64..5.0)
            .prop_map(|(clip, end_delta)| Op::Resize { clip, end_delta }),
        (any::<Index>(), 0.0f64..60.0).prop_map(|(clip, start)| Op::Reposition { clip, start }),
        (any::<Index>(), any::<Index>(), 0.0f64..60.0)
            .prop_map(|(clip, track, start)| Op::MoveToTrack { clip, track, start }),
        (any::<Index>(), any::<bool>()).prop_map(|(clip, delete)| if delete {
            Op::Delete { clip }
        } else {
            Op::Mute { clip }
        }),
        any::<Index>().prop_map(|clip| Op::Duplicate { clip }),
        (0.0f64..60.0).prop_map(|time| Op::Split { time }),
        (-5.0f64..80.0).prop_map(|time| Op::Seek { time }),
        (any::<Index>(), 0u8..3, -2000.0f64..2000.0, any::<Index>())
            .prop_map(|(clip, mode, dx, row)| Op::Drag { clip, mode, dx, row }),
        any::<bool>().prop_map(|undo| if undo { Op::Undo } else { Op::Redo }),
    ]
}

fn config(reuse_tracks: bool) -> TimelineConfig {
    let track = if reuse_tracks {
        TrackAllocation::ReuseFirstOfKind
    } else {
        TrackAllocation::NewTrackPerImport
    };
    TimelineConfig {
        placement: PlacementPolicy {
            track,
            position: Placement::GlobalTail,
        },
        ..TimelineConfig::default()
    }
}

/// Apply one op. Rejected edits are expected; they must leave the state
/// untouched, which the invariant checks cover.
fn run(store: &mut TimelineStore, ctl: &mut InteractionController, op: &Op) {
    let clip_id = |store: &TimelineStore, index: &Index| {
        let clips = store.state().clips();
        (!clips.is_empty()).then(|| clips[index.index(clips.len())].id)
    };

    match op {
        Op::Import { secs, audio } => {
            let kind = if *audio { MediaKind::Audio } else { MediaKind::Video };
            let _ = store.import_media(MediaReference::new("gen", kind, *secs));
        }
        Op::Resize { clip, end_delta } => {
            if let Some(id) = clip_id(store, clip) {
                let end = store.state().clip(id).map_or(0.0, |c| c.end_time) + end_delta;
                let _ = store.update_clip_props(id, ClipPatch::end(end));
            }
        }
        Op::Reposition { clip, start } => {
            if let Some(id) = clip_id(store, clip) {
                let duration = store.state().clip(id).map_or(1.0, |c| c.duration());
                let _ = store.update_clip_props(id, ClipPatch::bounds(*start, start + duration));
            }
        }
        Op::MoveToTrack { clip, track, start } => {
            let tracks = store.state().tracks();
            if let (Some(id), false) = (clip_id(store, clip), tracks.is_empty()) {
                let track_id = tracks[track.index(tracks.len())].id;
                let _ = store.move_clip_to_track(id, track_id, *start);
            }
        }
        Op::Delete { clip } => {
            if let Some(id) = clip_id(store, clip) {
                let _ = store.delete_clip(id);
            }
        }
        Op::Duplicate { clip } => {
            if let Some(id) = clip_id(store, clip) {
                let _ = store.duplicate_clip(id);
            }
        }
        Op::Split { time } => {
            let _ = store.split_clip_at_time(*time);
        }
        Op::Mute { clip } => {
            if let Some(id) = clip_id(store, clip) {
                let _ = store.toggle_clip_mute(id);
            }
        }
        Op::Seek { time } => {
            store.set_current_time(*time);
        }
        Op::Drag { clip, mode, dx, row } => {
            if let Some(id) = clip_id(store, clip) {
                let mode = match mode {
                    0 => DragMode::Move,
                    1 => DragMode::TrimStart,
                    _ => DragMode::TrimEnd,
                };
                let rows = store.state().tracks().len() + 1;
                let y = RULER_HEIGHT + (row.index(rows) as f64 + 0.5) * TRACK_BLOCK_HEIGHT;
                ctl.pointer_down(store, id, mode, 500.0);
                let _ = ctl.pointer_move(store, 500.0 + dx / 2.0);
                let _ = ctl.pointer_move(store, 500.0 + dx);
                let _ = ctl.pointer_up(store, &TrackLayout::default(), 500.0 + dx, y);
            }
        }
        Op::Undo => {
            store.undo();
        }
        Op::Redo => {
            store.redo();
        }
    }
}

fn assert_invariants(state: &TimelineState) -> Result<(), TestCaseError> {
    for track in state.tracks() {
        prop_assert!(state.check_track(track.id).is_ok(), "overlap on {}", track.id);
    }
    let max_end = state.clips().iter().map(|c| c.end_time).fold(0.0, f64::max);
    if state.clips().is_empty() {
        prop_assert_eq!(state.duration(), 0.0);
    } else {
        prop_assert_eq!(state.duration(), max_end);
    }
    prop_assert!(state.current_time() >= 0.0 && state.current_time() <= state.duration());
    for clip in state.clips() {
        prop_assert!(clip.start_time >= 0.0);
        prop_assert!(clip.duration() >= 0.1 - 1e-9);
        prop_assert!(state.media_ref(clip.media_id).is_some());
        prop_assert!(state.track(clip.track_id).is_some());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    /// Property: no two clips on a track overlap and the duration matches the
    /// clip set after any sequence of edits and gestures.
    #[test]
    fn prop_invariants_hold(
        reuse_tracks in any::<bool>(),
        ops in prop::collection::vec(op(), 1..40)
    ) {
        let mut store = TimelineStore::new(config(reuse_tracks)).unwrap();
        let mut ctl = InteractionController::new();
        for op in &ops {
            run(&mut store, &mut ctl, op);
            assert_invariants(store.state())?;
        }
    }

    /// Property: any reachable timeline survives a save and load unchanged.
    #[test]
    fn prop_snapshot_round_trip(
        ops in prop::collection::vec(op(), 1..30)
    ) {
        let config = config(true);
        let mut store = TimelineStore::new(config.clone()).unwrap();
        let mut ctl = InteractionController::new();
        for op in &ops {
            run(&mut store, &mut ctl, op);
        }

        let json = ProjectFile::new(store.export_snapshot()).to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();
        let restored = TimelineStore::from_snapshot(loaded.project, config.clone()).unwrap();
        prop_assert_eq!(restored.state().clips(), store.state().clips());
        prop_assert_eq!(restored.state().tracks(), store.state().tracks());
        prop_assert_eq!(restored.state().media(), store.state().media());

        let token = store.export_snapshot().to_share_token().unwrap();
        let shared = TimelineStore::from_snapshot(
            ProjectSnapshot::from_share_token(&token).unwrap(),
            config,
        )
        .unwrap();
        prop_assert_eq!(shared.state().duration(), store.state().duration());
    }
}
