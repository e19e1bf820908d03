//! Integration tests for pointer gestures.
//!
//! Drives splice-interaction against a real store and checks the committed
//! timeline.

use std::time::{Duration, Instant};

use splice_core::{snap_time, SNAP_THRESHOLD};
use splice_interaction::{
    DragMode, InteractionController, TrackLayout, RULER_HEIGHT, TRACK_BLOCK_HEIGHT,
};
use splice_timeline::{
    Clip, MediaKind, MediaReference, ProjectSnapshot, TimelineConfig, TimelineStore, Track,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

/// Two video tracks; clips given as (track index, start, end).
fn layout(clips: &[(usize, f64, f64)]) -> (TimelineStore, Vec<Uuid>) {
    let media = MediaReference::new("source.mp4", MediaKind::Video, 600.0);
    let tracks = vec![Track::new_video(), Track::new_video()];
    let clips: Vec<Clip> = clips
        .iter()
        .map(|&(t, s, e)| Clip::new(media.id, tracks[t].id, s, e))
        .collect();
    let ids = clips.iter().map(|c| c.id).collect();
    let snapshot = ProjectSnapshot {
        clips,
        tracks,
        media_files: vec![media],
    };
    let store = TimelineStore::from_snapshot(snapshot, TimelineConfig::default()).unwrap();
    (store, ids)
}

fn bounds(store: &TimelineStore, id: Uuid) -> (f64, f64) {
    let clip = store.state().clip(id).unwrap();
    (clip.start_time, clip.end_time)
}

/// y coordinate in the middle of a track row.
fn row_y(row: usize) -> f64 {
    RULER_HEIGHT + (row as f64 + 0.5) * TRACK_BLOCK_HEIGHT
}

// ── Snapping ───────────────────────────────────────────────────

#[test]
fn snap_rule_matches_threshold() {
    assert_eq!(snap_time(4.9, &[5.0], SNAP_THRESHOLD), 5.0);
    assert_eq!(snap_time(4.5, &[5.0], SNAP_THRESHOLD), 4.5);
}

#[test]
fn drag_start_snaps_to_playhead() {
    let (mut store, ids) = layout(&[(0, 1.0, 2.0), (0, 20.0, 21.0)]);
    store.set_current_time(5.0);
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[0], DragMode::Move, 0.0);
    ctl.pointer_move(&mut store, 390.0).unwrap();
    assert_eq!(bounds(&store, ids[0]), (5.0, 6.0));

    ctl.pointer_move(&mut store, 350.0).unwrap();
    let (start, end) = bounds(&store, ids[0]);
    assert!((start - 4.5).abs() < 1e-9);
    assert!((end - 5.5).abs() < 1e-9);
}

#[test]
fn trim_end_snaps_to_neighbor_boundary() {
    let (mut store, ids) = layout(&[(0, 0.0, 3.0), (0, 5.0, 8.0)]);
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[0], DragMode::TrimEnd, 300.0);
    ctl.pointer_move(&mut store, 490.0).unwrap();
    assert_eq!(bounds(&store, ids[0]), (0.0, 5.0));
    // Ripple carries the next clip along by the same amount
    assert_eq!(bounds(&store, ids[1]), (7.0, 10.0));
}

// ── Gesture commits ────────────────────────────────────────────

#[test]
fn trim_start_stops_at_previous_clip() {
    let (mut store, ids) = layout(&[(0, 0.0, 2.0), (0, 4.0, 8.0)]);
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[1], DragMode::TrimStart, 400.0);
    ctl.pointer_move(&mut store, 0.0).unwrap();
    ctl.pointer_up(&mut store, &TrackLayout::default(), 0.0, row_y(0))
        .unwrap();

    assert_eq!(bounds(&store, ids[1]), (2.0, 8.0));
    assert!(!ctl.is_dragging());
}

#[test]
fn zoom_changes_pointer_distance() {
    let (mut store, ids) = layout(&[(0, 0.0, 2.0)]);
    store.set_zoom_level(4.0);
    let scale = store.config().time_scale(store.state().zoom_level());
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[0], DragMode::Move, 0.0);
    ctl.pointer_move(&mut store, scale.time_to_pixels(3.0)).unwrap();
    let (start, _) = bounds(&store, ids[0]);
    assert!((start - 3.0).abs() < 1e-9);
}

#[test]
fn drop_on_second_row_moves_between_tracks() {
    let (mut store, ids) = layout(&[(0, 0.0, 2.0), (1, 0.0, 3.0), (1, 6.0, 9.0)]);
    let target = store.state().tracks()[1].id;
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[0], DragMode::Move, 0.0);
    ctl.pointer_move(&mut store, 320.0).unwrap();
    assert!(ctl
        .pointer_up(&mut store, &TrackLayout::default(), 320.0, row_y(1))
        .unwrap());

    let clip = store.state().clip(ids[0]).unwrap();
    assert_eq!(clip.track_id, target);
    // Requested 3.2 fits the [3, 6) gap
    assert!((clip.start_time - 3.2).abs() < 1e-9);
    assert!(store.state().check_track(target).is_ok());
}

#[test]
fn drop_over_ruler_stays_on_track() {
    let (mut store, ids) = layout(&[(0, 0.0, 2.0)]);
    let source = store.state().tracks()[0].id;
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[0], DragMode::Move, 0.0);
    ctl.pointer_up(&mut store, &TrackLayout::default(), 100.0, 5.0)
        .unwrap();

    let clip = store.state().clip(ids[0]).unwrap();
    assert_eq!(clip.track_id, source);
    assert_eq!((clip.start_time, clip.end_time), (1.0, 3.0));
}

#[test]
fn gesture_edits_can_be_undone() {
    let (mut store, ids) = layout(&[(0, 0.0, 2.0)]);
    let mut ctl = InteractionController::new();

    ctl.pointer_down(&mut store, ids[0], DragMode::Move, 0.0);
    ctl.pointer_move(&mut store, 100.0).unwrap();
    ctl.pointer_move(&mut store, 200.0).unwrap();
    ctl.pointer_up(&mut store, &TrackLayout::default(), 200.0, row_y(0))
        .unwrap();
    assert_eq!(bounds(&store, ids[0]), (2.0, 4.0));

    while store.undo() {}
    assert_eq!(bounds(&store, ids[0]), (0.0, 2.0));
    // Selection is view state and survives undo
    assert_eq!(store.state().selected_clip_id(), Some(ids[0]));
}

// ── Playhead ───────────────────────────────────────────────────

#[test]
fn click_to_seek_keeps_playing() {
    let (mut store, _) = layout(&[(0, 0.0, 30.0)]);
    store.set_zoom_level(0.5);
    let t0 = Instant::now();
    let ticket = store.play(t0).unwrap();
    let mut ctl = InteractionController::new();

    // (250 + 250) px at 50 px/s
    assert!(ctl.seek_at(&mut store, 250.0, 250.0));
    assert!((store.state().current_time() - 10.0).abs() < 1e-9);
    assert!(store.is_playing());

    store.advance(ticket, t0 + Duration::from_millis(500));
    assert!((store.state().current_time() - 10.5).abs() < 1e-9);
}

#[test]
fn scrub_while_paused_stays_paused() {
    let (mut store, _) = layout(&[(0, 0.0, 30.0)]);
    store.set_zoom_level(2.0);
    let mut ctl = InteractionController::new();

    ctl.scrub_down(&mut store, 0.0, 0.0);
    ctl.pointer_move(&mut store, 1000.0).unwrap();
    assert!((store.state().current_time() - 5.0).abs() < 1e-9);
    ctl.pointer_up(&mut store, &TrackLayout::default(), 1000.0, row_y(0))
        .unwrap();

    assert!(!store.is_playing());
    assert!(!ctl.is_scrubbing());
    assert!((store.state().current_time() - 5.0).abs() < 1e-9);
}
