//! Command implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use splice_timeline::{
    PlaybackDriver, ProjectFile, ProjectSnapshot, TimelineConfig, TimelineStore,
};
use tracing::info;

/// How often `play` reports the cursor.
const REPORT_INTERVAL: Duration = Duration::from_millis(250);

fn load_store(path: &Path, config: TimelineConfig) -> Result<TimelineStore> {
    let file = ProjectFile::load_from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let store = TimelineStore::from_snapshot(file.project, config)
        .with_context(|| format!("{} is not a valid timeline", path.display()))?;
    Ok(store)
}

fn save_store(store: &TimelineStore, path: &Path) -> Result<()> {
    ProjectFile::new(store.export_snapshot())
        .save_to_file(path)
        .with_context(|| format!("failed to save {}", path.display()))
}

pub fn inspect(path: &Path, config: TimelineConfig) -> Result<()> {
    let store = load_store(path, config)?;
    let state = store.state();

    println!("duration: {:.3}s", state.duration());
    println!("media:    {}", state.media().len());
    for (row, track) in state.tracks().iter().enumerate() {
        let clips = state.track_clips(track.id);
        println!("track {row} ({:?}, {} clips) {}", track.kind, clips.len(), track.id);
        for clip in clips {
            let name = state
                .media_ref(clip.media_id)
                .map_or("?", |m| m.name.as_str());
            let muted = if clip.muted { " muted" } else { "" };
            println!(
                "  [{:>8.3}, {:>8.3}) {name}{muted}",
                clip.start_time, clip.end_time
            );
        }
    }
    Ok(())
}

pub fn split(path: &Path, time: f64, config: TimelineConfig) -> Result<()> {
    let mut store = load_store(path, config)?;
    let before = store.state().clips().len();
    if !store.split_clip_at_time(time)? {
        println!("no clip spans {time:.3}s");
        return Ok(());
    }
    save_store(&store, path)?;
    println!(
        "split {} clip(s) at {time:.3}s",
        store.state().clips().len() - before
    );
    Ok(())
}

pub fn share(path: &Path, config: TimelineConfig) -> Result<()> {
    let store = load_store(path, config)?;
    let token = store.export_snapshot().to_share_token()?;
    println!("{token}");
    Ok(())
}

pub fn unshare(token: &str, path: &Path, config: TimelineConfig) -> Result<()> {
    let snapshot = ProjectSnapshot::from_share_token(token)?;
    let store = TimelineStore::from_snapshot(snapshot, config)
        .context("share token does not describe a valid timeline")?;
    save_store(&store, path)?;
    info!(path = %path.display(), clips = store.state().clips().len(), "wrote shared project");
    Ok(())
}

/// Play from the start for `seconds` (or to the end) and report the cursor.
pub fn play(path: &Path, seconds: Option<f64>, config: TimelineConfig) -> Result<()> {
    let store = load_store(path, config)?;
    let limit = seconds.map(Duration::from_secs_f64);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async move {
        let store = Arc::new(Mutex::new(store));
        let mut driver = PlaybackDriver::new(Arc::clone(&store));
        driver.play();

        let started = tokio::time::Instant::now();
        let mut report = tokio::time::interval(REPORT_INTERVAL);
        loop {
            report.tick().await;
            let (at, playing) = {
                let guard = store.lock();
                (guard.state().current_time(), guard.is_playing())
            };
            println!("{at:>8.3}s");
            if !playing || limit.is_some_and(|l| started.elapsed() >= l) {
                break;
            }
        }
        driver.pause();
    });
    Ok(())
}
