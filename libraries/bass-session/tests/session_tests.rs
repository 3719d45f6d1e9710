//! Integration tests for the session actor
//!
//! The audio graph, clock, resolver and now-playing surface are the
//! recording fakes from `bass_playback::testing`; tracks live in a real
//! SQLite file; the store is a mockall mock.

use async_trait::async_trait;
use bass_core::{
    CreateTrack, EntitlementProvider, LocationRef, PurchaseOutcome, RestoreOutcome, Track,
    TrackStore,
};
use bass_importer::NoopScope;
use bass_playback::testing::{
    sample_track, ManualClock, RecordingGraph, RecordingNowPlaying, StaticResolver,
    TEST_SAMPLE_RATE,
};
use bass_playback::{EffectChannel, PlaybackEvent, PlaybackState};
use bass_presentation::PresentationEvent;
use bass_session::{
    AlertKind, BassConfig, Session, SessionCommand, SessionEvent, SessionHandle, SessionParts,
};
use bass_storage::{FsBlobStore, SqliteTrackStore};
use mockall::mock;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

mock! {
    pub Store {}

    #[async_trait]
    impl EntitlementProvider for Store {
        async fn has_active_entitlement(&self) -> bass_core::Result<bool>;
        async fn purchase(&self, product_id: &str) -> bass_core::Result<PurchaseOutcome>;
        async fn restore(&self) -> bass_core::Result<RestoreOutcome>;
    }
}

const WAIT: Duration = Duration::from_secs(5);

// ===== Fixture =====

struct Fixture {
    session: SessionHandle,
    task: JoinHandle<()>,
    events: broadcast::Receiver<SessionEvent>,
    graph: RecordingGraph,
    clock: ManualClock,
    resolver: StaticResolver,
    tracks: Arc<SqliteTrackStore>,
    dir: TempDir,
}

/// A store that reports no entitlement and nothing else
fn unentitled_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_has_active_entitlement()
        .returning(|| Ok(false));
    store
}

async fn fixture_with(store: MockStore, config: BassConfig) -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", dir.path().join("test.db").display());
    let pool = bass_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    bass_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    let tracks = Arc::new(SqliteTrackStore::new(pool));
    let blobs = Arc::new(
        FsBlobStore::open(dir.path().join("blobs"))
            .await
            .expect("Failed to open blob store"),
    );

    let graph = RecordingGraph::new();
    let clock = ManualClock::new();
    let resolver = StaticResolver::new();

    let (session, task) = Session::spawn(
        &config,
        SessionParts {
            graph: Box::new(graph.clone()),
            resolver: Arc::new(resolver.clone()),
            clock: Arc::new(clock.clone()),
            surface: Box::new(RecordingNowPlaying::new()),
            tracks: tracks.clone(),
            blobs,
            entitlement: Arc::new(store),
            scope: Arc::new(NoopScope),
        },
    );
    let events = session.subscribe();

    Fixture {
        session,
        task,
        events,
        graph,
        clock,
        resolver,
        tracks,
        dir,
    }
}

async fn fixture() -> Fixture {
    fixture_with(unentitled_store(), BassConfig::default()).await
}

impl Fixture {
    async fn send(&self, command: SessionCommand) {
        self.session.send(command).await.expect("Session closed");
    }

    /// Wait for the first event matching `predicate`, skipping the rest
    async fn wait_for(&mut self, predicate: impl Fn(&SessionEvent) -> bool) -> SessionEvent {
        tokio::time::timeout(WAIT, async {
            loop {
                match self.events.recv().await {
                    Ok(event) if predicate(&event) => return event,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
                }
            }
        })
        .await
        .expect("Timed out waiting for event")
    }

    /// Register a playable track in the graph and the store
    async fn stored_track(&self, name: &str) -> Track {
        let location = LocationRef::for_path(format!("/music/{name}.mp3"));
        let track = self
            .tracks
            .create(CreateTrack::new(name, "Test Artist", 120.0, location))
            .await
            .unwrap();
        self.graph.add_track(&track);
        track
    }

    fn playable(&self, name: &str) -> Track {
        let track = sample_track(name, 120.0);
        self.graph.add_track(&track);
        track
    }
}

// ===== Transport and presentation =====

#[tokio::test]
async fn toggle_playback_presents_player() {
    let mut f = fixture().await;
    let track = f.playable("a");

    f.send(SessionCommand::TogglePlayback {
        track: track.clone(),
        playlist: None,
    })
    .await;

    f.wait_for(|e| *e == SessionEvent::Presentation(PresentationEvent::DidPresent))
        .await;
    let snapshot = f.session.snapshot().await.unwrap();
    assert_eq!(snapshot.playback.state, PlaybackState::Playing);
    assert_eq!(snapshot.playback.track.map(|t| t.id), Some(track.id));
    assert!(snapshot.presentation.is_presented);
    assert!(f.session.presentation().borrow().is_presented);
}

#[tokio::test]
async fn toggling_same_track_pauses() {
    let mut f = fixture().await;
    let track = f.playable("a");

    for _ in 0..2 {
        f.send(SessionCommand::TogglePlayback {
            track: track.clone(),
            playlist: None,
        })
        .await;
    }

    f.wait_for(|e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::StateChanged {
                state: PlaybackState::Paused
            })
        )
    })
    .await;
    assert_eq!(
        f.session.snapshot().await.unwrap().playback.state,
        PlaybackState::Paused
    );
}

#[tokio::test]
async fn drag_commands_drive_presentation() {
    let mut f = fixture().await;
    let state = f.session.presentation();

    f.send(SessionCommand::Present).await;
    f.send(SessionCommand::DragChanged(95.0)).await;
    f.send(SessionCommand::DragEnded(95.0)).await;

    f.wait_for(|e| *e == SessionEvent::Presentation(PresentationEvent::DidMinimize))
        .await;
    let current = *state.borrow();
    assert!(current.is_minimized);
    assert_eq!(current.offset, 0.0);
}

#[tokio::test]
async fn last_track_ending_in_once_mode_pauses_at_zero() {
    let mut f = fixture().await;
    let track = f.playable("only");

    f.send(SessionCommand::TogglePlayback {
        track: track.clone(),
        playlist: Some(vec![track]),
    })
    .await;
    f.wait_for(|e| matches!(e, SessionEvent::Playback(PlaybackEvent::TrackChanged { .. })))
        .await;

    let segment = f.graph.last_segment().expect("nothing scheduled");
    f.send(SessionCommand::SegmentFinished(segment.id)).await;

    f.wait_for(|e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::StateChanged {
                state: PlaybackState::Paused
            })
        )
    })
    .await;
    let snapshot = f.session.snapshot().await.unwrap();
    assert_eq!(snapshot.playback.position, Duration::ZERO);
}

#[tokio::test]
async fn tick_republishes_wall_clock_position() {
    let mut config = BassConfig::default();
    config.playback.tick_interval_ms = 10;
    let mut f = fixture_with(unentitled_store(), config).await;
    let track = f.playable("a");

    f.send(SessionCommand::TogglePlayback {
        track,
        playlist: None,
    })
    .await;
    f.wait_for(|e| matches!(e, SessionEvent::Playback(PlaybackEvent::TrackChanged { .. })))
        .await;
    f.clock.advance(Duration::from_secs(3));

    f.wait_for(|e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::PositionUpdate {
                position_ms: 3000,
                ..
            })
        )
    })
    .await;
}

// ===== Paywall =====

#[tokio::test]
async fn effects_require_entitlement() {
    let mut f = fixture().await;

    f.send(SessionCommand::UpdateEffect {
        channel: EffectChannel::Bass,
        value: 12.0,
    })
    .await;

    f.wait_for(|e| *e == SessionEvent::PaywallRequired).await;
    let snapshot = f.session.snapshot().await.unwrap();
    assert_eq!(snapshot.playback.effects.get(EffectChannel::Bass).value, 0.0);
    assert!(!snapshot.entitled);
}

#[tokio::test]
async fn ungated_effects_apply_without_entitlement() {
    let mut config = BassConfig::default();
    config.paywall.gate_effects = false;
    let mut f = fixture_with(unentitled_store(), config).await;

    f.send(SessionCommand::UpdateEffect {
        channel: EffectChannel::Bass,
        value: 12.0,
    })
    .await;

    f.wait_for(|e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::EffectChanged {
                channel: EffectChannel::Bass,
                ..
            })
        )
    })
    .await;
}

#[tokio::test]
async fn active_entitlement_unlocks_effects_at_startup() {
    let mut store = MockStore::new();
    store.expect_has_active_entitlement().returning(|| Ok(true));
    let mut f = fixture_with(store, BassConfig::default()).await;

    // The startup check may finish before the subscription
    let snapshot = tokio::time::timeout(WAIT, async {
        loop {
            let snapshot = f.session.snapshot().await.unwrap();
            if snapshot.entitled {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("entitlement never arrived");
    assert!(snapshot.entitled);

    f.send(SessionCommand::UpdateEffect {
        channel: EffectChannel::Speed,
        value: 1.5,
    })
    .await;
    f.wait_for(|e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::EffectChanged {
                channel: EffectChannel::Speed,
                ..
            })
        )
    })
    .await;
}

#[tokio::test]
async fn successful_purchase_unlocks_and_alerts() {
    let mut store = unentitled_store();
    store
        .expect_purchase()
        .times(1)
        .returning(|_| Ok(PurchaseOutcome::Purchased));
    let mut f = fixture_with(store, BassConfig::default()).await;

    f.send(SessionCommand::Purchase).await;

    f.wait_for(|e| *e == SessionEvent::EntitlementChanged { entitled: true })
        .await;
    let alert = f
        .wait_for(|e| matches!(e, SessionEvent::Alert(_)))
        .await;
    let SessionEvent::Alert(alert) = alert else {
        unreachable!()
    };
    assert_eq!(alert.title, "Purchase Successful");
    assert_eq!(alert.kind, AlertKind::Success);
    assert!(f.session.snapshot().await.unwrap().entitled);
}

#[tokio::test]
async fn purchase_error_shows_failure_alert() {
    let mut store = unentitled_store();
    store
        .expect_purchase()
        .returning(|_| Err(bass_core::BassError::purchase("network unreachable")));
    let mut f = fixture_with(store, BassConfig::default()).await;

    f.send(SessionCommand::Purchase).await;

    let event = f.wait_for(|e| matches!(e, SessionEvent::Alert(_))).await;
    let SessionEvent::Alert(alert) = event else {
        unreachable!()
    };
    assert_eq!(alert.title, "Purchase Failed");
    assert!(alert.message.contains("network unreachable"));
    assert!(!f.session.snapshot().await.unwrap().entitled);
}

#[tokio::test]
async fn restore_without_purchase_says_nothing_to_restore() {
    let mut store = unentitled_store();
    store
        .expect_restore()
        .returning(|| Ok(RestoreOutcome::NothingToRestore));
    let mut f = fixture_with(store, BassConfig::default()).await;

    f.send(SessionCommand::Restore).await;

    let event = f.wait_for(|e| matches!(e, SessionEvent::Alert(_))).await;
    let SessionEvent::Alert(alert) = event else {
        unreachable!()
    };
    assert_eq!(alert.title, "Nothing to Restore");
    assert_eq!(alert.kind, AlertKind::Info);
}

// ===== Library =====

#[tokio::test]
async fn relocated_bookmark_is_persisted() {
    let mut f = fixture().await;
    let track = f.stored_track("moved").await;
    f.resolver.relocate("/music/moved.mp3", "/relocated/moved.mp3");
    f.graph
        .add_file("/relocated/moved.mp3", TEST_SAMPLE_RATE, 120 * u64::from(TEST_SAMPLE_RATE));

    f.send(SessionCommand::TogglePlayback {
        track: track.clone(),
        playlist: None,
    })
    .await;
    f.wait_for(|e| matches!(e, SessionEvent::Playback(PlaybackEvent::LocationRefreshed { .. })))
        .await;

    let stored = tokio::time::timeout(WAIT, async {
        loop {
            let stored = f.tracks.get(&track.id).await.unwrap().unwrap();
            if stored.location != track.location {
                return stored;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("bookmark never persisted");

    let (path, _) = stored.location.decode().unwrap();
    assert_eq!(path, std::path::PathBuf::from("/relocated/moved.mp3"));
}

#[tokio::test]
async fn deleting_current_track_stops_playback() {
    let mut f = fixture().await;
    let track = f.stored_track("doomed").await;

    f.send(SessionCommand::TogglePlayback {
        track: track.clone(),
        playlist: None,
    })
    .await;
    f.send(SessionCommand::DeleteTrack(track.id.clone())).await;

    f.wait_for(|e| matches!(e, SessionEvent::TrackDeleted { .. }))
        .await;
    let snapshot = f.session.snapshot().await.unwrap();
    assert_eq!(snapshot.playback.state, PlaybackState::Stopped);
    assert!(snapshot.playback.track.is_none());
    assert!(f.tracks.get(&track.id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleted_playlist_entry_is_skipped() {
    let mut f = fixture().await;
    let a = f.stored_track("a").await;
    let b = f.stored_track("b").await;
    let c = f.stored_track("c").await;

    // Display order c, b, a
    f.send(SessionCommand::TogglePlayback {
        track: b.clone(),
        playlist: Some(vec![a.clone(), b.clone(), c.clone()]),
    })
    .await;
    f.send(SessionCommand::DeleteTrack(a.id.clone())).await;
    f.wait_for(|e| matches!(e, SessionEvent::TrackDeleted { .. }))
        .await;

    let snapshot = f.session.snapshot().await.unwrap();
    assert_eq!(snapshot.playback.playlist, vec![c.id.clone(), b.id.clone()]);
    assert_eq!(snapshot.playback.state, PlaybackState::Playing);

    f.send(SessionCommand::Next).await;
    let expected = c.id.clone();
    f.wait_for(move |e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::TrackChanged { track_id, .. })
                if *track_id == expected
        )
    })
    .await;
    assert_eq!(
        f.session.snapshot().await.unwrap().playback.state,
        PlaybackState::Playing
    );
}

#[tokio::test]
async fn import_reports_failures() {
    let mut f = fixture().await;
    let bogus = f.dir.path().join("notes.txt");
    std::fs::write(&bogus, b"not audio").unwrap();

    f.send(SessionCommand::Import(vec![bogus.clone()])).await;

    let event = f
        .wait_for(|e| matches!(e, SessionEvent::ImportFinished { .. }))
        .await;
    let SessionEvent::ImportFinished { imported, failed } = event else {
        unreachable!()
    };
    assert!(imported.is_empty());
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path, bogus);
}

// ===== Lifecycle =====

#[tokio::test]
async fn zero_tick_interval_still_ticks() {
    let mut config = BassConfig::default();
    config.playback.tick_interval_ms = 0;
    let mut f = fixture_with(unentitled_store(), config).await;
    let track = f.playable("a");

    f.send(SessionCommand::TogglePlayback {
        track,
        playlist: None,
    })
    .await;
    f.wait_for(|e| matches!(e, SessionEvent::Playback(PlaybackEvent::TrackChanged { .. })))
        .await;
    f.clock.advance(Duration::from_secs(1));

    f.wait_for(|e| {
        matches!(
            e,
            SessionEvent::Playback(PlaybackEvent::PositionUpdate {
                position_ms: 1000,
                ..
            })
        )
    })
    .await;
    assert!(!f.task.is_finished());
}

#[tokio::test]
async fn handle_exposes_configured_links() {
    let mut config = BassConfig::default();
    config.links.support_email = "help@bassbooster.test".to_string();
    let f = fixture_with(unentitled_store(), config).await;

    assert_eq!(f.session.links().support_email, "help@bassbooster.test");
}

#[tokio::test]
async fn shutdown_stops_the_task() {
    let f = fixture().await;

    f.session.shutdown().await.unwrap();
    tokio::time::timeout(WAIT, f.task)
        .await
        .expect("session did not stop")
        .unwrap();

    assert!(f.session.snapshot().await.is_err());
}
