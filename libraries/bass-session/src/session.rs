//! Session actor
//!
//! One task exclusively owns the playback controller, the presentation
//! controller and the paywall. Callers talk to it through a
//! [`SessionHandle`]; collaborator work (entitlement checks, purchases,
//! artwork loads, imports, deletions) runs in spawned tasks whose results
//! come back through an internal channel before any state is touched.

use crate::config::{BassConfig, LinkSettings};
use crate::error::{Result, SessionError};
use crate::paywall::{Alert, Paywall};
use bass_core::{
    BassError, BlobStore, EntitlementProvider, LocationRef, LocationResolver, NowPlayingSurface,
    PurchaseOutcome, RestoreOutcome, Track, TrackId, TrackStore,
};
use bass_importer::{ImportFailure, ImportSummary, SecurityScope, TrackImporter};
use bass_playback::{
    AudioGraph, Clock, EffectChannel, PlaybackController, PlaybackEvent, PlaybackSnapshot,
    PlaybackState, RepeatMode, SegmentId,
};
use bass_presentation::{PresentationController, PresentationEvent, PresentationState};
use bass_storage::Library;
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

const COMMAND_CAPACITY: usize = 64;
const EVENT_CAPACITY: usize = 256;
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

// ===== Messages =====

/// Commands accepted by the session
#[derive(Debug)]
pub enum SessionCommand {
    // Transport
    TogglePlayback {
        track: Track,
        playlist: Option<Vec<Track>>,
    },
    Pause,
    Play,
    Seek(f64),
    Next,
    Previous,
    Stop,
    /// The platform graph finished playing a segment
    SegmentFinished(SegmentId),

    // Effects (gated by the paywall)
    UpdateEffect {
        channel: EffectChannel,
        value: f32,
    },
    SetEffectEnabled {
        channel: EffectChannel,
        enabled: bool,
    },

    SetRepeatMode(RepeatMode),
    CycleRepeatMode,

    // Presentation
    Present,
    Dismiss,
    Minimize,
    Expand,
    ToggleExpansion,
    DragChanged(f32),
    DragEnded(f32),
    KeyboardWillShow,
    KeyboardWillHide,
    SetVisible(bool),

    // Store
    RefreshEntitlement,
    Purchase,
    Restore,

    // Library
    Import(Vec<PathBuf>),
    DeleteTrack(TrackId),

    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Events broadcast to every subscriber
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    Playback(PlaybackEvent),
    Presentation(PresentationEvent),
    /// An effect control was used without an entitlement
    PaywallRequired,
    EntitlementChanged {
        entitled: bool,
    },
    Alert(Alert),
    ImportFinished {
        imported: Vec<Track>,
        failed: Vec<ImportFailure>,
    },
    TrackDeleted {
        track_id: TrackId,
    },
}

/// Read-only view of the whole session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub playback: PlaybackSnapshot,
    pub presentation: PresentationState,
    pub entitled: bool,
}

/// Results of spawned collaborator work
enum Internal {
    Entitlement(bass_core::Result<bool>),
    Purchase(bass_core::Result<PurchaseOutcome>),
    Restore(bass_core::Result<RestoreOutcome>),
    Artwork {
        track_id: TrackId,
        result: bass_core::Result<Vec<u8>>,
    },
    Imported(ImportSummary),
    Deleted {
        track_id: TrackId,
        removed: Option<Track>,
    },
}

// ===== Handle =====

/// Cheap, cloneable handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
    presentation: watch::Receiver<PresentationState>,
    links: Arc<LinkSettings>,
}

impl SessionHandle {
    /// Send a command to the session
    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Subscribe to session events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Observable presentation state
    pub fn presentation(&self) -> watch::Receiver<PresentationState> {
        self.presentation.clone()
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(SessionCommand::Snapshot(reply)).await?;
        response.await.map_err(|_| SessionError::Closed)
    }

    /// Outbound links for the settings screen
    pub fn links(&self) -> &LinkSettings {
        &self.links
    }

    /// Stop the session; playback is stopped before the task exits
    pub async fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown).await
    }
}

// ===== Session =====

/// Platform and storage collaborators of a session
pub struct SessionParts {
    pub graph: Box<dyn AudioGraph>,
    pub resolver: Arc<dyn LocationResolver>,
    pub clock: Arc<dyn Clock>,
    pub surface: Box<dyn NowPlayingSurface>,
    pub tracks: Arc<dyn TrackStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub entitlement: Arc<dyn EntitlementProvider>,
    pub scope: Arc<dyn SecurityScope>,
}

pub struct Session {
    playback: PlaybackController,
    presentation: PresentationController,
    paywall: Paywall,
    store_busy: bool,

    tracks: Arc<dyn TrackStore>,
    blobs: Arc<dyn BlobStore>,
    entitlement: Arc<dyn EntitlementProvider>,
    library: Library,
    importer: Arc<TrackImporter>,

    product_id: String,
    tick_interval: Duration,

    events: broadcast::Sender<SessionEvent>,
    internal: mpsc::UnboundedSender<Internal>,
}

impl Session {
    /// Start the session task
    ///
    /// Must be called from within a tokio runtime. The engine is started
    /// and the entitlement is checked immediately.
    pub fn spawn(config: &BassConfig, parts: SessionParts) -> (SessionHandle, JoinHandle<()>) {
        let playback = PlaybackController::new(
            parts.graph,
            parts.resolver,
            parts.clock,
            parts.surface,
            &config.playback,
        );
        let presentation = PresentationController::new(config.presentation.clone());
        let presentation_rx = presentation.subscribe();

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let library = Library::new(parts.tracks.clone(), parts.blobs.clone());
        let importer = Arc::new(TrackImporter::new(
            parts.tracks.clone(),
            parts.blobs.clone(),
            parts.scope,
        ));

        let session = Self {
            playback,
            presentation,
            paywall: Paywall::new(config.paywall.gate_effects),
            store_busy: false,
            tracks: parts.tracks,
            blobs: parts.blobs,
            entitlement: parts.entitlement,
            library,
            importer,
            product_id: config.paywall.product_id.clone(),
            tick_interval: Self::tick_interval(config),
            events: events.clone(),
            internal: internal_tx,
        };

        let task = tokio::spawn(session.run(command_rx, internal_rx));
        let handle = SessionHandle {
            commands: command_tx,
            events,
            presentation: presentation_rx,
            links: Arc::new(config.links.clone()),
        };
        (handle, task)
    }

    fn tick_interval(config: &BassConfig) -> Duration {
        let requested = config.playback.tick_interval();
        if requested < MIN_TICK_INTERVAL {
            warn!(
                tick_interval_ms = config.playback.tick_interval_ms,
                "Tick interval too short, using 1 ms"
            );
            return MIN_TICK_INTERVAL;
        }
        requested
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
    ) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Session started");
        self.refresh_entitlement();
        self.dispatch(&mut ticker);

        loop {
            let playing = self.playback.state() == PlaybackState::Playing;

            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(message) = internal.recv() => self.handle_internal(message),
                _ = ticker.tick(), if playing => {
                    self.playback.tick();
                }
            }

            self.dispatch(&mut ticker);
        }

        self.playback.stop();
        self.dispatch(&mut ticker);
        info!("Session stopped");
    }

    // ===== Commands =====

    fn handle_command(&mut self, command: SessionCommand) {
        trace!(?command, "Session command");

        let result = match command {
            SessionCommand::TogglePlayback { track, playlist } => {
                self.playback.toggle_playback(track, playlist)
            }
            SessionCommand::Pause => {
                self.playback.pause_track();
                Ok(())
            }
            SessionCommand::Play => self.playback.play_track(),
            SessionCommand::Seek(seconds) => self.playback.seek(seconds),
            SessionCommand::Next => self.playback.next_track(),
            SessionCommand::Previous => self.playback.previous_track(),
            SessionCommand::Stop => {
                self.playback.stop();
                Ok(())
            }
            SessionCommand::SegmentFinished(segment) => self.playback.segment_finished(segment),

            SessionCommand::UpdateEffect { channel, value } => {
                if self.effects_allowed() {
                    self.playback.update_effect(channel, value);
                }
                Ok(())
            }
            SessionCommand::SetEffectEnabled { channel, enabled } => {
                if self.effects_allowed() {
                    self.playback.set_effect_enabled(channel, enabled);
                }
                Ok(())
            }
            SessionCommand::SetRepeatMode(mode) => {
                self.playback.set_repeat_mode(mode);
                Ok(())
            }
            SessionCommand::CycleRepeatMode => {
                self.playback.cycle_repeat_mode();
                Ok(())
            }

            SessionCommand::Present => {
                self.presentation.present();
                Ok(())
            }
            SessionCommand::Dismiss => {
                self.presentation.dismiss();
                Ok(())
            }
            SessionCommand::Minimize => {
                self.presentation.minimize();
                Ok(())
            }
            SessionCommand::Expand => {
                self.presentation.expand();
                Ok(())
            }
            SessionCommand::ToggleExpansion => {
                self.presentation.toggle_expansion_state();
                Ok(())
            }
            SessionCommand::DragChanged(translation) => {
                self.presentation.drag_changed(translation);
                Ok(())
            }
            SessionCommand::DragEnded(translation) => {
                self.presentation.drag_ended(translation);
                Ok(())
            }
            SessionCommand::KeyboardWillShow => {
                self.presentation.keyboard_will_show();
                Ok(())
            }
            SessionCommand::KeyboardWillHide => {
                self.presentation.keyboard_will_hide();
                Ok(())
            }
            SessionCommand::SetVisible(visible) => {
                self.presentation.set_visible(visible);
                Ok(())
            }

            SessionCommand::RefreshEntitlement => {
                self.refresh_entitlement();
                Ok(())
            }
            SessionCommand::Purchase => {
                self.purchase();
                Ok(())
            }
            SessionCommand::Restore => {
                self.restore();
                Ok(())
            }

            SessionCommand::Import(paths) => {
                let importer = self.importer.clone();
                self.spawn_task(async move {
                    let summary = importer.import(paths).await;
                    Internal::Imported(summary)
                });
                Ok(())
            }
            SessionCommand::DeleteTrack(track_id) => {
                let library = self.library.clone();
                self.spawn_task(async move {
                    let removed = library.delete_track(&track_id).await;
                    Internal::Deleted { track_id, removed }
                });
                Ok(())
            }

            SessionCommand::Snapshot(reply) => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("Snapshot requester went away");
                }
                Ok(())
            }
            SessionCommand::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            debug!(error = %e, "Playback command rejected");
        }
    }

    fn effects_allowed(&mut self) -> bool {
        if self.paywall.allows_effects() {
            return true;
        }
        debug!("Effect change blocked by paywall");
        self.publish(SessionEvent::PaywallRequired);
        false
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            playback: self.playback.snapshot(),
            presentation: self.presentation.state(),
            entitled: self.paywall.is_entitled(),
        }
    }

    // ===== Store =====

    fn refresh_entitlement(&self) {
        let entitlement = self.entitlement.clone();
        self.spawn_task(async move {
            Internal::Entitlement(entitlement.has_active_entitlement().await)
        });
    }

    fn purchase(&mut self) {
        if self.store_busy {
            debug!("Store request already in flight, ignoring purchase");
            return;
        }
        self.store_busy = true;

        let entitlement = self.entitlement.clone();
        let product_id = self.product_id.clone();
        info!(product_id = %product_id, "Starting purchase");
        self.spawn_task(async move {
            let result = entitlement.purchase(&product_id).await;
            Internal::Purchase(result)
        });
    }

    fn restore(&mut self) {
        if self.store_busy {
            debug!("Store request already in flight, ignoring restore");
            return;
        }
        self.store_busy = true;

        let entitlement = self.entitlement.clone();
        info!("Restoring purchases");
        self.spawn_task(async move { Internal::Restore(entitlement.restore().await) });
    }

    fn set_entitled(&mut self, entitled: bool) {
        if self.paywall.set_entitled(entitled) {
            info!(entitled, "Entitlement changed");
            self.publish(SessionEvent::EntitlementChanged { entitled });
        }
    }

    // ===== Collaborator results =====

    fn handle_internal(&mut self, message: Internal) {
        match message {
            Internal::Entitlement(Ok(entitled)) => self.set_entitled(entitled),
            Internal::Entitlement(Err(e)) => {
                warn!(error = %e, "Entitlement check failed");
            }

            Internal::Purchase(result) => {
                self.store_busy = false;
                let alert = match result {
                    Ok(outcome) => {
                        if outcome == PurchaseOutcome::Purchased {
                            self.set_entitled(true);
                        }
                        Alert::for_purchase(&outcome)
                    }
                    Err(e) => {
                        warn!(error = %e, "Purchase failed");
                        Some(Alert::purchase_failed(&e.to_string()))
                    }
                };
                if let Some(alert) = alert {
                    self.publish(SessionEvent::Alert(alert));
                }
            }

            Internal::Restore(result) => {
                self.store_busy = false;
                let alert = match result {
                    Ok(outcome) => {
                        if outcome == RestoreOutcome::Restored {
                            self.set_entitled(true);
                        }
                        Alert::for_restore(&outcome)
                    }
                    Err(e) => {
                        warn!(error = %e, "Restore failed");
                        Alert::restore_failed(&e.to_string())
                    }
                };
                self.publish(SessionEvent::Alert(alert));
            }

            Internal::Artwork { track_id, result } => match result {
                Ok(bytes) => self.playback.set_artwork(&track_id, Arc::from(bytes)),
                Err(e) => warn!(track_id = %track_id, error = %e, "Failed to load artwork"),
            },

            Internal::Imported(summary) => {
                self.publish(SessionEvent::ImportFinished {
                    imported: summary.imported,
                    failed: summary.failed,
                });
            }

            Internal::Deleted { track_id, removed } => {
                if removed.is_none() {
                    return;
                }
                self.playback.remove_from_playlist(&track_id);
                let selected = self
                    .playback
                    .current_track()
                    .is_some_and(|track| track.id == track_id);
                if selected {
                    debug!(track_id = %track_id, "Stopping deleted track");
                    self.playback.stop();
                }
                self.publish(SessionEvent::TrackDeleted { track_id });
            }
        }
    }

    // ===== Event dispatch =====

    /// Apply cross-controller side effects and broadcast queued events
    fn dispatch(&mut self, ticker: &mut Interval) {
        for event in self.playback.drain_events() {
            match &event {
                PlaybackEvent::PresentationRequested => self.presentation.present(),
                PlaybackEvent::TrackChanged { track_id, .. } => {
                    ticker.reset();
                    self.load_artwork(track_id);
                }
                PlaybackEvent::LocationRefreshed { track_id, location } => {
                    self.persist_location(track_id.clone(), location.clone());
                }
                _ => {}
            }
            self.publish(SessionEvent::Playback(event));
        }

        for event in self.presentation.drain_events() {
            self.publish(SessionEvent::Presentation(event));
        }
    }

    fn load_artwork(&self, track_id: &TrackId) {
        let Some(artwork_id) = self
            .playback
            .current_track()
            .filter(|track| &track.id == track_id)
            .and_then(|track| track.artwork_id.clone())
        else {
            return;
        };

        let blobs = self.blobs.clone();
        let track_id = track_id.clone();
        self.spawn_task(async move {
            let result = blobs.load(&artwork_id).await;
            Internal::Artwork { track_id, result }
        });
    }

    fn persist_location(&self, track_id: TrackId, location: LocationRef) {
        let tracks = self.tracks.clone();
        tokio::spawn(async move {
            let result: bass_core::Result<()> = async {
                let mut track = tracks
                    .get(&track_id)
                    .await?
                    .ok_or_else(|| BassError::TrackNotFound(track_id.clone()))?;
                track.location = location;
                tracks.upsert(&track).await?;
                Ok(())
            }
            .await;

            match result {
                Ok(()) => debug!(track_id = %track_id, "Refreshed bookmark stored"),
                Err(e) => {
                    warn!(track_id = %track_id, error = %e, "Failed to store refreshed bookmark");
                }
            }
        });
    }

    fn publish(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            trace!("No session subscribers");
        }
    }

    fn spawn_task<F>(&self, task: F)
    where
        F: Future<Output = Internal> + Send + 'static,
    {
        let internal = self.internal.clone();
        tokio::spawn(async move {
            // The session may have shut down in the meantime
            let _ = internal.send(task.await);
        });
    }
}
