//! Playback controller - core orchestration
//!
//! Owns the audio graph, the selected track, the playlist context, the
//! repeat mode and the effect parameters. Every mutation goes through a
//! method here and is reported as a [`PlaybackEvent`].

use crate::{
    clock::{Clock, PositionClock},
    effects::{EffectChannel, EffectParameters},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    graph::{AudioFileInfo, AudioGraph, Segment, SegmentId},
    now_playing::NowPlaying,
    playlist::Playlist,
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackState, RepeatMode},
};
use bass_core::{LocationResolver, NowPlayingSurface, Resolution, Track, TrackId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// The selected track and the file opened for it
struct LoadedTrack {
    track: Track,
    file: AudioFileInfo,
}

impl LoadedTrack {
    /// Seek domain upper bound in seconds
    ///
    /// The stored metadata duration wins; the file length covers tracks
    /// imported without one.
    fn duration_seconds(&self) -> f64 {
        let stored = self.track.duration_seconds;
        if stored.is_finite() && stored > 0.0 {
            stored
        } else {
            self.file.duration().as_secs_f64()
        }
    }

    fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds())
    }

    fn frame_at(&self, position: Duration) -> u64 {
        (position.as_secs_f64() * f64::from(self.file.sample_rate)).round() as u64
    }
}

/// Playback engine controller
///
/// Single-owner state machine: wrap it in an actor (see `bass-session`) to
/// use it from several tasks.
pub struct PlaybackController {
    graph: Box<dyn AudioGraph>,
    resolver: Arc<dyn LocationResolver>,
    clock: Arc<dyn Clock>,
    now_playing: NowPlaying,

    // False when the engine failed to start; transport is then inert
    engine_ready: bool,

    state: PlaybackState,
    loaded: Option<LoadedTrack>,
    playlist: Playlist,
    repeat_mode: RepeatMode,
    effects: EffectParameters,
    position: PositionClock,

    // Last issued segment id and the one still expected to complete
    last_segment: SegmentId,
    active_segment: Option<SegmentId>,

    // Event queue for the owner
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller and start the engine
    ///
    /// An engine start failure is logged and leaves the controller in a
    /// degraded state where transport operations return
    /// [`PlaybackError::EngineUnavailable`].
    pub fn new(
        graph: Box<dyn AudioGraph>,
        resolver: Arc<dyn LocationResolver>,
        clock: Arc<dyn Clock>,
        surface: Box<dyn NowPlayingSurface>,
        config: &PlaybackConfig,
    ) -> Self {
        let mut controller = Self {
            graph,
            resolver,
            clock,
            now_playing: NowPlaying::new(surface),
            engine_ready: false,
            state: PlaybackState::Stopped,
            loaded: None,
            playlist: Playlist::new(),
            repeat_mode: config.repeat_mode,
            effects: EffectParameters::default(),
            position: PositionClock::new(),
            last_segment: SegmentId::default(),
            active_segment: None,
            pending_events: Vec::new(),
        };
        controller.start_engine();
        controller
    }

    fn start_engine(&mut self) {
        match self.graph.start() {
            Ok(()) => {
                self.engine_ready = true;
                debug!("Audio engine started");
            }
            Err(e) => {
                error!(error = %e, "Audio engine failed to start, transport disabled");
                self.emit(PlaybackEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        for channel in EffectChannel::ALL {
            let value = self.effects.get(channel).value;
            self.graph.apply(channel.node_parameter(value));
        }
    }

    // ===== Transport =====

    /// Play `track`, or toggle pause/resume if it is already selected
    ///
    /// A supplied playlist becomes the playback context when a different
    /// track is started; it is ignored for an in-place toggle.
    pub fn toggle_playback(&mut self, track: Track, playlist: Option<Vec<Track>>) -> Result<()> {
        if self.is_selected(&track.id) {
            return match self.state {
                PlaybackState::Playing => {
                    self.pause_track();
                    Ok(())
                }
                PlaybackState::Paused | PlaybackState::Stopped => self.play_track(),
            };
        }

        self.load(track, true)?;

        if let Some(tracks) = playlist {
            self.playlist.assign(tracks);
            if self.repeat_mode == RepeatMode::Shuffle {
                let selected = self.selected_id();
                self.playlist.shuffle_around(selected.as_ref());
            }
            self.emit(PlaybackEvent::PlaylistChanged {
                length: self.playlist.len(),
            });
        }

        self.emit(PlaybackEvent::PresentationRequested);
        Ok(())
    }

    /// Pause, capturing the elapsed position
    pub fn pause_track(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.graph.pause();
        let now = self.clock.now();
        self.position.pause(now);
        self.set_state(PlaybackState::Paused);
    }

    /// Resume from the captured position
    pub fn play_track(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if self.state == PlaybackState::Playing {
            return Ok(());
        }
        if !self.engine_ready {
            warn!("Audio engine unavailable, ignoring play");
            return Err(PlaybackError::EngineUnavailable);
        }

        if self.active_segment.is_none() {
            // Nothing scheduled (end reached or a schedule failed): pick up
            // from the checkpoint, or from the top if nothing remains.
            let frame = self.frame_at(self.current_time());
            if !self.schedule_from(frame)? {
                let now = self.clock.now();
                self.position.reset(now, Duration::ZERO, false);
                self.schedule_from(0)?;
            }
        }

        self.graph.play()?;
        let now = self.clock.now();
        self.position.resume(now);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Seek within the selected track
    ///
    /// The target is clamped into `[0, duration]`. A target past the end of
    /// the file itself is logged and ignored.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        let target = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, loaded.duration_seconds())
        };
        let target = Duration::from_secs_f64(target);
        let frame = loaded.frame_at(target);
        if frame > loaded.file.length_frames {
            warn!(
                target_ms = target.as_millis() as u64,
                frame,
                length_frames = loaded.file.length_frames,
                "Seek target beyond end of file, ignoring"
            );
            return Ok(());
        }

        let was_playing = self.state == PlaybackState::Playing;
        self.halt();
        let scheduled = match self.schedule_from(frame) {
            Ok(scheduled) => scheduled,
            Err(e) => return Err(self.degrade(target, e)),
        };

        let now = self.clock.now();
        self.position.reset(now, target, was_playing && scheduled);
        debug!(position_ms = target.as_millis() as u64, "Seeked");

        if was_playing {
            if !scheduled {
                return self.on_track_end();
            }
            if let Err(e) = self.graph.play() {
                return Err(self.degrade(target, e));
            }
        }

        self.emit_position();
        self.publish_now_playing();
        Ok(())
    }

    /// Skip to the next playlist entry, wrapping to the first
    pub fn next_track(&mut self) -> Result<()> {
        let Some(current) = self.selected_id() else {
            debug!("No track selected, ignoring next");
            return Ok(());
        };
        match self.playlist.next_after(&current).cloned() {
            Some(next) => self.load(next, true),
            None => {
                debug!(track_id = %current, "Track not in playlist, ignoring next");
                Ok(())
            }
        }
    }

    /// Go back to the previous playlist entry, wrapping to the last
    pub fn previous_track(&mut self) -> Result<()> {
        let Some(current) = self.selected_id() else {
            debug!("No track selected, ignoring previous");
            return Ok(());
        };
        match self.playlist.previous_before(&current).cloned() {
            Some(previous) => self.load(previous, true),
            None => {
                debug!(track_id = %current, "Track not in playlist, ignoring previous");
                Ok(())
            }
        }
    }

    /// Natural end of a scheduled segment
    ///
    /// Completions of segments that were stopped or replaced are ignored.
    pub fn segment_finished(&mut self, segment: SegmentId) -> Result<()> {
        if self.active_segment != Some(segment) {
            debug!(
                segment = segment.get(),
                active = ?self.active_segment.map(SegmentId::get),
                "Ignoring completion of stale segment"
            );
            return Ok(());
        }
        self.active_segment = None;
        self.on_track_end()
    }

    /// Stop playback and clear the selection
    pub fn stop(&mut self) {
        self.halt();
        let now = self.clock.now();
        self.position.reset(now, Duration::ZERO, false);
        self.loaded = None;
        self.now_playing.clear();
        if self.state != PlaybackState::Stopped {
            self.state = PlaybackState::Stopped;
            self.emit(PlaybackEvent::StateChanged {
                state: PlaybackState::Stopped,
            });
        }
    }

    // ===== Effects =====

    /// Set the bass shelf gain in dB (−10…24)
    pub fn update_bass_boost(&mut self, gain_db: f32) {
        self.update_effect(EffectChannel::Bass, gain_db);
    }

    /// Set the playback rate (0.5…2.0)
    pub fn update_speed(&mut self, rate: f32) {
        self.update_effect(EffectChannel::Speed, rate);
    }

    /// Set the pitch slider (−10…10, applied as hundreds of cents)
    pub fn update_pitch(&mut self, pitch: f32) {
        self.update_effect(EffectChannel::Pitch, pitch);
    }

    /// Set the reverb mix (0…100)
    pub fn update_reverb(&mut self, mix: f32) {
        self.update_effect(EffectChannel::Reverb, mix);
    }

    /// Dispatch an update to the matching channel setter
    pub fn update_effect(&mut self, channel: EffectChannel, value: f32) {
        match self.effects.set_value(channel, value) {
            Some(applied) => self.write_effect(channel, applied),
            None => debug!(?channel, value, "Effect disabled, ignoring update"),
        }
    }

    /// Enable or disable a channel; disabling writes the neutral value
    pub fn set_effect_enabled(&mut self, channel: EffectChannel, enabled: bool) {
        let applied = self.effects.set_enabled(channel, enabled);
        self.write_effect(channel, applied);
    }

    fn write_effect(&mut self, channel: EffectChannel, value: f32) {
        self.graph.apply(channel.node_parameter(value));
        if channel == EffectChannel::Speed {
            let now = self.clock.now();
            self.position.set_rate(now, value);
            self.publish_now_playing();
        }
        self.emit(PlaybackEvent::EffectChanged {
            channel,
            value,
            enabled: self.effects.get(channel).enabled,
        });
    }

    // ===== Repeat mode =====

    /// Switch repeat mode and rebuild the playlist order for it
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        let changed = self.repeat_mode != mode;
        self.repeat_mode = mode;
        self.setup_playlist();
        if changed {
            debug!(?mode, "Repeat mode changed");
            self.emit(PlaybackEvent::RepeatModeChanged { mode });
        }
    }

    /// Advance the repeat mode ring and return the new mode
    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        let next = self.repeat_mode.next();
        self.set_repeat_mode(next);
        next
    }

    fn setup_playlist(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        if self.repeat_mode == RepeatMode::Shuffle {
            let selected = self.selected_id();
            self.playlist.shuffle_around(selected.as_ref());
        } else {
            self.playlist.restore();
        }
        self.emit(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
    }

    /// Drop a track from the playback context, e.g. after it was deleted
    ///
    /// The selected track keeps playing; navigation skips the removed entry.
    pub fn remove_from_playlist(&mut self, track_id: &TrackId) {
        if self.playlist.remove(track_id) {
            debug!(track_id = %track_id, "Track removed from playlist");
            self.emit(PlaybackEvent::PlaylistChanged {
                length: self.playlist.len(),
            });
        }
    }

    // ===== Periodic refresh =====

    /// Republish the position and the now-playing record
    ///
    /// Returns the current position, or `None` with nothing selected.
    pub fn tick(&mut self) -> Option<Duration> {
        self.loaded.as_ref()?;
        self.emit_position();
        self.publish_now_playing();
        Some(self.current_time())
    }

    /// Attach artwork loaded asynchronously for `track_id`
    pub fn set_artwork(&mut self, track_id: &TrackId, artwork: Arc<[u8]>) {
        if !self.is_selected(track_id) {
            debug!(track_id = %track_id, "Discarding artwork of deselected track");
            return;
        }
        self.now_playing.set_artwork(track_id.clone(), artwork);
        self.publish_now_playing();
    }

    // ===== State Queries =====

    /// Position derived from the wall-clock checkpoint
    pub fn current_time(&self) -> Duration {
        match &self.loaded {
            Some(loaded) => self
                .position
                .elapsed(self.clock.now())
                .min(loaded.duration()),
            None => Duration::ZERO,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.loaded.as_ref().map(|loaded| &loaded.track)
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn effects(&self) -> &EffectParameters {
        &self.effects
    }

    /// Playlist in play order
    pub fn playlist(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            track: self.current_track().cloned(),
            position: self.current_time(),
            duration: self
                .loaded
                .as_ref()
                .map_or(Duration::ZERO, LoadedTrack::duration),
            repeat_mode: self.repeat_mode,
            effects: self.effects.clone(),
            playlist: self.playlist.tracks().iter().map(|t| t.id.clone()).collect(),
            engine_ready: self.engine_ready,
        }
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    fn selected_id(&self) -> Option<TrackId> {
        self.loaded.as_ref().map(|loaded| loaded.track.id.clone())
    }

    fn is_selected(&self, id: &TrackId) -> bool {
        self.loaded.as_ref().is_some_and(|loaded| &loaded.track.id == id)
    }

    fn frame_at(&self, position: Duration) -> u64 {
        self.loaded
            .as_ref()
            .map_or(0, |loaded| loaded.frame_at(position))
    }

    /// Select `track` and schedule it from frame 0
    ///
    /// Resolution and open happen before anything is stopped, so a failure
    /// leaves the current track playing.
    fn load(&mut self, mut track: Track, autoplay: bool) -> Result<()> {
        if !self.engine_ready {
            warn!(track_id = %track.id, "Audio engine unavailable, ignoring load");
            return Err(PlaybackError::EngineUnavailable);
        }

        let path = match self.resolver.resolve(&track.location) {
            Ok(Resolution::Fresh(path)) => path,
            Ok(Resolution::Relocated { path, refreshed }) => {
                debug!(track_id = %track.id, path = %path.display(), "Track file relocated");
                track.location = refreshed.clone();
                self.emit(PlaybackEvent::LocationRefreshed {
                    track_id: track.id.clone(),
                    location: refreshed,
                });
                path
            }
            Err(e) => return Err(self.reject(&track.id, PlaybackError::Location(e))),
        };

        let file = match self.graph.open(&path) {
            Ok(file) => file,
            Err(e) => return Err(self.reject(&track.id, e)),
        };

        // Stop before the checkpoint moves so no tick reports the old file
        let previous_track_id = self.selected_id();
        self.halt();
        let track_id = track.id.clone();
        self.loaded = Some(LoadedTrack { track, file });

        let started = self.schedule_from(0).and_then(|_| {
            if autoplay {
                self.graph.play()
            } else {
                Ok(())
            }
        });

        let now = self.clock.now();
        let playing = autoplay && started.is_ok();
        self.position.reset(now, Duration::ZERO, playing);
        self.state = if playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };

        debug!(track_id = %track_id, ?previous_track_id, "Track loaded");
        self.emit(PlaybackEvent::TrackChanged {
            track_id: track_id.clone(),
            previous_track_id,
        });
        self.emit(PlaybackEvent::StateChanged { state: self.state });
        self.publish_now_playing();

        started.map_err(|e| self.reject(&track_id, e))
    }

    /// Natural end of the selected track, per repeat mode
    fn on_track_end(&mut self) -> Result<()> {
        let Some(current) = self.selected_id() else {
            return Ok(());
        };

        let advanced = match self.repeat_mode {
            RepeatMode::Once => {
                let in_playlist = self.playlist.position_of(&current).is_some();
                if in_playlist && !self.playlist.is_last(&current) {
                    self.next_track()
                } else {
                    self.rewind_and_pause()
                }
            }
            RepeatMode::Loop => self.restart(),
            RepeatMode::Shuffle | RepeatMode::Advance => {
                match self.playlist.next_after(&current).cloned() {
                    Some(next) => self.load(next, true),
                    None => self.rewind_and_pause(),
                }
            }
        };

        // A rejected successor leaves the finished track with nothing scheduled
        let stalled = advanced.is_err()
            && self.state == PlaybackState::Playing
            && self.active_segment.is_none();
        if stalled {
            if let Err(e) = self.rewind_and_pause() {
                warn!(track_id = %current, error = %e, "Failed to park finished track");
            }
        }
        advanced
    }

    /// Replay the selected track from zero
    fn restart(&mut self) -> Result<()> {
        self.halt();
        let started = self.schedule_from(0).and_then(|_| self.graph.play());
        if let Err(e) = started {
            return Err(self.degrade(Duration::ZERO, e));
        }
        let now = self.clock.now();
        self.position.reset(now, Duration::ZERO, true);
        self.set_state(PlaybackState::Playing);
        self.emit_position();
        Ok(())
    }

    /// Park the selected track at zero, ready to play again
    fn rewind_and_pause(&mut self) -> Result<()> {
        self.halt();
        let scheduled = self.schedule_from(0);
        let now = self.clock.now();
        self.position.reset(now, Duration::ZERO, false);
        self.set_state(PlaybackState::Paused);
        self.emit_position();
        scheduled.map(|_| ())
    }

    /// Stop the graph and forget the in-flight segment
    fn halt(&mut self) {
        self.graph.stop();
        self.active_segment = None;
    }

    /// Schedule the loaded file from `start_frame` to its end
    ///
    /// Returns `false` when no frames remain.
    fn schedule_from(&mut self, start_frame: u64) -> Result<bool> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        let frame_count = loaded.file.length_frames.saturating_sub(start_frame);
        if frame_count == 0 {
            return Ok(false);
        }

        let segment = Segment {
            id: self.last_segment.next(),
            start_frame,
            frame_count,
        };
        self.last_segment = segment.id;
        self.graph.schedule(&loaded.file, segment)?;
        self.active_segment = Some(segment.id);
        Ok(true)
    }

    /// Log a failed load and report it; prior state is untouched
    fn reject(&mut self, track_id: &TrackId, error: PlaybackError) -> PlaybackError {
        warn!(track_id = %track_id, error = %error, "Failed to load track");
        self.emit(PlaybackEvent::Error {
            message: error.to_string(),
        });
        error
    }

    /// Log a graph failure after the old segment was stopped and settle
    /// paused at `position`
    fn degrade(&mut self, position: Duration, error: PlaybackError) -> PlaybackError {
        warn!(error = %error, "Audio graph rejected reschedule");
        self.active_segment = None;
        let now = self.clock.now();
        self.position.reset(now, position, false);
        self.set_state(PlaybackState::Paused);
        self.emit(PlaybackEvent::Error {
            message: error.to_string(),
        });
        error
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
        self.publish_now_playing();
    }

    fn publish_now_playing(&mut self) {
        let elapsed = self.current_time();
        let speed = self.effects.speed();
        if let Some(loaded) = self.loaded.as_ref() {
            self.now_playing
                .update(&loaded.track, elapsed, loaded.duration(), self.state, speed);
        }
    }

    fn emit_position(&mut self) {
        let position_ms = self.current_time().as_millis() as u64;
        let duration_ms = self
            .loaded
            .as_ref()
            .map_or(0, |loaded| loaded.duration().as_millis() as u64);
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms,
            duration_ms,
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}
