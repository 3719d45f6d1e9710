//! Now-playing surface synchronization

use crate::types::PlaybackState;
use bass_core::{MediaType, NowPlayingInfo, NowPlayingSurface, Track, TrackId};
use std::sync::Arc;
use std::time::Duration;

/// Build the record pushed to the surface
///
/// The reported rate is 0 while paused so the surface stops extrapolating.
pub fn now_playing_info(
    track: &Track,
    elapsed: Duration,
    duration: Duration,
    state: PlaybackState,
    speed: f32,
    artwork: Option<Arc<[u8]>>,
) -> NowPlayingInfo {
    NowPlayingInfo {
        title: track.name.clone(),
        artist: track.artist.clone(),
        duration,
        playback_rate: if state == PlaybackState::Playing { speed } else { 0.0 },
        elapsed,
        media_type: MediaType::Audio,
        artwork,
    }
}

/// Surface plus the artwork of the selected track
pub(crate) struct NowPlaying {
    surface: Box<dyn NowPlayingSurface>,
    artwork: Option<(TrackId, Arc<[u8]>)>,
}

impl NowPlaying {
    pub(crate) fn new(surface: Box<dyn NowPlayingSurface>) -> Self {
        Self {
            surface,
            artwork: None,
        }
    }

    pub(crate) fn update(
        &mut self,
        track: &Track,
        elapsed: Duration,
        duration: Duration,
        state: PlaybackState,
        speed: f32,
    ) {
        let artwork = self
            .artwork
            .as_ref()
            .filter(|(id, _)| *id == track.id)
            .map(|(_, bytes)| Arc::clone(bytes));

        let info = now_playing_info(track, elapsed, duration, state, speed, artwork);
        self.surface.publish(info);
        self.surface.set_playback_state(state.into());
    }

    pub(crate) fn set_artwork(&mut self, track_id: TrackId, artwork: Arc<[u8]>) {
        self.artwork = Some((track_id, artwork));
    }

    pub(crate) fn clear(&mut self) {
        self.artwork = None;
        self.surface.set_playback_state(PlaybackState::Stopped.into());
        self.surface.clear();
    }
}
