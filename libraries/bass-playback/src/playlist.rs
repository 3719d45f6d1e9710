//! Playlist playback context
//!
//! Holds the order tracks are played in plus an independent snapshot of the
//! order it was assigned with:
//!
//! ```text
//! assigned:  [A, B, C, D]        (list order)
//! original:  [D, C, B, A]        (display order, newest first)
//! current:   [B, C, D, A]        (Shuffle mode around the selected track)
//! ```

use crate::shuffle::shuffle_around;
use bass_core::{Track, TrackId};

/// Playback context with restorable original order
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    /// Order tracks are played in
    current: Vec<Track>,

    /// Order at assignment, used to restore after shuffling
    original: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the context
    ///
    /// Tracks arrive in list order (oldest first); the most recently listed
    /// track plays first, so the context is stored in display order.
    pub fn assign(&mut self, mut tracks: Vec<Track>) {
        tracks.reverse();
        self.original.clone_from(&tracks);
        self.current = tracks;
    }

    /// Tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.current
    }

    /// Tracks in their assigned order
    pub fn original(&self) -> &[Track] {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Index of a track in play order
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.current.iter().position(|t| &t.id == id)
    }

    /// Whether `id` is the final track in play order
    pub fn is_last(&self, id: &TrackId) -> bool {
        self.current.last().is_some_and(|t| &t.id == id)
    }

    /// Track after `id`, wrapping to the first
    ///
    /// `None` if the playlist is empty or does not contain `id`.
    pub fn next_after(&self, id: &TrackId) -> Option<&Track> {
        let index = self.position_of(id)?;
        self.current.get((index + 1) % self.current.len())
    }

    /// Track before `id`, wrapping to the last
    pub fn previous_before(&self, id: &TrackId) -> Option<&Track> {
        let index = self.position_of(id)?;
        let previous = index.checked_sub(1).unwrap_or(self.current.len() - 1);
        self.current.get(previous)
    }

    /// Return to the original order
    pub fn restore(&mut self) {
        self.current.clone_from(&self.original);
    }

    /// Re-shuffle from the original order, holding `selected` at its
    /// original index
    pub fn shuffle_around(&mut self, selected: Option<&TrackId>) {
        self.current.clone_from(&self.original);
        shuffle_around(&mut self.current, selected);
    }

    /// Drop `id` from both orders; `false` if it was not present
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.current.len();
        self.current.retain(|t| &t.id != id);
        self.original.retain(|t| &t.id != id);
        self.current.len() != before
    }
}
