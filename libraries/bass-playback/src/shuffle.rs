//! Fixed-point shuffle
//!
//! Randomizes a playlist while the selected track keeps its index.

use bass_core::{Track, TrackId};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Shuffle `tracks` so that the track with id `selected` stays where it is
///
/// Every other track is permuted uniformly. If `selected` is `None` or not in
/// the list, the whole list is shuffled.
pub fn shuffle_around(tracks: &mut [Track], selected: Option<&TrackId>) {
    let fixed = selected.and_then(|id| tracks.iter().position(|t| &t.id == id));
    shuffle_fixed_point(tracks, fixed, &mut thread_rng());
}

/// Shuffle `items` keeping the element at `fixed` in place
pub fn shuffle_fixed_point<T, R: Rng + ?Sized>(
    items: &mut [T],
    fixed: Option<usize>,
    rng: &mut R,
) {
    let Some(last) = items.len().checked_sub(1) else {
        return;
    };

    match fixed {
        Some(index) if index <= last => {
            // Park the fixed element at the end, shuffle the rest, put it back.
            items.swap(index, last);
            items[..last].shuffle(rng);
            items.swap(index, last);
        }
        _ => items.shuffle(rng),
    }
}
