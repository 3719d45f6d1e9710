//! Property-based tests for playback invariants
//!
//! Uses proptest to verify invariants across many random inputs.

use bass_core::{CreateTrack, LocationRef, Track};
use bass_playback::shuffle::{shuffle_around, shuffle_fixed_point};
use bass_playback::{EffectChannel, PositionClock, RepeatMode};
use proptest::prelude::*;
use std::time::{Duration, Instant};

// ===== Helpers =====

fn arbitrary_track() -> impl Strategy<Value = Track> {
    (
        "[A-Za-z ]{1,30}", // name
        "[A-Za-z ]{1,20}", // artist
        1.0f64..600.0,     // duration (seconds)
    )
        .prop_map(|(name, artist, duration)| {
            let location = LocationRef::for_path(format!("/music/{name}.mp3"));
            CreateTrack::new(name, artist, duration, location).into_track()
        })
}

fn arbitrary_playlist() -> impl Strategy<Value = (Vec<Track>, usize)> {
    prop::collection::vec(arbitrary_track(), 1..40)
        .prop_flat_map(|tracks| {
            let len = tracks.len();
            (Just(tracks), 0..len)
        })
}

fn arbitrary_mode() -> impl Strategy<Value = RepeatMode> {
    prop::sample::select(RepeatMode::ALL.to_vec())
}

fn arbitrary_channel() -> impl Strategy<Value = EffectChannel> {
    prop::sample::select(EffectChannel::ALL.to_vec())
}

// ===== Property Tests =====

proptest! {
    /// Property: the selected track keeps its index; the rest is a permutation
    #[test]
    fn shuffle_holds_selected_track((tracks, selected) in arbitrary_playlist()) {
        let mut shuffled = tracks.clone();
        let selected_id = tracks[selected].id.clone();

        shuffle_around(&mut shuffled, Some(&selected_id));

        prop_assert_eq!(&shuffled[selected].id, &selected_id);

        let mut before: Vec<_> = tracks.iter().map(|t| t.id.to_string()).collect();
        let mut after: Vec<_> = shuffled.iter().map(|t| t.id.to_string()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    /// Property: fixed-point shuffle over plain indices never moves the fixed element
    #[test]
    fn fixed_point_shuffle_is_a_permutation(len in 1usize..64, seed in any::<u64>()) {
        use rand::{rngs::StdRng, SeedableRng};

        let fixed = (seed as usize) % len;
        let mut items: Vec<usize> = (0..len).collect();
        shuffle_fixed_point(&mut items, Some(fixed), &mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(items[fixed], fixed);
        items.sort_unstable();
        prop_assert_eq!(items, (0..len).collect::<Vec<_>>());
    }

    /// Property: four steps around the repeat ring return to the start
    #[test]
    fn repeat_ring_has_period_four(mode in arbitrary_mode()) {
        prop_assert_eq!(mode.next().next().next().next(), mode);
        prop_assert_ne!(mode.next(), mode);
    }

    /// Property: clamped effect values always lie in the channel domain
    #[test]
    fn effect_values_clamp_into_domain(channel in arbitrary_channel(), value in any::<f32>()) {
        let clamped = channel.clamp(value);
        prop_assert!(channel.range().contains(&clamped));
    }

    /// Property: pausing at any point preserves elapsed time regardless of how long the pause lasts
    #[test]
    fn pause_preserves_elapsed(
        played_ms in 0u64..10_000_000,
        paused_ms in 0u64..10_000_000,
    ) {
        let start = Instant::now();
        let mut clock = PositionClock::new();
        clock.reset(start, Duration::ZERO, true);

        let pause_at = start + Duration::from_millis(played_ms);
        clock.pause(pause_at);

        let later = pause_at + Duration::from_millis(paused_ms);
        prop_assert_eq!(clock.elapsed(later), Duration::from_millis(played_ms));
    }
}
