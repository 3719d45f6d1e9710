//! Effect channels and their parameter domains
//!
//! | channel | domain | neutral | node parameter |
//! |---------|--------|---------|----------------|
//! | bass    | −10…24 dB | 0 | EQ low-shelf gain |
//! | speed   | 0.5…2.0 | 1.0 | time-pitch rate |
//! | pitch   | −10…10 | 0 | time-pitch shift, value × 100 cents |
//! | reverb  | 0…100 | 0 | reverb wet/dry mix |

use crate::graph::NodeParameter;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// One of the four effect channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectChannel {
    Bass,
    Speed,
    Pitch,
    Reverb,
}

impl EffectChannel {
    /// All channels
    pub const ALL: [EffectChannel; 4] = [Self::Bass, Self::Speed, Self::Pitch, Self::Reverb];

    /// Accepted value domain
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Self::Bass => -10.0..=24.0,
            Self::Speed => 0.5..=2.0,
            Self::Pitch => -10.0..=10.0,
            Self::Reverb => 0.0..=100.0,
        }
    }

    /// Value that leaves the signal untouched
    pub fn neutral(self) -> f32 {
        match self {
            Self::Speed => 1.0,
            Self::Bass | Self::Pitch | Self::Reverb => 0.0,
        }
    }

    /// Clamp a value into the channel's domain; NaN maps to neutral
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.neutral();
        }
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }

    /// Graph parameter write for a channel value
    pub fn node_parameter(self, value: f32) -> NodeParameter {
        match self {
            Self::Bass => NodeParameter::BassGain(value),
            Self::Speed => NodeParameter::Rate(value),
            Self::Pitch => NodeParameter::PitchCents(value * 100.0),
            Self::Reverb => NodeParameter::ReverbMix(value),
        }
    }
}

/// Value and enable flag of one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSettings {
    pub value: f32,
    pub enabled: bool,
}

/// The published effect parameter set
///
/// Mutation goes through the controller so the published value and the
/// graph node never diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectParameters {
    bass: ChannelSettings,
    speed: ChannelSettings,
    pitch: ChannelSettings,
    reverb: ChannelSettings,
}

impl Default for EffectParameters {
    fn default() -> Self {
        let neutral = |channel: EffectChannel| ChannelSettings {
            value: channel.neutral(),
            enabled: true,
        };
        Self {
            bass: neutral(EffectChannel::Bass),
            speed: neutral(EffectChannel::Speed),
            pitch: neutral(EffectChannel::Pitch),
            reverb: neutral(EffectChannel::Reverb),
        }
    }
}

impl EffectParameters {
    /// Settings of one channel
    pub fn get(&self, channel: EffectChannel) -> ChannelSettings {
        match channel {
            EffectChannel::Bass => self.bass,
            EffectChannel::Speed => self.speed,
            EffectChannel::Pitch => self.pitch,
            EffectChannel::Reverb => self.reverb,
        }
    }

    fn get_mut(&mut self, channel: EffectChannel) -> &mut ChannelSettings {
        match channel {
            EffectChannel::Bass => &mut self.bass,
            EffectChannel::Speed => &mut self.speed,
            EffectChannel::Pitch => &mut self.pitch,
            EffectChannel::Reverb => &mut self.reverb,
        }
    }

    /// Current playback rate
    pub fn speed(&self) -> f32 {
        self.speed.value
    }

    /// Store a new value. Returns the clamped value to write to the graph,
    /// or `None` if the channel is disabled.
    pub(crate) fn set_value(&mut self, channel: EffectChannel, value: f32) -> Option<f32> {
        let settings = self.get_mut(channel);
        if !settings.enabled {
            return None;
        }
        settings.value = channel.clamp(value);
        Some(settings.value)
    }

    /// Toggle a channel. Disabling resets it to neutral. Returns the value
    /// to write to the graph.
    pub(crate) fn set_enabled(&mut self, channel: EffectChannel, enabled: bool) -> f32 {
        let settings = self.get_mut(channel);
        settings.enabled = enabled;
        if !enabled {
            settings.value = channel.neutral();
        }
        settings.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral_and_enabled() {
        let params = EffectParameters::default();
        for channel in EffectChannel::ALL {
            let settings = params.get(channel);
            assert_eq!(settings.value, channel.neutral());
            assert!(settings.enabled);
        }
    }

    #[test]
    fn values_are_clamped() {
        let mut params = EffectParameters::default();
        assert_eq!(params.set_value(EffectChannel::Bass, 40.0), Some(24.0));
        assert_eq!(params.set_value(EffectChannel::Speed, 0.1), Some(0.5));
        assert_eq!(params.set_value(EffectChannel::Reverb, f32::NAN), Some(0.0));
    }

    #[test]
    fn disabling_resets_to_neutral() {
        let mut params = EffectParameters::default();
        params.set_value(EffectChannel::Speed, 1.5);

        assert_eq!(params.set_enabled(EffectChannel::Speed, false), 1.0);
        assert_eq!(params.speed(), 1.0);
        assert_eq!(params.set_value(EffectChannel::Speed, 1.8), None);
        assert_eq!(params.speed(), 1.0);

        assert_eq!(params.set_enabled(EffectChannel::Speed, true), 1.0);
        assert_eq!(params.set_value(EffectChannel::Speed, 1.8), Some(1.8));
    }

    #[test]
    fn pitch_is_written_in_cents() {
        assert_eq!(
            EffectChannel::Pitch.node_parameter(-3.0),
            NodeParameter::PitchCents(-300.0)
        );
    }
}
