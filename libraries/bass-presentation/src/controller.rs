//! Presentation controller
//!
//! The only sanctioned way to change the player surface's presentation
//! state. Every transition publishes the new state on a `watch` channel and
//! queues a discrete [`PresentationEvent`].

use crate::config::PresentationConfig;
use crate::geometry::{geometry, Geometry, SafeAreaInsets};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// Observable presentation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresentationState {
    /// The surface is mounted
    pub is_presented: bool,
    /// Collapsed bar rather than the full player
    pub is_minimized: bool,
    /// Vertical drag offset, zero at rest
    pub offset: f32,
    /// Hidden without being dismissed
    pub is_visible: bool,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            is_presented: false,
            is_minimized: false,
            offset: 0.0,
            is_visible: true,
        }
    }
}

/// Discrete presentation transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    DidPresent,
    DidDismiss,
    DidMinimize,
    /// Only fired while presented
    DidExpand,
    VisibilityChanged { visible: bool },
}

/// Drag-driven presentation state machine
pub struct PresentationController {
    config: PresentationConfig,
    state: PresentationState,

    // Visibility was taken away by the keyboard and is ours to restore
    hidden_by_keyboard: bool,

    sender: watch::Sender<PresentationState>,
    pending_events: Vec<PresentationEvent>,
}

impl PresentationController {
    pub fn new(config: PresentationConfig) -> Self {
        let state = PresentationState::default();
        let (sender, _) = watch::channel(state);
        Self {
            config,
            state,
            hidden_by_keyboard: false,
            sender,
            pending_events: Vec::new(),
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.sender.subscribe()
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    // ===== Presence =====

    /// Mount the surface
    pub fn present(&mut self) {
        if self.state.is_presented {
            return;
        }
        self.state.is_presented = true;
        debug!("Player presented");
        self.emit(PresentationEvent::DidPresent);
        self.publish();
    }

    /// Unmount the surface
    pub fn dismiss(&mut self) {
        if !self.state.is_presented {
            return;
        }
        self.state.is_presented = false;
        self.state.offset = 0.0;
        debug!("Player dismissed");
        self.emit(PresentationEvent::DidDismiss);
        self.publish();
    }

    // ===== Expansion =====

    /// Collapse to the mini bar
    pub fn minimize(&mut self) {
        if self.state.is_minimized {
            return;
        }
        self.state.is_minimized = true;
        debug!("Player minimized");
        self.emit(PresentationEvent::DidMinimize);
        self.publish();
    }

    /// Open the full player
    ///
    /// Expanding a surface that is not presented changes state silently.
    pub fn expand(&mut self) {
        if !self.state.is_minimized {
            return;
        }
        self.state.is_minimized = false;
        // The keyboard only hides the mini bar
        if self.hidden_by_keyboard {
            self.hidden_by_keyboard = false;
            self.set_visibility(true);
        }
        debug!(presented = self.state.is_presented, "Player expanded");
        if self.state.is_presented {
            self.emit(PresentationEvent::DidExpand);
        }
        self.publish();
    }

    pub fn toggle_expansion_state(&mut self) {
        if self.state.is_minimized {
            self.expand();
        } else {
            self.minimize();
        }
    }

    // ===== Drag gesture =====

    /// Track an in-flight drag with vertical `translation`
    ///
    /// Expanded, a downward drag moves the player with the finger. Minimized,
    /// only upward drag is tracked, and only up to the cutoff.
    pub fn drag_changed(&mut self, translation: f32) {
        if translation.is_nan() {
            return;
        }
        let offset = if self.state.is_minimized {
            translation.clamp(-self.config.upward_cutoff, 0.0)
        } else {
            translation.max(0.0)
        };
        if offset != self.state.offset {
            self.state.offset = offset;
            self.publish();
        }
    }

    /// Finish a drag: snap to a new state or back, offset returns to zero
    pub fn drag_ended(&mut self, translation: f32) {
        if !self.state.is_minimized && translation > self.config.minimize_threshold {
            self.minimize();
        } else if self.state.is_minimized && translation < -self.config.expand_threshold {
            self.expand();
        }
        if self.state.offset != 0.0 {
            self.state.offset = 0.0;
            self.publish();
        }
    }

    /// Render geometry for the current state
    pub fn geometry(&self, insets: SafeAreaInsets) -> Geometry {
        geometry(
            &self.config,
            self.state.is_minimized,
            self.state.offset,
            insets,
        )
    }

    // ===== Visibility =====

    /// The on-screen keyboard is about to appear
    pub fn keyboard_will_show(&mut self) {
        if self.state.is_minimized && self.state.is_visible {
            self.hidden_by_keyboard = true;
            self.set_visibility(false);
            self.publish();
        }
    }

    /// The on-screen keyboard is about to disappear
    pub fn keyboard_will_hide(&mut self) {
        if self.hidden_by_keyboard {
            self.hidden_by_keyboard = false;
            self.set_visibility(true);
            self.publish();
        }
    }

    /// Show or hide the surface explicitly
    pub fn set_visible(&mut self, visible: bool) {
        self.hidden_by_keyboard = false;
        if self.state.is_visible != visible {
            self.set_visibility(visible);
            self.publish();
        }
    }

    fn set_visibility(&mut self, visible: bool) {
        if self.state.is_visible != visible {
            self.state.is_visible = visible;
            self.emit(PresentationEvent::VisibilityChanged { visible });
        }
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit(&mut self, event: PresentationEvent) {
        self.pending_events.push(event);
    }

    fn publish(&self) {
        self.sender.send_replace(self.state);
    }
}

impl Default for PresentationController {
    fn default() -> Self {
        Self::new(PresentationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented() -> PresentationController {
        let mut controller = PresentationController::default();
        controller.present();
        controller.drain_events();
        controller
    }

    fn minimized() -> PresentationController {
        let mut controller = presented();
        controller.minimize();
        controller.drain_events();
        controller
    }

    #[test]
    fn present_is_idempotent() {
        let mut controller = PresentationController::default();
        controller.present();
        controller.present();
        assert_eq!(controller.drain_events(), vec![PresentationEvent::DidPresent]);
    }

    #[test]
    fn dismiss_when_hidden_fires_nothing() {
        let mut controller = PresentationController::default();
        controller.dismiss();
        assert!(controller.drain_events().is_empty());

        controller.present();
        controller.dismiss();
        controller.dismiss();
        assert_eq!(
            controller.drain_events(),
            vec![PresentationEvent::DidPresent, PresentationEvent::DidDismiss]
        );
    }

    #[test]
    fn expand_event_requires_presence() {
        let mut controller = PresentationController::default();
        controller.minimize();
        controller.expand();
        assert_eq!(controller.drain_events(), vec![PresentationEvent::DidMinimize]);
        assert!(!controller.state().is_minimized);

        let mut controller = minimized();
        controller.expand();
        assert_eq!(controller.drain_events(), vec![PresentationEvent::DidExpand]);
    }

    #[test]
    fn toggle_switches_expansion() {
        let mut controller = presented();
        controller.toggle_expansion_state();
        assert!(controller.state().is_minimized);
        controller.toggle_expansion_state();
        assert!(!controller.state().is_minimized);
    }

    #[test]
    fn expanded_drag_past_threshold_minimizes() {
        let mut controller = presented();
        controller.drag_changed(40.0);
        assert_eq!(controller.state().offset, 40.0);
        controller.drag_changed(95.0);

        controller.drag_ended(95.0);

        assert!(controller.state().is_minimized);
        assert_eq!(controller.state().offset, 0.0);
        assert_eq!(controller.drain_events(), vec![PresentationEvent::DidMinimize]);
    }

    #[test]
    fn expanded_short_drag_snaps_back() {
        let mut controller = presented();
        controller.drag_changed(50.0);

        controller.drag_ended(50.0);

        assert!(!controller.state().is_minimized);
        assert_eq!(controller.state().offset, 0.0);
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn expanded_ignores_upward_drag() {
        let mut controller = presented();
        controller.drag_changed(-30.0);
        assert_eq!(controller.state().offset, 0.0);
    }

    #[test]
    fn minimized_drag_is_clamped_at_cutoff() {
        let mut controller = minimized();
        controller.drag_changed(20.0);
        assert_eq!(controller.state().offset, 0.0);

        controller.drag_changed(-45.0);
        assert_eq!(controller.state().offset, -45.0);

        controller.drag_changed(-200.0);
        assert_eq!(controller.state().offset, -60.0);
    }

    #[test]
    fn minimized_drag_past_threshold_expands() {
        let mut controller = minimized();
        controller.drag_changed(-80.0);

        controller.drag_ended(-80.0);

        assert!(!controller.state().is_minimized);
        assert_eq!(controller.state().offset, 0.0);
        assert_eq!(controller.drain_events(), vec![PresentationEvent::DidExpand]);
    }

    #[test]
    fn minimized_short_drag_snaps_back() {
        let mut controller = minimized();
        controller.drag_changed(-40.0);
        controller.drag_ended(-40.0);

        assert!(controller.state().is_minimized);
        assert_eq!(controller.state().offset, 0.0);
    }

    #[test]
    fn keyboard_hides_minimized_bar_and_restores_it() {
        let mut controller = minimized();
        controller.keyboard_will_show();
        assert!(!controller.state().is_visible);

        controller.keyboard_will_hide();
        assert!(controller.state().is_visible);
        assert_eq!(
            controller.drain_events(),
            vec![
                PresentationEvent::VisibilityChanged { visible: false },
                PresentationEvent::VisibilityChanged { visible: true },
            ]
        );
    }

    #[test]
    fn keyboard_leaves_expanded_player_alone() {
        let mut controller = presented();
        controller.keyboard_will_show();
        controller.keyboard_will_hide();
        assert!(controller.state().is_visible);
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn keyboard_hide_does_not_override_explicit_hide() {
        let mut controller = minimized();
        controller.set_visible(false);
        controller.keyboard_will_show();
        controller.keyboard_will_hide();
        assert!(!controller.state().is_visible);
    }

    #[test]
    fn subscribers_observe_every_offset() {
        let mut controller = presented();
        let receiver = controller.subscribe();

        controller.drag_changed(33.0);
        assert_eq!(receiver.borrow().offset, 33.0);

        controller.drag_ended(33.0);
        let state = *receiver.borrow();
        assert_eq!(state.offset, 0.0);
        assert!(state.is_presented);
    }

    #[test]
    fn geometry_tracks_offset() {
        let mut controller = presented();
        let insets = SafeAreaInsets::default();
        let rest = controller.geometry(insets);

        controller.drag_changed(25.0);
        let dragged = controller.geometry(insets);

        assert_eq!(dragged.anchor_y - rest.anchor_y, 25.0);
    }
}
