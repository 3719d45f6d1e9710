//! Property-based tests for the drag state machine

use bass_presentation::{PresentationController, PresentationEvent};
use proptest::prelude::*;

fn translations() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-500.0f32..500.0, 1..30)
}

proptest! {
    /// Property: the offset is zero after every gesture, whatever the outcome
    #[test]
    fn offset_resets_after_gesture(path in translations(), start_minimized in any::<bool>()) {
        let mut controller = PresentationController::default();
        controller.present();
        if start_minimized {
            controller.minimize();
        }

        for translation in &path {
            controller.drag_changed(*translation);
        }
        controller.drag_ended(*path.last().unwrap());

        prop_assert_eq!(controller.state().offset, 0.0);
    }

    /// Property: a minimized bar never records an offset beyond the upward cutoff
    #[test]
    fn minimized_offset_stays_within_cutoff(path in translations()) {
        let mut controller = PresentationController::default();
        controller.present();
        controller.minimize();
        let cutoff = controller.config().upward_cutoff;

        for translation in path {
            controller.drag_changed(translation);
            let offset = controller.state().offset;
            prop_assert!((-cutoff..=0.0).contains(&offset));
        }
    }

    /// Property: repeated presents or dismisses fire one event per real transition
    #[test]
    fn presence_events_match_transitions(ops in prop::collection::vec(any::<bool>(), 0..40)) {
        let mut controller = PresentationController::default();
        let mut presented = false;
        let mut expected = Vec::new();

        for present in ops {
            if present {
                controller.present();
                if !presented {
                    expected.push(PresentationEvent::DidPresent);
                }
            } else {
                controller.dismiss();
                if presented {
                    expected.push(PresentationEvent::DidDismiss);
                }
            }
            presented = present;
        }

        prop_assert_eq!(controller.drain_events(), expected);
    }
}
