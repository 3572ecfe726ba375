use gesture::detector::{EyeDetector, LongBlinkTimer, MouthDetector};
use gesture::{EyeSide, GestureKind};
use proptest::prelude::*;

proptest! {
    /// Closed and opened events strictly alternate, starting with a closing
    #[test]
    fn eye_events_alternate(frames in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut eye = EyeDetector::new(EyeSide::Left);
        let mut last_closed = None;
        for (i, closed) in frames.iter().enumerate() {
            if let Some(kind) = eye.update(*closed, i as i64 * 33) {
                let is_close = kind == GestureKind::LeftEyeClosed;
                prop_assert_eq!(is_close, *closed);
                if let Some(prev) = last_closed {
                    prop_assert_ne!(prev, is_close);
                } else {
                    prop_assert!(is_close);
                }
                last_closed = Some(is_close);
            }
        }
    }

    /// Repeating a classification never produces a second event
    #[test]
    fn eye_repeated_state_is_silent(closed in any::<bool>(), repeats in 1usize..50) {
        let mut eye = EyeDetector::new(EyeSide::Right);
        eye.update(closed, 0);
        for i in 0..repeats {
            prop_assert!(eye.update(closed, i as i64 + 1).is_none());
        }
    }

    /// Long blink fires exactly when the closure outlasts the threshold
    #[test]
    fn long_blink_matches_threshold(duration in 0i64..5_000, threshold in 0i64..5_000) {
        let mut timer = LongBlinkTimer::new();
        timer.update(true, 0, threshold);
        let fired = timer.update(false, duration, threshold);
        prop_assert_eq!(fired.is_some(), duration > threshold);
    }

    /// Mouth openings are only reported, on closing, when longer than 500ms
    #[test]
    fn mouth_open_respects_debounce(duration in 0i64..2_000) {
        let mut mouth = MouthDetector::new();
        prop_assert_eq!(mouth.update(true, 0), None);
        let closed = mouth.update(false, duration);
        let expected = (duration > 500).then_some(GestureKind::MouthOpen { duration });
        prop_assert_eq!(closed, expected);
    }
}
