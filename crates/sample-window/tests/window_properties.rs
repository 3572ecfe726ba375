use proptest::prelude::*;
use sample_window::SlidingWindow;

proptest! {
    #[test]
    fn length_never_exceeds_capacity(capacity in 0usize..16, items in prop::collection::vec(any::<i32>(), 0..64)) {
        let mut window = SlidingWindow::new(capacity);
        for item in &items {
            window.push(*item);
            prop_assert!(window.len() <= capacity);
        }
    }

    #[test]
    fn keeps_the_most_recent_items(capacity in 1usize..16, items in prop::collection::vec(any::<i32>(), 1..64)) {
        let mut window = SlidingWindow::new(capacity);
        for item in &items {
            window.push(*item);
        }

        let expected: Vec<i32> = items.iter().rev().take(capacity).copied().collect();
        let actual: Vec<i32> = window.iter_newest_first().copied().collect();
        prop_assert_eq!(actual, expected);
    }
}
