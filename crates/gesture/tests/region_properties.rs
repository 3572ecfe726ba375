use frame_capture::PixelBuffer;
use gesture::region::{average_brightness, brightness_centroid, Region, RegionBounds};
use proptest::prelude::*;

fn frame_strategy() -> impl Strategy<Value = PixelBuffer> {
    (1u32..48, 1u32..48).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 4) as usize)
            .prop_map(move |data| PixelBuffer::from_rgba(data, w, h).unwrap())
    })
}

proptest! {
    /// Brightness stays normalized for any pixels, region or stride
    #[test]
    fn brightness_is_normalized(
        frame in frame_strategy(),
        x1 in 0u32..64, y1 in 0u32..64, w in 0u32..64, h in 0u32..64,
        stride in 0u32..5,
    ) {
        let region = Region::new(x1, y1, x1 + w, y1 + h);
        let brightness = average_brightness(&frame, &region, stride);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&brightness));
    }

    /// Every region lies inside the frame
    #[test]
    fn regions_fit_frame(width in 0u32..4_000, height in 0u32..4_000) {
        let bounds = RegionBounds::for_frame(width, height);
        for region in [bounds.left_eye, bounds.right_eye, bounds.mouth, bounds.head_center] {
            prop_assert!(region.x1 <= region.x2 && region.x2 <= width);
            prop_assert!(region.y1 <= region.y2 && region.y2 <= height);
        }
    }

    /// The centroid, when present, falls inside the region
    #[test]
    fn centroid_within_region(frame in frame_strategy()) {
        let region = RegionBounds::for_frame(frame.width(), frame.height()).head_center;
        if let Some((x, y)) = brightness_centroid(&frame, &region) {
            prop_assert!(x >= region.x1 as f64 - 1e-9 && x <= region.x2 as f64);
            prop_assert!(y >= region.y1 as f64 - 1e-9 && y <= region.y2 as f64);
        }
    }
}
