use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_capture::PixelBuffer;
use gesture::region::{average_brightness, brightness_centroid, RegionBounds, EYE_SAMPLE_STRIDE};
use gesture::{GestureBackend, GestureClassifier, GestureConfig};

fn gradient_frame(width: u32, height: u32) -> PixelBuffer {
    let mut frame = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) % 256) as u8;
            frame.set_pixel(x, y, [v, v, v, 255]);
        }
    }
    frame
}

fn bench_regions(c: &mut Criterion) {
    let frame = gradient_frame(640, 480);
    let bounds = RegionBounds::for_frame(640, 480);

    c.bench_function("eye_brightness_640x480", |b| {
        b.iter(|| average_brightness(black_box(&frame), &bounds.left_eye, EYE_SAMPLE_STRIDE))
    });

    c.bench_function("head_centroid_640x480", |b| {
        b.iter(|| brightness_centroid(black_box(&frame), &bounds.head_center))
    });

    let mut classifier = GestureClassifier::new(GestureConfig::default());
    let mut now = 0;
    c.bench_function("classify_frame_640x480", |b| {
        b.iter(|| {
            now += 33;
            classifier.analyze(black_box(&frame), now)
        })
    });
}

criterion_group!(benches, bench_regions);
criterion_main!(benches);
