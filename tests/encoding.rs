//! Encode pool tests.

use framepack::{EncodePool, Frame, SelectionPolicy};
use image::RgbImage;

/// A small gradient so consecutive frames do not encode identically.
fn frame(kept_index: u64) -> Frame {
    let shade = (kept_index * 23 % 256) as u8;
    let image = RgbImage::from_fn(16, 16, |x, y| {
        image::Rgb([shade, (x * 16) as u8, (y * 16) as u8])
    });
    Frame {
        source_index: kept_index,
        kept_index,
        timestamp: 0.0,
        image,
    }
}

fn batch(count: u64) -> Vec<Frame> {
    (0..count).map(frame).collect()
}

#[test]
fn results_come_back_in_kept_index_order() {
    let pool = EncodePool::new(4).expect("pool should build");
    let policy = SelectionPolicy::exhaustive(0);

    let encoded = pool
        .encode_batch(batch(25), 70, &policy)
        .expect("encode should succeed");

    let indices: Vec<u64> = encoded.iter().map(|f| f.kept_index).collect();
    assert_eq!(
        indices,
        (0..25).collect::<Vec<_>>(),
        "parallel completion order must not be observable",
    );
}

#[test]
fn worker_count_does_not_change_output() {
    let single = EncodePool::new(1).expect("pool should build");
    let many = EncodePool::new(4).expect("pool should build");
    let policy = SelectionPolicy::exhaustive(0);

    let from_single = single
        .encode_batch(batch(12), 80, &policy)
        .expect("encode should succeed");
    let from_many = many
        .encode_batch(batch(12), 80, &policy)
        .expect("encode should succeed");

    assert_eq!(from_single.len(), from_many.len());
    for (a, b) in from_single.iter().zip(from_many.iter()) {
        assert_eq!(a.kept_index, b.kept_index);
        assert_eq!(a.filename, b.filename);
        assert_eq!(a.data, b.data, "encoding must be deterministic");
    }
}

#[test]
fn filenames_follow_the_policy() {
    let pool = EncodePool::new(2).expect("pool should build");
    let policy = SelectionPolicy::budget(10, 100).expect("valid budget");

    let encoded = pool
        .encode_batch(batch(3), 60, &policy)
        .expect("encode should succeed");
    assert_eq!(encoded[0].filename, "frame_0000.jpg");
    assert_eq!(encoded[2].filename, "frame_0002.jpg");
}

#[test]
fn quality_extremes_both_encode() {
    let pool = EncodePool::new(2).expect("pool should build");
    let policy = SelectionPolicy::exhaustive(0);

    for quality in [1, 100] {
        let encoded = pool
            .encode_batch(batch(1), quality, &policy)
            .expect("both quality extremes are valid");
        assert!(!encoded[0].data.is_empty());
        assert_eq!(
            &encoded[0].data[..2],
            &[0xFF, 0xD8],
            "output should start with the JPEG SOI marker",
        );
    }
}

#[test]
fn empty_batch_is_a_no_op() {
    let pool = EncodePool::new(2).expect("pool should build");
    let policy = SelectionPolicy::exhaustive(0);
    let encoded = pool
        .encode_batch(Vec::new(), 70, &policy)
        .expect("empty batch should succeed");
    assert!(encoded.is_empty());
}

#[test]
fn workers_reports_pool_size() {
    let pool = EncodePool::new(3).expect("pool should build");
    assert_eq!(pool.workers(), 3);
}
