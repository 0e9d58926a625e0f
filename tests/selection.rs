//! Selection policy and frame selector tests.

use framepack::{FrameSelector, FramepackError, RawFrame, SelectionPolicy};
use image::RgbImage;

fn raw(source_index: u64) -> RawFrame {
    RawFrame {
        source_index,
        image: RgbImage::new(2, 2),
    }
}

/// Run a selector over `total` synthetic frames, honouring the budget cap
/// the way the pipeline does.
fn select_all(policy: SelectionPolicy, fps: f64, total: u64) -> Vec<(u64, u64, f64)> {
    let mut selector = FrameSelector::new(policy, fps);
    let mut kept = Vec::new();
    for source_index in 0..total {
        if selector.satisfied() {
            break;
        }
        if let Some(frame) = selector.select(raw(source_index)) {
            kept.push((frame.source_index, frame.kept_index, frame.timestamp));
        }
    }
    kept
}

// ── Skip-factor policy ───────────────────────────────────────────

#[test]
fn skip_zero_keeps_every_frame() {
    let kept = select_all(SelectionPolicy::exhaustive(0), 10.0, 20);
    assert_eq!(kept.len(), 20);
    for (index, (source, kept_index, _)) in kept.iter().enumerate() {
        assert_eq!(*source, index as u64);
        assert_eq!(*kept_index, index as u64, "kept indices must be contiguous");
    }
}

#[test]
fn skip_one_keeps_even_source_indices() {
    // 100 frames at 10 fps, skipping every other frame.
    let kept = select_all(SelectionPolicy::exhaustive(1), 10.0, 100);
    assert_eq!(kept.len(), 50);

    let sources: Vec<u64> = kept.iter().map(|(source, _, _)| *source).collect();
    let expected: Vec<u64> = (0..100).step_by(2).collect();
    assert_eq!(sources, expected, "kept source indices must follow the stride");

    // Second kept frame is source frame 2, shown at 0.2 seconds.
    assert_eq!(kept[1].0, 2);
    assert!((kept[1].2 - 0.2).abs() < 1e-9, "timestamp should be 2/10");
}

#[test]
fn skip_factor_timestamps_use_source_index() {
    let kept = select_all(SelectionPolicy::exhaustive(4), 25.0, 30);
    for (source, _, timestamp) in &kept {
        assert!((timestamp - *source as f64 / 25.0).abs() < 1e-9);
    }
}

#[test]
fn unknown_fps_yields_zero_timestamps() {
    let kept = select_all(SelectionPolicy::exhaustive(0), 0.0, 5);
    assert!(kept.iter().all(|(_, _, timestamp)| *timestamp == 0.0));
}

// ── Budget policy ────────────────────────────────────────────────

#[test]
fn budget_stride_is_total_over_max() {
    let policy = SelectionPolicy::budget(100, 1000).expect("valid budget");
    assert_eq!(policy.stride(), 10);
}

#[test]
fn budget_stride_never_below_one() {
    // Fewer source frames than the cap.
    let policy = SelectionPolicy::budget(100, 50).expect("valid budget");
    assert_eq!(policy.stride(), 1);

    // Unknown source length degrades to stride 1.
    let policy = SelectionPolicy::budget(10, 0).expect("valid budget");
    assert_eq!(policy.stride(), 1);
}

#[test]
fn budget_zero_max_frames_is_rejected() {
    let result = SelectionPolicy::budget(0, 1000);
    assert!(
        matches!(result, Err(FramepackError::InvalidMaxFrames(0))),
        "max_frames of zero must be a validation error",
    );
}

#[test]
fn budget_cap_stops_selection_early() {
    let policy = SelectionPolicy::budget(4, 100).expect("valid budget");
    assert_eq!(policy.stride(), 25);

    let kept = select_all(policy, 30.0, 100);
    assert_eq!(kept.len(), 4, "cap must bound the kept count");
    assert_eq!(
        kept.iter().map(|(source, _, _)| *source).collect::<Vec<_>>(),
        vec![0, 25, 50, 75],
    );
}

#[test]
fn budget_keeps_min_of_cap_and_available() {
    // T=95, M=10 -> stride 9, 11 candidates, capped at 10.
    let policy = SelectionPolicy::budget(10, 95).expect("valid budget");
    assert_eq!(policy.stride(), 9);
    assert_eq!(select_all(policy, 30.0, 95).len(), 10);

    // T=5, M=10 -> stride 1, only 5 available.
    let policy = SelectionPolicy::budget(10, 5).expect("valid budget");
    assert_eq!(select_all(policy, 30.0, 5).len(), 5);
}

#[test]
fn budget_timestamps_use_kept_index_times_stride() {
    // 1000 frames bounded to 100: frame 5 shows at (5*10)/fps.
    let policy = SelectionPolicy::budget(100, 1000).expect("valid budget");
    let kept = select_all(policy, 25.0, 1000);
    assert_eq!(kept.len(), 100);
    assert!((kept[5].2 - (5 * 10) as f64 / 25.0).abs() < 1e-9);
}

#[test]
fn kept_indices_contiguous_under_budget() {
    let policy = SelectionPolicy::budget(7, 60).expect("valid budget");
    let kept = select_all(policy, 24.0, 60);
    for (position, (_, kept_index, _)) in kept.iter().enumerate() {
        assert_eq!(*kept_index, position as u64);
    }
}

// ── Filenames ────────────────────────────────────────────────────

#[test]
fn exhaustive_filenames_use_six_digits() {
    let policy = SelectionPolicy::exhaustive(0);
    assert_eq!(policy.frame_filename(7), "frame_000007.jpg");
    assert_eq!(policy.frame_filename(123_456), "frame_123456.jpg");
}

#[test]
fn fast_filenames_use_four_digits() {
    let policy = SelectionPolicy::budget(100, 1000).expect("valid budget");
    assert_eq!(policy.frame_filename(7), "frame_0007.jpg");
    assert_eq!(policy.frame_filename(42), "frame_0042.jpg");
}
