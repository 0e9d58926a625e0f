//! Frame source tests.
//!
//! Decode tests require the fixture from `tests/fixtures/generate_fixtures.sh`.

use std::path::Path;

use framepack::{FramepackError, FrameSource};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn open_nonexistent_file_fails() {
    let result = FrameSource::open("this_file_does_not_exist.mp4");
    assert!(
        matches!(result, Err(FramepackError::VideoOpen { .. })),
        "opening a missing file must be a VideoOpen error",
    );
}

#[test]
fn garbage_bytes_are_rejected_at_open() {
    let result = FrameSource::from_bytes(b"this is not a media file");
    let error = result.err().expect("garbage input must fail to open");
    assert!(
        error.is_client_error(),
        "an unreadable video is the caller's fault: {error}",
    );
}

#[test]
fn open_error_mentions_the_failure() {
    let error = FrameSource::from_bytes(&[0u8; 64]).err().expect("must fail");
    let message = error.to_string();
    assert!(
        message.contains("Failed to open video"),
        "unexpected message: {message}",
    );
}

#[test]
fn metadata_is_captured_at_open() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = FrameSource::open(path).expect("fixture should open");
    let metadata = source.metadata();
    assert!(metadata.width > 0);
    assert!(metadata.height > 0);
    assert!(metadata.frames_per_second > 0.0);
}

#[test]
fn frames_come_out_in_decode_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = FrameSource::open(path).expect("fixture should open");
    let width = source.metadata().width;
    let height = source.metadata().height;

    let mut expected = 0;
    for frame in source.take(20) {
        assert_eq!(frame.source_index, expected);
        assert_eq!(frame.image.width(), width);
        assert_eq!(frame.image.height(), height);
        expected += 1;
    }
    assert!(expected > 0, "fixture should decode at least one frame");
}

#[test]
fn source_is_finite() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = FrameSource::open(path).expect("fixture should open");
    // A 5-second fixture is far below this bound; the decode loop must end.
    assert!(source.count() < 100_000);
}
