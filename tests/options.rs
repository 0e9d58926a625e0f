//! ExtractOptions builder and validation tests.

use framepack::{ExtractOptions, FramepackError};

#[test]
fn defaults_validate() {
    assert!(ExtractOptions::new().validate().is_ok());
}

#[test]
fn quality_bounds_are_inclusive() {
    assert!(ExtractOptions::new().with_quality(1).validate().is_ok());
    assert!(ExtractOptions::new().with_quality(100).validate().is_ok());
}

#[test]
fn out_of_range_quality_is_rejected_not_clamped() {
    for quality in [0, 101, -5, 1000] {
        let result = ExtractOptions::new().with_quality(quality).validate();
        assert!(
            matches!(result, Err(FramepackError::InvalidQuality(q)) if q == quality),
            "quality {quality} must be rejected",
        );
    }
}

#[test]
fn batch_size_clamps_to_one() {
    let options = ExtractOptions::new().with_batch_size(0);
    let debug = format!("{options:?}");
    assert!(debug.contains("batch_size: 1"), "got: {debug}");
}

#[test]
fn compression_level_clamps_into_deflate_range() {
    let options = ExtractOptions::new().with_compression_level(99);
    let debug = format!("{options:?}");
    assert!(debug.contains("compression_level: 9"), "got: {debug}");

    let options = ExtractOptions::new().with_compression_level(-3);
    let debug = format!("{options:?}");
    assert!(debug.contains("compression_level: 0"), "got: {debug}");
}

#[test]
fn defaults_match_the_documented_values() {
    let debug = format!("{:?}", ExtractOptions::new());
    assert!(debug.contains("quality: 70"), "got: {debug}");
    assert!(debug.contains("batch_size: 50"), "got: {debug}");
    assert!(debug.contains("compression_level: 6"), "got: {debug}");
}
