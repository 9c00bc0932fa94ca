/*!
 * Tests for duration correction against the mock toolkit
 */

use std::fs;
use std::sync::Arc;

use redub::app_config::TimingConfig;
use redub::media::{AudioArtifact, CorrectionMode, DurationCorrector, MediaToolkit};

use crate::common;
use crate::common::mock_media::{MockToolkit, ToolkitCall};

fn corrector_over(toolkit: Arc<MockToolkit>) -> DurationCorrector {
    DurationCorrector::new(toolkit as Arc<dyn MediaToolkit>, TimingConfig::default())
}

/// Test that an artifact within tolerance is left untouched
#[tokio::test]
async fn test_correct_withinTolerance_shouldNotStretch() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "seg.wav", "audio").unwrap();

    let toolkit = MockToolkit::new();
    toolkit.set_probe_duration(4.05);

    let corrector = corrector_over(Arc::clone(&toolkit));
    let mut artifact = AudioArtifact::synthesized(path, 4.0);

    corrector.correct(&mut artifact, 4.0, CorrectionMode::Segment).await.unwrap();

    assert_eq!(artifact.measured_duration, Some(4.05));
    assert_eq!(
        toolkit.count_calls(|c| matches!(c, ToolkitCall::Stretch { .. })),
        0
    );
}

/// Test that an overlong artifact is stretched at the measured/target ratio
#[tokio::test]
async fn test_correct_withOverlongArtifact_shouldStretchAndReplace() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "seg.wav", "audio").unwrap();

    let toolkit = MockToolkit::new();
    toolkit.set_probe_duration(4.8);

    let corrector = corrector_over(Arc::clone(&toolkit));
    let mut artifact = AudioArtifact::synthesized(path.clone(), 4.0);

    corrector.correct(&mut artifact, 4.0, CorrectionMode::Segment).await.unwrap();

    let stretches = toolkit.calls();
    let stretch = stretches
        .iter()
        .find_map(|c| match c {
            ToolkitCall::Stretch { ratio, .. } => Some(*ratio),
            _ => None,
        })
        .expect("a stretch call should have been made");
    assert!((stretch - 1.2).abs() < 1e-9);

    // The stretched file replaced the original; the temp name is gone
    assert!(path.exists());
    assert!(!path.with_extension("stretched.wav").exists());
    assert_eq!(artifact.measured_duration, Some(4.8 / 1.2));
}

/// Test that silence artifacts are never probed or stretched
#[tokio::test]
async fn test_correct_withSilenceArtifact_shouldSkip() {
    let toolkit = MockToolkit::new();
    let corrector = corrector_over(Arc::clone(&toolkit));

    let mut artifact = AudioArtifact::silence("unused.wav".into(), 3.0);
    corrector.correct(&mut artifact, 3.0, CorrectionMode::Segment).await.unwrap();

    assert!(toolkit.calls().is_empty());
}

/// Test that a probe failure degrades to a no-op instead of an error
#[tokio::test]
async fn test_correct_withProbeFailure_shouldLeaveArtifactAlone() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "seg.wav", "audio").unwrap();

    let toolkit = MockToolkit::new();
    toolkit.set_fail_probe(true);

    let corrector = corrector_over(Arc::clone(&toolkit));
    let mut artifact = AudioArtifact::synthesized(path, 4.0);

    corrector.correct(&mut artifact, 4.0, CorrectionMode::Segment).await.unwrap();
    assert_eq!(artifact.measured_duration, None);
}

/// Test that a failed swap of the stretched file is a degradation, not an
/// error: the original artifact survives and the orphan temp is removed
#[tokio::test]
async fn test_correct_withBlockedReplacement_shouldKeepOriginalAndSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();
    // A directory at the artifact path makes the rename fail while the
    // mock still writes the stretched temp next to it.
    let path = temp_dir.path().join("seg.wav");
    fs::create_dir(&path).unwrap();

    let toolkit = MockToolkit::new();
    toolkit.set_probe_duration(6.0);

    let corrector = corrector_over(Arc::clone(&toolkit));
    let mut artifact = AudioArtifact::synthesized(path.clone(), 4.0);

    corrector.correct(&mut artifact, 4.0, CorrectionMode::Segment).await.unwrap();

    assert_eq!(
        toolkit.count_calls(|c| matches!(c, ToolkitCall::Stretch { .. })),
        1
    );
    assert!(!path.with_extension("stretched.wav").exists());
    assert_eq!(artifact.measured_duration, Some(6.0));
}

/// Test that a stretch failure keeps the original file and succeeds
#[tokio::test]
async fn test_correct_withStretchFailure_shouldKeepOriginal() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "seg.wav", "audio").unwrap();

    let toolkit = MockToolkit::new();
    toolkit.set_probe_duration(6.0);
    toolkit.set_fail_stretch(true);

    let corrector = corrector_over(Arc::clone(&toolkit));
    let mut artifact = AudioArtifact::synthesized(path.clone(), 4.0);

    corrector.correct(&mut artifact, 4.0, CorrectionMode::Segment).await.unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "audio");
    assert_eq!(artifact.measured_duration, Some(6.0));
}
