/*!
 * Tests for audio assembly and the silent-track fallback
 */

use std::sync::Arc;

use redub::errors::MediaError;
use redub::media::{AudioArtifact, AudioAssembler, MediaToolkit};

use crate::common;
use crate::common::mock_media::{MockToolkit, ToolkitCall};

fn assembler_over(toolkit: Arc<MockToolkit>) -> AudioAssembler {
    AudioAssembler::new(toolkit as Arc<dyn MediaToolkit>)
}

/// Test that multiple artifacts are concatenated in order
#[tokio::test]
async fn test_assemble_withMultipleArtifacts_shouldConcatInOrder() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let artifacts: Vec<AudioArtifact> = (0..3)
        .map(|i| {
            let path = common::create_test_file(&dir, &format!("seg{}.wav", i), "audio").unwrap();
            AudioArtifact::synthesized(path, 2.0)
        })
        .collect();

    let toolkit = MockToolkit::new();
    let assembler = assembler_over(Arc::clone(&toolkit));

    let output = dir.join("track.wav");
    assembler.assemble(&artifacts, &output).await.unwrap();

    let calls = toolkit.calls();
    match &calls[0] {
        ToolkitCall::Concat { inputs, output: out } => {
            assert_eq!(inputs.len(), 3);
            assert_eq!(inputs[0], artifacts[0].path);
            assert_eq!(inputs[2], artifacts[2].path);
            assert_eq!(out, &output);
        }
        other => panic!("expected a concat call, got {:?}", other),
    }
}

/// Test that a single artifact is copied rather than concatenated
#[tokio::test]
async fn test_assemble_withSingleArtifact_shouldCopy() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let path = common::create_test_file(&dir, "only.wav", "solo-audio").unwrap();

    let toolkit = MockToolkit::new();
    let assembler = assembler_over(Arc::clone(&toolkit));

    let output = dir.join("track.wav");
    assembler
        .assemble(&[AudioArtifact::synthesized(path, 2.0)], &output)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "solo-audio");
    assert!(toolkit.calls().is_empty());
}

/// Test that assembling nothing is an error
#[tokio::test]
async fn test_assemble_withEmptyList_shouldFail() {
    let toolkit = MockToolkit::new();
    let assembler = assembler_over(toolkit);

    let result = assembler.assemble(&[], std::path::Path::new("out.wav")).await;
    assert!(matches!(result, Err(MediaError::EmptyConcatList)));
}

/// Test that the silent-track fallback asks for the full duration
#[tokio::test]
async fn test_silentTrack_shouldGenerateFullDuration() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("track.wav");

    let toolkit = MockToolkit::new();
    let assembler = assembler_over(Arc::clone(&toolkit));

    assembler.silent_track(632.5, &output).await.unwrap();

    assert_eq!(
        toolkit.calls(),
        vec![ToolkitCall::Silence {
            duration: 632.5,
            output: output.clone(),
        }]
    );
    assert!(output.exists());
}
