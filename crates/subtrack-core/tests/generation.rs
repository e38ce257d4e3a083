//! Generating subtitles from the selected clip with stubbed collaborators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use subtrack_core::core::{
    subtitles::{
        AudioExtractor, GenerationStage, MatchRecord, MatchRequest, MatchResponse,
        MatchingService, PlacementPolicy, SubtitleManager,
    },
    timeline::{MediaEffect, MediaStore, TimelineDocument, TimelineEffect, TimelineHost},
    CoreError, CoreResult,
};

struct FixedStore;

#[async_trait]
impl MediaStore for FixedStore {
    async fn fetch_file(&self, hash: &str) -> CoreResult<PathBuf> {
        Ok(PathBuf::from(format!("/media/{hash}.mp4")))
    }
}

#[derive(Default)]
struct RecordingExtractor {
    calls: AtomicUsize,
}

#[async_trait]
impl AudioExtractor for RecordingExtractor {
    async fn extract(&self, _input: &Path, _output: &Path) -> CoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingExtractor;

#[async_trait]
impl AudioExtractor for FailingExtractor {
    async fn extract(&self, _input: &Path, _output: &Path) -> CoreResult<()> {
        Err(CoreError::AudioExtractionFailed("no audio stream".to_string()))
    }
}

/// Writes a partial output file, then reports failure.
#[derive(Default)]
struct PartialOutputExtractor {
    output: Mutex<Option<PathBuf>>,
}

#[async_trait]
impl AudioExtractor for PartialOutputExtractor {
    async fn extract(&self, _input: &Path, output: &Path) -> CoreResult<()> {
        tokio::fs::write(output, b"partial").await?;
        *self.output.lock().unwrap() = Some(output.to_path_buf());
        Err(CoreError::AudioExtractionFailed("conversion aborted".to_string()))
    }
}

struct CannedMatcher {
    result: Result<Vec<MatchRecord>, String>,
}

#[async_trait]
impl MatchingService for CannedMatcher {
    async fn match_audio(&self, _audio: &Path, request: &MatchRequest) -> CoreResult<MatchResponse> {
        assert_eq!(request.start_surah, 1);
        match &self.result {
            Ok(matches) => Ok(MatchResponse {
                count: matches.len(),
                matches: matches.clone(),
            }),
            Err(message) => Err(CoreError::MatchingFailed(message.clone())),
        }
    }
}

fn matcher_ok() -> CannedMatcher {
    CannedMatcher {
        result: Ok(vec![
            MatchRecord::new("00:00:00,000", "00:00:03,000", "first"),
            MatchRecord::new("00:00:03,000", "00:00:07,000", "second"),
        ]),
    }
}

fn timeline_with_selected_clip() -> TimelineDocument {
    let mut doc = TimelineDocument::new();
    doc.add_track().unwrap();
    doc.insert_media(TimelineEffect::Video(MediaEffect {
        id: "clip".to_string(),
        track: 0,
        start_ms: 0,
        duration_ms: 7000,
        file_hash: Some("abc".to_string()),
        name: "recitation.mp4".to_string(),
    }))
    .unwrap();
    doc.select(Some("clip")).unwrap();
    doc
}

#[tokio::test]
async fn test_generate_anchor_above_by_default() {
    let mut doc = timeline_with_selected_clip();
    let mut manager = SubtitleManager::default();
    let extractor = RecordingExtractor::default();
    let mut stages = Vec::new();

    let report = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &extractor,
            &matcher_ok(),
            &MatchRequest::single_surah(1, None, None),
            None,
            |stage| stages.push(stage),
        )
        .await
        .unwrap();

    assert_eq!(report.track, Some(1));
    assert_eq!(report.added(), 2);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        stages,
        vec![
            GenerationStage::Extract,
            GenerationStage::Send,
            GenerationStage::Process,
            GenerationStage::Add
        ]
    );
    assert_eq!(doc.state().find_effect("clip").unwrap().track(), 0);
}

#[tokio::test]
async fn test_generate_with_displace_swap() {
    let mut doc = timeline_with_selected_clip();
    let mut manager = SubtitleManager::default();

    let report = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &RecordingExtractor::default(),
            &matcher_ok(),
            &MatchRequest::single_surah(1, Some(1), Some(7)),
            Some(PlacementPolicy::DisplaceSwap),
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(report.track, Some(0));
    assert_eq!(doc.state().find_effect("clip").unwrap().track(), 1);
}

#[tokio::test]
async fn test_matching_failure_leaves_timeline_untouched() {
    let mut doc = timeline_with_selected_clip();
    let before = doc.state().clone();
    let history_before = doc.executor().undo_count();
    let mut manager = SubtitleManager::default();
    let matcher = CannedMatcher {
        result: Err("Surah not found".to_string()),
    };

    let result = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &RecordingExtractor::default(),
            &matcher,
            &MatchRequest::single_surah(1, None, None),
            None,
            |_| {},
        )
        .await;

    match result {
        Err(CoreError::MatchingFailed(message)) => assert_eq!(message, "Surah not found"),
        other => panic!("expected matching failure, got {:?}", other),
    }
    assert_eq!(doc.state(), &before);
    assert_eq!(doc.executor().undo_count(), history_before);
}

#[tokio::test]
async fn test_extraction_failure_is_typed() {
    let mut doc = timeline_with_selected_clip();
    let mut manager = SubtitleManager::default();
    let result = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &FailingExtractor,
            &matcher_ok(),
            &MatchRequest::single_surah(1, None, None),
            None,
            |_| {},
        )
        .await;
    assert!(matches!(result, Err(CoreError::AudioExtractionFailed(_))));
    assert_eq!(doc.track_count(), 1);
}

#[tokio::test]
async fn test_failed_extraction_removes_partial_audio() {
    let mut doc = timeline_with_selected_clip();
    let mut manager = SubtitleManager::default();
    let extractor = PartialOutputExtractor::default();

    let result = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &extractor,
            &matcher_ok(),
            &MatchRequest::single_surah(1, None, None),
            None,
            |_| {},
        )
        .await;

    assert!(matches!(result, Err(CoreError::AudioExtractionFailed(_))));
    let output = extractor.output.lock().unwrap().clone().unwrap();
    assert!(!output.exists());
}

#[tokio::test]
async fn test_generate_requires_media_selection() {
    let mut doc = timeline_with_selected_clip();
    doc.select(None).unwrap();
    let mut manager = SubtitleManager::default();

    let result = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &RecordingExtractor::default(),
            &matcher_ok(),
            &MatchRequest::single_surah(1, None, None),
            None,
            |_| {},
        )
        .await;
    assert!(matches!(result, Err(CoreError::NoSelection)));

    manager.import_demo(&mut doc).unwrap();
    let text_id = doc
        .effects()
        .into_iter()
        .find(|e| e.track == 1)
        .map(|e| e.id)
        .unwrap();
    doc.select(Some(&text_id)).unwrap();

    let result = manager
        .generate_from_selection(
            &mut doc,
            &FixedStore,
            &RecordingExtractor::default(),
            &matcher_ok(),
            &MatchRequest::single_surah(1, None, None),
            None,
            |_| {},
        )
        .await;
    assert!(matches!(result, Err(CoreError::InvalidSelection { .. })));
}
