//! End-to-end placement behavior through the subtitle manager.

use subtrack_core::core::{
    captions::{parse_srt, parse_timestamp, RawTimestamp},
    subtitles::{BulkEditStatus, MatchRecord, PlacementHint, PlacementPolicy, SubtitleManager},
    text::TextPropertyChange,
    timeline::{MediaEffect, TimelineDocument, TimelineEffect, TimelineHost},
    TrackIndex,
};

fn timeline_with_clip(track_count: usize, clip_track: TrackIndex) -> TimelineDocument {
    let mut doc = TimelineDocument::new();
    for _ in 0..track_count {
        doc.add_track().unwrap();
    }
    doc.insert_media(TimelineEffect::Video(MediaEffect {
        id: "clip".to_string(),
        track: clip_track,
        start_ms: 0,
        duration_ms: 8000,
        file_hash: Some("abc".to_string()),
        name: "recitation.mp4".to_string(),
    }))
    .unwrap();
    doc
}

fn matches() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new(0.0, 2.0, "A"),
        MatchRecord::new("00:00:02,000", "00:00:04,000", "B"),
        MatchRecord::new(4.0, 6.5, "C"),
    ]
}

fn text_tracks(doc: &TimelineDocument) -> Vec<TrackIndex> {
    doc.state()
        .effects
        .iter()
        .filter_map(|e| e.as_text())
        .map(|e| e.track)
        .collect()
}

#[test]
fn test_no_hint_on_empty_timeline_lands_on_track_zero() {
    let mut doc = TimelineDocument::new();
    let mut manager = SubtitleManager::default();
    manager
        .import_from_matches(&mut doc, &matches(), &PlacementHint::NoHint)
        .unwrap();

    assert_eq!(text_tracks(&doc), vec![0, 0, 0]);
    assert_eq!(doc.track_count(), 1);
}

#[test]
fn test_no_hint_with_clip_on_track_zero() {
    let mut doc = timeline_with_clip(1, 0);
    let mut manager = SubtitleManager::default();
    let srt = "1\n00:00:00,000 --> 00:00:02,000\nA\n\n2\n00:00:02,000 --> 00:00:04,000\nB\n";
    let report = manager.import_from_text(&mut doc, srt).unwrap();

    assert_eq!(report.track, Some(1));
    assert_eq!(text_tracks(&doc), vec![1, 1]);
    assert_eq!(doc.track_count(), 2);
}

#[test]
fn test_anchor_above_places_on_next_track() {
    for k in 0..3 {
        let mut doc = timeline_with_clip(k + 1, k);
        let mut manager = SubtitleManager::default();
        let hint = PlacementHint::AnchorAbove { track: k };
        manager.import_from_matches(&mut doc, &matches(), &hint).unwrap();

        assert!(text_tracks(&doc).iter().all(|&t| t == k + 1));
        assert!(doc.track_count() >= k + 2);
        assert_eq!(doc.state().find_effect("clip").unwrap().track(), k);
    }
}

#[test]
fn test_anchor_above_reuses_existing_track() {
    let mut doc = timeline_with_clip(4, 1);
    let mut manager = SubtitleManager::default();
    let report = manager
        .import_from_matches(&mut doc, &matches(), &PlacementHint::AnchorAbove { track: 1 })
        .unwrap();

    assert!(report.created_tracks.is_empty());
    assert_eq!(doc.track_count(), 4);
}

#[test]
fn test_displace_swap_moves_clip_and_takes_its_row() {
    for k in 0..3 {
        let mut doc = timeline_with_clip(k + 1, k);
        let mut manager = SubtitleManager::default();
        let clip = doc.effects().into_iter().find(|e| e.id == "clip").unwrap();
        let hint = PlacementHint::for_clip(PlacementPolicy::DisplaceSwap, &clip);
        let report = manager.import_from_matches(&mut doc, &matches(), &hint).unwrap();

        assert_eq!(doc.state().find_effect("clip").unwrap().track(), k + 1);
        assert!(text_tracks(&doc).iter().all(|&t| t == k));
        assert_eq!(report.relocated.len(), 1);
        assert!(doc.track_count() >= k + 2);
    }
}

#[test]
fn test_every_text_effect_references_a_valid_track() {
    let mut doc = timeline_with_clip(1, 0);
    let mut manager = SubtitleManager::default();
    manager.import_demo(&mut doc).unwrap();
    manager
        .import_from_matches(&mut doc, &matches(), &PlacementHint::AnchorAbove { track: 5 })
        .unwrap();
    manager.import_from_text(&mut doc, "00:00:01,000 --> 00:00:02,000\nX\n").unwrap();

    let count = doc.track_count();
    assert!(doc.state().effects.iter().all(|e| e.track() < count));
}

#[test]
fn test_successive_imports_do_not_share_a_track() {
    let mut doc = TimelineDocument::new();
    let mut manager = SubtitleManager::default();
    let first = manager.import_demo(&mut doc).unwrap();
    let second = manager.import_demo(&mut doc).unwrap();
    assert_eq!(first.track, Some(0));
    assert_eq!(second.track, Some(1));
    assert_eq!(manager.subtitle_track(), Some(1));
}

#[test]
fn test_invalid_matches_are_skipped_not_fatal() {
    let mut doc = TimelineDocument::new();
    let mut manager = SubtitleManager::default();
    let records = vec![
        MatchRecord::new(3.0, 1.0, "backwards"),
        MatchRecord::new("bad", "worse", "unparseable"),
        MatchRecord::new(0.0, 1.0, "ok"),
    ];
    let report = manager
        .import_from_matches(&mut doc, &records, &PlacementHint::NoHint)
        .unwrap();
    assert_eq!(report.added(), 1);
    assert_eq!(report.skipped, 2);
}

#[test]
fn test_bulk_edit_on_empty_track_changes_nothing() {
    let mut doc = timeline_with_clip(3, 0);
    let manager = SubtitleManager::default();
    let before = doc.state().effects.clone();

    let status = manager
        .for_all_effects_on_track(&mut doc, 2, &TextPropertyChange::FontSize(30.0))
        .unwrap();
    assert_eq!(status, BulkEditStatus::NothingToUpdate);
    assert_eq!(doc.state().effects, before);
}

#[test]
fn test_bulk_edit_is_undoable_per_effect() {
    let mut doc = TimelineDocument::new();
    let mut manager = SubtitleManager::default();
    manager.import_demo(&mut doc).unwrap();
    manager
        .update_subtitle_track(&mut doc, &TextPropertyChange::StrokeColor("#FF0000".to_string()))
        .unwrap();

    doc.undo().unwrap();
    let strokes: Vec<&str> = doc
        .state()
        .text_effects_on_track(0)
        .iter()
        .map(|e| e.style.stroke.as_str())
        .collect();
    assert_eq!(strokes.iter().filter(|s| **s == "#FF0000").count(), 2);
}

#[test]
fn test_srt_example_and_timestamp_properties() {
    let spans = parse_srt("1\n00:00:01,000 --> 00:00:02,500\nHello\n\n");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text(), "Hello");
    assert_eq!(spans[0].start_ms(), 1000);
    assert_eq!(spans[0].end_ms(), 2500);

    for (h, m, s, ms) in [(0, 0, 0, 0), (1, 2, 3, 4), (23, 59, 59, 999), (99, 0, 1, 500)] {
        let text = format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms);
        let expected = ((h * 3600 + m * 60 + s) * 1000 + ms) as i64;
        assert_eq!(parse_timestamp(Some(&RawTimestamp::from(text.as_str()))), expected);
    }
    for seconds in [0.0, 1.0, 2.5, 3600.0] {
        let expected = (seconds * 1000.0) as i64;
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Seconds(seconds))), expected);
    }
    assert_eq!(parse_timestamp(None), 0);
}
