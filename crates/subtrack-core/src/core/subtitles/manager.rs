//! Subtitle Manager
//!
//! Entry points for getting text onto a host timeline (SRT import, demo
//! insert, matched-span batches, end-to-end generation from the selected
//! clip) and bulk editors for the text already on a track.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    adapt_matches, allocate, apply_plan, register, synthesize, AudioExtractor, MatchRecord,
    MatchRequest, MatchingService, PlacementHint, PlacementPolicy, Relocation,
};
use crate::core::{
    captions::{parse_srt_with_report, Span},
    new_id,
    settings::SubtitleSettings,
    text::{ScreenPosition, StyleDefaults, StyleOverrides, TextPropertyChange},
    timeline::{EffectKind, MediaStore, TimelineHost},
    CoreError, CoreResult, EffectId, TrackIndex,
};

/// Result of one import
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Track holding the batch (`None` when nothing was added)
    pub track: Option<TrackIndex>,
    pub effect_ids: Vec<EffectId>,
    pub created_tracks: Vec<TrackIndex>,
    pub relocated: Vec<Relocation>,
    /// Input units dropped as malformed
    pub skipped: usize,
}

impl ImportReport {
    pub fn added(&self) -> usize {
        self.effect_ids.len()
    }
}

/// Outcome of a bulk edit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BulkEditStatus {
    Updated { count: usize },
    NothingToUpdate,
    NoSubtitleTrack,
}

impl BulkEditStatus {
    /// User-facing status line.
    pub fn message(&self) -> String {
        match self {
            Self::Updated { count: 1 } => "Updated 1 subtitle".to_string(),
            Self::Updated { count } => format!("Updated {} subtitles", count),
            Self::NothingToUpdate => "Nothing to update: no subtitles on this track".to_string(),
            Self::NoSubtitleTrack => "No subtitles have been added yet".to_string(),
        }
    }
}

/// Stages reported while generating subtitles from the selected clip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationStage {
    Extract,
    Send,
    Process,
    Add,
}

impl GenerationStage {
    /// 1-based stage number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Extract => 1,
            Self::Send => 2,
            Self::Process => 3,
            Self::Add => 4,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Extract => "Extracting audio...",
            Self::Send => "Sending audio to matching service...",
            Self::Process => "Processing matches...",
            Self::Add => "Creating subtitles...",
        }
    }
}

/// Fixed spans inserted by the demo action
pub fn demo_spans() -> CoreResult<Vec<Span>> {
    Ok(vec![
        Span::new("This is a demo subtitle", 1000, 4000)?,
        Span::new(
            "Multiple lines can be displayed\nwith proper formatting",
            4500,
            7500,
        )?,
        Span::new("Subtitles can be styled and positioned", 8000, 12000)?,
    ])
}

/// Orchestrates parsing, allocation and synthesis against a host.
#[derive(Clone, Debug, Default)]
pub struct SubtitleManager {
    settings: SubtitleSettings,
    /// Track of the last batch that added anything
    subtitle_track: Option<TrackIndex>,
}

impl SubtitleManager {
    pub fn new(settings: SubtitleSettings) -> Self {
        Self {
            settings,
            subtitle_track: None,
        }
    }

    pub fn settings(&self) -> &SubtitleSettings {
        &self.settings
    }

    pub fn subtitle_track(&self) -> Option<TrackIndex> {
        self.subtitle_track
    }

    /// Points the track-less editors at an existing subtitle track.
    pub fn set_subtitle_track(&mut self, track: Option<TrackIndex>) {
        self.subtitle_track = track;
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Parses SRT text and appends it after the highest used track.
    pub fn import_from_text(&mut self, host: &mut dyn TimelineHost, raw: &str) -> CoreResult<ImportReport> {
        let outcome = parse_srt_with_report(raw);
        if outcome.skipped_blocks > 0 {
            warn!("Skipped {} malformed SRT block(s)", outcome.skipped_blocks);
        }

        let defaults = self.settings.import_defaults();
        let position = self.settings.import_position();
        let mut report =
            self.add_subtitles(host, &outcome.spans, &PlacementHint::NoHint, &defaults, position)?;
        report.skipped = outcome.skipped_blocks;
        Ok(report)
    }

    /// Inserts the three demo spans with no placement hint.
    pub fn import_demo(&mut self, host: &mut dyn TimelineHost) -> CoreResult<ImportReport> {
        let defaults = self.settings.import_defaults();
        let position = self.settings.import_position();
        self.add_subtitles(host, &demo_spans()?, &PlacementHint::NoHint, &defaults, position)
    }

    /// Adapts match records and places them according to `hint`.
    pub fn import_from_matches(
        &mut self,
        host: &mut dyn TimelineHost,
        matches: &[MatchRecord],
        hint: &PlacementHint,
    ) -> CoreResult<ImportReport> {
        let adapted = adapt_matches(matches, self.settings.matching.text_source);
        let defaults = self.settings.matching_defaults();
        let position = self.settings.matching_position();
        let mut report = self.add_subtitles(host, &adapted.spans, hint, &defaults, position)?;
        report.skipped = adapted.skipped;
        Ok(report)
    }

    /// Allocates a track for `spans`, synthesizes their effects and
    /// registers them, then re-renders once.
    pub fn add_subtitles(
        &mut self,
        host: &mut dyn TimelineHost,
        spans: &[Span],
        hint: &PlacementHint,
        defaults: &StyleDefaults,
        position: ScreenPosition,
    ) -> CoreResult<ImportReport> {
        if spans.is_empty() {
            info!("No subtitles to add");
            return Ok(ImportReport::default());
        }

        let plan = allocate(spans.len(), host.track_count(), &host.effects(), hint);
        let applied = apply_plan(host, &plan)?;

        let effects = synthesize(spans, applied.track, defaults, position);
        let effect_ids = register(host, effects)?;

        self.subtitle_track = Some(applied.track);
        let timecode = host.current_timecode();
        host.compose_at_timecode(timecode);

        info!(
            "Added {} subtitles on track {}",
            effect_ids.len(),
            applied.track
        );

        Ok(ImportReport {
            track: Some(applied.track),
            effect_ids,
            created_tracks: applied.created_tracks,
            relocated: applied.relocated,
            skipped: 0,
        })
    }

    /// Extracts audio from the selected clip, matches it and places the
    /// result relative to that clip.
    ///
    /// Every external round trip finishes before the first host write, so
    /// a failure leaves the timeline untouched.
    pub async fn generate_from_selection<F>(
        &mut self,
        host: &mut dyn TimelineHost,
        store: &dyn MediaStore,
        extractor: &dyn AudioExtractor,
        matcher: &dyn MatchingService,
        request: &MatchRequest,
        policy: Option<PlacementPolicy>,
        mut progress: F,
    ) -> CoreResult<ImportReport>
    where
        F: FnMut(GenerationStage),
    {
        let selection = host.selected_effect().ok_or(CoreError::NoSelection)?;
        if !selection.kind.has_audio() {
            return Err(CoreError::InvalidSelection {
                id: selection.id.clone(),
                kind: selection.kind.as_str().to_string(),
            });
        }
        let hash = selection
            .file_hash
            .clone()
            .ok_or_else(|| CoreError::MediaNotFound(selection.id.clone()))?;

        progress(GenerationStage::Extract);
        let source = store.fetch_file(&hash).await?;
        let audio = temp_audio_path();
        let response = match extractor.extract(&source, &audio).await {
            Ok(()) => {
                progress(GenerationStage::Send);
                matcher.match_audio(&audio, request).await
            }
            Err(e) => Err(e),
        };
        // A failed extraction may still leave a partial output behind.
        remove_temp_audio(&audio).await;
        let response = response?;

        progress(GenerationStage::Process);
        info!(
            "Matched {} segments for {} {}",
            response.count,
            selection.kind.as_str(),
            selection.id
        );

        progress(GenerationStage::Add);
        let hint = PlacementHint::for_clip(policy.unwrap_or(self.settings.matching.policy), &selection);
        self.import_from_matches(host, &response.matches, &hint)
    }

    // =========================================================================
    // Bulk Editors
    // =========================================================================

    /// Sets one property on every text effect on `track`, then re-renders.
    pub fn for_all_effects_on_track(
        &self,
        host: &mut dyn TimelineHost,
        track: TrackIndex,
        change: &TextPropertyChange,
    ) -> CoreResult<BulkEditStatus> {
        change.validate()?;
        self.apply_to_track(host, track, std::slice::from_ref(change))
    }

    /// Bulk edit on the remembered subtitle track.
    pub fn update_subtitle_track(
        &self,
        host: &mut dyn TimelineHost,
        change: &TextPropertyChange,
    ) -> CoreResult<BulkEditStatus> {
        match self.subtitle_track {
            Some(track) => self.for_all_effects_on_track(host, track, change),
            None => {
                info!("{}", BulkEditStatus::NoSubtitleTrack.message());
                Ok(BulkEditStatus::NoSubtitleTrack)
            }
        }
    }

    /// Re-resolves a complete style and pushes every property to each
    /// text effect on `track`.
    pub fn reapply_style(
        &self,
        host: &mut dyn TimelineHost,
        track: TrackIndex,
        overrides: Option<&StyleOverrides>,
        position: ScreenPosition,
        preset_name: Option<&str>,
    ) -> CoreResult<BulkEditStatus> {
        let preset_name = preset_name.unwrap_or(&self.settings.import.preset_name);
        let resolved = StyleDefaults::new(self.settings.preset(preset_name)).resolve(overrides, position);
        let changes = resolved.property_changes();
        for change in &changes {
            change.validate()?;
        }
        self.apply_to_track(host, track, &changes)
    }

    fn apply_to_track(
        &self,
        host: &mut dyn TimelineHost,
        track: TrackIndex,
        changes: &[TextPropertyChange],
    ) -> CoreResult<BulkEditStatus> {
        let targets: Vec<EffectId> = host
            .effects()
            .into_iter()
            .filter(|e| e.kind == EffectKind::Text && e.track == track)
            .map(|e| e.id)
            .collect();

        if targets.is_empty() {
            info!("No text effects on track {}", track);
            return Ok(BulkEditStatus::NothingToUpdate);
        }

        for id in &targets {
            for change in changes {
                host.set_text_property(id, change)?;
            }
        }

        let timecode = host.current_timecode();
        host.compose_at_timecode(timecode);

        debug!(
            "Applied {} change(s) to {} effect(s) on track {}",
            changes.len(),
            targets.len(),
            track
        );
        Ok(BulkEditStatus::Updated {
            count: targets.len(),
        })
    }
}

fn temp_audio_path() -> PathBuf {
    std::env::temp_dir().join(format!("subtrack-{}.mp3", new_id()))
}

async fn remove_temp_audio(path: &Path) {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return;
    }
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!("Could not remove {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timeline::{MediaEffect, TimelineDocument, TimelineEffect};

    fn document_with_clip(clip_track: TrackIndex) -> TimelineDocument {
        let mut doc = TimelineDocument::new();
        for _ in 0..=clip_track {
            doc.add_track().unwrap();
        }
        doc.insert_media(TimelineEffect::Video(MediaEffect {
            id: "clip".to_string(),
            track: clip_track,
            start_ms: 0,
            duration_ms: 10_000,
            file_hash: Some("abc".to_string()),
            name: "clip.mp4".to_string(),
        }))
        .unwrap();
        doc
    }

    #[test]
    fn test_import_from_text_on_empty_timeline() {
        let mut doc = TimelineDocument::new();
        let mut manager = SubtitleManager::default();
        let report = manager
            .import_from_text(&mut doc, "1\n00:00:01,000 --> 00:00:02,500\nHello\n\n")
            .unwrap();

        assert_eq!(report.track, Some(0));
        assert_eq!(report.created_tracks, vec![0]);
        assert_eq!(report.added(), 1);
        assert_eq!(manager.subtitle_track(), Some(0));
        assert_eq!(doc.state().compose_count, 1);

        let text = doc.state().effects[0].as_text().unwrap();
        assert_eq!(text.start_ms, 1000);
        assert_eq!(text.duration_ms, 1500);
        assert_eq!(text.style.font_family, "Arial");
    }

    #[test]
    fn test_import_reports_skipped_blocks() {
        let mut doc = TimelineDocument::new();
        let mut manager = SubtitleManager::default();
        let srt = "1\n00:00:01,000 -> 00:00:02,000\nBroken\n\n2\n00:00:03,000 --> 00:00:04,000\nFine\n";
        let report = manager.import_from_text(&mut doc, srt).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.added(), 1);
    }

    #[test]
    fn test_empty_import_touches_nothing() {
        let mut doc = TimelineDocument::new();
        let mut manager = SubtitleManager::default();
        let report = manager.import_from_text(&mut doc, "").unwrap();
        assert_eq!(report, ImportReport::default());
        assert_eq!(doc.state().tracks.len(), 0);
        assert_eq!(doc.state().compose_count, 0);
        assert_eq!(manager.subtitle_track(), None);
    }

    #[test]
    fn test_demo_import() {
        let mut doc = document_with_clip(0);
        let mut manager = SubtitleManager::default();
        let report = manager.import_demo(&mut doc).unwrap();
        assert_eq!(report.track, Some(1));
        assert_eq!(report.added(), 3);
        let spans = doc.track_spans(1).unwrap();
        assert_eq!(spans[1].text(), "Multiple lines can be displayed\nwith proper formatting");
    }

    #[test]
    fn test_import_from_matches_uses_matched_preset() {
        let mut doc = document_with_clip(0);
        let mut manager = SubtitleManager::default();
        let matches = vec![MatchRecord::new(0.0, 2.5, "verse")];
        let report = manager
            .import_from_matches(&mut doc, &matches, &PlacementHint::AnchorAbove { track: 0 })
            .unwrap();

        assert_eq!(report.track, Some(1));
        let text = doc.state().effects.iter().find_map(|e| e.as_text()).unwrap();
        assert_eq!(text.style.font_family, "Uthmanic Hafs");
        assert_eq!(text.style.font_size, 60.0);
        assert!(text.shadow.enabled);
        assert_eq!(text.duration_ms, 2500);
    }

    #[test]
    fn test_swap_with_unknown_clip_leaves_timeline_unchanged() {
        let mut doc = document_with_clip(0);
        let mut manager = SubtitleManager::default();
        let hint = PlacementHint::DisplaceSwap {
            effect_id: "gone".to_string(),
            track: 0,
        };
        let result = manager.import_from_matches(&mut doc, &[MatchRecord::new(0.0, 1.0, "verse")], &hint);

        assert!(matches!(result, Err(CoreError::EffectNotFound(_))));
        assert_eq!(doc.state().tracks.len(), 1);
        assert_eq!(doc.state().effects.len(), 1);
        assert_eq!(manager.subtitle_track(), None);
    }

    #[test]
    fn test_bulk_edit_updates_text_on_track_only() {
        let mut doc = document_with_clip(0);
        let mut manager = SubtitleManager::default();
        manager.import_demo(&mut doc).unwrap();

        let status = manager
            .for_all_effects_on_track(&mut doc, 1, &TextPropertyChange::FontSize(50.0))
            .unwrap();
        assert_eq!(status, BulkEditStatus::Updated { count: 3 });
        assert!(doc
            .state()
            .text_effects_on_track(1)
            .iter()
            .all(|e| e.style.font_size == 50.0));

        let untouched = manager
            .for_all_effects_on_track(&mut doc, 0, &TextPropertyChange::FontSize(50.0))
            .unwrap();
        assert_eq!(untouched, BulkEditStatus::NothingToUpdate);
    }

    #[test]
    fn test_bulk_edit_rejects_invalid_value() {
        let mut doc = document_with_clip(0);
        let manager = SubtitleManager::default();
        let result = manager.for_all_effects_on_track(&mut doc, 0, &TextPropertyChange::DropShadowAlpha(2.0));
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_update_subtitle_track_before_any_import() {
        let mut doc = document_with_clip(0);
        let manager = SubtitleManager::default();
        let status = manager
            .update_subtitle_track(&mut doc, &TextPropertyChange::StrokeThickness(4.0))
            .unwrap();
        assert_eq!(status, BulkEditStatus::NoSubtitleTrack);
        assert_eq!(status.message(), "No subtitles have been added yet");
    }

    #[test]
    fn test_reapply_style_resets_edits() {
        let mut doc = TimelineDocument::new();
        let mut manager = SubtitleManager::default();
        manager.import_demo(&mut doc).unwrap();
        manager
            .update_subtitle_track(&mut doc, &TextPropertyChange::FontSize(99.0))
            .unwrap();

        let status = manager
            .reapply_style(&mut doc, 0, None, ScreenPosition::BottomCenter, None)
            .unwrap();
        assert_eq!(status, BulkEditStatus::Updated { count: 3 });
        assert!(doc
            .state()
            .text_effects_on_track(0)
            .iter()
            .all(|e| e.style.font_size == 38.0));

        // Re-applying the same record again is a fixed point.
        let before = doc.state().effects.clone();
        manager
            .reapply_style(&mut doc, 0, None, ScreenPosition::BottomCenter, None)
            .unwrap();
        assert_eq!(doc.state().effects, before);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(BulkEditStatus::Updated { count: 1 }.message(), "Updated 1 subtitle");
        assert_eq!(BulkEditStatus::Updated { count: 4 }.message(), "Updated 4 subtitles");
        assert!(BulkEditStatus::NothingToUpdate.message().contains("Nothing to update"));
        assert_eq!(GenerationStage::Add.number(), 4);
    }
}
