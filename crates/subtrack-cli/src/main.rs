//! Subtrack CLI
//!
//! Imports, generates, restyles and exports subtitles on a JSON timeline
//! document. Results are printed to stdout as JSON; logs go to stderr.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use subtrack_core::core::{
    captions::export_srt,
    settings::SubtitleSettings,
    subtitles::{
        FfmpegAudioExtractor, HttpMatchingService, MatchRecord, MatchRequest, MatchResponse,
        PlacementHint, PlacementPolicy, SubtitleManager,
    },
    text::{ScreenPosition, StyleOverrides, TextPropertyChange},
    timeline::{DirectoryMediaStore, TimelineDocument, TimelineHost},
    TrackIndex,
};

#[derive(Parser, Debug)]
#[command(name = "subtrack", version, about = "Subtitle track allocation for timeline documents")]
struct Cli {
    /// Timeline document (created on first import if missing)
    #[arg(long, global = true, default_value = "timeline.json")]
    timeline: PathBuf,

    /// Settings file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import an SRT file after the highest used track
    ImportSrt {
        file: PathBuf,
    },

    /// Import matched spans (a `{count, matches}` response or a bare array)
    ImportMatches {
        file: PathBuf,

        /// Place relative to this clip instead of after the highest track
        #[arg(long)]
        anchor: Option<String>,

        /// anchor-above or displace-swap (only with --anchor)
        #[arg(long, requires = "anchor")]
        policy: Option<PlacementPolicy>,
    },

    /// Insert the demo subtitles
    Demo,

    /// Extract audio from a clip, match it and add the result
    Generate {
        /// Clip to generate for (defaults to the document's selection)
        #[arg(long)]
        clip: Option<String>,

        /// Directory holding media files named by hash
        #[arg(long, default_value = "media")]
        media_dir: PathBuf,

        #[arg(long)]
        surah: u32,

        #[arg(long)]
        start_ayah: Option<u32>,

        #[arg(long)]
        end_ayah: Option<u32>,

        #[arg(long)]
        policy: Option<PlacementPolicy>,
    },

    /// Set one style property on every text effect on a track
    SetStyle {
        #[arg(long)]
        track: TrackIndex,

        /// JSON change, e.g. '{"property":"fontSize","value":48}'
        change: String,
    },

    /// Re-apply a complete style to every text effect on a track
    Restyle {
        #[arg(long)]
        track: TrackIndex,

        #[arg(long, default_value = "bottom-center")]
        position: ScreenPosition,

        /// Named preset from the settings file
        #[arg(long)]
        preset: Option<String>,

        /// JSON style overrides, e.g. '{"fontSize":44,"fill":["#FFFF00"]}'
        #[arg(long)]
        overrides: Option<String>,
    },

    /// Write the text on a track as SRT
    ExportSrt {
        #[arg(long)]
        track: TrackIndex,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut settings = match &cli.settings {
        Some(path) => SubtitleSettings::load(path),
        None => SubtitleSettings::default(),
    };
    settings.apply_env_overrides();

    let mut manager = SubtitleManager::new(settings);

    match cli.command {
        Commands::ImportSrt { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut doc = open_or_create(&cli.timeline)?;
            let report = manager.import_from_text(&mut doc, &raw)?;
            save(&doc, &cli.timeline)?;
            print_json(&report)?;
        }
        Commands::ImportMatches {
            file,
            anchor,
            policy,
        } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let matches = parse_match_file(&raw)?;
            let mut doc = open_or_create(&cli.timeline)?;

            let hint = match anchor {
                Some(id) => {
                    let clip = doc
                        .effects()
                        .into_iter()
                        .find(|e| e.id == id)
                        .with_context(|| format!("No effect with id {}", id))?;
                    let policy = policy.unwrap_or(manager.settings().matching.policy);
                    PlacementHint::for_clip(policy, &clip)
                }
                None => PlacementHint::NoHint,
            };

            let report = manager.import_from_matches(&mut doc, &matches, &hint)?;
            save(&doc, &cli.timeline)?;
            print_json(&report)?;
        }
        Commands::Demo => {
            let mut doc = open_or_create(&cli.timeline)?;
            let report = manager.import_demo(&mut doc)?;
            save(&doc, &cli.timeline)?;
            print_json(&report)?;
        }
        Commands::Generate {
            clip,
            media_dir,
            surah,
            start_ayah,
            end_ayah,
            policy,
        } => {
            let mut doc = open_existing(&cli.timeline)?;
            if let Some(id) = clip.as_deref() {
                doc.select(Some(id))?;
            }

            let matching = &manager.settings().matching;
            let matcher = HttpMatchingService::new(
                &matching.service_url,
                Duration::from_secs(matching.timeout_secs),
            )?;
            let extractor = FfmpegAudioExtractor::from_settings(&manager.settings().extraction);
            let store = DirectoryMediaStore::new(media_dir);
            let request = MatchRequest::single_surah(surah, start_ayah, end_ayah);

            let report = manager
                .generate_from_selection(
                    &mut doc,
                    &store,
                    &extractor,
                    &matcher,
                    &request,
                    policy,
                    |stage| info!("[{}/4] {}", stage.number(), stage.message()),
                )
                .await?;
            save(&doc, &cli.timeline)?;
            print_json(&report)?;
        }
        Commands::SetStyle { track, change } => {
            let change: TextPropertyChange =
                serde_json::from_str(&change).context("Invalid style change")?;
            let mut doc = open_existing(&cli.timeline)?;
            let status = manager.for_all_effects_on_track(&mut doc, track, &change)?;
            save(&doc, &cli.timeline)?;
            info!("{}", status.message());
            print_json(&status)?;
        }
        Commands::Restyle {
            track,
            position,
            preset,
            overrides,
        } => {
            let overrides: Option<StyleOverrides> = overrides
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("Invalid style overrides")?;
            let mut doc = open_existing(&cli.timeline)?;
            let status = manager.reapply_style(
                &mut doc,
                track,
                overrides.as_ref(),
                position,
                preset.as_deref(),
            )?;
            save(&doc, &cli.timeline)?;
            info!("{}", status.message());
            print_json(&status)?;
        }
        Commands::ExportSrt { track, output } => {
            let doc = open_existing(&cli.timeline)?;
            let srt = export_srt(&doc.track_spans(track)?);
            match output {
                Some(path) => {
                    std::fs::write(&path, srt)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
                None => print!("{}", srt),
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_existing(path: &Path) -> Result<TimelineDocument> {
    if !path.exists() {
        bail!("Timeline {} does not exist", path.display());
    }
    TimelineDocument::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn open_or_create(path: &Path) -> Result<TimelineDocument> {
    if path.exists() {
        open_existing(path)
    } else {
        info!("Creating new timeline {}", path.display());
        Ok(TimelineDocument::new())
    }
}

fn save(doc: &TimelineDocument, path: &Path) -> Result<()> {
    doc.save(path)
        .with_context(|| format!("Failed to save {}", path.display()))
}

fn parse_match_file(raw: &str) -> Result<Vec<MatchRecord>> {
    if let Ok(response) = serde_json::from_str::<MatchResponse>(raw) {
        if !response.matches.is_empty() || raw.trim_start().starts_with('{') {
            return Ok(response.matches);
        }
    }
    serde_json::from_str::<Vec<MatchRecord>>(raw).context("Expected a match response or an array of matches")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
