//! Audio Extraction
//!
//! Strips the audio stream of a media file into an MP3 the matching
//! service accepts.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{settings::ExtractionSettings, CoreError, CoreResult};

/// Video/audio file -> audio file
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, input: &Path, output: &Path) -> CoreResult<()>;
}

/// Runs the `ffmpeg` binary
#[derive(Clone, Debug)]
pub struct FfmpegAudioExtractor {
    ffmpeg_path: String,
    bitrate: String,
    channels: u8,
}

impl Default for FfmpegAudioExtractor {
    fn default() -> Self {
        Self::from_settings(&ExtractionSettings::default())
    }
}

impl FfmpegAudioExtractor {
    pub fn from_settings(settings: &ExtractionSettings) -> Self {
        Self {
            ffmpeg_path: settings.ffmpeg_path.clone(),
            bitrate: settings.bitrate.clone(),
            channels: settings.channels,
        }
    }

    /// Arguments for one extraction: drop video, encode MP3, overwrite output.
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "mp3".to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
            "-ab".to_string(),
            self.bitrate.clone(),
            "-y".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    async fn extract(&self, input: &Path, output: &Path) -> CoreResult<()> {
        if !tokio::fs::try_exists(input).await.unwrap_or(false) {
            return Err(CoreError::AudioExtractionFailed(format!(
                "Input file not found: {}",
                input.display()
            )));
        }
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(CoreError::AudioExtractionFailed(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        let args = self.build_args(input, output);
        debug!("Running {} {}", self.ffmpeg_path, args.join(" "));

        let result = tokio::process::Command::new(&self.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                CoreError::AudioExtractionFailed(format!("Failed to run {}: {}", self.ffmpeg_path, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let message = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
            return Err(CoreError::AudioExtractionFailed(message));
        }

        info!("Extracted audio {} -> {}", input.display(), output.display());
        Ok(())
    }
}
