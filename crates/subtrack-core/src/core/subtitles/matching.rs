//! Matched-Span Input
//!
//! Records produced by an external audio-to-text matching service, the
//! adapter that turns them into spans, and the service client.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    captions::{parse_timestamp, RawTimestamp, Span},
    CoreResult,
};

/// Which text of a match record becomes the subtitle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextSource {
    #[default]
    Original,
    /// Localized text, falling back to the original when absent
    Translated,
}

/// One matched interval as returned by the service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub start: Option<RawTimestamp>,
    #[serde(default)]
    pub end: Option<RawTimestamp>,
    #[serde(default)]
    pub original_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
}

impl MatchRecord {
    pub fn new(start: impl Into<RawTimestamp>, end: impl Into<RawTimestamp>, text: &str) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            original_text: text.to_string(),
            translated_text: None,
        }
    }

    fn text(&self, source: TextSource) -> &str {
        match (source, &self.translated_text) {
            (TextSource::Translated, Some(t)) if !t.trim().is_empty() => t,
            _ => &self.original_text,
        }
    }
}

/// Successful service response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

/// Spans adapted from a batch of records
#[derive(Clone, Debug, Default)]
pub struct AdaptedMatches {
    pub spans: Vec<Span>,
    /// Records dropped for empty text or a non-positive duration
    pub skipped: usize,
}

/// Converts records to spans, parsing both endpoints best-effort.
pub fn adapt_matches(records: &[MatchRecord], source: TextSource) -> AdaptedMatches {
    let mut adapted = AdaptedMatches::default();

    for (index, record) in records.iter().enumerate() {
        let text = record.text(source);
        if text.trim().is_empty() {
            warn!("Skipping match {}: empty text", index + 1);
            adapted.skipped += 1;
            continue;
        }

        let start_ms = parse_timestamp(record.start.as_ref());
        let end_ms = parse_timestamp(record.end.as_ref());
        match Span::new(text, start_ms, end_ms) {
            Ok(span) => adapted.spans.push(span),
            Err(e) => {
                warn!("Skipping match {}: {}", index + 1, e);
                adapted.skipped += 1;
            }
        }
    }

    debug!(
        "Adapted {} of {} match records",
        adapted.spans.len(),
        records.len()
    );
    adapted
}

// =============================================================================
// Matching Service
// =============================================================================

/// Chapter/verse range sent with the audio
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub start_surah: u32,
    pub end_surah: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ayah: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ayah: Option<u32>,
}

impl MatchRequest {
    /// Request covering one chapter, optionally narrowed to a verse range.
    pub fn single_surah(surah: u32, start_ayah: Option<u32>, end_ayah: Option<u32>) -> Self {
        Self {
            start_surah: surah,
            end_surah: surah,
            start_ayah,
            end_ayah,
        }
    }

    /// Multipart text fields, in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("start_surah", self.start_surah.to_string()),
            ("end_surah", self.end_surah.to_string()),
        ];
        if let Some(ayah) = self.start_ayah {
            fields.push(("start_ayah", ayah.to_string()));
        }
        if let Some(ayah) = self.end_ayah {
            fields.push(("end_ayah", ayah.to_string()));
        }
        fields
    }
}

/// External audio-to-text matcher
#[async_trait]
pub trait MatchingService: Send + Sync {
    async fn match_audio(&self, audio: &Path, request: &MatchRequest) -> CoreResult<MatchResponse>;
}

#[cfg(feature = "remote-matcher")]
pub use http::HttpMatchingService;

#[cfg(feature = "remote-matcher")]
mod http {
    use std::path::Path;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::Deserialize;
    use tracing::{debug, info};

    use super::{MatchRequest, MatchResponse, MatchingService};
    use crate::core::{CoreError, CoreResult};

    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    /// Matching service reached over HTTP (`POST <base>/process`, multipart)
    pub struct HttpMatchingService {
        base_url: String,
        client: reqwest::Client,
    }

    impl HttpMatchingService {
        pub fn new(base_url: &str, timeout: Duration) -> CoreResult<Self> {
            let base_url = base_url.trim().trim_end_matches('/');
            if base_url.is_empty() {
                return Err(CoreError::ValidationError(
                    "Matching service URL is required".to_string(),
                ));
            }

            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

            Ok(Self {
                base_url: base_url.to_string(),
                client,
            })
        }

        pub fn endpoint(&self) -> String {
            format!("{}/process", self.base_url)
        }
    }

    #[async_trait]
    impl MatchingService for HttpMatchingService {
        async fn match_audio(&self, audio: &Path, request: &MatchRequest) -> CoreResult<MatchResponse> {
            let bytes = tokio::fs::read(audio).await?;
            let file_name = audio
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "audio.mp3".to_string());

            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("audio/mpeg")
                .map_err(|e| CoreError::MatchingFailed(e.to_string()))?;
            let mut form = reqwest::multipart::Form::new().part("audio", part);
            for (name, value) in request.form_fields() {
                form = form.text(name, value);
            }

            let endpoint = self.endpoint();
            debug!("Sending audio to {}", endpoint);
            let response = self
                .client
                .post(&endpoint)
                .multipart(form)
                .send()
                .await
                .map_err(|e| CoreError::MatchingFailed(format!("Request to {} failed: {}", endpoint, e)))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| CoreError::MatchingFailed(e.to_string()))?;

            if !status.is_success() {
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.error)
                    .unwrap_or_else(|| format!("API request failed ({})", status));
                return Err(CoreError::MatchingFailed(message));
            }

            let parsed: MatchResponse = serde_json::from_str(&body)
                .map_err(|e| CoreError::MatchingFailed(format!("Invalid response: {}", e)))?;
            info!("Matching service returned {} matches", parsed.count);
            Ok(parsed)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_endpoint_trims_trailing_slash() {
            let service =
                HttpMatchingService::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
            assert_eq!(service.endpoint(), "http://localhost:5000/process");
        }

        #[test]
        fn test_empty_url_rejected() {
            assert!(HttpMatchingService::new("  ", Duration::from_secs(5)).is_err());
        }
    }
}
