//! SRT (SubRip) Parsing and Export
//!
//! # SRT Format
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! First caption text
//!
//! 2
//! 00:00:05,500 --> 00:00:08,000
//! Second caption text
//! with multiple lines
//! ```
//!
//! Parsing never fails: blocks with a malformed timing line, an empty body,
//! or a non-positive duration are dropped and counted.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::{timestamp::compose_millis, Span};
use crate::core::TimeMs;

static TIMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})")
        .expect("static timing line pattern")
});

/// Result of a tolerant SRT parse
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SrtParseOutcome {
    /// Well-formed spans in file order
    pub spans: Vec<Span>,
    /// Number of blocks dropped as malformed
    pub skipped_blocks: usize,
}

/// Per-block parser phase
enum Phase<'a> {
    /// Skipping blank lines between blocks
    Between,
    /// Index line consumed, expecting the timing line
    Timing,
    /// Accumulating body lines
    Body {
        start_ms: TimeMs,
        end_ms: TimeMs,
        lines: Vec<&'a str>,
    },
    /// Malformed block, discarding until the next blank line
    Discard,
}

/// Parses SRT content into spans, dropping malformed blocks.
pub fn parse_srt(content: &str) -> Vec<Span> {
    parse_srt_with_report(content).spans
}

/// Parses SRT content and reports how many blocks were dropped.
pub fn parse_srt_with_report(content: &str) -> SrtParseOutcome {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut outcome = SrtParseOutcome::default();
    let mut phase = Phase::Between;

    for (line_no, line) in content.lines().enumerate() {
        let blank = line.trim().is_empty();

        phase = match phase {
            Phase::Between if blank => Phase::Between,
            Phase::Between => match parse_timing_line(line) {
                // Tolerate blocks that omit the index line.
                Some((start_ms, end_ms)) => Phase::Body {
                    start_ms,
                    end_ms,
                    lines: Vec::new(),
                },
                None => Phase::Timing,
            },
            Phase::Timing => match parse_timing_line(line) {
                Some((start_ms, end_ms)) => Phase::Body {
                    start_ms,
                    end_ms,
                    lines: Vec::new(),
                },
                None => {
                    warn!("Skipping SRT block: malformed timing line {}: {:?}", line_no + 1, line);
                    outcome.skipped_blocks += 1;
                    if blank {
                        Phase::Between
                    } else {
                        Phase::Discard
                    }
                }
            },
            Phase::Body {
                start_ms,
                end_ms,
                lines,
            } if blank => {
                finish_block(&mut outcome, start_ms, end_ms, &lines);
                Phase::Between
            }
            Phase::Body {
                start_ms,
                end_ms,
                mut lines,
            } => {
                lines.push(line);
                Phase::Body {
                    start_ms,
                    end_ms,
                    lines,
                }
            }
            Phase::Discard if blank => Phase::Between,
            Phase::Discard => Phase::Discard,
        };
    }

    match phase {
        Phase::Body {
            start_ms,
            end_ms,
            lines,
        } => finish_block(&mut outcome, start_ms, end_ms, &lines),
        Phase::Timing => {
            warn!("Skipping SRT block: input ended before its timing line");
            outcome.skipped_blocks += 1;
        }
        Phase::Between | Phase::Discard => {}
    }

    debug!(
        "Parsed {} SRT spans ({} blocks skipped)",
        outcome.spans.len(),
        outcome.skipped_blocks
    );
    outcome
}

fn finish_block(outcome: &mut SrtParseOutcome, start_ms: TimeMs, end_ms: TimeMs, lines: &[&str]) {
    if lines.is_empty() {
        warn!("Skipping SRT block at {} ms: empty text", start_ms);
        outcome.skipped_blocks += 1;
        return;
    }

    match Span::new(lines.join("\n"), start_ms, end_ms) {
        Ok(span) => outcome.spans.push(span),
        Err(e) => {
            warn!("Skipping SRT block: {}", e);
            outcome.skipped_blocks += 1;
        }
    }
}

fn parse_timing_line(line: &str) -> Option<(TimeMs, TimeMs)> {
    let caps = TIMING_LINE.captures(line)?;
    let mut fields = [0; 8];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = caps[i + 1].parse().ok()?;
    }
    Some((
        compose_millis(fields[0], fields[1], fields[2], fields[3]),
        compose_millis(fields[4], fields[5], fields[6], fields[7]),
    ))
}

/// Exports spans to SRT format with 1-based indices.
pub fn export_srt(spans: &[Span]) -> String {
    let mut output = String::new();

    for (index, span) in spans.iter().enumerate() {
        output.push_str(&format!("{}\n", index + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(span.start_ms()),
            format_srt_timestamp(span.end_ms())
        ));
        output.push_str(span.text());
        output.push_str("\n\n");
    }

    output
}

/// Formats milliseconds as an SRT timestamp (`00:00:00,000`).
pub fn format_srt_timestamp(ms: TimeMs) -> String {
    let total_ms = ms.max(0);
    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}
