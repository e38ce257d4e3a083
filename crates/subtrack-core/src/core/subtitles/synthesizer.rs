//! Effect Synthesis
//!
//! Turns spans into render-ready text effects. Synthesis is pure; the
//! registration step is the only part that touches the host.

use tracing::debug;

use crate::core::{
    captions::Span,
    text::{ScreenPosition, StyleDefaults},
    timeline::{TextEffect, TimelineHost},
    CoreResult, EffectId, TrackIndex,
};

/// Builds one text effect per span, in span order, each with a fresh id.
pub fn synthesize(
    spans: &[Span],
    track: TrackIndex,
    defaults: &StyleDefaults,
    position: ScreenPosition,
) -> Vec<TextEffect> {
    spans
        .iter()
        .map(|span| {
            let resolved = defaults.resolve(span.style_overrides(), position);
            TextEffect::from_span(span, track, resolved)
        })
        .collect()
}

/// Hands each effect to the host, one call per effect.
pub fn register(host: &mut dyn TimelineHost, effects: Vec<TextEffect>) -> CoreResult<Vec<EffectId>> {
    let mut ids = Vec::with_capacity(effects.len());
    for effect in effects {
        debug!(
            "Registering text effect {} on track {} ({}..{} ms)",
            effect.id,
            effect.track,
            effect.start_ms,
            effect.end_ms()
        );
        let id = effect.id.clone();
        host.add_text_effect(effect)?;
        ids.push(id);
    }
    Ok(ids)
}
