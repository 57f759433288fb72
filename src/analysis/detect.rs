//! Threshold policy over per-mask scores

use crate::analysis::mask::MaskStore;
use crate::analysis::score::score;
use crate::source::PixelFormat;

/// One below-threshold hit for a single (mask, frame) pair
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvent {
    pub mask: String,
    pub score: f64,
    pub timestamp: f64,
}

/// Score a frame against every comparable mask and keep the hits.
///
/// Masks whose length differs from the frame's are skipped without
/// scoring; that is the expected case when a library mixes geometries.
/// Events come back in mask load order and are not deduplicated.
pub fn detect(
    masks: &MaskStore,
    frame: &[u8],
    timestamp: f64,
    format: PixelFormat,
    threshold: f64,
) -> Vec<MatchEvent> {
    let mut events = Vec::new();

    for mask in masks.iter() {
        if mask.len() != frame.len() {
            continue;
        }

        let score = score(mask.bytes(), frame, format);
        if score < threshold {
            events.push(MatchEvent {
                mask: mask.name().to_owned(),
                score,
                timestamp,
            });
        }
    }

    events
}
