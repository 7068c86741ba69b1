//! Detection model boundary and confidence filtering.

use headstone_core::{Detection, DetectionSet, NormBox, RgbTile};

/// Raw per-tile model output: parallel arrays of boxes (normalized to the
/// tile), confidence scores and class labels.
#[derive(Clone, Debug, Default)]
pub struct RawDetections {
    pub boxes: Vec<NormBox>,
    pub scores: Vec<f32>,
    pub classes: Vec<i64>,
}

impl RawDetections {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// The opaque detection model.
///
/// Implementations receive a fixed-size RGB tile and return instance
/// boxes in tile-local normalized coordinates. The pipeline holds a
/// reference only; model lifecycle is the caller's business.
pub trait TileDetector {
    fn detect(&self, tile: &RgbTile) -> RawDetections;
}

impl<F> TileDetector for F
where
    F: Fn(&RgbTile) -> RawDetections,
{
    fn detect(&self, tile: &RgbTile) -> RawDetections {
        self(tile)
    }
}

/// Keep detections scoring at or above `threshold`.
///
/// An empty result means "no detections for this tile", which is a normal
/// outcome, not an error. Mismatched parallel array lengths are truncated
/// to the shortest with a warning.
pub fn filter_by_score(raw: &RawDetections, threshold: f32) -> DetectionSet {
    let n = raw.boxes.len().min(raw.scores.len()).min(raw.classes.len());
    if n < raw.boxes.len() || n < raw.scores.len() || n < raw.classes.len() {
        log::warn!(
            "detector returned ragged output ({} boxes, {} scores, {} classes); truncating to {}",
            raw.boxes.len(),
            raw.scores.len(),
            raw.classes.len(),
            n
        );
    }

    (0..n)
        .filter(|&i| raw.scores[i] >= threshold)
        .map(|i| Detection::new(raw.boxes[i], raw.scores[i], raw.classes[i]))
        .collect()
}
