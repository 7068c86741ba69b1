//! Greedy non-maximum suppression over the merged detection set.

use headstone_core::{Detection, DetectionSet};

/// Deduplicate overlapping detections.
///
/// Detections are sorted by score descending (stable, so equal scores keep
/// their original relative order); the best remaining box is kept and
/// every other box with IoU at or above `iou_threshold` against it is
/// dropped. `max_output` is a safety bound only and should be generous --
/// it never matters for realistic detection counts.
pub fn suppress(detections: DetectionSet, iou_threshold: f32, max_output: usize) -> DetectionSet {
    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| {
        detections[b]
            .score
            .partial_cmp(&detections[a].score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    let mut suppressed = vec![false; detections.len()];

    for &i in &order {
        if suppressed[i] {
            continue;
        }
        if kept.len() >= max_output {
            break;
        }
        let best = detections[i];
        kept.push(best);
        for &j in &order {
            if j != i && !suppressed[j] && best.bbox.iou(&detections[j].bbox) >= iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    kept
}
