//! Sliding-window detection pipeline for oversized aerial images.
//!
//! The detector has a fixed input size, so large images are split into a
//! grid of overlapping tiles, each tile is scored independently, per-tile
//! boxes are remapped into full-image coordinates, and duplicates across
//! tile seams are pruned with greedy non-maximum suppression.
//!
//! The detection model itself stays behind the [`TileDetector`] trait, so
//! the pipeline runs against a deterministic fake in tests.

mod nms;
mod pipeline;
mod rescale;
mod runner;
mod tiler;

pub use nms::suppress;
pub use pipeline::{
    run_detection, CancelToken, NoProgress, PipelineError, PipelineParams, PipelineRun,
    ProgressObserver,
};
pub use rescale::rescale_box;
pub use runner::{filter_by_score, RawDetections, TileDetector};
pub use tiler::{crop_padded, TileGrid, TileSpec, TilingError, TilingParams};

/// Order-preserving concatenation of per-tile detection sets.
///
/// Tolerates an empty input and ragged set sizes; no deduplication happens
/// here (that is NMS's job, after all tiles are in).
pub fn merge(sets: impl IntoIterator<Item = headstone_core::DetectionSet>) -> headstone_core::DetectionSet {
    let mut out = Vec::new();
    for set in sets {
        out.extend(set);
    }
    out
}
