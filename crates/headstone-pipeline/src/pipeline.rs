//! Orchestration of the tile / detect / rescale / merge / suppress steps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use headstone_core::{DetectionSet, RgbImageView};
use serde::{Deserialize, Serialize};

use crate::nms::suppress;
use crate::rescale::rescale_box;
use crate::runner::{filter_by_score, TileDetector};
use crate::tiler::{crop_padded, TileGrid, TilingError, TilingParams};

/// Errors fatal to a pipeline invocation. Everything else (empty tiles,
/// cancellation) is a normal outcome carried in [`PipelineRun`].
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Tiling(#[from] TilingError),
}

/// Full parameter set for one detection run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub tiling: TilingParams,
    /// Discard boxes below this confidence.
    pub confidence_threshold: f32,
    /// Suppress boxes overlapping a better one at or above this IoU.
    pub iou_threshold: f32,
    /// Safety cap on the suppressed output size.
    pub max_detections: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            tiling: TilingParams::default(),
            confidence_threshold: 0.45,
            iou_threshold: 0.15,
            max_detections: 50_000,
        }
    }
}

/// Cooperative cancellation flag, checked once per tile.
///
/// Clones share the flag, so a UI thread can hold one half while the
/// pipeline polls the other.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Per-tile progress callback.
pub trait ProgressObserver {
    /// Called after each tile with `(completed, total)` tile counts.
    fn tile_done(&mut self, completed: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize),
{
    fn tile_done(&mut self, completed: usize, total: usize) {
        self(completed, total);
    }
}

/// No-op observer for callers that do not track progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn tile_done(&mut self, _completed: usize, _total: usize) {}
}

/// Outcome of one pipeline run.
///
/// On cancellation the detections cover only the tiles processed so far;
/// the result is valid but partial and `cancelled` is set.
#[derive(Clone, Debug)]
pub struct PipelineRun {
    pub detections: DetectionSet,
    pub cancelled: bool,
    pub tiles_processed: usize,
    pub tiles_total: usize,
}

/// Run the full sliding-window pipeline over one image.
///
/// Tiles are processed one at a time: crop (padded), score through the
/// detector, drop low-confidence boxes and remap the rest into full-image
/// coordinates. The per-tile sets are concatenated with [`crate::merge`]
/// after the tile loop, then greedy NMS prunes duplicates that straddle
/// tile seams.
///
/// The cancel token is polled at each tile boundary; cancellation stops
/// the tile loop but still suppresses and returns what was merged so far.
///
/// # Errors
///
/// Returns [`PipelineError::Tiling`] for invalid image or tile geometry;
/// no partial result exists in that case.
pub fn run_detection(
    image: &RgbImageView<'_>,
    detector: &dyn TileDetector,
    params: &PipelineParams,
    observer: &mut dyn ProgressObserver,
    cancel: &CancelToken,
) -> Result<PipelineRun, PipelineError> {
    let width = u32::try_from(image.width).unwrap_or(u32::MAX);
    let height = u32::try_from(image.height).unwrap_or(u32::MAX);
    let grid = TileGrid::generate(width, height, &params.tiling)?;
    let total = grid.len();

    log::info!(
        "detection pipeline: {}x{} image, {} tiles ({} rows x {} cols)",
        width,
        height,
        total,
        grid.rows(),
        grid.cols()
    );

    let mut per_tile: Vec<DetectionSet> = Vec::new();
    let mut processed = 0usize;
    let mut cancelled = false;

    for spec in &grid {
        if cancel.is_cancelled() {
            cancelled = true;
            log::info!("detection cancelled after {processed}/{total} tiles");
            break;
        }

        let tile = crop_padded(image, spec);
        let raw = detector.detect(&tile);
        let mut kept = filter_by_score(&raw, params.confidence_threshold);
        log::debug!(
            "tile [{}][{}]: {} raw, {} above threshold",
            spec.row,
            spec.col,
            raw.boxes.len(),
            kept.len()
        );

        for d in &mut kept {
            d.bbox = rescale_box(&d.bbox, spec.row, spec.col, width, height, &params.tiling);
        }
        per_tile.push(kept);

        processed += 1;
        observer.tile_done(processed, total);
    }

    let merged = crate::merge(per_tile);
    let candidates = merged.len();
    let detections = suppress(merged, params.iou_threshold, params.max_detections);
    log::info!(
        "pipeline finished: {} candidates, {} after suppression",
        candidates,
        detections.len()
    );

    Ok(PipelineRun {
        detections,
        cancelled,
        tiles_processed: processed,
        tiles_total: total,
    })
}
