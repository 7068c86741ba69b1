//! `image`-crate bridging for the detection pipeline.

use image::DynamicImage;

use headstone_core::{DetectionSet, Polygon, RgbImageView};
use headstone_pipeline::{
    run_detection, CancelToken, PipelineError, PipelineParams, ProgressObserver, TileDetector,
};

/// Convert an `image::RgbImage` into the lightweight buffer view the
/// pipeline works on.
pub fn rgb_view(img: &image::RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Normalize any decoded raster to 3-channel RGB.
///
/// The detector's input contract is fixed 3-channel color, so grayscale,
/// paletted and alpha sources are converted up front, before tiling.
pub fn ensure_rgb(img: &DynamicImage) -> image::RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        other => other.to_rgb8(),
    }
}

/// Detection results in both normalized-box and pixel-polygon form.
#[derive(Clone, Debug)]
pub struct DetectionOutcome {
    /// Final suppressed detections, full-image normalized.
    pub detections: DetectionSet,
    /// The same detections as pixel-space quadrilaterals, ready for the
    /// editor or a session.
    pub polygons: Vec<Polygon>,
    /// True when the run was cancelled and the result is partial.
    pub cancelled: bool,
}

/// Run the sliding-window detection pipeline over a full photo.
///
/// # Errors
///
/// Returns [`PipelineError`] for invalid tiling geometry (zero-sized
/// image or degenerate parameters); cancellation is not an error.
pub fn detect_headstones(
    photo: &DynamicImage,
    detector: &dyn TileDetector,
    params: &PipelineParams,
    observer: &mut dyn ProgressObserver,
    cancel: &CancelToken,
) -> Result<DetectionOutcome, PipelineError> {
    let rgb = ensure_rgb(photo);
    let view = rgb_view(&rgb);
    let run = run_detection(&view, detector, params, observer, cancel)?;

    let polygons = run
        .detections
        .iter()
        .map(|d| Polygon::from_norm_box(&d.bbox, photo.width(), photo.height()))
        .collect();

    Ok(DetectionOutcome {
        detections: run.detections,
        polygons,
        cancelled: run.cancelled,
    })
}
