//! Annotation of cemetery aerial photos with headstone bounding polygons.
//!
//! This is the entry-point crate: it bridges `image`-crate rasters into
//! the detection pipeline, turns pipeline output into editable polygons,
//! and owns the [`AnnotationSession`] value model that the editor and
//! storage collaborators work against.
//!
//! ```no_run
//! use headstone_annot::{detect_headstones, AnnotationSession};
//! use headstone_pipeline::{CancelToken, NoProgress, PipelineParams, RawDetections};
//! use headstone_core::RgbTile;
//!
//! # fn run(model: impl Fn(&RgbTile) -> RawDetections) -> Result<(), Box<dyn std::error::Error>> {
//! let photo = image::open("cemetery.tif")?;
//! let outcome = detect_headstones(
//!     &photo,
//!     &model,
//!     &PipelineParams::default(),
//!     &mut NoProgress,
//!     &CancelToken::new(),
//! )?;
//!
//! let mut session = AnnotationSession::new(photo.width(), photo.height());
//! session.load_transform("cemetery.tfw");
//! session.adopt_detections(&outcome.polygons);
//! let records = session.export_records()?;
//! # Ok(())
//! # }
//! ```

mod detect;
mod session;

pub use detect::{detect_headstones, ensure_rgb, rgb_view, DetectionOutcome};
pub use session::{AnnotationSession, SessionError};

pub use headstone_core::{
    AnnotationRecord, Detection, DetectionSet, NormBox, Polygon, RgbImageView, RgbTile, WorldFile,
    WorldFileError,
};
pub use headstone_pipeline::{
    CancelToken, NoProgress, PipelineError, PipelineParams, PipelineRun, ProgressObserver,
    RawDetections, TileDetector, TileGrid, TileSpec, TilingError, TilingParams,
};
