//! Core types and utilities for headstone annotation.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete detection model or image codec: detections are
//! plain normalized boxes, images are lightweight RGB buffer views, and the
//! world-file transform is a six-parameter affine model.

mod bbox;
mod image;
mod logger;
mod polygon;
mod worldfile;

pub use bbox::{Detection, DetectionSet, NormBox};
pub use image::{RgbImageView, RgbTile};
pub use polygon::{AnnotationRecord, Polygon};
pub use worldfile::{WorldFile, WorldFileError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_LEVEL_ENV};
