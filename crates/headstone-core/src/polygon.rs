//! Headstone bounding quadrilaterals and the persisted annotation record.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::bbox::NormBox;
use crate::worldfile::{WorldFile, WorldFileError};

/// Four-vertex bounding quadrilateral in pixel space, plus the optional
/// cemetery metadata attached by the operator.
///
/// Vertices are ordered top-left, top-right, bottom-right, bottom-left
/// (y grows downward). Polygons are plain values: editing replaces the
/// whole polygon rather than mutating shared graph state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: [Point2<f64>; 4],
    pub id: Option<i64>,
    pub row: Option<i64>,
    pub col: Option<i64>,
}

impl Polygon {
    pub fn new(points: [Point2<f64>; 4]) -> Self {
        Self {
            points,
            id: None,
            row: None,
            col: None,
        }
    }

    /// Build the axis-aligned quadrilateral for a full-image-normalized
    /// detection box, given the image pixel size.
    pub fn from_norm_box(bbox: &NormBox, width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let xmin = f64::from(bbox.xmin) * w;
        let xmax = f64::from(bbox.xmax) * w;
        let ymin = f64::from(bbox.ymin) * h;
        let ymax = f64::from(bbox.ymax) * h;
        Self::new([
            Point2::new(xmin, ymin),
            Point2::new(xmax, ymin),
            Point2::new(xmax, ymax),
            Point2::new(xmin, ymax),
        ])
    }

    /// Vertex mean.
    pub fn centroid(&self) -> Point2<f64> {
        let sum = self
            .points
            .iter()
            .fold(Point2::new(0.0, 0.0), |acc, p| Point2::new(acc.x + p.x, acc.y + p.y));
        Point2::new(sum.x / 4.0, sum.y / 4.0)
    }

    /// A copy shifted by `(dx, dy)` pixels.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut out = *self;
        for p in &mut out.points {
            p.x += dx;
            p.y += dy;
        }
        out
    }

    /// A copy rotated about its centroid by `degrees` (positive is
    /// clockwise in screen coordinates).
    pub fn rotated(&self, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        let origin = self.centroid();

        let mut out = *self;
        for p in &mut out.points {
            let dx = p.x - origin.x;
            let dy = p.y - origin.y;
            p.x = origin.x + dx * cos - dy * sin;
            p.y = origin.y + dx * sin + dy * cos;
        }
        out
    }

    /// Convert to the persisted record, applying the world transform to
    /// each corner and the centroid when one is available.
    pub fn to_record(&self, transform: Option<&WorldFile>) -> AnnotationRecord {
        let map = |p: Point2<f64>| transform.map_or(p, |wf| wf.to_world(p));
        let [topl, topr, botr, botl] = self.points.map(map);
        let centroid = map(self.centroid());
        AnnotationRecord {
            id: self.id,
            row: self.row,
            col: self.col,
            toplx: topl.x,
            toply: topl.y,
            toprx: topr.x,
            topry: topr.y,
            botlx: botl.x,
            botly: botl.y,
            botrx: botr.x,
            botry: botr.y,
            centroidx: centroid.x,
            centroidy: centroid.y,
        }
    }

    /// Rebuild a polygon from a persisted record, mapping world corners
    /// back to pixel space when a transform is available.
    ///
    /// # Errors
    ///
    /// Returns [`WorldFileError::DegenerateTransform`] if the transform
    /// cannot be inverted.
    pub fn from_record(
        record: &AnnotationRecord,
        transform: Option<&WorldFile>,
    ) -> Result<Self, WorldFileError> {
        let corners = [
            Point2::new(record.toplx, record.toply),
            Point2::new(record.toprx, record.topry),
            Point2::new(record.botrx, record.botry),
            Point2::new(record.botlx, record.botly),
        ];
        let points = match transform {
            Some(wf) => {
                let mut out = [Point2::new(0.0, 0.0); 4];
                for (dst, src) in out.iter_mut().zip(corners) {
                    *dst = wf.to_pixel(src)?;
                }
                out
            }
            None => corners,
        };
        Ok(Self {
            points,
            id: record.id,
            row: record.row,
            col: record.col,
        })
    }
}

/// Flat record consumed by the storage and export collaborators.
///
/// Corner and centroid coordinates are world coordinates when the session
/// has a transform, pixel coordinates otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: Option<i64>,
    pub row: Option<i64>,
    pub col: Option<i64>,
    pub toplx: f64,
    pub toply: f64,
    pub toprx: f64,
    pub topry: f64,
    pub botlx: f64,
    pub botly: f64,
    pub botrx: f64,
    pub botry: f64,
    pub centroidx: f64,
    pub centroidy: f64,
}
