use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with coordinates normalized to `[0, 1]`
/// relative to some reference frame (a tile or the full image).
///
/// Component order is `(ymin, xmin, ymax, xmax)`, matching the layout
/// produced by common detection models.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormBox {
    pub ymin: f32,
    pub xmin: f32,
    pub ymax: f32,
    pub xmax: f32,
}

impl NormBox {
    pub fn new(ymin: f32, xmin: f32, ymax: f32, xmax: f32) -> Self {
        Self {
            ymin,
            xmin,
            ymax,
            xmax,
        }
    }

    /// Box area in normalized units. Negative extents clamp to zero.
    #[inline]
    pub fn area(&self) -> f32 {
        let w = (self.xmax - self.xmin).max(0.0);
        let h = (self.ymax - self.ymin).max(0.0);
        w * h
    }

    /// Intersection over union with another box in the same frame.
    ///
    /// Identical boxes have IoU 1 even when degenerate; otherwise a
    /// zero-area box has IoU 0 with everything.
    pub fn iou(&self, other: &Self) -> f32 {
        if self == other {
            return 1.0;
        }

        let ix = (self.xmax.min(other.xmax) - self.xmin.max(other.xmin)).max(0.0);
        let iy = (self.ymax.min(other.ymax) - self.ymin.max(other.ymin)).max(0.0);
        let intersection = ix * iy;
        if intersection <= 0.0 {
            return 0.0;
        }

        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// A single detected object: box, confidence score and class label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: NormBox,
    pub score: f32,
    pub class_id: i64,
}

impl Detection {
    pub fn new(bbox: NormBox, score: f32, class_id: i64) -> Self {
        Self {
            bbox,
            score,
            class_id,
        }
    }
}

/// Ordered collection of detections. Order is irrelevant for correctness
/// but stable within one pipeline invocation.
pub type DetectionSet = Vec<Detection>;
