//! Six-parameter affine georeferencing transform (ESRI world-file model).
//!
//! A world file is six newline-separated decimal numbers, in order
//! `(a, d, b, e, c, f)`, defining
//!
//! ```text
//! world_x = a * px + b * py + c
//! world_y = d * px + e * py + f
//! ```
//!
//! The parameter order on disk is an interchange convention shared with
//! other geospatial tools and must not be reordered.

use std::fs;
use std::path::Path;

use nalgebra::{Matrix2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Determinants below this are treated as singular.
const DET_EPSILON: f64 = 1e-12;

/// Errors from world-file loading and coordinate conversion.
#[derive(thiserror::Error, Debug)]
pub enum WorldFileError {
    #[error("world file has {got} parameter lines, expected 6")]
    WrongLineCount { got: usize },
    #[error("world file line {line} is not a number: {text:?}")]
    NotANumber { line: usize, text: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("affine matrix is singular (det = {det:e}), pixel coordinates unavailable")]
    DegenerateTransform { det: f64 },
}

/// Affine pixel-to-world transform loaded from a world file.
///
/// Immutable for the lifetime of the loaded image. Callers that fail to
/// load one should fall back to pixel-only coordinates rather than abort.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldFile {
    pub a: f64,
    pub d: f64,
    pub b: f64,
    pub e: f64,
    pub c: f64,
    pub f: f64,
}

impl WorldFile {
    /// Build from parameters in world-file order `(a, d, b, e, c, f)`.
    pub fn new(a: f64, d: f64, b: f64, e: f64, c: f64, f: f64) -> Self {
        Self { a, d, b, e, c, f }
    }

    /// Parse the six-line world-file text format.
    ///
    /// Exactly six parameter lines; trailing blank lines are tolerated but
    /// interior ones count against the line total.
    pub fn parse(text: &str) -> Result<Self, WorldFileError> {
        let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.len() != 6 {
            return Err(WorldFileError::WrongLineCount { got: lines.len() });
        }

        let mut values = [0.0f64; 6];
        for (i, line) in lines.iter().enumerate() {
            values[i] = line.parse().map_err(|_| WorldFileError::NotANumber {
                line: i + 1,
                text: (*line).to_owned(),
            })?;
        }

        let [a, d, b, e, c, f] = values;
        Ok(Self::new(a, d, b, e, c, f))
    }

    /// Load and parse a world file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldFileError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// The 2x2 linear part `[[a, b], [d, e]]`.
    fn linear(&self) -> Matrix2<f64> {
        Matrix2::new(self.a, self.b, self.d, self.e)
    }

    /// Map a pixel position to world coordinates. Direct substitution,
    /// always succeeds for finite inputs.
    #[inline]
    pub fn to_world(&self, pixel: Point2<f64>) -> Point2<f64> {
        Point2::new(
            self.a * pixel.x + self.b * pixel.y + self.c,
            self.d * pixel.x + self.e * pixel.y + self.f,
        )
    }

    /// Map world coordinates back to pixel space by inverting the 2x2
    /// linear system.
    ///
    /// # Errors
    ///
    /// Returns [`WorldFileError::DegenerateTransform`] when the matrix is
    /// singular; callers should treat world coordinates as unavailable
    /// instead of propagating `inf`/`NaN` downstream.
    pub fn to_pixel(&self, world: Point2<f64>) -> Result<Point2<f64>, WorldFileError> {
        let m = self.linear();
        let det = m.determinant();
        if det.abs() < DET_EPSILON {
            return Err(WorldFileError::DegenerateTransform { det });
        }
        // try_inverse cannot fail past the determinant check, but keep the
        // error path rather than unwrap.
        let inv = m
            .try_inverse()
            .ok_or(WorldFileError::DegenerateTransform { det })?;
        let rhs = Vector2::new(world.x - self.c, world.y - self.f);
        let px = inv * rhs;
        Ok(Point2::new(px.x, px.y))
    }
}
