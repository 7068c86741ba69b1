//! Overlapping tile grid generation and padded cropping.

use headstone_core::{RgbImageView, RgbTile};
use serde::{Deserialize, Serialize};

/// Errors from tile grid construction.
#[derive(thiserror::Error, Debug)]
pub enum TilingError {
    #[error(
        "invalid tiling parameters (image {width}x{height}, tile {tile_width}x{tile_height}, stride {stride})"
    )]
    InvalidParameters {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        stride: u32,
    },
}

/// Tile size and stride for the sliding window.
///
/// A stride smaller than the tile size makes adjacent tiles overlap, which
/// keeps objects near tile seams fully visible in at least one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingParams {
    pub tile_width: u32,
    pub tile_height: u32,
    pub stride: u32,
}

impl Default for TilingParams {
    /// 320x320 tiles with a 300 px stride, the detector's native input
    /// size with 20 px of seam overlap.
    fn default() -> Self {
        Self {
            tile_width: 320,
            tile_height: 320,
            stride: 300,
        }
    }
}

/// One tile's placement within the full image.
///
/// `row`/`col` are zero-based grid indices; `top`/`left` are pixel offsets.
/// The nominal window `[left, left+width) x [top, top+height)` may extend
/// past the image edge; cropping pads the out-of-range region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub row: u32,
    pub col: u32,
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

/// Row-major grid of tile placements covering the full image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    rows: u32,
    cols: u32,
    tiles: Vec<TileSpec>,
}

impl TileGrid {
    /// Lay out a sliding-window grid over a `width x height` image.
    ///
    /// Tiles advance by `stride` in both axes starting from the top-left
    /// corner; the sweep continues while the origin is inside the image,
    /// so `rows = ceil(height / stride)` and `cols = ceil(width / stride)`.
    /// Output order is raster order (rows outer, columns inner), which the
    /// rescaling math relies on.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::InvalidParameters`] when any dimension or the
    /// stride is zero. This is fatal to the pipeline invocation.
    pub fn generate(width: u32, height: u32, params: &TilingParams) -> Result<Self, TilingError> {
        if width == 0
            || height == 0
            || params.tile_width == 0
            || params.tile_height == 0
            || params.stride == 0
        {
            return Err(TilingError::InvalidParameters {
                width,
                height,
                tile_width: params.tile_width,
                tile_height: params.tile_height,
                stride: params.stride,
            });
        }

        let rows = height.div_ceil(params.stride);
        let cols = width.div_ceil(params.stride);

        let mut tiles = Vec::with_capacity(rows as usize * cols as usize);
        let mut top = 0u32;
        let mut row = 0u32;
        while top < height {
            let mut left = 0u32;
            let mut col = 0u32;
            while left < width {
                tiles.push(TileSpec {
                    row,
                    col,
                    top,
                    left,
                    width: params.tile_width,
                    height: params.tile_height,
                });
                left += params.stride;
                col += 1;
            }
            top += params.stride;
            row += 1;
        }

        debug_assert_eq!(tiles.len(), rows as usize * cols as usize);
        Ok(Self { rows, cols, tiles })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in raster order.
    pub fn iter(&self) -> impl Iterator<Item = &TileSpec> {
        self.tiles.iter()
    }
}

impl<'a> IntoIterator for &'a TileGrid {
    type Item = &'a TileSpec;
    type IntoIter = std::slice::Iter<'a, TileSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// Crop one tile out of the image, padding with black where the nominal
/// window extends past the right or bottom edge.
///
/// The output is always exactly `spec.width x spec.height`, with the valid
/// sub-region pasted at offset `(0, 0)` -- the detector requires a fixed
/// input size regardless of where the tile falls.
pub fn crop_padded(image: &RgbImageView<'_>, spec: &TileSpec) -> RgbTile {
    let mut tile = RgbTile::blank(spec.width as usize, spec.height as usize);

    let valid_w = (image.width.saturating_sub(spec.left as usize)).min(spec.width as usize);
    let valid_h = (image.height.saturating_sub(spec.top as usize)).min(spec.height as usize);
    // a window entirely past an edge has nothing to copy; skip the row
    // loop so its source offsets are never formed
    if valid_w == 0 || valid_h == 0 {
        return tile;
    }

    for dy in 0..valid_h {
        let src_y = spec.top as usize + dy;
        let src_start = (src_y * image.width + spec.left as usize) * 3;
        let dst_start = dy * spec.width as usize * 3;
        let n = valid_w * 3;
        tile.data[dst_start..dst_start + n]
            .copy_from_slice(&image.data[src_start..src_start + n]);
    }

    tile
}
