//! Reprojection of tile-local detection boxes into full-image coordinates.

use headstone_core::NormBox;

use crate::tiler::TilingParams;

/// Remap a box normalized to one tile's extent into the full image's
/// normalized frame.
///
/// Tile origins sit at `index * stride` in pixel space and the box is
/// stored as fractions of the tile's own size, so each axis is an affine
/// reprojection:
///
/// ```text
/// out = in * (tile_dim / full_dim) + index * stride / full_dim
/// ```
///
/// No clamping to `[0, 1]` happens here: for a valid tiling the result is
/// in range by construction, and an out-of-range output means the caller
/// passed inconsistent tile parameters.
pub fn rescale_box(
    bbox: &NormBox,
    row: u32,
    col: u32,
    full_width: u32,
    full_height: u32,
    params: &TilingParams,
) -> NormBox {
    let sx = params.tile_width as f32 / full_width as f32;
    let sy = params.tile_height as f32 / full_height as f32;
    let ox = (col * params.stride) as f32 / full_width as f32;
    let oy = (row * params.stride) as f32 / full_height as f32;

    NormBox::new(
        bbox.ymin * sy + oy,
        bbox.xmin * sx + ox,
        bbox.ymax * sy + oy,
        bbox.xmax * sx + ox,
    )
}
