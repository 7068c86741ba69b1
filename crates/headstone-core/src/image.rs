/// Borrowed view over an interleaved RGB8 image buffer.
///
/// Row-major, `data.len() = width * height * 3`.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

/// Owned RGB8 image, used for detector input tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbTile {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbTile {
    /// Allocate a black tile of the given size.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 3],
        }
    }

    pub fn as_view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.as_view().pixel(x, y)
    }
}

impl RgbImageView<'_> {
    /// Pixel at `(x, y)`; out-of-bounds reads return black.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
