//! Tile partitioning and the framebuffer the tiles render into.
//!
//! The image is divided into a fixed 4x4 grid of tiles. Each tile gets a
//! [`TileView`], a disjoint mutable window into the framebuffer, so tiles can
//! be rendered on separate threads without locking.

use crate::sink::FramebufferSink;
use crate::RenderError;

/// Number of tiles along each image axis.
pub const TILE_GRID_DIM: u32 = 4;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Row-major position of this tile in its grid
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Tiles of images smaller than the grid can cover nothing.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Offset and length of span `i` when `len` pixels are split `dim` ways.
///
/// Every span gets `len / dim` pixels and the last one also takes the remainder.
fn span(len: u32, dim: u32, i: u32) -> (u32, u32) {
    let base = len / dim;
    let start = base * i;
    if i + 1 == dim {
        (start, len - start)
    } else {
        (start, base)
    }
}

/// Which span of `len` split `dim` ways contains `pos`.
fn span_of(pos: u32, len: u32, dim: u32) -> u32 {
    let base = len / dim;
    if base == 0 {
        dim - 1
    } else {
        (pos / base).min(dim - 1)
    }
}

/// The tiles covering a `width` x `height` image.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    dim: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Split an image into a [`TILE_GRID_DIM`] x [`TILE_GRID_DIM`] grid.
    pub fn partition(width: u32, height: u32) -> Self {
        Self::with_dim(width, height, TILE_GRID_DIM)
    }

    /// Split an image into a `dim` x `dim` grid, listed row-major.
    ///
    /// A `dim` of zero is treated as one.
    pub fn with_dim(width: u32, height: u32, dim: u32) -> Self {
        let dim = dim.max(1);
        let mut tiles = Vec::with_capacity((dim * dim) as usize);

        for row in 0..dim {
            let (y, tile_height) = span(height, dim, row);
            for column in 0..dim {
                let (x, tile_width) = span(width, dim, column);
                tiles.push(Tile::new(x, y, tile_width, tile_height, tiles.len()));
            }
        }

        Self {
            width,
            height,
            dim,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tiles along each axis.
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// All tiles, including empty ones, in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles that cover at least one pixel.
    pub fn non_empty(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|tile| !tile.is_empty())
    }
}

/// Packed `0xAARRGGBB` pixels, row-major from the top of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Framebuffer {
    /// Allocate a zeroed framebuffer.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel word at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel words viewed as bytes in native byte order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * std::mem::size_of::<u32>()
    }

    pub fn byte_size(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// Set every pixel to `word`.
    pub fn fill(&mut self, word: u32) {
        self.pixels.fill(word);
    }

    /// Split the framebuffer into one disjoint view per tile of `grid`.
    ///
    /// Views are returned in tile index order.
    pub fn split_tiles(&mut self, grid: &TileGrid) -> Result<Vec<TileView<'_>>, RenderError> {
        if grid.width() != self.width || grid.height() != self.height {
            return Err(RenderError::FramebufferMismatch {
                expected_width: grid.width(),
                expected_height: grid.height(),
                actual_width: self.width,
                actual_height: self.height,
            });
        }

        let mut views: Vec<TileView<'_>> = grid
            .tiles()
            .iter()
            .map(|tile| TileView {
                tile: *tile,
                rows: Vec::with_capacity(tile.height as usize),
            })
            .collect();

        if self.width == 0 {
            return Ok(views);
        }

        let dim = grid.dim() as usize;
        for (y, row) in self.pixels.chunks_exact_mut(self.width as usize).enumerate() {
            let tile_row = span_of(y as u32, self.height, grid.dim()) as usize;
            let mut rest = row;
            for view in &mut views[tile_row * dim..(tile_row + 1) * dim] {
                let (segment, tail) = std::mem::take(&mut rest).split_at_mut(view.tile.width as usize);
                view.rows.push(segment);
                rest = tail;
            }
        }

        Ok(views)
    }

    /// Hand the finished frame to a presentation sink.
    pub fn present<S: FramebufferSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.submit_framebuffer(self.width, self.height, self.byte_size(), self.as_bytes())
    }
}

/// Mutable window onto the pixels of one tile.
#[derive(Debug)]
pub struct TileView<'a> {
    tile: Tile,
    rows: Vec<&'a mut [u32]>,
}

impl<'a> TileView<'a> {
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn width(&self) -> u32 {
        self.tile.width
    }

    pub fn height(&self) -> u32 {
        self.tile.height
    }

    /// Write a pixel in tile-local coordinates.
    ///
    /// # Panics
    ///
    /// Panics if (local_x, local_y) is outside the tile.
    pub fn set(&mut self, local_x: u32, local_y: u32, word: u32) {
        self.rows[local_y as usize][local_x as usize] = word;
    }

    /// Read a pixel in tile-local coordinates.
    pub fn get(&self, local_x: u32, local_y: u32) -> Option<u32> {
        self.rows
            .get(local_y as usize)
            .and_then(|row| row.get(local_x as usize))
            .copied()
    }

    /// Rows of the tile from top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::IterMut<'_, &'a mut [u32]> {
        self.rows.iter_mut()
    }
}
