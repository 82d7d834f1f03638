//! Frame dispatch: one worker per tile, joined before the frame is returned.

use crate::renderer::{color_to_argb, render_pixel};
use crate::tile::{TileGrid, TileView, TILE_GRID_DIM};
use crate::{Camera, CameraHandle, CameraRegistry, Framebuffer, RenderError, Sphere};
use kiln_core::{JobDescriptor, PoolError, WorkerPool};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Everything one worker needs to render its tile.
pub struct RenderTile<'a> {
    pub camera: &'a Camera,
    pub scene: &'a [Sphere<'a>],
    pub view: TileView<'a>,
    pub seed: u64,
}

/// Seed of the RNG for tile `tile_index` of a frame rendered with `frame_seed`.
///
/// Distinct (frame seed, tile) pairs get distinct seeds.
pub fn tile_seed(frame_seed: u64, tile_index: usize) -> u64 {
    let tiles_per_frame = (TILE_GRID_DIM * TILE_GRID_DIM) as u64;
    frame_seed
        .wrapping_mul(tiles_per_frame)
        .wrapping_add(tile_index as u64)
}

/// Render every pixel of a tile into its view.
pub fn render_tile(mut job: RenderTile<'_>) {
    let tile = *job.view.tile();
    let mut rng = StdRng::seed_from_u64(job.seed);
    log::trace!(
        "Tile {} ({}x{} at {},{}) started",
        tile.index,
        tile.width,
        tile.height,
        tile.x,
        tile.y
    );

    for (local_y, row) in job.view.rows_mut().enumerate() {
        let y = tile.y + local_y as u32;
        for (local_x, pixel) in row.iter_mut().enumerate() {
            let x = tile.x + local_x as u32;
            let color = render_pixel(job.camera, job.scene, x, y, &mut rng);
            *pixel = color_to_argb(color);
        }
    }

    log::trace!("Tile {} finished", tile.index);
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Tiles that covered at least one pixel
    pub tiles: usize,
    pub pixels: u64,
    /// Camera rays traced, not counting bounces
    pub samples: u64,
    pub elapsed: Duration,
}

/// Render one frame of `scene` seen through camera `handle` into `framebuffer`.
///
/// Returns once every tile worker has finished. On error the framebuffer
/// contents are unspecified and must not be presented.
pub fn render_frame(
    pool: &WorkerPool,
    registry: &CameraRegistry,
    handle: CameraHandle,
    scene: &[Sphere<'_>],
    framebuffer: &mut Framebuffer,
    seed: u64,
) -> Result<FrameStats, RenderError> {
    let start = Instant::now();
    let camera = registry.get(handle)?;

    if framebuffer.width() != camera.image_width || framebuffer.height() != camera.image_height {
        return Err(RenderError::FramebufferMismatch {
            expected_width: camera.image_width,
            expected_height: camera.image_height,
            actual_width: framebuffer.width(),
            actual_height: framebuffer.height(),
        });
    }

    let grid = TileGrid::partition(camera.image_width, camera.image_height);
    let tiles: Vec<RenderTile<'_>> = framebuffer
        .split_tiles(&grid)?
        .into_iter()
        .filter(|view| !view.tile().is_empty())
        .map(|view| RenderTile {
            camera,
            scene,
            seed: tile_seed(seed, view.tile().index),
            view,
        })
        .collect();

    let tile_count = tiles.len();
    let job = JobDescriptor::with_args(render_tile, tiles)?;
    log::debug!(
        "Dispatching {} tiles for {}x{} frame (seed {})",
        tile_count,
        camera.image_width,
        camera.image_height,
        seed
    );

    pool.scope(move |scope| -> Result<(), PoolError> {
        let ticket = scope.submit(job)?;
        scope.join(ticket)
    })?;

    let pixels = camera.image_width as u64 * camera.image_height as u64;
    let stats = FrameStats {
        tiles: tile_count,
        pixels,
        samples: pixels * camera.samples_per_pixel as u64,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Rendered {}x{} frame: {} tiles, {} samples in {:.2?}",
        camera.image_width,
        camera.image_height,
        stats.tiles,
        stats.samples,
        stats.elapsed
    );

    Ok(stats)
}
