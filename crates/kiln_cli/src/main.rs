//! Kiln - renders a sphere scene to a PNG.

mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use kiln_core::WorkerPool;
use kiln_renderer::{render_frame, CameraRegistry, Framebuffer, SceneDescription};
use output::PngSink;
use std::time::Instant;

fn load_scene(args: &Args) -> Result<SceneDescription> {
    let mut scene = match &args.scene {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read scene {}", path.display()))?;
            SceneDescription::from_json(&json)
                .with_context(|| format!("Failed to parse scene {}", path.display()))?
        }
        None => {
            log::info!("No scene given, rendering the demo scene");
            SceneDescription::demo()
        }
    };

    if let Some(width) = args.width {
        scene.camera.image_width = width;
    }
    if let Some(samples) = args.samples {
        scene.camera.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        scene.camera.max_depth = depth;
    }

    Ok(scene)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Kiln");

    let scene = load_scene(&args)?;
    let spheres = scene.build_spheres()?;

    let mut registry = CameraRegistry::default();
    let handle = registry
        .create_camera(scene.camera)
        .context("Failed to create camera")?;
    let camera = registry.get(handle)?;
    log::info!(
        "Image resolution: {}x{}, {} samples per pixel, max depth {}, {} spheres",
        camera.image_width,
        camera.image_height,
        camera.samples_per_pixel,
        camera.max_depth,
        spheres.len()
    );

    let mut framebuffer = Framebuffer::new(camera.image_width, camera.image_height)?;
    let pool = WorkerPool::default();

    let start = Instant::now();
    for frame in 0..args.frames {
        let seed = args.seed.wrapping_add(frame as u64);
        let stats = render_frame(&pool, &registry, handle, &spheres, &mut framebuffer, seed)
            .with_context(|| format!("Frame {} failed", frame))?;
        log::info!(
            "Frame {}/{} took {:.3}s ({:.3}s total)",
            frame + 1,
            args.frames,
            stats.elapsed.as_secs_f64(),
            start.elapsed().as_secs_f64()
        );
    }

    if args.frames == 0 {
        log::warn!("No frames rendered, nothing to write");
        return Ok(());
    }

    let mut sink = PngSink::new(&args.output);
    framebuffer
        .present(&mut sink)
        .with_context(|| format!("Failed to present frame to {}", sink.path().display()))?;

    Ok(())
}
