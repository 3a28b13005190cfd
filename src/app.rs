//! Application flow: build one frame from the scene, then hand it to a display
//!
//! The frame is produced once and owned by whichever loop shows it. Errors from
//! loading or allocation come back as values so the caller decides how to exit.

use crate::config::{SceneConfig, Source};
use crate::display::{DisplayContext, Event, HeadlessDisplay, QuitReason, RenderLoop};
use crate::error::Result;
use crate::image_io::{load_image, save_png};
use crate::rasterizer::{render_mesh, ImageBuffer, Mesh};

/// Produce the image the loop will show: rasterize the triangle list into a
/// window-sized framebuffer, or decode the configured image file.
pub fn build_frame(config: &SceneConfig) -> Result<ImageBuffer> {
    let mut frame = match &config.source {
        Source::Triangles(vertices) => {
            let mesh = Mesh::new(vertices.clone())?;
            let mut fb = ImageBuffer::allocate(config.window.width, config.window.height)?;
            let stats = render_mesh(&mut fb, &mesh, config.fill, config.fill_mode);
            log::info!(
                "Rasterized {} triangles ({} skipped) at {}x{}",
                stats.triangles,
                stats.skipped,
                fb.width(),
                fb.height()
            );
            fb
        }
        Source::Image(path) => load_image(path)?,
    };

    if let (Some(region), Some(color)) = (config.hit_region, config.marker) {
        // Region is in window space, the frame is drawn at `blit_offset`
        let x = region.x as i64 - config.blit_offset.0 as i64;
        let y = region.y as i64 - config.blit_offset.1 as i64;
        frame.fill_rect(x, y, region.w as u64, region.h as u64, color);
    }

    Ok(frame)
}

/// Set up the loop for a frame according to the scene
pub fn render_loop(config: &SceneConfig, frame: ImageBuffer) -> RenderLoop {
    RenderLoop::new(frame)
        .with_offset(config.blit_offset.0, config.blit_offset.1)
        .with_hit_region(config.hit_region)
}

/// Result of a headless run
#[derive(Debug)]
pub struct HeadlessRun {
    pub quit: Option<QuitReason>,
    pub redraws: usize,
    /// Window contents after the last redraw
    pub surface: ImageBuffer,
}

/// Drive the loop against an offscreen display fed by `events`
pub fn run_headless(config: &SceneConfig, events: impl IntoIterator<Item = Event>) -> Result<HeadlessRun> {
    let frame = build_frame(config)?;
    let backend = HeadlessDisplay::new(config.window.width, config.window.height)?.with_events(events);

    let mut ctx = DisplayContext::open(backend);
    ctx.activate()?;

    let mut rl = render_loop(config, frame);
    let quit = rl.drain(&mut ctx)?;
    let redraws = rl.redraws();
    rl.into_image().release();

    ctx.close();
    let backend = ctx.into_backend();
    let surface = backend.snapshot();

    if let Some(path) = &config.output {
        save_png(&surface, path)?;
    }

    Ok(HeadlessRun {
        quit,
        redraws,
        surface,
    })
}
