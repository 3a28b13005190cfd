//! Flatfill: rasterize a scene (or load an image) once, then show it in a window
//! until a key is pressed or the quit box is clicked.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use macroquad::prelude::next_frame;

use flatfill::app;
use flatfill::config::{load_config, SceneConfig, Source};
use flatfill::display::{window_conf, DisplayContext, Event, QuitReason, WindowDisplay};
use flatfill::rasterizer::ImageBuffer;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scene file (RON). The built-in demo scene is used when omitted
    config: Option<PathBuf>,

    /// Show this RGBA8 image instead of the scene's source
    #[arg(long)]
    image: Option<PathBuf>,

    /// Run without a window: one redraw, then quit
    #[arg(long)]
    headless: bool,

    /// Write the displayed frame as PNG (headless runs)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(image) = args.image {
        config.source = Source::Image(image);
    }
    if let Some(output) = args.output {
        config.output = Some(output);
    }

    if args.headless {
        let run = app::run_headless(&config, [Event::Redraw, Event::KeyPress(0)])
            .context("Headless run failed")?;
        info!("Headless run finished after {} redraws ({:?})", run.redraws, run.quit);
        return Ok(());
    }

    // Build the frame before opening the window so load errors exit cleanly
    let frame = app::build_frame(&config).context("Failed to build frame")?;

    info!("=== flatfill ===");
    macroquad::Window::from_config(window_conf(&config.window), show(config, frame));
    Ok(())
}

async fn show(config: SceneConfig, frame: ImageBuffer) {
    match window_loop(&config, frame).await {
        Ok(reason) => info!("Quit: {:?}", reason),
        Err(e) => {
            error!("Display failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn window_loop(config: &SceneConfig, frame: ImageBuffer) -> flatfill::Result<QuitReason> {
    let backend = WindowDisplay::new(config.window.width, config.window.height, config.caption.clone())?;
    let mut ctx = DisplayContext::open(backend);
    ctx.activate()?;

    let mut rl = app::render_loop(config, frame);
    let reason = loop {
        ctx.backend_mut().poll_input();
        if let Some(reason) = rl.drain(&mut ctx)? {
            break reason;
        }
        next_frame().await;
    };

    rl.into_image().release();
    ctx.close();
    Ok(reason)
}
