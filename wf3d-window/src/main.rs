/// WF3D - software wireframe renderer in a window
///
/// Controls:
///   - 1-4: Camera presets (camera demo)
///   - ESC / close button: Quit
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use wf3d_core::{Demo, FileLoader, Scene};
use wf3d_window::{WindowApp, WindowConfig};

const DEFAULT_LOGGING_LEVEL: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "wf3d", about = "Software wireframe transform pipeline")]
struct Args {
    /// Which pipeline stage to show: pixels, clip, view, world, camera or model
    #[arg(short, long, default_value = "camera")]
    demo: Demo,

    /// Mesh file for the model demo (.obj or .stl)
    #[arg(short, long, default_value = "models/pyramid.obj")]
    model: PathBuf,

    #[arg(long, default_value_t = 1200)]
    width: usize,

    #[arg(long, default_value_t = 800)]
    height: usize,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = wf3d_core::projection::DEFAULT_FOVY_DEGREES)]
    fov: f32,

    /// Print the frame rate of every frame
    #[arg(long)]
    log_fps: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();
    let args = Args::parse();

    // Load before opening the window so a bad asset never leaves one behind
    let scene = Scene::load(args.demo, &FileLoader, &args.model)
        .with_context(|| format!("failed to load {}", args.model.display()))?;
    log::info!("starting {} demo ({} objects)", args.demo, scene.state.objects.len());

    let defaults = WindowConfig::default();
    let config = WindowConfig {
        title: format!("wf3d - {}", args.demo),
        width: args.width,
        height: args.height,
        fovy_degrees: args.fov,
        log_fps: defaults.log_fps || args.log_fps,
        ..defaults
    };

    let mut app = WindowApp::new(scene, config).context("failed to open window")?;
    app.run().context("failed to present frame")?;
    Ok(())
}
