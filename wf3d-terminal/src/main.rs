/// WF3D Terminal Demo
///
/// Renders the wireframe scenes as characters.
/// Controls:
///   - 1-4: Camera presets (camera demo)
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use wf3d_core::{Demo, FileLoader, Scene};
use wf3d_terminal::TerminalApp;

// Logging goes to stderr, which the alternate screen would garble at "info"
const DEFAULT_LOGGING_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "wf3d-terminal", about = "Wireframe transform pipeline in the terminal")]
struct Args {
    /// Which pipeline stage to show: pixels, clip, view, world, camera or model
    #[arg(short, long, default_value = "camera")]
    demo: Demo,

    /// Mesh file for the model demo (.obj or .stl)
    #[arg(short, long, default_value = "models/pyramid.obj")]
    model: PathBuf,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = wf3d_core::projection::DEFAULT_FOVY_DEGREES)]
    fov: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();
    let args = Args::parse();

    let scene = Scene::load(args.demo, &FileLoader, &args.model)
        .with_context(|| format!("failed to load {}", args.model.display()))?;

    let mut app = TerminalApp::new(scene, args.fov).context("failed to query terminal size")?;
    app.run().context("terminal rendering failed")?;

    println!("Thank you for using WF3D Terminal Renderer!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_model_ships_with_the_repo() {
        let args = Args::parse_from(["wf3d-terminal"]);
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(&args.model);
        assert!(bundled.is_file(), "{} is missing", bundled.display());
    }
}
