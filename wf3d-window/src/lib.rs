/// Windowed front end: draws the scene into a minifb framebuffer
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use wf3d_core::{
    CameraPreset, Color, FrameBuffer, FrameClock, FrameInput, Frustum, Pipeline, Scene, Viewport,
};

/// Upper bound on presented frames, about 60 per second
const FRAME_INTERVAL: Duration = Duration::from_micros(16600);

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub fovy_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Print the per-frame rate to stdout
    pub log_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "wf3d".to_string(),
            width: 1200,
            height: 800,
            fovy_degrees: wf3d_core::projection::DEFAULT_FOVY_DEGREES,
            near: wf3d_core::projection::DEFAULT_NEAR,
            far: wf3d_core::projection::DEFAULT_FAR,
            log_fps: cfg!(feature = "log-fps"),
        }
    }
}

/// Digit keys 1-4 select a camera preset
pub fn preset_for_key(key: Key) -> Option<CameraPreset> {
    let digit = match key {
        Key::Key1 | Key::NumPad1 => 1,
        Key::Key2 | Key::NumPad2 => 2,
        Key::Key3 | Key::NumPad3 => 3,
        Key::Key4 | Key::NumPad4 => 4,
        _ => return None,
    };
    CameraPreset::from_digit(digit)
}

/// Main application struct for windowed rendering
pub struct WindowApp {
    window: Window,
    buffer: FrameBuffer,
    scene: Scene,
    pipeline: Pipeline,
    clock: FrameClock,
    title: String,
    log_fps: bool,
}

impl WindowApp {
    pub fn new(scene: Scene, config: WindowConfig) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            &config.title,
            config.width,
            config.height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;
        window.limit_update_rate(Some(FRAME_INTERVAL));

        let viewport = Viewport::new(config.width as u32, config.height as u32);
        let frustum = Frustum::perspective(config.fovy_degrees, viewport.aspect(), config.near, config.far);
        log::debug!("frustum: {:?}", frustum);

        Ok(Self {
            window,
            buffer: FrameBuffer::new(config.width, config.height),
            pipeline: Pipeline::new(scene.stages, frustum, viewport),
            scene,
            clock: FrameClock::new(),
            title: config.title,
            log_fps: config.log_fps,
        })
    }

    pub fn run(&mut self) -> Result<(), minifb::Error> {
        let mut shown_fps = 0.0;

        loop {
            let input = self.poll_input();
            if input.close_requested {
                log::info!("window closed");
                return Ok(());
            }

            let tick = self.clock.tick();
            if self.log_fps {
                println!("{} FPS", tick.instant_fps);
            }

            self.scene.advance(&input, tick.elapsed);
            self.render()?;

            if self.clock.fps() != shown_fps {
                shown_fps = self.clock.fps();
                self.window
                    .set_title(&format!("{}, fps: {:.0}", self.title, shown_fps));
            }
        }
    }

    fn poll_input(&self) -> FrameInput {
        let camera_preset = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .find_map(preset_for_key);
        if let Some(preset) = camera_preset {
            log::debug!("camera preset {:?}", preset);
        }

        FrameInput {
            camera_preset,
            close_requested: !self.window.is_open() || self.window.is_key_down(Key::Escape),
        }
    }

    /// Follow the window size; the frustum keeps its initial aspect
    fn sync_viewport(&mut self) {
        let (width, height) = self.window.get_size();
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) != (self.buffer.width(), self.buffer.height()) {
            log::debug!("viewport resized to {}x{}", width, height);
            self.buffer.resize(width, height);
            self.pipeline
                .set_viewport(Viewport::new(width as u32, height as u32));
        }
    }

    fn render(&mut self) -> Result<(), minifb::Error> {
        self.sync_viewport();

        self.buffer.clear(Color::BLACK);
        let stats = self.scene.draw(&self.pipeline, &mut self.buffer);
        if stats.skipped > 0 {
            log::trace!("{} triangles skipped", stats.skipped);
        }

        self.window
            .update_with_buffer(self.buffer.as_slice(), self.buffer.width(), self.buffer.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys_map_to_presets() {
        assert_eq!(preset_for_key(Key::Key1), Some(CameraPreset::Front));
        assert_eq!(preset_for_key(Key::Key2), Some(CameraPreset::Back));
        assert_eq!(preset_for_key(Key::NumPad3), Some(CameraPreset::Close));
        assert_eq!(preset_for_key(Key::Key4), Some(CameraPreset::Side));
        assert_eq!(preset_for_key(Key::Key5), None);
        assert_eq!(preset_for_key(Key::Space), None);
    }

    #[test]
    fn test_default_config_matches_demo_window() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (1200, 800));
        assert_eq!(config.fovy_degrees, 60.0);
    }
}
