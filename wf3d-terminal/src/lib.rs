/// Terminal front end for the wireframe pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wf3d_core::{CameraPreset, FrameClock, FrameInput, Frustum, Pipeline, Scene, Viewport};

pub mod renderer;

pub use renderer::CharCanvas;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Aspect ratio of a cell grid in screen terms
pub fn grid_aspect(columns: u16, rows: u16) -> f32 {
    columns as f32 / (rows.max(1) as f32 * CELL_ASPECT)
}

/// What a key press means to the app
pub fn classify_key(code: KeyCode) -> FrameInput {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => FrameInput {
            close_requested: true,
            ..FrameInput::default()
        },
        KeyCode::Char(c) => FrameInput {
            camera_preset: c
                .to_digit(10)
                .and_then(|d| CameraPreset::from_digit(d as u8)),
            ..FrameInput::default()
        },
        _ => FrameInput::default(),
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    pipeline: Pipeline,
    canvas: CharCanvas,
    clock: FrameClock,
    running: bool,
}

impl TerminalApp {
    pub fn new(scene: Scene, fovy_degrees: f32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let viewport = Viewport::new(width as u32, height as u32);
        let frustum = Frustum::perspective(
            fovy_degrees,
            grid_aspect(width, height),
            wf3d_core::projection::DEFAULT_NEAR,
            wf3d_core::projection::DEFAULT_FAR,
        );

        Ok(Self {
            pipeline: Pipeline::new(scene.stages, frustum, viewport),
            scene,
            canvas: CharCanvas::new(width as usize, height as usize),
            clock: FrameClock::new(),
            running: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            let mut input = FrameInput::default();
            while event::poll(Duration::from_millis(0))? {
                let next = self.read_input()?;
                input.camera_preset = next.camera_preset.or(input.camera_preset);
                input.close_requested |= next.close_requested;
            }
            if input.close_requested {
                self.running = false;
                break;
            }

            // Update
            let tick = self.clock.tick();
            self.scene.advance(&input, tick.elapsed);

            // Render
            self.render()?;

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn read_input(&mut self) -> io::Result<FrameInput> {
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => Ok(classify_key(code)),
            Event::Resize(width, height) => {
                self.canvas.resize(width as usize, height as usize);
                self.pipeline
                    .set_viewport(Viewport::new(width as u32, height as u32));
                Ok(FrameInput::default())
            }
            _ => Ok(FrameInput::default()),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.canvas.clear();
        self.scene.draw(&self.pipeline, &mut self.canvas);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "WF3D Terminal | FPS: {:.1} | Controls: 1-4=Camera Q=Quit",
                self.clock.fps()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(classify_key(KeyCode::Char('q')).close_requested);
        assert!(classify_key(KeyCode::Esc).close_requested);
        assert!(!classify_key(KeyCode::Char('1')).close_requested);
    }

    #[test]
    fn test_digit_keys_select_presets() {
        assert_eq!(classify_key(KeyCode::Char('1')).camera_preset, Some(CameraPreset::Front));
        assert_eq!(classify_key(KeyCode::Char('4')).camera_preset, Some(CameraPreset::Side));
        assert_eq!(classify_key(KeyCode::Char('7')).camera_preset, None);
        assert_eq!(classify_key(KeyCode::Left), FrameInput::default());
    }

    #[test]
    fn test_grid_aspect_accounts_for_tall_cells() {
        assert!((grid_aspect(160, 40) - 2.0).abs() < 1e-6);
        assert!(grid_aspect(80, 0).is_finite());
    }
}
