/// Character-cell canvas for terminal rendering
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wf3d_core::raster::{bresenham, clip_line};
use wf3d_core::{Color, LineRenderer, ScreenPoint};

/// Character used for every lit cell
const EDGE_CHAR: char = '#';

/// A grid of terminal cells that edges are drawn into
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, None);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    fn plot(&mut self, point: ScreenPoint, color: Color) {
        if point.x < 0 || point.y < 0 {
            return;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Some(color);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(color) => {
                        writer.queue(SetForegroundColor(term_color(color)))?;
                        writer.queue(Print(EDGE_CHAR))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl LineRenderer for CharCanvas {
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, color: Color) {
        let Some((start, end)) = clip_line(start, end, self.width, self.height) else {
            return;
        };
        for point in bresenham(start, end) {
            self.plot(point, color);
        }
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_light_cells() {
        let mut canvas = CharCanvas::new(6, 4);
        canvas.draw_line(ScreenPoint::new(0, 0), ScreenPoint::new(5, 0), Color::GREEN);
        assert_eq!(canvas.cell(0, 0), Some(Color::GREEN));
        assert_eq!(canvas.cell(5, 0), Some(Color::GREEN));
        assert_eq!(canvas.cell(0, 1), None);

        canvas.clear();
        assert_eq!(canvas.cell(0, 0), None);
    }

    #[test]
    fn test_off_canvas_points_are_ignored() {
        let mut canvas = CharCanvas::new(3, 3);
        canvas.draw_line(ScreenPoint::new(-4, -4), ScreenPoint::new(1, 1), Color::RED);
        assert_eq!(canvas.cell(0, 0), Some(Color::RED));
        assert_eq!(canvas.cell(1, 1), Some(Color::RED));
    }

    #[test]
    fn test_far_off_canvas_edge_is_clipped() {
        let mut canvas = CharCanvas::new(5, 3);
        canvas.draw_line(ScreenPoint::new(i32::MIN, 1), ScreenPoint::new(i32::MAX, 1), Color::BLUE);
        assert!((0..5).all(|x| canvas.cell(x, 1) == Some(Color::BLUE)));
        assert_eq!(canvas.cell(0, 0), None);
    }

    #[test]
    fn test_draw_writes_one_char_per_cell() {
        let mut canvas = CharCanvas::new(3, 2);
        canvas.draw_line(ScreenPoint::new(1, 0), ScreenPoint::new(1, 0), Color::WHITE);

        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(EDGE_CHAR).count(), 1);
        assert_eq!(text.matches("\r\n").count(), 1);
    }
}
