/// Wireframe rasterization into a packed RGB framebuffer
use crate::projection::ScreenPoint;

/// A packed `0x00RRGGBB` color, the layout `minifb` presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x00FF00);
    pub const BLUE: Color = Color(0x0000FF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color((r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(self) -> u8 {
        self.0 as u8
    }
}

/// Anything that can draw straight lines between pixels.
///
/// Triangles are outlined by their three edges; nothing is filled.
pub trait LineRenderer {
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, color: Color);

    fn draw_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Color) {
        self.draw_line(a, b, color);
        self.draw_line(b, c, color);
        self.draw_line(c, a, color);
    }
}

/// Bresenham line walk over every octant, both endpoints included
#[derive(Debug, Clone)]
pub struct Bresenham {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

/// Walk from `start` to `end`. Steps are computed in `i64`, so endpoints
/// anywhere in the `i32` range are fine, but every point between them is
/// yielded; clip with [`clip_line`] first when only a render target matters.
pub fn bresenham(start: ScreenPoint, end: ScreenPoint) -> Bresenham {
    let (x0, y0) = (start.x as i64, start.y as i64);
    let (x1, y1) = (end.x as i64, end.y as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    Bresenham {
        x: x0,
        y: y0,
        end_x: x1,
        end_y: y1,
        dx,
        dy,
        sx: if x0 < x1 { 1 } else { -1 },
        sy: if y0 < y1 { 1 } else { -1 },
        err: dx + dy,
        done: false,
    }
}

impl Iterator for Bresenham {
    type Item = ScreenPoint;

    fn next(&mut self) -> Option<ScreenPoint> {
        if self.done {
            return None;
        }

        // Always between the two i32 endpoints
        let point = ScreenPoint::new(self.x as i32, self.y as i32);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(point);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(point)
    }
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const ABOVE: u8 = 4;
const BELOW: u8 = 8;

fn outcode(x: f64, y: f64, max_x: f64, max_y: f64) -> u8 {
    let mut code = 0;
    if x < 0.0 {
        code |= LEFT;
    } else if x > max_x {
        code |= RIGHT;
    }
    if y < 0.0 {
        code |= ABOVE;
    } else if y > max_y {
        code |= BELOW;
    }
    code
}

/// Cut a segment down to the part inside a `width` x `height` target
/// (Cohen-Sutherland). `None` when nothing of it is visible.
///
/// Projected vertices near the camera plane land far outside the target;
/// clipping keeps the walk bounded by the target size.
pub fn clip_line(
    start: ScreenPoint,
    end: ScreenPoint,
    width: usize,
    height: usize,
) -> Option<(ScreenPoint, ScreenPoint)> {
    if width == 0 || height == 0 {
        return None;
    }
    let (max_x, max_y) = ((width - 1) as f64, (height - 1) as f64);

    let (mut x0, mut y0) = (start.x as f64, start.y as f64);
    let (mut x1, mut y1) = (end.x as f64, end.y as f64);
    let mut code0 = outcode(x0, y0, max_x, max_y);
    let mut code1 = outcode(x1, y1, max_x, max_y);

    loop {
        if code0 | code1 == 0 {
            break;
        }
        if code0 & code1 != 0 {
            return None;
        }

        // The outside endpoint and the other one lie on opposite sides of
        // the crossed edge, so the divisors below are non-zero.
        let out = if code0 != 0 { code0 } else { code1 };
        let (x, y) = if out & BELOW != 0 {
            (x0 + (x1 - x0) * (max_y - y0) / (y1 - y0), max_y)
        } else if out & ABOVE != 0 {
            (x0 + (x1 - x0) * (0.0 - y0) / (y1 - y0), 0.0)
        } else if out & RIGHT != 0 {
            (max_x, y0 + (y1 - y0) * (max_x - x0) / (x1 - x0))
        } else {
            (0.0, y0 + (y1 - y0) * (0.0 - x0) / (x1 - x0))
        };

        if out == code0 {
            (x0, y0) = (x, y);
            code0 = outcode(x0, y0, max_x, max_y);
        } else {
            (x1, y1) = (x, y);
            code1 = outcode(x1, y1, max_x, max_y);
        }
    }

    let snap = |x: f64, y: f64| {
        ScreenPoint::new(x.round().clamp(0.0, max_x) as i32, y.round().clamp(0.0, max_y) as i32)
    };
    Some((snap(x0, y0), snap(x1, y1)))
}

/// A CPU-side frame of packed pixels, row-major from the top left
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.0);
    }

    /// Reallocate for a new size. Contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Color::BLACK.0);
    }

    /// Pixels outside the buffer are dropped; projected triangles are not clipped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.0;
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| Color(self.pixels[idx]))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

impl LineRenderer for FrameBuffer {
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, color: Color) {
        let Some((start, end)) = clip_line(start, end, self.width, self.height) else {
            return;
        };
        for point in bresenham(start, end) {
            self.set_pixel(point.x, point.y, color);
        }
    }
}
