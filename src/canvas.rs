use image::{Rgb, RgbImage};

/// Width of one font glyph in pixels.
const GLYPH_WIDTH: i32 = 5;
/// Horizontal advance between glyphs.
const GLYPH_ADVANCE: i32 = 6;

/// Mutable view over an RGB raster with primitive drawing operations.
///
/// All primitives clip: pixels outside the raster are skipped, never drawn
/// and never panic. Coordinates are signed so callers can pass projected
/// points that land off-screen.
pub struct Canvas<'a> {
    image: &'a mut RgbImage,
}

impl<'a> Canvas<'a> {
    pub fn new(image: &'a mut RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        self.image
    }

    /// Set a single pixel, ignoring out-of-bounds coordinates.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x < 0 || y < 0 || x >= self.image.width() as i32 || y >= self.image.height() as i32 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }

    pub fn fill_black(&mut self) {
        let data: &mut [u8] = &mut **self.image;
        data.fill(0);
    }

    /// Draw a 1 px line between two points (Bresenham), clipped to the raster.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb<u8>) {
        let Some((x1, y1, x2, y2)) =
            clip_segment(x1, y1, x2, y2, self.image.width(), self.image.height())
        else {
            return;
        };

        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);
        loop {
            self.set_pixel(x, y, color);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a thick (3 px) line: the center line plus one-pixel offsets on
    /// both axes.
    pub fn draw_fat_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb<u8>) {
        for (ox, oy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
            self.draw_line(x1 + ox, y1 + oy, x2 + ox, y2 + oy, color);
        }
    }

    /// Draw a 1 px rectangle outline with upper-left corner `(x, y)`.
    pub fn draw_box(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x2, y2) = (x + w - 1, y + h - 1);
        self.draw_line(x, y, x2, y, color);
        self.draw_line(x, y2, x2, y2, color);
        self.draw_line(x, y, x, y2, color);
        self.draw_line(x2, y, x2, y2, color);
    }

    /// Draw a thick rectangle outline.
    pub fn draw_fat_box(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x2, y2) = (x + w - 1, y + h - 1);
        self.draw_fat_line(x, y, x2, y, color);
        self.draw_fat_line(x, y2, x2, y2, color);
        self.draw_fat_line(x, y, x, y2, color);
        self.draw_fat_line(x2, y, x2, y2, color);
    }

    /// Fill a rectangle with upper-left corner `(x, y)`.
    pub fn fill_box(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
        for py in y..y + h.max(0) {
            for px in x..x + w.max(0) {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draw text with the built-in 5x7 font; `(x, y)` is the upper-left
    /// corner of the first glyph. Lowercase letters render as uppercase,
    /// glyphs outside the font are skipped.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let mut gx = x;
        for c in text.chars() {
            if let Some(rows) = glyph(c.to_ascii_uppercase()) {
                for (row, &bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if bits as i32 & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                            self.set_pixel(gx + col, y + row as i32, color);
                        }
                    }
                }
            }
            gx += GLYPH_ADVANCE;
        }
    }

    /// Reduce every pixel to its channel average in place. Idempotent.
    pub fn greyscale(&mut self) {
        for pixel in self.image.pixels_mut() {
            let Rgb([r, g, b]) = *pixel;
            let v = ((r as u16 + g as u16 + b as u16) / 3) as u8;
            *pixel = Rgb([v, v, v]);
        }
    }
}

/// Liang-Barsky clip of a segment to the raster rectangle, with a one-pixel
/// margin so boundary pixels survive endpoint rounding. Returns `None` when
/// the segment lies entirely outside.
fn clip_segment(
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    width: u32,
    height: u32,
) -> Option<(i32, i32, i32, i32)> {
    let (fx1, fy1) = (x1 as f64, y1 as f64);
    let dx = x2 as f64 - fx1;
    let dy = y2 as f64 - fy1;
    let (xmin, ymin) = (-1.0, -1.0);
    let (xmax, ymax) = (width as f64, height as f64);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, fx1 - xmin),
        (dx, xmax - fx1),
        (-dy, fy1 - ymin),
        (dy, ymax - fy1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    Some((
        (fx1 + t0 * dx).round() as i32,
        (fy1 + t0 * dy).round() as i32,
        (fx1 + t1 * dx).round() as i32,
        (fy1 + t1 * dy).round() as i32,
    ))
}

/// 5x7 bitmap glyphs, one byte per row, bit 4 = leftmost column.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        _ => return None,
    };
    Some(rows)
}
