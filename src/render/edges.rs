use image::{GrayImage, Luma, Rgb};

use crate::canvas::Canvas;

use super::colors;

/// Minimum Sobel response for a gradient to count as an edge.
const SOBEL_THRESHOLD: i32 = 30;

/// Per-pixel classification values.
const NEUTRAL: u8 = 0;
const DARKER: u8 = 1;
const BRIGHTER: u8 = 2;

/// Classify every interior pixel of the composited canvas by its dominant
/// gradient direction and recolor the whole canvas accordingly: darker
/// edges green, brighter edges white, neutral pixels the classification
/// value replicated across channels.
///
/// Runs on the canvas as already painted by the earlier layers, so the
/// classification can be inspected on top of any other overlay.
pub(crate) fn render_edge_classification(
    canvas: &mut Canvas<'_>,
    grey: &mut GrayImage,
    classes: &mut GrayImage,
) {
    for (dst, src) in grey.pixels_mut().zip(canvas.image().pixels()) {
        let Rgb([r, g, b]) = *src;
        dst.0[0] = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    }

    let (width, height) = grey.dimensions();
    if width >= 3 && height >= 3 {
        let data = grey.as_raw();
        let stride = width as usize;
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let i = y as usize * stride + x as usize;
                let vertical = row_gradient(data, stride, i);
                let horizontal = column_gradient(data, stride, i);

                let brighter_max = thresholded(vertical).max(thresholded(horizontal));
                let darker_max = thresholded(-vertical).max(thresholded(-horizontal));

                let class = if darker_max > brighter_max {
                    DARKER
                } else if brighter_max > darker_max {
                    BRIGHTER
                } else {
                    NEUTRAL
                };
                classes.put_pixel(x, y, Luma([class]));
            }
        }
    }

    for (pixel, class) in canvas.image_mut().pixels_mut().zip(classes.pixels()) {
        *pixel = match class.0[0] {
            DARKER => colors::EDGE_DARKER,
            BRIGHTER => colors::EDGE_BRIGHTER,
            value => Rgb([value, value, value]),
        };
    }
}

fn thresholded(response: i32) -> i32 {
    if response > SOBEL_THRESHOLD {
        response
    } else {
        0
    }
}

/// 3x3 Sobel response along +y: positive when the rows below `i` are
/// brighter than the rows above.
fn row_gradient(data: &[u8], stride: usize, i: usize) -> i32 {
    let above = i - stride;
    let below = i + stride;
    (data[below - 1] as i32 + 2 * data[below] as i32 + data[below + 1] as i32)
        - (data[above - 1] as i32 + 2 * data[above] as i32 + data[above + 1] as i32)
}

/// 3x3 Sobel response along +x: positive when the columns right of `i`
/// are brighter than the columns left of it.
fn column_gradient(data: &[u8], stride: usize, i: usize) -> i32 {
    let above = i - stride;
    let below = i + stride;
    (data[above + 1] as i32 + 2 * data[i + 1] as i32 + data[below + 1] as i32)
        - (data[above - 1] as i32 + 2 * data[i - 1] as i32 + data[below - 1] as i32)
}
