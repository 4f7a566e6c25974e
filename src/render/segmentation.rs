use crate::canvas::Canvas;
use crate::frame::{DrawColorTable, SegmentationLabels};

use super::colors;

/// Paint every labelled pixel with its channel's draw color.
///
/// A label buffer whose pixel count does not match the canvas renders
/// nothing; that is a per-frame upstream glitch, not an error.
pub(crate) fn render_segmentation(
    canvas: &mut Canvas<'_>,
    labels: &SegmentationLabels,
    table: &DrawColorTable,
) {
    let num_pixels = canvas.width() as usize * canvas.height() as usize;
    if labels.data.len() != num_pixels {
        tracing::debug!(
            labels = labels.data.len(),
            canvas = num_pixels,
            "segmentation label buffer size mismatch; skipping layer"
        );
        return;
    }

    for (pixel, &label) in canvas.image_mut().pixels_mut().zip(labels.data.iter()) {
        if label != 0 {
            *pixel = table.draw_color(label).unwrap_or(colors::DEFAULT_DRAW);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn table() -> DrawColorTable {
        DrawColorTable::new(vec![Rgb([1, 1, 1]), Rgb([250, 10, 20]), Rgb([10, 250, 20])])
    }

    #[test]
    fn test_background_pixels_keep_canvas_content() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([7, 8, 9]));
        let labels = SegmentationLabels::new(vec![0, 1, 0, 2]);
        render_segmentation(&mut Canvas::new(&mut img), &labels, &table());
        assert_eq!(*img.get_pixel(0, 0), Rgb([7, 8, 9]));
        assert_eq!(*img.get_pixel(1, 0), Rgb([250, 10, 20]));
        assert_eq!(*img.get_pixel(0, 1), Rgb([7, 8, 9]));
        assert_eq!(*img.get_pixel(1, 1), Rgb([10, 250, 20]));
    }

    #[test]
    fn test_size_mismatch_renders_nothing() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([7, 8, 9]));
        let labels = SegmentationLabels::new(vec![1, 1, 1]);
        render_segmentation(&mut Canvas::new(&mut img), &labels, &table());
        assert!(img.pixels().all(|p| *p == Rgb([7, 8, 9])));
    }

    #[test]
    fn test_out_of_table_label_falls_back_to_white() {
        let mut img = RgbImage::new(1, 1);
        let labels = SegmentationLabels::new(vec![9]);
        render_segmentation(&mut Canvas::new(&mut img), &labels, &table());
        assert_eq!(*img.get_pixel(0, 0), colors::DEFAULT_DRAW);
    }
}
