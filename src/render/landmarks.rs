use crate::camera::CameraModel;
use crate::canvas::Canvas;

use super::colors;

/// Half-length of the X drawn at the principal point.
const CROSS_HALF_LEN: i32 = 15;
/// Landmark boxes are 11x11, centered on the landmark.
const LANDMARK_BOX: i32 = 11;
/// Vertical distance between the two label lines.
const LABEL_LINE_SPACING: i32 = 10;

/// Draw the principal-point cross and the four named calibration
/// landmarks with their two-line labels.
pub(crate) fn render_landmarks(canvas: &mut Canvas<'_>, camera: &dyn CameraModel) {
    let [px, py] = camera.principal_point();
    let (x, y) = (px as i32, py as i32);
    canvas.draw_fat_line(
        x - CROSS_HALF_LEN,
        y - CROSS_HALF_LEN,
        x + CROSS_HALF_LEN,
        y + CROSS_HALF_LEN,
        colors::PRINCIPAL_POINT,
    );
    canvas.draw_fat_line(
        x + CROSS_HALF_LEN,
        y - CROSS_HALF_LEN,
        x - CROSS_HALF_LEN,
        y + CROSS_HALF_LEN,
        colors::PRINCIPAL_POINT,
    );

    let marks = *camera.landmarks();
    // Text sits outside the box, toward the outside of the field: left
    // landmarks label to the left, corner landmarks above, centerline
    // landmarks below.
    draw_landmark(canvas, marks.left_corner, "Left", "Corner", -40, -25);
    draw_landmark(canvas, marks.right_corner, "Right", "Corner", 5, -25);
    draw_landmark(canvas, marks.left_centerline, "Left", "Center", -40, 15);
    draw_landmark(canvas, marks.right_centerline, "Right", "Center", 5, 15);
}

fn draw_landmark(
    canvas: &mut Canvas<'_>,
    point: [f64; 2],
    line1: &str,
    line2: &str,
    dx: i32,
    dy: i32,
) {
    let (bx, by) = (point[0] as i32, point[1] as i32);
    canvas.draw_fat_box(
        bx - LANDMARK_BOX / 2,
        by - LANDMARK_BOX / 2,
        LANDMARK_BOX,
        LANDMARK_BOX,
        colors::CALIBRATION_LANDMARK,
    );
    canvas.draw_text(bx + dx, by + dy, line1, colors::CALIBRATION_LANDMARK);
    canvas.draw_text(
        bx + dx,
        by + dy + LABEL_LINE_SPACING,
        line2,
        colors::CALIBRATION_LANDMARK,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CalibrationLandmarks, CameraModel, FittedFieldPoints};
    use image::{Rgb, RgbImage};

    /// Camera stub with every landmark pinned to a fixed pixel.
    struct FixedCamera {
        landmarks: CalibrationLandmarks,
        fitted: FittedFieldPoints,
    }

    impl FixedCamera {
        fn new() -> Self {
            Self {
                landmarks: CalibrationLandmarks {
                    left_corner: [60.0, 60.0],
                    right_corner: [90.0, 60.0],
                    left_centerline: [60.0, 90.0],
                    right_centerline: [90.0, 90.0],
                },
                fitted: FittedFieldPoints::default(),
            }
        }
    }

    impl CameraModel for FixedCamera {
        fn field_to_image(&self, world: [f64; 3]) -> [f64; 2] {
            [world[0], world[1]]
        }

        fn principal_point(&self) -> [f64; 2] {
            [75.0, 75.0]
        }

        fn landmarks(&self) -> &CalibrationLandmarks {
            &self.landmarks
        }

        fn fitted_field(&self) -> &FittedFieldPoints {
            &self.fitted
        }
    }

    #[test]
    fn test_principal_point_cross_is_red() {
        let mut img = RgbImage::new(150, 150);
        render_landmarks(&mut Canvas::new(&mut img), &FixedCamera::new());
        // Both diagonals pass through the principal point.
        assert_eq!(*img.get_pixel(75, 75), colors::PRINCIPAL_POINT);
        assert_eq!(*img.get_pixel(60, 60), colors::PRINCIPAL_POINT);
        assert_eq!(*img.get_pixel(90, 60), colors::PRINCIPAL_POINT);
    }

    #[test]
    fn test_landmark_boxes_are_cyan_outlines() {
        let mut img = RgbImage::new(150, 150);
        render_landmarks(&mut Canvas::new(&mut img), &FixedCamera::new());
        // 11x11 box centered on (60, 90): corners at (55, 85) and (65, 95).
        assert_eq!(*img.get_pixel(55, 85), colors::CALIBRATION_LANDMARK);
        assert_eq!(*img.get_pixel(65, 95), colors::CALIBRATION_LANDMARK);
        // Box center stays unpainted.
        assert_eq!(*img.get_pixel(60, 93), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_labels_are_painted_near_landmarks() {
        let mut img = RgbImage::new(150, 150);
        render_landmarks(&mut Canvas::new(&mut img), &FixedCamera::new());
        // "Left" for the left corner starts at (60 - 40, 60 - 25); the
        // glyph 'L' has a solid left column.
        assert_eq!(*img.get_pixel(20, 35), colors::CALIBRATION_LANDMARK);
        assert_eq!(*img.get_pixel(20, 41), colors::CALIBRATION_LANDMARK);
    }
}
