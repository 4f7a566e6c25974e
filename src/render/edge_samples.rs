use crate::camera::LineSegmentSamples;
use crate::canvas::Canvas;

use super::colors;

/// Sample markers are 11x11 boxes centered on the point.
const MARKER_BOX: i32 = 11;
/// Half-length of the orientation cross-stroke.
const CROSS_HALF_LEN: i32 = 2;

/// Mark every recorded calibration edge sample: a box outline plus a
/// short stroke perpendicular to the sampled line, i.e. along the
/// expected gradient direction.
pub(crate) fn render_edge_samples(canvas: &mut Canvas<'_>, segments: &[LineSegmentSamples]) {
    for segment in segments {
        for point in &segment.points {
            let (x, y) = (point[0] as i32, point[1] as i32);
            canvas.draw_box(
                x - MARKER_BOX / 2,
                y - MARKER_BOX / 2,
                MARKER_BOX,
                MARKER_BOX,
                colors::EDGE_SAMPLE,
            );
            if segment.horizontal {
                canvas.draw_line(x, y - CROSS_HALF_LEN, x, y + CROSS_HALF_LEN, colors::EDGE_SAMPLE);
            } else {
                canvas.draw_line(x - CROSS_HALF_LEN, y, x + CROSS_HALF_LEN, y, colors::EDGE_SAMPLE);
            }
        }
    }
}
