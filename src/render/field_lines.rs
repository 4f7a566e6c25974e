use std::f64::consts::PI;

use crate::camera::CameraModel;
use crate::canvas::Canvas;
use crate::field;

use super::colors;

/// World-space sub-segments per logical field line. The projection is
/// near-linear over short spans, so a piecewise-linear image-space
/// approximation at this sampling is visually exact.
const PROJECTION_STEPS: u32 = 20;

/// Project the current calibration's field geometry into the image and
/// draw it: touchlines, goal line, halfway line, center circle, goal
/// area, and a background reference grid.
pub(crate) fn render_field_geometry(canvas: &mut Canvas<'_>, camera: &dyn CameraModel) {
    let fitted = *camera.fitted_field();

    // Touchlines, from the fitted corner to the fitted halfway point.
    draw_segment(canvas, camera, fitted.left_corner, fitted.left_centerline);
    draw_segment(canvas, camera, fitted.right_corner, fitted.right_centerline);
    // Goal line and halfway line.
    draw_segment(canvas, camera, fitted.right_corner, fitted.left_corner);
    draw_segment(canvas, camera, fitted.left_centerline, fitted.right_centerline);

    // Center circle: half arc around the field center.
    let r = field::CENTER_CIRCLE_RADIUS;
    let mut prev = [0.0, r];
    let mut angle = field::ARC_STEP;
    while angle <= PI {
        let next = [angle.sin() * r, angle.cos() * r];
        draw_segment(canvas, camera, prev, next);
        prev = next;
        angle += field::ARC_STEP;
    }

    // Goal area: two quarter arcs joined by a straight segment.
    let r = field::GOAL_AREA_RADIUS;
    let (off_x, off_y) = (field::HALF_FIELD_LENGTH, field::GOAL_AREA_HALF_WIDTH);
    let mut prev = [0.0, -r];
    let mut angle = PI;
    while angle <= 1.5 * PI {
        let next = [angle.sin() * r, angle.cos() * r];
        draw_segment(
            canvas,
            camera,
            [prev[0] + off_x, prev[1] - off_y],
            [next[0] + off_x, next[1] - off_y],
        );
        prev = next;
        angle += field::ARC_STEP;
    }

    draw_segment(
        canvas,
        camera,
        [field::GOAL_AREA_LINE_X, -field::GOAL_AREA_HALF_WIDTH],
        [field::GOAL_AREA_LINE_X, field::GOAL_AREA_HALF_WIDTH],
    );

    let mut prev = [-r, 0.0];
    let mut angle = 1.5 * PI;
    while angle <= 2.0 * PI {
        let next = [angle.sin() * r, angle.cos() * r];
        draw_segment(
            canvas,
            camera,
            [prev[0] + off_x, prev[1] + off_y],
            [next[0] + off_x, next[1] + off_y],
        );
        prev = next;
        angle += field::ARC_STEP;
    }

    // Background reference grid over the half field.
    let mut grid_y = 0.0;
    while grid_y < field::HALF_FIELD_WIDTH {
        draw_segment(
            canvas,
            camera,
            [0.0, -grid_y],
            [field::HALF_FIELD_LENGTH, -grid_y],
        );
        draw_segment(
            canvas,
            camera,
            [0.0, grid_y],
            [field::HALF_FIELD_LENGTH, grid_y],
        );
        grid_y += field::GRID_SPACING;
    }
    let mut grid_x = 0.0;
    while grid_x < field::HALF_FIELD_LENGTH {
        draw_segment(
            canvas,
            camera,
            [grid_x, -field::HALF_FIELD_WIDTH],
            [grid_x, field::HALF_FIELD_WIDTH],
        );
        grid_x += field::GRID_SPACING;
    }
}

fn draw_segment(canvas: &mut Canvas<'_>, camera: &dyn CameraModel, start: [f64; 2], end: [f64; 2]) {
    project_and_draw_segment(canvas, camera, start, end, PROJECTION_STEPS);
}

/// Draw one logical field line as `steps` connected thick segments whose
/// endpoints are the projections of `steps + 1` uniformly spaced world
/// points.
pub(crate) fn project_and_draw_segment(
    canvas: &mut Canvas<'_>,
    camera: &dyn CameraModel,
    start: [f64; 2],
    end: [f64; 2],
    steps: u32,
) {
    let mut last: Option<[f64; 2]> = None;
    for world in sample_segment(start, end, steps) {
        let point = camera.field_to_image(world);
        if let Some(prev) = last {
            canvas.draw_fat_line(
                prev[0] as i32,
                prev[1] as i32,
                point[0] as i32,
                point[1] as i32,
                colors::FIELD_LINE,
            );
        }
        last = Some(point);
    }
}

/// `steps + 1` uniformly spaced world points from `start` to `end`, on
/// the field plane.
fn sample_segment(start: [f64; 2], end: [f64; 2], steps: u32) -> Vec<[f64; 3]> {
    if steps == 0 {
        return Vec::new();
    }
    let step_x = (end[0] - start[0]) / steps as f64;
    let step_y = (end[1] - start[1]) / steps as f64;
    (0..=steps)
        .map(|i| {
            [
                start[0] + step_x * i as f64,
                start[1] + step_y * i as f64,
                0.0,
            ]
        })
        .collect()
}
