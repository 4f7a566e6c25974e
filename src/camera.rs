//! Camera projection model and calibration data consumed by the renderer.
//!
//! The calibration estimator itself lives elsewhere; the renderer only
//! reads its output: a world-to-image projection, the principal point,
//! and the fitted landmark coordinates.

use crate::field;

/// Image-space coordinates of the four named calibration landmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationLandmarks {
    pub left_corner: [f64; 2],
    pub right_corner: [f64; 2],
    pub left_centerline: [f64; 2],
    pub right_centerline: [f64; 2],
}

/// Fitted world-space coordinates (mm) of the same four landmarks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedFieldPoints {
    pub left_corner: [f64; 2],
    pub right_corner: [f64; 2],
    pub left_centerline: [f64; 2],
    pub right_centerline: [f64; 2],
}

impl Default for FittedFieldPoints {
    /// Nominal half-field layout, before any fitting.
    fn default() -> Self {
        Self {
            left_corner: [field::HALF_FIELD_LENGTH, -field::HALF_FIELD_WIDTH],
            right_corner: [field::HALF_FIELD_LENGTH, field::HALF_FIELD_WIDTH],
            left_centerline: [0.0, -field::HALF_FIELD_WIDTH],
            right_centerline: [0.0, field::HALF_FIELD_WIDTH],
        }
    }
}

/// World-to-image projection plus the calibration fields the overlay
/// layers label on screen. Read-only for the renderer.
pub trait CameraModel {
    /// Project a world-frame point (mm, field plane at z = 0) to image
    /// pixel coordinates.
    fn field_to_image(&self, world: [f64; 3]) -> [f64; 2];

    fn principal_point(&self) -> [f64; 2];

    /// Landmark positions in image space, as clicked/estimated during
    /// calibration.
    fn landmarks(&self) -> &CalibrationLandmarks;

    /// Landmark positions in world space after fitting.
    fn fitted_field(&self) -> &FittedFieldPoints;
}

/// One calibration line segment with its recorded edge sample points.
#[derive(Debug, Clone)]
pub struct LineSegmentSamples {
    pub name: String,
    /// Orientation of the underlying field line; controls which
    /// cross-stroke the edge-sample overlay draws.
    pub horizontal: bool,
    /// Ordered image-space sample points.
    pub points: Vec<[f64; 2]>,
}

/// Calibration inputs for one rendered frame.
pub struct CalibrationInput<'a> {
    pub camera: &'a dyn CameraModel,
    pub edge_samples: &'a [LineSegmentSamples],
}

/// Pinhole intrinsics (pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

/// Pinhole camera with a rigid pose, used by the demo driver and tests.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    intrinsics: CameraIntrinsics,
    /// World-to-camera rotation, row major.
    rotation: [[f64; 3]; 3],
    /// World-to-camera translation.
    translation: [f64; 3],
    landmarks: CalibrationLandmarks,
    fitted_field: FittedFieldPoints,
}

impl PinholeCamera {
    pub fn new(
        intrinsics: CameraIntrinsics,
        rotation: [[f64; 3]; 3],
        translation: [f64; 3],
        fitted_field: FittedFieldPoints,
    ) -> Self {
        let mut camera = Self {
            intrinsics,
            rotation,
            translation,
            landmarks: CalibrationLandmarks::default(),
            fitted_field,
        };
        camera.landmarks = CalibrationLandmarks {
            left_corner: camera.project(fitted_field.left_corner),
            right_corner: camera.project(fitted_field.right_corner),
            left_centerline: camera.project(fitted_field.left_centerline),
            right_centerline: camera.project(fitted_field.right_centerline),
        };
        camera
    }

    /// Camera suspended `height_mm` above the half-field center, looking
    /// straight down, scaled so the full half field fits an image of the
    /// given size.
    pub fn overhead(image_width: u32, image_height: u32, height_mm: f64) -> Self {
        let margin = 1.1;
        let px_per_mm = (image_width as f64 / (field::HALF_FIELD_LENGTH * margin))
            .min(image_height as f64 / (2.0 * field::HALF_FIELD_WIDTH * margin));
        let intrinsics = CameraIntrinsics {
            fx: px_per_mm * height_mm,
            fy: px_per_mm * height_mm,
            cx: image_width as f64 / 2.0,
            cy: image_height as f64 / 2.0,
        };
        // World +x toward the goal, +y to the right, field plane at z = 0.
        // The camera sits over the middle of the half field.
        let rotation = [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]];
        let center = [field::HALF_FIELD_LENGTH / 2.0, 0.0, height_mm];
        let translation = [
            -(rotation[0][0] * center[0] + rotation[0][1] * center[1] + rotation[0][2] * center[2]),
            -(rotation[1][0] * center[0] + rotation[1][1] * center[1] + rotation[1][2] * center[2]),
            -(rotation[2][0] * center[0] + rotation[2][1] * center[1] + rotation[2][2] * center[2]),
        ];
        Self::new(intrinsics, rotation, translation, FittedFieldPoints::default())
    }

    fn project(&self, world_xy: [f64; 2]) -> [f64; 2] {
        self.field_to_image([world_xy[0], world_xy[1], 0.0])
    }
}

impl CameraModel for PinholeCamera {
    fn field_to_image(&self, world: [f64; 3]) -> [f64; 2] {
        let r = &self.rotation;
        let t = &self.translation;
        let x = r[0][0] * world[0] + r[0][1] * world[1] + r[0][2] * world[2] + t[0];
        let y = r[1][0] * world[0] + r[1][1] * world[1] + r[1][2] * world[2] + t[1];
        let z = (r[2][0] * world[0] + r[2][1] * world[1] + r[2][2] * world[2] + t[2]).max(1e-9);
        [
            self.intrinsics.fx * x / z + self.intrinsics.cx,
            self.intrinsics.fy * y / z + self.intrinsics.cy,
        ]
    }

    fn principal_point(&self) -> [f64; 2] {
        [self.intrinsics.cx, self.intrinsics.cy]
    }

    fn landmarks(&self) -> &CalibrationLandmarks {
        &self.landmarks
    }

    fn fitted_field(&self) -> &FittedFieldPoints {
        &self.fitted_field
    }
}
