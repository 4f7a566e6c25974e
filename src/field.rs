//! Fixed world-space layout of the half field, in millimeters.
//!
//! These are compile-time constants of the playing surface; only the
//! projection into image space depends on calibration.

/// Distance from the field center to the goal line along x.
pub const HALF_FIELD_LENGTH: f64 = 3025.0;

/// Distance from the field center to each touchline along y.
pub const HALF_FIELD_WIDTH: f64 = 2025.0;

/// Radius of the center circle.
pub const CENTER_CIRCLE_RADIUS: f64 = 500.0;

/// Radius of the two goal-area quarter arcs.
pub const GOAL_AREA_RADIUS: f64 = 500.0;

/// Half the width of the straight goal-area segment.
pub const GOAL_AREA_HALF_WIDTH: f64 = 175.0;

/// x coordinate of the straight goal-area segment.
pub const GOAL_AREA_LINE_X: f64 = HALF_FIELD_LENGTH - GOAL_AREA_RADIUS;

/// Spacing of the background reference grid.
pub const GRID_SPACING: f64 = 500.0;

/// Angular increment when sampling circular arcs.
pub const ARC_STEP: f64 = 0.314;
