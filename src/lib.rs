//! Per-frame calibration/debug overlay renderer for a camera-vision
//! pipeline.
//!
//! Given a captured video frame, detected color regions, a camera
//! projection model, and a calibration edge-sample dataset, the renderer
//! composites a single annotated RGB raster out of independently
//! toggleable layers: the (optionally greyscaled) source image, the
//! segmentation mask, blob outlines, calibration landmarks, projected
//! field geometry, a gradient-based edge classification, and calibration
//! edge-sample markers.

pub mod camera;
pub mod canvas;
pub mod convert;
pub mod field;
pub mod frame;
pub mod render;

pub use camera::{
    CalibrationInput, CalibrationLandmarks, CameraIntrinsics, CameraModel, FittedFieldPoints,
    LineSegmentSamples, PinholeCamera,
};
pub use canvas::Canvas;
pub use convert::{ConvertError, PixelFormat, VideoFrame};
pub use frame::{
    DrawColorTable, FrameData, Region, RegionLists, SegmentationLabels, VisualizationFrame,
    VIS_FRAME_KEY,
};
pub use render::{LayerToggles, VisualizationRenderer};
