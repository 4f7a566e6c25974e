//! The frame orchestrator and its overlay stages.
//!
//! Each stage paints the shared canvas in place; the fixed application
//! order is: image (plus optional greyscale), segmentation, blobs,
//! calibration landmarks, projected field geometry, edge classification,
//! calibration edge samples.

mod blobs;
mod edge_samples;
mod edges;
mod field_lines;
mod landmarks;
mod segmentation;

use std::sync::Arc;

use image::GrayImage;

use crate::camera::CalibrationInput;
use crate::canvas::Canvas;
use crate::convert;
use crate::frame::{DrawColorTable, FrameData, VisualizationFrame, VIS_FRAME_KEY};

/// Colors used by the fixed overlay layers.
pub mod colors {
    use image::Rgb;

    pub const FIELD_LINE: Rgb<u8> = Rgb([255, 100, 100]);
    pub const PRINCIPAL_POINT: Rgb<u8> = Rgb([255, 0, 0]);
    pub const CALIBRATION_LANDMARK: Rgb<u8> = Rgb([0, 255, 255]);
    pub const EDGE_SAMPLE: Rgb<u8> = Rgb([255, 0, 0]);
    pub const EDGE_DARKER: Rgb<u8> = Rgb([0, 255, 0]);
    pub const EDGE_BRIGHTER: Rgb<u8> = Rgb([255, 255, 255]);
    /// Fallback when no draw-color table is attached.
    pub const DEFAULT_DRAW: Rgb<u8> = Rgb([255, 255, 255]);
}

/// Independent enable switches for the overlay layers. The configuration
/// surface owning these lives outside the renderer.
#[derive(Debug, Clone, Copy)]
pub struct LayerToggles {
    /// Master switch; off marks the frame invalid without drawing.
    pub enabled: bool,
    pub image: bool,
    pub greyscale: bool,
    pub thresholded: bool,
    pub blobs: bool,
    pub camera_calibration: bool,
    pub calibration_result: bool,
    pub detected_edges: bool,
    pub full_edge_detection: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            enabled: true,
            image: true,
            greyscale: true,
            thresholded: true,
            blobs: true,
            camera_calibration: true,
            calibration_result: true,
            detected_edges: true,
            full_edge_detection: false,
        }
    }
}

/// Renders the per-frame calibration/debug overlay.
///
/// One instance serves one frame stream; `process` must not be invoked
/// concurrently for the same instance. The greyscale scratch images are
/// retained across frames and reallocated whole on dimension changes.
pub struct VisualizationRenderer {
    color_table: Option<Arc<DrawColorTable>>,
    scratch_grey: Option<GrayImage>,
    scratch_classes: Option<GrayImage>,
}

impl VisualizationRenderer {
    pub fn new() -> Self {
        Self {
            color_table: None,
            scratch_grey: None,
            scratch_classes: None,
        }
    }

    /// Attach or detach the shared channel draw-color table.
    pub fn set_color_table(&mut self, table: Option<Arc<DrawColorTable>>) {
        self.color_table = table;
    }

    /// Render one frame into `data.results[VIS_FRAME_KEY]`.
    ///
    /// Never fails: missing upstream data downgrades to layer no-ops or
    /// fallbacks, and the only short-circuits (master switch off, empty
    /// video) complete normally with the frame marked invalid.
    pub fn process(
        &mut self,
        data: &mut FrameData,
        calibration: &CalibrationInput<'_>,
        toggles: &LayerToggles,
    ) {
        let _span = tracing::debug_span!("visualize_frame").entered();

        let vis = data
            .results
            .entry(VIS_FRAME_KEY)
            .or_insert_with(VisualizationFrame::new);

        if !toggles.enabled {
            vis.valid = false;
            return;
        }
        let (width, height) = (data.video.width, data.video.height);
        if width == 0 || height == 0 {
            tracing::debug!("no video data; skipping visualization");
            vis.valid = false;
            return;
        }

        // Full replacement on dimension change; stale contents of a
        // same-sized buffer are always overwritten or blanked below.
        if vis.image.dimensions() != (width, height) {
            vis.image = image::RgbImage::new(width, height);
        }
        let mut canvas = Canvas::new(&mut vis.image);

        if toggles.image {
            if let Err(err) = convert::convert_into(&data.video, canvas.image_mut()) {
                tracing::warn!("{err}; showing blank frame");
            }
            if toggles.greyscale {
                canvas.greyscale();
            }
        } else {
            canvas.fill_black();
        }

        if toggles.thresholded {
            if let (Some(table), Some(labels)) = (&self.color_table, &data.labels) {
                segmentation::render_segmentation(&mut canvas, labels, table);
            }
        }

        if toggles.blobs {
            if let Some(regions) = &data.regions {
                blobs::render_blobs(&mut canvas, regions, self.color_table.as_deref());
            }
        }

        if toggles.camera_calibration {
            landmarks::render_landmarks(&mut canvas, calibration.camera);
        }

        if toggles.calibration_result {
            field_lines::render_field_geometry(&mut canvas, calibration.camera);
        }

        if toggles.full_edge_detection {
            let grey = self.scratch_grey.get_or_insert_with(|| GrayImage::new(width, height));
            if grey.dimensions() != (width, height) {
                *grey = GrayImage::new(width, height);
            }
            let classes = self
                .scratch_classes
                .get_or_insert_with(|| GrayImage::new(width, height));
            if classes.dimensions() != (width, height) {
                *classes = GrayImage::new(width, height);
            }
            edges::render_edge_classification(&mut canvas, grey, classes);
        }

        if toggles.detected_edges {
            edge_samples::render_edge_samples(&mut canvas, calibration.edge_samples);
        }

        vis.valid = true;
    }
}

impl Default for VisualizationRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CalibrationInput, CameraModel, PinholeCamera};
    use crate::convert::{PixelFormat, VideoFrame};
    use crate::frame::{Region, RegionLists, SegmentationLabels};
    use image::Rgb;

    fn grey_frame(width: u32, height: u32, value: u8) -> VideoFrame {
        VideoFrame::new(
            width,
            height,
            PixelFormat::Rgb8,
            vec![value; (width * height * 3) as usize],
        )
    }

    fn calibration(camera: &PinholeCamera) -> CalibrationInput<'_> {
        CalibrationInput {
            camera,
            edge_samples: &[],
        }
    }

    #[test]
    fn test_master_switch_off_marks_invalid() {
        let camera = PinholeCamera::overhead(64, 48, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(64, 48, 128));
        let toggles = LayerToggles {
            enabled: false,
            ..LayerToggles::default()
        };
        renderer.process(&mut data, &calibration(&camera), &toggles);
        let vis = data.visualization().expect("frame entry exists");
        assert!(!vis.valid);
    }

    #[test]
    fn test_zero_sized_video_marks_invalid_without_mutation() {
        let camera = PinholeCamera::overhead(64, 48, 4000.0);
        let mut renderer = VisualizationRenderer::new();

        // First a valid frame, so the canvas holds known content.
        let mut data = FrameData::new(grey_frame(64, 48, 77));
        renderer.process(&mut data, &calibration(&camera), &LayerToggles::default());
        let before = data.visualization().unwrap().image.clone();

        // Then the source disappears.
        data.video = VideoFrame::new(0, 48, PixelFormat::Rgb8, Vec::new());
        renderer.process(&mut data, &calibration(&camera), &LayerToggles::default());
        let vis = data.visualization().unwrap();
        assert!(!vis.valid);
        assert_eq!(vis.image.as_raw(), before.as_raw());
    }

    #[test]
    fn test_all_layers_scenario_640x480() {
        let camera = PinholeCamera::overhead(640, 480, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(640, 480, 90));
        renderer.process(&mut data, &calibration(&camera), &LayerToggles::default());

        let vis = data.visualization().unwrap();
        assert!(vis.valid);
        assert_eq!(vis.image.dimensions(), (640, 480));

        // Principal-point cross: probe a point on the diagonal, off the
        // projected grid lines that cross the image center.
        let [px, py] = camera.principal_point();
        assert_eq!(
            *vis.image.get_pixel(px as u32 - 10, py as u32 - 10),
            colors::PRINCIPAL_POINT
        );

        // The halfway line runs along the left of the view; probe its
        // midpoint.
        let [mx, my] = camera.field_to_image([0.0, 0.0, 0.0]);
        assert_eq!(
            *vis.image.get_pixel(mx as u32, my as u32),
            colors::FIELD_LINE
        );

        // Away from every overlay the greyscale base image shows through.
        assert_eq!(*vis.image.get_pixel(5, 5), Rgb([90, 90, 90]));
    }

    #[test]
    fn test_flat_grey_full_edge_detection_is_all_neutral() {
        let camera = PinholeCamera::overhead(64, 48, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(64, 48, 128));
        let toggles = LayerToggles {
            image: true,
            greyscale: false,
            thresholded: false,
            blobs: false,
            camera_calibration: false,
            calibration_result: false,
            detected_edges: false,
            full_edge_detection: true,
            ..LayerToggles::default()
        };
        renderer.process(&mut data, &calibration(&camera), &toggles);
        let vis = data.visualization().unwrap();
        assert!(vis.valid);
        assert!(vis.image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_image_layer_off_blanks_canvas() {
        let camera = PinholeCamera::overhead(64, 48, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(64, 48, 200));
        let toggles = LayerToggles {
            image: false,
            thresholded: false,
            blobs: false,
            camera_calibration: false,
            calibration_result: false,
            detected_edges: false,
            ..LayerToggles::default()
        };
        renderer.process(&mut data, &calibration(&camera), &toggles);
        let vis = data.visualization().unwrap();
        assert!(vis.valid);
        assert!(vis.image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_unsupported_format_renders_blank_but_valid() {
        let camera = PinholeCamera::overhead(64, 48, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let video = VideoFrame::new(
            64,
            48,
            PixelFormat::Yuyv422,
            vec![128; 64 * 48 * 2],
        );
        let mut data = FrameData::new(video);
        let toggles = LayerToggles {
            greyscale: false,
            thresholded: false,
            blobs: false,
            camera_calibration: false,
            calibration_result: false,
            detected_edges: false,
            ..LayerToggles::default()
        };
        renderer.process(&mut data, &calibration(&camera), &toggles);
        let vis = data.visualization().unwrap();
        assert!(vis.valid);
        assert!(vis.image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_dimension_change_reallocates_canvas() {
        let camera = PinholeCamera::overhead(64, 48, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(64, 48, 10));
        renderer.process(&mut data, &calibration(&camera), &LayerToggles::default());
        assert_eq!(data.visualization().unwrap().image.dimensions(), (64, 48));

        data.video = grey_frame(32, 24, 10);
        renderer.process(&mut data, &calibration(&camera), &LayerToggles::default());
        let vis = data.visualization().unwrap();
        assert!(vis.valid);
        assert_eq!(vis.image.dimensions(), (32, 24));
    }

    #[test]
    fn test_segmentation_needs_attached_color_table() {
        let camera = PinholeCamera::overhead(8, 8, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(8, 8, 0));
        data.labels = Some(SegmentationLabels::new(vec![1; 64]));
        let toggles = LayerToggles {
            greyscale: false,
            blobs: false,
            camera_calibration: false,
            calibration_result: false,
            detected_edges: false,
            ..LayerToggles::default()
        };

        // No table attached: the layer renders nothing.
        renderer.process(&mut data, &calibration(&camera), &toggles);
        assert!(data
            .visualization()
            .unwrap()
            .image
            .pixels()
            .all(|p| *p == Rgb([0, 0, 0])));

        // With a table, every labelled pixel takes the channel color.
        let table = DrawColorTable::new(vec![Rgb([9, 9, 9]), Rgb([200, 30, 40])]);
        renderer.set_color_table(Some(Arc::new(table)));
        renderer.process(&mut data, &calibration(&camera), &toggles);
        assert!(data
            .visualization()
            .unwrap()
            .image
            .pixels()
            .all(|p| *p == Rgb([200, 30, 40])));
    }

    #[test]
    fn test_blob_overlay_runs_without_color_table() {
        let camera = PinholeCamera::overhead(16, 16, 4000.0);
        let mut renderer = VisualizationRenderer::new();
        let mut data = FrameData::new(grey_frame(16, 16, 0));
        data.regions = Some(RegionLists::new(vec![vec![Region {
            x1: 2,
            y1: 2,
            x2: 10,
            y2: 9,
        }]]));
        let toggles = LayerToggles {
            greyscale: false,
            thresholded: false,
            camera_calibration: false,
            calibration_result: false,
            detected_edges: false,
            ..LayerToggles::default()
        };
        renderer.process(&mut data, &calibration(&camera), &toggles);
        let vis = data.visualization().unwrap();
        assert_eq!(*vis.image.get_pixel(2, 2), colors::DEFAULT_DRAW);
        assert_eq!(*vis.image.get_pixel(10, 9), colors::DEFAULT_DRAW);
    }
}
