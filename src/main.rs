use anyhow::{bail, Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fieldviz::{
    CalibrationInput, CameraModel, DrawColorTable, FrameData, LayerToggles, LineSegmentSamples,
    PinholeCamera, PixelFormat, Region, RegionLists, SegmentationLabels, VideoFrame,
    VisualizationRenderer,
};

/// Height of the demo camera above the field plane, in millimeters.
const CAMERA_HEIGHT_MM: f64 = 4000.0;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source video width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Source video height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Number of frames to render
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Source pixel encoding (rgb8, uyvy422, yuyv422)
    #[arg(long, default_value = "rgb8")]
    format: String,

    /// Disable the raw image layer
    #[arg(long)]
    no_image: bool,

    /// Disable the greyscale reduction of the image layer
    #[arg(long)]
    no_greyscale: bool,

    /// Disable the segmentation overlay
    #[arg(long)]
    no_thresholded: bool,

    /// Disable the blob outlines
    #[arg(long)]
    no_blobs: bool,

    /// Disable the calibration landmark overlay
    #[arg(long)]
    no_camera_calibration: bool,

    /// Disable the projected field geometry
    #[arg(long)]
    no_calibration_result: bool,

    /// Disable the calibration edge-sample overlay
    #[arg(long)]
    no_detected_edges: bool,

    /// Enable the whole-frame edge-classification layer
    #[arg(long)]
    full_edge_detection: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("fieldviz demo starting");
    tracing::info!("Source: {}x{} ({})", args.width, args.height, args.format);

    let format = parse_format(&args.format)?;
    let toggles = LayerToggles {
        enabled: true,
        image: !args.no_image,
        greyscale: !args.no_greyscale,
        thresholded: !args.no_thresholded,
        blobs: !args.no_blobs,
        camera_calibration: !args.no_camera_calibration,
        calibration_result: !args.no_calibration_result,
        detected_edges: !args.no_detected_edges,
        full_edge_detection: args.full_edge_detection,
    };

    let camera = PinholeCamera::overhead(args.width, args.height, CAMERA_HEIGHT_MM);
    let edge_samples = demo_edge_samples(&camera);

    let mut renderer = VisualizationRenderer::new();
    renderer.set_color_table(Some(Arc::new(demo_color_table())));

    let mut source = SyntheticCapture::new(args.width, args.height, format);

    run_pipeline(
        &mut source,
        &mut renderer,
        &camera,
        &edge_samples,
        &toggles,
        args.frames,
    )
}

fn run_pipeline(
    source: &mut SyntheticCapture,
    renderer: &mut VisualizationRenderer,
    camera: &PinholeCamera,
    edge_samples: &[LineSegmentSamples],
    toggles: &LayerToggles,
    frames: u64,
) -> Result<()> {
    let calibration = CalibrationInput {
        camera,
        edge_samples,
    };
    let mut total_render_time = Duration::ZERO;

    tracing::info!("Starting render loop ({} frames)", frames);

    for frame_count in 1..=frames {
        let mut data = source.next_frame();

        let render_start = Instant::now();
        renderer.process(&mut data, &calibration, toggles);
        total_render_time += render_start.elapsed();

        let vis = data
            .visualization()
            .context("renderer published no visualization frame")?;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_ms = total_render_time.as_secs_f64() * 1000.0 / frame_count as f64;
            tracing::info!(
                "Frame {}: render={:.2}ms, fps={:.1}, valid={}",
                frame_count,
                avg_ms,
                1000.0 / avg_ms,
                vis.valid
            );
        }
    }

    Ok(())
}

fn parse_format(name: &str) -> Result<PixelFormat> {
    match name.to_ascii_lowercase().as_str() {
        "rgb8" => Ok(PixelFormat::Rgb8),
        "uyvy422" | "uyvy" => Ok(PixelFormat::Uyvy422),
        "yuyv422" | "yuyv" => Ok(PixelFormat::Yuyv422),
        other => bail!("unknown pixel format: {other}"),
    }
}

/// Draw colors for the demo segmentation channels: 0 is background,
/// 1 the ball, 2 a robot shell.
fn demo_color_table() -> DrawColorTable {
    DrawColorTable::new(vec![
        Rgb([0, 0, 0]),
        Rgb([255, 128, 0]),
        Rgb([64, 128, 255]),
    ])
}

/// Edge samples as the calibration collector would record them: points
/// along the far touchline (horizontal in the image) and the goal line.
fn demo_edge_samples(camera: &dyn CameraModel) -> Vec<LineSegmentSamples> {
    let touchline: Vec<[f64; 2]> = (0..=5)
        .map(|i| camera.field_to_image([i as f64 * 500.0, -fieldviz::field::HALF_FIELD_WIDTH, 0.0]))
        .collect();
    let goal_line: Vec<[f64; 2]> = (-3..=3)
        .map(|i| camera.field_to_image([fieldviz::field::HALF_FIELD_LENGTH, i as f64 * 500.0, 0.0]))
        .collect();
    vec![
        LineSegmentSamples {
            name: "left touchline".to_string(),
            horizontal: true,
            points: touchline,
        },
        LineSegmentSamples {
            name: "goal line".to_string(),
            horizontal: false,
            points: goal_line,
        },
    ]
}

/// Deterministic stand-in for the capture system: a shaded background
/// with a moving ball and a parked robot, plus the matching segmentation
/// labels and region boxes a detector would emit.
struct SyntheticCapture {
    width: u32,
    height: u32,
    format: PixelFormat,
    frame_id: u64,
}

impl SyntheticCapture {
    fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            frame_id: 0,
        }
    }

    fn next_frame(&mut self) -> FrameData {
        let (rgb, labels, regions) = self.scene();

        let bytes = match self.format {
            PixelFormat::Rgb8 => rgb.into_raw(),
            // yuyv gets UYVY-packed bytes under its own tag; the renderer
            // treats that format as unsupported and shows a blank frame.
            PixelFormat::Uyvy422 | PixelFormat::Yuyv422 => rgb_to_uyvy(&rgb),
        };

        let mut data = FrameData::new(VideoFrame::new(
            self.width,
            self.height,
            self.format,
            bytes,
        ));
        data.labels = Some(SegmentationLabels::new(labels));
        data.regions = Some(regions);
        self.frame_id += 1;
        data
    }

    fn scene(&self) -> (RgbImage, Vec<u8>, RegionLists) {
        let (w, h) = (self.width, self.height);
        let mut rgb = RgbImage::from_fn(w, h, |x, y| {
            let v = (((x + y) / 4) % 64 + 96) as u8;
            Rgb([v, v, v])
        });
        let mut labels = vec![0u8; (w * h) as usize];

        let ball_x = ((self.frame_id * 3) % w.saturating_sub(16).max(1) as u64) as i32;
        let ball = Region {
            x1: ball_x,
            y1: (h / 3) as i32,
            x2: ball_x + 10,
            y2: (h / 3) as i32 + 10,
        };
        let robot = Region {
            x1: (w / 2) as i32,
            y1: (h / 2) as i32,
            x2: (w / 2) as i32 + 24,
            y2: (h / 2) as i32 + 24,
        };
        paint_blob(&mut rgb, &mut labels, &ball, 1, Rgb([230, 120, 30]));
        paint_blob(&mut rgb, &mut labels, &robot, 2, Rgb([40, 90, 220]));

        let regions = RegionLists::new(vec![Vec::new(), vec![ball], vec![robot]]);
        (rgb, labels, regions)
    }
}

/// Fill a region with `color` and stamp its pixels with `channel` in the
/// label buffer.
fn paint_blob(
    rgb: &mut RgbImage,
    labels: &mut [u8],
    region: &Region,
    channel: u8,
    color: Rgb<u8>,
) {
    let (w, h) = rgb.dimensions();
    for y in region.y1.max(0)..=region.y2.min(h as i32 - 1) {
        for x in region.x1.max(0)..=region.x2.min(w as i32 - 1) {
            rgb.put_pixel(x as u32, y as u32, color);
            labels[y as usize * w as usize + x as usize] = channel;
        }
    }
}

/// Convert an RGB frame to UYVY 4:2:2, averaging chroma per pixel pair.
fn rgb_to_uyvy(rgb: &RgbImage) -> Vec<u8> {
    let (width, height) = rgb.dimensions();
    let mut uyvy = Vec::with_capacity((width * height * 2) as usize);

    for y in 0..height {
        for x in (0..width).step_by(2) {
            let pixel1 = rgb.get_pixel(x, y);
            let pixel2 = if x + 1 < width {
                rgb.get_pixel(x + 1, y)
            } else {
                pixel1
            };

            let (y1, u1, v1) = rgb_to_yuv(pixel1[0], pixel1[1], pixel1[2]);
            let (y2, u2, v2) = rgb_to_yuv(pixel2[0], pixel2[1], pixel2[2]);

            // Average U and V for the pair of pixels
            let u = ((u1 as u16 + u2 as u16) / 2) as u8;
            let v = ((v1 as u16 + v2 as u16) / 2) as u8;

            uyvy.push(u);
            uyvy.push(y1);
            uyvy.push(v);
            uyvy.push(y2);
        }
    }

    uyvy
}

/// Convert RGB to YUV color space
fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    let y = (0.299 * r + 0.587 * g + 0.114 * b).clamp(0.0, 255.0) as u8;
    let u = ((-0.147 * r - 0.289 * g + 0.436 * b) + 128.0).clamp(0.0, 255.0) as u8;
    let v = ((0.615 * r - 0.515 * g - 0.100 * b) + 128.0).clamp(0.0, 255.0) as u8;

    (y, u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_accepts_known_names() {
        assert_eq!(parse_format("rgb8").unwrap(), PixelFormat::Rgb8);
        assert_eq!(parse_format("UYVY").unwrap(), PixelFormat::Uyvy422);
        assert!(parse_format("nv12").is_err());
    }

    #[test]
    fn test_synthetic_labels_match_regions() {
        let mut source = SyntheticCapture::new(64, 48, PixelFormat::Rgb8);
        let data = source.next_frame();
        let labels = data.labels.as_ref().unwrap();
        let regions = data.regions.as_ref().unwrap();

        assert_eq!(labels.data.len(), 64 * 48);
        let robot = regions.channels[2][0];
        let idx = robot.y1 as usize * 64 + robot.x1 as usize;
        assert_eq!(labels.data[idx], 2);
    }

    #[test]
    fn test_uyvy_buffer_has_two_bytes_per_pixel() {
        let mut source = SyntheticCapture::new(64, 48, PixelFormat::Uyvy422);
        let data = source.next_frame();
        assert_eq!(data.video.data.len(), 64 * 48 * 2);
    }
}
