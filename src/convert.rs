use image::{Rgb, RgbImage};
use thiserror::Error;

/// Pixel encoding of a source video buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 8-bit RGB triplets.
    Rgb8,
    /// Packed 4:2:2 luma/chroma, U0 Y0 V0 Y1 byte order.
    Uyvy422,
    /// Packed 4:2:2 luma/chroma, Y0 U0 Y1 V0 byte order.
    Yuyv422,
}

impl PixelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rgb8 => "rgb8",
            Self::Uyvy422 => "yuv422 (uyvy)",
            Self::Yuyv422 => "yuv422 (yuyv)",
        }
    }
}

/// One captured video frame as delivered by the capture system.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }

    pub fn num_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unable to visualize color format {}: supported formats are rgb8 and yuv422 (uyvy)", .0.as_str())]
    UnsupportedFormat(PixelFormat),
}

/// Fill `out` with the RGB equivalent of `frame`.
///
/// RGB sources are copied byte for byte. UYVY sources go through the
/// standard interleave-to-RGB expansion. Any other encoding blanks `out`
/// to black and reports the format as unsupported; the caller is expected
/// to log and continue.
pub fn convert_into(frame: &VideoFrame, out: &mut RgbImage) -> Result<(), ConvertError> {
    match frame.format {
        PixelFormat::Rgb8 => {
            let dst: &mut [u8] = &mut **out;
            if frame.data.len() == dst.len() {
                dst.copy_from_slice(&frame.data);
            } else {
                // Malformed upstream buffer: keep every pixel defined.
                dst.fill(0);
                let n = dst.len().min(frame.data.len());
                dst[..n].copy_from_slice(&frame.data[..n]);
            }
            Ok(())
        }
        PixelFormat::Uyvy422 => {
            let dst: &mut [u8] = &mut **out;
            dst.fill(0);
            for (src, pair) in frame.data.chunks_exact(4).zip(dst.chunks_exact_mut(6)) {
                let (u, y0, v, y1) = (src[0], src[1], src[2], src[3]);
                let Rgb(first) = yuv_to_rgb(y0, u, v);
                let Rgb(second) = yuv_to_rgb(y1, u, v);
                pair[..3].copy_from_slice(&first);
                pair[3..].copy_from_slice(&second);
            }
            Ok(())
        }
        other => {
            let dst: &mut [u8] = &mut **out;
            dst.fill(0);
            Err(ConvertError::UnsupportedFormat(other))
        }
    }
}

/// Convert YUV to RGB color space.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> Rgb<u8> {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.140 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.395 * u - 0.581 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 2.032 * u).clamp(0.0, 255.0) as u8;

    Rgb([r, g, b])
}
