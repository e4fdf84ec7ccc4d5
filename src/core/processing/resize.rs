//! Letterbox resize-and-crop: scale an image uniformly until it covers the
//! target rectangle, then crop the overflowing axis at a caller-chosen offset.
//!
//! The returned scale factor and pixel offsets map a point `(x, y)` of the
//! source image to `(x * r - delta_u, y * r - delta_v)` in the output, which is
//! what downstream reprojection (camera intrinsics, sparse depth points) needs.
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, ImageBuffer, Pixel};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::params::LetterboxParams;
use crate::error::{Error, Result};
use crate::types::Interpolation;

/// Interleaved 8-bit samples in row-major HWC order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(Error::UnsupportedChannels { channels });
        }
        if data.len() != width * height * channels {
            return Err(Error::Processing(format!(
                "buffer of {} samples does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    fn row_stride(&self) -> usize {
        self.width * self.channels
    }
}

/// Images that can go through [`resize_and_crop`]. The output of the
/// operation has the same type as its input.
pub trait LetterboxImage: Sized {
    fn to_pixels(&self) -> Result<PixelBuffer>;
    fn from_pixels(pixels: PixelBuffer) -> Result<Self>;
}

impl LetterboxImage for Array2<u8> {
    fn to_pixels(&self) -> Result<PixelBuffer> {
        let (rows, cols) = self.dim();
        PixelBuffer::new(cols, rows, 1, self.iter().copied().collect())
    }

    fn from_pixels(pixels: PixelBuffer) -> Result<Self> {
        if pixels.channels != 1 {
            return Err(Error::UnsupportedChannels {
                channels: pixels.channels,
            });
        }
        Ok(Array2::from_shape_vec(
            (pixels.height, pixels.width),
            pixels.data,
        )?)
    }
}

impl LetterboxImage for Array3<u8> {
    fn to_pixels(&self) -> Result<PixelBuffer> {
        let (rows, cols, channels) = self.dim();
        // Logical iteration order is HWC regardless of memory layout
        PixelBuffer::new(cols, rows, channels, self.iter().copied().collect())
    }

    fn from_pixels(pixels: PixelBuffer) -> Result<Self> {
        Ok(Array3::from_shape_vec(
            (pixels.height, pixels.width, pixels.channels),
            pixels.data,
        )?)
    }
}

impl<P> LetterboxImage for ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    fn to_pixels(&self) -> Result<PixelBuffer> {
        PixelBuffer::new(
            self.width() as usize,
            self.height() as usize,
            P::CHANNEL_COUNT as usize,
            self.as_raw().clone(),
        )
    }

    fn from_pixels(pixels: PixelBuffer) -> Result<Self> {
        if pixels.channels != P::CHANNEL_COUNT as usize {
            return Err(Error::UnsupportedChannels {
                channels: pixels.channels,
            });
        }
        let (width, height) = (pixels.width, pixels.height);
        ImageBuffer::from_raw(width as u32, height as u32, pixels.data).ok_or_else(|| {
            Error::Processing(format!("cannot build {}x{} image from buffer", width, height))
        })
    }
}

/// Luma8, LumaA8 and Rgba8 images keep their layout; anything else is
/// converted to Rgb8.
impl LetterboxImage for DynamicImage {
    fn to_pixels(&self) -> Result<PixelBuffer> {
        match self {
            DynamicImage::ImageLuma8(img) => img.to_pixels(),
            DynamicImage::ImageLumaA8(img) => img.to_pixels(),
            DynamicImage::ImageRgb8(img) => img.to_pixels(),
            DynamicImage::ImageRgba8(img) => img.to_pixels(),
            other => other.to_rgb8().to_pixels(),
        }
    }

    fn from_pixels(pixels: PixelBuffer) -> Result<Self> {
        Ok(match pixels.channels {
            1 => DynamicImage::ImageLuma8(LetterboxImage::from_pixels(pixels)?),
            2 => DynamicImage::ImageLumaA8(LetterboxImage::from_pixels(pixels)?),
            3 => DynamicImage::ImageRgb8(LetterboxImage::from_pixels(pixels)?),
            4 => DynamicImage::ImageRgba8(LetterboxImage::from_pixels(pixels)?),
            channels => return Err(Error::UnsupportedChannels { channels }),
        })
    }
}

/// The axis whose scaled size equals the target exactly. The other axis is cropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivenAxis {
    Width,
    Height,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LetterboxPlan {
    pub driven: DrivenAxis,
    /// Uniform scale factor `r` applied to both axes
    pub ratio: f64,
    pub scaled_h: usize,
    pub scaled_w: usize,
    /// Crop window `[start, end)` along the non-driven axis of the scaled image
    pub crop_start: usize,
    pub crop_end: usize,
}

impl LetterboxPlan {
    pub fn delta_u(&self) -> usize {
        match self.driven {
            DrivenAxis::Height => self.crop_start,
            DrivenAxis::Width => 0,
        }
    }

    pub fn delta_v(&self) -> usize {
        match self.driven {
            DrivenAxis::Width => self.crop_start,
            DrivenAxis::Height => 0,
        }
    }
}

/// Pinhole camera intrinsics in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone)]
pub struct LetterboxResult<I> {
    pub image: I,
    pub r: f64,
    pub delta_u: usize,
    pub delta_v: usize,
}

impl<I> LetterboxResult<I> {
    /// Map a source-image coordinate into the output image.
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.r - self.delta_u as f64,
            y * self.r - self.delta_v as f64,
        )
    }

    pub fn adjust_intrinsics(&self, k: &Intrinsics) -> Intrinsics {
        let (cx, cy) = self.map_point(k.cx, k.cy);
        Intrinsics {
            fx: k.fx * self.r,
            fy: k.fy * self.r,
            cx,
            cy,
        }
    }
}

fn checked_crop_window(
    axis: &'static str,
    shift_arg: &'static str,
    scaled: usize,
    target: usize,
    shift: f64,
) -> Result<(usize, usize)> {
    if !shift.is_finite() {
        return Err(Error::InvalidArgument {
            arg: shift_arg,
            value: shift.to_string(),
        });
    }
    let start_f = (scaled as f64 * shift).floor();
    // Casts saturate, so a huge shift lands at i64::MAX instead of wrapping
    let start = start_f as i64;
    let end = start.saturating_add(target as i64);
    if !(0.0..=scaled as f64).contains(&start_f) || start < 0 || end > scaled as i64 {
        return Err(Error::CropOutOfBounds {
            axis,
            start,
            end,
            scaled,
        });
    }
    Ok((start as usize, end as usize))
}

/// Decide the driven axis, scaled size and crop window for a letterbox
/// resize without touching any pixels.
///
/// Only the shift of the cropped axis is read; the other one is ignored.
pub fn plan_letterbox(
    raw_h: usize,
    raw_w: usize,
    target_h: usize,
    target_w: usize,
    shift_h: f64,
    shift_w: f64,
) -> Result<LetterboxPlan> {
    if target_h == 0 {
        return Err(Error::ZeroSize { size: target_h });
    }
    if target_w == 0 {
        return Err(Error::ZeroSize { size: target_w });
    }
    if raw_h < target_h {
        return Err(Error::Upscale {
            axis: "height",
            raw: raw_h,
            target: target_h,
        });
    }
    if raw_w < target_w {
        return Err(Error::Upscale {
            axis: "width",
            raw: raw_w,
            target: target_w,
        });
    }

    // target_h / raw_h <= target_w / raw_w, cross-multiplied to stay exact
    let (th, tw, rh, rw) = (
        target_h as u128,
        target_w as u128,
        raw_h as u128,
        raw_w as u128,
    );
    let plan = if th * rw <= tw * rh {
        let scaled_h = (rh * tw / rw) as usize;
        let (crop_start, crop_end) =
            checked_crop_window("height", "shift_h", scaled_h, target_h, shift_h)?;
        LetterboxPlan {
            driven: DrivenAxis::Width,
            ratio: target_w as f64 / raw_w as f64,
            scaled_h,
            scaled_w: target_w,
            crop_start,
            crop_end,
        }
    } else {
        let scaled_w = (rw * th / rh) as usize;
        let (crop_start, crop_end) =
            checked_crop_window("width", "shift_w", scaled_w, target_w, shift_w)?;
        LetterboxPlan {
            driven: DrivenAxis::Height,
            ratio: target_h as f64 / raw_h as f64,
            scaled_h: target_h,
            scaled_w,
            crop_start,
            crop_end,
        }
    };

    debug!(
        "Letterbox plan: {:?}-driven, r={:.6}, scaled {}x{}, crop [{}, {})",
        plan.driven, plan.ratio, plan.scaled_w, plan.scaled_h, plan.crop_start, plan.crop_end
    );
    Ok(plan)
}

fn pixel_type(channels: usize) -> Result<PixelType> {
    match channels {
        1 => Ok(PixelType::U8),
        2 => Ok(PixelType::U8x2),
        3 => Ok(PixelType::U8x3),
        4 => Ok(PixelType::U8x4),
        channels => Err(Error::UnsupportedChannels { channels }),
    }
}

fn resize_alg(interpolation: Interpolation) -> ResizeAlg {
    match interpolation {
        Interpolation::Nearest => ResizeAlg::Nearest,
        Interpolation::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        Interpolation::Cubic => ResizeAlg::Convolution(FilterType::CatmullRom),
        Interpolation::Area => ResizeAlg::Convolution(FilterType::Box),
        Interpolation::Lanczos => ResizeAlg::Convolution(FilterType::Lanczos3),
    }
}

pub fn resize_pixels(
    src: &PixelBuffer,
    target_cols: usize,
    target_rows: usize,
    interpolation: Interpolation,
) -> Result<PixelBuffer> {
    if src.width == target_cols && src.height == target_rows {
        return Ok(src.clone());
    }
    let pixel_type = pixel_type(src.channels)?;
    let resize_options = ResizeOptions::new().resize_alg(resize_alg(interpolation));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        src.width as u32,
        src.height as u32,
        src.data.clone(),
        pixel_type,
    )
    .map_err(Error::processing)?;
    let mut dst_image = Image::new(target_cols as u32, target_rows as u32, pixel_type);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(Error::processing)?;

    PixelBuffer::new(target_cols, target_rows, src.channels, dst_image.into_vec())
}

fn crop_rows(src: &PixelBuffer, start: usize, end: usize) -> Result<PixelBuffer> {
    let stride = src.row_stride();
    PixelBuffer::new(
        src.width,
        end - start,
        src.channels,
        src.data[start * stride..end * stride].to_vec(),
    )
}

fn crop_cols(src: &PixelBuffer, start: usize, end: usize) -> Result<PixelBuffer> {
    let channels = src.channels;
    let new_cols = end - start;
    let mut out = Vec::with_capacity(new_cols * src.height * channels);
    // Copy per row using slice copies to minimize per-pixel indexing
    for row in src.data.chunks_exact(src.row_stride()) {
        out.extend_from_slice(&row[start * channels..end * channels]);
    }
    PixelBuffer::new(new_cols, src.height, channels, out)
}

/// Downscale `image` to cover `target_h` x `target_w`, then crop the
/// overflowing axis starting at `floor(scaled_size * shift)`.
///
/// Fails with [`Error::Upscale`] if the source is smaller than the target on
/// either axis, and with [`Error::CropOutOfBounds`] if the shift leaves no
/// room for the full target size.
pub fn resize_and_crop<I: LetterboxImage>(
    image: &I,
    target_h: usize,
    target_w: usize,
    shift_h: f64,
    shift_w: f64,
    interpolation: Interpolation,
) -> Result<LetterboxResult<I>> {
    let pixels = image.to_pixels()?;
    let plan = plan_letterbox(
        pixels.height,
        pixels.width,
        target_h,
        target_w,
        shift_h,
        shift_w,
    )?;

    info!(
        "Original size: {}x{}, Scaled size: {}x{}, Output size: {}x{}",
        pixels.width, pixels.height, plan.scaled_w, plan.scaled_h, target_w, target_h
    );

    let scaled = resize_pixels(&pixels, plan.scaled_w, plan.scaled_h, interpolation)?;
    let cropped = match plan.driven {
        DrivenAxis::Width => crop_rows(&scaled, plan.crop_start, plan.crop_end)?,
        DrivenAxis::Height => crop_cols(&scaled, plan.crop_start, plan.crop_end)?,
    };

    Ok(LetterboxResult {
        image: I::from_pixels(cropped)?,
        r: plan.ratio,
        delta_u: plan.delta_u(),
        delta_v: plan.delta_v(),
    })
}

pub fn resize_and_crop_with_params<I: LetterboxImage>(
    image: &I,
    params: &LetterboxParams,
) -> Result<LetterboxResult<I>> {
    resize_and_crop(
        image,
        params.target_h,
        params.target_w,
        params.shift_h,
        params.shift_w,
        params.interpolation,
    )
}
