use std::path::Path;

use image::{imageops::FilterType, ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::config::BackgroundFit;
use crate::error::{RenderError, Result};

/// An RGB canvas for one still
///
/// A thin wrapper around an image buffer with the fills and blends the themes need.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with black
    pub fn new_black(width: u32, height: u32) -> Self {
        Self::new_filled(width, height, [0, 0, 0])
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb(color));
        Self { buffer }
    }

    /// Top-to-bottom linear gradient
    pub fn vertical_gradient(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> Self {
        let span = height.saturating_sub(1).max(1) as f32;
        let buffer = ImageBuffer::from_fn(width, height, |_, y| {
            let t = y as f32 / span;
            Rgb(mix(top, bottom, t))
        });
        Self { buffer }
    }

    /// Load a background image and fit it to `size`
    pub fn from_background<P: AsRef<Path>>(path: P, size: (u32, u32), fit: BackgroundFit) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|_| RenderError::BackgroundLoadFailed {
                path: path.display().to_string(),
            })?
            .to_rgb8();

        let (w, h) = size;
        let buffer = match fit {
            BackgroundFit::Stretch => image::imageops::resize(&image, w, h, FilterType::Lanczos3),
            BackgroundFit::Cover => {
                let scale = (w as f32 / image.width() as f32).max(h as f32 / image.height() as f32);
                let sw = ((image.width() as f32 * scale).ceil() as u32).max(w);
                let sh = ((image.height() as f32 * scale).ceil() as u32).max(h);
                let scaled = image::imageops::resize(&image, sw, sh, FilterType::Lanczos3);
                let x = (sw - w) / 2;
                let y = (sh - h) / 2;
                image::imageops::crop_imm(&scaled, x, y, w, h).to_image()
            }
        };

        Ok(Self { buffer })
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Blend `color` over the pixel with coverage `alpha`; out-of-bounds writes are ignored
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let pixel = self.buffer.get_pixel_mut(x as u32, y as u32);
        pixel.0 = mix(pixel.0, color, alpha);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 3]) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(&mut self.buffer, Rect::at(x, y).of_size(width, height), Rgb(color));
    }

    /// Filled rectangle with rounded corners
    pub fn fill_rounded_rect(&mut self, x: i32, y: i32, width: u32, height: u32, radius: u32, color: [u8; 3]) {
        let radius = radius.min(width / 2).min(height / 2);
        if radius == 0 {
            self.fill_rect(x, y, width, height, color);
            return;
        }

        let r = radius as i32;
        let (w, h) = (width as i32, height as i32);

        self.fill_rect(x + r, y, width - 2 * radius, height, color);
        self.fill_rect(x, y + r, width, height - 2 * radius, color);

        for (cx, cy) in [
            (x + r, y + r),
            (x + w - r - 1, y + r),
            (x + r, y + h - r - 1),
            (x + w - r - 1, y + h - r - 1),
        ] {
            draw_filled_circle_mut(&mut self.buffer, (cx, cy), r, Rgb(color));
        }
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.buffer.save(path).map_err(|e| {
            RenderError::SaveFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Linear blend from `a` to `b`
pub fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])]
}
