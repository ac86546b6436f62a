//! Turn a fetched PNG into a 1-bit bitmap sized for the panel
//!
//! The image is scaled to fit the target box with its aspect ratio kept,
//! centered on a white background, then reduced to black and white either by
//! a fixed threshold or by Floyd-Steinberg error diffusion.

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use image::imageops::FilterType;
use image::{GrayImage, ImageFormat};

/// Luminance below this is black when not dithering (0-255, 128 = middle gray)
pub const THRESHOLD: u8 = 128;

/// Flags applied while converting to 1-bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Error diffusion instead of a hard threshold
    pub dither: bool,
    /// Swap black and white in the output
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dither: true,
            invert: true,
        }
    }
}

/// 1-bit image covering a whole box, `true` = black
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: Size,
    bits: Vec<bool>,
}

impl Bitmap {
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_black(&self, x: u32, y: u32) -> bool {
        self.bits[(y * self.size.width + x) as usize]
    }

    pub fn black_pixels(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Draw every pixel of the bitmap with its top-left corner at `origin`
    pub fn draw<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let width = self.size.width;
        target.draw_iter(self.bits.iter().enumerate().map(|(i, black)| {
            let i = i as u32;
            let point = origin + Point::new((i % width) as i32, (i / width) as i32);
            let color = if *black {
                BinaryColor::On
            } else {
                BinaryColor::Off
            };
            Pixel(point, color)
        }))
    }
}

/// Decode PNG bytes into 8-bit grayscale
pub fn decode(bytes: &[u8]) -> Result<GrayImage> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .context("Failed to decode PNG")?;
    log::info!("Decoded image {}x{}", image.width(), image.height());
    Ok(image.to_luma8())
}

/// Largest size with the source aspect ratio that fits inside `target`
pub fn fit(source: Size, target: Size) -> Size {
    if source.width == 0 || source.height == 0 || target.width == 0 || target.height == 0 {
        return Size::zero();
    }
    let orig_ratio = source.width as f32 / source.height as f32;
    let target_ratio = target.width as f32 / target.height as f32;

    let (width, height) = if orig_ratio > target_ratio {
        // Image is wider than target - fit to width
        (target.width, (target.width as f32 / orig_ratio) as u32)
    } else {
        // Image is taller than target - fit to height
        ((target.height as f32 * orig_ratio) as u32, target.height)
    };
    Size::new(width.clamp(1, target.width), height.clamp(1, target.height))
}

/// Scale `gray` into a `target` sized bitmap
pub fn rasterize(gray: &GrayImage, target: Size, options: RenderOptions) -> Bitmap {
    let (tw, th) = (target.width, target.height);
    if tw == 0 || th == 0 {
        return Bitmap {
            size: target,
            bits: Vec::new(),
        };
    }

    let fitted = fit(Size::new(gray.width(), gray.height()), target);
    let resized = if fitted.width == gray.width() && fitted.height == gray.height() {
        gray.clone()
    } else {
        image::imageops::resize(gray, fitted.width, fitted.height, FilterType::Triangle)
    };

    let offset_x = (tw - fitted.width) / 2;
    let offset_y = (th - fitted.height) / 2;

    // White background with the image centered on it
    let mut levels = vec![255i16; (tw * th) as usize];
    for (x, y, pixel) in resized.enumerate_pixels() {
        levels[((y + offset_y) * tw + x + offset_x) as usize] = i16::from(pixel[0]);
    }

    let mut bits = if options.dither {
        diffuse(&mut levels, tw as usize, th as usize)
    } else {
        levels.iter().map(|l| *l < i16::from(THRESHOLD)).collect()
    };

    if options.invert {
        bits.iter_mut().for_each(|b| *b = !*b);
    }

    Bitmap { size: target, bits }
}

/// Floyd-Steinberg error diffusion, consumes the levels buffer
fn diffuse(levels: &mut [i16], width: usize, height: usize) -> Vec<bool> {
    let mut bits = vec![false; levels.len()];
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let old = levels[i];
            let black = old < i16::from(THRESHOLD);
            let new = if black { 0 } else { 255 };
            bits[i] = black;

            let error = old - new;
            let mut spread = |dx: isize, dy: usize, weight: i16| {
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx >= 0 && (nx as usize) < width && ny < height {
                    let j = ny * width + nx as usize;
                    levels[j] = levels[j].saturating_add(error * weight / 16);
                }
            };
            spread(1, 0, 7);
            spread(-1, 1, 3);
            spread(0, 1, 5);
            spread(1, 1, 1);
        }
    }
    bits
}

/// Decode and rasterize in one go
pub fn render_png(bytes: &[u8], target: Size, options: RenderOptions) -> Result<Bitmap> {
    let gray = decode(bytes)?;
    Ok(rasterize(&gray, target, options))
}
