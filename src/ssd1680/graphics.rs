//! 1-bit frame buffer for the panel, drawable with `embedded-graphics`

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::ssd1680::{BUFFER_LEN, HEIGHT, WIDTH};

/// Orientation of the logical drawing surface relative to the panel RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayRotation {
    /// Portrait, RAM order
    #[default]
    Rotate0,
    /// Landscape, rotated 90 degrees clockwise
    Rotate90,
    /// Portrait, upside down
    Rotate180,
    /// Landscape, rotated 270 degrees clockwise
    Rotate270,
}

/// Frame buffer in panel RAM layout: rows of `WIDTH / 8` bytes, MSB is the leftmost
/// pixel, bit set = black (`BinaryColor::On`).
pub struct Frame {
    buffer: Vec<u8>,
    rotation: DisplayRotation,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            buffer: vec![0u8; BUFFER_LEN],
            rotation: DisplayRotation::default(),
        }
    }

    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Map a logical point onto (byte index, bit mask), `None` when off-panel
    fn locate(&self, point: Point) -> Option<(usize, u8)> {
        let size = self.size();
        if point.x < 0
            || point.y < 0
            || point.x >= size.width as i32
            || point.y >= size.height as i32
        {
            return None;
        }

        let (w, h) = (i32::from(WIDTH), i32::from(HEIGHT));
        let (x, y) = match self.rotation {
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (w - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => (w - 1 - point.x, h - 1 - point.y),
            DisplayRotation::Rotate270 => (point.y, h - 1 - point.x),
        };

        let index = (y * (w / 8) + x / 8) as usize;
        let mask = 0x80 >> (x % 8);
        Some((index, mask))
    }

    /// Color at a logical point
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        self.locate(point).map(|(index, mask)| {
            if self.buffer[index] & mask != 0 {
                BinaryColor::On
            } else {
                BinaryColor::Off
            }
        })
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => {
                Size::new(u32::from(WIDTH), u32::from(HEIGHT))
            }
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => {
                Size::new(u32::from(HEIGHT), u32::from(WIDTH))
            }
        }
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((index, mask)) = self.locate(point) {
                match color {
                    BinaryColor::On => self.buffer[index] |= mask,
                    BinaryColor::Off => self.buffer[index] &= !mask,
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer.fill(fill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_is_white() {
        let frame = Frame::new();
        assert_eq!(frame.buffer().len(), BUFFER_LEN);
        assert!(frame.buffer().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_rotation_changes_size() {
        let mut frame = Frame::new();
        assert_eq!(frame.size(), Size::new(128, 296));
        frame.set_rotation(DisplayRotation::Rotate270);
        assert_eq!(frame.size(), Size::new(296, 128));
    }

    #[test]
    fn test_rotate0_msb_first() {
        let mut frame = Frame::new();
        Pixel(Point::new(0, 0), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(9, 1), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer()[0], 0x80);
        assert_eq!(frame.buffer()[16 + 1], 0x40);
    }

    #[test]
    fn test_rotate270_maps_to_ram() {
        let mut frame = Frame::new();
        frame.set_rotation(DisplayRotation::Rotate270);

        // Logical top-left lands on the last RAM row, first column
        Pixel(Point::new(0, 0), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer()[295 * 16], 0x80);

        // Logical bottom-right lands on the first RAM row, last column
        Pixel(Point::new(295, 127), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer()[15], 0x01);

        assert_eq!(frame.pixel(Point::new(0, 0)), Some(BinaryColor::On));
        assert_eq!(frame.pixel(Point::new(1, 0)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_every_rotation_round_trips_corners() {
        for rotation in [
            DisplayRotation::Rotate0,
            DisplayRotation::Rotate90,
            DisplayRotation::Rotate180,
            DisplayRotation::Rotate270,
        ] {
            let mut frame = Frame::new();
            frame.set_rotation(rotation);
            let size = frame.size();
            let corner = Point::new(size.width as i32 - 1, size.height as i32 - 1);
            Pixel(corner, BinaryColor::On).draw(&mut frame).unwrap();
            assert_eq!(frame.pixel(corner), Some(BinaryColor::On), "{:?}", rotation);
            assert_eq!(frame.buffer().iter().map(|b| b.count_ones()).sum::<u32>(), 1);
        }
    }

    #[test]
    fn test_out_of_bounds_dropped() {
        let mut frame = Frame::new();
        Pixel(Point::new(-1, 0), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(128, 0), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(0, 296), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        assert!(frame.buffer().iter().all(|b| *b == 0));
        assert_eq!(frame.pixel(Point::new(0, 296)), None);
    }

    #[test]
    fn test_clear_and_erase() {
        let mut frame = Frame::new();
        frame.clear(BinaryColor::On).unwrap();
        assert!(frame.buffer().iter().all(|b| *b == 0xFF));
        Pixel(Point::new(3, 0), BinaryColor::Off)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer()[0], 0xEF);
    }
}
