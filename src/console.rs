//! Status text printed like a terminal onto the frame

use embedded_graphics::mono_font::{iso_8859_15::FONT_10X20, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// Text cursor with wrapping, starting at `home` after every clear
pub struct Console {
    font: &'static MonoFont<'static>,
    home: Point,
    cursor: Point,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Point::new(10, 50))
    }
}

impl Console {
    pub fn new(home: Point) -> Self {
        Self {
            font: &FONT_10X20,
            home,
            cursor: home,
        }
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn home(&mut self) {
        self.cursor = self.home;
    }

    /// Next line at the home column, back to the home row once the next line
    /// would not fit above `bottom`
    fn newline(&mut self, bottom: i32) {
        let line = self.font.character_size.height as i32;
        let mut y = self.cursor.y + line;
        if y + line > bottom {
            y = self.home.y;
        }
        self.cursor = Point::new(self.home.x, y);
    }

    /// Draw `text` at the cursor, wrapping at the right edge of `target`
    pub fn print<D>(&mut self, target: &mut D, text: &str) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        let advance = (self.font.character_size.width + self.font.character_spacing) as i32;
        let size = target.bounding_box().size;
        let (right, bottom) = (size.width as i32, size.height as i32);
        let mut buf = [0u8; 4];

        for c in text.chars() {
            if c == '\n' {
                self.newline(bottom);
                continue;
            }
            if self.cursor.x + advance > right && self.cursor.x > self.home.x {
                self.newline(bottom);
            }
            Text::with_baseline(c.encode_utf8(&mut buf), self.cursor, style, Baseline::Top)
                .draw(target)?;
            self.cursor.x += advance;
        }
        Ok(())
    }
}
