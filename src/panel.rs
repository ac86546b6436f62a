//! [`DisplaySurface`] backed by the SSD1680 panel

use anyhow::{anyhow, Context, Result};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::console::Console;
use crate::raster::{self, RenderOptions};
use crate::ssd1680::{DisplayRotation, Frame, Ssd1680, UpdateMode};
use crate::traits::{DisplaySurface, ImageFetcher, Refresh};

/// Panel, frame buffer, status console and image source in one surface
pub struct EpaperSurface<SPI, BSY, DC, RST, DELAY, F> {
    epd: Ssd1680<SPI, BSY, DC, RST, DELAY>,
    frame: Frame,
    console: Console,
    fetcher: F,
}

impl<SPI, BSY, DC, RST, DELAY, F> EpaperSurface<SPI, BSY, DC, RST, DELAY, F>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    F: ImageFetcher,
{
    /// Landscape surface, the panel is mounted on its side
    pub fn new(mut epd: Ssd1680<SPI, BSY, DC, RST, DELAY>, fetcher: F) -> Result<Self> {
        epd.clear()
            .map_err(|e| anyhow!("Failed to wipe panel: {:?}", e))?;

        let mut frame = Frame::new();
        frame.set_rotation(DisplayRotation::Rotate270);

        Ok(Self {
            epd,
            frame,
            console: Console::default(),
            fetcher,
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<SPI, BSY, DC, RST, DELAY, F> DisplaySurface for EpaperSurface<SPI, BSY, DC, RST, DELAY, F>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    F: ImageFetcher,
{
    fn clear(&mut self) -> Result<()> {
        // Infallible, the frame lives in RAM
        let _ = self.frame.clear(BinaryColor::Off);
        self.console.home();
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let _ = self.console.print(&mut self.frame, text);
        Ok(())
    }

    fn draw_image(&mut self, url: &str, origin: Point, options: RenderOptions) -> Result<()> {
        let bytes = self
            .fetcher
            .fetch(url)
            .with_context(|| format!("Failed to fetch {}", url))?;
        log::info!("Fetched {} bytes from {}", bytes.len(), url);

        let size = self.frame.size();
        let target = Size::new(
            size.width.saturating_sub(origin.x.max(0) as u32),
            size.height.saturating_sub(origin.y.max(0) as u32),
        );
        let bitmap = raster::render_png(&bytes, target, options)?;
        let _ = bitmap.draw(&mut self.frame, origin);
        Ok(())
    }

    fn refresh(&mut self, refresh: Refresh) -> Result<()> {
        let mode = match refresh {
            Refresh::Full => UpdateMode::Full,
            Refresh::Partial => UpdateMode::Partial,
        };
        self.epd
            .write_buffer_and_update(self.frame.buffer(), mode)
            .map_err(|e| anyhow!("Failed to write and update buffer: {:?}", e))
    }
}
