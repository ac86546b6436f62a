//! Capabilities the loop controller drives
//!
//! Each one is owned by the controller, the device build plugs in the ESP-IDF
//! backed implementations and the tests plug in recorders.

use std::time::Duration;

use anyhow::Result;
use embedded_graphics::prelude::Point;

use crate::raster::RenderOptions;

/// How much of the panel a refresh redraws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Full waveform, used for every new image
    Full,
    /// Fast update, used for status text and progress dots
    Partial,
}

/// The e-paper panel plus its frame buffer
pub trait DisplaySurface {
    /// Blank the frame buffer and move the text cursor home
    fn clear(&mut self) -> Result<()>;

    /// Print status text at the text cursor
    fn print(&mut self, text: &str) -> Result<()>;

    /// Print status text and move the cursor to the next line
    fn println(&mut self, text: &str) -> Result<()> {
        self.print(text)?;
        self.print("\n")
    }

    /// Fetch the image at `url` and draw it with its box starting at `origin`
    fn draw_image(&mut self, url: &str, origin: Point, options: RenderOptions) -> Result<()>;

    /// Push the frame buffer to the physical panel
    fn refresh(&mut self, refresh: Refresh) -> Result<()>;
}

/// WiFi station link
pub trait NetworkConnection {
    /// Start associating with the configured network, does not wait for it
    fn begin(&mut self) -> Result<()>;

    /// Whether the link is associated and has an address
    fn is_connected(&mut self) -> bool;

    /// Ask the stack to associate again, does not wait for it
    fn reconnect(&mut self) -> Result<()>;
}

/// Timing and power primitives of the microcontroller
pub trait Power {
    /// Block for a short fixed interval
    fn delay(&mut self, duration: Duration);

    /// Low-power sleep, resumes on timer wakeup after `duration`
    fn sleep(&mut self, duration: Duration) -> Result<()>;

    /// Reboot the device. Never returns on hardware.
    fn restart(&mut self);
}

/// Source of raw image bytes
pub trait ImageFetcher {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>>;
}
