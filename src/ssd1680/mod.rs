//! SSD1680 ePaper Display Driver
//!
//! Drives the 2.9" black/white panel of the frame over SPI.
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for my needs.
//!
//! ### Usage
//! This driver does not hide that you're working with one buffer for black/white. To
//! display something you:
//!
//! 1. first draw onto a [`graphics::Frame`], preferably
//! with [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics).
//! 1. then send it with [`driver::Ssd1680::write_buffer_and_update`]

pub mod driver;
pub mod graphics;
pub mod interface;

mod cmd;
mod flag;

pub use driver::{DisplayError, Ssd1680, UpdateMode};
pub use graphics::{DisplayRotation, Frame};

/// Display height, pixels vertically
pub const HEIGHT: u16 = 296;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 128;

/// Bytes in one black/white RAM image
pub const BUFFER_LEN: usize = (WIDTH as usize / 8) * HEIGHT as usize;
