//! # hashart-inkplate
//!
//! Firmware for an e-paper frame that shows generated art from a
//! [hashart](https://github.com/jdan/hashart) screenshot server.
//!
//! Every cycle it makes sure WiFi is up, fetches
//! `{base}/{piece}/{width}/{height}/{seed}.png`, dithers it down to black and
//! white, pushes it to the panel and goes to light sleep.
//!
//! The loop itself ([`controller::LoopController`]) only talks to the
//! capabilities in [`traits`], so everything except the [`esp`] adapters builds
//! and tests on the host.

pub mod config;
pub mod console;
pub mod controller;
pub mod panel;
pub mod raster;
pub mod retry;
pub mod ssd1680;
pub mod traits;

#[cfg(target_os = "espidf")]
pub mod esp;

#[cfg(test)]
mod fakes;
#[cfg(test)]
mod testing;

pub use config::{Config, Profile};
pub use controller::{CycleOutcome, LoopController, LoopSettings, Phase};
pub use panel::EpaperSurface;
pub use traits::{DisplaySurface, ImageFetcher, NetworkConnection, Power, Refresh};
