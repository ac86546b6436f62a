//! SSD1680 Display Driver Implementation
//!
//! High level operations on top of [`DisplayInterface`]: init, RAM writes,
//! refreshes and fills.
//!
//! ### Display Update Value (0xF4 vs 0xC7)
//!
//! The SSD1680 datasheet suggests `0xC7` for Display Update Control 2, but this
//! hardware requires `0xF4`. This is stored in `Flag::DISPLAY_UPDATE_FULL`.
//!
//! ### Polarity Inversion
//!
//! This display has inverted polarity:
//! - `0x00` = white pixels
//! - `0xFF` = black pixels
//!
//! [`Frame`](super::graphics::Frame) already uses bit 1 for black, so buffers are
//! sent as they are.
//!
//! ### BUSY Pin Wait
//!
//! After `MASTER_ACTIVATE` the driver waits for BUSY to go LOW, a full refresh
//! takes 1-3 seconds.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::ssd1680::interface::DisplayInterface;
use crate::ssd1680::{cmd::Cmd, flag::Flag, BUFFER_LEN, HEIGHT, WIDTH};

/// How the panel should redraw after a RAM write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Full waveform, flashes the whole panel, no ghosting
    Full,
    /// Only pixels that differ from the previous frame change
    Partial,
}

/// SSD1680 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Ssd1680<SPI, BSY, DC, RST, DELAY> {
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
}

impl<SPI, BSY, DC, RST, DELAY> Ssd1680<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Create and initialize the display driver
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Result<Self, DisplayError> {
        let interface = DisplayInterface::new(spi, busy, dc, rst, delay);
        let mut ssd1680 = Ssd1680 { interface };
        ssd1680.init()?;
        Ok(ssd1680)
    }

    /// Minimal init sequence: reset, gate count, RAM window, border, temperature sensor
    pub fn init(&mut self) -> Result<(), DisplayError> {
        log::info!("Initializing SSD1680 {}x{}", WIDTH, HEIGHT);

        self.interface.reset()?;

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.wait_busy_low();

        self.interface
            .cmd_with_data(Cmd::DRIVER_CONTROL, &Flag::DRIVER_OUTPUT_MUX)?;
        self.interface
            .cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;
        self.use_full_frame()?;
        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_WHITE])?;
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;
        self.interface.reset_ram_counters()?;

        self.interface.wait_busy_low();
        Ok(())
    }

    /// RAM window covering the whole panel
    fn use_full_frame(&mut self) -> Result<(), DisplayError> {
        let x_end = ((WIDTH / 8) - 1) as u8;
        let y_end = HEIGHT - 1;

        self.interface.cmd_with_data(Cmd::SET_RAMXPOS, &[0x00, x_end])?;
        self.interface.cmd_with_data(
            Cmd::SET_RAMYPOS,
            &[0x00, 0x00, (y_end & 0xFF) as u8, (y_end >> 8) as u8],
        )
    }

    /// Write a full frame into the black/white RAM without refreshing
    pub fn write_frame(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        self.write_ram(Cmd::WRITE_BW_DATA, buffer)
    }

    fn write_ram(&mut self, ram: u8, buffer: &[u8]) -> Result<(), DisplayError> {
        if buffer.len() != BUFFER_LEN {
            log::error!(
                "Frame buffer is {} bytes, panel expects {}",
                buffer.len(),
                BUFFER_LEN
            );
            return Err(DisplayError::OutOfBoundsError);
        }
        self.interface.reset_ram_counters()?;
        self.interface.cmd_with_data(ram, buffer)
    }

    /// Trigger a refresh of what is in RAM and wait for the panel to finish
    pub fn update(&mut self, mode: UpdateMode) -> Result<(), DisplayError> {
        let sequence = match mode {
            UpdateMode::Full => Flag::DISPLAY_UPDATE_FULL,
            UpdateMode::Partial => Flag::DISPLAY_UPDATE_PARTIAL,
        };
        log::debug!("Display update {:?} (0x{:02X})", mode, sequence);

        self.interface
            .cmd_with_data(Cmd::UPDATE_DISPLAY_CTRL2, &[sequence])?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_busy_low();
        Ok(())
    }

    /// Write `buffer`, refresh, and keep the previous-frame RAM in sync for later partial updates
    pub fn write_buffer_and_update(
        &mut self,
        buffer: &[u8],
        mode: UpdateMode,
    ) -> Result<(), DisplayError> {
        self.write_frame(buffer)?;
        self.update(mode)?;
        if mode == UpdateMode::Full {
            self.write_ram(Cmd::WRITE_PREVIOUS_DATA, buffer)?;
        }
        Ok(())
    }

    /// Fill both RAMs with one byte pattern and run a full refresh
    pub fn fill(&mut self, pattern: u8) -> Result<(), DisplayError> {
        log::info!("Filling panel with 0x{:02X}", pattern);
        let total_bytes = BUFFER_LEN as u32;
        for ram in [Cmd::WRITE_BW_DATA, Cmd::WRITE_PREVIOUS_DATA] {
            self.interface.reset_ram_counters()?;
            self.interface.cmd(ram)?;
            self.interface.data_x_times(pattern, total_bytes)?;
        }
        self.update(UpdateMode::Full)
    }

    /// Wipe the panel to white
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.fill(Flag::PATTERN_ALL_WHITE)
    }
}
