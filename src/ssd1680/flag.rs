/// Register values written alongside the [`Cmd`](super::cmd::Cmd) bytes.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01): 296 gate lines, scan G0 -> G295, normal color
    pub const DRIVER_OUTPUT_MUX: [u8; 3] = [0x27, 0x01, 0x00];

    // Data Entry Mode (0x11)
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Temperature Sensor Control (0x18)
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Border Waveform Control (0x3C)
    pub const BORDER_WAVEFORM_WHITE: u8 = 0x01;

    // Display Update Control 2 (0x22)
    // The datasheet suggests 0xC7, this panel only refreshes with 0xF4
    pub const DISPLAY_UPDATE_FULL: u8 = 0xF4;
    // Display mode 2, diff against the previous-frame RAM
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0xFF;

    // Inverted polarity on this panel, 0x00 is all white
    pub const PATTERN_ALL_WHITE: u8 = 0x00;
}
