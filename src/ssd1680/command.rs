//! SPI Commands for the SSD1680 controller

use crate::traits;

use bit_field::BitField;

/// SSD1680 commands
///
/// Only the registers the monochrome full refresh sequence touches.
///
/// For more infos about the addresses and what they are doing look into the pdfs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Driver Output control
    ///     3 Databytes:
    ///     A[7:0]
    ///     0.. A[8]
    ///     0.. B[2:0]
    ///     A = number of gate lines - 1, B = scan direction flags (GD, SM, TB)
    DriverOutputControl = 0x01,
    /// Data Entry mode setting
    ///     1 Databyte: ID[1:0] increment directions, AM counter direction
    DataEntryModeSetting = 0x11,
    /// Software reset, all registers go back to their POR values (RAM is kept)
    SwReset = 0x12,
    /// Temperature sensor selection
    ///     0x48: external, 0x80: internal
    TemperatureSensorControl = 0x18,
    /// Runs the sequence programmed into DisplayUpdateControl2
    MasterActivation = 0x20,
    /// Display update sequence, see [`DisplayUpdateControl2`]
    DisplayUpdateControl2 = 0x22,
    /// Black/white RAM, the address counter advances after every byte
    WriteRam = 0x24,
    BorderWaveformControl = 0x3C,
    /// 2 Databytes: start and end, in bytes
    SetRamXAddressStartEndPosition = 0x44,
    /// 4 Databytes: start and end, in lines, little endian
    SetRamYAddressStartEndPosition = 0x45,
    SetRamXAddressCounter = 0x4E,
    SetRamYAddressCounter = 0x4F,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

/// Payload of [`Command::DriverOutputControl`]
pub(crate) struct DriverOutput {
    pub scan_is_linear: bool,
    pub scan_g0_is_first: bool,
    pub scan_dir_incr: bool,

    /// Number of gate lines, the register takes this value minus one
    pub gate_lines: u16,
}

impl DriverOutput {
    pub fn to_bytes(&self) -> [u8; 3] {
        let mux = self.gate_lines - 1;
        [
            mux.get_bits(0..8) as u8,
            mux.get_bits(8..9) as u8,
            *0u8.set_bit(0, !self.scan_dir_incr)
                .set_bit(1, !self.scan_g0_is_first)
                .set_bit(2, !self.scan_is_linear),
        ]
    }
}

/// [7|6|5|4|3|2|1|0]
///  | | | | | | | `--- disable clock
///  | | | | | | `----- disable analog
///  | | | | | `------- display
///  | | | | `--------- display mode 2
///  | | | `----------- load LUT
///  | | `------------- load temp
///  | `--------------- enable clock
///  `----------------- enable analog
pub(crate) struct DisplayUpdateControl2(pub u8);

impl DisplayUpdateControl2 {
    pub fn new() -> DisplayUpdateControl2 {
        DisplayUpdateControl2(0x00)
    }

    /// Full refresh with the waveform from OTP, powering everything down afterwards
    pub fn full_refresh() -> DisplayUpdateControl2 {
        DisplayUpdateControl2::new()
            .enable_clock()
            .enable_analog()
            .load_temp()
            .load_lut()
            .display()
            .disable_analog()
            .disable_clock()
    }

    pub fn disable_clock(mut self) -> Self {
        self.0.set_bit(0, true);
        self
    }

    pub fn disable_analog(mut self) -> Self {
        self.0.set_bit(1, true);
        self
    }

    pub fn display(mut self) -> Self {
        self.0.set_bit(2, true);
        self
    }

    pub fn load_lut(mut self) -> Self {
        self.0.set_bit(4, true);
        self
    }

    pub fn load_temp(mut self) -> Self {
        self.0.set_bit(5, true);
        self
    }

    pub fn enable_clock(mut self) -> Self {
        self.0.set_bit(6, true);
        self
    }

    pub fn enable_analog(mut self) -> Self {
        self.0.set_bit(7, true);
        self
    }
}

#[allow(dead_code, clippy::enum_variant_names)]
#[derive(Copy, Clone)]
pub(crate) enum DataEntryModeIncr {
    XDecrYDecr = 0x0,
    XIncrYDecr = 0x1,
    XDecrYIncr = 0x2,
    XIncrYIncr = 0x3,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum DataEntryModeDir {
    XDir = 0x0,
    YDir = 0x4,
}

pub(crate) struct DataEntryMode {
    pub incr: DataEntryModeIncr,
    pub dir: DataEntryModeDir,
}

impl DataEntryMode {
    pub fn to_u8(&self) -> u8 {
        self.incr as u8 | self.dir as u8
    }
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum BorderWaveFormVbd {
    Gs = 0x0,
    FixLevel = 0x1,
    Vcom = 0x2,
    HiZ = 0x3,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum BorderWaveFormFixLevel {
    Vss = 0x0,
    Vsh1 = 0x1,
    Vsl = 0x2,
    Vsh2 = 0x3,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum BorderWaveFormGs {
    Lut0 = 0x0,
    Lut1 = 0x1,
    Lut2 = 0x2,
    Lut3 = 0x3,
}

pub(crate) struct BorderWaveForm {
    pub vbd: BorderWaveFormVbd,
    pub fix_level: BorderWaveFormFixLevel,
    /// GS transition follows the LUT instead of the VBD level
    pub follow_lut: bool,
    pub gs_trans: BorderWaveFormGs,
}

impl BorderWaveForm {
    pub fn to_u8(&self) -> u8 {
        *0u8.set_bits(6..8, self.vbd as u8)
            .set_bits(4..6, self.fix_level as u8)
            .set_bit(2, self.follow_lut)
            .set_bits(0..2, self.gs_trans as u8)
    }
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum TemperatureSensor {
    External = 0x48,
    Internal = 0x80,
}
