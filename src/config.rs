//! Construction-time configuration of the MCP4XXX driver.
//!
//! The part number of the device determines most of these settings:
//!
//! | Part      | Units | Resolution | Configuration |
//! |-----------|-------|------------|---------------|
//! | MCP4131   | 1     | 7-bit      | potentiometer |
//! | MCP4132   | 1     | 7-bit      | rheostat      |
//! | MCP4151   | 1     | 8-bit      | potentiometer |
//! | MCP4152   | 1     | 8-bit      | rheostat      |
//! | MCP4231   | 2     | 7-bit      | potentiometer |
//! | MCP4232   | 2     | 7-bit      | rheostat      |
//! | MCP4251   | 2     | 8-bit      | potentiometer |
//! | MCP4252   | 2     | 8-bit      | rheostat      |
//!
//! The MCP4X4X and MCP4X6X (non-volatile) parts follow the MCP4X3X and MCP4X5X rows.

use embedded_hal::spi::{MODE_0, Mode};

use crate::registers::{Register, TconFlag};

/// Which potentiometer of the device to control.
///
/// Dual devices (MCP42XX) have two independent potentiometers sharing one chip
/// select line and one TCON register. Single devices must use [`Unit::Pot0`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    /// Potentiometer 0.
    #[default]
    Pot0,
    /// Potentiometer 1 (MCP42XX only).
    Pot1,
}

impl Unit {
    /// The volatile wiper register of this potentiometer.
    pub const fn wiper_register(self) -> Register {
        match self {
            Unit::Pot0 => Register::Wiper0,
            Unit::Pot1 => Register::Wiper1,
        }
    }

    /// Position of `flag` within the TCON register for this potentiometer.
    ///
    /// Potentiometer 1 uses the upper nibble of TCON.
    pub const fn tcon_bit(self, flag: TconFlag) -> usize {
        match self {
            Unit::Pot0 => flag.bit(),
            Unit::Pot1 => flag.bit() + 4,
        }
    }

    /// Single-bit mask of `flag` within the TCON register for this potentiometer.
    pub const fn tcon_mask(self, flag: TconFlag) -> u16 {
        1 << self.tcon_bit(flag)
    }
}

/// Number of steps in the device's resistor ladder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 128 steps, MCP4X3X and MCP4X4X.
    SevenBit,
    /// 256 steps, MCP4X5X and MCP4X6X.
    #[default]
    EightBit,
}

impl Resolution {
    /// Highest ladder tap.
    pub const fn steps(self) -> u16 {
        match self {
            Resolution::SevenBit => 127,
            Resolution::EightBit => 255,
        }
    }
}

/// Whether the device is a potentiometer (MCP4XX1) or a rheostat (MCP4XX2).
///
/// Potentiometers accept one more wiper value than the resolution, which connects
/// the wiper directly to terminal A ("full-scale"). Rheostats have no terminal A pin,
/// so terminal A commands are rejected by the device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WiperConfiguration {
    /// MCP4XX2: wiper and terminal B only.
    Rheostat,
    /// MCP4XX1: terminals A and B plus wiper.
    #[default]
    Potentiometer,
}

impl WiperConfiguration {
    const fn extra_steps(self) -> u16 {
        match self {
            WiperConfiguration::Rheostat => 0,
            WiperConfiguration::Potentiometer => 1,
        }
    }
}

/// Bit order used on the SPI bus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first, as required by the MCP4XXX.
    #[default]
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// SPI settings applied each time the driver takes the bus.
///
/// The MCP4XXX supports SPI modes 0,0 and 1,1 at up to 10 MHz. The default is the
/// conservative 125 kHz, MSB first, mode 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Bit order of each transferred byte.
    pub bit_order: BitOrder,
    /// Clock polarity and phase.
    pub mode: Mode,
    /// Clock rate in hertz.
    pub frequency_hz: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bit_order: BitOrder::MsbFirst,
            mode: MODE_0,
            frequency_hz: 125_000,
        }
    }
}

/// Full driver configuration.
///
/// The default matches a single-unit, 8-bit potentiometer (MCP4151/MCP4161),
/// targeting potentiometer 0.
///
/// ```
/// use mcp4xxx::config::{Config, Resolution, Unit, WiperConfiguration};
///
/// // Second potentiometer of an MCP4232.
/// let config = Config::new()
///     .with_unit(Unit::Pot1)
///     .with_resolution(Resolution::SevenBit)
///     .with_wiper_configuration(WiperConfiguration::Rheostat);
/// assert_eq!(config.max_value(), 127);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Potentiometer to control.
    pub unit: Unit,
    /// Resistor ladder resolution.
    pub resolution: Resolution,
    /// Potentiometer or rheostat.
    pub wiper_configuration: WiperConfiguration,
    /// SPI bus settings.
    pub bus: BusConfig,
}

impl Config {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the potentiometer to control.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the resolution of the resistor ladder.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the wiper configuration.
    pub fn with_wiper_configuration(mut self, wiper_configuration: WiperConfiguration) -> Self {
        self.wiper_configuration = wiper_configuration;
        self
    }

    /// Set the SPI bus settings.
    pub fn with_bus(mut self, bus: BusConfig) -> Self {
        self.bus = bus;
        self
    }

    /// Highest wiper value accepted by the device.
    ///
    /// 7-bit devices have a maximum of 127 for rheostats and 128 for potentiometers,
    /// 8-bit devices 255 and 256.
    pub const fn max_value(&self) -> u16 {
        self.resolution.steps() + self.wiper_configuration.extra_steps()
    }
}
