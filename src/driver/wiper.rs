use embedded_hal::digital::OutputPin;

use super::{DriverError, MCP4XXX};
use crate::bus::Transport;
use crate::commands::Command;

/// Returned by [`MCP4XXX::get_or_sentinel`] when the wiper could not be read.
pub const WIPER_READ_FAILED: u16 = 0xFFFF;

/// # Wiper position
impl<B, CS> MCP4XXX<B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    /// Maximum value allowed for the wiper position.
    ///
    /// 7-bit devices have a maximum value of 127 for rheostats and 128 for
    /// potentiometers. 8-bit devices have 255 and 256.
    ///
    /// The extra value on potentiometers (MCP4XX1) connects the wiper directly to
    /// terminal A ("full-scale"). Rheostats (MCP4XX2) have only the wiper and
    /// terminal B pins.
    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Move the wiper one step towards terminal A.
    ///
    /// The device does not move past full-scale and still accepts the command, so
    /// this succeeds at the maximum position with the wiper unchanged.
    ///
    /// # Datasheet
    ///
    /// See section 7.7 for the increment command.
    pub fn increment(&mut self) -> Result<(), DriverError<B, CS>> {
        self.transfer_short(Command::increment(self.config.unit.wiper_register()))
    }

    /// Move the wiper one step towards terminal B.
    ///
    /// Like [`MCP4XXX::increment`], this succeeds at zero-scale without moving.
    pub fn decrement(&mut self) -> Result<(), DriverError<B, CS>> {
        self.transfer_short(Command::decrement(self.config.unit.wiper_register()))
    }

    /// Set the wiper position.
    ///
    /// Values above [`MCP4XXX::max_value`] are clamped to the maximum.
    pub fn set(&mut self, value: u16) -> Result<(), DriverError<B, CS>> {
        let value = value.min(self.max_value);
        self.write_register(self.config.unit.wiper_register(), value)
    }

    /// Read the wiper position.
    pub fn get(&mut self) -> Result<u16, DriverError<B, CS>> {
        self.read_register(self.config.unit.wiper_register())
    }

    /// Read the wiper position, returning [`WIPER_READ_FAILED`] on any error.
    ///
    /// Prefer [`MCP4XXX::get`] unless the error itself is of no interest.
    pub fn get_or_sentinel(&mut self) -> u16 {
        self.get().unwrap_or(WIPER_READ_FAILED)
    }
}
