use bit_field::BitField;
use embedded_hal::digital::OutputPin;
use log::debug;

use super::{DriverError, MCP4XXX};
use crate::bus::Transport;
use crate::registers::{Register, STATUS_SHUTDOWN_BIT, TCON_RESERVED_BIT, TconFlag};

/// # Terminal connections and shutdown
///
/// The terminal control register (TCON) holds four bits for each potentiometer:
/// terminal A, terminal B and wiper connections, and a software shutdown bit. The
/// bits of potentiometer 1 on dual devices are the upper nibble of the register.
///
/// # Datasheet
///
/// See section 4.2.2 and register 4-2 for TCON, and register 4-1 for STATUS.
impl<B, CS> MCP4XXX<B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    ////////////////////////////////////////////////////////////////////////////////
    // Raw register access
    ////////////////////////////////////////////////////////////////////////////////

    /// Read the whole TCON register, including bits of the other potentiometer.
    pub fn tcon(&mut self) -> Result<u16, DriverError<B, CS>> {
        self.read_register(Register::Tcon)
    }

    /// Write the whole TCON register, including bits of the other potentiometer.
    ///
    /// The reserved bit 8 is always written as 1.
    pub fn set_tcon(&mut self, value: u8) -> Result<(), DriverError<B, CS>> {
        let mut data = u16::from(value);
        data.set_bit(TCON_RESERVED_BIT, true);
        self.write_register(Register::Tcon, data)
    }

    /// Read one bit of this driver's potentiometer from TCON.
    fn tcon_flag(&mut self, flag: TconFlag) -> Result<bool, DriverError<B, CS>> {
        let bit = self.config.unit.tcon_bit(flag);
        Ok(self.tcon()?.get_bit(bit))
    }

    /// Change one bit of this driver's potentiometer in TCON.
    ///
    /// Chip select is held low from the read to the write. Nothing is written if
    /// the read fails.
    fn set_tcon_flag(&mut self, flag: TconFlag, value: bool) -> Result<(), DriverError<B, CS>> {
        let bit = self.config.unit.tcon_bit(flag);
        let mut selected = self.select()?;
        let mut tcon = selected.tcon()?;
        tcon.set_bit(bit, value);
        tcon.set_bit(TCON_RESERVED_BIT, true);
        debug!("MCP4XXX TCON {flag:?} = {value}, writing {tcon:#05x}");
        selected.write_register(Register::Tcon, tcon)?;
        selected.release()
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Terminal A
    ////////////////////////////////////////////////////////////////////////////////

    /// Connect (`true`) or disconnect terminal A.
    ///
    /// Always fails with [`Error::InvalidCommand`] on rheostat (MCP4XX2) devices,
    /// which have no terminal A. Use [`MCP4XXX::set_terminal_b_status`] instead.
    ///
    /// [`Error::InvalidCommand`]: crate::Error::InvalidCommand
    pub fn set_terminal_a_status(&mut self, connected: bool) -> Result<(), DriverError<B, CS>> {
        self.set_tcon_flag(TconFlag::TerminalA, connected)
    }

    /// Whether terminal A is connected.
    ///
    /// Always fails on rheostat (MCP4XX2) devices.
    pub fn terminal_a_status(&mut self) -> Result<bool, DriverError<B, CS>> {
        self.tcon_flag(TconFlag::TerminalA)
    }

    /// True if terminal A could be read AND is connected.
    pub fn is_terminal_a_connected(&mut self) -> bool {
        self.terminal_a_status().unwrap_or(false)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Terminal B
    ////////////////////////////////////////////////////////////////////////////////

    /// Connect (`true`) or disconnect terminal B.
    pub fn set_terminal_b_status(&mut self, connected: bool) -> Result<(), DriverError<B, CS>> {
        self.set_tcon_flag(TconFlag::TerminalB, connected)
    }

    /// Whether terminal B is connected.
    pub fn terminal_b_status(&mut self) -> Result<bool, DriverError<B, CS>> {
        self.tcon_flag(TconFlag::TerminalB)
    }

    /// True if terminal B could be read AND is connected.
    pub fn is_terminal_b_connected(&mut self) -> bool {
        self.terminal_b_status().unwrap_or(false)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Wiper
    ////////////////////////////////////////////////////////////////////////////////

    /// Connect (`true`) or disconnect the wiper.
    pub fn set_wiper_status(&mut self, connected: bool) -> Result<(), DriverError<B, CS>> {
        self.set_tcon_flag(TconFlag::Wiper, connected)
    }

    /// Whether the wiper is connected.
    pub fn wiper_status(&mut self) -> Result<bool, DriverError<B, CS>> {
        self.tcon_flag(TconFlag::Wiper)
    }

    /// True if the wiper could be read AND is connected.
    pub fn is_wiper_connected(&mut self) -> bool {
        self.wiper_status().unwrap_or(false)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Shutdown
    ////////////////////////////////////////////////////////////////////////////////

    /// Enter (`true`) or leave software shutdown.
    ///
    /// In shutdown terminal A is disconnected and the wiper is connected to
    /// terminal B. TCON stores the inverse: its bit is set when *not* shut down.
    pub fn set_shutdown_status(&mut self, shutdown: bool) -> Result<(), DriverError<B, CS>> {
        self.set_tcon_flag(TconFlag::NotShutdown, !shutdown)
    }

    /// Whether the potentiometer is in software shutdown.
    ///
    /// The hardware SHDN pin (if present) overrides this setting but is not
    /// reflected here. Use [`MCP4XXX::hardware_shutdown_status`] for the pin.
    pub fn shutdown_status(&mut self) -> Result<bool, DriverError<B, CS>> {
        self.tcon_flag(TconFlag::NotShutdown).map(|enabled| !enabled)
    }

    /// True if the shutdown setting could be read AND the device is shut down.
    pub fn is_shut_down(&mut self) -> bool {
        self.shutdown_status().unwrap_or(false)
    }

    /// Whether the hardware SHDN pin is asserted, read from the STATUS register.
    pub fn hardware_shutdown_status(&mut self) -> Result<bool, DriverError<B, CS>> {
        Ok(self.read_register(Register::Status)?.get_bit(STATUS_SHUTDOWN_BIT))
    }

    /// True if the STATUS register could be read AND the SHDN pin is asserted.
    pub fn is_hardware_shut_down(&mut self) -> bool {
        self.hardware_shutdown_status().unwrap_or(false)
    }
}
