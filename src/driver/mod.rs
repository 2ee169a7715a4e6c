use core::ops::{Deref, DerefMut};

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::SpiBus;
use log::{debug, trace, warn};

use crate::bus::{SpiTransport, Transport};
use crate::commands::{self, Command};
use crate::config::{Config, Unit};
use crate::error::Error;
use crate::registers::Register;

mod tcon;
mod wiper;

pub use wiper::WIPER_READ_FAILED;

/// Error type returned by [`MCP4XXX`] for a given transport and chip select pin.
pub type DriverError<B, CS> = Error<<B as Transport>::Error, <CS as ErrorType>::Error>;

/// Driver for one potentiometer of an MCP41XX or MCP42XX.
///
/// # Quick start
///
/// Create the driver with [`MCP4XXX::new`] for an 8-bit potentiometer (MCP4151,
/// MCP4161) or [`MCP4XXX::with_config`] for any other part. An
/// [`embedded_hal::spi::SpiBus`] can be used directly with
/// [`MCP4XXX::from_spi_bus`].
///
/// ```
/// # use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
/// # use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
/// use mcp4xxx::{Config, MCP4XXX};
///
/// # let spi = SpiMock::new(&[
/// #     SpiTransaction::transfer_in_place(vec![0x02], vec![0xFF]),
/// #     SpiTransaction::transfer_in_place(vec![0x80], vec![0xFF]),
/// #     SpiTransaction::flush(),
/// # ]);
/// # let cs = PinMock::new(&[
/// #     PinTransaction::set(State::High),
/// #     PinTransaction::set(State::Low),
/// #     PinTransaction::set(State::High),
/// # ]);
/// let mut pot = MCP4XXX::from_spi_bus(spi, cs, Config::default())?;
/// pot.set(128)?;
/// # let (spi, cs) = pot.release();
/// # spi.destroy().done();
/// # let mut cs = cs;
/// # cs.done();
/// # Ok::<(), mcp4xxx::DriverError<mcp4xxx::bus::SpiTransport<SpiMock<u8>>, PinMock>>(())
/// ```
///
/// # Overview
///
/// Every operation is a blocking SPI transaction framed by chip select. Values are
/// never cached: each getter reads the device.
///
/// The device reports whether it accepted each command through the command-error
/// bit. Rejected commands return [`Error::InvalidCommand`]. Operations on the
/// terminal control register (TCON) read the register, change the bits belonging
/// to this driver's [`Unit`], and write it back with chip select held low
/// throughout, so the bits of the other potentiometer of a dual device are kept.
///
/// # Datasheet
///
/// MCP41XX/42XX, Microchip document DS22060.
#[derive(Debug)]
pub struct MCP4XXX<B, CS> {
    bus: B,
    cs: CS,
    config: Config,
    /// Highest accepted wiper value, fixed at construction.
    max_value: u16,
    /// Number of nested [`MCP4XXX::select`] calls currently held.
    ///
    /// Only the outermost select and deselect touch the chip select line.
    select_depth: u8,
}

impl<B, CS> MCP4XXX<B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    ////////////////////////////////////////////////////////////////////////////////
    // Constructors
    ////////////////////////////////////////////////////////////////////////////////

    /// Create a driver for potentiometer 0 of an 8-bit potentiometer device.
    ///
    /// This is the MCP4151/MCP4161 (and the first unit of the MCP4251/MCP4261), with
    /// a maximum wiper value of 256.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipSelect`] if the chip select line cannot be driven high.
    pub fn new(bus: B, cs: CS) -> Result<Self, DriverError<B, CS>> {
        Self::with_config(bus, cs, Config::default())
    }

    /// Create a driver with the given configuration.
    ///
    /// The chip select line is driven high (deselected) before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipSelect`] if the chip select line cannot be driven high.
    pub fn with_config(bus: B, mut cs: CS, config: Config) -> Result<Self, DriverError<B, CS>> {
        cs.set_high().map_err(Error::ChipSelect)?;
        Ok(Self {
            bus,
            cs,
            max_value: config.max_value(),
            config,
            select_depth: 0,
        })
    }

    /// Release the transport and chip select pin.
    pub fn release(self) -> (B, CS) {
        (self.bus, self.cs)
    }

    /// The configuration the driver was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The potentiometer controlled by this driver.
    pub fn unit(&self) -> Unit {
        self.config.unit
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Chip select
    ////////////////////////////////////////////////////////////////////////////////

    /// Hold chip select low across several operations.
    ///
    /// The operations performed by `f` on the driver are sent as one SPI
    /// transaction. Chip select is released when `f` returns, whether or not it
    /// succeeded. If both `f` and the release fail, the error from `f` is returned.
    pub fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, DriverError<B, CS>>,
    ) -> Result<R, DriverError<B, CS>> {
        let mut selected = self.select()?;
        let result = f(&mut *selected);
        let released = selected.release();
        let value = result?;
        released?;
        Ok(value)
    }

    /// Take the bus for this device.
    ///
    /// The outermost call configures the bus and drives chip select low. Nested
    /// calls only increase the depth. The returned guard releases its level when
    /// dropped or when [`Selected::release`] is called.
    pub(crate) fn select(&mut self) -> Result<Selected<'_, B, CS>, DriverError<B, CS>> {
        if self.select_depth == 0 {
            self.bus.configure(&self.config.bus).map_err(Error::Bus)?;
            self.cs.set_low().map_err(Error::ChipSelect)?;
        }
        self.select_depth += 1;
        Ok(Selected {
            driver: self,
            held: true,
        })
    }

    /// Release one level of selection.
    ///
    /// Chip select is driven high only when the last level is released. Releasing
    /// with nothing held does nothing.
    pub(crate) fn deselect(&mut self) -> Result<(), DriverError<B, CS>> {
        match self.select_depth {
            0 => Ok(()),
            1 => {
                self.select_depth = 0;
                // Deassert even if the flush failed.
                let flushed = self.bus.flush();
                let released = self.cs.set_high();
                flushed.map_err(Error::Bus)?;
                released.map_err(Error::ChipSelect)
            }
            _ => {
                self.select_depth -= 1;
                Ok(())
            }
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Command transfer
    ////////////////////////////////////////////////////////////////////////////////

    fn exchange(&mut self, byte: u8) -> Result<u8, DriverError<B, CS>> {
        let reply = self.bus.transfer_byte(byte).map_err(Error::Bus)?;
        trace!("MCP4XXX sent {byte:#04x}, received {reply:#04x}");
        Ok(reply)
    }

    fn rejected(command: Command) -> DriverError<B, CS> {
        debug!(
            "MCP4XXX rejected {:?} of {:?}",
            command.operation, command.register
        );
        Error::InvalidCommand {
            register: command.register,
            operation: command.operation,
        }
    }

    /// Send an 8-bit command (increment or decrement).
    pub(crate) fn transfer_short(&mut self, command: Command) -> Result<(), DriverError<B, CS>> {
        let mut selected = self.select()?;
        let reply = selected.exchange(command.first_byte())?;
        selected.release()?;
        if commands::is_valid(reply) {
            Ok(())
        } else {
            Err(Self::rejected(command))
        }
    }

    /// Send a 16-bit command (write or read) and return the 9 data bits received.
    ///
    /// The second byte is only sent if the device accepted the first.
    pub(crate) fn transfer_long(&mut self, command: Command) -> Result<u16, DriverError<B, CS>> {
        let [high, low] = command.bytes();
        let mut selected = self.select()?;
        let high_reply = selected.exchange(high)?;
        if !commands::is_valid(high_reply) {
            selected.release()?;
            return Err(Self::rejected(command));
        }
        let low_reply = selected.exchange(low)?;
        selected.release()?;
        Ok(commands::decode_data(high_reply, low_reply))
    }

    pub(crate) fn read_register(&mut self, register: Register) -> Result<u16, DriverError<B, CS>> {
        self.transfer_long(Command::read(register))
    }

    pub(crate) fn write_register(
        &mut self,
        register: Register,
        data: u16,
    ) -> Result<(), DriverError<B, CS>> {
        self.transfer_long(Command::write(register, data))?;
        Ok(())
    }
}

impl<SPI, CS> MCP4XXX<SpiTransport<SPI>, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Create a driver over an [`embedded_hal::spi::SpiBus`].
    ///
    /// The bus must already be set up for SPI mode 0 (or 3), MSB first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipSelect`] if the chip select line cannot be driven high.
    pub fn from_spi_bus(
        spi: SPI,
        cs: CS,
        config: Config,
    ) -> Result<Self, DriverError<SpiTransport<SPI>, CS>> {
        Self::with_config(SpiTransport::new(spi), cs, config)
    }
}

/// One level of chip selection held on an [`MCP4XXX`].
///
/// Dereferences to the driver so nested operations can run while it is held.
pub(crate) struct Selected<'a, B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    driver: &'a mut MCP4XXX<B, CS>,
    held: bool,
}

impl<B, CS> Selected<'_, B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    /// Release this level, reporting any error from deasserting chip select.
    pub(crate) fn release(mut self) -> Result<(), DriverError<B, CS>> {
        self.held = false;
        self.driver.deselect()
    }
}

impl<B, CS> Drop for Selected<'_, B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    fn drop(&mut self) {
        if self.held && self.driver.deselect().is_err() {
            warn!("MCP4XXX failed to release chip select");
        }
    }
}

impl<B, CS> Deref for Selected<'_, B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    type Target = MCP4XXX<B, CS>;

    fn deref(&self) -> &Self::Target {
        &*self.driver
    }
}

impl<B, CS> DerefMut for Selected<'_, B, CS>
where
    B: Transport,
    CS: OutputPin,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.driver
    }
}
