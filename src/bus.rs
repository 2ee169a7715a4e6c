//! SPI transport used by the driver.
//!
//! The driver needs two things from the bus: a full-duplex single-byte exchange,
//! and a hook to apply its [`BusConfig`] when it takes the bus. Any
//! [`embedded_hal::spi::SpiBus`] can be used through [`SpiTransport`].

use embedded_hal::spi::SpiBus;

use crate::config::BusConfig;

/// Byte-level SPI transport.
pub trait Transport {
    /// Error returned by the transport.
    type Error;

    /// Apply the bus settings before chip select is asserted.
    ///
    /// Called once per outermost transaction.
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    /// Clock out `byte` and return the byte clocked in at the same time.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Wait for all transfers to complete before chip select is deasserted.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// [`Transport`] over an [`embedded_hal::spi::SpiBus`].
///
/// embedded-hal buses are configured by the HAL when they are created, so
/// [`Transport::configure`] does nothing here. Set the bus up for mode 0 (or 3),
/// MSB first, at no more than 10 MHz.
#[derive(Debug)]
pub struct SpiTransport<SPI> {
    spi: SPI,
}

impl<SPI> SpiTransport<SPI> {
    /// Wrap an SPI bus.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Return the underlying SPI bus.
    pub fn destroy(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiBus<u8>> Transport for SpiTransport<SPI> {
    type Error = SPI::Error;

    fn configure(&mut self, _config: &BusConfig) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi.transfer_in_place(&mut buf)?;
        Ok(buf[0])
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.spi.flush()
    }
}
