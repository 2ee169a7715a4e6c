use crate::registers::{Operation, Register};

/// Wrapper for problems when communicating with the MCP4XXX.
///
/// `B` is the error type of the SPI transport and `P` that of the chip select pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<B, P> {
    /// The MCP4XXX cleared the command-error bit in its reply.
    ///
    /// The device does this when the address and operation combination is not
    /// valid, for example terminal A commands on a rheostat (MCP4XX2) or commands
    /// addressed to potentiometer 1 of a single device. A disconnected device that
    /// leaves SDO low produces the same result.
    ///
    /// No data is returned and, for read-modify-write operations, nothing is written.
    InvalidCommand {
        /// Register the rejected command was addressed to.
        register: Register,
        /// Operation of the rejected command.
        operation: Operation,
    },
    /// The SPI transport returned an error.
    Bus(B),
    /// Driving the chip select line failed.
    ChipSelect(P),
}

impl<B: core::fmt::Debug, P: core::fmt::Debug> core::fmt::Display for Error<B, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidCommand {
                register,
                operation,
            } => write!(f, "device rejected {operation:?} of {register:?}"),
            Error::Bus(e) => write!(f, "SPI transport error: {e:?}"),
            Error::ChipSelect(e) => write!(f, "chip select error: {e:?}"),
        }
    }
}

impl<B: core::fmt::Debug, P: core::fmt::Debug> core::error::Error for Error<B, P> {}

impl<B, P> Error<B, P> {
    /// True if the device rejected the command, as opposed to a transport failure.
    pub fn is_invalid_command(&self) -> bool {
        matches!(self, Error::InvalidCommand { .. })
    }
}
