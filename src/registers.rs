//! Register map and command encoding constants of the MCP4XXX.
//!
//! Bits in documentation are numbered from 0 (least significant) and correspond to
//! figure 7-1 (command byte) and register 4-1 / 4-2 (TCON, STATUS) of the MCP41XX/
//! MCP42XX datasheet.

/// Bits 4..=7 of the command byte hold the register address.
pub(crate) const ADDRESS_MASK: u8 = 0b1111_0000;
/// Bits 2..=3 of the command byte hold the operation code.
pub(crate) const OPERATION_MASK: u8 = 0b0000_1100;
/// Bit 1 of the command byte is the command-error probe.
///
/// Always transmitted as 1. The MCP4XXX drives it low in its reply if the
/// address and operation combination is not valid.
pub(crate) const CMDERR_BIT: usize = 1;
/// Bit 0 of the first byte carries data bit 8 for 16-bit commands.
pub(crate) const DATA_HIGH_BIT: usize = 0;
/// The 9 data bits of a 16-bit command.
pub(crate) const DATA_MASK: u16 = 0x01FF;
/// Payload sent with read commands. The MCP4XXX ignores it.
pub(crate) const READ_DUMMY: u16 = DATA_MASK;

/// Bit 8 of TCON is reserved and must be written as 1.
pub(crate) const TCON_RESERVED_BIT: usize = 8;

/// Bit 1 of STATUS reflects the hardware shutdown (SHDN) pin.
pub(crate) const STATUS_SHUTDOWN_BIT: usize = 1;

/// Memory-mapped registers of the MCP4XXX volatile memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Volatile wiper of potentiometer 0.
    Wiper0 = 0x00,
    /// Volatile wiper of potentiometer 1 (dual devices only).
    Wiper1 = 0x01,
    /// Terminal control register, shared by both potentiometers.
    Tcon = 0x04,
    /// Status register (read-only).
    Status = 0x05,
}

impl Register {
    /// The 4-bit memory address of the register.
    pub const fn address(self) -> u8 {
        self as u8
    }
}

/// Two-bit operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Operation {
    /// Write 9 data bits (16-bit command).
    Write = 0b00,
    /// Increment the wiper by one step (8-bit command).
    Increment = 0b01,
    /// Decrement the wiper by one step (8-bit command).
    Decrement = 0b10,
    /// Read 9 data bits (16-bit command).
    Read = 0b11,
}

impl Operation {
    /// The 2-bit operation code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this operation uses the 16-bit command format.
    pub const fn has_data(self) -> bool {
        matches!(self, Operation::Write | Operation::Read)
    }
}

/// Per-potentiometer flags in the TCON register.
///
/// Bit positions are those of potentiometer 0. Potentiometer 1 uses the same
/// layout in the upper nibble; see [`Unit::tcon_bit`].
///
/// [`Unit::tcon_bit`]: crate::config::Unit::tcon_bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TconFlag {
    /// R0B: terminal B connected.
    TerminalB,
    /// R0W: wiper connected.
    Wiper,
    /// R0A: terminal A connected. Not present on rheostat devices.
    TerminalA,
    /// R0HW: 1 when the potentiometer is *not* in software shutdown.
    NotShutdown,
}

impl TconFlag {
    /// Bit position within the potentiometer 0 nibble.
    pub const fn bit(self) -> usize {
        match self {
            TconFlag::TerminalB => 0,
            TconFlag::Wiper => 1,
            TconFlag::TerminalA => 2,
            TconFlag::NotShutdown => 3,
        }
    }
}
