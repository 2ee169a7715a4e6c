//! Encoding and decoding of MCP4XXX SPI commands.
//!
//! Every command starts with a byte of the form `AAAA CC 1 D`:
//!
//! - `AAAA` is the register address,
//! - `CC` is the operation,
//! - `1` is the command-error probe, which the device echoes only if the address
//!   and operation combination is valid,
//! - `D` is data bit 8 for the 16-bit write and read commands.
//!
//! Increment and decrement are 8-bit commands. Write and read are followed by a
//! second byte holding data bits 0..=7.
//!
//! See section 7.3 of the datasheet.

use bit_field::BitField;

use crate::registers::{
    ADDRESS_MASK, CMDERR_BIT, DATA_HIGH_BIT, DATA_MASK, OPERATION_MASK, Operation, READ_DUMMY,
    Register,
};

/// Build an 8-bit command byte.
///
/// The command-error probe bit is always set.
pub fn encode_short(register: Register, operation: Operation) -> u8 {
    let mut byte = ((register.address() << 4) & ADDRESS_MASK)
        | ((operation.code() << 2) & OPERATION_MASK);
    byte.set_bit(CMDERR_BIT, true);
    byte
}

/// Build a 16-bit command word carrying 9 data bits.
///
/// Data bits above bit 8 are discarded.
pub fn encode_long(register: Register, operation: Operation, data: u16) -> u16 {
    (u16::from(encode_short(register, operation)) << 8) | (data & DATA_MASK)
}

/// Check the command-error bit of the first byte returned by the device.
///
/// Returns false if the device rejected the address and operation combination.
/// An absent device that leaves the data line low is indistinguishable from a
/// rejected command.
pub fn is_valid(returned_first_byte: u8) -> bool {
    returned_first_byte.get_bit(CMDERR_BIT)
}

/// Combine the two bytes returned during a 16-bit read into the 9-bit value.
pub fn decode_data(returned_first_byte: u8, returned_second_byte: u8) -> u16 {
    (u16::from(returned_first_byte.get_bit(DATA_HIGH_BIT)) << 8)
        | u16::from(returned_second_byte)
}

/// A single command, ready to be clocked out to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Command {
    pub(crate) register: Register,
    pub(crate) operation: Operation,
    data: u16,
}

impl Command {
    pub(crate) fn increment(register: Register) -> Self {
        Self::new(register, Operation::Increment, 0)
    }

    pub(crate) fn decrement(register: Register) -> Self {
        Self::new(register, Operation::Decrement, 0)
    }

    /// Read command, carrying the dummy all-ones payload.
    pub(crate) fn read(register: Register) -> Self {
        Self::new(register, Operation::Read, READ_DUMMY)
    }

    pub(crate) fn write(register: Register, data: u16) -> Self {
        Self::new(register, Operation::Write, data)
    }

    fn new(register: Register, operation: Operation, data: u16) -> Self {
        Self {
            register,
            operation,
            data,
        }
    }

    /// The command byte of an 8-bit command.
    pub(crate) fn first_byte(&self) -> u8 {
        encode_short(self.register, self.operation)
    }

    /// Both bytes of a 16-bit command, most significant first.
    ///
    /// Data bit 8 is carried in the first byte.
    pub(crate) fn bytes(&self) -> [u8; 2] {
        encode_long(self.register, self.operation, self.data).to_be_bytes()
    }
}
