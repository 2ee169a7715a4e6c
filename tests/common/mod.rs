//! Simulated MCP4XXX on an SPI bus.
//!
//! The simulation decodes commands byte by byte while chip select is low, the same
//! way the device does: it replies to the first byte with the command-error bit
//! set or cleared, and ignores the rest of the transaction after a rejected command.
#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use mcp4xxx::bus::Transport;
use mcp4xxx::config::{BusConfig, Config};
use mcp4xxx::{DriverError, MCP4XXX};

pub type SimDriver = MCP4XXX<SimBus, SimSelect>;
pub type SimError = DriverError<SimBus, SimSelect>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Waiting for a command byte.
    Command,
    /// Waiting for the data byte of a write.
    WriteData { address: u8, high: u16 },
    /// Waiting to clock out the data byte of a read.
    ReadData { low: u8 },
    /// A command was rejected; ignore everything until deselected.
    Ignoring,
}

#[derive(Debug)]
pub struct Chip {
    pub dual: bool,
    pub max_value: u16,
    pub wipers: [u16; 2],
    pub tcon: u16,
    pub status: u16,
    /// Reject every TCON command, as a part without TCON access would.
    pub reject_tcon: bool,
    /// Leave SDO low, as if nothing were connected.
    pub absent: bool,

    pub selected: bool,
    frame: Frame,
    pub asserts: usize,
    pub deasserts: usize,
    pub configures: usize,
    /// Bytes clocked in while selected, grouped by chip select assertion.
    pub transactions: Vec<Vec<u8>>,
    /// Every value written to TCON.
    pub tcon_writes: Vec<u16>,
}

impl Chip {
    pub fn new(dual: bool, max_value: u16) -> Self {
        Self {
            dual,
            max_value,
            wipers: [max_value / 2 + 1, max_value / 2 + 1],
            tcon: 0x1FF,
            status: 0x1F0,
            reject_tcon: false,
            absent: false,
            selected: false,
            frame: Frame::Command,
            asserts: 0,
            deasserts: 0,
            configures: 0,
            transactions: Vec::new(),
            tcon_writes: Vec::new(),
        }
    }

    fn accepts(&self, address: u8, operation: u8) -> bool {
        match address {
            0x00 => true,
            0x01 => self.dual,
            0x04 => !self.reject_tcon && (operation == 0b00 || operation == 0b11),
            0x05 => operation == 0b11,
            _ => false,
        }
    }

    fn register(&self, address: u8) -> u16 {
        match address {
            0x00 => self.wipers[0],
            0x01 => self.wipers[1],
            0x04 => self.tcon,
            0x05 => self.status,
            _ => 0x1FF,
        }
    }

    fn store(&mut self, address: u8, value: u16) {
        match address {
            0x00 | 0x01 => self.wipers[address as usize] = value.min(self.max_value),
            0x04 => {
                self.tcon = value;
                self.tcon_writes.push(value);
            }
            _ => {}
        }
    }

    fn step(&mut self, address: u8, up: bool) {
        let wiper = &mut self.wipers[address as usize];
        if up {
            *wiper = (*wiper + 1).min(self.max_value);
        } else {
            *wiper = wiper.saturating_sub(1);
        }
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        if self.absent || !self.selected {
            return 0x00;
        }
        if let Some(current) = self.transactions.last_mut() {
            current.push(byte);
        }
        match self.frame {
            Frame::Command => {
                let address = byte >> 4;
                let operation = (byte >> 2) & 0b11;
                if !self.accepts(address, operation) {
                    self.frame = Frame::Ignoring;
                    return 0b1111_1100;
                }
                match operation {
                    0b00 => {
                        self.frame = Frame::WriteData {
                            address,
                            high: u16::from(byte & 1) << 8,
                        };
                        0xFF
                    }
                    0b11 => {
                        let value = self.register(address);
                        self.frame = Frame::ReadData {
                            low: value as u8,
                        };
                        0b1111_1110 | (value >> 8) as u8
                    }
                    op => {
                        self.step(address, op == 0b01);
                        0xFF
                    }
                }
            }
            Frame::WriteData { address, high } => {
                self.store(address, high | u16::from(byte));
                self.frame = Frame::Command;
                0xFF
            }
            Frame::ReadData { low } => {
                self.frame = Frame::Command;
                low
            }
            Frame::Ignoring => 0x00,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimBus(pub Rc<RefCell<Chip>>);

impl Transport for SimBus {
    type Error = Infallible;

    fn configure(&mut self, _config: &BusConfig) -> Result<(), Self::Error> {
        self.0.borrow_mut().configures += 1;
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        Ok(self.0.borrow_mut().exchange(byte))
    }
}

#[derive(Debug, Clone)]
pub struct SimSelect(pub Rc<RefCell<Chip>>);

impl ErrorType for SimSelect {
    type Error = Infallible;
}

impl OutputPin for SimSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if !chip.selected {
            chip.selected = true;
            chip.asserts += 1;
            chip.frame = Frame::Command;
            chip.transactions.push(Vec::new());
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.selected {
            chip.selected = false;
            chip.deasserts += 1;
        }
        Ok(())
    }
}

/// Build a driver wired to a fresh simulated chip.
pub fn setup(dual: bool, config: Config) -> (SimDriver, Rc<RefCell<Chip>>) {
    let chip = Rc::new(RefCell::new(Chip::new(dual, config.max_value())));
    let driver = MCP4XXX::with_config(
        SimBus(Rc::clone(&chip)),
        SimSelect(Rc::clone(&chip)),
        config,
    )
    .unwrap();
    (driver, chip)
}
