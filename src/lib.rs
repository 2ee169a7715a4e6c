#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod bus;
pub mod commands;
pub mod config;
mod driver;
mod error;
pub mod registers;

pub use config::Config;
pub use driver::{DriverError, MCP4XXX, WIPER_READ_FAILED};
pub use error::Error;
