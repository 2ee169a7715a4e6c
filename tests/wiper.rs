//! Wiper commands against a simulated MCP4XXX.
mod common;

use mcp4xxx::config::{Config, Resolution, Unit, WiperConfiguration};
use mcp4xxx::registers::{Operation, Register};
use mcp4xxx::{Error, WIPER_READ_FAILED};

use common::{SimError, setup};

fn all_configs() -> Vec<Config> {
    let mut configs = Vec::new();
    for resolution in [Resolution::SevenBit, Resolution::EightBit] {
        for wiper in [WiperConfiguration::Rheostat, WiperConfiguration::Potentiometer] {
            configs.push(
                Config::new()
                    .with_resolution(resolution)
                    .with_wiper_configuration(wiper),
            );
        }
    }
    configs
}

/// 8-bit potentiometer: set beyond the maximum, read it back, then increment.
#[test]
fn full_scale_scenario() -> Result<(), SimError> {
    let (mut pot, chip) = setup(false, Config::default());
    assert_eq!(pot.max_value(), 256);

    pot.set(300)?;
    assert_eq!(pot.get()?, 256);

    // The device stays at full-scale and still accepts the command.
    pot.increment()?;
    assert_eq!(pot.get()?, 256);
    assert_eq!(chip.borrow().wipers[0], 256);
    Ok(())
}

#[test]
fn set_then_get_round_trips_every_value() -> Result<(), SimError> {
    for config in all_configs() {
        let (mut pot, _chip) = setup(false, config);
        for value in 0..=pot.max_value() {
            pot.set(value)?;
            assert_eq!(pot.get()?, value, "{config:?}");
        }
    }
    Ok(())
}

#[test]
fn set_clamps_to_max_value() -> Result<(), SimError> {
    for config in all_configs() {
        let (mut clamped, clamped_chip) = setup(false, config);
        let (mut exact, exact_chip) = setup(false, config);
        let max = exact.max_value();
        for value in [max + 1, 0x1FF, 0x200, u16::MAX] {
            clamped.set(value)?;
            exact.set(max)?;
            assert_eq!(
                clamped_chip.borrow().transactions.last(),
                exact_chip.borrow().transactions.last(),
                "{config:?} {value}"
            );
            assert_eq!(clamped.get()?, max);
        }
    }
    Ok(())
}

#[test]
fn increment_and_decrement_are_not_clamped_by_the_driver() -> Result<(), SimError> {
    let (mut pot, chip) = setup(false, Config::default());
    pot.set(0)?;
    pot.decrement()?;
    assert_eq!(pot.get()?, 0);
    pot.increment()?;
    pot.increment()?;
    assert_eq!(pot.get()?, 2);
    pot.decrement()?;
    assert_eq!(pot.get()?, 1);

    // Increment and decrement are single-byte transactions.
    let chip = chip.borrow();
    let steps: Vec<Vec<u8>> = chip
        .transactions
        .iter()
        .filter(|t| t.len() == 1)
        .cloned()
        .collect();
    assert_eq!(steps, vec![vec![0x0A], vec![0x06], vec![0x06], vec![0x0A]]);
    Ok(())
}

#[test]
fn each_command_is_one_transaction() -> Result<(), SimError> {
    let (mut pot, chip) = setup(false, Config::default());
    pot.set(0x155)?;
    pot.get()?;
    pot.increment()?;

    let chip = chip.borrow();
    assert_eq!(chip.asserts, 3);
    assert_eq!(chip.deasserts, 3);
    assert_eq!(chip.configures, 3);
    assert!(!chip.selected);
    assert_eq!(chip.transactions[0], [0x01, 0x00]);
    assert_eq!(chip.transactions[1], [0x0F, 0xFF]);
    assert_eq!(chip.transactions[2], [0x06]);
    Ok(())
}

#[test]
fn second_unit_uses_wiper_1() -> Result<(), SimError> {
    let (mut pot, chip) = setup(true, Config::new().with_unit(Unit::Pot1));
    pot.set(42)?;
    pot.increment()?;
    assert_eq!(pot.get()?, 43);
    let chip = chip.borrow();
    assert_eq!(chip.wipers[1], 43);
    assert_eq!(chip.wipers[0], 129);
    Ok(())
}

#[test]
fn second_unit_on_single_device_is_rejected() {
    let (mut pot, chip) = setup(false, Config::new().with_unit(Unit::Pot1));
    assert_eq!(
        pot.set(10),
        Err(Error::InvalidCommand {
            register: Register::Wiper1,
            operation: Operation::Write,
        })
    );
    assert!(pot.increment().unwrap_err().is_invalid_command());
    assert!(pot.get().is_err());
    assert_eq!(pot.get_or_sentinel(), WIPER_READ_FAILED);

    // Rejected 16-bit commands stop after the first byte.
    let chip = chip.borrow();
    assert_eq!(chip.transactions[0], [0x12]);
    assert_eq!(chip.asserts, chip.deasserts);
    assert!(!chip.selected);
}

#[test]
fn absent_device_reads_as_rejected() {
    let (mut pot, chip) = setup(false, Config::default());
    chip.borrow_mut().absent = true;
    assert!(pot.get().unwrap_err().is_invalid_command());
    assert_eq!(pot.get_or_sentinel(), 0xFFFF);
    assert!(pot.set(1).unwrap_err().is_invalid_command());
    assert!(!chip.borrow().selected);
}

#[test]
fn get_or_sentinel_returns_the_wiper() -> Result<(), SimError> {
    let (mut pot, _chip) = setup(false, Config::default());
    pot.set(17)?;
    assert_eq!(pot.get_or_sentinel(), 17);
    Ok(())
}

#[test]
fn transaction_holds_chip_select() -> Result<(), SimError> {
    let (mut pot, chip) = setup(false, Config::default());
    let value = pot.transaction(|pot| {
        pot.set(10)?;
        pot.increment()?;
        pot.get()
    })?;
    assert_eq!(value, 11);
    let chip = chip.borrow();
    assert_eq!(chip.asserts, 1);
    assert_eq!(chip.deasserts, 1);
    assert_eq!(chip.configures, 1);
    assert_eq!(chip.transactions[0], [0x00, 0x0A, 0x06, 0x0F, 0xFF]);
    Ok(())
}
