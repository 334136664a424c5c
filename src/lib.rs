//! Driver for the TCA9535 16-bit I2C GPIO expander.
//!
//! Two layers are provided:
//!
//! - [`Driver`] is the register-level driver.  It writes whole 16-bit registers and keeps shadow
//!   copies of the configuration, polarity inversion and output registers, so mask-based updates
//!   (`set_pins_as_output()`, `set_output_pins()`, ...) take a single bus write.
//! - [`Tca9535`] puts a driver behind a [`PortMutex`] and splits it into sixteen [`Pin`]s
//!   implementing the `embedded-hal` digital traits.
//!
//! Any bus implementing `embedded_hal::i2c::I2c` works.  Bus clock and transaction timeout are
//! configured on the bus itself; [`BUS_FREQUENCY_HZ`] and [`TRANSACTION_TIMEOUT_MS`] are the
//! values the driver is characterized at.
//!
//! ## Example
//! ```
//! use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
//!
//! let expectations = [
//!     // P00..P07 outputs, P10..P17 inputs
//!     Transaction::write(0x20, vec![0x06, 0x00, 0xff]),
//!     Transaction::write(0x20, vec![0x02, 0xfe, 0xff]),
//!     Transaction::write_read(0x20, vec![0x00], vec![0xfe, 0x01]),
//! ];
//! let mut i2c = Mock::new(&expectations);
//!
//! let mut tca = tca9535::Driver::new(i2c.clone(), 0x20);
//! tca.set_direction(0xff00).unwrap();
//! tca.set_output_pin_low(0).unwrap();
//! assert_eq!(tca.output_level(), 0xfffe);
//! assert!(tca.is_pin_high(8).unwrap());
//!
//! i2c.done();
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod fmt;

mod bus;
mod common;
mod driver;
mod expander;
mod multi;
mod mutex;
mod pin;

pub use bus::I2cBus;
pub use common::mode;
pub use common::Direction;
pub use common::{PortDriver, PortDriverPolarity, PortDriverTotemPole};
pub use driver::{
    Driver, BASE_ADDRESS, BUS_FREQUENCY_HZ, PIN_COUNT, RESET_DIRECTION, RESET_OUTPUT,
    RESET_POLARITY, TRANSACTION_TIMEOUT_MS,
};
pub use expander::{Parts, Tca9535};
pub use multi::{read_multiple, write_multiple};
pub use mutex::PortMutex;
pub use pin::{Pin, PinError};

pub(crate) use bus::I2cExt;
