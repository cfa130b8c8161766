//! Board wiring
//!
//! The expander can sit on either RP2040 I2C controller:
//!
//! | device | controller | SDA    | SCL    |
//! |--------|------------|--------|--------|
//! | 0      | I2C0       | GPIO4  | GPIO5  |
//! | 1      | I2C1       | GPIO6  | GPIO7  |

use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, PIN_4, PIN_5, PIN_6, PIN_7};
use embassy_rp::Peri;
use embedded_hal::i2c::{ErrorType, I2c as _, Operation};

/// Bus the expander is attached to
pub enum BoardI2c {
    Bus0(I2c<'static, I2C0, Blocking>),
    Bus1(I2c<'static, I2C1, Blocking>),
}

/// Peripherals the expander bus may claim
pub struct I2cResources {
    pub i2c0: Peri<'static, I2C0>,
    pub sda0: Peri<'static, PIN_4>,
    pub scl0: Peri<'static, PIN_5>,
    pub i2c1: Peri<'static, I2C1>,
    pub sda1: Peri<'static, PIN_6>,
    pub scl1: Peri<'static, PIN_7>,
}

impl BoardI2c {
    /// Bring up the controller for `device`
    ///
    /// The config parser only accepts 0 and 1, anything else maps to bus 1.
    pub fn new(device: u8, r: I2cResources) -> Self {
        let config = i2c::Config::default();
        match device {
            0 => BoardI2c::Bus0(I2c::new_blocking(r.i2c0, r.scl0, r.sda0, config)),
            _ => BoardI2c::Bus1(I2c::new_blocking(r.i2c1, r.scl1, r.sda1, config)),
        }
    }
}

impl ErrorType for BoardI2c {
    type Error = i2c::Error;
}

impl embedded_hal::i2c::I2c for BoardI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match self {
            BoardI2c::Bus0(bus) => bus.transaction(address, operations),
            BoardI2c::Bus1(bus) => bus.transaction(address, operations),
        }
    }
}
