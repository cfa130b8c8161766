//! MCP23017 16-bit I2C GPIO expander
//!
//! # Register map
//!
//! The driver runs the chip with IOCON.BANK = 0, where every register of
//! port A is followed by its port B twin:
//!
//! | Register | Port A | Port B | Reset |
//! |----------|--------|--------|-------|
//! | IODIR    | 0x00   | 0x01   | 0xFF  |
//! | IOCON    | 0x0A   | 0x0B   | 0x00  |
//! | GPPU     | 0x0C   | 0x0D   | 0x00  |
//! | GPIO     | 0x12   | 0x13   | -     |
//! | OLAT     | 0x14   | 0x15   | 0x00  |
//!
//! Pins 0-7 map to GPA0-GPA7 and pins 8-15 to GPB0-GPB7.
//!
//! Direction, pull-up and latch registers are shadowed so a single pin
//! change is one register write with no read-modify-write on the bus.

use embedded_hal::i2c::I2c;
use ioblinds_hal::{GpioExpander, Level, PinMode};

/// MCP23017 register addresses (BANK = 0)
pub mod reg {
    /// I/O direction, port A (1 = input)
    pub const IODIRA: u8 = 0x00;
    /// I/O direction, port B
    pub const IODIRB: u8 = 0x01;
    /// Expander configuration
    pub const IOCON: u8 = 0x0A;
    /// Pull-up enable, port A
    pub const GPPUA: u8 = 0x0C;
    /// Pull-up enable, port B
    pub const GPPUB: u8 = 0x0D;
    /// Port value, port A
    pub const GPIOA: u8 = 0x12;
    /// Port value, port B
    pub const GPIOB: u8 = 0x13;
    /// Output latch, port A
    pub const OLATA: u8 = 0x14;
    /// Output latch, port B
    pub const OLATB: u8 = 0x15;
}

/// Number of expander pins
pub const PIN_COUNT: u8 = 16;

/// Address with A0-A2 tied low
pub const BASE_ADDRESS: u8 = 0x20;

/// MCP23017 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mcp23017Error<E> {
    /// Bus transfer failed
    I2c(E),
    /// Pin number above 15
    InvalidPin(u8),
}

/// MCP23017 driver
pub struct Mcp23017<I> {
    i2c: I,
    address: u8,
    iodir: u16,
    gppu: u16,
    olat: u16,
}

impl<I: I2c> Mcp23017<I> {
    /// Create a driver for the chip at `address`
    ///
    /// No bus traffic happens until [`init`](Self::init).
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            iodir: 0xFFFF,
            gppu: 0,
            olat: 0,
        }
    }

    /// Put the chip in a known state
    ///
    /// Selects BANK = 0 with sequential addressing, then writes the shadowed
    /// direction, pull-up and latch registers for both ports.
    pub fn init(&mut self) -> Result<(), Mcp23017Error<I::Error>> {
        self.write_reg(reg::IOCON, 0x00)?;
        self.write_pair(reg::IODIRA, self.iodir)?;
        self.write_pair(reg::GPPUA, self.gppu)?;
        self.write_pair(reg::OLATA, self.olat)
    }

    /// I2C address of the chip
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.i2c
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), Mcp23017Error<I::Error>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Mcp23017Error::I2c)
    }

    /// Write a port A register and its port B twin in one transfer
    fn write_pair(&mut self, register_a: u8, value: u16) -> Result<(), Mcp23017Error<I::Error>> {
        let [a, b] = value.to_le_bytes();
        self.i2c
            .write(self.address, &[register_a, a, b])
            .map_err(Mcp23017Error::I2c)
    }

    /// Write the port half of `shadow` that holds `pin`
    fn write_port(
        &mut self,
        register_a: u8,
        shadow: u16,
        pin: u8,
    ) -> Result<(), Mcp23017Error<I::Error>> {
        let [a, b] = shadow.to_le_bytes();
        if pin < 8 {
            self.write_reg(register_a, a)
        } else {
            self.write_reg(register_a + 1, b)
        }
    }
}

fn check_pin<E>(pin: u8) -> Result<u16, Mcp23017Error<E>> {
    if pin < PIN_COUNT {
        Ok(1 << pin)
    } else {
        Err(Mcp23017Error::InvalidPin(pin))
    }
}

impl<I: I2c> GpioExpander for Mcp23017<I> {
    type Error = Mcp23017Error<I::Error>;

    fn configure_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        let mask = check_pin(pin)?;

        match mode {
            PinMode::Input => {
                self.iodir |= mask;
                self.gppu &= !mask;
            }
            PinMode::InputPullUp => {
                self.iodir |= mask;
                self.gppu |= mask;
            }
            PinMode::Output => {
                self.iodir &= !mask;
                self.gppu &= !mask;
            }
        }

        self.write_port(reg::GPPUA, self.gppu, pin)?;
        self.write_port(reg::IODIRA, self.iodir, pin)
    }

    fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), Self::Error> {
        let mask = check_pin(pin)?;
        if level.is_high() {
            self.olat |= mask;
        } else {
            self.olat &= !mask;
        }
        self.write_port(reg::OLATA, self.olat, pin)
    }

    fn digital_read(&mut self, pin: u8) -> Result<Level, Self::Error> {
        check_pin::<I::Error>(pin)?;
        let (register, bit) = if pin < 8 {
            (reg::GPIOA, pin)
        } else {
            (reg::GPIOB, pin - 8)
        };

        let mut value = [0u8];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(Mcp23017Error::I2c)?;
        Ok(Level::from_bool(value[0] & (1 << bit) != 0))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
    use std::vec::Vec;

    /// Register-level MCP23017 model
    struct FakeBus {
        address: u8,
        registers: [u8; 0x16],
        pointer: usize,
        writes: Vec<Vec<u8>>,
    }

    impl FakeBus {
        fn new(address: u8) -> Self {
            let mut registers = [0u8; 0x16];
            registers[reg::IODIRA as usize] = 0xFF;
            registers[reg::IODIRB as usize] = 0xFF;
            Self {
                address,
                registers,
                pointer: 0,
                writes: Vec::new(),
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != self.address {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.writes.push(bytes.to_vec());
                        let Some((&register, data)) = bytes.split_first() else {
                            continue;
                        };
                        self.pointer = register as usize;
                        for (i, &byte) in data.iter().enumerate() {
                            self.registers[self.pointer + i] = byte;
                        }
                    }
                    Operation::Read(buf) => {
                        for (i, byte) in buf.iter_mut().enumerate() {
                            *byte = self.registers[self.pointer + i];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn expander() -> Mcp23017<FakeBus> {
        let mut mcp = Mcp23017::new(FakeBus::new(0x27), 0x27);
        mcp.init().unwrap();
        mcp
    }

    #[test]
    fn test_init_writes_known_state() {
        let mcp = expander();
        let bus = mcp.release();

        assert_eq!(bus.writes[0], [reg::IOCON, 0x00]);
        assert_eq!(bus.writes[1], [reg::IODIRA, 0xFF, 0xFF]);
        assert_eq!(bus.writes[2], [reg::GPPUA, 0x00, 0x00]);
        assert_eq!(bus.writes[3], [reg::OLATA, 0x00, 0x00]);
    }

    #[test]
    fn test_output_on_port_b() {
        let mut mcp = expander();
        mcp.configure_pin_mode(9, PinMode::Output).unwrap();

        let bus = mcp.release();
        assert_eq!(bus.registers[reg::IODIRB as usize], 0b1111_1101);
        assert_eq!(bus.registers[reg::IODIRA as usize], 0xFF);
    }

    #[test]
    fn test_pull_up_input_on_port_a() {
        let mut mcp = expander();
        mcp.configure_pin_mode(0, PinMode::InputPullUp).unwrap();
        mcp.configure_pin_mode(1, PinMode::InputPullUp).unwrap();

        let bus = mcp.release();
        assert_eq!(bus.registers[reg::GPPUA as usize], 0b0000_0011);
        assert_eq!(bus.registers[reg::IODIRA as usize], 0xFF);
    }

    #[test]
    fn test_write_keeps_other_latches() {
        let mut mcp = expander();
        mcp.digital_write(8, Level::High).unwrap();
        mcp.digital_write(9, Level::High).unwrap();
        mcp.digital_write(8, Level::Low).unwrap();

        let bus = mcp.release();
        assert_eq!(bus.registers[reg::OLATB as usize], 0b0000_0010);
        assert_eq!(bus.registers[reg::OLATA as usize], 0);
        // One single-register write per change
        assert_eq!(bus.writes.last().unwrap(), &[reg::OLATB, 0b0000_0010]);
    }

    #[test]
    fn test_read_pins() {
        let mut bus = FakeBus::new(0x27);
        bus.registers[reg::GPIOA as usize] = 0b0000_0010;
        bus.registers[reg::GPIOB as usize] = 0b1000_0000;
        let mut mcp = Mcp23017::new(bus, 0x27);

        assert_eq!(mcp.digital_read(0).unwrap(), Level::Low);
        assert_eq!(mcp.digital_read(1).unwrap(), Level::High);
        assert_eq!(mcp.digital_read(15).unwrap(), Level::High);
        assert_eq!(mcp.digital_read(8).unwrap(), Level::Low);
    }

    #[test]
    fn test_invalid_pin() {
        let mut mcp = expander();
        assert_eq!(
            mcp.configure_pin_mode(16, PinMode::Output),
            Err(Mcp23017Error::InvalidPin(16))
        );
        assert_eq!(
            mcp.digital_write(20, Level::High),
            Err(Mcp23017Error::InvalidPin(20))
        );
        assert_eq!(mcp.digital_read(16), Err(Mcp23017Error::InvalidPin(16)));
    }

    #[test]
    fn test_wrong_address_reports_bus_error() {
        let mut mcp = Mcp23017::new(FakeBus::new(0x27), 0x20);
        assert_eq!(
            mcp.init(),
            Err(Mcp23017Error::I2c(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address
            )))
        );
    }
}
