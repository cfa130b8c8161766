//! GPIO expander abstractions
//!
//! The blind is wired to a port expander rather than to MCU pins, so pins
//! are addressed by number and every access may fail on the bus.

/// Electrical signal level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Level from a logic value (true = High)
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Check if the level is High
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if the level is Low
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }

    /// The opposite level
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Pin direction and bias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input
    Input,
    /// Input with the internal pull-up enabled
    InputPullUp,
    /// Push-pull output
    Output,
}

impl PinMode {
    /// Check if this mode configures the pin as an input
    pub const fn is_input(self) -> bool {
        matches!(self, PinMode::Input | PinMode::InputPullUp)
    }
}

/// Digital I/O on a port expander
///
/// Implementations handle the bus traffic for a specific chip. Pins are
/// numbered from 0 across all ports of the device.
pub trait GpioExpander {
    /// Error type for bus or pin failures
    type Error: core::fmt::Debug;

    /// Configure the direction and bias of a pin
    fn configure_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error>;

    /// Drive an output pin to the given level
    fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), Self::Error>;

    /// Sample the current level of a pin
    fn digital_read(&mut self, pin: u8) -> Result<Level, Self::Error>;
}

impl<T: GpioExpander + ?Sized> GpioExpander for &mut T {
    type Error = T::Error;

    fn configure_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        T::configure_pin_mode(self, pin, mode)
    }

    fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), Self::Error> {
        T::digital_write(self, pin, level)
    }

    fn digital_read(&mut self, pin: u8) -> Result<Level, Self::Error> {
        T::digital_read(self, pin)
    }
}
