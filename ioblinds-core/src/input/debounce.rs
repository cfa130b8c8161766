//! Per-pin edge detection

use ioblinds_hal::Level;

/// Level transition seen between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Button went to its pressed level
    Pressed,
    /// Button went back to its idle level
    Released,
}

/// Debounce record for one input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncedInput {
    pin: u8,
    pressed_level: Level,
    last_level: Level,
}

impl DebouncedInput {
    /// Create a record for `pin`, assumed released
    pub fn new(pin: u8, pressed_level: Level) -> Self {
        Self {
            pin,
            pressed_level,
            last_level: pressed_level.inverted(),
        }
    }

    /// Record for a button wired to ground with a pull-up
    pub fn pull_up(pin: u8) -> Self {
        Self::new(pin, Level::Low)
    }

    /// Expander pin number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Last accepted sample
    pub fn last_level(&self) -> Level {
        self.last_level
    }

    /// Check if the last sample was the pressed level
    pub fn is_pressed(&self) -> bool {
        self.last_level == self.pressed_level
    }

    /// Feed a new sample
    ///
    /// Returns the edge if the level changed since the last sample.
    pub fn sample(&mut self, level: Level) -> Option<Edge> {
        if level == self.last_level {
            return None;
        }
        self.last_level = level;
        if level == self.pressed_level {
            Some(Edge::Pressed)
        } else {
            Some(Edge::Released)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_released() {
        let input = DebouncedInput::pull_up(3);
        assert_eq!(input.pin(), 3);
        assert_eq!(input.last_level(), Level::High);
        assert!(!input.is_pressed());
    }

    #[test]
    fn test_press_and_release_edges() {
        let mut input = DebouncedInput::pull_up(0);

        assert_eq!(input.sample(Level::High), None);
        assert_eq!(input.sample(Level::Low), Some(Edge::Pressed));
        assert!(input.is_pressed());
        // Held: no repeated edge
        assert_eq!(input.sample(Level::Low), None);
        assert_eq!(input.sample(Level::High), Some(Edge::Released));
        assert!(!input.is_pressed());
    }

    #[test]
    fn test_active_high_button() {
        let mut input = DebouncedInput::new(1, Level::High);
        assert_eq!(input.sample(Level::Low), None);
        assert_eq!(input.sample(Level::High), Some(Edge::Pressed));
    }
}
