//! Blind controller
//!
//! Owns the motion logic of one blind: the input poller, the motion driver,
//! the position estimator and the persistence bridge. The controller is
//! driven entirely from outside:
//!
//! ```ignore
//! let mut blind = BlindController::new(config, expander, store, now_ms())?;
//!
//! loop {
//!     // Sleep until the next timer or until a command arrives
//!     match select(commands.receive(), Timer::at(blind.next_deadline_ms())).await {
//!         First(position) => blind.set_target_position(position, now_ms())?,
//!         Second(()) => blind.poll(now_ms()),
//!     }
//!     while let Some(event) = blind.pop_event() {
//!         notify(event);
//!     }
//! }
//! ```
//!
//! # Timers
//!
//! | Timer         | Kind     | Armed by            | Effect                       |
//! |---------------|----------|---------------------|------------------------------|
//! | input poll    | interval | construction        | sample both buttons          |
//! | position tick | interval | motion command      | step estimate 1% to target   |
//! | completion    | one-shot | motion command      | state back to Stopped        |
//! | pin release   | one-shot | motion command      | relay back to initial level  |
//!
//! A new motion command cancels the last three before arming fresh ones, so
//! the latest command always wins.

use heapless::Deque;
use ioblinds_hal::{GpioExpander, Level, PinMode, PositionStore};

use crate::config::{BlindConfig, ConfigError};
use crate::input::{DebouncedInput, Edge};
use crate::motion::{Direction, TravelPlan, MAX_POSITION};
use crate::scheduler::{Interval, Timeout};
use crate::state::{BlindEvent, MotionEvent, PositionState};

/// Published events kept until drained; the oldest is dropped on overflow
pub const EVENT_QUEUE_LEN: usize = 16;

/// Rejected motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Target above 100
    OutOfRange(u8),
}

/// Controller construction errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError<E> {
    /// Configuration failed validation
    Config(ConfigError),
    /// A pin could not be configured
    Gpio { pin: u8, error: E },
}

impl<E> From<ConfigError> for SetupError<E> {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

/// Time-estimated position controller for one blind
pub struct BlindController<G, S> {
    config: BlindConfig,
    gpio: G,
    store: S,
    /// Estimated position (0 = down, 100 = up)
    current_position: u8,
    /// Commanded position
    target_position: u8,
    position_state: PositionState,
    up_input: DebouncedInput,
    down_input: DebouncedInput,
    completion: Timeout,
    release: Timeout,
    /// Output held active until `release` fires
    energized_pin: Option<u8>,
    position_tick: Interval,
    input_poll: Interval,
    events: Deque<BlindEvent, EVENT_QUEUE_LEN>,
}

impl<G: GpioExpander, S: PositionStore> BlindController<G, S> {
    /// Create a controller, configure its pins and restore the last position
    ///
    /// Both relays are driven to their released level. A missing, corrupt or
    /// unreadable stored position counts as fully down.
    pub fn new(
        config: BlindConfig,
        gpio: G,
        store: S,
        now_ms: u64,
    ) -> Result<Self, SetupError<G::Error>> {
        config.validate()?;

        let pins = config.pins;
        let mut controller = Self {
            gpio,
            store,
            current_position: 0,
            target_position: 0,
            position_state: PositionState::Stopped,
            up_input: DebouncedInput::pull_up(pins.up_input),
            down_input: DebouncedInput::pull_up(pins.down_input),
            completion: Timeout::new(),
            release: Timeout::new(),
            energized_pin: None,
            position_tick: Interval::new(),
            input_poll: Interval::new(),
            events: Deque::new(),
            config,
        };

        controller.setup_pins()?;

        let position = controller.load_position();
        controller.current_position = position;
        controller.target_position = position;
        controller
            .input_poll
            .start(now_ms, controller.config.input_interval_ms);

        Ok(controller)
    }

    fn setup_pins(&mut self) -> Result<(), SetupError<G::Error>> {
        let pins = self.config.pins;
        let initial = self.config.initial_level();

        for pin in [pins.up_input, pins.down_input] {
            self.gpio
                .configure_pin_mode(pin, PinMode::InputPullUp)
                .map_err(|error| SetupError::Gpio { pin, error })?;
        }
        for pin in [pins.up_output, pins.down_output] {
            // Latch the released level before the pin starts driving
            self.gpio
                .digital_write(pin, initial)
                .map_err(|error| SetupError::Gpio { pin, error })?;
            self.gpio
                .configure_pin_mode(pin, PinMode::Output)
                .map_err(|error| SetupError::Gpio { pin, error })?;
        }
        Ok(())
    }

    fn load_position(&mut self) -> u8 {
        match self.store.get(self.config.name.as_str()) {
            Ok(Some(position)) if position <= MAX_POSITION => position,
            Ok(Some(position)) => {
                self.publish(BlindEvent::StoredPositionInvalid(position));
                0
            }
            Ok(None) => 0,
            Err(_) => {
                self.publish(BlindEvent::StoreFailed);
                0
            }
        }
    }

    /// Current motion state
    pub fn position_state(&self) -> PositionState {
        self.position_state
    }

    /// Estimated position
    pub fn current_position(&self) -> u8 {
        self.current_position
    }

    /// Commanded position
    pub fn target_position(&self) -> u8 {
        self.target_position
    }

    /// Configuration the controller runs with
    pub fn config(&self) -> &BlindConfig {
        &self.config
    }

    /// Output currently held active, if any
    pub fn energized_pin(&self) -> Option<u8> {
        self.energized_pin
    }

    /// The expander
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// The expander, mutably
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// The position store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the oldest published event
    pub fn pop_event(&mut self) -> Option<BlindEvent> {
        self.events.pop_front()
    }

    /// Earliest pending timer deadline (ms)
    ///
    /// The input poll always runs, so there is always a deadline.
    pub fn next_deadline_ms(&self) -> u64 {
        [
            self.position_tick.deadline_ms(),
            self.completion.deadline_ms(),
            self.release.deadline_ms(),
            self.input_poll.deadline_ms(),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(u64::MAX)
    }

    /// Command the blind to `position`
    ///
    /// Motion happens asynchronously through [`poll`](Self::poll); success
    /// only means the command was accepted. Targets above 100 are rejected
    /// without touching any state.
    pub fn set_target_position(&mut self, position: u8, now_ms: u64) -> Result<(), CommandError> {
        if position > MAX_POSITION {
            return Err(CommandError::OutOfRange(position));
        }
        self.command(position, now_ms);
        Ok(())
    }

    /// Stop where the blind is now
    ///
    /// Releases both relays and makes the current estimate the target.
    pub fn hold_position(&mut self) {
        if self.position_state.is_moving() || self.release.is_armed() {
            self.interrupt_motion();
        }
        self.set_target(self.current_position);
        self.change_state(MotionEvent::Halt);
    }

    /// Run every timer that is due at `now_ms`
    pub fn poll(&mut self, now_ms: u64) {
        let steps = self.position_tick.poll(now_ms);
        for _ in 0..steps {
            if !self.step_position() {
                break;
            }
        }

        if self.completion.fire(now_ms) {
            self.complete_motion();
        }

        if self.release.fire(now_ms) {
            if let Some(pin) = self.energized_pin.take() {
                self.write_output(pin, self.config.initial_level());
            }
        }

        if self.input_poll.poll(now_ms) > 0 {
            self.poll_inputs(now_ms);
        }
    }

    fn command(&mut self, position: u8, now_ms: u64) {
        self.set_target(position);

        let needs_motion = position != self.current_position;
        // A finished travel may still be holding its relay for the end-stop
        // offset; a new travel must not overlap it.
        if self.position_state.is_moving() || (needs_motion && self.release.is_armed()) {
            self.interrupt_motion();
        }

        let Some(plan) = TravelPlan::new(self.current_position, position, &self.config.travel)
        else {
            self.change_state(MotionEvent::Halt);
            return;
        };

        self.position_tick.start(now_ms, plan.step_interval_ms);
        self.change_state(MotionEvent::Start(plan.direction));
        self.completion.arm(now_ms, plan.duration_ms);
        self.energize(self.output_pin(plan.direction), plan.hold_ms, now_ms);
    }

    /// Release both relays and cancel every motion timer
    fn interrupt_motion(&mut self) {
        let initial = self.config.initial_level();
        self.write_output(self.config.pins.up_output, initial);
        self.write_output(self.config.pins.down_output, initial);
        self.energized_pin = None;
        self.release.cancel();
        self.completion.cancel();
        self.position_tick.cancel();
    }

    fn energize(&mut self, pin: u8, hold_ms: u32, now_ms: u64) {
        self.write_output(pin, self.config.active_level());
        self.energized_pin = Some(pin);
        self.release.arm(now_ms, hold_ms);
    }

    /// Move the estimate one step towards the target
    ///
    /// Returns false once the target is reached.
    fn step_position(&mut self) -> bool {
        let next = match self.current_position.cmp(&self.target_position) {
            core::cmp::Ordering::Less => self.current_position + 1,
            core::cmp::Ordering::Greater => self.current_position - 1,
            core::cmp::Ordering::Equal => {
                self.position_tick.cancel();
                return false;
            }
        };
        self.update_position(next);
        if next == self.target_position {
            self.position_tick.cancel();
        }
        true
    }

    fn complete_motion(&mut self) {
        self.change_state(MotionEvent::Complete);
        self.position_tick.cancel();
        // Tick count and travel duration round differently
        if self.current_position != self.target_position {
            self.update_position(self.target_position);
        }
    }

    fn poll_inputs(&mut self, now_ms: u64) {
        for direction in [Direction::Up, Direction::Down] {
            let pin = self.input(direction).pin();
            let level = match self.gpio.digital_read(pin) {
                Ok(level) => level,
                Err(_) => {
                    self.publish(BlindEvent::InputReadFailed { pin });
                    continue;
                }
            };
            if self.input_mut(direction).sample(level) == Some(Edge::Pressed) {
                self.manual_press(direction, now_ms);
            }
        }
    }

    /// Run a full travel in `direction` unless already heading that way
    fn manual_press(&mut self, direction: Direction, now_ms: u64) {
        let accepted = self.position_state.direction() != Some(direction);
        self.publish(BlindEvent::ManualPress {
            direction,
            accepted,
        });
        if accepted {
            self.command(direction.full_travel_target(), now_ms);
        }
    }

    fn input(&self, direction: Direction) -> &DebouncedInput {
        match direction {
            Direction::Up => &self.up_input,
            Direction::Down => &self.down_input,
        }
    }

    fn input_mut(&mut self, direction: Direction) -> &mut DebouncedInput {
        match direction {
            Direction::Up => &mut self.up_input,
            Direction::Down => &mut self.down_input,
        }
    }

    fn output_pin(&self, direction: Direction) -> u8 {
        match direction {
            Direction::Up => self.config.pins.up_output,
            Direction::Down => self.config.pins.down_output,
        }
    }

    fn write_output(&mut self, pin: u8, level: Level) {
        if self.gpio.digital_write(pin, level).is_err() {
            self.publish(BlindEvent::OutputWriteFailed { pin });
        }
    }

    fn set_target(&mut self, position: u8) {
        if self.target_position != position {
            self.target_position = position;
            self.publish(BlindEvent::TargetPositionChanged(position));
        }
    }

    fn update_position(&mut self, position: u8) {
        self.current_position = position;
        if self
            .store
            .set(self.config.name.as_str(), position)
            .is_err()
        {
            self.publish(BlindEvent::StoreFailed);
        }
        self.publish(BlindEvent::CurrentPositionChanged(position));
    }

    fn change_state(&mut self, event: MotionEvent) {
        let next = self.position_state.transition(event);
        if next != self.position_state {
            self.position_state = next;
            self.publish(BlindEvent::PositionStateChanged(next));
        }
    }

    fn publish(&mut self, event: BlindEvent) {
        if let Err(event) = self.events.push_back(event) {
            self.events.pop_front();
            let _ = self.events.push_back(event);
        }
    }
}
