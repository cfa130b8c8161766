//! Controller-facing position store
//!
//! The controller persists synchronously on every 1% step, but flash
//! writes are async and slow. `LinkedStore` answers reads from the value
//! loaded at boot and hands writes to the persist task through
//! `PERSIST_POSITION`.

use ioblinds_hal::PositionStore;

use crate::channels::PERSIST_POSITION;
use crate::config::PersistError;

/// Position store for the single blind this firmware drives
pub struct LinkedStore {
    loaded: Result<Option<u8>, PersistError>,
}

impl LinkedStore {
    /// Wrap the result of the boot-time flash read
    pub fn new(loaded: Result<Option<u8>, PersistError>) -> Self {
        Self { loaded }
    }
}

impl PositionStore for LinkedStore {
    type Error = PersistError;

    fn get(&mut self, _key: &str) -> Result<Option<u8>, PersistError> {
        self.loaded
    }

    fn set(&mut self, _key: &str, position: u8) -> Result<(), PersistError> {
        self.loaded = Ok(Some(position));
        PERSIST_POSITION.signal(position);
        Ok(())
    }
}
