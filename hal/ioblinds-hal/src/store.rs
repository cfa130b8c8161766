//! Position persistence
//!
//! The controller reads the last known position once at construction and
//! writes it on every change. Both calls are synchronous; backends that sit
//! on slow media are expected to cache and write behind.

/// Synchronous key-value store for blind positions, keyed by blind name
pub trait PositionStore {
    /// Error type for backend failures
    type Error: core::fmt::Debug;

    /// Fetch the stored position for `key`, or `None` if nothing was stored
    fn get(&mut self, key: &str) -> Result<Option<u8>, Self::Error>;

    /// Store `position` under `key`
    fn set(&mut self, key: &str, position: u8) -> Result<(), Self::Error>;
}

impl<T: PositionStore + ?Sized> PositionStore for &mut T {
    type Error = T::Error;

    fn get(&mut self, key: &str) -> Result<Option<u8>, Self::Error> {
        T::get(self, key)
    }

    fn set(&mut self, key: &str, position: u8) -> Result<(), Self::Error> {
        T::set(self, key, position)
    }
}
