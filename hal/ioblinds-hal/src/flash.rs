//! Flash storage abstractions
//!
//! Provides traits for persistent key-value storage that can be implemented
//! by chip-specific HALs using their flash memory.

use heapless::String;

/// Maximum blind name length in bytes
pub const MAX_NAME_LEN: usize = 24;

/// Blind name, used as the persistence key for its position
pub type BlindName = String<MAX_NAME_LEN>;

const TAG_CONFIG_TOML: u8 = 0;
const TAG_POSITION: u8 = 1;

/// Storage keys for persisted data
///
/// The actual storage implementation handles wear leveling and
/// data integrity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageKey {
    /// Blind configuration as TOML text, overrides the embedded default
    ConfigToml,
    /// Last known position of the named blind
    Position(BlindName),
}

impl StorageKey {
    /// Key for the position of the named blind
    ///
    /// Returns `None` if the name does not fit in [`MAX_NAME_LEN`] bytes.
    pub fn position(name: &str) -> Option<Self> {
        let mut key = BlindName::new();
        key.push_str(name).ok()?;
        Some(StorageKey::Position(key))
    }

    /// Encode the key into `buffer`, returning the number of bytes used
    pub fn encode(&self, buffer: &mut [u8]) -> Option<usize> {
        match self {
            StorageKey::ConfigToml => {
                *buffer.first_mut()? = TAG_CONFIG_TOML;
                Some(1)
            }
            StorageKey::Position(name) => {
                let bytes = name.as_bytes();
                let len = 2 + bytes.len();
                if buffer.len() < len {
                    return None;
                }
                buffer[0] = TAG_POSITION;
                buffer[1] = bytes.len() as u8;
                buffer[2..len].copy_from_slice(bytes);
                Some(len)
            }
        }
    }

    /// Decode a key from the front of `buffer`
    ///
    /// Returns the key and the number of bytes consumed.
    pub fn decode(buffer: &[u8]) -> Option<(Self, usize)> {
        match *buffer.first()? {
            TAG_CONFIG_TOML => Some((StorageKey::ConfigToml, 1)),
            TAG_POSITION => {
                let len = *buffer.get(1)? as usize;
                let bytes = buffer.get(2..2 + len)?;
                let name = core::str::from_utf8(bytes).ok()?;
                let key = Self::position(name)?;
                Some((key, 2 + len))
            }
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Flash storage trait
///
/// Provides wear-leveled key-value storage. Implementations should handle:
/// - Wear leveling across flash sectors
/// - Data integrity (CRC or similar)
/// - Atomic writes where possible
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn read(
        &mut self,
        key: &StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Write a value by key
    fn write(
        &mut self,
        key: &StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Erase all stored data
    ///
    /// This erases every stored position and the config override.
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        self.encode(buffer)
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        StorageKey::decode(buffer).ok_or(sequential_storage::map::SerializationError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_key_encoding() {
        let key = StorageKey::position("Living room").unwrap();
        let mut buffer = [0u8; 32];
        let len = key.encode(&mut buffer).unwrap();

        assert_eq!(len, 13);
        assert_eq!(buffer[0], TAG_POSITION);
        assert_eq!(buffer[1], 11);
        assert_eq!(&buffer[2..13], b"Living room");

        let (decoded, used) = StorageKey::decode(&buffer[..len]).unwrap();
        assert_eq!(decoded, key);
        assert_eq!(used, len);
    }

    #[test]
    fn test_config_key_is_single_byte() {
        let mut buffer = [0xFFu8; 4];
        assert_eq!(StorageKey::ConfigToml.encode(&mut buffer), Some(1));
        assert_eq!(buffer[0], TAG_CONFIG_TOML);
    }

    #[test]
    fn test_name_too_long() {
        let name = "a blind name that is far too long to store";
        assert!(StorageKey::position(name).is_none());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let key = StorageKey::position("Office").unwrap();
        let mut buffer = [0u8; 4];
        assert!(key.encode(&mut buffer).is_none());
    }

    #[test]
    fn test_decode_truncated() {
        assert!(StorageKey::decode(&[TAG_POSITION, 5, b'a']).is_none());
        assert!(StorageKey::decode(&[0x7F]).is_none());
        assert!(StorageKey::decode(&[]).is_none());
    }
}
