//! Position persistence
//!
//! Each blind's position is stored as a postcard-encoded record under its
//! name. The record carries a format version so a layout change reads as
//! "no position" instead of garbage.

use defmt::*;
use serde::{Deserialize, Serialize};

use ioblinds_hal::BlindName;
use ioblinds_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
use ioblinds_hal_rp2040::FlashStorageTrait;

/// Current record layout
const RECORD_VERSION: u8 = 1;

/// Maximum serialized record size
const MAX_RECORD_SIZE: usize = 8;

/// Position persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Flash operation failed
    Flash(FlashError),
    /// Name does not fit a storage key
    InvalidKey,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Record written by another firmware layout
    VersionMismatch,
}

impl From<FlashError> for PersistError {
    fn from(e: FlashError) -> Self {
        PersistError::Flash(e)
    }
}

/// Stored position of one blind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PositionRecord {
    version: u8,
    position: u8,
}

fn key_for(name: &BlindName) -> Result<StorageKey, PersistError> {
    StorageKey::position(name.as_str()).ok_or(PersistError::InvalidKey)
}

/// Load the stored position of `name`
///
/// `Ok(None)` means nothing was ever stored. Range checking is left to the
/// controller.
pub async fn load_position(
    storage: &mut FlashStorage<'_>,
    name: &BlindName,
) -> Result<Option<u8>, PersistError> {
    let key = key_for(name)?;
    let mut buffer = [0u8; MAX_RECORD_SIZE];

    let len = match storage.read(&key, &mut buffer).await {
        Ok(len) => len,
        Err(FlashError::NotFound) => {
            debug!("No stored position for {}", name.as_str());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let record: PositionRecord =
        postcard::from_bytes(&buffer[..len]).map_err(|_| PersistError::Deserialize)?;
    if record.version != RECORD_VERSION {
        return Err(PersistError::VersionMismatch);
    }

    info!("Restored position {} for {}", record.position, name.as_str());
    Ok(Some(record.position))
}

/// Store `position` for `name`
pub async fn save_position(
    storage: &mut FlashStorage<'_>,
    name: &BlindName,
    position: u8,
) -> Result<(), PersistError> {
    let key = key_for(name)?;
    let record = PositionRecord {
        version: RECORD_VERSION,
        position,
    };

    let mut buffer = [0u8; MAX_RECORD_SIZE];
    let bytes = postcard::to_slice(&record, &mut buffer).map_err(|_| PersistError::Serialize)?;

    storage.write(&key, bytes).await?;
    trace!("Saved position {}", position);
    Ok(())
}
