//! Position persistence task
//!
//! Writes the latest position to flash. Positions arriving while a travel
//! is underway are coalesced, so a full travel costs a handful of flash
//! writes instead of a hundred.

use defmt::*;
use embassy_time::Timer;

use ioblinds_hal::BlindName;
use ioblinds_hal_rp2040::flash::FlashStorage;

use crate::channels::PERSIST_POSITION;
use crate::config::save_position;

/// Quiet time before a position is written (ms)
const SETTLE_MS: u64 = 500;

/// Persist task - owns the flash storage after boot
#[embassy_executor::task]
pub async fn persist_task(mut storage: FlashStorage<'static>, name: BlindName) {
    info!("Persist task started");

    loop {
        let mut position = PERSIST_POSITION.wait().await;

        // Let a running travel move on before touching flash
        Timer::after_millis(SETTLE_MS).await;
        if let Some(latest) = PERSIST_POSITION.try_take() {
            position = latest;
        }

        if let Err(e) = save_position(&mut storage, &name, position).await {
            warn!("Failed to persist position {}: {:?}", position, e);
        }
    }
}
