//! Bridge UART transmit task
//!
//! Encodes replies and change notifications and writes them to the bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use ioblinds_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::LINK_OUT;

/// Bridge TX task - sends frames to the bridge in queue order
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let message = LINK_OUT.receive().await;

        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode {:?}: {:?}", message, e);
                continue;
            }
        };

        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send frame: {:?}", e);
                } else {
                    trace!("TX: {:?}", message);
                }
            }
            Err(e) => warn!("Failed to encode frame: {:?}", e),
        }
    }
}
