//! Bridge UART receive task
//!
//! Receives frames from the accessory bridge. Heartbeats and accessory
//! information are answered here; everything else goes to the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use portable_atomic::Ordering;

use ioblinds_protocol::{BridgeRequest, ControllerMessage, ErrorCode, FrameParser};

use crate::channels::{BRIDGE_REQUESTS, LINK_ERRORS, LINK_OUT};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Reported in `Info` replies
pub const MANUFACTURER: &str = "Smart Panda";
pub const MODEL: &str = "BC1";
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bridge RX task - receives and parses frames from the bridge
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match BridgeRequest::from_frame(&frame) {
                            Ok(request) => dispatch(request).await,
                            Err(e) => {
                                warn!("Bad bridge request: {:?}", e);
                                reply(ControllerMessage::Error(ErrorCode::for_frame_error(e)))
                                    .await;
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            let count = LINK_ERRORS.fetch_add(1, Ordering::Relaxed) + 1;
                            warn!("Frame parse error: {:?} ({} total)", e, count);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

async fn dispatch(request: BridgeRequest) {
    match request {
        BridgeRequest::Ping => {
            trace!("PING received");
            reply(ControllerMessage::Pong).await;
        }
        BridgeRequest::GetInfo => {
            reply(ControllerMessage::Info {
                manufacturer: MANUFACTURER,
                model: MODEL,
                version: FIRMWARE_VERSION,
            })
            .await;
        }
        request => {
            if BRIDGE_REQUESTS.try_send(request).is_err() {
                warn!("Request queue full, dropping {:?}", request);
                reply(ControllerMessage::Error(ErrorCode::Busy)).await;
            }
        }
    }
}

async fn reply(message: ControllerMessage<'static>) {
    LINK_OUT.send(message).await;
}
