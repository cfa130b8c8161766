//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

use ioblinds_protocol::{BridgeRequest, ControllerMessage};

/// Channel capacity for bridge requests
const REQUEST_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outgoing link messages
const LINK_OUT_CHANNEL_SIZE: usize = 16;

/// Requests from the bridge that need the controller
pub static BRIDGE_REQUESTS: Channel<CriticalSectionRawMutex, BridgeRequest, REQUEST_CHANNEL_SIZE> =
    Channel::new();

/// Replies and notifications waiting to be sent to the bridge
pub static LINK_OUT: Channel<
    CriticalSectionRawMutex,
    ControllerMessage<'static>,
    LINK_OUT_CHANNEL_SIZE,
> = Channel::new();

/// Latest position to write to flash (older values are overwritten)
pub static PERSIST_POSITION: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Frames dropped on the bridge link (bad CRC, bad length)
pub static LINK_ERRORS: AtomicU32 = AtomicU32::new(0);
