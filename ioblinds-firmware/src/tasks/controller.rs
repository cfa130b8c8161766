//! Blind controller task
//!
//! Owns the controller. Sleeps until either a bridge request arrives or the
//! controller's next timer is due, then forwards whatever the controller
//! published to the bridge.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use ioblinds_core::state::BlindEvent;
use ioblinds_core::{BlindController, CommandError};
use ioblinds_drivers::expander::Mcp23017;
use ioblinds_protocol::{BridgeRequest, ControllerMessage, ErrorCode};

use crate::board::BoardI2c;
use crate::channels::{BRIDGE_REQUESTS, LINK_OUT};
use crate::store::LinkedStore;

/// The controller as wired on this board
pub type Blind = BlindController<Mcp23017<BoardI2c>, LinkedStore>;

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut blind: Blind) {
    info!("Controller task started");

    let verbose = blind.config().expander.debug;
    // Drain anything published during setup (stored position problems)
    forward_events(&mut blind, verbose);

    loop {
        let deadline = Instant::from_millis(blind.next_deadline_ms());

        match select(BRIDGE_REQUESTS.receive(), Timer::at(deadline)).await {
            Either::First(request) => handle_request(&mut blind, request),
            Either::Second(()) => blind.poll(now_ms()),
        }

        forward_events(&mut blind, verbose);
    }
}

fn handle_request(blind: &mut Blind, request: BridgeRequest) {
    debug!("Bridge request: {:?}", request);

    let reply = match request {
        BridgeRequest::GetPositionState => {
            ControllerMessage::PositionState(blind.position_state().as_u8())
        }
        BridgeRequest::GetCurrentPosition => {
            ControllerMessage::CurrentPosition(blind.current_position())
        }
        BridgeRequest::GetTargetPosition => ControllerMessage::TargetPosition(blind.target_position()),
        BridgeRequest::SetTargetPosition(position) => {
            match blind.set_target_position(position, now_ms()) {
                Ok(()) => ControllerMessage::Ack(request.msg_type()),
                Err(CommandError::OutOfRange(p)) => {
                    warn!("Rejected target position {}", p);
                    ControllerMessage::Error(ErrorCode::OutOfRange)
                }
            }
        }
        BridgeRequest::HoldPosition => {
            blind.hold_position();
            ControllerMessage::Ack(request.msg_type())
        }
        // Answered by the link task
        BridgeRequest::GetInfo | BridgeRequest::Ping => return,
    };

    send(reply);
}

/// Log every published event and push state changes to the bridge
fn forward_events(blind: &mut Blind, verbose: bool) {
    while let Some(event) = blind.pop_event() {
        if event.is_fault() {
            warn!("Blind fault: {:?}", event);
        } else if verbose {
            info!("Blind event: {:?}", event);
        } else {
            debug!("Blind event: {:?}", event);
        }

        let notification = match event {
            BlindEvent::PositionStateChanged(state) => {
                ControllerMessage::PositionState(state.as_u8())
            }
            BlindEvent::CurrentPositionChanged(position) => {
                ControllerMessage::CurrentPosition(position)
            }
            BlindEvent::TargetPositionChanged(position) => {
                ControllerMessage::TargetPosition(position)
            }
            _ => continue,
        };
        send(notification);
    }
}

fn send(message: ControllerMessage<'static>) {
    // Never stall motion timing on a congested link
    if LINK_OUT.try_send(message).is_err() {
        warn!("Link queue full, dropping {:?}", message);
    }
}
