//! Message types for the bridge link
//!
//! Message types are divided into two categories:
//! - Bridge → Controller: characteristic reads and writes, heartbeat
//! - Controller → Bridge: replies, unsolicited change notifications
//!
//! Position states use the accessory framework's encoding:
//! 0 = decreasing, 1 = increasing, 2 = stopped.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Message type IDs: Bridge → Controller
pub const MSG_GET_POSITION_STATE: u8 = 0x01;
pub const MSG_GET_CURRENT_POSITION: u8 = 0x02;
pub const MSG_GET_TARGET_POSITION: u8 = 0x03;
pub const MSG_SET_TARGET_POSITION: u8 = 0x04;
pub const MSG_HOLD_POSITION: u8 = 0x05;
pub const MSG_GET_INFO: u8 = 0x06;
pub const MSG_PING: u8 = 0x07;

// Message type IDs: Controller → Bridge
pub const MSG_POSITION_STATE: u8 = 0x20;
pub const MSG_CURRENT_POSITION: u8 = 0x21;
pub const MSG_TARGET_POSITION: u8 = 0x22;
pub const MSG_ACK: u8 = 0x23;
pub const MSG_PONG: u8 = 0x24;
pub const MSG_INFO: u8 = 0x25;
pub const MSG_ERROR: u8 = 0x2E;

/// Longest accessory information string sent in an `Info` reply
pub const MAX_INFO_LEN: usize = 20;

/// Error codes carried by `MSG_ERROR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// Target position above 100
    OutOfRange = 0x01,
    /// Message type not understood
    UnknownRequest = 0x02,
    /// Known message type with a bad payload
    MalformedRequest = 0x03,
    /// Controller could not take the request right now
    Busy = 0x04,
}

impl ErrorCode {
    /// Decode from the wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(ErrorCode::OutOfRange),
            0x02 => Some(ErrorCode::UnknownRequest),
            0x03 => Some(ErrorCode::MalformedRequest),
            0x04 => Some(ErrorCode::Busy),
            _ => None,
        }
    }

    /// Error code to report for a frame that failed to decode
    pub fn for_frame_error(error: FrameError) -> Self {
        match error {
            FrameError::UnknownType(_) => ErrorCode::UnknownRequest,
            _ => ErrorCode::MalformedRequest,
        }
    }
}

/// Requests parsed from bridge-originated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeRequest {
    GetPositionState,
    GetCurrentPosition,
    GetTargetPosition,
    /// Move to a position (0-100)
    SetTargetPosition(u8),
    /// Stop where the blind is
    HoldPosition,
    /// Manufacturer, model and firmware version
    GetInfo,
    /// Heartbeat request
    Ping,
}

impl BridgeRequest {
    /// Wire message type of this request
    pub fn msg_type(&self) -> u8 {
        match self {
            BridgeRequest::GetPositionState => MSG_GET_POSITION_STATE,
            BridgeRequest::GetCurrentPosition => MSG_GET_CURRENT_POSITION,
            BridgeRequest::GetTargetPosition => MSG_GET_TARGET_POSITION,
            BridgeRequest::SetTargetPosition(_) => MSG_SET_TARGET_POSITION,
            BridgeRequest::HoldPosition => MSG_HOLD_POSITION,
            BridgeRequest::GetInfo => MSG_GET_INFO,
            BridgeRequest::Ping => MSG_PING,
        }
    }

    /// Parse a request from a frame
    ///
    /// The position byte of `SetTargetPosition` is passed through as-is;
    /// range checking belongs to the controller.
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let request = match frame.msg_type {
            MSG_GET_POSITION_STATE => BridgeRequest::GetPositionState,
            MSG_GET_CURRENT_POSITION => BridgeRequest::GetCurrentPosition,
            MSG_GET_TARGET_POSITION => BridgeRequest::GetTargetPosition,
            MSG_SET_TARGET_POSITION => {
                return match frame.payload.as_slice() {
                    [position] => Ok(BridgeRequest::SetTargetPosition(*position)),
                    _ => Err(FrameError::InvalidFrame),
                };
            }
            MSG_HOLD_POSITION => BridgeRequest::HoldPosition,
            MSG_GET_INFO => BridgeRequest::GetInfo,
            MSG_PING => BridgeRequest::Ping,
            other => return Err(FrameError::UnknownType(other)),
        };

        if !frame.payload.is_empty() {
            return Err(FrameError::InvalidFrame);
        }
        Ok(request)
    }

    /// Encode this request into a frame (bridge side, or for testing)
    pub fn to_frame(&self) -> Frame {
        match self {
            BridgeRequest::SetTargetPosition(position) => Frame {
                msg_type: MSG_SET_TARGET_POSITION,
                payload: Vec::from_iter([*position]),
            },
            other => Frame::empty(other.msg_type()),
        }
    }
}

/// Messages from the controller to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerMessage<'a> {
    /// Motion state (0 decreasing, 1 increasing, 2 stopped)
    PositionState(u8),
    /// Estimated position
    CurrentPosition(u8),
    /// Commanded position
    TargetPosition(u8),
    /// Request of the given type was accepted
    Ack(u8),
    /// Heartbeat response
    Pong,
    /// Accessory information
    Info {
        manufacturer: &'a str,
        model: &'a str,
        version: &'a str,
    },
    /// Request failed
    Error(ErrorCode),
}

impl<'a> ControllerMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ControllerMessage::PositionState(state) => Frame::new(MSG_POSITION_STATE, &[*state]),
            ControllerMessage::CurrentPosition(position) => {
                Frame::new(MSG_CURRENT_POSITION, &[*position])
            }
            ControllerMessage::TargetPosition(position) => {
                Frame::new(MSG_TARGET_POSITION, &[*position])
            }
            ControllerMessage::Ack(msg_type) => Frame::new(MSG_ACK, &[*msg_type]),
            ControllerMessage::Pong => Ok(Frame::empty(MSG_PONG)),
            ControllerMessage::Info {
                manufacturer,
                model,
                version,
            } => {
                // Payload: ([len][bytes...]) x 3
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                for text in [manufacturer, model, version] {
                    let bytes = truncate(text, MAX_INFO_LEN).as_bytes();
                    payload
                        .push(bytes.len() as u8)
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                    payload
                        .extend_from_slice(bytes)
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(MSG_INFO, &payload)
            }
            ControllerMessage::Error(code) => Frame::new(MSG_ERROR, &[*code as u8]),
        }
    }

    /// Parse a message from a frame (bridge side, or for testing)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        let single = || match payload {
            [value] => Ok(*value),
            _ => Err(FrameError::InvalidFrame),
        };

        match frame.msg_type {
            MSG_POSITION_STATE => Ok(ControllerMessage::PositionState(single()?)),
            MSG_CURRENT_POSITION => Ok(ControllerMessage::CurrentPosition(single()?)),
            MSG_TARGET_POSITION => Ok(ControllerMessage::TargetPosition(single()?)),
            MSG_ACK => Ok(ControllerMessage::Ack(single()?)),
            MSG_PONG => Ok(ControllerMessage::Pong),
            MSG_INFO => {
                let (manufacturer, rest) = take_str(payload)?;
                let (model, rest) = take_str(rest)?;
                let (version, rest) = take_str(rest)?;
                if !rest.is_empty() {
                    return Err(FrameError::InvalidFrame);
                }
                Ok(ControllerMessage::Info {
                    manufacturer,
                    model,
                    version,
                })
            }
            MSG_ERROR => ErrorCode::from_u8(single()?)
                .map(ControllerMessage::Error)
                .ok_or(FrameError::InvalidFrame),
            other => Err(FrameError::UnknownType(other)),
        }
    }
}

/// Cut `text` to at most `max` bytes on a char boundary
fn truncate(text: &str, max: usize) -> &str {
    let mut len = text.len().min(max);
    while !text.is_char_boundary(len) {
        len -= 1;
    }
    &text[..len]
}

/// Split a length-prefixed string off the front of `bytes`
fn take_str(bytes: &[u8]) -> Result<(&str, &[u8]), FrameError> {
    let (&len, rest) = bytes.split_first().ok_or(FrameError::InvalidFrame)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(FrameError::InvalidFrame);
    }
    let (text, rest) = rest.split_at(len);
    let text = core::str::from_utf8(text).map_err(|_| FrameError::InvalidFrame)?;
    Ok((text, rest))
}
