//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod link_rx;
pub mod link_tx;
pub mod persist;

pub use controller::{controller_task, Blind};
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use persist::persist_task;
