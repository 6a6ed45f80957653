//! Multi-user sessions: peers, cursors, remote selections and shared graph updates.

mod protocol;
mod session;

pub use protocol::{InboundEvent, OutboundEvent};
pub use session::{run_inbound, CollabSession, Peer};
