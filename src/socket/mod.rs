//! Streaming channel between the client and the interview service.
//!
//! One socket per session. The transport parses inbound JSON frames into
//! typed [`ServerEvent`]s and hands them to the session over an ordered
//! channel; outbound traffic is the operator's turns plus the distinguished
//! end frame.

pub mod messages;
pub mod transport;

pub use messages::{ServerEvent, TurnMessage};
pub use transport::{SocketTransport, WebSocketTransport};
