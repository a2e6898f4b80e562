//! Chat Boundary
//!
//! Everything that touches the outside world: message types, the transport
//! seam and the bot entry points. Game logic lives in `game/`.

pub mod protocol;
pub mod transport;
pub mod bot;

pub use protocol::{OutgoingMessage, IncomingMessage};
pub use transport::{ChatTransport, ChannelTransport, TransportError};
pub use bot::{MathMasterBot, Outcome, FAILURE_MESSAGE};
