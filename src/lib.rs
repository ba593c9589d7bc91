//! Open Sound Control for Rust: a byte-exact codec for OSC messages,
//! bundles and time tags, an address-pattern dispatcher with scheduled
//! bundle delivery, and a UDP node for moving packets around.
//!
//! Decode one datagram with [`Packet::decode`], route it with
//! [`StandardDispatcher::dispatch`], or skip the plumbing and run a
//! [`Node`] receive loop.

pub mod bundle;
pub mod dispatcher;
pub mod encoding;
pub mod errors;
pub mod message;
pub mod node;
pub mod packet;
pub mod timetag;

pub use bundle::Bundle;
pub use dispatcher::{Handler, StandardDispatcher};
pub use errors::OscError;
pub use message::{Argument, Message};
pub use node::Node;
pub use packet::Packet;
pub use timetag::Timetag;
