use derive_more::From;

use crate::bundle::Bundle;
use crate::encoding::Cursor;
use crate::errors::OscError;
use crate::message::Message;

/// The unit exchanged over the transport: a single message or a time-tagged
/// bundle. The type is closed; no third packet kind exists on the wire.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Packet {
    Message(Message),
    Bundle(Bundle),
}

impl Packet {
    /// Decode one received datagram.
    pub fn decode(data: &[u8]) -> Result<Packet, OscError> {
        let mut cur = Cursor::new(data);
        Packet::decode_from(&mut cur)
    }

    /// Sniff the leading byte without consuming it: `/` opens a message,
    /// `#` opens a bundle, anything else is not OSC.
    pub(crate) fn decode_from(cur: &mut Cursor) -> Result<Packet, OscError> {
        match cur.peek()? {
            b'/' => Ok(Packet::Message(Message::decode(cur)?)),
            b'#' => Ok(Packet::Bundle(Bundle::decode(cur)?)),
            _ => Err(OscError::InvalidPacket),
        }
    }

    /// Serialize to wire bytes, ready to send as one datagram.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Packet::Message(m) => m.to_bytes(),
            Packet::Bundle(b) => b.to_bytes(),
        }
    }
}
