use crate::encoding::{self, Cursor};
use crate::errors::OscError;
use crate::message::Message;
use crate::packet::Packet;
use crate::timetag::Timetag;

/// The literal string opening every bundle on the wire.
pub(crate) const BUNDLE_TAG: &str = "#bundle";

/// An OSC bundle: a time tag plus child messages and nested bundles.
///
/// Children are stored in two parallel lists. On the wire messages are
/// written before nested bundles, so an interleaved wire order across the
/// two kinds is not reconstructible after a decode; order *within* each kind
/// is preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    pub timetag: Timetag,
    pub messages: Vec<Message>,
    pub bundles: Vec<Bundle>,
}

impl Bundle {
    pub fn new(timetag: Timetag) -> Self {
        Bundle {
            timetag,
            messages: Vec::new(),
            bundles: Vec::new(),
        }
    }

    /// Add a child packet to the list matching its kind.
    pub fn append(&mut self, packet: impl Into<Packet>) {
        match packet.into() {
            Packet::Message(m) => self.messages.push(m),
            Packet::Bundle(b) => self.bundles.push(b),
        }
    }

    /// Serialize: padded `#bundle` tag, 8-byte time tag, then every child as
    /// a 4-byte big-endian length prefix followed by the child's own bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encoding::write_padded_string(BUNDLE_TAG, &mut out);
        out.extend_from_slice(&self.timetag.to_be_bytes());
        for msg in &self.messages {
            let bytes = msg.to_bytes();
            out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
            out.extend_from_slice(&bytes);
        }
        for bundle in &self.bundles {
            let bytes = bundle.to_bytes();
            out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
            out.extend_from_slice(&bytes);
        }
        out
    }

    pub(crate) fn decode(cur: &mut Cursor) -> Result<Bundle, OscError> {
        let (tag, _) = encoding::read_padded_string(cur)?;
        if tag != BUNDLE_TAG {
            return Err(OscError::InvalidBundleTag(tag));
        }
        let timetag = Timetag::from_raw(cur.read_u64()?);
        let mut bundle = Bundle::new(timetag);

        // A datagram transport may pad the tail of a packet with zeros; a
        // zero length prefix marks the end of the real content, and a tail
        // shorter than one length prefix is ignored outright.
        while cur.remaining() >= 4 {
            let length = cur.read_i32()?;
            if length == 0 {
                break;
            }
            if length < 0 {
                return Err(OscError::InvalidElementLength(length));
            }
            // Each child decodes from its own length-prefixed frame, so a
            // nested bundle cannot run past its end and swallow siblings.
            let frame = cur.read_exact(length as usize)?;
            bundle.append(Packet::decode(frame)?);
        }
        Ok(bundle)
    }
}
