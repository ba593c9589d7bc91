use std::io;

use thiserror::Error;

/// Everything that can go wrong while encoding, decoding, registering or
/// dispatching OSC packets.
#[derive(Debug, Error)]
pub enum OscError {
    /// The input ended before the current element was complete: a missing
    /// string terminator, a truncated fixed-width argument, an empty packet.
    #[error("unexpected end of packet data")]
    UnexpectedEof,

    /// A bundle did not begin with the literal `#bundle` string.
    #[error("invalid bundle start tag: {0:?}")]
    InvalidBundleTag(String),

    /// A blob's length prefix was negative or larger than the rest of the
    /// packet.
    #[error("invalid blob length {0}")]
    InvalidBlobLength(i32),

    /// A bundle element's length prefix was negative.
    #[error("invalid bundle element length {0}")]
    InvalidElementLength(i32),

    /// A non-empty type tag string did not begin with `,`.
    #[error("malformed type tag string: {0:?}")]
    MalformedTypeTags(String),

    /// A type tag character outside the supported set `i h f d s b T F N t`.
    #[error("unsupported type tag: {0:?}")]
    UnsupportedTypeTag(char),

    /// The packet's first byte was neither `/` (message) nor `#` (bundle).
    #[error("invalid OSC packet")]
    InvalidPacket,

    /// A registration address contained pattern metacharacters. Only the
    /// lone `"*"` (the default handler) may use pattern syntax.
    #[error("address {0:?} may not contain any of \"*?,[]{{}}# \"")]
    InvalidAddressCharacter(String),

    /// A handler is already registered for this exact address.
    #[error("a handler already exists for address {0:?}")]
    AddressExists(String),

    /// An address pattern did not translate into a valid regular expression,
    /// e.g. because of unbalanced `{}`.
    #[error("invalid address pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// Transport failure from the underlying socket.
    #[error(transparent)]
    Io(#[from] io::Error),
}
