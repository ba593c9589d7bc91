//! Byte-level primitives shared by the message and bundle codecs.
//!
//! Every element on the wire is aligned to 4 bytes: strings carry a null
//! terminator plus zero padding, blobs carry a big-endian length prefix plus
//! zero padding. Multi-byte values are big-endian throughout.

use crate::errors::OscError;

/// Number of zero bytes needed to round `len` up to the next multiple of 4.
/// Zero for lengths already aligned (including zero itself).
pub fn pad_bytes_needed(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

/// Bounded reader over one datagram's bytes.
///
/// Keeps a consumed-byte count so the bundle codec can tell how much of its
/// frame remains while message and bundle decoding recurse into each other.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&self) -> Result<u8, OscError> {
        self.data.get(self.pos).copied().ok_or(OscError::UnexpectedEof)
    }

    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], OscError> {
        if self.remaining() < n {
            return Err(OscError::UnexpectedEof);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume bytes up to and including the next null terminator.
    fn read_until_null(&mut self) -> Result<&'a [u8], OscError> {
        let rest = &self.data[self.pos..];
        let null_pos = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(OscError::UnexpectedEof)?;
        self.pos += null_pos + 1;
        Ok(&rest[..=null_pos])
    }

    pub fn read_i32(&mut self) -> Result<i32, OscError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, OscError> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, OscError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, OscError> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, OscError> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OscError> {
        let bytes = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

/// Write `s` as an OSC string: bytes, one null terminator, zero padding to
/// the next 4-byte boundary. `s` is truncated at its first embedded null.
/// Returns the number of bytes written (a multiple of 4, at least 4).
pub fn write_padded_string(s: &str, out: &mut Vec<u8>) -> usize {
    let bytes = match s.as_bytes().iter().position(|&b| b == 0) {
        Some(i) => &s.as_bytes()[..i],
        None => s.as_bytes(),
    };
    out.extend_from_slice(bytes);
    out.push(0);
    let written = bytes.len() + 1;
    let pad = pad_bytes_needed(written);
    out.resize(out.len() + pad, 0);
    written + pad
}

/// Read an OSC string: bytes up to the null terminator, then discard the
/// padding that rounds the element up to a 4-byte boundary. Padding content
/// is not validated. Returns the string and the total bytes consumed.
pub fn read_padded_string(cur: &mut Cursor) -> Result<(String, usize), OscError> {
    let raw = cur.read_until_null()?;
    let pad = pad_bytes_needed(raw.len());
    if pad > 0 {
        cur.read_exact(pad)?;
    }
    let s = String::from_utf8_lossy(&raw[..raw.len() - 1]).into_owned();
    Ok((s, raw.len() + pad))
}

/// Write `data` as an OSC blob: 4-byte big-endian length, the raw bytes,
/// zero padding to the next 4-byte boundary. Returns total bytes written.
pub fn write_blob(data: &[u8], out: &mut Vec<u8>) -> usize {
    out.extend_from_slice(&(data.len() as i32).to_be_bytes());
    out.extend_from_slice(data);
    let pad = pad_bytes_needed(data.len());
    out.resize(out.len() + pad, 0);
    4 + data.len() + pad
}

/// Read an OSC blob. Fails if the length prefix is negative or claims more
/// bytes than remain unread. Returns the blob and the total bytes consumed
/// (length prefix + data + padding).
pub fn read_blob(cur: &mut Cursor) -> Result<(Vec<u8>, usize), OscError> {
    let len = cur.read_i32()?;
    if len < 0 || len as usize > cur.remaining() {
        return Err(OscError::InvalidBlobLength(len));
    }
    let data = cur.read_exact(len as usize)?.to_vec();
    let pad = pad_bytes_needed(data.len());
    if pad > 0 {
        cur.read_exact(pad)?;
    }
    Ok((data, 4 + len as usize + pad))
}
