use std::fmt;

use derive_more::From;

use crate::encoding::{self, Cursor};
use crate::errors::OscError;
use crate::timetag::Timetag;

/// A single OSC argument.
///
/// The set is closed: these cases map one-to-one onto the OSC type tag
/// characters `i h f d s b T F N t`. Because `Message::append` takes
/// `impl Into<Argument>`, only values of these types can ever enter a
/// message.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Argument {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Blob(Vec<u8>),
    Bool(bool),
    #[from(ignore)]
    Nil,
    Time(Timetag),
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::String(s.to_string())
    }
}

impl Argument {
    /// The OSC type tag character for this argument.
    pub fn type_tag(&self) -> char {
        match self {
            Argument::Int(_) => 'i',
            Argument::Long(_) => 'h',
            Argument::Float(_) => 'f',
            Argument::Double(_) => 'd',
            Argument::String(_) => 's',
            Argument::Blob(_) => 'b',
            Argument::Bool(true) => 'T',
            Argument::Bool(false) => 'F',
            Argument::Nil => 'N',
            Argument::Time(_) => 't',
        }
    }
}

/// A single OSC message: an address plus an ordered argument list.
///
/// The address of an outgoing or decoded message is unrestricted; only
/// *registration* addresses handed to the dispatcher are barred from using
/// pattern metacharacters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    pub address: String,
    pub arguments: Vec<Argument>,
}

impl Message {
    pub fn new(address: &str) -> Self {
        Message {
            address: address.to_string(),
            arguments: Vec::new(),
        }
    }

    /// Append one argument. Any value convertible into [`Argument`] is
    /// accepted; anything else is a compile error.
    pub fn append(&mut self, arg: impl Into<Argument>) {
        self.arguments.push(arg.into());
    }

    /// The comma-prefixed type tag string describing the argument list.
    /// A message without arguments yields `","`.
    pub fn type_tags(&self) -> String {
        let mut tags = String::with_capacity(self.arguments.len() + 1);
        tags.push(',');
        for arg in &self.arguments {
            tags.push(arg.type_tag());
        }
        tags
    }

    /// Treat this message's own address as a pattern and match it against
    /// `addr`. Only meaningful for messages deliberately constructed with
    /// pattern syntax; the dispatcher matches the other way around
    /// (registered patterns against a literal message address).
    pub fn matches(&self, addr: &str) -> Result<bool, OscError> {
        let re = crate::dispatcher::pattern_to_regex(&self.address)?;
        Ok(re.is_match(addr))
    }

    /// Serialize to wire bytes: padded address, padded type tag string, then
    /// each argument's payload. `T`, `F` and `N` arguments contribute no
    /// payload bytes; they live entirely in the tag string.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encoding::write_padded_string(&self.address, &mut out);
        encoding::write_padded_string(&self.type_tags(), &mut out);
        for arg in &self.arguments {
            match arg {
                Argument::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::String(v) => {
                    encoding::write_padded_string(v, &mut out);
                }
                Argument::Blob(v) => {
                    encoding::write_blob(v, &mut out);
                }
                Argument::Bool(_) | Argument::Nil => {}
                Argument::Time(t) => out.extend_from_slice(&t.to_be_bytes()),
            }
        }
        out
    }

    pub(crate) fn decode(cur: &mut Cursor) -> Result<Message, OscError> {
        let (address, _) = encoding::read_padded_string(cur)?;
        let mut msg = Message::new(&address);

        let (tags, _) = encoding::read_padded_string(cur)?;
        // An empty tag string is tolerated as "no arguments".
        if tags.is_empty() {
            return Ok(msg);
        }
        let mut chars = tags.chars();
        if chars.next() != Some(',') {
            return Err(OscError::MalformedTypeTags(tags));
        }
        for tag in chars {
            let arg = match tag {
                'i' => Argument::Int(cur.read_i32()?),
                'h' => Argument::Long(cur.read_i64()?),
                'f' => Argument::Float(cur.read_f32()?),
                'd' => Argument::Double(cur.read_f64()?),
                's' => Argument::String(encoding::read_padded_string(cur)?.0),
                'b' => Argument::Blob(encoding::read_blob(cur)?.0),
                't' => Argument::Time(Timetag::from_raw(cur.read_u64()?)),
                'T' => Argument::Bool(true),
                'F' => Argument::Bool(false),
                'N' => Argument::Nil,
                other => return Err(OscError::UnsupportedTypeTag(other)),
            };
            msg.arguments.push(arg);
        }
        Ok(msg)
    }

    pub fn int32(&self, i: usize) -> Option<i32> {
        match self.arguments.get(i) {
            Some(Argument::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn int64(&self, i: usize) -> Option<i64> {
        match self.arguments.get(i) {
            Some(Argument::Long(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float32(&self, i: usize) -> Option<f32> {
        match self.arguments.get(i) {
            Some(Argument::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float64(&self, i: usize) -> Option<f64> {
        match self.arguments.get(i) {
            Some(Argument::Double(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn string(&self, i: usize) -> Option<&str> {
        match self.arguments.get(i) {
            Some(Argument::String(v)) => Some(v),
            _ => None,
        }
    }

    pub fn blob(&self, i: usize) -> Option<&[u8]> {
        match self.arguments.get(i) {
            Some(Argument::Blob(v)) => Some(v),
            _ => None,
        }
    }

    pub fn bool(&self, i: usize) -> Option<bool> {
        match self.arguments.get(i) {
            Some(Argument::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn timetag(&self, i: usize) -> Option<Timetag> {
        match self.arguments.get(i) {
            Some(Argument::Time(v)) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.type_tags())?;
        for arg in &self.arguments {
            match arg {
                Argument::Int(v) => write!(f, " {v}")?,
                Argument::Long(v) => write!(f, " {v}")?,
                Argument::Float(v) => write!(f, " {v}")?,
                Argument::Double(v) => write!(f, " {v}")?,
                Argument::String(v) => write!(f, " {v:?}")?,
                Argument::Blob(v) => write!(f, " {v:?}")?,
                Argument::Bool(v) => write!(f, " {v}")?,
                Argument::Nil => write!(f, " Nil")?,
                Argument::Time(t) => write!(f, " {}", t.raw())?,
            }
        }
        Ok(())
    }
}
