use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::OscError;

/// Seconds between the NTP prime epoch (1900-01-01T00:00:00Z) and the Unix
/// epoch.
pub const SECONDS_FROM_1900_TO_1970: u64 = 2_208_988_800;

/// An OSC time tag.
///
/// A 64-bit fixed-point number: the high 32 bits count seconds since
/// midnight 1900-01-01 UTC, the low 32 bits hold the fractional part of a
/// second (~232 ps resolution). This is the layout of an NTP timestamp.
///
/// The value `1` (63 zero bits followed by a one) is the reserved sentinel
/// meaning "deliver immediately" and never denotes a real clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timetag(u64);

impl Timetag {
    /// Time tag for the current wall-clock time.
    pub fn now() -> Self {
        Self::from_time(SystemTime::now())
    }

    /// Convert a wall-clock time into a time tag. The fractional word holds
    /// the raw nanosecond count of the sub-second part. Times before the
    /// Unix epoch clamp to it.
    pub fn from_time(t: SystemTime) -> Self {
        let d = t.duration_since(UNIX_EPOCH).unwrap_or_default();
        Timetag(((SECONDS_FROM_1900_TO_1970 + d.as_secs()) << 32) + u64::from(d.subsec_nanos()))
    }

    /// The "deliver immediately" sentinel.
    pub const fn immediate() -> Self {
        Timetag(1)
    }

    /// Wrap a raw 64-bit wire value.
    pub const fn from_raw(raw: u64) -> Self {
        Timetag(raw)
    }

    /// The raw 64-bit wire value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// High 32 bits: seconds since midnight 1900-01-01 UTC.
    pub const fn seconds_since_epoch(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Low 32 bits: the fractional part of a second.
    pub const fn fractional_second(self) -> u32 {
        self.0 as u32
    }

    /// The wall-clock time this tag denotes.
    pub fn to_time(self) -> SystemTime {
        let secs = self.seconds_since_epoch() as i64 - SECONDS_FROM_1900_TO_1970 as i64;
        let frac = Duration::from_nanos(u64::from(self.fractional_second()));
        if secs >= 0 {
            UNIX_EPOCH + Duration::from_secs(secs as u64) + frac
        } else {
            UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + frac
        }
    }

    /// Time remaining until this tag is due. Zero for the immediate sentinel
    /// and for tags already in the past: overdue delivery catches up
    /// instantly instead of erroring.
    pub fn expires_in(self) -> Duration {
        if self.0 <= 1 {
            return Duration::ZERO;
        }
        self.to_time()
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO)
    }

    /// The 8-byte big-endian wire form.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Parse the 8-byte big-endian wire form. Fails if fewer than 8 bytes
    /// are given.
    pub fn from_be_bytes(data: &[u8]) -> Result<Self, OscError> {
        let bytes: [u8; 8] = data
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or(OscError::UnexpectedEof)?;
        Ok(Timetag(u64::from_be_bytes(bytes)))
    }
}
