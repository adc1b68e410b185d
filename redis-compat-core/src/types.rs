//! Command argument types and their canonical wire encoding
//!
//! Redis argv is a list of byte strings. [`Arg`] is the closed set of
//! value types accepted by the command builders; every one of them is turned
//! into bytes by [`Arg::into_bytes`] using the encoding Redis expects.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::{Duration, SystemTime};

/// A single command argument value
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text
    String(String),
    /// Binary data
    Bytes(Bytes),
    /// Signed integer, encoded base-10
    Int(i64),
    /// Unsigned integer, encoded base-10
    UInt(u64),
    /// Float, encoded in its shortest round-tripping form
    Float(f64),
    /// Boolean, encoded as `1` / `0`
    Bool(bool),
    /// Point in time, encoded as RFC 3339 with nanoseconds
    Time(DateTime<Utc>),
}

impl Arg {
    /// Encode the argument into its argv form
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::String(s) => Bytes::from(s.into_bytes()),
            Self::Bytes(b) => b,
            Self::Int(i) => Bytes::copy_from_slice(itoa::Buffer::new().format(i).as_bytes()),
            Self::UInt(u) => Bytes::copy_from_slice(itoa::Buffer::new().format(u).as_bytes()),
            Self::Float(f) => Bytes::from(format_float(f)),
            Self::Bool(b) => Bytes::from_static(if b { b"1" } else { b"0" }),
            Self::Time(t) => Bytes::from(t.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        }
    }
}

/// Shortest base-10 text that parses back to the same float.
///
/// Infinities use the `+inf` / `-inf` spelling accepted by score arguments.
#[must_use]
pub fn format_float(f: f64) -> String {
    if f.is_infinite() {
        if f > 0.0 { "+inf" } else { "-inf" }.to_string()
    } else {
        // Display for f64 already prints the shortest round-trip digits.
        f.to_string()
    }
}

/// Whether a duration needs millisecond precision on the wire.
///
/// Anything below one second, or with a sub-second remainder, is sent in
/// milliseconds (`PX`, `PEXPIRE`); whole seconds use the seconds form.
#[must_use]
pub fn use_precise(d: Duration) -> bool {
    d < Duration::from_secs(1) || d.subsec_nanos() != 0
}

/// Whole seconds of a duration, at least 1 for non-zero durations
#[must_use]
pub fn format_sec(d: Duration) -> i64 {
    if d > Duration::ZERO && d < Duration::from_secs(1) {
        return 1;
    }
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}

/// Whole milliseconds of a duration, at least 1 for non-zero durations
#[must_use]
pub fn format_ms(d: Duration) -> i64 {
    if d > Duration::ZERO && d < Duration::from_millis(1) {
        return 1;
    }
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// Unix seconds of an instant (`EXPIREAT`, `EXAT`)
#[must_use]
pub fn unix_secs(t: DateTime<Utc>) -> i64 {
    t.timestamp()
}

/// Unix milliseconds of an instant (`PEXPIREAT`, `PXAT`)
#[must_use]
pub fn unix_millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

/// Expiration requested by a write command such as `SET`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// No expiration option: the key is persisted and any previous TTL is cleared
    #[default]
    Persist,
    /// Keep the TTL the key already has (`KEEPTTL`)
    KeepTtl,
    /// Expire after the duration (`EX` or `PX`, see [`use_precise`])
    After(Duration),
    /// Expire at the instant (`EXAT` or `PXAT`)
    At(DateTime<Utc>),
}

/// Sentinel selecting the `KEEPTTL` option
pub const KEEP_TTL: Expiration = Expiration::KeepTtl;

impl Expiration {
    /// The option tokens this expiration adds to the argv
    #[must_use]
    pub fn to_args(self) -> Vec<Arg> {
        match self {
            Self::Persist => Vec::new(),
            Self::KeepTtl => vec![Arg::from("KEEPTTL")],
            Self::After(d) if use_precise(d) => vec![Arg::from("PX"), Arg::Int(format_ms(d))],
            Self::After(d) => vec![Arg::from("EX"), Arg::Int(format_sec(d))],
            Self::At(t) if t.timestamp_subsec_millis() != 0 => {
                vec![Arg::from("PXAT"), Arg::Int(unix_millis(t))]
            }
            Self::At(t) => vec![Arg::from("EXAT"), Arg::Int(unix_secs(t))],
        }
    }
}

impl From<Duration> for Expiration {
    fn from(d: Duration) -> Self {
        if d.is_zero() {
            Self::Persist
        } else {
            Self::After(d)
        }
    }
}

impl From<DateTime<Utc>> for Expiration {
    fn from(t: DateTime<Utc>) -> Self {
        Self::At(t)
    }
}

impl From<SystemTime> for Expiration {
    fn from(t: SystemTime) -> Self {
        Self::At(t.into())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for Arg {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Bytes> for Arg {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Arg {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Arg {
    fn from(u: u32) -> Self {
        Self::UInt(u64::from(u))
    }
}

impl From<u64> for Arg {
    fn from(u: u64) -> Self {
        Self::UInt(u)
    }
}

impl From<usize> for Arg {
    fn from(u: usize) -> Self {
        Self::UInt(u as u64)
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for Arg {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Time(t)
    }
}

impl From<SystemTime> for Arg {
    fn from(t: SystemTime) -> Self {
        Self::Time(t.into())
    }
}

impl From<&Arg> for Arg {
    fn from(a: &Arg) -> Self {
        a.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn text(a: impl Into<Arg>) -> String {
        String::from_utf8(a.into().into_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_numeric_encoding() {
        assert_eq!(text(-42i64), "-42");
        assert_eq!(text(7u64), "7");
        assert_eq!(text(1.5f64), "1.5");
        assert_eq!(text(0.1f64), "0.1");
        assert_eq!(text(3.0f64), "3");
        assert_eq!(text(f64::INFINITY), "+inf");
        assert_eq!(text(f64::NEG_INFINITY), "-inf");
        assert_eq!(text(true), "1");
        assert_eq!(text(false), "0");
    }

    #[test]
    fn test_time_encoding() {
        let t = Utc.timestamp_opt(1_700_000_000, 5).unwrap();
        assert_eq!(text(t), "2023-11-14T22:13:20.000000005Z");
    }

    #[test]
    fn test_use_precise() {
        assert!(use_precise(Duration::from_millis(500)));
        assert!(use_precise(Duration::from_millis(1500)));
        assert!(!use_precise(Duration::from_secs(2)));
    }

    #[test]
    fn test_expiration_args() {
        let args = |e: Expiration| -> Vec<String> {
            e.to_args()
                .into_iter()
                .map(|a| String::from_utf8(a.into_bytes().to_vec()).unwrap())
                .collect()
        };

        assert!(args(Duration::ZERO.into()).is_empty());
        assert_eq!(args(KEEP_TTL), vec!["KEEPTTL"]);
        assert_eq!(args(Duration::from_secs(5).into()), vec!["EX", "5"]);
        assert_eq!(args(Duration::from_millis(1500).into()), vec!["PX", "1500"]);

        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(args(at.into()), vec!["EXAT", "1700000000"]);
        let at_ms = Utc.timestamp_millis_opt(1_700_000_000_250).unwrap();
        assert_eq!(args(at_ms.into()), vec!["PXAT", "1700000000250"]);
    }

    #[test]
    fn test_sub_unit_durations_round_up() {
        assert_eq!(format_sec(Duration::from_millis(10)), 1);
        assert_eq!(format_ms(Duration::from_micros(10)), 1);
        assert_eq!(format_ms(Duration::ZERO), 0);
    }
}
