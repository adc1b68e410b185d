//! Typed reply shapes
//!
//! Scalar replies map to plain Rust types (`i64`, `f64`, `String`, `bool`);
//! the structured ones live here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A sorted set member with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Z {
    /// Score
    pub score: f64,
    /// Member
    pub member: String,
}

impl Z {
    /// Build a member/score pair
    pub fn new(score: f64, member: impl Into<String>) -> Self {
        Self {
            score,
            member: member.into(),
        }
    }
}

/// A sorted set member popped from a named key (`BZPOPMIN`, `BZPOPMAX`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZWithKey {
    /// Key the member came from
    pub key: String,
    /// The member
    pub z: Z,
}

/// Remaining lifetime of a key, as reported by `TTL` / `PTTL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    /// The key does not exist (`-2`)
    Missing,
    /// The key exists and has no expiry (`-1`)
    Persistent,
    /// The key expires after this long
    In(Duration),
}

impl Expiry {
    /// The remaining time, if the key has one
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::In(d) => Some(*d),
            _ => None,
        }
    }
}

/// One page of a `SCAN` family iteration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPage {
    /// Cursor for the next call; `0` when the iteration is complete
    pub cursor: u64,
    /// Keys (or members / field-value pairs, flattened) of this page
    pub keys: Vec<String>,
}

/// A key with one value (`BLPOP`, `HRANDFIELD ... WITHVALUES`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Key or field
    pub key: String,
    /// Value
    pub value: String,
}

/// A key with the values popped from it (`LMPOP`, `BLMPOP`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValues {
    /// Key the values came from
    pub key: String,
    /// Popped values
    pub values: Vec<String>,
}

/// A key with the scored members popped from it (`ZMPOP`, `BZMPOP`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyZs {
    /// Key the members came from
    pub key: String,
    /// Popped members
    pub zs: Vec<Z>,
}

/// A stream entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XMessage {
    /// Entry id
    pub id: String,
    /// Field/value pairs in stream order
    pub values: Vec<(String, String)>,
}

/// Entries read from one stream (`XREAD`, `XREADGROUP`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XStream {
    /// Stream key
    pub stream: String,
    /// Entries
    pub messages: Vec<XMessage>,
}

/// `XPENDING` summary form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XPending {
    /// Number of pending entries
    pub count: i64,
    /// Smallest pending id
    pub lower: String,
    /// Greatest pending id
    pub higher: String,
    /// Pending entries per consumer
    pub consumers: Vec<(String, i64)>,
}

/// `XPENDING` extended form, one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XPendingExt {
    /// Entry id
    pub id: String,
    /// Consumer owning the entry
    pub consumer: String,
    /// Time since last delivery
    pub idle: Duration,
    /// Delivery count
    pub retry_count: i64,
}

/// `XAUTOCLAIM` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XAutoClaim {
    /// Cursor for the next call
    pub next: String,
    /// Claimed entries
    pub messages: Vec<XMessage>,
    /// Ids that no longer exist (Redis 7+)
    pub deleted: Vec<String>,
}

/// `XAUTOCLAIM ... JUSTID` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XAutoClaimJustId {
    /// Cursor for the next call
    pub next: String,
    /// Claimed ids
    pub ids: Vec<String>,
}

/// A geo set member returned by radius and search queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Member name
    pub name: String,
    /// Longitude, when `WITHCOORD` was requested
    pub longitude: f64,
    /// Latitude, when `WITHCOORD` was requested
    pub latitude: f64,
    /// Distance, when `WITHDIST` was requested
    pub dist: f64,
    /// Raw geohash, when `WITHHASH` was requested
    pub geo_hash: i64,
}

/// A coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    /// Longitude
    pub longitude: f64,
    /// Latitude
    pub latitude: f64,
}
