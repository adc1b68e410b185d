//! Command builders
//!
//! One function per Redis verb or option shape, each returning the
//! [`Cmd`](crate::cmd::Cmd) whose argv matches the Redis command syntax.
//! Option combinations that Redis rejects as mutually exclusive are
//! programming errors and panic here, at the call site that built them.

pub mod bitmap;
pub mod generic;
pub mod geo;
pub mod hash;
pub mod hyperloglog;
pub mod list;
pub mod pubsub;
pub mod script;
pub mod server;
pub mod set;
pub mod sorted_set;
pub mod stream;
pub mod string;

pub use bitmap::{BitCount, BitOp, BitPos, BitUnit};
pub use generic::{CopyArgs, ScanArgs, Sort};
pub use geo::{GeoFrom, GeoMember, GeoRadiusQuery, GeoSearchQuery, GeoShape, GeoSort, GeoUnit};
pub use list::{InsertPosition, LPosArgs, Side};
pub use sorted_set::{Aggregate, ZAddArgs, ZRangeArgs, ZRangeBy, ZStore};
pub use stream::{
    XAddArgs, XClaimArgs, XPendingExtArgs, XReadArgs, XReadGroupArgs, XTrim, XTrimArgs,
};
pub use string::{SetArgs, SetCondition};

use crate::cmd::Cmd;

/// Condition for `EXPIRE`, `PEXPIRE` and the hash field expirations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpireCondition {
    /// No condition
    #[default]
    Always,
    /// Only when the key has no expiry
    Nx,
    /// Only when the key already has an expiry
    Xx,
    /// Only when the new expiry is greater than the current one
    Gt,
    /// Only when the new expiry is less than the current one
    Lt,
}

impl ExpireCondition {
    pub(crate) fn apply(self, cmd: Cmd) -> Cmd {
        match self {
            Self::Always => cmd,
            Self::Nx => cmd.arg("NX"),
            Self::Xx => cmd.arg("XX"),
            Self::Gt => cmd.arg("GT"),
            Self::Lt => cmd.arg("LT"),
        }
    }
}

/// `LIMIT offset count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    /// Number of elements to skip
    pub offset: i64,
    /// Maximum number of elements to return
    pub count: i64,
}

impl Limit {
    /// Build a limit
    pub fn new(offset: i64, count: i64) -> Self {
        Self { offset, count }
    }

    pub(crate) fn apply(self, cmd: Cmd) -> Cmd {
        cmd.arg("LIMIT").arg(self.offset).arg(self.count)
    }
}

/// Which end of a sorted set `ZMPOP` pops from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinMax {
    /// Lowest scores first
    Min,
    /// Highest scores first
    Max,
}

impl MinMax {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}

pub(crate) fn with_count(cmd: Cmd, count: Option<i64>) -> Cmd {
    match count {
        Some(n) => cmd.arg("COUNT").arg(n),
        None => cmd,
    }
}

/// Timeout argument of blocking commands: seconds, fractions allowed
pub(crate) fn block_timeout(timeout: std::time::Duration) -> f64 {
    timeout.as_secs_f64()
}
