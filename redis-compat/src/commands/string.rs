//! String commands

use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::{Arg, Expiration};

/// `NX` / `XX` condition of `SET`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetCondition {
    /// Set unconditionally
    #[default]
    Always,
    /// Only set if the key does not exist
    Nx,
    /// Only set if the key exists
    Xx,
}

/// Options for `SET`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetArgs {
    /// `NX` / `XX`
    pub condition: SetCondition,
    /// `EX` / `PX` / `EXAT` / `PXAT` / `KEEPTTL`
    pub expiration: Expiration,
    /// `GET`: return the old value
    pub get: bool,
}

impl SetArgs {
    /// Set unconditionally, no expiry
    pub fn new() -> Self {
        Self::default()
    }

    /// Only set if the key does not exist
    #[must_use]
    pub fn nx(mut self) -> Self {
        self.condition = SetCondition::Nx;
        self
    }

    /// Only set if the key exists
    #[must_use]
    pub fn xx(mut self) -> Self {
        self.condition = SetCondition::Xx;
        self
    }

    /// Expiration to apply
    #[must_use]
    pub fn expiration(mut self, expiration: impl Into<Expiration>) -> Self {
        self.expiration = expiration.into();
        self
    }

    /// Keep the current TTL
    #[must_use]
    pub fn keep_ttl(mut self) -> Self {
        self.expiration = Expiration::KeepTtl;
        self
    }

    /// Return the previous value
    #[must_use]
    pub fn get(mut self) -> Self {
        self.get = true;
        self
    }
}

/// Append to the value
pub fn append(key: &str, value: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::APPEND).key(key).arg(value)
}

/// Decrement by one
pub fn decr(key: &str) -> Cmd {
    Cmd::new(&registry::DECR).key(key)
}

/// Decrement by `decrement`
pub fn decr_by(key: &str, decrement: i64) -> Cmd {
    Cmd::new(&registry::DECRBY).key(key).arg(decrement)
}

/// Value of a key
pub fn get(key: &str) -> Cmd {
    Cmd::new(&registry::GET).key(key)
}

/// Get the value and delete the key
pub fn get_del(key: &str) -> Cmd {
    Cmd::new(&registry::GETDEL).key(key)
}

/// `GETEX`: a zero (persist) expiration sends `PERSIST`, `KEEPTTL` sends no option
pub fn get_ex(key: &str, expiration: Expiration) -> Cmd {
    let cmd = Cmd::new(&registry::GETEX).key(key);
    match expiration {
        Expiration::Persist => cmd.arg("PERSIST"),
        Expiration::KeepTtl => cmd,
        other => cmd.args(other.to_args()),
    }
}

/// Substring between `start` and `end`, inclusive
pub fn get_range(key: &str, start: i64, end: i64) -> Cmd {
    Cmd::new(&registry::GETRANGE).key(key).arg(start).arg(end)
}

/// Set a new value and return the old one
pub fn get_set(key: &str, value: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::GETSET).key(key).arg(value)
}

/// Increment by one
pub fn incr(key: &str) -> Cmd {
    Cmd::new(&registry::INCR).key(key)
}

/// Increment by `increment`
pub fn incr_by(key: &str, increment: i64) -> Cmd {
    Cmd::new(&registry::INCRBY).key(key).arg(increment)
}

/// Increment by a float
pub fn incr_by_float(key: &str, increment: f64) -> Cmd {
    Cmd::new(&registry::INCRBYFLOAT).key(key).arg(increment)
}

/// Longest common subsequence of two values
pub fn lcs(key1: &str, key2: &str) -> Cmd {
    Cmd::new(&registry::LCS).key(key1).key(key2)
}

/// Length of the longest common subsequence
pub fn lcs_len(key1: &str, key2: &str) -> Cmd {
    Cmd::new(&registry::LCS_LEN).key(key1).key(key2).arg("LEN")
}

/// Values of keys
pub fn mget(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::MGET).keys(keys.iter().copied())
}

/// Set several keys
pub fn mset<V: Into<Arg> + Clone>(pairs: &[(&str, V)]) -> Cmd {
    let mut cmd = Cmd::new(&registry::MSET);
    for (k, v) in pairs {
        cmd = cmd.key(*k).arg(v.clone());
    }
    cmd
}

/// Set several keys only if none of them exists
pub fn mset_nx<V: Into<Arg> + Clone>(pairs: &[(&str, V)]) -> Cmd {
    let mut cmd = Cmd::new(&registry::MSETNX);
    for (k, v) in pairs {
        cmd = cmd.key(*k).arg(v.clone());
    }
    cmd
}

/// `SET key value [EX|PX|EXAT|PXAT|KEEPTTL]`
pub fn set(key: &str, value: impl Into<Arg>, expiration: Expiration) -> Cmd {
    Cmd::new(&registry::SET)
        .key(key)
        .arg(value)
        .args(expiration.to_args())
}

/// `SET key value NX [...]`
pub fn set_nx(key: &str, value: impl Into<Arg>, expiration: Expiration) -> Cmd {
    Cmd::new(&registry::SET_NX)
        .key(key)
        .arg(value)
        .args(expiration.to_args())
        .arg("NX")
}

/// `SET key value XX [...]`
pub fn set_xx(key: &str, value: impl Into<Arg>, expiration: Expiration) -> Cmd {
    Cmd::new(&registry::SET_XX)
        .key(key)
        .arg(value)
        .args(expiration.to_args())
        .arg("XX")
}

/// `SET` with the full option set
pub fn set_args(key: &str, value: impl Into<Arg>, args: SetArgs) -> Cmd {
    let cmd = Cmd::new(&registry::SET_ARGS)
        .key(key)
        .arg(value)
        .args(args.expiration.to_args());
    let cmd = match args.condition {
        SetCondition::Always => cmd,
        SetCondition::Nx => cmd.arg("NX"),
        SetCondition::Xx => cmd.arg("XX"),
    };
    cmd.arg_if(args.get, "GET")
}

/// Set with a timeout
pub fn set_ex(key: &str, value: impl Into<Arg>, expiration: std::time::Duration) -> Cmd {
    Cmd::new(&registry::SETEX)
        .key(key)
        .arg(redis_compat_core::types::format_sec(expiration))
        .arg(value)
}

/// Overwrite part of the value at `offset`
pub fn set_range(key: &str, offset: i64, value: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::SETRANGE).key(key).arg(offset).arg(value)
}

/// Length of the value
pub fn strlen(key: &str) -> Cmd {
    Cmd::new(&registry::STRLEN).key(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use redis_compat_core::KEEP_TTL;
    use std::time::Duration;

    #[test]
    fn test_set_expiration_shapes() {
        assert_eq!(set("k", "v", Expiration::Persist).to_string(), "SET k v");
        assert_eq!(
            set("k", "v", Duration::from_secs(5).into()).to_string(),
            "SET k v EX 5"
        );
        assert_eq!(
            set("k", "v", Duration::from_millis(100).into()).to_string(),
            "SET k v PX 100"
        );
        assert_eq!(set("k", "v", KEEP_TTL).to_string(), "SET k v KEEPTTL");
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            set("k", "v", at.into()).to_string(),
            "SET k v EXAT 1700000000"
        );
    }

    #[test]
    fn test_set_conditions() {
        assert_eq!(
            set_nx("k", 1, Duration::from_secs(10).into()).to_string(),
            "SET k 1 EX 10 NX"
        );
        assert_eq!(set_xx("k", true, KEEP_TTL).to_string(), "SET k 1 KEEPTTL XX");
        let args = SetArgs::new().nx().expiration(Duration::from_millis(1500)).get();
        assert_eq!(set_args("k", "v", args).to_string(), "SET k v PX 1500 NX GET");
    }

    #[test]
    fn test_get_ex() {
        assert_eq!(get_ex("k", Expiration::Persist).to_string(), "GETEX k PERSIST");
        assert_eq!(
            get_ex("k", Duration::from_secs(3).into()).to_string(),
            "GETEX k EX 3"
        );
    }

    #[test]
    fn test_multi_key() {
        let cmd = mset(&[("a", 1), ("b", 2)]);
        assert_eq!(cmd.to_string(), "MSET a 1 b 2");
        assert_eq!(cmd.key_strings(), vec!["a", "b"]);
        assert_eq!(mget(&["a", "b"]).to_string(), "MGET a b");
        assert_eq!(lcs_len("a", "b").to_string(), "LCS a b LEN");
    }

    #[test]
    fn test_float_arguments() {
        assert_eq!(incr_by_float("k", 0.1).to_string(), "INCRBYFLOAT k 0.1");
        assert_eq!(set_ex("k", "v", Duration::from_secs(7)).to_string(), "SETEX k 7 v");
    }
}
