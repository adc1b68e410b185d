//! Keyspace commands

use super::{ExpireCondition, Limit};
use crate::cmd::Cmd;
use crate::registry::{self, CommandId};
use chrono::{DateTime, Utc};
use redis_compat_core::types::{format_ms, format_sec, unix_millis, unix_secs};
use redis_compat_core::Arg;
use std::time::Duration;

/// Options for `COPY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyArgs {
    /// `DB n`: copy into another database
    pub db: Option<u16>,
    /// `REPLACE`: overwrite an existing destination
    pub replace: bool,
}

/// `MATCH` / `COUNT` / `TYPE` of the `SCAN` family
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanArgs {
    /// Glob pattern
    pub pattern: Option<String>,
    /// Work hint per call
    pub count: Option<i64>,
    /// Value type filter, `SCAN` only
    pub kind: Option<String>,
}

impl ScanArgs {
    /// No filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Only return keys matching `pattern`
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Hint how many elements to look at per call
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Only return keys of this type (`string`, `list`, `hash`, ...)
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub(crate) fn apply(&self, cmd: Cmd) -> Cmd {
        let cmd = match &self.pattern {
            Some(p) => cmd.arg("MATCH").arg(p.as_str()),
            None => cmd,
        };
        let cmd = match self.count {
            Some(n) => cmd.arg("COUNT").arg(n),
            None => cmd,
        };
        match &self.kind {
            Some(t) => cmd.arg("TYPE").arg(t.as_str()),
            None => cmd,
        }
    }
}

/// Options for `SORT` / `SORT_RO`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    /// `BY pattern`
    pub by: Option<String>,
    /// `LIMIT offset count`
    pub limit: Option<Limit>,
    /// `GET pattern`, repeated
    pub get: Vec<String>,
    /// `DESC` instead of the default ascending order
    pub desc: bool,
    /// `ALPHA`: lexicographic comparison
    pub alpha: bool,
}

impl Sort {
    /// Numeric ascending sort
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by external keys
    #[must_use]
    pub fn by(mut self, pattern: impl Into<String>) -> Self {
        self.by = Some(pattern.into());
        self
    }

    /// Page the result
    #[must_use]
    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.limit = Some(Limit::new(offset, count));
        self
    }

    /// Return external keys instead of the elements
    #[must_use]
    pub fn get(mut self, pattern: impl Into<String>) -> Self {
        self.get.push(pattern.into());
        self
    }

    /// Descending order
    #[must_use]
    pub fn desc(mut self) -> Self {
        self.desc = true;
        self
    }

    /// Compare as strings
    #[must_use]
    pub fn alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    fn apply(&self, cmd: Cmd) -> Cmd {
        let cmd = match &self.by {
            Some(by) => cmd.arg("BY").arg(by.as_str()),
            None => cmd,
        };
        let cmd = match self.limit {
            Some(limit) => limit.apply(cmd),
            None => cmd,
        };
        self.get
            .iter()
            .fold(cmd, |cmd, g| cmd.arg("GET").arg(g.as_str()))
            .arg_if(self.desc, "DESC")
            .arg_if(self.alpha, "ALPHA")
    }
}

/// Copy `source` to `destination`
pub fn copy(source: &str, destination: &str, args: CopyArgs) -> Cmd {
    let cmd = Cmd::new(&registry::COPY).key(source).key(destination);
    let cmd = match args.db {
        Some(db) => cmd.arg("DB").arg(u32::from(db)),
        None => cmd,
    };
    cmd.arg_if(args.replace, "REPLACE")
}

/// `DEL key`, or the multi-key form for more than one key
pub fn del(keys: &[&str]) -> Cmd {
    let id = if keys.len() == 1 {
        &registry::DEL
    } else {
        &registry::DEL_MULTI
    };
    Cmd::new(id).keys(keys.iter().copied())
}

/// Serialize the value stored at `key`
pub fn dump(key: &str) -> Cmd {
    Cmd::new(&registry::DUMP).key(key)
}

/// `EXISTS key...`; the single-key form gets its own identifier
pub fn exists(keys: &[&str]) -> Cmd {
    let id = if keys.len() == 1 {
        &registry::EXISTS
    } else {
        &registry::EXISTS_MULTI
    };
    Cmd::new(id).keys(keys.iter().copied())
}

fn expire_cmd(id: &'static CommandId, key: &str, when: i64, condition: ExpireCondition) -> Cmd {
    condition.apply(Cmd::new(id).key(key).arg(when))
}

/// `EXPIRE key seconds [NX|XX|GT|LT]`
pub fn expire(key: &str, ttl: Duration, condition: ExpireCondition) -> Cmd {
    expire_cmd(&registry::EXPIRE, key, format_sec(ttl), condition)
}

/// Expire at an absolute time
pub fn expire_at(key: &str, at: DateTime<Utc>, condition: ExpireCondition) -> Cmd {
    expire_cmd(&registry::EXPIREAT, key, unix_secs(at), condition)
}

/// Absolute expiry as a Unix timestamp in seconds
pub fn expire_time(key: &str) -> Cmd {
    Cmd::new(&registry::EXPIRETIME).key(key)
}

/// Keys matching `pattern`. Scans the whole keyspace
pub fn keys(pattern: &str) -> Cmd {
    Cmd::new(&registry::KEYS).arg(pattern)
}

/// Move a key to another database
pub fn move_key(key: &str, db: u16) -> Cmd {
    Cmd::new(&registry::MOVE).key(key).arg(u32::from(db))
}

/// Internal encoding of the value
pub fn object_encoding(key: &str) -> Cmd {
    Cmd::new(&registry::OBJECT_ENCODING).key(key)
}

/// LFU access frequency
pub fn object_freq(key: &str) -> Cmd {
    Cmd::new(&registry::OBJECT_FREQ).key(key)
}

/// Time since the key was last accessed
pub fn object_idle_time(key: &str) -> Cmd {
    Cmd::new(&registry::OBJECT_IDLETIME).key(key)
}

/// Reference count of the value
pub fn object_ref_count(key: &str) -> Cmd {
    Cmd::new(&registry::OBJECT_REFCOUNT).key(key)
}

/// Remove the timeout
pub fn persist(key: &str) -> Cmd {
    Cmd::new(&registry::PERSIST).key(key)
}

/// `PEXPIRE key milliseconds [NX|XX|GT|LT]`
pub fn pexpire(key: &str, ttl: Duration, condition: ExpireCondition) -> Cmd {
    expire_cmd(&registry::PEXPIRE, key, format_ms(ttl), condition)
}

/// Expire at an absolute time, millisecond precision
pub fn pexpire_at(key: &str, at: DateTime<Utc>, condition: ExpireCondition) -> Cmd {
    expire_cmd(&registry::PEXPIREAT, key, unix_millis(at), condition)
}

/// Absolute expiry as a Unix timestamp in milliseconds
pub fn pexpire_time(key: &str) -> Cmd {
    Cmd::new(&registry::PEXPIRETIME).key(key)
}

/// Remaining time to live, millisecond precision
pub fn pttl(key: &str) -> Cmd {
    Cmd::new(&registry::PTTL).key(key)
}

/// A random key
pub fn random_key() -> Cmd {
    Cmd::new(&registry::RANDOMKEY)
}

/// Rename a key, overwriting `new_key`
pub fn rename(key: &str, new_key: &str) -> Cmd {
    Cmd::new(&registry::RENAME).key(key).key(new_key)
}

/// Rename only if `new_key` does not exist
pub fn rename_nx(key: &str, new_key: &str) -> Cmd {
    Cmd::new(&registry::RENAMENX).key(key).key(new_key)
}

/// `RESTORE key ttl payload [REPLACE]`; a zero `ttl` creates the key without expiry
pub fn restore(key: &str, ttl: Duration, payload: impl Into<Arg>, replace: bool) -> Cmd {
    Cmd::new(&registry::RESTORE)
        .key(key)
        .arg(format_ms(ttl))
        .arg(payload)
        .arg_if(replace, "REPLACE")
}

/// One step of a keyspace iteration
pub fn scan(cursor: u64, args: &ScanArgs) -> Cmd {
    args.apply(Cmd::new(&registry::SCAN).arg(cursor))
}

/// Sort a list, set or sorted set
pub fn sort(key: &str, sort: &Sort) -> Cmd {
    sort.apply(Cmd::new(&registry::SORT).key(key))
}

/// Read-only `SORT`
pub fn sort_ro(key: &str, sort: &Sort) -> Cmd {
    sort.apply(Cmd::new(&registry::SORT_RO).key(key))
}

/// `SORT ... STORE destination`
pub fn sort_store(key: &str, destination: &str, sort: &Sort) -> Cmd {
    sort.apply(Cmd::new(&registry::SORT_STORE).key(key))
        .arg("STORE")
        .key(destination)
}

/// Update last access time
pub fn touch(keys: &[&str]) -> Cmd {
    let id = if keys.len() == 1 {
        &registry::TOUCH
    } else {
        &registry::TOUCH_MULTI
    };
    Cmd::new(id).keys(keys.iter().copied())
}

/// Remaining time to live, second precision
pub fn ttl(key: &str) -> Cmd {
    Cmd::new(&registry::TTL).key(key)
}

/// Type of the value stored at `key`
pub fn key_type(key: &str) -> Cmd {
    Cmd::new(&registry::TYPE).key(key)
}

/// Delete keys, reclaiming memory in the background
pub fn unlink(keys: &[&str]) -> Cmd {
    let id = if keys.len() == 1 {
        &registry::UNLINK
    } else {
        &registry::UNLINK_MULTI
    };
    Cmd::new(id).keys(keys.iter().copied())
}

/// `WAIT numreplicas timeout`; a zero timeout blocks forever
pub fn wait(replicas: i64, timeout: Duration) -> Cmd {
    Cmd::new(&registry::WAIT)
        .arg(replicas)
        .arg(i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_variant_chosen_by_key_count() {
        assert_eq!(exists(&["a"]).id().label, "EXISTS");
        assert_eq!(exists(&["a", "b"]).id().label, "EXISTS_MULTI");
        assert_eq!(del(&["a", "b"]).to_string(), "DEL a b");
        assert_eq!(unlink(&["a"]).id().label, "UNLINK");
        assert_eq!(touch(&["a", "b"]).id().label, "TOUCH_MULTI");
    }

    #[test]
    fn test_expire_family() {
        assert_eq!(
            expire("k", Duration::from_secs(10), ExpireCondition::Always).to_string(),
            "EXPIRE k 10"
        );
        assert_eq!(
            expire("k", Duration::from_secs(10), ExpireCondition::Gt).to_string(),
            "EXPIRE k 10 GT"
        );
        assert_eq!(
            pexpire("k", Duration::from_micros(10), ExpireCondition::Nx).to_string(),
            "PEXPIRE k 1 NX"
        );
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            pexpire_at("k", at, ExpireCondition::Always).to_string(),
            "PEXPIREAT k 1700000000123"
        );
        assert_eq!(
            expire_at("k", at, ExpireCondition::Lt).to_string(),
            "EXPIREAT k 1700000000 LT"
        );
    }

    #[test]
    fn test_copy_and_scan() {
        let args = CopyArgs {
            db: Some(2),
            replace: true,
        };
        assert_eq!(copy("a", "b", args).to_string(), "COPY a b DB 2 REPLACE");
        let scan_args = ScanArgs::new().pattern("user:*").count(100).kind("hash");
        assert_eq!(
            scan(0, &scan_args).to_string(),
            "SCAN 0 MATCH user:* COUNT 100 TYPE hash"
        );
    }

    #[test]
    fn test_sort() {
        let s = Sort::new()
            .by("w_*")
            .limit(0, 5)
            .get("#")
            .get("o_*")
            .desc()
            .alpha();
        assert_eq!(
            sort_ro("l", &s).to_string(),
            "SORT_RO l BY w_* LIMIT 0 5 GET # GET o_* DESC ALPHA"
        );
        let cmd = sort_store("l", "dst", &Sort::new());
        assert_eq!(cmd.to_string(), "SORT l STORE dst");
        assert_eq!(cmd.key_strings(), vec!["l", "dst"]);
    }

    #[test]
    fn test_restore_and_wait() {
        assert_eq!(
            restore("k", Duration::ZERO, "payload", true).to_string(),
            "RESTORE k 0 payload REPLACE"
        );
        assert_eq!(wait(1, Duration::from_millis(250)).to_string(), "WAIT 1 250");
    }
}
