//! Hash commands

use super::{generic::ScanArgs, ExpireCondition};
use crate::cmd::Cmd;
use crate::registry::{self, CommandId};
use chrono::{DateTime, Utc};
use redis_compat_core::types::{format_ms, format_sec, unix_millis, unix_secs};
use redis_compat_core::Arg;
use std::time::Duration;

/// Delete one field
pub fn hdel(key: &str, field: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::HDEL).key(key).arg(field)
}

/// Delete fields
pub fn hdel_multi<V: Into<Arg> + Clone>(key: &str, fields: &[V]) -> Cmd {
    Cmd::new(&registry::HDEL_MULTI)
        .key(key)
        .args(fields.iter().cloned())
}

/// Whether the field exists
pub fn hexists(key: &str, field: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::HEXISTS).key(key).arg(field)
}

fn with_fields<V: Into<Arg> + Clone>(cmd: Cmd, fields: &[V]) -> Cmd {
    cmd.arg("FIELDS")
        .arg(fields.len())
        .args(fields.iter().cloned())
}

fn field_expire<V: Into<Arg> + Clone>(
    id: &'static CommandId,
    key: &str,
    when: i64,
    condition: ExpireCondition,
    fields: &[V],
) -> Cmd {
    let cmd = condition.apply(Cmd::new(id).key(key).arg(when));
    with_fields(cmd, fields)
}

/// `HEXPIRE key seconds [NX|XX|GT|LT] FIELDS n field...`
pub fn hexpire<V: Into<Arg> + Clone>(
    key: &str,
    ttl: Duration,
    condition: ExpireCondition,
    fields: &[V],
) -> Cmd {
    field_expire(&registry::HEXPIRE, key, format_sec(ttl), condition, fields)
}

/// Expire fields at an absolute time
pub fn hexpire_at<V: Into<Arg> + Clone>(
    key: &str,
    at: DateTime<Utc>,
    condition: ExpireCondition,
    fields: &[V],
) -> Cmd {
    field_expire(&registry::HEXPIREAT, key, unix_secs(at), condition, fields)
}

/// Value of a field
pub fn hget(key: &str, field: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::HGET).key(key).arg(field)
}

/// Every field and value
pub fn hgetall(key: &str) -> Cmd {
    Cmd::new(&registry::HGETALL).key(key)
}

/// Increment an integer field
pub fn hincr_by(key: &str, field: impl Into<Arg>, increment: i64) -> Cmd {
    Cmd::new(&registry::HINCRBY)
        .key(key)
        .arg(field)
        .arg(increment)
}

/// Increment a float field
pub fn hincr_by_float(key: &str, field: impl Into<Arg>, increment: f64) -> Cmd {
    Cmd::new(&registry::HINCRBYFLOAT)
        .key(key)
        .arg(field)
        .arg(increment)
}

/// Every field name
pub fn hkeys(key: &str) -> Cmd {
    Cmd::new(&registry::HKEYS).key(key)
}

/// Number of fields
pub fn hlen(key: &str) -> Cmd {
    Cmd::new(&registry::HLEN).key(key)
}

/// Values of fields
pub fn hmget<V: Into<Arg> + Clone>(key: &str, fields: &[V]) -> Cmd {
    Cmd::new(&registry::HMGET)
        .key(key)
        .args(fields.iter().cloned())
}

/// Set several fields
pub fn hmset<V: Into<Arg> + Clone>(key: &str, pairs: &[(&str, V)]) -> Cmd {
    pairs
        .iter()
        .fold(Cmd::new(&registry::HMSET).key(key), |cmd, (f, v)| {
            cmd.arg(*f).arg(v.clone())
        })
}

/// Remove field timeouts
pub fn hpersist<V: Into<Arg> + Clone>(key: &str, fields: &[V]) -> Cmd {
    with_fields(Cmd::new(&registry::HPERSIST).key(key), fields)
}

/// Set field timeouts in milliseconds
pub fn hpexpire<V: Into<Arg> + Clone>(
    key: &str,
    ttl: Duration,
    condition: ExpireCondition,
    fields: &[V],
) -> Cmd {
    field_expire(&registry::HPEXPIRE, key, format_ms(ttl), condition, fields)
}

/// Expire fields at an absolute time, millisecond precision
pub fn hpexpire_at<V: Into<Arg> + Clone>(
    key: &str,
    at: DateTime<Utc>,
    condition: ExpireCondition,
    fields: &[V],
) -> Cmd {
    field_expire(&registry::HPEXPIREAT, key, unix_millis(at), condition, fields)
}

/// Remaining field lifetimes, millisecond precision
pub fn hpttl<V: Into<Arg> + Clone>(key: &str, fields: &[V]) -> Cmd {
    with_fields(Cmd::new(&registry::HPTTL).key(key), fields)
}

/// Random field names
pub fn hrandfield(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::HRANDFIELD).key(key).arg(count)
}

/// Random fields with their values
pub fn hrandfield_withvalues(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::HRANDFIELD_WITHVALUES)
        .key(key)
        .arg(count)
        .arg("WITHVALUES")
}

/// One step of a field iteration
pub fn hscan(key: &str, cursor: u64, args: &ScanArgs) -> Cmd {
    args.apply(Cmd::new(&registry::HSCAN).key(key).arg(cursor))
}

/// `HSET key field value [field value ...]`
pub fn hset<V: Into<Arg> + Clone>(key: &str, pairs: &[(&str, V)]) -> Cmd {
    pairs
        .iter()
        .fold(Cmd::new(&registry::HSET).key(key), |cmd, (f, v)| {
            cmd.arg(*f).arg(v.clone())
        })
}

/// Set a field only if it does not exist
pub fn hsetnx(key: &str, field: impl Into<Arg>, value: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::HSETNX).key(key).arg(field).arg(value)
}

/// Length of a field's value
pub fn hstrlen(key: &str, field: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::HSTRLEN).key(key).arg(field)
}

/// Remaining field lifetimes, second precision
pub fn httl<V: Into<Arg> + Clone>(key: &str, fields: &[V]) -> Cmd {
    with_fields(Cmd::new(&registry::HTTL).key(key), fields)
}

/// Every value
pub fn hvals(key: &str) -> Cmd {
    Cmd::new(&registry::HVALS).key(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hset_pairs() {
        let cmd = hset("h", &[("a", 1), ("b", 2)]);
        assert_eq!(cmd.to_string(), "HSET h a 1 b 2");
        assert_eq!(cmd.key_count(), 1);
    }

    #[test]
    fn test_field_expirations() {
        assert_eq!(
            hexpire("h", Duration::from_secs(30), ExpireCondition::Nx, &["a", "b"]).to_string(),
            "HEXPIRE h 30 NX FIELDS 2 a b"
        );
        assert_eq!(
            hpexpire("h", Duration::from_millis(250), ExpireCondition::Always, &["a"])
                .to_string(),
            "HPEXPIRE h 250 FIELDS 1 a"
        );
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            hexpire_at("h", at, ExpireCondition::Gt, &["a"]).to_string(),
            "HEXPIREAT h 1700000000 GT FIELDS 1 a"
        );
        assert_eq!(httl("h", &["a"]).to_string(), "HTTL h FIELDS 1 a");
    }

    #[test]
    fn test_hrandfield() {
        assert_eq!(
            hrandfield_withvalues("h", -3).to_string(),
            "HRANDFIELD h -3 WITHVALUES"
        );
    }
}
