//! Set commands

use super::generic::ScanArgs;
use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;

/// Add one member
pub fn sadd(key: &str, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::SADD).key(key).arg(member)
}

/// Add members
pub fn sadd_multi<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::SADD_MULTI)
        .key(key)
        .args(members.iter().cloned())
}

/// Number of members
pub fn scard(key: &str) -> Cmd {
    Cmd::new(&registry::SCARD).key(key)
}

/// Members of the first set missing from the others
pub fn sdiff(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::SDIFF).keys(keys.iter().copied())
}

/// Store `SDIFF` into `destination`
pub fn sdiff_store(destination: &str, keys: &[&str]) -> Cmd {
    Cmd::new(&registry::SDIFFSTORE)
        .key(destination)
        .keys(keys.iter().copied())
}

/// Members present in every set
pub fn sinter(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::SINTER).keys(keys.iter().copied())
}

/// `SINTERCARD numkeys key... [LIMIT n]`; a limit of zero means no limit
pub fn sinter_card(keys: &[&str], limit: i64) -> Cmd {
    Cmd::new(&registry::SINTERCARD)
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg_if(limit > 0, "LIMIT")
        .args((limit > 0).then_some(limit))
}

/// Store `SINTER` into `destination`
pub fn sinter_store(destination: &str, keys: &[&str]) -> Cmd {
    Cmd::new(&registry::SINTERSTORE)
        .key(destination)
        .keys(keys.iter().copied())
}

/// Whether `member` belongs to the set
pub fn sismember(key: &str, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::SISMEMBER).key(key).arg(member)
}

/// Every member
pub fn smembers(key: &str) -> Cmd {
    Cmd::new(&registry::SMEMBERS).key(key)
}

/// Membership of each given member
pub fn smismember<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::SMISMEMBER)
        .key(key)
        .args(members.iter().cloned())
}

/// Move a member between sets
pub fn smove(source: &str, destination: &str, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::SMOVE)
        .key(source)
        .key(destination)
        .arg(member)
}

/// Remove and return a random member
pub fn spop(key: &str) -> Cmd {
    Cmd::new(&registry::SPOP).key(key)
}

/// Remove and return up to `count` random members
pub fn spop_count(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::SPOP_COUNT).key(key).arg(count)
}

/// A random member
pub fn srandmember(key: &str) -> Cmd {
    Cmd::new(&registry::SRANDMEMBER).key(key)
}

/// Up to `count` random members
pub fn srandmember_count(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::SRANDMEMBER_COUNT).key(key).arg(count)
}

/// Remove members
pub fn srem<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::SREM)
        .key(key)
        .args(members.iter().cloned())
}

/// One step of a member iteration
pub fn sscan(key: &str, cursor: u64, args: &ScanArgs) -> Cmd {
    args.apply(Cmd::new(&registry::SSCAN).key(key).arg(cursor))
}

/// Members of any of the sets
pub fn sunion(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::SUNION).keys(keys.iter().copied())
}

/// Store `SUNION` into `destination`
pub fn sunion_store(destination: &str, keys: &[&str]) -> Cmd {
    Cmd::new(&registry::SUNIONSTORE)
        .key(destination)
        .keys(keys.iter().copied())
}
