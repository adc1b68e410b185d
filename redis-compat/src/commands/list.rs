//! List commands

use super::{block_timeout, with_count};
use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;
use std::time::Duration;

/// End of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Head
    Left,
    /// Tail
    Right,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// Where `LINSERT` puts the new element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the pivot
    Before,
    /// After the pivot
    After,
}

/// Options for `LPOS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LPosArgs {
    /// `RANK`: which match to return, negative searches from the tail
    pub rank: Option<i64>,
    /// `MAXLEN`: compare at most this many elements
    pub max_len: Option<i64>,
}

impl LPosArgs {
    fn apply(self, cmd: Cmd) -> Cmd {
        let cmd = match self.rank {
            Some(rank) => cmd.arg("RANK").arg(rank),
            None => cmd,
        };
        match self.max_len {
            Some(n) => cmd.arg("MAXLEN").arg(n),
            None => cmd,
        }
    }
}

/// Blocking `LMOVE`
pub fn blmove(source: &str, destination: &str, from: Side, to: Side, timeout: Duration) -> Cmd {
    Cmd::new(&registry::BLMOVE)
        .key(source)
        .key(destination)
        .arg(from.as_str())
        .arg(to.as_str())
        .arg(block_timeout(timeout))
}

/// Blocking `LMPOP`
pub fn blmpop(timeout: Duration, keys: &[&str], side: Side, count: Option<i64>) -> Cmd {
    let cmd = Cmd::new(&registry::BLMPOP)
        .arg(block_timeout(timeout))
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg(side.as_str());
    with_count(cmd, count)
}

/// Blocking `LPOP` over several lists
pub fn blpop(keys: &[&str], timeout: Duration) -> Cmd {
    Cmd::new(&registry::BLPOP)
        .keys(keys.iter().copied())
        .arg(block_timeout(timeout))
}

/// Blocking `RPOP` over several lists
pub fn brpop(keys: &[&str], timeout: Duration) -> Cmd {
    Cmd::new(&registry::BRPOP)
        .keys(keys.iter().copied())
        .arg(block_timeout(timeout))
}

/// Blocking `RPOPLPUSH`
pub fn brpoplpush(source: &str, destination: &str, timeout: Duration) -> Cmd {
    Cmd::new(&registry::BRPOPLPUSH)
        .key(source)
        .key(destination)
        .arg(block_timeout(timeout))
}

/// Element at `index`
pub fn lindex(key: &str, index: i64) -> Cmd {
    Cmd::new(&registry::LINDEX).key(key).arg(index)
}

/// Insert `element` next to `pivot`
pub fn linsert(
    key: &str,
    position: InsertPosition,
    pivot: impl Into<Arg>,
    element: impl Into<Arg>,
) -> Cmd {
    let position = match position {
        InsertPosition::Before => "BEFORE",
        InsertPosition::After => "AFTER",
    };
    Cmd::new(&registry::LINSERT)
        .key(key)
        .arg(position)
        .arg(pivot)
        .arg(element)
}

/// Length of the list
pub fn llen(key: &str) -> Cmd {
    Cmd::new(&registry::LLEN).key(key)
}

/// Pop from one end of `source` and push to `destination`
pub fn lmove(source: &str, destination: &str, from: Side, to: Side) -> Cmd {
    Cmd::new(&registry::LMOVE)
        .key(source)
        .key(destination)
        .arg(from.as_str())
        .arg(to.as_str())
}

/// Pop up to `count` elements from the first non-empty list
pub fn lmpop(keys: &[&str], side: Side, count: Option<i64>) -> Cmd {
    let cmd = Cmd::new(&registry::LMPOP)
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg(side.as_str());
    with_count(cmd, count)
}

/// Pop the head
pub fn lpop(key: &str) -> Cmd {
    Cmd::new(&registry::LPOP).key(key)
}

/// Pop up to `count` elements from the head
pub fn lpop_count(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::LPOP_COUNT).key(key).arg(count)
}

/// Index of the first match
pub fn lpos(key: &str, element: impl Into<Arg>, args: LPosArgs) -> Cmd {
    args.apply(Cmd::new(&registry::LPOS).key(key).arg(element))
}

/// `LPOS ... COUNT n`; a count of zero returns every match
pub fn lpos_count(key: &str, element: impl Into<Arg>, count: i64, args: LPosArgs) -> Cmd {
    args.apply(
        Cmd::new(&registry::LPOS_COUNT)
            .key(key)
            .arg(element)
            .arg("COUNT")
            .arg(count),
    )
}

/// Prepend one element
pub fn lpush(key: &str, element: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::LPUSH).key(key).arg(element)
}

/// Prepend elements in order
pub fn lpush_multi<V: Into<Arg> + Clone>(key: &str, elements: &[V]) -> Cmd {
    Cmd::new(&registry::LPUSH_MULTI)
        .key(key)
        .args(elements.iter().cloned())
}

/// Prepend only if the list exists
pub fn lpushx<V: Into<Arg> + Clone>(key: &str, elements: &[V]) -> Cmd {
    Cmd::new(&registry::LPUSHX)
        .key(key)
        .args(elements.iter().cloned())
}

/// Elements between `start` and `stop`, inclusive
pub fn lrange(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::LRANGE).key(key).arg(start).arg(stop)
}

/// Remove up to `count` occurrences of `element`
pub fn lrem(key: &str, count: i64, element: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::LREM).key(key).arg(count).arg(element)
}

/// Overwrite the element at `index`
pub fn lset(key: &str, index: i64, element: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::LSET).key(key).arg(index).arg(element)
}

/// Keep only the given range
pub fn ltrim(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::LTRIM).key(key).arg(start).arg(stop)
}

/// Pop the tail
pub fn rpop(key: &str) -> Cmd {
    Cmd::new(&registry::RPOP).key(key)
}

/// Pop up to `count` elements from the tail
pub fn rpop_count(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::RPOP_COUNT).key(key).arg(count)
}

/// Move the tail of `source` to the head of `destination`
pub fn rpoplpush(source: &str, destination: &str) -> Cmd {
    Cmd::new(&registry::RPOPLPUSH).key(source).key(destination)
}

/// Append one element
pub fn rpush(key: &str, element: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::RPUSH).key(key).arg(element)
}

/// Append elements in order
pub fn rpush_multi<V: Into<Arg> + Clone>(key: &str, elements: &[V]) -> Cmd {
    Cmd::new(&registry::RPUSH_MULTI)
        .key(key)
        .args(elements.iter().cloned())
}

/// Append only if the list exists
pub fn rpushx<V: Into<Arg> + Clone>(key: &str, elements: &[V]) -> Cmd {
    Cmd::new(&registry::RPUSHX)
        .key(key)
        .args(elements.iter().cloned())
}
