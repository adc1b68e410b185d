//! Sorted set commands

use super::{block_timeout, generic::ScanArgs, with_count, Limit, MinMax};
use crate::cmd::Cmd;
use crate::registry::{self, CommandId};
use crate::types::Z;
use redis_compat_core::Arg;
use std::time::Duration;

/// Options for `ZADD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZAddArgs {
    /// `NX`: only add new members
    pub nx: bool,
    /// `XX`: only update existing members
    pub xx: bool,
    /// `GT`: only update when the new score is greater
    pub gt: bool,
    /// `LT`: only update when the new score is less
    pub lt: bool,
    /// `CH`: count changed members, not only added ones
    pub ch: bool,
}

impl ZAddArgs {
    fn apply(self, cmd: Cmd) -> Cmd {
        assert!(!(self.nx && self.xx), "ZADD: NX and XX are mutually exclusive");
        assert!(!(self.gt && self.lt), "ZADD: GT and LT are mutually exclusive");
        assert!(
            !(self.nx && (self.gt || self.lt)),
            "ZADD: NX cannot be combined with GT or LT"
        );
        cmd.arg_if(self.nx, "NX")
            .arg_if(self.xx, "XX")
            .arg_if(self.gt, "GT")
            .arg_if(self.lt, "LT")
            .arg_if(self.ch, "CH")
    }
}

/// How `ZRANGE` interprets `start` / `stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZRangeBy {
    /// Zero-based ranks
    #[default]
    Rank,
    /// Scores; bounds accept `(` exclusion and `-inf` / `+inf`
    Score,
    /// Lexicographic; bounds use `[` / `(` and `-` / `+`
    Lex,
}

/// Arguments of the unified `ZRANGE` / `ZRANGESTORE`
#[derive(Debug, Clone, PartialEq)]
pub struct ZRangeArgs {
    /// Sorted set key
    pub key: String,
    /// Lower bound (or upper, when `rev` is set and the range is by score/lex)
    pub start: Arg,
    /// Upper bound
    pub stop: Arg,
    /// Range kind
    pub by: ZRangeBy,
    /// `REV`
    pub rev: bool,
    /// `LIMIT offset count`, only valid by score or lex
    pub limit: Option<Limit>,
}

impl ZRangeArgs {
    /// A rank range
    pub fn new(key: impl Into<String>, start: impl Into<Arg>, stop: impl Into<Arg>) -> Self {
        Self {
            key: key.into(),
            start: start.into(),
            stop: stop.into(),
            by: ZRangeBy::Rank,
            rev: false,
            limit: None,
        }
    }

    /// Interpret bounds as scores
    #[must_use]
    pub fn by_score(mut self) -> Self {
        self.by = ZRangeBy::Score;
        self
    }

    /// Interpret bounds lexicographically
    #[must_use]
    pub fn by_lex(mut self) -> Self {
        self.by = ZRangeBy::Lex;
        self
    }

    /// Reverse order
    #[must_use]
    pub fn rev(mut self) -> Self {
        self.rev = true;
        self
    }

    /// Page through the result
    #[must_use]
    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.limit = Some(Limit::new(offset, count));
        self
    }

    fn apply(&self, cmd: Cmd) -> Cmd {
        let cmd = cmd.arg(&self.start).arg(&self.stop);
        let cmd = match self.by {
            ZRangeBy::Rank => cmd,
            ZRangeBy::Score => cmd.arg("BYSCORE"),
            ZRangeBy::Lex => cmd.arg("BYLEX"),
        };
        let cmd = cmd.arg_if(self.rev, "REV");
        match self.limit {
            Some(limit) => {
                assert!(
                    self.by != ZRangeBy::Rank,
                    "ZRANGE: LIMIT requires BYSCORE or BYLEX"
                );
                limit.apply(cmd)
            }
            None => cmd,
        }
    }
}

/// `AGGREGATE` of the set algebra commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    /// Server default
    #[default]
    Sum,
    /// Smallest score
    Min,
    /// Largest score
    Max,
}

/// Inputs of `ZINTER`, `ZUNION` and their `STORE` variants
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZStore {
    /// Input keys
    pub keys: Vec<String>,
    /// `WEIGHTS`, one per key when non-empty
    pub weights: Vec<f64>,
    /// `AGGREGATE`; `Sum` is sent only when set explicitly with weights
    pub aggregate: Option<Aggregate>,
}

impl ZStore {
    /// Combine these keys with default weights
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Per-key weights
    #[must_use]
    pub fn weights(mut self, weights: impl Into<Vec<f64>>) -> Self {
        self.weights = weights.into();
        self
    }

    /// Score aggregation
    #[must_use]
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    fn apply(&self, cmd: Cmd) -> Cmd {
        let mut cmd = cmd.arg(self.keys.len()).keys(self.keys.iter());
        if !self.weights.is_empty() {
            cmd = cmd.arg("WEIGHTS").args(self.weights.iter().copied());
        }
        match self.aggregate {
            Some(Aggregate::Sum) => cmd.arg("AGGREGATE").arg("SUM"),
            Some(Aggregate::Min) => cmd.arg("AGGREGATE").arg("MIN"),
            Some(Aggregate::Max) => cmd.arg("AGGREGATE").arg("MAX"),
            None => cmd,
        }
    }
}

fn score_members(cmd: Cmd, members: &[Z]) -> Cmd {
    members
        .iter()
        .fold(cmd, |cmd, z| cmd.arg(z.score).arg(z.member.as_str()))
}

/// Blocking `ZMPOP`
pub fn bzmpop(timeout: Duration, order: MinMax, keys: &[&str], count: Option<i64>) -> Cmd {
    let cmd = Cmd::new(&registry::BZMPOP)
        .arg(block_timeout(timeout))
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg(order.as_str());
    with_count(cmd, count)
}

/// Blocking `ZPOPMAX` over several sets
pub fn bzpopmax(timeout: Duration, keys: &[&str]) -> Cmd {
    Cmd::new(&registry::BZPOPMAX)
        .keys(keys.iter().copied())
        .arg(block_timeout(timeout))
}

/// Blocking `ZPOPMIN` over several sets
pub fn bzpopmin(timeout: Duration, keys: &[&str]) -> Cmd {
    Cmd::new(&registry::BZPOPMIN)
        .keys(keys.iter().copied())
        .arg(block_timeout(timeout))
}

/// Add or update one member
pub fn zadd(key: &str, member: Z) -> Cmd {
    score_members(Cmd::new(&registry::ZADD).key(key), std::slice::from_ref(&member))
}

/// `ZADD key [NX|XX] [GT|LT] [CH] score member...`
pub fn zadd_args(key: &str, args: ZAddArgs, members: &[Z]) -> Cmd {
    score_members(args.apply(Cmd::new(&registry::ZADD_MULTI).key(key)), members)
}

/// `ZADD key [NX|XX] [GT|LT] INCR score member`; replies with the new score
pub fn zadd_incr(key: &str, args: ZAddArgs, member: Z) -> Cmd {
    let cmd = args.apply(Cmd::new(&registry::ZADD_INCR).key(key)).arg("INCR");
    score_members(cmd, std::slice::from_ref(&member))
}

/// Number of members
pub fn zcard(key: &str) -> Cmd {
    Cmd::new(&registry::ZCARD).key(key)
}

/// Members with a score between `min` and `max`
pub fn zcount(key: &str, min: impl Into<Arg>, max: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ZCOUNT).key(key).arg(min).arg(max)
}

/// Members of the first set missing from the others
pub fn zdiff(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::ZDIFF)
        .arg(keys.len())
        .keys(keys.iter().copied())
}

/// `ZDIFF` with scores
pub fn zdiff_withscores(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::ZDIFF_WITHSCORES)
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg("WITHSCORES")
}

/// Store `ZDIFF` into `destination`
pub fn zdiff_store(destination: &str, keys: &[&str]) -> Cmd {
    Cmd::new(&registry::ZDIFFSTORE)
        .key(destination)
        .arg(keys.len())
        .keys(keys.iter().copied())
}

/// Increment a member's score
pub fn zincr_by(key: &str, increment: f64, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ZINCRBY)
        .key(key)
        .arg(increment)
        .arg(member)
}

/// Intersection of sorted sets
pub fn zinter(store: &ZStore) -> Cmd {
    store.apply(Cmd::new(&registry::ZINTER))
}

/// `ZINTER` with scores
pub fn zinter_withscores(store: &ZStore) -> Cmd {
    store
        .apply(Cmd::new(&registry::ZINTER_WITHSCORES))
        .arg("WITHSCORES")
}

/// Size of the intersection, stopping at `limit` when non-zero
pub fn zinter_card(keys: &[&str], limit: i64) -> Cmd {
    Cmd::new(&registry::ZINTERCARD)
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg_if(limit > 0, "LIMIT")
        .args((limit > 0).then_some(limit))
}

/// Store `ZINTER` into `destination`
pub fn zinter_store(destination: &str, store: &ZStore) -> Cmd {
    store.apply(Cmd::new(&registry::ZINTERSTORE).key(destination))
}

/// Members between two lexicographic bounds
pub fn zlex_count(key: &str, min: &str, max: &str) -> Cmd {
    Cmd::new(&registry::ZLEXCOUNT).key(key).arg(min).arg(max)
}

/// Pop members from the first non-empty set
pub fn zmpop(order: MinMax, keys: &[&str], count: Option<i64>) -> Cmd {
    let cmd = Cmd::new(&registry::ZMPOP)
        .arg(keys.len())
        .keys(keys.iter().copied())
        .arg(order.as_str());
    with_count(cmd, count)
}

/// Scores of members
pub fn zmscore<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::ZMSCORE)
        .key(key)
        .args(members.iter().cloned())
}

/// Pop the highest scored members
pub fn zpopmax(key: &str, count: Option<i64>) -> Cmd {
    Cmd::new(&registry::ZPOPMAX).key(key).args(count)
}

/// Pop the lowest scored members
pub fn zpopmin(key: &str, count: Option<i64>) -> Cmd {
    Cmd::new(&registry::ZPOPMIN).key(key).args(count)
}

/// Random members
pub fn zrandmember(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::ZRANDMEMBER).key(key).arg(count)
}

/// Random members with scores
pub fn zrandmember_withscores(key: &str, count: i64) -> Cmd {
    Cmd::new(&registry::ZRANDMEMBER_WITHSCORES)
        .key(key)
        .arg(count)
        .arg("WITHSCORES")
}

/// Members by rank
pub fn zrange(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::ZRANGE).key(key).arg(start).arg(stop)
}

/// Members and scores by rank
pub fn zrange_withscores(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::ZRANGE_WITHSCORES)
        .key(key)
        .arg(start)
        .arg(stop)
        .arg("WITHSCORES")
}

/// `ZRANGE` with `BYSCORE` / `BYLEX` / `REV` / `LIMIT`
pub fn zrange_args(args: &ZRangeArgs) -> Cmd {
    args.apply(Cmd::new(&registry::ZRANGE).key(args.key.as_str()))
}

/// `ZRANGE` with full options and scores
pub fn zrange_args_withscores(args: &ZRangeArgs) -> Cmd {
    args.apply(Cmd::new(&registry::ZRANGE_WITHSCORES).key(args.key.as_str()))
        .arg("WITHSCORES")
}

/// Store a `ZRANGE` result into `destination`
pub fn zrange_store(destination: &str, args: &ZRangeArgs) -> Cmd {
    args.apply(
        Cmd::new(&registry::ZRANGESTORE)
            .key(destination)
            .key(args.key.as_str()),
    )
}

fn range_by(id: &'static CommandId, key: &str, min: Arg, max: Arg, limit: Option<Limit>) -> Cmd {
    let cmd = Cmd::new(id).key(key).arg(min).arg(max);
    match limit {
        Some(limit) => limit.apply(cmd),
        None => cmd,
    }
}

/// Members between two lexicographic bounds
pub fn zrange_by_lex(key: &str, min: &str, max: &str, limit: Option<Limit>) -> Cmd {
    range_by(&registry::ZRANGEBYLEX, key, min.into(), max.into(), limit)
}

/// Members with a score between `min` and `max`
pub fn zrange_by_score(
    key: &str,
    min: impl Into<Arg>,
    max: impl Into<Arg>,
    limit: Option<Limit>,
) -> Cmd {
    range_by(&registry::ZRANGEBYSCORE, key, min.into(), max.into(), limit)
}

/// `ZRANGEBYSCORE` with scores
pub fn zrange_by_score_withscores(
    key: &str,
    min: impl Into<Arg>,
    max: impl Into<Arg>,
    limit: Option<Limit>,
) -> Cmd {
    // WITHSCORES must precede LIMIT
    let cmd = Cmd::new(&registry::ZRANGEBYSCORE_WITHSCORES)
        .key(key)
        .arg(min)
        .arg(max)
        .arg("WITHSCORES");
    match limit {
        Some(limit) => limit.apply(cmd),
        None => cmd,
    }
}

/// Rank of a member
pub fn zrank(key: &str, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ZRANK).key(key).arg(member)
}

/// Remove members
pub fn zrem<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::ZREM)
        .key(key)
        .args(members.iter().cloned())
}

/// Remove members between two lexicographic bounds
pub fn zrem_range_by_lex(key: &str, min: &str, max: &str) -> Cmd {
    Cmd::new(&registry::ZREMRANGEBYLEX).key(key).arg(min).arg(max)
}

/// Remove members within a rank range
pub fn zrem_range_by_rank(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::ZREMRANGEBYRANK)
        .key(key)
        .arg(start)
        .arg(stop)
}

/// Remove members within a score range
pub fn zrem_range_by_score(key: &str, min: impl Into<Arg>, max: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ZREMRANGEBYSCORE)
        .key(key)
        .arg(min)
        .arg(max)
}

/// Members by rank, highest first
pub fn zrev_range(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::ZREVRANGE).key(key).arg(start).arg(stop)
}

/// `ZREVRANGE` with scores
pub fn zrev_range_withscores(key: &str, start: i64, stop: i64) -> Cmd {
    Cmd::new(&registry::ZREVRANGE_WITHSCORES)
        .key(key)
        .arg(start)
        .arg(stop)
        .arg("WITHSCORES")
}

/// Bounds are given high first: `max`, then `min`
pub fn zrev_range_by_lex(key: &str, max: &str, min: &str, limit: Option<Limit>) -> Cmd {
    range_by(&registry::ZREVRANGEBYLEX, key, max.into(), min.into(), limit)
}

/// Members with a score between `max` and `min`, highest first
pub fn zrev_range_by_score(
    key: &str,
    max: impl Into<Arg>,
    min: impl Into<Arg>,
    limit: Option<Limit>,
) -> Cmd {
    range_by(&registry::ZREVRANGEBYSCORE, key, max.into(), min.into(), limit)
}

/// `ZREVRANGEBYSCORE` with scores
pub fn zrev_range_by_score_withscores(
    key: &str,
    max: impl Into<Arg>,
    min: impl Into<Arg>,
    limit: Option<Limit>,
) -> Cmd {
    let cmd = Cmd::new(&registry::ZREVRANGEBYSCORE_WITHSCORES)
        .key(key)
        .arg(max)
        .arg(min)
        .arg("WITHSCORES");
    match limit {
        Some(limit) => limit.apply(cmd),
        None => cmd,
    }
}

/// Rank of a member counting from the highest score
pub fn zrev_rank(key: &str, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ZREVRANK).key(key).arg(member)
}

/// One step of a member iteration
pub fn zscan(key: &str, cursor: u64, args: &ScanArgs) -> Cmd {
    args.apply(Cmd::new(&registry::ZSCAN).key(key).arg(cursor))
}

/// Score of a member
pub fn zscore(key: &str, member: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ZSCORE).key(key).arg(member)
}

/// Union of sorted sets
pub fn zunion(store: &ZStore) -> Cmd {
    store.apply(Cmd::new(&registry::ZUNION))
}

/// `ZUNION` with scores
pub fn zunion_withscores(store: &ZStore) -> Cmd {
    store
        .apply(Cmd::new(&registry::ZUNION_WITHSCORES))
        .arg("WITHSCORES")
}

/// Store `ZUNION` into `destination`
pub fn zunion_store(destination: &str, store: &ZStore) -> Cmd {
    store.apply(Cmd::new(&registry::ZUNIONSTORE).key(destination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zadd_flags() {
        let args = ZAddArgs {
            xx: true,
            gt: true,
            ch: true,
            ..ZAddArgs::default()
        };
        assert_eq!(
            zadd_args("z", args, &[Z::new(1.0, "a"), Z::new(2.5, "b")]).to_string(),
            "ZADD z XX GT CH 1 a 2.5 b"
        );
        assert_eq!(
            zadd_incr("z", ZAddArgs::default(), Z::new(3.0, "a")).to_string(),
            "ZADD z INCR 3 a"
        );
    }

    #[test]
    #[should_panic(expected = "NX and XX")]
    fn test_zadd_nx_xx_panics() {
        let args = ZAddArgs {
            nx: true,
            xx: true,
            ..ZAddArgs::default()
        };
        let _ = zadd_args("z", args, &[Z::new(1.0, "a")]);
    }

    #[test]
    fn test_zrange_args() {
        let args = ZRangeArgs::new("z", "(1", "+inf").by_score().rev().limit(0, 10);
        assert_eq!(
            zrange_args(&args).to_string(),
            "ZRANGE z (1 +inf BYSCORE REV LIMIT 0 10"
        );
        let store = zrange_store("dst", &ZRangeArgs::new("z", 0, -1));
        assert_eq!(store.to_string(), "ZRANGESTORE dst z 0 -1");
        assert_eq!(store.key_count(), 2);
    }

    #[test]
    #[should_panic(expected = "LIMIT requires")]
    fn test_zrange_rank_limit_panics() {
        let _ = zrange_args(&ZRangeArgs::new("z", 0, -1).limit(0, 1));
    }

    #[test]
    fn test_set_algebra() {
        let store = ZStore::new(["a", "b"])
            .weights(vec![2.0, 1.0])
            .aggregate(Aggregate::Max);
        assert_eq!(
            zunion_store("dst", &store).to_string(),
            "ZUNIONSTORE dst 2 a b WEIGHTS 2 1 AGGREGATE MAX"
        );
        assert_eq!(
            zinter_withscores(&ZStore::new(["a", "b"])).to_string(),
            "ZINTER 2 a b WITHSCORES"
        );
    }

    #[test]
    fn test_infinite_scores() {
        assert_eq!(
            zcount("z", f64::NEG_INFINITY, f64::INFINITY).to_string(),
            "ZCOUNT z -inf +inf"
        );
        assert_eq!(
            zrange_by_score_withscores("z", "-inf", "+inf", Some(Limit::new(0, 2)))
                .to_string(),
            "ZRANGEBYSCORE z -inf +inf WITHSCORES LIMIT 0 2"
        );
    }

    #[test]
    fn test_blocking_pops() {
        assert_eq!(
            bzmpop(Duration::from_secs(1), MinMax::Max, &["a", "b"], Some(2)).to_string(),
            "BZMPOP 1 2 a b MAX COUNT 2"
        );
        assert_eq!(
            bzpopmin(Duration::ZERO, &["a"]).to_string(),
            "BZPOPMIN a 0"
        );
    }
}
