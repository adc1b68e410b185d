//! Command identifiers
//!
//! Every request the client sends carries a [`CommandId`]: the Redis verb it
//! starts with, an optional fixed sub-command (`SCRIPT LOAD`, `XGROUP CREATE`),
//! and the attributes handlers and the dispatcher look at. The table is static;
//! identifiers are referenced by their constant (`registry::GET`) or looked up
//! by label.
//!
//! Variants that share a verb but are worth telling apart in metrics (single vs.
//! multi-key `EXISTS`, `SET NX`, `ZADD ... INCR`) get their own label.

use std::fmt;

/// Broad class of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Reads data, never modifies the keyspace
    Read,
    /// Modifies the keyspace
    Write,
    /// Server administration
    Admin,
    /// May block server-side waiting for data
    Blocking,
    /// Lua scripts and functions
    Scripting,
    /// Publish side of pub/sub
    PubSub,
    /// Connection-level commands
    Connection,
}

/// How many keys a command touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyed {
    /// No keys
    None,
    /// Exactly one key
    Single,
    /// Any number of keys
    Multi,
}

/// Identity and attributes of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId {
    /// Unique label, used for logs and metrics
    pub label: &'static str,
    /// Redis verb written first on the wire
    pub name: &'static str,
    /// Fixed sub-command written right after the verb
    pub sub: Option<&'static str>,
    /// Command class
    pub category: Category,
    /// Key cardinality
    pub keyed: Keyed,
    /// Whether a cache view exposes it
    pub cacheable: bool,
}

impl CommandId {
    /// Whether the command may modify the keyspace
    pub fn is_write(&self) -> bool {
        matches!(self.category, Category::Write | Category::Blocking)
            || (self.category == Category::Scripting
                && self.keyed == Keyed::Multi
                && !self.name.ends_with("_RO"))
    }

    /// Whether the command takes more than one key
    pub fn is_multi_key(&self) -> bool {
        self.keyed == Keyed::Multi
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Look up an identifier by its label
pub fn lookup(label: &str) -> Option<&'static CommandId> {
    ALL.iter().copied().find(|id| id.label == label)
}

macro_rules! command_ids {
    (@sub) => { None };
    (@sub $sub:literal) => { Some($sub) };
    (@cache) => { false };
    (@cache cacheable) => { true };
    ($( $ident:ident => $name:literal $([$sub:literal])?, $category:ident, $keyed:ident $(, $cache:ident)?; )*) => {
        $(
            #[doc = concat!("`", stringify!($ident), "`")]
            pub const $ident: CommandId = CommandId {
                label: stringify!($ident),
                name: $name,
                sub: command_ids!(@sub $($sub)?),
                category: Category::$category,
                keyed: Keyed::$keyed,
                cacheable: command_ids!(@cache $($cache)?),
            };
        )*

        /// Every identifier known to the client
        pub static ALL: &[&CommandId] = &[$(&$ident),*];
    };
}

command_ids! {
    // strings
    APPEND => "APPEND", Write, Single;
    DECR => "DECR", Write, Single;
    DECRBY => "DECRBY", Write, Single;
    GET => "GET", Read, Single, cacheable;
    GETDEL => "GETDEL", Write, Single;
    GETEX => "GETEX", Write, Single;
    GETRANGE => "GETRANGE", Read, Single, cacheable;
    GETSET => "GETSET", Write, Single;
    INCR => "INCR", Write, Single;
    INCRBY => "INCRBY", Write, Single;
    INCRBYFLOAT => "INCRBYFLOAT", Write, Single;
    LCS => "LCS", Read, Multi;
    LCS_LEN => "LCS", Read, Multi;
    MGET => "MGET", Read, Multi, cacheable;
    MSET => "MSET", Write, Multi;
    MSETNX => "MSETNX", Write, Multi;
    SET => "SET", Write, Single;
    SET_NX => "SET", Write, Single;
    SET_XX => "SET", Write, Single;
    SET_ARGS => "SET", Write, Single;
    SETEX => "SETEX", Write, Single;
    SETRANGE => "SETRANGE", Write, Single;
    STRLEN => "STRLEN", Read, Single, cacheable;

    // lists
    BLMOVE => "BLMOVE", Blocking, Multi;
    BLMPOP => "BLMPOP", Blocking, Multi;
    BLPOP => "BLPOP", Blocking, Multi;
    BRPOP => "BRPOP", Blocking, Multi;
    BRPOPLPUSH => "BRPOPLPUSH", Blocking, Multi;
    LINDEX => "LINDEX", Read, Single, cacheable;
    LINSERT => "LINSERT", Write, Single;
    LLEN => "LLEN", Read, Single, cacheable;
    LMOVE => "LMOVE", Write, Multi;
    LMPOP => "LMPOP", Write, Multi;
    LPOP => "LPOP", Write, Single;
    LPOP_COUNT => "LPOP", Write, Single;
    LPOS => "LPOS", Read, Single, cacheable;
    LPOS_COUNT => "LPOS", Read, Single, cacheable;
    LPUSH => "LPUSH", Write, Single;
    LPUSH_MULTI => "LPUSH", Write, Single;
    LPUSHX => "LPUSHX", Write, Single;
    LRANGE => "LRANGE", Read, Single, cacheable;
    LREM => "LREM", Write, Single;
    LSET => "LSET", Write, Single;
    LTRIM => "LTRIM", Write, Single;
    RPOP => "RPOP", Write, Single;
    RPOP_COUNT => "RPOP", Write, Single;
    RPOPLPUSH => "RPOPLPUSH", Write, Multi;
    RPUSH => "RPUSH", Write, Single;
    RPUSH_MULTI => "RPUSH", Write, Single;
    RPUSHX => "RPUSHX", Write, Single;

    // sets
    SADD => "SADD", Write, Single;
    SADD_MULTI => "SADD", Write, Single;
    SCARD => "SCARD", Read, Single, cacheable;
    SDIFF => "SDIFF", Read, Multi;
    SDIFFSTORE => "SDIFFSTORE", Write, Multi;
    SINTER => "SINTER", Read, Multi;
    SINTERCARD => "SINTERCARD", Read, Multi;
    SINTERSTORE => "SINTERSTORE", Write, Multi;
    SISMEMBER => "SISMEMBER", Read, Single, cacheable;
    SMEMBERS => "SMEMBERS", Read, Single, cacheable;
    SMISMEMBER => "SMISMEMBER", Read, Single, cacheable;
    SMOVE => "SMOVE", Write, Multi;
    SPOP => "SPOP", Write, Single;
    SPOP_COUNT => "SPOP", Write, Single;
    SRANDMEMBER => "SRANDMEMBER", Read, Single;
    SRANDMEMBER_COUNT => "SRANDMEMBER", Read, Single;
    SREM => "SREM", Write, Single;
    SSCAN => "SSCAN", Read, Single;
    SUNION => "SUNION", Read, Multi;
    SUNIONSTORE => "SUNIONSTORE", Write, Multi;

    // sorted sets
    BZMPOP => "BZMPOP", Blocking, Multi;
    BZPOPMAX => "BZPOPMAX", Blocking, Multi;
    BZPOPMIN => "BZPOPMIN", Blocking, Multi;
    ZADD => "ZADD", Write, Single;
    ZADD_MULTI => "ZADD", Write, Single;
    ZADD_INCR => "ZADD", Write, Single;
    ZCARD => "ZCARD", Read, Single, cacheable;
    ZCOUNT => "ZCOUNT", Read, Single, cacheable;
    ZDIFF => "ZDIFF", Read, Multi;
    ZDIFF_WITHSCORES => "ZDIFF", Read, Multi;
    ZDIFFSTORE => "ZDIFFSTORE", Write, Multi;
    ZINCRBY => "ZINCRBY", Write, Single;
    ZINTER => "ZINTER", Read, Multi;
    ZINTER_WITHSCORES => "ZINTER", Read, Multi;
    ZINTERCARD => "ZINTERCARD", Read, Multi;
    ZINTERSTORE => "ZINTERSTORE", Write, Multi;
    ZLEXCOUNT => "ZLEXCOUNT", Read, Single, cacheable;
    ZMPOP => "ZMPOP", Write, Multi;
    ZMSCORE => "ZMSCORE", Read, Single, cacheable;
    ZPOPMAX => "ZPOPMAX", Write, Single;
    ZPOPMIN => "ZPOPMIN", Write, Single;
    ZRANDMEMBER => "ZRANDMEMBER", Read, Single;
    ZRANDMEMBER_WITHSCORES => "ZRANDMEMBER", Read, Single;
    ZRANGE => "ZRANGE", Read, Single, cacheable;
    ZRANGE_WITHSCORES => "ZRANGE", Read, Single, cacheable;
    ZRANGEBYLEX => "ZRANGEBYLEX", Read, Single, cacheable;
    ZRANGEBYSCORE => "ZRANGEBYSCORE", Read, Single, cacheable;
    ZRANGEBYSCORE_WITHSCORES => "ZRANGEBYSCORE", Read, Single, cacheable;
    ZRANGESTORE => "ZRANGESTORE", Write, Multi;
    ZRANK => "ZRANK", Read, Single, cacheable;
    ZREM => "ZREM", Write, Single;
    ZREMRANGEBYLEX => "ZREMRANGEBYLEX", Write, Single;
    ZREMRANGEBYRANK => "ZREMRANGEBYRANK", Write, Single;
    ZREMRANGEBYSCORE => "ZREMRANGEBYSCORE", Write, Single;
    ZREVRANGE => "ZREVRANGE", Read, Single, cacheable;
    ZREVRANGE_WITHSCORES => "ZREVRANGE", Read, Single, cacheable;
    ZREVRANGEBYLEX => "ZREVRANGEBYLEX", Read, Single;
    ZREVRANGEBYSCORE => "ZREVRANGEBYSCORE", Read, Single, cacheable;
    ZREVRANGEBYSCORE_WITHSCORES => "ZREVRANGEBYSCORE", Read, Single, cacheable;
    ZREVRANK => "ZREVRANK", Read, Single, cacheable;
    ZSCAN => "ZSCAN", Read, Single;
    ZSCORE => "ZSCORE", Read, Single, cacheable;
    ZUNION => "ZUNION", Read, Multi;
    ZUNION_WITHSCORES => "ZUNION", Read, Multi;
    ZUNIONSTORE => "ZUNIONSTORE", Write, Multi;

    // hashes
    HDEL => "HDEL", Write, Single;
    HDEL_MULTI => "HDEL", Write, Single;
    HEXISTS => "HEXISTS", Read, Single, cacheable;
    HEXPIRE => "HEXPIRE", Write, Single;
    HEXPIREAT => "HEXPIREAT", Write, Single;
    HGET => "HGET", Read, Single, cacheable;
    HGETALL => "HGETALL", Read, Single, cacheable;
    HINCRBY => "HINCRBY", Write, Single;
    HINCRBYFLOAT => "HINCRBYFLOAT", Write, Single;
    HKEYS => "HKEYS", Read, Single, cacheable;
    HLEN => "HLEN", Read, Single, cacheable;
    HMGET => "HMGET", Read, Single, cacheable;
    HMSET => "HMSET", Write, Single;
    HPERSIST => "HPERSIST", Write, Single;
    HPEXPIRE => "HPEXPIRE", Write, Single;
    HPEXPIREAT => "HPEXPIREAT", Write, Single;
    HPTTL => "HPTTL", Read, Single;
    HRANDFIELD => "HRANDFIELD", Read, Single;
    HRANDFIELD_WITHVALUES => "HRANDFIELD", Read, Single;
    HSCAN => "HSCAN", Read, Single;
    HSET => "HSET", Write, Single;
    HSETNX => "HSETNX", Write, Single;
    HSTRLEN => "HSTRLEN", Read, Single, cacheable;
    HTTL => "HTTL", Read, Single;
    HVALS => "HVALS", Read, Single, cacheable;

    // streams
    XACK => "XACK", Write, Single;
    XADD => "XADD", Write, Single;
    XAUTOCLAIM => "XAUTOCLAIM", Write, Single;
    XAUTOCLAIM_JUSTID => "XAUTOCLAIM", Write, Single;
    XCLAIM => "XCLAIM", Write, Single;
    XCLAIM_JUSTID => "XCLAIM", Write, Single;
    XDEL => "XDEL", Write, Single;
    XGROUP_CREATE => "XGROUP" ["CREATE"], Write, Single;
    XGROUP_CREATECONSUMER => "XGROUP" ["CREATECONSUMER"], Write, Single;
    XGROUP_DELCONSUMER => "XGROUP" ["DELCONSUMER"], Write, Single;
    XGROUP_DESTROY => "XGROUP" ["DESTROY"], Write, Single;
    XGROUP_SETID => "XGROUP" ["SETID"], Write, Single;
    XLEN => "XLEN", Read, Single;
    XPENDING => "XPENDING", Read, Single;
    XPENDING_EXT => "XPENDING", Read, Single;
    XRANGE => "XRANGE", Read, Single;
    XREAD => "XREAD", Read, Multi;
    XREADGROUP => "XREADGROUP", Write, Multi;
    XREVRANGE => "XREVRANGE", Read, Single;
    XTRIM => "XTRIM", Write, Single;

    // geo
    GEOADD => "GEOADD", Write, Single;
    GEODIST => "GEODIST", Read, Single, cacheable;
    GEOHASH => "GEOHASH", Read, Single, cacheable;
    GEOPOS => "GEOPOS", Read, Single, cacheable;
    GEORADIUS => "GEORADIUS", Write, Single;
    GEORADIUS_RO => "GEORADIUS_RO", Read, Single, cacheable;
    GEORADIUS_STORE => "GEORADIUS", Write, Multi;
    GEORADIUSBYMEMBER => "GEORADIUSBYMEMBER", Write, Single;
    GEORADIUSBYMEMBER_RO => "GEORADIUSBYMEMBER_RO", Read, Single, cacheable;
    GEORADIUSBYMEMBER_STORE => "GEORADIUSBYMEMBER", Write, Multi;
    GEOSEARCH => "GEOSEARCH", Read, Single, cacheable;
    GEOSEARCHSTORE => "GEOSEARCHSTORE", Write, Multi;

    // bitmaps
    BITCOUNT => "BITCOUNT", Read, Single, cacheable;
    BITFIELD => "BITFIELD", Write, Single;
    BITOP => "BITOP", Write, Multi;
    BITPOS => "BITPOS", Read, Single, cacheable;
    GETBIT => "GETBIT", Read, Single, cacheable;
    SETBIT => "SETBIT", Write, Single;

    // hyperloglog
    PFADD => "PFADD", Write, Single;
    PFCOUNT => "PFCOUNT", Read, Multi;
    PFMERGE => "PFMERGE", Write, Multi;

    // generic keyspace
    COPY => "COPY", Write, Multi;
    DEL => "DEL", Write, Single;
    DEL_MULTI => "DEL", Write, Multi;
    DUMP => "DUMP", Read, Single;
    EXISTS => "EXISTS", Read, Single, cacheable;
    EXISTS_MULTI => "EXISTS", Read, Multi, cacheable;
    EXPIRE => "EXPIRE", Write, Single;
    EXPIREAT => "EXPIREAT", Write, Single;
    EXPIRETIME => "EXPIRETIME", Read, Single, cacheable;
    KEYS => "KEYS", Read, None;
    MOVE => "MOVE", Write, Single;
    OBJECT_ENCODING => "OBJECT" ["ENCODING"], Read, Single;
    OBJECT_FREQ => "OBJECT" ["FREQ"], Read, Single;
    OBJECT_IDLETIME => "OBJECT" ["IDLETIME"], Read, Single;
    OBJECT_REFCOUNT => "OBJECT" ["REFCOUNT"], Read, Single;
    PERSIST => "PERSIST", Write, Single;
    PEXPIRE => "PEXPIRE", Write, Single;
    PEXPIREAT => "PEXPIREAT", Write, Single;
    PEXPIRETIME => "PEXPIRETIME", Read, Single, cacheable;
    PTTL => "PTTL", Read, Single, cacheable;
    RANDOMKEY => "RANDOMKEY", Read, None;
    RENAME => "RENAME", Write, Multi;
    RENAMENX => "RENAMENX", Write, Multi;
    RESTORE => "RESTORE", Write, Single;
    SCAN => "SCAN", Read, None;
    SORT => "SORT", Write, Single;
    SORT_RO => "SORT_RO", Read, Single, cacheable;
    SORT_STORE => "SORT", Write, Multi;
    TOUCH => "TOUCH", Write, Single;
    TOUCH_MULTI => "TOUCH", Write, Multi;
    TTL => "TTL", Read, Single, cacheable;
    TYPE => "TYPE", Read, Single, cacheable;
    UNLINK => "UNLINK", Write, Single;
    UNLINK_MULTI => "UNLINK", Write, Multi;
    WAIT => "WAIT", Blocking, None;

    // scripting
    EVAL => "EVAL", Scripting, Multi;
    EVAL_RO => "EVAL_RO", Scripting, Multi;
    EVALSHA => "EVALSHA", Scripting, Multi;
    EVALSHA_RO => "EVALSHA_RO", Scripting, Multi;
    FCALL => "FCALL", Scripting, Multi;
    FCALL_RO => "FCALL_RO", Scripting, Multi;
    FUNCTION_DELETE => "FUNCTION" ["DELETE"], Scripting, None;
    FUNCTION_FLUSH => "FUNCTION" ["FLUSH"], Scripting, None;
    FUNCTION_LOAD => "FUNCTION" ["LOAD"], Scripting, None;
    SCRIPT_EXISTS => "SCRIPT" ["EXISTS"], Scripting, None;
    SCRIPT_FLUSH => "SCRIPT" ["FLUSH"], Scripting, None;
    SCRIPT_KILL => "SCRIPT" ["KILL"], Scripting, None;
    SCRIPT_LOAD => "SCRIPT" ["LOAD"], Scripting, None;

    // server and connection
    BGREWRITEAOF => "BGREWRITEAOF", Admin, None;
    BGSAVE => "BGSAVE", Admin, None;
    CLIENT_GETNAME => "CLIENT" ["GETNAME"], Connection, None;
    CLIENT_ID => "CLIENT" ["ID"], Connection, None;
    CLIENT_LIST => "CLIENT" ["LIST"], Connection, None;
    CONFIG_GET => "CONFIG" ["GET"], Admin, None;
    CONFIG_RESETSTAT => "CONFIG" ["RESETSTAT"], Admin, None;
    CONFIG_REWRITE => "CONFIG" ["REWRITE"], Admin, None;
    CONFIG_SET => "CONFIG" ["SET"], Admin, None;
    DBSIZE => "DBSIZE", Admin, None;
    ECHO => "ECHO", Connection, None;
    FLUSHALL => "FLUSHALL", Admin, None;
    FLUSHALL_ASYNC => "FLUSHALL", Admin, None;
    FLUSHDB => "FLUSHDB", Admin, None;
    FLUSHDB_ASYNC => "FLUSHDB", Admin, None;
    INFO => "INFO", Admin, None;
    INFO_MULTI => "INFO", Admin, None;
    LASTSAVE => "LASTSAVE", Admin, None;
    MEMORY_USAGE => "MEMORY" ["USAGE"], Admin, Single;
    PING => "PING", Connection, None;
    SAVE => "SAVE", Admin, None;
    TIME => "TIME", Admin, None;

    // pub/sub
    PUBLISH => "PUBLISH", PubSub, None;
    PUBSUB_CHANNELS => "PUBSUB" ["CHANNELS"], PubSub, None;
    PUBSUB_NUMPAT => "PUBSUB" ["NUMPAT"], PubSub, None;
    PUBSUB_NUMSUB => "PUBSUB" ["NUMSUB"], PubSub, None;
    PUBSUB_SHARDCHANNELS => "PUBSUB" ["SHARDCHANNELS"], PubSub, None;
    SPUBLISH => "SPUBLISH", PubSub, Single;

    // batches
    PIPELINE => "PIPELINE", Write, Multi;
    EXEC => "EXEC", Write, Multi;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_unique() {
        let mut seen = HashSet::new();
        for id in ALL {
            assert!(seen.insert(id.label), "duplicate label {}", id.label);
        }
    }

    #[test]
    fn test_names_are_uppercase_verbs() {
        for id in ALL {
            assert_eq!(id.name, id.name.to_ascii_uppercase(), "{}", id.label);
            if let Some(sub) = id.sub {
                assert_eq!(sub, sub.to_ascii_uppercase(), "{}", id.label);
            }
        }
    }

    #[test]
    fn test_cacheable_commands_are_reads() {
        for id in ALL.iter().filter(|id| id.cacheable) {
            assert_eq!(id.category, Category::Read, "{}", id.label);
            assert!(!id.is_write());
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("GET"), Some(&GET));
        assert_eq!(lookup("EXISTS_MULTI").map(|id| id.keyed), Some(Keyed::Multi));
        assert_eq!(lookup("SCRIPT_LOAD").and_then(|id| id.sub), Some("LOAD"));
        assert!(lookup("NOPE").is_none());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(SET_NX.to_string(), "SET_NX");
        assert_eq!(SET_NX.name, "SET");
    }
}
