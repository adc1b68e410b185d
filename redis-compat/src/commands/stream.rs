//! Stream commands

use super::with_count;
use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::types::format_ms;
use redis_compat_core::Arg;
use std::time::Duration;

/// Trimming strategy shared by `XADD` and `XTRIM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XTrim {
    /// `MAXLEN n`
    MaxLen(i64),
    /// `MINID id`
    MinId(String),
}

/// Options for `XTRIM`, and the trimming part of `XADD`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XTrimArgs {
    /// Threshold
    pub strategy: XTrim,
    /// `~`: allow Redis to trim approximately
    pub approx: bool,
    /// `LIMIT n`, only meaningful with `approx`
    pub limit: Option<i64>,
}

impl XTrimArgs {
    /// Trim to at most `n` entries
    pub fn max_len(n: i64) -> Self {
        Self {
            strategy: XTrim::MaxLen(n),
            approx: false,
            limit: None,
        }
    }

    /// Drop entries with ids below `id`
    pub fn min_id(id: impl Into<String>) -> Self {
        Self {
            strategy: XTrim::MinId(id.into()),
            approx: false,
            limit: None,
        }
    }

    /// Use the `~` approximate form
    #[must_use]
    pub fn approx(mut self) -> Self {
        self.approx = true;
        self
    }

    /// Cap the amount of work per call (`LIMIT`)
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn apply(&self, cmd: Cmd) -> Cmd {
        let cmd = match &self.strategy {
            XTrim::MaxLen(_) => cmd.arg("MAXLEN"),
            XTrim::MinId(_) => cmd.arg("MINID"),
        };
        let cmd = cmd.arg_if(self.approx, "~");
        let cmd = match &self.strategy {
            XTrim::MaxLen(n) => cmd.arg(*n),
            XTrim::MinId(id) => cmd.arg(id.as_str()),
        };
        match self.limit {
            Some(limit) => {
                assert!(self.approx, "XTRIM: LIMIT requires approximate (~) trimming");
                cmd.arg("LIMIT").arg(limit)
            }
            None => cmd,
        }
    }
}

/// Arguments of `XADD`
#[derive(Debug, Clone, PartialEq)]
pub struct XAddArgs {
    /// Stream key
    pub stream: String,
    /// `NOMKSTREAM`: do not create a missing stream
    pub no_mk_stream: bool,
    /// Optional trimming
    pub trim: Option<XTrimArgs>,
    /// Entry id, `*` for auto-generated
    pub id: String,
    /// Field/value pairs
    pub values: Vec<(String, Arg)>,
}

impl XAddArgs {
    /// Append an auto-id entry to `stream`
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            no_mk_stream: false,
            trim: None,
            id: "*".to_string(),
            values: Vec::new(),
        }
    }

    /// Explicit entry id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.values.push((field.into(), value.into()));
        self
    }

    /// Fail instead of creating the stream
    #[must_use]
    pub fn no_mk_stream(mut self) -> Self {
        self.no_mk_stream = true;
        self
    }

    /// Trim while adding
    #[must_use]
    pub fn trim(mut self, trim: XTrimArgs) -> Self {
        self.trim = Some(trim);
        self
    }
}

/// Arguments of `XREAD`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XReadArgs {
    /// Stream keys, each paired with the id to read after
    pub streams: Vec<(String, String)>,
    /// `COUNT`
    pub count: Option<i64>,
    /// `BLOCK`; `Some(Duration::ZERO)` blocks forever
    pub block: Option<Duration>,
}

impl XReadArgs {
    /// Read from one stream after `id`
    #[must_use]
    pub fn stream(mut self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.streams.push((key.into(), id.into()));
        self
    }

    /// Limit entries per stream
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Block up to `timeout` for new entries
    #[must_use]
    pub fn block(mut self, timeout: Duration) -> Self {
        self.block = Some(timeout);
        self
    }
}

/// Arguments of `XREADGROUP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XReadGroupArgs {
    /// Consumer group
    pub group: String,
    /// Consumer name
    pub consumer: String,
    /// Streams, counts and blocking, as for `XREAD`
    pub read: XReadArgs,
    /// `NOACK`
    pub no_ack: bool,
}

impl XReadGroupArgs {
    /// Read as `consumer` within `group`
    pub fn new(group: impl Into<String>, consumer: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            consumer: consumer.into(),
            read: XReadArgs::default(),
            no_ack: false,
        }
    }

    /// Read from one stream after `id` (`>` for new entries)
    #[must_use]
    pub fn stream(mut self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.read = self.read.stream(key, id);
        self
    }

    /// Limit entries per stream
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.read.count = Some(count);
        self
    }

    /// Block up to `timeout` for new entries
    #[must_use]
    pub fn block(mut self, timeout: Duration) -> Self {
        self.read.block = Some(timeout);
        self
    }

    /// Do not add entries to the pending list
    #[must_use]
    pub fn no_ack(mut self) -> Self {
        self.no_ack = true;
        self
    }
}

/// Arguments of `XCLAIM` and `XAUTOCLAIM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XClaimArgs {
    /// Stream key
    pub stream: String,
    /// Consumer group
    pub group: String,
    /// New owner
    pub consumer: String,
    /// Only claim entries idle for at least this long
    pub min_idle: Duration,
    /// Ids to claim (`XCLAIM`)
    pub ids: Vec<String>,
    /// Scan start (`XAUTOCLAIM`), `0-0` by default
    pub start: String,
    /// `COUNT` (`XAUTOCLAIM`)
    pub count: Option<i64>,
}

impl XClaimArgs {
    /// Claim for `consumer` in `group` on `stream`
    pub fn new(
        stream: impl Into<String>,
        group: impl Into<String>,
        consumer: impl Into<String>,
        min_idle: Duration,
    ) -> Self {
        Self {
            stream: stream.into(),
            group: group.into(),
            consumer: consumer.into(),
            min_idle,
            ids: Vec::new(),
            start: "0-0".to_string(),
            count: None,
        }
    }

    /// Entry ids to claim
    #[must_use]
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Scan start for `XAUTOCLAIM`
    #[must_use]
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    /// Entries per `XAUTOCLAIM` call
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    fn head(&self, cmd: Cmd) -> Cmd {
        cmd.key(self.stream.as_str())
            .arg(self.group.as_str())
            .arg(self.consumer.as_str())
            .arg(format_ms(self.min_idle))
    }
}

/// Arguments of the extended `XPENDING` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPendingExtArgs {
    /// Stream key
    pub stream: String,
    /// Consumer group
    pub group: String,
    /// `IDLE`: only entries idle at least this long
    pub idle: Option<Duration>,
    /// Range start id
    pub start: String,
    /// Range end id
    pub end: String,
    /// Maximum entries
    pub count: i64,
    /// Only entries owned by this consumer
    pub consumer: Option<String>,
}

impl XPendingExtArgs {
    /// Every pending entry of `group`, up to `count`
    pub fn new(stream: impl Into<String>, group: impl Into<String>, count: i64) -> Self {
        Self {
            stream: stream.into(),
            group: group.into(),
            idle: None,
            start: "-".to_string(),
            end: "+".to_string(),
            count,
            consumer: None,
        }
    }

    /// Id range
    #[must_use]
    pub fn range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    /// Minimum idle time
    #[must_use]
    pub fn idle(mut self, idle: Duration) -> Self {
        self.idle = Some(idle);
        self
    }

    /// Restrict to one consumer
    #[must_use]
    pub fn consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = Some(consumer.into());
        self
    }
}

/// Acknowledge entries
pub fn xack<V: Into<Arg> + Clone>(stream: &str, group: &str, ids: &[V]) -> Cmd {
    Cmd::new(&registry::XACK)
        .key(stream)
        .arg(group)
        .args(ids.iter().cloned())
}

/// Append an entry
pub fn xadd(args: &XAddArgs) -> Cmd {
    let cmd = Cmd::new(&registry::XADD)
        .key(args.stream.as_str())
        .arg_if(args.no_mk_stream, "NOMKSTREAM");
    let cmd = match &args.trim {
        Some(trim) => trim.apply(cmd),
        None => cmd,
    };
    args.values
        .iter()
        .fold(cmd.arg(args.id.as_str()), |cmd, (f, v)| {
            cmd.arg(f.as_str()).arg(v)
        })
}

/// Transfer idle pending entries to another consumer
pub fn xautoclaim(args: &XClaimArgs) -> Cmd {
    let cmd = args
        .head(Cmd::new(&registry::XAUTOCLAIM))
        .arg(args.start.as_str());
    with_count(cmd, args.count)
}

/// `XAUTOCLAIM` returning only ids
pub fn xautoclaim_justid(args: &XClaimArgs) -> Cmd {
    let cmd = args
        .head(Cmd::new(&registry::XAUTOCLAIM_JUSTID))
        .arg(args.start.as_str());
    with_count(cmd, args.count).arg("JUSTID")
}

/// Take ownership of pending entries
pub fn xclaim(args: &XClaimArgs) -> Cmd {
    args.head(Cmd::new(&registry::XCLAIM))
        .args(args.ids.iter())
}

/// `XCLAIM` returning only ids
pub fn xclaim_justid(args: &XClaimArgs) -> Cmd {
    args.head(Cmd::new(&registry::XCLAIM_JUSTID))
        .args(args.ids.iter())
        .arg("JUSTID")
}

/// Delete entries
pub fn xdel<V: Into<Arg> + Clone>(stream: &str, ids: &[V]) -> Cmd {
    Cmd::new(&registry::XDEL)
        .key(stream)
        .args(ids.iter().cloned())
}

/// `XGROUP CREATE stream group start [MKSTREAM]`
pub fn xgroup_create(stream: &str, group: &str, start: &str, mk_stream: bool) -> Cmd {
    Cmd::new(&registry::XGROUP_CREATE)
        .key(stream)
        .arg(group)
        .arg(start)
        .arg_if(mk_stream, "MKSTREAM")
}

/// Create a consumer
pub fn xgroup_create_consumer(stream: &str, group: &str, consumer: &str) -> Cmd {
    Cmd::new(&registry::XGROUP_CREATECONSUMER)
        .key(stream)
        .arg(group)
        .arg(consumer)
}

/// Delete a consumer from a group
pub fn xgroup_del_consumer(stream: &str, group: &str, consumer: &str) -> Cmd {
    Cmd::new(&registry::XGROUP_DELCONSUMER)
        .key(stream)
        .arg(group)
        .arg(consumer)
}

/// Destroy a consumer group
pub fn xgroup_destroy(stream: &str, group: &str) -> Cmd {
    Cmd::new(&registry::XGROUP_DESTROY).key(stream).arg(group)
}

/// Move the last delivered id of a group
pub fn xgroup_set_id(stream: &str, group: &str, start: &str) -> Cmd {
    Cmd::new(&registry::XGROUP_SETID)
        .key(stream)
        .arg(group)
        .arg(start)
}

/// Number of entries
pub fn xlen(stream: &str) -> Cmd {
    Cmd::new(&registry::XLEN).key(stream)
}

/// Summary of a group's pending entries
pub fn xpending(stream: &str, group: &str) -> Cmd {
    Cmd::new(&registry::XPENDING).key(stream).arg(group)
}

/// Pending entries in an id range
pub fn xpending_ext(args: &XPendingExtArgs) -> Cmd {
    let cmd = Cmd::new(&registry::XPENDING_EXT)
        .key(args.stream.as_str())
        .arg(args.group.as_str());
    let cmd = match args.idle {
        Some(idle) => cmd.arg("IDLE").arg(format_ms(idle)),
        None => cmd,
    };
    cmd.arg(args.start.as_str())
        .arg(args.end.as_str())
        .arg(args.count)
        .args(args.consumer.as_deref())
}

/// Entries between two ids
pub fn xrange(stream: &str, start: &str, stop: &str, count: Option<i64>) -> Cmd {
    with_count(
        Cmd::new(&registry::XRANGE).key(stream).arg(start).arg(stop),
        count,
    )
}

/// Entries between two ids, newest first
pub fn xrev_range(stream: &str, end: &str, start: &str, count: Option<i64>) -> Cmd {
    with_count(
        Cmd::new(&registry::XREVRANGE).key(stream).arg(end).arg(start),
        count,
    )
}

fn read_tail(cmd: Cmd, read: &XReadArgs) -> Cmd {
    assert!(!read.streams.is_empty(), "XREAD: at least one stream is required");
    let cmd = with_count(cmd, read.count);
    let cmd = match read.block {
        Some(block) => cmd.arg("BLOCK").arg(format_ms(block)),
        None => cmd,
    };
    cmd.arg("STREAMS")
        .keys(read.streams.iter().map(|(k, _)| k.as_str()))
        .args(read.streams.iter().map(|(_, id)| id.as_str()))
}

/// Read entries from one or more streams
pub fn xread(args: &XReadArgs) -> Cmd {
    read_tail(Cmd::new(&registry::XREAD), args)
}

/// Read as a member of a consumer group
pub fn xread_group(args: &XReadGroupArgs) -> Cmd {
    let cmd = Cmd::new(&registry::XREADGROUP)
        .arg("GROUP")
        .arg(args.group.as_str())
        .arg(args.consumer.as_str());
    let cmd = with_count(cmd, args.read.count);
    let cmd = match args.read.block {
        Some(block) => cmd.arg("BLOCK").arg(format_ms(block)),
        None => cmd,
    };
    let read = XReadArgs {
        count: None,
        block: None,
        ..args.read.clone()
    };
    read_tail(cmd.arg_if(args.no_ack, "NOACK"), &read)
}

/// Trim the stream
pub fn xtrim(stream: &str, args: &XTrimArgs) -> Cmd {
    args.apply(Cmd::new(&registry::XTRIM).key(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xadd_shapes() {
        let args = XAddArgs::new("s").field("a", 1).field("b", "x");
        assert_eq!(xadd(&args).to_string(), "XADD s * a 1 b x");

        let args = XAddArgs::new("s")
            .no_mk_stream()
            .trim(XTrimArgs::max_len(100).approx().limit(10))
            .id("1-1")
            .field("f", "v");
        assert_eq!(
            xadd(&args).to_string(),
            "XADD s NOMKSTREAM MAXLEN ~ 100 LIMIT 10 1-1 f v"
        );
    }

    #[test]
    fn test_xtrim() {
        assert_eq!(
            xtrim("s", &XTrimArgs::min_id("5-0")).to_string(),
            "XTRIM s MINID 5-0"
        );
    }

    #[test]
    #[should_panic(expected = "LIMIT requires")]
    fn test_xtrim_limit_without_approx_panics() {
        let _ = xtrim("s", &XTrimArgs::max_len(10).limit(5));
    }

    #[test]
    fn test_xread_keys_and_ids() {
        let args = XReadArgs::default()
            .stream("s1", "0")
            .stream("s2", "$")
            .count(5)
            .block(Duration::from_secs(1));
        let cmd = xread(&args);
        assert_eq!(cmd.to_string(), "XREAD COUNT 5 BLOCK 1000 STREAMS s1 s2 0 $");
        assert_eq!(cmd.key_strings(), vec!["s1", "s2"]);
    }

    #[test]
    fn test_xread_group() {
        let args = XReadGroupArgs::new("g", "c")
            .stream("s", ">")
            .count(1)
            .no_ack();
        assert_eq!(
            xread_group(&args).to_string(),
            "XREADGROUP GROUP g c COUNT 1 NOACK STREAMS s >"
        );
    }

    #[test]
    fn test_claims() {
        let args = XClaimArgs::new("s", "g", "c", Duration::from_secs(60)).ids(["1-0", "2-0"]);
        assert_eq!(xclaim(&args).to_string(), "XCLAIM s g c 60000 1-0 2-0");
        assert_eq!(
            xautoclaim_justid(&args.clone().count(10)).to_string(),
            "XAUTOCLAIM s g c 60000 0-0 COUNT 10 JUSTID"
        );
    }

    #[test]
    fn test_xpending_ext() {
        let args = XPendingExtArgs::new("s", "g", 10)
            .idle(Duration::from_millis(500))
            .consumer("c");
        assert_eq!(
            xpending_ext(&args).to_string(),
            "XPENDING s g IDLE 500 - + 10 c"
        );
    }

    #[test]
    fn test_xgroup() {
        assert_eq!(
            xgroup_create("s", "g", "$", true).to_string(),
            "XGROUP CREATE s g $ MKSTREAM"
        );
    }
}
