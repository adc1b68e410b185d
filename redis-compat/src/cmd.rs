//! Request objects
//!
//! A [`Cmd`] is the fully built argv of one command together with its
//! [`CommandId`] and the argv positions that hold keys. Builders in
//! [`crate::commands`] produce them; drivers only ever see `Cmd`s.

use crate::cluster::key_slot;
use crate::registry::{Category, CommandId};
use bytes::Bytes;
use redis_compat_core::Arg;
use std::fmt;

/// A built command
#[derive(Clone, PartialEq, Eq)]
pub struct Cmd {
    id: &'static CommandId,
    argv: Vec<Bytes>,
    keys: Vec<usize>,
}

impl Cmd {
    /// Start a command: writes the verb and the fixed sub-command, if any
    pub fn new(id: &'static CommandId) -> Self {
        let mut argv = Vec::with_capacity(4);
        argv.push(Bytes::from_static(id.name.as_bytes()));
        if let Some(sub) = id.sub {
            argv.push(Bytes::from_static(sub.as_bytes()));
        }
        Self {
            id,
            argv,
            keys: Vec::new(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.argv.push(arg.into().into_bytes());
        self
    }

    /// Append an argument when `cond` holds
    #[must_use]
    pub fn arg_if(self, cond: bool, arg: impl Into<Arg>) -> Self {
        if cond {
            self.arg(arg)
        } else {
            self
        }
    }

    /// Append every argument of an iterator
    #[must_use]
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.argv
            .extend(args.into_iter().map(|a| a.into().into_bytes()));
        self
    }

    /// Append a key
    #[must_use]
    pub fn key(mut self, key: impl Into<Arg>) -> Self {
        self.keys.push(self.argv.len());
        self.argv.push(key.into().into_bytes());
        self
    }

    /// Append every key of an iterator
    #[must_use]
    pub fn keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for key in keys {
            self = self.key(key);
        }
        self
    }

    /// The command identifier
    pub fn id(&self) -> &'static CommandId {
        self.id
    }

    /// The full argv, verb first
    pub fn argv(&self) -> &[Bytes] {
        &self.argv
    }

    /// Consume the command into its argv
    pub fn into_argv(self) -> Vec<Bytes> {
        self.argv
    }

    /// The keys this command touches, in argv order
    pub fn key_bytes(&self) -> impl Iterator<Item = &Bytes> + '_ {
        self.keys.iter().map(|&i| &self.argv[i])
    }

    /// The keys as text, invalid UTF-8 replaced
    pub fn key_strings(&self) -> Vec<String> {
        self.key_bytes()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .collect()
    }

    /// Number of keys
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Hash slot of the first key, `None` for keyless commands
    pub fn slot(&self) -> Option<u16> {
        self.key_bytes().next().map(key_slot)
    }

    /// Whether the server may hold the reply back waiting for data.
    ///
    /// True for the blocking category and for `XREAD` / `XREADGROUP` carrying
    /// a `BLOCK` option ahead of `STREAMS`.
    pub fn blocks(&self) -> bool {
        if self.id.category == Category::Blocking {
            return true;
        }
        if !matches!(self.id.name, "XREAD" | "XREADGROUP") {
            return false;
        }
        self.argv[1..]
            .iter()
            .take_while(|a| !a.eq_ignore_ascii_case(b"STREAMS"))
            .any(|a| a.eq_ignore_ascii_case(b"BLOCK"))
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv: Vec<_> = self
            .argv
            .iter()
            .map(|a| String::from_utf8_lossy(a))
            .collect();
        f.debug_struct("Cmd")
            .field("id", &self.id.label)
            .field("argv", &argv)
            .field("keys", &self.keys)
            .finish()
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", String::from_utf8_lossy(arg))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn test_builds_argv_with_sub_command() {
        let cmd = Cmd::new(&registry::SCRIPT_LOAD).arg("return 1");
        assert_eq!(cmd.to_string(), "SCRIPT LOAD return 1");
        assert_eq!(cmd.key_count(), 0);
        assert_eq!(cmd.slot(), None);
    }

    #[test]
    fn test_tracks_key_positions() {
        let cmd = Cmd::new(&registry::MSET)
            .key("a")
            .arg(1)
            .key("b")
            .arg(2.5)
            .arg_if(false, "skipped");
        assert_eq!(cmd.to_string(), "MSET a 1 b 2.5");
        assert_eq!(cmd.key_strings(), vec!["a", "b"]);
        assert_eq!(cmd.slot(), Some(key_slot("a")));
    }

    #[test]
    fn test_iterables() {
        let cmd = Cmd::new(&registry::DEL_MULTI).keys(["k1", "k2"]).args(Vec::<i64>::new());
        assert_eq!(cmd.argv().len(), 3);
        assert_eq!(cmd.key_count(), 2);
    }

    #[test]
    fn test_blocking_commands() {
        use crate::commands::{list, stream};
        use std::time::Duration;

        assert!(list::blpop(&["q"], Duration::from_secs(1)).blocks());
        assert!(!list::lpop("q").blocks());

        let read = stream::XReadArgs::default().stream("BLOCK", "0");
        assert!(!stream::xread(&read).blocks());
        let read = read.block(Duration::from_millis(100));
        assert!(stream::xread(&read).blocks());
    }
}
