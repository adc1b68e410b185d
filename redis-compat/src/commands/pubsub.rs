//! Publish-side pub/sub commands

use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;

/// Publish `message` to `channel`
pub fn publish(channel: &str, message: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::PUBLISH).arg(channel).arg(message)
}

/// `SPUBLISH shardchannel message`; the channel hashes like a key
pub fn spublish(channel: &str, message: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::SPUBLISH).key(channel).arg(message)
}

/// `PUBSUB CHANNELS [pattern]`, an empty pattern listing every channel
pub fn pubsub_channels(pattern: &str) -> Cmd {
    Cmd::new(&registry::PUBSUB_CHANNELS).arg_if(!pattern.is_empty(), pattern)
}

/// Number of pattern subscriptions
pub fn pubsub_numpat() -> Cmd {
    Cmd::new(&registry::PUBSUB_NUMPAT)
}

/// Subscriber counts per channel
pub fn pubsub_numsub(channels: &[&str]) -> Cmd {
    Cmd::new(&registry::PUBSUB_NUMSUB).args(channels.iter().copied())
}

/// Active shard channels matching `pattern`
pub fn pubsub_shard_channels(pattern: &str) -> Cmd {
    Cmd::new(&registry::PUBSUB_SHARDCHANNELS).arg_if(!pattern.is_empty(), pattern)
}
