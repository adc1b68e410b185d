//! Typed command surface
//!
//! One async trait per command family. Every method has a default body that
//! builds the request with the matching [`commands`](crate::commands)
//! function, sends it through [`Client::execute`] and parses the reply, so
//! implementors only provide the [`Dispatch`] seam.
//!
//! [`Client`] implements every family and the aggregate [`Cmdable`];
//! [`CacheView`](crate::CacheView) implements only [`CacheableCommands`].

mod bitmap;
mod cacheable;
mod generic;
mod geo;
mod hash;
mod hyperloglog;
mod list;
mod pubsub;
mod scripting;
mod server;
mod set;
mod sorted_set;
mod stream;
mod string;

pub use bitmap::BitmapCommands;
pub use cacheable::CacheableCommands;
pub use generic::GenericCommands;
pub use geo::GeoCommands;
pub use hash::HashCommands;
pub use hyperloglog::HyperLogLogCommands;
pub use list::ListCommands;
pub use pubsub::PubSubCommands;
pub use scripting::ScriptingCommands;
pub use server::ServerCommands;
pub use set::SetCommands;
pub use sorted_set::SortedSetCommands;
pub use stream::StreamCommands;
pub use string::StringCommands;

use crate::client::Client;
use crate::cmd::Cmd;
use crate::context::Context;
use redis_compat_core::{RedisResult, RespValue};
use std::time::Duration;

/// Where typed commands are sent
pub trait Dispatch: Send + Sync {
    /// The client every call goes through
    fn client(&self) -> &Client;

    /// TTL hint for cacheable reads issued through this handle
    fn cache_ttl(&self) -> Option<Duration> {
        None
    }
}

impl Dispatch for Client {
    fn client(&self) -> &Client {
        self
    }
}

pub(crate) async fn run<D, T, P>(d: &D, ctx: &Context, cmd: Cmd, parse: P) -> RedisResult<T>
where
    D: Dispatch + ?Sized,
    P: FnOnce(RespValue) -> RedisResult<T>,
{
    d.client().execute(ctx, cmd, d.cache_ttl(), parse).await
}

/// Every command family
pub trait Cmdable:
    BitmapCommands
    + GenericCommands
    + GeoCommands
    + HashCommands
    + HyperLogLogCommands
    + ListCommands
    + PubSubCommands
    + ScriptingCommands
    + ServerCommands
    + SetCommands
    + SortedSetCommands
    + StreamCommands
    + StringCommands
{
}

impl BitmapCommands for Client {}
impl GenericCommands for Client {}
impl GeoCommands for Client {}
impl HashCommands for Client {}
impl HyperLogLogCommands for Client {}
impl ListCommands for Client {}
impl PubSubCommands for Client {}
impl ScriptingCommands for Client {}
impl ServerCommands for Client {}
impl SetCommands for Client {}
impl SortedSetCommands for Client {}
impl StreamCommands for Client {}
impl StringCommands for Client {}
impl Cmdable for Client {}
