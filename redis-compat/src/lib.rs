//! Async Redis client with a typed command surface and per-call hooks
//!
//! `redis-compat` wraps a Redis connection behind one uniform dispatch path:
//! every typed command builds a [`Cmd`], is reported to a [`Handler`] before
//! and after it runs, is sent by a [`Driver`] under the caller's
//! [`Context`] deadline, and has its reply parsed into a Rust value.
//!
//! # Features
//!
//! - One async trait per command family, all implemented by [`Client`]
//! - Cacheable reads through [`Client::cache`] and a client-side cache
//! - [`Script`] with `EVALSHA` to `EVAL` fallback
//! - Slot-safe `MSET`/`MGET` fan-out for cluster deployments
//! - Pipelines and `MULTI`/`EXEC` transactions
//! - `tracing` instrumentation by default, pluggable via [`Handler`]
//!
//! # Quick Start
//!
//! ```no_run
//! use redis_compat::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect(ClientConfig::new("redis://localhost:6379")).await?;
//!     let ctx = Context::background();
//!
//!     client.set(&ctx, "mykey", "myvalue", KEEP_TTL).await?;
//!     let value = client.get(&ctx, "mykey").await.optional()?;
//!     println!("Value: {:?}", value);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::too_many_arguments)]

mod batch;
pub mod cache;
pub mod client;
pub mod client_cache;
pub mod cluster;
pub mod cmd;
pub mod cmdable;
pub mod commands;
pub mod connection;
pub mod context;
pub mod driver;
pub mod handler;
pub mod pipeline;
pub mod pool;
pub mod protocol;
pub mod registry;
pub mod reply;
pub mod script;
pub mod types;

pub use cache::CacheView;
pub use client::Client;
pub use cluster::key_slot;
pub use cmd::Cmd;
pub use cmdable::{
    BitmapCommands, CacheableCommands, Cmdable, Dispatch, GenericCommands, GeoCommands,
    HashCommands, HyperLogLogCommands, ListCommands, PubSubCommands, ScriptingCommands,
    ServerCommands, SetCommands, SortedSetCommands, StreamCommands, StringCommands,
};
pub use context::Context;
pub use driver::{Driver, TcpDriver};
pub use handler::{
    CallContext, CommandStats, Handler, Handlers, MetricsHandler, NoopHandler, TracingHandler,
};
pub use pipeline::{Pipeline, PipelineResults, TxPipeline};
pub use registry::CommandId;
pub use script::Script;

pub use redis_compat_core::{
    is_nil, Arg, ClientConfig, Endpoint, Expiration, OptionalExt, PoolConfig, ProtocolVersion,
    RedisError, RedisResult, RespValue, KEEP_TTL,
};

/// Everything needed to issue typed commands
pub mod prelude {
    pub use crate::cmdable::{
        BitmapCommands, CacheableCommands, Cmdable, GenericCommands, GeoCommands, HashCommands,
        HyperLogLogCommands, ListCommands, PubSubCommands, ScriptingCommands, ServerCommands,
        SetCommands, SortedSetCommands, StreamCommands, StringCommands,
    };
    pub use crate::{
        is_nil, Client, ClientConfig, Context, Expiration, OptionalExt, RedisError, RedisResult,
        Script, KEEP_TTL,
    };
}
