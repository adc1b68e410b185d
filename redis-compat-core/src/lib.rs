//! Core types for the redis-compat client
//!
//! This crate provides configuration, the error taxonomy, the RESP value
//! model and the argument encoding shared by every command builder.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use config::{ClientConfig, Endpoint, PoolConfig, ProtocolVersion};
pub use error::{is_nil, OptionalExt, RedisError, RedisResult};
pub use types::{use_precise, Arg, Expiration, KEEP_TTL};
pub use value::RespValue;
