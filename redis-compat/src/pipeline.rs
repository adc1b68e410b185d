//! Pipelines and `MULTI`/`EXEC` transactions
//!
//! Queued commands are sent in one round-trip on one connection and
//! reported to the handler as a single call (`PIPELINE` or `EXEC`) whose
//! keys are the keys of every queued command.
//!
//! ```no_run
//! use redis_compat::{commands, reply, Client, ClientConfig, Context, KEEP_TTL};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::connect(ClientConfig::new("redis://localhost:6379")).await?;
//! let mut pipe = client.pipeline();
//! pipe.set("key1", "value1").incr("counter").get("key1");
//! pipe.add_command(commands::string::set("key2", 2, KEEP_TTL));
//!
//! let mut results = pipe.execute(&Context::background()).await?;
//! results.next_with(reply::ok)?;
//! let counter = results.next_with(reply::int)?;
//! let value = results.next_with(reply::string)?;
//! println!("{counter} {value}");
//! # Ok(())
//! # }
//! ```

use crate::client::Client;
use crate::cmd::Cmd;
use crate::commands::string;
use crate::commands::generic;
use crate::context::Context;
use crate::registry;
use redis_compat_core::{Arg, Expiration, RedisError, RedisResult, RespValue};

macro_rules! queue_methods {
    () => {
        /// Queue a built command
        pub fn add_command(&mut self, cmd: Cmd) -> &mut Self {
            self.cmds.push(cmd);
            self
        }

        /// Queue `SET key value`
        pub fn set(&mut self, key: &str, value: impl Into<Arg>) -> &mut Self {
            self.add_command(string::set(key, value, Expiration::Persist))
        }

        /// Queue `GET key`
        pub fn get(&mut self, key: &str) -> &mut Self {
            self.add_command(string::get(key))
        }

        /// Queue `DEL keys...`
        pub fn del(&mut self, keys: &[&str]) -> &mut Self {
            self.add_command(generic::del(keys))
        }

        /// Queue `INCR key`
        pub fn incr(&mut self, key: &str) -> &mut Self {
            self.add_command(string::incr(key))
        }

        /// Queue `INCRBY key increment`
        pub fn incr_by(&mut self, key: &str, increment: i64) -> &mut Self {
            self.add_command(string::incr_by(key, increment))
        }

        /// Number of queued commands
        pub fn len(&self) -> usize {
            self.cmds.len()
        }

        /// Whether nothing is queued
        pub fn is_empty(&self) -> bool {
            self.cmds.is_empty()
        }

        /// Drop every queued command
        pub fn clear(&mut self) {
            self.cmds.clear();
        }

        /// The queued commands
        pub fn commands(&self) -> &[Cmd] {
            &self.cmds
        }
    };
}

/// Commands sent together without atomicity
pub struct Pipeline {
    client: Client,
    cmds: Vec<Cmd>,
}

impl Pipeline {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            cmds: Vec::new(),
        }
    }

    queue_methods!();

    /// Send the queue and empty it.
    ///
    /// A failing command does not fail the pipeline: its error reply is
    /// returned in its slot.
    pub async fn execute(&mut self, ctx: &Context) -> RedisResult<PipelineResults> {
        let cmds = std::mem::take(&mut self.cmds);
        let replies = self
            .client
            .execute_batch(ctx, &registry::PIPELINE, &cmds, false)
            .await?;
        Ok(PipelineResults::new(replies))
    }
}

/// Commands sent inside `MULTI`/`EXEC`
pub struct TxPipeline {
    client: Client,
    cmds: Vec<Cmd>,
}

impl TxPipeline {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            cmds: Vec::new(),
        }
    }

    queue_methods!();

    /// Send the queue as one transaction and empty it.
    ///
    /// An aborted transaction is reported as nil.
    pub async fn execute(&mut self, ctx: &Context) -> RedisResult<PipelineResults> {
        let cmds = std::mem::take(&mut self.cmds);
        let replies = self
            .client
            .execute_batch(ctx, &registry::EXEC, &cmds, true)
            .await?;
        Ok(PipelineResults::new(replies))
    }
}

/// Replies of a pipeline, in queue order
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResults {
    results: Vec<RespValue>,
    cursor: usize,
}

impl PipelineResults {
    /// Wrap raw replies
    pub fn new(results: Vec<RespValue>) -> Self {
        Self { results, cursor: 0 }
    }

    /// Parse the next reply; error replies become `Err`
    pub fn next_with<T>(&mut self, parse: impl FnOnce(RespValue) -> RedisResult<T>) -> RedisResult<T> {
        let index = self.cursor;
        self.cursor += 1;
        self.get_with(index, parse)
    }

    /// Parse the reply at `index`
    pub fn get_with<T>(&self, index: usize, parse: impl FnOnce(RespValue) -> RedisResult<T>) -> RedisResult<T> {
        match self.results.get(index) {
            Some(RespValue::Error(msg)) => Err(RedisError::from_server(msg.clone())),
            Some(value) => parse(value.clone()),
            None => Err(RedisError::Internal(format!(
                "no pipeline reply at index {index} (have {})",
                self.results.len()
            ))),
        }
    }

    /// Number of replies
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there are no replies
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The raw replies
    pub fn into_results(self) -> Vec<RespValue> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::reply;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use redis_compat_core::ClientConfig;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        batches: Mutex<Vec<(Vec<String>, bool)>>,
    }

    #[async_trait]
    impl Driver for Recorder {
        async fn execute(&self, _cmd: &Cmd) -> RedisResult<RespValue> {
            Ok(RespValue::Null)
        }

        async fn execute_batch(&self, cmds: &[Cmd], atomic: bool) -> RedisResult<Vec<RespValue>> {
            self.batches
                .lock()
                .push((cmds.iter().map(ToString::to_string).collect(), atomic));
            Ok(vec![
                RespValue::SimpleString("OK".into()),
                RespValue::Error("ERR value is not an integer or out of range".into()),
                RespValue::from("v"),
            ])
        }
    }

    fn client(driver: Arc<Recorder>) -> Client {
        Client::new(driver, ClientConfig::new("redis://localhost:6379")).unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_sends_queue_once() {
        let driver = Arc::new(Recorder::default());
        let mut pipe = client(driver.clone()).pipeline();
        pipe.set("a", "1").incr("a").get("a");
        assert_eq!(pipe.len(), 3);

        let mut results = pipe.execute(&Context::background()).await.unwrap();
        assert!(pipe.is_empty());
        assert_eq!(
            *driver.batches.lock(),
            vec![(vec!["SET a 1".to_string(), "INCR a".into(), "GET a".into()], false)]
        );

        results.next_with(reply::ok).unwrap();
        let err = results.next_with(reply::int).unwrap_err();
        assert!(matches!(err, RedisError::Server(_)));
        assert_eq!(results.next_with(reply::string).unwrap(), "v");
        assert!(results.next_with(reply::value).is_err());
    }

    #[tokio::test]
    async fn test_tx_pipeline_is_atomic() {
        let driver = Arc::new(Recorder::default());
        let mut tx = client(driver.clone()).tx_pipeline();
        tx.del(&["a", "b"]);
        tx.execute(&Context::background()).await.unwrap();
        assert_eq!(
            *driver.batches.lock(),
            vec![(vec!["DEL a b".to_string()], true)]
        );
    }
}
