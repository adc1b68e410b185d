//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use redis_compat::handler::{CallContext, Handler};
use redis_compat::{key_slot, Client, ClientConfig, Cmd, Driver, RedisError, RedisResult, RespValue};
use sha1::{Digest, Sha1};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// A command seen by [`MemoryDriver`]
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub line: String,
    pub cache_ttl: Option<Duration>,
}

/// Single-process stand-in for a cluster: a shared keyspace, a script cache,
/// and `CROSSSLOT` errors for multi-key requests spanning slots.
#[derive(Default)]
pub struct MemoryDriver {
    data: Mutex<HashMap<Bytes, Bytes>>,
    scripts: Mutex<HashMap<String, String>>,
    down: Mutex<HashSet<u16>>,
    sent: Mutex<Vec<Sent>>,
}

impl MemoryDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.sent.lock().iter().map(|s| s.line.clone()).collect()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.data
            .lock()
            .get(key.as_bytes())
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    pub fn forget_scripts(&self) {
        self.scripts.lock().clear();
    }

    /// Fail every request touching `slot` with `CLUSTERDOWN`
    pub fn take_slot_down(&self, slot: u16) {
        self.down.lock().insert(slot);
    }

    fn serve(&self, cmd: &Cmd) -> RedisResult<RespValue> {
        let down = self.down.lock();
        if cmd.key_bytes().any(|k| down.contains(&key_slot(k))) {
            return Err(RedisError::from_server("CLUSTERDOWN Hash slot not served"));
        }
        drop(down);
        self.apply(cmd.argv())
    }

    fn cross_slot(keys: &[Bytes]) -> RedisResult<()> {
        let slots: HashSet<u16> = keys.iter().map(|k| key_slot(k)).collect();
        if slots.len() > 1 {
            return Err(RedisError::from_server(
                "CROSSSLOT Keys in request don't hash to the same slot",
            ));
        }
        Ok(())
    }

    fn run_script(source: &str, keys: &[Bytes], args: &[Bytes]) -> RespValue {
        let pick = |prefix: &str, list: &[Bytes]| {
            source
                .trim()
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(|n| n.parse::<usize>().ok())
                .and_then(|n| list.get(n.checked_sub(1)?).cloned())
        };
        pick("return ARGV[", args)
            .or_else(|| pick("return KEYS[", keys))
            .map_or(RespValue::Null, RespValue::BulkString)
    }

    fn apply(&self, argv: &[Bytes]) -> RedisResult<RespValue> {
        let verb = String::from_utf8_lossy(&argv[0]).to_ascii_uppercase();
        let ok = || RespValue::SimpleString("OK".into());
        match verb.as_str() {
            "GET" => Ok(self
                .data
                .lock()
                .get(&argv[1])
                .cloned()
                .map_or(RespValue::Null, RespValue::BulkString)),
            "SET" => {
                self.data.lock().insert(argv[1].clone(), argv[2].clone());
                Ok(ok())
            }
            "STRLEN" => Ok(RespValue::Integer(
                self.data.lock().get(&argv[1]).map_or(0, |v| v.len() as i64),
            )),
            "INCR" => {
                let mut data = self.data.lock();
                let current = match data.get(&argv[1]) {
                    None => 0,
                    Some(v) => std::str::from_utf8(v)
                        .ok()
                        .and_then(|s| s.parse::<i64>().ok())
                        .ok_or_else(|| {
                            RedisError::from_server("ERR value is not an integer or out of range")
                        })?,
                };
                data.insert(argv[1].clone(), Bytes::from((current + 1).to_string()));
                Ok(RespValue::Integer(current + 1))
            }
            "MSET" => {
                let keys: Vec<Bytes> = argv[1..].iter().step_by(2).cloned().collect();
                Self::cross_slot(&keys)?;
                let mut data = self.data.lock();
                for pair in argv[1..].chunks(2) {
                    data.insert(pair[0].clone(), pair[1].clone());
                }
                Ok(ok())
            }
            "MGET" => {
                Self::cross_slot(&argv[1..])?;
                let data = self.data.lock();
                Ok(RespValue::Array(
                    argv[1..]
                        .iter()
                        .map(|k| data.get(k).cloned().map_or(RespValue::Null, RespValue::BulkString))
                        .collect(),
                ))
            }
            "EVAL" | "EVALSHA" | "EVAL_RO" | "EVALSHA_RO" => {
                let numkeys: usize = String::from_utf8_lossy(&argv[2])
                    .parse()
                    .map_err(|_| RedisError::from_server("ERR bad numkeys"))?;
                let (keys, args) = argv[3..].split_at(numkeys);
                let source = if !verb.starts_with("EVALSHA") {
                    let source = String::from_utf8_lossy(&argv[1]).into_owned();
                    self.scripts.lock().insert(sha1_hex(&source), source.clone());
                    source
                } else {
                    let sha = String::from_utf8_lossy(&argv[1]).to_ascii_lowercase();
                    self.scripts.lock().get(&sha).cloned().ok_or_else(|| {
                        RedisError::from_server("NOSCRIPT No matching script. Please use EVAL.")
                    })?
                };
                Ok(Self::run_script(&source, keys, args))
            }
            "SCRIPT" => {
                let sub = String::from_utf8_lossy(&argv[1]).to_ascii_uppercase();
                match sub.as_str() {
                    "LOAD" => {
                        let source = String::from_utf8_lossy(&argv[2]).into_owned();
                        let sha = sha1_hex(&source);
                        self.scripts.lock().insert(sha.clone(), source);
                        Ok(RespValue::from(sha))
                    }
                    "EXISTS" => {
                        let scripts = self.scripts.lock();
                        Ok(RespValue::Array(
                            argv[2..]
                                .iter()
                                .map(|sha| {
                                    let sha = String::from_utf8_lossy(sha).to_ascii_lowercase();
                                    RespValue::Integer(i64::from(scripts.contains_key(&sha)))
                                })
                                .collect(),
                        ))
                    }
                    _ => Err(RedisError::from_server(format!("ERR unknown subcommand '{sub}'"))),
                }
            }
            _ => Err(RedisError::from_server(format!("ERR unknown command '{verb}'"))),
        }
    }

    fn record(&self, cmd: &Cmd, cache_ttl: Option<Duration>) {
        self.sent.lock().push(Sent {
            line: cmd.to_string(),
            cache_ttl,
        });
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn execute(&self, cmd: &Cmd) -> RedisResult<RespValue> {
        self.record(cmd, None);
        tokio::task::yield_now().await;
        self.serve(cmd)
    }

    async fn execute_cached(&self, cmd: &Cmd, ttl: Duration) -> RedisResult<RespValue> {
        self.record(cmd, Some(ttl));
        self.serve(cmd)
    }

    async fn execute_batch(&self, cmds: &[Cmd], _atomic: bool) -> RedisResult<Vec<RespValue>> {
        Ok(cmds
            .iter()
            .map(|cmd| {
                self.record(cmd, None);
                self.serve(cmd)
                    .unwrap_or_else(|e| RespValue::Error(e.to_string()))
            })
            .collect())
    }
}

pub fn sha1_hex(source: &str) -> String {
    hex::encode(Sha1::digest(source.as_bytes()))
}

/// One handler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Before {
        label: &'static str,
        sub: Option<String>,
        keys: Vec<String>,
    },
    After {
        label: &'static str,
        error: Option<String>,
    },
}

/// Handler that records every invocation
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn count(&self, label: &str) -> (usize, usize) {
        let events = self.events.lock();
        let before = events
            .iter()
            .filter(|e| matches!(e, Event::Before { label: l, .. } if *l == label))
            .count();
        let after = events
            .iter()
            .filter(|e| matches!(e, Event::After { label: l, .. } if *l == label))
            .count();
        (before, after)
    }
}

impl Handler for Recorder {
    fn before(&self, call: &CallContext<'_>) {
        self.events.lock().push(Event::Before {
            label: call.id().label,
            sub: call.sub_command_name().map(str::to_string),
            keys: call.keys(),
        });
    }

    fn after(&self, call: &CallContext<'_>, err: Option<&RedisError>) {
        self.events.lock().push(Event::After {
            label: call.id().label,
            error: err.map(ToString::to_string),
        });
    }
}

pub fn client_with(driver: Arc<MemoryDriver>, recorder: Arc<Recorder>) -> Client {
    Client::new(driver, ClientConfig::new("redis://localhost:6379"))
        .expect("valid config")
        .with_handler(recorder)
}
