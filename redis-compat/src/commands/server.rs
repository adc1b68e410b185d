//! Server administration and connection commands

use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;

/// Start an append-only file rewrite
pub fn bg_rewrite_aof() -> Cmd {
    Cmd::new(&registry::BGREWRITEAOF)
}

/// Start a background save
pub fn bg_save() -> Cmd {
    Cmd::new(&registry::BGSAVE)
}

/// Name of this connection
pub fn client_get_name() -> Cmd {
    Cmd::new(&registry::CLIENT_GETNAME)
}

/// Id of this connection
pub fn client_id() -> Cmd {
    Cmd::new(&registry::CLIENT_ID)
}

/// Connected clients, in the server's text format
pub fn client_list() -> Cmd {
    Cmd::new(&registry::CLIENT_LIST)
}

/// Configuration parameters matching the `parameter` glob
pub fn config_get(parameter: &str) -> Cmd {
    Cmd::new(&registry::CONFIG_GET).arg(parameter)
}

/// Reset `INFO` statistics
pub fn config_reset_stat() -> Cmd {
    Cmd::new(&registry::CONFIG_RESETSTAT)
}

/// Rewrite the config file with the running configuration
pub fn config_rewrite() -> Cmd {
    Cmd::new(&registry::CONFIG_REWRITE)
}

/// Set a configuration parameter
pub fn config_set(parameter: &str, value: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::CONFIG_SET).arg(parameter).arg(value)
}

/// Number of keys in the current database
pub fn db_size() -> Cmd {
    Cmd::new(&registry::DBSIZE)
}

/// Return `message`
pub fn echo(message: impl Into<Arg>) -> Cmd {
    Cmd::new(&registry::ECHO).arg(message)
}

/// Delete every key in every database
pub fn flush_all() -> Cmd {
    Cmd::new(&registry::FLUSHALL)
}

/// `FLUSHALL ASYNC`
pub fn flush_all_async() -> Cmd {
    Cmd::new(&registry::FLUSHALL_ASYNC).arg("ASYNC")
}

/// Delete every key in the current database
pub fn flush_db() -> Cmd {
    Cmd::new(&registry::FLUSHDB)
}

/// `FLUSHDB ASYNC`
pub fn flush_db_async() -> Cmd {
    Cmd::new(&registry::FLUSHDB_ASYNC).arg("ASYNC")
}

/// `INFO [section...]`; more than one section uses the multi-section identifier
pub fn info(sections: &[&str]) -> Cmd {
    let id = if sections.len() > 1 {
        &registry::INFO_MULTI
    } else {
        &registry::INFO
    };
    Cmd::new(id).args(sections.iter().copied())
}

/// Time of the last successful save
pub fn last_save() -> Cmd {
    Cmd::new(&registry::LASTSAVE)
}

/// `MEMORY USAGE key [SAMPLES n]`
pub fn memory_usage(key: &str, samples: Option<i64>) -> Cmd {
    let cmd = Cmd::new(&registry::MEMORY_USAGE).key(key);
    match samples {
        Some(n) => cmd.arg("SAMPLES").arg(n),
        None => cmd,
    }
}

/// `PING`
pub fn ping() -> Cmd {
    Cmd::new(&registry::PING)
}

/// Synchronous save
pub fn save() -> Cmd {
    Cmd::new(&registry::SAVE)
}

/// Server clock
pub fn time() -> Cmd {
    Cmd::new(&registry::TIME)
}
