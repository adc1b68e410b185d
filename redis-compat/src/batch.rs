//! Cluster-safe `MSET` / `MGET`
//!
//! Keys are grouped by hash slot and each group becomes its own request, so
//! no single request spans two slots. Groups run concurrently on the tokio
//! runtime with contexts derived from the caller's; when every key shares a
//! slot a single request is sent.

use crate::client::Client;
use crate::cluster::group_by_slot;
use crate::commands::string;
use crate::context::Context;
use crate::reply;
use redis_compat_core::{Arg, RedisError, RedisResult};
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

fn join_error(err: JoinError) -> RedisError {
    RedisError::Internal(format!("slot request task failed: {err}"))
}

pub(crate) async fn safe_mset<V>(client: &Client, ctx: &Context, pairs: &[(&str, V)]) -> RedisResult<()>
where
    V: Into<Arg> + Clone,
{
    if pairs.len() <= 1 {
        return client.execute(ctx, string::mset(pairs), None, reply::ok).await;
    }
    let groups = group_by_slot(pairs.iter(), |(key, _)| *key);
    if groups.len() == 1 {
        return client.execute(ctx, string::mset(pairs), None, reply::ok).await;
    }
    debug!(keys = pairs.len(), slots = groups.len(), "splitting MSET by slot");

    let mut tasks = JoinSet::new();
    for group in groups {
        let cmd = string::mset(&group.items.into_iter().cloned().collect::<Vec<_>>());
        let client = client.clone();
        let ctx = ctx.clone();
        tasks.spawn(async move { client.execute(&ctx, cmd, None, reply::ok).await });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined.map_err(join_error).and_then(|r| r) {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

pub(crate) async fn safe_mget(
    client: &Client,
    ctx: &Context,
    keys: &[&str],
) -> RedisResult<Vec<Option<String>>> {
    if keys.len() <= 1 {
        return client.execute(ctx, string::mget(keys), None, reply::opt_strings).await;
    }
    let groups = group_by_slot(keys.iter().copied(), |key| *key);
    if groups.len() == 1 {
        return client.execute(ctx, string::mget(keys), None, reply::opt_strings).await;
    }
    debug!(keys = keys.len(), slots = groups.len(), "splitting MGET by slot");

    let mut tasks = JoinSet::new();
    for group in groups {
        let cmd = string::mget(&group.items);
        let indices = group.indices;
        let client = client.clone();
        let ctx = ctx.clone();
        tasks.spawn(async move {
            let values = client.execute(&ctx, cmd, None, reply::opt_strings).await;
            (indices, values)
        });
    }

    let mut out = vec![None; keys.len()];
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((indices, Ok(values))) => {
                for (index, value) in indices.into_iter().zip(values) {
                    out[index] = value;
                }
            }
            Ok((_, Err(err))) => {
                first_error.get_or_insert(err);
            }
            Err(err) => {
                first_error.get_or_insert(join_error(err));
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(out),
    }
}
