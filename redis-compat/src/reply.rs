//! Reply parsers
//!
//! One function per reply shape. Each accepts both the RESP2 and the RESP3
//! encoding of the shape, so callers never look at the negotiated protocol.
//! A null reply where a scalar is expected becomes [`RedisError::Nil`];
//! positional nulls inside arrays become `None`.

use crate::types::{
    Expiry, GeoLocation, GeoPos, KeyValue, KeyValues, KeyZs, ScanPage, XAutoClaim,
    XAutoClaimJustId, XMessage, XPending, XPendingExt, XStream, Z, ZWithKey,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use redis_compat_core::{RedisError, RedisResult, RespValue};
use std::collections::HashMap;
use std::time::Duration;

/// The raw value
pub fn value(v: RespValue) -> RedisResult<RespValue> {
    Ok(v)
}

/// Status replies (`OK`, `QUEUED`, type names) and bulk strings
pub fn status(v: RespValue) -> RedisResult<String> {
    v.as_string()
}

/// An `OK` acknowledgement
pub fn ok(v: RespValue) -> RedisResult<()> {
    match v {
        RespValue::SimpleString(s) if s.eq_ignore_ascii_case("OK") => Ok(()),
        RespValue::BulkString(b) if b.eq_ignore_ascii_case(b"OK") => Ok(()),
        RespValue::Error(e) => Err(RedisError::from_server(e)),
        other => Err(RedisError::UnexpectedResponse(format!("{other:?}"))),
    }
}

/// `OK` or nil from a conditional write (`SET ... NX|XX`)
pub fn applied(v: RespValue) -> RedisResult<bool> {
    match v {
        RespValue::Null => Ok(false),
        other => ok(other).map(|()| true),
    }
}

/// A bulk string
pub fn string(v: RespValue) -> RedisResult<String> {
    v.as_string()
}

/// A bulk string that may be null
pub fn opt_string(v: RespValue) -> RedisResult<Option<String>> {
    match v {
        RespValue::Null => Ok(None),
        other => other.as_string().map(Some),
    }
}

/// Binary bulk string
pub fn bytes(v: RespValue) -> RedisResult<Bytes> {
    v.as_bytes()
}

/// An integer
pub fn int(v: RespValue) -> RedisResult<i64> {
    v.as_int()
}

/// A float, sent as a bulk string in RESP2 and a double in RESP3
pub fn float(v: RespValue) -> RedisResult<f64> {
    v.as_float()
}

/// `1`/`0` integers and RESP3 booleans
pub fn boolean(v: RespValue) -> RedisResult<bool> {
    v.as_bool()
}

/// An array of raw values
pub fn values(v: RespValue) -> RedisResult<Vec<RespValue>> {
    v.into_array()
}

/// An array of strings
pub fn strings(v: RespValue) -> RedisResult<Vec<String>> {
    v.into_array()?.iter().map(RespValue::as_string).collect()
}

/// An array of strings with positional nils
pub fn opt_strings(v: RespValue) -> RedisResult<Vec<Option<String>>> {
    v.into_array()?.into_iter().map(opt_string).collect()
}

/// An array of strings where nils read as empty strings (`SORT ... GET`)
pub fn strings_or_empty(v: RespValue) -> RedisResult<Vec<String>> {
    opt_strings(v).map(|items| items.into_iter().map(Option::unwrap_or_default).collect())
}

/// An array of integers
pub fn ints(v: RespValue) -> RedisResult<Vec<i64>> {
    v.into_array()?.iter().map(RespValue::as_int).collect()
}

/// An array of `1`/`0` flags
pub fn bools(v: RespValue) -> RedisResult<Vec<bool>> {
    v.into_array()?.iter().map(RespValue::as_bool).collect()
}

/// An array of floats with positional nils (`ZMSCORE`)
pub fn opt_floats(v: RespValue) -> RedisResult<Vec<Option<f64>>> {
    v.into_array()?
        .into_iter()
        .map(|item| match item {
            RespValue::Null => Ok(None),
            other => other.as_float().map(Some),
        })
        .collect()
}

/// An integer that may be null (`ZRANK` on a missing member is a nil)
pub fn opt_int(v: RespValue) -> RedisResult<Option<i64>> {
    match v {
        RespValue::Null => Ok(None),
        other => other.as_int().map(Some),
    }
}

/// An array of integers with positional nils (`BITFIELD ... OVERFLOW FAIL`)
pub fn opt_ints(v: RespValue) -> RedisResult<Vec<Option<i64>>> {
    v.into_array()?.into_iter().map(opt_int).collect()
}

/// Field/value pairs as a map (`HGETALL`, `CONFIG GET`)
pub fn string_map(v: RespValue) -> RedisResult<HashMap<String, String>> {
    v.into_pairs()?
        .into_iter()
        .map(|(k, v)| Ok((k.as_string()?, v.as_string()?)))
        .collect()
}

/// Pairs sent either flat or nested one level (`HRANDFIELD ... WITHVALUES`)
fn pairs(v: RespValue) -> RedisResult<Vec<(RespValue, RespValue)>> {
    match v {
        RespValue::Array(items) if matches!(items.first(), Some(RespValue::Array(_))) => items
            .into_iter()
            .map(|item| {
                let mut it = item.into_array()?.into_iter();
                match (it.next(), it.next()) {
                    (Some(a), Some(b)) => Ok((a, b)),
                    _ => Err(RedisError::Type("Expected a two element array".into())),
                }
            })
            .collect(),
        other => other.into_pairs(),
    }
}

/// Key/value pairs in reply order
pub fn key_values(v: RespValue) -> RedisResult<Vec<KeyValue>> {
    pairs(v)?
        .into_iter()
        .map(|(k, v)| {
            Ok(KeyValue {
                key: k.as_string()?,
                value: v.as_string()?,
            })
        })
        .collect()
}

/// String/integer pairs in reply order (`PUBSUB NUMSUB`)
pub fn string_ints(v: RespValue) -> RedisResult<Vec<(String, i64)>> {
    pairs(v)?
        .into_iter()
        .map(|(k, v)| Ok((k.as_string()?, v.as_int()?)))
        .collect()
}

/// Members with scores (`ZRANGE ... WITHSCORES` and friends)
pub fn zs(v: RespValue) -> RedisResult<Vec<Z>> {
    pairs(v)?
        .into_iter()
        .map(|(m, s)| Ok(Z::new(s.as_float()?, m.as_string()?)))
        .collect()
}

/// `[key, member, score]` from `BZPOPMIN` / `BZPOPMAX`
pub fn z_with_key(v: RespValue) -> RedisResult<ZWithKey> {
    let items = v.into_array()?;
    match items.as_slice() {
        [key, member, score] => Ok(ZWithKey {
            key: key.as_string()?,
            z: Z::new(score.as_float()?, member.as_string()?),
        }),
        _ => Err(RedisError::Type(format!(
            "Expected [key, member, score], got {} elements",
            items.len()
        ))),
    }
}

/// `[key, value]` from `BLPOP` / `BRPOP`
pub fn key_value(v: RespValue) -> RedisResult<KeyValue> {
    let items = v.into_array()?;
    match items.as_slice() {
        [key, value] => Ok(KeyValue {
            key: key.as_string()?,
            value: value.as_string()?,
        }),
        _ => Err(RedisError::Type("Expected [key, value]".into())),
    }
}

/// `[key, [values...]]` from `LMPOP` / `BLMPOP`
pub fn key_values_pop(v: RespValue) -> RedisResult<KeyValues> {
    let mut it = v.into_array()?.into_iter();
    match (it.next(), it.next()) {
        (Some(key), Some(values)) => Ok(KeyValues {
            key: key.as_string()?,
            values: strings(values)?,
        }),
        _ => Err(RedisError::Type("Expected [key, values]".into())),
    }
}

/// `[key, [[member, score]...]]` from `ZMPOP` / `BZMPOP`
pub fn key_zs(v: RespValue) -> RedisResult<KeyZs> {
    let mut it = v.into_array()?.into_iter();
    match (it.next(), it.next()) {
        (Some(key), Some(members)) => Ok(KeyZs {
            key: key.as_string()?,
            zs: zs(members)?,
        }),
        _ => Err(RedisError::Type("Expected [key, members]".into())),
    }
}

fn expiry(v: RespValue, unit: fn(u64) -> Duration) -> RedisResult<Expiry> {
    match v.as_int()? {
        -2 => Ok(Expiry::Missing),
        -1 => Ok(Expiry::Persistent),
        n if n >= 0 => Ok(Expiry::In(unit(n as u64))),
        n => Err(RedisError::Type(format!("Unexpected TTL {n}"))),
    }
}

/// `TTL` reply
pub fn expiry_secs(v: RespValue) -> RedisResult<Expiry> {
    expiry(v, Duration::from_secs)
}

/// `PTTL` reply
pub fn expiry_millis(v: RespValue) -> RedisResult<Expiry> {
    expiry(v, Duration::from_millis)
}

/// `[cursor, [items...]]` from the `SCAN` family
pub fn scan(v: RespValue) -> RedisResult<ScanPage> {
    let mut it = v.into_array()?.into_iter();
    match (it.next(), it.next()) {
        (Some(cursor), Some(items)) => {
            let cursor = cursor.as_string()?;
            Ok(ScanPage {
                cursor: cursor
                    .parse()
                    .map_err(|_| RedisError::Type(format!("Invalid cursor {cursor:?}")))?,
                keys: strings(items)?,
            })
        }
        _ => Err(RedisError::Type("Expected [cursor, items]".into())),
    }
}

/// `[id, [field, value, ...]]`; deleted entries carry a nil field list
pub fn xmessage(v: RespValue) -> RedisResult<XMessage> {
    let mut it = v.into_array()?.into_iter();
    let id = it
        .next()
        .ok_or_else(|| RedisError::Type("Empty stream entry".into()))?
        .as_string()?;
    let values = match it.next() {
        None | Some(RespValue::Null) => Vec::new(),
        Some(fields) => fields
            .into_pairs()?
            .into_iter()
            .map(|(f, v)| Ok((f.as_string()?, v.as_string()?)))
            .collect::<RedisResult<_>>()?,
    };
    Ok(XMessage { id, values })
}

/// An array of stream entries
pub fn xmessages(v: RespValue) -> RedisResult<Vec<XMessage>> {
    v.into_array()?.into_iter().map(xmessage).collect()
}

/// `XREAD` / `XREADGROUP`: an array of `[stream, entries]` in RESP2, a map in RESP3
pub fn xstreams(v: RespValue) -> RedisResult<Vec<XStream>> {
    stream_pairs(v)?
        .into_iter()
        .map(|(name, messages)| {
            Ok(XStream {
                stream: name.as_string()?,
                messages: xmessages(messages)?,
            })
        })
        .collect()
}

fn stream_pairs(v: RespValue) -> RedisResult<Vec<(RespValue, RespValue)>> {
    match v {
        RespValue::Null => Err(RedisError::Nil),
        other => pairs(other),
    }
}

/// `XPENDING key group` summary
pub fn xpending(v: RespValue) -> RedisResult<XPending> {
    let items = v.into_array()?;
    let [count, lower, higher, consumers] = <[RespValue; 4]>::try_from(items)
        .map_err(|_| RedisError::Type("Expected a four element XPENDING reply".into()))?;
    let consumers = match consumers {
        RespValue::Null => Vec::new(),
        other => string_ints(other)?,
    };
    Ok(XPending {
        count: count.as_int()?,
        lower: opt_string(lower)?.unwrap_or_default(),
        higher: opt_string(higher)?.unwrap_or_default(),
        consumers,
    })
}

/// `XPENDING key group start end count` entries
pub fn xpending_ext(v: RespValue) -> RedisResult<Vec<XPendingExt>> {
    v.into_array()?
        .into_iter()
        .map(|entry| {
            let items = entry.into_array()?;
            match items.as_slice() {
                [id, consumer, idle, retry] => Ok(XPendingExt {
                    id: id.as_string()?,
                    consumer: consumer.as_string()?,
                    idle: Duration::from_millis(idle.as_int()?.max(0) as u64),
                    retry_count: retry.as_int()?,
                }),
                _ => Err(RedisError::Type("Expected a four element pending entry".into())),
            }
        })
        .collect()
}

/// `XAUTOCLAIM` reply
pub fn xautoclaim(v: RespValue) -> RedisResult<XAutoClaim> {
    let mut it = v.into_array()?.into_iter();
    let next = it
        .next()
        .ok_or_else(|| RedisError::Type("Empty XAUTOCLAIM reply".into()))?
        .as_string()?;
    let messages = it.next().map(xmessages).transpose()?.unwrap_or_default();
    let deleted = it.next().map(strings).transpose()?.unwrap_or_default();
    Ok(XAutoClaim {
        next,
        messages,
        deleted,
    })
}

/// `XAUTOCLAIM ... JUSTID` reply
pub fn xautoclaim_justid(v: RespValue) -> RedisResult<XAutoClaimJustId> {
    let mut it = v.into_array()?.into_iter();
    let next = it
        .next()
        .ok_or_else(|| RedisError::Type("Empty XAUTOCLAIM reply".into()))?
        .as_string()?;
    let ids = it.next().map(strings).transpose()?.unwrap_or_default();
    Ok(XAutoClaimJustId { next, ids })
}

/// `GEOPOS` reply with positional nils
pub fn geo_pos(v: RespValue) -> RedisResult<Vec<Option<GeoPos>>> {
    v.into_array()?
        .into_iter()
        .map(|item| match item {
            RespValue::Null => Ok(None),
            other => {
                let coords = other.into_array()?;
                match coords.as_slice() {
                    [lon, lat] => Ok(Some(GeoPos {
                        longitude: lon.as_float()?,
                        latitude: lat.as_float()?,
                    })),
                    [] => Ok(None),
                    _ => Err(RedisError::Type("Expected [longitude, latitude]".into())),
                }
            }
        })
        .collect()
}

/// Radius and search replies; the flags say which optional fields each
/// entry carries (Redis always sends them as dist, hash, coord)
pub fn geo_locations(
    with_coord: bool,
    with_dist: bool,
    with_hash: bool,
) -> impl FnOnce(RespValue) -> RedisResult<Vec<GeoLocation>> + Send + 'static {
    move |v| {
        v.into_array()?
            .into_iter()
            .map(|item| {
                if !(with_coord || with_dist || with_hash) {
                    return Ok(GeoLocation {
                        name: item.as_string()?,
                        ..GeoLocation::default()
                    });
                }
                let mut it = item.into_array()?.into_iter();
                let mut loc = GeoLocation {
                    name: next_field(&mut it)?.as_string()?,
                    ..GeoLocation::default()
                };
                if with_dist {
                    loc.dist = next_field(&mut it)?.as_float()?;
                }
                if with_hash {
                    loc.geo_hash = next_field(&mut it)?.as_int()?;
                }
                if with_coord {
                    let coords = next_field(&mut it)?.into_array()?;
                    if let [lon, lat] = coords.as_slice() {
                        loc.longitude = lon.as_float()?;
                        loc.latitude = lat.as_float()?;
                    }
                }
                Ok(loc)
            })
            .collect()
    }
}

fn next_field(it: &mut impl Iterator<Item = RespValue>) -> RedisResult<RespValue> {
    it.next()
        .ok_or_else(|| RedisError::Type("Geo entry is missing a field".into()))
}

/// `TIME` reply: `[unix seconds, microseconds]`
pub fn time(v: RespValue) -> RedisResult<DateTime<Utc>> {
    let items = v.into_array()?;
    match items.as_slice() {
        [secs, micros] => {
            let secs = secs.as_int()?;
            let micros = micros.as_int()?;
            DateTime::from_timestamp(secs, (micros * 1000) as u32)
                .ok_or_else(|| RedisError::Type(format!("Invalid server time {secs}.{micros}")))
        }
        _ => Err(RedisError::Type("Expected [seconds, microseconds]".into())),
    }
}

/// Unix seconds as an instant (`LASTSAVE`, `EXPIRETIME`)
pub fn unix_secs(v: RespValue) -> RedisResult<DateTime<Utc>> {
    let secs = v.as_int()?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| RedisError::Type(format!("Invalid timestamp {secs}")))
}
