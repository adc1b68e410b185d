//! RESP (`REdis` Serialization Protocol) value types
//!
//! A single value type covers both protocol versions: RESP3-only shapes
//! (maps, sets, doubles, booleans, pushes) decode into their own variants,
//! and the accessors below accept either encoding of the same logical reply.

use crate::error::{RedisError, RedisResult};
use bytes::Bytes;

/// RESP protocol value
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple string: +OK\r\n
    SimpleString(String),
    /// Error: -ERR message\r\n (also RESP3 blob errors)
    Error(String),
    /// Integer: :1000\r\n
    Integer(i64),
    /// Bulk string: $6\r\nfoobar\r\n (also RESP3 verbatim strings)
    BulkString(Bytes),
    /// Null bulk string, null array or RESP3 null
    Null,
    /// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
    /// RESP3 double: ,1.23\r\n
    Double(f64),
    /// RESP3 boolean: #t\r\n
    Boolean(bool),
    /// RESP3 big number, kept in its decimal form
    BigNumber(String),
    /// RESP3 map, in wire order
    Map(Vec<(RespValue, RespValue)>),
    /// RESP3 set
    Set(Vec<RespValue>),
    /// RESP3 out-of-band push message
    Push(Vec<RespValue>),
}

impl RespValue {
    /// Convert to a string if possible
    ///
    /// # Errors
    ///
    /// Returns [`RedisError::Nil`] for a null reply and a type error for
    /// aggregate values.
    pub fn as_string(&self) -> RedisResult<String> {
        match self {
            Self::SimpleString(s) | Self::BigNumber(s) => Ok(s.clone()),
            Self::BulkString(b) => String::from_utf8(b.to_vec())
                .map_err(|e| RedisError::Type(format!("Invalid UTF-8: {e}"))),
            Self::Integer(i) => Ok(i.to_string()),
            Self::Double(f) => Ok(f.to_string()),
            Self::Null => Err(RedisError::Nil),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to string"
            ))),
        }
    }

    /// Convert to an integer if possible
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to an integer.
    pub fn as_int(&self) -> RedisResult<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            Self::Boolean(b) => Ok(i64::from(*b)),
            Self::BulkString(_) | Self::SimpleString(_) | Self::BigNumber(_) => {
                let s = self.as_string()?;
                s.parse::<i64>()
                    .map_err(|e| RedisError::Type(format!("Cannot parse integer {s:?}: {e}")))
            }
            Self::Null => Err(RedisError::Nil),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to integer"
            ))),
        }
    }

    /// Convert to a float if possible
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to a float.
    pub fn as_float(&self) -> RedisResult<f64> {
        match self {
            Self::Double(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Ok(*i as f64),
            Self::BulkString(_) | Self::SimpleString(_) => {
                let s = self.as_string()?;
                parse_float(&s)
            }
            Self::Null => Err(RedisError::Nil),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to float"
            ))),
        }
    }

    /// Convert an integer or boolean reply to a bool
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to a bool.
    pub fn as_bool(&self) -> RedisResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Integer(i) => Ok(*i != 0),
            Self::SimpleString(s) if s == "OK" => Ok(true),
            Self::Null => Err(RedisError::Nil),
            _ => Err(RedisError::Type(format!("Cannot convert {self:?} to bool"))),
        }
    }

    /// Convert to bytes if possible
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to bytes.
    pub fn as_bytes(&self) -> RedisResult<Bytes> {
        match self {
            Self::BulkString(b) => Ok(b.clone()),
            Self::SimpleString(s) => Ok(Bytes::from(s.as_bytes().to_vec())),
            Self::Null => Err(RedisError::Nil),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to bytes"
            ))),
        }
    }

    /// Take the elements of an array, set or push value
    ///
    /// # Errors
    ///
    /// Returns [`RedisError::Nil`] for a null aggregate and a type error for
    /// scalars.
    pub fn into_array(self) -> RedisResult<Vec<Self>> {
        match self {
            Self::Array(arr) | Self::Set(arr) | Self::Push(arr) => Ok(arr),
            Self::Map(pairs) => Ok(pairs.into_iter().flat_map(|(k, v)| [k, v]).collect()),
            Self::Null => Err(RedisError::Nil),
            other => Err(RedisError::Type(format!(
                "Cannot convert {other:?} to array"
            ))),
        }
    }

    /// Take the entries of a map reply.
    ///
    /// RESP2 servers send maps as flat `[k1, v1, k2, v2, ...]` arrays; both
    /// shapes are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error for odd-length arrays and scalar values.
    pub fn into_pairs(self) -> RedisResult<Vec<(Self, Self)>> {
        match self {
            Self::Map(pairs) => Ok(pairs),
            Self::Array(arr) => {
                if arr.len() % 2 != 0 {
                    return Err(RedisError::Type(format!(
                        "Expected an even number of elements, got {}",
                        arr.len()
                    )));
                }
                let mut pairs = Vec::with_capacity(arr.len() / 2);
                let mut it = arr.into_iter();
                while let (Some(k), Some(v)) = (it.next(), it.next()) {
                    pairs.push((k, v));
                }
                Ok(pairs)
            }
            Self::Null => Err(RedisError::Nil),
            other => Err(RedisError::Type(format!("Cannot convert {other:?} to map"))),
        }
    }

    /// Check if this is a null value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this is an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Extract error message if this is an error
    #[must_use]
    pub fn into_error(self) -> Option<String> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Parse a float the way Redis prints them (`inf`, `-inf`, `+inf` included)
///
/// # Errors
///
/// Returns a type error when the text is not a number.
pub fn parse_float(s: &str) -> RedisResult<f64> {
    match s {
        "inf" | "+inf" => Ok(f64::INFINITY),
        "-inf" => Ok(f64::NEG_INFINITY),
        _ => s
            .parse::<f64>()
            .map_err(|e| RedisError::Type(format!("Cannot parse float {s:?}: {e}"))),
    }
}

impl From<String> for RespValue {
    fn from(s: String) -> Self {
        Self::BulkString(Bytes::from(s.into_bytes()))
    }
}
impl From<&str> for RespValue {
    fn from(s: &str) -> Self {
        Self::BulkString(Bytes::copy_from_slice(s.as_bytes()))
    }
}
impl From<i64> for RespValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}
impl From<Vec<u8>> for RespValue {
    fn from(b: Vec<u8>) -> Self {
        Self::BulkString(Bytes::from(b))
    }
}
impl From<Bytes> for RespValue {
    fn from(b: Bytes) -> Self {
        Self::BulkString(b)
    }
}

impl TryFrom<RespValue> for String {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_string()
    }
}

impl TryFrom<RespValue> for Option<String> {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        match value {
            RespValue::Null => Ok(None),
            other => other.as_string().map(Some),
        }
    }
}

impl TryFrom<RespValue> for i64 {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_int()
    }
}

impl TryFrom<RespValue> for f64 {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_float()
    }
}

impl TryFrom<RespValue> for bool {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_bool()
    }
}

impl TryFrom<RespValue> for Bytes {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_bytes()
    }
}

impl TryFrom<RespValue> for Vec<String> {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.into_array()?.iter().map(RespValue::as_string).collect()
    }
}

impl TryFrom<RespValue> for Vec<i64> {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.into_array()?.iter().map(RespValue::as_int).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_nil_for_scalars() {
        assert!(RespValue::Null.as_string().unwrap_err().is_nil());
        assert!(RespValue::Null.as_int().unwrap_err().is_nil());
        assert!(RespValue::Null.as_float().unwrap_err().is_nil());
        let opt: Option<String> = RespValue::Null.try_into().unwrap();
        assert_eq!(opt, None);
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(RespValue::from("42").as_int().unwrap(), 42);
        assert_eq!(RespValue::from("1.5").as_float().unwrap(), 1.5);
        assert_eq!(RespValue::from("-inf").as_float().unwrap(), f64::NEG_INFINITY);
        assert_eq!(RespValue::Double(2.25).as_float().unwrap(), 2.25);
        assert!(RespValue::Boolean(true).as_bool().unwrap());
        assert!(!RespValue::Integer(0).as_bool().unwrap());
        assert!(RespValue::from("abc").as_int().is_err());
    }

    #[test]
    fn test_pairs_from_both_protocols() {
        let resp2 = RespValue::Array(vec![
            RespValue::from("a"),
            RespValue::from("1"),
            RespValue::from("b"),
            RespValue::from("2"),
        ]);
        let resp3 = RespValue::Map(vec![
            (RespValue::from("a"), RespValue::from("1")),
            (RespValue::from("b"), RespValue::from("2")),
        ]);
        assert_eq!(resp2.into_pairs().unwrap(), resp3.into_pairs().unwrap());

        let odd = RespValue::Array(vec![RespValue::from("a")]);
        assert!(odd.into_pairs().is_err());
    }

    #[test]
    fn test_string_vec_conversion() {
        let v = RespValue::Set(vec![RespValue::from("x"), RespValue::from("y")]);
        let strings: Vec<String> = v.try_into().unwrap();
        assert_eq!(strings, vec!["x", "y"]);
    }
}
