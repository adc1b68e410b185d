//! RESP2 / RESP3 wire codec
//!
//! Commands are always sent as RESP arrays of bulk strings. Replies are
//! decoded incrementally: [`RespDecoder::decode`] returns `Ok(None)` until a
//! complete value is buffered, which lets the connection read more bytes and
//! retry without losing its place.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use redis_compat_core::{
    error::{RedisError, RedisResult},
    value::{parse_float, RespValue},
};
use std::io::Cursor;

const CRLF: &[u8] = b"\r\n";

/// Encodes commands into the RESP request format
pub struct RespEncoder;

impl RespEncoder {
    /// Append a command (argv as bulk strings) to the buffer
    pub fn encode_argv(argv: &[Bytes], buf: &mut BytesMut) {
        let mut len = itoa::Buffer::new();
        buf.put_u8(b'*');
        buf.put_slice(len.format(argv.len()).as_bytes());
        buf.put_slice(CRLF);
        for arg in argv {
            buf.put_u8(b'$');
            buf.put_slice(len.format(arg.len()).as_bytes());
            buf.put_slice(CRLF);
            buf.put_slice(arg);
            buf.put_slice(CRLF);
        }
    }

    /// Encode a single command
    pub fn encode_command(argv: &[Bytes]) -> Bytes {
        let size: usize = argv.iter().map(|a| a.len() + 16).sum::<usize>() + 16;
        let mut buf = BytesMut::with_capacity(size);
        Self::encode_argv(argv, &mut buf);
        buf.freeze()
    }
}

/// Decodes RESP2 and RESP3 replies
pub struct RespDecoder;

impl RespDecoder {
    /// Decode one value from the buffer.
    ///
    /// Returns `Ok(None)` when the buffer holds only part of a value; the
    /// cursor position is meaningless in that case and the caller should
    /// retry from the start once more data has arrived.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        if !buf.has_remaining() {
            return Ok(None);
        }

        let type_byte = buf.get_u8();
        match type_byte {
            b'+' => Self::decode_line(buf, RespValue::SimpleString),
            b'-' => Self::decode_line(buf, RespValue::Error),
            b':' => Self::decode_integer(buf),
            b'$' | b'=' => Self::decode_blob(buf, type_byte == b'='),
            b'!' => Self::decode_blob_error(buf),
            b'*' => Self::decode_aggregate(buf, RespValue::Array),
            b'~' => Self::decode_aggregate(buf, RespValue::Set),
            b'>' => Self::decode_aggregate(buf, RespValue::Push),
            b'%' => Self::decode_map(buf),
            b'|' => Self::decode_attribute(buf),
            b'_' => Ok(Self::read_line(buf)?.map(|_| RespValue::Null)),
            b'#' => Self::decode_boolean(buf),
            b',' => Self::decode_double(buf),
            b'(' => Self::decode_line(buf, RespValue::BigNumber),
            _ => Err(RedisError::Protocol(format!(
                "Invalid RESP type byte: {}",
                type_byte as char
            ))),
        }
    }

    fn decode_line(
        buf: &mut Cursor<&[u8]>,
        wrap: fn(String) -> RespValue,
    ) -> RedisResult<Option<RespValue>> {
        match Self::read_line(buf)? {
            Some(line) => Ok(Some(wrap(utf8(line)?))),
            None => Ok(None),
        }
    }

    fn decode_integer(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        match Self::read_length(buf)? {
            Some(n) => Ok(Some(RespValue::Integer(n))),
            None => Ok(None),
        }
    }

    fn decode_boolean(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        match Self::read_line(buf)?.as_deref() {
            Some(b"t") => Ok(Some(RespValue::Boolean(true))),
            Some(b"f") => Ok(Some(RespValue::Boolean(false))),
            Some(other) => Err(RedisError::Protocol(format!(
                "Invalid boolean: {:?}",
                String::from_utf8_lossy(other)
            ))),
            None => Ok(None),
        }
    }

    fn decode_double(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        match Self::read_line(buf)? {
            Some(line) => {
                let text = utf8(line)?;
                let value = parse_float(&text)
                    .map_err(|_| RedisError::Protocol(format!("Invalid double: {text}")))?;
                Ok(Some(RespValue::Double(value)))
            }
            None => Ok(None),
        }
    }

    fn decode_blob(buf: &mut Cursor<&[u8]>, verbatim: bool) -> RedisResult<Option<RespValue>> {
        let Some(len) = Self::read_length(buf)? else {
            return Ok(None);
        };
        if len < 0 {
            return Ok(Some(RespValue::Null));
        }
        let Some(mut data) = Self::read_blob(buf, blob_len(len)?)? else {
            return Ok(None);
        };
        // Verbatim strings carry a three letter format prefix: "txt:".
        if verbatim && data.len() >= 4 && data[3] == b':' {
            data.advance(4);
        }
        Ok(Some(RespValue::BulkString(data)))
    }

    fn decode_blob_error(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        let Some(len) = Self::read_length(buf)? else {
            return Ok(None);
        };
        let Some(data) = Self::read_blob(buf, blob_len(len.max(0))?)? else {
            return Ok(None);
        };
        Ok(Some(RespValue::Error(utf8(data.to_vec())?)))
    }

    fn decode_aggregate(
        buf: &mut Cursor<&[u8]>,
        wrap: fn(Vec<RespValue>) -> RespValue,
    ) -> RedisResult<Option<RespValue>> {
        let Some(len) = Self::read_length(buf)? else {
            return Ok(None);
        };
        if len < 0 {
            return Ok(Some(RespValue::Null));
        }

        let mut items = Vec::with_capacity((len as usize).min(1024));
        for _ in 0..len {
            match Self::decode(buf)? {
                Some(value) => items.push(value),
                None => return Ok(None),
            }
        }
        Ok(Some(wrap(items)))
    }

    fn decode_map(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        let Some(len) = Self::read_length(buf)? else {
            return Ok(None);
        };
        if len < 0 {
            return Ok(Some(RespValue::Null));
        }

        let mut pairs = Vec::with_capacity((len as usize).min(1024));
        for _ in 0..len {
            let Some(k) = Self::decode(buf)? else {
                return Ok(None);
            };
            let Some(v) = Self::decode(buf)? else {
                return Ok(None);
            };
            pairs.push((k, v));
        }
        Ok(Some(RespValue::Map(pairs)))
    }

    /// Attributes decorate the value that follows them; they are skipped.
    fn decode_attribute(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        if Self::decode_map(buf)?.is_none() {
            return Ok(None);
        }
        Self::decode(buf)
    }

    fn read_length(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<i64>> {
        match Self::read_line(buf)? {
            Some(line) => {
                let text = utf8(line)?;
                text.parse::<i64>()
                    .map(Some)
                    .map_err(|e| RedisError::Protocol(format!("Invalid integer {text:?}: {e}")))
            }
            None => Ok(None),
        }
    }

    fn read_blob(buf: &mut Cursor<&[u8]>, len: usize) -> RedisResult<Option<Bytes>> {
        let framed = len
            .checked_add(2)
            .ok_or_else(|| RedisError::Protocol(format!("Blob length {len} out of range")))?;
        if buf.remaining() < framed {
            return Ok(None);
        }
        let data = Bytes::copy_from_slice(&buf.chunk()[..len]);
        buf.advance(len);
        if buf.get_u8() != b'\r' || buf.get_u8() != b'\n' {
            return Err(RedisError::Protocol(
                "Missing CRLF after bulk payload".to_string(),
            ));
        }
        Ok(Some(data))
    }

    fn read_line(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<Vec<u8>>> {
        let start = buf.position() as usize;
        let slice = buf.get_ref();

        if let Some(offset) = slice[start..].windows(2).position(|w| w == CRLF) {
            let end = start + offset;
            let line = slice[start..end].to_vec();
            buf.set_position((end + 2) as u64);
            return Ok(Some(line));
        }
        Ok(None)
    }
}

fn blob_len(len: i64) -> RedisResult<usize> {
    usize::try_from(len)
        .map_err(|_| RedisError::Protocol(format!("Blob length {len} out of range")))
}

fn utf8(bytes: Vec<u8>) -> RedisResult<String> {
    String::from_utf8(bytes).map_err(|e| RedisError::Protocol(format!("Invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(data: &[u8]) -> Option<RespValue> {
        let mut cursor = Cursor::new(data);
        RespDecoder::decode(&mut cursor).unwrap()
    }

    #[test]
    fn test_encode_command() {
        let bytes = RespEncoder::encode_command(&[Bytes::from("GET"), Bytes::from("mykey")]);
        assert_eq!(&bytes[..], b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n");
    }

    #[test]
    fn test_encode_binary_argument() {
        let bytes = RespEncoder::encode_command(&[
            Bytes::from("SET"),
            Bytes::from("k"),
            Bytes::from_static(b"\xff\r\n"),
        ]);
        assert_eq!(&bytes[..], b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$3\r\n\xff\r\n\r\n");
    }

    #[test]
    fn test_decode_resp2_scalars() {
        assert_eq!(
            decode(b"+OK\r\n"),
            Some(RespValue::SimpleString("OK".to_string()))
        );
        assert_eq!(
            decode(b"-ERR unknown\r\n"),
            Some(RespValue::Error("ERR unknown".to_string()))
        );
        assert_eq!(decode(b":1000\r\n"), Some(RespValue::Integer(1000)));
        assert_eq!(
            decode(b"$6\r\nfoobar\r\n"),
            Some(RespValue::BulkString(Bytes::from("foobar")))
        );
        assert_eq!(decode(b"$-1\r\n"), Some(RespValue::Null));
        assert_eq!(decode(b"*-1\r\n"), Some(RespValue::Null));
    }

    #[test]
    fn test_decode_array() {
        assert_eq!(
            decode(b"*2\r\n$3\r\nfoo\r\n$-1\r\n"),
            Some(RespValue::Array(vec![
                RespValue::BulkString(Bytes::from("foo")),
                RespValue::Null,
            ]))
        );
    }

    #[test]
    fn test_decode_resp3_types() {
        assert_eq!(decode(b"_\r\n"), Some(RespValue::Null));
        assert_eq!(decode(b"#t\r\n"), Some(RespValue::Boolean(true)));
        assert_eq!(decode(b",1.5\r\n"), Some(RespValue::Double(1.5)));
        assert_eq!(decode(b",-inf\r\n"), Some(RespValue::Double(f64::NEG_INFINITY)));
        assert_eq!(
            decode(b"(3492890328409238509324850943850943825024385\r\n"),
            Some(RespValue::BigNumber(
                "3492890328409238509324850943850943825024385".to_string()
            ))
        );
        assert_eq!(
            decode(b"=15\r\ntxt:Some string\r\n"),
            Some(RespValue::BulkString(Bytes::from("Some string")))
        );
        assert_eq!(
            decode(b"!21\r\nSYNTAX invalid syntax\r\n"),
            Some(RespValue::Error("SYNTAX invalid syntax".to_string()))
        );
        assert_eq!(
            decode(b"%1\r\n+a\r\n:1\r\n"),
            Some(RespValue::Map(vec![(
                RespValue::SimpleString("a".to_string()),
                RespValue::Integer(1)
            )]))
        );
        assert_eq!(
            decode(b"~2\r\n:1\r\n:2\r\n"),
            Some(RespValue::Set(vec![
                RespValue::Integer(1),
                RespValue::Integer(2)
            ]))
        );
    }

    #[test]
    fn test_decode_skips_attributes() {
        assert_eq!(
            decode(b"|1\r\n+key-popularity\r\n:1\r\n:42\r\n"),
            Some(RespValue::Integer(42))
        );
    }

    #[test]
    fn test_decode_incomplete_data() {
        assert_eq!(decode(b"+OK\r"), None);
        assert_eq!(decode(b"$6\r\nfoo"), None);
        assert_eq!(decode(b"*2\r\n:1\r\n"), None);
        assert_eq!(decode(b"%1\r\n+a\r\n"), None);
    }

    #[test]
    fn test_decode_invalid_type_byte() {
        let mut cursor = Cursor::new(&b"?what\r\n"[..]);
        assert!(RespDecoder::decode(&mut cursor).is_err());
    }

    #[test]
    fn test_huge_blob_length_does_not_overflow() {
        let mut cursor = Cursor::new(&b"ab"[..]);
        assert!(matches!(
            RespDecoder::read_blob(&mut cursor, usize::MAX),
            Err(RedisError::Protocol(_))
        ));

        let mut cursor = Cursor::new(&b"$9223372036854775807\r\nabc"[..]);
        assert!(!matches!(RespDecoder::decode(&mut cursor), Ok(Some(_))));
        let mut cursor = Cursor::new(&b"!9223372036854775807\r\nabc"[..]);
        assert!(!matches!(RespDecoder::decode(&mut cursor), Ok(Some(_))));
    }
}
