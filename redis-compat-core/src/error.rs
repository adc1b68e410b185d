//! Error types for Redis operations

use std::convert::Infallible;
use std::io;
use thiserror::Error;

/// Result type for Redis operations
pub type RedisResult<T> = Result<T, RedisError>;

/// Comprehensive error type for Redis operations
///
/// Server replies that carry an error are surfaced verbatim as
/// [`RedisError::Server`] (or [`RedisError::Moved`] / [`RedisError::Ask`] when
/// the text is a cluster redirect). A null reply on a command whose result
/// is a scalar is reported as [`RedisError::Nil`], which callers can tell
/// apart from real failures with [`RedisError::is_nil`].
#[derive(Error, Debug)]
pub enum RedisError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Protocol parsing error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Server returned an error
    #[error("{0}")]
    Server(String),

    /// MOVED redirect in cluster mode
    #[error("MOVED {slot} {host}:{port}")]
    Moved {
        /// Slot number that was moved
        slot: u16,
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// ASK redirect in cluster mode
    #[error("ASK {slot} {host}:{port}")]
    Ask {
        /// Slot number for temporary redirect
        slot: u16,
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// Redis returned a null reply
    #[error("redis: nil")]
    Nil,

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// The call was dropped before it completed
    #[error("Operation canceled")]
    Canceled,

    /// Type conversion error
    #[error("Type conversion error: {0}")]
    Type(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// A background task failed without producing a reply
    #[error("Internal error: {0}")]
    Internal(String),

    /// Unexpected response from server
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl RedisError {
    /// Build the error for a server error reply.
    ///
    /// Redirects are parsed into their structured variants, everything else
    /// is kept verbatim.
    #[must_use]
    pub fn from_server(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        Self::parse_redirect(&msg).unwrap_or(Self::Server(msg))
    }

    /// Parse a Redis error message to check for MOVED or ASK redirects
    #[must_use]
    pub fn parse_redirect(msg: &str) -> Option<Self> {
        let (ask, rest) = if let Some(rest) = msg.strip_prefix("MOVED ") {
            (false, rest)
        } else if let Some(rest) = msg.strip_prefix("ASK ") {
            (true, rest)
        } else {
            return None;
        };

        let mut parts = rest.split_whitespace();
        let slot = parts.next()?.parse::<u16>().ok()?;
        let (host, port) = parts.next()?.rsplit_once(':')?;
        let port = port.parse::<u16>().ok()?;
        if parts.next().is_some() {
            return None;
        }

        let host = host.to_string();
        Some(if ask {
            Self::Ask { slot, host, port }
        } else {
            Self::Moved { slot, host, port }
        })
    }

    /// Check if this error is the nil reply marker
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Check if this error is the server's `NOSCRIPT` reply
    #[must_use]
    pub fn is_noscript(&self) -> bool {
        matches!(self, Self::Server(msg) if msg.starts_with("NOSCRIPT"))
    }

    /// Check if the operation ran out of time
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Check if this error is a redirect (MOVED or ASK)
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Ask { .. })
    }

    /// Get the target address from a redirect error
    #[must_use]
    pub fn redirect_target(&self) -> Option<(String, u16)> {
        match self {
            Self::Moved { host, port, .. } | Self::Ask { host, port, .. } => {
                Some((host.clone(), *port))
            }
            _ => None,
        }
    }

    /// Get the slot number from a redirect error
    #[must_use]
    pub const fn redirect_slot(&self) -> Option<u16> {
        match self {
            Self::Moved { slot, .. } | Self::Ask { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    /// The server error prefix (`ERR`, `WRONGTYPE`, `NOSCRIPT`, ...), if any
    #[must_use]
    pub fn server_code(&self) -> Option<&str> {
        match self {
            Self::Server(msg) => msg.split_whitespace().next(),
            Self::Moved { .. } => Some("MOVED"),
            Self::Ask { .. } => Some("ASK"),
            _ => None,
        }
    }
}

impl From<Infallible> for RedisError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Returns true when the result failed with the nil reply marker
pub fn is_nil<T>(result: &RedisResult<T>) -> bool {
    matches!(result, Err(RedisError::Nil))
}

/// Converts nil replies into `None`.
pub trait OptionalExt<T> {
    /// `Err(Nil)` becomes `Ok(None)`, every other error is kept.
    fn optional(self) -> RedisResult<Option<T>>;
}

impl<T> OptionalExt<T> for RedisResult<T> {
    fn optional(self) -> RedisResult<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(RedisError::Nil) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moved_redirect() {
        let error = RedisError::parse_redirect("MOVED 9916 10.90.6.213:6002");

        if let Some(RedisError::Moved { slot, host, port }) = error {
            assert_eq!(slot, 9916);
            assert_eq!(host, "10.90.6.213");
            assert_eq!(port, 6002);
        } else {
            panic!("Expected MOVED error");
        }
    }

    #[test]
    fn test_parse_ask_redirect() {
        let error = RedisError::from_server("ASK 1234 192.168.1.1:7000");
        assert!(error.is_redirect());
        assert_eq!(error.redirect_slot(), Some(1234));
        assert_eq!(
            error.redirect_target(),
            Some(("192.168.1.1".to_string(), 7000))
        );
    }

    #[test]
    fn test_parse_invalid_redirect() {
        assert!(RedisError::parse_redirect("ERR invalid").is_none());
        assert!(RedisError::parse_redirect("MOVED invalid").is_none());
        assert!(RedisError::parse_redirect("MOVED 1234").is_none());
        assert!(RedisError::parse_redirect("MOVED 1 a:1 extra").is_none());
    }

    #[test]
    fn test_server_error_kept_verbatim() {
        let err = RedisError::from_server("WRONGTYPE Operation against a key");
        assert_eq!(err.to_string(), "WRONGTYPE Operation against a key");
        assert_eq!(err.server_code(), Some("WRONGTYPE"));
    }

    #[test]
    fn test_noscript_detection() {
        let err = RedisError::from_server("NOSCRIPT No matching script. Please use EVAL.");
        assert!(err.is_noscript());
        assert!(!RedisError::from_server("ERR NOSCRIPT later").is_noscript());
        assert!(!RedisError::Protocol("NOSCRIPT".into()).is_noscript());
    }

    #[test]
    fn test_nil_helpers() {
        let r: RedisResult<String> = Err(RedisError::Nil);
        assert!(is_nil(&r));
        assert_eq!(r.optional().unwrap(), None);

        let r: RedisResult<String> = Ok("v".into());
        assert!(!is_nil(&r));
        assert_eq!(r.optional().unwrap(), Some("v".to_string()));

        let r: RedisResult<String> = Err(RedisError::Timeout);
        assert!(r.optional().is_err());
    }
}
