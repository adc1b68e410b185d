//! Single server connection
//!
//! Owns one TCP stream, performs the connect handshake (`HELLO 3` / `AUTH`,
//! `SELECT`, `CLIENT SETNAME`) and runs request/reply exchanges on it. A
//! connection that timed out or was abandoned mid-exchange is marked broken
//! and never reused: its read buffer may hold a reply to a request nobody is
//! waiting for anymore. Blocking commands are not bound by the operation
//! timeout; the server-side timeout and the caller's context deadline bound
//! them instead.

use crate::cmd::Cmd;
use crate::protocol::{RespDecoder, RespEncoder};
use bytes::{Buf, Bytes, BytesMut};
use redis_compat_core::{ClientConfig, ProtocolVersion, RedisError, RedisResult, RespValue};
use std::io::Cursor;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

/// A connection to a Redis server
pub struct Connection {
    stream: TcpStream,
    read_buffer: BytesMut,
    write_buffer: BytesMut,
    operation_timeout: Duration,
    in_flight: bool,
    broken: bool,
}

impl Connection {
    /// Connect to the endpoint of `config` and run the handshake
    pub async fn connect(config: &ClientConfig) -> RedisResult<Self> {
        let endpoint = config.endpoint()?;
        let addr = format!("{}:{}", endpoint.host, endpoint.port);
        debug!(%addr, "connecting");

        let stream = timeout(config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| RedisError::Timeout)?
            .map_err(|e| RedisError::Connection(format!("failed to connect to {addr}: {e}")))?;
        stream.set_nodelay(true)?;

        let stream = match config.tcp_keepalive {
            Some(time) => {
                let socket = socket2::Socket::from(stream.into_std()?);
                let keepalive = socket2::TcpKeepalive::new().with_time(time);
                socket.set_tcp_keepalive(&keepalive).map_err(|e| {
                    RedisError::Connection(format!("failed to set TCP keepalive: {e}"))
                })?;
                TcpStream::from_std(socket.into())?
            }
            None => stream,
        };

        let mut conn = Self {
            stream,
            read_buffer: BytesMut::with_capacity(8192),
            write_buffer: BytesMut::with_capacity(1024),
            operation_timeout: config.operation_timeout,
            in_flight: false,
            broken: false,
        };
        conn.handshake(config).await?;
        debug!(%addr, "connected");
        Ok(conn)
    }

    async fn handshake(&mut self, config: &ClientConfig) -> RedisResult<()> {
        match config.protocol {
            ProtocolVersion::Resp3 => {
                let mut argv = vec![Bytes::from_static(b"HELLO"), Bytes::from_static(b"3")];
                if let Some(password) = &config.password {
                    let user = config.username.as_deref().unwrap_or("default");
                    argv.push(Bytes::from_static(b"AUTH"));
                    argv.push(Bytes::copy_from_slice(user.as_bytes()));
                    argv.push(Bytes::copy_from_slice(password.as_bytes()));
                }
                self.round_trip(&argv).await.map_err(auth_error)?;
            }
            ProtocolVersion::Resp2 => {
                if let Some(password) = &config.password {
                    let mut argv = vec![Bytes::from_static(b"AUTH")];
                    if let Some(user) = &config.username {
                        argv.push(Bytes::copy_from_slice(user.as_bytes()));
                    }
                    argv.push(Bytes::copy_from_slice(password.as_bytes()));
                    self.round_trip(&argv).await.map_err(auth_error)?;
                }
            }
        }

        if config.database != 0 {
            let db = itoa::Buffer::new().format(config.database).to_owned();
            self.round_trip(&[Bytes::from_static(b"SELECT"), Bytes::from(db)])
                .await?;
        }

        if let Some(name) = &config.client_name {
            let argv = [
                Bytes::from_static(b"CLIENT"),
                Bytes::from_static(b"SETNAME"),
                Bytes::copy_from_slice(name.as_bytes()),
            ];
            self.round_trip(&argv).await?;
        }
        Ok(())
    }

    /// Whether the connection can serve another request
    pub fn is_reusable(&self) -> bool {
        !self.broken && !self.in_flight
    }

    /// Send one command and read its reply
    pub async fn execute(&mut self, cmd: &Cmd) -> RedisResult<RespValue> {
        self.send(cmd.argv(), self.bound(cmd.blocks())).await
    }

    async fn round_trip(&mut self, argv: &[Bytes]) -> RedisResult<RespValue> {
        self.send(argv, Some(self.operation_timeout)).await
    }

    async fn send(&mut self, argv: &[Bytes], bound: Option<Duration>) -> RedisResult<RespValue> {
        self.write_buffer.clear();
        RespEncoder::encode_argv(argv, &mut self.write_buffer);
        let reply = self.exchange(1, bound).await?.pop().unwrap_or(RespValue::Null);
        into_result(reply)
    }

    fn bound(&self, blocks: bool) -> Option<Duration> {
        (!blocks).then_some(self.operation_timeout)
    }

    /// Send every command in one write and read all replies.
    ///
    /// Error replies of individual commands are kept in place as
    /// [`RespValue::Error`]. With `atomic` the batch is wrapped in
    /// `MULTI` / `EXEC` and the elements of the `EXEC` reply are returned.
    pub async fn execute_batch(&mut self, cmds: &[Cmd], atomic: bool) -> RedisResult<Vec<RespValue>> {
        let bound = self.bound(cmds.iter().any(Cmd::blocks));
        self.write_buffer.clear();
        if atomic {
            RespEncoder::encode_argv(&[Bytes::from_static(b"MULTI")], &mut self.write_buffer);
        }
        for cmd in cmds {
            RespEncoder::encode_argv(cmd.argv(), &mut self.write_buffer);
        }
        if !atomic {
            return self.exchange(cmds.len(), bound).await;
        }

        RespEncoder::encode_argv(&[Bytes::from_static(b"EXEC")], &mut self.write_buffer);
        let mut replies = self.exchange(cmds.len() + 2, bound).await?;
        let exec = replies.pop().unwrap_or(RespValue::Null);
        // MULTI and QUEUED acknowledgements; a queueing error aborts EXEC
        if let Some(queued) = replies.into_iter().find(RespValue::is_error) {
            debug!(reply = ?queued, "transaction rejected while queueing");
        }
        match into_result(exec)? {
            RespValue::Null => Err(RedisError::Nil),
            other => other.into_array(),
        }
    }

    async fn exchange(
        &mut self,
        replies: usize,
        bound: Option<Duration>,
    ) -> RedisResult<Vec<RespValue>> {
        if self.broken {
            return Err(RedisError::Connection("connection is broken".to_string()));
        }
        self.in_flight = true;
        let result = match bound {
            Some(limit) => timeout(limit, self.write_and_read(replies)).await,
            None => Ok(self.write_and_read(replies).await),
        };
        match result {
            Ok(Ok(values)) => {
                self.in_flight = false;
                Ok(values)
            }
            Ok(Err(e)) => {
                self.broken = true;
                Err(e)
            }
            Err(_) => {
                warn!(timeout = ?bound, "operation timed out, dropping connection");
                self.broken = true;
                Err(RedisError::Timeout)
            }
        }
    }

    async fn write_and_read(&mut self, replies: usize) -> RedisResult<Vec<RespValue>> {
        self.stream.write_all(&self.write_buffer).await?;
        let mut values = Vec::with_capacity(replies);
        while values.len() < replies {
            match self.read_reply().await? {
                RespValue::Push(push) => debug!(len = push.len(), "ignoring out-of-band push"),
                value => values.push(value),
            }
        }
        Ok(values)
    }

    async fn read_reply(&mut self) -> RedisResult<RespValue> {
        loop {
            let mut cursor = Cursor::new(&self.read_buffer[..]);
            if let Some(value) = RespDecoder::decode(&mut cursor)? {
                let pos = usize::try_from(cursor.position())
                    .map_err(|_| RedisError::Protocol("reply too large".to_string()))?;
                self.read_buffer.advance(pos);
                return Ok(value);
            }

            let n = self.stream.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                return Err(RedisError::Connection(
                    "connection closed by server".to_string(),
                ));
            }
        }
    }
}

fn into_result(reply: RespValue) -> RedisResult<RespValue> {
    match reply {
        RespValue::Error(msg) => Err(RedisError::from_server(msg)),
        other => Ok(other),
    }
}

fn auth_error(e: RedisError) -> RedisError {
    match e {
        RedisError::Server(msg) => RedisError::Auth(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_replies_become_errors() {
        assert!(matches!(
            into_result(RespValue::Error("NOSCRIPT No matching script".into())),
            Err(e) if e.is_noscript()
        ));
        assert!(matches!(
            into_result(RespValue::Error("MOVED 3999 127.0.0.1:6381".into())),
            Err(RedisError::Moved { slot: 3999, .. })
        ));
        assert_eq!(
            into_result(RespValue::Integer(1)).ok(),
            Some(RespValue::Integer(1))
        );
    }

    #[test]
    fn test_auth_failures_are_auth_errors() {
        assert!(matches!(
            auth_error(RedisError::Server("WRONGPASS invalid".into())),
            RedisError::Auth(_)
        ));
        assert!(matches!(auth_error(RedisError::Timeout), RedisError::Timeout));
    }

    /// Accepts one connection, acknowledges the handshake and answers the
    /// next request with a nil after `delay`
    async fn slow_server(delay: Duration) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 1024];
            socket.read(&mut buf).await.unwrap();
            socket.write_all(b"+OK\r\n").await.unwrap();
            socket.read(&mut buf).await.unwrap();
            tokio::time::sleep(delay).await;
            socket.write_all(b"*-1\r\n").await.unwrap();
            let _ = socket.read(&mut buf).await;
        });
        format!("redis://{addr}")
    }

    #[tokio::test]
    async fn test_blocking_command_outlives_operation_timeout() {
        let url = slow_server(Duration::from_millis(300)).await;
        let config = ClientConfig::new(url)
            .with_protocol(ProtocolVersion::Resp3)
            .with_operation_timeout(Duration::from_millis(50));
        let mut conn = Connection::connect(&config).await.unwrap();

        let cmd = crate::commands::list::blpop(&["q"], Duration::from_secs(1));
        let reply = conn.execute(&cmd).await.unwrap();
        assert_eq!(reply, RespValue::Null);
        assert!(conn.is_reusable());
    }

    #[tokio::test]
    async fn test_plain_command_hits_operation_timeout() {
        let url = slow_server(Duration::from_millis(300)).await;
        let config = ClientConfig::new(url)
            .with_protocol(ProtocolVersion::Resp3)
            .with_operation_timeout(Duration::from_millis(50));
        let mut conn = Connection::connect(&config).await.unwrap();

        let err = conn.execute(&crate::commands::list::lpop("q")).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(!conn.is_reusable());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_connect_and_ping() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into());
        let config = ClientConfig::new(url);
        let mut conn = Connection::connect(&config).await.unwrap();
        let reply = conn
            .execute(&crate::commands::server::ping())
            .await
            .unwrap();
        assert_eq!(reply, RespValue::SimpleString("PONG".into()));
        assert!(conn.is_reusable());
    }
}
