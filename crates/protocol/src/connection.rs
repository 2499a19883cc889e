//! Connection boundary - one message out, one message in.
//!
//! [`Connection`] is the only transport contract the session needs. The stock
//! implementation, [`StreamConnection`], frames messages over any reliable
//! ordered byte stream (TCP in production, `tokio::io::duplex` or
//! `tokio_test::io` in tests).

use std::future::Future;
use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::codec::{DecodeError, Message, Opcode, MAX_FRAME_LEN};
use crate::config::ClientConfig;
use crate::wire_log::{WireDirection, WireLog};

/// Transport failures. All of them end the session that sees them.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed by peer")]
    Closed,
    #[error("I/O error: {0}")]
    Io(io::Error),
    #[error("malformed message: {0}")]
    Decode(#[from] DecodeError),
    #[error("no message within {0:?}")]
    Timeout(Duration),
}

impl From<io::Error> for ConnectionError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => ConnectionError::Closed,
            _ => ConnectionError::Io(e),
        }
    }
}

/// Half-duplex message transport.
///
/// `send` returns once the frame is handed to the transport; `receive` waits
/// for exactly one complete message.
pub trait Connection {
    fn send(&mut self, msg: Message) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    fn receive(&mut self) -> impl Future<Output = Result<Message, ConnectionError>> + Send;
}

/// [`Connection`] over an async byte stream
#[derive(Debug)]
pub struct StreamConnection<S> {
    stream: S,
    receive_timeout: Option<Duration>,
    wire_log: Option<WireLog>,
}

impl<S> StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            receive_timeout: None,
            wire_log: None,
        }
    }

    pub fn with_receive_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.receive_timeout = timeout;
        self
    }

    pub fn with_wire_log(mut self, log: Option<WireLog>) -> Self {
        self.wire_log = log;
        self
    }

    async fn read_frame(&mut self) -> Result<Message, ConnectionError> {
        let mut frame = [0u8; MAX_FRAME_LEN];
        self.stream.read_exact(&mut frame[..1]).await?;

        let opcode = Opcode::try_from(frame[0])?;
        let len = 1 + opcode.payload_len();
        self.stream.read_exact(&mut frame[1..len]).await?;

        Ok(Message::decode(&frame[..len])?)
    }
}

impl<S> Connection for StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, msg: Message) -> Result<(), ConnectionError> {
        let frame = msg.encode();
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;
        if let Some(log) = self.wire_log.as_ref() {
            log.record(WireDirection::Tx, &msg);
        }
        Ok(())
    }

    async fn receive(&mut self) -> Result<Message, ConnectionError> {
        let msg = match self.receive_timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_frame())
                .await
                .map_err(|_| ConnectionError::Timeout(limit))??,
            None => self.read_frame().await?,
        };
        if let Some(log) = self.wire_log.as_ref() {
            log.record(WireDirection::Rx, &msg);
        }
        Ok(msg)
    }
}

/// Failure to reach the responder at all, as opposed to a broken session
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("could not reach {addr} within {timeout:?}")]
    Timeout { addr: String, timeout: Duration },
    #[error("could not reach {addr}: {source}")]
    Io { addr: String, source: io::Error },
}

/// Dial the responder described by `config`.
pub async fn connect(config: &ClientConfig) -> Result<StreamConnection<TcpStream>, ConnectError> {
    let addr = config.addr();
    let stream = match tokio::time::timeout(config.connect_timeout, TcpStream::connect(&addr)).await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => return Err(ConnectError::Io { addr, source }),
        Err(_) => {
            return Err(ConnectError::Timeout {
                addr,
                timeout: config.connect_timeout,
            })
        }
    };
    let _ = stream.set_nodelay(true);

    let wire_log = config
        .log_path
        .as_ref()
        .map(|path| WireLog::spawn(path, &addr));

    Ok(StreamConnection::new(stream)
        .with_receive_timeout(config.receive_timeout)
        .with_wire_log(wire_log))
}
