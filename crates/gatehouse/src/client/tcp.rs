//! Line-delimited JSON client.
//!
//! A login is one request and one reply:
//!
//! ```text
//! → {"op":"login","username":"admin","password":"...","environment":""}
//! ← {"status":"ok","token":"..."}            session established
//! ← {"status":"denied","message":"..."}      credentials rejected (retryable)
//! ← {"status":"error","message":"..."}       anything else (fatal)
//! ```
//!
//! A socket that cannot be opened, or a reply that cannot be read, is a
//! connection failure.

use crate::error::ConnectError;
use crate::session::{ConnectParams, ServiceClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub(crate) enum Request {
    Login {
        username: String,
        password: String,
        environment: String,
    },
    Ping,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum Reply {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
    Denied {
        #[serde(default)]
        message: String,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

pub(crate) fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

pub(crate) fn read_line<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> io::Result<T> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed by service",
        ));
    }
    Ok(serde_json::from_str(line.trim_end())?)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TcpClient;

impl TcpClient {
    pub fn new() -> Self {
        TcpClient
    }
}

impl ServiceClient for TcpClient {
    type Session = TcpSession;

    fn connect(&self, params: &ConnectParams<'_>) -> Result<TcpSession, ConnectError> {
        let unreachable = |e: io::Error| {
            ConnectError::Connection(format!("{}:{}: {}", params.host, params.port, e))
        };

        let writer = TcpStream::connect((params.host, params.port)).map_err(unreachable)?;
        let reader = BufReader::new(writer.try_clone().map_err(unreachable)?);
        let mut session = TcpSession {
            reader,
            writer,
            token: String::new(),
            host: params.host.to_string(),
            port: params.port,
            username: params.username.to_string(),
            environment: params.environment.to_string(),
        };

        let login = Request::Login {
            username: params.username.to_string(),
            password: params.password.to_string(),
            environment: params.environment.to_string(),
        };
        match session.exchange(&login).map_err(unreachable)? {
            Reply::Ok { token } => {
                session.token = token.unwrap_or_default();
                debug!(host = %session.host, port = session.port, "login accepted");
                Ok(session)
            }
            Reply::Denied { message } => Err(ConnectError::Authentication(message)),
            Reply::Error { message } => Err(ConnectError::Connection(message)),
        }
    }
}

/// An authenticated connection. Closed when dropped.
pub struct TcpSession {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    token: String,
    host: String,
    port: u16,
    username: String,
    environment: String,
}

impl TcpSession {
    fn exchange(&mut self, request: &Request) -> io::Result<Reply> {
        write_line(&mut self.writer, request)?;
        read_line(&mut self.reader)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Round trip a ping through the service.
    pub fn ping(&mut self) -> io::Result<Duration> {
        let started = Instant::now();
        match self.exchange(&Request::Ping)? {
            Reply::Ok { .. } => Ok(started.elapsed()),
            Reply::Denied { message } | Reply::Error { message } => Err(io::Error::other(message)),
        }
    }
}
