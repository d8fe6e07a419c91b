//! # Session Bootstrap
//!
//! Logs in to the remote service, giving the user a bounded number of chances
//! to fix a wrong password.
//!
//! ```text
//! Init ──► Connecting ──ok──────────────► Connected
//!              │  ▲
//!   rejected   │  │ new password
//!              ▼  │
//!          RetryPrompt ──exhausted──────► Failed
//!
//! Connecting ──unreachable──────────────► Failed   (no retry, no prompt)
//! ```
//!
//! Every rejection costs one attempt. With a bound of `N >= 1` the service is
//! asked exactly `N` times before giving up; a bound of `0` still makes the one
//! initial attempt.
//!
//! The bootstrap never exits the process. A [`SessionOutcome::Failed`] is handed
//! back and the caller decides what it means.

use crate::config::Configuration;
use crate::console::{password_prompt, Console};
use crate::error::{ConnectError, GatehouseError, Result};
use std::fmt;
use std::io;
use tracing::{debug, info, trace, warn};

pub const LOGIN_REJECTED: &str =
    "Error processing login.  Please check username/password combination and try again.";

/// Borrowed view of the parameters a login needs.
#[derive(Clone, Copy)]
pub struct ConnectParams<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub environment: &'a str,
}

impl fmt::Debug for ConnectParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("environment", &self.environment)
            .finish()
    }
}

/// The remote service, as far as the bootstrap is concerned.
///
/// Implementations must report a rejected login as
/// [`ConnectError::Authentication`] and everything else that prevents a
/// session as [`ConnectError::Connection`]. Only the former is retried.
pub trait ServiceClient {
    type Session;

    fn connect(&self, params: &ConnectParams<'_>) -> std::result::Result<Self::Session, ConnectError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Init,
    Connecting,
    RetryPrompt,
    Connected,
    Failed,
}

/// Why a bootstrap ended without a session.
#[derive(Debug)]
pub enum Failure {
    /// Every allowed attempt was rejected.
    Rejected { attempts: u32 },
    /// The service could not be reached at all.
    Unreachable(String),
    /// Asking for a new password failed.
    Prompt(io::Error),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Rejected { attempts } => {
                write!(f, "login rejected after {} attempt(s)", attempts)
            }
            Failure::Unreachable(reason) => write!(f, "service unreachable: {}", reason),
            Failure::Prompt(e) => write!(f, "could not read password: {}", e),
        }
    }
}

impl From<Failure> for GatehouseError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Rejected { attempts } => GatehouseError::LoginFailed { attempts },
            Failure::Unreachable(reason) => GatehouseError::Connection(reason),
            Failure::Prompt(e) => GatehouseError::Io(e),
        }
    }
}

#[derive(Debug)]
pub enum SessionOutcome<S> {
    Connected(S),
    Failed(Failure),
}

impl<S> SessionOutcome<S> {
    pub fn is_connected(&self) -> bool {
        matches!(self, SessionOutcome::Connected(_))
    }

    pub fn session(&self) -> Option<&S> {
        match self {
            SessionOutcome::Connected(session) => Some(session),
            SessionOutcome::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<S> {
        match self {
            SessionOutcome::Connected(session) => Ok(session),
            SessionOutcome::Failed(failure) => Err(failure.into()),
        }
    }
}

/// One login sequence. `run` consumes it, so a finished bootstrap cannot be
/// restarted.
pub struct Bootstrap<'a, C: ServiceClient> {
    client: &'a C,
    console: &'a mut dyn Console,
    state: BootstrapState,
    attempts_remaining: u32,
    connect_attempts: u32,
}

impl<'a, C: ServiceClient> Bootstrap<'a, C> {
    pub fn new(client: &'a C, console: &'a mut dyn Console, attempts: u32) -> Self {
        Self {
            client,
            console,
            state: BootstrapState::Init,
            attempts_remaining: attempts,
            connect_attempts: 0,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    fn enter(&mut self, state: BootstrapState) {
        trace!(from = ?self.state, to = ?state, "bootstrap transition");
        self.state = state;
    }

    /// Log in with the parameters in `config`. A password typed at a retry
    /// prompt replaces `config.password`.
    pub fn run(mut self, config: &mut Configuration) -> SessionOutcome<C::Session> {
        loop {
            self.enter(BootstrapState::Connecting);
            self.connect_attempts += 1;
            debug!(
                host = %config.host,
                port = config.port,
                username = %config.username,
                environment = %config.environment,
                attempt = self.connect_attempts,
                "connecting"
            );

            let reason = match self.client.connect(&config.params()) {
                Ok(session) => {
                    self.enter(BootstrapState::Connected);
                    info!(
                        host = %config.host,
                        port = config.port,
                        attempts = self.connect_attempts,
                        "session established"
                    );
                    return SessionOutcome::Connected(session);
                }
                Err(ConnectError::Connection(reason)) => {
                    self.enter(BootstrapState::Failed);
                    warn!(host = %config.host, port = config.port, %reason, "service unreachable");
                    return SessionOutcome::Failed(Failure::Unreachable(reason));
                }
                Err(ConnectError::Authentication(reason)) => reason,
            };

            self.enter(BootstrapState::RetryPrompt);
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            warn!(
                username = %config.username,
                %reason,
                attempts_remaining = self.attempts_remaining,
                "login rejected"
            );
            self.console.warn(LOGIN_REJECTED);

            if self.attempts_remaining == 0 {
                self.enter(BootstrapState::Failed);
                return SessionOutcome::Failed(Failure::Rejected {
                    attempts: self.connect_attempts,
                });
            }

            match self.console.read_secret(&password_prompt(&config.username)) {
                Ok(password) => config.password = Some(password),
                Err(e) => {
                    self.enter(BootstrapState::Failed);
                    return SessionOutcome::Failed(Failure::Prompt(e));
                }
            }
        }
    }
}

/// Run a fresh [`Bootstrap`] against `client`.
pub fn bootstrap<C: ServiceClient>(
    client: &C,
    config: &mut Configuration,
    attempts: u32,
    console: &mut dyn Console,
) -> SessionOutcome<C::Session> {
    Bootstrap::new(client, console, attempts).run(config)
}
