//! # Gatehouse Architecture
//!
//! Gatehouse is the bootstrap layer shared by command-line tools that must log in
//! to a remote service before doing their job. A tool only writes its task; gatehouse
//! parses the connection flags, finds the password, logs in (with a bounded number of
//! retries) and turns whatever the task does into one exit-code convention.
//!
//! ## The Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatcher (dispatch.rs)                                   │
//! │  - Maps a task name to a factory in the Registry            │
//! │  - Owns the exit-code mapping for construction failures     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Launcher (launch.rs) - runs while the task is constructed  │
//! │  parse flags → resolve credentials → bootstrap the session  │
//! │  (resolve.rs)   (resolve.rs, prefs.rs)  (session.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Task Runner (task.rs)                                      │
//! │  - Calls the task body exactly once                         │
//! │  - Any error becomes `ERROR: ...` on stderr and exit 2      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each stage takes plain values and returns a `Result` or an outcome enum; nothing
//! below the binary calls `std::process::exit`. Asking for `--help` is a value too
//! ([`resolve::Invocation::Usage`]), carried up to the single place that exits.
//!
//! ## Collaborators
//!
//! The remote service is reached through the [`session::ServiceClient`] trait and the
//! terminal through [`console::Console`]. Production uses [`client::TcpClient`] and
//! [`console::TermConsole`]; tests swap in scripted implementations, so every stage
//! can be exercised without a terminal or a server.
//!
//! ## Module Overview
//!
//! - [`config`]: Connection flags and their defaults
//! - [`prefs`]: Preferences file loading
//! - [`secret`]: Redacted, zero-on-drop password type
//! - [`console`]: Password prompt and warnings
//! - [`resolve`]: Flag parsing and credential precedence
//! - [`session`]: Login state machine with bounded retry
//! - [`client`]: Reference TCP client
//! - [`task`]: Task trait and exit-code boundary
//! - [`launch`]: Constructor-time pipeline for tasks
//! - [`dispatch`]: Task registry and dispatcher
//! - [`error`]: Error types

pub mod client;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod launch;
pub mod prefs;
pub mod resolve;
pub mod secret;
pub mod session;
pub mod task;

pub use config::Configuration;
pub use dispatch::{dispatch, Constructed, Registry};
pub use error::{ConnectError, DispatchError, GatehouseError, Result};
pub use launch::{Launch, Launcher, TaskContext};
pub use secret::Secret;
pub use session::{Bootstrap, Failure, ServiceClient, SessionOutcome};
pub use task::Task;
