//! # Gatehouse Launcher
//!
//! `gatehouse <task> [task flags]` runs one of the tasks registered in
//! `cli/tasks.rs`. The binary is intentionally thin: the CLI lives in `src/cli/`,
//! the bootstrap logic in the `gatehouse` library, and this file only turns the
//! dispatcher's exit code into the process exit.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/gatehouse-cli/src/cli/)                  │
//! │  - Logging setup (logging.rs)                               │
//! │  - Built-in tasks and the registry (tasks.rs)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/gatehouse/)                                │
//! │  - Dispatcher, launcher, credential resolution, login retry │
//! │  - No stdout/stderr assumptions beyond the writers it gets  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: the task succeeded
//! - `1`: usage was requested, or the task could not be found or constructed
//!   (bad flags, unreadable preferences, failed login)
//! - `2`: the task ran and failed

mod cli;

fn main() {
    std::process::exit(cli::run());
}
