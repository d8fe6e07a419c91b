//! # CLI Behavior
//!
//! The only place that knows about the real stdout, stderr and argv.
//!
//! - `logging`: installs the tracing subscriber
//! - `tasks`: the tasks this binary can launch
//!
//! Every task logs in with the reference TCP client, allows
//! [`DEFAULT_LOGIN_ATTEMPTS`] login attempts, and seeds its flag defaults from
//! `~/gatehouse_client.prefs` when that file exists.
//!
//! [`DEFAULT_LOGIN_ATTEMPTS`]: gatehouse::config::DEFAULT_LOGIN_ATTEMPTS

mod logging;
mod tasks;

use gatehouse::dispatch;
use std::io;
use tracing::debug;

pub const APP_NAME: &str = "gatehouse";

pub fn run() -> i32 {
    logging::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let registry = tasks::registry();
    debug!(tasks = ?registry.names(), "registry ready");

    let code = dispatch(&registry, &argv, &mut io::stdout(), &mut io::stderr());
    debug!(code, "exiting");
    code
}
