use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `GATEHOUSE_LOG=debug`.
pub const LOG_ENV: &str = "GATEHOUSE_LOG";

/// Log to stderr. Quiet unless `GATEHOUSE_LOG` asks for more.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
