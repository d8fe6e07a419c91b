//! Built-in tasks.
//!
//! Each task is constructed through a [`Launcher`], so by the time its
//! `execute` runs the session is already logged in.

use super::APP_NAME;
use anyhow::{ensure, Context};
use clap::{Args, FromArgMatches};
use gatehouse::client::{TcpClient, TcpSession};
use gatehouse::resolve::NoOptions;
use gatehouse::{Constructed, Launcher, Registry, Result, Task, TaskContext};

pub fn registry() -> Registry {
    Registry::new()
        .with("ping", |name, args| construct(name, args, Ping::new))
        .with("whoami", |name, args| construct(name, args, WhoAmI::new))
}

fn construct<A, T, F>(name: &'static str, args: &[String], build: F) -> Result<Constructed>
where
    A: Args + FromArgMatches,
    T: Task + 'static,
    F: FnOnce(TaskContext<TcpSession, A>) -> T,
{
    let mut launcher = Launcher::new(TcpClient::new()).with_home_defaults(APP_NAME);
    Ok(launcher.launch::<A>(name, args)?.construct(build))
}

#[derive(Args, Debug)]
pub struct PingOptions {
    /// Number of pings to send
    #[arg(short = 'c', long, default_value_t = 1)]
    count: u32,
}

pub struct Ping {
    session: TcpSession,
    count: u32,
}

impl Ping {
    fn new(ctx: TaskContext<TcpSession, PingOptions>) -> Self {
        Self {
            session: ctx.session,
            count: ctx.options.count,
        }
    }
}

impl Task for Ping {
    fn execute(&mut self) -> anyhow::Result<()> {
        ensure!(self.count > 0, "--count must be at least 1");
        for seq in 1..=self.count {
            let rtt = self
                .session
                .ping()
                .with_context(|| format!("ping {} failed", seq))?;
            println!(
                "pong from {}:{} seq={} time={:.2} ms",
                self.session.host(),
                self.session.port(),
                seq,
                rtt.as_secs_f64() * 1000.0
            );
        }
        Ok(())
    }
}

pub struct WhoAmI {
    session: TcpSession,
}

impl WhoAmI {
    fn new(ctx: TaskContext<TcpSession, NoOptions>) -> Self {
        Self {
            session: ctx.session,
        }
    }
}

impl Task for WhoAmI {
    fn execute(&mut self) -> anyhow::Result<()> {
        let environment = match self.session.environment() {
            "" => "(default)",
            env => env,
        };
        println!("username:    {}", self.session.username());
        println!("service:     {}:{}", self.session.host(), self.session.port());
        println!("environment: {}", environment);
        println!("token:       {}", self.session.token());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_builtin_tasks() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["ping", "whoami"]);
    }

    #[test]
    fn test_ping_usage_mentions_count() {
        let usage = gatehouse::resolve::usage::<PingOptions>("ping");
        assert!(usage.contains("--count"));
        assert!(usage.contains("--port"));
    }
}
