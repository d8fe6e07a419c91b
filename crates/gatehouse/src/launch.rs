//! # Launching a Task
//!
//! Everything that has to happen before a task can do its job: parse its
//! arguments, settle credentials and log in. Task factories call
//! [`Launcher::launch`] while constructing the task, so a task never exists
//! without a live session.
//!
//! The launcher owns the policy knobs: which client to use, how many login
//! attempts to allow, which console to prompt on, and whether to seed flag
//! defaults from the user's preferences file.

use crate::config::{Configuration, DEFAULT_LOGIN_ATTEMPTS};
use crate::console::{Console, TermConsole};
use crate::dispatch::Constructed;
use crate::error::Result;
use crate::prefs::Preferences;
use crate::resolve::{resolve_seeded, Invocation, NoOptions};
use crate::session::{bootstrap, ServiceClient};
use crate::task::Task;
use clap::{Args, FromArgMatches};
use tracing::debug;

/// What a task gets handed once it is allowed to run.
pub struct TaskContext<S, A = NoOptions> {
    pub config: Configuration,
    pub session: S,
    pub options: A,
}

pub enum Launch<S, A = NoOptions> {
    Usage(String),
    Ready(TaskContext<S, A>),
}

impl<S, A> Launch<S, A> {
    /// Build the task from a ready context, or pass the usage text through.
    pub fn construct<T, F>(self, build: F) -> Constructed
    where
        T: Task + 'static,
        F: FnOnce(TaskContext<S, A>) -> T,
    {
        match self {
            Launch::Usage(text) => Constructed::Usage(text),
            Launch::Ready(context) => Constructed::Task(Box::new(build(context))),
        }
    }
}

pub struct Launcher<C, K = TermConsole> {
    client: C,
    console: K,
    attempts: u32,
    defaults: Option<Preferences>,
    home_app: Option<String>,
}

impl<C: ServiceClient> Launcher<C, TermConsole> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            console: TermConsole::new(),
            attempts: DEFAULT_LOGIN_ATTEMPTS,
            defaults: None,
            home_app: None,
        }
    }
}

impl<C: ServiceClient, K: Console> Launcher<C, K> {
    pub fn with_console<K2: Console>(self, console: K2) -> Launcher<C, K2> {
        Launcher {
            client: self.client,
            console,
            attempts: self.attempts,
            defaults: self.defaults,
            home_app: self.home_app,
        }
    }

    /// Login attempts allowed before giving up. `0` still tries once.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Use `prefs` instead of the built-in flag defaults.
    pub fn with_defaults(mut self, prefs: Preferences) -> Self {
        self.defaults = Some(prefs);
        self
    }

    /// Seed flag defaults from `~/<app>_client.prefs` if that file exists.
    ///
    /// The file is read during [`Launcher::launch`], and only when the
    /// invocation is neither `--help` nor `--prefs`. Explicit
    /// [`Launcher::with_defaults`] take priority.
    pub fn with_home_defaults(mut self, app: &str) -> Self {
        self.home_app = Some(app.to_string());
        self
    }

    pub fn console(&self) -> &K {
        &self.console
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Parse `args` for `program`, settle credentials and log in.
    ///
    /// A login that ends without a session is returned as an error
    /// ([`crate::GatehouseError::LoginFailed`] or
    /// [`crate::GatehouseError::Connection`]).
    pub fn launch<A>(&mut self, program: &'static str, args: &[String]) -> Result<Launch<C::Session, A>>
    where
        A: Args + FromArgMatches,
    {
        let (defaults, home_app) = (self.defaults.as_ref(), self.home_app.as_deref());
        let invocation = resolve_seeded::<A, _>(
            program,
            args,
            || load_defaults(defaults, home_app),
            &mut self.console,
        )?;
        let (mut config, options) = match invocation {
            Invocation::Usage(text) => return Ok(Launch::Usage(text)),
            Invocation::Parsed { config, options } => (config, options),
        };

        let session =
            bootstrap(&self.client, &mut config, self.attempts, &mut self.console).into_result()?;
        Ok(Launch::Ready(TaskContext {
            config,
            session,
            options,
        }))
    }
}

fn load_defaults(given: Option<&Preferences>, home_app: Option<&str>) -> Result<Option<Preferences>> {
    if let Some(prefs) = given {
        return Ok(Some(prefs.clone()));
    }
    let Some(path) = home_app.and_then(Preferences::home_path) else {
        return Ok(None);
    };
    let prefs = Preferences::load_if_exists(&path)?;
    if prefs.is_some() {
        debug!(path = %path.display(), "seeding defaults from home preferences");
    }
    Ok(prefs)
}
