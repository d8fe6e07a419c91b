//! # Credential Resolution
//!
//! Turns a task's raw arguments into a [`Configuration`] with a password.
//!
//! Parsing happens first and fails fast: a bad flag is reported before any
//! file is read or any prompt is shown. `--help` short-circuits everything and
//! comes back as [`Invocation::Usage`] so the caller can print it and exit.
//!
//! Credentials are then settled once, in this order:
//!
//! 1. `--prefs <path>` given: load the file and let it overwrite host, port,
//!    username, password and environment, even values passed as flags.
//! 2. No password from any source: prompt for one, showing the username.
//! 3. Otherwise keep what the flags (or defaults) say.

use crate::config::Configuration;
use crate::console::{password_prompt, Console};
use crate::error::{GatehouseError, Result};
use crate::prefs::Preferences;
use clap::parser::ValueSource;
use clap::{ArgMatches, Args, Command, FromArgMatches};
use tracing::debug;

/// What the arguments asked for.
#[derive(Debug)]
pub enum Invocation<A> {
    /// `--help` was given. Holds the rendered usage text.
    Usage(String),
    Parsed { config: Configuration, options: A },
}

/// Extra flags for tasks that only need the connection flags.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct NoOptions {}

/// The clap command for a task: the connection flags plus the task's own.
pub fn command<A: Args>(program: &'static str) -> Command {
    let cmd = Command::new(program)
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true);
    A::augment_args(Configuration::augment_args(cmd))
}

pub fn usage<A: Args>(program: &'static str) -> String {
    command::<A>(program).render_help().to_string()
}

fn wants_help(args: &[String]) -> bool {
    args.iter().take_while(|a| a.as_str() != "--").any(|a| a == "--help")
}

fn parameter_error(err: clap::Error) -> GatehouseError {
    let rendered = err.render().to_string();
    let message = rendered.trim().trim_start_matches("error: ");
    GatehouseError::Parameter(message.to_string())
}

pub fn parse_args<A>(program: &'static str, args: &[String]) -> Result<Invocation<A>>
where
    A: Args + FromArgMatches,
{
    parse_args_with_defaults(program, args, None)
}

/// Like [`parse_args`], but connection flags the user did not type take their
/// value from `defaults` instead of the built-in defaults.
pub fn parse_args_with_defaults<A>(
    program: &'static str,
    args: &[String],
    defaults: Option<&Preferences>,
) -> Result<Invocation<A>>
where
    A: Args + FromArgMatches,
{
    parse_args_seeded(program, args, || Ok(defaults.cloned()))
}

/// Parse `args`, calling `load_defaults` for seeded flag defaults only when
/// they can matter: not for `--help`, not when `--prefs` is given.
pub fn parse_args_seeded<A, D>(
    program: &'static str,
    args: &[String],
    load_defaults: D,
) -> Result<Invocation<A>>
where
    A: Args + FromArgMatches,
    D: FnOnce() -> Result<Option<Preferences>>,
{
    if wants_help(args) {
        return Ok(Invocation::Usage(usage::<A>(program)));
    }

    let mut cmd = command::<A>(program);
    let matches = cmd.try_get_matches_from_mut(args).map_err(parameter_error)?;
    let mut config = Configuration::from_arg_matches(&matches).map_err(parameter_error)?;
    let options = A::from_arg_matches(&matches).map_err(parameter_error)?;

    if config.help {
        return Ok(Invocation::Usage(cmd.render_help().to_string()));
    }
    if config.prefs.is_none() {
        if let Some(defaults) = load_defaults()? {
            seed_defaults(&mut config, &matches, &defaults);
        }
    }
    Ok(Invocation::Parsed { config, options })
}

fn typed(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.value_source(id), Some(ValueSource::CommandLine))
}

fn seed_defaults(config: &mut Configuration, matches: &ArgMatches, defaults: &Preferences) {
    if !typed(matches, "host") {
        config.host = defaults.host.clone();
    }
    if !typed(matches, "port") {
        config.port = defaults.port;
    }
    if !typed(matches, "username") {
        config.username = defaults.username.clone();
    }
    if !typed(matches, "password") {
        config.password = defaults.password.clone();
    }
    if !typed(matches, "environment") {
        config.environment = defaults.environment.clone();
    }
}

/// Settle the password (and maybe everything else) for `config`.
pub fn resolve_credentials(config: &mut Configuration, console: &mut dyn Console) -> Result<()> {
    if let Some(path) = config.prefs.clone() {
        let prefs = Preferences::load(&path)?;
        config.apply_preferences(&prefs);
        debug!(path = %path.display(), host = %config.host, port = config.port, "using preferences file");
    } else if !config.has_password() {
        let password = console.read_secret(&password_prompt(&config.username))?;
        config.password = Some(password);
    }
    Ok(())
}

/// Parse and settle credentials in one go.
pub fn resolve<A>(
    program: &'static str,
    args: &[String],
    defaults: Option<&Preferences>,
    console: &mut dyn Console,
) -> Result<Invocation<A>>
where
    A: Args + FromArgMatches,
{
    resolve_seeded(program, args, || Ok(defaults.cloned()), console)
}

/// [`resolve`] with lazily loaded flag defaults, see [`parse_args_seeded`].
pub fn resolve_seeded<A, D>(
    program: &'static str,
    args: &[String],
    load_defaults: D,
    console: &mut dyn Console,
) -> Result<Invocation<A>>
where
    A: Args + FromArgMatches,
    D: FnOnce() -> Result<Option<Preferences>>,
{
    match parse_args_seeded::<A, D>(program, args, load_defaults)? {
        Invocation::Usage(text) => Ok(Invocation::Usage(text)),
        Invocation::Parsed {
            mut config,
            options,
        } => {
            resolve_credentials(&mut config, console)?;
            Ok(Invocation::Parsed { config, options })
        }
    }
}
