//! # Dispatcher
//!
//! One executable, many tools: the first argument names a task, the rest are
//! that task's own flags. Tasks are looked up in a [`Registry`] filled in at
//! startup, so the set of runnable tasks is fixed and can be listed.
//!
//! | Situation | Output | Exit |
//! |-----------|--------|------|
//! | no task name | `ERROR: Please specify a task to run` | 1 |
//! | unknown name | `ERROR: Cannot execute task named <name> ...` | 1 |
//! | construction fails (bad flag, prefs, login) | `ERROR: <reason>` | 1 |
//! | `--help` | usage on stdout | 1 |
//! | task ran | whatever [`task::run`] returns | 0 or 2 |
//!
//! The dispatcher itself takes no flags.

use crate::error::{DispatchError, Result};
use crate::task::{self, exit, report_error, Task};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info};

/// The result of constructing a task.
pub enum Constructed {
    /// The task was asked for its usage instead of being run.
    Usage(String),
    Task(Box<dyn Task>),
}

/// Builds a task from its name and remaining arguments. Construction is where
/// credentials are resolved and the session is established.
pub type TaskFactory = Box<dyn Fn(&'static str, &[String]) -> Result<Constructed>>;

#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<&'static str, TaskFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: &'static str, factory: F) -> &mut Self
    where
        F: Fn(&'static str, &[String]) -> Result<Constructed> + 'static,
    {
        self.factories.insert(name, Box::new(factory));
        self
    }

    pub fn with<F>(mut self, name: &'static str, factory: F) -> Self
    where
        F: Fn(&'static str, &[String]) -> Result<Constructed> + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Find and construct the task called `name`.
    pub fn construct(&self, name: &str, args: &[String]) -> Result<Constructed> {
        let (&key, factory) = self.factories.get_key_value(name).ok_or_else(|| {
            DispatchError::UnknownTask {
                name: name.to_string(),
                available: self.names().iter().map(|n| n.to_string()).collect(),
            }
        })?;
        debug!(task = key, args = args.len(), "constructing task");
        factory(key, args)
    }
}

/// Run the task named by `argv[0]` with `argv[1..]` and return the exit code.
pub fn dispatch(
    registry: &Registry,
    argv: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let Some((name, args)) = argv.split_first() else {
        report_error(err, &DispatchError::MissingTask);
        return exit::DISPATCH_FAILURE;
    };

    let constructed = match registry.construct(name, args) {
        Ok(constructed) => constructed,
        Err(e) => {
            info!(task = %name, error = %e, "task could not be constructed");
            report_error(err, &e);
            return exit::DISPATCH_FAILURE;
        }
    };

    match constructed {
        Constructed::Usage(text) => {
            let _ = write!(out, "{}", text);
            let _ = out.flush();
            exit::USAGE
        }
        Constructed::Task(mut task) => {
            let code = task::run(task.as_mut(), err);
            debug!(task = %name, code, "task finished");
            code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatehouseError;
    use std::cell::Cell;
    use std::rc::Rc;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(registry: &Registry, argv: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = dispatch(registry, &args(argv), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn registry() -> Registry {
        Registry::new()
            .with("ok", |_, _| {
                Ok(Constructed::Task(Box::new(|| -> anyhow::Result<()> { Ok(()) })))
            })
            .with("fails", |_, _| {
                Ok(Constructed::Task(Box::new(|| -> anyhow::Result<()> {
                    anyhow::bail!("disk full")
                })))
            })
            .with("usage", |name, _| Ok(Constructed::Usage(format!("Usage: {}\n", name))))
            .with("bad-args", |_, args| {
                Err(GatehouseError::Parameter(format!("unexpected argument '{}'", args[0])))
            })
    }

    #[test]
    fn test_missing_task_name() {
        let (code, _, err) = run(&registry(), &[]);
        assert_eq!(code, 1);
        assert_eq!(err, "ERROR: Please specify a task to run\n");
    }

    #[test]
    fn test_unknown_task_names_identifier() {
        let (code, out, err) = run(&registry(), &["frobnicate", "-p", "1"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("ERROR: "));
        assert!(err.contains("frobnicate"));
        assert!(err.contains("bad-args, fails, ok, usage"));
    }

    #[test]
    fn test_success_propagates_zero() {
        assert_eq!(run(&registry(), &["ok"]).0, 0);
    }

    #[test]
    fn test_task_failure_propagates_two() {
        let (code, _, err) = run(&registry(), &["fails"]);
        assert_eq!(code, 2);
        assert_eq!(err, "ERROR: disk full\n");
    }

    #[test]
    fn test_usage_is_exit_one_on_stdout() {
        let (code, out, err) = run(&registry(), &["usage", "--help"]);
        assert_eq!(code, 1);
        assert_eq!(out, "Usage: usage\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_construction_error_is_exit_one() {
        let (code, _, err) = run(&registry(), &["bad-args", "--nope"]);
        assert_eq!(code, 1);
        assert_eq!(err, "ERROR: unexpected argument '--nope'\n");
    }

    #[test]
    fn test_factory_receives_name_and_remaining_args() {
        let seen = Rc::new(Cell::new(0usize));
        let seen_in = Rc::clone(&seen);
        let registry = Registry::new().with("count", move |name, args| {
            assert_eq!(name, "count");
            seen_in.set(args.len());
            Ok(Constructed::Task(Box::new(|| -> anyhow::Result<()> { Ok(()) })))
        });
        assert_eq!(run(&registry, &["count", "-h", "db", "-p", "1"]).0, 0);
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = registry();
        registry.register("ok", |_, _| Ok(Constructed::Usage(String::new())));
        assert_eq!(run(&registry, &["ok"]).0, 1);
        assert_eq!(registry.names().len(), 4);
        assert!(registry.contains("fails"));
        assert!(!Registry::new().contains("fails"));
    }
}
