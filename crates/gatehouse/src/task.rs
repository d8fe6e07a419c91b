//! # Task Runner
//!
//! A [`Task`] is the part a tool actually writes. By the time it runs, its
//! session is already established (see [`crate::launch`]), so `execute` only
//! does the work.
//!
//! [`run`] is the one boundary where a task's errors are caught. Whatever the
//! task printed before failing stays printed; the error itself goes to the
//! error stream as `ERROR: <message>` and becomes exit code 2. Tasks must not
//! exit the process themselves.

use std::io::Write;
use tracing::debug;

pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// Usage was requested, or the task could not be found or constructed.
    pub const USAGE: i32 = 1;
    pub const DISPATCH_FAILURE: i32 = 1;
    /// The task started and failed.
    pub const TASK_FAILURE: i32 = 2;
}

pub trait Task {
    fn execute(&mut self) -> anyhow::Result<()>;
}

impl<F> Task for F
where
    F: FnMut() -> anyhow::Result<()>,
{
    fn execute(&mut self) -> anyhow::Result<()> {
        self()
    }
}

/// Write a user-facing error the way every gatehouse tool does.
pub fn report_error(err: &mut dyn Write, message: &dyn std::fmt::Display) {
    let _ = writeln!(err, "ERROR: {:#}", message);
}

/// Execute `task` once and map the result to an exit code.
pub fn run(task: &mut dyn Task, err: &mut dyn Write) -> i32 {
    match task.execute() {
        Ok(()) => exit::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "task failed");
            report_error(err, &e);
            exit::TASK_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn test_success_is_zero() {
        let mut calls = 0;
        let mut task = || -> anyhow::Result<()> {
            calls += 1;
            Ok(())
        };
        let mut err = Vec::new();
        assert_eq!(run(&mut task, &mut err), 0);
        assert_eq!(calls, 1);
        assert!(err.is_empty());
    }

    #[test]
    fn test_error_is_two_with_prefix() {
        let mut task = || -> anyhow::Result<()> { bail!("table not found") };
        let mut err = Vec::new();
        assert_eq!(run(&mut task, &mut err), 2);
        assert_eq!(String::from_utf8(err).unwrap(), "ERROR: table not found\n");
    }

    #[test]
    fn test_any_error_type_is_caught() {
        let mut task = || -> anyhow::Result<()> {
            let n: u16 = "99999".parse()?;
            let _ = n;
            Ok(())
        };
        let mut err = Vec::new();
        assert_eq!(run(&mut task, &mut err), 2);
        assert!(String::from_utf8(err).unwrap().starts_with("ERROR: "));
    }

    struct Counter {
        out: Vec<String>,
    }

    impl Task for Counter {
        fn execute(&mut self) -> anyhow::Result<()> {
            self.out.push("partial".to_string());
            anyhow::bail!("stopped halfway")
        }
    }

    #[test]
    fn test_output_before_failure_is_kept() {
        let mut task = Counter { out: Vec::new() };
        let mut err = Vec::new();
        assert_eq!(run(&mut task, &mut err), 2);
        assert_eq!(task.out, vec!["partial"]);
    }
}
