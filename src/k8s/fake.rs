//! Scriptable command runner for tests

use std::cell::RefCell;
use std::collections::HashMap;

use super::kubectl::{CommandError, CommandRunner, render_command};

/// Records every invocation verbatim and answers from a script keyed by the
/// exact argument list. Unscripted invocations succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    responses: HashMap<Vec<String>, Result<String, String>>,
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `args` with `stdout`
    pub fn with_output(mut self, args: &[&str], stdout: &str) -> Self {
        self.responses.insert(to_owned(args), Ok(stdout.to_string()));
        self
    }

    /// Fail `args` with a nonzero exit carrying `stderr`
    pub fn with_failure(mut self, args: &[&str], stderr: &str) -> Self {
        self.responses.insert(to_owned(args), Err(stderr.to_string()));
        self
    }

    /// Argument lists of every invocation, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|(_, args)| args.clone()).collect()
    }

    pub fn binaries(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(bin, _)| bin.clone()).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, binary: &str, args: &[String]) -> Result<String, CommandError> {
        self.calls
            .borrow_mut()
            .push((binary.to_string(), args.to_vec()));

        match self.responses.get(args) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(stderr)) => Err(CommandError::Failed {
                command: render_command(binary, args),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

fn to_owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
