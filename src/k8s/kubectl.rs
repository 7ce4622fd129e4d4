//! Kubectl invocation: the command runner seam and its process-backed implementation

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::string::FromUtf8Error;
use std::thread;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to start command `{command}`: {source}")]
    Spawn {
        command: String,
        source: io::Error,
    },

    #[error("error running command `{command}`: {}\n{stderr}", describe_exit(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to wait for command `{command}`: {source}")]
    Wait {
        command: String,
        source: io::Error,
    },

    #[error("command `{command}` produced non UTF-8 output: {source}")]
    Output {
        command: String,
        source: FromUtf8Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Runs an external binary and hands back its captured stdout.
pub trait CommandRunner {
    fn run(&self, binary: &str, args: &[String]) -> Result<String, CommandError>;
}

/// Render a command line the way an operator would type it
pub fn render_command(binary: &str, args: &[String]) -> String {
    std::iter::once(binary)
        .chain(args.iter().map(String::as_str))
        .map(quote_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a word only if a shell would split or expand it; `=` and `,` stay bare
fn quote_word(word: &str) -> std::borrow::Cow<'_, str> {
    let bare = !word.is_empty()
        && word.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '@' | '+' | '%')
        });
    if bare {
        word.into()
    } else {
        shell_words::quote(word)
    }
}

/// Runs commands as child processes.
///
/// Child stdout and stderr are echoed to this process's console as they
/// arrive and are also buffered in full, so long pipeline runs stay visible
/// while callers still get the complete output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    kubeconfig: Option<PathBuf>,
    echo: bool,
}

impl ProcessRunner {
    pub fn new(kubeconfig: Option<PathBuf>) -> Self {
        Self {
            kubeconfig,
            echo: true,
        }
    }

    /// Disable console echo, keeping only the captured copy
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, binary: &str, args: &[String]) -> Result<String, CommandError> {
        let command = render_command(binary, args);
        crate::log_info!("Running the following command: {}", command);

        let mut cmd = Command::new(binary);
        if let Some(kc) = &self.kubeconfig {
            cmd.env("KUBECONFIG", kc);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?;

        let wait_error = |source: io::Error| CommandError::Wait {
            command: command.clone(),
            source,
        };

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| wait_error(io::Error::other("stdout was not piped")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| wait_error(io::Error::other("stderr was not piped")))?;

        let echo = self.echo;
        let stdout_handle = thread::spawn(move || tee(stdout, echo.then(io::stdout)));
        let stderr_handle = thread::spawn(move || tee(stderr, echo.then(io::stderr)));

        let status = child.wait().map_err(wait_error)?;
        let stdout = join_output(stdout_handle).map_err(wait_error)?;
        let stderr = join_output(stderr_handle).map_err(wait_error)?;

        tracing::debug!(exit_code = ?status.code(), "command finished");

        if !status.success() {
            return Err(CommandError::Failed {
                command,
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        String::from_utf8(stdout).map_err(|source| CommandError::Output { command, source })
    }
}

/// Copy a child stream into memory, mirroring each chunk to `console` if given
fn tee<R: Read, W: Write>(mut reader: R, mut console: Option<W>) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        captured.extend_from_slice(&buf[..n]);

        // A closed console must not lose the captured copy
        if let Some(out) = console.as_mut()
            && out.write_all(&buf[..n]).and_then(|_| out.flush()).is_err()
        {
            console = None;
        }
    }

    Ok(captured)
}

fn join_output(handle: thread::JoinHandle<io::Result<Vec<u8>>>) -> io::Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(io::Error::other("output reader thread panicked")),
    }
}

/// A command runner bound to one kubectl binary
pub struct Kubectl<'r> {
    runner: &'r dyn CommandRunner,
    binary: String,
}

impl<'r> Kubectl<'r> {
    pub fn new(runner: &'r dyn CommandRunner, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run kubectl with the given arguments and return its stdout
    pub fn run(&self, args: &[String]) -> Result<String, CommandError> {
        self.runner.run(&self.binary, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::fake::FakeRunner;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_command_keeps_flag_values_bare() {
        assert_eq!(
            render_command("kubectl", &args(&["api-resources", "--verbs=list", "-o", "name"])),
            "kubectl api-resources --verbs=list -o name"
        );
        assert_eq!(
            render_command(
                "kubectl",
                &args(&["delete", "deployment.apps/web", "--ignore-not-found=true"])
            ),
            "kubectl delete deployment.apps/web --ignore-not-found=true"
        );
        assert_eq!(
            render_command(
                "kubectl",
                &args(&["get", "-l", "deploy.cloud.google.com/target-id=t1,a=b", "--namespace=a"])
            ),
            "kubectl get -l deploy.cloud.google.com/target-id=t1,a=b --namespace=a"
        );
    }

    #[test]
    fn test_render_command_quotes_shell_words() {
        assert_eq!(
            render_command("kubectl", &args(&["get", "", "a;b", "$HOME"])),
            "kubectl get '' 'a;b' '$HOME'"
        );
    }

    #[test]
    fn test_render_command_quotes_selector() {
        let rendered = render_command("kubectl", &args(&["get", "-l", "a=b,c=d e"]));
        assert_eq!(rendered, "kubectl get -l 'a=b,c=d e'");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_stdout() {
        let runner = ProcessRunner::default().without_echo();
        let output = runner
            .run("sh", &args(&["-c", "echo pods; echo services"]))
            .unwrap();
        assert_eq!(output, "pods\nservices\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_passes_args_verbatim() {
        let runner = ProcessRunner::default().without_echo();
        let output = runner
            .run(
                "sh",
                &args(&["-c", "printf '%s\\n' \"$@\"", "sh", "-o name", "--namespace=a"]),
            )
            .unwrap();
        assert_eq!(output, "-o name\n--namespace=a\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_reports_stderr_on_failure() {
        let runner = ProcessRunner::default().without_echo();
        let err = runner
            .run("sh", &args(&["-c", "echo partial; echo boom >&2; exit 3"]))
            .unwrap_err();

        match &err {
            CommandError::Failed { code, stderr, .. } => {
                assert_eq!(*code, Some(3));
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("exit status 3"));
        assert!(message.ends_with("boom\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_sets_kubeconfig() {
        let runner =
            ProcessRunner::new(Some(PathBuf::from("/tmp/cluster.kubeconfig"))).without_echo();
        let output = runner
            .run("sh", &args(&["-c", "echo \"$KUBECONFIG\""]))
            .unwrap();
        assert_eq!(output, "/tmp/cluster.kubeconfig\n");
    }

    #[test]
    fn test_process_runner_missing_binary() {
        let runner = ProcessRunner::default().without_echo();
        let err = runner
            .run("/nonexistent/kubectl-xyz", &args(&["version"]))
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
        assert!(err.to_string().contains("failed to start command"));
    }

    #[test]
    fn test_tee_without_console() {
        let data: &[u8] = b"line one\nline two\n";
        let captured = tee(data, None::<Vec<u8>>).unwrap();
        assert_eq!(captured, data);
    }

    #[test]
    fn test_tee_mirrors_to_console() {
        let data: &[u8] = b"deployment.apps/web\n";
        let mut console = Vec::new();
        let captured = tee(data, Some(&mut console)).unwrap();
        assert_eq!(captured, data);
        assert_eq!(console, data);
    }

    #[test]
    fn test_kubectl_binds_binary() {
        let fake = FakeRunner::new();
        let kubectl = Kubectl::new(&fake, "/usr/local/bin/kubectl");
        kubectl.run(&args(&["version"])).unwrap();

        assert_eq!(kubectl.binary(), "/usr/local/bin/kubectl");
        assert_eq!(fake.binaries(), vec!["/usr/local/bin/kubectl".to_string()]);
    }
}
