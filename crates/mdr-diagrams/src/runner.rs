//! External diagram tool invocation.

use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::consts::{DEFAULT_MERMAID_COMMAND, DEFAULT_TIMEOUT};

/// Error from an external diagram tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool executable could not be started.
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// Tool did not finish within the timeout.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// Tool exited unsuccessfully.
    #[error("exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    /// Tool exited successfully without writing output.
    #[error("no output produced")]
    MissingOutput,
    /// I/O error around the tool invocation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders diagram source to SVG markup.
pub trait DiagramToolRunner: Send + Sync {
    fn render_svg(&self, source: &str) -> Result<String, ToolError>;
}

/// Mermaid CLI (`mmdc`) runner.
///
/// Writes the source to a temporary directory, runs
/// `mmdc -i <in> -o <out> -b transparent` and reads the SVG back.
/// The directory is removed when the call returns.
#[derive(Debug, Clone)]
pub struct MmdcRunner {
    command: String,
    timeout: Duration,
}

impl MmdcRunner {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the upper bound on a single invocation.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for MmdcRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MERMAID_COMMAND)
    }
}

impl DiagramToolRunner for MmdcRunner {
    fn render_svg(&self, source: &str) -> Result<String, ToolError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("diagram.mmd");
        let output = dir.path().join("diagram.svg");
        let stderr_path = dir.path().join("stderr.log");
        std::fs::write(&input, source)?;

        let mut command = Command::new(&self.command);
        command
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(["-b", "transparent"]);
        run_with_timeout(&mut command, &stderr_path, self.timeout)?;

        match std::fs::read_to_string(&output) {
            Ok(svg) => Ok(svg),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ToolError::MissingOutput),
            Err(e) => Err(e.into()),
        }
    }
}

/// Interval between child status checks.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run a command to completion, killing it once `timeout` elapses.
///
/// Stderr goes to `stderr_path` so a chatty tool cannot block on a full pipe.
pub fn run_with_timeout(
    command: &mut Command,
    stderr_path: &Path,
    timeout: Duration,
) -> Result<(), ToolError> {
    let stderr = File::create(stderr_path)?;
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(|source| ToolError::Spawn {
            command: command.get_program().to_string_lossy().into_owned(),
            source,
        })?;

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() > timeout {
            child.kill()?;
            child.wait()?;
            return Err(ToolError::Timeout(timeout));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        let stderr = std::fs::read_to_string(stderr_path).unwrap_or_default();
        return Err(ToolError::Failed {
            status,
            stderr: stderr.trim().to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let runner = MmdcRunner::new("mdr-test-no-such-mmdc");
        let err = runner.render_svg("graph TD\nA-->B").unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
        assert!(err.to_string().contains("mdr-test-no-such-mmdc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let mut command = Command::new("sh");
        command.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_with_timeout(&mut command, &dir.path().join("err"), DEFAULT_TIMEOUT)
            .unwrap_err();
        match err {
            ToolError::Failed { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_command_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut command = Command::new("sleep");
        command.arg("5");
        let err = run_with_timeout(
            &mut command,
            &dir.path().join("err"),
            Duration::from_millis(100),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Timeout(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_without_output_file() {
        let runner = MmdcRunner::new("true");
        let err = runner.render_svg("graph TD").unwrap_err();
        assert!(matches!(err, ToolError::MissingOutput));
    }
}
