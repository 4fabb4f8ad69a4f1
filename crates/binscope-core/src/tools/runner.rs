//! Bounded subprocess execution.
//!
//! A tool that is missing, fails, or outlives its timeout yields `None`.
//! Nothing here returns an error to the caller.

use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::process::Command;
use tokio::time::Instant;

use crate::ExploreContext;
use crate::ExploreError;
use crate::Result;
use crate::config::ToolConfig;

/// Runs external tools with a per-invocation timeout.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    search_path: Option<OsString>,
    timeout: Duration,
}

impl ToolRunner {
    /// Creates a runner whose timeout is the smaller of the configured
    /// timeout and the time left on the context deadline.
    #[must_use]
    pub fn new(config: &ToolConfig, ctx: &ExploreContext) -> Self {
        let timeout = ctx
            .remaining()
            .map_or(config.timeout, |left| left.min(config.timeout));
        Self {
            search_path: config.search_path.clone(),
            timeout,
        }
    }

    /// Returns the effective per-invocation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `name` on the configured search path.
    ///
    /// # Errors
    ///
    /// Returns `ExploreError::ToolUnavailable` if `name` is not found.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        match &self.search_path {
            Some(paths) => std::env::current_dir()
                .map_err(|e| ExploreError::ToolUnavailable(format!("{name}: {e}")))
                .and_then(|cwd| {
                    which::which_in(name, Some(paths), cwd)
                        .map_err(|e| ExploreError::ToolUnavailable(format!("{name}: {e}")))
                }),
            None => which::which(name)
                .map_err(|e| ExploreError::ToolUnavailable(format!("{name}: {e}"))),
        }
    }

    /// Runs `name flags... target` and returns its stdout on success.
    pub async fn run(&self, name: &str, flags: &[&str], target: &Path) -> Option<String> {
        let program = self
            .locate(name)
            .map_err(|e| log::debug!("{e}"))
            .ok()?;

        let mut command = Command::new(&program);
        command
            .args(flags)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| log::debug!("failed to spawn {name}: {e}"))
            .ok()?;

        let pid = child.id();
        let stdout = child.stdout.take();
        let reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stdout) = stdout {
                stdout.read_to_end(&mut buf).await?;
            }
            Ok::<_, std::io::Error>(buf)
        });

        let deadline = Instant::now() + self.timeout;
        let status = match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                log::debug!("waiting for {name} failed: {e}");
                return None;
            }
            Err(_) => {
                log::warn!("{name} timed out after {:?}", self.timeout);
                terminate(&mut child).await;
                reader.abort();
                return None;
            }
        };

        if !status.success() {
            log::debug!("{name} exited with {status}");
            return None;
        }

        // A detached grandchild may hold the pipe open past the exit.
        match tokio::time::timeout_at(deadline, reader).await {
            Ok(Ok(Ok(buf))) => Some(String::from_utf8_lossy(&buf).into_owned()),
            Ok(Ok(Err(e))) => {
                log::debug!("reading {name} output failed: {e}");
                None
            }
            Ok(Err(e)) => {
                log::debug!("{name} output reader failed: {e}");
                None
            }
            Err(_) => {
                log::warn!("{name} output still open after {:?}", self.timeout);
                if let Some(pid) = pid {
                    kill_group(pid);
                }
                None
            }
        }
    }
}

async fn terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        kill_group(pid);
    }
    if let Err(e) = child.start_kill() {
        log::debug!("failed to kill child: {e}");
    }
    let _ = child.wait().await;
}

#[cfg(unix)]
fn kill_group(pid: u32) {
    use nix::sys::signal::Signal;
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        log::debug!("failed to signal process group {pid}: {e}");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}
