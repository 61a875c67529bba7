//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill.

use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::debug;

use crate::application::ports::{CommandRunner, TeedOutput};
use crate::domain::container::display_command;

/// Default timeout for runtime commands (`run`, `inspect`, `rm`, ...).
///
/// `docker run` may pull the run image on first use.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(300);

/// Production `CommandRunner` using tokio for async process execution.
///
/// `run` is bounded by a timeout and kills the child when it fires.
/// `run_teed` has no timeout: builds take as long as they take.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

#[derive(Clone, Copy)]
enum Sink {
    Stdout,
    Stderr,
}

/// Copy `reader` line by line to `sink` and append each line to `log`.
async fn tee<R: AsyncRead + Unpin>(reader: R, sink: Sink, log: &Mutex<String>) -> Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&line);
        match sink {
            Sink::Stdout => print!("{text}"),
            Sink::Stderr => eprint!("{text}"),
        }
        log.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(&text);
    }
}

/// Drain an optional child pipe. A missing pipe reads as empty.
async fn read_all<R: AsyncRead + Unpin>(handle: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        h.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        debug!(command = %display_command(program, args), "running");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle),
                    read_all(stderr_handle),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout: stdout.with_context(|| format!("reading {program} stdout"))?,
                    stderr: stderr.with_context(|| format!("reading {program} stderr"))?,
                })
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", self.timeout.as_secs())
            }
        }
    }

    async fn run_teed(&self, program: &str, args: &[&str], dir: &Path) -> Result<TeedOutput> {
        debug!(command = %display_command(program, args), dir = %dir.display(), "running teed");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program} in {}", dir.display()))?;

        let stdout = child.stdout.take().context("stdout was not piped")?;
        let stderr = child.stderr.take().context("stderr was not piped")?;
        let log = Mutex::new(String::new());

        let (status, out, err) = tokio::join!(
            child.wait(),
            tee(stdout, Sink::Stdout, &log),
            tee(stderr, Sink::Stderr, &log),
        );
        out.with_context(|| format!("reading {program} stdout"))?;
        err.with_context(|| format!("reading {program} stderr"))?;

        Ok(TeedOutput {
            status: status.with_context(|| format!("waiting for {program}"))?,
            log: log.into_inner().unwrap_or_else(PoisonError::into_inner),
        })
    }
}
