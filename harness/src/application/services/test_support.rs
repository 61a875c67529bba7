//! Shared test helpers for service tests.
//!
//! Provides cross-platform `exit_status()`, a scripted `CommandRunner` that
//! records every invocation, and a routed `HttpClient` stub.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, HttpClient, HttpResponse, TeedOutput};
use crate::domain::HarnessError;
use crate::domain::container::display_command;

use super::combined_output;

/// Full id printed by `docker run -d`.
pub const CONTAINER_ID_OUTPUT: &[u8] =
    b"3f2a9c81d0e4b5a6c7d8e9f00112233445566778899aabbccddeeff00112233\n";

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stderr: &[u8]) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Scripted runner ───────────────────────────────────────────────────────────

/// `CommandRunner` that answers from a closure over the argument list and
/// records `program arg...` for every call.
pub struct ScriptedRunner<F> {
    handler: F,
    calls: RefCell<Vec<String>>,
    dirs: RefCell<Vec<PathBuf>>,
}

impl<F> ScriptedRunner<F>
where
    F: Fn(&[&str]) -> Result<Output>,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            calls: RefCell::new(Vec::new()),
            dirs: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Working directories passed to `run_teed`.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs.borrow().clone()
    }
}

impl<F> CommandRunner for ScriptedRunner<F>
where
    F: Fn(&[&str]) -> Result<Output>,
{
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.calls
            .borrow_mut()
            .push(display_command(program, args));
        (self.handler)(args)
    }

    async fn run_teed(&self, program: &str, args: &[&str], dir: &Path) -> Result<TeedOutput> {
        self.calls
            .borrow_mut()
            .push(display_command(program, args));
        self.dirs.borrow_mut().push(dir.to_path_buf());
        let output = (self.handler)(args)?;
        Ok(TeedOutput {
            status: output.status,
            log: combined_output(&output),
        })
    }
}

/// Handler for a container runtime whose health status walks `statuses`,
/// then stays `starting`.
pub fn docker_with_statuses(statuses: &[&'static str]) -> impl Fn(&[&str]) -> Result<Output> {
    let statuses = RefCell::new(statuses.iter().copied().collect::<VecDeque<_>>());
    move |args| {
        Ok(match args {
            ["run", "-d", ..] => ok_output(CONTAINER_ID_OUTPUT),
            ["inspect", ..] => {
                let status = statuses.borrow_mut().pop_front().unwrap_or("starting");
                ok_output(format!("{status}\n").as_bytes())
            }
            ["container", "port", ..] => ok_output(b"8080/tcp -> 0.0.0.0:32768\n"),
            _ => ok_output(b""),
        })
    }
}

// ── HTTP stub ─────────────────────────────────────────────────────────────────

/// `HttpClient` answering from a fixed route table. Unknown URLs fail with
/// a transport error.
#[derive(Default)]
pub struct StubHttp {
    routes: HashMap<String, HttpResponse>,
    hits: RefCell<HashMap<String, usize>>,
    headers: RefCell<Vec<(String, String)>>,
}

impl StubHttp {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.routes.insert(
            url.to_string(),
            HttpResponse {
                status,
                headers: HashMap::new(),
                body: body.to_vec(),
            },
        );
        self
    }

    #[must_use]
    pub fn route_response(mut self, url: &str, response: HttpResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.borrow().get(url).copied().unwrap_or(0)
    }

    /// Every `(name, value)` header sent so far.
    pub fn sent_headers(&self) -> Vec<(String, String)> {
        self.headers.borrow().clone()
    }
}

impl HttpClient for StubHttp {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        *self.hits.borrow_mut().entry(url.to_string()).or_default() += 1;
        self.headers.borrow_mut().extend(
            headers
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string())),
        );
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| HarnessError::Transport(format!("no route to {url}")).into())
    }
}
