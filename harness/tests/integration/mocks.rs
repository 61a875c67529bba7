//! Fake `CommandRunner` and `HttpClient` for driving a `Harness` end to end.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use cnb_harness::application::{CommandRunner, HttpClient, HttpResponse, TeedOutput};
use cnb_harness::{Harness, HarnessConfig, HarnessError, Timing};

pub const CONTAINER_ID: &str = "9b1c0e7d4a2f";

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

// ── Fake container runtime + pack ─────────────────────────────────────────────

/// Answers `pack` and `docker` like a healthy local daemon would.
#[derive(Default)]
pub struct FakeDocker {
    statuses: Mutex<VecDeque<&'static str>>,
    calls: Mutex<Vec<String>>,
    build_dirs: Mutex<Vec<PathBuf>>,
    fail_build: bool,
}

impl FakeDocker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Health statuses returned by successive `inspect` calls.
    #[must_use]
    pub fn with_statuses(self, statuses: &[&'static str]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().copied().collect();
        self
    }

    #[must_use]
    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn build_dirs(&self) -> Vec<PathBuf> {
        self.build_dirs.lock().unwrap().clone()
    }

    fn record(&self, program: &str, args: &[&str]) {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line);
    }

    fn answer(&self, args: &[&str]) -> Output {
        match args {
            ["run", "-d", ..] => ok_output(format!("{CONTAINER_ID}5e6f7a8b9c0d1e2f\n").as_bytes()),
            ["run", _, "find", ..] => ok_output(
                b"./../workspace/node_modules\n./../layers/org.cloudfoundry.node-engine\n",
            ),
            ["inspect", ..] => {
                let status = self.statuses.lock().unwrap().pop_front().unwrap_or("healthy");
                ok_output(format!("{status}\n").as_bytes())
            }
            ["container", "port", ..] => ok_output(b"0.0.0.0:49153->8080/tcp\n"),
            ["logs", ..] => ok_output(b"\x1b[32mserver listening on 8080\x1b[0m\n"),
            ["volume", "ls", "-q"] => ok_output(
                b"pack-cache-app-1.build\nunrelated\npack-cache-app-1.launch\n",
            ),
            ["stacks", ..] => ok_output(b"Stack ID: io.buildpacks.stacks.bionic\n"),
            _ => ok_output(b""),
        }
    }
}

impl CommandRunner for FakeDocker {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args);
        Ok(self.answer(args))
    }

    async fn run_teed(&self, program: &str, args: &[&str], dir: &Path) -> Result<TeedOutput> {
        self.record(program, args);
        self.build_dirs.lock().unwrap().push(dir.to_path_buf());
        if self.fail_build {
            return Ok(TeedOutput {
                status: ExitStatus::from_raw(1 << 8),
                log: "===> DETECTING\nERROR: No buildpack groups passed detection.\n".to_string(),
            });
        }
        Ok(TeedOutput {
            status: ExitStatus::from_raw(0),
            log: "===> DETECTING\n\x1b[34m[detector]\x1b[0m bp-a 0.0.1\n===> EXPORTING\n"
                .to_string(),
        })
    }
}

// ── Fake HTTP ─────────────────────────────────────────────────────────────────

/// Route table keyed on URL. Each response is delayed by one scheduler yield
/// so concurrent callers genuinely interleave.
#[derive(Default)]
pub struct FakeHttp {
    routes: HashMap<String, (u16, Vec<u8>)>,
    hits: Mutex<HashMap<String, usize>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.routes.insert(url.to_string(), (status, body.to_vec()));
        self
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

impl HttpClient for FakeHttp {
    async fn get(&self, url: &str, _headers: &[(&str, &str)]) -> Result<HttpResponse> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
        tokio::task::yield_now().await;
        let (status, body) = self
            .routes
            .get(url)
            .cloned()
            .ok_or_else(|| HarnessError::Transport(format!("connection refused: {url}")))?;
        Ok(HttpResponse {
            status,
            headers: HashMap::from([(
                "content-type".to_string(),
                vec!["text/plain; charset=utf-8".to_string()],
            )]),
            body,
        })
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Config with a short poll cadence so real-time tests stay fast.
pub fn fast_config() -> HarnessConfig {
    HarnessConfig::default().with_timing(Timing {
        tick: Duration::from_millis(5),
        deadline: Duration::from_millis(500),
    })
}

pub fn harness(docker: FakeDocker, http: FakeHttp) -> Harness<FakeDocker, FakeHttp> {
    Harness::new(docker, http, fast_config())
}

/// In-memory `.tar.gz` holding `files`.
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn harness_error(err: &anyhow::Error) -> &HarnessError {
    err.downcast_ref::<HarnessError>().expect("tagged error")
}
