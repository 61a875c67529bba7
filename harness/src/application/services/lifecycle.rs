//! Container lifecycle: start an app, wait for it to report healthy, discover
//! its published port, and tear everything down.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info};

use crate::application::ports::CommandRunner;
use crate::domain::container::{display_command, parse_host_port, short_container_id};
use crate::domain::{App, HarnessConfig, HarnessError, HealthStatus, Timing};

use super::{combined_output, run_checked};

/// Start a container from `app`'s image and wait until it is usable.
///
/// The container id is recorded before polling, so a failed start can still
/// be torn down with [`destroy`].
///
/// # Errors
///
/// - [`HarnessError::CommandFailed`] if any runtime call exits non-zero.
/// - [`HarnessError::UnexpectedOutput`] if no container id or port is printed.
/// - [`HarnessError::Unhealthy`] / [`HarnessError::HealthCheckTimeout`] from
///   the readiness poll.
pub async fn start(runner: &impl CommandRunner, config: &HarnessConfig, app: &mut App) -> Result<()> {
    let args = app.run_args();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = run_checked(runner, &config.runtime_bin, &args).await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let id = short_container_id(&stdout).ok_or_else(|| HarnessError::UnexpectedOutput {
        command: display_command(&config.runtime_bin, &args),
        output: stdout.to_string(),
    })?;
    info!(image = %app.image_name, container = %id, "container started");
    app.container_id = id;

    if app.health_check().is_some_and(|hc| hc.is_enabled()) {
        wait_healthy(runner, config, app).await?;
    }

    app.port = discover_port(runner, config, &app.container_id).await?;
    info!(container = %app.container_id, port = %app.port, "app ready");
    Ok(())
}

/// Query the runtime's health status for one container.
///
/// # Errors
///
/// Returns [`HarnessError::CommandFailed`] if `inspect` exits non-zero.
pub async fn health_status(
    runner: &impl CommandRunner,
    config: &HarnessConfig,
    container_id: &str,
) -> Result<HealthStatus> {
    let output = run_checked(
        runner,
        &config.runtime_bin,
        &["inspect", "-f", "{{.State.Health.Status}}", container_id],
    )
    .await?;
    Ok(HealthStatus::parse(&String::from_utf8_lossy(&output.stdout)))
}

/// Poll the health status every `timing.tick` until healthy, unhealthy, or
/// `timing.deadline` elapses.
///
/// The first query fires one tick after the call. When the deadline and a
/// tick are due together the deadline wins. A query that overruns a tick is
/// followed by at most one immediate catch-up query, then the cadence resumes.
///
/// The deadline is only observed between queries: a hung `inspect` is bounded
/// by the runner's own command timeout, not by `timing.deadline`.
///
/// # Errors
///
/// See [`start`].
pub async fn wait_healthy(runner: &impl CommandRunner, config: &HarnessConfig, app: &App) -> Result<()> {
    let Timing { tick, deadline } = config.timing;
    let began = Instant::now();
    let mut ticker = interval_at(began + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let timeout = sleep_until(began + deadline);
    tokio::pin!(timeout);

    loop {
        tokio::select! {
            biased;
            () = &mut timeout => {
                return Err(HarnessError::HealthCheckTimeout {
                    fixture: app.fixture_name.clone(),
                }
                .into());
            }
            _ = ticker.tick() => {
                let status = health_status(runner, config, &app.container_id).await?;
                debug!(container = %app.container_id, ?status, elapsed = ?began.elapsed(), "health poll");
                if status.is_terminal() {
                    if status == HealthStatus::Unhealthy {
                        return Err(HarnessError::Unhealthy {
                            fixture: app.fixture_name.clone(),
                        }
                        .into());
                    }
                    return Ok(());
                }
            }
        }
    }
}

/// Resolve the host port published for `container_id`.
///
/// # Errors
///
/// Returns [`HarnessError::CommandFailed`] if the query fails, or
/// [`HarnessError::UnexpectedOutput`] if it prints no mapping.
pub async fn discover_port(
    runner: &impl CommandRunner,
    config: &HarnessConfig,
    container_id: &str,
) -> Result<String> {
    let args = ["container", "port", container_id];
    let output = run_checked(runner, &config.runtime_bin, &args).await?;
    let text = combined_output(&output);
    parse_host_port(&text).ok_or_else(|| {
        HarnessError::UnexpectedOutput {
            command: display_command(&config.runtime_bin, &args),
            output: text,
        }
        .into()
    })
}

/// Stop and remove the container, then remove the image.
///
/// A no-op when no container was started. Each step aborts the rest on
/// failure; identifiers are cleared only once their resource is gone.
///
/// # Errors
///
/// Returns [`HarnessError::CommandFailed`] from the first failing step.
pub async fn destroy(runner: &impl CommandRunner, config: &HarnessConfig, app: &mut App) -> Result<()> {
    if app.container_id.is_empty() {
        return Ok(());
    }
    let docker = config.runtime_bin.as_str();

    run_checked(runner, docker, &["stop", &app.container_id]).await?;
    run_checked(runner, docker, &["rm", &app.container_id, "-f", "--volumes"]).await?;
    info!(container = %app.container_id, "container removed");
    app.container_id.clear();
    app.port.clear();

    if !app.image_name.is_empty() {
        run_checked(runner, docker, &["rmi", &app.image_name, "-f"]).await?;
        run_checked(runner, docker, &["image", "prune", "-f"]).await?;
        info!(image = %app.image_name, "image removed");
        app.image_name.clear();
    }
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
