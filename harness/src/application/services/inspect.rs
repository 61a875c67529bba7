//! Read-only views of a running app: files in its image, runtime identifiers,
//! container logs, and HTTP responses from its published port.

use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use crate::application::ports::{CommandRunner, HttpClient};
use crate::domain::container::{filter_cache_volumes, non_empty_lines, strip_color};
use crate::domain::{App, AppInfo, HarnessConfig, HarnessError};

use super::{combined_output, run_checked};

/// Paths inside the app image whose full path contains `fragment`.
///
/// # Errors
///
/// Returns [`HarnessError::CommandFailed`] if the runtime call fails.
pub async fn files(
    runner: &impl CommandRunner,
    config: &HarnessConfig,
    app: &App,
    fragment: &str,
) -> Result<Vec<String>> {
    let pattern = format!("*{fragment}*");
    let output = run_checked(
        runner,
        &config.runtime_bin,
        &["run", &app.image_name, "find", "./..", "-wholename", &pattern],
    )
    .await?;
    Ok(non_empty_lines(&combined_output(&output)))
}

/// Container id, image name and the `pack` cache volumes on the runtime.
///
/// # Errors
///
/// Returns [`HarnessError::CommandFailed`] if volumes cannot be listed.
pub async fn info(runner: &impl CommandRunner, config: &HarnessConfig, app: &App) -> Result<AppInfo> {
    let output = run_checked(runner, &config.runtime_bin, &["volume", "ls", "-q"]).await?;
    let cache_volumes = filter_cache_volumes(&String::from_utf8_lossy(&output.stdout));
    Ok(AppInfo {
        container_id: app.container_id.clone(),
        image_name: app.image_name.clone(),
        cache_volumes,
    })
}

/// Container logs with color codes removed.
///
/// # Errors
///
/// Returns [`HarnessError::NotStarted`] before `start`, or
/// [`HarnessError::CommandFailed`] if the runtime call fails.
pub async fn logs(runner: &impl CommandRunner, config: &HarnessConfig, app: &App) -> Result<String> {
    if app.container_id.is_empty() {
        return Err(HarnessError::NotStarted.into());
    }
    let output = run_checked(runner, &config.runtime_bin, &["logs", &app.container_id]).await?;
    Ok(strip_color(&combined_output(&output)))
}

/// GET `path` from the app's published port, returning body and headers.
///
/// # Errors
///
/// - [`HarnessError::NotStarted`] if no port is known.
/// - [`HarnessError::BadStatus`] for a status outside 200–299.
/// - [`HarnessError::Transport`] if the request cannot be made.
pub async fn http_get(
    http: &impl HttpClient,
    app: &App,
    path: &str,
) -> Result<(String, HashMap<String, Vec<String>>)> {
    if app.port.is_empty() {
        return Err(HarnessError::NotStarted.into());
    }
    let url = format!("http://localhost:{}{path}", app.port);
    let response = http.get(&url, &[]).await?;
    debug!(%url, status = response.status, "app responded");
    if !response.is_success() {
        return Err(HarnessError::BadStatus {
            url,
            status: response.status,
        }
        .into());
    }
    let body = String::from_utf8_lossy(&response.body).into_owned();
    Ok((body, response.headers))
}

/// Body of [`http_get`].
///
/// # Errors
///
/// See [`http_get`].
pub async fn http_get_body(http: &impl HttpClient, app: &App, path: &str) -> Result<String> {
    let (body, _) = http_get(http, app, path).await?;
    Ok(body)
}

// ── Unit tests ────────────────────────────────────────────────────────────────
