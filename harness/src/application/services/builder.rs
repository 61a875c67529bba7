//! Image builds through the `pack` CLI.

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::application::ports::CommandRunner;
use crate::domain::{App, HarnessConfig, HarnessError, ImageNamer};

use super::{combined_output, run_checked};

/// Arguments for `pack build`: image, builder, then one `--buildpack` per entry
/// in the given order.
#[must_use]
pub fn build_args(config: &HarnessConfig, image_name: &str, buildpacks: &[&str]) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        image_name.to_string(),
        "--builder".to_string(),
        config.builder.clone(),
    ];
    for bp in buildpacks {
        args.push("--buildpack".to_string());
        args.push((*bp).to_string());
    }
    args
}

/// Build `app_dir` into `image_name` with the given buildpacks.
///
/// Build output streams to this process's stdout/stderr while it runs and is
/// kept on the returned [`App`].
///
/// # Errors
///
/// Returns [`HarnessError::BuildFailed`] with the full log if `pack` exits
/// non-zero, or an error if it cannot be spawned.
pub async fn build(
    runner: &impl CommandRunner,
    config: &HarnessConfig,
    app_dir: &Path,
    image_name: &str,
    buildpacks: &[&str],
) -> Result<App> {
    let args = build_args(config, image_name, buildpacks);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    info!(image = %image_name, dir = %app_dir.display(), buildpacks = buildpacks.len(), "building image");

    let output = runner.run_teed(&config.builder_bin, &args, app_dir).await?;
    if !output.status.success() {
        warn!(image = %image_name, status = %output.status, "build failed");
        return Err(HarnessError::BuildFailed {
            image: image_name.to_string(),
            logs: output.log,
        }
        .into());
    }

    info!(image = %image_name, "image built");
    Ok(App::new(
        image_name,
        &app_dir.display().to_string(),
        output.log,
    ))
}

/// Like [`build`], with a fresh random image name from `namer`.
///
/// # Errors
///
/// See [`build`].
pub async fn build_random(
    runner: &impl CommandRunner,
    config: &HarnessConfig,
    namer: &mut ImageNamer,
    app_dir: &Path,
    buildpacks: &[&str],
) -> Result<App> {
    let image_name = namer.next_name();
    build(runner, config, app_dir, &image_name, buildpacks).await
}

/// Register the configured stack with `pack` unless it is already listed.
///
/// # Errors
///
/// Returns [`HarnessError::CommandFailed`] if listing or adding the stack fails.
pub async fn ensure_stack(runner: &impl CommandRunner, config: &HarnessConfig) -> Result<()> {
    let pack = config.builder_bin.as_str();
    let listed = run_checked(runner, pack, &["stacks", "--no-color"]).await?;
    if combined_output(&listed).contains(&config.stack_id) {
        info!(stack = %config.stack_id, "stack already registered");
        return Ok(());
    }

    run_checked(
        runner,
        pack,
        &[
            "add-stack",
            &config.stack_id,
            "--build-image",
            &config.build_image,
            "--run-image",
            &config.run_image,
        ],
    )
    .await?;
    info!(stack = %config.stack_id, "stack registered");
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
