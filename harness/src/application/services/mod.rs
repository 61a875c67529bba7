//! Application services: use-case orchestration.
//!
//! Each service module implements one component by composing domain logic
//! with port trait calls.

pub mod builder;
pub mod fetcher;
pub mod inspect;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod test_support;

use std::process::Output;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::HarnessError;
use crate::domain::container::display_command;

/// Stdout followed by stderr, lossily decoded.
pub(crate) fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Run a command and turn a non-zero exit into [`HarnessError::CommandFailed`].
pub(crate) async fn run_checked(
    runner: &impl CommandRunner,
    program: &str,
    args: &[&str],
) -> Result<Output> {
    let output = runner.run(program, args).await?;
    if !output.status.success() {
        return Err(HarnessError::CommandFailed {
            command: display_command(program, args),
            output: combined_output(&output),
        }
        .into());
    }
    Ok(output)
}
