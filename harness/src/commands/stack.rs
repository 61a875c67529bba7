//! Stack command

use anyhow::Result;
use cnb_harness::Harness;
use cnb_harness::application::{CommandRunner, HttpClient};

/// Ensure the configured stack is registered with `pack`.
///
/// # Errors
///
/// Returns an error if `pack` fails to list or add the stack.
pub async fn run<R: CommandRunner, H: HttpClient>(harness: &Harness<R, H>) -> Result<()> {
    harness.ensure_stack().await?;
    println!("{}", harness.config().stack_id);
    Ok(())
}
