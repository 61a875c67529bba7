//! Fetch command

use anyhow::Result;
use clap::Args;
use cnb_harness::Harness;
use cnb_harness::application::{CommandRunner, HttpClient};

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Buildpack repository name, e.g. `nodejs-cnb`
    pub package: String,

    /// Fetch the source tarball instead of a release asset
    #[arg(long, conflicts_with = "asset")]
    pub source: bool,

    /// Index of the release asset to fetch [default: 0]
    #[arg(long, value_name = "INDEX")]
    pub asset: Option<usize>,
}

/// Run the fetch command, printing the extraction directory.
///
/// # Errors
///
/// Returns an error if the release cannot be resolved, downloaded or extracted.
pub async fn run<R: CommandRunner, H: HttpClient>(
    harness: &Harness<R, H>,
    args: &FetchArgs,
    json: bool,
) -> Result<()> {
    let dir = if args.source {
        harness.latest_source(&args.package).await?
    } else {
        harness
            .latest_release_asset(&args.package, args.asset.unwrap_or(0))
            .await?
    };

    if json {
        println!(
            "{}",
            serde_json::json!({ "package": args.package, "dir": dir })
        );
    } else {
        println!("{}", dir.display());
    }
    Ok(())
}
