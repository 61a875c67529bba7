//! Build command

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use cnb_harness::Harness;
use cnb_harness::application::{CommandRunner, HttpClient};

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// App fixture directory
    pub app_dir: PathBuf,

    /// Image name (random if omitted)
    #[arg(long)]
    pub image: Option<String>,

    /// Buildpack to apply, in order (repeatable)
    #[arg(long = "buildpack", value_name = "REF")]
    pub buildpacks: Vec<String>,
}

/// Run the build command, printing the image name.
///
/// # Errors
///
/// Returns an error if `pack` cannot be run or the build fails.
pub async fn run<R: CommandRunner, H: HttpClient>(
    harness: &Harness<R, H>,
    args: &BuildArgs,
    json: bool,
) -> Result<()> {
    let buildpacks: Vec<&str> = args.buildpacks.iter().map(String::as_str).collect();
    let app = match &args.image {
        Some(image) => harness.build(&args.app_dir, image, &buildpacks).await?,
        None => harness.build_random(&args.app_dir, &buildpacks).await?,
    };

    if json {
        println!(
            "{}",
            serde_json::json!({ "image": app.image_name(), "fixture": app.fixture_name() })
        );
    } else {
        println!("{}", app.image_name());
    }
    Ok(())
}
