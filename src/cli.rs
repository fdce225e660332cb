use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::stager::WheelStager;
use crate::wheel_builder;

#[derive(Parser, Debug)]
#[command(name = "xurl-pypi-stage")]
#[command(about = "Stage xurl PyPI wheels from release binaries")]
#[command(version)]
pub struct Cli {
    /// Version to stage, for example 0.0.13
    #[arg(long)]
    pub release_version: String,

    /// Vendor source directory containing target triple trees
    #[arg(long)]
    pub vendor_src: PathBuf,

    /// Output directory for staged wheel files
    #[arg(long)]
    pub output_dir: PathBuf,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    stage_command(cli)
}

fn stage_command(cli: Cli) -> Result<()> {
    let Cli {
        release_version,
        vendor_src,
        output_dir,
    } = cli;

    let stager = WheelStager::new(release_version, &vendor_src, &output_dir)?;
    let python = wheel_builder::python_from_env()?;
    log::debug!("Using packaging interpreter {}", python.display());

    stager.python(python).stage_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_all_arguments_required() {
        let parsed = Cli::try_parse_from([
            "xurl-pypi-stage",
            "--release-version",
            "0.0.13",
            "--vendor-src",
            "vendor",
            "--output-dir",
            "dist",
        ])
        .unwrap();
        assert_eq!(parsed.release_version, "0.0.13");
        assert_eq!(parsed.vendor_src, PathBuf::from("vendor"));
        assert_eq!(parsed.output_dir, PathBuf::from("dist"));

        assert!(Cli::try_parse_from(["xurl-pypi-stage", "--release-version", "0.0.13"]).is_err());
        assert!(
            Cli::try_parse_from(["xurl-pypi-stage", "--vendor-src", "v", "--output-dir", "d"])
                .is_err()
        );
    }
}
