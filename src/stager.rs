use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StageError;
use crate::staging::prepare_stage_dir;
use crate::targets::{TARGETS, Target};
use crate::templates::wheel_file_name;
use crate::wheel_builder::{DEFAULT_PYTHON, WheelBuilder};

/// Turns a vendor tree of prebuilt binaries into one wheel per target.
#[derive(Debug, Clone)]
pub struct WheelStager {
    version: String,
    vendor_src: PathBuf,
    output_dir: PathBuf,
    python: PathBuf,
    staging_root: PathBuf,
}

impl WheelStager {
    /// Resolve run parameters.
    ///
    /// The output directory is created first (an existing one is fine), then
    /// the vendor tree must exist. Nothing is staged until this returns.
    pub fn new(
        version: impl Into<String>,
        vendor_src: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let vendor_src = absolute(vendor_src.as_ref())?;
        let output_dir = absolute(output_dir.as_ref())?;

        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        if !vendor_src.exists() {
            return Err(StageError::VendorSourceMissing { path: vendor_src }.into());
        }

        Ok(Self {
            version: version.into(),
            vendor_src,
            output_dir,
            python: PathBuf::from(DEFAULT_PYTHON),
            staging_root: std::env::temp_dir(),
        })
    }

    /// Interpreter used to run `setup.py`.
    pub fn python(mut self, python: impl AsRef<Path>) -> Self {
        self.python = python.as_ref().to_path_buf();
        self
    }

    /// Create per-target staging directories under `root` instead of the system temp dir.
    pub fn staging_root(mut self, root: impl AsRef<Path>) -> Self {
        self.staging_root = root.as_ref().to_path_buf();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn vendor_src(&self) -> &Path {
        &self.vendor_src
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Stage and build every target in declaration order, stopping at the first failure.
    pub fn stage_all(&self) -> Result<()> {
        for target in &TARGETS {
            self.stage_wheel(target)?;
        }
        Ok(())
    }

    /// Build the wheel for a single target.
    ///
    /// The staging directory is removed when this returns, whether or not the
    /// build succeeded.
    pub fn stage_wheel(&self, target: &Target) -> Result<()> {
        log::info!(
            "Staging {} ({})",
            wheel_file_name(&self.version, target.platform_tag),
            target.triple
        );

        let stage_dir = tempfile::Builder::new()
            .prefix(&format!("xurl-pypi-stage-{}-", target.triple))
            .tempdir_in(&self.staging_root)
            .with_context(|| {
                format!(
                    "Failed to create staging directory in {}",
                    self.staging_root.display()
                )
            })?;
        log::debug!("Staging directory for {}: {}", target.triple, stage_dir.path().display());

        prepare_stage_dir(stage_dir.path(), &self.version, &self.vendor_src, target)?;

        WheelBuilder::new(&self.python)
            .plat_name(target.platform_tag)
            .dist_dir(&self.output_dir)
            .build(stage_dir.path(), target.triple)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::vendor_binary_path;
    use tempfile::tempdir;

    #[test]
    fn test_creates_output_directory() {
        let vendor = tempdir().unwrap();
        let out = tempdir().unwrap();
        let output_dir = out.path().join("nested/dist");

        let stager = WheelStager::new("0.0.13", vendor.path(), &output_dir).unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(stager.output_dir(), output_dir);
        assert_eq!(stager.version(), "0.0.13");

        // a second run against the same directory is fine
        WheelStager::new("0.0.13", vendor.path(), &output_dir).unwrap();
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let vendor = tempdir().unwrap();
        let stager = WheelStager::new("1.0.0", vendor.path(), "target/stager-relative-dist");
        let stager = stager.unwrap();

        assert!(stager.output_dir().is_absolute());
        assert!(stager.vendor_src().is_absolute());
        fs::remove_dir_all(stager.output_dir()).unwrap();
    }

    #[test]
    fn test_missing_vendor_source() {
        let out = tempdir().unwrap();
        let missing = out.path().join("no-such-vendor");

        let err = WheelStager::new("0.0.13", &missing, out.path().join("dist")).unwrap_err();

        match err.downcast_ref::<StageError>() {
            Some(StageError::VendorSourceMissing { path }) => assert_eq!(*path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
        // the output directory is created before the vendor tree is checked
        assert!(out.path().join("dist").is_dir());
    }

    #[test]
    fn test_missing_binary_cleans_up_staging_directory() {
        let vendor = tempdir().unwrap();
        let out = tempdir().unwrap();
        let staging = tempdir().unwrap();

        let stager = WheelStager::new("0.0.13", vendor.path(), out.path())
            .unwrap()
            .staging_root(staging.path());
        let err = stager.stage_wheel(&TARGETS[1]).unwrap_err();

        let stage_error = err.downcast_ref::<StageError>().unwrap();
        assert!(stage_error.is_not_found());
        assert!(err.to_string().contains(
            &vendor_binary_path(stager.vendor_src(), &TARGETS[1]).display().to_string()
        ));
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_failure_stops_run_and_cleans_up() {
        let vendor = tempdir().unwrap();
        let out = tempdir().unwrap();
        let staging = tempdir().unwrap();
        for target in &TARGETS {
            let path = vendor_binary_path(vendor.path(), target);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"bin").unwrap();
        }
        let python = crate::wheel_builder::locate_python("false").unwrap();

        let stager = WheelStager::new("0.0.13", vendor.path(), out.path())
            .unwrap()
            .python(python)
            .staging_root(staging.path());
        let err = stager.stage_all().unwrap_err();

        match err.downcast_ref::<StageError>() {
            Some(StageError::PackagingFailed { target, .. }) => {
                assert_eq!(target, "x86_64-unknown-linux-gnu");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }
}
