use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::StageError;
use crate::templates::SETUP_FILE;

pub const DEFAULT_PYTHON: &str = "python3";
pub const PYTHON_ENV: &str = "XURL_PYPI_PYTHON";

/// Wheels hold a native binary behind a pure-Python launcher.
pub const PYTHON_TAG: &str = "py3";

/// Runs `setup.py bdist_wheel` inside a staging directory.
pub struct WheelBuilder {
    python: PathBuf,
    python_tag: String,
    plat_name: Option<String>,
    dist_dir: Option<PathBuf>,
}

/// Find the interpreter to run `setup.py` with.
///
/// `program` may be a bare name looked up on `PATH` or a path to an executable.
pub fn locate_python(program: impl Into<OsString>) -> Result<PathBuf> {
    let program = program.into();
    which::which(&program).map_err(|_| {
        StageError::InterpreterNotFound {
            program: program.to_string_lossy().into_owned(),
        }
        .into()
    })
}

/// The interpreter named by `XURL_PYPI_PYTHON`, or `python3`.
pub fn python_from_env() -> Result<PathBuf> {
    let program = std::env::var_os(PYTHON_ENV)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| OsString::from(DEFAULT_PYTHON));
    locate_python(program)
}

impl WheelBuilder {
    pub fn new(python: impl AsRef<Path>) -> Self {
        Self {
            python: python.as_ref().to_path_buf(),
            python_tag: PYTHON_TAG.to_string(),
            plat_name: None,
            dist_dir: None,
        }
    }

    pub fn plat_name(mut self, plat_name: impl Into<String>) -> Self {
        self.plat_name = Some(plat_name.into());
        self
    }

    pub fn dist_dir(mut self, dist_dir: impl AsRef<Path>) -> Self {
        self.dist_dir = Some(dist_dir.as_ref().to_path_buf());
        self
    }

    pub fn command(&self, stage_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.arg(SETUP_FILE);
        cmd.arg("bdist_wheel");
        cmd.arg("--python-tag").arg(&self.python_tag);

        if let Some(ref plat_name) = self.plat_name {
            cmd.arg("--plat-name").arg(plat_name);
        }

        if let Some(ref dist_dir) = self.dist_dir {
            cmd.arg("--dist-dir").arg(dist_dir);
        }

        cmd.current_dir(stage_dir);
        cmd
    }

    /// Build the wheel for `target`. Output streams go straight to the terminal.
    pub fn build(&self, stage_dir: &Path, target: &str) -> Result<()> {
        let mut cmd = self.command(stage_dir);
        log::debug!("Running {:?} in {}", cmd, stage_dir.display());

        let status = cmd
            .status()
            .with_context(|| format!("Failed to execute {}", self.python.display()))?;

        if !status.success() {
            return Err(StageError::PackagingFailed {
                target: target.to_string(),
                status,
            }
            .into());
        }

        Ok(())
    }
}
