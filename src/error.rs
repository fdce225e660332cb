use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures that abort a staging run.
///
/// These travel inside `anyhow::Error`; callers that need to tell them apart
/// use `downcast_ref::<StageError>()`.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Vendor source directory not found: {}", path.display())]
    VendorSourceMissing { path: PathBuf },

    #[error("Missing binary for target {target}: {}", path.display())]
    MissingBinary { target: String, path: PathBuf },

    #[error("Packaging interpreter '{program}' not found in PATH")]
    InterpreterNotFound { program: String },

    #[error("bdist_wheel failed for target {target}: {status}")]
    PackagingFailed { target: String, status: ExitStatus },
}

impl StageError {
    /// Missing input, as opposed to a failure of the packaging tool.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StageError::VendorSourceMissing { .. } | StageError::MissingBinary { .. }
        )
    }
}
