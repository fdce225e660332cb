use anyhow::{Context, Result};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StageError;
use crate::targets::Target;
use crate::templates::{self, IMPORT_NAME, RUNNER_FILE, SETUP_FILE, VERSION_FILE};

/// Directory name between the triple and the binary in the vendor tree.
pub const VENDOR_TOOL_DIR: &str = "xurl";

/// Where the upstream release pipeline puts `target`'s binary.
pub fn vendor_binary_path(vendor_src: &Path, target: &Target) -> PathBuf {
    vendor_src
        .join(target.triple)
        .join(VENDOR_TOOL_DIR)
        .join(target.binary_name)
}

/// Fill `stage_dir` with everything `setup.py bdist_wheel` needs for one target.
///
/// Returns the path of the staged binary.
pub fn prepare_stage_dir(
    stage_dir: &Path,
    version: &str,
    vendor_src: &Path,
    target: &Target,
) -> Result<PathBuf> {
    let package_root = stage_dir.join(IMPORT_NAME);
    let bin_root = package_root.join("bin");
    fs::create_dir_all(&bin_root)
        .with_context(|| format!("Failed to create staging directory: {}", bin_root.display()))?;

    write_file(&stage_dir.join(SETUP_FILE), &templates::render_setup_py(version))?;
    write_file(&package_root.join(VERSION_FILE), &templates::render_version_py(version))?;
    write_file(&package_root.join(RUNNER_FILE), templates::render_runner_py())?;

    let source_binary = vendor_binary_path(vendor_src, target);
    if !source_binary.exists() {
        return Err(StageError::MissingBinary {
            target: target.triple.to_string(),
            path: source_binary,
        }
        .into());
    }

    let staged_binary = bin_root.join(target.binary_name);
    copy_with_metadata(&source_binary, &staged_binary)?;
    if !target.is_windows() {
        mark_executable(&staged_binary)?;
    }

    log::debug!(
        "Staged {} binary: {} -> {}",
        target.triple,
        source_binary.display(),
        staged_binary.display()
    );

    Ok(staged_binary)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Copy a file keeping its permission bits and access/modification times.
pub fn copy_with_metadata(from: &Path, to: &Path) -> Result<()> {
    // fs::copy carries the permission bits over, timestamps need a second pass
    fs::copy(from, to).with_context(|| {
        format!("Failed to copy binary from {} to {}", from.display(), to.display())
    })?;

    let metadata = fs::metadata(from)
        .with_context(|| format!("Failed to read metadata of {}", from.display()))?;
    filetime::set_file_times(
        to,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .with_context(|| format!("Failed to set timestamps on {}", to.display()))?;

    Ok(())
}

/// Add execute permission for owner, group and other. Existing bits are kept.
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .with_context(|| format!("Failed to read permissions of {}", path.display()))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
pub fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
