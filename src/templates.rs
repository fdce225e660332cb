//! Text generators for the files placed in a wheel staging directory.
//!
//! Everything here is a pure function of its arguments so that repeated runs
//! with the same release version produce byte-identical staging trees.

pub const PACKAGE_NAME: &str = "xuanwo-xurl";
pub const IMPORT_NAME: &str = "xuanwo_xurl";
pub const COMMAND_NAME: &str = "xurl";
pub const DESCRIPTION: &str = "Locate and read local code-agent thread files";
pub const LICENSE: &str = "Apache-2.0";
pub const PYTHON_REQUIRES: &str = ">=3.8";

pub const SETUP_FILE: &str = "setup.py";
pub const VERSION_FILE: &str = "__init__.py";
pub const RUNNER_FILE: &str = "_runner.py";

const RUNNER_PY: &str = r#"from __future__ import annotations

import os
import sys
from pathlib import Path


def main() -> None:
    binary_name = "xurl.exe" if os.name == "nt" else "xurl"
    binary_path = Path(__file__).resolve().parent / "bin" / binary_name
    if not binary_path.exists():
        raise FileNotFoundError(f"xurl binary not found: {binary_path}")

    os.execv(str(binary_path), [str(binary_path), *sys.argv[1:]])
"#;

/// Quote `value` as a Python string literal.
///
/// JSON string escapes are a subset of Python's, so a plain version such as
/// `0.0.13` comes out as `"0.0.13"` and anything stranger stays valid source.
pub fn python_string_literal(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// `setup.py` for a binary-only wheel of the given release.
pub fn render_setup_py(version: &str) -> String {
    let version = python_string_literal(version);

    format!(
        r#"from setuptools import setup
from setuptools.dist import Distribution


class BinaryDistribution(Distribution):
    def has_ext_modules(self):
        return True


setup(
    name="{PACKAGE_NAME}",
    version={version},
    description="{DESCRIPTION}",
    license="{LICENSE}",
    python_requires="{PYTHON_REQUIRES}",
    packages=["{IMPORT_NAME}"],
    package_data={{"{IMPORT_NAME}": ["bin/*"]}},
    include_package_data=True,
    entry_points={{"console_scripts": ["{COMMAND_NAME}={IMPORT_NAME}._runner:main"]}},
    distclass=BinaryDistribution,
)
"#
    )
}

pub fn render_version_py(version: &str) -> String {
    format!("__version__ = {}\n", python_string_literal(version))
}

/// The installed `xurl` entry point. Identical for every target and release.
pub fn render_runner_py() -> &'static str {
    RUNNER_PY
}

/// File name setuptools gives the wheel for `version` and `platform_tag`.
pub fn wheel_file_name(version: &str, platform_tag: &str) -> String {
    let distribution = PACKAGE_NAME.replace('-', "_");
    let version = version.replace('-', "_");
    format!("{distribution}-{version}-py3-none-{platform_tag}.whl")
}
