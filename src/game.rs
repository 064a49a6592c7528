//! Factorio version probe and service restart
//!
//! Mods target the game by `major.minor` only (the portal rejects
//! `info.json` files pinning a patch level), so the probe captures just the
//! first two components of whatever `factorio --version` prints.
//!
//! Servers running a newer game on an older distro sometimes launch Factorio
//! through an alternative GLIBC loader; the probe supports the same prefix so
//! version detection works in that setup too.

use crate::dependency::normalize_version;
use crate::{Error, Result};
use regex::Regex;
use semver::Version;
use std::path::Path;
use std::process::Command;

/// Alternative GLIBC loader settings, when the game cannot run against the
/// system libc.
#[derive(Debug, Clone)]
pub struct AltGlibc {
    pub directory: std::path::PathBuf,
    pub version: String,
}

/// Extract the `major.minor` game version from `factorio --version` output.
pub fn parse_version_output(output: &str) -> Option<Version> {
    let re = Regex::new(r"Version: (\d+\.\d+)\.\d+ \(build \d+").unwrap();
    let captures = re.captures(output)?;
    normalize_version(&captures[1])
}

/// Run the game binary to detect the installed Factorio version.
pub fn detect_game_version(factorio_path: &Path, alt_glibc: Option<&AltGlibc>) -> Result<Version> {
    let binary = factorio_path.join("bin/x64/factorio");

    let mut cmd = match alt_glibc {
        Some(glibc) => {
            let loader = glibc
                .directory
                .join(format!("lib/ld-{}.so", glibc.version));
            let mut cmd = Command::new(loader);
            cmd.arg("--library-path")
                .arg(glibc.directory.join("lib"))
                .arg(&binary)
                .arg("--executable-path")
                .arg(&binary);
            cmd
        }
        None => Command::new(&binary),
    };

    let output = cmd.arg("--version").output().map_err(|e| {
        Error::GameVersion(format!("cannot run {}: {}", binary.display(), e))
    })?;

    if !output.status.success() {
        return Err(Error::GameVersion(format!(
            "{} --version exited with {}",
            binary.display(),
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version_output(&stdout).ok_or_else(|| {
        Error::GameVersion(format!("unrecognized version output: {}", stdout.trim()))
    })
}

/// Restart the systemd service running the game.
pub fn restart_service(service_name: &str) -> Result<()> {
    let status = Command::new("systemctl")
        .args(["restart", service_name])
        .status()
        .map_err(|e| Error::Other(format!("cannot run systemctl: {}", e)))?;

    if !status.success() {
        return Err(Error::Other(format!(
            "systemctl restart {} exited with {}",
            service_name, status
        )));
    }
    Ok(())
}
