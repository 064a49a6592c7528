//! Mod portal API client and archive downloads
//!
//! Wraps the two portal endpoints the tool needs: the full-info endpoint
//! (`/api/mods/{name}/full`) for release metadata, and the authenticated
//! download URLs each release carries. Everything is blocking; a fetch
//! failure is a terminal skip for that mod, never retried.
//!
//! Downloads are gated on the response `Content-Type`: the portal serves
//! archives as `application/zip`, but its CDN may answer with
//! `application/octet-stream` or `binary/octet-stream`. Anything else means
//! the credentials were rejected and an HTML error page is coming down the
//! pipe, which must never be written out as a mod archive.

use crate::dependency::normalize_version;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use semver::Version;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const DEFAULT_PORTAL_URL: &str = "https://mods.factorio.com";

/// Content types the portal (or its CDN) legitimately serves for archives.
const ARCHIVE_CONTENT_TYPES: [&str; 3] = [
    "application/zip",
    "application/octet-stream",
    "binary/octet-stream",
];

/// The `info.json` metadata embedded in a release.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoJson {
    pub factorio_version: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// One published release of a mod.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub version: String,
    pub file_name: String,
    pub download_url: String,
    pub released_at: DateTime<Utc>,
    pub sha1: String,
    pub info_json: InfoJson,
}

impl Release {
    /// The release's own version, normalized to semver.
    pub fn semver(&self) -> Option<Version> {
        normalize_version(&self.version)
    }

    /// The Factorio version this release targets (always `major.minor` on
    /// the portal), normalized to semver.
    pub fn factorio_semver(&self) -> Option<Version> {
        normalize_version(&self.info_json.factorio_version)
    }
}

/// Full mod metadata from the portal.
#[derive(Debug, Clone, Deserialize)]
pub struct ModInfo {
    pub name: String,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Blocking client for the mod portal.
pub struct PortalClient {
    base_url: String,
    client: reqwest::blocking::Client,
    username: Option<String>,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(
        base_url: impl Into<String>,
        username: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
            username,
            token,
        }
    }

    /// Fetch full metadata for a mod.
    ///
    /// Releases come back sorted by publish timestamp, newest first; that
    /// order is the tie-break for every "most recent matching release"
    /// decision and for stale-archive deletion on update.
    pub fn fetch_mod(&self, name: &str) -> Result<ModInfo> {
        let url = format!("{}/api/mods/{}/full", self.base_url, name);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                Error::Other(format!(
                    "Cannot connect to the mod portal at {}\n\
                     Please check your network connection.",
                    self.base_url
                ))
            } else {
                Error::Other(format!("Failed to fetch mod info: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::ModNotFound(name.to_string()));
        }

        let mut info: ModInfo = response.json()?;
        info.releases
            .sort_by(|a, b| b.released_at.cmp(&a.released_at));
        Ok(info)
    }

    /// Download a release archive to `dest`, streaming with a progress bar.
    pub fn download(&self, release: &Release, dest: &Path) -> Result<()> {
        let url = format!("{}{}", self.base_url, release.download_url);

        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref username) = self.username {
            query.push(("username", username.as_str()));
        }
        if let Some(ref token) = self.token {
            query.push(("token", token.as_str()));
        }

        let mut response = self.client.get(&url).query(&query).send()?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "portal answered {} for {}",
                response.status(),
                release.file_name
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !ARCHIVE_CONTENT_TYPES
            .iter()
            .any(|t| content_type.starts_with(t))
        {
            return Err(Error::Download(format!(
                "response for {} is not a zip file (Content-Type: {})",
                release.file_name,
                if content_type.is_empty() {
                    "missing"
                } else {
                    content_type.as_str()
                }
            )));
        }

        let total = response.content_length().unwrap_or(0);
        let bar = if total > 0 {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.green/dim} {bytes}/{total_bytes} {msg}")
                    .unwrap(),
            );
            bar.set_message(release.file_name.clone());
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut file = File::create(dest)?;
        let mut buffer = vec![0; 8192];
        loop {
            let bytes_read = response.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            file.write_all(&buffer[..bytes_read])?;
            bar.inc(bytes_read as u64);
        }
        bar.finish_and_clear();

        // Servers often run the manager as root; make sure the game user can
        // still read the archive.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o644))?;
        }

        Ok(())
    }
}
