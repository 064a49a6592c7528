//! Manage the ordered `mod-list.json` manifest
//!
//! `mod-list.json` is the authoritative record of which mods are installed and
//! whether each is enabled. The list is loaded once per invocation, mutated in
//! memory by the planner, and written back exactly once at the end of the run.
//! Entry order is preserved verbatim on write-back: it is also the tie-break
//! order used by the conflict check, so reordering would change which conflict
//! gets reported first.
//!
//! The `base` mod (and the official expansion pseudo-mods that ship with the
//! game) is always present in the stored list but excluded from every read
//! view used by planning and listing.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Mods that ship with the game and are never installed, removed or listed.
const BUILTIN_MODS: [&str; 4] = ["base", "elevated-rails", "quality", "space-age"];

/// One `{name, enabled}` entry of `mod-list.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModEntry {
    pub name: String,
    pub enabled: bool,
}

/// On-disk shape of `mod-list.json`.
#[derive(Debug, Serialize, Deserialize)]
struct ModListFile {
    mods: Vec<ModEntry>,
}

/// The installed-mod manifest, held in memory for one invocation.
#[derive(Debug)]
pub struct ModList {
    path: PathBuf,
    mods: Vec<ModEntry>,
}

impl ModList {
    /// Load `mod-list.json` from the given path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let content = fs::read_to_string(&path).map_err(|e| {
            Error::InvalidModList(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file: ModListFile = serde_json::from_str(&content).map_err(|e| {
            Error::InvalidModList(format!("cannot parse {}: {}", path.display(), e))
        })?;

        Ok(Self {
            path,
            mods: file.mods,
        })
    }

    /// All installed mods, builtin mods excluded. Preserves manifest order.
    pub fn installed(&self) -> impl Iterator<Item = &ModEntry> {
        self.mods
            .iter()
            .filter(|m| !BUILTIN_MODS.contains(&m.name.as_str()))
    }

    /// Look up an installed mod by name (builtin mods excluded).
    pub fn get(&self, name: &str) -> Option<&ModEntry> {
        self.installed().find(|m| m.name == name)
    }

    /// Insert a mod entry, or update the enabled flag of an existing one.
    ///
    /// Never duplicates a name; new entries append at the end so the stored
    /// order stays stable across runs.
    pub fn upsert(&mut self, name: &str, enabled: bool) {
        if let Some(entry) = self.mods.iter_mut().find(|m| m.name == name) {
            entry.enabled = enabled;
        } else {
            self.mods.push(ModEntry {
                name: name.to_string(),
                enabled,
            });
        }
    }

    /// Remove a mod entry by name.
    pub fn remove(&mut self, name: &str) {
        self.mods.retain(|m| m.name != name);
    }

    /// First installed mod found in `conflict_names`, in manifest order.
    ///
    /// Manifest order (not set order) keeps the reported conflict
    /// reproducible when more than one installed mod conflicts.
    pub fn first_conflict(&self, conflict_names: &HashSet<String>) -> Option<&str> {
        self.installed()
            .find(|m| conflict_names.contains(&m.name))
            .map(|m| m.name.as_str())
    }

    /// Write the full list (builtin mods included) back to `mod-list.json`.
    pub fn save(&self) -> Result<()> {
        let file = ModListFile {
            mods: self.mods.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Render the full list as pretty JSON, for dry-run display.
    pub fn to_pretty_json(&self) -> Result<String> {
        let file = ModListFile {
            mods: self.mods.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_list(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("mod-list.json");
        fs::write(&path, json).unwrap();
        path
    }

    const SAMPLE: &str = r#"{
        "mods": [
            {"name": "base", "enabled": true},
            {"name": "flib", "enabled": true},
            {"name": "even-distribution", "enabled": false}
        ]
    }"#;

    #[test]
    fn test_load_and_read_view_excludes_builtins() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);

        let list = ModList::load(&path).unwrap();
        let names: Vec<&str> = list.installed().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["flib", "even-distribution"]);
        assert!(list.get("base").is_none());
        assert!(list.get("flib").is_some());
    }

    #[test]
    fn test_load_missing_mods_key_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, r#"{"not_mods": []}"#);

        let result = ModList::load(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, "not json at all");

        assert!(ModList::load(&path).is_err());
    }

    #[test]
    fn test_upsert_existing_updates_flag_in_place() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);
        let mut list = ModList::load(&path).unwrap();

        list.upsert("even-distribution", true);

        let names: Vec<(&str, bool)> = list
            .installed()
            .map(|m| (m.name.as_str(), m.enabled))
            .collect();
        // Same entry count, same order, only the flag changed.
        assert_eq!(names, vec![("flib", true), ("even-distribution", true)]);
    }

    #[test]
    fn test_upsert_new_appends() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);
        let mut list = ModList::load(&path).unwrap();

        list.upsert("new-mod", true);

        let names: Vec<&str> = list.installed().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["flib", "even-distribution", "new-mod"]);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);
        let mut list = ModList::load(&path).unwrap();

        list.remove("flib");
        let names: Vec<&str> = list.installed().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["even-distribution"]);
    }

    #[test]
    fn test_first_conflict_uses_manifest_order() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);
        let list = ModList::load(&path).unwrap();

        let conflicts: HashSet<String> = ["even-distribution", "flib"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // flib comes first in the manifest, so it must be reported first.
        assert_eq!(list.first_conflict(&conflicts), Some("flib"));

        let no_hit: HashSet<String> = ["unrelated".to_string()].into_iter().collect();
        assert_eq!(list.first_conflict(&no_hit), None);
    }

    #[test]
    fn test_base_never_reported_as_conflict() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);
        let list = ModList::load(&path).unwrap();

        let conflicts: HashSet<String> = ["base".to_string()].into_iter().collect();
        assert_eq!(list.first_conflict(&conflicts), None);
    }

    #[test]
    fn test_save_round_trip_preserves_order_and_base() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, SAMPLE);

        let mut list = ModList::load(&path).unwrap();
        list.upsert("even-distribution", true);
        list.save().unwrap();

        let reloaded = ModList::load(&path).unwrap();
        // The full stored list still starts with base, in the original order.
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let stored: Vec<&str> = raw["mods"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(stored, vec!["base", "flib", "even-distribution"]);
        assert!(reloaded.get("even-distribution").unwrap().enabled);
    }
}
