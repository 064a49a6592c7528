//! Recursive install/remove/update planning
//!
//! The planner is the one component with real graph-walking logic: it
//! resolves a mod's classified dependencies, recurses through required (and
//! optionally optional) dependencies, gates on conflicts against the
//! installed set, and guards against cycles and diamond re-references with
//! per-operation visited sets.
//!
//! All planning state lives on the [`Planner`] value itself: the loaded mod
//! list, the two visited sets and the reload flag are owned by one
//! invocation and never shared, so concurrent test runs cannot interfere.
//!
//! Recursion rules, identical for install and remove:
//!
//! - a name is marked visited *before* descent, so dependency cycles and
//!   diamonds short-circuit instead of looping or re-downloading
//! - optional dependencies never propagate: only the top-level requested
//!   mod's optional dependencies are eligible, and a dependency is always
//!   recursed with the optional flag off
//! - a conflict aborts the entire run (not just the offending mod) unless
//!   `ignore_conflicts` is set, because proceeding would leave mutually
//!   exclusive mods both installed

use crate::dependency::{parse_dependencies, MinVersion};
use crate::modlist::{ModEntry, ModList};
use crate::portal::{ModInfo, PortalClient, Release};
use crate::store::ModStore;
use crate::{Error, Result};
use semver::Version;
use std::collections::HashSet;

/// Behavior switches for one planner invocation.
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    /// Replace every mutating step with a descriptive no-op message.
    pub dry_run: bool,
    /// When no release targets the exact game version, accept the newest
    /// release for an older game version instead.
    pub downgrade: bool,
    /// Recursively install required dependencies.
    pub install_required: bool,
    /// Recursively install the requested mod's optional dependencies.
    pub install_optional: bool,
    /// Recursively remove required dependencies of a removed mod.
    pub remove_required: bool,
    /// Recursively remove the requested mod's optional dependencies.
    pub remove_optional: bool,
    /// Proceed past conflicts instead of aborting the run.
    pub ignore_conflicts: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            downgrade: false,
            install_required: true,
            install_optional: false,
            remove_required: true,
            remove_optional: false,
            ignore_conflicts: false,
        }
    }
}

/// Install/remove/update planner for a single invocation.
pub struct Planner {
    portal: PortalClient,
    store: ModStore,
    mods: ModList,
    game_version: Version,
    opts: PlannerOptions,
    install_seen: HashSet<String>,
    remove_seen: HashSet<String>,
    reload_needed: bool,
}

impl Planner {
    pub fn new(
        portal: PortalClient,
        store: ModStore,
        mods: ModList,
        game_version: Version,
        opts: PlannerOptions,
    ) -> Self {
        Self {
            portal,
            store,
            mods,
            game_version,
            opts,
            install_seen: HashSet::new(),
            remove_seen: HashSet::new(),
            reload_needed: false,
        }
    }

    /// The manifest as currently mutated in memory.
    pub fn mod_list(&self) -> &ModList {
        &self.mods
    }

    /// Install a mod and (depending on options) its dependencies.
    ///
    /// Returns `Ok(true)` when the mod was newly installed, `Ok(false)` when
    /// it was skipped: already seen this run, not found on the portal, or no
    /// release matches. A conflict with an installed mod is an error and
    /// aborts the whole run unless `ignore_conflicts` is set.
    pub fn install(
        &mut self,
        name: &str,
        min_version: &MinVersion,
        install_optional: bool,
    ) -> Result<bool> {
        if self.install_seen.contains(name) {
            println!("  Mod '{}' already seen, skipping...", name);
            return Ok(false);
        }
        self.install_seen.insert(name.to_string());

        let info = match self.portal.fetch_mod(name) {
            Ok(info) => info,
            Err(Error::ModNotFound(_)) => {
                println!("  ⚠ Mod '{}' not found on the portal, skipping", name);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let Some(target) = self.matching_releases(&info, min_version).into_iter().next()
        else {
            println!(
                "  ⚠ No release of '{}' matches {} for Factorio {}.{}, skipping",
                name, min_version, self.game_version.major, self.game_version.minor
            );
            return Ok(false);
        };

        let deps = parse_dependencies(&target.info_json.dependencies);

        if let Some(installed) = self.mods.first_conflict(&deps.conflict) {
            let installed = installed.to_string();
            if self.opts.ignore_conflicts {
                println!(
                    "  ⚠ Mod '{}' conflicts with installed mod '{}', ignoring...",
                    name, installed
                );
            } else {
                return Err(Error::Conflict {
                    name: name.to_string(),
                    installed,
                });
            }
        }

        if self.opts.install_required {
            for (dep_name, dep_min) in &deps.required {
                println!(
                    "  Installing required dependency '{}' (>= {}) of '{}'",
                    dep_name, dep_min, name
                );
                // A dependency's own optional dependencies are never
                // auto-installed; install them explicitly if wanted.
                self.install(dep_name, dep_min, false)?;
            }
        }

        if install_optional && self.opts.install_optional {
            for (dep_name, dep_min) in &deps.optional {
                println!(
                    "  Installing optional dependency '{}' (>= {}) of '{}'",
                    dep_name, dep_min, name
                );
                self.install(dep_name, dep_min, false)?;
            }
        }

        self.mods.upsert(name, true);

        if self
            .store
            .has_matching_archive(&target.file_name, &target.sha1)?
        {
            println!(
                "  ✓ {} already present with identical SHA1, skipping download",
                target.file_name
            );
            return Ok(true);
        }

        if self.opts.dry_run {
            println!("  [DRY RUN] Would download {}", target.file_name);
        } else {
            self.portal
                .download(&target, &self.store.archive_path(&target.file_name))?;
        }

        println!(
            "  ✓ Installed {} {} for Factorio {}",
            name, target.version, target.info_json.factorio_version
        );
        self.reload_needed = true;
        Ok(true)
    }

    /// Remove a mod and (depending on options) its dependencies.
    ///
    /// The portal is consulted first: removal needs the release list both to
    /// recover the dependency directives and to delete every historical
    /// archive for the name, not just the current one. Returns `Ok(false)`
    /// when the mod was already processed this run or no metadata exists.
    pub fn remove(&mut self, name: &str, remove_optional: bool) -> Result<bool> {
        if self.remove_seen.contains(name) {
            println!("  Mod '{}' already removed, skipping...", name);
            return Ok(false);
        }
        self.remove_seen.insert(name.to_string());

        let info = match self.portal.fetch_mod(name) {
            Ok(info) => info,
            Err(Error::ModNotFound(_)) => {
                println!("  ⚠ No portal metadata for '{}', skipping removal", name);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let Some(target) = self
            .matching_releases(&info, &MinVersion::Latest)
            .into_iter()
            .next()
        else {
            println!("  ⚠ No matching release found for '{}', skipping removal", name);
            return Ok(false);
        };

        if self.opts.remove_required || (self.opts.remove_optional && remove_optional) {
            let deps = parse_dependencies(&target.info_json.dependencies);

            if self.opts.remove_required {
                for (dep_name, _) in &deps.required {
                    println!("  Removing '{}', required dependency of '{}'", dep_name, name);
                    self.remove(dep_name, false)?;
                }
            }

            if remove_optional && self.opts.remove_optional {
                for (dep_name, _) in &deps.optional {
                    println!("  Removing '{}', optional dependency of '{}'", dep_name, name);
                    self.remove(dep_name, false)?;
                }
            }
        }

        // Version history housekeeping belongs to removal: delete every
        // archive ever published under this name, not just the current one.
        for release in &info.releases {
            self.store.remove_archive(&release.file_name)?;
        }

        self.mods.remove(name);
        println!("  ✓ Removed {}", name);
        self.reload_needed = true;
        Ok(true)
    }

    /// Update every installed mod to its newest matching release.
    ///
    /// Stale archives (every release file other than the selected one) are
    /// deleted, and unchanged archives are detected by SHA1 and skipped.
    pub fn update_all(&mut self, enabled_only: bool) -> Result<()> {
        let installed: Vec<ModEntry> = self.mods.installed().cloned().collect();

        for entry in installed {
            if enabled_only && !entry.enabled {
                println!("  Mod '{}' is disabled, skipping...", entry.name);
                continue;
            }

            let info = match self.portal.fetch_mod(&entry.name) {
                Ok(info) => info,
                Err(Error::ModNotFound(_)) => {
                    println!(
                        "  ⚠ Mod '{}' not found on the portal, check your mod-list.json",
                        entry.name
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let Some(target) = self
                .matching_releases(&info, &MinVersion::Latest)
                .into_iter()
                .next()
            else {
                println!(
                    "  ⚠ No release of '{}' matches Factorio {}.{}, skipping",
                    entry.name, self.game_version.major, self.game_version.minor
                );
                continue;
            };

            for release in &info.releases {
                if release.file_name != target.file_name {
                    self.store.remove_archive(&release.file_name)?;
                }
            }

            if self
                .store
                .has_matching_archive(&target.file_name, &target.sha1)?
            {
                println!("  ✓ {} is up to date", entry.name);
                continue;
            }

            if self.opts.dry_run {
                println!("  [DRY RUN] Would download {}", target.file_name);
            } else {
                self.portal
                    .download(&target, &self.store.archive_path(&target.file_name))?;
            }

            println!("  ✓ Updated {} to {}", entry.name, target.version);
            self.reload_needed = true;
        }

        Ok(())
    }

    /// Flush the mod list (once) and report whether a game reload is needed.
    pub fn finish(self) -> Result<bool> {
        if self.opts.dry_run {
            println!(
                "[DRY RUN] Would write this mod list:\n{}",
                self.mods.to_pretty_json()?
            );
        } else {
            self.mods.save()?;
        }
        Ok(self.reload_needed)
    }

    /// Releases matching the constraint, newest published first.
    ///
    /// `Latest` filters on the game version the release targets: an exact
    /// match normally, or (in downgrade mode) the highest targeted version
    /// not above the installed one. A pinned minimum filters on the mod's own
    /// version instead, with `>=` semantics.
    fn matching_releases(&self, info: &ModInfo, min_version: &MinVersion) -> Vec<Release> {
        match min_version {
            MinVersion::Latest => {
                let mut matches: Vec<Release> = info
                    .releases
                    .iter()
                    .filter(|r| match r.factorio_semver() {
                        Some(fv) if self.opts.downgrade => fv <= self.game_version,
                        Some(fv) => fv == self.game_version,
                        None => false,
                    })
                    .cloned()
                    .collect();
                if self.opts.downgrade {
                    // Stable sort: newest published wins among releases
                    // targeting the same game version.
                    matches.sort_by(|a, b| b.factorio_semver().cmp(&a.factorio_semver()));
                }
                matches
            }
            MinVersion::AtLeast(min) => info
                .releases
                .iter()
                .filter(|r| matches!(r.semver(), Some(v) if v >= *min))
                .cloned()
                .collect(),
        }
    }
}
