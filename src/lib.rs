//! modman - A command-line mod manager for Factorio servers
//!
//! modman talks to the Factorio mod portal and keeps a server's mods folder
//! and `mod-list.json` in sync. It provides:
//!
//! - Recursive installation of required (and optionally optional) dependencies
//!   with cycle detection and conflict checking
//! - Release selection filtered against the installed Factorio version, with
//!   an opt-in downgrade mode
//! - SHA1 verification so unchanged archives are never re-downloaded
//! - Update of all installed mods, deleting stale release archives
//! - Enable/disable bookkeeping and optional service restart after changes
//!
//! # Examples
//!
//! ```no_run
//! use modman::{ModList, ModStore, Planner, PlannerOptions, PortalClient};
//! use semver::Version;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let portal = PortalClient::new("https://mods.factorio.com", None, None);
//! let store = ModStore::new("/opt/factorio/mods", false);
//! let mods = ModList::load("/opt/factorio/mods/mod-list.json")?;
//!
//! let mut planner = Planner::new(
//!     portal,
//!     store,
//!     mods,
//!     Version::new(1, 1, 0),
//!     PlannerOptions::default(),
//! );
//! planner.install("even-distribution", &modman::MinVersion::Latest, true)?;
//! planner.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`dependency`] - Parse and classify mod dependency directives
//! - [`modlist`] - Manage the ordered `mod-list.json` manifest
//! - [`planner`] - Recursive install/remove/update planning
//! - [`portal`] - Mod portal API client and archive downloads
//! - [`store`] - Mods folder file operations and SHA1 checks
//! - [`game`] - Factorio version probe and service restart
//! - [`config`] - User configuration management
//! - [`error`] - Error types and result handling

pub mod config;
pub mod dependency;
pub mod error;
pub mod game;
pub mod modlist;
pub mod planner;
pub mod portal;
pub mod store;

pub use config::Config;
pub use dependency::{
    parse_dependencies, ClassifiedDependencies, Comparator, Directive, DirectiveKind, MinVersion,
};
pub use error::{Error, Result};
pub use game::{detect_game_version, restart_service};
pub use modlist::{ModEntry, ModList};
pub use planner::{Planner, PlannerOptions};
pub use portal::{InfoJson, ModInfo, PortalClient, Release};
pub use store::ModStore;
