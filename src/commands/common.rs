//! Shared session plumbing for the subcommands: config loading with CLI
//! overrides, planner construction, and the end-of-run reload handling.

use anyhow::{bail, Context, Result};
use clap::Args;
use modman::dependency::normalize_version;
use modman::{
    detect_game_version, restart_service, Config, ModList, ModStore, Planner, PlannerOptions,
    PortalClient,
};
use std::path::PathBuf;

/// Flags shared by every mutating subcommand, overriding config.json.
#[derive(Args, Debug)]
pub struct CommonOpts {
    /// Path to your Factorio folder
    #[arg(short = 'p', long = "path-to-factorio", value_name = "PATH")]
    pub factorio_path: Option<PathBuf>,

    /// Your Factorio username, from player-data.json
    #[arg(short, long)]
    pub user: Option<String>,

    /// Your Factorio token, from player-data.json
    #[arg(short, long)]
    pub token: Option<String>,

    /// Don't download or write anything, just state what would happen
    #[arg(short, long)]
    pub dry_run: bool,

    /// Restart the game service if any mods changed
    #[arg(long)]
    pub reload: bool,

    /// systemd service name used to launch Factorio
    #[arg(short, long)]
    pub service_name: Option<String>,
}

/// Load config.json and apply the CLI overrides.
pub fn load_config(common: &CommonOpts) -> Result<Config> {
    let mut config = Config::load()?;

    if let Some(path) = &common.factorio_path {
        config.factorio_path = Some(path.clone());
    }
    if let Some(user) = &common.user {
        config.username = Some(user.clone());
    }
    if let Some(token) = &common.token {
        config.token = Some(token.clone());
    }
    if common.reload {
        config.should_reload = true;
    }
    if let Some(service) = &common.service_name {
        config.service_name = Some(service.clone());
    }

    if config.should_reload && config.service_name.is_none() {
        bail!(
            "Reload is enabled but no service name was given. \
             Set \"service_name\" in config.json or pass --service-name."
        );
    }

    Ok(config)
}

/// Installing and updating talk to authenticated download URLs.
pub fn require_credentials(config: &Config) -> Result<()> {
    if config.username.is_none() || config.token.is_none() {
        bail!(
            "Username and/or token not set. Set them in config.json or pass \
             -u/-t. Both come from player-data.json in your Factorio folder."
        );
    }
    Ok(())
}

/// Build a planner session: load the mod list, detect the game version,
/// construct the portal client and mod store.
pub fn build_planner(config: &Config, opts: PlannerOptions) -> Result<Planner> {
    let mods_dir = config.mods_dir()?;
    if !mods_dir.is_dir() {
        bail!(
            "Factorio mods folder cannot be found at {}",
            mods_dir.display()
        );
    }

    let mods = ModList::load(config.mod_list_path()?)?;

    let game_version = match &config.factorio_version {
        Some(pinned) => normalize_version(pinned)
            .with_context(|| format!("invalid factorio_version \"{}\" in config", pinned))?,
        None => {
            let factorio_path = config
                .factorio_path
                .as_ref()
                .context("Factorio path not set")?;
            let version = detect_game_version(factorio_path, config.alt_glibc()?.as_ref())?;
            println!(
                "Auto-detected Factorio version {}.{} from the binary",
                version.major, version.minor
            );
            version
        }
    };

    let portal = PortalClient::new(
        config.portal_url.clone(),
        config.username.clone(),
        config.token.clone(),
    );
    let store = ModStore::new(&mods_dir, opts.dry_run);

    Ok(Planner::new(portal, store, mods, game_version, opts))
}

/// Flush the planner and restart the service when needed and configured.
pub fn finish(planner: Planner, config: &Config, dry_run: bool) -> Result<()> {
    if planner.finish()? {
        handle_reload(config, dry_run)?;
    }
    Ok(())
}

/// The end-of-run reload tail, shared with enable/disable.
pub fn handle_reload(config: &Config, dry_run: bool) -> Result<()> {
    println!();
    println!("The mod configuration changed; Factorio needs a restart to apply it.");

    if dry_run {
        println!(
            "[DRY RUN] Would have{} restarted the service",
            if config.should_reload { "" } else { " NOT" }
        );
        return Ok(());
    }

    if config.should_reload {
        // Validated at load time, but stay safe.
        let service = config
            .service_name
            .as_deref()
            .context("Reload is enabled but no service name is set")?;
        println!("Restarting service {}", service);
        restart_service(service)?;
        println!("✓ Service restarted");
    } else {
        println!("Automatic reload is disabled, please restart Factorio yourself.");
    }

    Ok(())
}
