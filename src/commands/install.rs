use anyhow::Result;
use modman::{MinVersion, PlannerOptions};

use super::common::{self, CommonOpts};

pub fn run(
    mod_name: &str,
    install_optional: bool,
    no_required: bool,
    ignore_conflicts: bool,
    downgrade: bool,
    common: &CommonOpts,
) -> Result<()> {
    let config = common::load_config(common)?;
    common::require_credentials(&config)?;

    let opts = PlannerOptions {
        dry_run: common.dry_run,
        downgrade: downgrade || config.should_downgrade,
        install_required: !no_required && config.install_required_dependencies,
        install_optional: install_optional || config.install_optional_dependencies,
        remove_required: config.remove_required_dependencies,
        remove_optional: config.remove_optional_dependencies,
        ignore_conflicts: ignore_conflicts || config.ignore_conflicts_dependencies,
    };

    let mut planner = common::build_planner(&config, opts)?;

    if common.dry_run {
        println!("[DRY RUN] Installing {}...", mod_name);
    } else {
        println!("Installing {}...", mod_name);
    }

    // Only the top-level request is eligible for optional dependencies;
    // the planner never propagates them further down.
    planner.install(mod_name, &MinVersion::Latest, true)?;

    common::finish(planner, &config, common.dry_run)?;
    println!();
    println!("Finished!");
    Ok(())
}
