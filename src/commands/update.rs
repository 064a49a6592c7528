use anyhow::Result;
use modman::PlannerOptions;

use super::common::{self, CommonOpts};

pub fn run(enabled_only: bool, downgrade: bool, common: &CommonOpts) -> Result<()> {
    let config = common::load_config(common)?;
    common::require_credentials(&config)?;

    let opts = PlannerOptions {
        dry_run: common.dry_run,
        downgrade: downgrade || config.should_downgrade,
        ..PlannerOptions::default()
    };

    let mut planner = common::build_planner(&config, opts)?;

    println!("Updating installed mods...");
    planner.update_all(enabled_only)?;

    common::finish(planner, &config, common.dry_run)?;
    println!();
    println!("Finished!");
    Ok(())
}
