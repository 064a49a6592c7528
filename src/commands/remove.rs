use anyhow::Result;
use modman::PlannerOptions;

use super::common::{self, CommonOpts};

pub fn run(
    mod_name: &str,
    remove_optional: bool,
    keep_required: bool,
    common: &CommonOpts,
) -> Result<()> {
    let config = common::load_config(common)?;

    let opts = PlannerOptions {
        dry_run: common.dry_run,
        downgrade: config.should_downgrade,
        install_required: config.install_required_dependencies,
        install_optional: config.install_optional_dependencies,
        remove_required: !keep_required && config.remove_required_dependencies,
        remove_optional: remove_optional || config.remove_optional_dependencies,
        ignore_conflicts: config.ignore_conflicts_dependencies,
    };

    let mut planner = common::build_planner(&config, opts)?;

    println!("Removing {}...", mod_name);
    planner.remove(mod_name, true)?;

    common::finish(planner, &config, common.dry_run)?;
    println!();
    println!("Finished!");
    Ok(())
}
