use anyhow::Result;
use modman::ModList;

use super::common::{self, CommonOpts};

/// Enable or disable mods. Never touches the portal or the game binary,
/// only the mod-list.json bookkeeping.
pub fn run(mod_names: &[String], enabled: bool, common: &CommonOpts) -> Result<()> {
    let config = common::load_config(common)?;
    let mut mods = ModList::load(config.mod_list_path()?)?;

    println!(
        "{} mod(s): {}",
        if enabled { "Enabling" } else { "Disabling" },
        mod_names.join(", ")
    );
    for name in mod_names {
        mods.upsert(name, enabled);
    }

    if common.dry_run {
        println!(
            "[DRY RUN] Would write this mod list:\n{}",
            mods.to_pretty_json()?
        );
    } else {
        mods.save()?;
    }

    common::handle_reload(&config, common.dry_run)?;
    println!();
    println!("Finished!");
    Ok(())
}
