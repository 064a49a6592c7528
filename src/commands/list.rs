use anyhow::Result;
use modman::ModList;

use super::common::{self, CommonOpts};

pub fn run(common: &CommonOpts) -> Result<()> {
    let config = common::load_config(common)?;
    let mods = ModList::load(config.mod_list_path()?)?;

    let installed: Vec<_> = mods.installed().collect();
    if installed.is_empty() {
        println!("No mods are installed");
        return Ok(());
    }

    println!("Currently installed mods:");
    for entry in installed {
        println!(
            "  {} ({})",
            entry.name,
            if entry.enabled { "enabled" } else { "disabled" }
        );
    }

    Ok(())
}
