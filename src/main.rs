use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

mod commands;

use commands::common::CommonOpts;

/// modman - A command-line mod manager for Factorio servers
#[derive(Parser)]
#[command(name = "modman")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a mod and its dependencies
    Install {
        /// Mod name, exactly as it appears in the mod portal URL
        mod_name: String,

        /// Also install the mod's optional dependencies
        #[arg(long)]
        install_optional: bool,

        /// Do not install required dependencies
        #[arg(long)]
        no_required: bool,

        /// Proceed even when the mod conflicts with an installed one
        #[arg(long)]
        ignore_conflicts: bool,

        /// Accept the newest release for an older Factorio version when
        /// nothing matches the installed one
        #[arg(long)]
        downgrade: bool,

        #[command(flatten)]
        common: CommonOpts,
    },

    /// Remove a mod and its dependencies
    Remove {
        /// Mod name
        mod_name: String,

        /// Also remove the mod's optional dependencies
        #[arg(long)]
        remove_optional: bool,

        /// Keep the mod's required dependencies installed
        #[arg(long)]
        keep_required: bool,

        #[command(flatten)]
        common: CommonOpts,
    },

    /// Update all installed mods to their newest matching release
    Update {
        /// Only update mods enabled in mod-list.json
        #[arg(short, long)]
        enabled_only: bool,

        /// Accept the newest release for an older Factorio version when
        /// nothing matches the installed one
        #[arg(long)]
        downgrade: bool,

        #[command(flatten)]
        common: CommonOpts,
    },

    /// List installed mods
    List {
        #[command(flatten)]
        common: CommonOpts,
    },

    /// Enable mods in mod-list.json
    Enable {
        /// Mod names to enable
        #[arg(required = true)]
        mod_names: Vec<String>,

        #[command(flatten)]
        common: CommonOpts,
    },

    /// Disable mods in mod-list.json
    Disable {
        /// Mod names to disable
        #[arg(required = true)]
        mod_names: Vec<String>,

        #[command(flatten)]
        common: CommonOpts,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install {
            mod_name,
            install_optional,
            no_required,
            ignore_conflicts,
            downgrade,
            common,
        } => commands::install::run(
            &mod_name,
            install_optional,
            no_required,
            ignore_conflicts,
            downgrade,
            &common,
        ),
        Commands::Remove {
            mod_name,
            remove_optional,
            keep_required,
            common,
        } => commands::remove::run(&mod_name, remove_optional, keep_required, &common),
        Commands::Update {
            enabled_only,
            downgrade,
            common,
        } => commands::update::run(enabled_only, downgrade, &common),
        Commands::List { common } => commands::list::run(&common),
        Commands::Enable { mod_names, common } => {
            commands::enable::run(&mod_names, true, &common)
        }
        Commands::Disable { mod_names, common } => {
            commands::enable::run(&mod_names, false, &common)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "modman", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
