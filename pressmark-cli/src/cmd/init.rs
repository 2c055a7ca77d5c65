use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use pressmark_core::persist;

use crate::config::{config_path, load_settings};

pub fn make_subcommand() -> Command {
    Command::new("init")
        .about("Write the current settings to the configuration file")
        .arg(
            Arg::new("force")
                .long("force")
                .help("Overwrite an existing configuration file")
                .action(ArgAction::SetTrue),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let path = config_path(args);
    if path.exists() && !args.get_flag("force") {
        bail!("{} already exists, pass --force to overwrite it", path.display());
    }

    let settings = load_settings(args)?;
    persist(&settings, &path).context("Failed to save settings")?;

    println!("Wrote settings to {}", path.display());

    Ok(())
}
