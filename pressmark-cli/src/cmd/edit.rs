use anyhow::{Context, Result};
use clap::{ArgMatches, Command};

use crate::config::load_settings;
use crate::{editor, picker};

pub fn make_subcommand() -> Command {
    Command::new("edit").about("Pick a Markdown or HTML file and open it in your editor")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let settings = load_settings(args)?;

    let items = picker::collect_items(&settings.content_dir, &settings.output_dir);
    if items.is_empty() {
        println!("No .md or .html files found in content or output directories.");
        return Ok(());
    }

    match picker::pick(items).context("Error running file picker")? {
        Some(path) => {
            println!("Opening {} in editor...", path.display());
            editor::open_in_editor(&path).context("Failed to open file in editor")?;
        }
        None => println!("Editor selection cancelled."),
    }

    Ok(())
}
