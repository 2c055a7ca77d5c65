use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use pressmark_core::build_site;

use super::output_dir_arg;
use crate::config::load_settings;

pub fn make_subcommand() -> Command {
    Command::new("generate")
        .about("Generate static HTML files from Markdown")
        .arg(
            Arg::new("content-dir")
                .short('s')
                .long("content-dir")
                .alias("contentDir")
                .value_name("DIR")
                .env("PRESSMARK_CONTENT_DIR")
                .help("Directory containing markdown content files"),
        )
        .arg(output_dir_arg())
        .arg(
            Arg::new("site-title")
                .short('t')
                .long("site-title")
                .alias("siteTitle")
                .value_name("TITLE")
                .env("PRESSMARK_SITE_TITLE")
                .help("Title for the site"),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let settings = load_settings(args)?;

    println!("Generating site with configuration:");
    println!("  Site Title: {}", settings.site_title);
    println!("  Content Dir: {}", settings.content_dir.display());
    println!("  Output Dir: {}", settings.output_dir.display());

    let report = build_site(&settings).context("Failed to generate site")?;

    println!(
        "Generated {} page(s) in '{}', skipped {} other file(s).",
        report.artifacts.len(),
        settings.output_dir.display(),
        report.skipped.len()
    );

    Ok(())
}
