mod cmd;
mod config;
mod editor;
mod picker;

use anyhow::{Result, bail};
use clap::{Arg, ArgAction, Command};
use pressmark_core::config::DEFAULT_CONFIG_PATH;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

fn cli() -> Command {
    Command::new("pressmark")
        .about("Turn a folder of markdown notes into a folder of plain HTML pages")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file")
                .default_value(DEFAULT_CONFIG_PATH)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(cmd::generate::make_subcommand())
        .subcommand(cmd::serve::make_subcommand())
        .subcommand(cmd::edit::make_subcommand())
        .subcommand(cmd::init::make_subcommand())
}

// `--verbose` only picks the default level; `RUST_LOG` still wins when set.
fn log_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn init_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("generate", args)) => cmd::generate::execute(args),
        Some(("serve", args)) => cmd::serve::execute(args).await,
        Some(("edit", args)) => cmd::edit::execute(args),
        Some(("init", args)) => cmd::init::execute(args),
        Some((name, _)) => bail!("unknown command '{name}'"),
        None => bail!("no command given, see 'pressmark --help'"),
    }
}
