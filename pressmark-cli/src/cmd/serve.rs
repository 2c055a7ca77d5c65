use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use pressmark_dev_server::{StaticServer, StaticServerConfig, parse_port};

use super::output_dir_arg;
use crate::config::load_settings;

pub fn make_subcommand() -> Command {
    Command::new("serve")
        .about("Serve the generated static files")
        .arg(output_dir_arg())
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .env("PRESSMARK_PORT")
                .help("Port to serve the site on"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Host to bind to")
                .default_value("127.0.0.1"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open browser automatically")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let settings = load_settings(args)?;

    let server_config = StaticServerConfig {
        host: args
            .get_one::<String>("host")
            .cloned()
            .unwrap_or_else(|| StaticServerConfig::default().host),
        port: parse_port(&settings.server_port)?,
        root: settings.output_dir.clone(),
        open: args.get_flag("open"),
    };

    StaticServer::new(server_config)
        .run()
        .await
        .context("Failed to start server")?;

    Ok(())
}
