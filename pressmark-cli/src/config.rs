use anyhow::{Context, Result};
use clap::ArgMatches;
use pressmark_core::config::{DEFAULT_CONFIG_PATH, Settings, SettingsOverrides, resolve};
use std::path::PathBuf;

/// Path of the settings file named by `--config`, or the default.
pub fn config_path(args: &ArgMatches) -> PathBuf {
    PathBuf::from(string_arg(args, "config").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()))
}

/// Collect the settings the user set explicitly on the command line (or
/// through the matching environment variables). Flags a subcommand does
/// not define are simply absent.
pub fn overrides(args: &ArgMatches) -> SettingsOverrides {
    SettingsOverrides {
        site_title: string_arg(args, "site-title"),
        content_dir: string_arg(args, "content-dir").map(PathBuf::from),
        output_dir: string_arg(args, "output-dir").map(PathBuf::from),
        server_port: string_arg(args, "port"),
    }
}

/// Resolve settings with cascading precedence:
/// 1. CLI arguments and their environment variables (highest priority)
/// 2. Configuration file
/// 3. Defaults (lowest priority)
pub fn load_settings(args: &ArgMatches) -> Result<Settings> {
    let path = config_path(args);
    let settings = resolve(Some(&path), &overrides(args))
        .with_context(|| format!("error loading config file {}", path.display()))?;

    tracing::debug!(?settings, "resolved settings");

    Ok(settings)
}

fn string_arg(args: &ArgMatches, id: &str) -> Option<String> {
    args.try_get_one::<String>(id).unwrap_or(None).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};
    use tempfile::tempdir;

    fn command() -> Command {
        Command::new("test")
            .arg(Arg::new("config").long("config").value_name("FILE"))
            .arg(Arg::new("content-dir").long("content-dir").alias("contentDir"))
            .arg(Arg::new("site-title").long("site-title"))
    }

    #[test]
    fn test_only_given_flags_become_overrides() {
        let matches = command()
            .try_get_matches_from(["test", "--contentDir", "/custom/source"])
            .unwrap();

        let overrides = overrides(&matches);
        assert_eq!(overrides.content_dir, Some(PathBuf::from("/custom/source")));
        assert_eq!(overrides.site_title, None);
        // Not defined on this command at all
        assert_eq!(overrides.output_dir, None);
        assert_eq!(overrides.server_port, None);
    }

    #[test]
    fn test_default_config_path() {
        let matches = command().try_get_matches_from(["test"]).unwrap();
        assert_eq!(config_path(&matches), PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_cli_args_override_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("site.yaml");
        std::fs::write(&file, "siteTitle: From File\noutputDir: dist\n").unwrap();

        let matches = command()
            .try_get_matches_from([
                "test",
                "--config",
                file.to_str().unwrap(),
                "--site-title",
                "From Flag",
            ])
            .unwrap();

        let settings = load_settings(&matches).unwrap();
        assert_eq!(settings.site_title, "From Flag");
        assert_eq!(settings.output_dir, PathBuf::from("dist"));
        // Should still have defaults for non-overridden values
        assert_eq!(settings.content_dir, PathBuf::from("content"));
    }
}
