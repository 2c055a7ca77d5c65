use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
};
use thiserror::Error;

const FALLBACK_EDITORS: [&str; 3] = ["vim", "nano", "nvim"];

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no suitable editor found. Please install vim, nano, or nvim, or set $EDITOR")]
    NoEditor,
    #[error("failed to launch editor '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("editor '{program}' exited with {status}")]
    Exited { program: String, status: ExitStatus },
}

/// Work out the editor command line: `$EDITOR` when set, otherwise a
/// platform default. `on_path` reports whether a program can be found.
pub fn resolve_editor<F>(env_editor: Option<&str>, on_path: F) -> Result<Vec<String>, EditorError>
where
    F: Fn(&str) -> bool,
{
    if let Some(editor) = env_editor {
        let command: Vec<String> = editor.split_whitespace().map(String::from).collect();
        if !command.is_empty() {
            return Ok(command);
        }
    }

    if cfg!(windows) {
        return Ok(vec!["notepad".to_string()]);
    }

    FALLBACK_EDITORS
        .into_iter()
        .find(|&name| on_path(name))
        .map(|name| vec![name.to_string()])
        .ok_or(EditorError::NoEditor)
}

/// Open `path` in the user's editor attached to this terminal and wait for
/// it to exit.
pub fn open_in_editor(path: &Path) -> Result<(), EditorError> {
    let env_editor = std::env::var("EDITOR").ok();
    let command = resolve_editor(env_editor.as_deref(), |name| which::which(name).is_ok())?;
    launch(&command, path)
}

/// Run `command` with `path` appended and wait for it to finish.
pub fn launch(command: &[String], path: &Path) -> Result<(), EditorError> {
    let (program, args) = command.split_first().ok_or(EditorError::NoEditor)?;

    tracing::debug!(%program, ?args, path = %path.display(), "launching editor");

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|source| EditorError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(EditorError::Exited {
            program: program.clone(),
            status,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_editor_wins() {
        let command = resolve_editor(Some("vim"), |_| false).unwrap();
        assert_eq!(command, vec!["vim"]);
    }

    #[test]
    fn test_env_editor_with_arguments() {
        let command = resolve_editor(Some("code --wait"), |_| false).unwrap();
        assert_eq!(command, vec!["code", "--wait"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_blank_env_editor_falls_back() {
        let command = resolve_editor(Some("  "), |name| name == "nano").unwrap();
        assert_eq!(command, vec!["nano"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_fallback_order() {
        let command = resolve_editor(None, |name| name == "nano" || name == "nvim").unwrap();
        assert_eq!(command, vec!["nano"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_no_editor_available() {
        let err = resolve_editor(None, |_| false).unwrap_err();
        assert!(matches!(err, EditorError::NoEditor));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        // `false` ignores its arguments and exits 1
        let err = launch(&["false".to_string()], Path::new("whatever.md")).unwrap_err();
        assert!(matches!(err, EditorError::Exited { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_exit() {
        let command = vec!["true".to_string(), "--wait".to_string()];
        launch(&command, Path::new("whatever.md")).unwrap();
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let command = vec!["pressmark-no-such-editor".to_string()];
        let err = launch(&command, Path::new("whatever.md")).unwrap_err();
        match err {
            EditorError::Spawn { program, .. } => assert_eq!(program, "pressmark-no-such-editor"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_command_is_no_editor() {
        let err = launch(&[], Path::new("whatever.md")).unwrap_err();
        assert!(matches!(err, EditorError::NoEditor));
    }
}
