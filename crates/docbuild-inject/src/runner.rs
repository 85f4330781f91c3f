//! Subprocess command runner.

use std::path::Path;
use std::process::Command;

use crate::error::InjectError;
use crate::traits::{CommandOutput, CommandRunner};

/// Runs commands as child processes and logs their output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, InjectError> {
        let command_line = std::iter::once(command)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!("Running: {} (cwd: {})", command_line, cwd.display());

        let output = Command::new(command)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| InjectError::Command(format!("{}: {}", command_line, e)))?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        for line in result.stdout.lines() {
            tracing::info!("{}", line);
        }
        for line in result.stderr.lines() {
            tracing::warn!("{}", line);
        }

        if !output.status.success() {
            return Err(InjectError::Command(format!(
                "{} exited with status {}",
                command_line, result.exit_code
            )));
        }

        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn captures_stdout_in_cwd() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("mkdocs.yml"), "site_name: demo\n").unwrap();

        let output = ProcessRunner
            .run("cat", &["mkdocs.yml"], temp.path())
            .unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "site_name: demo\n");
    }

    #[test]
    fn reports_failed_commands() {
        let temp = tempdir().unwrap();

        let result = ProcessRunner.run("cat", &["missing.yml"], temp.path());

        assert!(matches!(result, Err(InjectError::Command(_))));
    }
}
