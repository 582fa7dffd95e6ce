//! Git subprocess execution.

use std::env;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

use crate::error::GitError;

/// Default timeout for git subprocess execution.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "SCRIVENER_GIT_TIMEOUT";

/// Get the configured subprocess timeout.
///
/// Reads from SCRIVENER_GIT_TIMEOUT if set, otherwise uses the default.
/// Logs a warning if the variable holds an invalid value.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Check that the git executable is installed and runs.
///
/// Uses the `which` crate for cross-platform executable detection, then
/// verifies the binary actually executes.
pub async fn check_git_installed() -> Result<(), GitError> {
    if which::which("git").is_err() {
        return Err(GitError::GitNotInstalled);
    }

    let version_check = Command::new("git")
        .arg("--version")
        .output()
        .await
        .map_err(GitError::SpawnFailed)?;

    if !version_check.status.success() {
        return Err(GitError::GitNotInstalled);
    }

    Ok(())
}

/// Run git with the given arguments in `repo` and return trimmed stdout.
///
/// The subprocess is bounded by the configured timeout; a non-zero exit
/// surfaces the captured stderr in the error.
pub async fn run_git(repo: &Path, args: &[&str]) -> Result<String, GitError> {
    let timeout_duration = get_timeout();

    let output = timeout(
        timeout_duration,
        Command::new("git")
            .args(args)
            .current_dir(repo)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output(),
    )
    .await
    .map_err(|_| GitError::Timeout {
        args: args.join(" "),
        secs: timeout_duration.as_secs(),
    })?
    .map_err(GitError::SpawnFailed)?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.trim_end_matches('\n').to_string())
}
