//! Repository sessions.
//!
//! Every operation is scoped to an explicitly opened working tree, so two
//! sessions over different repositories are just two values; there is no
//! shared "current repository" state.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::runner::run_git;
use crate::git::status::{RepoStatus, parse_porcelain};

/// A branch of the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
}

/// One entry of the commit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

/// An open git working tree.
pub struct RepoSession {
    path: PathBuf,
}

impl RepoSession {
    /// Open a session on `path`, verifying it is inside a git work tree.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, GitError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(GitError::DirectoryNotFound(path));
        }

        let session = Self { path };
        let probe = session.run(&["rev-parse", "--is-inside-work-tree"]).await;
        match probe.as_deref() {
            Ok("true") => Ok(session),
            _ => Err(GitError::NotARepository(session.path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        run_git(&self.path, args).await
    }

    /// Current working tree status.
    ///
    /// The branch comes from `rev-parse --abbrev-ref HEAD`; the `status -sb`
    /// summary overrides it when present, since it also reflects detached
    /// heads and ahead/behind state.
    pub async fn status(&self) -> Result<RepoStatus, GitError> {
        let mut branch_hint = self
            .run(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .unwrap_or_default();

        if let Ok(summary) = self.run(&["status", "-sb"]).await
            && let Some(first_line) = summary.lines().next()
            && !first_line.trim().is_empty()
        {
            branch_hint = first_line.to_string();
        }

        let porcelain = self.run(&["status", "--porcelain=v1"]).await?;
        Ok(parse_porcelain(&porcelain, &branch_hint))
    }

    /// Aggregate staged diff across all staged paths.
    ///
    /// Each file's diff is fetched separately and concatenated under a
    /// `=== path ===` header. A path whose diff cannot be collected is
    /// skipped with a warning; one unreadable file never aborts generation.
    pub async fn staged_diff(&self) -> Result<String, GitError> {
        let status = self.status().await?;

        let mut diff = String::new();
        for change in &status.staged {
            match self.diff(&change.path, true).await {
                Ok(file_diff) if !file_diff.is_empty() => {
                    diff.push_str(&format!("\n=== {} ===\n{}\n", change.path, file_diff));
                }
                Ok(_) => {
                    debug!(path = %change.path, "staged path produced no diff text");
                }
                Err(e) => {
                    warn!(path = %change.path, error = %e, "skipping staged diff for path");
                }
            }
        }

        Ok(diff)
    }

    /// Diff for one path, against the index (`staged`) or the working tree.
    pub async fn diff(&self, path: &str, staged: bool) -> Result<String, GitError> {
        if staged {
            self.run(&["diff", "--staged", "--", path]).await
        } else {
            self.run(&["diff", "--", path]).await
        }
    }

    /// Stage the given paths. An empty list is a no-op.
    pub async fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await.map(|_| ())
    }

    /// Unstage the given paths. An empty list is a no-op.
    pub async fn unstage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["reset", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await.map(|_| ())
    }

    /// Create a commit with the given message.
    pub async fn commit(&self, message: &str) -> Result<(), GitError> {
        if message.trim().is_empty() {
            return Err(GitError::EmptyCommitMessage);
        }
        self.run(&["commit", "-m", message]).await.map(|_| ())
    }

    /// List local and remote branches, marking the current one.
    pub async fn branches(&self) -> Result<Vec<Branch>, GitError> {
        let output = self.run(&["branch", "-a"]).await?;

        let mut branches = Vec::new();
        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let is_current = line.starts_with('*');
            let name = line
                .trim_start_matches('*')
                .trim()
                .trim_start_matches("remotes/")
                .trim();

            if !name.is_empty() && !name.starts_with("HEAD ->") {
                branches.push(Branch {
                    name: name.to_string(),
                    is_current,
                });
            }
        }

        Ok(branches)
    }

    /// Switch to an existing branch.
    pub async fn checkout(&self, branch: &str) -> Result<(), GitError> {
        if branch.is_empty() {
            return Err(GitError::EmptyBranchName);
        }
        self.run(&["checkout", branch]).await.map(|_| ())
    }

    /// Create a branch, optionally switching to it.
    pub async fn create_branch(&self, branch: &str, checkout: bool) -> Result<(), GitError> {
        if branch.is_empty() {
            return Err(GitError::EmptyBranchName);
        }
        if checkout {
            self.run(&["checkout", "-b", branch]).await.map(|_| ())
        } else {
            self.run(&["branch", branch]).await.map(|_| ())
        }
    }

    /// Recent commit history, newest first.
    pub async fn log(&self, limit: usize) -> Result<Vec<CommitInfo>, GitError> {
        let count = format!("-{limit}");
        let output = self
            .run(&[
                "log",
                count.as_str(),
                "--pretty=format:%H|%s|%an|%ad",
                "--date=iso",
            ])
            .await?;

        let mut commits = Vec::new();
        for line in output.lines() {
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.splitn(4, '|').collect();
            if parts.len() == 4 {
                commits.push(CommitInfo {
                    hash: parts[0].chars().take(7).collect(),
                    message: parts[1].to_string(),
                    author: parts[2].to_string(),
                    date: parts[3].to_string(),
                });
            }
        }

        Ok(commits)
    }

    /// Discard working tree changes to a path.
    pub async fn discard(&self, path: &str) -> Result<(), GitError> {
        self.run(&["checkout", "--", path]).await.map(|_| ())
    }
}
