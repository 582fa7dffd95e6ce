//! Porcelain status parsing.
//!
//! Translates the compact two-character codes of `git status --porcelain=v1`
//! into a categorized change model. Pure string processing; the subprocess
//! side lives in [`crate::git::session`].

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Category of a changed path, derived from its two-character status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeCategory {
    Staged,
    Modified,
    ModifiedStagedAndUnstaged,
    Added,
    Deleted,
    DeletedStaged,
    Renamed,
    Copied,
    Untracked,
    Ignored,
    Unknown,
}

impl ChangeCategory {
    /// Map a two-character porcelain code to its category.
    ///
    /// Unrecognized codes map to [`ChangeCategory::Unknown`] rather than
    /// failing; git grows status codes faster than tools track them.
    pub fn from_code(index: char, worktree: char) -> Self {
        match (index, worktree) {
            ('M', ' ') => ChangeCategory::Staged,
            (' ', 'M') => ChangeCategory::Modified,
            ('M', 'M') => ChangeCategory::ModifiedStagedAndUnstaged,
            ('A', ' ') => ChangeCategory::Added,
            (' ', 'D') => ChangeCategory::Deleted,
            ('D', ' ') => ChangeCategory::DeletedStaged,
            ('R', ' ') => ChangeCategory::Renamed,
            ('C', ' ') => ChangeCategory::Copied,
            ('?', '?') => ChangeCategory::Untracked,
            ('!', '!') => ChangeCategory::Ignored,
            _ => ChangeCategory::Unknown,
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeCategory::Staged => "Staged",
            ChangeCategory::Modified => "Modified",
            ChangeCategory::ModifiedStagedAndUnstaged => "Modified (staged and unstaged)",
            ChangeCategory::Added => "Added",
            ChangeCategory::Deleted => "Deleted",
            ChangeCategory::DeletedStaged => "Deleted (staged)",
            ChangeCategory::Renamed => "Renamed",
            ChangeCategory::Copied => "Copied",
            ChangeCategory::Untracked => "Untracked",
            ChangeCategory::Ignored => "Ignored",
            ChangeCategory::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// A changed path and its category. For renames the path is the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub category: ChangeCategory,
}

/// Snapshot of a working tree produced by one status query.
///
/// Built fresh on every query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    pub branch: String,
    pub staged: Vec<FileChange>,
    pub unstaged: Vec<FileChange>,
    pub untracked: Vec<String>,
    pub is_repo: bool,
    pub has_changes: bool,
}

/// Parse `git status --porcelain=v1` output into a categorized status.
///
/// `branch_hint` is either the bare output of `rev-parse --abbrev-ref HEAD`
/// or the summary line of `status -sb`; in both forms the branch is the first
/// whitespace-delimited token after any leading `## ` marker.
///
/// Classification follows git's own semantics, where the staged and unstaged
/// views are not mutually exclusive: an `MM` path is listed in both. Untracked
/// paths appear only in `untracked`. Lines shorter than three characters are
/// skipped as malformed; empty output is a clean tree, not an error.
pub fn parse_porcelain(raw: &str, branch_hint: &str) -> RepoStatus {
    let mut status = RepoStatus {
        branch: parse_branch(branch_hint),
        staged: Vec::new(),
        unstaged: Vec::new(),
        untracked: Vec::new(),
        is_repo: true,
        has_changes: false,
    };

    if raw.trim().is_empty() {
        return status;
    }

    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }
        if line.len() < 3 {
            warn!(line, "skipping malformed porcelain line");
            continue;
        }

        let bytes = line.as_bytes();
        let index = bytes[0] as char;
        let worktree = bytes[1] as char;
        let path = resolve_path(line.get(3..).unwrap_or_default());

        if matches!(index, 'M' | 'A' | 'R' | 'C') {
            status.staged.push(FileChange {
                path: path.clone(),
                category: ChangeCategory::from_code(index, worktree),
            });
        }

        if index == '?' {
            status.untracked.push(path.clone());
        }

        // `??` satisfies the worktree condition too, but untracked paths are
        // already represented above and must not be duplicated here.
        if (worktree == 'M' || (index == '?' && worktree == '?')) && index != '?' {
            status.unstaged.push(FileChange {
                path,
                category: ChangeCategory::from_code(index, worktree),
            });
        }
    }

    status.has_changes = !status.staged.is_empty()
        || !status.unstaged.is_empty()
        || !status.untracked.is_empty();
    status
}

/// Resolve the path field of a porcelain line.
///
/// Rename lines carry `ORIG -> NEW`; the change is recorded under the
/// destination, taken from after the last arrow.
fn resolve_path(field: &str) -> String {
    match field.rsplit_once("->") {
        Some((_, destination)) => destination.trim().to_string(),
        None => field.to_string(),
    }
}

/// Extract the branch name from either form of branch hint.
fn parse_branch(hint: &str) -> String {
    let hint = hint.trim();
    let hint = hint.strip_prefix("##").map(str::trim_start).unwrap_or(hint);
    hint.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}
