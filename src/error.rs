//! Error types for scrivener modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::ai::Provider;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found. Install git and make sure it is in PATH")]
    GitNotInstalled,

    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {args} failed: {stderr}")]
    CommandFailed { args: String, stderr: String },

    #[error("git {args} timed out after {secs} seconds")]
    Timeout { args: String, secs: u64 },

    #[error("Commit message cannot be empty")]
    EmptyCommitMessage,

    #[error("Branch name cannot be empty")]
    EmptyBranchName,
}

/// Errors from AI commit message generation.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Diff is empty; stage some changes first")]
    EmptyDiff,

    #[error("AI provider must be specified")]
    ProviderRequired,

    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    #[error("API key is required for {provider}")]
    MissingCredential { provider: Provider },

    #[error("Provider returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Provider response had an unexpected shape: {0}")]
    MalformedResponse(String),

    #[error("Request to provider failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors from configuration persistence.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write config file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseFailed(#[source] serde_json::Error),
}
