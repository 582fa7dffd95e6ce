//! scrivener - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use scrivener::ai::Gateway;
use scrivener::config::AppConfig;
use scrivener::git::{RepoSession, RepoStatus, check_git_installed};

/// Draft commit messages from staged diffs using AI.
#[derive(Parser, Debug)]
#[command(name = "scrivener")]
#[command(about = "Draft commit messages from staged diffs using AI")]
#[command(version)]
struct Cli {
    /// Repository to operate on (defaults to the current directory)
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the working tree status
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draft a commit message from the staged diff
    Generate,
    /// Draft a commit message, confirm, and commit
    Commit {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Stage the given paths
    Stage { paths: Vec<String> },
    /// Unstage the given paths
    Unstage { paths: Vec<String> },
    /// List branches
    Branches,
    /// Switch to a branch
    Checkout { branch: String },
    /// Create a branch and switch to it
    Branch { name: String },
    /// Show recent commits
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Discard working tree changes to a path
    Discard { path: String },
    /// Show or update the AI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Update configuration fields and validate before persisting
    Set {
        /// Provider: openai, claude, or ollama
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Configuration commands do not need a repository or git itself.
    if let Command::Config { action } = &cli.command {
        return handle_config(action);
    }

    check_git_installed().await.context("git is required")?;

    let session = RepoSession::open(&cli.repo)
        .await
        .context("Failed to open repository")?;

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    config.touch_recent_repo(session.path());
    if let Err(e) = config.save() {
        warn!(error = %e, "could not update recent repository list");
    }

    match cli.command {
        Command::Status { json } => {
            let status = session.status().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }
        Command::Generate => {
            let message = draft_message(&session, &config).await?;
            println!("{message}");
        }
        Command::Commit { yes } => {
            let message = draft_message(&session, &config).await?;
            println!("{message}\n");

            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Commit with this message?")
                    .default(true)
                    .interact()?;

            if confirmed {
                session.commit(&message).await?;
                println!("Committed.");
            } else {
                println!("Aborted.");
            }
        }
        Command::Stage { paths } => {
            session.stage(&paths).await?;
        }
        Command::Unstage { paths } => {
            session.unstage(&paths).await?;
        }
        Command::Branches => {
            for branch in session.branches().await? {
                let marker = if branch.is_current { "*" } else { " " };
                println!("{marker} {}", branch.name);
            }
        }
        Command::Checkout { branch } => {
            session.checkout(&branch).await?;
            println!("Switched to {branch}");
        }
        Command::Branch { name } => {
            session.create_branch(&name, true).await?;
            println!("Created and switched to {name}");
        }
        Command::Log { limit } => {
            for commit in session.log(limit).await? {
                println!("{}  {}  {} ({})", commit.hash, commit.message, commit.author, commit.date);
            }
        }
        Command::Discard { path } => {
            session.discard(&path).await?;
            println!("Discarded changes to {path}");
        }
        Command::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Collect the staged diff and run it through the gateway.
async fn draft_message(session: &RepoSession, config: &AppConfig) -> Result<String> {
    let diff = session
        .staged_diff()
        .await
        .context("Failed to collect staged diff")?;

    let gateway = Gateway::new(config.ai.clone())?;
    let message = gateway
        .generate_commit_message(&diff)
        .await
        .context("Failed to generate commit message")?;

    Ok(message)
}

fn print_status(status: &RepoStatus) {
    println!("On branch {}", status.branch);

    if !status.has_changes {
        println!("Working tree clean");
        return;
    }

    if !status.staged.is_empty() {
        println!("\nStaged changes:");
        for change in &status.staged {
            println!("  {}  ({})", change.path, change.category);
        }
    }
    if !status.unstaged.is_empty() {
        println!("\nUnstaged changes:");
        for change in &status.unstaged {
            println!("  {}  ({})", change.path, change.category);
        }
    }
    if !status.untracked.is_empty() {
        println!("\nUntracked files:");
        for path in &status.untracked {
            println!("  {path}");
        }
    }
}

fn handle_config(action: &ConfigAction) -> Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;

    match action {
        ConfigAction::Show => {
            println!("provider: {}", config.ai.provider);
            println!("model:    {}", config.ai.model);
            println!("baseUrl:  {}", config.ai.base_url);
            let key = if config.ai.api_key.is_empty() {
                "(not set)"
            } else {
                "(set)"
            };
            println!("apiKey:   {key}");
        }
        ConfigAction::Set {
            provider,
            api_key,
            base_url,
            model,
        } => {
            if let Some(provider) = provider {
                config.ai.provider = provider.clone();
            }
            if let Some(api_key) = api_key {
                config.ai.api_key = api_key.clone();
            }
            if let Some(base_url) = base_url {
                config.ai.base_url = base_url.clone();
            }
            if let Some(model) = model {
                config.ai.model = model.clone();
            }

            config
                .ai
                .validate()
                .context("Refusing to save an invalid configuration")?;
            config.save().context("Failed to save configuration")?;
            println!("Saved.");
        }
    }

    Ok(())
}
