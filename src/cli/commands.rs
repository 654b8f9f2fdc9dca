use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Default)]
#[command(name = "ph", about = concat!("ph v", env!("CARGO_PKG_VERSION"), " - GitHub Projects in your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project number or URL (https://github.com/orgs/<owner>/projects/<n>)
    #[arg(short = 'p', long, global = true)]
    pub project: Option<String>,

    /// Organization or user that owns the project
    #[arg(short = 'o', long, global = true)]
    pub owner: Option<String>,

    /// Path to the gh executable
    #[arg(short = 'g', long = "gh-path", default_value = "gh", global = true)]
    pub gh_path: String,

    /// Maximum number of items to fetch (1-100)
    #[arg(long = "item-limit", value_parser = clap::value_parser!(u16).range(1..=100), global = true)]
    pub item_limit: Option<u16>,

    /// Hide hint notifications
    #[arg(long = "disable-notifications", global = true)]
    pub disable_notifications: bool,

    /// Leave Done items out of the board
    #[arg(long = "exclude-done", global = true)]
    pub exclude_done: bool,

    /// Iteration filter (repeatable): @current, @next, @previous or a name
    #[arg(short = 'i', long = "iteration", global = true)]
    pub iterations: Vec<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file (defaults to the platform data directory)
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Use the built-in sample project instead of GitHub
    #[arg(long, global = true)]
    pub demo: bool,

    /// Output as JSON (list/show)
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the project's items, filtered and sorted
    List(ListArgs),
    /// Show one item's fields and description
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter query, e.g. "label:bug assignee:alice login"
    #[arg(short = 'f', long)]
    pub filter: Option<String>,
    /// Sort field: title, status, repository, labels, milestone, sub-issues,
    /// priority, assignees, number, created, updated
    #[arg(short = 's', long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Item node id (PVTI_...) or issue number
    pub item: String,
}
