use crate::model::{Config, MAX_ITEM_LIMIT};
use crate::parse::normalize_iteration_filters;
use crate::tui::Session;

use super::commands::Cli;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("no project given; pass --project <number|url>, set default_project_id in the config, or use --demo")]
    MissingProject,
    #[error("could not read a project number from {0:?}")]
    BadProjectRef(String),
}

/// Project number and, for URLs, the owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub number: String,
    pub owner: Option<String>,
}

/// Accept a bare project number/id or a project URL of the form
/// `https://github.com/{orgs|users}/<owner>/projects/<n>[/views/...]`.
pub fn parse_project_ref(value: &str) -> Result<ProjectRef, StartupError> {
    let value = value.trim();
    if !value.contains('/') {
        if value.is_empty() {
            return Err(StartupError::BadProjectRef(value.to_string()));
        }
        return Ok(ProjectRef {
            number: value.to_string(),
            owner: None,
        });
    }

    let path = value
        .split_once("://")
        .map_or(value, |(_, rest)| rest)
        .trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').collect();
    for window in segments.windows(4) {
        if let [kind, owner, "projects", number] = window
            && matches!(*kind, "orgs" | "users")
            && !owner.is_empty()
            && !number.is_empty()
            && number.chars().all(|c| c.is_ascii_digit())
        {
            return Ok(ProjectRef {
                number: number.to_string(),
                owner: Some(owner.to_string()),
            });
        }
    }
    Err(StartupError::BadProjectRef(value.to_string()))
}

/// Merge flags with the config file: flag > config value > built-in default.
/// Without a project id only `--demo` may start.
pub fn resolve_session(cli: &Cli, config: &Config) -> Result<Session, StartupError> {
    let project = match cli.project.as_deref() {
        Some(value) => Some(parse_project_ref(value)?),
        None if !config.default_project_id.trim().is_empty() => {
            Some(parse_project_ref(&config.default_project_id)?)
        }
        None => None,
    };

    let (project_id, url_owner) = match project {
        Some(p) => (p.number, p.owner),
        None if cli.demo => ("1".to_string(), None),
        None => return Err(StartupError::MissingProject),
    };

    let owner = cli
        .owner
        .clone()
        .filter(|o| !o.trim().is_empty())
        .or(url_owner)
        .unwrap_or_else(|| config.default_owner.clone());

    let item_limit = cli
        .item_limit
        .map(usize::from)
        .unwrap_or_else(|| config.item_limit())
        .clamp(1, MAX_ITEM_LIMIT);

    let iteration_filters = if cli.iterations.is_empty() {
        normalize_iteration_filters(&config.default_iteration_filters)
    } else {
        normalize_iteration_filters(&cli.iterations)
    };

    Ok(Session {
        project_id,
        owner,
        item_limit,
        exclude_done: cli.exclude_done || config.default_exclude_done,
        suppress_hints: cli.disable_notifications || config.suppress_hints,
        iteration_filters,
    })
}
