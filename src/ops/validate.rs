use crate::model::Item;

/// A request rejected before any remote call is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{what} is empty")]
    Empty { what: &'static str },
    #[error("invalid {what}: {id:?} is numeric only; expected a node ID starting with '{prefix}'")]
    NumericOnly {
        what: &'static str,
        id: String,
        prefix: &'static str,
    },
    #[error("invalid {what}: {id:?} does not start with '{prefix}'")]
    WrongPrefix {
        what: &'static str,
        id: String,
        prefix: &'static str,
    },
    #[error("cannot {action} item of type: {kind} (only Issues and PullRequests can be {past})")]
    NotAssignable {
        action: &'static str,
        past: &'static str,
        kind: String,
    },
    #[error("item {id} has no repository/number to update")]
    NoLocator { id: String },
}

pub const PROJECT_ID_PREFIX: &str = "PVT_";
pub const ITEM_ID_PREFIX: &str = "PVTI_";

/// Project node ids look like `PVT_kwDO...`
pub fn validate_project_id(id: &str) -> Result<(), ValidationError> {
    validate_node_id(id, "project ID", PROJECT_ID_PREFIX)
}

/// Project item node ids look like `PVTI_lADO...`
pub fn validate_item_id(id: &str) -> Result<(), ValidationError> {
    validate_node_id(id, "item ID", ITEM_ID_PREFIX)
}

pub fn validate_non_empty(value: &str, what: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { what })
    } else {
        Ok(())
    }
}

/// All identifiers a single-select update needs
pub fn validate_select_update(
    project_id: &str,
    item_id: &str,
    field_id: &str,
    option_id: &str,
) -> Result<(), ValidationError> {
    validate_project_id(project_id)?;
    validate_item_id(item_id)?;
    validate_non_empty(field_id, "field ID")?;
    validate_non_empty(option_id, "option ID")
}

/// Assignment needs a real issue or pull request with a repository locator
pub fn validate_assignable(item: &Item) -> Result<(&str, u64), ValidationError> {
    if !item.kind.is_assignable() {
        return Err(ValidationError::NotAssignable {
            action: "assign to",
            past: "assigned",
            kind: display_kind(item),
        });
    }
    item.locator().ok_or_else(|| ValidationError::NoLocator {
        id: item.id.clone(),
    })
}

/// Label edits go through the issue itself, so drafts are rejected
pub fn validate_labelable(item: &Item) -> Result<(&str, u64), ValidationError> {
    validate_item_id(&item.id)?;
    if !item.kind.is_assignable() {
        return Err(ValidationError::NotAssignable {
            action: "label",
            past: "labeled",
            kind: display_kind(item),
        });
    }
    item.locator().ok_or_else(|| ValidationError::NoLocator {
        id: item.id.clone(),
    })
}

fn display_kind(item: &Item) -> String {
    match item.kind.as_str() {
        "" => "unknown".to_string(),
        name => name.to_string(),
    }
}

fn validate_node_id(id: &str, what: &'static str, prefix: &'static str) -> Result<(), ValidationError> {
    validate_non_empty(id, what)?;
    if id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NumericOnly {
            what,
            id: id.to_string(),
            prefix,
        });
    }
    if !id.starts_with(prefix) {
        return Err(ValidationError::WrongPrefix {
            what,
            id: id.to_string(),
            prefix,
        });
    }
    Ok(())
}
