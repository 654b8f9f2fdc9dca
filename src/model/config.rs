use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound the remote item listing accepts
pub const MAX_ITEM_LIMIT: usize = 100;

/// Persistent settings from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_project_id: String,
    #[serde(default)]
    pub default_owner: String,
    #[serde(default = "default_item_limit")]
    pub default_item_limit: usize,
    /// Hide info-level hint notifications
    #[serde(default)]
    pub suppress_hints: bool,
    #[serde(default)]
    pub default_exclude_done: bool,
    #[serde(default)]
    pub default_iteration_filters: Vec<String>,
    #[serde(default)]
    pub card_fields: CardFields,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_project_id: String::new(),
            default_owner: String::new(),
            default_item_limit: default_item_limit(),
            suppress_hints: false,
            default_exclude_done: false,
            default_iteration_filters: Vec::new(),
            card_fields: CardFields::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Item limit clamped to what the remote listing accepts
    pub fn item_limit(&self) -> usize {
        self.default_item_limit.clamp(1, MAX_ITEM_LIMIT)
    }
}

/// Which optional fields appear on cards and as table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    #[serde(default = "default_true")]
    pub milestone: bool,
    #[serde(default)]
    pub repository: bool,
    #[serde(default = "default_true")]
    pub labels: bool,
    #[serde(default)]
    pub sub_issues: bool,
    #[serde(default)]
    pub parent_issue: bool,
}

impl Default for CardFields {
    fn default() -> Self {
        CardFields {
            milestone: true,
            repository: false,
            labels: true,
            sub_issues: false,
            parent_issue: false,
        }
    }
}

/// One toggleable optional card field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Milestone,
    Repository,
    Labels,
    SubIssues,
    ParentIssue,
}

impl CardField {
    pub const ALL: [CardField; 5] = [
        CardField::Milestone,
        CardField::Repository,
        CardField::Labels,
        CardField::SubIssues,
        CardField::ParentIssue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardField::Milestone => "Milestone",
            CardField::Repository => "Repository",
            CardField::Labels => "Labels",
            CardField::SubIssues => "Sub-issues",
            CardField::ParentIssue => "Parent issue",
        }
    }

    /// Key used in the `[card_fields]` table
    pub fn config_key(self) -> &'static str {
        match self {
            CardField::Milestone => "milestone",
            CardField::Repository => "repository",
            CardField::Labels => "labels",
            CardField::SubIssues => "sub_issues",
            CardField::ParentIssue => "parent_issue",
        }
    }

    /// Key pressed in field-toggle mode
    pub fn toggle_key(self) -> char {
        match self {
            CardField::Milestone => 'm',
            CardField::Repository => 'r',
            CardField::Labels => 'l',
            CardField::SubIssues => 's',
            CardField::ParentIssue => 'p',
        }
    }

    pub fn from_toggle_key(c: char) -> Option<Self> {
        CardField::ALL.into_iter().find(|f| f.toggle_key() == c)
    }
}

impl CardFields {
    pub fn get(&self, field: CardField) -> bool {
        match field {
            CardField::Milestone => self.milestone,
            CardField::Repository => self.repository,
            CardField::Labels => self.labels,
            CardField::SubIssues => self.sub_issues,
            CardField::ParentIssue => self.parent_issue,
        }
    }

    pub fn toggle(&mut self, field: CardField) {
        let slot = match field {
            CardField::Milestone => &mut self.milestone,
            CardField::Repository => &mut self.repository,
            CardField::Labels => &mut self.labels,
            CardField::SubIssues => &mut self.sub_issues,
            CardField::ParentIssue => &mut self.parent_issue,
        };
        *slot = !*slot;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Hex color overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-label colors
    #[serde(default)]
    pub label_colors: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_item_limit() -> usize {
    MAX_ITEM_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_item_limit, 100);
        assert!(config.card_fields.labels);
    }

    #[test]
    fn partial_card_fields_keep_other_defaults() {
        let config: Config = toml::from_str("[card_fields]\nrepository = true\n").unwrap();
        assert!(config.card_fields.repository);
        assert!(config.card_fields.milestone);
        assert!(!config.card_fields.parent_issue);
    }

    #[test]
    fn item_limit_is_clamped() {
        let config = Config {
            default_item_limit: 500,
            ..Default::default()
        };
        assert_eq!(config.item_limit(), 100);
        let config = Config {
            default_item_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.item_limit(), 1);
    }

    #[test]
    fn toggle_flips_one_flag() {
        let mut fields = CardFields::default();
        fields.toggle(CardField::Repository);
        assert!(fields.repository);
        assert!(fields.get(CardField::Milestone));
        fields.toggle(CardField::Repository);
        assert!(!fields.repository);
    }

    #[test]
    fn toggle_keys_round_trip() {
        for field in CardField::ALL {
            assert_eq!(CardField::from_toggle_key(field.toggle_key()), Some(field));
        }
        assert_eq!(CardField::from_toggle_key('x'), None);
    }
}
