use crate::model::{Config, MAX_ITEM_LIMIT};
use crate::parse::normalize_iteration_filters;

use super::text_buffer::TextBuffer;

/// One row of the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    ProjectId,
    Owner,
    ItemLimit,
    ExcludeDone,
    SuppressHints,
    IterationFilters,
}

impl SettingsField {
    pub const ALL: [SettingsField; 6] = [
        SettingsField::ProjectId,
        SettingsField::Owner,
        SettingsField::ItemLimit,
        SettingsField::ExcludeDone,
        SettingsField::SuppressHints,
        SettingsField::IterationFilters,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::ProjectId => "Project ID",
            SettingsField::Owner => "Owner",
            SettingsField::ItemLimit => "Item Limit",
            SettingsField::ExcludeDone => "Exclude Done",
            SettingsField::SuppressHints => "Suppress Hints",
            SettingsField::IterationFilters => "Iteration Filters",
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(self, SettingsField::ExcludeDone | SettingsField::SuppressHints)
    }
}

/// Editable copy of the persistent settings
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub focused: usize,
    pub project_id: TextBuffer,
    pub owner: TextBuffer,
    pub item_limit: TextBuffer,
    pub exclude_done: bool,
    pub suppress_hints: bool,
    pub iteration_filters: TextBuffer,
}

impl SettingsForm {
    pub fn from_config(config: &Config) -> Self {
        SettingsForm {
            focused: 0,
            project_id: TextBuffer::new(config.default_project_id.clone()),
            owner: TextBuffer::new(config.default_owner.clone()),
            item_limit: TextBuffer::new(config.default_item_limit.to_string()),
            exclude_done: config.default_exclude_done,
            suppress_hints: config.suppress_hints,
            iteration_filters: TextBuffer::new(config.default_iteration_filters.join(", ")),
        }
    }

    pub fn focused_field(&self) -> SettingsField {
        SettingsField::ALL[self.focused.min(SettingsField::ALL.len() - 1)]
    }

    /// Move focus, wrapping at both ends
    pub fn cycle(&mut self, delta: isize) {
        let n = SettingsField::ALL.len() as isize;
        self.focused = (self.focused as isize + delta).rem_euclid(n) as usize;
    }

    /// Text input for the focused row, if it is a text row
    pub fn focused_buffer(&mut self) -> Option<&mut TextBuffer> {
        match self.focused_field() {
            SettingsField::ProjectId => Some(&mut self.project_id),
            SettingsField::Owner => Some(&mut self.owner),
            SettingsField::ItemLimit => Some(&mut self.item_limit),
            SettingsField::IterationFilters => Some(&mut self.iteration_filters),
            SettingsField::ExcludeDone | SettingsField::SuppressHints => None,
        }
    }

    pub fn toggle_focused(&mut self) {
        match self.focused_field() {
            SettingsField::ExcludeDone => self.exclude_done = !self.exclude_done,
            SettingsField::SuppressHints => self.suppress_hints = !self.suppress_hints,
            _ => {}
        }
    }

    pub fn value_text(&self, field: SettingsField) -> String {
        let flag = |b: bool| if b { "y" } else { "n" }.to_string();
        match field {
            SettingsField::ProjectId => self.project_id.text().to_string(),
            SettingsField::Owner => self.owner.text().to_string(),
            SettingsField::ItemLimit => self.item_limit.text().to_string(),
            SettingsField::ExcludeDone => flag(self.exclude_done),
            SettingsField::SuppressHints => flag(self.suppress_hints),
            SettingsField::IterationFilters => self.iteration_filters.text().to_string(),
        }
    }

    /// Config to save. Fields the form does not show are kept from `base`.
    /// An unparsable or zero item limit falls back to the maximum.
    pub fn to_config(&self, base: &Config) -> Config {
        let item_limit = self
            .item_limit
            .text()
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map_or(MAX_ITEM_LIMIT, |n| n.min(MAX_ITEM_LIMIT));
        Config {
            default_project_id: self.project_id.text().trim().to_string(),
            default_owner: self.owner.text().trim().to_string(),
            default_item_limit: item_limit,
            suppress_hints: self.suppress_hints,
            default_exclude_done: self.exclude_done,
            default_iteration_filters: normalize_iteration_filters(&[self.iteration_filters.text()]),
            ..base.clone()
        }
    }
}
