use serde::{Deserialize, Serialize};

/// One selectable option of a single-select project field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: String,
    pub name: String,
}

/// A project field definition (Status, Priority, custom fields, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl Field {
    /// Index of the option whose name matches `value` case-insensitively
    pub fn option_index(&self, value: &str) -> Option<usize> {
        let value = value.trim();
        self.options
            .iter()
            .position(|o| o.name.eq_ignore_ascii_case(value))
    }
}

/// A remote project board and its field schema
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    /// Identifier the user supplied (usually the project number)
    pub id: String,
    /// Remote node id used for mutations
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Project {
    /// Field whose name is exactly `name`
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field whose name matches `name` case-insensitively
    pub fn field_ignore_case(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Canonical status ordering, if the project defines a Status field
    pub fn status_options(&self) -> Vec<&str> {
        self.field("Status")
            .map(|f| f.options.iter().map(|o| o.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// The id to pass to mutations: the node id when known
    pub fn mutation_id(&self) -> &str {
        if self.node_id.is_empty() {
            &self.id
        } else {
            &self.node_id
        }
    }
}
