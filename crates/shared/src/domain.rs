use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnknownSortKey;

/// Dropdown value meaning "no constraint".
pub const SELECTOR_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    pub category: String,
    pub technology: String,
    pub github_url: String,
    pub is_private: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    pub name: String,
    pub description: String,
    pub technology: String,
    pub github_url: String,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGroup {
    pub name: String,
    pub description: String,
    pub repos: Vec<Repo>,
}

/// The whole dataset of a session. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog {
    Flat(Vec<Project>),
    Grouped(Vec<ProjectGroup>),
}

impl Catalog {
    /// Number of leaf entries (projects, or repos across all groups).
    pub fn entry_count(&self) -> usize {
        match self {
            Catalog::Flat(projects) => projects.len(),
            Catalog::Grouped(groups) => groups.iter().map(|g| g.repos.len()).sum(),
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, Catalog::Grouped(_))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::Flat(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Priority,
    Name,
    Date,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Priority, SortKey::Name, SortKey::Date];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::Name => "name",
            SortKey::Date => "date",
        }
    }

    /// Lenient parse used for UI values: unknown keys yield `None`, which the
    /// sort engine treats as "keep current order".
    pub fn parse(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "priority" => Ok(SortKey::Priority),
            "name" => Ok(SortKey::Name),
            "date" => Ok(SortKey::Date),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// A category or technology dropdown value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selector {
    #[default]
    All,
    Exact(String),
}

impl Selector {
    pub fn from_value(value: &str) -> Self {
        if value == SELECTOR_ALL {
            Selector::All
        } else {
            Selector::Exact(value.to_string())
        }
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Exact(value) => value == candidate,
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Selector::All => SELECTOR_ALL,
            Selector::Exact(value) => value,
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Selector::from_value(value)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
