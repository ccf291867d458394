//! Declarative view description: a pure function of (catalog, UI state,
//! now). Renderers interpret it; nothing here touches markup.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    domain::{Catalog, Project, Repo, SortKey},
    error::LoadFailure,
};
use url::Url;

use crate::{
    dates::relative_date,
    filter::{filter_groups, filter_projects, FilterCriteria, GroupMatch},
    sort::{sort_groups, sort_projects},
};

pub const EMPTY_TITLE: &str = "No projects found";
pub const EMPTY_TEXT: &str = "Try adjusting your filters or search query";
pub const LOAD_ERROR_TITLE: &str = "Error loading projects";
pub const LOAD_ERROR_TEXT: &str = "Please check your connection and try again";

/// Everything the user controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub criteria: FilterCriteria,
    /// `None` keeps source order.
    pub sort: Option<SortKey>,
    /// Names of expanded groups. Groups start collapsed.
    pub expanded: BTreeSet<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort: Some(SortKey::Priority),
            expanded: BTreeSet::new(),
        }
    }
}

impl UiState {
    pub fn toggle_group(&mut self, name: &str) -> bool {
        if !self.expanded.remove(name) {
            self.expanded.insert(name.to_string());
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub count: usize,
    pub count_label: String,
    pub body: ViewBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewBody {
    Cards { cards: Vec<CardView> },
    Groups { groups: Vec<GroupView> },
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub name: String,
    pub description: String,
    pub category: String,
    pub technology: String,
    pub tech_class: String,
    pub url: String,
    pub is_private: bool,
    pub status: String,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub name: String,
    pub description: String,
    pub expanded: bool,
    pub count_label: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub name: String,
    pub description: String,
    pub technology: String,
    pub tech_class: String,
    pub url: String,
    pub is_private: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Empty,
    LoadError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub placeholder: PlaceholderKind,
    pub icon: String,
    pub title: String,
    pub text: String,
}

impl Placeholder {
    pub fn empty() -> Self {
        Self {
            placeholder: PlaceholderKind::Empty,
            icon: "\u{1F50D}".to_string(),
            title: EMPTY_TITLE.to_string(),
            text: EMPTY_TEXT.to_string(),
        }
    }

    pub fn load_error() -> Self {
        Self {
            placeholder: PlaceholderKind::LoadError,
            icon: "\u{26A0}\u{FE0F}".to_string(),
            title: LOAD_ERROR_TITLE.to_string(),
            text: LOAD_ERROR_TEXT.to_string(),
        }
    }
}

pub fn count_label(count: usize) -> String {
    format!("{count} project{}", if count == 1 { "" } else { "s" })
}

/// CSS hook for a technology dot: `tech-` plus the lowercased name with
/// slashes turned into dashes.
pub fn tech_class(technology: &str) -> String {
    format!("tech-{}", technology.to_lowercase().replace('/', "-"))
}

/// Only http(s) links are emitted; anything else is neutralised to `#`.
pub fn safe_link(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => raw.trim().to_string(),
        _ => "#".to_string(),
    }
}

/// Filter, then sort, then describe.
pub fn build_view(catalog: &Catalog, ui: &UiState, now: DateTime<Utc>) -> View {
    match catalog {
        Catalog::Flat(projects) => {
            let selected = sort_projects(filter_projects(projects, &ui.criteria), ui.sort);
            let cards: Vec<CardView> = selected.iter().map(|p| card_view(p, now)).collect();
            finish(cards.len(), ViewBody::Cards { cards })
        }
        Catalog::Grouped(groups) => {
            let selected = sort_groups(filter_groups(groups, &ui.criteria), ui.sort);
            let count = selected.iter().map(|m| m.repos.len()).sum();
            let groups = selected
                .iter()
                .map(|m| group_view(m, ui.expanded.contains(&m.group.name)))
                .collect();
            finish(count, ViewBody::Groups { groups })
        }
    }
}

pub fn load_failure_view(failure: &LoadFailure) -> View {
    tracing::debug!(location = %failure.location, "presenting load failure placeholder");
    View {
        count: 0,
        count_label: count_label(0),
        body: ViewBody::Placeholder(Placeholder::load_error()),
    }
}

fn finish(count: usize, body: ViewBody) -> View {
    let body = if count == 0 {
        ViewBody::Placeholder(Placeholder::empty())
    } else {
        body
    };
    View {
        count,
        count_label: count_label(count),
        body,
    }
}

fn card_view(project: &Project, now: DateTime<Utc>) -> CardView {
    CardView {
        name: project.name.clone(),
        description: project.description.clone(),
        category: project.category.clone(),
        technology: project.technology.clone(),
        tech_class: tech_class(&project.technology),
        url: safe_link(&project.github_url),
        is_private: project.is_private,
        status: project.status.clone(),
        updated: project.last_updated.map(|at| relative_date(at, now)),
    }
}

fn group_view(matched: &GroupMatch<'_>, expanded: bool) -> GroupView {
    GroupView {
        name: matched.group.name.clone(),
        description: matched.group.description.clone(),
        expanded,
        count_label: count_label(matched.repos.len()),
        items: matched.repos.iter().map(|r| item_view(r)).collect(),
    }
}

fn item_view(repo: &Repo) -> ItemView {
    ItemView {
        name: repo.name.clone(),
        description: repo.description.clone(),
        technology: repo.technology.clone(),
        tech_class: tech_class(&repo.technology),
        url: safe_link(&repo.github_url),
        is_private: repo.is_private,
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
