use std::collections::BTreeSet;

use serde::Serialize;
use shared::domain::{Catalog, SortKey};

/// Values offered by the category, technology, and sort dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    pub categories: Vec<String>,
    pub technologies: Vec<String>,
    pub sort_keys: Vec<SortKey>,
}

pub fn selector_options(catalog: &Catalog) -> SelectorOptions {
    let (categories, technologies): (BTreeSet<&str>, BTreeSet<&str>) = match catalog {
        Catalog::Flat(projects) => (
            projects.iter().map(|p| p.category.as_str()).collect(),
            projects.iter().map(|p| p.technology.as_str()).collect(),
        ),
        Catalog::Grouped(groups) => (
            groups.iter().map(|g| g.name.as_str()).collect(),
            groups
                .iter()
                .flat_map(|g| g.repos.iter().map(|r| r.technology.as_str()))
                .collect(),
        ),
    };

    SelectorOptions {
        categories: non_blank(categories),
        technologies: non_blank(technologies),
        sort_keys: SortKey::ALL.to_vec(),
    }
}

fn non_blank(values: BTreeSet<&str>) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect()
}
