//! Sort engine. All orderings are stable; an absent key is a no-op.

use std::cmp::Ordering;

use shared::domain::{Project, SortKey};

use crate::filter::GroupMatch;

pub fn sort_projects<'a>(mut projects: Vec<&'a Project>, key: Option<SortKey>) -> Vec<&'a Project> {
    match key {
        Some(SortKey::Priority) => {
            projects.sort_by(|a, b| cmp_missing_last(a.priority, b.priority, |x, y| x.cmp(&y)))
        }
        Some(SortKey::Name) => projects.sort_by(|a, b| compare_names(&a.name, &b.name)),
        Some(SortKey::Date) => projects.sort_by(|a, b| {
            cmp_missing_last(a.last_updated, b.last_updated, |x, y| y.cmp(&x))
        }),
        None => {}
    }
    projects
}

/// Groups carry no priority or date, so only `name` reorders them (and the
/// repos inside each group).
pub fn sort_groups<'a>(mut groups: Vec<GroupMatch<'a>>, key: Option<SortKey>) -> Vec<GroupMatch<'a>> {
    if key == Some(SortKey::Name) {
        groups.sort_by(|a, b| compare_names(&a.group.name, &b.group.name));
        for matched in &mut groups {
            matched.repos.sort_by(|a, b| compare_names(&a.name, &b.name));
        }
    }
    groups
}

/// Case-insensitive first, raw code points as tiebreak, so "alpha" and
/// "Alpha" sit together but still order deterministically.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn cmp_missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
