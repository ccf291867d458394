//! Filter engine: pure subsetting of the catalog by free text and selectors.

use shared::domain::{Project, ProjectGroup, Repo, Selector};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub category: Selector,
    pub technology: Selector,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, category: &str, technology: &str) -> Self {
        Self {
            query: query.into(),
            category: Selector::from_value(category),
            technology: Selector::from_value(technology),
        }
    }
}

/// A group that survived filtering, with the repos that survived with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMatch<'a> {
    pub group: &'a ProjectGroup,
    pub repos: Vec<&'a Repo>,
}

/// Lowercased, trimmed query. Empty matches everything.
struct Needle(String);

impl Needle {
    fn new(query: &str) -> Self {
        Self(query.trim().to_lowercase())
    }

    fn matches_any(&self, haystacks: &[&str]) -> bool {
        self.0.is_empty()
            || haystacks
                .iter()
                .any(|hay| hay.to_lowercase().contains(&self.0))
    }
}

pub fn filter_projects<'a>(projects: &'a [Project], criteria: &FilterCriteria) -> Vec<&'a Project> {
    let needle = Needle::new(&criteria.query);
    projects
        .iter()
        .filter(|project| {
            needle.matches_any(&[
                project.name.as_str(),
                project.description.as_str(),
                project.technology.as_str(),
            ])
                && criteria.category.accepts(&project.category)
                && criteria.technology.accepts(&project.technology)
        })
        .collect()
}

/// Grouped variant. Group names stand in for categories. A group whose own
/// name or description matches the query keeps every repo passing the
/// technology selector; otherwise only repos matching the query survive.
pub fn filter_groups<'a>(
    groups: &'a [ProjectGroup],
    criteria: &FilterCriteria,
) -> Vec<GroupMatch<'a>> {
    let needle = Needle::new(&criteria.query);
    groups
        .iter()
        .filter(|group| criteria.category.accepts(&group.name))
        .filter_map(|group| {
            let group_hit = needle.matches_any(&[group.name.as_str(), group.description.as_str()]);
            let repos: Vec<&Repo> = group
                .repos
                .iter()
                .filter(|repo| criteria.technology.accepts(&repo.technology))
                .filter(|repo| {
                    group_hit
                        || needle.matches_any(&[
                            repo.name.as_str(),
                            repo.description.as_str(),
                            repo.technology.as_str(),
                        ])
                })
                .collect();
            (!repos.is_empty()).then_some(GroupMatch { group, repos })
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
