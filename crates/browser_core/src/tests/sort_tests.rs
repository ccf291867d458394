use super::*;
use chrono::{TimeZone, Utc};
use shared::domain::{ProjectGroup, Repo};

fn project(name: &str, priority: Option<i64>, day: Option<u32>) -> Project {
    Project {
        name: name.into(),
        description: String::new(),
        category: String::new(),
        technology: String::new(),
        github_url: String::new(),
        is_private: false,
        status: String::new(),
        last_updated: day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()),
        priority,
    }
}

fn names<'a>(projects: &[&'a Project]) -> Vec<&'a str> {
    projects.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn priority_ascending_with_stable_ties_and_missing_last() {
    let projects = vec![
        project("c", Some(2), None),
        project("none", None, None),
        project("a", Some(1), None),
        project("d", Some(2), None),
    ];
    let sorted = sort_projects(projects.iter().collect(), Some(SortKey::Priority));
    assert_eq!(names(&sorted), vec!["a", "c", "d", "none"]);
}

#[test]
fn name_ascending_ignores_case_first() {
    let projects = vec![
        project("beta", None, None),
        project("Alpha", None, None),
        project("alpha", None, None),
        project("Gamma", None, None),
    ];
    let sorted = sort_projects(projects.iter().collect(), Some(SortKey::Name));
    assert_eq!(names(&sorted), vec!["Alpha", "alpha", "beta", "Gamma"]);
}

#[test]
fn date_descending_with_undated_last() {
    let projects = vec![
        project("old", None, Some(1)),
        project("undated", None, None),
        project("new", None, Some(20)),
        project("mid", None, Some(10)),
    ];
    let sorted = sort_projects(projects.iter().collect(), Some(SortKey::Date));
    assert_eq!(names(&sorted), vec!["new", "mid", "old", "undated"]);
}

#[test]
fn unrecognized_key_keeps_order() {
    let projects = vec![project("z", Some(9), None), project("a", Some(1), None)];
    let sorted = sort_projects(projects.iter().collect(), SortKey::parse("stars"));
    assert_eq!(names(&sorted), vec!["z", "a"]);
}

#[test]
fn name_sort_orders_groups_and_their_repos() {
    let repo = |name: &str| Repo {
        name: name.into(),
        description: String::new(),
        technology: String::new(),
        github_url: String::new(),
        is_private: false,
    };
    let groups = vec![
        ProjectGroup {
            name: "web".into(),
            description: String::new(),
            repos: vec![repo("site"), repo("api")],
        },
        ProjectGroup {
            name: "Infra".into(),
            description: String::new(),
            repos: vec![repo("terraform")],
        },
    ];
    let matches: Vec<GroupMatch<'_>> = groups
        .iter()
        .map(|group| GroupMatch {
            group,
            repos: group.repos.iter().collect(),
        })
        .collect();

    let untouched = sort_groups(matches.clone(), Some(SortKey::Priority));
    assert_eq!(untouched[0].group.name, "web");

    let sorted = sort_groups(matches, Some(SortKey::Name));
    assert_eq!(sorted[0].group.name, "Infra");
    assert_eq!(sorted[1].repos[0].name, "api");
}
