use super::*;
use crate::{
    options::selector_options,
    view::{build_view, load_failure_view},
};
use chrono::{TimeZone, Utc};
use shared::{
    domain::{Catalog, Project, Selector},
    error::LoadFailure,
};

fn project(name: &str, description: &str) -> Project {
    Project {
        name: name.into(),
        description: description.into(),
        category: "Tools".into(),
        technology: "Rust".into(),
        github_url: "https://github.com/acme/tool".into(),
        is_private: true,
        status: "Active".into(),
        last_updated: None,
        priority: Some(1),
    }
}

fn render_with(renderer: &dyn ViewRenderer, catalog: &Catalog, ui: &UiState) -> String {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let view = build_view(catalog, ui, now);
    let options = selector_options(catalog);
    renderer
        .render(&Frame {
            view: &view,
            ui,
            options: &options,
        })
        .expect("render")
}

#[test]
fn script_in_name_is_escaped() {
    let catalog = Catalog::Flat(vec![project(
        "<script>alert('x')</script>",
        "a & b \"quoted\"",
    )]);
    let html = render_with(
        &HtmlRenderer::new(HtmlMode::Fragment).expect("renderer"),
        &catalog,
        &UiState::default(),
    );

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("a &amp; b &quot;quoted&quot;"));
    assert!(html.contains("badge-private"));
    assert!(html.contains("1 project"));
}

#[test]
fn empty_view_renders_placeholder_not_empty_grid() {
    let catalog = Catalog::Flat(vec![project("Tool", "")]);
    let mut ui = UiState::default();
    ui.criteria.category = Selector::from_value("Elsewhere");

    let html = render_with(
        &HtmlRenderer::new(HtmlMode::Fragment).expect("renderer"),
        &catalog,
        &ui,
    );
    assert!(html.contains("No projects found"));
    assert!(html.contains("empty-state"));
    assert!(!html.contains("project-card"));
}

#[test]
fn load_failure_renders_error_panel() {
    let renderer = HtmlRenderer::new(HtmlMode::Fragment).expect("renderer");
    let view = load_failure_view(&LoadFailure::new("projects.json", "boom"));
    let html = renderer
        .render(&Frame {
            view: &view,
            ui: &UiState::default(),
            options: &SelectorOptions::default(),
        })
        .expect("render");
    assert!(html.contains("Error loading projects"));
    assert!(html.contains("0 projects"));
}

#[test]
fn page_lists_selectors_with_current_values_selected() {
    let catalog = Catalog::Flat(vec![project("Tool", "")]);
    let mut ui = UiState::default();
    ui.criteria.technology = Selector::from_value("Rust");
    ui.criteria.query = "\"><b>".into();

    let html = render_with(
        &HtmlRenderer::new(HtmlMode::Page)
            .expect("renderer")
            .with_title("Catalog"),
        &catalog,
        &ui,
    );
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Catalog</title>"));
    assert!(html.contains("<option value=\"Rust\" selected>Rust</option>"));
    assert!(html.contains("<option value=\"priority\" selected>Sort by Priority</option>"));
    assert!(html.contains("All Categories"));
    assert!(!html.contains("\"><b>"));
}

#[test]
fn collapsed_and_expanded_groups_get_state_classes() {
    use shared::domain::{ProjectGroup, Repo};
    let repo = Repo {
        name: "engine".into(),
        description: String::new(),
        technology: "Rust".into(),
        github_url: "https://example.com/engine".into(),
        is_private: false,
    };
    let catalog = Catalog::Grouped(vec![
        ProjectGroup {
            name: "Core".into(),
            description: String::new(),
            repos: vec![repo.clone()],
        },
        ProjectGroup {
            name: "Extras".into(),
            description: String::new(),
            repos: vec![repo],
        },
    ]);
    let mut ui = UiState::default();
    ui.toggle_group("Extras");

    let html = render_with(
        &HtmlRenderer::new(HtmlMode::Fragment).expect("renderer"),
        &catalog,
        &ui,
    );
    assert!(html.contains("project-group collapsed\" data-group=\"Core\""));
    assert!(html.contains("project-group expanded\" data-group=\"Extras\""));
}

#[test]
fn rendering_twice_is_identical() {
    let catalog = Catalog::Flat(vec![project("A", "x"), project("B", "y")]);
    let renderer = HtmlRenderer::new(HtmlMode::Page).expect("renderer");
    let ui = UiState::default();
    assert_eq!(
        render_with(&renderer, &catalog, &ui),
        render_with(&renderer, &catalog, &ui)
    );
}

#[test]
fn text_listing_shows_cards() {
    let catalog = Catalog::Flat(vec![project("Tool", "does things")]);
    let text = render_with(&TextRenderer, &catalog, &UiState::default());
    assert!(text.starts_with("1 project\n"));
    assert!(text.contains("- Tool [Tools / Rust] (private) Active"));
    assert!(text.contains("    does things"));
}

#[test]
fn grouped_markup_is_escaped() {
    use shared::domain::{ProjectGroup, Repo};
    let catalog = Catalog::Grouped(vec![ProjectGroup {
        name: "<b>Core</b>".into(),
        description: "tools & more".into(),
        repos: vec![Repo {
            name: "<script>run()</script>".into(),
            description: String::new(),
            technology: "<img src=x>".into(),
            github_url: "javascript:alert(1)".into(),
            is_private: false,
        }],
    }]);
    let mut ui = UiState::default();
    ui.toggle_group("<b>Core</b>");

    let html = render_with(
        &HtmlRenderer::new(HtmlMode::Fragment).expect("renderer"),
        &catalog,
        &ui,
    );
    assert!(!html.contains("<b>"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));
    assert!(!html.contains("javascript:"));
    assert!(html.contains("data-group=\"&lt;b&gt;Core&lt;/b&gt;\""));
    assert!(html.contains("&lt;script&gt;run()&lt;/script&gt;"));
    assert!(html.contains("tools &amp; more"));
    assert!(html.contains("href=\"#\""));
}
