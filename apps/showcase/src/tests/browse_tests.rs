use super::*;
use browser_core::{CoordinatorConfig, ManualClock};
use chrono::{TimeZone, Utc};
use shared::domain::{Catalog, Project};
use std::time::Duration;

fn project(name: &str, technology: &str, priority: i64) -> Project {
    Project {
        name: name.into(),
        description: String::new(),
        category: "Tools".into(),
        technology: technology.into(),
        github_url: String::new(),
        is_private: false,
        status: "Active".into(),
        last_updated: None,
        priority: Some(priority),
    }
}

#[test]
fn parses_commands_and_aliases() {
    assert_eq!(
        parse_command("search hello world"),
        Ok(BrowseCommand::Search("hello world".into()))
    );
    assert_eq!(parse_command("search"), Ok(BrowseCommand::Search(String::new())));
    assert_eq!(
        parse_command("t Rust\r\n"),
        Ok(BrowseCommand::Technology("Rust".into()))
    );
    assert_eq!(
        parse_command("category all"),
        Ok(BrowseCommand::Category("all".into()))
    );
    assert_eq!(parse_command("sort date"), Ok(BrowseCommand::Sort("date".into())));
    assert_eq!(
        parse_command("toggle Core Services"),
        Ok(BrowseCommand::Toggle("Core Services".into()))
    );
    assert_eq!(parse_command("q"), Ok(BrowseCommand::Quit));
    assert_eq!(parse_command("flush"), Ok(BrowseCommand::Flush));
}

#[test]
fn rejects_bad_commands() {
    assert!(parse_command("").is_err());
    assert!(parse_command("sort").is_err());
    assert_eq!(
        parse_command("dance now"),
        Err("unknown command 'dance'".to_string())
    );
}

#[test]
fn commands_drive_the_coordinator() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    let catalog = Catalog::Flat(vec![project("Alpha", "Go", 2), project("Beta", "Rust", 1)]);
    let mut coordinator = Coordinator::with_catalog(
        catalog,
        TerminalSurface::new(Vec::new()),
        clock.clone(),
        CoordinatorConfig::default(),
    );

    assert!(apply_command(
        &mut coordinator,
        BrowseCommand::Search("alp".into())
    ));
    assert_eq!(coordinator.render_count(), 1);
    clock.advance(Duration::from_millis(300));
    assert!(coordinator.poll());

    assert!(apply_command(
        &mut coordinator,
        BrowseCommand::Technology("Rust".into())
    ));
    assert!(!apply_command(&mut coordinator, BrowseCommand::Quit));

    let output = String::from_utf8(coordinator.into_surface().into_inner()).expect("utf8");
    assert!(output.starts_with("categories: Tools\ntechnologies: Go, Rust\n"));
    assert!(output.contains("2 projects\n- Beta"));
    assert!(output.contains("1 project\n- Alpha"));
    assert!(output.contains("No projects found"));
}
