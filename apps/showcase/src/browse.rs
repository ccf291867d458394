//! Interactive terminal session: stdin lines become UI events and a single
//! sleep tracks the coordinator's pending search deadline.

use std::io::Write;

use anyhow::Result;
use browser_core::{
    Clock, Coordinator, Frame, RenderSurface, SelectorOptions, TextRenderer, ViewRenderer,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

pub const HELP: &str = "commands: search <text> | category <value|all> | tech <value|all> | \
sort <priority|name|date> | toggle <group> | flush | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Category(String),
    Technology(String),
    Sort(String),
    Toggle(String),
    Flush,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = match line.trim_start().split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (line.trim(), ""),
    };

    let require = |what: &str| -> Result<String, String> {
        let value = rest.trim();
        if value.is_empty() {
            Err(format!("'{verb}' needs a {what}"))
        } else {
            Ok(value.to_string())
        }
    };

    match verb {
        // Search text is taken verbatim so an empty search clears the query.
        "search" | "s" => Ok(BrowseCommand::Search(rest.to_string())),
        "category" | "c" => require("category").map(BrowseCommand::Category),
        "tech" | "t" => require("technology").map(BrowseCommand::Technology),
        "sort" => require("sort key").map(BrowseCommand::Sort),
        "toggle" => require("group name").map(BrowseCommand::Toggle),
        "flush" => Ok(BrowseCommand::Flush),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}'")),
    }
}

/// Prints every presented frame as a text listing.
pub struct TerminalSurface<W> {
    out: W,
    renderer: TextRenderer,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            renderer: TextRenderer,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn populate_options(&mut self, options: &SelectorOptions) {
        let result = writeln!(
            self.out,
            "categories: {}\ntechnologies: {}",
            options.categories.join(", "),
            options.technologies.join(", ")
        );
        if let Err(err) = result {
            error!(error = %err, "failed to write options");
        }
    }

    fn present(&mut self, frame: &Frame<'_>) {
        let result = self
            .renderer
            .render(frame)
            .map_err(anyhow::Error::from)
            .and_then(|text| {
                writeln!(self.out, "\n{text}")?;
                self.out.flush()?;
                Ok(())
            });
        if let Err(err) = result {
            error!(error = %err, "failed to present view");
        }
    }
}

/// Applies one command. Returns `false` when the session should end.
pub fn apply_command<S: RenderSurface, C: Clock>(
    coordinator: &mut Coordinator<S, C>,
    command: BrowseCommand,
) -> bool {
    match command {
        BrowseCommand::Search(text) => coordinator.on_search_input(&text),
        BrowseCommand::Category(value) => coordinator.on_category_change(&value),
        BrowseCommand::Technology(value) => coordinator.on_technology_change(&value),
        BrowseCommand::Sort(value) => coordinator.on_sort_change(&value),
        BrowseCommand::Toggle(name) => {
            if !coordinator.on_toggle_group(&name) {
                warn!(group = %name, "no such group");
            }
        }
        BrowseCommand::Flush => {
            coordinator.flush();
        }
        BrowseCommand::Help => eprintln!("{HELP}"),
        BrowseCommand::Quit => return false,
    }
    true
}

pub async fn run<S: RenderSurface, C: Clock>(mut coordinator: Coordinator<S, C>) -> Result<()> {
    if coordinator.load_failure().is_some() {
        // A failed load is terminal for the session.
        return Ok(());
    }

    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = coordinator.next_deadline();
        let timer = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    coordinator.flush();
                    break;
                };
                match parse_command(&line) {
                    Ok(command) => {
                        if !apply_command(&mut coordinator, command) {
                            break;
                        }
                    }
                    Err(message) => eprintln!("{message}"),
                }
            }
            () = timer => {
                coordinator.poll();
            }
        }
    }

    info!(renders = coordinator.render_count(), "browse session ended");
    Ok(())
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
