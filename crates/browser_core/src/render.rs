//! Rendering collaborators that interpret a [`View`].
//!
//! `HtmlRenderer` goes through handlebars, whose `{{...}}` expressions
//! HTML-escape every value. Only the already-rendered results block is
//! inserted raw (`{{{results}}}`).

use std::fmt::{self, Write as _};

use handlebars::Handlebars;
use serde::Serialize;
use shared::domain::SELECTOR_ALL;
use thiserror::Error;

use crate::{
    options::SelectorOptions,
    view::{UiState, View, ViewBody},
};

const CARD_TEMPLATE: &str = "card";
const GROUP_TEMPLATE: &str = "group";
const PLACEHOLDER_TEMPLATE: &str = "placeholder";
const PAGE_TEMPLATE: &str = "page";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("failed to format listing")]
    Format(#[from] std::fmt::Error),
}

/// One presentation of the current view together with the controls that
/// produced it.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub view: &'a View,
    pub ui: &'a UiState,
    pub options: &'a SelectorOptions,
}

pub trait ViewRenderer {
    fn render(&self, frame: &Frame<'_>) -> Result<String, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlMode {
    /// Count readout plus results container only.
    #[default]
    Fragment,
    /// Standalone document with the search and selector controls.
    Page,
}

pub struct HtmlRenderer {
    handlebars: Handlebars<'static>,
    mode: HtmlMode,
    title: String,
}

impl HtmlRenderer {
    pub fn new(mode: HtmlMode) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        for (name, source) in [
            (CARD_TEMPLATE, include_str!("../templates/card.hbs")),
            (GROUP_TEMPLATE, include_str!("../templates/group.hbs")),
            (PLACEHOLDER_TEMPLATE, include_str!("../templates/placeholder.hbs")),
            (PAGE_TEMPLATE, include_str!("../templates/page.hbs")),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }
        Ok(Self {
            handlebars,
            mode,
            title: "Projects".to_string(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Markup for the results container contents.
    pub fn render_results(&self, view: &View) -> Result<String, RenderError> {
        let mut out = String::new();
        match &view.body {
            ViewBody::Cards { cards } => {
                for card in cards {
                    out.push_str(&self.handlebars.render(CARD_TEMPLATE, card)?);
                }
            }
            ViewBody::Groups { groups } => {
                for group in groups {
                    out.push_str(&self.handlebars.render(GROUP_TEMPLATE, group)?);
                }
            }
            ViewBody::Placeholder(placeholder) => {
                out.push_str(&self.handlebars.render(PLACEHOLDER_TEMPLATE, placeholder)?);
            }
        }
        Ok(out)
    }
}

#[derive(Serialize)]
struct OptionEntry {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Serialize)]
struct PageContext<'a> {
    title: &'a str,
    query: &'a str,
    count_label: &'a str,
    categories: Vec<OptionEntry>,
    technologies: Vec<OptionEntry>,
    sort_keys: Vec<OptionEntry>,
    results: String,
}

fn selector_entries(all_label: &str, values: &[String], current: &str) -> Vec<OptionEntry> {
    std::iter::once(OptionEntry {
        value: SELECTOR_ALL.to_string(),
        label: all_label.to_string(),
        selected: current == SELECTOR_ALL,
    })
    .chain(values.iter().map(|value| OptionEntry {
        value: value.clone(),
        label: value.clone(),
        selected: current == value,
    }))
    .collect()
}

impl ViewRenderer for HtmlRenderer {
    fn render(&self, frame: &Frame<'_>) -> Result<String, RenderError> {
        let results = self.render_results(frame.view)?;
        match self.mode {
            HtmlMode::Fragment => {
                let count = handlebars::html_escape(&frame.view.count_label);
                Ok(format!(
                    "<p class=\"project-count\">{count}</p>\n<div class=\"projects-grid\">\n{results}</div>\n"
                ))
            }
            HtmlMode::Page => {
                let ui = frame.ui;
                let current_sort = ui.sort.map(|k| k.as_str()).unwrap_or_default();
                let context = PageContext {
                    title: &self.title,
                    query: &ui.criteria.query,
                    count_label: &frame.view.count_label,
                    categories: selector_entries(
                        "All Categories",
                        &frame.options.categories,
                        ui.criteria.category.as_value(),
                    ),
                    technologies: selector_entries(
                        "All Technologies",
                        &frame.options.technologies,
                        ui.criteria.technology.as_value(),
                    ),
                    sort_keys: frame
                        .options
                        .sort_keys
                        .iter()
                        .map(|key| OptionEntry {
                            value: key.as_str().to_string(),
                            label: sort_label(key.as_str()),
                            selected: key.as_str() == current_sort,
                        })
                        .collect(),
                    results,
                };
                Ok(self.handlebars.render(PAGE_TEMPLATE, &context)?)
            }
        }
    }
}

fn sort_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("Sort by {}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Plain-text listing for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ViewRenderer for TextRenderer {
    fn render(&self, frame: &Frame<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        write_listing(&mut out, frame.view)?;
        Ok(out)
    }
}

fn write_listing(out: &mut String, view: &View) -> fmt::Result {
    writeln!(out, "{}", view.count_label)?;
    match &view.body {
        ViewBody::Cards { cards } => {
            for card in cards {
                let privacy = if card.is_private { "private" } else { "public" };
                writeln!(
                    out,
                    "- {} [{} / {}] ({privacy}) {}",
                    card.name, card.category, card.technology, card.status
                )?;
                if !card.description.is_empty() {
                    writeln!(out, "    {}", card.description)?;
                }
                if let Some(updated) = &card.updated {
                    writeln!(out, "    updated {updated}")?;
                }
                writeln!(out, "    {}", card.url)?;
            }
        }
        ViewBody::Groups { groups } => {
            for group in groups {
                let marker = if group.expanded { "v" } else { ">" };
                writeln!(out, "{marker} {} ({})", group.name, group.count_label)?;
                if group.expanded {
                    for item in &group.items {
                        let privacy = if item.is_private { "private" } else { "public" };
                        writeln!(
                            out,
                            "    - {} [{}] ({privacy}) {}",
                            item.name, item.technology, item.url
                        )?;
                    }
                }
            }
        }
        ViewBody::Placeholder(placeholder) => {
            writeln!(out, "{}", placeholder.title)?;
            writeln!(out, "{}", placeholder.text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
