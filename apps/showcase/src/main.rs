use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use browser_core::{
    Coordinator, CoordinatorConfig, FilterCriteria, HtmlMode, HtmlRenderer, RenderedSurface,
    SystemClock, TextRenderer, UiState, ViewRenderer,
};
use clap::{Args, Parser, Subcommand};
use shared::domain::{SortKey, SELECTOR_ALL};
use source::{load_catalog, source_for_location, ProjectSource};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod browse;
mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "showcase", about = "Filter, sort, and render a static project catalog")]
struct Cli {
    /// Catalog location: a file path or an http(s) URL.
    #[arg(long, global = true)]
    source: Option<String>,
    /// Settings file (defaults to ./showcase.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long, default_value = "all")]
    category: String,
    #[arg(long, default_value = "all")]
    technology: String,
    /// priority, name, or date. Unknown keys keep source order.
    #[arg(long)]
    sort: Option<String>,
    /// Group to show expanded; repeatable.
    #[arg(long = "expand")]
    expand: Vec<String>,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: SELECTOR_ALL.into(),
            technology: SELECTOR_ALL.into(),
            sort: None,
            expand: Vec::new(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the filtered view as HTML.
    Render {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Emit only the count and results markup, not a full page.
        #[arg(long)]
        fragment: bool,
        #[arg(long, default_value = "Projects")]
        title: String,
    },
    /// Print the filtered view as text.
    List {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print the technology selector options.
    Technologies,
    /// Interactive session reading commands from stdin.
    Browse,
}

fn ui_state(view: &ViewArgs, settings: &Settings) -> UiState {
    let sort = view.sort.as_deref().unwrap_or(&settings.default_sort);
    UiState {
        criteria: FilterCriteria::new(view.query.clone(), &view.category, &view.technology),
        sort: SortKey::parse(sort),
        expanded: Default::default(),
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn render_once<R: ViewRenderer>(
    source: &dyn ProjectSource,
    renderer: R,
    view: &ViewArgs,
    settings: &Settings,
) -> (String, bool) {
    let config = CoordinatorConfig {
        debounce: settings.debounce(),
        initial: ui_state(view, settings),
    };
    let mut coordinator =
        Coordinator::start(source, RenderedSurface::new(renderer), SystemClock, config).await;
    for group in &view.expand {
        if !coordinator.on_toggle_group(group) {
            warn!(group = %group, "cannot expand unknown group");
        }
    }
    let failed = coordinator.load_failure().is_some();
    (coordinator.into_surface().into_output(), failed)
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        settings.source = source;
    }
    init_tracing(&settings);

    let source = source_for_location(&settings.source, settings.http_timeout())
        .with_context(|| format!("cannot use catalog source '{}'", settings.source))?;
    info!(source = %source.location(), "starting");

    match cli.command {
        Command::Render {
            view,
            output,
            fragment,
            title,
        } => {
            let mode = if fragment {
                HtmlMode::Fragment
            } else {
                HtmlMode::Page
            };
            let renderer = HtmlRenderer::new(mode)?.with_title(title);
            let (html, failed) = render_once(source.as_ref(), renderer, &view, &settings).await;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, html)
                        .await
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    info!(path = %path.display(), "wrote html");
                }
                None => print!("{html}"),
            }
            Ok(exit_code(failed))
        }
        Command::List { view } => {
            let (text, failed) = render_once(source.as_ref(), TextRenderer, &view, &settings).await;
            print!("{text}");
            Ok(exit_code(failed))
        }
        Command::Technologies => match load_catalog(source.as_ref()).await {
            Ok(loaded) => {
                for technology in browser_core::selector_options(&loaded.catalog).technologies {
                    println!("{technology}");
                }
                Ok(ExitCode::SUCCESS)
            }
            // load_catalog has already logged the failure.
            Err(_) => Ok(ExitCode::FAILURE),
        },
        Command::Browse => {
            let config = CoordinatorConfig {
                debounce: settings.debounce(),
                initial: ui_state(&ViewArgs::default(), &settings),
            };
            let coordinator = Coordinator::start(
                source.as_ref(),
                browse::TerminalSurface::new(std::io::stdout()),
                SystemClock,
                config,
            )
            .await;
            let failed = coordinator.load_failure().is_some();
            browse::run(coordinator).await?;
            Ok(exit_code(failed))
        }
    }
}
