//! Shared rendering for query-backed commands
//!
//! Commands mount an observer, wait for it with a spinner, then hand the
//! result to one of the `show_*` helpers. Errors offer a manual retry when
//! a terminal is attached.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use chrono::Local;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::cli::CommandContext;
use crate::error::{Error, Result};
use crate::models::display::DetailRow;
use crate::models::{Placeholder, ViewState};
use crate::output::{Formattable, OutputFormat, format_placeholder, json, table};
use crate::query::{QueryClient, QueryObserver, QueryResult, Visibility};

fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Wait for the observer to settle. On an error with nothing to show,
/// offer to retry while a terminal is attached.
pub async fn load<T: DeserializeOwned>(observer: &mut QueryObserver<T>, what: &str) -> QueryResult<T> {
    let progress = spinner(format!("Loading {}...", what));
    let mut result = observer.settled().await;
    progress.finish_and_clear();

    while result.data.is_none() && is_interactive() {
        let Some(ref error) = result.error else {
            break;
        };
        eprintln!("{} {}", "Error:".red().bold(), error.to_string().red());
        let retry = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Retry?")
            .default(true)
            .interact()
            .unwrap_or(false);
        if !retry {
            break;
        }

        let progress = spinner(format!("Loading {}...", what));
        result = observer.refetch().await;
        progress.finish_and_clear();
    }
    result
}

fn unresolved(state: &str) -> Error {
    Error::Other(format!("no data available ({})", state))
}

/// Print a list query as a table or JSON, or its placeholder when empty.
pub fn show_list<T, D>(
    format: OutputFormat,
    result: QueryResult<Vec<T>>,
    placeholder: impl FnOnce() -> Placeholder,
) -> Result<()>
where
    D: for<'a> From<&'a T> + Tabled + Serialize,
{
    match ViewState::list(result, placeholder) {
        ViewState::Ready(items) => {
            let rows: Vec<D> = items.iter().map(D::from).collect();
            rows.print(format)
        }
        ViewState::Empty(placeholder) => {
            let output = format_placeholder(&placeholder, &Vec::<D>::new(), format)?;
            println!("{}", output);
            Ok(())
        }
        ViewState::Error(error) => Err(Error::Query(error)),
        ViewState::Loading => Err(unresolved("still loading")),
    }
}

/// Print a single record as field/value rows or JSON.
pub fn show_record<T: Serialize>(
    format: OutputFormat,
    result: QueryResult<T>,
    placeholder: impl FnOnce() -> Placeholder,
    rows: impl FnOnce(&T) -> Vec<DetailRow>,
) -> Result<()> {
    match ViewState::record(result, placeholder) {
        ViewState::Ready(record) => {
            let output = match format {
                OutputFormat::Table => table::format_details(&rows(&record)),
                OutputFormat::Json => json::format_json(&record)?,
            };
            println!("{}", output);
            Ok(())
        }
        ViewState::Empty(placeholder) => {
            let output = format_placeholder(&placeholder, &Option::<T>::None, format)?;
            println!("{}", output);
            Ok(())
        }
        ViewState::Error(error) => Err(Error::Query(error)),
        ViewState::Loading => Err(unresolved("query is disabled")),
    }
}

/// Re-render on every settled update until Ctrl-C.
///
/// With a terminal attached, each Enter toggles the visibility of the
/// cache, which pauses or resumes polling.
pub async fn watch<T, F>(
    ctx: &CommandContext,
    observer: &mut QueryObserver<T>,
    what: &str,
    mut render: F,
) -> Result<()>
where
    T: DeserializeOwned,
    F: FnMut(QueryResult<T>) -> Result<()>,
{
    let toggle = spawn_pause_toggle(ctx.client.clone());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut outcome = redraw(&mut render, load(observer, what).await);
    while outcome.is_ok() {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = observer.changed() => {
                if !changed {
                    break;
                }
                let result = observer.result();
                if !result.is_fetching {
                    outcome = redraw(&mut render, result);
                }
            }
        }
    }

    if let Some(toggle) = toggle {
        toggle.abort();
    }
    outcome
}

fn redraw<T, F>(render: &mut F, result: QueryResult<T>) -> Result<()>
where
    F: FnMut(QueryResult<T>) -> Result<()>,
{
    if std::io::stdout().is_terminal() {
        print!("\x1B[2J\x1B[H");
    }
    let paused = if result.is_enabled { "" } else { " (disabled)" };
    eprintln!(
        "{}",
        format!(
            "Updated {}{} - Ctrl-C to exit, Enter to pause",
            Local::now().format("%H:%M:%S"),
            paused
        )
        .dimmed()
    );
    render(result)
}

fn spawn_pause_toggle(client: QueryClient) -> Option<JoinHandle<()>> {
    if !std::io::stdin().is_terminal() {
        return None;
    }
    Some(tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            let next = match client.visibility() {
                Visibility::Visible => Visibility::Hidden,
                Visibility::Hidden => Visibility::Visible,
            };
            debug!("Watch visibility now {}", next);
            client.handle_visibility_change(next);
            match next {
                Visibility::Hidden => eprintln!("{}", "Paused polling".yellow()),
                Visibility::Visible => eprintln!("{}", "Resumed polling".green()),
            }
        }
    }))
}

/// Ask before a destructive change. `--yes` skips the prompt; without a
/// terminal it is required.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !is_interactive() {
        return Err(Error::Other(
            "refusing to continue without confirmation; pass --yes".to_string(),
        ));
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Run a mutation behind a spinner and report the outcome.
///
/// Table output prints `done`; JSON output prints the returned record.
pub async fn run_mutation<R, Fut>(
    format: OutputFormat,
    progress: &str,
    done: String,
    mutation: Fut,
) -> Result<()>
where
    R: Serialize,
    Fut: Future<Output = Result<R>>,
{
    let spinner = spinner(format!("{}...", progress));
    let result = mutation.await;
    spinner.finish_and_clear();

    let record = result?;
    match format {
        OutputFormat::Table => println!("{} {}", "\u{2713}".green(), done),
        OutputFormat::Json => println!("{}", json::format_json(&record)?),
    }
    Ok(())
}
