//! Line-driven terminal driver for the ranking navigator.
//!
//! Reads commands from stdin, feeds them to the library as [`Event`]s, posts fetches to a
//! [`WorkerPool`] backed by the JSON dataset, and prints the view model after every change.
//!
//! # Commands
//!
//! - `cat <id>`: switch category (unknown ids are passed through)
//! - `cats`: list catalog categories
//! - `sub <n>`: activate sub-filter tab `n` (1-based)
//! - `open <n>`: drill into visible row `n` (1-based)
//! - `back`: go up one level
//! - `retry`: refetch the current ranking
//! - `/text`: filter visible rows; `clear` removes the filter
//! - `quit`

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ranktrail::domain::error::Result;
use ranktrail::infrastructure::contract_home;
use ranktrail::service::JsonRankingService;
use ranktrail::ui::{DisplayRow, ListBody, RankingsViewModel};
use ranktrail::worker::WorkerPool;
use ranktrail::{handle_event, initialize, Action, Config, Event, NavigatorState};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for in-flight fetches once stdin is closed.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "ranktrail", version)]
#[command(about = "Browse ranked lists by category, drilling from global to country to city")]
struct Cli {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// JSON dataset to serve rankings from (overrides the config)
    #[arg(long, short)]
    dataset: Option<PathBuf>,

    /// Category to start in
    #[arg(long)]
    category: Option<String>,

    /// Rows per ranking
    #[arg(long)]
    limit: Option<u32>,

    /// Tracing filter, e.g. `debug`
    #[arg(long)]
    trace_level: Option<String>,

    /// Print log events to stderr
    #[arg(long, short)]
    verbose: bool,
}

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Navigate(Event),
    Filter(String),
    ListCategories,
    Help,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Some(Command::Filter(query.to_string()));
    }

    let (word, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, a)| (w, a.trim()));
    let one_based = || arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1));

    let event = match word {
        "cat" if !arg.is_empty() => Event::SelectCategory(arg.to_string()),
        "cats" => return Some(Command::ListCategories),
        "sub" => Event::SelectSubFilter(one_based()?),
        "open" => Event::RowActivated(one_based()?),
        "back" => Event::Back,
        "retry" => Event::Refresh,
        "clear" => Event::ClearFilter,
        "quit" | "q" => Event::Quit,
        "help" | "?" => return Some(Command::Help),
        _ => return None,
    };
    Some(Command::Navigate(event))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(dataset) = &cli.dataset {
        config.dataset_path = Some(dataset.to_string_lossy().into_owned());
    }
    if let Some(category) = &cli.category {
        config.initial_category.clone_from(category);
    }
    if let Some(limit) = cli.limit.filter(|l| *l > 0) {
        config.limit = limit;
    }
    if cli.trace_level.is_some() {
        config.trace_level.clone_from(&cli.trace_level);
    }
    config.log_to_stderr |= cli.verbose;

    Ok(config)
}

/// Feeds `event` to the navigator and runs the resulting actions.
///
/// Returns `false` once the session should end.
fn dispatch(state: &mut NavigatorState, pool: &WorkerPool, event: &Event) -> Result<bool> {
    let (render, actions) = handle_event(state, event)?;

    for action in actions {
        match action {
            Action::Quit => return Ok(false),
            Action::PostToWorker(message) => pool.post(message)?,
        }
    }

    if render {
        print_view(&state.compute_viewmodel(chrono::Utc::now().timestamp()));
    }
    Ok(true)
}

/// Replaces the row filter with `query` and prints the view once.
fn apply_filter(state: &mut NavigatorState, query: &str) -> Result<bool> {
    for event in std::iter::once(Event::ClearFilter).chain(query.chars().map(Event::Char)) {
        let (_, actions) = handle_event(state, &event)?;
        debug_assert!(actions.is_empty());
    }
    print_view(&state.compute_viewmodel(chrono::Utc::now().timestamp()));
    Ok(true)
}

fn highlighted(row: &DisplayRow) -> String {
    if row.highlight_ranges.is_empty() {
        return row.name.clone();
    }

    let mut out = String::with_capacity(row.name.len() + 2 * row.highlight_ranges.len());
    for (index, c) in row.name.chars().enumerate() {
        if row.highlight_ranges.iter().any(|(start, _)| *start == index) {
            out.push('[');
        }
        out.push(c);
        if row.highlight_ranges.iter().any(|(_, end)| *end == index + 1) {
            out.push(']');
        }
    }
    out
}

fn print_view(view: &RankingsViewModel) {
    println!();
    println!("== {} ==  {}", view.header.title, view.header.breadcrumb);

    if !view.sub_filters.is_empty() {
        let tabs: Vec<String> = view
            .sub_filters
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                if tab.is_active {
                    format!("[{} {}]", i + 1, tab.label)
                } else {
                    format!(" {} {} ", i + 1, tab.label)
                }
            })
            .collect();
        println!("{}", tabs.join(" "));
    }

    let mut status = Vec::new();
    if view.is_revalidating {
        status.push("refreshing…".to_string());
    }
    if let Some(updated) = &view.updated_label {
        status.push(updated.clone());
    }
    if let Some(search) = &view.search_bar {
        status.push(format!("filter: /{}", search.query));
    }
    if !status.is_empty() {
        println!("({})", status.join(", "));
    }

    match &view.body {
        ListBody::Skeleton { rows } => {
            for _ in 0..*rows {
                println!("  ░░ ░░░░░░░░░░░░░░   ░░░░░");
            }
        }
        ListBody::Rows(rows) => {
            for (i, row) in rows.iter().enumerate() {
                let marker = if view.can_drill_down {
                    format!("{:>2})", i + 1)
                } else {
                    "   ".to_string()
                };
                println!(
                    "{marker} #{:<3} {} {:<28} {:<14} {}",
                    row.rank,
                    row.flag,
                    highlighted(row),
                    row.stat_label,
                    row.trend.arrow()
                );
            }
        }
        ListBody::Empty(empty) => println!("  {}: {}", empty.message, empty.subtitle),
        ListBody::Error(error) => println!("  ! {} ({})", error.message, error.hint),
    }

    let mut hints = Vec::new();
    if view.can_drill_down {
        hints.push("open <n>");
    }
    if view.can_go_back {
        hints.push("back");
    }
    hints.extend(["sub <n>", "cat <id>", "retry", "/filter", "quit"]);
    println!("-- {}", hints.join(" · "));
}

fn print_categories(state: &NavigatorState) {
    for category in state.catalog.categories() {
        let marker = if category.id == state.category.id { '*' } else { ' ' };
        println!("{marker} {:<16} {}", category.id, category.label);
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(std::io::Result::ok) {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn run(config: &Config) -> Result<()> {
    let dataset = config.resolved_dataset_path();
    tracing::info!(dataset = ?dataset, "starting ranktrail");
    eprintln!("dataset: {}", contract_home(&dataset.to_string_lossy()));

    let pool = WorkerPool::new(Arc::new(JsonRankingService::new(dataset)));
    let mut state = initialize(config);
    let lines = spawn_stdin_reader();

    if !dispatch(&mut state, &pool, &Event::Start)? {
        return Ok(());
    }

    let mut drain_deadline: Option<Instant> = None;
    loop {
        while let Some(response) = pool.try_recv() {
            dispatch(&mut state, &pool, &Event::WorkerResponse(response))?;
        }

        if let Some(deadline) = drain_deadline {
            if !state.fetcher.is_pending() || Instant::now() >= deadline {
                return Ok(());
            }
            std::thread::sleep(POLL_INTERVAL);
            continue;
        }

        let line = match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                drain_deadline = Some(Instant::now() + DRAIN_TIMEOUT);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let keep_going = match parse_command(&line) {
            Some(Command::Navigate(event)) => dispatch(&mut state, &pool, &event)?,
            Some(Command::Filter(query)) => apply_filter(&mut state, &query)?,
            Some(Command::ListCategories) => {
                print_categories(&state);
                true
            }
            Some(Command::Help) | None => {
                println!("commands: cat <id>, cats, sub <n>, open <n>, back, retry, /text, clear, quit");
                true
            }
        };

        if !keep_going {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Some(trace_file) = ranktrail::observability::init_tracing(&config) {
        tracing::debug!(trace_file = ?trace_file, "tracing initialized");
    }

    run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranktrail::domain::Trend;

    #[test]
    fn commands_map_to_events() {
        assert_eq!(
            parse_command("cat sports"),
            Some(Command::Navigate(Event::SelectCategory("sports".into())))
        );
        assert_eq!(
            parse_command("  open 3 "),
            Some(Command::Navigate(Event::RowActivated(2)))
        );
        assert_eq!(
            parse_command("sub 1"),
            Some(Command::Navigate(Event::SelectSubFilter(0)))
        );
        assert_eq!(parse_command("/tok yo"), Some(Command::Filter("tok yo".into())));
        assert_eq!(parse_command("retry"), Some(Command::Navigate(Event::Refresh)));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert_eq!(parse_command("open 0"), None);
        assert_eq!(parse_command("open x"), None);
        assert_eq!(parse_command("cat"), None);
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn highlight_brackets_matched_runs() {
        let row = DisplayRow {
            rank: 1,
            name: "Jamaica".into(),
            flag: "🇯🇲".into(),
            stat_label: "Live Data".into(),
            trend: Trend::Same,
            highlight_ranges: vec![(0, 2), (4, 5)],
        };
        assert_eq!(highlighted(&row), "[Ja]ma[i]ca");
    }

    #[test]
    fn filter_replaces_the_previous_query() {
        let mut state = initialize(&Config::default());
        state.row_filter = "tok".into();

        assert!(apply_filter(&mut state, "osa").unwrap());
        assert_eq!(state.row_filter, "osa");
        assert!(state.fetcher.current_key().is_none());
    }
}
