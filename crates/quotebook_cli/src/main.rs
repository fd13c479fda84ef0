//! quotebook command-line host.
//!
//! # Responsibility
//! - Resolve runtime configuration from flags and environment.
//! - Adapt terminal input to `QuoteBook` operations and render results.
//! - Run the interactive session with a background pull task.

use clap::{Parser, Subcommand};
use log::warn;
use quotebook_core::config::storage::{ALL_CATEGORIES, EXPORT_FILE_NAME};
use quotebook_core::config::{app, sync};
use quotebook_core::db::{open_db, DbError};
use quotebook_core::{
    default_log_level, init_logging, HttpQuoteRemote, MemoryKeyValueStorage, PeriodicTask,
    PullOutcome, Quote, QuoteBook, QuoteBookError, QuotebookConfig, Reconciler, RetryPolicy,
    SqliteKeyValueStorage, SyncError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const NO_QUOTES_MESSAGE: &str = "No quotes available.";

#[derive(Parser, Debug)]
#[command(name = "quotebook", about = "Random quote keeper with remote sync", version)]
struct Cli {
    /// Directory holding the quote database and logs.
    #[arg(long, env = "QUOTEBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Remote endpoint used for pull and push.
    #[arg(long, env = "QUOTEBOOK_ENDPOINT", default_value = sync::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "QUOTEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Attempts per remote call; transient failures are retried with backoff.
    #[arg(long, default_value_t = 1)]
    attempts: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a random quote from the selected category.
    Show,
    /// Add a quote and push the collection.
    Add { text: String, category: String },
    /// List distinct categories.
    Categories,
    /// Show or change the selected category (`all` disables filtering).
    Filter { category: Option<String> },
    /// List quotes in the selected category.
    List,
    /// Export every quote as pretty JSON.
    Export { path: Option<PathBuf> },
    /// Append quotes from a JSON file and push the collection.
    Import { path: PathBuf },
    /// Replace local quotes with the remote collection.
    Pull,
    /// Send local quotes to the remote.
    Push,
    /// Interactive session with a periodic background pull.
    Session,
}

#[derive(Debug)]
enum CliError {
    NoDataDir,
    Logging(String),
    Db(DbError),
    Book(QuoteBookError),
    Sync(SyncError),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a data directory; pass --data-dir or set QUOTEBOOK_DATA_DIR"
            ),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Book(err) => write!(f, "{err}"),
            Self::Sync(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Book(err) => Some(err),
            Self::Sync(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::NoDataDir | Self::Logging(_) => None,
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<QuoteBookError> for CliError {
    fn from(value: QuoteBookError) -> Self {
        Self::Book(value)
    }
}

impl From<SyncError> for CliError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type CliResult<T> = Result<T, CliError>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|dir| dir.join(app::NAME))
            .ok_or(CliError::NoDataDir)?,
    };
    let config = QuotebookConfig::new(data_dir).with_endpoint(cli.endpoint);
    std::fs::create_dir_all(&config.data_dir)?;

    let level = cli
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, &config.log_dir()).map_err(CliError::Logging)?;

    let mut book = open_book(&config)?;
    let retry = RetryPolicy::exponential(cli.attempts, Duration::from_millis(500));
    let remote = Arc::new(HttpQuoteRemote::new(config.endpoint.as_str())?);
    let reconciler = Reconciler::new(remote.clone()).with_retry(retry);

    match cli.command {
        Command::Show => print_random(&book)?,
        Command::Add { text, category } => {
            book.add_quote(text, category)?;
            println!("New quote added successfully!");
            push_and_report(&reconciler, &book);
        }
        Command::Categories => {
            for category in category_choices(&book) {
                println!("{category}");
            }
        }
        Command::Filter { category } => match category {
            Some(category) => {
                book.set_selected_category(category)?;
                println!("Selected category: {}", book.selected_category());
            }
            None => println!("{}", book.selected_category()),
        },
        Command::List => {
            for quote in book.active_view() {
                println!("{quote}");
            }
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            book.export_file(&path)?;
            println!("Exported {} quotes to {}", book.quotes().len(), path.display());
        }
        Command::Import { path } => {
            let added = book.import_file(&path)?;
            println!("Quotes imported successfully! ({added} added)");
            push_and_report(&reconciler, &book);
        }
        Command::Pull => {
            let outcome = reconciler.pull(&mut book)?;
            println!("{} [{}]", describe_pull(outcome), remote.endpoint());
        }
        Command::Push => {
            reconciler.push(book.quotes())?;
            println!("Pushed {} quotes to {}.", book.quotes().len(), remote.endpoint());
        }
        Command::Session => run_session(book, reconciler, config.pull_interval)?,
    }

    Ok(())
}

fn open_book(config: &QuotebookConfig) -> CliResult<QuoteBook> {
    let durable = SqliteKeyValueStorage::new(open_db(config.db_path())?);
    let book = QuoteBook::open(Box::new(durable), Box::new(MemoryKeyValueStorage::new()))?;
    Ok(book)
}

fn print_random(book: &QuoteBook) -> CliResult<()> {
    match book.show_random(&mut rand::rng())? {
        Some(quote) => println!("{quote}"),
        None => println!("{NO_QUOTES_MESSAGE}"),
    }
    Ok(())
}

/// Push failures are reported but never undo the local change.
fn push_and_report(reconciler: &Reconciler, book: &QuoteBook) {
    if let Err(err) = reconciler.push(book.quotes()) {
        eprintln!("warning: quotes saved locally but not synced: {err}");
    }
}

/// Filter choices in display order: `all` first, then categories as first seen.
fn category_choices(book: &QuoteBook) -> Vec<String> {
    let mut choices = vec![ALL_CATEGORIES.to_string()];
    choices.extend(book.categories());
    choices
}

fn describe_pull(outcome: PullOutcome) -> String {
    match outcome {
        PullOutcome::Replaced { count } => format!("Quotes synced with server ({count} quotes)."),
        PullOutcome::Unchanged => "Server returned no quotes; local quotes kept.".to_string(),
    }
}

fn run_session(book: QuoteBook, reconciler: Reconciler, interval: Duration) -> CliResult<()> {
    let book = Arc::new(Mutex::new(book));
    let reconciler = Arc::new(reconciler);

    let task_book = Arc::clone(&book);
    let task_reconciler = Arc::clone(&reconciler);
    let pull_task = PeriodicTask::spawn("quotebook-pull", interval, move || {
        // Outcome is logged by the reconciler; the prompt stays undisturbed.
        let _ = task_reconciler.pull_shared(&task_book);
    })?;

    with_book(&book, print_random)?;
    print_session_help();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match handle_session_line(line.trim(), &book, &reconciler) {
            Ok(SessionFlow::Continue) => {}
            Ok(SessionFlow::Quit) => break,
            Err(err) => println!("error: {err}"),
        }
    }

    if pull_task.is_ticking() {
        println!("Waiting for the background sync to finish...");
    }
    pull_task.stop();
    Ok(())
}

enum SessionFlow {
    Continue,
    Quit,
}

fn handle_session_line(
    line: &str,
    book: &Mutex<QuoteBook>,
    reconciler: &Reconciler,
) -> CliResult<SessionFlow> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "next" => with_book(book, print_random)?,
        "last" => with_book(book, |book| {
            match book.last_shown()? {
                Some(quote) => println!("{quote}"),
                None => println!("{NO_QUOTES_MESSAGE}"),
            }
            Ok(())
        })?,
        "add" => {
            let (category, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let snapshot = with_book_mut(book, |book| {
                book.add_quote(text.trim(), category)?;
                Ok(book.quotes().to_vec())
            });
            match snapshot {
                Ok(quotes) => {
                    println!("New quote added successfully!");
                    push_snapshot(reconciler, &quotes);
                }
                Err(CliError::Book(QuoteBookError::Validation(_))) => {
                    println!("Please enter both a quote and a category.");
                }
                Err(err) => return Err(err),
            }
        }
        "filter" => with_book_mut(book, |book| {
            let category = if rest.is_empty() { ALL_CATEGORIES } else { rest };
            book.set_selected_category(category)?;
            print_random(book)
        })?,
        "categories" => with_book(book, |book| {
            for category in category_choices(book) {
                println!("{category}");
            }
            Ok(())
        })?,
        "export" => with_book(book, |book| {
            let path = if rest.is_empty() { EXPORT_FILE_NAME } else { rest };
            book.export_file(path.as_ref())?;
            println!("Exported {} quotes to {path}", book.quotes().len());
            Ok(())
        })?,
        "import" => {
            let quotes = with_book_mut(book, |book| {
                book.import_file(rest.as_ref())?;
                Ok(book.quotes().to_vec())
            })?;
            println!("Quotes imported successfully!");
            push_snapshot(reconciler, &quotes);
        }
        "pull" => {
            let outcome = reconciler.pull_shared(book)?;
            println!("{}", describe_pull(outcome));
        }
        "help" => print_session_help(),
        "quit" | "exit" => return Ok(SessionFlow::Quit),
        other => println!("unknown command `{other}`; type `help`"),
    }

    Ok(SessionFlow::Continue)
}

/// Pushes outside the state lock so the background pull is not blocked.
fn push_snapshot(reconciler: &Reconciler, quotes: &[Quote]) {
    if let Err(err) = reconciler.push(quotes) {
        warn!("event=session_push module=cli status=error error={err}");
        eprintln!("warning: quotes saved locally but not synced: {err}");
    }
}

fn with_book<T>(
    book: &Mutex<QuoteBook>,
    f: impl FnOnce(&QuoteBook) -> CliResult<T>,
) -> CliResult<T> {
    let guard = book.lock().map_err(|_| SyncError::StatePoisoned)?;
    f(&*guard)
}

fn with_book_mut<T>(
    book: &Mutex<QuoteBook>,
    f: impl FnOnce(&mut QuoteBook) -> CliResult<T>,
) -> CliResult<T> {
    let mut guard = book.lock().map_err(|_| SyncError::StatePoisoned)?;
    f(&mut *guard)
}

fn print_session_help() {
    println!("commands:");
    println!("  next                     show a random quote");
    println!("  last                     show the last quote shown this session");
    println!("  add <category> <text>    add a quote");
    println!("  filter [category]        select a category (`all` or empty clears)");
    println!("  categories               list categories");
    println!("  export [path]            export quotes (default {EXPORT_FILE_NAME})");
    println!("  import <path>            import quotes from a JSON file");
    println!("  pull                     sync from the server now");
    println!("  quit                     end the session");
}

#[cfg(test)]
mod tests {
    use super::{category_choices, describe_pull, handle_session_line, Cli, SessionFlow};
    use clap::Parser;
    use quotebook_core::{
        MemoryKeyValueStorage, PullOutcome, Quote, QuoteBook, Reconciler, RemotePost,
        RemoteQuoteSource, SyncResult,
    };
    use std::sync::{Arc, Mutex};

    struct OfflineRemote;

    impl RemoteQuoteSource for OfflineRemote {
        fn fetch(&self) -> SyncResult<Vec<RemotePost>> {
            Ok(vec![RemotePost {
                title: "Remote".to_string(),
                body: "Synced body".to_string(),
            }])
        }

        fn publish(&self, _quotes: &[Quote]) -> SyncResult<()> {
            Ok(())
        }
    }

    fn session_fixture() -> (Mutex<QuoteBook>, Reconciler) {
        let book = QuoteBook::open(
            Box::new(MemoryKeyValueStorage::new()),
            Box::new(MemoryKeyValueStorage::new()),
        )
        .unwrap();
        (Mutex::new(book), Reconciler::new(Arc::new(OfflineRemote)))
    }

    #[test]
    fn parses_add_command() {
        let cli = Cli::try_parse_from(["quotebook", "add", "Hello", "Test"]).unwrap();
        assert!(matches!(
            cli.command,
            super::Command::Add { ref text, ref category } if text == "Hello" && category == "Test"
        ));
        assert_eq!(cli.attempts, 1);
    }

    #[test]
    fn session_add_takes_category_then_text() {
        let (book, reconciler) = session_fixture();
        handle_session_line("add Test Hello there", &book, &reconciler).unwrap();

        let book = book.lock().unwrap();
        assert_eq!(book.quotes().last(), Some(&Quote::new("Hello there", "Test")));
    }

    #[test]
    fn session_add_without_text_changes_nothing() {
        let (book, reconciler) = session_fixture();
        handle_session_line("add Test", &book, &reconciler).unwrap();
        assert_eq!(book.lock().unwrap().quotes().len(), 3);
    }

    #[test]
    fn session_filter_and_pull_update_state() {
        let (book, reconciler) = session_fixture();
        handle_session_line("filter Life", &book, &reconciler).unwrap();
        assert_eq!(book.lock().unwrap().selected_category(), "Life");

        handle_session_line("pull", &book, &reconciler).unwrap();
        assert_eq!(
            book.lock().unwrap().quotes(),
            &[Quote::new("Remote", "Synced")]
        );
    }

    #[test]
    fn session_quit_ends_loop() {
        let (book, reconciler) = session_fixture();
        assert!(matches!(
            handle_session_line("quit", &book, &reconciler).unwrap(),
            SessionFlow::Quit
        ));
    }

    #[test]
    fn category_choices_lead_with_all() {
        let (book, reconciler) = session_fixture();
        assert_eq!(
            category_choices(&book.lock().unwrap()),
            vec!["all", "Inspiration", "Life", "Motivation"]
        );

        handle_session_line("add Test Hello", &book, &reconciler).unwrap();
        assert_eq!(
            category_choices(&book.lock().unwrap()).last().map(String::as_str),
            Some("Test")
        );
    }

    #[test]
    fn describes_pull_outcomes() {
        assert!(describe_pull(PullOutcome::Replaced { count: 2 }).contains("2 quotes"));
        assert!(describe_pull(PullOutcome::Unchanged).contains("kept"));
    }
}
