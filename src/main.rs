use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use readtime::{
    app::App,
    app_dirs::AppDirs,
    document::Document,
    extension::Extension,
    runtime::{AppEvent, CrosstermEventSource, EventSource, Runner},
    settings::FileSettingsStore,
    ui, WordCounter,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    panic,
    path::PathBuf,
};

/// terminal editor with a live reading-time estimate in the status bar
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Open a text file in a minimal terminal editor. The status bar shows how long the document, or the current selection, takes to read at your configured words-per-minute."
)]
pub struct Cli {
    /// file to open
    file: Option<PathBuf>,

    /// settings file to use instead of the platform config directory
    #[clap(long)]
    config: Option<PathBuf>,

    /// how words are counted
    #[clap(long, value_enum, default_value_t = WordCounter::Whitespace)]
    counter: WordCounter,

    /// write logs to this file (defaults to $READTIME_LOG_DIR/readtime.<pid>.log when set)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    setup_tracing(cli.log_file.clone().or_else(AppDirs::log_path));

    let document = match &cli.file {
        Some(path) => Some(Document::open(path)?),
        None => None,
    };
    let store = match &cli.config {
        Some(path) => FileSettingsStore::with_path(path),
        None => FileSettingsStore::new(),
    };
    tracing::info!(settings = ?store.path(), counter = %cli.counter, "starting");
    let extension = Extension::new(Box::new(store), cli.counter);

    // restore the terminal before the default hook prints the panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(document, extension);
    let mut runner = Runner::new(CrosstermEventSource::new());
    let res = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E>,
) -> Result<(), Box<dyn Error>> {
    app.start(runner.scheduler_mut());
    terminal.draw(|f| ui::draw(f, app))?;

    while !app.should_quit() {
        let event = runner.step();
        if matches!(event, AppEvent::Closed) {
            tracing::warn!("input closed, exiting");
        }
        if app.on_event(event) {
            terminal.draw(|f| ui::draw(f, app))?;
        }
    }

    app.stop(runner.scheduler_mut());
    Ok(())
}

/// Log to a file only; the terminal belongs to the UI
fn setup_tracing(log_path: Option<PathBuf>) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let Some(log_path) = log_path else {
        return;
    };
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("readtime=info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(path = ?log_path, "tracing initialized");
}
