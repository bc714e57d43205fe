// epslab: terminal workbench for the EPS teaching language

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use epslab::client::ApiClient;
use epslab::config::Settings;
use epslab::session::Session;
use epslab::snippets;
use epslab::ui::App;

#[derive(Debug, Parser)]
#[command(name = "epslab", about = "Terminal workbench for the EPS teaching language")]
struct Args {
    /// EPS source file to load into the editor
    file: Option<PathBuf>,

    /// Base URL of the interpretation service (overrides EPSLAB_API_URL)
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging to stderr; redirect it to a file to keep the TUI clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = Settings::resolve(args.api_url);

    let source = match &args.file {
        Some(path) => {
            if !path.exists() {
                eprintln!("Error: File '{}' not found", path.display());
                std::process::exit(1);
            }
            fs::read_to_string(path)?
        }
        None => snippets::DEFAULT_PROGRAM.to_string(),
    };

    let backend = Arc::new(ApiClient::new(&settings.base_url)?);
    let session = Session::new(backend, source);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
