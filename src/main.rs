//! sen - Main entry point.
//!
//! A terminal dashboard for Docker images and containers.
//!
//! Usage: sen
//!
//! Settings are read from ~/.senrc; logs are written to ~/.sen/logs/.

use std::io;
use std::panic;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use sen::app::App;
use sen::config::Config;
use sen::logging;

/// Maximum iterations for main loop (safety bound).
const MAX_MAIN_ITERATIONS: usize = 100_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sen: using default settings ({})", e);
            Config::default()
        }
    };

    if let Err(e) = logging::init(&config.log_config) {
        eprintln!("sen: file logging disabled ({})", e);
    }

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Loads the inventory before the screen switches
    let mut app = App::new(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    app.shutdown();
    restore_terminal()?;

    if let Err(ref e) = result {
        tracing::error!("Event loop failed: {}", e);
    }
    result?;

    // Log workers may still be blocked on a silent container
    std::process::exit(0);
}

/// Runs the event loop until a quit key is pressed.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let mut iterations = 0;
    while app.is_running() && iterations < MAX_MAIN_ITERATIONS {
        if app.should_draw() {
            terminal.draw(|frame| app.render(frame))?;
        }

        app.update()?;

        iterations += 1;
    }
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
