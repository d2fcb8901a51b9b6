use std::env;
use std::path::PathBuf;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlayRoute};
use crate::catalog::load_catalog;
use crate::media::{NotificationBus, RodioPlatform};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("hydrophone: logging disabled: {e}");
    }
    if let Some(msg) = warning {
        log::warn!("{msg}");
    }

    let arg = env::args().nth(1).map(PathBuf::from);
    let recordings = load_catalog(arg.as_deref(), &settings.catalog)?;
    log::info!("catalog loaded: {} recordings", recordings.len());

    let platform = RodioPlatform::new(&settings.player, &settings.network);
    let bus = NotificationBus::new();
    let mut app = App::new(
        recordings,
        settings.ui.records_per_page,
        PlayRoute::from(settings.player.route),
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &platform, &bus);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    run_result
}
