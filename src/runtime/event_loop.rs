use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Mode};
use crate::config;
use crate::media::{NotificationBus, Platform};
use crate::ui;

/// Main terminal event loop: applies platform notifications, draws, and
/// handles input. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    platform: &dyn Platform,
    bus: &NotificationBus,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut strip: Option<Rect> = None;

    loop {
        for n in bus.drain() {
            app.dispatch(&n);
        }
        app.process_messages();

        terminal.draw(|f| strip = ui::draw(f, app, &settings.ui, &settings.player))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, platform, bus) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse_event(mouse, app, strip),
            _ => {}
        }
    }
}

/// A left click inside the waveform strip seeks there.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App, strip: Option<Rect>) {
    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
        return;
    };
    let (Some(area), Some(widget)) = (strip, app.player.as_mut()) else {
        return;
    };
    let inside = mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height;
    if !inside {
        return;
    }
    let x = column_to_x(mouse.column - area.x, area.width);
    if let Some(target) = widget.scrub(x, f64::from(area.width)) {
        log::debug!("scrub to {:.1}s", target.as_secs_f64());
    }
}

/// Map a cell offset inside a strip `width` cells wide onto `[0, width]`,
/// so the first column is the start and the last column is the end.
fn column_to_x(col: u16, width: u16) -> f64 {
    if width <= 1 {
        return 0.0;
    }
    let col = col.min(width - 1);
    f64::from(col) * f64::from(width) / f64::from(width - 1)
}

/// Returns `true` when the app should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    platform: &dyn Platform,
    bus: &NotificationBus,
) -> bool {
    if app.location_modal.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('q')) {
            app.close_location();
        }
        return false;
    }

    match app.mode {
        Mode::Search => {
            handle_search_key(key, app);
            false
        }
        Mode::Browse => handle_browse_key(key, settings, app, platform, bus),
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.leave_search(),
        KeyCode::Tab | KeyCode::BackTab => app.switch_field(),
        KeyCode::Down => app.next_suggestion(),
        KeyCode::Up => app.prev_suggestion(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Enter => {
            // First enter on a highlighted suggestion only fills it in.
            if !app.accept_suggestion() {
                app.submit_search();
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_char(c),
        _ => {}
    }
}

fn handle_browse_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    platform: &dyn Platform,
    bus: &NotificationBus,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('l') | KeyCode::Right => {
            app.next_page();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.prev_page();
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(n) = c.to_digit(10) {
                app.paginate(n as usize);
            }
        }
        KeyCode::Enter => {
            let outcome = app.request_play(platform, &bus.subscriptions(), &settings.player);
            log::debug!("play request: {outcome:?}");
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            if let Some(w) = app.player.as_mut() {
                w.toggle_play();
            }
        }
        KeyCode::Char('H') => {
            if let Some(w) = app.player.as_mut() {
                w.skip_back();
            }
        }
        KeyCode::Char('L') => {
            if let Some(w) = app.player.as_mut() {
                w.skip_forward();
            }
        }
        KeyCode::Char('x') => {
            if let Some(w) = app.player.as_mut() {
                w.close();
            }
        }
        KeyCode::Char('o') => app.open_location(),
        KeyCode::Esc => {
            app.notice = None;
            if let Some(w) = app.player.as_mut() {
                w.dismiss_notice();
            }
        }
        _ => {}
    }
    false
}
