//! Terminal rendering with `ratatui`.
//!
//! `draw` paints the banner, search form, results table, inline player,
//! location popup and the controls footer. It returns the rectangle the
//! waveform strip was drawn into so the event loop can map mouse clicks
//! onto it.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Padding, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::{App, Mode, SearchField, map_url};
use crate::config::{PlayerSettings, UiSettings};
use crate::player::{PlaybackWidget, WidgetState};

const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

fn controls_text(mode: Mode, skip_seconds: u64) -> String {
    let keys: Vec<String> = match mode {
        Mode::Search => vec![
            "[tab] vessel/date".to_string(),
            "[up/down] suggestions".to_string(),
            "[enter] search".to_string(),
            "[esc] results".to_string(),
        ],
        Mode::Browse => vec![
            "[j/k] row".to_string(),
            "[h/l] page".to_string(),
            "[1-9] go to page".to_string(),
            "[enter] play".to_string(),
            "[space/p] play/pause".to_string(),
            format!("[H/L] -/+{skip_seconds}s"),
            "[click] seek".to_string(),
            "[x] close player".to_string(),
            "[o] location".to_string(),
            "[/] search".to_string(),
            "[q] quit".to_string(),
        ],
    };
    keys.join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Bars before the active one are played; the active bar and the rest are not.
fn bar_style(played: bool) -> Style {
    if played {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// One glyph per column, sampling the bar under it.
fn waveform_line(widget: &PlaybackWidget, width: u16) -> Line<'static> {
    let waveform = widget.waveform();
    let active = widget.active_index();
    let n = waveform.len();
    let width = usize::from(width);
    if n == 0 || width == 0 {
        return Line::default();
    }

    let spans: Vec<Span> = (0..width)
        .map(|col| {
            let i = (col * n / width).min(n - 1);
            let level = waveform.normalized(i).clamp(0.0, 1.0);
            let glyph_idx = ((level * (BAR_GLYPHS.len() - 1) as f32).round() as usize)
                .min(BAR_GLYPHS.len() - 1);
            Span::styled(
                BAR_GLYPHS[glyph_idx].to_string(),
                bar_style(waveform.is_played(i, active)),
            )
        })
        .collect();
    Line::from(spans)
}

fn player_status_line(widget: &PlaybackWidget, skip_seconds: u64) -> Line<'static> {
    let state = match widget.state() {
        WidgetState::Idle => "Idle",
        WidgetState::Loading => "Loading",
        WidgetState::Paused => "Paused",
        WidgetState::Playing => "Playing",
        WidgetState::Ended => "Ended",
    };
    let toggle = if widget.progress().is_playing() {
        "[⏸]"
    } else {
        "[▶]"
    };

    let mut spans = vec![
        Span::raw(format!("[-{skip_seconds}s] ")),
        Span::styled(toggle, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" [+{skip_seconds}s]  ")),
        Span::styled(widget.label(), Style::default().fg(Color::Yellow)),
        Span::raw(format!("  {state}")),
    ];
    if widget.awaiting_confirmation() {
        spans.push(Span::raw(" …"));
    }
    if widget.is_closable() {
        spans.push(Span::raw("  [x]"));
    }
    Line::from(spans)
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let focused = |field: SearchField| app.mode == Mode::Search && app.field == field;
    let field_block = |title: &'static str, on: bool| {
        let block = Block::default().borders(Borders::ALL).title(title).padding(LEFT_PAD);
        if on {
            block.border_style(Style::default().fg(Color::Cyan))
        } else {
            block
        }
    };

    let vessel = Paragraph::new(app.vessel_input.as_str())
        .block(field_block(" vessel ", focused(SearchField::Vessel)));
    frame.render_widget(vessel, cols[0]);

    let date_text = if app.date_input.is_empty() && !focused(SearchField::Date) {
        "any date (YYYY-MM-DD or YYYY-MM)".to_string()
    } else {
        app.date_input.clone()
    };
    let date = Paragraph::new(date_text).block(field_block(" date ", focused(SearchField::Date)));
    frame.render_widget(date, cols[1]);
}

fn draw_suggestions(frame: &mut Frame, app: &App, anchor: Rect, bounds: Rect) {
    let options = app.suggestions();
    if app.mode != Mode::Search || options.is_empty() {
        return;
    }
    let height = (options.len() as u16 + 2).min(bounds.height);
    let area = Rect {
        x: anchor.x,
        y: anchor.y + anchor.height,
        width: (anchor.width / 2).max(10),
        height,
    }
    .intersection(bounds);

    let items: Vec<ListItem> = options
        .iter()
        .map(|o| {
            ListItem::new(Line::from(vec![
                Span::styled(o.name, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" - "),
                Span::styled(o.description, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" suggestions "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ratatui::widgets::ListState::default();
    state.select(app.suggestion);

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    if app.results.is_none() {
        let hint = Paragraph::new("Enter a vessel type and/or date, then press enter to search.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" recordings "));
        frame.render_widget(hint, area);
        return;
    }

    let header = Row::new([
        "", "Vessel", "Location", "Date", "Time", "Noise", "Length",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .page_rows()
        .iter()
        .filter_map(|&i| app.recordings.get(i))
        .map(|r| {
            let marker = if app.is_now_playing(r) { "▶" } else { " " };
            Row::new([
                Cell::from(marker),
                Cell::from(r.vessel.as_str()),
                Cell::from(r.location.as_str().underlined()),
                Cell::from(r.date.as_str()),
                Cell::from(r.time.as_str()),
                Cell::from(r.noise_level.as_str()),
                Cell::from(r.clip_length.as_str()),
            ])
        })
        .collect();

    let pages = app.total_pages();
    let title = format!(" {} ", app.showing_text());
    let page_info = if pages > 0 {
        format!(" page {}/{} ", app.page, pages)
    } else {
        " no matching records ".to_string()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(Line::from(page_info).right_aligned()),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if app.mode == Mode::Browse && !app.page_rows().is_empty() {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

/// Draws the inline player and returns the waveform strip's area.
fn draw_player(frame: &mut Frame, widget: &PlaybackWidget, player: &PlayerSettings, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", widget.source().file_name()))
        .padding(LEFT_PAD);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(player_status_line(widget, player.skip_seconds)), rows[0]);
    frame.render_widget(Paragraph::new(waveform_line(widget, rows[1].width)), rows[1]);
    if let Some(notice) = widget.notice() {
        let line = Paragraph::new(notice.to_string()).fg(Color::Red);
        frame.render_widget(line, rows[2]);
    }
    rows[1]
}

fn draw_location(frame: &mut Frame, location: &str, bounds: Rect) {
    let area = centered_rect_sized(70, 7, bounds);
    frame.render_widget(Clear, area);
    let body = format!("{location}\n\n{}", map_url(location));
    let popup = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(LEFT_PAD)
                .title(" location (esc closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, area);
}

/// Render the whole screen. Returns the waveform strip, if a player is shown.
pub fn draw(frame: &mut Frame, app: &App, ui: &UiSettings, player: &PlayerSettings) -> Option<Rect> {
    let player_height = if app.player.is_some() { 5 } else { 0 };
    let notice_height = if app.notice.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(player_height),
            Constraint::Length(notice_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" hydrophone ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_search(frame, app, chunks[1]);
    draw_results(frame, app, chunks[2]);

    let strip = app
        .player
        .as_ref()
        .map(|w| draw_player(frame, w, player, chunks[3]));

    if let Some(notice) = &app.notice {
        frame.render_widget(Paragraph::new(notice.as_str()).fg(Color::Red), chunks[4]);
    }

    let footer = Paragraph::new(controls_text(app.mode, player.skip_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    // Overlays last so they sit above the table.
    let screen = frame.area();
    draw_suggestions(frame, app, chunks[1], screen);
    if let Some(location) = &app.location_modal {
        draw_location(frame, location, chunks[2]);
    }

    strip
}
