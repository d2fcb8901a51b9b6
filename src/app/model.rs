//! Application model: the recording selector around the playback widget.
//!
//! `App` holds the catalog, the search form, the paginated results, the
//! location popup and at most one inline `PlaybackWidget`. It only talks to
//! the widget through its public controls and the `on_close` callback.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::catalog::{DateFilter, Recording, SearchQuery, VesselOption, vessel_suggestions};
use crate::config::{PlayRouteSetting, PlayerSettings};
use crate::media::{MediaEvent, MediaHandle, MediaSource, Notification, Platform, Subscriptions};
use crate::player::{PlaybackWidget, WidgetState};

/// Which input has the keyboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Search,
    Browse,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Vessel,
    Date,
}

/// Where a play request from the table goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayRoute {
    /// Show (or re-source) the inline widget.
    Widget,
    /// Play straight away with no widget; only failures are reported.
    Direct,
}

impl From<PlayRouteSetting> for PlayRoute {
    fn from(s: PlayRouteSetting) -> Self {
        match s {
            PlayRouteSetting::Widget => Self::Widget,
            PlayRouteSetting::Direct => Self::Direct,
        }
    }
}

/// Messages the widget sends back to its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppMsg {
    PlayerClosed,
}

/// Result of asking to play the selected row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayRequest {
    OpenedWidget,
    SwitchedWidget,
    StartedDirect,
    NothingSelected,
    BadSource(String),
}

pub struct App {
    pub recordings: Vec<Recording>,
    pub mode: Mode,
    pub field: SearchField,
    pub vessel_input: String,
    pub date_input: String,
    /// Highlighted autocomplete suggestion, if any.
    pub suggestion: Option<usize>,

    /// Matching catalog indices; `None` until the first search is submitted.
    pub results: Option<Vec<usize>>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    /// Row within the current page.
    pub cursor: usize,

    pub location_modal: Option<String>,
    pub notice: Option<String>,
    pub route: PlayRoute,

    pub player: Option<PlaybackWidget>,
    direct: Option<MediaHandle>,
    msgs_tx: Sender<AppMsg>,
    msgs_rx: Receiver<AppMsg>,
}

impl App {
    /// Create a new `App` over `recordings`.
    pub fn new(recordings: Vec<Recording>, per_page: usize, route: PlayRoute) -> Self {
        let (msgs_tx, msgs_rx) = mpsc::channel();
        Self {
            recordings,
            mode: Mode::Search,
            field: SearchField::Vessel,
            vessel_input: String::new(),
            date_input: String::new(),
            suggestion: None,
            results: None,
            page: 1,
            per_page: per_page.max(1),
            cursor: 0,
            location_modal: None,
            notice: None,
            route,
            player: None,
            direct: None,
            msgs_tx,
            msgs_rx,
        }
    }

    // --- search form -------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
    }

    /// Leave the form without searching; only possible once results exist.
    pub fn leave_search(&mut self) {
        if self.results.is_some() {
            self.mode = Mode::Browse;
        }
        self.suggestion = None;
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            SearchField::Vessel => SearchField::Date,
            SearchField::Date => SearchField::Vessel,
        };
        self.suggestion = None;
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            SearchField::Vessel => &mut self.vessel_input,
            SearchField::Date => &mut self.date_input,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.active_input().push(c);
        self.suggestion = None;
    }

    pub fn pop_char(&mut self) {
        self.active_input().pop();
        self.suggestion = None;
    }

    /// Autocomplete options for the vessel field.
    pub fn suggestions(&self) -> Vec<&'static VesselOption> {
        if self.field != SearchField::Vessel {
            return Vec::new();
        }
        let options = vessel_suggestions(&self.vessel_input);
        // Hide the list once the input is exactly one option.
        if options.len() == 1 && options[0].name.eq_ignore_ascii_case(self.vessel_input.trim()) {
            return Vec::new();
        }
        options
    }

    pub fn next_suggestion(&mut self) {
        let n = self.suggestions().len();
        if n == 0 {
            self.suggestion = None;
            return;
        }
        self.suggestion = Some(self.suggestion.map_or(0, |i| (i + 1) % n));
    }

    pub fn prev_suggestion(&mut self) {
        let n = self.suggestions().len();
        if n == 0 {
            self.suggestion = None;
            return;
        }
        self.suggestion = Some(self.suggestion.map_or(n - 1, |i| (i + n - 1) % n));
    }

    /// Copy the highlighted suggestion into the vessel field.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(i) = self.suggestion.take() else {
            return false;
        };
        match self.suggestions().get(i) {
            Some(opt) => {
                self.vessel_input = opt.name.to_string();
                true
            }
            None => false,
        }
    }

    /// Run the search and show page 1 of the results.
    pub fn submit_search(&mut self) -> bool {
        self.accept_suggestion();
        let date = match DateFilter::parse(&self.date_input) {
            Ok(d) => d,
            Err(msg) => {
                self.notice = Some(msg);
                return false;
            }
        };
        let query = SearchQuery {
            vessel: self.vessel_input.clone(),
            date,
        };
        let results = query.filter(&self.recordings);
        log::info!("search {query:?}: {} of {} recordings", results.len(), self.recordings.len());
        self.results = Some(results);
        self.page = 1;
        self.cursor = 0;
        self.notice = None;
        self.mode = Mode::Browse;
        true
    }

    // --- results table -----------------------------------------------------

    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }

    pub fn total_pages(&self) -> usize {
        self.result_count().div_ceil(self.per_page)
    }

    /// Catalog indices on the current page.
    pub fn page_rows(&self) -> &[usize] {
        let Some(results) = self.results.as_deref() else {
            return &[];
        };
        let first = (self.page - 1) * self.per_page;
        let last = (first + self.per_page).min(results.len());
        results.get(first..last).unwrap_or(&[])
    }

    /// Go to page `n`; ignored outside `1..=total_pages`.
    pub fn paginate(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() {
            self.page = n;
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.paginate(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.paginate(self.page - 1)
    }

    /// `Showing 6 - 10 of 12 records`.
    pub fn showing_text(&self) -> String {
        let first = (self.page - 1) * self.per_page;
        let on_page = self.page_rows().len();
        let start = if on_page == 0 { 0 } else { first + 1 };
        format!(
            "Showing {} - {} of {} records",
            start,
            first + on_page,
            self.result_count()
        )
    }

    pub fn cursor_down(&mut self) {
        let n = self.page_rows().len();
        if n > 0 {
            self.cursor = (self.cursor + 1).min(n - 1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn selected_recording(&self) -> Option<&Recording> {
        self.page_rows()
            .get(self.cursor)
            .and_then(|&i| self.recordings.get(i))
    }

    /// Whether the inline widget is currently playing `rec`.
    pub fn is_now_playing(&self, rec: &Recording) -> bool {
        self.player.as_ref().is_some_and(|w| {
            w.state() == WidgetState::Playing && w.source().as_str() == rec.record_url.trim()
        })
    }

    // --- location popup ----------------------------------------------------

    pub fn open_location(&mut self) {
        self.location_modal = self.selected_recording().map(|r| r.location.clone());
    }

    pub fn close_location(&mut self) {
        self.location_modal = None;
    }

    // --- playback ----------------------------------------------------------

    /// Play the selected row through the configured route.
    pub fn request_play(
        &mut self,
        platform: &dyn Platform,
        subs: &Subscriptions,
        settings: &PlayerSettings,
    ) -> PlayRequest {
        let Some(url) = self.selected_recording().map(|r| r.record_url.clone()) else {
            return PlayRequest::NothingSelected;
        };
        let source = match MediaSource::new(url) {
            Ok(s) => s,
            Err(e) => {
                self.notice = Some(format!("Unable to play audio file ({e})"));
                return PlayRequest::BadSource(e.to_string());
            }
        };
        self.notice = None;

        match self.route {
            PlayRoute::Widget => {
                if let Some(w) = self.player.as_mut().filter(|w| !w.is_closed()) {
                    w.switch_source(source, platform, subs);
                    return PlayRequest::SwitchedWidget;
                }
                let tx = self.msgs_tx.clone();
                let on_close: Box<dyn FnMut()> = Box::new(move || {
                    let _ = tx.send(AppMsg::PlayerClosed);
                });
                self.player = Some(PlaybackWidget::open(
                    source,
                    Some(on_close),
                    settings,
                    platform,
                    subs,
                ));
                PlayRequest::OpenedWidget
            }
            PlayRoute::Direct => {
                // Replacing the previous direct handle tears it down first.
                self.direct = None;
                let mut handle = MediaHandle::open(source, platform, subs);
                handle.play();
                self.direct = Some(handle);
                PlayRequest::StartedDirect
            }
        }
    }

    /// Route one platform notification to whoever owns that handle.
    pub fn dispatch(&mut self, n: &Notification) {
        if let Some(w) = self.player.as_mut() {
            if w.handle_notification(n) {
                return;
            }
        }

        let is_direct = self.direct.as_ref().is_some_and(|h| h.id() == n.handle);
        if !is_direct {
            return;
        }
        match &n.event {
            MediaEvent::Failed(e) => {
                log::warn!("direct playback failed: {e}");
                self.notice = Some("Unable to play audio file".to_string());
                self.direct = None;
            }
            MediaEvent::Ended => self.direct = None,
            _ => {}
        }
    }

    /// Handle messages sent by the widget (currently only its close signal).
    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.msgs_rx.try_recv() {
            match msg {
                AppMsg::PlayerClosed => {
                    // The widget already tore its handle down; discard it.
                    self.player = None;
                }
            }
        }
    }

    pub fn is_direct_playing(&self) -> bool {
        self.direct.is_some()
    }

    /// Stop everything before exit.
    pub fn shutdown(&mut self) {
        self.player = None;
        self.direct = None;
    }
}

/// Google Maps link for a location name.
pub fn map_url(location: &str) -> String {
    let mut encoded = String::with_capacity(location.len());
    for b in location.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(b as char)
            }
            _ => encoded.push_str(&format!("%{b:02X}")),
        }
    }
    format!("https://www.google.com/maps?q={encoded}")
}
