use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::model::Recording;

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// `25s` style clip length, whole seconds rounded down.
fn clip_length_text(d: Option<Duration>) -> String {
    match d {
        Some(d) => format!("{}s", d.as_secs()),
        None => "-".to_string(),
    }
}

fn date_time_text(modified: Option<SystemTime>) -> (String, String) {
    match modified {
        Some(t) => {
            let local: DateTime<Local> = t.into();
            (
                local.format("%b %-d, %Y").to_string(),
                local.format("%H:%M %Z").to_string(),
            )
        }
        None => ("-".to_string(), "-".to_string()),
    }
}

/// Walk `dir` and build one `Recording` per audio file.
///
/// Vessel comes from the artist tag or the parent directory, location from
/// the album tag, noise level from a comment mentioning `dB`, and the date
/// and time from the file's modification time.
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Vec<Recording> {
    let mut recordings: Vec<Recording> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let mut vessel = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown vessel")
            .to_string();
        let mut location = "-".to_string();
        let mut noise_level = "-".to_string();
        let mut duration: Option<Duration> = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                duration = Some(tagged.properties().duration());

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                        vessel = v.trim().to_string();
                    }
                    if let Some(v) = tag.album().filter(|v| !v.trim().is_empty()) {
                        location = v.trim().to_string();
                    }
                    if let Some(v) = tag.comment().filter(|v| v.contains("dB")) {
                        noise_level = v.trim().to_string();
                    }
                }
            }
            Err(e) => log::debug!("no tags for {}: {e}", path.display()),
        }

        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let (date, time) = date_time_text(modified);

        recordings.push(Recording {
            vessel,
            location,
            date,
            time,
            noise_level,
            clip_length: clip_length_text(duration),
            record_url: path.display().to_string(),
        });
    }

    recordings.sort_by(|a, b| {
        a.vessel
            .to_lowercase()
            .cmp(&b.vessel.to_lowercase())
            .then_with(|| a.record_url.cmp(&b.record_url))
    });
    recordings
}
