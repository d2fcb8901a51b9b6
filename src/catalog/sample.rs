use super::model::Recording;

const SAMPLE_CLIP_URL: &str =
    "https://incompetech.com/music/royalty-free/mp3-royaltyfree/Easy%20Lemon%2030%20second.mp3";

/// Built-in rows used when neither a catalog file nor a directory is given.
pub fn sample_recordings() -> Vec<Recording> {
    let row = |vessel: &str, date: &str, time: &str, clip: &str, location: &str| Recording {
        vessel: vessel.to_string(),
        location: location.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        noise_level: "90 dB".to_string(),
        clip_length: clip.to_string(),
        record_url: SAMPLE_CLIP_URL.to_string(),
    };

    vec![
        row("Container Ship", "Sep 9, 2025", "12:30 PST", "25s", "Orcasound Live"),
        row("Oil Tanker", "Sep 8, 2025", "14:00 PST", "22s", "Port Townsend"),
        row("Cruise Ship", "Sep 7, 2025", "09:45 PST", "28s", "Sunset Bay"),
    ]
}
