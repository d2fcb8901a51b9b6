use std::error::Error;
use std::fs::File;
use std::str::FromStr;

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::LoggingSettings;

/// Send `log` records to the configured file. The terminal belongs to the UI.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Box<dyn Error>> {
    let level = LevelFilter::from_str(settings.level.trim()).unwrap_or(LevelFilter::Info);
    if level == LevelFilter::Off {
        return Ok(());
    }
    if let Some(parent) = settings.file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    WriteLogger::init(level, Config::default(), File::create(&settings.file)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_level_skips_file_creation() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            file: dir.path().join("nested").join("hydrophone.log"),
            level: "off".to_string(),
        };
        init_logging(&settings).unwrap();
        assert!(!settings.file.exists());
    }
}
