use chrono::{Datelike, NaiveDate};

/// Date part of a search: nothing, one day, or a whole month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    Any,
    Exact(NaiveDate),
    Month { year: i32, month: u32 },
}

impl DateFilter {
    /// Parse what the user typed: empty, `YYYY-MM-DD` or `YYYY-MM`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::Any);
        }
        if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(Self::Exact(d));
        }
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d") {
            return Ok(Self::Month {
                year: d.year(),
                month: d.month(),
            });
        }
        Err(format!("`{input}` is not YYYY-MM-DD or YYYY-MM"))
    }

    /// Whether a catalog date string falls inside this filter. Unparseable
    /// catalog dates only match `Any`.
    pub fn matches(&self, catalog_date: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(want) => parse_catalog_date(catalog_date) == Some(*want),
            Self::Month { year, month } => parse_catalog_date(catalog_date)
                .is_some_and(|d| d.year() == *year && d.month() == *month),
        }
    }
}

/// Understands `Sep 9, 2025`, `September 9, 2025` and ISO `2025-09-09`.
pub fn parse_catalog_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%b %d, %Y", "%b %e, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
