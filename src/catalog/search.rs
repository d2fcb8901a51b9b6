use super::dates::DateFilter;
use super::model::Recording;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VesselOption {
    pub name: &'static str,
    pub description: &'static str,
}

/// Vessel categories offered by the search form's autocomplete.
pub const VESSEL_OPTIONS: [VesselOption; 6] = [
    VesselOption {
        name: "Container Ship",
        description: "Large cargo vessel for containers",
    },
    VesselOption {
        name: "Oil Tanker",
        description: "Ship designed to transport oil",
    },
    VesselOption {
        name: "Cruise Ship",
        description: "Passenger vessel for tourism",
    },
    VesselOption {
        name: "Fishing Vessel",
        description: "Commercial fishing boat",
    },
    VesselOption {
        name: "Naval Ship",
        description: "Military naval vessel",
    },
    VesselOption {
        name: "Research Vessel",
        description: "Scientific research ship",
    },
];

/// Options whose name contains `input` (case-insensitive). Empty input offers nothing.
pub fn vessel_suggestions(input: &str) -> Vec<&'static VesselOption> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    VESSEL_OPTIONS
        .iter()
        .filter(|o| o.name.to_lowercase().contains(&needle))
        .collect()
}

/// A submitted search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub vessel: String,
    pub date: DateFilter,
}

impl SearchQuery {
    pub fn matches(&self, rec: &Recording) -> bool {
        let vessel = self.vessel.trim().to_lowercase();
        (vessel.is_empty() || rec.vessel.to_lowercase().contains(&vessel))
            && self.date.matches(&rec.date)
    }

    /// Indices of the matching recordings, in catalog order.
    pub fn filter(&self, recordings: &[Recording]) -> Vec<usize> {
        recordings
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }
}
