use serde::Deserialize;

/// One row of the recordings table.
///
/// Field names follow the catalog file; the camel-case aliases accept
/// catalogs exported straight from the web front end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Recording {
    pub vessel: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(alias = "noiseLevel")]
    pub noise_level: String,
    #[serde(alias = "clipLength")]
    pub clip_length: String,
    #[serde(alias = "recordUrl")]
    pub record_url: String,
}
