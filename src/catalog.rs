//! Recording catalog: where the rows of the recordings table come from and
//! how the search form narrows them down.

mod dates;
mod load;
mod model;
mod sample;
mod scan;
mod search;

pub use dates::{DateFilter, parse_catalog_date};
pub use load::{CatalogError, load_catalog, read_catalog_file};
pub use model::Recording;
pub use sample::sample_recordings;
pub use scan::scan;
pub use search::{SearchQuery, VESSEL_OPTIONS, VesselOption, vessel_suggestions};
