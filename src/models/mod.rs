mod catalog;
mod system;

pub use catalog::{load_catalog, parse_catalog, sample_catalog, CatalogError};
pub use system::{Point3, StarSystem, SystemRecord};
