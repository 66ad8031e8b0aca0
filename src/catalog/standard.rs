//! In-memory catalog, including the built-in commercial parts list

use super::{validate_catalog, CatalogError, CatalogProvider};
use crate::types::{BearingSpec, BearingType, Catalog};

/// R20 preferred pulley diameters (mm), 50 to 400
const STANDARD_DIAMETERS: [f64; 19] = [
    50.0, 56.0, 63.0, 71.0, 80.0, 90.0, 100.0, 112.0, 125.0, 140.0, 160.0, 180.0, 200.0, 224.0,
    250.0, 280.0, 315.0, 355.0, 400.0,
];

/// Common deep-groove ball and cylindrical roller bearings: (model, type, C in N)
const STANDARD_BEARINGS: [(&str, BearingType, f64); 7] = [
    ("6204", BearingType::Balls, 13_500.0),
    ("6205", BearingType::Balls, 14_000.0),
    ("6206", BearingType::Balls, 19_500.0),
    ("6207", BearingType::Balls, 25_500.0),
    ("6305", BearingType::Balls, 22_500.0),
    ("NU205", BearingType::Rollers, 28_600.0),
    ("NU206", BearingType::Rollers, 44_000.0),
];

impl Catalog {
    /// Built-in catalog of stock pulley sizes and bearings
    pub fn standard() -> Self {
        Catalog::new(
            STANDARD_DIAMETERS.to_vec(),
            STANDARD_BEARINGS
                .iter()
                .map(|(model, kind, c)| BearingSpec::new(*model, *kind, *c))
                .collect(),
        )
    }
}

/// Fixed catalog held in memory
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(Catalog::standard())
    }
}

impl CatalogProvider for StaticCatalog {
    fn snapshot(&self) -> Result<Catalog, CatalogError> {
        validate_catalog(&self.catalog)?;
        Ok(self.catalog.clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
