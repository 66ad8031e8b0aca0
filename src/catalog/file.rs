//! File-backed catalog (TOML or JSON)

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{validate_catalog, CatalogError, CatalogProvider};
use crate::types::Catalog;

/// Catalog read from disk on every snapshot, so edits apply to the next
/// optimization run without a restart.
///
/// Format is chosen by extension: `.toml` or `.json`.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, contents: &str) -> Result<Catalog, CatalogError> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse_err = |message: String| CatalogError::Parse {
            path: self.path.clone(),
            message,
        };

        match ext.as_deref() {
            Some("toml") => toml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            Some("json") => serde_json::from_str(contents).map_err(|e| parse_err(e.to_string())),
            _ => Err(CatalogError::UnsupportedFormat {
                path: self.path.clone(),
            }),
        }
    }
}

impl CatalogProvider for FileCatalog {
    fn snapshot(&self) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let catalog = self.parse(&contents)?;
        validate_catalog(&catalog)?;
        debug!(
            path = %self.path.display(),
            diameters = catalog.pulley_diameters.len(),
            bearings = catalog.bearings.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BearingType;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_toml_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "parts.toml",
            r#"
pulley_diameters = [100, 125, 160]

[[bearings]]
model = "6205"
bearing_type = "balls"
dynamic_load_c = 14000

[[bearings]]
model = "NU205"
bearing_type = "rollers"
dynamic_load_rating = 28600
"#,
        );
        let catalog = FileCatalog::new(path).snapshot().unwrap();
        assert_eq!(catalog.pulley_diameters, vec![100.0, 125.0, 160.0]);
        assert_eq!(catalog.bearings[1].bearing_type, BearingType::Rollers);
        assert_eq!(catalog.bearings[1].dynamic_load_c, 28_600.0);
    }

    #[test]
    fn test_json_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "parts.json",
            r#"{"pulley_diameters": [80.0], "bearings": [{"model": "6204", "bearing_type": "balls", "dynamic_load_c": 13500}]}"#,
        );
        let catalog = FileCatalog::new(path).snapshot().unwrap();
        assert_eq!(catalog.bearings[0].model, "6204");
    }

    #[test]
    fn test_reread_on_every_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let body = |d: u32| {
            format!(
                r#"{{"pulley_diameters": [{d}], "bearings": [{{"model": "6204", "bearing_type": "balls", "dynamic_load_c": 13500}}]}}"#
            )
        };
        let path = write_file(&dir, "parts.json", &body(90));
        let provider = FileCatalog::new(&path);
        assert_eq!(provider.snapshot().unwrap().pulley_diameters, vec![90.0]);

        write_file(&dir, "parts.json", &body(112));
        assert_eq!(provider.snapshot().unwrap().pulley_diameters, vec![112.0]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let provider = FileCatalog::new("/nonexistent/parts.toml");
        assert!(matches!(provider.snapshot(), Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "parts.csv", "100,125");
        assert!(matches!(
            FileCatalog::new(path).snapshot(),
            Err(CatalogError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_empty_file_catalog_is_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "parts.toml", "");
        assert!(matches!(
            FileCatalog::new(path).snapshot(),
            Err(CatalogError::Shape(_))
        ));
    }
}
