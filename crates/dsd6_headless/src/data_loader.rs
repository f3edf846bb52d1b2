//! Card catalogue and ship loading for headless sessions.
//!
//! Loads data files from a directory so that sessions play with the real
//! catalogue rather than hardcoded cards.

use std::fs;
use std::path::{Path, PathBuf};

use dsd6_core::data::{DataError, DataFormat, DataKind, ShipData, ThreatCatalogue};
use thiserror::Error;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "DSD6_DATA_DIR";

/// Everything a session needs from disk.
#[derive(Debug, Clone)]
pub struct GameData {
    /// Threat card catalogue.
    pub catalogue: ThreatCatalogue,
    /// Ship definition.
    pub ship: ShipData,
}

/// Errors that can occur during data loading.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// A file could not be read or parsed.
    #[error("Failed to load '{path}': {source}")]
    File {
        /// File path.
        path: String,
        /// Underlying failure.
        source: DataError,
    },

    /// Directory not found.
    #[error("Data directory not found: {0}")]
    DirectoryNotFound(String),

    /// The directory holds no file of the wanted kind.
    #[error("No {kind} file found in '{dir}'")]
    Missing {
        /// `catalogue` or `ship`.
        kind: &'static str,
        /// Directory searched.
        dir: String,
    },
}

fn file_error(path: &Path, source: DataError) -> DataLoadError {
    DataLoadError::File {
        path: path.display().to_string(),
        source,
    }
}

/// Load a card catalogue from a JSON or RON file.
pub fn load_catalogue_file(path: &Path) -> Result<ThreatCatalogue, DataLoadError> {
    let catalogue = ThreatCatalogue::load_file(path).map_err(|source| file_error(path, source))?;
    tracing::debug!(path = %path.display(), cards = catalogue.card_count(), "Catalogue loaded");
    Ok(catalogue)
}

/// Load and validate a ship from a JSON or RON file.
pub fn load_ship_file(path: &Path) -> Result<ShipData, DataLoadError> {
    let ship = ShipData::load_file(path).map_err(|source| file_error(path, source))?;
    tracing::debug!(path = %path.display(), ship = %ship.name, "Ship loaded");
    Ok(ship)
}

/// Load the catalogue and a ship from a directory.
///
/// The catalogue is the first data file (by name) with `threat` in its name.
/// The ship is `<ship_name>.ron` or `<ship_name>.json` when a name is given,
/// otherwise the first remaining data file.
pub fn load_from_directory(dir: &Path, ship_name: Option<&str>) -> Result<GameData, DataLoadError> {
    if !dir.is_dir() {
        return Err(DataLoadError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| {
            file_error(
                dir,
                DataError::Io {
                    path: dir.display().to_string(),
                    message: e.to_string(),
                },
            )
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && DataFormat::from_path(path).is_ok())
        .collect();
    files.sort();

    let (catalogues, ships): (Vec<_>, Vec<_>) = files
        .into_iter()
        .partition(|path| DataKind::from_path(path) == DataKind::Catalogue);
    let missing = |kind| DataLoadError::Missing {
        kind,
        dir: dir.display().to_string(),
    };

    let catalogue_path = catalogues.first().ok_or_else(|| missing("catalogue"))?;
    let ship_path = match ship_name {
        Some(name) => ships
            .iter()
            .find(|path| path.file_stem().and_then(|s| s.to_str()) == Some(name)),
        None => ships.first(),
    }
    .ok_or_else(|| missing("ship"))?;

    Ok(GameData {
        catalogue: load_catalogue_file(catalogue_path)?,
        ship: load_ship_file(ship_path)?,
    })
}

/// Resolve the default data directory.
///
/// Looks in standard locations:
/// 1. Environment variable `DSD6_DATA_DIR`
/// 2. `./crates/dsd6_headless/assets/data/` (repo root)
/// 3. `./assets/data/` (running from dsd6_headless)
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.exists() {
            return Some(path);
        }
    }

    let candidates = [
        "crates/dsd6_headless/assets/data",
        "assets/data",
        "../dsd6_headless/assets/data",
    ];
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsd6_test_utils::fixtures::{
        SAMPLE_CARD_COUNT, SAMPLE_CATALOGUE_JSON, SAMPLE_CATALOGUE_RON, SAMPLE_SHIP_JSON,
        SAMPLE_SHIP_RON,
    };

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("threat_cards.ron"), SAMPLE_CATALOGUE_RON).unwrap();
        fs::write(dir.path().join("halcyon.ron"), SAMPLE_SHIP_RON).unwrap();

        let data = load_from_directory(dir.path(), None).unwrap();
        assert_eq!(data.catalogue.card_count(), SAMPLE_CARD_COUNT);
        assert_eq!(data.ship.name, "Halcyon");
    }

    #[test]
    fn test_ship_selected_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("threat_cards.json"), SAMPLE_CATALOGUE_JSON).unwrap();
        fs::write(dir.path().join("halcyon.json"), SAMPLE_SHIP_JSON).unwrap();
        fs::write(
            dir.path().join("aardvark.ron"),
            "(name: \"Aardvark\", complement: 4, shield_points: 2, hull_points: 6)",
        )
        .unwrap();

        assert_eq!(load_from_directory(dir.path(), None).unwrap().ship.name, "Aardvark");
        assert_eq!(
            load_from_directory(dir.path(), Some("halcyon")).unwrap().ship.name,
            "Halcyon"
        );
        assert!(matches!(
            load_from_directory(dir.path(), Some("valiant")),
            Err(DataLoadError::Missing { kind: "ship", .. })
        ));
    }

    #[test]
    fn test_missing_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("halcyon.ron"), SAMPLE_SHIP_RON).unwrap();
        assert!(matches!(
            load_from_directory(dir.path(), None),
            Err(DataLoadError::Missing { kind: "catalogue", .. })
        ));
    }

    #[test]
    fn test_invalid_ship_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.json");
        fs::write(
            &path,
            r#"{ "name": "Ghost", "complement": 0, "shield_points": 0, "hull_points": 0 }"#,
        )
        .unwrap();
        assert!(matches!(
            load_ship_file(&path),
            Err(DataLoadError::File {
                source: DataError::InvalidShip { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_bundled_assets_load() {
        let paths = [
            Path::new("crates/dsd6_headless/assets/data"),
            Path::new("assets/data"),
        ];
        let dir = paths
            .iter()
            .find(|p| p.exists())
            .expect("bundled data directory");
        let data = load_from_directory(dir, None).unwrap();
        assert!(data.catalogue.card_count() > 0);
    }
}
