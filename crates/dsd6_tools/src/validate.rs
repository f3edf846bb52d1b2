//! Data validation utilities.
//!
//! Every `.json` and `.ron` file under a directory is parsed as the document
//! it claims to be: files with `threat` in their name are card catalogues,
//! everything else is a ship definition.

use std::fs;
use std::path::{Path, PathBuf};

use dsd6_core::data::{DataError, DataFormat, DataKind, ShipData, ThreatCatalogue};
use thiserror::Error;

/// Summary of a successful directory validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Catalogue files checked.
    pub catalogues: usize,
    /// Ship files checked.
    pub ships: usize,
    /// Cards across all catalogues.
    pub cards: usize,
}

/// Errors raised while validating a data directory.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The path is not a directory.
    #[error("Data directory not found: {0}")]
    DirectoryNotFound(String),

    /// The directory could not be listed.
    #[error("Failed to list '{path}': {message}")]
    Io {
        /// Directory path.
        path: String,
        /// IO error message.
        message: String,
    },

    /// One or more files failed to parse or validate.
    #[error("{} of {checked} data files failed validation", .failures.len())]
    Invalid {
        /// Number of files checked.
        checked: usize,
        /// Failing files and their errors.
        failures: Vec<(PathBuf, DataError)>,
    },
}

/// Validate one data file. Returns its kind and card count.
pub fn validate_file(path: &Path) -> Result<(DataKind, usize), DataError> {
    match DataKind::from_path(path) {
        DataKind::Catalogue => {
            let catalogue = ThreatCatalogue::load_file(path)?;
            Ok((DataKind::Catalogue, catalogue.card_count()))
        }
        DataKind::Ship => {
            ShipData::load_file(path)?;
            Ok((DataKind::Ship, 0))
        }
    }
}

/// Validate all JSON and RON data files in a directory tree.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or any data file fails
/// validation. Every file is checked before reporting.
pub fn validate_data_directory(path: &Path) -> Result<ValidationReport, ValidateError> {
    if !path.is_dir() {
        return Err(ValidateError::DirectoryNotFound(path.display().to_string()));
    }

    let mut files = Vec::new();
    collect_data_files(path, &mut files)?;
    files.sort();

    let mut report = ValidationReport::default();
    let mut failures = Vec::new();
    for file in &files {
        match validate_file(file) {
            Ok((DataKind::Catalogue, cards)) => {
                tracing::debug!(file = %file.display(), cards, "Catalogue ok");
                report.catalogues += 1;
                report.cards += cards;
            }
            Ok((DataKind::Ship, _)) => {
                tracing::debug!(file = %file.display(), "Ship ok");
                report.ships += 1;
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Invalid data file");
                failures.push((file.clone(), e));
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(ValidateError::Invalid {
            checked: files.len(),
            failures,
        })
    }
}

fn collect_data_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ValidateError> {
    let io_error = |e: std::io::Error| ValidateError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_data_files(&path, files)?;
        } else if DataFormat::from_path(&path).is_ok() {
            files.push(path);
        }
    }
    Ok(())
}
