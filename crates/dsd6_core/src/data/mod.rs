//! Data structures for card catalogues and ship definitions.
//!
//! All structs are designed to be deserialized from JSON or RON documents.
//! The format of a file follows its extension, and what the file holds
//! follows its name (see [`DataKind::from_path`]).

mod ship_data;
mod threat_data;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use ship_data::ShipData;
pub use threat_data::{ActivationEntry, ExternalThreatCardData, ThreatCardData, ThreatCatalogue};

/// Errors raised while reading data documents.
#[derive(Debug, Error)]
pub enum DataError {
    /// Document text failed to parse.
    #[error("Failed to parse {format} data: {message}")]
    Parse {
        /// Format the text was parsed as.
        format: DataFormat,
        /// Parser message.
        message: String,
    },

    /// File extension is neither `.json` nor `.ron`.
    #[error("Unsupported data file extension: '{0}'")]
    UnsupportedFormat(String),

    /// Ship definition violates a constraint.
    #[error("Invalid ship data '{name}': {reason}")]
    InvalidShip {
        /// Ship name from the document.
        name: String,
        /// Violated constraint.
        reason: String,
    },

    /// File could not be read.
    #[error("Failed to read '{path}': {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// IO error message.
        message: String,
    },
}

/// Text formats accepted for data documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// `serde_json`.
    Json,
    /// `ron`.
    Ron,
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Ron => write!(f, "RON"),
        }
    }
}

impl DataFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "ron" => Ok(Self::Ron),
            _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Read `path` and parse it in the format its extension names.
    pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
        let format = Self::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        format.parse(&text)
    }

    /// Parse `text` into `T`.
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, DataError> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| DataError::Parse {
                format: self,
                message: e.to_string(),
            }),
            Self::Ron => ron::from_str(text).map_err(|e| DataError::Parse {
                format: self,
                message: e.to_string(),
            }),
        }
    }
}

/// Document held by a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Threat card catalogue.
    Catalogue,
    /// Ship definition.
    Ship,
}

impl DataKind {
    /// Files with `threat` in their name are catalogues; anything else is a ship.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let is_catalogue = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_ascii_lowercase().contains("threat"));
        if is_catalogue {
            Self::Catalogue
        } else {
            Self::Ship
        }
    }
}
