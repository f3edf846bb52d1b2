//! Ship definition documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DataError, DataFormat};

/// Data-driven ship definition.
///
/// # Example RON
///
/// ```ron
/// ShipData(
///     name: "Halcyon",
///     complement: 6,
///     shield_points: 4,
///     hull_points: 8,
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipData {
    /// Ship name.
    pub name: String,

    /// Total crew capacity; must be positive.
    pub complement: u32,

    /// Shield points at full strength.
    pub shield_points: u32,

    /// Hull points at full strength.
    pub hull_points: u32,
}

impl ShipData {
    /// Parse a ship definition from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        let data: Self = DataFormat::Json.parse(text)?;
        data.validate()?;
        Ok(data)
    }

    /// Parse a ship definition from RON text and validate it.
    pub fn from_ron_str(text: &str) -> Result<Self, DataError> {
        let data: Self = DataFormat::Ron.parse(text)?;
        data.validate()?;
        Ok(data)
    }

    /// Read a ship file, picking the format from its extension, and validate it.
    pub fn load_file(path: &Path) -> Result<Self, DataError> {
        let data: Self = DataFormat::load_file(path)?;
        data.validate()?;
        Ok(data)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.complement == 0 {
            return Err(DataError::InvalidShip {
                name: self.name.clone(),
                reason: "complement must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
