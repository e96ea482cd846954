//! Import configuration.

use serde::{Deserialize, Serialize};

/// Options controlling an OBJ import.
///
/// Every field has a default, so a partial JSON document is valid:
///
/// ```ignore
/// let config = ImportConfig::from_json_str(r#"{ "max_line_length": 256 }"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Longest face record accepted, in bytes. Longer lines are rejected
    /// with a diagnostic instead of being truncated.
    pub max_line_length: usize,

    /// Resolve `mtllib` declarations against the file system and hand their
    /// contents to the material-library collaborator. When disabled the
    /// declared names are still recorded.
    pub load_material_libraries: bool,

    /// Emit one mesh per (object, material) pair. When disabled every object
    /// becomes a single mesh using the material of its first face.
    pub split_by_material: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_line_length: 8192,
            load_material_libraries: true,
            split_by_material: true,
        }
    }
}

impl ImportConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
