//! Transport-safe layout metadata for the tab host UI.
//!
//! Serializes as a JSON object keyed by layout id, in registration order:
//!
//! ```json
//! {"greeting": {"name": "...", "description": "...", "keywords": [],
//!               "allowMultiple": false,
//!               "parameters": [{"name": "name", "hasDefault": false,
//!                               "default": null, "annotation": null}],
//!               "parameterPresets": null}}
//! ```

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::params::ParameterInfo;
use crate::registry::{LayoutRecord, LayoutRegistry, Presets};

/// Metadata for one layout, without the layout itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetadata {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub allow_multiple: bool,
    pub parameters: Vec<ParameterInfo>,
    pub parameter_presets: Option<Presets>,
}

impl From<&LayoutRecord> for LayoutMetadata {
    fn from(record: &LayoutRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            keywords: record.keywords.clone(),
            allow_multiple: record.allow_multiple,
            parameters: record.parameters.clone(),
            parameter_presets: record.presets.clone(),
        }
    }
}

/// Ordered id → metadata snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutCatalog(Vec<LayoutMetadata>);

impl LayoutCatalog {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LayoutMetadata> {
        self.0.iter().find(|meta| meta.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutMetadata> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for LayoutCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for meta in &self.0 {
            map.serialize_entry(&meta.id, meta)?;
        }
        map.end()
    }
}

impl LayoutRegistry {
    /// Metadata for every registered layout.
    #[must_use]
    pub fn list_metadata(&self) -> LayoutCatalog {
        LayoutCatalog(
            self.list_all()
                .iter()
                .map(|record| LayoutMetadata::from(record.as_ref()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
