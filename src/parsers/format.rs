//! JSON document layout of a dataset file.
//!
//! ```json
//! {
//!   "name": "roads",
//!   "geometry_type": "MultiLineString",
//!   "schema": [{"name": "id", "type": "int"}, {"name": "name", "type": "text"}],
//!   "features": [
//!     {"geometry": "MULTILINESTRING((0 0,1 1))", "attributes": {"id": 1, "name": "a"}}
//!   ]
//! }
//! ```

use crate::error::{ErrorContext, GeoDiffError, ParseErrorKind, Result};
use crate::geometry::{GeometryType, parse_wkt, to_wkt};
use crate::model::{AttributeValue, Dataset, Feature, FieldDef, Schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Serialized dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<GeometryType>,
    #[serde(default)]
    pub schema: Vec<FieldDef>,
    #[serde(default)]
    pub features: Vec<FeatureDocument>,
}

/// Serialized feature: WKT geometry and attribute values by field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureDocument {
    pub geometry: String,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeValue>,
}

impl From<&Dataset> for DatasetDocument {
    fn from(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            geometry_type: Some(dataset.geometry_type),
            schema: dataset.schema.fields().to_vec(),
            features: dataset
                .features
                .iter()
                .map(|f| FeatureDocument {
                    geometry: to_wkt(&f.geometry),
                    attributes: f.attributes.clone(),
                })
                .collect(),
        }
    }
}

impl DatasetDocument {
    /// Validate and convert into the in-memory model, keeping feature order.
    pub fn into_dataset(self) -> Result<Dataset> {
        let mut seen = HashSet::new();
        for field in &self.schema {
            if !seen.insert(field.name.as_str()) {
                return Err(GeoDiffError::parse(
                    "reading schema",
                    ParseErrorKind::DuplicateField(field.name.clone()),
                ));
            }
        }
        let schema = Schema::new(self.schema);

        let mut features = Vec::with_capacity(self.features.len());
        for (seqno, doc) in self.features.into_iter().enumerate() {
            features.push(convert_feature(&schema, seqno, doc)?);
        }

        let geometry_type = self
            .geometry_type
            .or_else(|| {
                features
                    .first()
                    .map(|f: &Feature| GeometryType::from_geometry(&f.geometry))
            })
            .unwrap_or(GeometryType::GeometryCollection);

        Ok(Dataset {
            name: self.name,
            geometry_type,
            schema,
            features,
        })
    }
}

fn convert_feature(schema: &Schema, seqno: usize, doc: FeatureDocument) -> Result<Feature> {
    let geometry =
        parse_wkt(&doc.geometry).with_context(|| format!("feature {seqno}"))?;

    let mut attributes = IndexMap::with_capacity(doc.attributes.len());
    for (name, value) in doc.attributes {
        let Some(field) = schema.field(&name) else {
            return Err(GeoDiffError::parse(
                "reading features",
                ParseErrorKind::UnknownField { field: name, seqno },
            ));
        };
        let found = value.type_name();
        let Some(value) = field.field_type.coerce(value) else {
            return Err(GeoDiffError::parse(
                "reading features",
                ParseErrorKind::TypeMismatch {
                    field: name,
                    expected: field.field_type.to_string(),
                    found: found.to_string(),
                    seqno,
                },
            ));
        };
        attributes.insert(name, value);
    }

    Ok(Feature {
        geometry: Arc::new(geometry),
        attributes,
    })
}
