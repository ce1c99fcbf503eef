//! In-memory dataset model: schema, attribute values and features.

use super::GeometryRecord;
use crate::error::Result;
use crate::geometry::GeometryType;
use geo_types::Geometry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A non-geometry attribute value.
///
/// Equality is total: every pair of values is comparable, `Null` equals
/// `Null`, and floats compare by value with `NaN == NaN`. Values of different
/// variants are never equal, so `Int(1) != Float(1.0)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's type, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttributeValue {}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

const NULL: AttributeValue = AttributeValue::Null;

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
}

impl FieldType {
    /// Normalize a decoded value to this field type.
    ///
    /// `Null` fits every type and integers widen to floats; anything else must
    /// already have the declared type. Returns `None` on a mismatch.
    #[must_use]
    pub fn coerce(&self, value: AttributeValue) -> Option<AttributeValue> {
        match (self, value) {
            (_, AttributeValue::Null) => Some(AttributeValue::Null),
            (Self::Bool, v @ AttributeValue::Bool(_))
            | (Self::Int, v @ AttributeValue::Int(_))
            | (Self::Float, v @ AttributeValue::Float(_))
            | (Self::Text, v @ AttributeValue::Text(_)) => Some(v),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float, AttributeValue::Int(i)) => Some(AttributeValue::Float(i as f64)),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// One non-geometry column of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered list of attribute fields. The geometry is not part of the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    #[must_use]
    pub const fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name of the first field whose values differ between two features.
    ///
    /// Every field is compared, nulls included; `None` means the attributes
    /// are equal.
    pub fn first_difference<'s>(&'s self, a: &Feature, b: &Feature) -> Option<&'s str> {
        self.fields
            .iter()
            .find(|field| a.attribute(&field.name) != b.attribute(&field.name))
            .map(|field| field.name.as_str())
    }
}

/// A geometry plus its attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Arc<Geometry<f64>>,
    pub attributes: IndexMap<String, AttributeValue>,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>, attributes: IndexMap<String, AttributeValue>) -> Self {
        Self {
            geometry: Arc::new(geometry),
            attributes,
        }
    }

    /// Value of a field; missing fields read as `Null`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> &AttributeValue {
        self.attributes.get(name).unwrap_or(&NULL)
    }

    /// Set a field value, returning the previous one.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value)
    }
}

/// A whole snapshot: name, schema, geometry type and features in file order.
///
/// A feature's position in `features` is its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub geometry_type: GeometryType,
    pub schema: Schema,
    pub features: Vec<Feature>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, geometry_type: GeometryType, schema: Schema) -> Self {
        Self {
            name: name.into(),
            geometry_type,
            schema,
            features: Vec::new(),
        }
    }

    /// Append a feature, returning its sequence number.
    pub fn push(&mut self, feature: Feature) -> usize {
        self.features.push(feature);
        self.features.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn feature(&self, seqno: usize) -> Option<&Feature> {
        self.features.get(seqno)
    }

    /// Build one [`GeometryRecord`] per feature, in order.
    pub fn records(&self) -> Result<Vec<GeometryRecord>> {
        self.features
            .iter()
            .enumerate()
            .map(|(seqno, f)| GeometryRecord::new(Arc::clone(&f.geometry), seqno))
            .collect()
    }

    /// A dataset with the same name, schema and geometry type holding only
    /// the features at `seqnos`, in the given order.
    pub fn subset(&self, seqnos: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: self.name.clone(),
            geometry_type: self.geometry_type,
            schema: self.schema.clone(),
            features: seqnos
                .into_iter()
                .filter_map(|i| self.features.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    fn feature(attrs: &[(&str, AttributeValue)]) -> Feature {
        Feature::new(
            Geometry::Point(point!(x: 0.0, y: 0.0)),
            attrs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    fn schema() -> Schema {
        Schema::new(vec![
            FieldDef::new("id", FieldType::Int),
            FieldDef::new("name", FieldType::Text),
            FieldDef::new("width", FieldType::Float),
        ])
    }

    #[test]
    fn test_total_equality() {
        assert_eq!(AttributeValue::Null, AttributeValue::Null);
        assert_eq!(AttributeValue::Float(f64::NAN), AttributeValue::Float(f64::NAN));
        assert_eq!(AttributeValue::Float(0.0), AttributeValue::Float(-0.0));
        assert_ne!(AttributeValue::Int(1), AttributeValue::Float(1.0));
        assert_ne!(AttributeValue::Null, AttributeValue::Text(String::new()));
    }

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<AttributeValue> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "x"]"#).expect("valid JSON");
        assert_eq!(
            values,
            vec![
                AttributeValue::Null,
                AttributeValue::Bool(true),
                AttributeValue::Int(3),
                AttributeValue::Float(2.5),
                AttributeValue::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_coerce_widens_int_to_float() {
        assert_eq!(
            FieldType::Float.coerce(AttributeValue::Int(2)),
            Some(AttributeValue::Float(2.0))
        );
        assert_eq!(FieldType::Int.coerce(AttributeValue::Float(2.0)), None);
        assert_eq!(
            FieldType::Text.coerce(AttributeValue::Null),
            Some(AttributeValue::Null)
        );
    }

    #[test]
    fn test_first_difference_compares_nulls() {
        let s = schema();
        let a = feature(&[("id", AttributeValue::Int(1)), ("name", AttributeValue::Null)]);
        let b = feature(&[
            ("id", AttributeValue::Int(1)),
            ("name", AttributeValue::Text("road".to_string())),
        ]);
        assert_eq!(s.first_difference(&a, &b), Some("name"));
        assert_eq!(s.first_difference(&a, &a), None);
    }

    #[test]
    fn test_missing_attribute_reads_null() {
        let s = schema();
        let a = feature(&[("id", AttributeValue::Int(1))]);
        let b = feature(&[("id", AttributeValue::Int(1)), ("width", AttributeValue::Null)]);
        assert!(a.attribute("width").is_null());
        assert_eq!(s.first_difference(&a, &b), None);
    }

    #[test]
    fn test_subset_preserves_schema_and_order() {
        let mut ds = Dataset::new("roads", GeometryType::Point, schema());
        for i in 0..4 {
            ds.push(feature(&[("id", AttributeValue::Int(i))]));
        }
        let sub = ds.subset([3, 1]);
        assert_eq!(sub.schema, ds.schema);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.features[0].attribute("id"), &AttributeValue::Int(3));
        assert_eq!(sub.features[1].attribute("id"), &AttributeValue::Int(1));
    }

    #[test]
    fn test_records_follow_feature_order() {
        let mut ds = Dataset::new("pts", GeometryType::Point, Schema::default());
        ds.push(feature(&[]));
        ds.push(feature(&[]));
        let records = ds.records().expect("points have envelopes");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].seqno(), 1);
    }
}
