//! Model metadata: the per-entity records a type tree is built from
//!
//! The loader hands over one record per model entity. The raw shape follows
//! the metamodel JSON used by web BIM viewers, where every field is optional.
//! [`MetadataSet::from_meta_objects`] is the single place where that loose
//! shape is checked. Past it, every record has a non-empty id.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A single property of a property set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    #[serde(default)]
    pub name: String,
    /// Property value, kept as raw JSON
    #[serde(default)]
    pub value: Value,
}

/// A named group of properties attached to an entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySet {
    /// Property set id
    #[serde(default)]
    pub id: Option<String>,
    /// Property set name, e.g. `Pset_WallCommon`
    #[serde(default)]
    pub name: Option<String>,
    /// Property set type
    #[serde(default, rename = "type")]
    pub set_type: Option<String>,
    /// Properties in document order
    ///
    /// Accepts either an array of `{name, value}` objects or an object keyed
    /// by property name. In the keyed form a value that is itself an object
    /// with a `value` field is unwrapped to that field.
    #[serde(
        default,
        alias = "_properties",
        deserialize_with = "deserialize_properties"
    )]
    pub properties: Vec<Property>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyList {
    List(Vec<Property>),
    Keyed(serde_json::Map<String, Value>),
}

fn deserialize_properties<'de, D>(deserializer: D) -> std::result::Result<Vec<Property>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PropertyList::deserialize(deserializer)? {
        PropertyList::List(properties) => properties,
        PropertyList::Keyed(map) => map
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::Object(mut inner) if inner.contains_key("value") => {
                        inner.remove("value").unwrap_or(Value::Null)
                    }
                    other => other,
                };
                Property { name, value }
            })
            .collect(),
    })
}

/// Raw metadata of one entity as it appears in a metamodel document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaObject {
    /// Entity id
    #[serde(default)]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Type classification, e.g. `IfcWall`
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    /// Id of the parent entity
    #[serde(default)]
    pub parent: Option<String>,
    /// Inline property sets
    #[serde(default)]
    pub property_sets: Vec<PropertySet>,
    /// References into the document-level property sets
    #[serde(default)]
    pub property_set_ids: Vec<String>,
}

/// Validated metadata of one entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRecord {
    /// Entity id, never empty
    pub id: String,
    /// Type classification, empty when the entity has none
    pub object_type: String,
    /// Display name, possibly empty
    pub name: String,
}

impl ObjectRecord {
    /// Create a new record
    pub fn new(
        id: impl Into<String>,
        object_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            name: name.into(),
        }
    }

    /// Text shown for this entity: its name, or its id when unnamed
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether the record carries a type
    pub fn has_type(&self) -> bool {
        !self.object_type.is_empty()
    }
}

/// One row of a property table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    /// Name of the property set the property belongs to
    pub set: String,
    /// Property name
    pub name: String,
    /// Property value rendered as text
    pub value: String,
}

/// Flatten every property set of an entity into table rows
///
/// A set is labelled by its name, then its id, then `Pset`. String values
/// are used as-is; anything else is rendered as JSON text.
pub fn property_rows(object: &MetaObject) -> Vec<PropertyRow> {
    rows_from_sets(&object.property_sets)
}

fn rows_from_sets(sets: &[PropertySet]) -> Vec<PropertyRow> {
    let mut rows = Vec::new();
    for set in sets {
        let set_name = set
            .name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(set.id.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Pset");
        for property in &set.properties {
            rows.push(PropertyRow {
                set: set_name.to_string(),
                name: property.name.clone(),
                value: value_text(&property.value),
            });
        }
    }
    rows
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Insertion-ordered set of entity records, keyed by id
///
/// Iteration follows the order records were first inserted. Inserting a
/// record whose id is already present replaces the old record in place.
#[derive(Debug, Clone, Default)]
pub struct MetadataSet {
    records: Vec<ObjectRecord>,
    index: HashMap<String, usize>,
    property_sets: HashMap<String, Vec<PropertySet>>,
}

impl MetadataSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from already validated records
    ///
    /// Records with an empty id are skipped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ObjectRecord>,
    {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Build a set from raw metamodel objects
    ///
    /// Objects without an id are dropped. Objects without a type are kept
    /// with an empty type so the tree builder decides what to do with them.
    pub fn from_meta_objects(objects: Vec<MetaObject>) -> Self {
        let mut set = Self::new();
        for object in objects {
            let id = match object.id.filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => {
                    debug!(
                        "skipping metadata object without id (type {:?}, name {:?})",
                        object.object_type, object.name
                    );
                    continue;
                }
            };
            let record = ObjectRecord {
                id: id.clone(),
                object_type: object.object_type.unwrap_or_default(),
                name: object.name.unwrap_or_default(),
            };
            if set.insert(record) {
                if object.property_sets.is_empty() {
                    set.property_sets.remove(&id);
                } else {
                    set.property_sets.insert(id, object.property_sets);
                }
            }
        }
        set
    }

    /// Parse a metamodel JSON document
    ///
    /// `metaObjects` may be an array of objects or a map from id to object.
    /// Property sets referenced through `propertySetIds` are resolved
    /// against the document-level `propertySets` list.
    ///
    /// # Example
    ///
    /// ```
    /// use ifc_typetree::MetadataSet;
    ///
    /// # fn main() -> ifc_typetree::Result<()> {
    /// let json = r#"{
    ///     "metaObjects": [
    ///         { "id": "w1", "name": "Wall 1", "type": "IfcWall" },
    ///         { "id": "d1", "name": "Door 1", "type": "IfcDoor" }
    ///     ]
    /// }"#;
    /// let metadata = MetadataSet::from_json_str(json)?;
    /// assert_eq!(metadata.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Parse a metamodel JSON document from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Parse a metamodel JSON document from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_document(mut document: Value) -> Result<Self> {
        let root = document
            .as_object_mut()
            .ok_or_else(|| Error::invalid_metadata("document root must be an object"))?;

        let shared_sets: Vec<PropertySet> = match root.remove("propertySets") {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };

        let mut objects: Vec<MetaObject> = match root.remove("metaObjects") {
            Some(Value::Array(items)) => serde_json::from_value(Value::Array(items))?,
            Some(Value::Object(map)) => map
                .into_iter()
                .map(|(key, item)| -> std::result::Result<MetaObject, serde_json::Error> {
                    let mut object: MetaObject = serde_json::from_value(item)?;
                    if object.id.as_deref().is_none_or(str::is_empty) {
                        object.id = Some(key);
                    }
                    Ok(object)
                })
                .collect::<std::result::Result<_, serde_json::Error>>()?,
            Some(_) => {
                return Err(Error::invalid_metadata(
                    "metaObjects must be an array or an object",
                ));
            }
            None => return Err(Error::invalid_metadata("missing metaObjects")),
        };

        if !shared_sets.is_empty() {
            let by_id: HashMap<&str, &PropertySet> = shared_sets
                .iter()
                .filter_map(|set| set.id.as_deref().map(|id| (id, set)))
                .collect();
            for object in &mut objects {
                for set_id in &object.property_set_ids {
                    match by_id.get(set_id.as_str()) {
                        Some(set) => object.property_sets.push((*set).clone()),
                        None => debug!("unresolved property set {}", set_id),
                    }
                }
            }
        }

        Ok(Self::from_meta_objects(objects))
    }

    /// Insert a record, returning whether it was accepted
    ///
    /// A record with an existing id replaces the old one at its original
    /// position.
    pub fn insert(&mut self, record: ObjectRecord) -> bool {
        if record.id.is_empty() {
            debug!("skipping record without id");
            return false;
        }
        match self.index.get(&record.id) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
        true
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&ObjectRecord> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    /// Property table rows of an entity, if it has any property sets
    pub fn property_rows(&self, id: &str) -> Option<Vec<PropertyRow>> {
        self.property_sets.get(id).map(|sets| rows_from_sets(sets))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.iter()
    }
}

impl FromIterator<ObjectRecord> for MetadataSet {
    fn from_iter<I: IntoIterator<Item = ObjectRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
