//! Per-type mapping tables and the label cache, kept in a type-indexed registry.
//!
//! A [`ResourceSchema`] is built once per resource type on first use and lives
//! for the rest of the process. Its label cache only grows: every decoded
//! payload entry records its label under the API field name, and a later
//! payload with a different label for the same name replaces it.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::models::mapping::FieldMapping;
use crate::models::resource::Resource;

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, &'static ResourceSchema>>> = OnceLock::new();

/// Schema of `T`, registered on first call.
pub fn schema<T: Resource>() -> &'static ResourceSchema {
    let registry = REGISTRY.get_or_init(|| RwLock::new(HashMap::new()));
    let type_id = TypeId::of::<T>();

    if let Some(schema) = registry
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
        .copied()
    {
        return schema;
    }

    let mut schemas = registry.write().unwrap_or_else(PoisonError::into_inner);
    *schemas.entry(type_id).or_insert_with(|| {
        log::debug!("registering resource schema for {}", T::KIND);
        let schema: &'static ResourceSchema =
            Box::leak(Box::new(ResourceSchema::new(T::KIND, T::field_mappings())));
        schema
    })
}

/// Mapping table and observed labels of one resource type.
#[derive(Debug)]
pub struct ResourceSchema {
    kind: &'static str,
    mappings: Vec<FieldMapping>,
    by_api_field: HashMap<&'static str, usize>,
    by_local_field: HashMap<&'static str, usize>,
    labels: RwLock<HashMap<String, Option<String>>>,
}

impl ResourceSchema {
    /// Build a schema; API and local field names must be unique.
    pub fn new(kind: &'static str, mappings: Vec<FieldMapping>) -> Self {
        let mut by_api_field = HashMap::with_capacity(mappings.len());
        let mut by_local_field = HashMap::with_capacity(mappings.len());
        for (index, mapping) in mappings.iter().enumerate() {
            let api_clash = by_api_field.insert(mapping.api_field(), index);
            let local_clash = by_local_field.insert(mapping.local_field(), index);
            debug_assert!(
                api_clash.is_none() && local_clash.is_none(),
                "duplicate field mapping '{}' in {}",
                mapping,
                kind
            );
        }

        ResourceSchema {
            kind,
            mappings,
            by_api_field,
            by_local_field,
            labels: RwLock::new(HashMap::new()),
        }
    }

    /// Type tag of the resource.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Mappings in declaration order.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Position of the mapping for an API field name.
    pub fn api_index(&self, api_field: &str) -> Option<usize> {
        self.by_api_field.get(api_field).copied()
    }

    /// Position of the mapping for a local field name.
    pub fn local_index(&self, local_field: &str) -> Option<usize> {
        self.by_local_field.get(local_field).copied()
    }

    /// Last label observed for `api_field`, if any.
    pub fn label(&self, api_field: &str) -> Option<String> {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(api_field)
            .cloned()
            .flatten()
    }

    /// Record the label sent for `key`; the last writer wins.
    pub fn record_label(&self, key: &str, label: Option<&str>) {
        let mut labels = self.labels.write().unwrap_or_else(PoisonError::into_inner);
        labels.insert(key.to_string(), label.map(str::to_string));
    }

    /// Snapshot of every label seen so far.
    pub fn labels(&self) -> HashMap<String, Option<String>> {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mapping::FieldKind;

    fn team_schema() -> ResourceSchema {
        ResourceSchema::new(
            "TestTeam",
            vec![
                FieldMapping::new("id", "id_", FieldKind::integer()),
                FieldMapping::new("name", "name", FieldKind::text()),
            ],
        )
    }

    #[test]
    fn indexes_fields_by_both_names() {
        let schema = team_schema();
        assert_eq!(schema.api_index("id"), Some(0));
        assert_eq!(schema.local_index("id_"), Some(0));
        assert_eq!(schema.api_index("id_"), None);
        assert_eq!(schema.local_index("name"), Some(1));
    }

    #[test]
    fn last_label_wins() {
        let schema = team_schema();
        assert_eq!(schema.label("name"), None);
        schema.record_label("name", Some("Name"));
        schema.record_label("name", Some("Team name"));
        assert_eq!(schema.label("name").as_deref(), Some("Team name"));
        schema.record_label("name", None);
        assert_eq!(schema.label("name"), None);
        assert!(schema.labels().contains_key("name"));
    }

    #[test]
    #[should_panic(expected = "duplicate field mapping")]
    #[cfg(debug_assertions)]
    fn duplicate_names_are_rejected() {
        ResourceSchema::new(
            "Broken",
            vec![
                FieldMapping::new("id", "id_", FieldKind::integer()),
                FieldMapping::new("id", "other", FieldKind::text()),
            ],
        );
    }
}
