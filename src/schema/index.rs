// Field indexes
//
// Builds the id -> field and dotted path -> id maps a schema caches. Both
// are produced by one pre-order walk over the type tree and fail as a whole
// on a malformed tree, so a caller never sees a half-built index.
//
// Path resolution assigns every field a canonical path (with the synthetic
// `element`, `key` and `value` segments spelled out) and a short path that
// skips the `element` of a list of structs and the `value` of a map whose
// value is a struct. Short paths are registered only where they do not
// shadow a canonical path, and the first short path to claim a string keeps
// it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::trace;

use crate::internal::error::{Error, Result};
use crate::schema::field::SchemaField;
use crate::schema::types::{ListType, MapType, StructType, Type};
use crate::schema::utils::build_path;

/// Walks every field below `schema_type` in pre-order, parents before children.
pub fn visit_fields<F>(schema_type: &Type, visit: &mut F) -> Result<()>
where
    F: FnMut(&SchemaField) -> Result<()>,
{
    for field in schema_type.child_fields() {
        visit(field)?;
        visit_fields(&field.field_type, visit)?;
    }
    Ok(())
}

/// Walks every field of a struct and its descendants in pre-order.
pub fn visit_struct_fields<F>(root: &StructType, visit: &mut F) -> Result<()>
where
    F: FnMut(&SchemaField) -> Result<()>,
{
    for field in root.fields() {
        visit(field)?;
        visit_fields(&field.field_type, visit)?;
    }
    Ok(())
}

/// Indexes every field of the tree by id.
///
/// Fails with `InvalidSchema` when an id occurs twice anywhere in the tree.
pub fn index_by_id(root: &StructType) -> Result<HashMap<i32, SchemaField>> {
    let mut index = HashMap::new();
    visit_struct_fields(root, &mut |field| match index.entry(field.id) {
        Entry::Occupied(_) => Err(Error::InvalidSchema(format!(
            "duplicate field id found: {}",
            field.id
        ))),
        Entry::Vacant(slot) => {
            slot.insert(field.clone());
            Ok(())
        }
    })?;
    Ok(index)
}

/// Collects every field id of the tree in pre-order.
pub fn collect_field_ids(root: &StructType) -> Vec<i32> {
    let mut ids = Vec::new();
    for field in root.fields() {
        push_field_ids(field, &mut ids);
    }
    ids
}

fn push_field_ids(field: &SchemaField, ids: &mut Vec<i32>) {
    ids.push(field.id);
    for child in field.field_type.child_fields() {
        push_field_ids(child, ids);
    }
}

/// Indexes every field of the tree by dotted path.
///
/// With `case_sensitive == false` every segment is ASCII lower-cased, and
/// lookups against the result must fold the query the same way.
pub fn index_by_name(root: &StructType, case_sensitive: bool) -> Result<HashMap<String, i32>> {
    let mut indexer = NameIndexer::new(case_sensitive);
    indexer.visit_struct(root, "", "")?;
    Ok(indexer.finish())
}

/// Accumulates canonical and short paths during one walk.
struct NameIndexer {
    case_sensitive: bool,
    canonical: HashMap<String, i32>,
    short: HashMap<String, i32>,
}

impl NameIndexer {
    fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            canonical: HashMap::new(),
            short: HashMap::new(),
        }
    }

    fn visit(&mut self, schema_type: &Type, path: &str, short_path: &str) -> Result<()> {
        match schema_type {
            Type::Primitive(_) => Ok(()),
            Type::Struct(s) => self.visit_struct(s, path, short_path),
            Type::List(l) => self.visit_list(l, path, short_path),
            Type::Map(m) => self.visit_map(m, path, short_path),
        }
    }

    fn visit_struct(&mut self, s: &StructType, path: &str, short_path: &str) -> Result<()> {
        for field in s.fields() {
            let new_path = build_path(path, &field.name, self.case_sensitive);
            let new_short_path = build_path(short_path, &field.name, self.case_sensitive);
            self.register(field, new_path, new_short_path)?;
        }
        Ok(())
    }

    fn visit_list(&mut self, l: &ListType, path: &str, short_path: &str) -> Result<()> {
        let element = l.element();
        let new_path = build_path(path, &element.name, self.case_sensitive);
        // Children of a struct element hang directly off the list's short path.
        let new_short_path = if element.field_type.is_struct() {
            short_path.to_string()
        } else {
            build_path(short_path, &element.name, self.case_sensitive)
        };
        self.register(element, new_path, new_short_path)
    }

    fn visit_map(&mut self, m: &MapType, path: &str, short_path: &str) -> Result<()> {
        let key = m.key();
        let key_path = build_path(path, &key.name, self.case_sensitive);
        let key_short_path = build_path(short_path, &key.name, self.case_sensitive);
        self.register(key, key_path, key_short_path)?;

        let value = m.value();
        let value_path = build_path(path, &value.name, self.case_sensitive);
        let value_short_path = if value.field_type.is_struct() {
            short_path.to_string()
        } else {
            build_path(short_path, &value.name, self.case_sensitive)
        };
        self.register(value, value_path, value_short_path)
    }

    /// Records both paths of `field`, then descends into its type.
    fn register(&mut self, field: &SchemaField, path: String, short_path: String) -> Result<()> {
        if let Some(prev) = self.canonical.get(&path) {
            return Err(Error::InvalidSchema(format!(
                "duplicate path found: {}, prev id: {}, curr id: {}",
                path, prev, field.id
            )));
        }
        self.canonical.insert(path.clone(), field.id);

        match self.short.entry(short_path.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(field.id);
            }
            Entry::Occupied(slot) if *slot.get() != field.id => {
                trace!(
                    "short path {} already taken by id {}, skipping id {}",
                    slot.key(),
                    slot.get(),
                    field.id
                );
            }
            Entry::Occupied(_) => {}
        }

        self.visit(&field.field_type, &path, &short_path)
    }

    /// Merges short paths into the canonical map without overriding it.
    fn finish(self) -> HashMap<String, i32> {
        let mut index = self.canonical;
        for (short_path, id) in self.short {
            match index.entry(short_path) {
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
                Entry::Occupied(slot) if *slot.get() != id => {
                    trace!(
                        "short path {} shadowed by canonical path of id {}, dropping id {}",
                        slot.key(),
                        slot.get(),
                        id
                    );
                }
                Entry::Occupied(_) => {}
            }
        }
        index
    }
}
