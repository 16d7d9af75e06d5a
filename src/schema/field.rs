// Schema fields
//
// A field binds a stable integer id and a name to a type node. Ids are what
// the index and the projection engine key on; names only matter for path
// resolution.

use std::fmt;
use std::sync::Arc;

use crate::schema::types::{TypeRef, LIST_ELEMENT_NAME, MAP_KEY_NAME, MAP_VALUE_NAME};

/// Represents a field in a struct, or the synthetic child of a list or map
#[derive(Debug, Clone)]
pub struct SchemaField {
    /// Field id, unique within one schema
    pub id: i32,
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: TypeRef,
    /// Whether the field may be null
    pub optional: bool,
    /// Field documentation
    pub doc: Option<String>,
}

impl SchemaField {
    /// Creates a new field
    pub fn new(
        id: i32,
        name: impl Into<String>,
        field_type: impl Into<TypeRef>,
        optional: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            field_type: field_type.into(),
            optional,
            doc: None,
        }
    }

    /// Creates a nullable field
    pub fn optional(id: i32, name: impl Into<String>, field_type: impl Into<TypeRef>) -> Self {
        Self::new(id, name, field_type, true)
    }

    /// Creates a non-nullable field
    pub fn required(id: i32, name: impl Into<String>, field_type: impl Into<TypeRef>) -> Self {
        Self::new(id, name, field_type, false)
    }

    /// Creates the element field of a list
    pub fn list_element(id: i32, field_type: impl Into<TypeRef>, optional: bool) -> Self {
        Self::new(id, LIST_ELEMENT_NAME, field_type, optional)
    }

    /// Creates the key field of a map. Map keys are never null.
    pub fn map_key(id: i32, field_type: impl Into<TypeRef>) -> Self {
        Self::new(id, MAP_KEY_NAME, field_type, false)
    }

    /// Creates the value field of a map
    pub fn map_value(id: i32, field_type: impl Into<TypeRef>, optional: bool) -> Self {
        Self::new(id, MAP_VALUE_NAME, field_type, optional)
    }

    /// Attaches documentation to the field
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Returns a copy of this field pointing at a different type node.
    /// Id, name, nullability and doc are preserved.
    pub fn with_type(&self, field_type: TypeRef) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            field_type,
            optional: self.optional,
            doc: self.doc.clone(),
        }
    }

    /// Returns true if both fields point at the very same type node
    pub fn shares_type_with(&self, field_type: &TypeRef) -> bool {
        Arc::ptr_eq(&self.field_type, field_type)
    }
}

// Documentation is not part of a field's identity.
impl PartialEq for SchemaField {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.optional == other.optional
            && self.field_type == other.field_type
    }
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} ({})",
            self.id,
            self.name,
            self.field_type,
            if self.optional { "optional" } else { "required" }
        )?;
        if let Some(doc) = &self.doc {
            write!(f, " - {}", doc)?;
        }
        Ok(())
    }
}
