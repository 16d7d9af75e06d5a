// Schema facade
//
// A schema is a root struct plus an optional schema id. Lookups are served
// from indexes that are built on first use and then cached for the lifetime
// of the schema; the caches are derived data and take no part in equality.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use once_cell::sync::OnceCell;

use crate::internal::error::Result;
use crate::schema::field::SchemaField;
use crate::schema::index;
use crate::schema::projection::{ProjectionConfig, ProjectionMode, SchemaProjector};
use crate::schema::types::StructType;
use crate::schema::utils::fold_case;

/// Schema id given to the first schema of a table.
pub const INITIAL_SCHEMA_ID: i32 = 0;

/// Represents a table schema
pub struct Schema {
    root: StructType,
    schema_id: Option<i32>,
    id_to_field: OnceCell<HashMap<i32, SchemaField>>,
    name_to_id: OnceCell<HashMap<String, i32>>,
    lowercase_name_to_id: OnceCell<HashMap<String, i32>>,
}

impl Schema {
    /// Creates a new schema from its top-level fields
    pub fn new(fields: Vec<SchemaField>, schema_id: Option<i32>) -> Self {
        Self::from_struct(StructType::new(fields), schema_id)
    }

    /// Creates a new schema around an existing root struct
    pub fn from_struct(root: StructType, schema_id: Option<i32>) -> Self {
        Self {
            root,
            schema_id,
            id_to_field: OnceCell::new(),
            name_to_id: OnceCell::new(),
            lowercase_name_to_id: OnceCell::new(),
        }
    }

    /// Returns the schema id, if one was assigned
    pub fn schema_id(&self) -> Option<i32> {
        self.schema_id
    }

    /// Returns the top-level fields
    pub fn fields(&self) -> &[SchemaField] {
        self.root.fields()
    }

    /// Returns the root struct
    pub fn as_struct(&self) -> &StructType {
        &self.root
    }

    /// Finds a field anywhere in the tree by id.
    ///
    /// Returns `Ok(None)` when no field has this id, and an `InvalidSchema`
    /// error when the tree repeats an id.
    pub fn find_field_by_id(&self, field_id: i32) -> Result<Option<&SchemaField>> {
        Ok(self.id_index()?.get(&field_id))
    }

    /// Finds a field by dotted path.
    ///
    /// Canonical paths spell out the `element`, `key` and `value` segments of
    /// lists and maps. For a list of structs, or a map whose value is a
    /// struct, the struct's children are also reachable through a short path
    /// that skips that segment (`l.x` for `l.element.x`, `m.x` for
    /// `m.value.x`) as long as the short path does not clash with a
    /// canonical one.
    pub fn find_field_by_name(
        &self,
        name: &str,
        case_sensitive: bool,
    ) -> Result<Option<&SchemaField>> {
        let field_id = if case_sensitive {
            self.name_index()?.get(name).copied()
        } else {
            self.lowercase_name_index()?.get(&fold_case(name)).copied()
        };

        match field_id {
            Some(id) => self.find_field_by_id(id),
            None => Ok(None),
        }
    }

    /// Finds a field by dotted path, matching case exactly
    pub fn find_field_by_name_case_sensitive(&self, name: &str) -> Result<Option<&SchemaField>> {
        self.find_field_by_name(name, true)
    }

    /// Returns every field id in the tree, parents before children.
    ///
    /// Fails like `find_field_by_id` when the tree repeats an id.
    pub fn field_ids(&self) -> Result<Vec<i32>> {
        self.id_index()?;
        Ok(index::collect_field_ids(&self.root))
    }

    /// Returns the largest field id in the tree, or 0 for an empty schema
    pub fn highest_field_id(&self) -> Result<i32> {
        Ok(self.id_index()?.keys().copied().max().unwrap_or(0))
    }

    /// Selects fields by name, keeping each selected field's whole subtree.
    ///
    /// `["*"]` selects everything. Names that do not resolve are skipped.
    pub fn select<S: AsRef<str>>(&self, names: &[S], case_sensitive: bool) -> Result<Schema> {
        SchemaProjector::with_config(ProjectionConfig {
            mode: ProjectionMode::FullType,
            case_sensitive,
        })
        .select(self, names)
    }

    /// Projects the schema onto a set of field ids.
    ///
    /// Selecting a struct field without any of its children keeps it as an
    /// empty struct. Lists and maps are projected through their element or
    /// value ids and cannot be selected wholesale.
    pub fn project<I: IntoIterator<Item = i32>>(&self, field_ids: I) -> Result<Schema> {
        SchemaProjector::new().project(self, field_ids)
    }

    fn id_index(&self) -> Result<&HashMap<i32, SchemaField>> {
        self.id_to_field.get_or_try_init(|| {
            let index = index::index_by_id(&self.root)?;
            debug!(
                "built id index for schema {:?}: {} fields",
                self.schema_id,
                index.len()
            );
            Ok(index)
        })
    }

    fn name_index(&self) -> Result<&HashMap<String, i32>> {
        self.name_to_id.get_or_try_init(|| {
            let index = index::index_by_name(&self.root, true)?;
            debug!(
                "built name index for schema {:?}: {} paths",
                self.schema_id,
                index.len()
            );
            Ok(index)
        })
    }

    fn lowercase_name_index(&self) -> Result<&HashMap<String, i32>> {
        self.lowercase_name_to_id.get_or_try_init(|| {
            let index = index::index_by_name(&self.root, false)?;
            debug!(
                "built case-insensitive name index for schema {:?}: {} paths",
                self.schema_id,
                index.len()
            );
            Ok(index)
        })
    }

    #[cfg(test)]
    pub(crate) fn indexes_built(&self) -> (bool, bool, bool) {
        (
            self.id_to_field.get().is_some(),
            self.name_to_id.get().is_some(),
            self.lowercase_name_to_id.get().is_some(),
        )
    }
}

// Cloning never carries over the caches.
impl Clone for Schema {
    fn clone(&self) -> Self {
        Self::from_struct(self.root.clone(), self.schema_id)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.schema_id == other.schema_id && self.root == other.root
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("schema_id", &self.schema_id)
            .field("fields", &self.root.fields())
            .finish()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema<")?;
        for field in self.root.fields() {
            writeln!(f, "  {}", field)?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::error::ErrorKind;
    use crate::schema::types::{ListType, MapType, PrimitiveType};

    fn simple() -> Schema {
        Schema::new(
            vec![
                SchemaField::required(5, "foo", PrimitiveType::Int),
                SchemaField::optional(7, "bar", PrimitiveType::String),
            ],
            Some(100),
        )
    }

    #[test]
    fn test_basics() {
        let schema = simple();
        assert_eq!(schema, schema);
        assert_eq!(schema.schema_id(), Some(100));
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.as_struct().field_by_index(1).map(|f| f.id), Some(7));
        assert_eq!(schema.find_field_by_id(5).unwrap().map(|f| f.name.as_str()), Some("foo"));
        assert!(schema.find_field_by_id(0).unwrap().is_none());
        assert!(schema.find_field_by_name_case_sensitive("element").unwrap().is_none());
    }

    #[test]
    fn test_equality_ignores_caches() {
        let warmed = simple();
        warmed.find_field_by_name("foo", false).unwrap();
        assert_eq!(warmed, simple());

        assert_ne!(simple(), Schema::new(simple().fields().to_vec(), Some(101)));
        assert_ne!(simple(), Schema::new(simple().fields().to_vec(), None));
        assert_ne!(
            simple(),
            Schema::new(vec![SchemaField::required(5, "foo", PrimitiveType::Int)], Some(100))
        );
    }

    #[test]
    fn test_caches_are_built_lazily_and_independently() {
        let schema = simple();
        assert_eq!(schema.indexes_built(), (false, false, false));

        schema.find_field_by_id(5).unwrap();
        assert_eq!(schema.indexes_built(), (true, false, false));

        schema.find_field_by_name("FOO", false).unwrap();
        assert_eq!(schema.indexes_built(), (true, false, true));

        schema.find_field_by_name("foo", true).unwrap();
        assert_eq!(schema.indexes_built(), (true, true, true));

        assert_eq!(schema.clone().indexes_built(), (false, false, false));
    }

    #[test]
    fn test_failed_build_leaves_cache_empty() {
        let schema = Schema::new(
            vec![
                SchemaField::required(1, "a", PrimitiveType::Int),
                SchemaField::required(1, "b", PrimitiveType::Int),
            ],
            None,
        );
        let err = schema.find_field_by_id(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert_eq!(schema.indexes_built(), (false, false, false));

        // The name index is fine, the id lookup behind it is not.
        let err = schema.find_field_by_name("a", true).unwrap_err();
        assert_eq!(err.message(), "duplicate field id found: 1");
        assert_eq!(schema.indexes_built(), (false, true, false));
    }

    #[test]
    fn test_field_ids_reject_duplicate_ids() {
        let inner = StructType::new(vec![SchemaField::optional(2, "x", PrimitiveType::Int)]);
        let schema = Schema::new(
            vec![
                SchemaField::required(2, "a", PrimitiveType::Int),
                SchemaField::optional(1, "s", inner),
            ],
            None,
        );
        let err = schema.field_ids().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert_eq!(err.message(), "duplicate field id found: 2");
        assert_eq!(schema.highest_field_id().unwrap_err(), err);
    }

    #[test]
    fn test_highest_field_id() {
        let schema = Schema::new(
            vec![
                SchemaField::required(3, "a", PrimitiveType::Int),
                SchemaField::optional(1, "l", ListType::of(12, PrimitiveType::Long, true)),
                SchemaField::optional(
                    2,
                    "m",
                    MapType::of(8, PrimitiveType::String, 9, PrimitiveType::Int, true),
                ),
            ],
            None,
        );
        assert_eq!(schema.highest_field_id().unwrap(), 12);
        assert_eq!(schema.field_ids().unwrap(), vec![3, 1, 12, 2, 8, 9]);
        assert_eq!(Schema::new(vec![], None).highest_field_id().unwrap(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            simple().to_string(),
            "schema<\n  5: foo: int (required)\n  7: bar: string (optional)\n>"
        );
    }
}
