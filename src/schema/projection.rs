// Schema projection
//
// Derives a smaller schema from a set of selected field ids. The walk never
// touches the source schema: kept subtrees are shared by reference, changed
// ones are rebuilt, and anything without a selected field is dropped.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::internal::error::{Error, Result};
use crate::schema::core::Schema;
use crate::schema::field::SchemaField;
use crate::schema::types::{ListType, MapType, StructType, Type, TypeRef};
use crate::schema::utils::is_select_all;

/// How a selected field's subtree is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// A selected field keeps its whole type, whatever is selected below it.
    FullType,
    /// A selected struct field keeps only the descendants that are also
    /// selected. Lists and maps must be reached through their children.
    Recursive,
}

/// Configuration for schema projection
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Mode used by id-based projection
    pub mode: ProjectionMode,

    /// Whether names are matched case-sensitively when selecting by name
    pub case_sensitive: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Recursive,
            case_sensitive: true,
        }
    }
}

/// Schema projector
#[derive(Debug, Clone, Default)]
pub struct SchemaProjector {
    config: ProjectionConfig,
}

impl SchemaProjector {
    /// Creates a new projector with default configuration
    pub fn new() -> Self {
        Self {
            config: ProjectionConfig::default(),
        }
    }

    /// Creates a new projector with custom configuration
    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Selects fields by dotted path, keeping each selected field's whole
    /// type. Unknown names are skipped; `["*"]` copies the schema.
    pub fn select<S: AsRef<str>>(&self, schema: &Schema, names: &[S]) -> Result<Schema> {
        if is_select_all(names) {
            return Ok(schema.clone());
        }

        let mut selected = HashSet::with_capacity(names.len());
        for name in names {
            let field = schema.find_field_by_name(name.as_ref(), self.config.case_sensitive)?;
            if let Some(field) = field {
                selected.insert(field.id);
            }
        }

        prune(schema, &selected, ProjectionMode::FullType)
    }

    /// Projects a schema onto the given field ids using the configured mode
    pub fn project<I>(&self, schema: &Schema, field_ids: I) -> Result<Schema>
    where
        I: IntoIterator<Item = i32>,
    {
        let selected: HashSet<i32> = field_ids.into_iter().collect();
        prune(schema, &selected, self.config.mode)
    }
}

fn prune(schema: &Schema, selected: &HashSet<i32>, mode: ProjectionMode) -> Result<Schema> {
    let pruner = Pruner {
        selected,
        select_full_types: mode == ProjectionMode::FullType,
    };
    let root = pruner.project_struct(schema.as_struct())?.unwrap_or_default();
    debug!(
        "projected schema {:?} in {:?} mode: {} ids requested, {} of {} top-level fields kept",
        schema.schema_id(),
        mode,
        selected.len(),
        root.fields().len(),
        schema.fields().len()
    );
    Ok(Schema::from_struct(root, schema.schema_id()))
}

fn empty_struct() -> TypeRef {
    Arc::new(Type::Struct(StructType::default()))
}

fn explicit_container_error(field: &SchemaField) -> Error {
    Error::InvalidArgument(format!(
        "cannot explicitly project list/map types, field {}: {} of type {} was selected",
        field.id, field.name, field.field_type
    ))
}

/// Projection walk over one selection.
///
/// Every method returns `None` when nothing below the node was selected.
struct Pruner<'a> {
    selected: &'a HashSet<i32>,
    select_full_types: bool,
}

impl Pruner<'_> {
    fn is_selected(&self, field: &SchemaField) -> bool {
        self.selected.contains(&field.id)
    }

    fn project(&self, field_type: &TypeRef) -> Result<Option<TypeRef>> {
        match field_type.as_ref() {
            Type::Primitive(_) => Ok(None),
            Type::Struct(s) => Ok(self.project_struct(s)?.map(TypeRef::from)),
            Type::List(l) => self.project_list(field_type, l),
            Type::Map(m) => self.project_map(field_type, m),
        }
    }

    /// Projection of a selected child whose type must be a struct or a
    /// primitive.
    fn project_selected(&self, field: &SchemaField, result: Option<TypeRef>) -> Result<TypeRef> {
        match field.field_type.as_ref() {
            Type::Struct(_) => Ok(result.unwrap_or_else(empty_struct)),
            Type::Primitive(_) => Ok(Arc::clone(&field.field_type)),
            Type::List(_) | Type::Map(_) => Err(explicit_container_error(field)),
        }
    }

    fn project_struct(&self, s: &StructType) -> Result<Option<StructType>> {
        let mut kept = Vec::with_capacity(s.fields().len());
        let mut same_types = true;

        for field in s.fields() {
            // Always descend first, a malformed selection below a kept field
            // still fails.
            let result = self.project(&field.field_type)?;

            let projected = if self.is_selected(field) {
                if self.select_full_types {
                    Some(Arc::clone(&field.field_type))
                } else {
                    Some(self.project_selected(field, result)?)
                }
            } else {
                result
            };

            if let Some(projected) = projected {
                if field.shares_type_with(&projected) {
                    kept.push(field.clone());
                } else {
                    same_types = false;
                    kept.push(field.with_type(projected));
                }
            }
        }

        if kept.is_empty() {
            Ok(None)
        } else if same_types && kept.len() == s.fields().len() {
            Ok(Some(s.clone()))
        } else {
            Ok(Some(StructType::new(kept)))
        }
    }

    fn project_list(&self, list_type: &TypeRef, list: &ListType) -> Result<Option<TypeRef>> {
        let element = list.element();
        let selected = self.is_selected(element);
        if selected && self.select_full_types {
            return Ok(Some(Arc::clone(list_type)));
        }

        let result = self.project(&element.field_type)?;
        if selected {
            let projected = self.project_selected(element, result)?;
            if element.shares_type_with(&projected) {
                Ok(Some(Arc::clone(list_type)))
            } else {
                Ok(Some(ListType::new(element.with_type(projected)).into()))
            }
        } else if let Some(projected) = result {
            Ok(Some(ListType::new(element.with_type(projected)).into()))
        } else {
            Ok(None)
        }
    }

    fn project_map(&self, map_type: &TypeRef, map: &MapType) -> Result<Option<TypeRef>> {
        let (key, value) = (map.key(), map.value());
        let value_selected = self.is_selected(value);
        if value_selected && self.select_full_types {
            return Ok(Some(Arc::clone(map_type)));
        }

        let key_result = self.project(&key.field_type)?;
        let value_result = self.project(&value.field_type)?;

        if value_selected {
            let projected = self.project_selected(value, value_result)?;
            if value.shares_type_with(&projected) {
                Ok(Some(Arc::clone(map_type)))
            } else {
                Ok(Some(MapType::new(key.clone(), value.with_type(projected)).into()))
            }
        } else if let Some(projected) = value_result {
            Ok(Some(MapType::new(key.clone(), value.with_type(projected)).into()))
        } else if self.is_selected(key) {
            Err(Error::InvalidArgument(format!(
                "cannot project a map without its value field, key field {} was selected",
                key.id
            )))
        } else if key_result.is_some() {
            Err(Error::InvalidArgument(format!(
                "cannot project a map without its value field, fields below key field {} were selected",
                key.id
            )))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::error::ErrorKind;
    use crate::schema::types::PrimitiveType;

    fn tags_schema() -> Schema {
        Schema::new(
            vec![
                SchemaField::required(1, "id", PrimitiveType::Long),
                SchemaField::optional(2, "tags", ListType::of(3, PrimitiveType::String, true)),
            ],
            Some(4),
        )
    }

    #[test]
    fn test_default_config() {
        let projector = SchemaProjector::new();
        assert_eq!(projector.config().mode, ProjectionMode::Recursive);
        assert!(projector.config().case_sensitive);
    }

    #[test]
    fn test_unchanged_subtrees_are_shared() {
        let schema = tags_schema();
        let projected = schema.project([3]).unwrap();
        assert_eq!(projected.fields().len(), 1);
        assert!(projected.fields()[0].shares_type_with(&schema.fields()[1].field_type));
        assert_eq!(projected.schema_id(), Some(4));
    }

    #[test]
    fn test_full_type_mode_for_ids() {
        let projector = SchemaProjector::with_config(ProjectionConfig {
            mode: ProjectionMode::FullType,
            ..ProjectionConfig::default()
        });
        // Selecting a list wholesale is allowed when full types are kept.
        let projected = projector.project(&tags_schema(), [2]).unwrap();
        assert_eq!(projected.fields(), &tags_schema().fields()[1..]);

        let err = SchemaProjector::new().project(&tags_schema(), [2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_select_uses_configured_case_sensitivity() {
        let insensitive = SchemaProjector::with_config(ProjectionConfig {
            mode: ProjectionMode::FullType,
            case_sensitive: false,
        });
        let projected = insensitive.select(&tags_schema(), &["TAGS"]).unwrap();
        assert_eq!(projected.fields().len(), 1);

        let projected = SchemaProjector::new().select(&tags_schema(), &["TAGS"]).unwrap();
        assert!(projected.fields().is_empty());
    }

    #[test]
    fn test_nothing_selected_yields_empty_schema() {
        let projected = tags_schema().project(Vec::new()).unwrap();
        assert!(projected.fields().is_empty());
        assert_eq!(projected.schema_id(), Some(4));

        let projected = tags_schema().project([42]).unwrap();
        assert!(projected.fields().is_empty());
    }
}
