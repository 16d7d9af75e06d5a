// Type tree for table schemas
//
// This module defines the immutable nodes a schema is built from. Nested
// nodes hold their children through `TypeRef` so that a projection can hand
// an unchanged subtree to a new parent without copying it.

use std::fmt;
use std::sync::Arc;

use crate::schema::field::SchemaField;

/// Shared handle to an immutable type node.
pub type TypeRef = Arc<Type>;

/// Name of the single child field of a list.
pub const LIST_ELEMENT_NAME: &str = "element";
/// Name of the key child field of a map.
pub const MAP_KEY_NAME: &str = "key";
/// Name of the value child field of a map.
pub const MAP_VALUE_NAME: &str = "value";

/// Represents the primitive (leaf) types supported in a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// True or false
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point (IEEE 754)
    Float,
    /// 64-bit floating point (IEEE 754)
    Double,
    /// Fixed-point decimal
    Decimal { precision: u32, scale: u32 },
    /// Calendar date without time zone
    Date,
    /// Time of day without date or time zone
    Time,
    /// Timestamp without time zone
    Timestamp,
    /// Timestamp with time zone
    TimestampTz,
    /// UTF-8 encoded string
    String,
    /// Universally unique identifier
    Uuid,
    /// Fixed-length byte array
    Fixed(u64),
    /// Arbitrary-length byte array
    Binary,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Int => write!(f, "int"),
            PrimitiveType::Long => write!(f, "long"),
            PrimitiveType::Float => write!(f, "float"),
            PrimitiveType::Double => write!(f, "double"),
            PrimitiveType::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)
            }
            PrimitiveType::Date => write!(f, "date"),
            PrimitiveType::Time => write!(f, "time"),
            PrimitiveType::Timestamp => write!(f, "timestamp"),
            PrimitiveType::TimestampTz => write!(f, "timestamptz"),
            PrimitiveType::String => write!(f, "string"),
            PrimitiveType::Uuid => write!(f, "uuid"),
            PrimitiveType::Fixed(len) => write!(f, "fixed({})", len),
            PrimitiveType::Binary => write!(f, "binary"),
        }
    }
}

/// A node of the type tree
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Leaf type
    Primitive(PrimitiveType),
    /// Ordered, named fields
    Struct(StructType),
    /// Repeated element field
    List(ListType),
    /// Key field paired with a value field
    Map(MapType),
}

impl Type {
    /// Returns true if this type is a primitive
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Returns true if this type is a struct
    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    /// Returns true if this type has child fields (struct, list, map)
    pub fn is_nested(&self) -> bool {
        !self.is_primitive()
    }

    /// Returns the struct behind this type, if it is one
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the direct child fields of this type, in declaration order.
    ///
    /// Primitives have none, a list has its element, a map has its key then
    /// its value.
    pub fn child_fields(&self) -> Vec<&SchemaField> {
        match self {
            Type::Primitive(_) => Vec::new(),
            Type::Struct(s) => s.fields().iter().collect(),
            Type::List(l) => vec![l.element()],
            Type::Map(m) => vec![m.key(), m.value()],
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Struct(s) => write!(f, "{}", s),
            Type::List(l) => write!(f, "{}", l),
            Type::Map(m) => write!(f, "{}", m),
        }
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}

impl From<StructType> for Type {
    fn from(s: StructType) -> Self {
        Type::Struct(s)
    }
}

impl From<ListType> for Type {
    fn from(l: ListType) -> Self {
        Type::List(l)
    }
}

impl From<MapType> for Type {
    fn from(m: MapType) -> Self {
        Type::Map(m)
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(p: PrimitiveType) -> Self {
        Arc::new(Type::Primitive(p))
    }
}

impl From<StructType> for TypeRef {
    fn from(s: StructType) -> Self {
        Arc::new(Type::Struct(s))
    }
}

impl From<ListType> for TypeRef {
    fn from(l: ListType) -> Self {
        Arc::new(Type::List(l))
    }
}

impl From<MapType> for TypeRef {
    fn from(m: MapType) -> Self {
        Arc::new(Type::Map(m))
    }
}

/// Ordered collection of named, typed fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    fields: Vec<SchemaField>,
}

impl StructType {
    /// Creates a struct from its fields, keeping their order
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// Returns the fields in declaration order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Returns true if the struct has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Gets a direct child field by id (no recursion)
    pub fn field_by_id(&self, id: i32) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Gets a direct child field by position
    pub fn field_by_index(&self, index: usize) -> Option<&SchemaField> {
        self.fields.get(index)
    }

    /// Gets a direct child field by exact name (no path parsing)
    pub fn field_by_name(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "struct<")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, ">")
    }
}

/// List of a single element field
#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    element: SchemaField,
}

impl ListType {
    /// Creates a list over the given element field
    pub fn new(element: SchemaField) -> Self {
        Self { element }
    }

    /// Creates a list whose element field is named `element`
    pub fn of(element_id: i32, element_type: impl Into<TypeRef>, optional: bool) -> Self {
        Self::new(SchemaField::list_element(element_id, element_type, optional))
    }

    /// Returns the element field
    pub fn element(&self) -> &SchemaField {
        &self.element
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list<{}>", self.element)
    }
}

/// Map from a key field to a value field
#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    key: SchemaField,
    value: SchemaField,
}

impl MapType {
    /// Creates a map from its key and value fields
    pub fn new(key: SchemaField, value: SchemaField) -> Self {
        Self { key, value }
    }

    /// Creates a map whose children are named `key` and `value`
    pub fn of(
        key_id: i32,
        key_type: impl Into<TypeRef>,
        value_id: i32,
        value_type: impl Into<TypeRef>,
        value_optional: bool,
    ) -> Self {
        Self::new(
            SchemaField::map_key(key_id, key_type),
            SchemaField::map_value(value_id, value_type, value_optional),
        )
    }

    /// Returns the key field
    pub fn key(&self) -> &SchemaField {
        &self.key
    }

    /// Returns the value field
    pub fn value(&self) -> &SchemaField {
        &self.value
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map<{}, {}>", self.key, self.value)
    }
}
