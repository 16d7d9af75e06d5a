// Schema module
//
// This module provides field resolution and column projection over nested
// table schemas. It includes:
//
// 1. The immutable type tree (struct, list, map, primitive) and its fields
// 2. Lazily built id and dotted-path indexes, with short aliases through
//    lists and maps
// 3. Name-based selection and id-based projection into new schemas

// Re-export public types and functions
pub use self::core::{Schema, INITIAL_SCHEMA_ID};
pub use self::field::SchemaField;
pub use self::projection::{ProjectionConfig, ProjectionMode, SchemaProjector};
pub use self::types::{
    ListType, MapType, PrimitiveType, StructType, Type, TypeRef, LIST_ELEMENT_NAME, MAP_KEY_NAME,
    MAP_VALUE_NAME,
};

// Sub-modules
pub mod core;
pub mod field;
pub mod index;
pub mod projection;
pub mod types;

// Internal module for shared utilities
mod utils;
