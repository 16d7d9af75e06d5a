// table-schema library entry point
//
// Field lookup and column projection for the nested schemas of analytic
// table formats.

pub mod internal;
pub mod schema;

pub use crate::internal::error::{Error, ErrorKind, Result};
pub use crate::schema::{
    ListType, MapType, PrimitiveType, Schema, SchemaField, StructType, Type, TypeRef,
};
