//! Response side: schemas and payload validation.

mod decoder;
mod raw;
mod schema;

pub use self::decoder::{decode, decode_response, decode_value, decode_with};
pub use self::raw::RawResponse;
pub use self::schema::{FieldType, ResponseField, ResponseSchema, ResponseSchemaBuilder};
