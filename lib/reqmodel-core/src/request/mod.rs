//! Request side: field declarations, classification and request building.

mod builder;
mod built;
mod classifier;
mod constraints;
mod field;
mod location;
mod param;
mod schema;
mod template;
mod values;

pub use self::builder::{assemble, build};
pub use self::built::{BuiltRequest, RequestBody};
pub use self::classifier::ClassifiedFields;
pub use self::constraints::{ConstraintViolation, Constraints};
pub use self::field::{Field, FieldDef};
pub use self::location::Location;
pub use self::param::ParamStyle;
pub use self::schema::{RequestSchema, RequestSchemaBuilder};
pub use self::template::UrlTemplate;
pub use self::values::FieldValues;
