use std::collections::HashSet;

use crate::ConfigurationError;

/// The expected type of a response field.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum FieldType {
    /// A JSON string.
    #[display("string")]
    String,
    /// A JSON number without fractional part.
    #[display("integer")]
    Integer,
    /// Any JSON number.
    #[display("number")]
    Number,
    /// A JSON boolean.
    #[display("boolean")]
    Boolean,
    /// A JSON string among the listed values.
    #[display("one of {_0:?}")]
    Enum(Vec<String>),
    /// A nested object, validated against its own schema.
    #[display("object")]
    Object(ResponseSchema),
    /// A JSON array whose items all have the same type.
    #[display("array of {_0}")]
    Array(Box<FieldType>),
    /// Any JSON value, `null` included.
    #[display("any")]
    Any,
}

impl FieldType {
    /// An enumerated string type.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// An array type.
    #[must_use]
    pub fn array_of(item: Self) -> Self {
        Self::Array(Box::new(item))
    }

    fn check(&self, field: &str) -> Result<(), ConfigurationError> {
        match self {
            Self::Enum(values) if values.is_empty() => {
                Err(ConfigurationError::UnsupportedFieldType {
                    field: field.to_string(),
                    reason: "enumeration without any value".to_string(),
                })
            }
            Self::Array(item) => item.check(field),
            _ => Ok(()),
        }
    }
}

/// A field of a [`ResponseSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseField {
    name: String,
    alias: String,
    field_type: FieldType,
    required: bool,
}

impl ResponseField {
    /// A field that must be present in the payload.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            field_type,
            required: true,
        }
    }

    /// A field that may be absent or `null`.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    /// Sets the key used in the payload.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key looked up in the payload.
    #[must_use]
    pub fn wire_alias(&self) -> &str {
        &self.alias
    }

    /// The expected type.
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Whether the field must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Describes the fields expected in a JSON object response.
///
/// Keys of the payload not declared in the schema are ignored.
///
/// # Examples
///
/// ```rust
/// use reqmodel_core::{FieldType, ResponseField, ResponseSchema};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = ResponseSchema::builder()
///     .field(
///         ResponseField::required("database_backend", FieldType::one_of(["working"]))
///             .alias("DatabaseBackend"),
///     )
///     .field(ResponseField::optional("stream", FieldType::String).alias("Meldingen stroom"))
///     .build()?;
///
/// assert_eq!(schema.fields().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSchema {
    fields: Vec<ResponseField>,
}

impl ResponseSchema {
    /// Starts declaring a schema.
    #[must_use]
    pub fn builder() -> ResponseSchemaBuilder {
        ResponseSchemaBuilder::default()
    }

    /// The fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[ResponseField] {
        &self.fields
    }

    /// Finds a field by declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ResponseField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Builder for [`ResponseSchema`].
#[derive(Debug, Clone, Default)]
pub struct ResponseSchemaBuilder {
    fields: Vec<ResponseField>,
}

impl ResponseSchemaBuilder {
    /// Declares a field.
    #[must_use]
    pub fn field(mut self, field: ResponseField) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares several fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = ResponseField>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Validates the declaration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] on duplicate names or aliases,
    /// or on an enumeration without values.
    pub fn build(self) -> Result<ResponseSchema, ConfigurationError> {
        let mut names = HashSet::new();
        let mut aliases = HashSet::new();

        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(ConfigurationError::DuplicateField {
                    field: field.name.clone(),
                });
            }
            if !aliases.insert(field.alias.as_str()) {
                return Err(ConfigurationError::DuplicateAlias {
                    alias: field.alias.clone(),
                });
            }
            field.field_type.check(&field.name)?;
        }

        Ok(ResponseSchema {
            fields: self.fields,
        })
    }
}
