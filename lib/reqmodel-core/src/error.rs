use std::error::Error;
use std::fmt::{self, Display};

use crate::request::{ConstraintViolation, Location};

/// Errors raised while declaring a request or response schema.
///
/// These are definition-time errors: a schema that fails to build is a programming
/// mistake, and is expected to surface the first time the schema is used (usually in tests).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum ConfigurationError {
    /// A request field was declared without a location (path, query, header, cookie or body).
    #[display("Field '{field}' has no location")]
    MissingLocation {
        /// The declared field name.
        field: String,
    },

    /// The same declared name appears twice in a schema.
    #[display("Field '{field}' is declared more than once")]
    DuplicateField {
        /// The declared field name.
        field: String,
    },

    /// Two request fields share the same wire name in the same location.
    #[display("Wire name '{name}' is used more than once in {location}")]
    DuplicateWireName {
        /// The location of both fields.
        location: Location,
        /// The conflicting wire name.
        name: String,
    },

    /// Two response fields share the same wire alias.
    #[display("Response alias '{alias}' is used more than once")]
    DuplicateAlias {
        /// The conflicting alias.
        alias: String,
    },

    /// A path field has no matching `{placeholder}` in the URL template.
    #[display("Path field '{field}' has no placeholder in template '{template}'")]
    PathFieldNotInTemplate {
        /// The wire name of the path field.
        field: String,
        /// The URL template.
        template: String,
    },

    /// A URL template placeholder has no matching path field.
    #[display("Placeholder '{placeholder}' of template '{template}' has no path field")]
    PlaceholderWithoutField {
        /// The placeholder name.
        placeholder: String,
        /// The URL template.
        template: String,
    },

    /// A header field targets the `Cookie` header, which is built from cookie fields.
    #[display("Header field '{field}' cannot set the Cookie header, declare cookie fields instead")]
    CookieHeaderField {
        /// The declared field name.
        field: String,
    },

    /// The URL template is malformed.
    #[display("Invalid URL template '{template}': {reason}")]
    InvalidTemplate {
        /// The URL template.
        template: String,
        /// Why the template was rejected.
        reason: String,
    },

    /// A parameter style cannot be used for the field location.
    #[display("Style {style} is not supported for {location} field '{field}'")]
    UnsupportedStyle {
        /// The declared field name.
        field: String,
        /// The field location.
        location: Location,
        /// The rejected style.
        style: String,
    },

    /// A field pattern is not a valid regular expression.
    #[display("Invalid pattern for field '{field}': {reason}")]
    InvalidPattern {
        /// The declared field name.
        field: String,
        /// The regex compilation error.
        reason: String,
    },

    /// A field default value does not satisfy the field constraints.
    #[display("Default value of field '{field}' is invalid: {reason}")]
    InvalidDefault {
        /// The declared field name.
        field: String,
        /// The violated constraints.
        reason: String,
    },

    /// A response field type cannot be used for decoding.
    #[display("Response field '{field}' has an unsupported type: {reason}")]
    UnsupportedFieldType {
        /// The declared field name.
        field: String,
        /// Why the type was rejected.
        reason: String,
    },
}

/// Errors raised while turning a request description into a [`BuiltRequest`](crate::BuiltRequest).
///
/// A build error aborts the current request only, no partial request is ever returned.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum BuildError {
    /// The URL template still has placeholders without a path value.
    #[display("URL template '{template}' is missing values for: {missings:?}")]
    #[from(skip)]
    TemplateUnresolved {
        /// The URL template.
        template: String,
        /// The unresolved placeholder names, in template order.
        missings: Vec<String>,
    },

    /// Path values were provided for names the URL template does not contain.
    #[display("URL template '{template}' has no placeholder for: {names:?}")]
    #[from(skip)]
    UnusedPathValue {
        /// The URL template.
        template: String,
        /// The path value names without placeholder.
        names: Vec<String>,
    },

    /// A required field has neither a value nor a default.
    #[display("Missing value for required {location} field '{field}'")]
    #[from(skip)]
    MissingField {
        /// The declared field name.
        field: String,
        /// The field location.
        location: Location,
    },

    /// Values were supplied for fields the schema does not declare.
    #[display("Unknown fields: {fields:?}")]
    #[from(skip)]
    UnknownFields {
        /// The undeclared names, in insertion order.
        fields: Vec<String>,
    },

    /// A field value could not be serialized to JSON.
    #[display("Failed to serialize field '{field}': {source}")]
    #[from(skip)]
    Serialization {
        /// The declared field name, or `body` for the request body.
        field: String,
        /// The serialization error.
        source: serde_json::Error,
    },

    /// One or more field values violate their constraints.
    #[display("Constraint violations: {}", display_violations(violations))]
    #[from(skip)]
    ConstraintViolations {
        /// Every violation found, in field declaration order.
        violations: Vec<ConstraintViolation>,
    },

    /// A value cannot be rendered for its location.
    #[display("Unsupported value for field '{field}': {message}. Got: {value}")]
    #[from(skip)]
    UnsupportedParameterValue {
        /// The declared field name.
        field: String,
        /// Why the value was rejected.
        message: String,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// A JSON body and form fields were both provided.
    #[display("A JSON body cannot be combined with form fields: {fields:?}")]
    #[from(skip)]
    ConflictingBody {
        /// The form field wire names.
        fields: Vec<String>,
    },

    /// A cookie name or value cannot be sent in a `Cookie` header.
    #[display("Invalid cookie '{name}': name must be a token, value must only hold cookie octets")]
    #[from(skip)]
    InvalidCookie {
        /// The cookie wire name.
        name: String,
    },

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header or cookie value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// The resolved URL is not a valid absolute URL.
    InvalidUrl(url::ParseError),

    /// The resolved URL cannot be used as an HTTP request URI.
    InvalidUri(http::uri::InvalidUri),

    /// The form fields could not be encoded.
    FormEncoding(serde_urlencoded::ser::Error),

    /// The JSON body could not be encoded.
    JsonEncoding(serde_json::Error),
}

fn display_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single response field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{field} ({alias}): {kind}")]
pub struct FieldFailure {
    /// Path of the field using declared names, e.g. `database_backend` or `owner.name`.
    ///
    /// `$` designates the payload itself.
    pub field: String,
    /// Path of the field using wire aliases, e.g. `DatabaseBackend`.
    pub alias: String,
    /// What went wrong.
    pub kind: FailureKind,
}

/// The reason a response field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum FailureKind {
    /// The field is required but absent from the payload.
    #[display("missing")]
    Missing,

    /// The field is present but does not match its declared type.
    #[display("expected {expected}, found {found}")]
    Invalid {
        /// The declared type.
        expected: String,
        /// A description of the received value.
        found: String,
    },

    /// The payload could not be read at all, or the typed conversion failed.
    #[display("{message}")]
    Malformed {
        /// The underlying error message.
        message: String,
    },
}

/// The response payload does not match the response schema.
///
/// Every offending field is listed, decoding does not stop at the first failure.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct ValidationError {
    /// The failures, in schema declaration order.
    pub failures: Vec<FieldFailure>,
}

impl ValidationError {
    /// Checks whether a declared field path is part of the failures.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.failures.iter().any(|failure| failure.field == field)
    }

    /// Returns the declared field paths that failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|failure| failure.field.as_str())
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response validation failed for {} field(s)",
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        Ok(())
    }
}

/// Errors returned by the send operations.
///
/// Transport errors are carried as-is, without any reinterpretation.
#[derive(Debug, derive_more::From)]
pub enum SendError<E> {
    /// The request could not be built.
    Build(BuildError),

    /// The transport failed to deliver the request or to receive the response.
    #[from(skip)]
    Transport(E),

    /// The response payload does not match the response schema.
    Validation(ValidationError),
}

impl<E> SendError<E> {
    /// Returns the validation error, if decoding failed.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            Self::Build(_) | Self::Transport(_) => None,
        }
    }
}

impl<E> Display for SendError<E>
where
    E: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build(error) => write!(f, "Failed to build request: {error}"),
            Self::Transport(error) => write!(f, "Transport error: {error}"),
            Self::Validation(error) => write!(f, "{error}"),
        }
    }
}

impl<E> Error for SendError<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Build(error) => Some(error),
            Self::Transport(error) => Some(error),
            Self::Validation(error) => Some(error),
        }
    }
}
