use std::collections::HashSet;

use http::Method;
use http::header::COOKIE;
use regex::Regex;

use super::{Constraints, Field, FieldDef, Location, UrlTemplate};
use crate::ConfigurationError;

/// The static description of a request kind: method, URL template and fields.
///
/// A schema is shared by every instance of a request type, usually through a `LazyLock`,
/// see [`RequestModel`](crate::RequestModel).
///
/// # Examples
///
/// ```rust
/// use http::Method;
/// use reqmodel_core::{FieldDef, RequestSchema};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = RequestSchema::builder(Method::GET, "https://broker.example/{page}/")
///     .field(FieldDef::query("search").min_length(3).max_length(10))
///     .field(FieldDef::header("version").alias("X-Version"))
///     .field(FieldDef::path("page"))
///     .build()?;
///
/// assert_eq!(schema.fields().len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestSchema {
    method: Method,
    template: UrlTemplate,
    fields: Vec<Field>,
}

impl RequestSchema {
    /// Starts declaring a schema.
    pub fn builder(method: Method, template: impl Into<String>) -> RequestSchemaBuilder {
        RequestSchemaBuilder {
            method,
            template: template.into(),
            fields: Vec::new(),
        }
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The URL template.
    #[must_use]
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// The fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finds a field by declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Builder for [`RequestSchema`].
#[derive(Debug, Clone)]
pub struct RequestSchemaBuilder {
    method: Method,
    template: String,
    fields: Vec<FieldDef>,
}

impl RequestSchemaBuilder {
    /// Declares a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares several fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Validates the declaration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if:
    /// - the URL template is malformed,
    /// - a field has no location,
    /// - a declared name is used twice, or a wire name twice in the same location
    ///   (header names are compared case-insensitively),
    /// - a path field has no placeholder in the template, or a placeholder no path field,
    /// - a header field targets `Cookie`,
    /// - a style is not supported by the field location,
    /// - a pattern is not a valid regular expression,
    /// - a default value violates the field constraints.
    pub fn build(self) -> Result<RequestSchema, ConfigurationError> {
        let Self {
            method,
            template,
            fields: definitions,
        } = self;
        let template = UrlTemplate::parse(template)?;

        let mut names = HashSet::new();
        let mut wire_names = HashSet::new();
        let mut fields = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let field = resolve_field(definition, &template)?;

            if !names.insert(field.name.clone()) {
                return Err(ConfigurationError::DuplicateField { field: field.name });
            }

            let key = match field.location {
                Location::Header => field.wire_name.to_ascii_lowercase(),
                _ => field.wire_name.clone(),
            };
            if !wire_names.insert((field.location, key)) {
                return Err(ConfigurationError::DuplicateWireName {
                    location: field.location,
                    name: field.wire_name,
                });
            }

            fields.push(field);
        }

        if let Some(placeholder) = template.placeholders().find(|placeholder| {
            !fields
                .iter()
                .any(|field| field.location == Location::Path && field.wire_name == *placeholder)
        }) {
            return Err(ConfigurationError::PlaceholderWithoutField {
                placeholder: placeholder.to_string(),
                template: template.to_string(),
            });
        }

        Ok(RequestSchema {
            method,
            template,
            fields,
        })
    }
}

fn resolve_field(definition: FieldDef, template: &UrlTemplate) -> Result<Field, ConfigurationError> {
    let FieldDef {
        name,
        location,
        alias,
        default,
        required,
        style,
        min_length,
        max_length,
        minimum,
        maximum,
        pattern,
    } = definition;

    let Some(location) = location else {
        return Err(ConfigurationError::MissingLocation { field: name });
    };
    let wire_name = alias.unwrap_or_else(|| name.clone());

    if location == Location::Path && !template.contains(&wire_name) {
        return Err(ConfigurationError::PathFieldNotInTemplate {
            field: wire_name,
            template: template.to_string(),
        });
    }

    if location == Location::Header && wire_name.eq_ignore_ascii_case(COOKIE.as_str()) {
        return Err(ConfigurationError::CookieHeaderField { field: name });
    }

    if !style.supports(location) {
        return Err(ConfigurationError::UnsupportedStyle {
            field: name,
            location,
            style: style.to_string(),
        });
    }

    let pattern = pattern
        .map(|pattern| Regex::new(&pattern))
        .transpose()
        .map_err(|err| ConfigurationError::InvalidPattern {
            field: name.clone(),
            reason: err.to_string(),
        })?;

    let constraints = Constraints {
        min_length,
        max_length,
        minimum,
        maximum,
        pattern,
    };

    if let Some(default) = &default {
        let violations = constraints.check(&name, default);
        if !violations.is_empty() {
            let reason = violations
                .iter()
                .map(|violation| violation.constraint.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ConfigurationError::InvalidDefault {
                field: name,
                reason,
            });
        }
    }

    Ok(Field {
        name,
        location,
        wire_name,
        default,
        required,
        style,
        constraints,
    })
}
