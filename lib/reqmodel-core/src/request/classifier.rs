use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::param::render;
use super::{Field, FieldValues, Location, RequestSchema};
use crate::BuildError;

/// Field values bucketed by location and keyed by wire name.
///
/// Each bucket keeps the field declaration order, so equal inputs
/// always give equal buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedFields {
    /// Path values, already percent-encoded as path segments.
    pub path: IndexMap<String, String>,
    /// Query string parameters.
    pub query: IndexMap<String, String>,
    /// Headers.
    pub headers: IndexMap<String, String>,
    /// Cookies.
    pub cookies: IndexMap<String, String>,
    /// Form fields of the body.
    pub form: IndexMap<String, String>,
    /// The whole-object JSON body.
    pub body: Option<Value>,
}

impl ClassifiedFields {
    /// Buckets the values of a request instance according to its schema.
    ///
    /// Values are keyed by declared name; a wire name (e.g. `X-Version`) is accepted
    /// as well when it designates a single field whose declared name is not supplied.
    ///
    /// - a field without value falls back to its default, and is left out when
    ///   it is optional,
    /// - a required path field without value is left out too: the URL template
    ///   resolution reports it,
    /// - constraints are checked on every value, all violations are reported together.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Serialization`] if a value could not be serialized,
    /// - [`BuildError::UnknownFields`] if a value has no declared field,
    /// - [`BuildError::MissingField`] if a required field has no value,
    /// - [`BuildError::ConstraintViolations`] if values break their constraints,
    /// - [`BuildError::UnsupportedParameterValue`] if a value cannot be rendered.
    pub fn classify(schema: &RequestSchema, mut values: FieldValues) -> Result<Self, BuildError> {
        if let Some(failure) = values.take_failure() {
            return Err(failure);
        }

        let mut supplied = HashMap::new();
        let mut unknown = Vec::new();
        for name in values.names() {
            match resolve(schema, &values, name) {
                Some(field) => {
                    if let Some(value) = values.get(name) {
                        supplied.insert(field.name(), value);
                    }
                }
                None => unknown.push(name.to_string()),
            }
        }
        if !unknown.is_empty() {
            return Err(BuildError::UnknownFields { fields: unknown });
        }

        let mut result = Self {
            body: values.body().cloned(),
            ..Self::default()
        };
        let mut violations = Vec::new();

        for field in schema.fields() {
            let Some(value) = supplied.get(field.name()).copied().or(field.default_value()) else {
                if field.is_required() && field.location() != Location::Path {
                    return Err(BuildError::MissingField {
                        field: field.name().to_string(),
                        location: field.location(),
                    });
                }
                continue;
            };

            violations.extend(field.constraints().check(field.name(), value));

            let rendered = render(
                field.name(),
                field.wire_name(),
                value,
                field.style(),
                field.location(),
            )?;
            result
                .bucket_mut(field.location())
                .insert(field.wire_name().to_string(), rendered);
        }

        if !violations.is_empty() {
            return Err(BuildError::ConstraintViolations { violations });
        }

        debug!(fields = result.len(), "fields classified");
        Ok(result)
    }

    /// The bucket of a location.
    #[must_use]
    pub fn bucket(&self, location: Location) -> &IndexMap<String, String> {
        match location {
            Location::Path => &self.path,
            Location::Query => &self.query,
            Location::Header => &self.headers,
            Location::Cookie => &self.cookies,
            Location::Body => &self.form,
        }
    }

    fn bucket_mut(&mut self, location: Location) -> &mut IndexMap<String, String> {
        match location {
            Location::Path => &mut self.path,
            Location::Query => &mut self.query,
            Location::Header => &mut self.headers,
            Location::Cookie => &mut self.cookies,
            Location::Body => &mut self.form,
        }
    }

    /// Number of classified fields, all buckets together.
    #[must_use]
    pub fn len(&self) -> usize {
        Location::ALL
            .iter()
            .map(|location| self.bucket(*location).len())
            .sum()
    }

    /// Checks whether no field was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The field a supplied name stands for: its declared name, or else a wire name
/// shared by no other field, provided the declared name is not supplied too.
fn resolve<'a>(schema: &'a RequestSchema, values: &FieldValues, name: &str) -> Option<&'a Field> {
    if let Some(field) = schema.field(name) {
        return Some(field);
    }
    let mut by_wire_name = schema
        .fields()
        .iter()
        .filter(|field| field.wire_name() == name);
    let field = by_wire_name.next()?;
    let declared_supplied = values.names().any(|supplied| supplied == field.name());
    (by_wire_name.next().is_none() && !declared_supplied).then_some(field)
}
