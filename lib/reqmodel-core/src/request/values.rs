use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::BuildError;

/// The values of one request instance, keyed by declared field name
/// (a field wire name is accepted too, see [`ClassifiedFields::classify`](crate::ClassifiedFields::classify)).
///
/// Values go through `serde_json`, so any `Serialize` type can be used.
/// A value serialized to `null` (e.g. `Option::None`) counts as absent,
/// while an explicit empty string is a present value.
///
/// Serialization failures are kept and reported when the request is built,
/// so the builder-style API stays infallible.
///
/// ```rust
/// use reqmodel_core::FieldValues;
///
/// let page: Option<u32> = None;
/// let values = FieldValues::new()
///     .with("search", "xyz")
///     .with("page", &page);
///
/// assert!(values.get("search").is_some());
/// assert!(values.get("page").is_none());
/// ```
#[derive(Debug, Default)]
pub struct FieldValues {
    values: IndexMap<String, Value>,
    body: Option<Value>,
    failure: Option<BuildError>,
}

impl FieldValues {
    /// Creates an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a field.
    #[must_use]
    pub fn with<T>(mut self, name: impl Into<String>, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.values.insert(name, value);
            }
            Err(source) => self.record_failure(name, source),
        }
        self
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn with_body<T>(mut self, body: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(body) {
            Ok(Value::Null) => self.body = None,
            Ok(value) => self.body = Some(value),
            Err(source) => self.record_failure("body".to_string(), source),
        }
        self
    }

    fn record_failure(&mut self, field: String, source: serde_json::Error) {
        if self.failure.is_none() {
            self.failure = Some(BuildError::Serialization { field, source });
        }
    }

    /// The value of a field, `None` when absent or `null`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// The JSON request body.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The names that were given a value, `null` included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of values, `null` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether no value was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Takes the first serialization failure, if any.
    pub(crate) fn take_failure(&mut self) -> Option<BuildError> {
        self.failure.take()
    }
}
