use serde_json::Value;

use super::{Constraints, Location, ParamStyle};

/// Declaration of a request field.
///
/// A field gets its location from one of the constructors ([`FieldDef::path`],
/// [`FieldDef::query`], ...). [`FieldDef::new`] leaves the location unset, which is
/// rejected when the [`RequestSchema`](super::RequestSchema) is built.
///
/// # Examples
///
/// ```rust
/// use reqmodel_core::FieldDef;
///
/// let search = FieldDef::query("search").min_length(3).max_length(10);
/// let version = FieldDef::header("version").alias("X-Version");
/// let accept = FieldDef::header("accept")
///     .alias("Accept")
///     .default_value("application/json");
/// ```
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(super) name: String,
    pub(super) location: Option<Location>,
    pub(super) alias: Option<String>,
    pub(super) default: Option<Value>,
    pub(super) required: bool,
    pub(super) style: ParamStyle,
    pub(super) min_length: Option<usize>,
    pub(super) max_length: Option<usize>,
    pub(super) minimum: Option<f64>,
    pub(super) maximum: Option<f64>,
    pub(super) pattern: Option<String>,
}

impl FieldDef {
    /// Creates a required field without location.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            alias: None,
            default: None,
            required: true,
            style: ParamStyle::Default,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            pattern: None,
        }
    }

    /// Creates a field bound to a `{placeholder}` of the URL template.
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name).located(Location::Path)
    }

    /// Creates a query string field.
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name).located(Location::Query)
    }

    /// Creates a header field.
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name).located(Location::Header)
    }

    /// Creates a cookie field.
    pub fn cookie(name: impl Into<String>) -> Self {
        Self::new(name).located(Location::Cookie)
    }

    /// Creates a form field, sent as `application/x-www-form-urlencoded` body.
    pub fn body(name: impl Into<String>) -> Self {
        Self::new(name).located(Location::Body)
    }

    /// Sets the location.
    #[must_use]
    pub fn located(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the wire name, when it differs from the declared name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the value used when the caller does not provide one.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the field as optional: without value it is left out of the request.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the style used to render array values.
    #[must_use]
    pub fn style(mut self, style: ParamStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the minimum length of string or array values.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum length of string or array values.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the inclusive lower bound of numeric values.
    #[must_use]
    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    /// Sets the inclusive upper bound of numeric values.
    #[must_use]
    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    /// Sets a regular expression string values must match.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// A validated request field, see [`FieldDef`].
#[derive(Debug, Clone)]
pub struct Field {
    pub(super) name: String,
    pub(super) location: Location,
    pub(super) wire_name: String,
    pub(super) default: Option<Value>,
    pub(super) required: bool,
    pub(super) style: ParamStyle,
    pub(super) constraints: Constraints,
}

impl Field {
    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// The name used on the wire: the alias if any, else the declared name.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// The default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the request cannot be built without a value.
    ///
    /// A field with a default value never lacks one.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    /// The style used to render array values.
    #[must_use]
    pub fn style(&self) -> ParamStyle {
        self.style
    }

    /// The validation constraints.
    #[must_use]
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}
