use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;

use super::Location;
use crate::BuildError;

/// Characters escaped in a path segment (RFC 3986 `pchar` complement, plus `%`).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Parameter styles, following the OpenAPI 3.1 names.
///
/// Styles only matter for array values: scalars are rendered as-is,
/// except for the `Label` and `Matrix` path prefixes.
///
/// # Examples
///
/// ```rust
/// use reqmodel_core::{FieldDef, ParamStyle};
///
/// // ?tags=rust|web|api
/// let tags = FieldDef::query("tags").style(ParamStyle::PipeDelimited);
///
/// // /users/;id=42
/// let id = FieldDef::path("id").style(ParamStyle::Matrix);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum ParamStyle {
    /// Use the location default, i.e. `Simple`.
    #[default]
    Default,
    /// Simple style: `value1,value2`
    Simple,
    /// Space delimited: `value1 value2`
    SpaceDelimited,
    /// Pipe delimited: `value1|value2`
    PipeDelimited,
    /// Label style: `/users/.value` (path only)
    Label,
    /// Matrix style: `/users/;name=value` (path only)
    Matrix,
}

impl ParamStyle {
    /// Checks whether the style can be used for a location.
    #[must_use]
    pub fn supports(self, location: Location) -> bool {
        match self {
            Self::Label | Self::Matrix => location == Location::Path,
            Self::Default | Self::Simple | Self::SpaceDelimited | Self::PipeDelimited => true,
        }
    }

    fn delimiter(self) -> &'static str {
        match self {
            Self::Default | Self::Simple | Self::Label | Self::Matrix => ",",
            Self::SpaceDelimited => " ",
            Self::PipeDelimited => "|",
        }
    }
}

/// Renders a field value to its wire string for the given location.
///
/// Path values come out percent-encoded as a path segment (with the style prefix),
/// other locations are left raw: the query string and headers have their own encoding.
pub(super) fn render(
    field: &str,
    wire_name: &str,
    value: &Value,
    style: ParamStyle,
    location: Location,
) -> Result<String, BuildError> {
    let raw = match value {
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(scalar_to_string(field, item)?);
            }
            parts.join(style.delimiter())
        }
        Value::Object(_) => {
            return Err(BuildError::UnsupportedParameterValue {
                field: field.to_string(),
                message: format!("object values are not supported for {location} fields"),
                value: value.clone(),
            });
        }
        _ => scalar_to_string(field, value)?,
    };

    if location != Location::Path {
        return Ok(raw);
    }

    let encoded = utf8_percent_encode(&raw, PATH_SEGMENT).to_string();
    let result = match style {
        ParamStyle::Label => format!(".{encoded}"),
        ParamStyle::Matrix => format!(";{wire_name}={encoded}"),
        _ => encoded,
    };
    Ok(result)
}

fn scalar_to_string(field: &str, value: &Value) -> Result<String, BuildError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(BuildError::UnsupportedParameterValue {
            field: field.to_string(),
            message: "nested complex values are not supported".to_string(),
            value: value.clone(),
        }),
    }
}
