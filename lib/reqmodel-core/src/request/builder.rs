use tracing::debug;
use url::Url;

use super::{BuiltRequest, ClassifiedFields, FieldValues, RequestBody, RequestSchema};
use crate::BuildError;

/// Builds the concrete request of a schema and the values of one instance.
///
/// The URL template must resolve to an absolute URL. Query parameters are appended
/// to the URL, headers and cookies are checked to be valid HTTP, and the body is either
/// the JSON body of the values or the form fields, never both.
///
/// # Errors
///
/// Returns a [`BuildError`] when a value is missing, invalid or cannot be rendered,
/// or when the resolved URL is not valid. No partial request is returned.
///
/// # Examples
///
/// ```rust
/// use http::Method;
/// use reqmodel_core::{FieldDef, FieldValues, RequestSchema, build};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = RequestSchema::builder(Method::GET, "https://broker.example/{page}/")
///     .field(FieldDef::query("search"))
///     .field(FieldDef::header("version").alias("X-Version"))
///     .field(FieldDef::path("page"))
///     .build()?;
///
/// let values = FieldValues::new()
///     .with("search", "xyz")
///     .with("version", "v1")
///     .with("page", "health");
/// let request = build(&schema, values)?;
///
/// assert_eq!(request.url.as_str(), "https://broker.example/health/?search=xyz");
/// assert_eq!(request.headers["X-Version"], "v1");
/// # Ok(())
/// # }
/// ```
pub fn build(schema: &RequestSchema, values: FieldValues) -> Result<BuiltRequest, BuildError> {
    let classified = ClassifiedFields::classify(schema, values)?;
    assemble(schema, classified)
}

/// Builds the concrete request from already classified fields.
///
/// # Errors
///
/// See [`build`].
pub fn assemble(
    schema: &RequestSchema,
    classified: ClassifiedFields,
) -> Result<BuiltRequest, BuildError> {
    let ClassifiedFields {
        path,
        query,
        headers,
        cookies,
        form,
        body,
    } = classified;

    let resolved = schema.template().resolve(&path)?;
    let mut url = Url::parse(&resolved)?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(&query);
    }

    let body = match (body, form.is_empty()) {
        (Some(_), false) => {
            return Err(BuildError::ConflictingBody {
                fields: form.into_keys().collect(),
            });
        }
        (Some(json), true) => Some(RequestBody::Json(json)),
        (None, false) => Some(RequestBody::Form(form)),
        (None, true) => None,
    };

    let request = BuiltRequest {
        method: schema.method().clone(),
        url,
        query,
        headers,
        cookies,
        body,
    };

    // headers and cookies must be valid HTTP
    request.to_header_map()?;

    debug!(method = %request.method, url = %request.url, "request built");
    Ok(request)
}
