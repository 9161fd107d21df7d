use headers::{ContentType, HeaderMapExt};
use http::header::{CONTENT_TYPE, COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

use crate::BuildError;

/// A fully resolved request, ready to be handed to a [`Transport`](crate::Transport).
///
/// The `url` already carries the query string; `query` is kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    /// The HTTP method.
    pub method: Method,
    /// The resolved URL, query string included.
    pub url: Url,
    /// The query parameters.
    pub query: IndexMap<String, String>,
    /// The headers, without `Cookie` nor `Content-Type`.
    pub headers: IndexMap<String, String>,
    /// The cookies.
    pub cookies: IndexMap<String, String>,
    /// The body.
    pub body: Option<RequestBody>,
}

/// The body of a [`BuiltRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A JSON document, sent as `application/json`.
    Json(Value),
    /// Form fields, sent as `application/x-www-form-urlencoded`.
    Form(IndexMap<String, String>),
}

impl RequestBody {
    /// The content type of the encoded body.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Json(_) => ContentType::json(),
            Self::Form(_) => ContentType::form_url_encoded(),
        }
    }

    /// Encodes the body.
    ///
    /// # Errors
    ///
    /// Fails if the body cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let bytes = match self {
            Self::Json(value) => serde_json::to_vec(value)?,
            Self::Form(fields) => {
                let pairs: Vec<_> = fields.iter().collect();
                serde_urlencoded::to_string(pairs)?.into_bytes()
            }
        };
        Ok(bytes)
    }
}

impl BuiltRequest {
    /// The `Cookie` header value, `name1=value1; name2=value2`.
    ///
    /// # Errors
    ///
    /// Fails with [`BuildError::InvalidCookie`] if a name is not a token, or a value
    /// has characters outside the cookie octets (e.g. `;` or a space).
    pub fn cookie_header(&self) -> Result<Option<String>, BuildError> {
        if self.cookies.is_empty() {
            return Ok(None);
        }
        let mut pairs = Vec::with_capacity(self.cookies.len());
        for (name, value) in &self.cookies {
            if !is_cookie_name(name) || !is_cookie_value(value) {
                return Err(BuildError::InvalidCookie { name: name.clone() });
            }
            pairs.push(format!("{name}={value}"));
        }
        Ok(Some(pairs.join("; ")))
    }

    /// All headers sent on the wire: the declared headers, `Cookie`, and the body
    /// `Content-Type` unless a declared header already sets it.
    ///
    /// Cookies are appended to a declared `Cookie` header.
    ///
    /// # Errors
    ///
    /// Fails if a header name or value (cookies included) is not valid for HTTP.
    pub fn to_header_map(&self) -> Result<HeaderMap, BuildError> {
        let mut result = HeaderMap::with_capacity(self.headers.len() + 2);

        for (name, value) in &self.headers {
            result.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        if let Some(cookie) = self.cookie_header()? {
            let cookie = match result.get(COOKIE).map(HeaderValue::to_str) {
                Some(Ok(declared)) if !declared.is_empty() => format!("{declared}; {cookie}"),
                _ => cookie,
            };
            result.insert(COOKIE, HeaderValue::from_str(&cookie)?);
        }

        if let Some(body) = &self.body
            && !result.contains_key(CONTENT_TYPE)
        {
            result.typed_insert(body.content_type());
        }

        Ok(result)
    }
}

// RFC 6265 `token`
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|byte| byte.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&byte))
}

// RFC 6265 `cookie-octet`
fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|byte| byte.is_ascii_graphic() && !b"\",;\\".contains(&byte))
}

impl TryFrom<BuiltRequest> for http::Request<Vec<u8>> {
    type Error = BuildError;

    fn try_from(value: BuiltRequest) -> Result<Self, Self::Error> {
        let headers = value.to_header_map()?;
        let body = value
            .body
            .as_ref()
            .map(RequestBody::to_bytes)
            .transpose()?
            .unwrap_or_default();

        let mut request = http::Request::new(body);
        *request.method_mut() = value.method;
        *request.uri_mut() = value.url.as_str().parse::<http::Uri>()?;
        *request.headers_mut() = headers;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn request(body: Option<RequestBody>) -> BuiltRequest {
        BuiltRequest {
            method: Method::POST,
            url: Url::parse("https://example.com/items?lang=fr").expect("valid url"),
            query: IndexMap::from([("lang".to_string(), "fr".to_string())]),
            headers: IndexMap::from([("X-Version".to_string(), "v1".to_string())]),
            cookies: IndexMap::from([
                ("session".to_string(), "abc123".to_string()),
                ("theme".to_string(), "dark".to_string()),
            ]),
            body,
        }
    }

    #[test]
    fn should_join_cookies() {
        let request = request(None);

        assert_eq!(
            request.cookie_header().expect("valid cookies").as_deref(),
            Some("session=abc123; theme=dark")
        );
    }

    #[test]
    fn should_build_header_map() {
        let request = request(Some(RequestBody::Json(json!({"name": "Alice"}))));

        let headers = request.to_header_map().expect("valid headers");

        insta::assert_debug_snapshot!(headers, @r#"
        {
            "x-version": "v1",
            "cookie": "session=abc123; theme=dark",
            "content-type": "application/json",
        }
        "#);
    }

    #[test]
    fn should_keep_declared_content_type() {
        let mut request = request(Some(RequestBody::Json(json!({}))));
        request
            .headers
            .insert("Content-Type".to_string(), "application/vnd.api+json".to_string());

        let headers = request.to_header_map().expect("valid headers");

        assert_eq!(
            headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
            Some("application/vnd.api+json")
        );
    }

    #[test]
    fn should_reject_invalid_header_value() {
        let mut request = request(None);
        request
            .headers
            .insert("X-Broken".to_string(), "line\nbreak".to_string());

        let result = request.to_header_map();

        assert!(matches!(result, Err(BuildError::InvalidHeaderValue(_))));
    }

    #[rstest]
    #[case::separator_in_value("session", "abc; admin=1")]
    #[case::space_in_value("session", "abc 123")]
    #[case::quote_in_value("session", "\"abc")]
    #[case::equal_in_name("session=admin", "abc")]
    #[case::empty_name("", "abc")]
    fn should_reject_invalid_cookie(#[case] name: &str, #[case] value: &str) {
        let mut request = request(None);
        request.cookies.insert(name.to_string(), value.to_string());

        let result = request.to_header_map();

        let Err(BuildError::InvalidCookie { name: rejected }) = result else {
            panic!("expected an invalid cookie, got {result:?}");
        };
        assert_eq!(rejected, name);
    }

    #[test]
    fn should_append_cookies_to_declared_cookie_header() {
        let mut request = request(None);
        request
            .headers
            .insert("Cookie".to_string(), "a=1".to_string());

        let headers = request.to_header_map().expect("valid headers");

        let cookies: Vec<_> = headers.get_all(COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1; session=abc123; theme=dark"]);
    }

    #[test]
    fn should_encode_form_body() {
        let body = RequestBody::Form(IndexMap::from([
            ("name".to_string(), "Alice Smith".to_string()),
            ("role".to_string(), "admin&co".to_string()),
        ]));

        let bytes = body.to_bytes().expect("encoded");

        assert_eq!(
            String::from_utf8(bytes).expect("utf-8"),
            "name=Alice+Smith&role=admin%26co"
        );
        assert_eq!(
            body.content_type().to_string(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn should_convert_to_http_request() {
        let request = request(Some(RequestBody::Json(json!({"name": "Alice"}))));

        let http_request = http::Request::<Vec<u8>>::try_from(request).expect("converted");

        assert_eq!(http_request.method(), Method::POST);
        assert_eq!(
            http_request.uri().to_string(),
            "https://example.com/items?lang=fr"
        );
        assert_eq!(http_request.body().as_slice(), br#"{"name":"Alice"}"#);
    }
}
