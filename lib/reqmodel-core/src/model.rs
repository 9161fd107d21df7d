use std::future::Future;

use serde::de::DeserializeOwned;

use crate::{
    AsyncTransport, BuildError, BuiltRequest, FieldValues, RawResponse, RequestSchema,
    ResponseSchema, SendError, Transport, ValidationError, build, decode_response,
};

/// A type decoded from a response payload.
///
/// The type deserializes from its *declared* field names: wire aliases are
/// handled by the [`ResponseSchema`].
pub trait ResponseModel: DeserializeOwned {
    /// The schema validating the payload, shared by every response of this type.
    fn schema() -> &'static ResponseSchema;
}

/// A request description: a static schema, and the values of one instance.
///
/// # Examples
///
/// ```rust
/// use std::sync::LazyLock;
///
/// use http::Method;
/// use reqmodel_core::{
///     FieldDef, FieldType, FieldValues, RequestModel, RequestSchema, ResponseField,
///     ResponseModel, ResponseSchema,
/// };
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct User {
///     name: String,
/// }
///
/// impl ResponseModel for User {
///     fn schema() -> &'static ResponseSchema {
///         static SCHEMA: LazyLock<ResponseSchema> = LazyLock::new(|| {
///             ResponseSchema::builder()
///                 .field(ResponseField::required("name", FieldType::String).alias("Name"))
///                 .build()
///                 .expect("a valid response schema")
///         });
///         &SCHEMA
///     }
/// }
///
/// struct GetUser {
///     id: u64,
/// }
///
/// impl RequestModel for GetUser {
///     type Response = User;
///
///     fn schema() -> &'static RequestSchema {
///         static SCHEMA: LazyLock<RequestSchema> = LazyLock::new(|| {
///             RequestSchema::builder(Method::GET, "https://api.example.com/users/{id}")
///                 .field(FieldDef::path("id"))
///                 .build()
///                 .expect("a valid request schema")
///         });
///         &SCHEMA
///     }
///
///     fn field_values(&self) -> FieldValues {
///         FieldValues::new().with("id", &self.id)
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = GetUser { id: 42 }.as_request()?;
/// assert_eq!(request.url.as_str(), "https://api.example.com/users/42");
/// # Ok(())
/// # }
/// ```
pub trait RequestModel {
    /// The expected response.
    type Response: ResponseModel;

    /// The schema of the request, shared by every instance.
    fn schema() -> &'static RequestSchema;

    /// The values of this instance, keyed by declared field name.
    fn field_values(&self) -> FieldValues;

    /// Builds the concrete request, without sending it.
    ///
    /// # Errors
    ///
    /// See [`build`].
    fn as_request(&self) -> Result<BuiltRequest, BuildError> {
        build(Self::schema(), self.field_values())
    }

    /// Decodes a response received for this request.
    ///
    /// # Errors
    ///
    /// See [`decode_response`].
    fn decode(response: &RawResponse) -> Result<Self::Response, ValidationError> {
        decode_response(response)
    }

    /// Builds, sends with a blocking transport, and decodes.
    ///
    /// # Errors
    ///
    /// See [`send`].
    fn send<T>(&self, transport: &T) -> Result<Self::Response, SendError<T::Error>>
    where
        T: Transport,
    {
        send(self, transport)
    }

    /// Builds, sends with a suspending transport, and decodes.
    ///
    /// # Errors
    ///
    /// See [`send_async`].
    fn send_async<T>(
        &self,
        transport: &T,
    ) -> impl Future<Output = Result<Self::Response, SendError<T::Error>>> + Send
    where
        Self: Sync,
        T: AsyncTransport,
    {
        send_async(self, transport)
    }
}

/// Builds and sends a request, returning the response as-is.
///
/// # Errors
///
/// Fails with [`SendError::Build`] or [`SendError::Transport`].
pub fn send_raw<R, T>(request: &R, transport: &T) -> Result<RawResponse, SendError<T::Error>>
where
    R: RequestModel + ?Sized,
    T: Transport,
{
    let built = request.as_request()?;
    transport.send(built).map_err(SendError::Transport)
}

/// Builds, sends and decodes a request with a blocking transport.
///
/// The status code is not inspected: the body of an error response is decoded like any other.
///
/// # Errors
///
/// - [`SendError::Build`] if the request cannot be built,
/// - [`SendError::Transport`] with the transport error, untouched,
/// - [`SendError::Validation`] if the response does not match the response schema.
pub fn send<R, T>(request: &R, transport: &T) -> Result<R::Response, SendError<T::Error>>
where
    R: RequestModel + ?Sized,
    T: Transport,
{
    let response = send_raw(request, transport)?;
    let result = R::decode(&response)?;
    Ok(result)
}

/// Builds and sends a request with a suspending transport, returning the response as-is.
///
/// # Errors
///
/// Fails with [`SendError::Build`] or [`SendError::Transport`].
pub async fn send_raw_async<R, T>(
    request: &R,
    transport: &T,
) -> Result<RawResponse, SendError<T::Error>>
where
    R: RequestModel + Sync + ?Sized,
    T: AsyncTransport,
{
    let built = request.as_request()?;
    transport.send(built).await.map_err(SendError::Transport)
}

/// Builds, sends and decodes a request with a suspending transport.
///
/// The transport call is the only suspension point.
///
/// # Errors
///
/// See [`send`].
pub async fn send_async<R, T>(
    request: &R,
    transport: &T,
) -> Result<R::Response, SendError<T::Error>>
where
    R: RequestModel + Sync + ?Sized,
    T: AsyncTransport,
{
    let response = send_raw_async(request, transport).await?;
    let result = R::decode(&response)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{LazyLock, Mutex};

    use http::{HeaderMap, Method, StatusCode};
    use serde::Deserialize;

    use super::*;
    use crate::{FailureKind, FieldDef, FieldType, ResponseField};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: u64,
        label: String,
    }

    impl ResponseModel for Item {
        fn schema() -> &'static ResponseSchema {
            static SCHEMA: LazyLock<ResponseSchema> = LazyLock::new(|| {
                ResponseSchema::builder()
                    .field(ResponseField::required("id", FieldType::Integer))
                    .field(ResponseField::required("label", FieldType::String).alias("Label"))
                    .build()
                    .expect("valid schema")
            });
            &SCHEMA
        }
    }

    struct GetItem {
        id: u64,
    }

    impl RequestModel for GetItem {
        type Response = Item;

        fn schema() -> &'static RequestSchema {
            static SCHEMA: LazyLock<RequestSchema> = LazyLock::new(|| {
                RequestSchema::builder(Method::GET, "https://example.com/items/{id}")
                    .field(FieldDef::path("id"))
                    .build()
                    .expect("valid schema")
            });
            &SCHEMA
        }

        fn field_values(&self) -> FieldValues {
            FieldValues::new().with("id", &self.id)
        }
    }

    /// Replies with a canned response and records what was sent.
    struct Canned {
        status: StatusCode,
        body: &'static str,
        sent: Mutex<Vec<BuiltRequest>>,
    }

    impl Canned {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                sent: Mutex::default(),
            }
        }

        fn reply(&self, request: BuiltRequest) -> RawResponse {
            self.sent.lock().expect("not poisoned").push(request);
            RawResponse::new(self.status, HeaderMap::new(), self.body)
        }
    }

    impl Transport for Canned {
        type Error = io::Error;

        fn send(&self, request: BuiltRequest) -> Result<RawResponse, io::Error> {
            Ok(self.reply(request))
        }
    }

    impl AsyncTransport for Canned {
        type Error = io::Error;

        async fn send(&self, request: BuiltRequest) -> Result<RawResponse, io::Error> {
            Ok(self.reply(request))
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        type Error = io::Error;

        fn send(&self, _request: BuiltRequest) -> Result<RawResponse, io::Error> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
        }
    }

    #[test]
    fn should_send_and_decode() {
        let transport = Canned::new(StatusCode::OK, r#"{"id": 7, "Label": "seven"}"#);

        let item = GetItem { id: 7 }.send(&transport).expect("decoded");

        assert_eq!(
            item,
            Item {
                id: 7,
                label: "seven".to_string()
            }
        );
        let sent = transport.sent.lock().expect("not poisoned");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url.as_str(), "https://example.com/items/7");
    }

    #[tokio::test]
    async fn should_send_and_decode_async() {
        let transport = Canned::new(StatusCode::OK, r#"{"id": 7, "Label": "seven"}"#);

        let item = GetItem { id: 7 }
            .send_async(&transport)
            .await
            .expect("decoded");

        assert_eq!(item.label, "seven");
    }

    #[test]
    fn should_decode_error_status_as_is() {
        let transport = Canned::new(StatusCode::NOT_FOUND, r#"{"error": "not found"}"#);

        let result = GetItem { id: 7 }.send(&transport);

        let Err(SendError::Validation(error)) = result else {
            panic!("expected a validation error, got {result:?}");
        };
        assert_eq!(error.fields().collect::<Vec<_>>(), vec!["id", "label"]);
    }

    #[test]
    fn should_return_raw_response() {
        let transport = Canned::new(StatusCode::NOT_FOUND, "no such item");

        let response = send_raw(&GetItem { id: 7 }, &transport).expect("sent");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "no such item");
    }

    #[test]
    fn should_report_non_json_body_as_validation_failure() {
        let transport = Canned::new(StatusCode::OK, "not json");

        let result = GetItem { id: 7 }.send(&transport);

        let error = result.as_ref().err().and_then(SendError::as_validation);
        let Some(error) = error else {
            panic!("expected a validation error, got {result:?}");
        };
        assert!(matches!(
            error.failures[0].kind,
            FailureKind::Malformed { .. }
        ));
    }

    #[test]
    fn should_pass_transport_error_through() {
        let result = GetItem { id: 7 }.send(&Unreachable);

        let Err(SendError::Transport(error)) = result else {
            panic!("expected a transport error, got {result:?}");
        };
        assert_eq!(error.kind(), io::ErrorKind::ConnectionRefused);
    }
}
