//! # Reqmodel Core
//!
//! Declarative HTTP request and response models.
//!
//! A request type declares, once, its method, URL template and fields. Each field has a
//! location (path, query, header, cookie or body), a wire name and optional constraints.
//! An instance of the request type only provides values. From there:
//!
//! - the fields are classified by location ([`ClassifiedFields`]),
//! - a concrete [`BuiltRequest`] is assembled ([`build`]), without any I/O,
//! - a [`Transport`] or [`AsyncTransport`] sends it,
//! - the JSON payload is validated against a [`ResponseSchema`] and decoded ([`decode`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::LazyLock;
//!
//! use http::Method;
//! use reqmodel_core::{
//!     FieldDef, FieldType, FieldValues, RequestModel, RequestSchema, ResponseField,
//!     ResponseModel, ResponseSchema,
//! };
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Status {
//!     database: String,
//! }
//!
//! impl ResponseModel for Status {
//!     fn schema() -> &'static ResponseSchema {
//!         static SCHEMA: LazyLock<ResponseSchema> = LazyLock::new(|| {
//!             ResponseSchema::builder()
//!                 .field(
//!                     ResponseField::required("database", FieldType::one_of(["working"]))
//!                         .alias("DatabaseBackend"),
//!                 )
//!                 .build()
//!                 .expect("a valid response schema")
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! struct StatusRequest {
//!     search: String,
//!     version: String,
//!     page: String,
//! }
//!
//! impl RequestModel for StatusRequest {
//!     type Response = Status;
//!
//!     fn schema() -> &'static RequestSchema {
//!         static SCHEMA: LazyLock<RequestSchema> = LazyLock::new(|| {
//!             RequestSchema::builder(Method::GET, "https://broker.example/{page}/")
//!                 .field(FieldDef::query("search").min_length(3).max_length(10))
//!                 .field(FieldDef::header("version").alias("X-Version"))
//!                 .field(FieldDef::path("page"))
//!                 .build()
//!                 .expect("a valid request schema")
//!         });
//!         &SCHEMA
//!     }
//!
//!     fn field_values(&self) -> FieldValues {
//!         FieldValues::new()
//!             .with("search", &self.search)
//!             .with("version", &self.version)
//!             .with("page", &self.page)
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = StatusRequest {
//!     search: "xyz".to_string(),
//!     version: "v1".to_string(),
//!     page: "health".to_string(),
//! };
//!
//! let built = request.as_request()?;
//! assert_eq!(built.url.as_str(), "https://broker.example/health/?search=xyz");
//! assert_eq!(built.headers["X-Version"], "v1");
//!
//! // with a `reqwest::blocking::Client`:
//! // let status = request.send(&client)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Schemas
//!
//! Schemas are static: build them once, in a `LazyLock`. A schema that fails to build
//! is a programming error, reported as a [`ConfigurationError`].
//!
//! ## Error Handling
//!
//! - [`ConfigurationError`] - invalid schema declaration
//! - [`BuildError`] - the values of an instance cannot make a request
//! - [`ValidationError`] - the response does not match its schema, every failing field is listed
//! - [`SendError`] - any of the above, or the transport error as-is
//!
//! ## Features
//!
//! - `blocking` (default): implements [`Transport`] for `reqwest::blocking::Client`.

mod error;
mod model;
pub mod request;
pub mod response;
pub mod transport;

pub use self::error::{
    BuildError, ConfigurationError, FailureKind, FieldFailure, SendError, ValidationError,
};
pub use self::model::{
    RequestModel, ResponseModel, send, send_async, send_raw, send_raw_async,
};
pub use self::request::{
    BuiltRequest, ClassifiedFields, ConstraintViolation, Constraints, Field, FieldDef,
    FieldValues, Location, ParamStyle, RequestBody, RequestSchema, RequestSchemaBuilder,
    UrlTemplate, assemble, build,
};
pub use self::response::{
    FieldType, RawResponse, ResponseField, ResponseSchema, ResponseSchemaBuilder, decode,
    decode_response, decode_value, decode_with,
};
pub use self::transport::{AsyncTransport, ReqwestTransportError, Transport};
