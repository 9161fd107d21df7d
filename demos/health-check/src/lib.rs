//! Health check of the broker API, declared with `reqmodel-core`.
//!
//! ```rust
//! use health_check::HealthCheckRequest;
//! use reqmodel_core::RequestModel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = HealthCheckRequest::new("xyz", "v1", "health").as_request()?;
//!
//! assert_eq!(request.url.as_str(), "https://broker.example/health/?search=xyz");
//! # Ok(())
//! # }
//! ```
#![allow(clippy::expect_used)]
use std::sync::LazyLock;

use http::Method;
use reqmodel_core::{
    FieldDef, FieldType, FieldValues, RequestModel, RequestSchema, ResponseField,
    ResponseModel, ResponseSchema,
};
use serde::{Deserialize, Serialize};

/// URL template of the health check endpoint.
pub const HEALTH_CHECK_URL: &str = "https://broker.example/{page}/";

/// The state of a checked component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthType {
    /// The component works.
    Working,
}

impl HealthType {
    /// The wire values.
    pub const VALUES: [&str; 1] = ["working"];

    fn field_type() -> FieldType {
        FieldType::one_of(Self::VALUES)
    }
}

/// The health check report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthCheckResponse {
    /// `Cache backend: default`
    pub cache_backend_default: HealthType,
    /// `CeleryHealthCheckCelery`
    pub celery_health_check_celery: HealthType,
    /// `DatabaseBackend`
    pub database_backend: HealthType,
    /// `DefaultFileStorageHealthCheck`
    pub default_file_storage_health_check: HealthType,
    /// `Meldingen stroom`, a free text status.
    pub meldingen_stroom: String,
}

impl ResponseModel for HealthCheckResponse {
    fn schema() -> &'static ResponseSchema {
        static SCHEMA: LazyLock<ResponseSchema> = LazyLock::new(|| {
            ResponseSchema::builder()
                .field(
                    ResponseField::required("cache_backend_default", HealthType::field_type())
                        .alias("Cache backend: default"),
                )
                .field(
                    ResponseField::required("celery_health_check_celery", HealthType::field_type())
                        .alias("CeleryHealthCheckCelery"),
                )
                .field(
                    ResponseField::required("database_backend", HealthType::field_type())
                        .alias("DatabaseBackend"),
                )
                .field(
                    ResponseField::required(
                        "default_file_storage_health_check",
                        HealthType::field_type(),
                    )
                    .alias("DefaultFileStorageHealthCheck"),
                )
                .field(
                    ResponseField::required("meldingen_stroom", FieldType::String)
                        .alias("Meldingen stroom"),
                )
                .build()
                .expect("a valid health check response schema")
        });
        &SCHEMA
    }
}

/// Asks the broker for its health report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckRequest {
    /// Query `search`, 3 to 10 characters.
    pub search: String,
    /// Header `X-Version`.
    pub version: String,
    /// Header `Accept`, `application/json` when unset.
    pub accept: Option<String>,
    /// The `{page}` of the URL.
    pub page: String,
}

impl HealthCheckRequest {
    /// Creates a request with the default `Accept` header.
    pub fn new(
        search: impl Into<String>,
        version: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            version: version.into(),
            accept: None,
            page: page.into(),
        }
    }

    /// Overrides the `Accept` header.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }
}

impl RequestModel for HealthCheckRequest {
    type Response = HealthCheckResponse;

    fn schema() -> &'static RequestSchema {
        static SCHEMA: LazyLock<RequestSchema> = LazyLock::new(|| {
            RequestSchema::builder(Method::GET, HEALTH_CHECK_URL)
                .field(FieldDef::query("search").min_length(3).max_length(10))
                .field(FieldDef::header("version").alias("X-Version"))
                .field(
                    FieldDef::header("accept")
                        .alias("Accept")
                        .default_value("application/json"),
                )
                .field(FieldDef::path("page"))
                .build()
                .expect("a valid health check request schema")
        });
        &SCHEMA
    }

    fn field_values(&self) -> FieldValues {
        FieldValues::new()
            .with("search", &self.search)
            .with("version", &self.version)
            .with("accept", &self.accept)
            .with("page", &self.page)
    }
}
