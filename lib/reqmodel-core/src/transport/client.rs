use reqwest::{Body, Client, Request};
use tracing::debug;

use super::AsyncTransport;
use crate::{BuildError, BuiltRequest, RawResponse};

/// Errors of the `reqwest` transports.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ReqwestTransportError {
    /// The built request cannot be expressed as a `reqwest` request.
    #[display("Invalid request: {_0}")]
    Request(BuildError),

    /// The HTTP call failed.
    #[display("HTTP error: {_0}")]
    Http(reqwest::Error),
}

impl AsyncTransport for Client {
    type Error = ReqwestTransportError;

    async fn send(&self, request: BuiltRequest) -> Result<RawResponse, ReqwestTransportError> {
        let request = build_request(request)?;

        debug!(?request, "sending...");
        let response = self.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, headers, body))
    }
}

fn build_request(built: BuiltRequest) -> Result<Request, BuildError> {
    let headers = built.to_header_map()?;
    let body = built.body.as_ref().map(|body| body.to_bytes()).transpose()?;

    let mut request = Request::new(built.method, built.url);
    *request.headers_mut() = headers;
    if let Some(body) = body {
        *request.body_mut() = Some(Body::from(body));
    }

    Ok(request)
}

#[cfg(feature = "blocking")]
mod blocking {
    use reqwest::blocking::{Body, Client, Request};
    use tracing::debug;

    use super::ReqwestTransportError;
    use crate::{BuildError, BuiltRequest, RawResponse, Transport};

    impl Transport for Client {
        type Error = ReqwestTransportError;

        fn send(&self, request: BuiltRequest) -> Result<RawResponse, ReqwestTransportError> {
            let request = build_request(request)?;

            debug!(?request, "sending...");
            let response = self.execute(request)?;
            debug!(?response, "...receiving");

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes()?;
            Ok(RawResponse::new(status, headers, body))
        }
    }

    fn build_request(built: BuiltRequest) -> Result<Request, BuildError> {
        let headers = built.to_header_map()?;
        let body = built.body.as_ref().map(|body| body.to_bytes()).transpose()?;

        let mut request = Request::new(built.method, built.url);
        *request.headers_mut() = headers;
        if let Some(body) = body {
            *request.body_mut() = Some(Body::from(body));
        }

        Ok(request)
    }
}
