//! Upstream client: director step and the forwarding hop.
//!
//! # Responsibilities
//! - Resolve the configured origin into a scheme + authority once at startup
//! - Rewrite each outbound request's URI and Host header to the origin
//! - Forward over a pooled HTTP client and hand back the raw response
//!
//! # Design Decisions
//! - The target is fixed for the process lifetime; policy reload does not
//!   change where traffic goes
//! - Connection reuse is delegated to the client's pool

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{header, HeaderValue, Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use url::Url;

/// Errors from upstream resolution and forwarding.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configured target does not resolve to a usable origin.
    #[error("invalid upstream target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The forwarding hop failed (connect, write, or read).
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
}

/// Client for the single configured origin.
#[derive(Debug)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    host_value: HeaderValue,
}

impl UpstreamClient {
    /// Resolve `target_url` + `target_port` into a forwarding target.
    pub fn new(target_url: &str, target_port: &str) -> Result<Self, UpstreamError> {
        let joined = format!("{}:{}", target_url, target_port);
        let invalid = |reason: String| UpstreamError::InvalidTarget {
            target: joined.clone(),
            reason,
        };

        let url = Url::parse(&joined).map_err(|e| invalid(e.to_string()))?;

        let scheme: Scheme = url
            .scheme()
            .parse()
            .map_err(|_| invalid(format!("unsupported scheme {:?}", url.scheme())))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority: Authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
        .parse()
        .map_err(|e| invalid(format!("invalid authority: {}", e)))?;

        let host_value = HeaderValue::from_str(authority.as_str())
            .map_err(|e| invalid(format!("host not a valid header value: {}", e)))?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            scheme,
            authority,
            host_value,
        })
    }

    /// Mutate the request before the hop: point the URI at the origin and
    /// set the outbound Host header.
    fn director(&self, req: &mut Request<Body>) {
        let mut parts = req.uri().clone().into_parts();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        if let Ok(uri) = Uri::from_parts(parts) {
            *req.uri_mut() = uri;
        }
        req.headers_mut()
            .insert(header::HOST, self.host_value.clone());
    }

    /// Forward a request to the origin and return its raw response.
    pub async fn forward(&self, mut req: Request<Body>) -> Result<Response<Body>, UpstreamError> {
        self.director(&mut req);

        tracing::debug!(uri = %req.uri(), "Forwarding to upstream");

        let response = self.client.request(req).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    /// The resolved origin authority (host:port).
    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}
