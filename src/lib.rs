//! # rest-client
//!
//! A thin async gateway over [reqwest](https://docs.rs/reqwest): typed verb
//! calls, a request builder with multipart and url-encoded bodies, cookie and
//! client-certificate plumbing, and status classification for responses.
//!
//! ```no_run
//! use rest_client::{HttpGateway, Params};
//!
//! # async fn run() -> rest_client::Result<()> {
//! let gateway = HttpGateway::new()?;
//! let query: Params = vec![("q", "1")].into_iter().collect();
//! let headers: Params = vec![("Accept", "application/json")].into_iter().collect();
//!
//! let mut response = gateway
//!     .get("https://example.com/api", Some(&query), Some(&headers))
//!     .await?;
//! let status = response.status().to_owned();
//! println!("{} {}", status, response.text().await?);
//! # Ok(())
//! # }
//! ```
//!
//! Requests can also be prepared up front and sent in one go:
//!
//! ```no_run
//! use rest_client::{HttpGateway, Method, Request};
//!
//! # async fn run() -> rest_client::Result<()> {
//! let mut request = Request::with_url("https://example.com/upload")?;
//! request.set_method(Method::Post);
//! request.add_multipart_text("title", "report");
//! request.add_multipart_bytes("file", b"...".to_vec(), Some("report.bin"));
//!
//! let response = HttpGateway::new()?.perform_request(request).await?;
//! assert!(response.is_successful());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod certificate;
mod error;
pub mod http_client;
pub mod logger;
pub mod output;
pub mod request;
pub mod response;
pub mod validation;

pub use certificate::Certificate;
pub use error::{Error, Result};
pub use http_client::HttpGateway;
pub use request::{Body, Method, Params, Request};
pub use response::{Response, StatusClass, Version};
pub use validation::is_valid_url;

pub use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderValidation {
    /// Malformed header names or values fail the call.
    #[default]
    Strict,
    /// Header values may carry any byte the wire allows; headers that still
    /// cannot be sent are skipped with a warning.
    Lenient,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub header_validation: HeaderValidation,
    pub ssl_check: bool,
    pub default_headers: Params,
    pub certificate: Option<Arc<Certificate>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            header_validation: HeaderValidation::default(),
            ssl_check: true,
            default_headers: Params::new(),
            certificate: None,
        }
    }
}

impl ClientConfig {
    pub fn new(ssl_check: bool) -> Self {
        Self {
            ssl_check,
            ..Self::default()
        }
    }
}
