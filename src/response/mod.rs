use std::fmt;

use bytes::Bytes;
use futures::{stream, Stream, StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{Error, Result};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Successful,
    /// 3xx
    Redirected,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl StatusClass {
    /// Buckets a status code; informational and out-of-range codes have no class.
    pub fn from_code(code: u16) -> Option<StatusClass> {
        match code {
            200..=299 => Some(StatusClass::Successful),
            300..=399 => Some(StatusClass::Redirected),
            400..=499 => Some(StatusClass::ClientError),
            500..=599 => Some(StatusClass::ServerError),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http09,
    Http10,
    Http11,
    Http2,
    Http3,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match *self {
            Version::Http09 => "HTTP/0.9",
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
            Version::Http2 => "HTTP/2.0",
            Version::Http3 => "HTTP/3.0",
        };
        f.write_str(version)
    }
}

/// A completed round trip.
///
/// Only the gateway constructs one, and only from a transport response that
/// actually arrived. Status, version and headers are captured up front; the
/// body stays with the transport until one of the readers takes it, after
/// which further reads fail with [`Error::UnreadableBody`].
pub struct Response {
    url: Url,
    status_code: u16,
    status: String,
    version: Version,
    headers: HeaderMap,
    body: Option<reqwest::Response>,
    cancel: CancellationToken,
}

impl Response {
    pub(crate) fn new(response: reqwest::Response, cancel: CancellationToken) -> Response {
        Response {
            url: response.url().clone(),
            status_code: response.status().as_u16(),
            status: response.status().to_string(),
            version: response.version().into(),
            headers: response.headers().clone(),
            body: Some(response),
            cancel,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Code and reason phrase, e.g. `404 Not Found`.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_class(&self) -> Option<StatusClass> {
        StatusClass::from_code(self.status_code)
    }

    pub fn is_successful(&self) -> bool {
        self.status_class() == Some(StatusClass::Successful)
    }

    pub fn is_redirected(&self) -> bool {
        self.status_class() == Some(StatusClass::Redirected)
    }

    pub fn is_client_error(&self) -> bool {
        self.status_class() == Some(StatusClass::ClientError)
    }

    pub fn is_server_error(&self) -> bool {
        self.status_class() == Some(StatusClass::ServerError)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL, after any redirects the transport followed.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_consumed(&self) -> bool {
        self.body.is_none()
    }

    pub async fn text(&mut self) -> Result<String> {
        let body = self.take_body()?;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            text = body.text() => text.map_err(Error::RequestFailed),
        }
    }

    pub async fn bytes(&mut self) -> Result<Bytes> {
        let body = self.take_body()?;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            bytes = body.bytes() => bytes.map_err(Error::RequestFailed),
        }
    }

    /// Body as a stream of chunks. Cancellation ends the stream with a
    /// final `Err(Error::Cancelled)`.
    pub fn stream(&mut self) -> Result<impl Stream<Item = Result<Bytes>>> {
        let chunks = Box::pin(self.take_body()?.bytes_stream().map_err(Error::RequestFailed));
        let cancel = self.cancel.clone();
        Ok(stream::unfold(
            Some((chunks, cancel)),
            |state| async move {
                let (mut chunks, cancel) = state?;
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    chunk = chunks.next() => Some(chunk),
                };
                match next {
                    None => Some((Err(Error::Cancelled), None)),
                    Some(chunk) => chunk.map(|chunk| (chunk, Some((chunks, cancel)))),
                }
            },
        ))
    }

    fn take_body(&mut self) -> Result<reqwest::Response> {
        self.body.take().ok_or(Error::UnreadableBody)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("url", &self.url.as_str())
            .field("status", &self.status)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl From<reqwest::Version> for Version {
    fn from(version: reqwest::Version) -> Self {
        match version {
            reqwest::Version::HTTP_09 => Version::Http09,
            reqwest::Version::HTTP_10 => Version::Http10,
            reqwest::Version::HTTP_2 => Version::Http2,
            reqwest::Version::HTTP_3 => Version::Http3,
            _ => Version::Http11,
        }
    }
}
