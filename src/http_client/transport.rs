use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{self, Form};
use reqwest::{Client, RequestBuilder};
use tokio_util::io::ReaderStream;

use crate::certificate::Certificate;
use crate::logger::Logger;
use crate::request::{Body, Method, Params, Part, PartValue};
use crate::{ClientConfig, Error, HeaderValidation, Result};

pub(crate) fn build_client(
    config: &ClientConfig,
    certificate: Option<&Certificate>,
    jar: &Arc<Jar>,
    logger: &dyn Logger,
) -> Result<Client> {
    let default_headers = header_map(
        Some(&config.default_headers),
        config.header_validation,
        logger,
    )?;
    let mut builder = Client::builder()
        .cookie_provider(Arc::clone(jar))
        .default_headers(default_headers)
        .danger_accept_invalid_certs(!config.ssl_check);
    if let Some(certificate) = certificate {
        builder = certificate.configure(builder)?;
    }
    builder.build().map_err(Error::Transport)
}

/// Turns caller headers into a transport header map.
///
/// Strict validation fails on the first malformed name or value. Lenient
/// validation also admits non-ASCII values and skips, rather than fails on,
/// anything the transport cannot carry at all.
pub(crate) fn header_map(
    headers: Option<&Params>,
    validation: HeaderValidation,
    logger: &dyn Logger,
) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.into_iter().flat_map(Params::iter) {
        match header_pair(name, value, validation) {
            Ok((name, value)) => {
                map.insert(name, value);
            }
            Err(Error::InvalidHeaderValue { name, reason })
                if validation == HeaderValidation::Lenient =>
            {
                logger.header_skipped(&name, &reason);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(map)
}

pub(crate) fn header_pair(
    name: &str,
    value: &str,
    validation: HeaderValidation,
) -> Result<(HeaderName, HeaderValue)> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::invalid_header(name, e))?;
    let header_value =
        HeaderValue::from_bytes(value.as_bytes()).map_err(|e| Error::invalid_header(name, e))?;
    // Strict values must be visible ASCII.
    if validation == HeaderValidation::Strict {
        header_value
            .to_str()
            .map_err(|e| Error::invalid_header(name, e))?;
    }
    Ok((header_name, header_value))
}

pub(crate) fn set_body(request_builder: RequestBuilder, body: Body) -> RequestBuilder {
    match body {
        Body::Empty => request_builder,
        Body::Raw { data, content_type } => {
            let request_builder = match content_type {
                Some(content_type) => request_builder.header(CONTENT_TYPE, content_type),
                None => request_builder,
            };
            request_builder.body(data)
        }
        Body::Multipart(parts) => request_builder.multipart(multipart_form(parts)),
        Body::FormUrlEncoded(fields) => request_builder.form(&fields),
    }
}

fn multipart_form(parts: Vec<Part>) -> Form {
    parts.into_iter().fold(Form::new(), |form, part| {
        let Part {
            key,
            value,
            filename,
        } = part;
        let part = match value {
            PartValue::Text(text) => multipart::Part::text(text),
            PartValue::Bytes(bytes) => multipart::Part::bytes(bytes),
            PartValue::Stream(reader) => {
                multipart::Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(reader)))
            }
        };
        match filename {
            Some(filename) => form.part(key, part.file_name(filename)),
            None => form.part(key, part),
        }
    })
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}
