use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::AsyncRead;

use crate::certificate::Certificate;
use crate::validation::is_valid_url;
use crate::{Error, Result};


/// Filename given to file parts added without one.
pub const DEFAULT_FILE_NAME: &str = "default";

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl Method {
    /// Whether the verb's entry point accepts a body.
    pub fn carries_body(&self) -> bool {
        matches!(
            self,
            Method::Post | Method::Put | Method::Patch | Method::Options
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match *self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
        };
        f.write_str(method)
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            "HEAD" => Ok(Method::Head),
            _ => Err(format!("Unsupported method '{}'", s)),
        }
    }
}

/// Ordered string pairs with unique keys.
///
/// Inserting an existing key replaces its value in place, so the original
/// position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Params {
        Params(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Serializes query arguments as `?k1=v1&k2=v2`.
///
/// Values are written as given; percent-encoding is the caller's job. Absent
/// and empty arguments both yield an empty string.
pub fn query_string(args: Option<&Params>) -> String {
    match args {
        Some(args) if !args.is_empty() => {
            let pairs: Vec<String> = args
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            format!("?{}", pairs.join("&"))
        }
        _ => String::new(),
    }
}

pub type BodyReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

pub enum PartValue {
    Text(String),
    Bytes(Vec<u8>),
    Stream(BodyReader),
}

impl fmt::Debug for PartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            PartValue::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            PartValue::Stream(_) => f.write_str("Stream"),
        }
    }
}

#[derive(Debug)]
pub struct Part {
    pub key: String,
    pub value: PartValue,
    pub filename: Option<String>,
}

#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Raw {
        data: Vec<u8>,
        content_type: Option<String>,
    },
    Multipart(Vec<Part>),
    FormUrlEncoded(Params),
}

impl Body {
    pub fn text(text: impl Into<String>) -> Body {
        Body::Raw {
            data: text.into().into_bytes(),
            content_type: Some("text/plain; charset=utf-8".to_string()),
        }
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Body {
        Body::Raw {
            data: data.into(),
            content_type: None,
        }
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Body> {
        Ok(Body::Raw {
            data: serde_json::to_vec(value)?,
            content_type: Some("application/json".to_string()),
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    fn multipart_parts(&mut self) -> &mut Vec<Part> {
        if !matches!(self, Body::Multipart(_)) {
            *self = Body::Multipart(Vec::new());
        }
        match self {
            Body::Multipart(parts) => parts,
            _ => unreachable!("body was just switched to multipart"),
        }
    }

    fn form_fields(&mut self) -> &mut Params {
        if !matches!(self, Body::FormUrlEncoded(_)) {
            *self = Body::FormUrlEncoded(Params::new());
        }
        match self {
            Body::FormUrlEncoded(fields) => fields,
            _ => unreachable!("body was just switched to a url-encoded form"),
        }
    }
}

/// A request under construction.
///
/// The url only changes through validating setters, so a request either
/// holds a valid http(s) url or none at all.
#[derive(Debug, Default)]
pub struct Request {
    pub(crate) url: String,
    pub(crate) method: Method,
    pub(crate) headers: Params,
    pub(crate) query_args: Params,
    pub(crate) cookies: Params,
    pub(crate) body: Body,
    pub(crate) certificate: Option<Arc<Certificate>>,
}

impl Request {
    pub fn new() -> Request {
        Request::default()
    }

    pub fn with_url(url: &str) -> Result<Request> {
        let mut request = Request::new();
        request.set_url(url)?;
        Ok(request)
    }

    pub fn set_url(&mut self, url: &str) -> Result<()> {
        if !is_valid_url(url) {
            return Err(Error::InvalidUrl(url.to_string()));
        }
        self.url = url.to_string();
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key, value);
    }

    pub fn headers(&self) -> &Params {
        &self.headers
    }

    pub fn add_query_arg(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_args.insert(key, value);
    }

    pub fn query_args(&self) -> &Params {
        &self.query_args
    }

    /// Cookie seeded into the gateway's jar for this request's host before sending.
    pub fn add_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name, value);
    }

    pub fn cookies(&self) -> &Params {
        &self.cookies
    }

    pub fn set_content(&mut self, body: Body) {
        self.body = body;
    }

    pub fn content(&self) -> &Body {
        &self.body
    }

    pub fn add_multipart_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.body.multipart_parts().push(Part {
            key: key.into(),
            value: PartValue::Text(value.into()),
            filename: None,
        });
    }

    pub fn add_multipart_bytes(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
        filename: Option<&str>,
    ) {
        self.body.multipart_parts().push(Part {
            key: key.into(),
            value: PartValue::Bytes(value.into()),
            filename: Some(filename.unwrap_or(DEFAULT_FILE_NAME).to_string()),
        });
    }

    pub fn add_multipart_stream<R>(&mut self, key: impl Into<String>, value: R, filename: Option<&str>)
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        self.body.multipart_parts().push(Part {
            key: key.into(),
            value: PartValue::Stream(Box::new(value)),
            filename: Some(filename.unwrap_or(DEFAULT_FILE_NAME).to_string()),
        });
    }

    pub fn add_form_url_encoded_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.body.form_fields().insert(key, value);
    }

    pub fn set_certificate(&mut self, certificate: Option<Arc<Certificate>>) {
        self.certificate = certificate;
    }

    pub fn certificate(&self) -> Option<&Arc<Certificate>> {
        self.certificate.as_ref()
    }
}
