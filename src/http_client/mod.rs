use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::certificate::Certificate;
use crate::logger::{LogLogger, Logger};
use crate::request::{query_string, Body, Method, Params, Request};
use crate::response::Response;
use crate::validation::{base_url, parse_url};
use crate::{ClientConfig, Error, HeaderValidation, Result};


mod transport;

/// Turns requests into single round trips on the transport.
///
/// Every call validates its url and headers before any I/O, sends exactly
/// once and hands back either a [`Response`] or an error. Nothing is retried.
///
/// Query arguments are appended to the url verbatim, so a url carrying a
/// `#fragment` is rejected with [`Error::InvalidUrl`] whenever a non-empty
/// query is supplied.
///
/// The cancellation token is shared by all calls: once it fires, in-flight
/// calls and body reads end with [`Error::Cancelled`], and so does every later
/// call until a fresh token is installed.
pub struct HttpGateway {
    config: ClientConfig,
    client: Client,
    jar: Arc<Jar>,
    logger: Arc<dyn Logger>,
    cancel: CancellationToken,
}

impl HttpGateway {
    pub fn new() -> Result<HttpGateway> {
        Self::create(ClientConfig::default())
    }

    pub fn create(config: ClientConfig) -> Result<HttpGateway> {
        Self::with_logger(config, Arc::new(LogLogger))
    }

    pub fn with_logger(config: ClientConfig, logger: Arc<dyn Logger>) -> Result<HttpGateway> {
        let jar = Arc::new(Jar::default());
        let client =
            transport::build_client(&config, config.certificate.as_deref(), &jar, logger.as_ref())?;
        Ok(HttpGateway {
            config,
            client,
            jar,
            logger,
            cancel: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    pub fn set_header_validation(&mut self, header_validation: HeaderValidation) -> Result<()> {
        self.config.header_validation = header_validation;
        self.rebuild()
    }

    /// Gateway-wide client identity, used by every call whose request does
    /// not bring its own.
    pub fn set_certificate(&mut self, certificate: Option<Arc<Certificate>>) -> Result<()> {
        self.config.certificate = certificate;
        self.rebuild()
    }

    pub fn set_cancellation_token(&mut self, cancel: CancellationToken) {
        self.cancel = cancel;
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stores a `Set-Cookie` style string under the url's `scheme://host:port`.
    pub fn set_cookie(&self, url: &str, cookie: &str) -> Result<()> {
        let base = base_url(&parse_url(url)?)?;
        self.jar.add_cookie_str(cookie, &base);
        Ok(())
    }

    /// The `Cookie` header value the gateway would send to the url's
    /// `scheme://host:port`, if any cookie is stored for it.
    pub fn cookies(&self, url: &str) -> Result<Option<String>> {
        let base = base_url(&parse_url(url)?)?;
        Ok(self
            .jar
            .cookies(&base)
            .and_then(|value| value.to_str().ok().map(String::from)))
    }

    pub async fn get(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
    ) -> Result<Response> {
        self.dispatch(Method::Get, url, query, headers, None).await
    }

    pub async fn post(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
        content: Option<Body>,
    ) -> Result<Response> {
        self.dispatch(Method::Post, url, query, headers, content).await
    }

    pub async fn put(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
        content: Option<Body>,
    ) -> Result<Response> {
        self.dispatch(Method::Put, url, query, headers, content).await
    }

    pub async fn patch(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
        content: Option<Body>,
    ) -> Result<Response> {
        self.dispatch(Method::Patch, url, query, headers, content).await
    }

    pub async fn delete(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
    ) -> Result<Response> {
        self.dispatch(Method::Delete, url, query, headers, None).await
    }

    pub async fn options(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
        content: Option<Body>,
    ) -> Result<Response> {
        self.dispatch(Method::Options, url, query, headers, content).await
    }

    pub async fn head(
        &self,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
    ) -> Result<Response> {
        self.dispatch(Method::Head, url, query, headers, None).await
    }

    /// Sends a prepared request through the entry point for its method.
    ///
    /// A request certificate gets a transport of its own for this call; request
    /// cookies are seeded into the shared jar first. GET, DELETE and HEAD never
    /// send the request body.
    pub async fn perform_request(&self, request: Request) -> Result<Response> {
        let Request {
            url,
            method,
            headers,
            query_args,
            cookies,
            body,
            certificate,
        } = request;

        if !cookies.is_empty() {
            let base = base_url(&parse_url(&url)?)?;
            for (name, value) in cookies.iter() {
                self.jar.add_cookie_str(&format!("{}={}", name, value), &base);
            }
        }

        let scoped;
        let gateway = match certificate {
            Some(certificate) => {
                scoped = self.scoped(&certificate)?;
                &scoped
            }
            None => self,
        };

        let (url, query, headers) = (url.as_str(), Some(&query_args), Some(&headers));
        let content = method.carries_body().then_some(body);
        match method {
            Method::Get => gateway.get(url, query, headers).await,
            Method::Post => gateway.post(url, query, headers, content).await,
            Method::Put => gateway.put(url, query, headers, content).await,
            Method::Patch => gateway.patch(url, query, headers, content).await,
            Method::Delete => gateway.delete(url, query, headers).await,
            Method::Options => gateway.options(url, query, headers, content).await,
            Method::Head => gateway.head(url, query, headers).await,
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        query: Option<&Params>,
        headers: Option<&Params>,
        content: Option<Body>,
    ) -> Result<Response> {
        let query = query_string(query);
        // The query would land inside the fragment and never reach the server.
        if parse_url(url)?.fragment().is_some() && !query.is_empty() {
            return Err(Error::InvalidUrl(url.to_string()));
        }
        let target = parse_url(&format!("{}{}", url, query))?;
        let headers =
            transport::header_map(headers, self.config.header_validation, self.logger.as_ref())?;

        let mut request_builder = self.client.request(method.into(), target);
        if let Some(content) = content {
            request_builder = transport::set_body(request_builder, content);
        }
        request_builder = request_builder.headers(headers);

        self.logger.request(method, url, &query);
        let sent = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            sent = request_builder.send() => Some(sent),
        };
        let result = match sent {
            None => Err(Error::Cancelled),
            Some(sent) => sent.map_err(Error::RequestFailed),
        };

        match result {
            Ok(response) => {
                self.logger.response(method, url, response.status().as_u16());
                Ok(Response::new(response, self.cancel.clone()))
            }
            Err(e) => {
                self.logger.failed(method, url, &e);
                Err(e)
            }
        }
    }

    fn scoped(&self, certificate: &Certificate) -> Result<HttpGateway> {
        let client = transport::build_client(
            &self.config,
            Some(certificate),
            &self.jar,
            self.logger.as_ref(),
        )?;
        Ok(HttpGateway {
            config: self.config.clone(),
            client,
            jar: Arc::clone(&self.jar),
            logger: Arc::clone(&self.logger),
            cancel: self.cancel.clone(),
        })
    }

    fn rebuild(&mut self) -> Result<()> {
        self.client = transport::build_client(
            &self.config,
            self.config.certificate.as_deref(),
            &self.jar,
            self.logger.as_ref(),
        )?;
        Ok(())
    }
}
