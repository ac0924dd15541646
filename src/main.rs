//! # rest-client
//!
//! A command line front end for the `rest_client` gateway: one request per
//! invocation, printed before it is sent and followed by the response.
//!
//! ```text,no_run
//! $ rest-client -H 'Accept: application/json' -q page=2 GET https://httpbin.org/get
//! GET https://httpbin.org/get?page=2
//!
//! HTTP/1.1 200 OK
//! content-type: application/json
//! ...
//! ```
//!
//! Bodies come from `-d` (raw text), `-j` (JSON), `-f` (url-encoded field) or
//! `-F` (multipart part; `key=@path` streams a file). Press Ctrl-C to cancel
//! the request in flight.

use std::io::stdout;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{App, Arg, ArgMatches};
use rest_client::output::{parse_format, print::FormattedOutputter, Outputter};
use rest_client::{
    Body, Certificate, ClientConfig, HeaderValidation, HttpGateway, Method, Request,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("rest-client")
        .version(VERSION)
        .about("Sends a single HTTP request and prints the exchange")
        .arg(
            Arg::with_name("METHOD")
                .required(true)
                .index(1)
                .validator(is_valid_method)
                .help("GET, POST, PUT, PATCH, DELETE, OPTIONS or HEAD"),
        )
        .arg(Arg::with_name("URL").required(true).index(2))
        .arg(
            Arg::with_name("HEADER")
                .short("H")
                .long("header")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A request header, as 'Name: value'"),
        )
        .arg(
            Arg::with_name("QUERY")
                .short("q")
                .long("query")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A query argument, as key=value"),
        )
        .arg(
            Arg::with_name("DATA")
                .short("d")
                .long("data")
                .takes_value(true)
                .conflicts_with_all(&["JSON", "FORM", "MULTIPART"])
                .help("A raw text body"),
        )
        .arg(
            Arg::with_name("JSON")
                .short("j")
                .long("json")
                .takes_value(true)
                .conflicts_with_all(&["FORM", "MULTIPART"])
                .help("A JSON body, sent as application/json"),
        )
        .arg(
            Arg::with_name("FORM")
                .short("f")
                .long("form")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .conflicts_with("MULTIPART")
                .help("A url-encoded form field, as key=value"),
        )
        .arg(
            Arg::with_name("MULTIPART")
                .short("F")
                .long("multipart")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A multipart part, as key=value or key=@path to upload a file"),
        )
        .arg(
            Arg::with_name("COOKIE")
                .short("b")
                .long("cookie")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A cookie sent with the request, as name=value"),
        )
        .arg(
            Arg::with_name("ACCEPT_INVALID_CERT")
                .short("k")
                .long("danger-accept-invalid-certs")
                .help("Controls the use of certificate validation."),
        )
        .arg(
            Arg::with_name("LENIENT_HEADERS")
                .long("lenient-headers")
                .help("Skip malformed headers instead of failing the request"),
        )
        .arg(
            Arg::with_name("IDENTITY")
                .long("identity")
                .takes_value(true)
                .help("A PEM file holding the client private key and certificate chain"),
        )
        .arg(
            Arg::with_name("RESPONSE_OUTPUT_FORMAT")
                .long("response-output-format")
                .default_value("%R\n%H\n%B\n")
                .hide_default_value(true)
                .help("Define the format for print the response, possible options %R response line, %H headers, %B body \n[default: %R\\n%H\\n%B\\n]")
        )
        .arg(
            Arg::with_name("REQUEST_OUTPUT_FORMAT")
                .long("request-output-format")
                .default_value("%R\n\n")
                .hide_default_value(true)
                .help("Define the format for print the request, possible options %R request line, %H headers, %B body \n[default: %R\\n\\n]")
        )
        .usage("rest-client [OPTIONS] <METHOD> <URL>")
        .get_matches();

    let mut config = ClientConfig::new(!matches.is_present("ACCEPT_INVALID_CERT"));
    if matches.is_present("LENIENT_HEADERS") {
        config.header_validation = HeaderValidation::Lenient;
    }
    if let Some(path) = matches.value_of("IDENTITY") {
        let pem = tokio::fs::read(path)
            .await
            .with_context(|| format!("Could not read identity file {}", path))?;
        config.certificate = Some(Arc::new(Certificate::from_identity_pem(&pem)?));
    }

    let gateway = HttpGateway::create(config)?;
    let cancel = gateway.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let request = build_request(&matches).await?;

    let response_format = matches.value_of("RESPONSE_OUTPUT_FORMAT").unwrap_or_default();
    let request_format = matches.value_of("REQUEST_OUTPUT_FORMAT").unwrap_or_default();
    let mut stdout = stdout();
    let mut outputter = FormattedOutputter::new(
        &mut stdout,
        parse_format(request_format)?,
        parse_format(response_format)?,
    );

    outputter.request(&request)?;
    let mut response = gateway.perform_request(request).await?;
    let body = response.text().await?;
    outputter.response(&response, &body)
}

async fn build_request(matches: &ArgMatches<'_>) -> Result<Request> {
    let url = matches.value_of("URL").unwrap_or_default();
    let mut request = Request::with_url(url)?;
    let method = matches
        .value_of("METHOD")
        .unwrap_or_default()
        .parse::<Method>()
        .map_err(|e| anyhow!(e))?;
    request.set_method(method);

    for header in matches.values_of("HEADER").into_iter().flatten() {
        let (name, value) = split_pair(header, ':')?;
        request.add_header(name, value.trim_start());
    }
    for arg in matches.values_of("QUERY").into_iter().flatten() {
        let (key, value) = split_pair(arg, '=')?;
        request.add_query_arg(key, value);
    }
    for cookie in matches.values_of("COOKIE").into_iter().flatten() {
        let (name, value) = split_pair(cookie, '=')?;
        request.add_cookie(name, value);
    }

    if let Some(data) = matches.value_of("DATA") {
        request.set_content(Body::text(data));
    }
    if let Some(json) = matches.value_of("JSON") {
        let value: serde_json::Value =
            serde_json::from_str(json).context("The JSON body is not valid JSON")?;
        request.set_content(Body::json(&value)?);
    }
    for field in matches.values_of("FORM").into_iter().flatten() {
        let (key, value) = split_pair(field, '=')?;
        request.add_form_url_encoded_field(key, value);
    }
    for part in matches.values_of("MULTIPART").into_iter().flatten() {
        let (key, value) = split_pair(part, '=')?;
        match value.strip_prefix('@') {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Could not open {}", path))?;
                let filename = Path::new(path).file_name().and_then(|name| name.to_str());
                request.add_multipart_stream(key, file, filename);
            }
            None => request.add_multipart_text(key, value),
        }
    }

    Ok(request)
}

fn split_pair(pair: &str, separator: char) -> Result<(&str, &str)> {
    pair.split_once(separator)
        .ok_or_else(|| anyhow!("Expected '{}' in '{}'", separator, pair))
}

fn is_valid_method(val: String) -> Result<(), String> {
    val.parse::<Method>().map(|_| ())
}
