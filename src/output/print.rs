use std::io::Write;

use anyhow::Result;
use reqwest::header::HeaderMap;

use crate::output::{prettify_body, FormatItem, Outputter};
use crate::request::{query_string, Body, Params, PartValue};
use crate::{Request, Response};

pub struct FormattedOutputter<'a, W: Write> {
    writer: &'a mut W,
    request_format: Vec<FormatItem>,
    response_format: Vec<FormatItem>,
}

impl<'a, W: Write> FormattedOutputter<'a, W> {
    pub fn new(
        writer: &'a mut W,
        request_format: Vec<FormatItem>,
        response_format: Vec<FormatItem>,
    ) -> FormattedOutputter<'a, W> {
        FormattedOutputter {
            writer,
            request_format,
            response_format,
        }
    }

    fn write_items<F>(&mut self, items: &[FormatItem], render: F) -> Result<()>
    where
        F: Fn(&FormatItem) -> String,
    {
        for item in items {
            let to_write = match item {
                FormatItem::Chars(s) => s.clone(),
                item => render(item),
            };
            self.writer.write_all(to_write.as_bytes())?;
        }
        Ok(())
    }
}

fn format_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}: {}\n", key, value))
        .collect()
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(key, value)| format!("{}: {}\n", key, String::from_utf8_lossy(value.as_bytes())))
        .collect()
}

fn format_request_body(body: &Body) -> String {
    match body {
        Body::Empty => String::new(),
        Body::Raw { data, .. } => prettify_body(&String::from_utf8_lossy(data)),
        Body::FormUrlEncoded(fields) => query_string(Some(fields)).trim_start_matches('?').to_string(),
        Body::Multipart(parts) => parts
            .iter()
            .map(|part| {
                let value = match &part.value {
                    PartValue::Text(text) => text.clone(),
                    PartValue::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
                    PartValue::Stream(_) => String::from("<stream>"),
                };
                match &part.filename {
                    Some(filename) => format!("{}={} ({})\n", part.key, value, filename),
                    None => format!("{}={}\n", part.key, value),
                }
            })
            .collect(),
    }
}

impl<'a, W: Write> Outputter for FormattedOutputter<'a, W> {
    fn request(&mut self, request: &Request) -> Result<()> {
        let first_line = format!(
            "{} {}{}",
            request.method(),
            request.url(),
            query_string(Some(request.query_args()))
        );
        let headers = format_params(request.headers());
        let body = format_request_body(request.content());
        let format = self.request_format.clone();

        self.write_items(&format, |item| match item {
            FormatItem::FirstLine => first_line.clone(),
            FormatItem::Headers => headers.clone(),
            _ => body.clone(),
        })
    }

    fn response(&mut self, response: &Response, body: &str) -> Result<()> {
        let first_line = format!("{} {}", response.version(), response.status());
        let headers = format_headers(response.headers());
        let body = prettify_body(body);
        let format = self.response_format.clone();

        self.write_items(&format, |item| match item {
            FormatItem::FirstLine => first_line.clone(),
            FormatItem::Headers => headers.clone(),
            _ => body.clone(),
        })
    }
}
