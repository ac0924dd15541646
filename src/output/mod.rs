pub mod print;

#[cfg(test)]
mod tests;

use anyhow::{anyhow, Result};

use crate::{Request, Response};

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum FormatItem {
    FirstLine,
    Headers,
    Body,
    Chars(String),
}

/// Parses an output format: `%R` first line, `%H` headers, `%B` body and
/// `%%` a literal percent sign.
pub fn parse_format(format: &str) -> Result<Vec<FormatItem>> {
    let mut items = Vec::new();
    let mut chars = String::new();
    let mut input = format.chars();
    while let Some(ch) = input.next() {
        if ch != '%' {
            chars.push(ch);
            continue;
        }
        let item = match input.next() {
            Some('%') => {
                chars.push('%');
                continue;
            }
            Some('R') => FormatItem::FirstLine,
            Some('H') => FormatItem::Headers,
            Some('B') => FormatItem::Body,
            Some(other) => return Err(anyhow!("Invalid formatting character '{}'", other)),
            None => return Err(anyhow!("Format ends with a dangling '%'")),
        };
        if !chars.is_empty() {
            items.push(FormatItem::Chars(std::mem::take(&mut chars)));
        }
        items.push(item);
    }
    if !chars.is_empty() {
        items.push(FormatItem::Chars(chars));
    }
    Ok(items)
}

fn prettify_body(body: &str) -> String {
    match serde_json::from_str(body) {
        Ok(serde_json::Value::Object(object)) => {
            serde_json::to_string_pretty(&object).unwrap_or_else(|_| String::from(body))
        }
        _ => String::from(body),
    }
}

/// Renders requests before they are sent and responses once their body has
/// been read.
pub trait Outputter {
    fn request(&mut self, request: &Request) -> Result<()>;
    fn response(&mut self, response: &Response, body: &str) -> Result<()>;
}
