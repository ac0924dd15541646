use httpmock::MockServer;

use crate::output::{parse_format, prettify_body, print::FormattedOutputter, FormatItem, Outputter};
use crate::{Body, HttpGateway, Method, Request};

#[test]
fn output_is_prettified() {
    assert_eq!("simple", prettify_body("simple"));
    assert_eq!("[1, 2]", prettify_body("[1, 2]"));

    let pretty_body = prettify_body(r#"{"stuff": "andThings"}"#);
    assert_eq!(
        r#"
{
  "stuff": "andThings"
}
        "#
        .trim(),
        pretty_body
    );
}

#[test]
fn format_parsing() {
    let result = parse_format("a%R,%H,%B");
    assert_eq!(
        result.expect("parse correctly"),
        vec![
            FormatItem::Chars("a".into()),
            FormatItem::FirstLine,
            FormatItem::Chars(",".into()),
            FormatItem::Headers,
            FormatItem::Chars(",".into()),
            FormatItem::Body
        ]
    );

    let result = parse_format("a%X");
    assert_eq!(
        result.unwrap_err().to_string(),
        "Invalid formatting character 'X'"
    );

    assert_eq!(
        parse_format("100%%%R").expect("parse correctly"),
        vec![FormatItem::Chars("100%".into()), FormatItem::FirstLine]
    );
    assert!(parse_format("trailing %").is_err());
    assert!(parse_format("").expect("parse correctly").is_empty());
}

fn sample_request() -> Request {
    let mut request = Request::with_url("http://localhost:8080/items").unwrap();
    request.set_method(Method::Post);
    request.add_query_arg("page", "2");
    request.add_header("Content-Type", "application/json");
    request.set_content(Body::text(r#"{"req":"great"}"#));
    request
}

#[test]
fn format_request() {
    let request = sample_request();

    let mut buffer = Vec::new();
    let empty = parse_format("").unwrap();
    FormattedOutputter::new(&mut buffer, empty.clone(), empty)
        .request(&request)
        .expect("print works correctly");
    assert_eq!("", String::from_utf8(buffer).unwrap());

    let mut buffer = Vec::new();
    let full = parse_format("%R\n%H\n%B\n").unwrap();
    FormattedOutputter::new(&mut buffer, full.clone(), full)
        .request(&request)
        .expect("print works correctly");
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        r#"POST http://localhost:8080/items?page=2
Content-Type: application/json

{
  "req": "great"
}
"#
    );
}

#[test]
fn format_request_bodies() {
    let format = parse_format("%B").unwrap();

    let mut request = Request::with_url("http://localhost/").unwrap();
    request.add_form_url_encoded_field("user", "alice");
    request.add_form_url_encoded_field("lang", "en");
    let mut buffer = Vec::new();
    FormattedOutputter::new(&mut buffer, format.clone(), format.clone())
        .request(&request)
        .unwrap();
    assert_eq!("user=alice&lang=en", String::from_utf8(buffer).unwrap());

    let mut request = Request::with_url("http://localhost/").unwrap();
    request.add_multipart_text("title", "report");
    request.add_multipart_bytes("file", vec![0u8; 3], Some("data.bin"));
    let mut buffer = Vec::new();
    FormattedOutputter::new(&mut buffer, format.clone(), format)
        .request(&request)
        .unwrap();
    assert_eq!(
        "title=report\nfile=<3 bytes> (data.bin)\n",
        String::from_utf8(buffer).unwrap()
    );
}

#[tokio::test]
async fn format_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET).path("/resp");
            then.status(200)
                .header("content-type", "text/json")
                .body(r#"{"resp":"great-resp"}"#);
        })
        .await;

    let gateway = HttpGateway::new().unwrap();
    let mut response = gateway.get(&server.url("/resp"), None, None).await.unwrap();
    let body = response.text().await.unwrap();

    let mut buffer = Vec::new();
    let format = parse_format("%R\n%B\n").unwrap();
    FormattedOutputter::new(&mut buffer, format.clone(), format)
        .response(&response, &body)
        .unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        r#"HTTP/1.1 200 OK
{
  "resp": "great-resp"
}
"#
    );

    let mut buffer = Vec::new();
    let format = parse_format("%H").unwrap();
    FormattedOutputter::new(&mut buffer, format.clone(), format)
        .response(&response, &body)
        .unwrap();
    assert!(String::from_utf8(buffer)
        .unwrap()
        .contains("content-type: text/json\n"));
}
