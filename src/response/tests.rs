use crate::response::{StatusClass, Version};

#[test]
fn classifies_by_hundreds() {
    assert_eq!(Some(StatusClass::Successful), StatusClass::from_code(201));
    assert_eq!(Some(StatusClass::Redirected), StatusClass::from_code(301));
    assert_eq!(Some(StatusClass::ClientError), StatusClass::from_code(404));
    assert_eq!(Some(StatusClass::ServerError), StatusClass::from_code(503));
}

#[test]
fn class_boundaries() {
    assert_eq!(Some(StatusClass::Successful), StatusClass::from_code(200));
    assert_eq!(Some(StatusClass::Successful), StatusClass::from_code(299));
    assert_eq!(Some(StatusClass::Redirected), StatusClass::from_code(300));
    assert_eq!(Some(StatusClass::ServerError), StatusClass::from_code(599));
}

#[test]
fn informational_and_out_of_range_codes_have_no_class() {
    assert_eq!(None, StatusClass::from_code(100));
    assert_eq!(None, StatusClass::from_code(199));
    assert_eq!(None, StatusClass::from_code(600));
    assert_eq!(None, StatusClass::from_code(0));
}

#[test]
fn version_display() {
    assert_eq!("HTTP/1.1", Version::Http11.to_string());
    assert_eq!("HTTP/2.0", Version::Http2.to_string());
    assert_eq!(Version::Http10, reqwest::Version::HTTP_10.into());
    assert_eq!(Version::Http2, reqwest::Version::HTTP_2.into());
}
