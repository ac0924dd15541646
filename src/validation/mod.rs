use url::Url;


/// Returns true when `url` parses as an absolute `http` or `https` URL.
///
/// Never touches the network and never fails; anything that does not parse is
/// simply not valid.
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(url) => {
            url.scheme().eq_ignore_ascii_case("http") || url.scheme().eq_ignore_ascii_case("https")
        }
        Err(_) => false,
    }
}

pub(crate) fn parse_url(url: &str) -> crate::Result<Url> {
    if !is_valid_url(url) {
        return Err(crate::Error::InvalidUrl(url.to_string()));
    }
    Url::parse(url).map_err(|_| crate::Error::InvalidUrl(url.to_string()))
}

/// `scheme://host:port` of a URL, the scope cookies are stored under.
pub(crate) fn base_url(url: &Url) -> crate::Result<Url> {
    let host = url
        .host_str()
        .ok_or_else(|| crate::Error::InvalidUrl(url.to_string()))?;
    let base = match url.port_or_known_default() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    };
    Url::parse(&base).map_err(|_| crate::Error::InvalidUrl(url.to_string()))
}
