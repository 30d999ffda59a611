use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::HeaderMap;

use crate::error::Error;

pub(crate) const JSON_MEDIA_TYPE: &str = "application/json";

pub(crate) fn redact_uri_for_logs(uri_text: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(uri_text) else {
        let without_fragment = uri_text.split('#').next().unwrap_or(uri_text);
        return without_fragment
            .split('?')
            .next()
            .unwrap_or(without_fragment)
            .to_owned();
    };

    let _ = parsed.set_username("");
    let _ = parsed.set_password(None);
    parsed.set_query(None);
    parsed.set_fragment(None);
    parsed.to_string()
}

#[cfg(feature = "ureq-transport")]
pub(crate) fn is_absolute_http_uri(uri_text: &str) -> bool {
    let Some((scheme, _)) = uri_text.split_once("://") else {
        return false;
    };
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

#[cfg(feature = "ureq-transport")]
pub(crate) fn join_base_path(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let relative = path.trim_start_matches('/');
    match (base.is_empty(), relative.is_empty()) {
        (true, true) => String::new(),
        (true, false) => relative.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{relative}"),
    }
}

#[cfg(feature = "ureq-transport")]
pub(crate) fn resolve_uri(base_url: &str, uri: &str) -> Result<String, Error> {
    let uri_text = if is_absolute_http_uri(uri) {
        uri.to_owned()
    } else {
        join_base_path(base_url, uri)
    };
    if !is_absolute_http_uri(&uri_text) || uri_text.parse::<http::Uri>().is_err() {
        return Err(Error::InvalidUri { uri: uri_text });
    }
    Ok(uri_text)
}

pub(crate) fn parse_header_name(name: &str) -> Result<HeaderName, Error> {
    name.parse().map_err(|source| Error::InvalidHeaderName {
        name: name.to_owned(),
        source,
    })
}

pub(crate) fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    value.parse().map_err(|source| Error::InvalidHeaderValue {
        name: name.to_owned(),
        source,
    })
}

#[cfg(feature = "ureq-transport")]
pub(crate) fn merge_headers(default_headers: &HeaderMap, request_headers: &HeaderMap) -> HeaderMap {
    let mut merged = default_headers.clone();
    for name in request_headers.keys() {
        merged.remove(name);
    }
    for (name, value) in request_headers {
        merged.append(name.clone(), value.clone());
    }
    merged
}

/// Media type of the `content-type` header, lowercased and without parameters.
pub(crate) fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or(value).trim();
    Some(essence.to_ascii_lowercase())
}

pub(crate) fn is_json_content(headers: &HeaderMap) -> bool {
    media_type(headers).is_some_and(|essence| essence == JSON_MEDIA_TYPE)
}
