//! Merging caller-supplied headers with the headers every SigV4 request carries.

use {
    crate::{
        constants::{HDR_CONTENT_TYPE, HDR_HOST, HDR_X_AMZ_CONTENT_SHA256, HDR_X_AMZ_DATE},
        SignatureError,
    },
    http::{
        header::{HeaderMap, HeaderName, HeaderValue},
        uri::Uri,
    },
    log::trace,
};

/// Parse a header name, mapping failures to [`SignatureError::EncodingFailure`].
pub(crate) fn header_name(name: &str) -> Result<HeaderName, SignatureError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| SignatureError::EncodingFailure(format!("Invalid header name: {:?}", name)))
}

/// Parse a header value, mapping failures to [`SignatureError::EncodingFailure`].
pub(crate) fn header_value(name: &str, value: &str) -> Result<HeaderValue, SignatureError> {
    HeaderValue::from_str(value)
        .map_err(|_| SignatureError::EncodingFailure(format!("Invalid value for header {}: {:?}", name, value)))
}

/// The value for the `host` header: the URL's host, plus the port when it is not the scheme's default.
pub(crate) fn host_header_value(uri: &Uri) -> Option<String> {
    let host = uri.host()?;
    let default_port = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => Some(format!("{}:{}", host, port)),
        _ => Some(host.to_string()),
    }
}

/// Merge the caller's headers with the headers required for signing.
///
/// The result always contains `x-amz-date`, `host`, and `x-amz-content-sha256`, plus `content-type` if a
/// content type was given. Header names are matched case-insensitively and a value the caller supplied is never
/// replaced by a default. Repeated caller headers are kept as multiple values in the order given.
pub fn normalize_headers<'a, I>(
    request_headers: I,
    uri: &Uri,
    content_type: Option<&str>,
    amz_date: &str,
    payload_hash: &str,
) -> Result<HeaderMap, SignatureError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in request_headers {
        headers.append(header_name(name)?, header_value(name, value)?);
    }

    let host = host_header_value(uri).ok_or_else(|| SignatureError::InvalidUrl(format!("URL has no host: {}", uri)))?;

    insert_if_absent(&mut headers, HDR_X_AMZ_DATE, amz_date)?;
    insert_if_absent(&mut headers, HDR_HOST, &host)?;
    if let Some(content_type) = content_type {
        insert_if_absent(&mut headers, HDR_CONTENT_TYPE, content_type)?;
    }
    insert_if_absent(&mut headers, HDR_X_AMZ_CONTENT_SHA256, payload_hash)?;

    Ok(headers)
}

fn insert_if_absent(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), SignatureError> {
    let name = HeaderName::from_static(name);
    if headers.contains_key(&name) {
        trace!("Keeping caller-supplied {} header", name);
    } else {
        let value = header_value(name.as_str(), value)?;
        headers.insert(name, value);
    }

    Ok(())
}
