//! Canonicalization functionality for signature generation.
//!
//! This includes the URI path, query string, and header canonicalization functions, as well as the
//! ability to create an AWS SigV4 canonical request.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{
        constants::{AWS4_HMAC_SHA256, AWS4_REQUEST, RFC3986_ENCODE_SET},
        crypto::sha256_hex,
        SignatureError,
    },
    http::{header::HeaderMap, method::Method, uri::Uri},
    log::trace,
    percent_encoding::{percent_decode_str, percent_encode},
    qualifier_attr::qualifiers,
    std::collections::BTreeMap,
};

/// A canonicalized request for AWS SigV4.
///
/// This is mainly used internally for generating the canonical request for signing, but is
/// exposed for testing and debugging purposes.
///
/// **The stability of this struct is not guaranteed.** The fields and methods are subject to
/// change in minor/patch versions.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone, Debug)]
struct CanonicalRequest {
    /// The HTTP method for the request (e.g., "GET", "POST", etc.), uppercased.
    request_method: String,

    /// The canonicalized path from the HTTP request. This is guaranteed to be ASCII.
    canonical_path: String,

    /// The canonical query string: encoded `name=value` pairs sorted by name and joined with `&`.
    canonical_query: String,

    /// `name:value\n` lines for every signed header, sorted by name.
    canonical_headers: String,

    /// Lowercase header names, sorted and joined with `;`.
    signed_headers: String,

    /// The hex SHA-256 hash of the body, or `UNSIGNED-PAYLOAD`.
    payload_hash: String,
}

impl CanonicalRequest {
    /// Create a CanonicalRequest from a request method, URI, the normalized headers, and the payload hash.
    ///
    /// Every header in `headers` is signed.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn new(method: &str, uri: &Uri, headers: &HeaderMap, payload_hash: &str) -> Result<Self, SignatureError> {
        let request_method = canonicalize_method(method)?;
        let canonical_path = canonicalize_uri_path(uri.path());
        let canonical_query = canonicalize_query_string(uri.query().unwrap_or(""));
        let (canonical_headers, signed_headers) = canonicalize_headers(headers)?;

        Ok(Self {
            request_method,
            canonical_path,
            canonical_query,
            canonical_headers,
            signed_headers,
            payload_hash: payload_hash.to_string(),
        })
    }

    /// Retrieve the uppercased HTTP request method.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn request_method(&self) -> &str {
        &self.request_method
    }

    /// Retrieve the canonicalized URI path from the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Retrieve the canonical query string.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_query_string(&self) -> &str {
        &self.canonical_query
    }

    /// Retrieve the canonical headers block, including its trailing newline.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_headers(&self) -> &str {
        &self.canonical_headers
    }

    /// Retrieve the signed headers list, e.g. `host;x-amz-content-sha256;x-amz-date`.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Retrieve the payload hash.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// Get the [canonical request to hash](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
    /// for the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request(&self) -> String {
        let mut result = String::with_capacity(1024);
        result.push_str(self.request_method());
        result.push('\n');
        result.push_str(self.canonical_path());
        result.push('\n');
        result.push_str(self.canonical_query_string());
        result.push('\n');
        // The headers block already ends with a newline; the separator below leaves a blank line.
        result.push_str(self.canonical_headers());
        result.push('\n');
        result.push_str(self.signed_headers());
        result.push('\n');
        result.push_str(self.payload_hash());

        trace!("Canonical request:\n{}", result);

        result
    }

    /// Get the lowercase hex SHA-256 hash of the [canonical request](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html).
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request_sha256(&self) -> String {
        sha256_hex(self.canonical_request().as_bytes())
    }

    /// Get the [string to sign](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-string-to-sign.html)
    /// for this request at the given timestamp and credential scope.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn string_to_sign(&self, amz_date: &str, credential_scope: &str) -> String {
        let result = format!(
            "{}\n{}\n{}\n{}",
            AWS4_HMAC_SHA256,
            amz_date,
            credential_scope,
            self.canonical_request_sha256()
        );

        trace!("String to sign:\n{}", result);

        result
    }
}

/// Format the credential scope: `date_stamp/region/service/aws4_request`.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/{}", date_stamp, region, service, AWS4_REQUEST)
}

/// Validate the request method and return it uppercased.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_method(method: &str) -> Result<String, SignatureError> {
    if method.is_empty() {
        return Err(SignatureError::InvalidRequestMethod("Request method is empty".to_string()));
    }

    match Method::from_bytes(method.as_bytes()) {
        Ok(_) => Ok(method.to_ascii_uppercase()),
        Err(_) => Err(SignatureError::InvalidRequestMethod(format!("Invalid request method: {:?}", method))),
    }
}

/// Encode a URI path, keeping `/` as the segment separator.
///
/// Each segment is percent-decoded before being encoded again, so an already-encoded path is not
/// double-encoded and an encoded `%2F` stays inside its segment. An empty path becomes `/`.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_uri_path(uri_path: &str) -> String {
    // Special case: empty path is converted to '/'; also short-circuit the usual '/' path here.
    if uri_path.is_empty() || uri_path == "/" {
        return "/".to_string();
    }

    let path = uri_path
        .split('/')
        .map(|segment| {
            let decoded: Vec<u8> = percent_decode_str(segment).collect();
            percent_encode(&decoded, RFC3986_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/");

    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Normalize a single element (key or value from key=value) of a query string.
///
/// `+` is treated as an encoded space. The element is decoded, then every byte outside the
/// unreserved set is encoded as `%XX` with uppercase hex digits.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn normalize_query_string_element(element: &str) -> String {
    let element = element.replace('+', " ");
    let decoded: Vec<u8> = percent_decode_str(&element).collect();
    percent_encode(&decoded, RFC3986_ENCODE_SET).to_string()
}

/// Build the canonical query string from a raw query string.
///
/// Empty components (`a=1&&b=2`) are skipped; a parameter without `=` gets an empty value. Pairs are
/// sorted by encoded name, then by encoded value so repeated names have a stable order.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_query_string(query_string: &str) -> String {
    let mut parameters: Vec<(String, String)> = query_string
        .split('&')
        .filter(|component| !component.is_empty())
        .map(|component| {
            let (name, value) = component.split_once('=').unwrap_or((component, ""));
            (normalize_query_string_element(name), normalize_query_string_element(value))
        })
        .collect();

    parameters.sort_unstable();
    parameters.into_iter().map(|(name, value)| format!("{}={}", name, value)).collect::<Vec<_>>().join("&")
}

/// Normalizes a header value by trimming whitespace and converting each run of spaces and tabs to a single space.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn normalize_header_value(value: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(value.len());

    // Remove leading whitespace and reduce runs of spaces and tabs to a single space.
    let mut last_was_space = true;

    for c in value.trim_ascii() {
        if *c == b' ' || *c == b'\t' {
            if !last_was_space {
                result.push(b' ');
                last_was_space = true;
            }
        } else {
            result.push(*c);
            last_was_space = false;
        }
    }

    result
}

/// Build the canonical headers block and the signed headers list.
///
/// Names come out of [`HeaderMap`] already lowercased. Repeated headers are joined with `,` in the order
/// they were added.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_headers(headers: &HeaderMap) -> Result<(String, String), SignatureError> {
    let mut sorted = BTreeMap::<&str, Vec<String>>::new();

    for (name, value) in headers.iter() {
        let value = String::from_utf8(normalize_header_value(value.as_bytes())).map_err(|_| {
            SignatureError::EncodingFailure(format!("Value for header {} is not valid UTF-8", name.as_str()))
        })?;
        sorted.entry(name.as_str()).or_default().push(value);
    }

    let mut canonical_headers = String::new();
    for (name, values) in sorted.iter() {
        canonical_headers.push_str(name);
        canonical_headers.push(':');
        canonical_headers.push_str(&values.join(","));
        canonical_headers.push('\n');
    }

    let signed_headers = sorted.keys().copied().collect::<Vec<_>>().join(";");

    Ok((canonical_headers, signed_headers))
}
