use {
    crate::{
        canonical::{credential_scope, CanonicalRequest},
        constants::*,
        headers::{header_value, normalize_headers},
        Credential, KSecretKey, SignatureError, SigningDate, SigningRequest,
    },
    http::{
        header::{HeaderMap, AUTHORIZATION},
        request::Parts,
        uri::Uri,
    },
    log::{debug, warn},
    std::str::FromStr,
    subtle::ConstantTimeEq,
};

/// The output of a signing call: the headers to attach to the outgoing request.
#[derive(Clone, Debug)]
pub struct SignedRequest {
    /// The caller's headers merged with `x-amz-date`, `host`, `x-amz-content-sha256`, and `content-type`.
    headers: HeaderMap,

    /// The `Authorization` header value.
    authorization: String,

    /// The signed headers list, e.g. `host;x-amz-content-sha256;x-amz-date`.
    signed_headers: String,

    /// The lowercase hex signature.
    signature: String,
}

impl SignedRequest {
    /// Retrieve the `Authorization` header value.
    #[inline]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Retrieve the normalized headers that were signed. These must be sent with the request.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Retrieve the signed headers list.
    #[inline]
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Retrieve the lowercase hex signature.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Write the signed headers and the `Authorization` header into `headers`, replacing any existing values
    /// for those names.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<(), SignatureError> {
        for name in self.headers.keys() {
            headers.remove(name);
            for value in self.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        headers.insert(AUTHORIZATION, header_value(HDR_AUTHORIZATION, &self.authorization)?);
        Ok(())
    }

    /// Write the signed headers and the `Authorization` header into the request parts.
    pub fn apply_to_parts(&self, parts: &mut Parts) -> Result<(), SignatureError> {
        self.apply_to(&mut parts.headers)
    }

    /// Consume this, returning every header to send, including `Authorization`.
    pub fn into_header_map(self) -> Result<HeaderMap, SignatureError> {
        let mut headers = self.headers;
        headers.insert(AUTHORIZATION, header_value(HDR_AUTHORIZATION, &self.authorization)?);
        Ok(headers)
    }
}

/// Format the `Authorization` header value.
pub fn authorization_header(access_key: &str, credential_scope: &str, signed_headers: &str, signature: &str) -> String {
    format!(
        "{} Credential={}/{},SignedHeaders={},Signature={}",
        AWS4_HMAC_SHA256, access_key, credential_scope, signed_headers, signature
    )
}

/// Parse the URL, requiring a scheme and a host.
fn parse_url(url: &str) -> Result<Uri, SignatureError> {
    let uri = Uri::from_str(url).map_err(|e| SignatureError::InvalidUrl(format!("Unable to parse URL '{}': {}", url, e)))?;

    if uri.scheme().is_none() {
        return Err(SignatureError::InvalidUrl(format!("URL has no scheme: {}", url)));
    }

    if uri.host().is_none() {
        return Err(SignatureError::InvalidUrl(format!("URL has no host: {}", url)));
    }

    Ok(uri)
}

/// Check the payload hash and lowercase it.
fn normalize_payload_hash(payload_hash: &str) -> Result<String, SignatureError> {
    if payload_hash == UNSIGNED_PAYLOAD {
        return Ok(payload_hash.to_string());
    }

    if payload_hash.len() == SHA256_HEX_LENGTH && payload_hash.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Ok(payload_hash.to_ascii_lowercase());
    }

    Err(SignatureError::InvalidPayloadHash(format!(
        "Payload hash must be a 64-digit hex SHA-256 value or {}. Got '{}'",
        UNSIGNED_PAYLOAD, payload_hash
    )))
}

/// Sign a request with AWS SigV4.
///
/// The request headers are merged with `x-amz-date`, `host`, `x-amz-content-sha256`, and (if a content type
/// was given) `content-type`; every resulting header is signed. The returned [`SignedRequest`] holds those
/// headers and the `Authorization` value, all of which must be sent with the request.
///
/// # Errors
/// * [`SignatureError::MissingCredential`] if any part of the credential is empty.
/// * [`SignatureError::InvalidUrl`] if the URL cannot be parsed or lacks a scheme or host.
/// * [`SignatureError::InvalidPayloadHash`] if the payload hash is malformed.
/// * [`SignatureError::InvalidRequestMethod`] if the method is not a valid HTTP token.
/// * [`SignatureError::EncodingFailure`] if a header cannot be represented.
pub fn sign(
    request: &SigningRequest,
    credential: &Credential,
    date: &SigningDate,
) -> Result<SignedRequest, SignatureError> {
    credential.validate()?;
    let uri = parse_url(request.url())?;
    let payload_hash = normalize_payload_hash(request.payload_hash())?;

    if payload_hash == SHA256_EMPTY && matches!(request.method().to_ascii_uppercase().as_str(), "POST" | "PUT" | "PATCH")
    {
        debug!("Signing a {} request with the empty-body payload hash", request.method());
    }

    let headers = normalize_headers(
        request.headers().iter().map(|(name, value)| (name.as_str(), value.as_str())),
        &uri,
        request.content_type(),
        date.amz_date(),
        &payload_hash,
    )?;

    if let Some(x_amz_date) = headers.get(HDR_X_AMZ_DATE) {
        if x_amz_date.as_bytes() != date.amz_date().as_bytes() {
            warn!("x-amz-date header differs from the signing date {}; the server will reject this signature", date);
        }
    }

    let canonical_request = CanonicalRequest::new(request.method(), &uri, &headers, &payload_hash)?;
    let scope = credential_scope(date.date_stamp(), credential.region(), credential.service());
    let string_to_sign = canonical_request.string_to_sign(date.amz_date(), &scope);

    let signature = KSecretKey::from_str(credential.secret_key())?
        .to_ksigning(date.date_stamp(), credential.region(), credential.service())
        .sign(&string_to_sign);

    let signed_headers = canonical_request.signed_headers().to_string();
    let authorization = authorization_header(credential.access_key(), &scope, &signed_headers, &signature);
    debug!("Signed request: scope={} signed_headers={}", scope, signed_headers);

    Ok(SignedRequest {
        headers,
        authorization,
        signed_headers,
        signature,
    })
}

/// Check a presented `Authorization` value against the one computed for the request.
///
/// The comparison is constant-time.
///
/// # Errors
/// Returns [`SignatureError::SignatureDoesNotMatch`] on mismatch, or any error [`sign`] can return.
pub fn verify(
    request: &SigningRequest,
    credential: &Credential,
    date: &SigningDate,
    authorization: &str,
) -> Result<(), SignatureError> {
    let expected = sign(request, credential, date)?;

    if bool::from(expected.authorization().as_bytes().ct_eq(authorization.as_bytes())) {
        Ok(())
    } else {
        debug!("Signature mismatch for scope {}/{}/{}", date.date_stamp(), credential.region(), credential.service());
        Err(SignatureError::SignatureDoesNotMatch(Some(ERR_MSG_SIGNATURE_MISMATCH.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{authorization_header, normalize_payload_hash, parse_url},
        crate::{sign, verify, Credential, SignatureError, SigningDate, SigningRequest},
        http::{header::HeaderMap, Request},
    };

    fn credential() -> Credential {
        Credential::new("AKIDEXAMPLE", "secret", "ap-northeast-1", "s3")
    }

    fn date() -> SigningDate {
        SigningDate::new("20250101T000000Z", "20250101").unwrap()
    }

    #[test_log::test]
    fn test_authorization_format() {
        assert_eq!(
            authorization_header("AKID", "20250101/us-east-1/s3/aws4_request", "host;x-amz-date", "abcd"),
            "AWS4-HMAC-SHA256 Credential=AKID/20250101/us-east-1/s3/aws4_request,SignedHeaders=host;x-amz-date,\
             Signature=abcd"
        );
    }

    #[test_log::test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com").is_ok());
        match parse_url("/relative/path") {
            Err(SignatureError::InvalidUrl(msg)) => assert_eq!(msg, "URL has no scheme: /relative/path"),
            other => panic!("Expected InvalidUrl; got {:?}", other),
        }
        match parse_url("https://exa mple.com/") {
            Err(SignatureError::InvalidUrl(msg)) => {
                assert!(msg.starts_with("Unable to parse URL 'https://exa mple.com/': "))
            }
            other => panic!("Expected InvalidUrl; got {:?}", other),
        }
        assert!(matches!(parse_url(""), Err(SignatureError::InvalidUrl(_))));
    }

    #[test_log::test]
    fn test_payload_hash() {
        assert_eq!(
            normalize_payload_hash("E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855").unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(normalize_payload_hash("UNSIGNED-PAYLOAD").unwrap(), "UNSIGNED-PAYLOAD");
        let e = normalize_payload_hash("abc").unwrap_err();
        assert_eq!(e.error_code(), "InvalidPayloadHash");
        assert_eq!(e.to_string(), "Payload hash must be a 64-digit hex SHA-256 value or UNSIGNED-PAYLOAD. Got 'abc'");
    }

    #[test_log::test]
    fn test_sign_and_verify() {
        let request = SigningRequest::builder()
            .url("https://s3.ap-northeast-1.amazonaws.com/mybucket/?list-type=2")
            .build()
            .unwrap();
        let signed = sign(&request, &credential(), &date()).unwrap();
        assert_eq!(signed.signed_headers(), "host;x-amz-content-sha256;x-amz-date");
        assert_eq!(signed.signature().len(), 64);
        assert!(signed.authorization().ends_with(signed.signature()));

        verify(&request, &credential(), &date(), signed.authorization()).unwrap();

        let mut tampered = signed.authorization().to_string();
        tampered.pop();
        tampered.push('x');
        match verify(&request, &credential(), &date(), &tampered) {
            Err(e @ SignatureError::SignatureDoesNotMatch(_)) => assert_eq!(
                e.to_string(),
                "The request signature we calculated does not match the signature you provided."
            ),
            other => panic!("Expected SignatureDoesNotMatch; got {:?}", other),
        }

        let other_secret = Credential::new("AKIDEXAMPLE", "other", "ap-northeast-1", "s3");
        assert!(verify(&request, &other_secret, &date(), signed.authorization()).is_err());
    }

    #[test_log::test]
    fn test_apply_to() {
        let request = SigningRequest::builder()
            .url("https://example.com/")
            .header("X-Custom", "value")
            .build()
            .unwrap();
        let signed = sign(&request, &Credential::new("AKID", "secret", "us-east-1", "s3"), &date()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("host", "stale.example.com".parse().unwrap());
        headers.insert("accept", "*/*".parse().unwrap());
        signed.apply_to(&mut headers).unwrap();
        assert_eq!(headers["host"], "example.com");
        assert_eq!(headers["x-custom"], "value");
        assert_eq!(headers["x-amz-date"], "20250101T000000Z");
        assert_eq!(headers["accept"], "*/*");
        assert_eq!(headers["authorization"], signed.authorization());

        let (mut parts, _) = Request::get("https://example.com/").body(()).unwrap().into_parts();
        signed.apply_to_parts(&mut parts).unwrap();
        assert_eq!(parts.headers["authorization"], signed.authorization());

        let all = signed.clone().into_header_map().unwrap();
        assert_eq!(all.len(), signed.headers().len() + 1);
    }

    #[test_log::test]
    fn test_sign_errors() {
        let request = SigningRequest::builder().url("https://example.com/").build().unwrap();
        let e = sign(&request, &Credential::new("AKID", "", "us-east-1", "s3"), &date()).unwrap_err();
        assert_eq!(e.error_code(), "MissingCredential");

        let request = SigningRequest::builder().url("not a url").build().unwrap();
        let e = sign(&request, &credential(), &date()).unwrap_err();
        assert_eq!(e.error_code(), "InvalidUrl");

        let request = SigningRequest::builder().url("https://example.com/").payload_hash("nope").build().unwrap();
        let e = sign(&request, &credential(), &date()).unwrap_err();
        assert_eq!(e.error_code(), "InvalidPayloadHash");

        let request = SigningRequest::builder().url("https://example.com/").method("GE T").build().unwrap();
        let e = sign(&request, &credential(), &date()).unwrap_err();
        assert_eq!(e.error_code(), "InvalidRequestMethod");
    }
}
