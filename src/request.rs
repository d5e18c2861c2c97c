use {
    crate::{constants::SHA256_EMPTY, crypto::sha256_hex, SignatureError},
    derive_builder::Builder,
    http::request::Parts,
    std::fmt::{Debug, Formatter, Result as FmtResult},
};

/// Long-term credentials and the scope they are used in.
///
/// Credentials are passed into every signing call; nothing in this crate holds them between calls.
/// Use [`CredentialBuilder`] to programmatically construct a credential.
#[derive(Builder, Clone)]
#[builder(build_fn(error = "SignatureError"))]
pub struct Credential {
    /// The access key id, e.g. `AKIDEXAMPLE`.
    #[builder(setter(into))]
    access_key: String,

    /// The secret access key.
    #[builder(setter(into))]
    secret_key: String,

    /// The region of the request, e.g. `us-east-1`.
    #[builder(setter(into))]
    region: String,

    /// The service of the request, e.g. `s3`.
    #[builder(setter(into))]
    service: String,
}

impl Credential {
    /// Create a credential from its four parts.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Create a [CredentialBuilder] to construct a [Credential].
    #[inline]
    pub fn builder() -> CredentialBuilder {
        CredentialBuilder::default()
    }

    /// Retrieve the access key.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Retrieve the secret key.
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Retrieve the region.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the service.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Reject credentials with an empty part. An empty secret key still produces a well-formed signature that
    /// no server will accept, so it is an error here rather than a surprise later.
    pub(crate) fn validate(&self) -> Result<(), SignatureError> {
        for (value, what) in [
            (&self.access_key, "Access key"),
            (&self.secret_key, "Secret key"),
            (&self.region, "Region"),
            (&self.service, "Service"),
        ] {
            if value.is_empty() {
                return Err(SignatureError::MissingCredential(format!("{} is empty", what)));
            }
        }

        Ok(())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

/// The shape of an HTTP request to sign.
///
/// SigningRequest structs are immutable. Use [`SigningRequestBuilder`] to programmatically construct a
/// request.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "SignatureError"))]
pub struct SigningRequest {
    /// The full URL, including scheme, host, path, and query string.
    #[builder(setter(into))]
    url: String,

    /// The HTTP method. Defaults to `GET`.
    #[builder(setter(into), default = "\"GET\".to_string()")]
    method: String,

    /// The content type, added as a `content-type` header unless one is already present.
    #[builder(setter(into, strip_option), default)]
    content_type: Option<String>,

    /// Headers supplied by the caller, in order. Names are case-insensitive.
    #[builder(setter(custom), default)]
    headers: Vec<(String, String)>,

    /// Lowercase hex SHA-256 hash of the body. Defaults to the hash of an empty body.
    ///
    /// A request that carries a body must set this (or call [`SigningRequestBuilder::payload`]); the default
    /// only verifies for bodiless requests.
    #[builder(setter(into), default = "SHA256_EMPTY.to_string()")]
    payload_hash: String,
}

impl SigningRequestBuilder {
    /// Add a header to the request. Repeated names are kept as multiple values.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.get_or_insert_with(Vec::new).push((name.into(), value.into()));
        self
    }

    /// Add several headers to the request.
    pub fn headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .get_or_insert_with(Vec::new)
            .extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    /// Set the payload hash from the body that will be sent.
    pub fn payload(&mut self, body: impl AsRef<[u8]>) -> &mut Self {
        self.payload_hash = Some(sha256_hex(body.as_ref()));
        self
    }
}

impl SigningRequest {
    /// Create a [SigningRequestBuilder] to construct a [SigningRequest].
    #[inline]
    pub fn builder() -> SigningRequestBuilder {
        SigningRequestBuilder::default()
    }

    /// Describe an existing [`http`] request for signing. The URI must be absolute.
    ///
    /// # Errors
    /// Returns [`SignatureError::EncodingFailure`] if a header value is not visible ASCII.
    pub fn from_parts(parts: &Parts, payload_hash: impl Into<String>) -> Result<Self, SignatureError> {
        let mut headers = Vec::with_capacity(parts.headers.len());
        for (name, value) in parts.headers.iter() {
            let value = value.to_str().map_err(|_| {
                SignatureError::EncodingFailure(format!("Value for header {} is not visible ASCII", name.as_str()))
            })?;
            headers.push((name.as_str().to_string(), value.to_string()));
        }

        Ok(Self {
            url: parts.uri.to_string(),
            method: parts.method.as_str().to_string(),
            content_type: None,
            headers,
            payload_hash: payload_hash.into(),
        })
    }

    /// Retrieve the URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieve the HTTP method.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Retrieve the content type, if any.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Retrieve the caller-supplied headers.
    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Retrieve the payload hash.
    #[inline]
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{Credential, SignatureError, SigningRequest},
        http::Request,
    };

    #[test_log::test]
    fn test_request_defaults() {
        let request = SigningRequest::builder().url("https://example.com/").build().unwrap();
        assert_eq!(request.url(), "https://example.com/");
        assert_eq!(request.method(), "GET");
        assert_eq!(request.content_type(), None);
        assert!(request.headers().is_empty());
        assert_eq!(request.payload_hash(), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test_log::test]
    fn test_request_builder() {
        let request = SigningRequest::builder()
            .url("https://example.com/upload")
            .method("PUT")
            .content_type("text/plain")
            .header("X-Amz-Meta-A", "1")
            .headers([("X-Amz-Meta-B", "2"), ("x-amz-meta-a", "3")])
            .payload("Welcome to Amazon S3.")
            .build()
            .unwrap();
        assert_eq!(request.method(), "PUT");
        assert_eq!(request.content_type(), Some("text/plain"));
        assert_eq!(
            request.headers(),
            &[
                ("X-Amz-Meta-A".to_string(), "1".to_string()),
                ("X-Amz-Meta-B".to_string(), "2".to_string()),
                ("x-amz-meta-a".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(request.payload_hash(), "44ce7dd67c959e0d3524ffac1771dfbba87d2b6b4b4e99e42034a8b803f8b072");
    }

    #[test_log::test]
    fn test_request_missing_url() {
        match SigningRequest::builder().method("GET").build() {
            Err(SignatureError::InvalidBuilder(msg)) => assert_eq!(msg, "Field not initialized: url"),
            other => panic!("Expected InvalidBuilder; got {:?}", other),
        }
    }

    #[test_log::test]
    fn test_request_from_parts() {
        let (parts, _) = Request::post("https://example.com/path?a=b")
            .header("Content-Type", "application/json")
            .header("X-Custom", "value")
            .body(())
            .unwrap()
            .into_parts();
        let request = SigningRequest::from_parts(&parts, "UNSIGNED-PAYLOAD").unwrap();
        assert_eq!(request.url(), "https://example.com/path?a=b");
        assert_eq!(request.method(), "POST");
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.payload_hash(), "UNSIGNED-PAYLOAD");
    }

    #[test_log::test]
    fn test_credential() {
        let credential = Credential::builder()
            .access_key("AKIDEXAMPLE")
            .secret_key("secret")
            .region("us-east-1")
            .service("s3")
            .build()
            .unwrap();
        assert_eq!(credential.access_key(), "AKIDEXAMPLE");
        assert_eq!(credential.secret_key(), "secret");
        assert_eq!(credential.region(), "us-east-1");
        assert_eq!(credential.service(), "s3");
        assert!(credential.validate().is_ok());

        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret\""));
        assert!(debug.contains("<redacted>"));
    }

    #[test_log::test]
    fn test_credential_empty_parts() {
        for (credential, message) in [
            (Credential::new("", "secret", "us-east-1", "s3"), "Access key is empty"),
            (Credential::new("AKID", "", "us-east-1", "s3"), "Secret key is empty"),
            (Credential::new("AKID", "secret", "", "s3"), "Region is empty"),
            (Credential::new("AKID", "secret", "us-east-1", ""), "Service is empty"),
        ] {
            let e = credential.validate().unwrap_err();
            assert_eq!(e.error_code(), "MissingCredential");
            assert_eq!(e.to_string(), message);
        }
    }
}
