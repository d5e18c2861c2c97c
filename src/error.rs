use {
    crate::constants::*,
    derive_builder::UninitializedFieldError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Error returned when an attempt at signing (or verifying) an AWS SigV4 request fails.
///
/// None of these are transient: retrying with the same inputs produces the same error.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignatureError {
    /// A header name or value could not be represented in an HTTP request, or a percent-decoded URL
    /// component was not valid UTF-8.
    EncodingFailure(/* message */ String),

    /// A required builder field was not set.
    InvalidBuilder(/* message */ String),

    /// The payload hash is neither a 64-digit hex SHA-256 value nor `UNSIGNED-PAYLOAD`.
    InvalidPayloadHash(/* message */ String),

    /// The request method is empty or is not a valid HTTP token.
    InvalidRequestMethod(/* message */ String),

    /// The `x-amz-date` or date stamp string is malformed, or the two do not describe the same day.
    InvalidSigningDate(/* message */ String),

    /// The URL could not be parsed into a scheme, host, path, and query. Sample messages:
    /// `Unable to parse URL 'not a url': invalid uri character`
    /// `URL has no host: /relative/path`
    InvalidUrl(/* message */ String),

    /// The access key, secret key, region, or service is empty.
    MissingCredential(/* message */ String),

    /// The presented authorization does not match the one computed for the request.
    SignatureDoesNotMatch(Option</* message */ String>),
}

impl SignatureError {
    /// A stable, machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EncodingFailure(_) => ERR_CODE_ENCODING_FAILURE,
            Self::InvalidBuilder(_) => ERR_CODE_INVALID_BUILDER,
            Self::InvalidPayloadHash(_) => ERR_CODE_INVALID_PAYLOAD_HASH,
            Self::InvalidRequestMethod(_) => ERR_CODE_INVALID_REQUEST_METHOD,
            Self::InvalidSigningDate(_) => ERR_CODE_INVALID_SIGNING_DATE,
            Self::InvalidUrl(_) => ERR_CODE_INVALID_URL,
            Self::MissingCredential(_) => ERR_CODE_MISSING_CREDENTIAL,
            Self::SignatureDoesNotMatch(_) => ERR_CODE_SIGNATURE_DOES_NOT_MATCH,
        }
    }
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::EncodingFailure(msg) => f.write_str(msg),
            Self::InvalidBuilder(msg) => f.write_str(msg),
            Self::InvalidPayloadHash(msg) => f.write_str(msg),
            Self::InvalidRequestMethod(msg) => f.write_str(msg),
            Self::InvalidSigningDate(msg) => f.write_str(msg),
            Self::InvalidUrl(msg) => f.write_str(msg),
            Self::MissingCredential(msg) => f.write_str(msg),
            Self::SignatureDoesNotMatch(msg) => {
                if let Some(msg) = msg {
                    f.write_str(msg)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Error for SignatureError {}

impl From<UninitializedFieldError> for SignatureError {
    fn from(e: UninitializedFieldError) -> SignatureError {
        SignatureError::InvalidBuilder(e.to_string())
    }
}
