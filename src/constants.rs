//! Common constants used throughout the crate.
//!
//! This was consolidated here so the entire crate is on the same page about these constant
//! values. If a value is spelled incorrectly, at least it can be fixed in one spot.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Algorithm for AWS SigV4
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";

/// Prefix applied to the raw secret key to form `kSecret`.
pub(crate) const AWS4_KEY_PREFIX: &[u8] = b"AWS4";

/// String included at the end of the AWS SigV4 credential scope
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Date stamp format used in the credential scope.
pub(crate) const DATE_STAMP_FORMAT: &str = "%Y%m%d";

/// Error code: EncodingFailure
pub(crate) const ERR_CODE_ENCODING_FAILURE: &str = "EncodingFailure";

/// Error code: InvalidBuilder
pub(crate) const ERR_CODE_INVALID_BUILDER: &str = "InvalidBuilder";

/// Error code: InvalidPayloadHash
pub(crate) const ERR_CODE_INVALID_PAYLOAD_HASH: &str = "InvalidPayloadHash";

/// Error code: InvalidRequestMethod
pub(crate) const ERR_CODE_INVALID_REQUEST_METHOD: &str = "InvalidRequestMethod";

/// Error code: InvalidSigningDate
pub(crate) const ERR_CODE_INVALID_SIGNING_DATE: &str = "InvalidSigningDate";

/// Error code: InvalidUrl
pub(crate) const ERR_CODE_INVALID_URL: &str = "InvalidUrl";

/// Error code: MissingCredential
pub(crate) const ERR_CODE_MISSING_CREDENTIAL: &str = "MissingCredential";

/// Error code: SignatureDoesNotMatch
pub(crate) const ERR_CODE_SIGNATURE_DOES_NOT_MATCH: &str = "SignatureDoesNotMatch";

/// Error message: `"The request signature we calculated does not match the signature you provided."`
pub(crate) const ERR_MSG_SIGNATURE_MISMATCH: &str =
    "The request signature we calculated does not match the signature you provided.";

/// Header for `authorization`
pub(crate) const HDR_AUTHORIZATION: &str = "authorization";

/// Header for `content-type`
pub(crate) const HDR_CONTENT_TYPE: &str = "content-type";

/// Header for `host`
pub(crate) const HDR_HOST: &str = "host";

/// Header for `x-amz-content-sha256`
pub(crate) const HDR_X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

/// Header for delivering the request timestamp
pub(crate) const HDR_X_AMZ_DATE: &str = "x-amz-date";

/// Compact ISO8601 format used for the `x-amz-date` header and the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Characters that pass through query and path segment encoding untouched: `A-Z a-z 0-9 - _ . ~`.
pub(crate) const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Length of a SHA-256 digest in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

/// SHA-256 of an empty string.
pub const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Length of a SHA-256 hex string.
pub(crate) const SHA256_HEX_LENGTH: usize = SHA256_EMPTY.len();

/// Payload hash literal used when the body is deliberately left out of the signature.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
