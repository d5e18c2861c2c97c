//! The `sigv4_signer` crate signs HTTP requests with AWS
//! [SigV4](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_aws-signing.html).
//!
//! Signing is a pure function of the request shape, a [`Credential`], and a [`SigningDate`]. Nothing is cached
//! between calls and nothing performs I/O; sending the request is left to your HTTP client.
//!
//! # Workflow
//! 1. Describe the request with a [`SigningRequest`] (URL, method, headers, payload hash).
//! 2. Derive a [`SigningDate`] from the current time. The `x-amz-date` timestamp and the scope date must come
//!    from the same instant.
//! 3. Call [`sign`]. The returned [`SignedRequest`] holds the headers to send (`host`, `x-amz-date`,
//!    `x-amz-content-sha256`, and your own) plus the `Authorization` value.
//!
//! ## Example
//! ```rust
//! use sigv4_signer::{sign, Credential, SigningDate, SigningRequest};
//!
//! let credential = Credential::new("AKIDEXAMPLE", "secret", "ap-northeast-1", "s3");
//! let date = SigningDate::new("20250101T000000Z", "20250101").unwrap();
//! let request = SigningRequest::builder()
//!     .url("https://s3.ap-northeast-1.amazonaws.com/mybucket/?list-type=2")
//!     .build()
//!     .unwrap();
//!
//! let signed = sign(&request, &credential, &date).unwrap();
//! assert!(signed.authorization().starts_with(
//!     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20250101/ap-northeast-1/s3/aws4_request,\
//!      SignedHeaders=host;x-amz-content-sha256;x-amz-date,Signature="));
//!
//! // Attach everything to the outgoing request.
//! let headers = signed.into_header_map().unwrap();
//! assert_eq!(headers["host"], "s3.ap-northeast-1.amazonaws.com");
//! ```
//!
//! # Payload hashes
//! The payload hash defaults to the hash of an empty body. If the request carries a body, set it with
//! [`SigningRequestBuilder::payload`] or [`SigningRequestBuilder::payload_hash`]; otherwise the server will
//! compute a different signature.
#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

mod canonical;
mod chronoutil;
mod constants;
mod crypto;
mod error;
mod headers;
mod request;
mod signature;
mod signing_key;

pub use crate::{
    chronoutil::SigningDate,
    constants::{SHA256_EMPTY, UNSIGNED_PAYLOAD},
    error::SignatureError,
    headers::normalize_headers,
    request::{Credential, CredentialBuilder, SigningRequest, SigningRequestBuilder},
    signature::{authorization_header, sign, verify, SignedRequest},
    signing_key::{KDateKey, KRegionKey, KSecretKey, KServiceKey, KSigningKey},
};

#[cfg(any(doc, feature = "unstable"))]
pub use crate::canonical::{
    canonicalize_headers, canonicalize_method, canonicalize_query_string, canonicalize_uri_path, credential_scope,
    normalize_header_value, normalize_query_string_element, CanonicalRequest,
};
