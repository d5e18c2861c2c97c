use {
    crate::{
        constants::{AWS4_KEY_PREFIX, AWS4_REQUEST, SHA256_OUTPUT_LEN},
        crypto::hmac_sha256,
        SignatureError,
    },
    std::{
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// A raw AWS secret key (`kSecret`).
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey {
    /// The secret key, prefixed with "AWS4".
    prefixed_key: Vec<u8>,
}

/// The `kDate` key: `HMAC_SHA256("AWS4" + KSecretKey, "YYYYMMDD")`
#[derive(Clone, PartialEq, Eq)]
pub struct KDateKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kRegion` key: an AWS `kDate` key, HMAC-SHA256 hashed with the region.
#[derive(Clone, PartialEq, Eq)]
pub struct KRegionKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kService` key: an AWS `kRegion` key, HMAC-SHA256 hashed with the service.
#[derive(Clone, PartialEq, Eq)]
pub struct KServiceKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kSigning` key: an AWS `kService` key, HMAC-SHA256 hashed with the "aws4_request" string.
#[derive(Clone, PartialEq, Eq)]
pub struct KSigningKey {
    /// The resulting raw signing key.
    key: [u8; SHA256_OUTPUT_LEN],
}

impl AsRef<[u8]> for KSecretKey {
    fn as_ref(&self) -> &[u8] {
        // Remove the "AWS4" prefix.
        &self.prefixed_key[AWS4_KEY_PREFIX.len()..]
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KDateKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KRegionKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KServiceKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KSigningKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

// Key material never reaches a formatter; only the type name is printed.
macro_rules! redacted_fmt {
    ($($key:ident),+) => {
        $(
            impl Debug for $key {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    f.write_str(stringify!($key))
                }
            }

            impl Display for $key {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    f.write_str(stringify!($key))
                }
            }
        )+
    };
}

redacted_fmt!(KSecretKey, KDateKey, KRegionKey, KServiceKey, KSigningKey);

impl FromStr for KSecretKey {
    type Err = SignatureError;

    /// Create a new `KSecretKey` from a raw AWS secret key.
    fn from_str(raw: &str) -> Result<Self, SignatureError> {
        if raw.is_empty() {
            return Err(SignatureError::MissingCredential("Secret key is empty".to_string()));
        }

        let mut prefixed_key = Vec::with_capacity(AWS4_KEY_PREFIX.len() + raw.len());
        prefixed_key.extend_from_slice(AWS4_KEY_PREFIX);
        prefixed_key.extend_from_slice(raw.as_bytes());
        Ok(Self {
            prefixed_key,
        })
    }
}

impl KSecretKey {
    /// Create a new `KDateKey` from this `KSecretKey` and a `YYYYMMDD` date stamp.
    pub fn to_kdate(&self, date_stamp: &str) -> KDateKey {
        KDateKey {
            key: hmac_sha256(self.prefixed_key.as_slice(), date_stamp.as_bytes()),
        }
    }

    /// Create a new `KRegionKey` from this `KSecretKey`, a date stamp, and a region.
    pub fn to_kregion(&self, date_stamp: &str, region: &str) -> KRegionKey {
        self.to_kdate(date_stamp).to_kregion(region)
    }

    /// Create a new `KServiceKey` from this `KSecretKey`, a date stamp, a region, and a service.
    pub fn to_kservice(&self, date_stamp: &str, region: &str, service: &str) -> KServiceKey {
        self.to_kdate(date_stamp).to_kservice(region, service)
    }

    /// Create a new `KSigningKey` from this `KSecretKey`, a date stamp, a region, and a service.
    pub fn to_ksigning(&self, date_stamp: &str, region: &str, service: &str) -> KSigningKey {
        self.to_kdate(date_stamp).to_ksigning(region, service)
    }
}

impl KDateKey {
    /// Create a new `KRegionKey` from this `KDateKey` and a region.
    pub fn to_kregion(&self, region: &str) -> KRegionKey {
        KRegionKey {
            key: hmac_sha256(self.key.as_slice(), region.as_bytes()),
        }
    }

    /// Create a new `KServiceKey` from this `KDateKey`, a region, and a service.
    pub fn to_kservice(&self, region: &str, service: &str) -> KServiceKey {
        self.to_kregion(region).to_kservice(service)
    }

    /// Create a new `KSigningKey` from this `KDateKey`, a region, and a service.
    pub fn to_ksigning(&self, region: &str, service: &str) -> KSigningKey {
        self.to_kregion(region).to_ksigning(service)
    }
}

impl KRegionKey {
    /// Create a new `KServiceKey` from this `KRegionKey` and a service.
    pub fn to_kservice(&self, service: &str) -> KServiceKey {
        KServiceKey {
            key: hmac_sha256(self.key.as_slice(), service.as_bytes()),
        }
    }

    /// Create a new `KSigningKey` from this `KRegionKey` and a service.
    pub fn to_ksigning(&self, service: &str) -> KSigningKey {
        self.to_kservice(service).to_ksigning()
    }
}

impl KServiceKey {
    /// Create a new `KSigningKey` from this `KServiceKey`.
    pub fn to_ksigning(&self) -> KSigningKey {
        KSigningKey {
            key: hmac_sha256(self.key.as_slice(), AWS4_REQUEST.as_bytes()),
        }
    }
}

impl KSigningKey {
    /// Sign a string to sign, returning the lowercase hex signature.
    pub fn sign(&self, string_to_sign: &str) -> String {
        hex::encode(hmac_sha256(self.key.as_slice(), string_to_sign.as_bytes()))
    }
}
