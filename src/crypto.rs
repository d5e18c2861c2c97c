use {
    crate::constants::SHA256_OUTPUT_LEN,
    hmac::{Hmac, Mac},
    sha2::{Digest, Sha256},
};

/// HMAC-SHA256 of `value` keyed with `key`.
#[inline(always)]
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(value);
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(mac.finalize().into_bytes().as_slice());
    result
}

#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(Sha256::digest(value).as_slice());
    result
}

#[inline(always)]
pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(sha256(value))
}
