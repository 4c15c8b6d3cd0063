//! Request signing for the Wyze cloud
//!
//! Every signed request carries a fresh millisecond nonce, a `requestid`
//! derived from it and a `signature2` header: an HMAC-MD5 over the exact
//! bytes that go on the wire (the sorted query string for GET, the compact
//! JSON body for POST). The HMAC key is `md5hex(access_token + salt)`,
//! where the salt depends on the application id.

use std::fmt;

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};

use crate::error::{ApiError, Result};

type HmacMd5 = Hmac<Md5>;

/// Known application ids and their signing salts
const APPLICATION_SALTS: &[(&str, &str)] = &[
    ("9319141212m2ik", "wyze_app_secret_key_132"),
    ("venp_4c30f812828de875", "CVCSNoa0ALsNEpgKls6ybVTVOmGzFoiq"),
];

/// A per-request nonce: current time in Unix milliseconds, as decimal text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    pub fn now() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The nonce as an integer, for payloads that want a number
    pub fn as_millis(&self) -> i64 {
        self.0.parse().unwrap_or_default()
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase hex MD5 of `input`
pub fn md5_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(Md5::digest(input.as_ref()))
}

/// Signing salt for an application id
pub fn family_salt(app_id: &str) -> Result<&'static str> {
    APPLICATION_SALTS
        .iter()
        .find(|(id, _)| *id == app_id)
        .map(|(_, salt)| *salt)
        .ok_or_else(|| ApiError::UnknownApplication(app_id.to_string()))
}

/// `md5hex(md5hex(nonce))`
pub fn request_id(nonce: &Nonce) -> String {
    md5_hex(md5_hex(nonce.as_str()))
}

/// The login password as the auth service expects it: md5hex applied three times
pub fn hash_password(password: &str) -> String {
    let mut hashed = password.to_string();
    for _ in 0..3 {
        hashed = md5_hex(&hashed);
    }
    hashed
}

/// Sign `message` for the given token and salt
///
/// A missing access token (login) signs with an empty token.
pub fn signature(message: &str, access_token: Option<&str>, salt: &str) -> Result<String> {
    let key = md5_hex(format!("{}{}", access_token.unwrap_or_default(), salt));
    hmac_md5_hex(key.as_bytes(), message.as_bytes())
}

/// Canonical GET message: `k=v` pairs sorted by key, joined by `&`
///
/// Values are not percent-encoded; the signature covers the raw text.
pub fn sorted_query(params: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = params.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

fn hmac_md5_hex(key: &[u8], message: &[u8]) -> Result<String> {
    let mut mac =
        HmacMd5::new_from_slice(key).map_err(|e| ApiError::Signing(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
