use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::io::IoError;

type HmacSha256 = Hmac<Sha256>;

/// Headers every SwitchBot v1.1 request has to carry alongside the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub t: String,
    pub nonce: String,
    pub sign: String,
}

impl Signature {
    /// Signs with the current time and a fresh nonce.
    pub fn now(token: &str, secret: &str) -> Result<Signature, IoError> {
        let t = Utc::now().timestamp_millis().to_string();
        let nonce = Uuid::new_v4().to_string();
        Self::new(token, secret, t, nonce)
    }

    pub fn new(token: &str, secret: &str, t: String, nonce: String) -> Result<Signature, IoError> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| IoError::Other(format!("invalid signing secret: {}", err)))?;
        mac.update(token.as_bytes());
        mac.update(t.as_bytes());
        mac.update(nonce.as_bytes());
        let sign = STANDARD.encode(mac.finalize().into_bytes());
        Ok(Signature { t, nonce, sign })
    }
}
