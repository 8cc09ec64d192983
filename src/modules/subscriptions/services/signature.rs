use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC-SHA256 of the raw request body
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Verifies payment gateway webhook signatures
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Configuration(format!("Invalid webhook secret: {}", e)))
    }

    /// Hex signature of `payload`
    pub fn sign(&self, payload: &[u8]) -> Result<String> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check `signature` against `payload` in constant time
    ///
    /// # Errors
    /// * `Unauthorized` - signature is not hex or does not match
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<()> {
        let expected = hex::decode(signature.trim())
            .map_err(|_| AppError::unauthorized("Webhook signature is not valid hex"))?;

        let mut mac = self.mac()?;
        mac.update(payload);
        mac.verify_slice(&expected)
            .map_err(|_| AppError::unauthorized("Webhook signature mismatch"))
    }
}
