// src/webhook/signature.rs

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 over the raw body. Used both to verify inbound
/// webhooks and to sign outbound ones (the demo agent signs with this).
pub fn sign(body: &[u8], secret: &str) -> String {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of the `x-openclaw-signature` header against the raw
/// (unparsed) body. Missing signature or secret, or a length mismatch, is
/// simply "not valid" — never an error.
pub fn verify(body: &[u8], signature: &str, secret: &str) -> bool {
    if signature.is_empty() || secret.is_empty() {
        return false;
    }
    let expected = sign(body, secret);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
