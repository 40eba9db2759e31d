pub mod ingest;
pub mod signature;

/// Header carrying the hex HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-openclaw-signature";
