use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Answer "is this bearer token stale", nothing more. No signature or
/// issuer validation happens here; an undecodable token is reported as
/// expired so the caller refreshes instead of sending garbage upstream.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// Expired iff `exp <= now`: a token expiring exactly "now" is already
/// considered unusable.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    let Some(payload) = decode_payload(token) else {
        return true;
    };
    let Some(exp) = payload.get("exp").and_then(Value::as_i64) else {
        return true;
    };
    exp <= now.timestamp()
}

/// Decode the payload segment of a three-part dot-delimited token as an
/// untyped JSON map. Only `exp` is ever read from it; no other field is
/// assumed to exist or be well-typed.
fn decode_payload(token: &str) -> Option<Value> {
    let payload_b64 = token.split('.').nth(1)?;
    let decoded = decode_segment(payload_b64)?;
    serde_json::from_slice(&decoded).ok()
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    // RFC 7515 mandates unpadded base64url, but tokens in the wild also
    // show up padded or in the standard alphabet.
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE.decode(segment))
        .or_else(|_| base64::engine::general_purpose::STANDARD.decode(segment))
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(segment))
        .ok()
}
