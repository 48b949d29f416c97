use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How far a webhook timestamp may drift from the server clock before the
/// event is rejected as a possible replay.
pub const TOLERANCE_SECS: i64 = 300;

#[derive(Debug, PartialEq, Eq)]
pub enum SignatureError {
    MalformedHeader,
    TimestampOutOfTolerance,
    Mismatch,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::MalformedHeader => write!(f, "malformed signature header"),
            SignatureError::TimestampOutOfTolerance => {
                write!(f, "signature timestamp outside tolerance")
            }
            SignatureError::Mismatch => write!(f, "signature mismatch"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Verifies a `t=<unix>,v1=<base64 hmac>` header over `"{t}.{payload}"`.
/// The HMAC comparison is constant-time.
pub fn verify(
    header: &str,
    payload: &[u8],
    secret: &str,
    now_unix: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signature: Option<Vec<u8>> = None;
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", v)) => timestamp = v.parse().ok(),
            Some(("v1", v)) => signature = BASE64.decode(v).ok(),
            _ => {}
        }
    }
    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        return Err(SignatureError::MalformedHeader);
    };

    if (now_unix - timestamp).abs() > TOLERANCE_SECS {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::MalformedHeader)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.verify_slice(&signature)
        .map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let sig = BASE64.encode(mac.finalize().into_bytes());
        format!("t={timestamp},v1={sig}")
    }

    #[test]
    fn accepts_a_valid_signature() {
        let header = sign(b"{\"id\":\"evt_1\"}", "whsec_test", 1_700_000_000);
        assert!(verify(&header, b"{\"id\":\"evt_1\"}", "whsec_test", 1_700_000_000).is_ok());
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let header = sign(b"{\"id\":\"evt_1\"}", "whsec_test", 1_700_000_000);
        assert_eq!(
            verify(&header, b"{\"id\":\"evt_2\"}", "whsec_test", 1_700_000_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_the_wrong_secret() {
        let header = sign(b"payload", "whsec_test", 1_700_000_000);
        assert_eq!(
            verify(&header, b"payload", "whsec_other", 1_700_000_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let header = sign(b"payload", "whsec_test", 1_700_000_000);
        assert_eq!(
            verify(&header, b"payload", "whsec_test", 1_700_000_000 + TOLERANCE_SECS + 1),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn rejects_a_malformed_header() {
        assert_eq!(
            verify("v1=notbase64!", b"payload", "whsec_test", 0),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify("", b"payload", "whsec_test", 0),
            Err(SignatureError::MalformedHeader)
        );
    }
}
